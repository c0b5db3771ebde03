use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use time::OffsetDateTime;

use crate::{
    data::{playlist_title, AppState, Config, Period, RequestSet, Theme, View},
    error::Error,
    loader::{Completed, LoadSeq, Loader, RequestSource},
    surface::Surface,
    ui::{
        lists::{self, RenderStats},
        shell,
    },
};

/// Ties the owned state, the loader and the surface together. Every method runs
/// to completion on the caller's thread; only fetching happens elsewhere.
pub struct App<S: Surface> {
    surface: S,
    state: AppState,
    loader: Loader,
}

impl<S: Surface> App<S> {
    pub fn new(
        mut surface: S,
        config: &Config,
        source: Arc<dyn RequestSource>,
    ) -> Result<Self, Error> {
        let state = AppState::default_with_config(config);
        shell::mount(&mut surface);
        shell::sync_nav(&mut surface, &state.nav)?;
        Ok(Self {
            surface,
            state,
            loader: Loader::new(source),
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn activate(&mut self, name: &str) -> Result<View, Error> {
        let view = self.state.nav.activate(name).map_err(|err| {
            log::warn!("navigation refused: {}", err);
            err
        })?;
        log::info!("showing {} with {}", view, self.state.nav.theme());
        shell::sync_nav(&mut self.surface, &self.state.nav)?;
        Ok(view)
    }

    pub fn apply_theme(&mut self, name: &str) -> Result<Theme, Error> {
        let theme = self
            .state
            .nav
            .apply_theme(name)
            .map_err(|err| {
                log::warn!("theme refused: {}", err);
                err
            })?
            .clone();
        shell::sync_nav(&mut self.surface, &self.state.nav)?;
        Ok(theme)
    }

    /// Switches the active period. Requests of the old period stay on screen
    /// until the next load of the new one completes.
    pub fn set_period(&mut self, period: Period) {
        self.state.period = Some(period);
    }

    /// Starts loading the active period. Without one, the period named by the
    /// first payload becomes active.
    pub fn refresh(&mut self) -> LoadSeq {
        let seq = self.loader.start(self.state.period);
        self.state.set_load_started(seq);
        shell::set_loading(&mut self.surface, true);
        seq
    }

    /// Applies every load that has finished so far, without blocking.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Some(completed) = self.loader.try_next() {
            self.handle(completed);
            handled += 1;
        }
        handled
    }

    /// Blocks until the most recently issued load has been applied or failed.
    /// Returns `false` if `timeout` passed first.
    pub fn wait(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.state.is_loading() {
            match self.loader.next_before(deadline) {
                Some(completed) => self.handle(completed),
                None => return false,
            }
        }
        true
    }

    fn handle(&mut self, completed: Completed) {
        let Completed { seq, result } = completed;
        if self.state.set_load_completed(seq, result) {
            if let Some(requests) = &self.state.requests {
                if let Err(err) = Self::draw(&mut self.surface, &self.state, requests) {
                    log::error!("failed to render load {}: {}", seq, err);
                }
            }
        }
        if !self.state.is_loading() {
            shell::set_loading(&mut self.surface, false);
        }
    }

    /// Renders `requests` directly, bypassing the loader.
    pub fn render(&mut self, requests: &RequestSet) -> Result<RenderStats, Error> {
        Self::draw(&mut self.surface, &self.state, requests)
    }

    fn draw(surface: &mut S, state: &AppState, requests: &RequestSet) -> Result<RenderStats, Error> {
        let stats = lists::render(surface, requests)?;
        if let Some(period) = requests.period() {
            let title = playlist_title(period, OffsetDateTime::now_utc(), state.utc_offset);
            lists::render_playlist_title(surface, &title);
        }
        Ok(stats)
    }
}
