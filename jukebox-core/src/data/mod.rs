mod column;
mod config;
mod nav;
mod period;
mod promise;
mod request;
mod submission;

pub use crate::data::{
    column::{partition, Column, Partition},
    config::Config,
    nav::{Navigator, Theme, View},
    period::{normalize_period, playlist_title, Period},
    promise::Promise,
    request::{normalize, safe_href, RequestPayload, RequestSet, RequestStatus, SongRequest},
    submission::Submission,
};

use time::UtcOffset;

use crate::{error::Error, loader::LoadSeq};

/// Everything the UI shows, owned in one place.
#[derive(Debug)]
pub struct AppState {
    pub nav: Navigator,
    pub period: Option<Period>,
    pub utc_offset: UtcOffset,
    /// Requests from the most recent load that was applied.
    pub requests: Option<RequestSet>,
    /// Records skipped while applying `requests`.
    pub skipped: Vec<Error>,
    /// Status of the most recently issued load.
    pub load: Promise<(), LoadSeq>,
    applied: Option<LoadSeq>,
}

impl AppState {
    pub fn default_with_config(config: &Config) -> Self {
        Self {
            nav: Navigator::new(config.default_view, config.default_theme.clone()),
            period: config.period,
            utc_offset: config.utc_offset(),
            requests: None,
            skipped: Vec::new(),
            load: Promise::Empty,
            applied: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.load.is_pending()
    }

    pub fn load_error(&self) -> Option<&Error> {
        self.load.error()
    }

    pub fn set_load_started(&mut self, seq: LoadSeq) {
        self.load.defer(seq);
    }

    /// Takes the outcome of load `seq`. Returns whether `requests` was replaced
    /// and has to be rendered. A result older than the one already
    /// applied, or for another period, is dropped. A failure never touches the
    /// applied set. Without an active period, the first applied payload sets it.
    pub fn set_load_completed(
        &mut self,
        seq: LoadSeq,
        result: Result<RequestPayload, Error>,
    ) -> bool {
        let payload = match result {
            Ok(payload) => {
                self.load.update((seq, Ok(())));
                payload
            }
            Err(err) => {
                log::error!("load {} failed: {}", seq, err);
                if !self.load.update((seq, Err(err))) {
                    log::debug!("load {} was superseded, keeping status", seq);
                }
                return false;
            }
        };

        if self.applied.is_some_and(|applied| applied >= seq) {
            log::debug!("dropping load {}, superseded", seq);
            return false;
        }
        match self.period {
            Some(active) if payload.period != active => {
                log::debug!(
                    "dropping load {} for period {}, showing period {}",
                    seq,
                    payload.period,
                    active
                );
                return false;
            }
            Some(_) => {}
            None => {
                log::info!("showing period {} from load {}", payload.period, seq);
                self.period = Some(payload.period);
            }
        }

        let (requests, skipped) = RequestSet::from_payload(&payload);
        self.applied = Some(seq);
        self.skipped = skipped;
        self.requests = Some(requests);
        true
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::default_with_config(&Config::default())
    }
}
