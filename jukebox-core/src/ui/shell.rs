use crate::{
    data::{Column, Navigator, Theme, View},
    error::Error,
    surface::{NodeId, Surface},
    ui::{lists::PLAYLIST_TITLE_ID, text::text_element},
};

pub const BG_LAYER_ID: &str = "bg-layer";
pub const LOADING_SCREEN_ID: &str = "loading-screen";

/// Builds the page skeleton: background layer, loading screen, navigation,
/// one container per view and the two song columns.
pub fn mount<S: Surface>(surface: &mut S) {
    let root = surface.root();

    let bg_layer = surface.create_element("div");
    surface.set_attribute(bg_layer, "id", BG_LAYER_ID);
    surface.add_class(bg_layer, "bg-layer");
    surface.append_child(root, bg_layer);

    let loading = text_element(surface, "div", "loading-screen", "Loading…");
    surface.set_attribute(loading, "id", LOADING_SCREEN_ID);
    surface.set_visible(loading, false);
    surface.append_child(root, loading);

    let nav = surface.create_element("nav");
    surface.add_class(nav, "nav");
    for view in View::ALL {
        let button = text_element(surface, "button", "nav-button", view.title());
        surface.set_attribute(button, "data-view", view.name());
        surface.append_child(nav, button);
    }
    surface.append_child(root, nav);

    let main = surface.create_element("main");
    surface.add_class(main, "views");
    for view in View::ALL {
        let section = surface.create_element("section");
        surface.set_attribute(section, "id", view.element_id());
        surface.add_class(section, "view");
        if view == View::SongManager {
            mount_song_manager(surface, section);
        } else {
            let heading = text_element(surface, "h2", "view-title", view.title());
            surface.append_child(section, heading);
        }
        surface.append_child(main, section);
    }
    surface.append_child(root, main);
}

fn mount_song_manager<S: Surface>(surface: &mut S, section: NodeId) {
    let title = surface.create_element("h2");
    surface.set_attribute(title, "id", PLAYLIST_TITLE_ID);
    surface.add_class(title, "playlist-title");
    surface.append_child(section, title);

    let columns = surface.create_element("div");
    surface.add_class(columns, "song-columns");
    for (column, label) in [(Column::Inbox, "Inbox"), (Column::Playlist, "Playlist")] {
        let wrapper = surface.create_element("section");
        surface.add_class(wrapper, "song-column");
        let heading = text_element(surface, "h3", "song-column-title", label);
        surface.append_child(wrapper, heading);

        let list = surface.create_element("div");
        surface.set_attribute(list, "id", column.element_id());
        surface.add_class(list, "song-list");
        surface.append_child(wrapper, list);

        surface.append_child(columns, wrapper);
    }
    surface.append_child(section, columns);
}

fn element<S: Surface>(surface: &S, id: &'static str) -> Result<NodeId, Error> {
    surface.element_by_id(id).ok_or(Error::MissingElement(id))
}

/// Shows the active view, hides the rest and puts the current theme on the
/// background layer.
pub fn sync_nav<S: Surface>(surface: &mut S, nav: &Navigator) -> Result<(), Error> {
    for view in View::ALL {
        let section = element(surface, view.element_id())?;
        surface.set_visible(section, nav.is_visible(view));
    }

    let bg_layer = element(surface, BG_LAYER_ID)?;
    let current = nav.theme().as_str();
    for class in surface.classes(bg_layer) {
        if Theme::is_theme_class(&class) && class != current {
            surface.remove_class(bg_layer, &class);
        }
    }
    surface.add_class(bg_layer, current);
    Ok(())
}

pub fn set_loading<S: Surface>(surface: &mut S, loading: bool) {
    match surface.element_by_id(LOADING_SCREEN_ID) {
        Some(screen) => surface.set_visible(screen, loading),
        None => log::debug!("no loading screen mounted"),
    }
}
