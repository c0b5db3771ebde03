use crate::{
    data::{partition, Column, RequestSet},
    error::Error,
    surface::{NodeId, Surface},
    ui::{
        card::{build_card, CardElement},
        text::render_text,
    },
};

pub const PLAYLIST_TITLE_ID: &str = "playlist-title";

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct RenderStats {
    pub inbox: usize,
    pub playlist: usize,
    pub hidden: usize,
}

fn container<S: Surface>(surface: &S, column: Column) -> Result<NodeId, Error> {
    surface
        .element_by_id(column.element_id())
        .ok_or(Error::MissingElement(column.element_id()))
}

/// Rebuilds both columns from `requests`, replacing whatever they held.
pub fn render<S: Surface>(surface: &mut S, requests: &RequestSet) -> Result<RenderStats, Error> {
    let inbox = container(surface, Column::Inbox)?;
    let playlist = container(surface, Column::Playlist)?;
    surface.clear(inbox);
    surface.clear(playlist);

    let split = partition(requests);
    for (column, node) in [(Column::Inbox, inbox), (Column::Playlist, playlist)] {
        for request in split.column(column) {
            let CardElement(card) = build_card(surface, request);
            surface.append_child(node, card);
        }
    }

    let stats = RenderStats {
        inbox: split.inbox.len(),
        playlist: split.playlist.len(),
        hidden: split.hidden.len(),
    };
    log::debug!(
        "rendered {} inbox and {} playlist requests ({} hidden)",
        stats.inbox,
        stats.playlist,
        stats.hidden
    );
    Ok(stats)
}

/// Replaces the playlist heading, if the page has one.
pub fn render_playlist_title<S: Surface>(surface: &mut S, title: &str) {
    if let Some(heading) = surface.element_by_id(PLAYLIST_TITLE_ID) {
        surface.clear(heading);
        render_text(surface, heading, title);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data::{RequestStatus, SongRequest},
        surface::Document,
        ui::shell,
    };

    fn request(row_index: i64, status: RequestStatus) -> SongRequest {
        SongRequest {
            row_index,
            artist: format!("Artist {row_index}").into(),
            song: format!("Song {row_index}").into(),
            student_name: "Student".into(),
            link: "https://youtu.be/x".into(),
            status,
            period: None,
        }
    }

    fn mounted() -> Document {
        let mut doc = Document::new("Jukebox");
        shell::mount(&mut doc);
        doc
    }

    fn column_rows(doc: &Document, column: Column) -> Vec<String> {
        let node = doc.element_by_id(column.element_id()).unwrap();
        doc.children(node)
            .iter()
            .map(|card| doc.attribute(*card, "data-row").unwrap().to_string())
            .collect()
    }

    #[test]
    fn fills_columns_by_status() {
        let mut doc = mounted();
        let set: RequestSet = vec![
            request(1, RequestStatus::Pending),
            request(2, RequestStatus::Approved),
            request(3, RequestStatus::Pending),
            request(4, RequestStatus::Rejected),
        ]
        .into_iter()
        .collect();

        let stats = render(&mut doc, &set).unwrap();
        assert_eq!(
            stats,
            RenderStats {
                inbox: 2,
                playlist: 1,
                hidden: 1
            }
        );
        assert_eq!(column_rows(&doc, Column::Inbox), vec!["1", "3"]);
        assert_eq!(column_rows(&doc, Column::Playlist), vec!["2"]);
    }

    #[test]
    fn render_is_idempotent() {
        let mut doc = mounted();
        let set: RequestSet = (1..=5)
            .map(|i| request(i, if i % 2 == 0 { RequestStatus::Staged } else { RequestStatus::Pending }))
            .collect();

        render(&mut doc, &set).unwrap();
        let once = doc.to_html();
        render(&mut doc, &set).unwrap();
        assert_eq!(doc.to_html(), once);
    }

    #[test]
    fn rerender_replaces_previous_cards() {
        let mut doc = mounted();
        let first: RequestSet = vec![request(1, RequestStatus::Pending)].into_iter().collect();
        let second: RequestSet = vec![request(2, RequestStatus::Approved)].into_iter().collect();

        render(&mut doc, &first).unwrap();
        render(&mut doc, &second).unwrap();
        assert!(column_rows(&doc, Column::Inbox).is_empty());
        assert_eq!(column_rows(&doc, Column::Playlist), vec!["2"]);
    }

    #[test]
    fn empty_columns_stay_in_layout() {
        let mut doc = mounted();
        render(&mut doc, &RequestSet::default()).unwrap();
        for column in [Column::Inbox, Column::Playlist] {
            let node = doc.element_by_id(column.element_id()).unwrap();
            assert!(doc.children(node).is_empty());
            assert!(doc.descendants(doc.root()).contains(&node));
        }
    }

    #[test]
    fn missing_container_is_reported() {
        let mut doc = Document::default();
        let set = RequestSet::default();
        assert!(matches!(
            render(&mut doc, &set),
            Err(Error::MissingElement("song-inbox"))
        ));
    }

    #[test]
    fn playlist_title_is_replaced() {
        let mut doc = mounted();
        render_playlist_title(&mut doc, "first");
        render_playlist_title(&mut doc, "<i>second</i>");
        let heading = doc.element_by_id(PLAYLIST_TITLE_ID).unwrap();
        assert_eq!(doc.text_content(heading), "<i>second</i>");
        assert!(doc.find_by_tag(heading, "i").is_empty());
    }
}
