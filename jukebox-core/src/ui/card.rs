use crate::{
    data::{safe_href, SongRequest},
    surface::{NodeId, Surface},
    ui::text::{render_text, text_element},
};

/// Root element of one built card, detached until a list appends it.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct CardElement(pub NodeId);

pub fn build_card<S: Surface>(surface: &mut S, request: &SongRequest) -> CardElement {
    let card = surface.create_element("div");
    surface.add_class(card, "song-card");
    surface.set_attribute(card, "data-row", &request.row_index.to_string());
    surface.set_attribute(card, "data-status", request.status.as_str());

    let title = surface.create_element("div");
    surface.add_class(title, "song-title");
    let artist = text_element(surface, "strong", "song-artist", &request.artist);
    surface.append_child(title, artist);
    render_text(surface, title, " — ");
    let song = text_element(surface, "span", "song-name", &request.song);
    surface.append_child(title, song);
    surface.append_child(card, title);

    let student = text_element(surface, "div", "song-student", &request.student_name);
    surface.append_child(card, student);

    if let Some(link) = link_control(surface, &request.link) {
        surface.append_child(card, link);
    }

    let status = text_element(surface, "span", "song-status", request.status.as_str());
    let status_class = format!("status-{}", request.status.as_str().to_ascii_lowercase());
    surface.add_class(status, &status_class);
    surface.append_child(card, status);

    CardElement(card)
}

fn link_control<S: Surface>(surface: &mut S, link: &str) -> Option<NodeId> {
    let link = link.trim();
    if link.is_empty() {
        return None;
    }
    let control = match safe_href(link) {
        Some(_) => {
            let anchor = text_element(surface, "a", "song-link", link);
            surface.set_attribute(anchor, "href", link);
            surface.set_attribute(anchor, "target", "_blank");
            surface.set_attribute(anchor, "rel", "noopener noreferrer");
            anchor
        }
        None => {
            log::debug!("not linking non-web url: {:?}", link);
            let span = text_element(surface, "span", "song-link", link);
            surface.add_class(span, "blocked");
            span
        }
    };
    Some(control)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{data::RequestStatus, surface::Document};

    fn request(artist: &str, song: &str, link: &str) -> SongRequest {
        SongRequest {
            row_index: 1,
            artist: artist.into(),
            song: song.into(),
            student_name: "Bad Actor".into(),
            link: link.into(),
            status: RequestStatus::Pending,
            period: None,
        }
    }

    #[test]
    fn card_shows_fields_in_order() {
        let mut doc = Document::default();
        let CardElement(card) = build_card(
            &mut doc,
            &request("Daft Punk", "One More Time", "https://youtube.com/x"),
        );

        let parts: Vec<String> = doc
            .children(card)
            .iter()
            .map(|n| doc.text_content(*n))
            .collect();
        assert_eq!(
            parts,
            vec![
                "Daft Punk — One More Time",
                "Bad Actor",
                "https://youtube.com/x",
                "PENDING"
            ]
        );
        let anchor = doc.find_by_tag(card, "a")[0];
        assert_eq!(doc.attribute(anchor, "href"), Some("https://youtube.com/x"));
        assert!(doc.has_class(doc.children(card)[3], "status-pending"));
    }

    #[test]
    fn injected_markup_is_literal() {
        let mut doc = Document::default();
        let CardElement(card) = build_card(
            &mut doc,
            &request("<b>HACK</b>", "<script>alert(1)</script>", "https://youtube.com"),
        );
        doc.append_child(doc.root(), card);

        let text = doc.text_content(card);
        assert!(text.contains("<b>HACK</b>"));
        assert!(text.contains("<script>alert(1)</script>"));
        assert!(doc.find_by_tag(card, "b").is_empty());
        assert!(doc.find_by_tag(card, "script").is_empty());

        let html = doc.outer_html(card);
        assert!(html.contains("&lt;b&gt;HACK&lt;/b&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn unsafe_links_are_not_navigable() {
        for link in [
            "javascript:alert(1)",
            "data:text/html,<script>alert(1)</script>",
            "youtube.com/watch",
            "ftp://example.com/song.mp3",
        ] {
            let mut doc = Document::default();
            let CardElement(card) = build_card(&mut doc, &request("A", "S", link));
            assert!(doc.find_by_tag(card, "a").is_empty(), "{link} got an anchor");
            let blocked = doc.find_by_class(card, "blocked");
            assert_eq!(blocked.len(), 1);
            assert_eq!(doc.text_content(blocked[0]), link);
        }
    }

    #[test]
    fn link_is_trimmed_for_destination_and_label() {
        let mut doc = Document::default();
        let CardElement(card) = build_card(&mut doc, &request("A", "S", "  https://youtu.be/x \n"));
        let anchor = doc.find_by_tag(card, "a")[0];
        assert_eq!(doc.attribute(anchor, "href"), Some("https://youtu.be/x"));
        assert_eq!(doc.text_content(anchor), "https://youtu.be/x");
    }

    #[test]
    fn empty_link_has_no_control() {
        let mut doc = Document::default();
        let CardElement(card) = build_card(&mut doc, &request("A", "S", ""));
        assert!(doc.find_by_class(card, "song-link").is_empty());
        assert_eq!(doc.children(card).len(), 3);
    }

    #[test]
    fn building_does_not_touch_the_document() {
        let mut doc = Document::default();
        let before = doc.to_html();
        build_card(&mut doc, &request("A", "S", "https://example.com"));
        assert_eq!(doc.to_html(), before);
    }
}
