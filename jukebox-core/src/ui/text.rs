use crate::surface::{NodeId, Surface};

/// Appends `text` to `parent` as a single literal text node.
pub fn render_text<S: Surface>(surface: &mut S, parent: NodeId, text: &str) -> NodeId {
    let node = surface.create_text(text);
    surface.append_child(parent, node);
    node
}

/// A detached `<tag class="class">` holding exactly `text`.
pub fn text_element<S: Surface>(
    surface: &mut S,
    tag: &'static str,
    class: &str,
    text: &str,
) -> NodeId {
    let element = surface.create_element(tag);
    surface.add_class(element, class);
    render_text(surface, element, text);
    element
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Document;

    #[test]
    fn markup_stays_text() {
        let inputs = [
            "<b>HACK</b>",
            "<script>alert(1)</script>",
            "<img src=x onerror=alert(1)>",
            "\"><svg onload=alert(1)>",
            "&lt;already escaped&gt;",
            "",
        ];
        for input in inputs {
            let mut doc = Document::default();
            let span = text_element(&mut doc, "span", "field", input);
            doc.append_child(doc.root(), span);

            assert_eq!(doc.text_content(span), input);
            // One text node and no elements, whatever the input looks like.
            let below = doc.descendants(span);
            assert_eq!(below.len(), 1);
            assert!(doc.tag(below[0]).is_none());
        }
    }

    #[test]
    fn empty_string_renders_empty_content() {
        let mut doc = Document::default();
        let span = text_element(&mut doc, "span", "field", "");
        assert_eq!(doc.outer_html(span), "<span class=\"field\"></span>");
    }
}
