//! The rendering surface the UI draws on.
//!
//! There is deliberately no way to insert markup: elements are created from a
//! fixed tag name and all user content goes through `create_text`.

mod document;
mod escape;

pub use document::Document;
pub use escape::{escape_attribute, escape_text};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NodeId(pub(crate) usize);

pub trait Surface {
    /// The element everything is mounted under.
    fn root(&self) -> NodeId;

    /// Creates a detached element.
    fn create_element(&mut self, tag: &'static str) -> NodeId;

    /// Creates a detached text node. `text` is always displayed literally.
    fn create_text(&mut self, text: &str) -> NodeId;

    fn append_child(&mut self, parent: NodeId, child: NodeId);

    /// Removes and drops every child of `node`.
    fn clear(&mut self, node: NodeId);

    fn set_attribute(&mut self, node: NodeId, name: &'static str, value: &str);

    fn add_class(&mut self, node: NodeId, class: &str);

    fn remove_class(&mut self, node: NodeId, class: &str);

    fn classes(&self, node: NodeId) -> Vec<String>;

    fn set_visible(&mut self, node: NodeId, visible: bool);

    /// Looks up an attached or detached element by its `id` attribute.
    fn element_by_id(&self, id: &str) -> Option<NodeId>;
}
