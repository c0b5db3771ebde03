use std::collections::HashMap;

use itertools::Itertools;

use super::{escape_attribute, escape_text, NodeId, Surface};

#[derive(Clone, Debug)]
enum Kind {
    Element {
        tag: &'static str,
        attributes: Vec<(&'static str, String)>,
        classes: Vec<String>,
        hidden: bool,
    },
    Text(String),
}

#[derive(Clone, Debug)]
struct Node {
    kind: Kind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Headless in-memory document. Serializes to HTML with every text node and
/// attribute value escaped.
#[derive(Clone, Debug)]
pub struct Document {
    title: String,
    nodes: Vec<Option<Node>>,
    free: Vec<usize>,
    ids: HashMap<String, NodeId>,
    root: NodeId,
}

impl Document {
    pub fn new(title: impl Into<String>) -> Self {
        let mut doc = Self {
            title: title.into(),
            nodes: Vec::new(),
            free: Vec::new(),
            ids: HashMap::new(),
            root: NodeId(0),
        };
        doc.root = doc.create_element("body");
        doc
    }

    fn alloc(&mut self, kind: Kind) -> NodeId {
        let node = Node {
            kind,
            parent: None,
            children: Vec::new(),
        };
        match self.free.pop() {
            Some(index) => {
                self.nodes[index] = Some(node);
                NodeId(index)
            }
            None => {
                self.nodes.push(Some(node));
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let node = self.nodes.get_mut(id.0).and_then(Option::as_mut);
        if node.is_none() {
            log::debug!("stale node handle: {:?}", id);
        }
        node
    }

    fn is_ancestor(&self, ancestor: NodeId, mut node: NodeId) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            match self.node(node).and_then(|n| n.parent) {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    fn detach(&mut self, child: NodeId) {
        let parent = self.node(child).and_then(|n| n.parent);
        if let Some(parent) = parent {
            if let Some(node) = self.node_mut(parent) {
                node.children.retain(|c| *c != child);
            }
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = None;
        }
    }

    fn release(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get_mut(id.0).and_then(Option::take) else {
                continue;
            };
            if let Kind::Element { attributes, .. } = &node.kind {
                if let Some((_, value)) = attributes.iter().find(|(name, _)| *name == "id") {
                    if self.ids.get(value) == Some(&id) {
                        self.ids.remove(value);
                    }
                }
            }
            stack.extend(node.children);
            self.free.push(id.0);
        }
    }

    pub fn tag(&self, node: NodeId) -> Option<&'static str> {
        match &self.node(node)?.kind {
            Kind::Element { tag, .. } => Some(*tag),
            Kind::Text(_) => None,
        }
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        match &self.node(node)?.kind {
            Kind::Element { attributes, .. } => attributes
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, value)| value.as_str()),
            Kind::Text(_) => None,
        }
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        matches!(
            self.node(node).map(|n| &n.kind),
            Some(Kind::Element { classes, .. }) if classes.iter().any(|c| c == class)
        )
    }

    /// Whether `node` and all of its ancestors are shown.
    pub fn is_visible(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            let Some(node) = self.node(id) else {
                return false;
            };
            if let Kind::Element { hidden: true, .. } = node.kind {
                return false;
            }
            current = node.parent;
        }
        true
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.node(node)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
    }

    /// Concatenated text of all text nodes under `node`, in document order.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            let Some(node) = self.node(id) else {
                continue;
            };
            if let Kind::Text(text) = &node.kind {
                out.push_str(text);
            }
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// All nodes below `node` in document order, `node` excluded.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev());
        }
        out
    }

    pub fn find_by_class(&self, node: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(node)
            .into_iter()
            .filter(|id| self.has_class(*id, class))
            .collect()
    }

    pub fn find_by_tag(&self, node: NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants(node)
            .into_iter()
            .filter(|id| self.tag(*id) == Some(tag))
            .collect()
    }

    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_html(node, &mut out);
        out
    }

    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(node) {
            self.write_html(*child, &mut out);
        }
        out
    }

    pub fn to_html(&self) -> String {
        format!(
            "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{}</title></head>{}</html>\n",
            escape_text(&self.title),
            self.outer_html(self.root)
        )
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.node(id) else {
            return;
        };
        match &node.kind {
            Kind::Text(text) => out.push_str(&escape_text(text)),
            Kind::Element {
                tag,
                attributes,
                classes,
                hidden,
            } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attributes {
                    out.push_str(&format!(" {name}=\"{}\"", escape_attribute(value)));
                }
                if !classes.is_empty() {
                    let classes = classes.iter().join(" ");
                    out.push_str(&format!(" class=\"{}\"", escape_attribute(&classes)));
                }
                if *hidden {
                    out.push_str(" hidden");
                }
                out.push('>');
                for child in &node.children {
                    self.write_html(*child, out);
                }
                out.push_str(&format!("</{tag}>"));
            }
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("")
    }
}

impl Surface for Document {
    fn root(&self) -> NodeId {
        self.root
    }

    fn create_element(&mut self, tag: &'static str) -> NodeId {
        self.alloc(Kind::Element {
            tag,
            attributes: Vec::new(),
            classes: Vec::new(),
            hidden: false,
        })
    }

    fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(Kind::Text(text.to_string()))
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if self.tag(parent).is_none() || self.node(child).is_none() {
            log::warn!("cannot append {:?} to {:?}", child, parent);
            return;
        }
        if self.is_ancestor(child, parent) {
            log::warn!("refusing to append {:?} into its own subtree", child);
            return;
        }
        self.detach(child);
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
    }

    fn clear(&mut self, node: NodeId) {
        let children = match self.node_mut(node) {
            Some(node) => std::mem::take(&mut node.children),
            None => return,
        };
        for child in children {
            self.release(child);
        }
    }

    fn set_attribute(&mut self, node: NodeId, name: &'static str, value: &str) {
        if name == "class" {
            for class in self.classes(node) {
                self.remove_class(node, &class);
            }
            for class in value.split_whitespace() {
                self.add_class(node, class);
            }
            return;
        }
        let Some(Node {
            kind: Kind::Element { attributes, .. },
            ..
        }) = self.node_mut(node)
        else {
            return;
        };
        let previous = match attributes.iter_mut().find(|(n, _)| *n == name) {
            Some((_, old)) => Some(std::mem::replace(old, value.to_string())),
            None => {
                attributes.push((name, value.to_string()));
                None
            }
        };
        if name == "id" {
            if let Some(old) = previous {
                if self.ids.get(&old) == Some(&node) {
                    self.ids.remove(&old);
                }
            }
            self.ids.insert(value.to_string(), node);
        }
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(Node {
            kind: Kind::Element { classes, .. },
            ..
        }) = self.node_mut(node)
        {
            if !classes.iter().any(|c| c == class) {
                classes.push(class.to_string());
            }
        }
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(Node {
            kind: Kind::Element { classes, .. },
            ..
        }) = self.node_mut(node)
        {
            classes.retain(|c| c != class);
        }
    }

    fn classes(&self, node: NodeId) -> Vec<String> {
        match self.node(node).map(|n| &n.kind) {
            Some(Kind::Element { classes, .. }) => classes.clone(),
            _ => Vec::new(),
        }
    }

    fn set_visible(&mut self, node: NodeId, visible: bool) {
        if let Some(Node {
            kind: Kind::Element { hidden, .. },
            ..
        }) = self.node_mut(node)
        {
            *hidden = !visible;
        }
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.ids.get(id).copied()
    }
}
