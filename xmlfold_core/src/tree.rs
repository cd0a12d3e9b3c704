//! Tree produced by folding a token stream.
//!
//! A level of the tree is a [`Content`]: either the trimmed text of an element,
//! or a mapping from child tag name to [`ChildSlot`].
//! A tag that occurs once among siblings is stored as [`ChildSlot::Single`];
//! the second occurrence promotes the slot to [`ChildSlot::Many`],
//! so consumers must handle both shapes.
//!
//! Any level converts into the generic object view with `serde_json::Value::from`.

use indexmap::IndexMap;
use std::slice;

/// Whether an element's content is nested elements or text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Element,
    Text,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Element => "element",
            NodeKind::Text => "text",
        }
    }
}

/// Attributes of an element.
///
/// An element without attributes holds [`Attributes::None`], never an empty map.
/// Equality does not depend on attribute order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Attributes {
    #[default]
    None,
    Map(IndexMap<String, String>),
}

impl Attributes {
    pub fn get(&self, name: &str) -> Option<&str> {
        match self {
            Attributes::None => None,
            Attributes::Map(map) => map.get(name).map(String::as_str),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Attributes::None)
    }

    pub fn len(&self) -> usize {
        match self {
            Attributes::None => 0,
            Attributes::Map(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        let map = match self {
            Attributes::None => None,
            Attributes::Map(map) => Some(map),
        };
        map.into_iter()
            .flatten()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    /// Later duplicates overwrite earlier ones; no pairs yields [`Attributes::None`].
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let map: IndexMap<String, String> = iter
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();
        if map.is_empty() {
            Attributes::None
        } else {
            Attributes::Map(map)
        }
    }
}

/// An element of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attributes: Attributes,
    content: Option<Content>,
}

impl Element {
    /// Creates an element; `content` is `None` for self-closing elements.
    pub fn new(tag: impl Into<String>, attributes: Attributes, content: Option<Content>) -> Self {
        Element {
            tag: tag.into(),
            attributes,
            content,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn content(&self) -> Option<&Content> {
        self.content.as_ref()
    }

    /// Kind of the element's content; `None` for self-closing elements.
    pub fn kind(&self) -> Option<NodeKind> {
        self.content.as_ref().map(Content::kind)
    }

    pub fn is_self_closing(&self) -> bool {
        self.content.is_none()
    }

    /// Trimmed text, if the element's only content is text.
    pub fn text(&self) -> Option<&str> {
        self.content.as_ref().and_then(Content::as_text)
    }

    /// Child elements, if the element's content is nested elements.
    pub fn children(&self) -> Option<&Children> {
        self.content.as_ref().and_then(Content::as_children)
    }

    /// Children with the given tag.
    pub fn get(&self, tag: &str) -> Option<&ChildSlot> {
        self.children().and_then(|children| children.get(tag))
    }
}

/// The children stored under one tag name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildSlot {
    Single(Element),
    Many(Vec<Element>),
}

impl ChildSlot {
    /// Elements in document order, whatever the shape.
    pub fn as_slice(&self) -> &[Element] {
        match self {
            ChildSlot::Single(element) => slice::from_ref(element),
            ChildSlot::Many(elements) => elements,
        }
    }

    pub fn single(&self) -> Option<&Element> {
        match self {
            ChildSlot::Single(element) => Some(element),
            ChildSlot::Many(_) => None,
        }
    }

    pub fn many(&self) -> Option<&[Element]> {
        match self {
            ChildSlot::Single(_) => None,
            ChildSlot::Many(elements) => Some(elements),
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    fn push(&mut self, element: Element) {
        match self {
            ChildSlot::Many(elements) => elements.push(element),
            ChildSlot::Single(_) => {
                if let ChildSlot::Single(first) =
                    std::mem::replace(self, ChildSlot::Many(Vec::new()))
                {
                    *self = ChildSlot::Many(vec![first, element]);
                }
            }
        }
    }
}

/// Child elements of one level, keyed by tag name in order of first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Children(IndexMap<String, ChildSlot>);

impl Children {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an element under its tag.
    ///
    /// The first element with a tag is stored as [`ChildSlot::Single`];
    /// a second one promotes the slot to [`ChildSlot::Many`] holding both in order,
    /// and further ones are appended.
    pub fn insert(&mut self, element: Element) {
        match self.0.get_mut(&element.tag) {
            Some(slot) => slot.push(element),
            None => {
                self.0
                    .insert(element.tag.clone(), ChildSlot::Single(element));
            }
        }
    }

    pub fn get(&self, tag: &str) -> Option<&ChildSlot> {
        self.0.get(tag)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Distinct tag names, in order of first occurrence.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ChildSlot)> {
        self.0.iter().map(|(tag, slot)| (tag.as_str(), slot))
    }
}

impl FromIterator<Element> for Children {
    fn from_iter<T: IntoIterator<Item = Element>>(iter: T) -> Self {
        let mut children = Children::new();
        for element in iter {
            children.insert(element);
        }
        children
    }
}

/// Content of one level of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Elements(Children),
    Text(String),
}

impl Default for Content {
    fn default() -> Self {
        Content::Elements(Children::new())
    }
}

impl Content {
    pub fn kind(&self) -> NodeKind {
        match self {
            Content::Elements(_) => NodeKind::Element,
            Content::Text(_) => NodeKind::Text,
        }
    }

    pub fn as_children(&self) -> Option<&Children> {
        match self {
            Content::Elements(children) => Some(children),
            Content::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Content::Elements(_) => None,
            Content::Text(text) => Some(text),
        }
    }

    /// Children with the given tag; `None` for text content.
    pub fn get(&self, tag: &str) -> Option<&ChildSlot> {
        self.as_children().and_then(|children| children.get(tag))
    }

    /// Whether there is neither text nor any child element.
    pub fn is_empty(&self) -> bool {
        match self {
            Content::Elements(children) => children.is_empty(),
            Content::Text(text) => text.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(tag: &str, value: &str) -> Element {
        Element::new(tag, Attributes::None, Some(Content::Text(value.to_owned())))
    }

    #[test]
    fn single_until_repeated() {
        let mut children = Children::new();
        children.insert(text("a", "1"));
        children.insert(text("b", "x"));
        assert!(children.get("a").and_then(ChildSlot::single).is_some());
        children.insert(text("a", "2"));
        children.insert(text("a", "3"));
        let many = children.get("a").and_then(ChildSlot::many).expect("promoted");
        let values: Vec<_> = many.iter().filter_map(Element::text).collect();
        assert_eq!(values, ["1", "2", "3"]);
        assert_eq!(children.get("b").map(ChildSlot::len), Some(1));
        assert_eq!(children.tags().collect::<Vec<_>>(), ["a", "b"]);
    }

    #[test]
    fn attributes_sentinel() {
        let none: Attributes = Vec::<(String, String)>::new().into_iter().collect();
        assert!(none.is_none());
        let attrs: Attributes = [("x", "1"), ("y", "2"), ("x", "3")].into_iter().collect();
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.get("x"), Some("3"));
    }

    #[test]
    fn attributes_order_independent() {
        let xy: Attributes = [("x", "1"), ("y", "2")].into_iter().collect();
        let yx: Attributes = [("y", "2"), ("x", "1")].into_iter().collect();
        assert_eq!(xy, yx);
    }
}
