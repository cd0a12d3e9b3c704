//! Generic object view of a tree.
//!
//! Every element becomes `{ "tag", "attributes", "type", "value" }`,
//! where `attributes` is `false` for elements without attributes
//! and `type`/`value` are omitted for self-closing elements.
//! The result is an independently owned [`serde_json::Value`].

use crate::tree::{Attributes, ChildSlot, Children, Content, Element};
use serde_json::{Map, Value};

impl From<&Attributes> for Value {
    fn from(value: &Attributes) -> Self {
        match value {
            Attributes::None => Value::Bool(false),
            Attributes::Map(map) => Value::Object(
                map.iter()
                    .map(|(name, value)| (name.clone(), Value::String(value.clone())))
                    .collect(),
            ),
        }
    }
}

impl From<&Element> for Value {
    fn from(value: &Element) -> Self {
        let mut object = Map::new();
        object.insert("tag".to_owned(), Value::String(value.tag().to_owned()));
        object.insert("attributes".to_owned(), value.attributes().into());
        if let Some(content) = value.content() {
            object.insert(
                "type".to_owned(),
                Value::String(content.kind().as_str().to_owned()),
            );
            object.insert("value".to_owned(), content.into());
        }
        Value::Object(object)
    }
}

impl From<&ChildSlot> for Value {
    fn from(value: &ChildSlot) -> Self {
        match value {
            ChildSlot::Single(element) => element.into(),
            ChildSlot::Many(elements) => Value::Array(elements.iter().map(Value::from).collect()),
        }
    }
}

impl From<&Children> for Value {
    fn from(value: &Children) -> Self {
        Value::Object(
            value
                .iter()
                .map(|(tag, slot)| (tag.to_owned(), slot.into()))
                .collect(),
        )
    }
}

impl From<&Content> for Value {
    fn from(value: &Content) -> Self {
        match value {
            Content::Elements(children) => children.into(),
            Content::Text(text) => Value::String(text.clone()),
        }
    }
}
