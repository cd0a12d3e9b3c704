use super::{Attribute, Tokenizer};
use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// Kind of node the tokenizer is positioned on.
///
/// Discriminants follow the node type codes of pull readers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// Not positioned on a node: before the first read, at end of input, or closed.
    #[default]
    None = 0,
    Element = 1,
    Attribute = 2,
    Text = 3,
    CData = 4,
    ProcessingInstruction = 7,
    Comment = 8,
    DocumentType = 10,
    /// Whitespace outside of the document element.
    Whitespace = 13,
    /// Whitespace inside element content.
    SignificantWhitespace = 14,
    EndElement = 15,
    XmlDeclaration = 17,
}

impl NodeType {
    /// Numeric node type code.
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeType::None => "None",
            NodeType::Element => "Element",
            NodeType::Attribute => "Attribute",
            NodeType::Text => "Text",
            NodeType::CData => "CData",
            NodeType::ProcessingInstruction => "ProcessingInstruction",
            NodeType::Comment => "Comment",
            NodeType::DocumentType => "DocumentType",
            NodeType::Whitespace => "Whitespace",
            NodeType::SignificantWhitespace => "SignificantWhitespace",
            NodeType::EndElement => "EndElement",
            NodeType::XmlDeclaration => "XmlDeclaration",
        };
        write!(f, "{name}")
    }
}

/// Read-only properties of the tokenizer's current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    AttributeCount,
    BaseUri,
    Depth,
    HasAttributes,
    HasValue,
    IsDefault,
    IsEmptyElement,
    LocalName,
    Name,
    NamespaceUri,
    NodeType,
    Prefix,
    Value,
    XmlLang,
}

impl Property {
    /// All properties, in alphabetical order of their names.
    pub const ALL: [Property; 14] = [
        Property::AttributeCount,
        Property::BaseUri,
        Property::Depth,
        Property::HasAttributes,
        Property::HasValue,
        Property::IsDefault,
        Property::IsEmptyElement,
        Property::LocalName,
        Property::Name,
        Property::NamespaceUri,
        Property::NodeType,
        Property::Prefix,
        Property::Value,
        Property::XmlLang,
    ];

    /// The name the property is requested by.
    pub fn name(self) -> &'static str {
        match self {
            Property::AttributeCount => "attributeCount",
            Property::BaseUri => "baseURI",
            Property::Depth => "depth",
            Property::HasAttributes => "hasAttributes",
            Property::HasValue => "hasValue",
            Property::IsDefault => "isDefault",
            Property::IsEmptyElement => "isEmptyElement",
            Property::LocalName => "localName",
            Property::Name => "name",
            Property::NamespaceUri => "namespaceURI",
            Property::NodeType => "nodeType",
            Property::Prefix => "prefix",
            Property::Value => "value",
            Property::XmlLang => "xmlLang",
        }
    }
}

impl FromStr for Property {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Property::ALL
            .into_iter()
            .find(|property| property.name() == s)
            .ok_or_else(|| Error::UnknownProperty(s.to_owned()))
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Value of a [`Property`], or outcome of an [`super::Operation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    Bool(bool),
    Int(usize),
    Text(Option<String>),
    NodeType(NodeType),
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Bool(b) => write!(f, "{b}"),
            PropertyValue::Int(n) => write!(f, "{n}"),
            PropertyValue::Text(Some(text)) => write!(f, "{text}"),
            PropertyValue::Text(None) => Ok(()),
            PropertyValue::NodeType(node_type) => write!(f, "{node_type}"),
        }
    }
}

impl Tokenizer {
    fn current_attribute(&self) -> Option<&Attribute> {
        self.attribute
            .and_then(|index| self.node.attributes.get(index))
    }

    /// Reads a property of the current position.
    pub fn property(&self, property: Property) -> PropertyValue {
        match property {
            Property::AttributeCount => PropertyValue::Int(self.attribute_count()),
            Property::BaseUri => PropertyValue::Text(Some(self.base_uri().to_owned())),
            Property::Depth => PropertyValue::Int(self.depth()),
            Property::HasAttributes => PropertyValue::Bool(self.has_attributes()),
            Property::HasValue => PropertyValue::Bool(self.has_value()),
            Property::IsDefault => PropertyValue::Bool(self.is_default()),
            Property::IsEmptyElement => PropertyValue::Bool(self.is_empty_element()),
            Property::LocalName => PropertyValue::Text(Some(self.local_name().to_owned())),
            Property::Name => PropertyValue::Text(Some(self.name().to_owned())),
            Property::NamespaceUri => PropertyValue::Text(self.namespace_uri().map(str::to_owned)),
            Property::NodeType => PropertyValue::NodeType(self.node_type()),
            Property::Prefix => PropertyValue::Text(self.prefix().map(str::to_owned)),
            Property::Value => PropertyValue::Text(self.value().map(str::to_owned)),
            Property::XmlLang => PropertyValue::Text(self.xml_lang().map(str::to_owned)),
        }
    }

    /// Number of attributes of the current element.
    pub fn attribute_count(&self) -> usize {
        self.node.attributes.len()
    }

    /// In-scope `xml:base`, or the source's URI.
    pub fn base_uri(&self) -> &str {
        self.node.base.as_deref().unwrap_or(&self.uri)
    }

    /// Depth of the current node; the document element is at depth 0.
    pub fn depth(&self) -> usize {
        if self.attribute.is_some() {
            self.node.depth + 1
        } else {
            self.node.depth
        }
    }

    pub fn has_attributes(&self) -> bool {
        !self.node.attributes.is_empty()
    }

    pub fn has_value(&self) -> bool {
        self.value().is_some()
    }

    /// Always `false`: attribute defaults from a DTD are never applied.
    pub fn is_default(&self) -> bool {
        false
    }

    pub fn is_empty_element(&self) -> bool {
        self.attribute.is_none() && self.node.is_empty_element
    }

    pub fn local_name(&self) -> &str {
        match self.current_attribute() {
            Some(attr) => &attr.local_name,
            None => &self.node.local_name,
        }
    }

    /// Qualified name of the current node.
    pub fn name(&self) -> &str {
        match self.current_attribute() {
            Some(attr) => &attr.name,
            None => &self.node.name,
        }
    }

    pub fn namespace_uri(&self) -> Option<&str> {
        match self.current_attribute() {
            Some(attr) => attr.namespace_uri.as_deref(),
            None => self.node.namespace_uri.as_deref(),
        }
    }

    pub fn node_type(&self) -> NodeType {
        if self.attribute.is_some() {
            NodeType::Attribute
        } else {
            self.node.node_type
        }
    }

    pub fn prefix(&self) -> Option<&str> {
        match self.current_attribute() {
            Some(attr) => attr.prefix.as_deref(),
            None => self.node.prefix.as_deref(),
        }
    }

    /// Text value of the current node, if it has one.
    pub fn value(&self) -> Option<&str> {
        match self.current_attribute() {
            Some(attr) => Some(&attr.value),
            None => self.node.value.as_deref(),
        }
    }

    /// In-scope `xml:lang`.
    pub fn xml_lang(&self) -> Option<&str> {
        self.node.lang.as_deref()
    }
}
