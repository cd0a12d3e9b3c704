//! Pull-style cursor over an XML document.
//!
//! [`Tokenizer`] adapts [`quick_xml::NsReader`] to a small token vocabulary
//! and keeps the state of the node it is positioned on, so that cursor
//! properties (see [`Property`]) can be queried between reads.

mod operation;
mod property;

pub use self::operation::*;
pub use self::property::*;

use crate::error::{Error, Result};
use crate::source::Source;
use log::{error, info, trace};
use quick_xml::encoding::Decoder;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;
use std::fmt;
use std::io::BufRead;

const XML_LANG: &str = "xml:lang";
const XML_BASE: &str = "xml:base";

/// A token read from the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Start of an element; `empty` is set for self-closing tags,
    /// which are not followed by a matching [`Token::EndElement`].
    StartElement { name: String, empty: bool },
    /// End of an element.
    EndElement { name: String },
    /// Character data, unescaped but not trimmed.
    Text(String),
    /// Content of a CDATA section.
    CData(String),
    /// Content of a comment.
    Comment(String),
    /// Processing instruction.
    ProcessingInstruction { target: String, data: String },
    /// The XML declaration.
    Declaration,
    /// Content of the document type declaration.
    DocType(String),
}

/// An attribute of the element the tokenizer is positioned on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Qualified name, as written in the document.
    pub name: String,
    /// Namespace prefix, if any.
    pub prefix: Option<String>,
    /// Name without prefix.
    pub local_name: String,
    /// Namespace URI bound to the prefix, if any.
    pub namespace_uri: Option<String>,
    /// Unescaped value.
    pub value: String,
}

#[derive(Debug, Clone)]
struct Scope {
    name: String,
    lang: Option<String>,
    base: Option<String>,
}

#[derive(Debug, Clone, Default)]
struct CursorNode {
    node_type: NodeType,
    name: String,
    prefix: Option<String>,
    local_name: String,
    namespace_uri: Option<String>,
    value: Option<String>,
    depth: usize,
    is_empty_element: bool,
    attributes: Vec<Attribute>,
    lang: Option<String>,
    base: Option<String>,
}

impl CursorNode {
    fn named(node_type: NodeType, name: &str, depth: usize) -> Self {
        CursorNode {
            node_type,
            name: name.to_owned(),
            local_name: name.to_owned(),
            depth,
            ..Default::default()
        }
    }
}

struct ElementHead {
    name: String,
    prefix: Option<String>,
    local_name: String,
    attributes: Vec<Attribute>,
}

/// Forward-only reader over a [`Source`] exposing the current node as a cursor.
pub struct Tokenizer {
    source: Source,
    uri: String,
    reader: Option<NsReader<Box<dyn BufRead>>>,
    buf: Vec<u8>,
    node: CursorNode,
    attribute: Option<usize>,
    scopes: Vec<Scope>,
    root_seen: bool,
}

impl fmt::Debug for Tokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tokenizer")
            .field("source", &self.uri)
            .field("open", &self.reader.is_some())
            .field("node", &self.node)
            .finish_non_exhaustive()
    }
}

impl Tokenizer {
    /// Opens a token stream positioned before the first node of the document.
    ///
    /// Fails with [`Error::Open`] if the source cannot be opened.
    pub fn open(source: impl Into<Source>) -> Result<Self> {
        let source = source.into();
        let uri = source.uri();
        info!(target: "xmlfold", "opening token stream on '{uri}'");
        let reader = Self::reader(&source)?;
        Ok(Tokenizer {
            source,
            uri,
            reader: Some(reader),
            buf: Vec::new(),
            node: CursorNode::default(),
            attribute: None,
            scopes: Vec::new(),
            root_seen: false,
        })
    }

    fn reader(source: &Source) -> Result<NsReader<Box<dyn BufRead>>> {
        let mut reader = NsReader::from_reader(source.open()?);
        reader.config_mut().check_end_names = true;
        Ok(reader)
    }

    /// The source this tokenizer reads from.
    pub fn source(&self) -> &Source {
        &self.source
    }

    /// Whether the underlying stream is open.
    pub fn is_open(&self) -> bool {
        self.reader.is_some()
    }

    /// Closes the underlying stream. Reading from a closed tokenizer yields no tokens.
    pub fn close(&mut self) {
        trace!(target: "xmlfold", "closing token stream on '{}'", self.uri);
        self.reader = None;
        self.clear();
    }

    /// Closes the stream and opens a fresh one at the start of the document.
    pub fn reopen(&mut self) -> Result<()> {
        self.close();
        info!(target: "xmlfold", "reopening token stream on '{}'", self.uri);
        self.reader = Some(Self::reader(&self.source)?);
        Ok(())
    }

    fn clear(&mut self) {
        self.buf.clear();
        self.node = CursorNode::default();
        self.attribute = None;
        self.scopes.clear();
        self.root_seen = false;
    }

    /// Attributes of the current element, in document order.
    ///
    /// Empty unless the tokenizer is positioned on a start element.
    pub fn attributes(&self) -> &[Attribute] {
        &self.node.attributes
    }

    /// Advances to the next token.
    ///
    /// Returns `Ok(None)` once the document is exhausted or the stream is closed,
    /// and fails with [`Error::MalformedDocument`] on invalid markup.
    pub fn next_token(&mut self) -> Result<Option<Token>> {
        self.attribute = None;
        let Some(reader) = self.reader.as_mut() else {
            self.node = CursorNode::default();
            return Ok(None);
        };
        self.buf.clear();
        let read = reader.read_resolved_event_into(&mut self.buf);
        let (resolved, event) = match read {
            Ok(pair) => pair,
            Err(err) => {
                return Err(malformed(&self.uri, position_of(reader), err.to_string()));
            }
        };
        let namespace_uri = namespace_of(resolved);
        let position = position_of(reader);
        let decoder = reader.decoder();
        let reader = &*reader;
        let uri = &self.uri;
        let fail = |reason: String| malformed(uri, position, reason);
        let decode = |bytes: &[u8]| -> Result<String> {
            decoder
                .decode(bytes)
                .map(|text| text.into_owned())
                .map_err(|err| fail(err.to_string()))
        };
        let depth = self.scopes.len();
        let (lang, base) = self
            .scopes
            .last()
            .map(|scope| (scope.lang.clone(), scope.base.clone()))
            .unwrap_or_default();

        if depth == 0 {
            match &event {
                Event::Start(_) | Event::Empty(_) if self.root_seen => {
                    return Err(fail("more than one root element".to_owned()));
                }
                Event::Start(_) | Event::Empty(_) => self.root_seen = true,
                Event::Text(text) if !is_blank(text) => {
                    return Err(fail("text outside the root element".to_owned()));
                }
                Event::CData(_) => {
                    return Err(fail("CDATA section outside the root element".to_owned()));
                }
                Event::Eof if !self.root_seen => {
                    return Err(fail("no root element".to_owned()));
                }
                _ => {}
            }
        }

        let (node, token) = match event {
            Event::Start(start) => {
                let head = read_head(reader, decoder, &start).map_err(fail)?;
                let node = element_node(head, namespace_uri, depth, false, lang, base);
                trace!(target: "xmlfold", "start tag '{}'", node.name);
                self.scopes.push(Scope {
                    name: node.name.clone(),
                    lang: node.lang.clone(),
                    base: node.base.clone(),
                });
                let token = Token::StartElement {
                    name: node.name.clone(),
                    empty: false,
                };
                (node, token)
            }
            Event::Empty(start) => {
                let head = read_head(reader, decoder, &start).map_err(fail)?;
                let node = element_node(head, namespace_uri, depth, true, lang, base);
                trace!(target: "xmlfold", "empty tag '{}'", node.name);
                let token = Token::StartElement {
                    name: node.name.clone(),
                    empty: true,
                };
                (node, token)
            }
            Event::End(end) => {
                let name = decode(end.name().as_ref())?;
                match self.scopes.pop() {
                    Some(scope) if scope.name == name => {
                        trace!(target: "xmlfold", "end tag '{name}'");
                    }
                    Some(scope) => {
                        error!(target: "xmlfold", "end tag '{name}' does not match '{}'", scope.name);
                        return Err(fail(format!(
                            "expected end tag `{}`, found `{name}`",
                            scope.name
                        )));
                    }
                    None => {
                        error!(target: "xmlfold", "unexpected end tag '{name}'");
                        return Err(fail(format!("unexpected end tag `{name}`")));
                    }
                }
                let (prefix, local_name) = split_name(&name);
                let node = CursorNode {
                    node_type: NodeType::EndElement,
                    prefix,
                    local_name,
                    namespace_uri,
                    depth: self.scopes.len(),
                    lang,
                    base,
                    name: name.clone(),
                    ..Default::default()
                };
                (node, Token::EndElement { name })
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|err| fail(err.to_string()))?
                    .into_owned();
                let node_type = if !text.trim().is_empty() {
                    NodeType::Text
                } else if depth > 0 {
                    NodeType::SignificantWhitespace
                } else {
                    NodeType::Whitespace
                };
                let mut node = CursorNode::named(node_type, "#text", depth);
                node.value = Some(text.clone());
                node.lang = lang;
                node.base = base;
                (node, Token::Text(text))
            }
            Event::CData(cdata) => {
                let text = decode(cdata.as_ref())?;
                let mut node = CursorNode::named(NodeType::CData, "#cdata-section", depth);
                node.value = Some(text.clone());
                node.lang = lang;
                node.base = base;
                (node, Token::CData(text))
            }
            Event::Comment(comment) => {
                let text = decode(comment.as_ref())?;
                let mut node = CursorNode::named(NodeType::Comment, "#comment", depth);
                node.value = Some(text.clone());
                node.lang = lang;
                node.base = base;
                (node, Token::Comment(text))
            }
            Event::PI(pi) => {
                let target = decode(pi.target())?;
                let data = decode(pi.content())?.trim_start().to_owned();
                let mut node = CursorNode::named(NodeType::ProcessingInstruction, &target, depth);
                node.value = Some(data.clone());
                node.lang = lang;
                node.base = base;
                (node, Token::ProcessingInstruction { target, data })
            }
            Event::Decl(_) => {
                let node = CursorNode::named(NodeType::XmlDeclaration, "xml", depth);
                (node, Token::Declaration)
            }
            Event::DocType(doctype) => {
                let text = decode(doctype.as_ref())?.trim().to_owned();
                let name = text.split_whitespace().next().unwrap_or_default().to_owned();
                let mut node = CursorNode::named(NodeType::DocumentType, &name, depth);
                node.value = Some(text.clone());
                (node, Token::DocType(text))
            }
            Event::Eof => {
                if let Some(scope) = self.scopes.last() {
                    error!(target: "xmlfold", "unclosed tag '{}'", scope.name);
                    return Err(fail(format!("unclosed tag `{}`", scope.name)));
                }
                trace!(target: "xmlfold", "end of document '{}'", self.uri);
                self.node = CursorNode::default();
                return Ok(None);
            }
        };
        self.node = node;
        Ok(Some(token))
    }

    /// Skips the subtree of the current element and advances to the node following it.
    ///
    /// On any other node this is the same as [`Tokenizer::next_token`].
    pub fn skip_subtree(&mut self) -> Result<Option<Token>> {
        if self.node.node_type == NodeType::Element && !self.node.is_empty_element {
            let depth = self.node.depth;
            while let Some(token) = self.next_token()? {
                if matches!(token, Token::EndElement { .. }) && self.node.depth == depth {
                    break;
                }
            }
        }
        self.next_token()
    }
}

fn malformed(uri: &str, position: u64, reason: String) -> Error {
    error!(target: "xmlfold", "malformed document '{uri}' at byte {position}: {reason}");
    Error::MalformedDocument {
        uri: uri.to_owned(),
        position,
        reason,
    }
}

fn position_of<R>(reader: &NsReader<R>) -> u64 {
    reader.buffer_position()
}

fn is_blank(text: &[u8]) -> bool {
    text.iter().all(u8::is_ascii_whitespace)
}

fn namespace_of(resolved: ResolveResult<'_>) -> Option<String> {
    match resolved {
        ResolveResult::Bound(namespace) => {
            Some(String::from_utf8_lossy(namespace.as_ref()).into_owned())
        }
        ResolveResult::Unbound | ResolveResult::Unknown(_) => None,
    }
}

fn split_name(name: &str) -> (Option<String>, String) {
    match name.split_once(':') {
        Some((prefix, local)) => (Some(prefix.to_owned()), local.to_owned()),
        None => (None, name.to_owned()),
    }
}

fn read_head<R>(
    reader: &NsReader<R>,
    decoder: Decoder,
    start: &BytesStart<'_>,
) -> std::result::Result<ElementHead, String> {
    let decode = |bytes: &[u8]| {
        decoder
            .decode(bytes)
            .map(|text| text.into_owned())
            .map_err(|err| err.to_string())
    };
    let name = decode(start.name().as_ref())?;
    let (prefix, local_name) = split_name(&name);
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|err| err.to_string())?;
        let (resolved, local) = reader.resolve_attribute(attr.key);
        let namespace_uri = namespace_of(resolved);
        let value = attr
            .unescape_value()
            .map_err(|err| err.to_string())?
            .into_owned();
        attributes.push(Attribute {
            name: decode(attr.key.as_ref())?,
            prefix: attr
                .key
                .prefix()
                .map(|prefix| decode(prefix.as_ref()))
                .transpose()?,
            local_name: decode(local.as_ref())?,
            namespace_uri,
            value,
        });
    }
    Ok(ElementHead {
        name,
        prefix,
        local_name,
        attributes,
    })
}

fn element_node(
    head: ElementHead,
    namespace_uri: Option<String>,
    depth: usize,
    is_empty_element: bool,
    lang: Option<String>,
    base: Option<String>,
) -> CursorNode {
    let own = |key: &str| {
        head.attributes
            .iter()
            .rev()
            .find(|attr| attr.name == key)
            .map(|attr| attr.value.clone())
    };
    let lang = own(XML_LANG).or(lang);
    let base = own(XML_BASE).or(base);
    CursorNode {
        node_type: NodeType::Element,
        name: head.name,
        prefix: head.prefix,
        local_name: head.local_name,
        namespace_uri,
        value: None,
        depth,
        is_empty_element,
        attributes: head.attributes,
        lang,
        base,
    }
}
