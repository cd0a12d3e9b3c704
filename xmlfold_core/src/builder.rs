//! Recursive-descent folding of a token stream into a tree.
//!
//! ```
//! # use xmlfold_core::{Source, TreeBuilder};
//! let builder = TreeBuilder::open(Source::memory("mem://doc", "<r><a>1</a><a>2</a><b/></r>"))
//!     .expect("well-formed document");
//! let root = builder.to_array().get("r").and_then(|slot| slot.single()).expect("root");
//!
//! // Repeated siblings are promoted to a list, unique ones are not.
//! assert_eq!(root.get("a").map(|slot| slot.len()), Some(2));
//! assert!(root.get("b").and_then(|slot| slot.single()).is_some());
//! ```

use crate::error::{Error, Result};
use crate::source::Source;
use crate::tokenizer::{Operation, Property, PropertyValue, Token, Tokenizer};
use crate::tree::{Attributes, Children, Content, Element};
use log::{debug, error, info, trace, warn};

/// Default bound on element nesting.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// How text interleaved with child elements is folded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MixedContent {
    /// Child elements take precedence: text at a level that holds elements is dropped.
    #[default]
    PreferElements,
    /// The latest write wins: text replaces everything folded so far at its level,
    /// and an element following text replaces the text.
    LastWrite,
}

/// Options controlling how a tree is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    pub mixed_content: MixedContent,
    /// Maximum nesting of elements; deeper documents fail with [`Error::DepthLimit`].
    pub max_depth: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions {
            mixed_content: MixedContent::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

struct Folder<'a> {
    tokenizer: &'a mut Tokenizer,
    options: &'a BuildOptions,
}

impl Folder<'_> {
    /// Folds tokens until the end of the current element, or the end of the document.
    fn build_subtree(&mut self, depth: usize) -> Result<Content> {
        let mut level = Content::default();
        while let Some(token) = self.tokenizer.next_token()? {
            match token {
                Token::StartElement { name, empty } => {
                    let attributes: Attributes = self
                        .tokenizer
                        .attributes()
                        .iter()
                        .map(|attr| (attr.name.clone(), attr.value.clone()))
                        .collect();
                    let content = if empty {
                        None
                    } else {
                        if depth >= self.options.max_depth {
                            error!(target: "xmlfold", "element '{name}' exceeds maximum depth {}", self.options.max_depth);
                            return Err(Error::DepthLimit(self.options.max_depth));
                        }
                        Some(self.build_subtree(depth + 1)?)
                    };
                    self.fold_element(&mut level, Element::new(name, attributes, content));
                }
                Token::Text(text) => {
                    let text = text.trim();
                    if !text.is_empty() {
                        self.fold_text(&mut level, text);
                    }
                }
                Token::EndElement { name } => {
                    trace!(target: "xmlfold", "closing level of '{name}'");
                    return Ok(level);
                }
                token => trace!(target: "xmlfold", "ignoring {token:?}"),
            }
        }
        Ok(level)
    }

    fn fold_element(&self, level: &mut Content, element: Element) {
        match level {
            Content::Elements(children) => children.insert(element),
            Content::Text(text) => {
                match self.options.mixed_content {
                    MixedContent::PreferElements => {
                        warn!(target: "xmlfold", "dropping text '{text}' mixed with element '{}'", element.tag())
                    }
                    MixedContent::LastWrite => {
                        debug!(target: "xmlfold", "element '{}' replaces text '{text}'", element.tag())
                    }
                }
                *level = Content::Elements(Children::from_iter([element]));
            }
        }
    }

    fn fold_text(&self, level: &mut Content, text: &str) {
        let keep_elements = self.options.mixed_content == MixedContent::PreferElements
            && level
                .as_children()
                .is_some_and(|children| !children.is_empty());
        if keep_elements {
            warn!(target: "xmlfold", "dropping text '{text}' mixed with elements");
        } else {
            *level = Content::Text(text.to_owned());
        }
    }
}

/// Builds and caches the tree of a document, keeping a token stream on it.
///
/// The tree is built once, eagerly, when the builder is opened;
/// afterwards the token stream is rewound so that the cursor
/// (see [`TreeBuilder::property`] and [`TreeBuilder::invoke`]) starts from the beginning.
#[derive(Debug)]
pub struct TreeBuilder {
    tokenizer: Tokenizer,
    tree: Content,
}

impl TreeBuilder {
    /// Opens the source and builds its tree with default options.
    ///
    /// Fails with [`Error::Open`] if the source cannot be opened,
    /// and with [`Error::MalformedDocument`] if the document is not well-formed.
    pub fn open(source: impl Into<Source>) -> Result<Self> {
        Self::with_options(source, BuildOptions::default())
    }

    /// Opens the source and builds its tree with the given options.
    pub fn with_options(source: impl Into<Source>, options: BuildOptions) -> Result<Self> {
        let mut tokenizer = Tokenizer::open(source)?;
        let tree = Self::fold(&mut tokenizer, &options)?;
        let mut builder = TreeBuilder { tokenizer, tree };
        builder.reset()?;
        Ok(builder)
    }

    /// Builds the tree of a source without keeping a builder around.
    pub fn build(source: impl Into<Source>, options: &BuildOptions) -> Result<Content> {
        let mut tokenizer = Tokenizer::open(source)?;
        Self::fold(&mut tokenizer, options)
    }

    fn fold(tokenizer: &mut Tokenizer, options: &BuildOptions) -> Result<Content> {
        info!(target: "xmlfold", "building tree of '{}'", tokenizer.source().uri());
        let tree = Folder { tokenizer, options }.build_subtree(0)?;
        info!(target: "xmlfold", "tree built");
        Ok(tree)
    }

    /// Rewinds the token stream to the start of the document.
    ///
    /// The cached tree is not rebuilt.
    pub fn reset(&mut self) -> Result<()> {
        self.tokenizer.reopen()
    }

    /// The cached tree.
    pub fn to_array(&self) -> &Content {
        &self.tree
    }

    /// An independent copy of the cached tree as a generic object.
    pub fn to_object(&self) -> serde_json::Value {
        serde_json::Value::from(&self.tree)
    }

    /// Consumes the builder, returning the cached tree.
    pub fn into_tree(self) -> Content {
        self.tree
    }

    /// Reads a cursor property of the token stream.
    pub fn property(&self, property: Property) -> PropertyValue {
        self.tokenizer.property(property)
    }

    /// Reads a cursor property by name.
    ///
    /// Fails with [`Error::UnknownProperty`] for names outside of [`Property::ALL`].
    pub fn property_by_name(&self, name: &str) -> Result<PropertyValue> {
        let property = name.parse::<Property>().inspect_err(|_| {
            error!(target: "xmlfold", "unknown property '{name}'");
        })?;
        Ok(self.property(property))
    }

    /// Forwards a named cursor operation to the token stream.
    ///
    /// Fails with [`Error::UnsupportedOperation`] if the tokenizer has no such operation.
    pub fn invoke(&mut self, name: &str, args: &[&str]) -> Result<PropertyValue> {
        let operation = Operation::parse(name, args)?;
        self.tokenizer.apply(&operation)
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Direct access to the token stream, for operations not exposed by the builder.
    pub fn tokenizer_mut(&mut self) -> &mut Tokenizer {
        &mut self.tokenizer
    }
}
