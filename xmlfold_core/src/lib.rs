//! Folding of XML documents into generic, dynamically shaped trees.
//!
//! A [`TreeBuilder`] reads a document through a pull [`Tokenizer`]
//! and folds it into nested mappings from tag name to element,
//! where repeated sibling tags are promoted to lists (see [`ChildSlot`]).
//! The tree is built once and can then be viewed as is ([`TreeBuilder::to_array`])
//! or as an independent generic object ([`TreeBuilder::to_object`]).

#![forbid(unsafe_code)]

mod builder;
mod error;
mod object;
mod source;
pub mod tokenizer;
mod tree;

pub use builder::*;
pub use error::*;
pub use source::Source;
pub use tokenizer::{Attribute, NodeType, Operation, Property, PropertyValue, Token, Tokenizer};
pub use tree::*;
