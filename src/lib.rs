//! Command line front end of xmlfold.
//!
//! Folds an XML document into a generic tree,
//! where elements are keyed by tag name and repeated sibling tags become lists,
//! and prints it as JSON. The token stream of the document can also be inspected node by node.

mod cli;

pub use cli::Cli;
pub use xmlfold_core;
