use thiserror::Error;

/// The error type for opening, tokenizing and folding XML documents.
#[derive(Debug, Error)]
pub enum Error {
    /// The source could not be opened or read.
    #[error("failed to open source '{uri}'")]
    Open {
        /// Locator of the source that failed to open.
        uri: String,
        /// Underlying I/O failure.
        #[source]
        err: std::io::Error,
    },
    /// The tokenizer found invalid markup.
    #[error("malformed document '{uri}' at byte {position}: {reason}")]
    MalformedDocument {
        /// Locator of the offending source.
        uri: String,
        /// Byte offset reached by the tokenizer when the error was detected.
        position: u64,
        /// Description of what went wrong.
        reason: String,
    },
    /// Nesting went beyond the configured maximum depth.
    #[error("element nesting exceeds the maximum depth of {0}")]
    DepthLimit(usize),
    /// The delegated operation is not supported by the tokenizer.
    #[error("unsupported operation `{0}`")]
    UnsupportedOperation(String),
    /// The requested property is not one of the cursor properties.
    #[error("unknown property `{0}`")]
    UnknownProperty(String),
    /// The delegated operation was invoked without a required argument.
    #[error("operation `{operation}` is missing argument {index}")]
    MissingArgument {
        /// Name of the invoked operation.
        operation: &'static str,
        /// Zero-based position of the missing argument.
        index: usize,
    },
}

/// Result type alias for tokenizer and builder operations.
pub type Result<T> = std::result::Result<T, Error>;
