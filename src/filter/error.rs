use thiserror::Error;

/// Errors that can occur when parsing filter expressions
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterParseError {
    #[error("Invalid filter format: {input}. Expected 'field,value' pairs, got token '{token}'")]
    MalformedPair { input: String, token: String },

    #[error("Invalid filter format: {input}. Empty field name in token '{token}'")]
    EmptyField { input: String, token: String },

    #[error("Invalid filter format: {input}. Unterminated {quote} quote")]
    UnterminatedQuote { input: String, quote: char },

    #[error("Invalid filter format: {input}. 'or(' group is never closed")]
    UnclosedGroup { input: String },

    #[error("Invalid filter format: {input}. Only one 'or(...)' group is allowed")]
    MultipleGroups { input: String },
}

/// A filter or selection list references fields missing from the source header
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown field(s): {}", .fields.join(", "))]
pub struct UnknownFieldsError {
    /// Offending names, in the order they were first referenced
    pub fields: Vec<String>,
}
