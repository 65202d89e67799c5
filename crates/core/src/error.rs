use thiserror::Error;

#[derive(Error, Debug)]
pub enum TagscopeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid query: {0}")]
    Query(String),
    #[error("Parsing error: {0}")]
    Parsing(String),
    #[error("Language error: {0}")]
    Language(String),
    #[error("Invalid node descriptor: {0}")]
    Descriptor(String),
}

impl From<tree_sitter::QueryError> for TagscopeError {
    fn from(err: tree_sitter::QueryError) -> Self {
        TagscopeError::Query(format!(
            "{:?} at row {}, column {}: {}",
            err.kind, err.row, err.column, err.message
        ))
    }
}

impl From<tree_sitter::LanguageError> for TagscopeError {
    fn from(err: tree_sitter::LanguageError) -> Self {
        TagscopeError::Language(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TagscopeError>;
