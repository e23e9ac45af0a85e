use thiserror::Error;

pub type Result<T> = std::result::Result<T, IntrospectionError>;

#[derive(Debug, Error)]
pub enum IntrospectionError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error {0}: {1}")]
    Http(u16, String),

    #[error("Failed to parse introspection response: {0}")]
    Parse(String),

    #[error("GraphQL endpoint returned errors: {0}")]
    GraphQl(String),

    /// The payload is missing a field or a field has the wrong shape.
    #[error("Invalid introspection result at `{path}`: {message}")]
    Validation { path: String, message: String },

    #[error("Unsupported type kind `{kind}` at `{path}`")]
    UnsupportedKind { kind: String, path: String },

    /// A named type reference points at a type that introspection never reported.
    #[error("Unknown type `{type_name}` referenced by {referrer}")]
    DanglingReference { type_name: String, referrer: String },

    #[error("Cannot print {referrer}: type `{type_name}` is not defined in the schema")]
    Print { type_name: String, referrer: String },
}

impl IntrospectionError {
    pub(crate) fn validation(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            path: path.into(),
            message: message.into(),
        }
    }
}
