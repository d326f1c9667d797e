use std::path::PathBuf;

/// Result type alias for formwork operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for plan construction
///
/// Plan construction is all-or-nothing: every variant here aborts the plan
/// before a template is emitted. Provisioning-time failures belong to the
/// external engine and have no representation in this enum.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A descriptor references a resource that has not been declared
    #[error("resource '{resource}' references undeclared {kind} '{target}'")]
    DanglingReference {
        resource: String,
        kind: String,
        target: String,
    },

    /// Two resources claim the same logical id
    #[error("logical id '{id}' is already declared")]
    DuplicateLogicalId { id: String },

    /// Two outputs claim the same label
    #[error("output '{name}' is already declared")]
    DuplicateOutput { name: String },

    /// Two resources claim the same externally-visible name
    #[error("{kind} name '{name}' is already claimed by resource '{existing}'")]
    NameCollision {
        kind: String,
        name: String,
        existing: String,
    },

    /// A descriptor field holds a value the plan cannot accept
    #[error("invalid configuration for '{resource}': {message}")]
    InvalidConfiguration { resource: String, message: String },

    /// A deferred reference names an attribute its target does not expose
    #[error("{kind} '{resource}' does not expose attribute '{attribute}'")]
    UnknownAttribute {
        resource: String,
        kind: String,
        attribute: String,
    },

    /// JSON serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// File system operations
    #[error("file system {operation} operation failed for '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },
}

// Conversion implementations
impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Json {
            message: error.to_string(),
            source: error,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::FileSystem {
            path: PathBuf::new(),
            operation: "unknown".to_string(),
            source: error,
        }
    }
}

// Helper methods for creating errors with context
impl Error {
    /// Create a dangling reference error
    #[must_use]
    pub fn dangling_reference(
        resource: impl Into<String>,
        kind: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Error::DanglingReference {
            resource: resource.into(),
            kind: kind.into(),
            target: target.into(),
        }
    }

    /// Create a duplicate logical id error
    #[must_use]
    pub fn duplicate_logical_id(id: impl Into<String>) -> Self {
        Error::DuplicateLogicalId { id: id.into() }
    }

    /// Create a duplicate output error
    #[must_use]
    pub fn duplicate_output(name: impl Into<String>) -> Self {
        Error::DuplicateOutput { name: name.into() }
    }

    /// Create a naming collision error
    #[must_use]
    pub fn name_collision(
        kind: impl Into<String>,
        name: impl Into<String>,
        existing: impl Into<String>,
    ) -> Self {
        Error::NameCollision {
            kind: kind.into(),
            name: name.into(),
            existing: existing.into(),
        }
    }

    /// Create an invalid configuration error
    #[must_use]
    pub fn invalid_configuration(
        resource: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Error::InvalidConfiguration {
            resource: resource.into(),
            message: message.into(),
        }
    }

    /// Create an unknown attribute error
    #[must_use]
    pub fn unknown_attribute(
        resource: impl Into<String>,
        kind: impl Into<String>,
        attribute: impl Into<String>,
    ) -> Self {
        Error::UnknownAttribute {
            resource: resource.into(),
            kind: kind.into(),
            attribute: attribute.into(),
        }
    }

    /// Create a file system error with context
    #[must_use]
    pub fn file_system(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Error::FileSystem {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }
}
