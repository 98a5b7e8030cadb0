/// Unified error type for table-class construction
/// Every failure a declaration or a construction call can hit surfaces as one of these variants
use arrow::error::ArrowError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    /// A native type or semantic type key has no registry entry (schema build time)
    #[error("The provided {native}{} is not supported", alias_suffix(.alias))]
    UnsupportedType {
        native: String,
        alias: String,
    },

    /// A column could not be located, or its values do not fit the declared type
    #[error("Expected column {column} of type {expected}. Given: {given}")]
    Column {
        column: String,
        expected: String,
        given: String,
    },

    /// A row does not match the schema's shape, or no row accessor fits it
    #[error("The given row(s) are not valid, and should instead be {allowed}. Given: {row}")]
    Row {
        row: String,
        allowed: String,
    },

    /// Supplied input names that are not part of the allowed-name set
    #[error("The provided data is invalid: {cause}")]
    Data {
        cause: String,
        unknown: Vec<String>,
    },

    /// Invalid record declaration (e.g. two fields sharing a column name)
    #[error("Schema error: {message}")]
    Schema {
        message: String,
        context: Option<String>,
    },

    /// Failure reported by the Arrow backend while assembling the batch
    #[error("Engine error: {message}")]
    Engine {
        message: String,
        context: Option<String>,
    },
}

fn alias_suffix(alias: &str) -> String {
    if alias.is_empty() {
        String::new()
    } else {
        format!(" ({})", alias)
    }
}

impl TableError {
    pub fn unsupported_type(native: impl ToString, alias: impl Into<String>) -> Self {
        Self::UnsupportedType {
            native: native.to_string(),
            alias: alias.into(),
        }
    }

    pub fn column(
        column: impl Into<String>,
        expected: impl Into<String>,
        given: impl Into<String>,
    ) -> Self {
        Self::Column {
            column: column.into(),
            expected: expected.into(),
            given: given.into(),
        }
    }

    pub fn row(row: impl Into<String>, allowed: impl Into<String>) -> Self {
        Self::Row {
            row: row.into(),
            allowed: allowed.into(),
        }
    }

    /// Data error listing every unknown name, in the order they were supplied
    pub fn unknown_names(unknown: Vec<String>) -> Self {
        Self::Data {
            cause: format!("({}, ...) is unknown to the model", unknown.join(",")),
            unknown,
        }
    }

    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
            context: None,
        }
    }

    pub fn engine(message: impl Into<String>) -> Self {
        Self::Engine {
            message: message.into(),
            context: None,
        }
    }

    /// Add context to an error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        match &mut self {
            Self::Schema { context: ctx, .. } => *ctx = Some(context.into()),
            Self::Engine { context: ctx, .. } => *ctx = Some(context.into()),
            _ => {}
        }
        self
    }

    /// Short kind label, used in log lines
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedType { .. } => "unsupported_type",
            Self::Column { .. } => "column",
            Self::Row { .. } => "row",
            Self::Data { .. } => "data",
            Self::Schema { .. } => "schema",
            Self::Engine { .. } => "engine",
        }
    }
}

impl From<ArrowError> for TableError {
    fn from(err: ArrowError) -> Self {
        Self::Engine {
            message: err.to_string(),
            context: None,
        }
    }
}

/// Result type alias for table-class operations
pub type TableResult<T> = Result<T, TableError>;
