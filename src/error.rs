#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Schema error in record {index}{}: {message}", id_suffix(.id))]
    Schema {
        index: usize,
        id: Option<String>,
        message: String,
    },

    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Could not replace catalog file: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl CatalogError {
    /// Schema error for the record at `index` of the catalog array.
    pub fn schema(index: usize, id: Option<&str>, message: impl Into<String>) -> Self {
        CatalogError::Schema {
            index,
            id: id.map(str::to_string),
            message: message.into(),
        }
    }
}

fn id_suffix(id: &Option<String>) -> String {
    id.as_ref().map(|i| format!(" ({i})")).unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, CatalogError>;
