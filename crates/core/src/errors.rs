use thiserror::Error;

pub const LOAD_FAILURE_PREFIX: &str = "Sorry, we can't load product information right now";
pub const EMPTY_CATALOG_MESSAGE: &str = "No young driver products are available at the moment.";

/// Failures while retrieving the catalog. Every variant is a load failure for
/// the client: there is no partial-result mode.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog resource `{location}` was not found")]
    NotFound { location: String },
    #[error("could not read catalog resource `{location}`: {detail}")]
    Read { location: String, detail: String },
    #[error("catalog content from `{location}` is not a well-formed product list: {detail}")]
    Parse { location: String, detail: String },
    #[error("invalid catalog service url `{url}`: {detail}")]
    InvalidBaseUrl { url: String, detail: String },
    #[error("catalog request to `{url}` failed: {detail}")]
    Transport { url: String, detail: String },
    #[error("catalog request to `{url}` timed out after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },
    #[error("catalog service at `{url}` responded with status {status}")]
    Status { url: String, status: u16 },
}

impl CatalogError {
    /// Short machine-readable class used in structured command output and logs.
    pub fn class(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "catalog_not_found",
            Self::Read { .. } => "catalog_read",
            Self::Parse { .. } => "catalog_parse",
            Self::InvalidBaseUrl { .. } => "catalog_url",
            Self::Transport { .. } => "catalog_transport",
            Self::Timeout { .. } => "catalog_timeout",
            Self::Status { .. } => "catalog_status",
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("{}", EMPTY_CATALOG_MESSAGE)]
    EmptyCatalog,
    #[error("no product has been selected yet")]
    NoProductSelected,
    #[error("no product named `{name}` is in the catalog")]
    UnknownProduct { name: String },
    #[error("unknown question category `{input}`")]
    UnknownCategory { input: String },
}

/// Errors surfaced at the boundary nearest the user.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ClientError {
    #[error(transparent)]
    Load(#[from] CatalogError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ClientError {
    pub fn user_message(&self) -> String {
        match self {
            Self::Load(error) => format!("{LOAD_FAILURE_PREFIX}: {error}"),
            Self::Session(error) => error.to_string(),
        }
    }

    pub fn class(&self) -> &'static str {
        match self {
            Self::Load(error) => error.class(),
            Self::Session(SessionError::EmptyCatalog) => "empty_catalog",
            Self::Session(SessionError::NoProductSelected) => "no_product_selected",
            Self::Session(SessionError::UnknownProduct { .. }) => "unknown_product",
            Self::Session(SessionError::UnknownCategory { .. }) => "unknown_category",
        }
    }
}
