use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("Empty query")]
    EmptyQuery,
}

impl SearchError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EmptyQuery => "invalid_request",
        }
    }
}
