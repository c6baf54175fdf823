use std::fmt;

use thiserror::Error;

/// Result type for catalogue operations
pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Headland,
    Sector,
    Route,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntityKind::Headland => "Headland",
            EntityKind::Sector => "Sector",
            EntityKind::Route => "Route",
        })
    }
}

/// Errors raised while loading, importing or editing the catalogue
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Invalid slug '{0}': use at least two lowercase letters or digits, separated by single hyphens")]
    InvalidSlug(String),

    #[error("Invalid name '{0}': must be at least two characters")]
    InvalidName(String),

    #[error("Invalid stars {0}: expected a value between 0 and 5")]
    InvalidStars(f32),

    #[error("Duplicate {kind} slug: {slug}")]
    DuplicateSlug { kind: EntityKind, slug: String },

    #[error("{kind} not found: {slug}")]
    NotFound { kind: EntityKind, slug: String },

    #[error("Malformed seed data: {0}")]
    MalformedSeed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CatalogError {
    pub fn not_found(kind: EntityKind, slug: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            slug: slug.into(),
        }
    }

    pub fn duplicate(kind: EntityKind, slug: impl Into<String>) -> Self {
        Self::DuplicateSlug {
            kind,
            slug: slug.into(),
        }
    }

    /// Stable machine-readable code for wire envelopes.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidSlug(_) | Self::InvalidName(_) | Self::InvalidStars(_) => "invalid_request",
            Self::DuplicateSlug { .. } => "conflict",
            Self::NotFound { .. } => "not_found",
            Self::MalformedSeed(_) | Self::Json(_) => "malformed_data",
            Self::Io(_) => "io",
        }
    }
}
