use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{CatalogError, Result};
use crate::model::Route;

static SLUG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap_or_else(|_| unreachable!())
});

pub const MAX_STARS: f32 = 5.0;

pub fn validate_slug(slug: &str) -> Result<()> {
    if slug.len() < 2 || !SLUG_RE.is_match(slug) {
        return Err(CatalogError::InvalidSlug(slug.to_string()));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<()> {
    if name.trim().chars().count() < 2 {
        return Err(CatalogError::InvalidName(name.to_string()));
    }
    Ok(())
}

pub fn validate_stars(stars: Option<f32>) -> Result<()> {
    match stars {
        Some(value) if !(0.0..=MAX_STARS).contains(&value) => Err(CatalogError::InvalidStars(value)),
        _ => Ok(()),
    }
}

pub fn validate_route(route: &Route) -> Result<()> {
    validate_slug(&route.slug)?;
    validate_name(&route.name)?;
    validate_stars(route.stars)
}

/// Lowercases, replaces runs of non-alphanumerics with single hyphens.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}
