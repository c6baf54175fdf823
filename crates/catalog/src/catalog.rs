use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, EntityKind, Result};
use crate::model::{Comment, Headland, Route, Sector};

/// The whole headland → sector → route tree.
///
/// Serialises to the same camelCase document the seed data uses, so a saved
/// catalogue can be fed back through [`crate::import_seed`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub headlands: Vec<Headland>,
}

/// A sector together with the headland it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct SectorRef<'a> {
    pub headland: &'a Headland,
    pub sector: &'a Sector,
}

/// A route together with its sector and headland.
#[derive(Debug, Clone, Copy)]
pub struct RouteRef<'a> {
    pub headland: &'a Headland,
    pub sector: &'a Sector,
    pub route: &'a Route,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CatalogCounts {
    pub headlands: usize,
    pub sectors: usize,
    pub routes: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectorNav {
    pub slug: String,
    pub name: String,
    pub routes: usize,
}

/// Sidebar entry: a headland and the sectors under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadlandNav {
    pub slug: String,
    pub name: String,
    pub sectors: Vec<SectorNav>,
}

impl Catalog {
    pub fn new(headlands: Vec<Headland>) -> Self {
        Self { headlands }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let catalog: Catalog = serde_json::from_slice(&bytes)?;
        log::debug!(
            "Loaded catalogue from {} ({} headlands)",
            path.display(),
            catalog.headlands.len()
        );
        Ok(catalog)
    }

    /// Writes pretty JSON next to `path` and renames it into place.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, path)?;
        log::debug!("Saved catalogue to {}", path.display());
        Ok(())
    }

    pub fn headland(&self, slug: &str) -> Option<&Headland> {
        self.headlands.iter().find(|h| h.slug == slug)
    }

    pub fn sectors(&self) -> impl Iterator<Item = SectorRef<'_>> {
        self.headlands.iter().flat_map(|headland| {
            headland
                .sectors
                .iter()
                .map(move |sector| SectorRef { headland, sector })
        })
    }

    pub fn routes(&self) -> impl Iterator<Item = RouteRef<'_>> {
        self.sectors().flat_map(|SectorRef { headland, sector }| {
            sector.routes.iter().map(move |route| RouteRef {
                headland,
                sector,
                route,
            })
        })
    }

    pub fn sector(&self, slug: &str) -> Option<SectorRef<'_>> {
        self.sectors().find(|s| s.sector.slug == slug)
    }

    pub fn route(&self, slug: &str) -> Option<RouteRef<'_>> {
        self.routes().find(|r| r.route.slug == slug)
    }

    pub fn require_headland(&self, slug: &str) -> Result<&Headland> {
        self.headland(slug)
            .ok_or_else(|| CatalogError::not_found(EntityKind::Headland, slug))
    }

    pub fn require_sector(&self, slug: &str) -> Result<SectorRef<'_>> {
        self.sector(slug)
            .ok_or_else(|| CatalogError::not_found(EntityKind::Sector, slug))
    }

    pub fn require_route(&self, slug: &str) -> Result<RouteRef<'_>> {
        self.route(slug)
            .ok_or_else(|| CatalogError::not_found(EntityKind::Route, slug))
    }

    pub(crate) fn headland_mut(&mut self, slug: &str) -> Result<&mut Headland> {
        self.headlands
            .iter_mut()
            .find(|h| h.slug == slug)
            .ok_or_else(|| CatalogError::not_found(EntityKind::Headland, slug))
    }

    pub(crate) fn sector_mut(&mut self, slug: &str) -> Result<&mut Sector> {
        self.headlands
            .iter_mut()
            .flat_map(|h| h.sectors.iter_mut())
            .find(|s| s.slug == slug)
            .ok_or_else(|| CatalogError::not_found(EntityKind::Sector, slug))
    }

    pub(crate) fn route_mut(&mut self, slug: &str) -> Result<&mut Route> {
        self.headlands
            .iter_mut()
            .flat_map(|h| h.sectors.iter_mut())
            .flat_map(|s| s.routes.iter_mut())
            .find(|r| r.slug == slug)
            .ok_or_else(|| CatalogError::not_found(EntityKind::Route, slug))
    }

    pub fn counts(&self) -> CatalogCounts {
        CatalogCounts {
            headlands: self.headlands.len(),
            sectors: self.sectors().count(),
            routes: self.routes().count(),
        }
    }

    pub fn navigation(&self) -> Vec<HeadlandNav> {
        self.headlands
            .iter()
            .map(|headland| HeadlandNav {
                slug: headland.slug.clone(),
                name: headland.name.clone(),
                sectors: headland
                    .sectors
                    .iter()
                    .map(|sector| SectorNav {
                        slug: sector.slug.clone(),
                        name: sector.name.clone(),
                        routes: sector.routes.len(),
                    })
                    .collect(),
            })
            .collect()
    }
}

/// Comments shared by every route view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentPool {
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl CommentPool {
    pub fn new(comments: Vec<Comment>) -> Self {
        Self { comments }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let pool: CommentPool = serde_json::from_slice(&bytes)?;
        log::debug!(
            "Loaded {} comments from {}",
            pool.comments.len(),
            path.display()
        );
        Ok(pool)
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    /// The comments shown on `route_slug`'s page, in pool order.
    pub fn for_route(&self, route_slug: &str) -> Vec<&Comment> {
        crag_insights::select_for_route(&self.comments, route_slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample;
    use pretty_assertions::assert_eq;

    #[test]
    fn route_lookup_returns_parents() {
        let catalog = sample();
        let found = catalog.route("midnight-lightning").unwrap();
        assert_eq!(found.headland.slug, "muizenberg");
        assert_eq!(found.sector.slug, "boyes-drive");
        assert!(catalog.route("nope").is_none());
    }

    #[test]
    fn require_reports_kind_and_slug() {
        let err = sample().require_sector("nope").unwrap_err();
        assert_eq!(err.to_string(), "Sector not found: nope");
        assert_eq!(err.code(), "not_found");
    }

    #[test]
    fn counts_and_navigation() {
        let catalog = sample();
        assert_eq!(
            catalog.counts(),
            CatalogCounts {
                headlands: 2,
                sectors: 3,
                routes: 3
            }
        );
        let nav = catalog.navigation();
        assert_eq!(nav[0].sectors[0].routes, 2);
        assert_eq!(nav[1].sectors[0].slug, "boyes-drive");
    }

    #[test]
    fn mutable_lookups_reach_nested_entities() {
        let mut catalog = sample();
        catalog.route_mut("the-nose").unwrap().stars = Some(3.0);
        assert_eq!(catalog.route("the-nose").unwrap().route.stars, Some(3.0));
        assert!(catalog.sector_mut("bluff").is_ok());
        assert!(catalog.headland_mut("nowhere").is_err());
    }

    #[test]
    fn comment_pool_selection_is_stable() {
        let comments: Vec<Comment> = (0..20)
            .map(|i| Comment {
                id: format!("c{i}"),
                user_id: format!("u{i}"),
                username: format!("user{i}"),
                user_image: None,
                content: format!("comment {i}"),
                created_at: "2025-01-01T00:00:00Z".into(),
                tags: vec![],
            })
            .collect();
        let pool = CommentPool::new(comments);

        let ids: Vec<&str> = pool
            .for_route("lekker-time")
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(ids, vec!["c2", "c10", "c11", "c15", "c19"]);
    }
}
