use crag_catalog::Catalog;
use serde::Serialize;

use crate::error::{Result, SearchError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectorHit {
    pub slug: String,
    pub name: String,
    pub description: String,
    pub headland: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteHit {
    pub slug: String,
    pub name: String,
    pub grade: Option<i32>,
    pub description: String,
    pub sector: String,
    pub sector_slug: String,
    pub headland: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    pub matched_sectors: Vec<SectorHit>,
    pub matched_routes: Vec<RouteHit>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.matched_sectors.is_empty() && self.matched_routes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.matched_sectors.len() + self.matched_routes.len()
    }
}

/// Case-insensitive substring match on sector and route names, in catalogue order.
pub fn search(catalog: &Catalog, query: &str) -> Result<SearchResults> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Err(SearchError::EmptyQuery);
    }

    let mut results = SearchResults::default();
    for entry in catalog.sectors() {
        let (headland, sector) = (entry.headland, entry.sector);
        if sector.name.to_lowercase().contains(&needle) {
            results.matched_sectors.push(SectorHit {
                slug: sector.slug.clone(),
                name: sector.name.clone(),
                description: sector.description.clone(),
                headland: headland.name.clone(),
            });
        }

        results.matched_routes.extend(
            sector
                .routes
                .iter()
                .filter(|route| route.name.to_lowercase().contains(&needle))
                .map(|route| RouteHit {
                    slug: route.slug.clone(),
                    name: route.name.clone(),
                    grade: route.grade,
                    description: route.description.clone(),
                    sector: sector.name.clone(),
                    sector_slug: sector.slug.clone(),
                    headland: headland.name.clone(),
                }),
        );
    }

    log::debug!(
        "search '{needle}': {} sectors, {} routes",
        results.matched_sectors.len(),
        results.matched_routes.len()
    );
    Ok(results)
}
