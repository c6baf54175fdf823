//! Strict data-entry edits.
//!
//! Every operation validates its input first and leaves the catalogue
//! untouched on error.

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::{CatalogError, EntityKind, Result};
use crate::model::{Headland, Route, RouteStyle, Sector};
use crate::validate::{validate_name, validate_route, validate_slug};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadlandDraft {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorDraft {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Fields to change on an existing route. Absent fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub route_number: Option<u32>,
    #[serde(default, deserialize_with = "crate::model::deserialize_grade")]
    pub grade: Option<i32>,
    #[serde(default)]
    pub stars: Option<f32>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "first_ascent")]
    pub first_ascent: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub info: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub route_style: Option<RouteStyle>,
}

impl RoutePatch {
    fn apply(self, route: &mut Route) {
        if let Some(name) = self.name {
            route.name = name;
        }
        if let Some(number) = self.route_number {
            route.route_number = Some(number);
        }
        if let Some(grade) = self.grade {
            route.grade = Some(grade);
        }
        if let Some(stars) = self.stars {
            route.stars = Some(stars);
        }
        if let Some(description) = self.description {
            route.description = description;
        }
        if let Some(first_ascent) = self.first_ascent {
            route.first_ascent = Some(first_ascent);
        }
        if let Some(date) = self.date {
            route.date = Some(date);
        }
        if let Some(info) = self.info {
            route.info = Some(info);
            // A new label restyles the route unless the patch names a style.
            if self.route_style.is_none() {
                route.route_style = route.style_from_info();
            }
        }
        if let Some(tags) = self.tags {
            route.tags = tags;
        }
        if let Some(style) = self.route_style {
            route.route_style = Some(style);
        }
    }
}

impl Catalog {
    pub fn create_headland(&mut self, draft: HeadlandDraft) -> Result<&Headland> {
        validate_slug(&draft.slug)?;
        validate_name(&draft.name)?;
        if self.headland(&draft.slug).is_some() {
            return Err(CatalogError::duplicate(EntityKind::Headland, draft.slug));
        }

        log::info!("Creating headland {}", draft.slug);
        let index = self.headlands.len();
        self.headlands.push(Headland {
            slug: draft.slug,
            name: draft.name.trim().to_string(),
            description: draft.description,
            sectors: Vec::new(),
        });
        Ok(&self.headlands[index])
    }

    /// Renames a headland. An empty description leaves the stored one alone.
    pub fn update_headland(&mut self, slug: &str, draft: HeadlandDraft) -> Result<&Headland> {
        validate_slug(&draft.slug)?;
        validate_name(&draft.name)?;
        if draft.slug != slug && self.headland(&draft.slug).is_some() {
            return Err(CatalogError::duplicate(EntityKind::Headland, draft.slug));
        }

        let headland = self.headland_mut(slug)?;
        log::info!("Updating headland {slug}");
        headland.slug = draft.slug;
        headland.name = draft.name.trim().to_string();
        if !draft.description.is_empty() {
            headland.description = draft.description;
        }
        Ok(headland)
    }

    pub fn create_sector(&mut self, headland_slug: &str, draft: SectorDraft) -> Result<&Sector> {
        validate_slug(&draft.slug)?;
        validate_name(&draft.name)?;
        if self.sector(&draft.slug).is_some() {
            return Err(CatalogError::duplicate(EntityKind::Sector, draft.slug));
        }

        let headland = self.headland_mut(headland_slug)?;
        log::info!("Creating sector {} under {headland_slug}", draft.slug);
        let index = headland.sectors.len();
        headland.sectors.push(Sector {
            slug: draft.slug,
            name: draft.name.trim().to_string(),
            description: draft.description,
            routes: Vec::new(),
        });
        Ok(&headland.sectors[index])
    }

    /// Adds `route` to a sector, deriving its style from `info` when unset.
    pub fn create_route(&mut self, sector_slug: &str, mut route: Route) -> Result<&Route> {
        validate_route(&route)?;
        if self.route(&route.slug).is_some() {
            return Err(CatalogError::duplicate(EntityKind::Route, route.slug));
        }
        route.route_style = route.effective_style();

        let sector = self.sector_mut(sector_slug)?;
        log::info!("Creating route {} in {sector_slug}", route.slug);
        let index = sector.routes.len();
        sector.routes.push(route);
        Ok(&sector.routes[index])
    }

    pub fn update_route(&mut self, slug: &str, patch: RoutePatch) -> Result<&Route> {
        let current = self.route_mut(slug)?;
        let mut updated = current.clone();
        patch.apply(&mut updated);
        updated.route_style = updated.effective_style();
        validate_route(&updated)?;

        log::info!("Updating route {slug}");
        *current = updated;
        Ok(current)
    }

    /// Removes a route and hands it back.
    pub fn delete_route(&mut self, slug: &str) -> Result<Route> {
        for sector in self.headlands.iter_mut().flat_map(|h| h.sectors.iter_mut()) {
            if let Some(pos) = sector.routes.iter().position(|r| r.slug == slug) {
                log::info!("Deleting route {slug} from {}", sector.slug);
                return Ok(sector.routes.remove(pos));
            }
        }
        Err(CatalogError::not_found(EntityKind::Route, slug))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample;
    use pretty_assertions::assert_eq;

    fn headland(slug: &str, name: &str, description: &str) -> HeadlandDraft {
        HeadlandDraft {
            slug: slug.into(),
            name: name.into(),
            description: description.into(),
        }
    }

    #[test]
    fn creates_headland_and_sector() {
        let mut catalog = sample();
        catalog
            .create_headland(headland("kalk-bay", " Kalk Bay ", "Harbour crags"))
            .unwrap();
        let sector = catalog
            .create_sector(
                "kalk-bay",
                SectorDraft {
                    slug: "trappieskop".into(),
                    name: "Trappieskop".into(),
                    description: String::new(),
                },
            )
            .unwrap();
        assert_eq!(sector.slug, "trappieskop");

        let found = catalog.sector("trappieskop").unwrap();
        assert_eq!(found.headland.name, "Kalk Bay");
    }

    #[test]
    fn rejects_bad_slugs_and_duplicates() {
        let mut catalog = sample();
        let err = catalog
            .create_headland(headland("Kalk Bay", "Kalk Bay", ""))
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidSlug(_)));

        let err = catalog
            .create_headland(headland("cape-point", "Cape Point", ""))
            .unwrap_err();
        assert_eq!(err.code(), "conflict");

        let err = catalog
            .create_sector(
                "muizenberg",
                SectorDraft {
                    slug: "the-slabs".into(),
                    name: "Slabs again".into(),
                    description: String::new(),
                },
            )
            .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::DuplicateSlug {
                kind: EntityKind::Sector,
                ..
            }
        ));
        assert_eq!(catalog.counts().sectors, 3);
    }

    #[test]
    fn update_headland_keeps_description_when_blank() {
        let mut catalog = sample();
        catalog
            .update_headland("cape-point", headland("cape-point", "Cape Point", "Windy"))
            .unwrap();
        let updated = catalog
            .update_headland("cape-point", headland("cape-pt", "Cape Pt", ""))
            .unwrap();
        assert_eq!(updated.slug, "cape-pt");
        assert_eq!(updated.description, "Windy");
        assert!(catalog.headland("cape-point").is_none());

        let err = catalog
            .update_headland("cape-pt", headland("muizenberg", "Muizenberg", ""))
            .unwrap_err();
        assert_eq!(err.code(), "conflict");
    }

    #[test]
    fn create_route_derives_style() {
        let mut catalog = sample();
        let route = catalog
            .create_route(
                "bluff",
                Route::new("sea-breeze", "Sea Breeze")
                    .with_grade(17)
                    .with_info("(S)"),
            )
            .unwrap();
        assert_eq!(route.route_style, Some(RouteStyle::Solo));

        let err = catalog
            .create_route("bluff", Route::new("the-nose", "Another Nose"))
            .unwrap_err();
        assert_eq!(err.code(), "conflict");

        let err = catalog
            .create_route("nowhere", Route::new("fresh-line", "Fresh Line"))
            .unwrap_err();
        assert_eq!(err.code(), "not_found");
    }

    #[test]
    fn update_route_validates_before_writing() {
        let mut catalog = sample();
        let err = catalog
            .update_route(
                "the-nose",
                RoutePatch {
                    stars: Some(7.0),
                    ..RoutePatch::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidStars(_)));
        assert_eq!(catalog.route("the-nose").unwrap().route.stars, None);

        let route = catalog
            .update_route(
                "the-nose",
                RoutePatch {
                    grade: Some(27),
                    tags: Some(vec!["exposed".into()]),
                    ..RoutePatch::default()
                },
            )
            .unwrap();
        assert_eq!(route.grade, Some(27));
        assert_eq!(route.tags, vec!["exposed".to_string()]);
        assert_eq!(route.route_style, Some(RouteStyle::Sport));
    }

    #[test]
    fn new_info_label_restyles_route() {
        let mut catalog = crate::import_seed(
            r#"{"headlands": [{"slug": "cape-point", "name": "Cape Point", "sectors": [
                {"slug": "the-slabs", "name": "The Slabs", "routes": [
                    {"slug": "lekker-time", "name": "Lekker Time", "grade": 19, "info": "(T)"}
                ]}
            ]}]}"#,
        )
        .unwrap()
        .catalog;
        assert_eq!(
            catalog.route("lekker-time").unwrap().route.route_style,
            Some(RouteStyle::Trad)
        );

        let route = catalog
            .update_route(
                "lekker-time",
                RoutePatch {
                    info: Some("(S)".into()),
                    ..RoutePatch::default()
                },
            )
            .unwrap();
        assert_eq!(route.route_style, Some(RouteStyle::Solo));

        let route = catalog
            .update_route(
                "lekker-time",
                RoutePatch {
                    info: Some("5B&C".into()),
                    route_style: Some(RouteStyle::Trad),
                    ..RoutePatch::default()
                },
            )
            .unwrap();
        assert_eq!(route.route_style, Some(RouteStyle::Trad));
        assert_eq!(route.info.as_deref(), Some("5B&C"));
    }

    #[test]
    fn patch_reads_grades_like_routes() {
        let patch: RoutePatch = serde_json::from_str(r#"{"grade": "17"}"#).unwrap();
        assert_eq!(patch.grade, Some(17));

        let patch: RoutePatch = serde_json::from_str(r#"{"grade": null, "name": "X"}"#).unwrap();
        assert_eq!(patch.grade, None);
        assert_eq!(patch.name.as_deref(), Some("X"));

        let mut catalog = sample();
        let route = catalog.update_route("the-nose", patch_with_grade("24")).unwrap();
        assert_eq!(route.grade, Some(24));
    }

    fn patch_with_grade(grade: &str) -> RoutePatch {
        serde_json::from_value(serde_json::json!({ "grade": grade })).unwrap()
    }

    #[test]
    fn delete_route_returns_removed() {
        let mut catalog = sample();
        let removed = catalog.delete_route("lekker-time").unwrap();
        assert_eq!(removed.name, "Lekker Time");
        assert!(catalog.route("lekker-time").is_none());
        assert_eq!(catalog.delete_route("lekker-time").unwrap_err().code(), "not_found");
    }
}
