//! Lenient migration of the static seed document into a [`Catalog`].
//!
//! Bad records are skipped and reported instead of failing the whole run; only
//! a document without a `headlands` array is rejected outright.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::catalog::Catalog;
use crate::error::{CatalogError, EntityKind, Result};
use crate::model::{Headland, Route, Sector};
use crate::validate::{validate_name, validate_route, validate_slug};

/// One record that did not make it into the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportIssue {
    pub kind: EntityKind,
    pub slug: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportStats {
    pub headlands: usize,
    pub sectors: usize,
    pub routes: usize,
    /// Routes whose style was derived from their `info` label.
    pub styled_routes: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone)]
pub struct ImportReport {
    pub catalog: Catalog,
    pub issues: Vec<ImportIssue>,
    pub stats: ImportStats,
}

impl ImportReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

pub fn import_seed(json: &str) -> Result<ImportReport> {
    let document: Value = serde_json::from_str(json)?;
    let headlands = document
        .get("headlands")
        .and_then(Value::as_array)
        .ok_or_else(|| CatalogError::MalformedSeed("missing `headlands` array".into()))?;

    let mut importer = Importer::default();
    let catalog = Catalog::new(
        headlands
            .iter()
            .filter_map(|raw| importer.headland(raw))
            .collect(),
    );

    let report = ImportReport {
        catalog,
        issues: importer.issues,
        stats: importer.stats,
    };
    log::info!(
        "Imported {} headlands, {} sectors, {} routes ({} skipped)",
        report.stats.headlands,
        report.stats.sectors,
        report.stats.routes,
        report.stats.skipped
    );
    Ok(report)
}

#[derive(Default)]
struct Importer {
    headland_slugs: HashSet<String>,
    sector_slugs: HashSet<String>,
    route_slugs: HashSet<String>,
    issues: Vec<ImportIssue>,
    stats: ImportStats,
}

impl Importer {
    fn skip(&mut self, kind: EntityKind, slug: &str, message: impl Into<String>) {
        let message = message.into();
        log::warn!("Skipping {kind} '{slug}': {message}");
        self.stats.skipped += 1;
        self.issues.push(ImportIssue {
            kind,
            slug: slug.to_string(),
            message,
        });
    }

    /// Slug and name shared by headlands and sectors.
    fn identity(&mut self, kind: EntityKind, raw: &Value) -> Option<(String, String, String)> {
        let Some(fields) = raw.as_object() else {
            self.skip(kind, "", "record is not an object");
            return None;
        };
        let slug = string_field(fields, "slug");
        let name = string_field(fields, "name");

        if let Err(err) = validate_slug(&slug).and_then(|()| validate_name(&name)) {
            self.skip(kind, &slug, err.to_string());
            return None;
        }

        let seen = match kind {
            EntityKind::Headland => &mut self.headland_slugs,
            EntityKind::Sector => &mut self.sector_slugs,
            EntityKind::Route => &mut self.route_slugs,
        };
        if !seen.insert(slug.clone()) {
            self.skip(kind, &slug, "duplicate slug; keeping the first");
            return None;
        }

        Some((slug, name, string_field(fields, "description")))
    }

    fn headland(&mut self, raw: &Value) -> Option<Headland> {
        let (slug, name, description) = self.identity(EntityKind::Headland, raw)?;
        let sectors = children(raw, "sectors")
            .iter()
            .filter_map(|sector| self.sector(sector))
            .collect();
        self.stats.headlands += 1;
        Some(Headland {
            slug,
            name,
            description,
            sectors,
        })
    }

    fn sector(&mut self, raw: &Value) -> Option<Sector> {
        let (slug, name, description) = self.identity(EntityKind::Sector, raw)?;
        let routes = children(raw, "routes")
            .iter()
            .filter_map(|route| self.route(route))
            .collect();
        self.stats.sectors += 1;
        Some(Sector {
            slug,
            name,
            description,
            routes,
        })
    }

    fn route(&mut self, raw: &Value) -> Option<Route> {
        let slug = raw
            .get("slug")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let mut route: Route = match serde_json::from_value(raw.clone()) {
            Ok(route) => route,
            Err(err) => {
                self.skip(EntityKind::Route, &slug, err.to_string());
                return None;
            }
        };
        if let Err(err) = validate_route(&route) {
            self.skip(EntityKind::Route, &slug, err.to_string());
            return None;
        }
        if !self.route_slugs.insert(route.slug.clone()) {
            self.skip(EntityKind::Route, &slug, "duplicate slug; keeping the first");
            return None;
        }

        if route.route_style.is_none() {
            route.route_style = route.effective_style();
            if route.route_style.is_some() {
                self.stats.styled_routes += 1;
            }
        }
        self.stats.routes += 1;
        Some(route)
    }
}

fn string_field(fields: &Map<String, Value>, key: &str) -> String {
    fields
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn children<'a>(raw: &'a Value, key: &str) -> &'a [Value] {
    raw.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RouteStyle;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn seed() -> String {
        json!({
            "headlands": [
                {
                    "slug": "cape-point",
                    "name": "Cape Point",
                    "description": "Southern tip",
                    "sectors": [
                        {
                            "slug": "the-slabs",
                            "name": "The Slabs",
                            "routes": [
                                {"slug": "lekker-time", "name": "Lekker Time", "grade": "19", "info": "(T)"},
                                {"slug": "the-nose", "name": "The Nose", "grade": 26, "info": "4RB&T, A0"},
                                {"slug": "lekker-time", "name": "Lekker Time again", "grade": 20},
                                {"slug": "Bad Slug", "name": "Bad"},
                                {"slug": "sky-high", "name": "Sky High", "stars": 9}
                            ]
                        },
                        {"slug": "x", "name": "Too short"}
                    ]
                },
                {"slug": "cape-point", "name": "Duplicate", "sectors": []}
            ]
        })
        .to_string()
    }

    #[test]
    fn keeps_valid_records_and_reports_the_rest() {
        let report = import_seed(&seed()).unwrap();

        assert_eq!(
            report.stats,
            ImportStats {
                headlands: 1,
                sectors: 1,
                routes: 2,
                styled_routes: 1,
                skipped: 5,
            }
        );
        let skipped: Vec<(EntityKind, &str)> = report
            .issues
            .iter()
            .map(|i| (i.kind, i.slug.as_str()))
            .collect();
        assert_eq!(
            skipped,
            vec![
                (EntityKind::Route, "lekker-time"),
                (EntityKind::Route, "Bad Slug"),
                (EntityKind::Route, "sky-high"),
                (EntityKind::Sector, "x"),
                (EntityKind::Headland, "cape-point"),
            ]
        );
        assert!(!report.is_clean());
    }

    #[test]
    fn first_duplicate_wins_and_styles_are_derived() {
        let report = import_seed(&seed()).unwrap();
        let first = report.catalog.route("lekker-time").unwrap().route;
        assert_eq!(first.name, "Lekker Time");
        assert_eq!(first.grade, Some(19));
        assert_eq!(first.route_style, Some(RouteStyle::Trad));

        let nose = report.catalog.route("the-nose").unwrap().route;
        assert_eq!(nose.route_style, None);
        assert_eq!(report.catalog.headlands[0].name, "Cape Point");
    }

    #[test]
    fn missing_headlands_is_malformed() {
        let err = import_seed(r#"{"sectors": []}"#).unwrap_err();
        assert!(matches!(err, CatalogError::MalformedSeed(_)));

        let err = import_seed("not json").unwrap_err();
        assert_eq!(err.code(), "malformed_data");
    }

    #[test]
    fn saved_catalogue_reimports_cleanly() {
        let report = import_seed(&seed()).unwrap();
        let saved = serde_json::to_string(&report.catalog).unwrap();
        let again = import_seed(&saved).unwrap();
        assert!(again.is_clean());
        assert_eq!(again.catalog, report.catalog);
    }
}
