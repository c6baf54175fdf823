use crag_insights::{aggregate, Discipline, GradeBucket};
use serde::Serialize;

use crate::catalog::{Catalog, SectorRef};

/// A sector card: identity plus the aggregated grade and style picture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectorSummary {
    pub headland: String,
    pub headland_slug: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub grade_buckets: Vec<GradeBucket>,
    pub route_types: Vec<Discipline>,
    pub total_routes: usize,
}

impl SectorSummary {
    pub fn from_ref(sector: SectorRef<'_>) -> Self {
        let SectorRef { headland, sector } = sector;
        let stats = aggregate(&sector.routes);
        Self {
            headland: headland.name.clone(),
            headland_slug: headland.slug.clone(),
            name: sector.name.clone(),
            slug: sector.slug.clone(),
            description: sector.description.clone(),
            grade_buckets: stats.grade_buckets,
            route_types: stats.route_types,
            total_routes: stats.total_routes,
        }
    }
}

impl Catalog {
    /// One summary per sector in catalogue order, optionally for one headland.
    pub fn sector_summaries(&self, headland: Option<&str>) -> Vec<SectorSummary> {
        self.sectors()
            .filter(|s| headland.map_or(true, |slug| s.headland.slug == slug))
            .map(SectorSummary::from_ref)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample;
    use pretty_assertions::assert_eq;

    #[test]
    fn summarises_every_sector_in_order() {
        let summaries = sample().sector_summaries(None);
        let slugs: Vec<&str> = summaries.iter().map(|s| s.slug.as_str()).collect();
        assert_eq!(slugs, vec!["the-slabs", "bluff", "boyes-drive"]);

        let slabs = &summaries[0];
        assert_eq!(slabs.headland, "Cape Point");
        assert_eq!(
            slabs.grade_buckets.iter().map(|b| b.count).collect::<Vec<_>>(),
            vec![0, 1, 1, 0]
        );
        assert_eq!(slabs.route_types, vec![Discipline::Trad, Discipline::Sport]);
        assert_eq!(slabs.total_routes, 2);

        assert_eq!(summaries[2].total_routes, 1);
        assert!(summaries[2].grade_buckets.iter().all(|b| b.count == 0));
    }

    #[test]
    fn filters_by_headland() {
        let summaries = sample().sector_summaries(Some("muizenberg"));
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].headland_slug, "muizenberg");
        assert!(sample().sector_summaries(Some("nowhere")).is_empty());
    }
}
