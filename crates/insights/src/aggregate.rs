use serde::Serialize;

use crate::grades::{grade_histogram, GradeBucket};
use crate::style::{route_types, Discipline};
use crate::RouteRecord;

/// Everything a sector card needs from the sector's routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectorAggregate {
    pub grade_buckets: Vec<GradeBucket>,
    pub route_types: Vec<Discipline>,
    pub graded_routes: usize,
    pub total_routes: usize,
}

pub fn aggregate<R: RouteRecord>(routes: &[R]) -> SectorAggregate {
    let histogram = grade_histogram(routes);
    SectorAggregate {
        grade_buckets: histogram.buckets(),
        route_types: route_types(routes),
        graded_routes: histogram.total(),
        total_routes: routes.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Row {
        grade: Option<i32>,
        info: Option<&'static str>,
    }

    impl RouteRecord for Row {
        fn grade(&self) -> Option<i32> {
            self.grade
        }

        fn style_label(&self) -> Option<&str> {
            self.info
        }
    }

    #[test]
    fn aggregates_grades_and_styles_together() {
        let routes = vec![
            Row { grade: Some(12), info: Some("(T)") },
            Row { grade: Some(21), info: Some("5B&C") },
            Row { grade: None, info: Some("(Solo)") },
            Row { grade: Some(34), info: None },
        ];

        let summary = aggregate(&routes);
        assert_eq!(
            summary.grade_buckets.iter().map(|b| b.count).collect::<Vec<_>>(),
            vec![1, 1, 0, 1]
        );
        assert_eq!(
            summary.route_types,
            vec![Discipline::Trad, Discipline::Sport, Discipline::Solo]
        );
        assert_eq!(summary.graded_routes, 3);
        assert_eq!(summary.total_routes, 4);
    }

    #[test]
    fn empty_sector() {
        let summary = aggregate::<Row>(&[]);
        assert!(summary.grade_buckets.iter().all(|b| b.count == 0));
        assert_eq!(summary.grade_buckets.len(), 4);
        assert!(summary.route_types.is_empty());
        assert_eq!(summary.total_routes, 0);
    }
}
