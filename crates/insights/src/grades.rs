use serde::Serialize;

use crate::RouteRecord;

/// Difficulty band of a route grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeBand {
    Easy,
    Medium,
    Hard,
    VeryHard,
}

impl GradeBand {
    /// Bands in ascending boundary order.
    pub const ALL: [GradeBand; 4] = [
        GradeBand::Easy,
        GradeBand::Medium,
        GradeBand::Hard,
        GradeBand::VeryHard,
    ];

    /// Bands are contiguous: `..=16`, `17..=24`, `25..=32`, `33..`.
    ///
    /// Grades below zero do not occur in the data; they land in `Easy`.
    pub const fn classify(grade: i32) -> Self {
        match grade {
            i32::MIN..=16 => GradeBand::Easy,
            17..=24 => GradeBand::Medium,
            25..=32 => GradeBand::Hard,
            _ => GradeBand::VeryHard,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            GradeBand::Easy => "Easy (0-16)",
            GradeBand::Medium => "Medium (17-24)",
            GradeBand::Hard => "Hard (25-32)",
            GradeBand::VeryHard => "Very Hard (33+)",
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            GradeBand::Easy => "#4CAF50",
            GradeBand::Medium => "#2196F3",
            GradeBand::Hard => "#F44336",
            GradeBand::VeryHard => "#212121",
        }
    }

    const fn slot(self) -> usize {
        match self {
            GradeBand::Easy => 0,
            GradeBand::Medium => 1,
            GradeBand::Hard => 2,
            GradeBand::VeryHard => 3,
        }
    }
}

/// One rendered histogram column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GradeBucket {
    pub band: GradeBand,
    pub label: &'static str,
    pub color: &'static str,
    pub count: usize,
}

/// Route counts per [`GradeBand`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GradeHistogram {
    counts: [usize; 4],
}

impl GradeHistogram {
    pub fn record(&mut self, grade: i32) {
        self.counts[GradeBand::classify(grade).slot()] += 1;
    }

    pub const fn count(&self, band: GradeBand) -> usize {
        self.counts[band.slot()]
    }

    /// Number of graded routes seen.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn buckets(&self) -> Vec<GradeBucket> {
        GradeBand::ALL
            .into_iter()
            .map(|band| GradeBucket {
                band,
                label: band.label(),
                color: band.color(),
                count: self.count(band),
            })
            .collect()
    }
}

/// Counts routes into grade bands; ungraded routes are skipped.
pub fn grade_histogram<R, I>(routes: I) -> GradeHistogram
where
    R: RouteRecord,
    I: IntoIterator<Item = R>,
{
    let mut histogram = GradeHistogram::default();
    for grade in routes.into_iter().filter_map(|route| route.grade()) {
        histogram.record(grade);
    }
    histogram
}
