use crag_catalog::{Catalog, RouteRef};
use nucleo_matcher::pattern::{CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Matcher, Utf32String};
use serde::Serialize;

use crate::error::{Result, SearchError};

const DESCRIPTION_PREVIEW_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuzzyHit {
    pub slug: String,
    pub name: String,
    pub sector: String,
    pub headland: String,
    pub grade: Option<i32>,
    /// Best score relative to the top hit, in `0..=1`.
    pub score: f32,
}

/// Fuzzy route search using nucleo-matcher
pub struct FuzzySearch {
    matcher: Matcher,
}

impl FuzzySearch {
    pub fn new() -> Self {
        Self {
            matcher: Matcher::new(nucleo_matcher::Config::DEFAULT),
        }
    }

    /// Scores every route against its name, sector name and description.
    /// Returns at most `limit` hits, best first.
    pub fn search(&mut self, catalog: &Catalog, query: &str, limit: usize) -> Result<Vec<FuzzyHit>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        let pattern = Pattern::parse(query, CaseMatching::Smart, Normalization::Smart);

        let mut scored: Vec<(RouteRef<'_>, u32)> = catalog
            .routes()
            .filter_map(|entry| {
                let preview: String = entry
                    .route
                    .description
                    .chars()
                    .take(DESCRIPTION_PREVIEW_CHARS)
                    .collect();
                let best = [
                    entry.route.name.as_str(),
                    entry.sector.name.as_str(),
                    preview.as_str(),
                ]
                .into_iter()
                .filter_map(|text| self.score(&pattern, text))
                .max()?;
                Some((entry, best))
            })
            .collect();

        // Stable sort keeps catalogue order among equal scores.
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored.truncate(limit);

        // Normalize scores to 0-1 range (nucleo scores are u32)
        let max_score = scored.first().map_or(1.0, |(_, s)| *s as f32);

        Ok(scored
            .into_iter()
            .map(|(entry, score)| FuzzyHit {
                slug: entry.route.slug.clone(),
                name: entry.route.name.clone(),
                sector: entry.sector.name.clone(),
                headland: entry.headland.name.clone(),
                grade: entry.route.grade,
                score: if max_score > 0.0 {
                    score as f32 / max_score
                } else {
                    0.0
                },
            })
            .collect())
    }

    fn score(&mut self, pattern: &Pattern, text: &str) -> Option<u32> {
        if text.is_empty() {
            return None;
        }
        let haystack = Utf32String::from(text);
        pattern.score(haystack.slice(..), &mut self.matcher)
    }
}

impl Default for FuzzySearch {
    fn default() -> Self {
        Self::new()
    }
}
