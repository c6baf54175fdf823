use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Narrowing applied to a sector's route table.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq, JsonSchema)]
pub struct RouteFilter {
    #[serde(default)]
    pub min_grade: Option<i32>,
    #[serde(default)]
    pub max_grade: Option<i32>,
    #[serde(default)]
    pub styles: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl RouteFilter {
    pub fn is_active(&self) -> bool {
        self.min_grade.is_some()
            || self.max_grade.is_some()
            || self.styles.iter().any(|s| !normalize_label(s).is_empty())
            || self.tags.iter().any(|t| !normalize_label(t).is_empty())
    }

    /// Checks one route's attributes against the filter.
    ///
    /// A grade bound excludes ungraded routes. Style and tag lists match when
    /// any listed value matches; blank entries are ignored.
    pub fn route_allowed(&self, grade: Option<i32>, style: Option<&str>, tags: &[String]) -> bool {
        if self.min_grade.is_some() || self.max_grade.is_some() {
            let Some(grade) = grade else {
                return false;
            };
            if self.min_grade.is_some_and(|min| grade < min) {
                return false;
            }
            if self.max_grade.is_some_and(|max| grade > max) {
                return false;
            }
        }

        let styles: Vec<String> = self
            .styles
            .iter()
            .map(|s| normalize_label(s))
            .filter(|s| !s.is_empty())
            .collect();
        if !styles.is_empty() {
            let Some(style) = style.map(normalize_label) else {
                return false;
            };
            if !styles.iter().any(|s| *s == style) {
                return false;
            }
        }

        let wanted: Vec<String> = self
            .tags
            .iter()
            .map(|t| normalize_label(t))
            .filter(|t| !t.is_empty())
            .collect();
        if !wanted.is_empty() {
            let has_tag = tags
                .iter()
                .map(|t| normalize_label(t))
                .any(|t| wanted.contains(&t));
            if !has_tag {
                return false;
            }
        }

        true
    }
}

fn normalize_label(raw: &str) -> String {
    raw.trim().to_lowercase()
}
