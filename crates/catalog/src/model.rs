use std::fmt;
use std::str::FromStr;

use crag_insights::{Discipline, RouteRecord};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Top-level geographic grouping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Headland {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sectors: Vec<Sector>,
}

/// A named climbing area within a headland.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sector {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub routes: Vec<Route>,
}

/// A single climbable line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub slug: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_number: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_grade")]
    pub grade: Option<i32>,
    #[serde(default)]
    pub stars: Option<f32>,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "first_ascent", alias = "firstAscent")]
    pub first_ascent: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub info: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, alias = "routeType", deserialize_with = "deserialize_style")]
    pub route_style: Option<RouteStyle>,
}

impl Route {
    pub fn new(slug: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
            route_number: None,
            grade: None,
            stars: None,
            description: String::new(),
            first_ascent: None,
            date: None,
            info: None,
            tags: Vec::new(),
            route_style: None,
        }
    }

    #[must_use]
    pub fn with_grade(mut self, grade: i32) -> Self {
        self.grade = Some(grade);
        self
    }

    #[must_use]
    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = Some(info.into());
        self
    }

    #[must_use]
    pub fn with_route_number(mut self, number: u32) -> Self {
        self.route_number = Some(number);
        self
    }

    /// Style recorded on the route, or the one implied by its info label.
    pub fn effective_style(&self) -> Option<RouteStyle> {
        self.route_style.or_else(|| self.style_from_info())
    }

    /// Style implied by the info label alone.
    pub fn style_from_info(&self) -> Option<RouteStyle> {
        self.info
            .as_deref()
            .and_then(crag_insights::canonicalize)
            .map(RouteStyle::from)
    }
}

impl RouteRecord for Route {
    fn grade(&self) -> Option<i32> {
        self.grade
    }

    fn style_label(&self) -> Option<&str> {
        self.info.as_deref()
    }
}

/// Stored route style. A superset of the disciplines shown on sector cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteStyle {
    Trad,
    Sport,
    Solo,
    Bouldering,
    Mixed,
    Aid,
}

impl RouteStyle {
    pub const fn as_str(self) -> &'static str {
        match self {
            RouteStyle::Trad => "trad",
            RouteStyle::Sport => "sport",
            RouteStyle::Solo => "solo",
            RouteStyle::Bouldering => "bouldering",
            RouteStyle::Mixed => "mixed",
            RouteStyle::Aid => "aid",
        }
    }
}

impl fmt::Display for RouteStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RouteStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trad" => Ok(RouteStyle::Trad),
            "sport" => Ok(RouteStyle::Sport),
            "solo" => Ok(RouteStyle::Solo),
            "bouldering" => Ok(RouteStyle::Bouldering),
            "mixed" => Ok(RouteStyle::Mixed),
            "aid" => Ok(RouteStyle::Aid),
            other => Err(format!("unknown route style: {other}")),
        }
    }
}

impl From<Discipline> for RouteStyle {
    fn from(value: Discipline) -> Self {
        match value {
            Discipline::Trad => RouteStyle::Trad,
            Discipline::Sport => RouteStyle::Sport,
            Discipline::Solo => RouteStyle::Solo,
        }
    }
}

/// Label attached to a comment by its author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentTag {
    Beta,
    Update,
    Warning,
    Question,
    Gear,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub user_id: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_image: Option<String>,
    pub content: String,
    pub created_at: String,
    #[serde(default)]
    pub tags: Vec<CommentTag>,
}

impl Comment {
    /// Beta comments are spoilers and start collapsed.
    pub fn is_beta(&self) -> bool {
        self.tags.contains(&CommentTag::Beta)
    }
}

/// Leading-integer parse: `"18"` and `"18a"` give 18, `"?"` gives `None`.
pub fn parse_grade(raw: &str) -> Option<i32> {
    let trimmed = raw.trim_start();
    let (sign, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1i64, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let magnitude: i64 = digits[..end].parse().ok()?;
    i32::try_from(sign * magnitude).ok()
}

/// Grade from a raw JSON value; non-integral numbers and junk are absent.
pub fn grade_from_value(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => {
            if let Some(n) = n.as_i64() {
                return i32::try_from(n).ok();
            }
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() <= f64::from(i32::MAX))
                .map(|f| f as i32)
        }
        Value::String(s) => parse_grade(s),
        _ => None,
    }
}

pub(crate) fn deserialize_grade<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(grade_from_value))
}

fn deserialize_style<'de, D>(deserializer: D) -> Result<Option<RouteStyle>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_grades_like_leading_integers() {
        assert_eq!(parse_grade("18"), Some(18));
        assert_eq!(parse_grade(" 21a"), Some(21));
        assert_eq!(parse_grade("-3"), Some(-3));
        assert_eq!(parse_grade("?"), None);
        assert_eq!(parse_grade(""), None);
        assert_eq!(parse_grade("99999999999"), None);
    }

    #[test]
    fn grade_values_from_json() {
        assert_eq!(grade_from_value(&json!(17)), Some(17));
        assert_eq!(grade_from_value(&json!(17.0)), Some(17));
        assert_eq!(grade_from_value(&json!(17.5)), None);
        assert_eq!(grade_from_value(&json!("24")), Some(24));
        assert_eq!(grade_from_value(&json!(null)), None);
        assert_eq!(grade_from_value(&json!([1])), None);
    }

    #[test]
    fn route_reads_seed_shape() {
        let route: Route = serde_json::from_value(json!({
            "slug": "lekker-time",
            "name": "Lekker Time",
            "routeNumber": 4,
            "grade": "19",
            "stars": 2.0,
            "description": "Corner crack",
            "first_ascent": "A. Climber",
            "date": "1987-03-01",
            "info": "(T)",
            "tags": ["crimpy"],
            "routeStyle": "unknown"
        }))
        .unwrap();

        assert_eq!(route.grade, Some(19));
        assert_eq!(route.route_number, Some(4));
        assert_eq!(route.first_ascent.as_deref(), Some("A. Climber"));
        assert_eq!(route.route_style, None);
        assert_eq!(route.effective_style(), Some(RouteStyle::Trad));
    }

    #[test]
    fn route_tolerates_missing_optionals() {
        let route: Route =
            serde_json::from_value(json!({"slug": "x-1", "name": "X", "grade": null})).unwrap();
        assert_eq!(route.grade, None);
        assert!(route.tags.is_empty());
        assert_eq!(route.effective_style(), None);
    }

    #[test]
    fn comment_flags_beta() {
        let comment: Comment = serde_json::from_value(json!({
            "id": "c1",
            "userId": "u1",
            "username": "ana",
            "content": "Step left at the roof",
            "createdAt": "2025-02-26T10:00:00Z",
            "tags": ["beta", "gear"]
        }))
        .unwrap();
        assert!(comment.is_beta());
        assert_eq!(comment.user_image, None);
    }
}
