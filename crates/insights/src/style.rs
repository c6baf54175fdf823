use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::RouteRecord;

/// Canonical climbing discipline shown on sector cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Discipline {
    Trad,
    Sport,
    Solo,
}

impl Discipline {
    pub const ALL: [Discipline; 3] = [Discipline::Trad, Discipline::Sport, Discipline::Solo];

    pub const fn as_str(self) -> &'static str {
        match self {
            Discipline::Trad => "trad",
            Discipline::Sport => "sport",
            Discipline::Solo => "solo",
        }
    }
}

impl fmt::Display for Discipline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Discipline {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trad" => Ok(Discipline::Trad),
            "sport" => Ok(Discipline::Sport),
            "solo" => Ok(Discipline::Solo),
            other => Err(format!("unknown discipline: {other}")),
        }
    }
}

// Keys are cleaned labels (parentheses stripped, trimmed).
static INFO_TABLE: Lazy<HashMap<&'static str, Discipline>> = Lazy::new(|| {
    HashMap::from([
        ("1B&T", Discipline::Trad),
        ("2RB&T", Discipline::Trad),
        ("3RB&T", Discipline::Trad),
        ("4RB&T", Discipline::Trad),
        ("T&3RB", Discipline::Trad),
        ("T", Discipline::Trad),
        ("C only", Discipline::Trad),
        ("4B&C", Discipline::Sport),
        ("5B&C", Discipline::Sport),
        ("8B&C", Discipline::Sport),
        ("S", Discipline::Solo),
        ("Solo", Discipline::Solo),
        ("solo", Discipline::Solo),
    ])
});

/// Removes every `(` and `)` and trims surrounding whitespace.
pub fn clean_label(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '(' | ')'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Maps a raw info annotation to a discipline, `None` when the label is not
/// in the table.
pub fn canonicalize(raw: &str) -> Option<Discipline> {
    INFO_TABLE.get(clean_label(raw).as_str()).copied()
}

/// Distinct disciplines present in a sector, in first-seen order.
pub fn route_types<R, I>(routes: I) -> Vec<Discipline>
where
    R: RouteRecord,
    I: IntoIterator<Item = R>,
{
    let mut labels: Vec<String> = Vec::new();
    for route in routes {
        let Some(raw) = route.style_label() else {
            continue;
        };
        let cleaned = clean_label(raw);
        if !labels.contains(&cleaned) {
            labels.push(cleaned);
        }
    }

    let mut types = Vec::new();
    for discipline in labels.iter().filter_map(|label| canonicalize(label)) {
        if !types.contains(&discipline) {
            types.push(discipline);
        }
    }
    types
}
