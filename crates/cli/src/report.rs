//! Plain-text rendering for the human-facing subcommands.

use crag_catalog::{ImportReport, SectorSummary};
use std::fmt::Write as _;
use std::path::Path;

use crate::command::domain::{
    HeadlandsOutput, RouteView, SearchOutput, SectorOutput, SectorsOutput,
};

pub fn render_headlands(out: &HeadlandsOutput) -> String {
    let mut text = String::new();
    for headland in &out.headlands {
        let _ = writeln!(text, "{} ({})", headland.name, headland.slug);
        for sector in &headland.sectors {
            let _ = writeln!(
                text,
                "  {} ({}) - {} routes",
                sector.name, sector.slug, sector.routes
            );
        }
    }
    if text.is_empty() {
        return "Catalogue is empty.".to_string();
    }
    text.trim_end().to_string()
}

pub fn render_sectors(out: &SectorsOutput) -> String {
    if out.sectors.is_empty() {
        return "No sectors.".to_string();
    }
    let mut text = String::new();
    for sector in &out.sectors {
        text.push_str(&sector_card(sector));
        text.push('\n');
    }
    text.trim_end().to_string()
}

fn sector_card(sector: &SectorSummary) -> String {
    let mut card = String::new();
    let _ = writeln!(
        card,
        "{} ({}) - {}",
        sector.name, sector.slug, sector.headland
    );
    if !sector.description.is_empty() {
        let _ = writeln!(card, "  {}", truncate_one_line(&sector.description, 100));
    }
    let bands = sector
        .grade_buckets
        .iter()
        .map(|bucket| format!("{}: {}", bucket.label, bucket.count))
        .collect::<Vec<_>>()
        .join(", ");
    let _ = writeln!(card, "  Grades: {bands}");

    let types = if sector.route_types.is_empty() {
        "-".to_string()
    } else {
        sector
            .route_types
            .iter()
            .map(|d| d.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    let _ = writeln!(card, "  Types: {types} | {} routes", sector.total_routes);
    card
}

pub fn render_sector(out: &SectorOutput) -> String {
    let mut text = sector_card(&out.summary);
    if let Some(range) = &out.grade_range {
        let _ = writeln!(text, "  Grade range: {}-{}", range.min, range.max);
    }
    text.push('\n');

    if out.routes.is_empty() {
        text.push_str("No routes match.");
        return text;
    }

    text.push_str("  #  grade  style  stars  name\n");
    for route in &out.routes {
        let number = route
            .route_number
            .map_or_else(|| "-".to_string(), |n| n.to_string());
        let grade = route.grade.map_or_else(|| "?".to_string(), |g| g.to_string());
        let style = route.effective_style().map_or("-", |s| s.as_str());
        let stars = route
            .stars
            .map_or_else(|| "-".to_string(), |s| format!("{s:.1}"));
        let _ = writeln!(
            text,
            "{number:>3}  {grade:>5}  {style:<5}  {stars:>5}  {} ({})",
            route.name, route.slug
        );
    }
    text.trim_end().to_string()
}

/// Beta comments are collapsed unless `show_beta` is set.
pub fn render_route(view: &RouteView, show_beta: bool) -> String {
    let route = &view.route;
    let mut text = String::new();
    let _ = writeln!(
        text,
        "{} ({}) - {} / {}",
        route.name, route.slug, view.headland.name, view.sector.name
    );
    let grade = route.grade.map_or_else(|| "?".to_string(), |g| g.to_string());
    let style = route.effective_style().map_or("-", |s| s.as_str());
    let _ = writeln!(text, "Grade {grade} | {style}");
    if let Some(fa) = route.first_ascent.as_deref().filter(|s| !s.is_empty()) {
        match route.date.as_deref().filter(|s| !s.is_empty()) {
            Some(date) => {
                let _ = writeln!(text, "FA: {fa} ({date})");
            }
            None => {
                let _ = writeln!(text, "FA: {fa}");
            }
        }
    }
    if !route.description.is_empty() {
        let _ = writeln!(text, "\n{}", route.description.trim());
    }

    let difficulty = &view.difficulty;
    text.push('\n');
    match difficulty.consensus {
        Some(vote) => {
            let _ = writeln!(
                text,
                "Difficulty: {} ({} votes)",
                vote.as_str(),
                difficulty.total_votes
            );
        }
        None => text.push_str("Difficulty: no votes yet\n"),
    }

    if !view.tags.is_empty() {
        let tags = view
            .tags
            .iter()
            .map(|t| format!("{} ({})", t.name, t.votes))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(text, "Tags: {tags}");
    }

    if view.comments.is_empty() {
        text.push_str("\nNo comments.");
        return text;
    }
    let _ = writeln!(text, "\nComments ({}):", view.comments.len());
    for entry in &view.comments {
        let comment = &entry.comment;
        if entry.hidden_by_default && !show_beta {
            let _ = writeln!(text, "- {}: [beta hidden]", comment.username);
        } else {
            let _ = writeln!(
                text,
                "- {}: {}",
                comment.username,
                truncate_one_line(&comment.content, 160)
            );
        }
    }
    text.trim_end().to_string()
}

pub fn render_search(out: &SearchOutput) -> String {
    let mut text = String::new();
    if !out.ranked.is_empty() {
        for (i, hit) in out.ranked.iter().enumerate() {
            let grade = hit.grade.map_or_else(|| "?".to_string(), |g| g.to_string());
            let _ = writeln!(
                text,
                "{}. {} ({}) grade {grade} - {} / {} (score: {:.3})",
                i + 1,
                hit.name,
                hit.slug,
                hit.headland,
                hit.sector,
                hit.score
            );
        }
        return text.trim_end().to_string();
    }

    if out.results.is_empty() {
        return format!("No matches for \"{}\".", out.query);
    }
    if !out.results.matched_sectors.is_empty() {
        let _ = writeln!(text, "Sectors:");
        for hit in &out.results.matched_sectors {
            let _ = writeln!(text, "  {} ({}) - {}", hit.name, hit.slug, hit.headland);
        }
    }
    if !out.results.matched_routes.is_empty() {
        let _ = writeln!(text, "Routes:");
        for hit in &out.results.matched_routes {
            let grade = hit.grade.map_or_else(|| "?".to_string(), |g| g.to_string());
            let _ = writeln!(
                text,
                "  {} ({}) grade {grade} - {} / {}",
                hit.name, hit.slug, hit.headland, hit.sector
            );
        }
    }
    text.trim_end().to_string()
}

pub fn render_import(report: &ImportReport, out: &Path) -> String {
    let stats = &report.stats;
    let mut text = format!(
        "Imported {} headlands, {} sectors, {} routes ({} with a style) into {}\n",
        stats.headlands,
        stats.sectors,
        stats.routes,
        stats.styled_routes,
        out.display()
    );
    if !report.issues.is_empty() {
        let _ = writeln!(text, "Skipped {} record(s):", stats.skipped);
        for issue in &report.issues {
            let _ = writeln!(text, "  {} {}: {}", issue.kind, issue.slug, issue.message);
        }
    }
    text.trim_end().to_string()
}

fn truncate_one_line(text: &str, max_chars: usize) -> String {
    let s = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if s.chars().count() <= max_chars {
        return s;
    }
    let truncated: String = s.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{truncated}…")
}
