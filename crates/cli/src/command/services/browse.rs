use anyhow::Result;
use crag_catalog::SectorSummary;
use crag_search::FuzzySearch;

use crate::command::domain::{
    CommentView, EntityLink, GradeRange, HeadlandsOutput, ListSectorsPayload, RoutePayload,
    RouteView, SearchOutput, SearchPayload, SectorOutput, SectorPayload, SectorsOutput,
    DEFAULT_SEARCH_LIMIT,
};
use crate::command::state::AppState;

pub(crate) fn list_headlands(state: &AppState) -> HeadlandsOutput {
    HeadlandsOutput {
        headlands: state.catalog.navigation(),
    }
}

pub(crate) fn list_sectors(state: &AppState, payload: ListSectorsPayload) -> Result<SectorsOutput> {
    let headland = payload.headland.as_deref();
    if let Some(slug) = headland {
        state.catalog.require_headland(slug)?;
    }
    Ok(SectorsOutput {
        sectors: state.catalog.sector_summaries(headland),
    })
}

/// Sector card plus its route table, narrowed by the payload filter.
pub(crate) fn sector(state: &AppState, payload: SectorPayload) -> Result<SectorOutput> {
    let found = state.catalog.require_sector(&payload.slug)?;
    let all = &found.sector.routes;

    let grades = all.iter().filter_map(|r| r.grade);
    let grade_range = grades
        .clone()
        .min()
        .zip(grades.max())
        .map(|(min, max)| GradeRange { min, max });

    let routes = all
        .iter()
        .filter(|route| {
            let style = route.effective_style();
            payload.filter.route_allowed(
                route.grade,
                style.map(|s| s.as_str()),
                &route.tags,
            )
        })
        .cloned()
        .collect();

    Ok(SectorOutput {
        summary: SectorSummary::from_ref(found),
        grade_range,
        filter: payload.filter,
        routes,
    })
}

pub(crate) fn route(state: &AppState, payload: RoutePayload) -> Result<RouteView> {
    let found = state.catalog.require_route(&payload.slug)?;
    let viewer = payload.viewer.as_deref().filter(|v| !v.trim().is_empty());

    let posted = state.posted_comments(&found.route.slug);
    let comments = posted
        .iter()
        .chain(state.comments.for_route(&found.route.slug))
        .map(|comment| CommentView {
            hidden_by_default: comment.is_beta(),
            comment: comment.clone(),
        })
        .collect();

    Ok(RouteView {
        headland: EntityLink {
            slug: found.headland.slug.clone(),
            name: found.headland.name.clone(),
        },
        sector: EntityLink {
            slug: found.sector.slug.clone(),
            name: found.sector.name.clone(),
        },
        route: found.route.clone(),
        comments,
        difficulty: state.difficulty_tally(&found.route.slug, viewer),
        tags: state.tag_tally(found.route, viewer),
    })
}

pub(crate) fn search(state: &AppState, payload: SearchPayload) -> Result<SearchOutput> {
    if payload.fuzzy {
        let limit = payload.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
        let ranked = FuzzySearch::new().search(&state.catalog, &payload.query, limit)?;
        return Ok(SearchOutput {
            query: payload.query,
            results: Default::default(),
            ranked,
        });
    }

    let mut results = crag_search::search(&state.catalog, &payload.query)?;
    if let Some(limit) = payload.limit {
        results.matched_sectors.truncate(limit);
        results.matched_routes.truncate(limit);
    }
    Ok(SearchOutput {
        query: payload.query,
        results,
        ranked: Vec::new(),
    })
}
