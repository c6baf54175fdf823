use anyhow::Result;
use crag_catalog::{Catalog, Headland, HeadlandDraft, Route, Sector};

use crate::command::domain::{
    CreateRoutePayload, CreateSectorPayload, DeleteRoutePayload, DeletedOutput,
    UpdateHeadlandPayload, UpdateRoutePayload,
};

pub(crate) fn create_headland(catalog: &mut Catalog, draft: HeadlandDraft) -> Result<Headland> {
    Ok(catalog.create_headland(draft)?.clone())
}

pub(crate) fn update_headland(catalog: &mut Catalog, payload: UpdateHeadlandPayload) -> Result<Headland> {
    Ok(catalog
        .update_headland(&payload.slug, payload.headland)?
        .clone())
}

pub(crate) fn create_sector(catalog: &mut Catalog, payload: CreateSectorPayload) -> Result<Sector> {
    Ok(catalog
        .create_sector(&payload.headland, payload.sector)?
        .clone())
}

pub(crate) fn create_route(catalog: &mut Catalog, payload: CreateRoutePayload) -> Result<Route> {
    Ok(catalog.create_route(&payload.sector, payload.route)?.clone())
}

pub(crate) fn update_route(catalog: &mut Catalog, payload: UpdateRoutePayload) -> Result<Route> {
    Ok(catalog.update_route(&payload.slug, payload.patch)?.clone())
}

pub(crate) fn delete_route(catalog: &mut Catalog, payload: DeleteRoutePayload) -> Result<DeletedOutput> {
    Ok(DeletedOutput {
        deleted: catalog.delete_route(&payload.slug)?,
    })
}
