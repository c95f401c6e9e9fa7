use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::dto::links::PlatformLinkDto;
use crate::application::ports::link_document_store::DocumentData;
use crate::application::use_cases::links::LinkError;
use crate::application::use_cases::links::delete_link::DeleteLink;
use crate::application::use_cases::links::get_link::GetLink;
use crate::application::use_cases::links::list_links::ListLinks;
use crate::application::use_cases::links::update_link::UpdateLink;
use crate::application::use_cases::links::upsert_link::{UpsertLink, UpsertOutcome};
use crate::bootstrap::app_context::AppContext;

type HttpError = (StatusCode, String);

/// Shape of the stored document. Extra top-level fields are returned as-is.
#[derive(Serialize, ToSchema)]
pub struct LinkDocumentBody {
    pub social_media_links: HashMap<String, String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LinkRequest {
    pub platform: String,
    pub link: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlatformLink {
    pub platform: String,
    #[schema(value_type = String)]
    pub link: serde_json::Value,
}

impl From<PlatformLinkDto> for PlatformLink {
    fn from(d: PlatformLinkDto) -> Self {
        PlatformLink {
            platform: d.platform,
            link: d.link,
        }
    }
}

fn into_http(err: LinkError) -> HttpError {
    let status = match &err {
        LinkError::NoData | LinkError::PlatformNotFound(_) => StatusCode::NOT_FOUND,
        LinkError::Store(e) => {
            tracing::error!(error = ?e, "link_store_failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, err.to_string())
}

#[utoipa::path(get, path = "/links", tag = "Links",
    responses(
        (status = 200, body = LinkDocumentBody),
        (status = 404, description = "No data found", body = String),
        (status = 500, description = "Store failure", body = String)
    ))]
pub async fn list_links(State(ctx): State<AppContext>) -> Result<Json<DocumentData>, HttpError> {
    let store = ctx.link_store();
    let uc = ListLinks {
        store: store.as_ref(),
    };
    let data = uc.execute().await.map_err(into_http)?;
    Ok(Json(data))
}

#[utoipa::path(get, path = "/links/{platform}", tag = "Links",
    params(("platform" = String, Path, description = "Platform name, case-insensitive")),
    responses(
        (status = 200, body = PlatformLink),
        (status = 404, description = "Document or platform not found", body = String),
        (status = 500, description = "Store failure", body = String)
    ))]
pub async fn get_link(
    State(ctx): State<AppContext>,
    Path(platform): Path<String>,
) -> Result<Json<PlatformLink>, HttpError> {
    let store = ctx.link_store();
    let uc = GetLink {
        store: store.as_ref(),
    };
    let found = uc.execute(&platform).await.map_err(into_http)?;
    Ok(Json(found.into()))
}

#[utoipa::path(post, path = "/links", tag = "Links",
    request_body = LinkRequest,
    responses(
        (status = 200, description = "Link added/updated successfully", body = String),
        (status = 500, description = "Store failure", body = String)
    ))]
pub async fn upsert_link(
    State(ctx): State<AppContext>,
    Json(req): Json<LinkRequest>,
) -> Result<(StatusCode, &'static str), HttpError> {
    let store = ctx.link_store();
    let uc = UpsertLink {
        store: store.as_ref(),
    };
    let outcome = uc
        .execute(&req.platform, &req.link)
        .await
        .map_err(into_http)?;
    if outcome == UpsertOutcome::Created {
        tracing::info!("link_document_created");
    }
    Ok((StatusCode::OK, "Link added/updated successfully"))
}

#[utoipa::path(post, path = "/update-link", tag = "Links",
    request_body = LinkRequest,
    responses(
        (status = 200, description = "Link updated successfully", body = String),
        (status = 500, description = "Store failure, including a missing document", body = String)
    ))]
pub async fn update_link(
    State(ctx): State<AppContext>,
    Json(req): Json<LinkRequest>,
) -> Result<(StatusCode, &'static str), HttpError> {
    let store = ctx.link_store();
    let uc = UpdateLink {
        store: store.as_ref(),
    };
    uc.execute(&req.platform, &req.link)
        .await
        .map_err(into_http)?;
    Ok((StatusCode::OK, "Link updated successfully"))
}

#[utoipa::path(delete, path = "/delete-link/{platform}", tag = "Links",
    params(("platform" = String, Path, description = "Platform name, case-insensitive")),
    responses(
        (status = 200, description = "Link deleted successfully", body = String),
        (status = 404, description = "Document or platform not found", body = String),
        (status = 500, description = "Store failure", body = String)
    ))]
pub async fn delete_link(
    State(ctx): State<AppContext>,
    Path(platform): Path<String>,
) -> Result<(StatusCode, &'static str), HttpError> {
    let store = ctx.link_store();
    let uc = DeleteLink {
        store: store.as_ref(),
    };
    uc.execute(&platform).await.map_err(into_http)?;
    Ok((StatusCode::OK, "Link deleted successfully"))
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/links", get(list_links).post(upsert_link))
        .route("/links/:platform", get(get_link))
        .route("/update-link", post(update_link))
        .route("/delete-link/:platform", delete(delete_link))
        .with_state(ctx)
}
