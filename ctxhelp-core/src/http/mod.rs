// File: ctxhelp-core/src/http/mod.rs
//
// Editor CRUD surface and page lookup surface.

use std::sync::Arc;
use axum::{
    Json,
    Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::error;

use ctxhelp_common::models::{Actor, ContextHelp, HelpQuery, NewContextHelp};
use crate::Error;
use crate::render::HelpStyle;
use crate::services::ContextHelpService;

/// Name of the caller, as set by whatever authenticates requests upstream.
pub const ACTOR_HEADER: &str = "x-actor";
/// Comma-separated role list of the caller.
pub const ROLES_HEADER: &str = "x-actor-roles";

pub fn actor_from_headers(headers: &HeaderMap) -> Actor {
    let name = headers
        .get(ACTOR_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string);

    let roles = headers
        .get(ROLES_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Actor { name, roles }
}

/// Error wrapper so `Error` can be returned from handlers.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Forbidden(_) => StatusCode::FORBIDDEN,
            other => {
                error!("Request failed: {:?}", other);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

/// Malformed bodies are reported like any other invalid entry.
fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, Error> {
    body.map(|Json(value)| value)
        .map_err(|rejection| Error::Validation(rejection.body_text()))
}

fn query_params<T>(params: Result<Query<T>, QueryRejection>) -> Result<T, Error> {
    params
        .map(|Query(value)| value)
        .map_err(|rejection| Error::InvalidQuery(rejection.body_text()))
}

/// Ids come in as raw path text; anything unparseable simply does not exist.
fn parse_id(raw: &str) -> Result<i32, Error> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| Error::NotFound(format!("context help {raw}")))
}

pub fn router(service: Arc<ContextHelpService>) -> Router {
    Router::new()
        .route("/ContextHelp", get(list).post(create))
        .route("/ContextHelp/Create", get(create_template).post(create))
        .route("/ContextHelp/Edit/{id}", get(details).post(edit))
        .route("/ContextHelp/Delete/{id}", get(details).post(remove))
        .route("/ContextHelp/{id}", get(details).put(edit).delete(remove))
        .route("/help", get(lookup))
        .route("/help/render", get(render))
        .route("/help/ranked", get(ranked))
        .with_state(service)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

// ------------------------------------------------------------
// Editor
// ------------------------------------------------------------

async fn list(State(svc): State<Arc<ContextHelpService>>) -> ApiResult<Json<Vec<ContextHelp>>> {
    Ok(Json(svc.list().await?))
}

async fn details(
    State(svc): State<Arc<ContextHelpService>>,
    Path(id): Path<String>,
) -> ApiResult<Json<ContextHelp>> {
    let id = parse_id(&id)?;
    Ok(Json(svc.get(id).await?))
}

/// `?cont=&act=&prop=` pre-fill, as produced by the page edit links.
#[derive(Debug, Default, Deserialize)]
struct CreateParams {
    cont: Option<String>,
    act: Option<String>,
    prop: Option<String>,
}

async fn create_template(
    State(svc): State<Arc<ContextHelpService>>,
    params: Result<Query<CreateParams>, QueryRejection>,
) -> ApiResult<Json<NewContextHelp>> {
    let params = query_params(params)?;
    Ok(Json(svc.create_template(
        params.cont.as_deref(),
        params.act.as_deref(),
        params.prop.as_deref(),
    )))
}

// The role check runs before the body is parsed, so callers without the
// editor role get 403 whatever they sent.

async fn create(
    State(svc): State<Arc<ContextHelpService>>,
    headers: HeaderMap,
    body: Result<Json<NewContextHelp>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ContextHelp>)> {
    let actor = actor_from_headers(&headers);
    svc.require_editor(&actor, "create")?;
    let new = json_body(body)?;
    let created = svc.create(&actor, new).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn edit(
    State(svc): State<Arc<ContextHelpService>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Result<Json<NewContextHelp>, JsonRejection>,
) -> ApiResult<Json<ContextHelp>> {
    let actor = actor_from_headers(&headers);
    svc.require_editor(&actor, "edit")?;
    let id = parse_id(&id)?;
    let changes = json_body(body)?;
    Ok(Json(svc.update(&actor, id, changes).await?))
}

async fn remove(
    State(svc): State<Arc<ContextHelpService>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id)?;
    let actor = actor_from_headers(&headers);
    svc.delete(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ------------------------------------------------------------
// Lookup
// ------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
struct LookupParams {
    controller: Option<String>,
    action: Option<String>,
    property: Option<String>,
}

impl LookupParams {
    fn to_query(&self) -> Result<HelpQuery, Error> {
        HelpQuery::new(
            self.controller.as_deref().unwrap_or_default(),
            self.action.as_deref(),
            self.property.as_deref(),
        )
    }
}

async fn lookup(
    State(svc): State<Arc<ContextHelpService>>,
    params: Result<Query<LookupParams>, QueryRejection>,
) -> ApiResult<Json<ContextHelp>> {
    let query = query_params(params)?.to_query()?;
    match svc.lookup(&query).await? {
        Some(found) => Ok(Json(found)),
        None => Err(Error::NotFound(format!(
            "no context help for {}/{}/{}",
            query.controller(),
            query.action().unwrap_or("*"),
            query.property().unwrap_or("-")
        ))
        .into()),
    }
}

/// All applicable entries, best first; for checking why a page shows what it shows.
async fn ranked(
    State(svc): State<Arc<ContextHelpService>>,
    params: Result<Query<LookupParams>, QueryRejection>,
) -> ApiResult<Json<Vec<ContextHelp>>> {
    let query = query_params(params)?.to_query()?;
    Ok(Json(svc.ranked(&query).await?))
}

#[derive(Debug, Default, Deserialize)]
struct RenderParams {
    controller: Option<String>,
    action: Option<String>,
    property: Option<String>,
    /// Field caption; defaults to the property name.
    label: Option<String>,
    /// Show the caption next to the icon.
    #[serde(default)]
    caption: bool,
}

async fn render(
    State(svc): State<Arc<ContextHelpService>>,
    headers: HeaderMap,
    params: Result<Query<RenderParams>, QueryRejection>,
) -> ApiResult<Html<String>> {
    let params = query_params(params)?;
    let query = HelpQuery::new(
        params.controller.as_deref().unwrap_or_default(),
        params.action.as_deref(),
        params.property.as_deref(),
    )?;
    let style = if params.caption { HelpStyle::NameWithHelp } else { HelpStyle::IconOnly };
    let actor = actor_from_headers(&headers);
    let html = svc.render(&query, params.label.as_deref(), style, &actor).await?;
    Ok(Html(html))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn actor_is_read_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(ACTOR_HEADER, HeaderValue::from_static(" ana "));
        headers.insert(ROLES_HEADER, HeaderValue::from_static("Student, ContextHelpEditor,,"));

        let actor = actor_from_headers(&headers);
        assert_eq!(actor.name.as_deref(), Some("ana"));
        assert_eq!(actor.roles, vec!["Student".to_string(), "ContextHelpEditor".to_string()]);

        assert_eq!(actor_from_headers(&HeaderMap::new()), Actor::anonymous());
    }

    #[test]
    fn unparseable_ids_are_not_found() {
        assert!(matches!(parse_id("abc"), Err(Error::NotFound(_))));
        assert!(matches!(parse_id(""), Err(Error::NotFound(_))));
        assert_eq!(parse_id(" 12 ").unwrap(), 12);
    }
}
