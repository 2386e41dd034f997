//! Group iteration endpoint handlers.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::mock_server::state::{IterationFilter, MockState};
use crate::IterationParams;

type SharedState = State<Arc<RwLock<MockState>>>;

fn not_found(what: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "message": format!("404 {what} Not Found") })),
    )
        .into_response()
}

/// Reject the request unless it carries the configured token.
fn authorize(state: &MockState, headers: &HeaderMap) -> Result<(), Response> {
    let Some(required) = state.required_token.as_deref() else {
        return Ok(());
    };

    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    if presented == Some(required) {
        Ok(())
    } else {
        Err((
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "message": "401 Unauthorized" })),
        )
            .into_response())
    }
}

/// Parse list filters from raw query pairs. Arrays arrive as `iids[]=1&iids[]=2`.
fn parse_filter(pairs: &[(String, String)]) -> Result<IterationFilter, Response> {
    let mut filter = IterationFilter::default();

    for (key, value) in pairs {
        match key.as_str() {
            "iids[]" | "iids" => {
                let iid = value.parse().map_err(|_| bad_request("iids is invalid"))?;
                filter.iids.push(iid);
            }
            "state" => filter.state = Some(value.clone()),
            "search" => filter.search = Some(value.clone()),
            "updated_after" => {
                let after = value
                    .parse()
                    .map_err(|_| bad_request("updated_after is invalid"))?;
                filter.updated_after = Some(after);
            }
            _ => {}
        }
    }

    Ok(filter)
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}

/// GET /groups/{group}/iterations
pub async fn list_iterations(
    State(state): SharedState,
    Path(group): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
    headers: HeaderMap,
) -> Response {
    let mut state = state.write().await;
    state.requests.push(format!("GET groups/{group}/iterations"));
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    let Some(group_id) = state.resolve_group(&group) else {
        return not_found("Group");
    };
    let filter = match parse_filter(&pairs) {
        Ok(f) => f,
        Err(response) => return response,
    };

    let iterations: Vec<_> = state
        .list_iterations(group_id, &filter)
        .into_iter()
        .cloned()
        .collect();
    (StatusCode::OK, Json(iterations)).into_response()
}

/// GET /groups/{group}/iterations/{id}
pub async fn get_iteration(
    State(state): SharedState,
    Path((group, id)): Path<(String, u64)>,
    headers: HeaderMap,
) -> Response {
    let mut state = state.write().await;
    state.requests.push(format!("GET groups/{group}/iterations/{id}"));
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    let Some(group_id) = state.resolve_group(&group) else {
        return not_found("Group");
    };

    match state.get_iteration(group_id, id) {
        Some(iteration) => (StatusCode::OK, Json(iteration.clone())).into_response(),
        None => not_found("Iteration"),
    }
}

/// POST /groups/{group}/iterations
pub async fn create_iteration(
    State(state): SharedState,
    Path(group): Path<String>,
    headers: HeaderMap,
    body: Option<Json<IterationParams>>,
) -> Response {
    let mut state = state.write().await;
    state.requests.push(format!("POST groups/{group}/iterations"));
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    let Some(group_id) = state.resolve_group(&group) else {
        return not_found("Group");
    };
    let params = body.map(|Json(p)| p).unwrap_or_default();

    if params.title.is_none() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "message": { "title": ["can't be blank"] } })),
        )
            .into_response();
    }

    let created = state.create_iteration(group_id, params);
    (StatusCode::CREATED, Json(created)).into_response()
}

/// PUT /groups/{group}/iterations/{id}
pub async fn update_iteration(
    State(state): SharedState,
    Path((group, id)): Path<(String, u64)>,
    headers: HeaderMap,
    body: Option<Json<IterationParams>>,
) -> Response {
    let mut state = state.write().await;
    state.requests.push(format!("PUT groups/{group}/iterations/{id}"));
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    let Some(group_id) = state.resolve_group(&group) else {
        return not_found("Group");
    };
    let params = body.map(|Json(p)| p).unwrap_or_default();

    match state.update_iteration(group_id, id, params) {
        Some(iteration) => (StatusCode::OK, Json(iteration.clone())).into_response(),
        None => not_found("Iteration"),
    }
}

/// DELETE /groups/{group}/iterations/{id}
pub async fn delete_iteration(
    State(state): SharedState,
    Path((group, id)): Path<(String, u64)>,
    headers: HeaderMap,
) -> Response {
    let mut state = state.write().await;
    state.requests.push(format!("DELETE groups/{group}/iterations/{id}"));
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    let Some(group_id) = state.resolve_group(&group) else {
        return not_found("Group");
    };

    if state.delete_iteration(group_id, id) {
        StatusCode::NO_CONTENT.into_response()
    } else {
        not_found("Iteration")
    }
}

/// GET /groups/{group}/iterations/{id}/issues
pub async fn list_issues(
    state: SharedState,
    path: Path<(String, u64)>,
    headers: HeaderMap,
) -> Response {
    sub_resource(state, path, headers, "issues", |s| &s.issues).await
}

/// GET /groups/{group}/iterations/{id}/discussions
pub async fn list_discussions(
    state: SharedState,
    path: Path<(String, u64)>,
    headers: HeaderMap,
) -> Response {
    sub_resource(state, path, headers, "discussions", |s| &s.discussions).await
}

/// GET /groups/{group}/iterations/{id}/notes
pub async fn list_notes(
    state: SharedState,
    path: Path<(String, u64)>,
    headers: HeaderMap,
) -> Response {
    sub_resource(state, path, headers, "notes", |s| &s.notes).await
}

async fn sub_resource(
    State(state): SharedState,
    Path((group, id)): Path<(String, u64)>,
    headers: HeaderMap,
    name: &str,
    select: fn(&MockState) -> &HashMap<u64, Vec<Value>>,
) -> Response {
    let mut state = state.write().await;
    state
        .requests
        .push(format!("GET groups/{group}/iterations/{id}/{name}"));
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    let Some(group_id) = state.resolve_group(&group) else {
        return not_found("Group");
    };
    if state.get_iteration(group_id, id).is_none() {
        return not_found("Iteration");
    }

    let items = select(&state).get(&id).cloned().unwrap_or_default();
    (StatusCode::OK, Json(items)).into_response()
}
