use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use railboard_types::api::ListWidgetsQuery;
use railboard_types::models::Widget;

use crate::auth::AppState;
use crate::error::ApiError;

/// List widgets for display. Defaults to enabled-only so active display
/// pipelines never see disabled widgets; admin surfaces opt in to the rest.
pub async fn list_widgets(
    State(state): State<AppState>,
    Query(query): Query<ListWidgetsQuery>,
) -> Result<Json<Vec<Widget>>, ApiError> {
    let widgets = state.db.list_widgets(query.include_disabled)?;
    Ok(Json(widgets))
}

pub async fn get_widget(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Widget>, ApiError> {
    let widget = state.db.get_widget(id)?.ok_or(ApiError::NotFound)?;
    Ok(Json(widget))
}

/// Create a widget. The id is assigned here, at persistence time; a record
/// arriving with one already set is rejected.
pub async fn create_widget(
    State(state): State<AppState>,
    Json(mut widget): Json<Widget>,
) -> Result<impl IntoResponse, ApiError> {
    if widget.id().is_some() {
        return Err(ApiError::BadRequest(
            "id is assigned on creation and must not be supplied",
        ));
    }
    widget.validate()?;

    widget.generic_mut().id = Some(Uuid::new_v4());
    state.db.insert_widget(&widget)?;

    Ok((StatusCode::CREATED, Json(widget)))
}

/// Replace a widget's mutable fields. The path id is authoritative; a body
/// id that disagrees with it is rejected (ids are immutable once assigned).
pub async fn update_widget(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(mut widget): Json<Widget>,
) -> Result<Json<Widget>, ApiError> {
    match widget.id() {
        None => widget.generic_mut().id = Some(id),
        Some(body_id) if body_id != id => {
            return Err(ApiError::BadRequest("id is immutable once assigned"));
        }
        Some(_) => {}
    }
    widget.validate()?;

    // A widget's kind is fixed at creation; a PUT may not turn an alert
    // into an arrival board.
    let existing = state.db.get_widget(id)?.ok_or(ApiError::NotFound)?;
    if existing.kind() != widget.kind() {
        return Err(ApiError::BadRequest("widget kind is fixed at creation"));
    }

    if !state.db.update_widget(id, &widget)? {
        return Err(ApiError::NotFound);
    }
    Ok(Json(widget))
}

pub async fn delete_widget(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !state.db.delete_widget(id)? {
        return Err(ApiError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}
