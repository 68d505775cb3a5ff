use axum::{Json, extract::Path};

use railboard_types::stations::{Station, StationDirectory};

use crate::error::ApiError;

/// The full station directory, ordered by code. Static data: this serves
/// the bundled snapshot, never a live transit API.
pub async fn list_stations() -> Json<Vec<Station>> {
    Json(StationDirectory::bundled().iter().cloned().collect())
}

pub async fn get_station(Path(code): Path<String>) -> Result<Json<Station>, ApiError> {
    StationDirectory::bundled()
        .get(&code)
        .cloned()
        .map(Json)
        .ok_or(ApiError::NotFound)
}
