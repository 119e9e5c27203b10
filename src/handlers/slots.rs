use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::Slot;
use crate::services::booking;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SlotsQuery {
    pub branch_id: Option<String>,
    pub booked_date: Option<String>,
}

// GET /api/slots
pub async fn get_available_slots(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<Vec<Slot>>, AppError> {
    let branch_id = query.branch_id.unwrap_or_default();
    let booked_date = query.booked_date.unwrap_or_default();

    let slots = {
        let db = state.db.lock().unwrap();
        booking::get_available_slots(&db, &state.catalog, &branch_id, &booked_date)?
    };

    Ok(Json(slots))
}
