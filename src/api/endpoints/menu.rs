//! Read access to the last recognized menu.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::store::WeeklyMenu;

#[derive(Debug, Serialize)]
pub struct DayResponse {
    pub day: String,
    pub food: String,
    pub calendar_week: u32,
}

fn load_current(ctx: &ApiContext) -> Result<WeeklyMenu, ApiError> {
    ctx.store
        .load(&ctx.store_key)?
        .ok_or_else(|| ApiError::NotFound("No menu has been recognized yet".into()))
}

/// `GET /api/menu`
pub async fn current(State(ctx): State<ApiContext>) -> Result<Json<WeeklyMenu>, ApiError> {
    load_current(&ctx).map(Json)
}

/// `GET /api/menu/:day`: exact weekday label, e.g. `Montag`.
pub async fn day(
    State(ctx): State<ApiContext>,
    Path(day): Path<String>,
) -> Result<Json<DayResponse>, ApiError> {
    let weekly = load_current(&ctx)?;
    let food = weekly
        .menu
        .get(&day)
        .ok_or_else(|| ApiError::NotFound(format!("No menu entry for {day}")))?
        .to_string();

    Ok(Json(DayResponse {
        day,
        food,
        calendar_week: weekly.calendar_week,
    }))
}
