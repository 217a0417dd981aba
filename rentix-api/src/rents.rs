use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use rentix_core::models::Rent;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_rents).post(create_rent))
        .route("/{id}", get(get_rent).put(update_rent).delete(delete_rent))
}

/// A stored rent plus the totals derived from it. The derived figures
/// are computed on the way out, never stored.
#[derive(Debug, Serialize)]
pub struct RentResponse {
    #[serde(flatten)]
    pub rent: Rent,
    pub subtotal: f64,
    pub total: f64,
    pub change: f64,
    pub remaining: f64,
    pub total_weight: f64,
    pub total_unit_value: f64,
    pub total_pieces: i64,
}

impl From<Rent> for RentResponse {
    fn from(rent: Rent) -> Self {
        Self {
            subtotal: rentix_pricing::rent_subtotal(&rent),
            total: rentix_pricing::rent_total(&rent),
            change: rentix_pricing::change(&rent),
            remaining: rentix_pricing::remaining(&rent),
            total_weight: rentix_pricing::total_weight(&rent),
            total_unit_value: rentix_pricing::total_unit_value(&rent),
            total_pieces: rentix_pricing::total_pieces(&rent),
            rent,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_per_page")]
    pub per_page: i64,
}

fn default_page() -> i64 {
    1
}

fn default_per_page() -> i64 {
    50
}

impl Pagination {
    /// Query parameters arrive unchecked; both values get a floor of 1 so
    /// they can reach the store as-is.
    fn clamped(&self) -> (i64, i64) {
        (self.page.max(1), self.per_page.max(1))
    }
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub items: Vec<RentResponse>,
    pub total_items: i64,
    pub total_pages: i64,
}

fn total_pages(total_items: i64, per_page: i64) -> i64 {
    if per_page <= 0 {
        return 1;
    }
    ((total_items + per_page - 1) / per_page).max(1)
}

async fn create_rent(
    State(state): State<AppState>,
    Json(rent): Json<Rent>,
) -> Result<(StatusCode, Json<RentResponse>), ApiError> {
    let created = state.service.create_rent(rent).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

async fn get_rent(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RentResponse>, ApiError> {
    let rent = state.service.get_rent(&id).await?;
    Ok(Json(rent.into()))
}

async fn list_rents(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<ListResponse>, ApiError> {
    let (page, per_page) = pagination.clamped();
    let (rents, total_items) = state.service.list_rents(page, per_page).await?;

    Ok(Json(ListResponse {
        items: rents.into_iter().map(RentResponse::from).collect(),
        total_items,
        total_pages: total_pages(total_items, per_page),
    }))
}

async fn update_rent(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(rent): Json<Rent>,
) -> Result<Json<RentResponse>, ApiError> {
    let updated = state.service.update_rent(&id, rent).await?;
    Ok(Json(updated.into()))
}

async fn delete_rent(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.service.delete_rent(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rentix_core::models::{Equipment, Item, RentingValue};

    #[test]
    fn page_count_rounds_up_and_never_drops_below_one() {
        assert_eq!(total_pages(0, 50), 1);
        assert_eq!(total_pages(50, 50), 1);
        assert_eq!(total_pages(51, 50), 2);
        assert_eq!(total_pages(101, 50), 3);
        assert_eq!(total_pages(10, 0), 1);
    }

    #[test]
    fn pagination_defaults_apply_when_params_are_missing() {
        let pagination: Pagination = serde_json::from_str("{}").unwrap();
        assert_eq!(pagination.page, 1);
        assert_eq!(pagination.per_page, 50);
    }

    #[test]
    fn negative_pagination_params_are_clamped() {
        let pagination: Pagination =
            serde_json::from_str(r#"{"page":-3,"per_page":-1}"#).unwrap();
        assert_eq!(pagination.clamped(), (1, 1));

        let pagination: Pagination =
            serde_json::from_str(r#"{"page":2,"per_page":0}"#).unwrap();
        assert_eq!(pagination.clamped(), (2, 1));
    }

    #[test]
    fn response_carries_the_rent_fields_and_the_totals() {
        let rent = Rent {
            id: "rent-1".into(),
            period_id: "daily".into(),
            paid_value: 20.0,
            items: vec![Item {
                equipment_id: "eq-1".into(),
                qty: 3,
                equipment: Some(Equipment {
                    id: "eq-1".into(),
                    weight: 2.0,
                    unit_value: 100.0,
                    renting_values: vec![RentingValue {
                        period_id: "daily".into(),
                        period: None,
                        value: 10.0,
                    }],
                    ..Default::default()
                }),
            }],
            ..Default::default()
        };

        let body = serde_json::to_value(RentResponse::from(rent)).unwrap();
        assert_eq!(body["id"], "rent-1");
        assert_eq!(body["subtotal"], 30.0);
        assert_eq!(body["total"], 30.0);
        assert_eq!(body["remaining"], 10.0);
        assert_eq!(body["total_weight"], 6.0);
        assert_eq!(body["total_pieces"], 3);
    }
}
