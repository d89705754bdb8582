use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use super::domain::NearbyRequest;
use super::search::PlaceSearch;
use super::service::RestaurantFinder;
use crate::error::AppError;

pub fn dining_router<S>(finder: Arc<RestaurantFinder<S>>) -> Router
where
    S: PlaceSearch + 'static,
{
    Router::new()
        .route("/api/v1/dining/nearby", post(nearby_handler::<S>))
        .with_state(finder)
}

pub(crate) async fn nearby_handler<S>(
    State(finder): State<Arc<RestaurantFinder<S>>>,
    axum::Json(request): axum::Json<NearbyRequest>,
) -> Response
where
    S: PlaceSearch + 'static,
{
    match finder.nearby(request) {
        Ok(places) => (
            StatusCode::OK,
            axum::Json(json!({ "count": places.len(), "places": places })),
        )
            .into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}
