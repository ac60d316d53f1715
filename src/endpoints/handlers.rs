use crate::error::ReaderError;
use crate::models::{geometry::GeometryExtent, layer::LayerSummary};
use crate::traits::FeatureReader;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Deserialize)]
pub struct BboxQuery {
    pub bbox: String,
}

pub async fn get_all_layers(State(reader): State<Arc<dyn FeatureReader>>) -> impl IntoResponse {
    let layers: Vec<LayerSummary> = reader.list_layers().await;
    (StatusCode::OK, Json(layers))
}

/// `GET /features/{layer}?bbox=minX,minY,maxX,maxY`
pub async fn features_handler(
    Path(layer): Path<String>,
    Query(query): Query<BboxQuery>,
    State(reader): State<Arc<dyn FeatureReader>>,
) -> Response {
    let extent: GeometryExtent = match query.bbox.parse() {
        Ok(extent) => extent,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };

    debug!(%layer, %extent, "feature query");
    match reader.query(&layer, &extent).await {
        Ok(geojson) => (StatusCode::OK, Json(geojson)).into_response(),
        Err(e @ ReaderError::LayerNotFound(_)) => {
            (StatusCode::NOT_FOUND, e.to_string()).into_response()
        }
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}
