use crate::error::ReaderError;
use crate::models::{geometry::GeometryExtent, layer::LayerSummary};
use async_trait::async_trait;
use geojson::GeoJson;

#[async_trait]
pub trait FeatureReader: Send + Sync {
    async fn list_layers(&self) -> Vec<LayerSummary>;
    async fn query(&self, layer: &str, extent: &GeometryExtent) -> Result<GeoJson, ReaderError>;
}
