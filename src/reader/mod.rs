use crate::error::ReaderError;
use crate::models::geometry::GeometryExtent;
use crate::traits::{FeatureReader, FetchFuture, FetchRequest};
use std::sync::Arc;

pub mod local;

/// Serves one reader layer to a bbox layer, in process.
///
/// Stands in for the HTTP request a browser map would make against
/// `/features/{layer}?bbox=...`.
pub struct ReaderFetch {
    reader: Arc<dyn FeatureReader>,
    layer: String,
}

impl ReaderFetch {
    pub fn new(reader: Arc<dyn FeatureReader>, layer: impl Into<String>) -> Self {
        ReaderFetch {
            reader,
            layer: layer.into(),
        }
    }
}

impl FetchRequest for ReaderFetch {
    fn fetch(&self, bbox: &str) -> FetchFuture {
        let reader = self.reader.clone();
        let layer = self.layer.clone();
        let bbox = bbox.to_string();
        Box::pin(async move {
            let extent: GeometryExtent = bbox.parse().map_err(ReaderError::from)?;
            Ok(reader.query(&layer, &extent).await?)
        })
    }
}
