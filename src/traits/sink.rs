use geojson::{Feature, GeoJson};
use std::sync::Mutex;

/// Rendering primitive a data layer draws into.
pub trait FeatureSink: Send + Sync {
    fn clear_all(&self);
    fn add_features(&self, data: GeoJson);

    /// Number of features currently drawn, when the sink can tell.
    fn feature_count(&self) -> usize {
        0
    }
}

/// Sink that keeps the drawn features in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    features: Mutex<Vec<Feature>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn features(&self) -> Vec<Feature> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Feature>> {
        // a poisoned sink still holds a usable feature list
        self.features.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl FeatureSink for MemorySink {
    fn clear_all(&self) {
        self.lock().clear();
    }

    fn add_features(&self, data: GeoJson) {
        let mut features = self.lock();
        match data {
            GeoJson::FeatureCollection(fc) => features.extend(fc.features),
            GeoJson::Feature(feature) => features.push(feature),
            GeoJson::Geometry(geometry) => features.push(Feature::from(geometry)),
        }
    }

    fn feature_count(&self) -> usize {
        self.len()
    }
}
