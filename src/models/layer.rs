use crate::models::geometry::GeometryExtent;
use serde::Serialize;
use std::fmt;

/// Padding applied to the viewport before it is sent to the fetch function.
pub const DEFAULT_PADDING: f64 = 0.1;

/// Inclusive zoom band. Unset bounds are unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ZoomRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ZoomRange {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        ZoomRange { min, max }
    }

    pub fn contains(&self, zoom: f64) -> bool {
        let min = self.min.unwrap_or(f64::NEG_INFINITY);
        let max = self.max.unwrap_or(f64::INFINITY);
        min <= zoom && zoom <= max
    }
}

impl fmt::Display for ZoomRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bound = |b: Option<f64>| b.map(|v| v.to_string()).unwrap_or_else(|| "*".into());
        write!(f, "{}..{}", bound(self.min), bound(self.max))
    }
}

/// Construction-time settings of a [`GeoJsonBboxLayer`](crate::layer::GeoJsonBboxLayer).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerOptions {
    pub zoom: ZoomRange,
    pub padding: f64,
}

impl Default for LayerOptions {
    fn default() -> Self {
        LayerOptions {
            zoom: ZoomRange::default(),
            padding: DEFAULT_PADDING,
        }
    }
}

impl LayerOptions {
    pub fn with_zoom_min(mut self, zoom_min: f64) -> Self {
        self.zoom.min = Some(zoom_min);
        self
    }

    pub fn with_zoom_max(mut self, zoom_max: f64) -> Self {
        self.zoom.max = Some(zoom_max);
        self
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }
}

/// What a feature reader knows about one of its layers.
#[derive(Debug, Clone, Serialize)]
pub struct LayerSummary {
    pub layer: String,
    pub features: usize,
    pub extent: Option<GeometryExtent>,
}
