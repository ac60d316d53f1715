pub mod config;
pub mod demo;
pub mod endpoints;
pub mod error;
pub mod geometry;
pub mod layer;
pub mod logging;
pub mod map;
pub mod models;
pub mod reader;
pub mod traits;
pub mod utils;

pub use config::Config;
pub use endpoints::server::FeatureServer;
pub use layer::GeoJsonBboxLayer;
pub use map::{LatLng, SimulatedMap};
pub use models::{
    event::MapEvent,
    geometry::GeometryExtent,
    layer::{LayerOptions, ZoomRange},
};
pub use traits::{FeatureSink, FetchRequest, HostMap, MapLayer, MemorySink};
