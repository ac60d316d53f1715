pub mod fetch;
pub mod host;
pub mod reader;
pub mod sink;

pub use fetch::{FetchFuture, FetchRequest};
pub use host::{EventHandler, HostMap, MapLayer, Subscription};
pub use reader::FeatureReader;
pub use sink::{FeatureSink, MemorySink};
