use crate::models::{event::MapEvent, geometry::GeometryExtent};
use std::sync::Arc;

/// Callback invoked synchronously from the host's event dispatch.
pub type EventHandler = Arc<dyn Fn() + Send + Sync>;

/// Handle returned by [`HostMap::on`]; hand it back to [`HostMap::off`] to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription {
    pub id: u64,
    pub event: MapEvent,
}

/// The interactive map a data layer attaches to.
///
/// The host owns pan/zoom state. Implementations must not hold internal locks
/// while invoking handlers, since handlers read `bounds()` and `zoom()` back.
pub trait HostMap: Send + Sync {
    /// Visible area in lon/lat degrees.
    fn bounds(&self) -> GeometryExtent;
    fn zoom(&self) -> f64;
    fn on(&self, event: MapEvent, handler: EventHandler) -> Subscription;
    fn off(&self, subscription: Subscription);
}

/// Lifecycle hooks the host calls when a layer is added to or removed from it.
pub trait MapLayer: Send + Sync {
    fn on_add(&self, map: Arc<dyn HostMap>);
    fn on_remove(&self, map: &dyn HostMap);

    /// Number of features currently drawn by this layer.
    fn rendered_count(&self) -> usize {
        0
    }

    /// Human readable zoom band, used in summaries.
    fn zoom_label(&self) -> String {
        "*..*".to_string()
    }
}
