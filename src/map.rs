//! In-process host map.
//!
//! `SimulatedMap` keeps a Web Mercator viewport (center, zoom, pixel size) and
//! dispatches the same notifications an interactive map would. The demo and
//! the integration tests use it to drive data layers without a browser.

use crate::geometry::projection::{
    WEB_MERCATOR_EXTENT, lon_lat_to_mercator, mercator_to_lon_lat,
};
use crate::models::{event::MapEvent, geometry::GeometryExtent};
use crate::traits::{EventHandler, HostMap, MapLayer, Subscription};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

pub const TILE_SIZE: f64 = 256.0;

/// Geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        LatLng { lat, lng }
    }
}

#[derive(Debug, Clone, Copy)]
struct View {
    center: LatLng,
    zoom: f64,
}

pub struct SimulatedMap {
    view: Mutex<View>,
    size: (f64, f64),
    min_zoom: f64,
    max_zoom: f64,
    next_id: AtomicU64,
    listeners: Mutex<Vec<(Subscription, EventHandler)>>,
    layers: Mutex<BTreeMap<String, Arc<dyn MapLayer>>>,
}

impl SimulatedMap {
    /// A map of `width` x `height` pixels allowing zoom levels 0 to 20.
    pub fn new(width: u32, height: u32) -> Arc<Self> {
        Self::with_zoom_limits(width, height, 0.0, 20.0)
    }

    pub fn with_zoom_limits(width: u32, height: u32, min_zoom: f64, max_zoom: f64) -> Arc<Self> {
        Arc::new(SimulatedMap {
            view: Mutex::new(View {
                center: LatLng::new(0.0, 0.0),
                zoom: min_zoom,
            }),
            size: (width as f64, height as f64),
            min_zoom,
            max_zoom,
            next_id: AtomicU64::new(1),
            listeners: Mutex::new(Vec::new()),
            layers: Mutex::new(BTreeMap::new()),
        })
    }

    pub fn center(&self) -> LatLng {
        self.view().center
    }

    /// Move and zoom at once. Fires `zoomend` if the zoom changed, then `moveend`.
    pub fn set_view(&self, center: LatLng, zoom: f64) {
        let zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        let zoom_changed = {
            let mut view = self.view();
            let changed = view.zoom != zoom;
            view.center = center;
            view.zoom = zoom;
            changed
        };

        if zoom_changed {
            self.fire(MapEvent::ZoomEnd);
        }
        self.fire(MapEvent::MoveEnd);
    }

    pub fn set_zoom(&self, zoom: f64) {
        let center = self.center();
        self.set_view(center, zoom);
    }

    /// Recenter without changing zoom.
    pub fn pan_to(&self, center: LatLng) {
        self.view().center = center;
        self.fire(MapEvent::MoveEnd);
    }

    /// Shift the view by a number of screen pixels.
    pub fn pan_by(&self, dx: f64, dy: f64) {
        let View { center, zoom } = *self.view();
        let resolution = Self::resolution(zoom);
        let (x, y) = lon_lat_to_mercator(center.lng, center.lat);
        let (lng, lat) = mercator_to_lon_lat(x + dx * resolution, y - dy * resolution);
        self.pan_to(LatLng::new(lat, lng));
    }

    /// Ask every subscribed layer to reload.
    pub fn refresh(&self) {
        self.fire(MapEvent::Refresh);
    }

    /// Invoke every handler subscribed to `event`.
    pub fn fire(&self, event: MapEvent) {
        let handlers: Vec<EventHandler> = self
            .listeners()
            .iter()
            .filter(|(subscription, _)| subscription.event == event)
            .map(|(_, handler)| handler.clone())
            .collect();

        debug!(%event, handlers = handlers.len(), "dispatching");
        for handler in handlers {
            handler();
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners().len()
    }

    /// Add a layer under `id`. Adding an id that is already on the map does nothing.
    pub fn add_layer(self: &Arc<Self>, id: &str, layer: Arc<dyn MapLayer>) {
        {
            let mut layers = self.layers();
            if layers.contains_key(id) {
                return;
            }
            layers.insert(id.to_string(), layer.clone());
        }
        debug!(layer = id, "adding layer");
        let host: Arc<dyn HostMap> = self.clone();
        layer.on_add(host);
    }

    /// Remove the layer under `id`, if present.
    pub fn remove_layer(&self, id: &str) {
        let Some(layer) = self.layers().remove(id) else {
            return;
        };
        debug!(layer = id, "removing layer");
        layer.on_remove(self);
    }

    pub fn has_layer(&self, id: &str) -> bool {
        self.layers().contains_key(id)
    }

    fn resolution(zoom: f64) -> f64 {
        2.0 * WEB_MERCATOR_EXTENT / (TILE_SIZE * 2f64.powf(zoom))
    }

    fn view(&self) -> MutexGuard<'_, View> {
        self.view.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn listeners(&self) -> MutexGuard<'_, Vec<(Subscription, EventHandler)>> {
        self.listeners.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn layers(&self) -> MutexGuard<'_, BTreeMap<String, Arc<dyn MapLayer>>> {
        self.layers.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl HostMap for SimulatedMap {
    fn bounds(&self) -> GeometryExtent {
        let View { center, zoom } = *self.view();
        let resolution = Self::resolution(zoom);
        let (x, y) = lon_lat_to_mercator(center.lng, center.lat);
        let half_width = self.size.0 / 2.0 * resolution;
        let half_height = self.size.1 / 2.0 * resolution;

        let (minx, miny) = mercator_to_lon_lat(x - half_width, y - half_height);
        let (maxx, maxy) = mercator_to_lon_lat(x + half_width, y + half_height);
        GeometryExtent::from((minx, miny, maxx, maxy))
    }

    fn zoom(&self) -> f64 {
        self.view().zoom
    }

    fn on(&self, event: MapEvent, handler: EventHandler) -> Subscription {
        let subscription = Subscription {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            event,
        };
        self.listeners().push((subscription, handler));
        subscription
    }

    fn off(&self, subscription: Subscription) {
        self.listeners().retain(|(s, _)| *s != subscription);
    }
}
