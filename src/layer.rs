//! Viewport-driven GeoJSON layer.
//!
//! [`GeoJsonBboxLayer`] follows the host map around. It fetches data for the
//! padded viewport when the map stops moving or is asked to refresh. It
//! replaces whatever it drew before, and it clears itself when the zoom leaves
//! the configured band.
//!
//! Only the most recently issued request may render. Each refresh takes a new
//! generation, and zooming out of range or detaching bumps it too. A response
//! that comes back for an older generation, or after the layer left the map,
//! is dropped. Rendering and clearing are serialized, so a response that
//! passed the check cannot land after a later clear.

use crate::models::{event::MapEvent, layer::LayerOptions};
use crate::traits::{EventHandler, FeatureSink, FetchRequest, HostMap, MapLayer, Subscription};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Default)]
struct Attachment {
    host: Option<Arc<dyn HostMap>>,
    subscriptions: Vec<Subscription>,
}

struct Inner {
    options: LayerOptions,
    fetch: Arc<dyn FetchRequest>,
    sink: Arc<dyn FeatureSink>,
    attachment: Mutex<Attachment>,
    generation: AtomicU64,
    // held while touching the sink; taken before `attachment`
    render: Mutex<()>,
    runtime: Option<Handle>,
}

/// Cheap to clone; clones share the same attachment and rendered features.
#[derive(Clone)]
pub struct GeoJsonBboxLayer {
    inner: Arc<Inner>,
}

impl GeoJsonBboxLayer {
    /// Completions run on the tokio runtime current at construction, if any,
    /// otherwise on the runtime of whichever thread issues the fetch.
    pub fn new(
        options: LayerOptions,
        fetch: Arc<dyn FetchRequest>,
        sink: Arc<dyn FeatureSink>,
    ) -> Self {
        Self::build(options, fetch, sink, Handle::try_current().ok())
    }

    /// Run completions on `runtime`, so hosts may dispatch events from any thread.
    pub fn with_runtime(
        options: LayerOptions,
        fetch: Arc<dyn FetchRequest>,
        sink: Arc<dyn FeatureSink>,
        runtime: Handle,
    ) -> Self {
        Self::build(options, fetch, sink, Some(runtime))
    }

    fn build(
        options: LayerOptions,
        fetch: Arc<dyn FetchRequest>,
        sink: Arc<dyn FeatureSink>,
        runtime: Option<Handle>,
    ) -> Self {
        GeoJsonBboxLayer {
            inner: Arc::new(Inner {
                options,
                fetch,
                sink,
                attachment: Mutex::new(Attachment::default()),
                generation: AtomicU64::new(0),
                render: Mutex::new(()),
                runtime,
            }),
        }
    }

    pub fn options(&self) -> &LayerOptions {
        &self.inner.options
    }

    pub fn sink(&self) -> &Arc<dyn FeatureSink> {
        &self.inner.sink
    }

    pub fn is_attached(&self) -> bool {
        self.inner.attachment().host.is_some()
    }

    /// Number of live subscriptions on the host; three while attached.
    pub fn subscription_count(&self) -> usize {
        self.inner.attachment().subscriptions.len()
    }

    /// Store the host, subscribe to its notifications and load the current viewport.
    pub fn attach(&self, host: Arc<dyn HostMap>) -> &Self {
        self.inner.attachment().host = Some(host.clone());

        let subscriptions: Vec<Subscription> = MapEvent::ALL
            .iter()
            .map(|&event| host.on(event, self.handler_for(event)))
            .collect();
        debug!(subscriptions = subscriptions.len(), "bbox layer attached");
        self.inner.attachment().subscriptions = subscriptions;

        self.refresh();
        self
    }

    /// Dispose every subscription and forget the host. A no-op when detached.
    pub fn detach(&self, host: &dyn HostMap) {
        let subscriptions = {
            let _render = self.inner.render();
            let mut attachment = self.inner.attachment();
            attachment.host = None;
            self.inner.invalidate();
            std::mem::take(&mut attachment.subscriptions)
        };

        for subscription in &subscriptions {
            host.off(*subscription);
        }
        if !subscriptions.is_empty() {
            debug!(subscriptions = subscriptions.len(), "bbox layer detached");
        }
    }

    /// Issue a fetch for the padded viewport.
    ///
    /// Returns the task applying the response, or `None` when nothing was
    /// fetched: detached, zoom out of range, or no tokio runtime to run on.
    pub fn refresh(&self) -> Option<JoinHandle<()>> {
        self.inner.refresh()
    }

    /// Zoom alone never refetches; leaving the band clears immediately.
    pub fn on_zoom_changed(&self) {
        self.inner.on_zoom_changed();
    }

    /// `zoom_min <= zoom <= zoom_max` for the host's current zoom; false when detached.
    pub fn is_zoom_in_range(&self) -> bool {
        self.inner
            .host()
            .is_some_and(|host| self.inner.options.zoom.contains(host.zoom()))
    }

    fn handler_for(&self, event: MapEvent) -> EventHandler {
        // weak, since the host keeps these handlers and the layer keeps the host
        let inner: Weak<Inner> = Arc::downgrade(&self.inner);
        match event {
            MapEvent::MoveEnd | MapEvent::Refresh => Arc::new(move || {
                if let Some(inner) = inner.upgrade() {
                    inner.refresh();
                }
            }),
            MapEvent::ZoomEnd => Arc::new(move || {
                if let Some(inner) = inner.upgrade() {
                    inner.on_zoom_changed();
                }
            }),
        }
    }
}

impl Inner {
    fn attachment(&self) -> MutexGuard<'_, Attachment> {
        self.attachment.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn render(&self) -> MutexGuard<'_, ()> {
        self.render.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn host(&self) -> Option<Arc<dyn HostMap>> {
        self.attachment().host.clone()
    }

    fn invalidate(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation && self.attachment().host.is_some()
    }

    fn refresh(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        let host = self.host()?;

        let zoom = host.zoom();
        if !self.options.zoom.contains(zoom) {
            debug!(zoom, range = %self.options.zoom, "zoom out of range, clearing");
            self.clear();
            return None;
        }

        let runtime = match self.runtime.clone().map_or_else(Handle::try_current, Ok) {
            Ok(runtime) => runtime,
            Err(e) => {
                warn!("bbox layer refresh outside a tokio runtime: {}", e);
                return None;
            }
        };

        let bbox = host.bounds().pad(self.options.padding).to_bbox_string();
        let generation = self.invalidate();
        debug!(%bbox, generation, "fetching");
        let request = self.fetch.fetch(&bbox);

        let inner = Arc::clone(self);
        Some(runtime.spawn(async move {
            let data = match request.await {
                Ok(data) => data,
                Err(e) => {
                    debug!(%bbox, generation, "fetch failed: {:#}", e);
                    return;
                }
            };

            let _render = inner.render();
            if inner.is_current(generation) {
                inner.sink.clear_all();
                inner.sink.add_features(data);
            } else {
                debug!(%bbox, generation, "discarding stale response");
            }
        }))
    }

    fn on_zoom_changed(&self) {
        let Some(host) = self.host() else {
            return;
        };
        let zoom = host.zoom();
        if !self.options.zoom.contains(zoom) {
            debug!(zoom, range = %self.options.zoom, "zoom left range, clearing");
            self.clear();
        }
    }

    fn clear(&self) {
        let _render = self.render();
        self.invalidate();
        self.sink.clear_all();
    }
}

impl MapLayer for GeoJsonBboxLayer {
    fn on_add(&self, map: Arc<dyn HostMap>) {
        self.attach(map);
    }

    fn on_remove(&self, map: &dyn HostMap) {
        self.detach(map);
    }

    fn rendered_count(&self) -> usize {
        self.inner.sink.feature_count()
    }

    fn zoom_label(&self) -> String {
        self.inner.options.zoom.to_string()
    }
}
