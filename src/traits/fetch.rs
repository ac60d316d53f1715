use geojson::GeoJson;
use std::future::Future;
use std::pin::Pin;

/// Deferred result of a bbox fetch.
pub type FetchFuture = Pin<Box<dyn Future<Output = anyhow::Result<GeoJson>> + Send>>;

/// Injected transport: turns a `minX,minY,maxX,maxY` string into GeoJSON.
///
/// `fetch` is called synchronously when the request is issued; the returned
/// future is polled on the runtime. Timeouts and cancellation belong here,
/// the layer imposes none.
pub trait FetchRequest: Send + Sync {
    fn fetch(&self, bbox: &str) -> FetchFuture;
}

impl<F, Fut> FetchRequest for F
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<GeoJson>> + Send + 'static,
{
    fn fetch(&self, bbox: &str) -> FetchFuture {
        Box::pin(self(bbox.to_string()))
    }
}
