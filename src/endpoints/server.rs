use crate::config::Config;
use crate::endpoints::handlers::{features_handler, get_all_layers};
use crate::reader::local::LocalFeatureReader;
use crate::traits::FeatureReader;
use axum::{Router, routing::get};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// HTTP front for a feature reader: the endpoint a bbox layer's fetch targets.
pub struct FeatureServer {
    config: Config,
    reader: Arc<dyn FeatureReader>,
}

impl FeatureServer {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        if !config.data_folder.is_dir() {
            anyhow::bail!("Data folder {:?} does not exist", config.data_folder);
        }
        let reader: Arc<dyn FeatureReader> = Arc::new(LocalFeatureReader::new(&config.data_folder));
        Ok(Self { config, reader })
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/layers", get(get_all_layers))
            .route("/features/{layer}", get(features_handler))
            .layer(CorsLayer::permissive())
            .with_state(self.reader.clone())
    }

    pub async fn start(self) -> anyhow::Result<()> {
        let app = self.router();
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.port));
        let listener = tokio::net::TcpListener::bind(addr).await?;

        let layers = self.reader.list_layers().await;
        let Some(first) = layers.first() else {
            println!(
                "⚠️ No layers found in the data folder.\n\n\
                Define the root data path with the --data-folder flag and \
                place .geojson files in it, one layer per file."
            );
            return Ok(());
        };

        println!(
            r#"
    🚀 bboxlayer serving on {}

    🗺️ Bbox query (on first layer: {})
       → http://{}/features/{}?bbox=minX,minY,maxX,maxY

    📚 Query for all layers (JSON)
       → http://{}/layers
            "#,
            addr, first.layer, addr, first.layer, addr
        );

        axum::serve(listener, app).await?;
        Ok(())
    }
}
