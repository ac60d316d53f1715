use crate::models::layer::{DEFAULT_PADDING, LayerOptions, ZoomRange};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub data_folder: PathBuf,
    pub port: u16,
    pub padding: f64,
    pub viewport: (u32, u32),
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_folder: PathBuf::from("data"),
            port: 8000,
            padding: DEFAULT_PADDING,
            viewport: (1024, 768),
        }
    }
}

impl Config {
    /// Options for a layer gated to `zoom`, padded by the configured ratio.
    pub fn layer_options(&self, zoom: ZoomRange) -> LayerOptions {
        LayerOptions {
            zoom,
            padding: self.padding,
        }
    }
}
