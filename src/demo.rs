//! Example wiring: named layers behind visibility toggles.
//!
//! Mirrors a map page with one checkbox per layer. Flipping a toggle updates
//! the flag and re-syncs the map, which adds every visible layer and removes
//! every hidden one.

use crate::config::Config;
use crate::layer::GeoJsonBboxLayer;
use crate::map::{LatLng, SimulatedMap};
use crate::models::{event::MapEvent, layer::ZoomRange};
use crate::reader::{ReaderFetch, local::LocalFeatureReader};
use crate::traits::{FeatureReader, HostMap, MapLayer, MemorySink};
use crate::utils::status::print_layer_summary;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Start of the scripted session: central Amsterdam.
pub const START_VIEW: LatLng = LatLng {
    lat: 52.3724724,
    lng: 4.9006668,
};
pub const START_ZOOM: f64 = 18.0;

struct LayerEntry {
    layer: Arc<dyn MapLayer>,
    visible: bool,
}

/// One row of the layer summary table.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerRow {
    pub name: String,
    pub visible: bool,
    pub zoom: String,
    pub rendered: usize,
}

#[derive(Default)]
pub struct LayerToggles {
    entries: BTreeMap<String, LayerEntry>,
}

impl LayerToggles {
    /// Register a layer, possibly after the map is already running.
    pub fn register(&mut self, name: &str, layer: Arc<dyn MapLayer>, visible: bool) {
        self.entries
            .insert(name.to_string(), LayerEntry { layer, visible });
    }

    /// Returns false when no layer goes by `name`.
    pub fn set_visible(&mut self, name: &str, visible: bool) -> bool {
        match self.entries.get_mut(name) {
            Some(entry) => {
                entry.visible = visible;
                true
            }
            None => false,
        }
    }

    pub fn is_visible(&self, name: &str) -> Option<bool> {
        self.entries.get(name).map(|e| e.visible)
    }

    /// Checkbox change: flip the flag and re-sync the map.
    pub fn toggle(&mut self, map: &Arc<SimulatedMap>, name: &str, visible: bool) -> bool {
        let known = self.set_visible(name, visible);
        if known {
            self.update_map_layers(map);
        }
        known
    }

    pub fn update_map_layers(&self, map: &Arc<SimulatedMap>) {
        for (name, entry) in &self.entries {
            if entry.visible {
                map.add_layer(name, entry.layer.clone());
            } else {
                map.remove_layer(name);
            }
        }
    }

    pub fn summary_rows(&self) -> Vec<LayerRow> {
        self.entries
            .iter()
            .map(|(name, entry)| LayerRow {
                name: name.clone(),
                visible: entry.visible,
                zoom: entry.layer.zoom_label(),
                rendered: entry.layer.rendered_count(),
            })
            .collect()
    }
}

/// Name of the ungated layer registered partway through the session.
pub const LATE_LAYER: &str = "vanilla";

/// Scripted session over the layers found in `config.data_folder`.
///
/// Every layer is gated to `zoom`. Returns the summary rows of the last step.
pub async fn run_simulation(
    config: &Config,
    zoom: ZoomRange,
    hidden: &[String],
) -> anyhow::Result<Vec<LayerRow>> {
    if !config.data_folder.is_dir() {
        anyhow::bail!("Data folder {:?} does not exist", config.data_folder);
    }
    let reader: Arc<dyn FeatureReader> = Arc::new(LocalFeatureReader::new(&config.data_folder));
    let names: Vec<String> = reader
        .list_layers()
        .await
        .into_iter()
        .map(|l| l.layer)
        .collect();
    if names.is_empty() {
        println!("⚠️ No layers found in {:?}", config.data_folder);
        return Ok(Vec::new());
    }

    let (width, height) = config.viewport;
    let map = SimulatedMap::new(width, height);
    map.set_view(START_VIEW, START_ZOOM);

    let zoom_map = Arc::downgrade(&map);
    map.on(
        MapEvent::ZoomEnd,
        Arc::new(move || {
            if let Some(map) = zoom_map.upgrade() {
                info!(zoom = map.zoom(), "zoom level");
            }
        }),
    );

    let options = config.layer_options(zoom);
    let mut toggles = LayerToggles::default();
    for name in &names {
        let layer = GeoJsonBboxLayer::new(
            options,
            Arc::new(ReaderFetch::new(reader.clone(), name.as_str())),
            Arc::new(MemorySink::new()),
        );
        toggles.register(name, Arc::new(layer), !hidden.contains(name));
    }

    toggles.update_map_layers(&map);
    report(&map, &toggles, "initial view").await;

    map.pan_by(width as f64 / 2.0, 0.0);
    report(&map, &toggles, "pan east half a screen").await;

    map.set_zoom(START_ZOOM - 6.0);
    report(&map, &toggles, "zoom out").await;

    map.set_view(START_VIEW, START_ZOOM);
    report(&map, &toggles, "back to start").await;

    let first = &names[0];
    let visible = toggles.is_visible(first).unwrap_or(false);
    toggles.toggle(&map, first, !visible);
    report(&map, &toggles, &format!("toggle '{}'", first)).await;

    map.refresh();
    report(&map, &toggles, "refresh").await;

    // registered while the map is live, with no zoom gate, then switched on
    let late = GeoJsonBboxLayer::new(
        config.layer_options(ZoomRange::default()),
        Arc::new(ReaderFetch::new(reader.clone(), first.as_str())),
        Arc::new(MemorySink::new()),
    );
    toggles.register(LATE_LAYER, Arc::new(late), false);
    toggles.update_map_layers(&map);
    toggles.toggle(&map, LATE_LAYER, true);
    report(&map, &toggles, &format!("add '{}'", LATE_LAYER)).await;

    Ok(toggles.summary_rows())
}

async fn report(map: &SimulatedMap, toggles: &LayerToggles, step: &str) {
    // let in-flight fetches land before reading the sinks
    tokio::time::sleep(Duration::from_millis(20)).await;
    print_layer_summary(step, map.zoom(), &map.bounds(), &toggles.summary_rows());
}
