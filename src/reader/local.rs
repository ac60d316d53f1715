use crate::error::ReaderError;
use crate::models::{geometry::GeometryExtent, layer::LayerSummary};
use crate::traits::FeatureReader;
use async_trait::async_trait;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{info, warn};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
struct IndexedFeature {
    extent: GeometryExtent,
    feature: Feature,
}

/// GeoJSON files under a folder, one layer per file stem, queryable by bbox.
#[derive(Debug, Default)]
pub struct LocalFeatureReader {
    layers: HashMap<String, Vec<IndexedFeature>>,
}

impl LocalFeatureReader {
    pub fn new(root: &Path) -> Self {
        // 1) Gather all .geojson/.json files under root
        let entries: Vec<_> = WalkDir::new(root)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .filter(|e| {
                e.path()
                    .extension()
                    .and_then(|s| s.to_str())
                    .map(|ext| ext.eq_ignore_ascii_case("geojson") || ext.eq_ignore_ascii_case("json"))
                    .unwrap_or(false)
            })
            .collect();

        // 2) Set up the progress bar
        let pb = ProgressBar::new(entries.len() as u64);
        if let Ok(style) = ProgressStyle::default_bar().template("{msg}\n[{bar:40.cyan/blue}] {pos}/{len}") {
            pb.set_style(style.progress_chars("█▇▆▅▄▃▂▁  "));
        }

        // 3) Parse each file, merging files that share a stem
        let mut reader = LocalFeatureReader::default();
        for entry in entries {
            let path = entry.path();
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("<unknown>")
                .to_string();
            pb.set_message(format!("Reading {:<30}", stem));

            match load_file(path) {
                Ok(geojson) => reader.insert(&stem, geojson),
                Err(err) => warn!("Skipping {:?}: {}", path, err),
            }
            pb.inc(1);
        }
        pb.finish_and_clear();

        let total: usize = reader.layers.values().map(Vec::len).sum();
        info!(layers = reader.layers.len(), features = total, root = ?root, "feature data loaded");
        reader
    }

    /// Build a reader from already parsed layers.
    pub fn from_layers<I, S>(layers: I) -> Self
    where
        I: IntoIterator<Item = (S, GeoJson)>,
        S: AsRef<str>,
    {
        let mut reader = LocalFeatureReader::default();
        for (name, geojson) in layers {
            reader.insert(name.as_ref(), geojson);
        }
        reader
    }

    pub fn layer_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.layers.keys().cloned().collect();
        names.sort_by_key(|n| n.to_lowercase());
        names
    }

    fn insert(&mut self, layer: &str, geojson: GeoJson) {
        let indexed = into_features(geojson).into_iter().filter_map(|feature| {
            let extent = feature.geometry.as_ref().and_then(geometry_extent)?;
            Some(IndexedFeature { extent, feature })
        });
        self.layers.entry(layer.to_string()).or_default().extend(indexed);
    }
}

#[async_trait]
impl FeatureReader for LocalFeatureReader {
    async fn list_layers(&self) -> Vec<LayerSummary> {
        let mut result: Vec<LayerSummary> = self
            .layers
            .iter()
            .map(|(layer, features)| LayerSummary {
                layer: layer.clone(),
                features: features.len(),
                extent: features.iter().map(|f| f.extent).reduce(|a, b| a.union(&b)),
            })
            .collect();

        // Sort the layers alphabetically case insensitive
        result.sort_by(|a, b| a.layer.to_lowercase().cmp(&b.layer.to_lowercase()));
        result
    }

    async fn query(&self, layer: &str, extent: &GeometryExtent) -> Result<GeoJson, ReaderError> {
        let features = self
            .layers
            .get(layer)
            .ok_or_else(|| ReaderError::LayerNotFound(layer.to_string()))?;

        let hits = features
            .iter()
            .filter(|f| f.extent.intersects(extent))
            .map(|f| f.feature.clone())
            .collect();

        Ok(GeoJson::FeatureCollection(FeatureCollection {
            bbox: None,
            features: hits,
            foreign_members: None,
        }))
    }
}

fn load_file(path: &Path) -> Result<GeoJson, ReaderError> {
    let content = fs::read_to_string(path).map_err(|source| ReaderError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    content
        .parse::<GeoJson>()
        .map_err(|source| ReaderError::InvalidGeoJson {
            path: path.to_path_buf(),
            source,
        })
}

fn into_features(geojson: GeoJson) -> Vec<Feature> {
    match geojson {
        GeoJson::FeatureCollection(fc) => fc.features,
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::Geometry(geometry) => vec![Feature::from(geometry)],
    }
}

fn geometry_extent(geometry: &Geometry) -> Option<GeometryExtent> {
    let mut positions = Vec::new();
    collect_positions(&geometry.value, &mut positions);
    GeometryExtent::from_positions(positions)
}

fn collect_positions<'a>(value: &'a Value, out: &mut Vec<&'a [f64]>) {
    match value {
        Value::Point(p) => out.push(p.as_slice()),
        Value::MultiPoint(ps) | Value::LineString(ps) => out.extend(ps.iter().map(Vec::as_slice)),
        Value::MultiLineString(lines) | Value::Polygon(lines) => {
            out.extend(lines.iter().flatten().map(Vec::as_slice))
        }
        Value::MultiPolygon(polygons) => {
            out.extend(polygons.iter().flatten().flatten().map(Vec::as_slice))
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                collect_positions(&g.value, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const POINTS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"name": "dam"},
             "geometry": {"type": "Point", "coordinates": [4.8932, 52.3731]}},
            {"type": "Feature", "properties": {"name": "zuid"},
             "geometry": {"type": "Point", "coordinates": [4.8730, 52.3390]}},
            {"type": "Feature", "properties": {"name": "nowhere"}, "geometry": null}
        ]
    }"#;

    const POLYGON: &str = r#"{
        "type": "Feature",
        "properties": {"name": "block"},
        "geometry": {"type": "Polygon", "coordinates": [[
            [4.90, 52.37], [4.91, 52.37], [4.91, 52.38], [4.90, 52.38], [4.90, 52.37]
        ]]}
    }"#;

    fn write(dir: &Path, name: &str, content: &str) {
        let mut file = fs::File::create(dir.join(name)).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    fn names(geojson: GeoJson) -> Vec<String> {
        let GeoJson::FeatureCollection(fc) = geojson else {
            panic!("expected a feature collection");
        };
        fc.features
            .iter()
            .filter_map(|f| f.property("name").and_then(|v| v.as_str()).map(String::from))
            .collect()
    }

    #[tokio::test]
    async fn test_loads_every_geojson_file_under_root() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        write(dir.path(), "points.geojson", POINTS);
        write(&dir.path().join("nested"), "polygons.json", POLYGON);
        write(dir.path(), "broken.geojson", "{ not geojson");
        write(dir.path(), "readme.txt", "ignored");

        let reader = LocalFeatureReader::new(dir.path());
        assert_eq!(reader.layer_names(), vec!["points", "polygons"]);

        let layers = reader.list_layers().await;
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].layer, "points");
        // the feature without geometry is never indexed
        assert_eq!(layers[0].features, 2);
        assert_eq!(
            layers[1].extent,
            Some(GeometryExtent::from((4.90, 52.37, 4.91, 52.38)))
        );
    }

    #[tokio::test]
    async fn test_query_returns_intersecting_features() {
        let reader = LocalFeatureReader::from_layers([
            ("points", POINTS.parse::<GeoJson>().unwrap()),
            ("polygons", POLYGON.parse::<GeoJson>().unwrap()),
        ]);

        let centre = GeometryExtent::from((4.88, 52.36, 4.905, 52.38));
        let hits = reader.query("points", &centre).await.unwrap();
        assert_eq!(names(hits), vec!["dam"]);

        // the polygon only pokes into the viewport
        let hits = reader.query("polygons", &centre).await.unwrap();
        assert_eq!(names(hits), vec!["block"]);

        let elsewhere = GeometryExtent::from((5.0, 53.0, 5.1, 53.1));
        assert!(names(reader.query("points", &elsewhere).await.unwrap()).is_empty());
    }

    #[tokio::test]
    async fn test_unknown_layer() {
        let reader = LocalFeatureReader::default();
        let extent = GeometryExtent::from((0.0, 0.0, 1.0, 1.0));
        assert!(matches!(
            reader.query("missing", &extent).await,
            Err(ReaderError::LayerNotFound(name)) if name == "missing"
        ));
    }

    #[tokio::test]
    async fn test_bare_geometry_is_one_feature() {
        let geometry: GeoJson = r#"{"type": "Point", "coordinates": [4.9, 52.37]}"#
            .parse()
            .unwrap();
        let reader = LocalFeatureReader::from_layers([("pin", geometry)]);
        let layers = reader.list_layers().await;
        assert_eq!(layers[0].features, 1);
        assert_eq!(
            layers[0].extent,
            Some(GeometryExtent::from((4.9, 52.37, 4.9, 52.37)))
        );
    }

    #[test]
    fn test_geometry_collection_extent() {
        let geometry = Geometry::new(Value::GeometryCollection(vec![
            Geometry::new(Value::Point(vec![1.0, 5.0])),
            Geometry::new(Value::LineString(vec![vec![-2.0, 0.0], vec![3.0, 1.0]])),
        ]));
        assert_eq!(
            geometry_extent(&geometry),
            Some(GeometryExtent::from((-2.0, 0.0, 3.0, 5.0)))
        );
    }
}
