//! End-to-end tests of the mosaic pipeline through the public API.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use flate2::write::GzEncoder;
use flate2::Compression;
use serde_json::{json, Value};

use bagmosaic::citymodel::{CityModel, Vertices};
use bagmosaic::merge::merge;
use bagmosaic::normalize::{TileError, TileNormalizer};
use bagmosaic::parallel::ParallelProcessor;
use bagmosaic::pipeline::{MosaicPipeline, PipelineConfig, PipelineError, TileStatus};
use bagmosaic::shift::{shift, Origin};
use bagmosaic::source::{FetchError, HttpClient, HttpTileSource, TileIndex, WfsTileIndex};
use bagmosaic::tile::{BoundingBox, TileId, TileInput, TileRecord};

// ============================================================================
// Fixtures
// ============================================================================

/// One building with one part and a square of four vertices at elevation `z`.
fn tile(building: &str, ground: Option<f64>, z: i64) -> Value {
    let part = format!("{}-0", building);
    let attributes = match ground {
        Some(h) => json!({"h_maaiveld": h}),
        None => json!({}),
    };
    json!({
        "type": "CityJSON",
        "version": "1.1",
        "transform": {"scale": [0.01, 0.01, 0.01], "translate": [0.0, 0.0, 0.0]},
        "CityObjects": {
            building: {"type": "Building", "attributes": attributes, "children": [part.clone()]},
            part: {
                "type": "BuildingPart",
                "parents": [building],
                "geometry": [
                    {"type": "MultiSurface", "lod": "1.2", "boundaries": [[[0, 1, 2]]]},
                    {"type": "MultiSurface", "lod": "2.2", "boundaries": [[[0, 1, 2, 3]]]}
                ]
            }
        },
        "vertices": [[0, 0, z], [100, 0, z], [100, 100, z], [0, 100, z]]
    })
}

fn write_tile(dir: &Path, id: &str, value: &Value) -> TileInput {
    let path = dir.join(format!("{}.json", id));
    fs::write(&path, serde_json::to_vec(value).unwrap()).unwrap();
    TileInput::new(TileId::new(id), path)
}

fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

fn quantized_z(model: &CityModel) -> Vec<i64> {
    match &model.vertices {
        Vertices::Quantized { points, .. } => points.iter().map(|p| p[2]).collect(),
        Vertices::Real(_) => panic!("expected a quantized tile"),
    }
}

fn assert_indices_valid(model: &CityModel) {
    let len = model.vertices.len();
    for (id, object) in &model.objects {
        for geometry in &object.geometry {
            geometry.boundaries.for_each_index(|i| {
                assert!(i < len, "{} references vertex {} of {}", id, i, len)
            });
        }
    }
}

/// Serves canned bodies by URL substring and records requests.
#[derive(Default)]
struct CannedHttp {
    bodies: HashMap<String, Vec<u8>>,
    requests: Mutex<Vec<String>>,
}

impl CannedHttp {
    fn with(mut self, pattern: &str, body: Vec<u8>) -> Self {
        self.bodies.insert(pattern.to_string(), body);
        self
    }
}

impl HttpClient for CannedHttp {
    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.bodies
            .iter()
            .find(|(pattern, _)| url.contains(pattern.as_str()))
            .map(|(_, body)| body.clone())
            .ok_or_else(|| FetchError::HttpError(format!("HTTP 404 from {}", url)))
    }
}

fn footprint(x: f64, y: f64) -> Vec<[f64; 2]> {
    vec![[x, y], [x + 1000.0, y], [x + 1000.0, y + 1000.0], [x, y + 1000.0], [x, y]]
}

fn index_response(ids: &[&str]) -> Vec<u8> {
    let features: Vec<Value> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let ring: Vec<Vec<f64>> = footprint(i as f64 * 1000.0, 0.0)
                .into_iter()
                .map(|p| p.to_vec())
                .collect();
            json!({
                "type": "Feature",
                "properties": {"tile_id": id},
                "geometry": {"type": "Polygon", "coordinates": [ring]}
            })
        })
        .collect();
    serde_json::to_vec(&json!({"type": "FeatureCollection", "features": features})).unwrap()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_two_tiles_end_to_end() {
    let temp = tempfile::tempdir().unwrap();
    let inputs = vec![
        write_tile(temp.path(), "A", &tile("B1", Some(2.0), 400)),
        write_tile(temp.path(), "B", &tile("B2", Some(5.0), 700)),
    ];

    let outcomes = ParallelProcessor::new(2)
        .normalize_all(&inputs, &TileNormalizer::default())
        .unwrap();
    let models: Vec<CityModel> = outcomes.into_iter().map(|o| o.result.unwrap()).collect();

    // bases 200 and 500 in vertex units
    assert_eq!(quantized_z(&models[0]), vec![200; 4]);
    assert_eq!(quantized_z(&models[1]), vec![200; 4]);

    let mut merged = merge(models).unwrap();
    shift(&mut merged, Origin::new(0.0, 0.0));

    assert_eq!(merged.buildings().count(), 2);
    assert_eq!(merged.vertices.len(), 8);
    assert!(merged.transform().is_none());
    let points = merged.vertices.clone().into_real();
    for p in &points {
        // 200 vertex units at scale 0.01
        assert!((p[2] - 2.0).abs() < 1e-9, "z = {}", p[2]);
    }
    assert_indices_valid(&merged);
}

#[test]
fn test_partial_failure_keeps_order() {
    let temp = tempfile::tempdir().unwrap();
    let inputs = vec![
        write_tile(temp.path(), "1", &tile("B1", Some(1.0), 500)),
        write_tile(temp.path(), "2", &tile("B2", None, 500)),
        write_tile(temp.path(), "3", &tile("B3", Some(2.0), 500)),
    ];

    let outcomes = ParallelProcessor::new(3)
        .normalize_all(&inputs, &TileNormalizer::default())
        .unwrap();

    let ids: Vec<&str> = outcomes.iter().map(|o| o.tile.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert!(matches!(
        outcomes[1].result,
        Err(TileError::MissingAttribute { .. })
    ));
    assert_eq!(quantized_z(outcomes[0].result.as_ref().unwrap()), vec![400; 4]);
    assert_eq!(quantized_z(outcomes[2].result.as_ref().unwrap()), vec![300; 4]);
}

#[test]
fn test_merge_of_one_model_is_identity() {
    let temp = tempfile::tempdir().unwrap();
    let input = write_tile(temp.path(), "1", &tile("B1", Some(1.0), 500));
    let model = TileNormalizer::default().normalize(&input.path).unwrap();

    let merged = merge(vec![model.clone()]).unwrap();

    assert_eq!(merged.objects, model.objects);
    assert_eq!(merged.vertices.clone().into_real(), model.vertices.into_real());
}

#[test]
fn test_normalize_leaves_tile_file_untouched() {
    let temp = tempfile::tempdir().unwrap();
    let input = write_tile(temp.path(), "1", &tile("B1", Some(1.0), 500));
    let before = fs::read(&input.path).unwrap();

    TileNormalizer::default().normalize(&input.path).unwrap();
    TileNormalizer::default().normalize(&input.path).unwrap();

    assert_eq!(fs::read(&input.path).unwrap(), before);
}

#[test]
fn test_run_files_writes_obj_and_script() {
    let temp = tempfile::tempdir().unwrap();
    let inputs = vec![
        write_tile(temp.path(), "A", &tile("B1", Some(2.0), 400)),
        write_tile(temp.path(), "B", &tile("B2", Some(5.0), 700)),
    ];
    let out = temp.path().join("run");

    let summary = MosaicPipeline::new(PipelineConfig::new().with_name("town"))
        .run_files(&inputs, Origin::new(0.5, 0.5), &out)
        .unwrap();

    assert_eq!(summary.succeeded(), 2);
    assert_eq!(summary.merged.objects, 4);
    assert_eq!(summary.exported.vertices, 8);
    assert_eq!(summary.exported.faces, 2);

    let obj = fs::read_to_string(out.join("town.obj")).unwrap();
    assert_eq!(obj.lines().filter(|l| l.starts_with("v ")).count(), 8);
    assert!(obj.contains("\no B1-0\n"));
    assert!(obj.contains("\no B2-0\n"));
    assert!(obj.contains("\nf 5 6 7 8\n"));
    // shifted by the origin
    assert!(obj.contains("\nv -0.5 -0.5 2\n"));

    let script = fs::read_to_string(out.join("town_import.py")).unwrap();
    assert!(script.contains("town.obj"));
    assert!(script.contains("town.blend"));
}

#[test]
fn test_run_over_http_skips_missing_tile() {
    let temp = tempfile::tempdir().unwrap();
    let client = std::sync::Arc::new(
        CannedHttp::default()
            .with("GetFeature", index_response(&["10", "11", "12"]))
            .with(
                "_10.json.gz",
                gzip(&serde_json::to_vec(&tile("B10", Some(1.0), 300)).unwrap()),
            )
            .with(
                "_12.json.gz",
                gzip(&serde_json::to_vec(&tile("B12", Some(1.0), 300)).unwrap()),
            ),
    );
    let index = WfsTileIndex::new(client.clone());
    let source = HttpTileSource::new(client.clone());

    let summary = MosaicPipeline::new(PipelineConfig::new().with_threads(2))
        .run(&index, &source, Origin::new(1500.0, 500.0), 600.0, temp.path())
        .unwrap();

    let statuses: Vec<(&str, bool)> = summary
        .tiles
        .iter()
        .map(|r| (r.tile.as_str(), r.status.is_ok()))
        .collect();
    assert_eq!(statuses, vec![("10", true), ("11", false), ("12", true)]);
    assert!(matches!(summary.tiles[1].status, TileStatus::FetchFailed(_)));

    assert!(temp.path().join("10.json").exists());
    assert!(!temp.path().join("11.json").exists());
    assert!(temp.path().join("mosaic.obj").exists());

    let requests = client.requests.lock().unwrap();
    assert!(requests[0].contains("bbox=900,-100,2100,1100"));
}

#[test]
fn test_run_files_reads_gzipped_tiles() {
    let temp = tempfile::tempdir().unwrap();
    let plain = write_tile(temp.path(), "1", &tile("B1", Some(1.0), 500));
    let gz_path = temp.path().join("3dbag_v210908_fd2cee53_2.json.gz");
    fs::write(
        &gz_path,
        gzip(&serde_json::to_vec(&tile("B2", Some(1.0), 500)).unwrap()),
    )
    .unwrap();
    let inputs = vec![plain, TileInput::from_path(&gz_path)];

    let summary = MosaicPipeline::new(PipelineConfig::new())
        .run_files(&inputs, Origin::default(), &temp.path().join("run"))
        .unwrap();

    assert_eq!(summary.tiles[1].tile.as_str(), "3dbag_v210908_fd2cee53_2");
    assert_eq!(summary.succeeded(), 2);
    assert_eq!(summary.merged.vertices, 8);
}

#[test]
fn test_too_few_tiles_stops_before_export() {
    let temp = tempfile::tempdir().unwrap();
    let inputs = vec![
        write_tile(temp.path(), "1", &tile("B1", None, 500)),
        write_tile(temp.path(), "2", &tile("B2", Some(1.0), 500)),
    ];
    let out = temp.path().join("run");

    let err = MosaicPipeline::new(PipelineConfig::new().with_min_tiles(2))
        .run_files(&inputs, Origin::default(), &out)
        .unwrap_err();

    assert!(matches!(
        err.cause(),
        PipelineError::TooFewTiles {
            succeeded: 1,
            required: 2
        }
    ));
    let statuses: Vec<_> = err.tiles().iter().map(|r| r.status.is_ok()).collect();
    assert_eq!(statuses, vec![false, true]);
    assert!(!out.join("mosaic.obj").exists());
}

#[test]
fn test_fixed_index_with_neighbours() {
    struct Fixed(Vec<TileRecord>);
    impl TileIndex for Fixed {
        fn lookup(&self, bbox: &BoundingBox) -> Result<Vec<TileRecord>, FetchError> {
            Ok(self
                .0
                .iter()
                .filter(|t| t.bounds().is_some_and(|b| b.intersects(bbox)))
                .cloned()
                .collect())
        }
        fn all(&self) -> Result<Vec<TileRecord>, FetchError> {
            Ok(self.0.clone())
        }
    }

    let index = Fixed(vec![
        TileRecord::new(TileId::new("a"), footprint(0.0, 0.0)),
        TileRecord::new(TileId::new("b"), footprint(1000.0, 0.0)),
        TileRecord::new(TileId::new("c"), footprint(5000.0, 0.0)),
    ]);

    let near = index.lookup(&BoundingBox::around(500.0, 500.0, 100.0)).unwrap();
    assert_eq!(near.len(), 1);

    let adjacency = bagmosaic::source::neighbours(&index.all().unwrap());
    let mut csv = Vec::new();
    bagmosaic::source::write_neighbours_csv(&adjacency, "{TID}.json", &mut csv).unwrap();
    assert_eq!(String::from_utf8(csv).unwrap(), "a.json;b.json\nb.json;a.json\nc.json\n");
}
