//! Scene loading: format detection, deserialization, and resolution of
//! placements against prefabs.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use gridlink_core::device::{DeviceSpec, Position};
use gridlink_core::fixed::{Fixed64, checked_f64_to_fixed64, fixed64_to_f64};
use serde::de::DeserializeOwned;

use crate::scene::{Prefab, Scene};
use crate::schema::{PositionData, PrefabData, SceneData};

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur while loading a scene.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A name reference could not be resolved.
    #[error("unresolved {expected_kind} reference '{name}' in {file}")]
    UnresolvedRef {
        file: PathBuf,
        name: String,
        expected_kind: &'static str,
    },

    /// A duplicate name was found.
    #[error("duplicate name '{name}' in {file}")]
    DuplicateName { file: PathBuf, name: String },

    /// A numeric field is out of its allowed range.
    #[error("invalid {field} for '{name}' in {file}: {value}")]
    InvalidValue {
        file: PathBuf,
        name: String,
        field: &'static str,
        value: f64,
    },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported scene file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

fn deserialize<T: DeserializeOwned>(content: &str, format: Format, file: &Path) -> Result<T, DataLoadError> {
    let parsed = match format {
        Format::Ron => ron::from_str(content).map_err(|e| e.to_string()),
        Format::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        Format::Toml => toml::from_str(content).map_err(|e| e.to_string()),
    };
    parsed.map_err(|detail| DataLoadError::Parse {
        file: file.to_path_buf(),
        detail,
    })
}

// ===========================================================================
// Loading
// ===========================================================================

/// Read a scene file and spawn its devices into a fresh registry.
pub fn load_scene(path: &Path) -> Result<Scene, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    parse_scene(&content, format, path)
}

/// Parse scene text already in memory. `origin` names the source in errors.
pub fn parse_scene(content: &str, format: Format, origin: &Path) -> Result<Scene, DataLoadError> {
    let data: SceneData = deserialize(content, format, origin)?;

    let prefabs = resolve_prefabs(&data.prefabs, origin)?;
    let mut scene = Scene::new(prefabs);

    for placement in &data.devices {
        let spec = scene
            .prefab(&placement.prefab)
            .ok_or_else(|| DataLoadError::UnresolvedRef {
                file: origin.to_path_buf(),
                name: placement.prefab.clone(),
                expected_kind: "prefab",
            })?
            .spec;

        if let Some(label) = placement.label.as_ref().filter(|l| scene.has_label(l)) {
            return Err(DataLoadError::DuplicateName {
                file: origin.to_path_buf(),
                name: label.clone(),
            });
        }

        let position = resolve_position(&placement.position, &placement.prefab, origin)?;
        let id = scene
            .registry
            .spawn(spec, position)
            .map_err(|_| invalid(origin, &placement.prefab, "range", fixed64_to_f64(spec.range)))?;
        if let Some(label) = &placement.label {
            scene.insert_label(label.clone(), id);
        }
    }

    log::info!(
        "loaded scene {}: {} prefabs, {} devices",
        origin.display(),
        data.prefabs.len(),
        scene.registry.len()
    );
    Ok(scene)
}

// ===========================================================================
// Resolution helpers
// ===========================================================================

fn resolve_prefabs(data: &[PrefabData], file: &Path) -> Result<Vec<Prefab>, DataLoadError> {
    let mut seen = HashSet::new();
    let mut prefabs = Vec::with_capacity(data.len());

    for prefab in data {
        if !seen.insert(prefab.name.as_str()) {
            return Err(DataLoadError::DuplicateName {
                file: file.to_path_buf(),
                name: prefab.name.clone(),
            });
        }

        let range = to_fixed(prefab.range, "range", &prefab.name, file)?;
        if range < Fixed64::ZERO {
            return Err(invalid(file, &prefab.name, "range", prefab.range));
        }

        prefabs.push(Prefab {
            name: prefab.name.clone(),
            spec: DeviceSpec::new(prefab.kind.into())
                .with_range(range)
                .with_production(prefab.production)
                .with_consumption(prefab.consumption),
        });
    }

    Ok(prefabs)
}

fn resolve_position(data: &PositionData, name: &str, file: &Path) -> Result<Position, DataLoadError> {
    Ok(Position::new(
        to_fixed(data.x, "x coordinate", name, file)?,
        to_fixed(data.y, "y coordinate", name, file)?,
        to_fixed(data.z, "z coordinate", name, file)?,
    ))
}

fn to_fixed(value: f64, field: &'static str, name: &str, file: &Path) -> Result<Fixed64, DataLoadError> {
    checked_f64_to_fixed64(value).ok_or_else(|| invalid(file, name, field, value))
}

fn invalid(file: &Path, name: &str, field: &'static str, value: f64) -> DataLoadError {
    DataLoadError::InvalidValue {
        file: file.to_path_buf(),
        name: name.to_string(),
        field,
        value,
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use gridlink_core::device::DeviceKind;
    use gridlink_core::test_utils::*;
    use std::fs;

    const RON_SCENE: &str = r#"(
        prefabs: [
            (name: "plant", kind: generator, range: 20.0, production: 10),
            (name: "pole", kind: transmitter, range: 20.0),
            (name: "house", kind: consumer, range: 20.0, consumption: 5),
        ],
        devices: [
            (prefab: "plant", position: (x: 0.0, y: 0.0, z: 0.0), label: Some("plant")),
            (prefab: "pole", position: (x: 2.5, y: 2.0, z: 0.0)),
            (prefab: "house", position: (x: 5.0, y: 0.0, z: 0.0), label: Some("house")),
        ],
    )"#;

    fn origin() -> &'static Path {
        Path::new("scene.ron")
    }

    /// Create a temporary directory with a unique name for test isolation.
    fn make_test_dir(suffix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "gridlink_data_test_{suffix}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    // -----------------------------------------------------------------------
    // detect_format
    // -----------------------------------------------------------------------

    #[test]
    fn detect_format_by_extension() {
        assert_eq!(detect_format(Path::new("a.ron")).unwrap(), Format::Ron);
        assert_eq!(detect_format(Path::new("a.toml")).unwrap(), Format::Toml);
        assert_eq!(detect_format(Path::new("a.json")).unwrap(), Format::Json);
    }

    #[test]
    fn detect_format_unsupported() {
        let err = detect_format(Path::new("scene.yaml")).unwrap_err();
        assert!(matches!(err, DataLoadError::UnsupportedFormat { .. }));
        assert!(detect_format(Path::new("scene")).is_err());
    }

    // -----------------------------------------------------------------------
    // parse_scene
    // -----------------------------------------------------------------------

    #[test]
    fn parse_ron_scene() {
        let scene = parse_scene(RON_SCENE, Format::Ron, origin()).unwrap();
        assert_eq!(scene.registry.len(), 3);
        assert_eq!(
            scene.prefab_names().collect::<Vec<_>>(),
            vec!["plant", "pole", "house"]
        );

        let house = scene.device("house").unwrap();
        let device = scene.registry.get(house).unwrap();
        assert_eq!(device.kind(), DeviceKind::Consumer);
        assert_eq!(device.range(), fixed(20.0));
        assert_eq!(device.consumption(), 5);
        assert_eq!(device.position(), at(5.0));
    }

    #[test]
    fn parse_json_scene_with_defaults() {
        let json = r#"{
            "prefabs": [{"name": "pole", "kind": "transmitter"}],
            "devices": [{"prefab": "pole", "position": {"x": 1.0}, "label": "p"}]
        }"#;
        let scene = parse_scene(json, Format::Json, Path::new("scene.json")).unwrap();
        let pole = scene.registry.get(scene.device("p").unwrap()).unwrap();
        assert_eq!(pole.range(), DeviceSpec::DEFAULT_RANGE);
        assert_eq!(pole.production(), 0);
        assert_eq!(pole.position(), at(1.0));
    }

    #[test]
    fn parse_toml_scene() {
        let toml = r#"
            [[prefabs]]
            name = "plant"
            kind = "generator"
            production = 7

            [[devices]]
            prefab = "plant"
            label = "g"
            position = { x = 4.0, y = 0.0, z = -2.0 }
        "#;
        let scene = parse_scene(toml, Format::Toml, Path::new("scene.toml")).unwrap();
        let g = scene.registry.get(scene.device("g").unwrap()).unwrap();
        assert_eq!(g.kind(), DeviceKind::Generator);
        assert_eq!(g.production(), 7);
        assert_eq!(g.position(), pos(4.0, 0.0, -2.0));
    }

    #[test]
    fn parse_error_names_file() {
        let err = parse_scene("(prefabs: [", Format::Ron, origin()).unwrap_err();
        match err {
            DataLoadError::Parse { file, detail } => {
                assert_eq!(file, PathBuf::from("scene.ron"));
                assert!(!detail.is_empty());
            }
            other => panic!("expected Parse, got {other:?}"),
        }
    }

    // -----------------------------------------------------------------------
    // Resolution errors
    // -----------------------------------------------------------------------

    #[test]
    fn unknown_prefab_is_unresolved() {
        let ron = r#"(prefabs: [], devices: [(prefab: "ghost")])"#;
        let err = parse_scene(ron, Format::Ron, origin()).unwrap_err();
        match err {
            DataLoadError::UnresolvedRef {
                name,
                expected_kind,
                ..
            } => {
                assert_eq!(name, "ghost");
                assert_eq!(expected_kind, "prefab");
            }
            other => panic!("expected UnresolvedRef, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_prefab_name() {
        let ron = r#"(prefabs: [
            (name: "pole", kind: transmitter),
            (name: "pole", kind: consumer),
        ])"#;
        let err = parse_scene(ron, Format::Ron, origin()).unwrap_err();
        assert!(matches!(err, DataLoadError::DuplicateName { ref name, .. } if name == "pole"));
    }

    #[test]
    fn duplicate_label() {
        let ron = r#"(
            prefabs: [(name: "pole", kind: transmitter)],
            devices: [
                (prefab: "pole", label: Some("a")),
                (prefab: "pole", position: (x: 1.0), label: Some("a")),
            ],
        )"#;
        let err = parse_scene(ron, Format::Ron, origin()).unwrap_err();
        assert!(matches!(err, DataLoadError::DuplicateName { ref name, .. } if name == "a"));
    }

    #[test]
    fn negative_range_is_invalid() {
        let ron = r#"(prefabs: [(name: "pole", kind: transmitter, range: -1.0)])"#;
        let err = parse_scene(ron, Format::Ron, origin()).unwrap_err();
        match err {
            DataLoadError::InvalidValue { name, field, value, .. } => {
                assert_eq!(name, "pole");
                assert_eq!(field, "range");
                assert_eq!(value, -1.0);
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn coordinate_outside_fixed_range_is_invalid() {
        let ron = r#"(
            prefabs: [(name: "pole", kind: transmitter)],
            devices: [(prefab: "pole", position: (x: 1000000000000.0))],
        )"#;
        let err = parse_scene(ron, Format::Ron, origin()).unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::InvalidValue {
                field: "x coordinate",
                ..
            }
        ));
    }

    // -----------------------------------------------------------------------
    // load_scene
    // -----------------------------------------------------------------------

    #[test]
    fn load_scene_from_disk() {
        let dir = make_test_dir("load");
        let path = dir.join("town.ron");
        fs::write(&path, RON_SCENE).unwrap();

        let scene = load_scene(&path).unwrap();
        assert_eq!(scene.registry.len(), 3);
        assert!(scene.device("plant").is_some());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_scene_missing_file_is_io() {
        let err = load_scene(Path::new("/nonexistent/gridlink/scene.ron")).unwrap_err();
        assert!(matches!(err, DataLoadError::Io(_)));
    }

    #[test]
    fn load_scene_checks_extension_first() {
        let err = load_scene(Path::new("/nonexistent/scene.txt")).unwrap_err();
        assert!(matches!(err, DataLoadError::UnsupportedFormat { .. }));
    }

    #[test]
    fn error_display_messages() {
        let err = DataLoadError::UnresolvedRef {
            file: PathBuf::from("town.ron"),
            name: "ghost".into(),
            expected_kind: "prefab",
        };
        assert_eq!(err.to_string(), "unresolved prefab reference 'ghost' in town.ron");

        let err = DataLoadError::InvalidValue {
            file: PathBuf::from("town.ron"),
            name: "pole".into(),
            field: "range",
            value: -2.0,
        };
        assert_eq!(err.to_string(), "invalid range for 'pole' in town.ron: -2");
    }
}
