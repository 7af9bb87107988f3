//! Serializable projection of the measurement list.
//!
//! Snapshots back undo/redo and are the export format. They carry only
//! id, kind, name, points and colour: no visibility, no preview state.

use bevy::log::warn;
use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

use super::kind::PrimitiveKind;
use super::primitive::{PrimitiveId, Rgb};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    pub x: f32,
    pub y: f32,
}

impl From<Vec2> for PointRecord {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<PointRecord> for Vec2 {
    fn from(p: PointRecord) -> Self {
        Vec2::new(p.x, p.y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimitiveRecord {
    pub id: PrimitiveId,
    #[serde(alias = "type")]
    pub kind: PrimitiveKind,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub points: Vec<PointRecord>,
    #[serde(default)]
    pub color: Rgb,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    pub primitives: Vec<PrimitiveRecord>,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Lenient parse for imported exports.
    ///
    /// Anything that is not a JSON array yields an empty snapshot; array
    /// elements that do not describe a primitive are skipped.
    pub fn from_json_lenient(json: &str) -> Snapshot {
        let values: Vec<serde_json::Value> = match serde_json::from_str(json) {
            Ok(serde_json::Value::Array(values)) => values,
            Ok(_) => {
                warn!("Measurement import is not a JSON array, treating as empty");
                return Snapshot::default();
            }
            Err(e) => {
                warn!("Failed to parse measurement import: {}", e);
                return Snapshot::default();
            }
        };

        let primitives = values
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| match serde_json::from_value(value) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Skipping malformed measurement #{}: {}", index + 1, e);
                    None
                }
            })
            .collect();

        Snapshot { primitives }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64) -> PrimitiveRecord {
        PrimitiveRecord {
            id: PrimitiveId(id),
            kind: PrimitiveKind::Line,
            name: "Line".to_string(),
            points: vec![PointRecord { x: 0.0, y: 0.0 }, PointRecord { x: 3.0, y: 4.0 }],
            color: Rgb(0x00ff00),
        }
    }

    #[test]
    fn test_export_shape() {
        let snapshot = Snapshot {
            primitives: vec![record(3)],
        };
        let json = snapshot.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let first = &value[0];
        assert_eq!(first["id"], 3);
        assert_eq!(first["kind"], "line");
        assert_eq!(first["points"][1]["x"], 3.0);
        assert_eq!(first["color"], 0x00ff00);
        assert!(first.get("visible").is_none());
    }

    #[test]
    fn test_export_parses_back() {
        let snapshot = Snapshot {
            primitives: vec![record(1), record(2)],
        };
        let parsed = Snapshot::from_json_lenient(&snapshot.to_json().unwrap());
        assert_eq!(parsed, snapshot);
    }

    #[test]
    fn test_accepts_type_field() {
        let json = r#"[{"id": 9, "type": "circle", "points": [{"x": 1, "y": 2}]}]"#;
        let parsed = Snapshot::from_json_lenient(json);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed.primitives[0].kind, PrimitiveKind::Circle);
        assert_eq!(parsed.primitives[0].color, Rgb::default());
        assert!(parsed.primitives[0].name.is_empty());
    }

    #[test]
    fn test_malformed_input_is_empty() {
        assert!(Snapshot::from_json_lenient("not json").is_empty());
        assert!(Snapshot::from_json_lenient("null").is_empty());
        assert!(Snapshot::from_json_lenient("{\"id\": 1}").is_empty());
    }

    #[test]
    fn test_malformed_elements_are_skipped() {
        let json = r#"[{"id": 1, "kind": "hexagon"}, {"id": 2, "kind": "point"}, 5]"#;
        let parsed = Snapshot::from_json_lenient(json);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed.primitives[0].id, PrimitiveId(2));
    }
}
