// Level snapshot loading
//
// A snapshot is the JSON document exported by the level inspector. Only the
// collision masks and enemy spawns are consumed here; tile art is the
// renderer's business.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use super::LevelError;
use crate::engine::physics::CollisionGrid;

/// Enemy placement authored in the level (row 0 is the top row)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EnemySpawn {
    #[serde(rename = "name")]
    pub enemy_id: String,
    pub row: i32,
    pub col: i32,
}

/// Parsed collision masks and spawns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelSnapshot {
    pub solid: Vec<(i32, i32)>,
    pub water: Vec<(i32, i32)>,
    pub enemies: Vec<EnemySpawn>,
}

impl LevelSnapshot {
    /// Parse a snapshot document
    pub fn parse(json: &str) -> Result<Self, LevelError> {
        let root: Value = serde_json::from_str(json)?;
        let object = root.as_object().ok_or(LevelError::NotAnObject)?;

        let solid = match object.get("solid") {
            Some(value) => parse_tile_entries(value)?,
            None => Vec::new(),
        };
        let water = match object.get("water") {
            Some(value) => parse_tile_entries(value)?,
            None => Vec::new(),
        };
        let enemies = match object.get("enemies") {
            Some(value) => parse_spawns(value)?,
            None => Vec::new(),
        };

        Ok(Self {
            solid,
            water,
            enemies,
        })
    }

    /// Read and parse a snapshot file
    pub fn load(path: &Path) -> Result<Self, LevelError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Read a snapshot file, falling back to an empty level on any failure
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(snapshot) => {
                log::info!(
                    "Level snapshot loaded from {} ({} solid, {} water, {} enemies)",
                    path.display(),
                    snapshot.solid.len(),
                    snapshot.water.len(),
                    snapshot.enemies.len()
                );
                snapshot
            }
            Err(e) => {
                log::error!(
                    "Failed to load level snapshot {}: {}; using empty level",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Build the collision grid for a level of the given size
    pub fn build_grid(&self, rows: usize, cols: usize, tile_size: f32) -> CollisionGrid {
        CollisionGrid::from_masks(rows, cols, tile_size, &self.solid, &self.water)
    }
}

/// Accepts `[[r, c], ...]`, `[{"row": r, "col": c}, ...]` or a flat
/// `[r, c, r, c, ...]` list. Unrecognised entries are skipped and a dangling
/// odd number ends the scan.
fn parse_tile_entries(value: &Value) -> Result<Vec<(i32, i32)>, LevelError> {
    let entries = value.as_array().ok_or(LevelError::ExpectedArray("tile mask"))?;
    let mut tiles = Vec::with_capacity(entries.len());
    let mut iter = entries.iter().peekable();

    while let Some(entry) = iter.next() {
        match entry {
            Value::Array(pair) => {
                if let (Some(row), Some(col)) = (as_index(pair.first()), as_index(pair.get(1))) {
                    tiles.push((row, col));
                }
            }
            Value::Object(fields) => {
                if let (Some(row), Some(col)) =
                    (as_index(fields.get("row")), as_index(fields.get("col")))
                {
                    tiles.push((row, col));
                }
            }
            Value::Number(_) => {
                let Some(row) = as_index(Some(entry)) else {
                    continue;
                };
                match iter.peek().and_then(|next| as_index(Some(next))) {
                    Some(col) => {
                        iter.next();
                        tiles.push((row, col));
                    }
                    None => break,
                }
            }
            _ => {}
        }
    }

    Ok(tiles)
}

fn parse_spawns(value: &Value) -> Result<Vec<EnemySpawn>, LevelError> {
    let entries = value.as_array().ok_or(LevelError::ExpectedArray("enemies"))?;
    Ok(entries
        .iter()
        .filter_map(|entry| match EnemySpawn::deserialize(entry) {
            Ok(spawn) => Some(spawn),
            Err(e) => {
                log::warn!("Skipping malformed enemy spawn {}: {}", entry, e);
                None
            }
        })
        .collect())
}

fn as_index(value: Option<&Value>) -> Option<i32> {
    value
        .and_then(Value::as_i64)
        .and_then(|n| i32::try_from(n).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pair_entries() {
        let snapshot = LevelSnapshot::parse(r#"{"solid": [[1, 2], [3, 4]]}"#).unwrap();
        assert_eq!(snapshot.solid, vec![(1, 2), (3, 4)]);
        assert!(snapshot.water.is_empty());
        assert!(snapshot.enemies.is_empty());
    }

    #[test]
    fn test_parse_object_entries() {
        let snapshot =
            LevelSnapshot::parse(r#"{"water": [{"row": 5, "col": 6}, {"row": 1}]}"#).unwrap();
        assert_eq!(snapshot.water, vec![(5, 6)]);
    }

    #[test]
    fn test_parse_flat_entries() {
        let snapshot = LevelSnapshot::parse(r#"{"solid": [1, 2, 3, 4, 5]}"#).unwrap();
        assert_eq!(snapshot.solid, vec![(1, 2), (3, 4)]);
    }

    #[test]
    fn test_mixed_and_unknown_entries() {
        let snapshot =
            LevelSnapshot::parse(r#"{"solid": ["x", [0, 1], {"row": 2, "col": 3}, null]}"#)
                .unwrap();
        assert_eq!(snapshot.solid, vec![(0, 1), (2, 3)]);
    }

    #[test]
    fn test_parse_enemies_skips_incomplete() {
        let json = r#"{"enemies": [
            {"name": "redDeon", "row": 4, "col": 7},
            {"name": "redDeon", "row": 4}
        ]}"#;
        let snapshot = LevelSnapshot::parse(json).unwrap();
        assert_eq!(
            snapshot.enemies,
            vec![EnemySpawn {
                enemy_id: "redDeon".to_string(),
                row: 4,
                col: 7
            }]
        );
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(LevelSnapshot::parse("{not json").is_err());
        assert!(matches!(
            LevelSnapshot::parse("[1, 2]"),
            Err(LevelError::NotAnObject)
        ));
        assert!(matches!(
            LevelSnapshot::parse(r#"{"solid": 3}"#),
            Err(LevelError::ExpectedArray(_))
        ));
    }

    #[test]
    fn test_missing_file_falls_back_to_empty() {
        let snapshot = LevelSnapshot::load_or_default(Path::new("does/not/exist.json"));
        assert_eq!(snapshot, LevelSnapshot::default());
    }

    #[test]
    fn test_build_grid() {
        let snapshot = LevelSnapshot::parse(r#"{"solid": [[0, 0], [9, 9]]}"#).unwrap();
        let grid = snapshot.build_grid(2, 2, 16.0);
        assert!(grid.is_solid(0, 0));
        assert!(!grid.is_solid(1, 1));
    }
}
