// Level data consumed by the simulation: collision masks and enemy spawns

mod snapshot;

pub use snapshot::{EnemySpawn, LevelSnapshot};

/// Level loading errors
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Snapshot root must be a JSON object")]
    NotAnObject,

    #[error("Expected an array for {0}")]
    ExpectedArray(&'static str),
}
