mod atomic_io;
mod file_store;
mod memory_store;
mod snapshot;

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::world::World;

pub use file_store::JsonFileStore;
pub use memory_store::MemoryStore;
pub use snapshot::{
    EntityRecord, SnapshotError, TileRecord, VariantRecord, WorldSnapshot,
    SNAPSHOT_FORMAT_VERSION,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorldId(pub u64);

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveSummary {
    pub id: WorldId,
    pub name: String,
    pub last_saved_unix_secs: u64,
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("save name cannot be empty")]
    EmptyName,
    #[error("save id space exhausted")]
    IdOverflow,
    #[error("failed to create save directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode {what} json: {source}")]
    Encode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to parse {what} json at {path}: {message}")]
    Parse {
        what: &'static str,
        path: String,
        message: String,
    },
    #[error("save {id} is indexed but its world file is missing: {path}")]
    MissingWorldFile { id: WorldId, path: PathBuf },
    #[error("save {id} failed checksum: expected {expected}, got {actual}")]
    ChecksumMismatch {
        id: WorldId,
        expected: String,
        actual: String,
    },
    #[error("save {id} holds an invalid world: {source}")]
    InvalidWorld {
        id: WorldId,
        #[source]
        source: SnapshotError,
    },
}

/// Durable home for worlds. A failed `load` never yields a partially built world; the
/// caller keeps whatever it had.
pub trait WorldStore {
    fn save(&mut self, world: &World, name: &str) -> Result<WorldId, PersistenceError>;

    /// `Ok(None)` when no save has this id.
    fn load(&self, id: WorldId) -> Result<Option<World>, PersistenceError>;

    /// Most recently saved first.
    fn list_saves(&self) -> Result<Vec<SaveSummary>, PersistenceError>;
}

pub(crate) fn validated_name(name: &str) -> Result<String, PersistenceError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(PersistenceError::EmptyName);
    }
    Ok(trimmed.to_string())
}

pub(crate) fn next_world_id(next: &mut u64) -> Result<WorldId, PersistenceError> {
    let id = WorldId(*next);
    *next = next.checked_add(1).ok_or(PersistenceError::IdOverflow)?;
    Ok(id)
}

pub(crate) fn unix_now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}

pub(crate) fn sort_most_recent_first(saves: &mut [SaveSummary]) {
    saves.sort_by(|a, b| {
        b.last_saved_unix_secs
            .cmp(&a.last_saved_unix_secs)
            .then(b.id.cmp(&a.id))
    });
}

pub(crate) fn encode_snapshot(world: &World) -> Result<String, PersistenceError> {
    serde_json::to_string_pretty(&world.snapshot()).map_err(|source| PersistenceError::Encode {
        what: "world",
        source,
    })
}

pub fn parse_snapshot_json(raw: &str) -> Result<WorldSnapshot, PersistenceError> {
    parse_json(raw, "world")
}

pub(crate) fn parse_json<T: serde::de::DeserializeOwned>(
    raw: &str,
    what: &'static str,
) -> Result<T, PersistenceError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize::<_, T>(&mut deserializer).map_err(|error| {
        let path = error.path().to_string();
        let message = error.into_inner().to_string();
        PersistenceError::Parse {
            what,
            path,
            message,
        }
    })
}

pub(crate) fn decode_world(id: WorldId, raw: &str) -> Result<World, PersistenceError> {
    let snapshot = parse_snapshot_json(raw)?;
    World::from_snapshot(snapshot).map_err(|source| PersistenceError::InvalidWorld { id, source })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::world::{DEFAULT_WORLD_HEIGHT, DEFAULT_WORLD_WIDTH};

    #[test]
    fn summaries_sort_newest_first_then_highest_id() {
        let summary = |id, secs| SaveSummary {
            id: WorldId(id),
            name: format!("save {id}"),
            last_saved_unix_secs: secs,
        };
        let mut saves = vec![summary(0, 10), summary(1, 30), summary(2, 30), summary(3, 20)];
        sort_most_recent_first(&mut saves);
        let ids = saves.iter().map(|save| save.id.0).collect::<Vec<_>>();
        assert_eq!(ids, vec![2, 1, 3, 0]);
    }

    #[test]
    fn blank_names_are_rejected() {
        assert!(matches!(validated_name("  "), Err(PersistenceError::EmptyName)));
        assert_eq!(validated_name(" slot one ").expect("name"), "slot one");
    }

    #[test]
    fn parse_reports_path_of_unknown_variant() {
        let world = World::generate(DEFAULT_WORLD_WIDTH, DEFAULT_WORLD_HEIGHT);
        let mut value = serde_json::to_value(world.snapshot()).expect("to_value");
        value["entities"][0]["variant"]["kind"] = json!("Dragon");
        let raw = serde_json::to_string(&value).expect("json");

        let error = parse_snapshot_json(&raw).expect_err("unknown variant should fail");
        let text = error.to_string();
        assert!(text.contains("entities[0].variant"), "{text}");
        assert!(text.contains("unknown variant"), "{text}");
    }

    #[test]
    fn parse_reports_path_of_type_mismatch() {
        let world = World::generate(DEFAULT_WORLD_WIDTH, DEFAULT_WORLD_HEIGHT);
        let mut value = serde_json::to_value(world.snapshot()).expect("to_value");
        value["tiles"][3]["walkable"] = json!("yes");
        let raw = serde_json::to_string(&value).expect("json");

        let error = parse_snapshot_json(&raw).expect_err("type mismatch should fail");
        assert!(error.to_string().contains("tiles[3].walkable"));
    }
}
