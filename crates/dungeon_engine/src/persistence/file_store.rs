use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use super::atomic_io::write_text_atomic;
use super::{
    decode_world, encode_snapshot, next_world_id, parse_json, sort_most_recent_first,
    unix_now_secs, validated_name, PersistenceError, SaveSummary, WorldId, WorldStore,
};
use crate::world::World;

const INDEX_FILE: &str = "index.json";
const INDEX_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct IndexEntry {
    id: WorldId,
    name: String,
    last_saved_unix_secs: u64,
    file_name: String,
    world_sha256_hex: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct SaveIndex {
    format_version: u32,
    next_id: u64,
    entries: Vec<IndexEntry>,
}

impl Default for SaveIndex {
    fn default() -> Self {
        Self {
            format_version: INDEX_FORMAT_VERSION,
            next_id: 1,
            entries: Vec::new(),
        }
    }
}

/// Directory-backed store: one `index.json` listing every save, and one
/// `world_<id>.json` per saved world.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| PersistenceError::CreateDir {
            path: root.clone(),
            source,
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn index_path(&self) -> PathBuf {
        self.root.join(INDEX_FILE)
    }

    fn world_file_name(id: WorldId) -> String {
        format!("world_{id}.json")
    }

    fn read_index(&self) -> Result<SaveIndex, PersistenceError> {
        let path = self.index_path();
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                return Ok(SaveIndex::default())
            }
            Err(source) => return Err(PersistenceError::Read { path, source }),
        };
        parse_json(&raw, "save index")
    }

    fn write_index(&self, index: &SaveIndex) -> Result<(), PersistenceError> {
        let path = self.index_path();
        let text = serde_json::to_string_pretty(index).map_err(|source| {
            PersistenceError::Encode {
                what: "save index",
                source,
            }
        })?;
        write_text_atomic(&path, &text).map_err(|source| PersistenceError::Write { path, source })
    }
}

impl WorldStore for JsonFileStore {
    fn save(&mut self, world: &World, name: &str) -> Result<WorldId, PersistenceError> {
        let name = validated_name(name)?;
        let mut index = self.read_index()?;
        let id = next_world_id(&mut index.next_id)?;
        let text = encode_snapshot(world)?;
        let file_name = Self::world_file_name(id);

        // World file first: a crash between the two writes leaves an unlisted file,
        // never an index entry without its world.
        let world_path = self.root.join(&file_name);
        write_text_atomic(&world_path, &text).map_err(|source| PersistenceError::Write {
            path: world_path.clone(),
            source,
        })?;

        index.entries.push(IndexEntry {
            id,
            name: name.clone(),
            last_saved_unix_secs: unix_now_secs(),
            file_name,
            world_sha256_hex: sha256_hex(text.as_bytes()),
        });
        self.write_index(&index)?;

        info!(
            save_id = %id,
            name = %name,
            path = %world_path.display(),
            entity_count = world.entity_count(),
            "world_saved"
        );
        Ok(id)
    }

    fn load(&self, id: WorldId) -> Result<Option<World>, PersistenceError> {
        let index = self.read_index()?;
        let Some(entry) = index.entries.iter().find(|entry| entry.id == id) else {
            info!(save_id = %id, "save_not_found");
            return Ok(None);
        };

        let path = self.root.join(&entry.file_name);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                warn!(save_id = %id, path = %path.display(), "save_world_file_missing");
                return Err(PersistenceError::MissingWorldFile { id, path });
            }
            Err(source) => return Err(PersistenceError::Read { path, source }),
        };

        let actual = sha256_hex(raw.as_bytes());
        if actual != entry.world_sha256_hex {
            warn!(save_id = %id, path = %path.display(), "save_checksum_mismatch");
            return Err(PersistenceError::ChecksumMismatch {
                id,
                expected: entry.world_sha256_hex.clone(),
                actual,
            });
        }

        let world = decode_world(id, &raw).inspect_err(|error| {
            warn!(save_id = %id, error = %error, "save_rejected");
        })?;
        info!(save_id = %id, name = %entry.name, "world_loaded");
        Ok(Some(world))
    }

    fn list_saves(&self) -> Result<Vec<SaveSummary>, PersistenceError> {
        let index = self.read_index()?;
        let mut saves = index
            .entries
            .into_iter()
            .map(|entry| SaveSummary {
                id: entry.id,
                name: entry.name,
                last_saved_unix_secs: entry.last_saved_unix_secs,
            })
            .collect::<Vec<_>>();
        sort_most_recent_first(&mut saves);
        Ok(saves)
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    to_hex_lower(&Sha256::digest(bytes))
}

fn to_hex_lower(bytes: &[u8]) -> String {
    let mut output = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        use std::fmt::Write as _;
        let _ = write!(&mut output, "{byte:02x}");
    }
    output
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::geometry::{Direction, Position};
    use crate::world::{DEFAULT_WORLD_HEIGHT, DEFAULT_WORLD_WIDTH};

    fn generated() -> World {
        World::generate(DEFAULT_WORLD_WIDTH, DEFAULT_WORLD_HEIGHT)
    }

    #[test]
    fn save_then_load_restores_equivalent_world() {
        let temp = TempDir::new().expect("temp");
        let mut store = JsonFileStore::open(temp.path().join("saves")).expect("open");
        let mut world = generated();
        world.move_player(Direction::EAST);
        world.move_player(Direction::EAST);

        let id = store.save(&world, "after the door").expect("save");
        let loaded = store.load(id).expect("load").expect("present");

        assert_eq!(loaded.snapshot(), world.snapshot());
        assert_eq!(loaded.player_position(), Position::new(17, 11));
        assert!(temp.path().join("saves").join("world_1.json").is_file());
    }

    #[test]
    fn unknown_id_loads_as_none() {
        let temp = TempDir::new().expect("temp");
        let store = JsonFileStore::open(temp.path()).expect("open");
        assert!(store.load(WorldId(42)).expect("load").is_none());
        assert!(store.list_saves().expect("list").is_empty());
    }

    #[test]
    fn list_saves_orders_most_recent_first() {
        let temp = TempDir::new().expect("temp");
        let mut store = JsonFileStore::open(temp.path()).expect("open");
        let world = generated();
        let first = store.save(&world, "first").expect("save");
        let second = store.save(&world, "second").expect("save");

        let saves = store.list_saves().expect("list");
        let ids = saves.iter().map(|save| save.id).collect::<Vec<_>>();
        assert_eq!(ids, vec![second, first]);
        assert_eq!(saves[0].name, "second");
        assert!(saves[0].last_saved_unix_secs >= saves[1].last_saved_unix_secs);
    }

    #[test]
    fn store_reopened_from_disk_sees_earlier_saves() {
        let temp = TempDir::new().expect("temp");
        let id = {
            let mut store = JsonFileStore::open(temp.path()).expect("open");
            store.save(&generated(), "persisted").expect("save")
        };
        let store = JsonFileStore::open(temp.path()).expect("reopen");
        assert_eq!(store.list_saves().expect("list")[0].id, id);
        assert!(store.load(id).expect("load").is_some());
    }

    #[test]
    fn tampered_world_file_fails_checksum() {
        let temp = TempDir::new().expect("temp");
        let mut store = JsonFileStore::open(temp.path()).expect("open");
        let id = store.save(&generated(), "slot").expect("save");

        let path = temp.path().join(JsonFileStore::world_file_name(id));
        let raw = fs::read_to_string(&path).expect("read");
        fs::write(&path, raw.replace("\"Goblin\"", "\"Gobbo\"")).expect("tamper");

        let error = store.load(id).expect_err("checksum");
        assert!(matches!(error, PersistenceError::ChecksumMismatch { .. }));
    }

    #[test]
    fn missing_world_file_is_reported() {
        let temp = TempDir::new().expect("temp");
        let mut store = JsonFileStore::open(temp.path()).expect("open");
        let id = store.save(&generated(), "slot").expect("save");
        fs::remove_file(temp.path().join(JsonFileStore::world_file_name(id))).expect("remove");

        assert!(matches!(
            store.load(id),
            Err(PersistenceError::MissingWorldFile { .. })
        ));
    }

    #[test]
    fn corrupt_index_is_a_parse_error() {
        let temp = TempDir::new().expect("temp");
        let store = JsonFileStore::open(temp.path()).expect("open");
        fs::write(temp.path().join(INDEX_FILE), "{\"format_version\": 1}").expect("write");

        let error = store.list_saves().expect_err("corrupt index");
        assert!(matches!(
            error,
            PersistenceError::Parse {
                what: "save index",
                ..
            }
        ));
    }

    #[test]
    fn blank_name_writes_nothing() {
        let temp = TempDir::new().expect("temp");
        let mut store = JsonFileStore::open(temp.path()).expect("open");
        assert!(matches!(
            store.save(&generated(), "   "),
            Err(PersistenceError::EmptyName)
        ));
        assert!(!temp.path().join(INDEX_FILE).exists());
    }

    #[test]
    fn sha256_hex_matches_known_digest() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
