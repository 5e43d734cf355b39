use tracing::info;

use super::{
    decode_world, encode_snapshot, next_world_id, sort_most_recent_first, unix_now_secs,
    validated_name, PersistenceError, SaveSummary, WorldId, WorldStore,
};
use crate::world::World;

#[derive(Debug, Clone)]
struct MemoryRecord {
    summary: SaveSummary,
    world_json: String,
}

/// Keeps encoded saves in process memory. Records go through the same JSON encoding as
/// the file store, so a load here exercises the full decode and validation path.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    next_id: u64,
    records: Vec<MemoryRecord>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            next_id: 1,
            records: Vec::new(),
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl WorldStore for MemoryStore {
    fn save(&mut self, world: &World, name: &str) -> Result<WorldId, PersistenceError> {
        let name = validated_name(name)?;
        let world_json = encode_snapshot(world)?;
        let id = next_world_id(&mut self.next_id)?;
        self.records.push(MemoryRecord {
            summary: SaveSummary {
                id,
                name,
                last_saved_unix_secs: unix_now_secs(),
            },
            world_json,
        });
        info!(save_id = %id, "world_saved_in_memory");
        Ok(id)
    }

    fn load(&self, id: WorldId) -> Result<Option<World>, PersistenceError> {
        let Some(record) = self.records.iter().find(|record| record.summary.id == id) else {
            return Ok(None);
        };
        decode_world(id, &record.world_json).map(Some)
    }

    fn list_saves(&self) -> Result<Vec<SaveSummary>, PersistenceError> {
        let mut saves = self
            .records
            .iter()
            .map(|record| record.summary.clone())
            .collect::<Vec<_>>();
        sort_most_recent_first(&mut saves);
        Ok(saves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Direction;
    use crate::world::{DEFAULT_WORLD_HEIGHT, DEFAULT_WORLD_WIDTH};

    #[test]
    fn roundtrip_keeps_world_and_lists_newest_first() {
        let mut store = MemoryStore::new();
        let mut world = World::generate(DEFAULT_WORLD_WIDTH, DEFAULT_WORLD_HEIGHT);
        let before = store.save(&world, "before").expect("save");
        world.move_player(Direction::WEST);
        let after = store.save(&world, "after").expect("save");

        let loaded = store.load(after).expect("load").expect("present");
        assert_eq!(loaded.snapshot(), world.snapshot());
        let loaded_before = store.load(before).expect("load").expect("present");
        assert_ne!(loaded_before.snapshot(), world.snapshot());

        let names = store
            .list_saves()
            .expect("list")
            .into_iter()
            .map(|save| save.name)
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["after", "before"]);
        assert!(store.load(WorldId(99)).expect("load").is_none());
    }

    #[test]
    fn corrupt_record_fails_without_yielding_a_world() {
        let mut store = MemoryStore::new();
        let world = World::generate(DEFAULT_WORLD_WIDTH, DEFAULT_WORLD_HEIGHT);
        let id = store.save(&world, "slot").expect("save");
        store.records[0].world_json = store.records[0]
            .world_json
            .replace("\"kind\": \"Player\"", "\"kind\": \"Enemy\"");

        assert!(store.load(id).is_err());
    }
}
