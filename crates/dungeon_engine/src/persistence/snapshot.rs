use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entity::{
    EnemyStats, Entity, EntityIdAllocator, EntityKind, ItemKind, ItemStats, PlayerStats, WallKind,
};
use crate::geometry::Position;
use crate::tile::{Tile, TileKind};
use crate::world::World;

pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRecord {
    pub x: i32,
    pub y: i32,
    pub symbol: char,
    pub walkable: bool,
    pub tile_type: TileKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum VariantRecord {
    Player {
        health: i32,
        max_health: i32,
        level: u32,
        experience: u32,
    },
    Enemy {
        health: i32,
        damage: i32,
    },
    Item {
        item_type: ItemKind,
        value: i32,
    },
    Wall {
        wall_type: WallKind,
    },
    Door {
        is_open: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub x: i32,
    pub y: i32,
    pub symbol: char,
    pub name: String,
    pub blocks_movement: bool,
    pub blocks_vision: bool,
    pub variant: VariantRecord,
}

/// Storage-neutral image of a world: row-major tiles plus every entity.
/// The message log is presentation state and is not captured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub format_version: u32,
    pub width: u32,
    pub height: u32,
    pub tiles: Vec<TileRecord>,
    pub entities: Vec<EntityRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("unsupported snapshot format version: expected {expected}, got {actual}")]
    UnsupportedVersion { expected: u32, actual: u32 },
    #[error("grid must be at least 1x1, got {width}x{height}")]
    EmptyGrid { width: u32, height: u32 },
    #[error("tile count mismatch: expected {expected}, got {actual}")]
    TileCountMismatch { expected: usize, actual: usize },
    #[error("tiles[{index}] at ({x}, {y}) lies outside the grid")]
    TileOutOfBounds { index: usize, x: i32, y: i32 },
    #[error("tiles[{index}] duplicates cell ({x}, {y})")]
    DuplicateTile { index: usize, x: i32, y: i32 },
    #[error("entities[{index}] at ({x}, {y}) lies outside the grid")]
    EntityOutOfBounds { index: usize, x: i32, y: i32 },
    #[error("expected exactly one player entity, found {count}")]
    PlayerCount { count: usize },
}

impl TileRecord {
    fn from_tile(tile: &Tile) -> Self {
        Self {
            x: tile.position.x,
            y: tile.position.y,
            symbol: tile.symbol,
            walkable: tile.walkable,
            tile_type: tile.kind,
        }
    }

    fn to_tile(self) -> Tile {
        Tile {
            position: Position::new(self.x, self.y),
            symbol: self.symbol,
            walkable: self.walkable,
            kind: self.tile_type,
        }
    }
}

impl VariantRecord {
    fn from_kind(kind: &EntityKind) -> Self {
        match kind {
            EntityKind::Player(stats) => Self::Player {
                health: stats.health,
                max_health: stats.max_health,
                level: stats.level,
                experience: stats.experience,
            },
            EntityKind::Enemy(stats) => Self::Enemy {
                health: stats.health,
                damage: stats.damage,
            },
            EntityKind::Item(stats) => Self::Item {
                item_type: stats.kind,
                value: stats.value,
            },
            EntityKind::Wall(wall_type) => Self::Wall {
                wall_type: *wall_type,
            },
            EntityKind::Door { is_open } => Self::Door { is_open: *is_open },
        }
    }

    fn to_kind(&self) -> EntityKind {
        match *self {
            Self::Player {
                health,
                max_health,
                level,
                experience,
            } => EntityKind::Player(PlayerStats {
                health,
                max_health,
                level,
                experience,
            }),
            Self::Enemy { health, damage } => EntityKind::Enemy(EnemyStats { health, damage }),
            Self::Item { item_type, value } => EntityKind::Item(ItemStats {
                kind: item_type,
                value,
            }),
            Self::Wall { wall_type } => EntityKind::Wall(wall_type),
            Self::Door { is_open } => EntityKind::Door { is_open },
        }
    }
}

impl EntityRecord {
    fn from_entity(entity: &Entity) -> Self {
        Self {
            x: entity.position.x,
            y: entity.position.y,
            symbol: entity.symbol(),
            name: entity.name().to_string(),
            blocks_movement: entity.blocks_movement(),
            blocks_vision: entity.blocks_vision(),
            variant: VariantRecord::from_kind(entity.kind()),
        }
    }
}

impl World {
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            format_version: SNAPSHOT_FORMAT_VERSION,
            width: self.width(),
            height: self.height(),
            tiles: self.tiles().iter().map(TileRecord::from_tile).collect(),
            entities: self.entities().iter().map(EntityRecord::from_entity).collect(),
        }
    }

    /// Rebuilds a world from a snapshot, or rejects it whole. Entity ids are reassigned
    /// in record order and the player handle is re-derived from the single player record.
    pub fn from_snapshot(snapshot: WorldSnapshot) -> Result<World, SnapshotError> {
        if snapshot.format_version != SNAPSHOT_FORMAT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                expected: SNAPSHOT_FORMAT_VERSION,
                actual: snapshot.format_version,
            });
        }
        let (width, height) = (snapshot.width, snapshot.height);
        if width == 0 || height == 0 {
            return Err(SnapshotError::EmptyGrid { width, height });
        }
        let expected = width as usize * height as usize;
        if snapshot.tiles.len() != expected {
            return Err(SnapshotError::TileCountMismatch {
                expected,
                actual: snapshot.tiles.len(),
            });
        }

        let in_bounds =
            |x: i32, y: i32| x >= 0 && y >= 0 && (x as u32) < width && (y as u32) < height;

        let mut grid: Vec<Option<Tile>> = vec![None; expected];
        for (index, record) in snapshot.tiles.into_iter().enumerate() {
            let (x, y) = (record.x, record.y);
            if !in_bounds(x, y) {
                return Err(SnapshotError::TileOutOfBounds { index, x, y });
            }
            let slot = &mut grid[y as usize * width as usize + x as usize];
            if slot.is_some() {
                return Err(SnapshotError::DuplicateTile { index, x, y });
            }
            *slot = Some(record.to_tile());
        }
        // Count matches and no cell repeats, so every slot is filled.
        let tiles = grid.into_iter().flatten().collect::<Vec<_>>();

        let mut ids = EntityIdAllocator::default();
        let mut entities = Vec::with_capacity(snapshot.entities.len());
        let mut player_ids = Vec::new();
        for (index, record) in snapshot.entities.into_iter().enumerate() {
            let (x, y) = (record.x, record.y);
            if !in_bounds(x, y) {
                return Err(SnapshotError::EntityOutOfBounds { index, x, y });
            }
            let id = ids.allocate();
            let kind = record.variant.to_kind();
            if matches!(kind, EntityKind::Player(_)) {
                player_ids.push(id);
            }
            entities.push(Entity::from_parts(
                id,
                Position::new(x, y),
                record.symbol,
                record.name,
                record.blocks_movement,
                record.blocks_vision,
                kind,
            ));
        }

        let [player_id] = player_ids[..] else {
            return Err(SnapshotError::PlayerCount {
                count: player_ids.len(),
            });
        };

        Ok(World::assemble(width, height, tiles, entities, player_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Direction;
    use crate::world::{MoveOutcome, DEFAULT_WORLD_HEIGHT, DEFAULT_WORLD_WIDTH};

    fn generated() -> World {
        World::generate(DEFAULT_WORLD_WIDTH, DEFAULT_WORLD_HEIGHT)
    }

    #[test]
    fn snapshot_roundtrip_reproduces_grid_and_entities() {
        let mut world = generated();
        world.move_player(Direction::EAST);
        world.move_player(Direction::EAST);

        let restored = World::from_snapshot(world.snapshot()).expect("restore");
        assert_eq!(restored.width(), world.width());
        assert_eq!(restored.height(), world.height());
        assert_eq!(restored.tiles(), world.tiles());
        assert_eq!(restored.player_position(), Position::new(17, 11));
        assert_eq!(restored.player_stats(), world.player_stats());
        assert_eq!(restored.snapshot(), world.snapshot());
        assert!(restored.messages().is_empty());
    }

    #[test]
    fn tiles_are_placed_by_coordinates_not_order() {
        let world = generated();
        let mut snapshot = world.snapshot();
        snapshot.tiles.reverse();
        let restored = World::from_snapshot(snapshot).expect("restore");
        assert_eq!(restored.tiles(), world.tiles());
    }

    #[test]
    fn door_fields_follow_is_open_flag() {
        let mut snapshot = generated().snapshot();
        let door = snapshot
            .entities
            .iter_mut()
            .find(|record| matches!(record.variant, VariantRecord::Door { .. }))
            .expect("door record");
        door.variant = VariantRecord::Door { is_open: true };
        let (x, y) = (door.x, door.y);

        let restored = World::from_snapshot(snapshot).expect("restore");
        assert!(restored.can_move_to(x, y));
    }

    fn player_record(snapshot: &mut WorldSnapshot) -> &mut EntityRecord {
        snapshot
            .entities
            .iter_mut()
            .find(|record| matches!(record.variant, VariantRecord::Player { .. }))
            .expect("player record")
    }

    #[test]
    fn extreme_enemy_health_from_disk_saturates_on_attack() {
        let mut snapshot = generated().snapshot();
        let goblin = snapshot
            .entities
            .iter_mut()
            .find(|record| record.name == "Goblin")
            .expect("goblin record");
        goblin.variant = VariantRecord::Enemy {
            health: i32::MIN + 5,
            damage: 5,
        };
        let player = player_record(&mut snapshot);
        (player.x, player.y) = (10, 8);

        let mut world = World::from_snapshot(snapshot).expect("restore");
        assert!(matches!(
            world.move_player(Direction::WEST),
            MoveOutcome::Attacked { defeated: true, .. }
        ));
        assert_eq!(world.entities_at(9, 8).count(), 0);
        assert_eq!(world.player_position(), Position::new(10, 8));
    }

    #[test]
    fn extreme_player_health_from_disk_saturates_on_heal() {
        let mut snapshot = generated().snapshot();
        let player = player_record(&mut snapshot);
        (player.x, player.y) = (9, 14);
        player.variant = VariantRecord::Player {
            health: -10,
            max_health: i32::MAX,
            level: 1,
            experience: 0,
        };

        let mut world = World::from_snapshot(snapshot).expect("restore");
        world.move_player(Direction::WEST);
        assert_eq!(world.player_position(), Position::new(8, 14));
        assert_eq!(world.player_stats().health, 15);
        assert_eq!(world.messages().latest(), Some("You recover 25 health."));
    }

    #[test]
    fn rejects_missing_or_duplicate_players() {
        let mut snapshot = generated().snapshot();
        snapshot
            .entities
            .retain(|record| !matches!(record.variant, VariantRecord::Player { .. }));
        assert_eq!(
            World::from_snapshot(snapshot).expect_err("no player"),
            SnapshotError::PlayerCount { count: 0 }
        );

        let mut snapshot = generated().snapshot();
        let player = snapshot
            .entities
            .iter()
            .find(|record| matches!(record.variant, VariantRecord::Player { .. }))
            .cloned()
            .expect("player record");
        snapshot.entities.push(player);
        assert_eq!(
            World::from_snapshot(snapshot).expect_err("two players"),
            SnapshotError::PlayerCount { count: 2 }
        );
    }

    #[test]
    fn rejects_bad_grid_shapes() {
        let mut snapshot = generated().snapshot();
        snapshot.tiles.pop();
        assert!(matches!(
            World::from_snapshot(snapshot),
            Err(SnapshotError::TileCountMismatch { .. })
        ));

        let mut snapshot = generated().snapshot();
        snapshot.tiles[1] = snapshot.tiles[0];
        assert_eq!(
            World::from_snapshot(snapshot).expect_err("duplicate"),
            SnapshotError::DuplicateTile {
                index: 1,
                x: 0,
                y: 0
            }
        );

        let mut snapshot = generated().snapshot();
        snapshot.entities[0].x = -1;
        assert!(matches!(
            World::from_snapshot(snapshot),
            Err(SnapshotError::EntityOutOfBounds { index: 0, .. })
        ));

        let mut snapshot = generated().snapshot();
        snapshot.format_version = 99;
        assert!(matches!(
            World::from_snapshot(snapshot),
            Err(SnapshotError::UnsupportedVersion { actual: 99, .. })
        ));
    }
}
