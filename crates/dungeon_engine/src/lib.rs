//! Turn-based dungeon simulation: a tile grid with entities on top, advanced one player
//! action at a time.

pub mod action;
pub mod camera;
pub mod entity;
pub mod geometry;
pub mod message_log;
pub mod persistence;
pub mod tile;
pub mod world;

pub use action::Action;
pub use camera::Camera;
pub use entity::{
    EnemyStats, Entity, EntityId, EntityKind, ItemKind, ItemStats, PlayerStats, WallKind,
};
pub use geometry::{Direction, Position};
pub use message_log::{MessageLog, MESSAGE_LOG_CAPACITY};
pub use persistence::{
    JsonFileStore, MemoryStore, PersistenceError, SaveSummary, SnapshotError, WorldId,
    WorldSnapshot, WorldStore,
};
pub use tile::{Tile, TileKind};
pub use world::{
    DoorToggle, MoveOutcome, PickUp, TurnOutcome, World, DEFAULT_WORLD_HEIGHT,
    DEFAULT_WORLD_WIDTH, EXPERIENCE_PER_KILL, MAX_WORLD_SIDE, PLAYER_ATTACK_DAMAGE,
};
