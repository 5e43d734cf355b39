use tracing::{debug, info};

use super::World;
use crate::entity::{
    EnemyStats, Entity, EntityId, EntityIdAllocator, ItemKind, ItemStats, PlayerStats, WallKind,
};
use crate::geometry::Position;
use crate::tile::Tile;

pub const DEFAULT_WORLD_WIDTH: u32 = 60;
pub const DEFAULT_WORLD_HEIGHT: u32 = 30;
/// Largest width or height `World::generate` builds; keeps every coordinate well inside `i32`.
pub const MAX_WORLD_SIDE: u32 = 1024;
pub const PLAYER_SPAWN: Position = Position::new(16, 11);

const PLAYER_NAME: &str = "Hero";
const PLAYER_MAX_HEALTH: i32 = 100;

struct RoomBlueprint {
    name: &'static str,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

const ROOMS: [RoomBlueprint; 3] = [
    RoomBlueprint {
        name: "Entrance Hall",
        x: 5,
        y: 5,
        width: 13,
        height: 13,
    },
    RoomBlueprint {
        name: "Armory",
        x: 25,
        y: 5,
        width: 12,
        height: 10,
    },
    RoomBlueprint {
        name: "Crypt",
        x: 40,
        y: 15,
        width: 14,
        height: 10,
    },
];

const DOORS: [Position; 4] = [
    Position::new(17, 11),
    Position::new(11, 17),
    Position::new(25, 9),
    Position::new(46, 15),
];

struct EnemySeed {
    name: &'static str,
    symbol: char,
    position: Position,
    health: i32,
    damage: i32,
}

const ENEMIES: [EnemySeed; 4] = [
    EnemySeed {
        name: "Goblin",
        symbol: 'g',
        position: Position::new(9, 8),
        health: 30,
        damage: 5,
    },
    EnemySeed {
        name: "Rat",
        symbol: 'r',
        position: Position::new(13, 14),
        health: 10,
        damage: 2,
    },
    EnemySeed {
        name: "Orc",
        symbol: 'o',
        position: Position::new(30, 9),
        health: 50,
        damage: 10,
    },
    EnemySeed {
        name: "Skeleton",
        symbol: 's',
        position: Position::new(45, 20),
        health: 40,
        damage: 8,
    },
];

struct ItemSeed {
    name: &'static str,
    kind: ItemKind,
    position: Position,
    value: i32,
}

const ITEMS: [ItemSeed; 4] = [
    ItemSeed {
        name: "Health Potion",
        kind: ItemKind::Potion,
        position: Position::new(8, 14),
        value: 25,
    },
    ItemSeed {
        name: "Gold Coins",
        kind: ItemKind::Gold,
        position: Position::new(32, 12),
        value: 50,
    },
    ItemSeed {
        name: "Health Potion",
        kind: ItemKind::Potion,
        position: Position::new(48, 22),
        value: 25,
    },
    ItemSeed {
        name: "Gold Coins",
        kind: ItemKind::Gold,
        position: Position::new(21, 20),
        value: 15,
    },
];

struct LayoutBuilder {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
    entities: Vec<Entity>,
    ids: EntityIdAllocator,
}

impl LayoutBuilder {
    fn new(width: u32, height: u32) -> Self {
        let mut tiles = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                tiles.push(Tile::floor(Position::new(x, y)));
            }
        }
        Self {
            width,
            height,
            tiles,
            entities: Vec::new(),
            ids: EntityIdAllocator::default(),
        }
    }

    fn index_of(&self, position: Position) -> Option<usize> {
        let in_bounds = position.x >= 0
            && position.y >= 0
            && (position.x as u32) < self.width
            && (position.y as u32) < self.height;
        in_bounds.then(|| position.y as usize * self.width as usize + position.x as usize)
    }

    fn place(
        &mut self,
        position: Position,
        make: impl FnOnce(EntityId, Position) -> Entity,
    ) -> Option<EntityId> {
        self.index_of(position)?;
        let id = self.ids.allocate();
        self.entities.push(make(id, position));
        Some(id)
    }

    fn add_wall_box(&mut self, x: i32, y: i32, width: i32, height: i32, kind: WallKind) {
        for dy in 0..height {
            for dx in 0..width {
                let on_edge = dx == 0 || dx == width - 1 || dy == 0 || dy == height - 1;
                if on_edge {
                    self.place(Position::new(x + dx, y + dy), |id, pos| {
                        Entity::wall(id, pos, kind)
                    });
                }
            }
        }
    }

    fn carve_room(&mut self, room: &RoomBlueprint) {
        self.add_wall_box(room.x, room.y, room.width, room.height, WallKind::Room);
        for y in room.y + 1..room.y + room.height - 1 {
            for x in room.x + 1..room.x + room.width - 1 {
                let position = Position::new(x, y);
                if let Some(index) = self.index_of(position) {
                    self.tiles[index] = Tile::floor(position);
                }
            }
        }
        debug!(room = room.name, x = room.x, y = room.y, "room_carved");
    }

    fn place_door(&mut self, position: Position) {
        self.entities
            .retain(|entity| !(entity.position == position && entity.is_wall()));
        self.place(position, |id, pos| Entity::door(id, pos, false));
    }

    /// The player must exist, so an out-of-range spawn is pulled onto the nearest cell.
    fn place_player(&mut self, spawn: Position) -> EntityId {
        let position = Position::new(
            spawn.x.clamp(0, self.width as i32 - 1),
            spawn.y.clamp(0, self.height as i32 - 1),
        );
        let id = self.ids.allocate();
        self.entities.push(Entity::player(
            id,
            position,
            PLAYER_NAME,
            PlayerStats {
                health: PLAYER_MAX_HEALTH,
                max_health: PLAYER_MAX_HEALTH,
                level: 1,
                experience: 0,
            },
        ));
        id
    }
}

impl World {
    /// Builds the fixed starting layout. Blueprint coordinates outside the grid are skipped;
    /// each dimension is clamped to `1..=MAX_WORLD_SIDE`.
    pub fn generate(width: u32, height: u32) -> Self {
        let width = width.clamp(1, MAX_WORLD_SIDE);
        let height = height.clamp(1, MAX_WORLD_SIDE);
        let mut layout = LayoutBuilder::new(width, height);

        layout.add_wall_box(0, 0, width as i32, height as i32, WallKind::Boundary);
        for room in &ROOMS {
            layout.carve_room(room);
        }
        for door in DOORS {
            layout.place_door(door);
        }

        let player_id = layout.place_player(PLAYER_SPAWN);
        for seed in &ENEMIES {
            layout.place(seed.position, |id, pos| {
                Entity::enemy(
                    id,
                    pos,
                    seed.name,
                    seed.symbol,
                    EnemyStats {
                        health: seed.health,
                        damage: seed.damage,
                    },
                )
            });
        }
        for seed in &ITEMS {
            layout.place(seed.position, |id, pos| {
                Entity::item(
                    id,
                    pos,
                    seed.name,
                    ItemStats {
                        kind: seed.kind,
                        value: seed.value,
                    },
                )
            });
        }

        info!(
            width,
            height,
            entity_count = layout.entities.len(),
            "world_generated"
        );
        World::assemble(width, height, layout.tiles, layout.entities, player_id)
    }
}
