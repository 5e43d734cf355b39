use serde::{Deserialize, Serialize};

use crate::geometry::Position;

pub const PLAYER_SYMBOL: char = '@';
pub const WALL_SYMBOL: char = '#';
pub const DOOR_OPEN_SYMBOL: char = '/';
pub const DOOR_CLOSED_SYMBOL: char = '+';
pub const DOOR_OPEN_NAME: &str = "Open Door";
pub const DOOR_CLOSED_NAME: &str = "Closed Door";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(pub u64);

#[derive(Debug, Default)]
pub struct EntityIdAllocator {
    next: u64,
}

impl EntityIdAllocator {
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerStats {
    pub health: i32,
    pub max_health: i32,
    pub level: u32,
    pub experience: u32,
}

impl PlayerStats {
    /// Returns the amount actually restored. Stats loaded from disk may sit anywhere in the
    /// `i32` range, so the arithmetic saturates.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let missing = self.max_health.saturating_sub(self.health).max(0);
        let restored = amount.clamp(0, missing);
        self.health = self.health.saturating_add(restored);
        restored
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyStats {
    pub health: i32,
    pub damage: i32,
}

impl EnemyStats {
    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Potion,
    Gold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemStats {
    pub kind: ItemKind,
    pub value: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallKind {
    Boundary,
    Room,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityKind {
    Player(PlayerStats),
    Enemy(EnemyStats),
    Item(ItemStats),
    Wall(WallKind),
    Door { is_open: bool },
}

/// Anything placed on the grid. Display fields are private so door state and its
/// symbol/name/blocking flag can only change together through [`Entity::set_door_open`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub id: EntityId,
    pub position: Position,
    symbol: char,
    name: String,
    blocks_movement: bool,
    blocks_vision: bool,
    kind: EntityKind,
}

impl Entity {
    pub fn player(
        id: EntityId,
        position: Position,
        name: impl Into<String>,
        stats: PlayerStats,
    ) -> Self {
        Self {
            id,
            position,
            symbol: PLAYER_SYMBOL,
            name: name.into(),
            blocks_movement: true,
            blocks_vision: false,
            kind: EntityKind::Player(stats),
        }
    }

    pub fn enemy(
        id: EntityId,
        position: Position,
        name: impl Into<String>,
        symbol: char,
        stats: EnemyStats,
    ) -> Self {
        Self {
            id,
            position,
            symbol,
            name: name.into(),
            blocks_movement: true,
            blocks_vision: false,
            kind: EntityKind::Enemy(stats),
        }
    }

    pub fn item(
        id: EntityId,
        position: Position,
        name: impl Into<String>,
        stats: ItemStats,
    ) -> Self {
        let symbol = match stats.kind {
            ItemKind::Potion => '!',
            ItemKind::Gold => '$',
        };
        Self {
            id,
            position,
            symbol,
            name: name.into(),
            blocks_movement: false,
            blocks_vision: false,
            kind: EntityKind::Item(stats),
        }
    }

    pub fn wall(id: EntityId, position: Position, kind: WallKind) -> Self {
        Self {
            id,
            position,
            symbol: WALL_SYMBOL,
            name: "Wall".to_string(),
            blocks_movement: true,
            blocks_vision: true,
            kind: EntityKind::Wall(kind),
        }
    }

    pub fn door(id: EntityId, position: Position, is_open: bool) -> Self {
        let mut door = Self {
            id,
            position,
            symbol: DOOR_CLOSED_SYMBOL,
            name: String::new(),
            blocks_movement: true,
            blocks_vision: true,
            kind: EntityKind::Door { is_open },
        };
        door.sync_door_fields();
        door
    }

    /// Rebuilds a stored entity. Door display fields are re-derived from `is_open`.
    pub(crate) fn from_parts(
        id: EntityId,
        position: Position,
        symbol: char,
        name: String,
        blocks_movement: bool,
        blocks_vision: bool,
        kind: EntityKind,
    ) -> Self {
        let mut entity = Self {
            id,
            position,
            symbol,
            name,
            blocks_movement,
            blocks_vision,
            kind,
        };
        entity.sync_door_fields();
        entity
    }

    pub fn symbol(&self) -> char {
        self.symbol
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn blocks_movement(&self) -> bool {
        self.blocks_movement
    }

    /// Carried for line-of-sight work; nothing in the engine reads it yet.
    pub fn blocks_vision(&self) -> bool {
        self.blocks_vision
    }

    pub fn kind(&self) -> &EntityKind {
        &self.kind
    }

    pub fn is_player(&self) -> bool {
        matches!(self.kind, EntityKind::Player(_))
    }

    pub fn is_enemy(&self) -> bool {
        matches!(self.kind, EntityKind::Enemy(_))
    }

    pub fn is_wall(&self) -> bool {
        matches!(self.kind, EntityKind::Wall(_))
    }

    pub fn is_door(&self) -> bool {
        matches!(self.kind, EntityKind::Door { .. })
    }

    pub fn player_stats(&self) -> Option<&PlayerStats> {
        match &self.kind {
            EntityKind::Player(stats) => Some(stats),
            _ => None,
        }
    }

    pub fn player_stats_mut(&mut self) -> Option<&mut PlayerStats> {
        match &mut self.kind {
            EntityKind::Player(stats) => Some(stats),
            _ => None,
        }
    }

    pub fn enemy_stats(&self) -> Option<&EnemyStats> {
        match &self.kind {
            EntityKind::Enemy(stats) => Some(stats),
            _ => None,
        }
    }

    pub fn enemy_stats_mut(&mut self) -> Option<&mut EnemyStats> {
        match &mut self.kind {
            EntityKind::Enemy(stats) => Some(stats),
            _ => None,
        }
    }

    pub fn item_stats(&self) -> Option<&ItemStats> {
        match &self.kind {
            EntityKind::Item(stats) => Some(stats),
            _ => None,
        }
    }

    pub fn door_is_open(&self) -> Option<bool> {
        match self.kind {
            EntityKind::Door { is_open } => Some(is_open),
            _ => None,
        }
    }

    /// No-op for anything that is not a door.
    pub fn set_door_open(&mut self, open: bool) {
        if let EntityKind::Door { is_open } = &mut self.kind {
            *is_open = open;
            self.sync_door_fields();
        }
    }

    fn sync_door_fields(&mut self) {
        let EntityKind::Door { is_open } = self.kind else {
            return;
        };
        if is_open {
            self.symbol = DOOR_OPEN_SYMBOL;
            self.name = DOOR_OPEN_NAME.to_string();
            self.blocks_movement = false;
            self.blocks_vision = false;
        } else {
            self.symbol = DOOR_CLOSED_SYMBOL;
            self.name = DOOR_CLOSED_NAME.to_string();
            self.blocks_movement = true;
            self.blocks_vision = true;
        }
    }
}
