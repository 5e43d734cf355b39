mod generation;


use tracing::debug;

use crate::action::Action;
use crate::entity::{Entity, EntityId, ItemKind, PlayerStats};
use crate::geometry::{Direction, Position};
use crate::message_log::MessageLog;
use crate::tile::Tile;

pub use generation::{DEFAULT_WORLD_HEIGHT, DEFAULT_WORLD_WIDTH, MAX_WORLD_SIDE, PLAYER_SPAWN};

pub const PLAYER_ATTACK_DAMAGE: i32 = 20;
pub const EXPERIENCE_PER_KILL: u32 = 10;

pub const MSG_DOOR_OPENED: &str = "You open the door.";
pub const MSG_DOOR_CLOSED: &str = "You close the door.";
pub const MSG_NO_DOOR: &str = "There is no door in that direction.";
pub const MSG_BLOCKED: &str = "You cannot move there.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickUp {
    pub name: String,
    pub kind: ItemKind,
    pub value: i32,
    pub healed: i32,
}

/// Which branch of move resolution fired. Exactly one applies per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    OpenedDoor,
    Attacked { target: EntityId, defeated: bool },
    Moved { picked_up: Option<PickUp> },
    Blocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorToggle {
    Opened,
    Closed,
    NoDoor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    Move(MoveOutcome),
    Door(DoorToggle),
}

/// Tile grid plus everything standing on it. The player is looked up by id on every
/// access, so removals elsewhere in the entity list never leave a dangling handle.
#[derive(Debug, Clone)]
pub struct World {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
    entities: Vec<Entity>,
    player_id: EntityId,
    messages: MessageLog,
}

impl World {
    /// Callers guarantee `tiles` is row-major `width * height` and `player_id` names a
    /// player inside `entities`.
    pub(crate) fn assemble(
        width: u32,
        height: u32,
        tiles: Vec<Tile>,
        entities: Vec<Entity>,
        player_id: EntityId,
    ) -> Self {
        Self {
            width,
            height,
            tiles,
            entities,
            player_id,
            messages: MessageLog::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        if !self.contains(x, y) {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn tile_at(&self, x: i32, y: i32) -> Option<&Tile> {
        self.index_of(x, y).and_then(|index| self.tiles.get(index))
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn entities_at(&self, x: i32, y: i32) -> impl Iterator<Item = &Entity> + '_ {
        let target = Position::new(x, y);
        self.entities
            .iter()
            .filter(move |entity| entity.position == target)
    }

    /// Half-open rectangle `[x, x + width) x [y, y + height)`.
    pub fn entities_in_area(
        &self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.iter().filter(move |entity| {
            let pos = entity.position;
            pos.x >= x && pos.x < x + width && pos.y >= y && pos.y < y + height
        })
    }

    pub fn can_move_to(&self, x: i32, y: i32) -> bool {
        let Some(tile) = self.tile_at(x, y) else {
            return false;
        };
        tile.walkable && !self.entities_at(x, y).any(Entity::blocks_movement)
    }

    pub fn player(&self) -> &Entity {
        self.entities
            .iter()
            .find(|entity| entity.id == self.player_id)
            .expect("world always holds its player entity")
    }

    fn player_mut(&mut self) -> &mut Entity {
        let player_id = self.player_id;
        self.entities
            .iter_mut()
            .find(|entity| entity.id == player_id)
            .expect("world always holds its player entity")
    }

    pub fn player_position(&self) -> Position {
        self.player().position
    }

    pub fn player_stats(&self) -> PlayerStats {
        self.player()
            .player_stats()
            .copied()
            .expect("player entity carries player stats")
    }

    fn player_stats_mut(&mut self) -> &mut PlayerStats {
        self.player_mut()
            .player_stats_mut()
            .expect("player entity carries player stats")
    }

    pub fn messages(&self) -> &MessageLog {
        &self.messages
    }

    pub fn add_message(&mut self, message: impl Into<String>) {
        self.messages.add(message);
    }

    /// Routes world-mutating actions. Save and quit belong to the driver and yield `None`.
    pub fn apply(&mut self, action: &Action) -> Option<TurnOutcome> {
        match action {
            Action::Move(direction) => Some(TurnOutcome::Move(self.move_player(*direction))),
            Action::ToggleDoor(direction) => {
                Some(TurnOutcome::Door(self.toggle_door_in_direction(*direction)))
            }
            Action::Save { .. } | Action::Quit => None,
        }
    }

    fn find_index_at(
        &self,
        target: Position,
        predicate: impl Fn(&Entity) -> bool,
    ) -> Option<usize> {
        self.entities
            .iter()
            .position(|entity| entity.position == target && predicate(entity))
    }

    /// Resolution order: closed door, enemy, free step, blocked.
    pub fn move_player(&mut self, direction: Direction) -> MoveOutcome {
        let origin = self.player_position();
        let target = origin.offset(direction);

        if let Some(index) = self.find_index_at(target, Entity::is_door) {
            if self.entities[index].door_is_open() == Some(false) {
                self.entities[index].set_door_open(true);
                self.messages.add(MSG_DOOR_OPENED);
                debug!(x = target.x, y = target.y, "door_opened_by_move");
                return MoveOutcome::OpenedDoor;
            }
        }

        if let Some(index) = self.find_index_at(target, Entity::is_enemy) {
            return self.attack_enemy_at(index);
        }

        if self.can_move_to(target.x, target.y) {
            self.player_mut().position = target;
            debug!(
                from_x = origin.x,
                from_y = origin.y,
                to_x = target.x,
                to_y = target.y,
                "player_moved"
            );
            let picked_up = self.pick_up_item_at(target);
            return MoveOutcome::Moved { picked_up };
        }

        self.messages.add(MSG_BLOCKED);
        debug!(x = target.x, y = target.y, "move_blocked");
        MoveOutcome::Blocked
    }

    fn attack_enemy_at(&mut self, index: usize) -> MoveOutcome {
        let enemy = &mut self.entities[index];
        let target = enemy.id;
        let name = enemy.name().to_string();
        let (defeated, remaining) = match enemy.enemy_stats_mut() {
            Some(stats) => {
                stats.health = stats.health.saturating_sub(PLAYER_ATTACK_DAMAGE);
                (stats.is_dead(), stats.health)
            }
            None => (false, 0),
        };
        self.messages
            .add(format!("You attack the {name} for {PLAYER_ATTACK_DAMAGE} damage."));
        debug!(enemy = %name, remaining_health = remaining, "enemy_attacked");

        if defeated {
            self.entities.remove(index);
            self.messages.add(format!("You defeated the {name}!"));
            let stats = self.player_stats_mut();
            stats.experience = stats.experience.saturating_add(EXPERIENCE_PER_KILL);
            debug!(enemy = %name, experience = stats.experience, "enemy_defeated");
        }

        MoveOutcome::Attacked { target, defeated }
    }

    fn pick_up_item_at(&mut self, position: Position) -> Option<PickUp> {
        let index = self.find_index_at(position, |entity| entity.item_stats().is_some())?;
        let item = self.entities.remove(index);
        let stats = item.item_stats().copied()?;
        self.messages.add(format!("You picked up {}.", item.name()));

        let healed = match stats.kind {
            ItemKind::Potion => {
                let healed = self.player_stats_mut().heal(stats.value);
                self.messages.add(format!("You recover {healed} health."));
                healed
            }
            ItemKind::Gold => 0,
        };
        debug!(item = %item.name(), value = stats.value, healed, "item_picked_up");

        Some(PickUp {
            name: item.name().to_string(),
            kind: stats.kind,
            value: stats.value,
            healed,
        })
    }

    /// Explicit door action: never moves the player and ignores enemies and items.
    pub fn toggle_door_in_direction(&mut self, direction: Direction) -> DoorToggle {
        let target = self.player_position().offset(direction);
        let Some(index) = self.find_index_at(target, Entity::is_door) else {
            self.messages.add(MSG_NO_DOOR);
            return DoorToggle::NoDoor;
        };

        let door = &mut self.entities[index];
        let now_open = door.door_is_open() != Some(true);
        door.set_door_open(now_open);
        debug!(x = target.x, y = target.y, open = now_open, "door_toggled");
        if now_open {
            self.messages.add(MSG_DOOR_OPENED);
            DoorToggle::Opened
        } else {
            self.messages.add(MSG_DOOR_CLOSED);
            DoorToggle::Closed
        }
    }
}
