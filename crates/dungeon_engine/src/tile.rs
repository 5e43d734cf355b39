use serde::{Deserialize, Serialize};

use crate::geometry::Position;

pub const FLOOR_SYMBOL: char = '.';
pub const SOLID_ROCK_SYMBOL: char = '#';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Floor,
    Wall,
}

/// Ground description for one grid cell. Obstructions standing on the cell are entities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub position: Position,
    pub symbol: char,
    pub walkable: bool,
    pub kind: TileKind,
}

impl Tile {
    pub fn floor(position: Position) -> Self {
        Self {
            position,
            symbol: FLOOR_SYMBOL,
            walkable: true,
            kind: TileKind::Floor,
        }
    }

    pub fn solid(position: Position) -> Self {
        Self {
            position,
            symbol: SOLID_ROCK_SYMBOL,
            walkable: false,
            kind: TileKind::Wall,
        }
    }
}
