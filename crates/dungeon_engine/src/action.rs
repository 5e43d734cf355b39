use crate::geometry::Direction;

/// Everything a driver can ask of a running game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Move(Direction),
    ToggleDoor(Direction),
    Save { name: String },
    Quit,
}
