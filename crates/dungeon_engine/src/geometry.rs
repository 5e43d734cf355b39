#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, direction: Direction) -> Self {
        Self {
            x: self.x + direction.dx(),
            y: self.y + direction.dy(),
        }
    }
}

/// Unit step on the grid. `y` grows downward, so `NORTH` is `(0, -1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Direction {
    dx: i8,
    dy: i8,
}

impl Direction {
    pub const NORTH: Self = Self { dx: 0, dy: -1 };
    pub const SOUTH: Self = Self { dx: 0, dy: 1 };
    pub const EAST: Self = Self { dx: 1, dy: 0 };
    pub const WEST: Self = Self { dx: -1, dy: 0 };
    pub const NORTH_EAST: Self = Self { dx: 1, dy: -1 };
    pub const NORTH_WEST: Self = Self { dx: -1, dy: -1 };
    pub const SOUTH_EAST: Self = Self { dx: 1, dy: 1 };
    pub const SOUTH_WEST: Self = Self { dx: -1, dy: 1 };

    pub const ALL: [Self; 8] = [
        Self::NORTH,
        Self::NORTH_EAST,
        Self::EAST,
        Self::SOUTH_EAST,
        Self::SOUTH,
        Self::SOUTH_WEST,
        Self::WEST,
        Self::NORTH_WEST,
    ];

    pub fn new(dx: i32, dy: i32) -> Option<Self> {
        let in_range = (-1..=1).contains(&dx) && (-1..=1).contains(&dy);
        if !in_range || (dx == 0 && dy == 0) {
            return None;
        }
        Some(Self {
            dx: dx as i8,
            dy: dy as i8,
        })
    }

    pub fn dx(self) -> i32 {
        i32::from(self.dx)
    }

    pub fn dy(self) -> i32 {
        i32::from(self.dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_rejects_zero_and_out_of_range_components() {
        assert_eq!(Direction::new(0, 0), None);
        assert_eq!(Direction::new(2, 0), None);
        assert_eq!(Direction::new(0, -2), None);
        assert_eq!(Direction::new(1, -1), Some(Direction::NORTH_EAST));
    }

    #[test]
    fn all_directions_are_distinct_unit_steps() {
        for (index, direction) in Direction::ALL.iter().enumerate() {
            assert_eq!(Direction::new(direction.dx(), direction.dy()), Some(*direction));
            assert!(!Direction::ALL[index + 1..].contains(direction));
        }
    }

    #[test]
    fn offset_applies_screen_space_direction() {
        let origin = Position::new(4, 4);
        assert_eq!(origin.offset(Direction::NORTH), Position::new(4, 3));
        assert_eq!(origin.offset(Direction::SOUTH_WEST), Position::new(3, 5));
    }
}
