use crate::geometry::Position;

/// Fixed-size window into world space, recentred on the player before each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Camera {
    width: i32,
    height: i32,
    center: Position,
}

impl Camera {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            center: Position::default(),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn center_on(&mut self, x: i32, y: i32) {
        self.center = Position::new(x, y);
    }

    pub fn top_left(&self) -> Position {
        Position::new(
            self.center.x - self.width / 2,
            self.center.y - self.height / 2,
        )
    }

    pub fn view_to_world(&self, column: i32, row: i32) -> Position {
        let origin = self.top_left();
        Position::new(origin.x + column, origin.y + row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_left_is_center_minus_half_size() {
        let mut camera = Camera::new(40, 20);
        camera.center_on(16, 11);
        assert_eq!(camera.top_left(), Position::new(-4, 1));
    }

    #[test]
    fn odd_sizes_truncate_half_extent() {
        let mut camera = Camera::new(7, 5);
        camera.center_on(10, 10);
        assert_eq!(camera.top_left(), Position::new(7, 8));
        assert_eq!(camera.view_to_world(3, 2), Position::new(10, 10));
    }
}
