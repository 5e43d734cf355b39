use dungeon_engine::{Camera, World};

const OUTSIDE_WORLD: char = ' ';

/// Text frame for one turn: viewport rows, a status line, a blank line, then the
/// message log newest first.
pub(crate) fn render_frame(world: &World, camera: &Camera) -> Vec<String> {
    let width = camera.width().max(0);
    let height = camera.height().max(0);
    let origin = camera.top_left();

    let mut cells = vec![vec![OUTSIDE_WORLD; width as usize]; height as usize];
    for (row, line) in cells.iter_mut().enumerate() {
        for (column, cell) in line.iter_mut().enumerate() {
            let pos = camera.view_to_world(column as i32, row as i32);
            if let Some(tile) = world.tile_at(pos.x, pos.y) {
                *cell = tile.symbol;
            }
        }
    }

    let player = world.player();
    let visible = world
        .entities_in_area(origin.x, origin.y, width, height)
        .filter(|entity| entity.id != player.id)
        .chain(std::iter::once(player));
    for entity in visible {
        let column = entity.position.x - origin.x;
        let row = entity.position.y - origin.y;
        if (0..width).contains(&column) && (0..height).contains(&row) {
            cells[row as usize][column as usize] = entity.symbol();
        }
    }

    let mut lines = cells
        .into_iter()
        .map(|line| line.into_iter().collect::<String>())
        .collect::<Vec<_>>();
    lines.push(status_line(world));
    lines.push(String::new());
    lines.extend(world.messages().snapshot().into_iter().map(str::to_string));
    lines
}

pub(crate) fn status_line(world: &World) -> String {
    let stats = world.player_stats();
    let pos = world.player_position();
    format!(
        "HP {}/{}  Level {}  XP {}  @ ({}, {})",
        stats.health, stats.max_health, stats.level, stats.experience, pos.x, pos.y
    )
}

#[cfg(test)]
mod tests {
    use dungeon_engine::{Direction, DEFAULT_WORLD_HEIGHT, DEFAULT_WORLD_WIDTH};

    use super::*;

    fn centered_camera(world: &World, width: i32, height: i32) -> Camera {
        let mut camera = Camera::new(width, height);
        let pos = world.player_position();
        camera.center_on(pos.x, pos.y);
        camera
    }

    #[test]
    fn player_sits_at_view_center_with_door_beside() {
        let world = World::generate(DEFAULT_WORLD_WIDTH, DEFAULT_WORLD_HEIGHT);
        let camera = centered_camera(&world, 5, 3);
        let frame = render_frame(&world, &camera);

        assert_eq!(frame[0], "...#.");
        assert_eq!(frame[1], "..@+.");
        assert_eq!(frame[2], "...#.");
        assert_eq!(frame[3], "HP 100/100  Level 1  XP 0  @ (16, 11)");
        assert_eq!(frame[4], "");
        assert_eq!(frame.len(), 5);
    }

    #[test]
    fn cells_outside_the_grid_are_blank() {
        let world = World::generate(DEFAULT_WORLD_WIDTH, DEFAULT_WORLD_HEIGHT);
        let mut camera = Camera::new(4, 2);
        camera.center_on(0, 0);
        let frame = render_frame(&world, &camera);
        assert_eq!(frame[0], "    ");
        assert_eq!(frame[1], "  ##");
    }

    #[test]
    fn messages_follow_the_status_line() {
        let mut world = World::generate(DEFAULT_WORLD_WIDTH, DEFAULT_WORLD_HEIGHT);
        world.move_player(Direction::EAST);
        let camera = centered_camera(&world, 5, 3);
        let frame = render_frame(&world, &camera);
        assert_eq!(frame[1], "..@/.");
        assert_eq!(frame.last().map(String::as_str), Some("You open the door."));
    }
}
