use dungeon_engine::{Action, Direction};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    Act(Action),
    Cancelled,
    Help,
    Unknown(String),
    Empty,
}

/// Vi-style keys plus WASD for the four cardinal directions.
fn direction_for_key(key: &str) -> Option<Direction> {
    let direction = match key {
        "k" | "w" => Direction::NORTH,
        "j" | "s" => Direction::SOUTH,
        "l" | "d" => Direction::EAST,
        "h" | "a" => Direction::WEST,
        "u" => Direction::NORTH_EAST,
        "y" => Direction::NORTH_WEST,
        "n" => Direction::SOUTH_EAST,
        "b" => Direction::SOUTH_WEST,
        _ => return None,
    };
    Some(direction)
}

pub(crate) fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Command::Empty;
    }
    let (head, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (trimmed, ""),
    };
    let head_lower = head.to_ascii_lowercase();

    if rest.is_empty() {
        if let Some(direction) = direction_for_key(&head_lower) {
            return Command::Act(Action::Move(direction));
        }
    }

    match head_lower.as_str() {
        "o" | "open" | "door" => match direction_for_key(&rest.to_ascii_lowercase()) {
            Some(direction) => Command::Act(Action::ToggleDoor(direction)),
            None => Command::Cancelled,
        },
        "save" => {
            if rest.is_empty() {
                Command::Cancelled
            } else {
                Command::Act(Action::Save {
                    name: rest.to_string(),
                })
            }
        }
        "q" | "quit" | "exit" => Command::Act(Action::Quit),
        "?" | "help" => Command::Help,
        _ => Command::Unknown(trimmed.to_string()),
    }
}

pub(crate) fn help_text() -> &'static str {
    "Move: h j k l y u b n (or w a s d) | o <dir>: toggle door | save <name> | quit"
}
