use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use dungeon_engine::{Action, Camera, JsonFileStore, World, WorldStore};
use tracing::{debug, error, info, warn};

use super::bootstrap::{self, LaunchMode, StartupError};
use super::config::GameConfig;
use super::input::{help_text, parse_command, Command};
use super::render::render_frame;

const PROMPT: &str = "> ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SessionEnd {
    Quit,
    InputClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// One running game: the world, the camera that follows the player, and where saves go.
pub(crate) struct Session<S> {
    world: World,
    camera: Camera,
    store: S,
    turn: u64,
}

impl<S: WorldStore> Session<S> {
    pub(crate) fn new(world: World, camera: Camera, store: S) -> Self {
        Self {
            world,
            camera,
            store,
            turn: 0,
        }
    }

    pub(crate) fn run<R: BufRead, W: Write>(
        &mut self,
        input: R,
        output: &mut W,
    ) -> io::Result<SessionEnd> {
        self.draw(output)?;
        for line in input.lines() {
            let line = line?;
            if self.handle_line(&line) == Flow::Quit {
                info!(turns = self.turn, "session_quit");
                return Ok(SessionEnd::Quit);
            }
            self.draw(output)?;
        }
        info!(turns = self.turn, "session_input_closed");
        Ok(SessionEnd::InputClosed)
    }

    fn handle_line(&mut self, line: &str) -> Flow {
        match parse_command(line) {
            Command::Act(Action::Quit) => return Flow::Quit,
            Command::Act(Action::Save { name }) => self.save(&name),
            Command::Act(action) => {
                if let Some(outcome) = self.world.apply(&action) {
                    self.turn += 1;
                    debug!(turn = self.turn, outcome = ?outcome, "turn_resolved");
                }
            }
            Command::Cancelled => self.world.add_message("Cancelled."),
            Command::Help => self.world.add_message(help_text()),
            Command::Unknown(text) => {
                self.world.add_message(format!("Unknown command: {text}"));
            }
            Command::Empty => {}
        }
        Flow::Continue
    }

    fn save(&mut self, name: &str) {
        match self.store.save(&self.world, name) {
            Ok(id) => self
                .world
                .add_message(format!("Game saved as '{name}' (id {id}).")),
            Err(error) => {
                warn!(error = %error, "save_failed");
                self.world.add_message(format!("Save failed: {error}"));
            }
        }
    }

    fn draw<W: Write>(&mut self, output: &mut W) -> io::Result<()> {
        let pos = self.world.player_position();
        self.camera.center_on(pos.x, pos.y);
        for line in render_frame(&self.world, &self.camera) {
            writeln!(output, "{line}")?;
        }
        write!(output, "{PROMPT}")?;
        output.flush()
    }
}

pub(crate) fn run(args: &[String]) -> ExitCode {
    bootstrap::init_tracing();
    match run_inner(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(StartupError::Usage(message)) => {
            eprintln!("{message}\n\n{}", bootstrap::usage_text());
            ExitCode::from(2)
        }
        Err(err) => {
            error!(error = %err, "startup_failed");
            ExitCode::FAILURE
        }
    }
}

fn run_inner(args: &[String]) -> Result<(), StartupError> {
    let mode = bootstrap::parse_args(args)?;
    if mode == LaunchMode::Help {
        println!("{}", bootstrap::usage_text());
        return Ok(());
    }

    let config = GameConfig::from_env()?;
    let store = JsonFileStore::open(&config.save_dir)?;
    info!(save_dir = %store.root().display(), mode = ?mode, "startup");

    if mode == LaunchMode::List {
        let mut stdout = io::stdout().lock();
        bootstrap::write_save_list(&store, &mut stdout)?;
        return Ok(());
    }

    let world = bootstrap::open_world(&mode, &config, &store)?;
    let camera = Camera::new(config.view_width as i32, config.view_height as i32);
    let mut session = Session::new(world, camera, store);
    let stdin = io::stdin().lock();
    let mut stdout = io::stdout().lock();
    session
        .run(stdin, &mut stdout)
        .map_err(StartupError::Terminal)?;
    Ok(())
}
