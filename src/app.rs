use color_eyre::Result;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::time::{Duration, Instant};

use crate::audio::AudioManager;
use crate::config::GameConfig;
use crate::game::{Game, GameState};
use crate::input::{InputAction, InputManager};
use crate::quantum::PresetCircuit;
use crate::renderer::{GameRenderer, RenderView};

/// The main application which holds the state and logic of the application.
pub struct App {
    running: bool,
    game_state: GameState,
    config: GameConfig,
    game: Game<PresetCircuit>,
    /// Frames info
    last_frame_time: Instant,
    fps: u32,
    /// Game clock; every timestamp handed to the game is measured from here
    game_start_time: Instant,
    /// Time spent paused, kept off the game clock
    paused_ms: u64,
    paused_at: Option<Instant>,
    final_time_secs: Option<u64>,
    /// internal components
    input_manager: InputManager,
    renderer: GameRenderer,
    audio_manager: AudioManager,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(config: GameConfig) -> Result<Self> {
        let game = Game::new(config.clone(), PresetCircuit::new(config.seed)?, 0)?;
        let now = Instant::now();
        Ok(Self {
            running: true,
            game_state: GameState::Playing,
            config,
            game,
            last_frame_time: now,
            fps: 0,
            game_start_time: now,
            paused_ms: 0,
            paused_at: None,
            final_time_secs: None,
            input_manager: InputManager::new(),
            renderer: GameRenderer::new(),
            audio_manager: AudioManager::default(),
        })
    }

    /// Milliseconds of unpaused play since the game started
    fn now_ms(&self) -> u64 {
        let paused = self.paused_at.map_or(self.paused_ms, |at| {
            self.paused_ms + at.elapsed().as_millis() as u64
        });
        (self.game_start_time.elapsed().as_millis() as u64).saturating_sub(paused)
    }

    /// Run the application's main loop.
    pub fn run(mut self, terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
        while self.running {
            let now = Instant::now();
            let frame_time = now.duration_since(self.last_frame_time);
            self.last_frame_time = now;
            if frame_time.as_micros() > 0 {
                self.fps = (1_000_000 / frame_time.as_micros()) as u32;
            }

            let game_now = self.now_ms();
            let items = self.game.render_items(game_now);
            terminal.draw(|frame| {
                let elapsed_time_secs = self.final_time_secs.unwrap_or(game_now / 1000);
                let view = RenderView {
                    game_state: self.game_state,
                    items: &items,
                    score: self.game.score(),
                    lives: self.game.lives(),
                    circuit_name: self.game.source().preset().get_name(),
                    swarm_state: self.game.swarm().state(),
                    between_rounds: self.game.is_between_rounds(),
                    area: frame.area(),
                    fps: self.fps,
                    elapsed_time_secs,
                };
                self.renderer.render(frame, &view);
            })?;

            self.input_manager.poll_events(&self.game_state)?;
            let actions = self.input_manager.get_actions(&self.game_state);
            self.process_actions(&actions)?;

            if self.game_state == GameState::Playing {
                self.game.tick(self.now_ms())?;
                for sound in self.game.drain_sounds() {
                    self.audio_manager.play(sound);
                }
                if self.game.is_game_over() {
                    self.final_time_secs = Some(self.now_ms() / 1000);
                    self.game_state = GameState::GameOver;
                }
            }

            std::thread::sleep(Duration::from_millis(self.config.frame_delay_ms));
        }
        Ok(())
    }

    fn process_actions(&mut self, actions: &[InputAction]) -> Result<()> {
        for action in actions {
            match action {
                InputAction::Quit => {
                    self.running = false;
                }
                InputAction::Pause => {
                    self.paused_at = Some(Instant::now());
                    self.game_state = GameState::Paused;
                }
                InputAction::Resume => {
                    if let Some(at) = self.paused_at.take() {
                        self.paused_ms += at.elapsed().as_millis() as u64;
                    }
                    self.game_state = GameState::Playing;
                }
                InputAction::Restart => {
                    tracing::info!("restarting");
                    *self = Self::new(self.config.clone())?;
                }
                InputAction::MoveLeft => self.game.move_swarm_left(),
                InputAction::MoveRight => self.game.move_swarm_right(),
                InputAction::CycleCircuit => {
                    self.game.source_mut().cycle();
                    self.game.circuit_changed()?;
                }
                InputAction::Fire => {
                    self.game.fire();
                }
            }
        }
        Ok(())
    }
}
