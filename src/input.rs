use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

use crate::game::GameState;

/// Represents semantic game actions that can be triggered by input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Step the swarm anchor one position left
    MoveLeft,
    /// Step the swarm anchor one position right
    MoveRight,
    Fire,
    /// Switch to the next preset circuit
    CycleCircuit,
    Pause,
    Resume,
    Restart,
    Quit,
}

/// Tracks the keys that can be held down for continuous input
#[derive(Debug, Default)]
struct KeyState {
    fire: bool,
}

/// Manages input polling and translates raw key events into game actions
pub struct InputManager {
    key_state: KeyState,
    oneshot_actions: Vec<InputAction>,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            key_state: KeyState::default(),
            oneshot_actions: Vec::new(),
        }
    }

    /// Polls for all input events and stores one-shot actions.
    /// Should be called once per frame before getting actions
    pub fn poll_events(&mut self, game_state: &GameState) -> color_eyre::Result<()> {
        self.oneshot_actions.clear();

        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key_event) = event::read()? {
                self.handle_key_event(key_event, game_state);
            }
        }

        Ok(())
    }

    fn handle_key_event(&mut self, key_event: KeyEvent, game_state: &GameState) {
        match key_event.kind {
            KeyEventKind::Press => {
                self.handle_key_press(key_event, game_state);
            }
            KeyEventKind::Release => {
                self.handle_key_release(key_event.code);
            }
            _ => {}
        }
    }

    fn handle_key_press(&mut self, key_event: KeyEvent, game_state: &GameState) {
        // Quit works in any state
        if matches!(
            key_event.code,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc
        ) || (key_event.code == KeyCode::Char('c')
            && key_event.modifiers.contains(KeyModifiers::CONTROL))
        {
            self.oneshot_actions.push(InputAction::Quit);
            return;
        }

        match game_state {
            GameState::Playing => match key_event.code {
                KeyCode::Char('p') | KeyCode::Char('P') => {
                    self.oneshot_actions.push(InputAction::Pause);
                }
                KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => {
                    self.oneshot_actions.push(InputAction::MoveLeft);
                }
                KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => {
                    self.oneshot_actions.push(InputAction::MoveRight);
                }
                KeyCode::Char('c') | KeyCode::Char('C') => {
                    self.oneshot_actions.push(InputAction::CycleCircuit);
                }
                KeyCode::Char(' ') => {
                    self.key_state.fire = true;
                }
                _ => {}
            },
            GameState::Paused => {
                if matches!(key_event.code, KeyCode::Char('p') | KeyCode::Char('P')) {
                    self.oneshot_actions.push(InputAction::Resume);
                }
            }
            GameState::GameOver => {
                if matches!(key_event.code, KeyCode::Char('r') | KeyCode::Char('R')) {
                    self.oneshot_actions.push(InputAction::Restart);
                }
            }
        }
    }

    fn handle_key_release(&mut self, code: KeyCode) {
        if code == KeyCode::Char(' ') {
            self.key_state.fire = false;
        }
    }

    /// Returns all actions for this frame (both continuous and one-shot).
    /// Must be called after poll_events()
    pub fn get_actions(&self, game_state: &GameState) -> Vec<InputAction> {
        let mut actions = self.oneshot_actions.clone();

        if *game_state == GameState::Playing && self.key_state.fire {
            actions.push(InputAction::Fire);
        }

        actions
    }
}
