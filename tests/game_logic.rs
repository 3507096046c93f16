/// Integration tests for game logic
///
/// These drive a whole game through its public surface with a scripted
/// quantum source, so every outcome is known in advance.
use num_complex::Complex64;
use quantum_invaders::{
    AmplitudeSource, Game, GameConfig, GameError, ImageKey, MeasurementSource, PresetCircuit,
    ProjectileOwner, SoundEvent, SwarmState, Visual,
};
use std::collections::VecDeque;

struct Scripted {
    amplitudes: Vec<Complex64>,
    outcomes: VecDeque<usize>,
}

impl AmplitudeSource for Scripted {
    fn amplitudes(&self) -> Vec<Complex64> {
        self.amplitudes.clone()
    }
}

impl MeasurementSource for Scripted {
    fn measure(&mut self) -> usize {
        self.outcomes.pop_front().unwrap_or(0)
    }
}

fn real(values: &[f64]) -> Vec<Complex64> {
    values.iter().map(|v| Complex64::new(*v, 0.0)).collect()
}

fn uniform() -> Vec<Complex64> {
    real(&[(1.0f64 / 8.0).sqrt(); 8])
}

fn seeded() -> GameConfig {
    GameConfig {
        seed: Some(7),
        ..GameConfig::default()
    }
}

fn scripted_game(amplitudes: Vec<Complex64>, outcomes: &[usize]) -> Game<Scripted> {
    let source = Scripted {
        amplitudes,
        outcomes: outcomes.iter().copied().collect(),
    };
    Game::new(seeded(), source, 0).unwrap()
}

#[test]
fn test_new_game_starts_in_superposition() {
    let game = scripted_game(uniform(), &[]);

    assert_eq!(game.score(), 0);
    assert_eq!(game.lives(), 3);
    assert_eq!(game.enemies().len(), 50);
    assert_eq!(game.blockers().len(), 144);
    assert_eq!(game.swarm().state(), SwarmState::Superposition);
    assert_eq!(game.swarm().present_ships().count(), 8);
    for ship in game.swarm().present_ships() {
        assert!((ship.probability() - 0.125).abs() < 1e-9);
    }
}

#[test]
fn test_wrong_amplitude_count_is_rejected() {
    let source = Scripted {
        amplitudes: real(&[1.0, 0.0, 0.0]),
        outcomes: VecDeque::new(),
    };

    let result = Game::new(seeded(), source, 0);

    assert_eq!(
        result.err(),
        Some(GameError::AmplitudeCount {
            expected: 8,
            actual: 3
        })
    );
}

#[test]
fn test_circuit_change_with_bad_vector_is_an_error() {
    let mut game = scripted_game(uniform(), &[]);
    game.source_mut().amplitudes = real(&[1.0; 5]);

    assert!(matches!(
        game.circuit_changed(),
        Err(GameError::AmplitudeCount { actual: 5, .. })
    ));
}

#[test]
fn test_circuit_change_updates_probabilities() {
    let mut game = scripted_game(uniform(), &[]);
    let mut amplitudes = real(&[0.0; 8]);
    amplitudes[2] = Complex64::new(0.0, 1.0);
    game.source_mut().amplitudes = amplitudes;

    game.circuit_changed().unwrap();

    let swarm = game.swarm();
    assert!((swarm.ship(2).unwrap().probability() - 1.0).abs() < 1e-9);
    assert_eq!(swarm.ship(0).unwrap().probability(), 0.0);
    assert_eq!(swarm.ship(0).unwrap().opacity(), 0.0);
}

#[test]
fn test_every_tick_draws_a_measurement() {
    // Nothing is aimed at the swarm, yet each pass still asks the circuit
    let mut game = scripted_game(uniform(), &[1, 6, 2]);

    for now in [16, 32, 48] {
        game.tick(now).unwrap();
    }

    assert!(game.source().outcomes.is_empty());
    assert_eq!(game.swarm().state(), SwarmState::Superposition);
    assert_eq!(game.swarm().present_ships().count(), 8);
}

#[test]
fn test_out_of_range_outcome_fails_even_without_a_hit() {
    let mut game = scripted_game(uniform(), &[8]);

    assert_eq!(
        game.tick(16),
        Err(GameError::OutcomeOutOfRange {
            outcome: 8,
            slots: 8
        })
    );
    assert_eq!(game.swarm().state(), SwarmState::Superposition);

    // The bad outcome is gone; the next pass runs normally
    game.tick(16).unwrap();
}

#[test]
fn test_superposed_volley() {
    let mut game = scripted_game(uniform(), &[]);

    assert_eq!(game.fire(), 8);
    assert_eq!(game.drain_sounds(), vec![SoundEvent::Shoot]);
    assert!(game.drain_sounds().is_empty());

    for bullet in game.bullets() {
        assert_eq!(bullet.owner, ProjectileOwner::Player);
        assert!((bullet.strength - 0.125).abs() < 1e-9);
    }

    // One volley at a time
    assert_eq!(game.fire(), 0);
    assert!(game.drain_sounds().is_empty());
}

#[test]
fn test_navigation_wraps_around() {
    let mut game = scripted_game(uniform(), &[]);
    for _ in 0..4 {
        game.move_swarm_right();
    }
    assert_eq!(game.swarm().anchor(), 0);

    game.move_swarm_left();
    assert_eq!(game.swarm().anchor(), 7);
}

#[test]
fn test_formation_steps_after_move_time() {
    let mut game = scripted_game(uniform(), &[]);
    let start_x = game.enemies().get(0, 0).unwrap().x;

    game.tick(600).unwrap();
    assert_eq!(game.enemies().get(0, 0).unwrap().x, start_x);

    game.tick(601).unwrap();
    assert_eq!(game.enemies().get(0, 0).unwrap().x, start_x + 10);
}

#[test]
fn test_enemies_open_fire() {
    let mut game = scripted_game(uniform(), &[]);

    game.tick(701).unwrap();

    assert_eq!(game.enemy_bullets().len(), 1);
    assert_eq!(game.enemy_bullets()[0].owner, ProjectileOwner::Enemy);
}

#[test]
fn test_mystery_announces_itself() {
    let mut game = scripted_game(uniform(), &[]);
    game.tick(16).unwrap();
    assert!(game.drain_sounds().is_empty());

    game.tick(25_001).unwrap();
    assert!(game.drain_sounds().contains(&SoundEvent::MysteryEntered));
}

#[test]
fn test_render_items_include_basis_labels() {
    let game = scripted_game(uniform(), &[]);
    let items = game.render_items(0);

    let labels: Vec<&str> = items
        .iter()
        .filter_map(|item| match &item.visual {
            Visual::Text(text) => Some(text.as_str()),
            Visual::Image(_) => None,
        })
        .collect();
    assert_eq!(labels.len(), 8);
    assert!(labels.contains(&"|000>"));
    assert!(labels.contains(&"|111>"));

    let ships = items
        .iter()
        .filter(|item| item.visual == Visual::Image(ImageKey::Ship))
        .count();
    assert_eq!(ships, 8);
}

#[test]
fn test_preset_circuit_drives_the_swarm() {
    let mut game = Game::new(seeded(), PresetCircuit::new(Some(3)).unwrap(), 0).unwrap();
    // |000> to start with: one real ship, the rest invisible
    assert_eq!(game.swarm().ship(0).unwrap().probability(), 1.0);

    while game.source().preset().get_name() != "GHZ" {
        game.source_mut().cycle();
    }
    game.circuit_changed().unwrap();

    let swarm = game.swarm();
    assert!((swarm.ship(0).unwrap().probability() - 0.5).abs() < 1e-9);
    assert!((swarm.ship(7).unwrap().probability() - 0.5).abs() < 1e-9);
    assert!(swarm.ship(3).unwrap().probability().abs() < 1e-9);
}
