//! World geometry and timing for the game.
//!
//! All positions live in an 800x640 world; the renderer scales them into
//! whatever terminal area is available.

pub const SCREEN_WIDTH: i32 = 800;
pub const SCREEN_HEIGHT: i32 = 640;

/// Number of ships in the swarm, one per 3-qubit basis state
pub const NUMBER_OF_SHIPS: usize = 8;

/// Anchor positions the swarm can be moved between
pub const POSITIONS: [i32; NUMBER_OF_SHIPS] = [20, 120, 220, 320, 420, 520, 620, 720];
/// Per-ship offset from the anchor, wrapped around the screen width
pub const OFFSETS: [i32; NUMBER_OF_SHIPS] = [-400, -300, -200, -100, 0, 100, 200, 300];
/// Starting distribution (in percent) before the first amplitude query
pub const DISTRIBUTIONS: [f64; NUMBER_OF_SHIPS] = [25.0, 25.0, 15.0, 15.0, 7.0, 7.0, 3.0, 3.0];
pub const LABEL_TEXT: [&str; NUMBER_OF_SHIPS] = [
    "|000>", "|001>", "|010>", "|011>", "|100>", "|101>", "|110>", "|111>",
];

pub const SHIP_Y: i32 = 540;
pub const SHIP_WIDTH: i32 = 50;
pub const SHIP_HEIGHT: i32 = 48;
pub const LABEL_Y: i32 = 600;
/// Where non-classical ships are parked while the swarm is measured
pub const OFFSCREEN_X: i32 = 999_999;

pub const ENEMY_DEFAULT_POSITION: i32 = 65;
pub const ENEMY_MOVE_DOWN: i32 = 35;
pub const ENEMY_HEALTH: f64 = 96.0;
pub const ENEMY_WIDTH: i32 = 40;
pub const ENEMY_HEIGHT: i32 = 35;
pub const ENEMY_START_X: i32 = 157;
pub const ENEMY_COLUMN_SPACING: i32 = 50;
pub const ENEMY_ROW_SPACING: i32 = 45;
pub const ENEMY_STEP: i32 = 10;
/// Horizontal moves allowed per sweep before slack is added
pub const BASE_MOVES: u32 = 30;
/// Extra moves granted each time an edge column dies
pub const SLACK_PER_COLUMN: u32 = 5;
pub const ENEMY_MOVE_TIME_MS: u64 = 600;
pub const ENEMY_MOVE_TIME_FEW_MS: u64 = 400;
pub const ENEMY_MOVE_TIME_LAST_MS: u64 = 200;
pub const ENEMY_FIRE_INTERVAL_MS: u64 = 700;

pub const BULLET_MAX_DAMAGE: f64 = 96.0;
pub const BULLET_WIDTH: i32 = 5;
pub const BULLET_HEIGHT: i32 = 15;
pub const LASER_SPEED: i32 = 15;
pub const ENEMY_LASER_SPEED: i32 = 5;

pub const BLOCKERS_POSITION: i32 = 450;
pub const BLOCKER_SIZE: i32 = 10;
pub const BLOCKER_GROUPS: i32 = 4;

pub const MYSTERY_Y: i32 = 45;
pub const MYSTERY_WIDTH: i32 = 75;
pub const MYSTERY_HEIGHT: i32 = 35;
pub const MYSTERY_MOVE_TIME_MS: u64 = 25_000;
pub const MYSTERY_SCORES: [u32; 4] = [50, 100, 150, 300];

/// Formation bottom at which enemies can reach the ships
pub const PLAYER_ROW_Y: i32 = SHIP_Y;
/// Formation bottom that ends the game outright
pub const FATAL_BOTTOM_Y: i32 = 600;

/// How long after a collapse the swarm counts as measuring
pub const MEASURE_WINDOW_MS: u64 = 600;
/// After this long a stale classical survivor is purged
pub const STALE_SHIP_MS: u64 = 300;
/// After this long a destroyed swarm is rebuilt
pub const RESPAWN_MS: u64 = 900;
pub const NEXT_ROUND_DELAY_MS: u64 = 3000;

/// Runtime knobs for a game session
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub starting_lives: u8,
    pub enemy_rows: usize,
    pub enemy_columns: usize,
    /// Fixed seed for enemy fire and score rolls; random when `None`
    pub seed: Option<u64>,
    /// Sleep between frames in the terminal loop
    pub frame_delay_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_lives: 3,
            enemy_rows: 5,
            enemy_columns: 10,
            seed: None,
            frame_delay_ms: 16,
        }
    }
}
