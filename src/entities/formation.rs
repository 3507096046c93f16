use rand::Rng;
use std::collections::BTreeSet;

use super::enemy::Enemy;
use crate::config::{
    BASE_MOVES, ENEMY_COLUMN_SPACING, ENEMY_HEIGHT, ENEMY_MOVE_DOWN, ENEMY_MOVE_TIME_FEW_MS,
    ENEMY_MOVE_TIME_LAST_MS, ENEMY_MOVE_TIME_MS, ENEMY_ROW_SPACING, ENEMY_START_X, ENEMY_STEP,
    SLACK_PER_COLUMN,
};

/// Grid of invaders sweeping left and right, dropping a row at each edge.
#[derive(Debug, Clone)]
pub struct EnemiesGroup {
    grid: Vec<Vec<Option<Enemy>>>,
    rows: usize,
    columns: usize,
    count: usize,
    /// 1 moving right, -1 moving left
    direction: i32,
    moves_taken: u32,
    /// Extra travel to the right, earned as right-hand columns die
    left_slack: u32,
    /// Extra travel to the left, earned as left-hand columns die
    right_slack: u32,
    move_time: u64,
    timer: u64,
    /// Lowest edge of any enemy, in world y
    bottom: i32,
    alive_columns: BTreeSet<usize>,
    left_alive_column: usize,
    right_alive_column: usize,
}

impl EnemiesGroup {
    pub fn new(rows: usize, columns: usize, enemy_position: i32, now: u64) -> Self {
        let grid = (0..rows)
            .map(|row| {
                (0..columns)
                    .map(|column| {
                        Some(Enemy::new(
                            row,
                            column,
                            ENEMY_START_X + column as i32 * ENEMY_COLUMN_SPACING,
                            enemy_position + row as i32 * ENEMY_ROW_SPACING,
                        ))
                    })
                    .collect()
            })
            .collect();

        Self {
            grid,
            rows,
            columns,
            count: rows * columns,
            direction: 1,
            // Start in the middle of the first sweep
            moves_taken: BASE_MOVES / 2,
            left_slack: 0,
            right_slack: 0,
            move_time: ENEMY_MOVE_TIME_MS,
            timer: now,
            bottom: enemy_position + rows.saturating_sub(1) as i32 * ENEMY_ROW_SPACING
                + ENEMY_HEIGHT,
            alive_columns: (0..columns).collect(),
            left_alive_column: 0,
            right_alive_column: columns.saturating_sub(1),
        }
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn direction(&self) -> i32 {
        self.direction
    }

    pub fn moves_taken(&self) -> u32 {
        self.moves_taken
    }

    pub fn left_slack(&self) -> u32 {
        self.left_slack
    }

    pub fn right_slack(&self) -> u32 {
        self.right_slack
    }

    pub fn move_time(&self) -> u64 {
        self.move_time
    }

    pub fn bottom(&self) -> i32 {
        self.bottom
    }

    pub fn alive_columns(&self) -> &BTreeSet<usize> {
        &self.alive_columns
    }

    pub fn left_alive_column(&self) -> usize {
        self.left_alive_column
    }

    pub fn right_alive_column(&self) -> usize {
        self.right_alive_column
    }

    pub fn get(&self, row: usize, column: usize) -> Option<&Enemy> {
        self.grid.get(row)?.get(column)?.as_ref()
    }

    pub fn enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.grid.iter().flatten().flatten()
    }

    fn enemies_mut(&mut self) -> impl Iterator<Item = &mut Enemy> {
        self.grid.iter_mut().flatten().flatten()
    }

    /// Moves allowed in the current direction before reversing
    pub fn max_moves(&self) -> u32 {
        if self.direction == 1 {
            BASE_MOVES + self.left_slack
        } else {
            BASE_MOVES + self.right_slack
        }
    }

    /// Advance one step if the move interval has elapsed. Returns whether
    /// the formation moved.
    pub fn update(&mut self, now: u64) -> bool {
        if now.saturating_sub(self.timer) <= self.move_time {
            return false;
        }
        self.step();
        self.timer = now;
        true
    }

    fn step(&mut self) {
        if self.moves_taken >= self.max_moves() {
            self.direction = -self.direction;
            self.moves_taken = 0;
            let mut bottom = 0;
            for enemy in self.enemies_mut() {
                enemy.y += ENEMY_MOVE_DOWN;
                enemy.toggle_frame();
                bottom = bottom.max(enemy.y + ENEMY_HEIGHT);
            }
            self.bottom = bottom;
            tracing::debug!(direction = self.direction, bottom, "formation reversed");
        } else {
            let velocity = ENEMY_STEP * self.direction;
            for enemy in self.enemies_mut() {
                enemy.x += velocity;
                enemy.toggle_frame();
            }
            self.moves_taken += 1;
        }
    }

    pub fn is_column_dead(&self, column: usize) -> bool {
        self.grid.iter().all(|row| row[column].is_none())
    }

    /// Subtract `damage` from the enemy at (row, column), killing it when
    /// its health runs out. Returns the enemy if it died.
    pub fn apply_damage(&mut self, row: usize, column: usize, damage: f64) -> Option<Enemy> {
        let enemy = self.grid.get_mut(row)?.get_mut(column)?.as_mut()?;
        enemy.take_damage(damage);
        if enemy.is_alive() {
            return None;
        }
        self.kill(row, column)
    }

    /// Remove the enemy at (row, column) and update the column bookkeeping.
    /// Killing an empty cell does nothing.
    pub fn kill(&mut self, row: usize, column: usize) -> Option<Enemy> {
        let enemy = self.grid.get_mut(row)?.get_mut(column)?.take()?;
        self.count -= 1;
        self.update_speed();

        let mut is_column_dead = self.is_column_dead(column);
        if is_column_dead {
            self.alive_columns.remove(&column);
        }

        // Walk inward past every column that is already empty
        if column == self.right_alive_column {
            while self.right_alive_column > 0 && is_column_dead {
                self.right_alive_column -= 1;
                self.left_slack += SLACK_PER_COLUMN;
                is_column_dead = self.is_column_dead(self.right_alive_column);
            }
        } else if column == self.left_alive_column {
            while self.left_alive_column + 1 < self.columns && is_column_dead {
                self.left_alive_column += 1;
                self.right_slack += SLACK_PER_COLUMN;
                is_column_dead = self.is_column_dead(self.left_alive_column);
            }
        }

        Some(enemy)
    }

    fn update_speed(&mut self) {
        if self.count == 1 {
            self.move_time = ENEMY_MOVE_TIME_LAST_MS;
        } else if self.count <= 10 {
            self.move_time = ENEMY_MOVE_TIME_FEW_MS;
        }
    }

    /// Lowest enemy of a random living column, the one that gets to shoot
    pub fn random_bottom<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Enemy> {
        if self.alive_columns.is_empty() {
            return None;
        }
        let pick = rng.random_range(0..self.alive_columns.len());
        let column = *self.alive_columns.iter().nth(pick)?;
        (0..self.rows)
            .rev()
            .find_map(|row| self.grid[row][column].as_ref())
    }
}
