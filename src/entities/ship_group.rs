use num_complex::Complex64;

use super::explosion::ShipExplosion;
use super::projectile::Projectile;
use super::ship::Ship;
use crate::config::{
    LABEL_TEXT, LABEL_Y, MEASURE_WINDOW_MS, NUMBER_OF_SHIPS, OFFSCREEN_X, OFFSETS, POSITIONS,
    SCREEN_WIDTH, SHIP_HEIGHT, SHIP_WIDTH, SHIP_Y,
};
use crate::error::GameError;
use crate::sprite::{Hitbox, ImageKey, RenderItem};

/// What occupies one position of the swarm
#[derive(Debug, Clone)]
pub enum Slot {
    Present(Ship),
    Exploding(ShipExplosion),
    Absent,
}

impl Slot {
    pub fn ship(&self) -> Option<&Ship> {
        match self {
            Slot::Present(ship) => Some(ship),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwarmState {
    Superposition,
    /// Collapsed onto `ship` at time `since`. The slot may have been
    /// emptied since, so treat `ship` as a weak reference.
    Measured { ship: usize, since: u64 },
}

/// The player's swarm: a fixed row of slots whose ships share one
/// quantum state.
#[derive(Debug, Clone)]
pub struct ShipGroup {
    slots: Vec<Slot>,
    anchor: usize,
    state: SwarmState,
    measuring: bool,
}

impl ShipGroup {
    pub fn new(anchor: usize) -> Self {
        Self::with_slots(NUMBER_OF_SHIPS, anchor)
    }

    /// A swarm using only the first `count` basis states.
    pub fn with_slots(count: usize, anchor: usize) -> Self {
        let count = count.min(NUMBER_OF_SHIPS);
        Self {
            slots: (0..count).map(|id| Slot::Present(Ship::new(id))).collect(),
            anchor: anchor % POSITIONS.len(),
            state: SwarmState::Superposition,
            measuring: false,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn anchor(&self) -> usize {
        self.anchor
    }

    pub fn state(&self) -> SwarmState {
        self.state
    }

    pub fn measuring(&self) -> bool {
        self.measuring
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn ship(&self, id: usize) -> Option<&Ship> {
        self.slots.get(id).and_then(Slot::ship)
    }

    pub fn present_ships(&self) -> impl Iterator<Item = &Ship> {
        self.slots.iter().filter_map(Slot::ship)
    }

    pub fn is_empty(&self) -> bool {
        self.present_ships().next().is_none()
    }

    pub fn classical_count(&self) -> usize {
        self.present_ships().filter(|ship| ship.classical).count()
    }

    /// The ship chosen by the last measurement, if it is still around
    pub fn measured_ship(&self) -> Option<&Ship> {
        match self.state {
            SwarmState::Measured { ship, .. } => self.ship(ship),
            SwarmState::Superposition => None,
        }
    }

    pub fn update(&mut self, now: u64) {
        if let SwarmState::Measured { since, .. } = self.state
            && self.measuring
            && now.saturating_sub(since) > MEASURE_WINDOW_MS
        {
            self.measuring = false;
        }
    }

    /// Feed a fresh statevector into the swarm. The vector must have one
    /// amplitude per slot; it does not have to be normalised.
    pub fn update_probabilities(&mut self, amplitudes: &[Complex64]) -> Result<(), GameError> {
        if amplitudes.len() != self.slots.len() {
            return Err(GameError::AmplitudeCount {
                expected: self.slots.len(),
                actual: amplitudes.len(),
            });
        }
        for (slot, amplitude) in self.slots.iter_mut().zip(amplitudes) {
            if let Slot::Present(ship) = slot {
                ship.amplitude = *amplitude;
            }
        }
        Ok(())
    }

    /// Collapse the swarm onto `outcome`. Every other ship is destroyed.
    ///
    /// Returns whether a ship survived; the outcome slot may already be empty.
    pub fn measure(&mut self, outcome: usize, now: u64) -> Result<bool, GameError> {
        if outcome >= self.slots.len() {
            return Err(GameError::OutcomeOutOfRange {
                outcome,
                slots: self.slots.len(),
            });
        }

        let mut survived = false;
        for (id, slot) in self.slots.iter_mut().enumerate() {
            let Slot::Present(ship) = slot else {
                continue;
            };
            if id == outcome {
                ship.classical = true;
                survived = true;
            } else {
                *slot = Slot::Absent;
            }
        }

        self.state = SwarmState::Measured {
            ship: outcome,
            since: now,
        };
        self.measuring = true;
        tracing::info!(outcome, survived, "swarm measured");
        Ok(survived)
    }

    pub fn move_left(&mut self) {
        self.anchor = (self.anchor + POSITIONS.len() - 1) % POSITIONS.len();
        self.reset_to_superposition();
    }

    pub fn move_right(&mut self) {
        self.anchor = (self.anchor + 1) % POSITIONS.len();
        self.reset_to_superposition();
    }

    /// Moving the swarm discards any pending collapse.
    fn reset_to_superposition(&mut self) {
        for slot in &mut self.slots {
            if let Slot::Present(ship) = slot {
                ship.classical = false;
            }
        }
        self.state = SwarmState::Superposition;
        self.measuring = false;
    }

    /// One laser per present ship. Inside the measuring window only the
    /// measured ship may fire, so a collapse never lets a second volley out.
    pub fn fire(&self) -> Vec<Projectile> {
        if self.measuring {
            return self
                .measured_ship()
                .map(|ship| ship.fire(self.anchor))
                .into_iter()
                .collect();
        }
        self.present_ships()
            .map(|ship| ship.fire(self.anchor))
            .collect()
    }

    pub fn ship_x(&self, ship: &Ship) -> i32 {
        match self.state {
            SwarmState::Measured { ship: measured, .. } if ship.id != measured => OFFSCREEN_X,
            _ => ship.anchored_x(self.anchor),
        }
    }

    pub fn ship_hitbox(&self, ship: &Ship) -> Hitbox {
        Hitbox::new(self.ship_x(ship), SHIP_Y, SHIP_WIDTH, SHIP_HEIGHT)
    }

    /// Ids of every present ship overlapping `hitbox`
    pub fn ships_hit_by(&self, hitbox: &Hitbox) -> Vec<usize> {
        self.present_ships()
            .filter(|ship| self.ship_hitbox(ship).overlaps(hitbox))
            .map(|ship| ship.id)
            .collect()
    }

    /// Turn a present ship into an explosion at its current position.
    /// Returns false when the slot held no ship.
    pub fn explode(&mut self, id: usize, now: u64) -> bool {
        let Some(ship) = self.ship(id) else {
            return false;
        };
        let x = self.ship_x(ship);
        self.slots[id] = Slot::Exploding(ShipExplosion::new(id, x, SHIP_Y, now));
        true
    }

    /// Remove a ship without an explosion. No-op on an empty slot.
    pub fn destroy(&mut self, id: usize) -> bool {
        match self.slots.get_mut(id) {
            Some(slot) if matches!(slot, Slot::Present(_)) => {
                *slot = Slot::Absent;
                true
            }
            _ => false,
        }
    }

    pub fn render_items(&self, now: u64) -> Vec<RenderItem> {
        let mut items = Vec::with_capacity(self.slots.len() * 2);
        for slot in &self.slots {
            match slot {
                Slot::Present(ship) => items.push(RenderItem::image(
                    self.ship_hitbox(ship),
                    ImageKey::Ship,
                    ship.opacity(),
                )),
                Slot::Exploding(explosion) => items.extend(explosion.render_item(now)),
                Slot::Absent => {}
            }
        }
        for (id, label) in LABEL_TEXT.iter().enumerate().take(self.slots.len()) {
            let x = (POSITIONS[self.anchor] + OFFSETS[id]).rem_euclid(SCREEN_WIDTH);
            items.push(RenderItem::text(x, LABEL_Y, *label));
        }
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn real(values: &[f64]) -> Vec<Complex64> {
        values.iter().map(|p| Complex64::new(p.sqrt(), 0.0)).collect()
    }

    #[test]
    fn test_new_swarm_is_superposed() {
        let swarm = ShipGroup::new(4);
        assert_eq!(swarm.len(), NUMBER_OF_SHIPS);
        assert_eq!(swarm.state(), SwarmState::Superposition);
        assert_eq!(swarm.classical_count(), 0);
        assert!(swarm.measured_ship().is_none());
    }

    #[test]
    fn test_update_probabilities_rejects_wrong_length() {
        let mut swarm = ShipGroup::new(4);
        let err = swarm.update_probabilities(&real(&[1.0])).unwrap_err();
        assert_eq!(
            err,
            GameError::AmplitudeCount {
                expected: 8,
                actual: 1
            }
        );
    }

    #[test]
    fn test_update_probabilities_tolerates_unnormalised_input() {
        let mut swarm = ShipGroup::with_slots(2, 0);
        swarm.update_probabilities(&real(&[0.9, 0.9])).unwrap();
        assert!((swarm.ship(0).unwrap().probability() - 0.9).abs() < 1e-12);
        assert_eq!(swarm.ship(1).unwrap().opacity(), 1.0);
    }

    #[test]
    fn test_measure_two_slot_swarm() {
        let mut swarm = ShipGroup::with_slots(2, 4);
        swarm.update_probabilities(&real(&[0.6, 0.4])).unwrap();

        let survived = swarm.measure(1, 5000).unwrap();

        assert!(survived);
        assert_eq!(swarm.state(), SwarmState::Measured { ship: 1, since: 5000 });
        assert!(matches!(swarm.slots()[0], Slot::Absent));
        let survivor = swarm.ship(1).unwrap();
        assert!(survivor.classical);
        assert_eq!(survivor.opacity(), 1.0);
        assert!(swarm.measuring());
    }

    #[test]
    fn test_measure_onto_empty_slot_leaves_nothing() {
        let mut swarm = ShipGroup::new(4);
        swarm.destroy(3);

        let survived = swarm.measure(3, 0).unwrap();

        assert!(!survived);
        assert!(swarm.is_empty());
        assert!(swarm.measured_ship().is_none());
        assert_eq!(swarm.fire().len(), 0);
    }

    #[test]
    fn test_measure_out_of_range_changes_nothing() {
        let mut swarm = ShipGroup::new(4);
        let err = swarm.measure(8, 0).unwrap_err();
        assert_eq!(err, GameError::OutcomeOutOfRange { outcome: 8, slots: 8 });
        assert_eq!(swarm.present_ships().count(), 8);
        assert_eq!(swarm.state(), SwarmState::Superposition);
    }

    #[test]
    fn test_measuring_window_expires() {
        let mut swarm = ShipGroup::new(4);
        swarm.measure(0, 1000).unwrap();
        swarm.update(1600);
        assert!(swarm.measuring());
        swarm.update(1601);
        assert!(!swarm.measuring());
        // Still collapsed after the window
        assert!(matches!(swarm.state(), SwarmState::Measured { .. }));
    }

    #[test]
    fn test_navigation_resets_measurement() {
        let mut swarm = ShipGroup::new(4);
        swarm.measure(2, 0).unwrap();
        let present_before = swarm.present_ships().count();

        swarm.move_left();

        assert_eq!(swarm.anchor(), 3);
        assert_eq!(swarm.state(), SwarmState::Superposition);
        assert!(swarm.measured_ship().is_none());
        assert_eq!(swarm.classical_count(), 0);
        assert_eq!(swarm.present_ships().count(), present_before);
    }

    #[test]
    fn test_navigation_wraps() {
        let mut swarm = ShipGroup::new(0);
        swarm.move_left();
        assert_eq!(swarm.anchor(), 7);
        swarm.move_right();
        assert_eq!(swarm.anchor(), 0);
    }

    #[test]
    fn test_superposed_fire_uses_probabilities() {
        let mut swarm = ShipGroup::with_slots(2, 4);
        swarm.update_probabilities(&real(&[0.6, 0.4])).unwrap();
        let shots = swarm.fire();
        assert_eq!(shots.len(), 2);
        assert!((shots[0].strength - 0.6).abs() < 1e-12);
        assert!((shots[1].strength - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_measured_fire_single_full_strength_shot() {
        let mut swarm = ShipGroup::new(4);
        swarm.measure(5, 0).unwrap();
        assert!(swarm.measuring());
        let shots = swarm.fire();
        assert_eq!(shots.len(), 1);
        assert_eq!(shots[0].strength, 1.0);
    }

    #[test]
    fn test_fire_after_measuring_window() {
        let mut swarm = ShipGroup::new(4);
        swarm.measure(5, 0).unwrap();
        let inside = swarm.fire();

        swarm.update(MEASURE_WINDOW_MS + 1);
        assert!(!swarm.measuring());
        let after = swarm.fire();

        assert_eq!(after.len(), 1);
        assert_eq!(after[0].x, inside[0].x);
        assert_eq!(after[0].strength, 1.0);
    }

    #[test]
    fn test_navigation_during_window_restores_volley() {
        let mut swarm = ShipGroup::with_slots(2, 4);
        swarm.update_probabilities(&real(&[0.5, 0.5])).unwrap();
        swarm.measure(1, 0).unwrap();
        assert_eq!(swarm.fire().len(), 1);

        swarm.move_right();

        // The survivor is superposed again and fires at its own weight
        assert!(!swarm.measuring());
        let shots = swarm.fire();
        assert_eq!(shots.len(), 1);
        assert!((shots[0].strength - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_explode_replaces_ship_with_explosion() {
        let mut swarm = ShipGroup::new(4);
        swarm.measure(4, 0).unwrap();
        assert!(swarm.explode(4, 100));
        assert!(matches!(swarm.slots()[4], Slot::Exploding(_)));
        assert!(swarm.is_empty());
        // Stale reference is a no-op
        assert!(!swarm.explode(4, 200));
        assert!(!swarm.destroy(4));
    }

    #[test]
    fn test_ship_hit_detection() {
        let swarm = ShipGroup::new(4);
        let x = swarm.ship(4).unwrap().anchored_x(4);
        let hits = swarm.ships_hit_by(&Hitbox::new(x + 10, SHIP_Y + 10, 5, 15));
        assert_eq!(hits, vec![4]);
        assert!(swarm.ships_hit_by(&Hitbox::new(x, 100, 5, 15)).is_empty());
    }

    #[test]
    fn test_render_items_include_labels() {
        let swarm = ShipGroup::new(4);
        let items = swarm.render_items(0);
        // 8 ships plus 8 basis labels
        assert_eq!(items.len(), 16);
    }

    // Property-based tests
    #[cfg(test)]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Measure(usize),
            Left,
            Right,
            Explode(usize),
            Amplitudes(Vec<f64>),
        }

        fn op_strategy() -> impl Strategy<Value = Op> {
            prop_oneof![
                (0usize..8).prop_map(Op::Measure),
                Just(Op::Left),
                Just(Op::Right),
                (0usize..8).prop_map(Op::Explode),
                prop::collection::vec(0.0f64..1.0, 8).prop_map(Op::Amplitudes),
            ]
        }

        proptest! {
            #[test]
            fn test_at_most_one_classical_ship(ops in prop::collection::vec(op_strategy(), 0..40)) {
                let mut swarm = ShipGroup::new(4);
                for (now, op) in ops.into_iter().enumerate() {
                    let now = now as u64 * 16;
                    match op {
                        Op::Measure(outcome) => {
                            swarm.measure(outcome, now).unwrap();
                        }
                        Op::Left => swarm.move_left(),
                        Op::Right => swarm.move_right(),
                        Op::Explode(id) => {
                            swarm.explode(id, now);
                        }
                        Op::Amplitudes(probabilities) => {
                            swarm.update_probabilities(&real(&probabilities)).unwrap();
                        }
                    }
                    prop_assert!(swarm.classical_count() <= 1);
                    if swarm.state() == SwarmState::Superposition {
                        prop_assert_eq!(swarm.classical_count(), 0);
                    }
                }
            }

            #[test]
            fn test_measure_leaves_at_most_one_ship(
                outcome in 0usize..8,
                destroyed in prop::collection::vec(0usize..8, 0..8)
            ) {
                let mut swarm = ShipGroup::new(2);
                for id in &destroyed {
                    swarm.destroy(*id);
                }
                let had_outcome = swarm.ship(outcome).is_some();

                let survived = swarm.measure(outcome, 0).unwrap();

                prop_assert_eq!(survived, had_outcome);
                prop_assert_eq!(swarm.present_ships().count(), usize::from(had_outcome));
            }
        }
    }
}
