use num_complex::Complex64;
use rand::SeedableRng;
use rand::distr::{Distribution, weighted::WeightedIndex};
use rand::rngs::StdRng;
use std::f64::consts::FRAC_1_SQRT_2;

use crate::config::{DISTRIBUTIONS, NUMBER_OF_SHIPS};
use crate::error::GameError;

/// Produces one amplitude per swarm slot for the current circuit.
///
/// Must be deterministic for a fixed circuit.
pub trait AmplitudeSource {
    fn amplitudes(&self) -> Vec<Complex64>;
}

/// Produces one classical outcome index for the current circuit.
pub trait MeasurementSource {
    fn measure(&mut self) -> usize;
}

/// A named 3-qubit state the player can switch between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Ground,
    Weighted,
    Uniform,
    Ghz,
    PhasedPair,
}

impl Preset {
    pub const ALL: [Preset; 5] = [
        Preset::Ground,
        Preset::Weighted,
        Preset::Uniform,
        Preset::Ghz,
        Preset::PhasedPair,
    ];

    pub fn get_name(&self) -> &'static str {
        match self {
            Preset::Ground => "|000>",
            Preset::Weighted => "weighted",
            Preset::Uniform => "H(x)H(x)H",
            Preset::Ghz => "GHZ",
            Preset::PhasedPair => "|000> + i|001>",
        }
    }

    fn statevector(&self) -> Vec<Complex64> {
        let zero = Complex64::new(0.0, 0.0);
        let mut state = vec![zero; NUMBER_OF_SHIPS];
        match self {
            Preset::Ground => state[0] = Complex64::new(1.0, 0.0),
            Preset::Weighted => {
                for (amp, percent) in state.iter_mut().zip(DISTRIBUTIONS) {
                    *amp = Complex64::new((percent / 100.0).sqrt(), 0.0);
                }
            }
            Preset::Uniform => {
                let amp = 1.0 / (NUMBER_OF_SHIPS as f64).sqrt();
                state.fill(Complex64::new(amp, 0.0));
            }
            Preset::Ghz => {
                state[0] = Complex64::new(FRAC_1_SQRT_2, 0.0);
                state[NUMBER_OF_SHIPS - 1] = Complex64::new(FRAC_1_SQRT_2, 0.0);
            }
            Preset::PhasedPair => {
                state[0] = Complex64::new(FRAC_1_SQRT_2, 0.0);
                state[1] = Complex64::new(0.0, FRAC_1_SQRT_2);
            }
        }
        state
    }
}

/// Stand-in circuit backend: a fixed statevector per preset, sampled on
/// measurement.
pub struct PresetCircuit {
    index: usize,
    /// Outcome distribution per preset, parallel to `Preset::ALL`
    distributions: Vec<WeightedIndex<f64>>,
    rng: StdRng,
}

impl PresetCircuit {
    /// Fails if a preset's probabilities cannot be sampled.
    pub fn new(seed: Option<u64>) -> Result<Self, GameError> {
        let distributions = Preset::ALL
            .iter()
            .map(|preset| {
                let weights: Vec<f64> = preset
                    .statevector()
                    .iter()
                    .map(Complex64::norm_sqr)
                    .collect();
                WeightedIndex::new(weights).map_err(|err| GameError::UnsampleablePreset {
                    preset: preset.get_name(),
                    reason: err.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(Self {
            index: 0,
            distributions,
            rng,
        })
    }

    pub fn preset(&self) -> Preset {
        Preset::ALL[self.index]
    }

    /// Switch to the next preset; the caller re-queries amplitudes afterwards.
    pub fn cycle(&mut self) -> Preset {
        self.index = (self.index + 1) % Preset::ALL.len();
        tracing::info!(preset = self.preset().get_name(), "circuit changed");
        self.preset()
    }
}

impl AmplitudeSource for PresetCircuit {
    fn amplitudes(&self) -> Vec<Complex64> {
        self.preset().statevector()
    }
}

impl MeasurementSource for PresetCircuit {
    fn measure(&mut self) -> usize {
        self.distributions[self.index].sample(&mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_normalised() {
        for preset in Preset::ALL {
            let total: f64 = preset.statevector().iter().map(|a| a.norm_sqr()).sum();
            assert!((total - 1.0).abs() < 1e-9, "{} sums to {}", preset.get_name(), total);
        }
    }

    #[test]
    fn test_every_preset_can_be_measured() {
        let mut circuit = PresetCircuit::new(None).unwrap();
        for _ in Preset::ALL {
            let outcome = circuit.measure();
            let amplitudes = circuit.amplitudes();
            assert!(outcome < NUMBER_OF_SHIPS);
            assert!(
                amplitudes[outcome].norm_sqr() > 0.0,
                "{} gave {}",
                circuit.preset().get_name(),
                outcome
            );
            circuit.cycle();
        }
    }

    #[test]
    fn test_ground_state_always_measures_zero() {
        let mut circuit = PresetCircuit::new(Some(7)).unwrap();
        for _ in 0..20 {
            assert_eq!(circuit.measure(), 0);
        }
    }

    #[test]
    fn test_cycle_wraps_around() {
        let mut circuit = PresetCircuit::new(Some(1)).unwrap();
        for _ in 0..Preset::ALL.len() {
            circuit.cycle();
        }
        assert_eq!(circuit.preset(), Preset::Ground);
    }

    #[test]
    fn test_ghz_only_measures_extremes() {
        let mut circuit = PresetCircuit::new(Some(3)).unwrap();
        while circuit.preset() != Preset::Ghz {
            circuit.cycle();
        }
        for _ in 0..50 {
            let outcome = circuit.measure();
            assert!(outcome == 0 || outcome == NUMBER_OF_SHIPS - 1);
        }
    }

    #[test]
    fn test_amplitudes_sized_to_swarm() {
        let circuit = PresetCircuit::new(Some(0)).unwrap();
        assert_eq!(circuit.amplitudes().len(), NUMBER_OF_SHIPS);
    }
}
