//! Layered tileable noise synthesis.
//!
//! Every scalar field in the pipeline starts as a weighted sum of coherent
//! noise octaves. A `LayerStack` lists the (frequency, amplitude) layers
//! plus a seed; `synthesize` evaluates the sum per cell, divides by the
//! amplitude sum and remaps the result from the noise range [-1, 1] into
//! [0, 1]. Whole-grid min-max normalization is the caller's job, because
//! topography normalizes only once at the end of its own shaping.

use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use crate::core::{Error, Result};
use crate::grid::Grid;

/// Domain-wrapping period for the large-scale fields
/// (topography, temperature, humidity).
pub const REPEAT_FIELD: f64 = 1024.0;

/// Domain-wrapping period for the high-frequency detail noise field.
pub const REPEAT_DETAIL: f64 = 32.0;

/// One noise octave: a sampling frequency and its weight in the sum.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoiseLayer {
    pub frequency: f64,
    pub amplitude: f64,
}

/// An ordered list of noise layers plus the seed they are sampled with.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerStack {
    pub layers: Vec<NoiseLayer>,
    pub seed: u32,
}

impl LayerStack {
    pub fn new(layers: Vec<NoiseLayer>, seed: u32) -> Self {
        Self { layers, seed }
    }

    /// Sum of layer amplitudes, used as the normalizing divisor.
    pub fn amplitude_sum(&self) -> f64 {
        self.layers.iter().map(|l| l.amplitude).sum()
    }

    /// Reject degenerate stacks before any grid work: an empty stack has
    /// no signal, a zero amplitude sum would divide by zero, and a
    /// negative amplitude would push the weighted sum outside [0, 1]
    /// after the remap.
    pub fn validate(&self, section: &str) -> Result<()> {
        if self.layers.is_empty() {
            return Err(Error::EmptyLayerStack(section.to_string()));
        }
        for layer in &self.layers {
            if layer.frequency <= 0.0 {
                return Err(Error::InvalidFrequency(section.to_string(), layer.frequency));
            }
            if layer.amplitude < 0.0 {
                return Err(Error::InvalidAmplitude(section.to_string(), layer.amplitude));
            }
        }
        if self.amplitude_sum() <= 0.0 {
            return Err(Error::ZeroAmplitudeSum(section.to_string()));
        }
        Ok(())
    }
}

/// Coherent 2D noise that tiles with period `repeat` in both axes.
///
/// Perlin noise is sampled on a 4D torus embedding: each planar axis maps
/// to a circle whose circumference equals the period, which makes the
/// field seamless at the wrap while keeping the local feature scale close
/// to planar sampling. Deterministic for a given seed and coordinates.
pub struct TileableNoise {
    perlin: Perlin,
    repeat: f64,
    radius: f64,
}

impl TileableNoise {
    pub fn new(seed: u32, repeat: f64) -> Self {
        Self {
            perlin: Perlin::new(seed),
            repeat,
            radius: repeat / TAU,
        }
    }

    /// Sample at `(x, y)`, returning a value in [-1, 1].
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let ax = TAU * (x / self.repeat);
        let ay = TAU * (y / self.repeat);
        let v = self.perlin.get([
            self.radius * ax.cos(),
            self.radius * ax.sin(),
            self.radius * ay.cos(),
            self.radius * ay.sin(),
        ]);
        v.clamp(-1.0, 1.0)
    }
}

/// Evaluate a layer stack over a `size` x `size` grid.
///
/// Cell `(x, y)` holds
/// `(sum_i amp_i * noise(x / (freq_i * scale), y / (freq_i * scale))) / sum_i amp_i`
/// remapped into [0, 1]. The stack must have been validated.
pub fn synthesize(size: usize, stack: &LayerStack, horiz_scale: f64, repeat: f64) -> Grid<f64> {
    let noise = TileableNoise::new(stack.seed, repeat);
    let amp_sum = stack.amplitude_sum();
    Grid::from_fn(size, |x, y| {
        let mut value = 0.0;
        for layer in &stack.layers {
            let freq = layer.frequency * horiz_scale;
            value += layer.amplitude * noise.sample(x as f64 / freq, y as f64 / freq);
        }
        value /= amp_sum;
        value * 0.5 + 0.5
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack() -> LayerStack {
        LayerStack::new(
            vec![
                NoiseLayer { frequency: 256.0, amplitude: 1.0 },
                NoiseLayer { frequency: 64.0, amplitude: 0.25 },
            ],
            634,
        )
    }

    #[test]
    fn test_validate_rejects_empty_stack() {
        let empty = LayerStack::new(vec![], 1);
        assert!(matches!(
            empty.validate("topography"),
            Err(Error::EmptyLayerStack(_))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_amplitudes() {
        let flat = LayerStack::new(
            vec![NoiseLayer { frequency: 100.0, amplitude: 0.0 }],
            1,
        );
        assert!(matches!(
            flat.validate("noise"),
            Err(Error::ZeroAmplitudeSum(_))
        ));
    }

    #[test]
    fn test_validate_rejects_nonpositive_frequency() {
        let bad = LayerStack::new(
            vec![NoiseLayer { frequency: 0.0, amplitude: 1.0 }],
            1,
        );
        assert!(matches!(
            bad.validate("humidity"),
            Err(Error::InvalidFrequency(_, _))
        ));
    }

    #[test]
    fn test_validate_rejects_negative_amplitude() {
        // A negative layer clears the sum check but would break the
        // [0, 1] output contract of synthesize.
        let bad = LayerStack::new(
            vec![
                NoiseLayer { frequency: 64.0, amplitude: 1.0 },
                NoiseLayer { frequency: 16.0, amplitude: -0.5 },
            ],
            1,
        );
        assert!(matches!(
            bad.validate("topography"),
            Err(Error::InvalidAmplitude(_, a)) if a == -0.5
        ));
    }

    #[test]
    fn test_synthesize_range_full_size() {
        // largest supported map size
        let grid = synthesize(513, &stack(), 1.0, REPEAT_FIELD);
        for &v in grid.cells() {
            assert!((0.0..=1.0).contains(&v), "out of range: {}", v);
        }
    }

    #[test]
    fn test_synthesize_deterministic() {
        let a = synthesize(65, &stack(), 1.0, REPEAT_FIELD);
        let b = synthesize(65, &stack(), 1.0, REPEAT_FIELD);
        assert_eq!(a.cells(), b.cells());
    }

    #[test]
    fn test_synthesize_seed_changes_field() {
        let a = synthesize(33, &stack(), 1.0, REPEAT_FIELD);
        let mut other = stack();
        other.seed = 9999;
        let b = synthesize(33, &other, 1.0, REPEAT_FIELD);
        assert_ne!(a.cells(), b.cells());
    }

    #[test]
    fn test_tileable_wraps_at_period() {
        let noise = TileableNoise::new(42, 32.0);
        for i in 0..16 {
            let x = i as f64 * 1.7;
            let a = noise.sample(x, 3.0);
            let b = noise.sample(x + 32.0, 3.0);
            assert!((a - b).abs() < 1e-9, "not tileable at x={}", x);
            let c = noise.sample(3.0, x);
            let d = noise.sample(3.0, x + 32.0);
            assert!((c - d).abs() < 1e-9, "not tileable at y={}", x);
        }
    }
}
