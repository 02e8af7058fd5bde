//! Configuration bundle and validation.
//!
//! A `LandConfig` is loaded from a JSON file (every field defaulted, so a
//! minimal config can be `{}`), validated once, and distilled into the
//! immutable `RunContext` every stage receives. Malformed input is a
//! configuration error raised before any grid work begins.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::climate::{HumidityMode, HumidityParams, TemperatureMode, TemperatureParams};
use crate::core::{Error, Result};
use crate::field::{LayerStack, NoiseLayer};
use crate::topography::{ShapeType, TopographyParams};

/// Immutable per-run state shared by every stage.
#[derive(Clone, Copy, Debug)]
pub struct RunContext {
    /// Grid side length, a power of two plus one.
    pub size: usize,
    /// Elevation threshold separating ocean from land, in (0, 1).
    pub ocean_altitude: f64,
    /// Multiplier applied to topography and temperature noise frequencies.
    pub noise_horiz_scale: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalSection {
    pub name: String,
    pub size: usize,
    pub ocean_altitude: f64,
    pub noise_horiz_scale: f64,
}

impl Default for GlobalSection {
    fn default() -> Self {
        Self {
            name: "land".to_string(),
            size: 513,
            ocean_altitude: 0.1,
            noise_horiz_scale: 1.0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TopographySection {
    pub shape: ShapeType,
    pub change_dist_start: f64,
    pub change_dist_end: f64,
    pub seed: u32,
    pub layers: Vec<NoiseLayer>,
}

impl Default for TopographySection {
    fn default() -> Self {
        Self {
            shape: ShapeType::Plain,
            change_dist_start: 0.80,
            change_dist_end: 0.95,
            seed: 634,
            layers: vec![NoiseLayer { frequency: 256.0, amplitude: 1.0 }],
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TemperatureSection {
    pub mode: TemperatureMode,
    pub seed: u32,
    pub layers: Vec<NoiseLayer>,
}

impl Default for TemperatureSection {
    fn default() -> Self {
        Self {
            mode: TemperatureMode::Elevation,
            seed: 156,
            layers: vec![NoiseLayer { frequency: 1024.0, amplitude: 1.0 }],
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct HumiditySection {
    pub mode: HumidityMode,
    pub seed: u32,
    pub layers: Vec<NoiseLayer>,
}

impl Default for HumiditySection {
    fn default() -> Self {
        Self {
            mode: HumidityMode::Elevation,
            seed: 456,
            layers: vec![NoiseLayer { frequency: 512.0, amplitude: 1.0 }],
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseSection {
    pub seed: u32,
    pub layers: Vec<NoiseLayer>,
}

impl Default for NoiseSection {
    fn default() -> Self {
        // Eight octaves, amplitude halving per octave with a steeper drop
        // after the fourth.
        let layers = [
            (256.0, 1.0),
            (128.0, 0.5),
            (64.0, 0.25),
            (32.0, 0.125),
            (16.0, 0.03125),
            (8.0, 0.015625),
            (4.0, 0.0078125),
            (2.0, 0.00390625),
        ]
        .into_iter()
        .map(|(frequency, amplitude)| NoiseLayer { frequency, amplitude })
        .collect();
        Self { seed: 159, layers }
    }
}

/// Full configuration bundle for one generation run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LandConfig {
    pub global: GlobalSection,
    pub topography: TopographySection,
    pub temperature: TemperatureSection,
    pub humidity: HumiditySection,
    pub noise: NoiseSection,
}

impl LandConfig {
    /// Load a config file, filling missing sections with defaults.
    pub fn load(path: &Path) -> Result<Self> {
        log::info!("loading config: {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Validate the bundle and produce the run context.
    ///
    /// The grid size is snapped down to the containing power of two plus
    /// one with a warning, as grid consumers require that shape.
    pub fn validate(&self) -> Result<RunContext> {
        let name = &self.global.name;
        if name.is_empty()
            || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
            || name.starts_with(|c: char| c.is_ascii_digit())
        {
            return Err(Error::Config(format!(
                "land name must be alphanumeric/underscore, got {:?}",
                name
            )));
        }

        if self.global.size < 2 {
            return Err(Error::Config(format!(
                "grid size must be at least 2, got {}",
                self.global.size
            )));
        }
        let size = snap_size(self.global.size);
        if size != self.global.size {
            log::warn!(
                "size must be a power-of-two plus one, got {} and adjusted to {}",
                self.global.size,
                size
            );
        }

        let ocean = self.global.ocean_altitude;
        if !(0.0..1.0).contains(&ocean) || ocean == 0.0 {
            return Err(Error::Config(format!(
                "ocean_altitude must lie in (0, 1), got {}",
                ocean
            )));
        }

        if self.global.noise_horiz_scale <= 0.0 {
            return Err(Error::Config(format!(
                "noise_horiz_scale must be positive, got {}",
                self.global.noise_horiz_scale
            )));
        }

        let (d_start, d_end) = (
            self.topography.change_dist_start,
            self.topography.change_dist_end,
        );
        if !(0.0 <= d_start && d_start < d_end) {
            return Err(Error::Config(format!(
                "shaping distances must satisfy 0 <= start < end, got ({}, {})",
                d_start, d_end
            )));
        }

        self.topography_params().stack.validate("topography")?;
        self.temperature_params().stack.validate("temperature")?;
        self.humidity_params().stack.validate("humidity")?;
        self.noise_stack().validate("noise")?;

        Ok(RunContext {
            size,
            ocean_altitude: ocean,
            noise_horiz_scale: self.global.noise_horiz_scale,
        })
    }

    pub fn topography_params(&self) -> TopographyParams {
        TopographyParams {
            stack: LayerStack::new(self.topography.layers.clone(), self.topography.seed),
            shape: self.topography.shape,
            d_start: self.topography.change_dist_start,
            d_end: self.topography.change_dist_end,
        }
    }

    pub fn temperature_params(&self) -> TemperatureParams {
        TemperatureParams {
            mode: self.temperature.mode,
            stack: LayerStack::new(self.temperature.layers.clone(), self.temperature.seed),
        }
    }

    pub fn humidity_params(&self) -> HumidityParams {
        HumidityParams {
            mode: self.humidity.mode,
            stack: LayerStack::new(self.humidity.layers.clone(), self.humidity.seed),
        }
    }

    pub fn noise_stack(&self) -> LayerStack {
        LayerStack::new(self.noise.layers.clone(), self.noise.seed)
    }
}

/// Snap down to the containing power of two plus one (800 becomes 513).
fn snap_size(size: usize) -> usize {
    let pow = (size as f64).log2().floor() as u32;
    (1usize << pow) + 1
}
