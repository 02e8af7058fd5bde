//! Temperature and humidity derivation from elevation, noise and radial
//! distance.
//!
//! Temperature supports four derivation modes, humidity only two and no
//! radial term; the downstream renderer only consumes these combinations.

use serde::{Deserialize, Serialize};

use crate::config::RunContext;
use crate::field::{self, LayerStack, REPEAT_FIELD};
use crate::grid::{self, Grid};

/// Temperature derivation mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureMode {
    /// Independent layered noise field.
    Noise,
    /// `1 - elevation`.
    #[default]
    Elevation,
    /// Constant 1.0 before the radial falloff.
    DistCtr,
    /// `1 - elevation`, then radially adjusted.
    ElevationDistCtr,
}

impl TemperatureMode {
    /// Modes that subtract the distance-to-ocean penalty.
    fn ocean_penalty(self) -> bool {
        !matches!(self, TemperatureMode::DistCtr)
    }

    /// Modes that apply the radial falloff factor.
    fn radial(self) -> bool {
        !matches!(self, TemperatureMode::Elevation)
    }
}

/// Humidity derivation mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HumidityMode {
    /// Independent layered noise field.
    Noise,
    /// `1 - elevation`.
    #[default]
    Elevation,
}

/// Parameters for one temperature derivation.
#[derive(Clone, Debug)]
pub struct TemperatureParams {
    pub mode: TemperatureMode,
    pub stack: LayerStack,
}

/// Parameters for one humidity derivation.
#[derive(Clone, Debug)]
pub struct HumidityParams {
    pub mode: HumidityMode,
    pub stack: LayerStack,
}

/// Fraction of the land altitude range a cell sits above the ocean.
/// Cells at or below ocean altitude get zero.
fn distance_to_ocean(altitude: f64, ocean_altitude: f64) -> f64 {
    if altitude > ocean_altitude {
        (altitude - ocean_altitude) / (1.0 - ocean_altitude)
    } else {
        0.0
    }
}

/// Derive the temperature grid.
///
/// The base field per mode, then the mode-dependent ocean and radial
/// adjustments, a clamp to [0, 1], and a final min-max normalization.
pub fn derive_temperature(
    ctx: &RunContext,
    params: &TemperatureParams,
    elevation: &Grid<f64>,
) -> Grid<f64> {
    log::info!("generating temperature, mode={:?}", params.mode);
    let mode = params.mode;
    let mut temperature = match mode {
        TemperatureMode::Noise => field::synthesize(
            ctx.size,
            &params.stack,
            ctx.noise_horiz_scale,
            REPEAT_FIELD,
        ),
        TemperatureMode::Elevation | TemperatureMode::ElevationDistCtr => {
            elevation.map(|&e| 1.0 - e)
        }
        TemperatureMode::DistCtr => Grid::filled(ctx.size, 1.0),
    };

    let size = ctx.size;
    let ocean_altitude = ctx.ocean_altitude;
    temperature.update(|x, y, &v| {
        let mut value = v;
        if mode.ocean_penalty() {
            value -= 0.2 * distance_to_ocean(*elevation.get(x, y), ocean_altitude);
        }
        if mode.radial() {
            let dist = grid::dist_to_center(x, y, size).min(1.0);
            value *= 1.25 * (1.0 - dist);
        }
        value.clamp(0.0, 1.0)
    });

    temperature.normalize();
    temperature
}

/// Derive the humidity grid: base field per mode, then normalization.
///
/// Humidity noise ignores the horizontal scale multiplier; only
/// topography and temperature frequencies scale with it.
pub fn derive_humidity(
    ctx: &RunContext,
    params: &HumidityParams,
    elevation: &Grid<f64>,
) -> Grid<f64> {
    log::info!("generating humidity, mode={:?}", params.mode);
    let mut humidity = match params.mode {
        HumidityMode::Noise => field::synthesize(ctx.size, &params.stack, 1.0, REPEAT_FIELD),
        HumidityMode::Elevation => elevation.map(|&e| 1.0 - e),
    };
    humidity.normalize();
    humidity
}
