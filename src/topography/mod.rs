//! Elevation synthesis: layered noise, radial shaping toward a landmass
//! archetype, and ocean-altitude modulation.

use serde::{Deserialize, Serialize};

use crate::config::RunContext;
use crate::field::{self, LayerStack, REPEAT_FIELD};
use crate::grid::{self, Grid};

/// Landmass archetype applied as a radial transform over the raw noise.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeType {
    /// No radial shaping.
    #[default]
    Plain,
    /// Elevation rises toward 1.0 at the rim.
    Valley,
    /// Elevation falls to 0.0 at the rim, boosted toward the center.
    Island,
}

/// Parameters for one elevation synthesis run.
#[derive(Clone, Debug)]
pub struct TopographyParams {
    pub stack: LayerStack,
    pub shape: ShapeType,
    /// Centered radial distance where shaping starts to interpolate.
    pub d_start: f64,
    /// Centered radial distance beyond which the shape value is forced.
    pub d_end: f64,
}

/// Build the elevation grid.
///
/// The base field is the layered noise sum remapped to [0, 1] but not yet
/// normalized; shaping and ocean modulation run on the raw values and the
/// grid is min-max normalized exactly once at the end.
pub fn synthesize(ctx: &RunContext, params: &TopographyParams) -> Grid<f64> {
    log::info!("generating topography, shape={:?}", params.shape);
    let mut elevation = field::synthesize(
        ctx.size,
        &params.stack,
        ctx.noise_horiz_scale,
        REPEAT_FIELD,
    );

    if params.shape != ShapeType::Plain {
        apply_shaping(&mut elevation, params);
    }

    modulate_ocean(&mut elevation, ctx.ocean_altitude);
    elevation.normalize();
    elevation
}

/// Radial shaping pass for valley and island archetypes.
///
/// `dist == d_end` takes the forced branch, `dist == d_start` takes the
/// interpolation branch (a no-op there, since the fraction is zero).
fn apply_shaping(elevation: &mut Grid<f64>, params: &TopographyParams) {
    let size = elevation.size();
    let (d_start, d_end) = (params.d_start, params.d_end);
    let shape = params.shape;
    elevation.update(|x, y, &value| {
        let dist = grid::dist_to_center(x, y, size);
        if dist >= d_end {
            match shape {
                ShapeType::Valley => 1.0,
                ShapeType::Island => 0.0,
                ShapeType::Plain => value,
            }
        } else if dist >= d_start {
            let frac = (dist - d_start) / (d_end - d_start);
            match shape {
                ShapeType::Valley => value + (1.0 - value) * frac,
                ShapeType::Island => value - value * frac,
                ShapeType::Plain => value,
            }
        } else if shape == ShapeType::Island {
            value + 1.4 * value * (1.0 - dist / d_start)
        } else {
            value
        }
    });
}

/// Sharpen the land/ocean separation by compressing mid-range gradients
/// quadratically away from the ocean threshold, sign preserved.
///
/// At `value == ocean_altitude` the signed square is zero, so the cell
/// stays exactly at the threshold without dividing by the local gradient.
fn modulate_ocean(elevation: &mut Grid<f64>, ocean_altitude: f64) {
    elevation.update(|_, _, &value| {
        let d = value - ocean_altitude;
        ocean_altitude + d.signum() * d * d
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::NoiseLayer;

    fn ctx(size: usize) -> RunContext {
        RunContext {
            size,
            ocean_altitude: 0.1,
            noise_horiz_scale: 1.0,
        }
    }

    fn params(shape: ShapeType) -> TopographyParams {
        TopographyParams {
            stack: LayerStack::new(
                vec![NoiseLayer { frequency: 64.0, amplitude: 1.0 }],
                634,
            ),
            shape,
            d_start: 0.80,
            d_end: 0.95,
        }
    }

    #[test]
    fn test_synthesize_normalized_output() {
        let elevation = synthesize(&ctx(65), &params(ShapeType::Plain));
        let (min, max) = elevation.min_max();
        assert_eq!(min, 0.0);
        assert_eq!(max, 1.0);
    }

    #[test]
    fn test_synthesize_deterministic() {
        let a = synthesize(&ctx(65), &params(ShapeType::Island));
        let b = synthesize(&ctx(65), &params(ShapeType::Island));
        assert_eq!(a.cells(), b.cells());
    }

    #[test]
    fn test_island_rim_forced_to_zero() {
        // Before ocean modulation the rim must be exactly 0.0.
        let p = params(ShapeType::Island);
        let c = ctx(129);
        let mut elevation =
            field::synthesize(c.size, &p.stack, c.noise_horiz_scale, REPEAT_FIELD);
        apply_shaping(&mut elevation, &p);
        let size = elevation.size();
        for x in 0..size {
            for y in 0..size {
                if grid::dist_to_center(x, y, size) > 0.95 {
                    assert_eq!(*elevation.get(x, y), 0.0);
                }
            }
        }
    }

    #[test]
    fn test_valley_rim_forced_to_one() {
        let p = params(ShapeType::Valley);
        let c = ctx(129);
        let mut elevation =
            field::synthesize(c.size, &p.stack, c.noise_horiz_scale, REPEAT_FIELD);
        apply_shaping(&mut elevation, &p);
        let size = elevation.size();
        for x in 0..size {
            for y in 0..size {
                if grid::dist_to_center(x, y, size) >= 0.95 {
                    assert_eq!(*elevation.get(x, y), 1.0);
                }
            }
        }
    }

    #[test]
    fn test_ocean_modulation_fixes_threshold() {
        let mut grid = Grid::filled(3, 0.1);
        modulate_ocean(&mut grid, 0.1);
        for &v in grid.cells() {
            assert_eq!(v, 0.1);
        }
    }

    #[test]
    fn test_ocean_modulation_preserves_side() {
        let mut grid = Grid::from_fn(2, |x, y| 0.1 + ((x * 2 + y) as f64 - 1.5) * 0.2);
        modulate_ocean(&mut grid, 0.1);
        // Cells below the threshold stay below, cells above stay above.
        assert!(*grid.get(0, 0) < 0.1);
        assert!(*grid.get(1, 1) > 0.1);
    }
}
