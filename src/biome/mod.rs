//! Per-cell biome classification.
//!
//! Two alternative encodings over the same inputs: a packed pair of
//! 4-bit terrain indices plus a scalar blend factor (`paired`), and an
//! 8-channel continuous weight vector (`weights`). Both are pure
//! functions of a single cell's grids plus the run's global constants,
//! so the packing stages parallelize them per cell.

pub mod paired;
pub mod weights;

pub use paired::{Terrain, TerrainTriple};
pub use weights::{BlendWeights, Channel, blend};

/// Slope below which a face counts as vertical for terrain selection.
pub const SLOPE_TRANSITION_START: f64 = 0.05;

/// Slope above which the slope blend window is fully open.
pub const SLOPE_TRANSITION_END: f64 = 0.085;
