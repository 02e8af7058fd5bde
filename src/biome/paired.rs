//! Paired-index terrain classification.
//!
//! Temperature is banded into five ranges, each naming a
//! (lower, upper, vertical) terrain triple; slope selects which two of
//! the three are packed into one byte as 4-bit enumerants. The blend
//! factor is the simple `(humidity + slope) / 2` average.

use super::SLOPE_TRANSITION_START;
use crate::codec;

/// Terrain types of the 16-entry atlas, 4 bits each in the packed index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Terrain {
    GrassYellow = 0,
    Mountain = 1,
    MountainWhite = 2,
    Ice = 3,
    Cracked = 4,
    Dry = 5,
    Mud = 6,
    MudCracked = 7,
    MountainDesert = 8,
    MountainDry = 9,
    MountainGreen = 10,
    MountainDark = 11,
    Desert = 12,
    GrassDry = 13,
    Grass = 14,
    Snow = 15,
}

/// The three candidate terrains of one temperature band.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TerrainTriple {
    pub lower: Terrain,
    pub upper: Terrain,
    pub vertical: Terrain,
}

impl TerrainTriple {
    const fn new(lower: Terrain, upper: Terrain, vertical: Terrain) -> Self {
        Self { lower, upper, vertical }
    }
}

/// Map a cell's temperature band (and, in the hottest band, humidity) to
/// its terrain triple.
pub fn band(temperature: f64, humidity: f64) -> TerrainTriple {
    if temperature < 0.20 {
        TerrainTriple::new(Terrain::MudCracked, Terrain::Snow, Terrain::MountainDark)
    } else if temperature < 0.40 {
        TerrainTriple::new(Terrain::Dry, Terrain::GrassDry, Terrain::MountainDry)
    } else if temperature < 0.60 {
        TerrainTriple::new(Terrain::Dry, Terrain::GrassYellow, Terrain::MountainDesert)
    } else if temperature < 0.80 {
        TerrainTriple::new(Terrain::Mud, Terrain::Grass, Terrain::MountainGreen)
    } else if humidity < 0.6 {
        TerrainTriple::new(Terrain::Cracked, Terrain::Desert, Terrain::MountainDesert)
    } else {
        TerrainTriple::new(Terrain::Mud, Terrain::Grass, Terrain::MountainDesert)
    }
}

/// Pack two 4-bit terrain indices into one byte: `lower * 16 + upper` on
/// walkable ground, `vertical * 16 + lower` on near-vertical faces.
pub fn pair_index(triple: TerrainTriple, slope: f64) -> u8 {
    if slope > SLOPE_TRANSITION_START {
        (triple.lower as u8) * 16 + triple.upper as u8
    } else {
        (triple.vertical as u8) * 16 + triple.lower as u8
    }
}

/// Continuous interpolation weight between the paired terrains.
pub fn blend_factor(humidity: f64, slope: f64) -> f64 {
    (humidity + slope) / 2.0
}

/// Classify one cell into its packed index byte and quantized blend
/// factor byte.
pub fn classify(slope: f64, temperature: f64, humidity: f64) -> (u8, u8) {
    let triple = band(temperature, humidity);
    let index = pair_index(triple, slope);
    let factor = codec::quantize_value(blend_factor(humidity, slope));
    (index, factor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coldest_band_ignores_humidity() {
        for humidity in [0.0, 0.3, 0.59, 0.6, 1.0] {
            let triple = band(0.1, humidity);
            assert_eq!(triple.lower, Terrain::MudCracked);
            assert_eq!(triple.upper, Terrain::Snow);
            assert_eq!(triple.vertical, Terrain::MountainDark);
        }
    }

    #[test]
    fn test_hottest_band_splits_on_humidity() {
        let dry = band(0.9, 0.5);
        assert_eq!(dry.lower, Terrain::Cracked);
        assert_eq!(dry.upper, Terrain::Desert);
        let wet = band(0.9, 0.7);
        assert_eq!(wet.lower, Terrain::Mud);
        assert_eq!(wet.upper, Terrain::Grass);
        assert_eq!(wet.vertical, Terrain::MountainDesert);
    }

    #[test]
    fn test_pair_index_slope_selection() {
        let triple = band(0.5, 0.5); // Dry / GrassYellow / MountainDesert
        // Walkable: lower * 16 + upper.
        assert_eq!(pair_index(triple, 0.9), 5 * 16);
        // Vertical: vertical * 16 + lower.
        assert_eq!(pair_index(triple, 0.01), 8 * 16 + 5);
        // Exactly at the threshold counts as vertical.
        assert_eq!(pair_index(triple, 0.05), 8 * 16 + 5);
    }

    #[test]
    fn test_blend_factor_average() {
        assert_eq!(blend_factor(0.0, 0.0), 0.0);
        assert_eq!(blend_factor(1.0, 1.0), 1.0);
        assert!((blend_factor(0.4, 0.6) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_classify_quantizes_factor() {
        let (index, factor) = classify(1.0, 0.1, 1.0);
        assert_eq!(index, 7 * 16 + 15); // MudCracked | Snow
        assert_eq!(factor, 255);
    }
}
