//! 8-channel blend-weight terrain classification.
//!
//! Each cell receives a non-negative weight per terrain channel; weights
//! need not sum to 1, but an all-zero vector is a classification gap and
//! gets a deterministic snow fallback plus a diagnostic from the caller.

use super::{SLOPE_TRANSITION_END, SLOPE_TRANSITION_START};
use crate::codec;

/// Terrain channels of the 8-layer atlas, in raster channel order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(usize)]
pub enum Channel {
    MountainWhite = 0,
    MountainIce = 1,
    DryDirt = 2,
    WetDirt = 3,
    DryGrass = 4,
    WetGrass = 5,
    Snow = 6,
    Sand = 7,
}

pub const TEMP_SNOW_TRANSITION_START: f64 = 0.30;
pub const TEMP_SNOW_TRANSITION_END: f64 = 0.35;
pub const TEMP_SAND_TRANSITION_START: f64 = 0.85;
pub const TEMP_SAND_TRANSITION_END: f64 = 0.90;
pub const HUMIDITY_BLEND_START: f64 = 0.45;
pub const HUMIDITY_BLEND_END: f64 = 0.55;
pub const NOISE_BLEND_START: f64 = 0.40;
pub const NOISE_BLEND_END: f64 = 0.60;

/// Altitude margin above the ocean threshold treated as beach.
pub const BEACH_BAND: f64 = 0.05;

/// Shared linear ramp: 0 below `lo`, 1 above `hi`, linear in between.
pub fn blend(value: f64, lo: f64, hi: f64) -> f64 {
    if value < lo {
        0.0
    } else if value > hi {
        1.0
    } else {
        (value - lo) / (hi - lo)
    }
}

/// One cell's classifier inputs, all in [0, 1].
#[derive(Clone, Copy, Debug)]
pub struct CellSample {
    pub altitude: f64,
    pub slope: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub noise: f64,
}

/// Weight vector over the 8 terrain channels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlendWeights(pub [f64; 8]);

impl BlendWeights {
    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    fn scale(&mut self, factor: f64) {
        for w in &mut self.0 {
            *w *= factor;
        }
    }

    pub fn get(&self, channel: Channel) -> f64 {
        self.0[channel as usize]
    }

    fn set(&mut self, channel: Channel, weight: f64) {
        self.0[channel as usize] = weight;
    }

    /// Quantize each weight to a byte.
    pub fn to_bytes(&self) -> [u8; 8] {
        self.0.map(codec::quantize_value)
    }
}

/// Classify one cell into its blend-weight vector.
///
/// The boolean is true when the raw classification produced an all-zero
/// vector; the returned weights then carry the snow fallback and the
/// caller is expected to report the gap.
pub fn classify(sample: &CellSample, ocean_altitude: f64) -> (BlendWeights, bool) {
    let mut data = BlendWeights([0.0; 8]);
    let beach_altitude = ocean_altitude + BEACH_BAND;
    let hum_blend = blend(sample.humidity, HUMIDITY_BLEND_START, HUMIDITY_BLEND_END);
    let slope_blend = blend(sample.slope, SLOPE_TRANSITION_START, SLOPE_TRANSITION_END);

    if sample.altitude < beach_altitude {
        // Beach band: pure sand/snow mix on the snow temperature ramp.
        let temp_blend = blend(
            sample.temperature,
            TEMP_SNOW_TRANSITION_START,
            TEMP_SNOW_TRANSITION_END,
        );
        data.set(Channel::Sand, temp_blend);
        data.set(Channel::Snow, 1.0 - temp_blend);
    } else if sample.temperature < TEMP_SNOW_TRANSITION_START {
        data.set(Channel::Snow, 1.0);
    } else if sample.temperature > TEMP_SAND_TRANSITION_END {
        data.set(Channel::Sand, 1.0);
    } else {
        let noise_blend = blend(sample.noise, NOISE_BLEND_START, NOISE_BLEND_END);
        data.set(Channel::DryDirt, (1.0 - hum_blend) * noise_blend);
        data.set(Channel::WetDirt, hum_blend * noise_blend);
        data.set(Channel::DryGrass, (1.0 - hum_blend) * (1.0 - noise_blend));
        data.set(Channel::WetGrass, hum_blend * (1.0 - noise_blend));

        if sample.temperature > TEMP_SNOW_TRANSITION_START
            && sample.temperature < TEMP_SNOW_TRANSITION_END
        {
            let temp_blend = blend(
                sample.temperature,
                TEMP_SNOW_TRANSITION_START,
                TEMP_SNOW_TRANSITION_END,
            );
            data.scale(temp_blend);
            data.set(Channel::Snow, 1.0 - temp_blend);
        } else if sample.temperature > TEMP_SAND_TRANSITION_START
            && sample.temperature < TEMP_SAND_TRANSITION_END
        {
            // Sand takes the ramp fraction itself here, not its
            // complement.
            let temp_blend = blend(
                sample.temperature,
                TEMP_SAND_TRANSITION_START,
                TEMP_SAND_TRANSITION_END,
            );
            data.scale(temp_blend);
            data.set(Channel::Sand, temp_blend);
        }

        if slope_blend < 1.0 {
            data.scale(slope_blend);
            let temp_blend = blend(
                sample.temperature,
                TEMP_SNOW_TRANSITION_START,
                TEMP_SNOW_TRANSITION_END,
            );
            data.set(Channel::MountainIce, 1.0 - temp_blend);
            data.set(Channel::MountainWhite, temp_blend);
        }
    }

    if data.sum() == 0.0 {
        data.set(Channel::Snow, 1.0);
        return (data, true);
    }
    (data, false)
}
