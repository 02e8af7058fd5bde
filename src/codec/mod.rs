//! Quantization of [0, 1] float grids to 8-bit channels and packing into
//! multi-channel rasters.
//!
//! Purely a projection: holds no state across calls. The raster output
//! collaborator (`crate::raster`) owns the container format.

use rayon::prelude::*;

use crate::core::{Error, Result};
use crate::grid::Grid;

/// A packed byte raster: `channels` interleaved bytes per cell, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    pub size: usize,
    pub channels: usize,
    pub data: Vec<u8>,
}

/// Quantize one [0, 1] value to a byte, rounding to nearest.
pub fn quantize_value(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Quantize a whole grid to a byte plane.
pub fn quantize(grid: &Grid<f64>) -> Vec<u8> {
    grid.cells().par_iter().map(|&v| quantize_value(v)).collect()
}

/// Pack a single grid into a 1-channel raster.
pub fn pack_single(grid: &Grid<f64>) -> Raster {
    Raster {
        size: grid.size(),
        channels: 1,
        data: quantize(grid),
    }
}

/// Interleave per-cell byte groups from equally sized planes into one
/// multi-channel raster. Supports 1 or 4 planes, the channel layouts the
/// downstream renderer consumes.
pub fn interleave(size: usize, planes: &[&[u8]]) -> Result<Raster> {
    if planes.len() != 1 && planes.len() != 4 {
        return Err(Error::UnsupportedChannels(planes.len()));
    }
    let cell_count = size * size;
    for plane in planes {
        if plane.len() != cell_count {
            return Err(Error::GridSizeMismatch(plane.len(), cell_count));
        }
    }

    let channels = planes.len();
    let mut data = vec![0u8; cell_count * channels];
    for (c, plane) in planes.iter().enumerate() {
        for (i, &byte) in plane.iter().enumerate() {
            data[i * channels + c] = byte;
        }
    }
    Ok(Raster { size, channels, data })
}

/// Pack four same-size float grids into a 4-channel raster.
pub fn pack_quad(grids: [&Grid<f64>; 4]) -> Result<Raster> {
    let size = grids[0].size();
    for g in &grids[1..] {
        if g.size() != size {
            return Err(Error::GridSizeMismatch(g.size(), size));
        }
    }
    let planes: Vec<Vec<u8>> = grids.iter().map(|g| quantize(g)).collect();
    interleave(size, &[&planes[0], &planes[1], &planes[2], &planes[3]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantize_value_rounding() {
        assert_eq!(quantize_value(0.0), 0);
        assert_eq!(quantize_value(0.5), 128);
        assert_eq!(quantize_value(1.0), 255);
        assert_eq!(quantize_value(-0.2), 0);
        assert_eq!(quantize_value(1.7), 255);
    }

    #[test]
    fn test_pack_single_layout() {
        let grid = Grid::from_fn(2, |x, y| (x * 2 + y) as f64 / 3.0);
        let raster = pack_single(&grid);
        assert_eq!(raster.channels, 1);
        assert_eq!(raster.data, vec![0, 85, 170, 255]);
    }

    #[test]
    fn test_interleave_quad_layout() {
        let planes: Vec<Vec<u8>> =
            (0u8..4).map(|c| (0u8..4).map(|i| c * 10 + i).collect()).collect();
        let raster = interleave(
            2,
            &[&planes[0], &planes[1], &planes[2], &planes[3]],
        )
        .unwrap();
        assert_eq!(&raster.data[..8], &[0, 10, 20, 30, 1, 11, 21, 31]);
        assert_eq!(raster.data.len(), 16);
    }

    #[test]
    fn test_interleave_rejects_bad_channel_count() {
        let plane = vec![0u8; 4];
        let result = interleave(2, &[&plane, &plane]);
        assert!(matches!(result, Err(Error::UnsupportedChannels(2))));
    }

    #[test]
    fn test_interleave_rejects_size_mismatch() {
        let good = vec![0u8; 4];
        let bad = vec![0u8; 3];
        let result = interleave(2, &[&good, &good, &good, &bad]);
        assert!(matches!(result, Err(Error::GridSizeMismatch(3, 4))));
    }

    #[test]
    fn test_pack_quad_interleaves_per_cell() {
        let a = Grid::filled(2, 0.0);
        let b = Grid::filled(2, 1.0);
        let c = Grid::filled(2, 0.5);
        let d = Grid::filled(2, 0.0);
        let raster = pack_quad([&a, &b, &c, &d]).unwrap();
        assert_eq!(raster.channels, 4);
        assert_eq!(&raster.data[..4], &[0, 255, 128, 0]);
        assert_eq!(raster.data.len(), 16);
    }
}
