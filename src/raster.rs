//! Raster output collaborator: writes packed byte rasters as PNG files.
//!
//! The core hands this module fully-formed 8-bit channel data; the
//! container format is the image crate's concern.

use std::path::Path;

use image::{GrayImage, RgbaImage};

use crate::codec::Raster;
use crate::core::{Error, Result};

/// Write a 1- or 4-channel raster to `path` as a PNG.
///
/// Overwrites an existing file after a warning, like the grid store.
pub fn write_png(path: &Path, raster: &Raster) -> Result<()> {
    if path.exists() {
        log::warn!("{} exists, it will be overwritten", path.display());
    }
    log::info!("writing {}-channel raster: {}", raster.channels, path.display());
    let side = raster.size as u32;
    match raster.channels {
        1 => {
            let img = GrayImage::from_raw(side, side, raster.data.clone())
                .ok_or_else(|| Error::Config("raster data does not match size".into()))?;
            img.save(path)?;
        }
        4 => {
            let img = RgbaImage::from_raw(side, side, raster.data.clone())
                .ok_or_else(|| Error::Config("raster data does not match size".into()))?;
            img.save(path)?;
        }
        n => return Err(Error::UnsupportedChannels(n)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec;
    use crate::grid::Grid;

    #[test]
    fn test_write_gray_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.png");
        let grid = Grid::from_fn(4, |x, y| (x * 4 + y) as f64 / 15.0);
        let raster = codec::pack_single(&grid);
        write_png(&path, &raster).unwrap();

        let loaded = image::open(&path).unwrap().to_luma8();
        assert_eq!(loaded.width(), 4);
        assert_eq!(loaded.as_raw(), &raster.data);
    }

    #[test]
    fn test_write_rgba_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quad.png");
        let grid = Grid::from_fn(4, |x, y| ((x + y) % 2) as f64);
        let raster = codec::pack_quad([&grid, &grid, &grid, &grid]).unwrap();
        write_png(&path, &raster).unwrap();

        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(loaded.as_raw(), &raster.data);
    }

    #[test]
    fn test_write_rejects_channel_count() {
        let dir = tempfile::tempdir().unwrap();
        let raster = Raster { size: 2, channels: 3, data: vec![0; 12] };
        let result = write_png(&dir.path().join("bad.png"), &raster);
        assert!(matches!(result, Err(Error::UnsupportedChannels(3))));
    }
}
