//! Persistence collaborator: raw grid save/load.
//!
//! Grids are flat `f64` arrays, so files are a small header followed by
//! the byte-cast cell payload. Native endianness; these files are
//! intermediates of one machine's run, not an interchange format.

use std::fs;
use std::path::Path;

use crate::core::{Error, Result};
use crate::grid::Grid;

const MAGIC: &[u8; 4] = b"LFG1";

/// Save a grid to `path`, overwriting after a warning if it exists.
pub fn save(path: &Path, grid: &Grid<f64>) -> Result<()> {
    if path.exists() {
        log::warn!("{} exists, it will be overwritten", path.display());
    }
    log::info!("saving grid: {}", path.display());

    let mut bytes = Vec::with_capacity(8 + grid.cells().len() * 8);
    bytes.extend_from_slice(MAGIC);
    bytes.extend_from_slice(&(grid.size() as u32).to_le_bytes());
    bytes.extend_from_slice(bytemuck::cast_slice(grid.cells()));
    fs::write(path, bytes)?;
    Ok(())
}

/// Load a grid previously written by [`save`].
pub fn load(path: &Path) -> Result<Grid<f64>> {
    log::info!("loading grid: {}", path.display());
    let bytes = fs::read(path)?;
    if bytes.len() < 8 || &bytes[..4] != MAGIC {
        return Err(Error::Store(format!("{}: not a grid file", path.display())));
    }
    let size = u32::from_le_bytes(bytes[4..8].try_into().unwrap()) as usize;
    let payload = &bytes[8..];
    if payload.len() != size * size * 8 {
        return Err(Error::Store(format!(
            "{}: payload length {} does not match size {}",
            path.display(),
            payload.len(),
            size
        )));
    }
    let cells: Vec<f64> = bytemuck::pod_collect_to_vec(payload);
    Ok(Grid::from_cells(size, cells))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("elevation.lfg");
        let grid = Grid::from_fn(17, |x, y| (x as f64 * 0.3).sin() + y as f64);
        save(&path, &grid).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded.size(), 17);
        assert_eq!(loaded.cells(), grid.cells());
    }

    #[test]
    fn test_load_rejects_bad_magic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.lfg");
        fs::write(&path, b"not a grid at all").unwrap();
        assert!(matches!(load(&path), Err(Error::Store(_))));
    }

    #[test]
    fn test_load_rejects_truncated_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.lfg");
        let mut bytes = Vec::new();
        bytes.extend_from_slice(MAGIC);
        bytes.extend_from_slice(&4u32.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 16]); // needs 4*4*8 = 128 bytes
        fs::write(&path, bytes).unwrap();
        assert!(matches!(load(&path), Err(Error::Store(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load(&dir.path().join("absent.lfg"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
