//! Square cell grids and the per-cell iteration primitives shared by every
//! pipeline stage.
//!
//! Grids are flat row-major arrays of side `size` (a power of two plus
//! one), addressed `(x, y)` with `x` as the row. Every stage fully
//! materializes its output grid before the next stage reads it, so the
//! parallel constructors here need no synchronization beyond the implicit
//! join.

use rayon::prelude::*;

/// A square grid of side `size` with flat row-major storage.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    size: usize,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    /// Build a grid filled with copies of `value`.
    pub fn filled(size: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self {
            size,
            cells: vec![value; size * size],
        }
    }

    /// Build a grid by evaluating `f(x, y)` for every cell in parallel.
    pub fn from_fn<F>(size: usize, f: F) -> Self
    where
        T: Send,
        F: Fn(usize, usize) -> T + Sync + Send,
    {
        let cells = (0..size * size)
            .into_par_iter()
            .map(|i| f(i / size, i % size))
            .collect();
        Self { size, cells }
    }

    /// Wrap existing cell storage. Panics if `cells` is not `size * size`
    /// long; callers construct grids, they never receive untrusted ones.
    pub fn from_cells(size: usize, cells: Vec<T>) -> Self {
        assert_eq!(cells.len(), size * size, "cell count must match size^2");
        Self { size, cells }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.cells[x * self.size + y]
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) {
        self.cells[x * self.size + y] = value;
    }

    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    /// Rewrite every cell as `f(x, y, &old)` in parallel.
    pub fn update<F>(&mut self, f: F)
    where
        T: Send,
        F: Fn(usize, usize, &T) -> T + Sync + Send,
    {
        let size = self.size;
        self.cells
            .par_iter_mut()
            .enumerate()
            .for_each(|(i, cell)| *cell = f(i / size, i % size, cell));
    }

    /// Map every cell into a new grid of the same size.
    pub fn map<U, F>(&self, f: F) -> Grid<U>
    where
        T: Sync,
        U: Send,
        F: Fn(&T) -> U + Sync + Send,
    {
        Grid {
            size: self.size,
            cells: self.cells.par_iter().map(f).collect(),
        }
    }
}

impl Grid<f64> {
    /// Minimum and maximum cell values.
    pub fn min_max(&self) -> (f64, f64) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &v in &self.cells {
            min = min.min(v);
            max = max.max(v);
        }
        (min, max)
    }

    /// Min-max stretch all cells to [0, 1] in place.
    ///
    /// A constant grid is left shifted to zero rather than divided by the
    /// zero range. Idempotent on an already normalized grid.
    pub fn normalize(&mut self) {
        let (min, max) = self.min_max();
        let range = max - min;
        if range.abs() < f64::EPSILON {
            self.cells.par_iter_mut().for_each(|v| *v -= min);
        } else {
            // Division keeps the endpoints exact: x / x is 1.0 in IEEE.
            self.cells.par_iter_mut().for_each(|v| *v = (*v - min) / range);
        }
    }

    /// Sample with coordinates clamped to the nearest edge index.
    pub fn get_clamped(&self, x: isize, y: isize) -> f64 {
        let last = (self.size - 1) as isize;
        let cx = x.clamp(0, last) as usize;
        let cy = y.clamp(0, last) as usize;
        *self.get(cx, cy)
    }
}

/// Map a cell coordinate to the centered normalized range [-1, 1].
pub fn centered(coord: usize, size: usize) -> f64 {
    (coord as f64 / size as f64) * 2.0 - 1.0
}

/// Radial distance of a cell from the grid center in centered coordinates.
pub fn dist_to_center(x: usize, y: usize, size: usize) -> f64 {
    let nx = centered(x, size);
    let ny = centered(y, size);
    (nx * nx + ny * ny).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_fn_indexing() {
        let grid = Grid::from_fn(4, |x, y| (x * 10 + y) as f64);
        assert_eq!(grid.size(), 4);
        assert_eq!(*grid.get(0, 0), 0.0);
        assert_eq!(*grid.get(2, 3), 23.0);
        assert_eq!(*grid.get(3, 1), 31.0);
    }

    #[test]
    fn test_normalize_stretches_to_unit_range() {
        let mut grid = Grid::from_fn(3, |x, y| (x + y) as f64);
        grid.normalize();
        let (min, max) = grid.min_max();
        assert_eq!(min, 0.0);
        assert_eq!(max, 1.0);
    }

    #[test]
    fn test_normalize_idempotent() {
        let mut grid = Grid::from_fn(5, |x, y| (x * 5 + y) as f64 / 24.0);
        grid.normalize();
        let snapshot = grid.clone();
        grid.normalize();
        for (a, b) in grid.cells().iter().zip(snapshot.cells()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_normalize_constant_grid() {
        let mut grid = Grid::filled(4, 0.7);
        grid.normalize();
        for &v in grid.cells() {
            assert_eq!(v, 0.0);
        }
    }

    #[test]
    fn test_get_clamped_edges() {
        let grid = Grid::from_fn(3, |x, y| (x * 3 + y) as f64);
        assert_eq!(grid.get_clamped(-5, 0), *grid.get(0, 0));
        assert_eq!(grid.get_clamped(0, 9), *grid.get(0, 2));
        assert_eq!(grid.get_clamped(9, -1), *grid.get(2, 0));
    }

    #[test]
    fn test_update_sees_coordinates() {
        let mut grid = Grid::filled(3, 1.0);
        grid.update(|x, y, v| v + (x + y) as f64);
        assert_eq!(*grid.get(2, 2), 5.0);
    }

    #[test]
    fn test_centered_range() {
        assert_eq!(centered(0, 512), -1.0);
        assert!((centered(256, 512)).abs() < 1e-12);
        assert!(dist_to_center(256, 256, 512) < 1e-12);
        assert!((dist_to_center(0, 0, 512) - std::f64::consts::SQRT_2).abs() < 1e-12);
    }
}
