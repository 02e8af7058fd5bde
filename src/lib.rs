//! Landforge - procedural landmass map generator
//!
//! Synthesizes a self-consistent set of square grids (elevation,
//! temperature, humidity, detail noise, surface normals and slope, biome
//! classifications) and packs them into fixed-layout multi-channel rasters
//! for a downstream renderer.

pub mod core;
pub mod grid;
pub mod field;
pub mod topography;
pub mod relief;
pub mod climate;
pub mod biome;
pub mod codec;
pub mod raster;
pub mod store;
pub mod config;
pub mod pipeline;
