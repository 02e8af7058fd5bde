//! Stage orchestration: runs the generation stages in dependency order
//! and assembles the packed raster products.
//!
//! Each stage fully materializes its grid before the next stage reads
//! it; within a stage every cell is independent, so the stages
//! parallelize over flat cell indices with no further synchronization.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use glam::Vec3;
use rayon::prelude::*;

use crate::biome::{paired, weights};
use crate::climate;
use crate::codec::{self, Raster};
use crate::config::{LandConfig, RunContext};
use crate::core::Result;
use crate::field::{self, REPEAT_DETAIL};
use crate::grid::Grid;
use crate::relief;
use crate::topography;

/// All grids of one completed generation run.
pub struct LandMaps {
    pub elevation: Grid<f64>,
    pub normals: Grid<Vec3>,
    pub slopes: Grid<f64>,
    pub temperature: Grid<f64>,
    pub humidity: Grid<f64>,
    /// High-frequency detail noise consumed by the classifier and packed
    /// into every 4-channel product.
    pub detail: Grid<f64>,
}

/// Validated pipeline over one configuration bundle.
pub struct LandPipeline {
    ctx: RunContext,
    config: LandConfig,
}

impl LandPipeline {
    /// Validate the configuration and build the pipeline.
    pub fn new(config: LandConfig) -> Result<Self> {
        let ctx = config.validate()?;
        Ok(Self { ctx, config })
    }

    pub fn context(&self) -> &RunContext {
        &self.ctx
    }

    /// Run every stage in dependency order.
    pub fn run(&self) -> Result<LandMaps> {
        let started = Instant::now();

        let mut detail = field::synthesize(
            self.ctx.size,
            &self.config.noise_stack(),
            1.0,
            REPEAT_DETAIL,
        );
        detail.normalize();

        let elevation = topography::synthesize(&self.ctx, &self.config.topography_params());
        let normals = relief::normals(&elevation);
        let slopes = relief::slopes(&normals);
        let temperature = climate::derive_temperature(
            &self.ctx,
            &self.config.temperature_params(),
            &elevation,
        );
        let humidity =
            climate::derive_humidity(&self.ctx, &self.config.humidity_params(), &elevation);

        log::info!(
            "generated {size}x{size} maps in {:.2}s",
            started.elapsed().as_secs_f64(),
            size = self.ctx.size
        );
        Ok(LandMaps {
            elevation,
            normals,
            slopes,
            temperature,
            humidity,
            detail,
        })
    }

    /// Pack temperature, blend factor, slope and detail noise into one
    /// 4-channel raster.
    pub fn pack_climate(&self, maps: &LandMaps) -> Result<Raster> {
        let blend: Vec<u8> = maps
            .humidity
            .cells()
            .par_iter()
            .zip(maps.slopes.cells())
            .map(|(&h, &s)| codec::quantize_value(paired::blend_factor(h, s)))
            .collect();
        codec::interleave(
            self.ctx.size,
            &[
                &codec::quantize(&maps.temperature),
                &blend,
                &codec::quantize(&maps.slopes),
                &codec::quantize(&maps.detail),
            ],
        )
    }

    /// Pack paired terrain indices, blend factor, slope and detail noise
    /// into one 4-channel raster.
    pub fn pack_terrain_pairs(&self, maps: &LandMaps) -> Result<Raster> {
        let (indices, blend): (Vec<u8>, Vec<u8>) = maps
            .slopes
            .cells()
            .par_iter()
            .zip(maps.temperature.cells())
            .zip(maps.humidity.cells())
            .map(|((&slope, &temperature), &humidity)| {
                paired::classify(slope, temperature, humidity)
            })
            .unzip();
        codec::interleave(
            self.ctx.size,
            &[
                &indices,
                &blend,
                &codec::quantize(&maps.slopes),
                &codec::quantize(&maps.detail),
            ],
        )
    }

    /// Classify every cell into 8 blend-weight channels and split them
    /// across two 4-channel rasters.
    ///
    /// Classification gaps are counted and reported once; gap cells carry
    /// the deterministic snow fallback.
    pub fn pack_blend_weights(&self, maps: &LandMaps) -> Result<(Raster, Raster)> {
        let ocean_altitude = self.ctx.ocean_altitude;
        let gaps = AtomicUsize::new(0);

        let cells: Vec<[u8; 8]> = (0..self.ctx.size * self.ctx.size)
            .into_par_iter()
            .map(|i| {
                let sample = weights::CellSample {
                    altitude: maps.elevation.cells()[i],
                    slope: maps.slopes.cells()[i],
                    temperature: maps.temperature.cells()[i],
                    humidity: maps.humidity.cells()[i],
                    noise: maps.detail.cells()[i],
                };
                let (w, gap) = weights::classify(&sample, ocean_altitude);
                if gap {
                    gaps.fetch_add(1, Ordering::Relaxed);
                }
                w.to_bytes()
            })
            .collect();

        let gap_count = gaps.load(Ordering::Relaxed);
        if gap_count > 0 {
            log::warn!(
                "{} cells had no blend weights and fell back to snow",
                gap_count
            );
        }

        let mut planes: [Vec<u8>; 8] = Default::default();
        for plane in &mut planes {
            plane.reserve(cells.len());
        }
        for cell in &cells {
            for (c, &byte) in cell.iter().enumerate() {
                planes[c].push(byte);
            }
        }

        let low = codec::interleave(
            self.ctx.size,
            &[&planes[0], &planes[1], &planes[2], &planes[3]],
        )?;
        let high = codec::interleave(
            self.ctx.size,
            &[&planes[4], &planes[5], &planes[6], &planes[7]],
        )?;
        Ok((low, high))
    }
}
