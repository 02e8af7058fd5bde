//! Land generator binary — runs the map pipeline and writes its outputs.
//!
//! Usage: cargo run --release --bin generate_land -- [OPTIONS]
//!
//! Options:
//!   --config <PATH>   Land config file, JSON (defaults used if absent)
//!   --jobs <N>        Max parallel worker threads (default: rayon's choice)
//!   --maps            Write grayscale PNGs of every scalar grid
//!   --climate         Write the temperature/blend/slope/noise raster
//!   --pairs           Write the terrain-pair/blend/slope/noise raster
//!   --weights         Write the two 4-channel blend-weight rasters
//!   --grids           Save raw grids for external consumers
//!   --all             All of the above
//!
//! Output structure:
//!   <name>/
//!     topography.png temperature.png humidity.png noise.png slopes.png
//!     land_data_thn.png land_data_bld.png
//!     land_data_alpha0.png land_data_alpha1.png
//!     topography.lfg temperature.lfg humidity.lfg noise.lfg

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use landforge::codec;
use landforge::config::LandConfig;
use landforge::core::Result;
use landforge::pipeline::{LandMaps, LandPipeline};
use landforge::raster;
use landforge::store;

fn main() -> ExitCode {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .format_timestamp_millis()
    .init();

    let args: Vec<String> = std::env::args().collect();
    let config_path = parse_str_arg(&args, "--config");
    let jobs = parse_usize_arg(&args, "--jobs");
    let all = has_flag(&args, "--all");
    let want_maps = all || has_flag(&args, "--maps");
    let want_climate = all || has_flag(&args, "--climate");
    let want_pairs = all || has_flag(&args, "--pairs");
    let want_weights = all || has_flag(&args, "--weights");
    let want_grids = all || has_flag(&args, "--grids");

    if !(want_maps || want_climate || want_pairs || want_weights || want_grids) {
        eprintln!("nothing to do; pass --all or one of --maps --climate --pairs --weights --grids");
        return ExitCode::FAILURE;
    }

    if let Some(jobs) = jobs {
        // Cap rayon's pool to limit peak memory on large grids
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .expect("Failed to configure thread pool");
    }

    let run = || -> Result<()> {
        let config = match &config_path {
            Some(path) => LandConfig::load(Path::new(path))?,
            None => LandConfig::default(),
        };

        let out_dir = PathBuf::from(&config.global.name);
        std::fs::create_dir_all(&out_dir)?;

        let pipeline = LandPipeline::new(config)?;
        log::info!(
            "generating {size}x{size} land into {}",
            out_dir.display(),
            size = pipeline.context().size
        );
        let maps = pipeline.run()?;

        if want_maps {
            write_grayscale(&out_dir, &maps)?;
        }
        if want_grids {
            save_grids(&out_dir, &maps)?;
        }
        if want_climate {
            let thn = pipeline.pack_climate(&maps)?;
            raster::write_png(&out_dir.join("land_data_thn.png"), &thn)?;
        }
        if want_pairs {
            let bld = pipeline.pack_terrain_pairs(&maps)?;
            raster::write_png(&out_dir.join("land_data_bld.png"), &bld)?;
        }
        if want_weights {
            let (alpha0, alpha1) = pipeline.pack_blend_weights(&maps)?;
            raster::write_png(&out_dir.join("land_data_alpha0.png"), &alpha0)?;
            raster::write_png(&out_dir.join("land_data_alpha1.png"), &alpha1)?;
        }
        Ok(())
    };

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn write_grayscale(out_dir: &Path, maps: &LandMaps) -> Result<()> {
    let images = [
        ("topography.png", &maps.elevation),
        ("temperature.png", &maps.temperature),
        ("humidity.png", &maps.humidity),
        ("noise.png", &maps.detail),
        ("slopes.png", &maps.slopes),
    ];
    for (file, grid) in images {
        raster::write_png(&out_dir.join(file), &codec::pack_single(grid))?;
    }
    Ok(())
}

fn save_grids(out_dir: &Path, maps: &LandMaps) -> Result<()> {
    let grids = [
        ("topography.lfg", &maps.elevation),
        ("temperature.lfg", &maps.temperature),
        ("humidity.lfg", &maps.humidity),
        ("noise.lfg", &maps.detail),
    ];
    for (file, grid) in grids {
        store::save(&out_dir.join(file), grid)?;
    }
    Ok(())
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn parse_usize_arg(args: &[String], flag: &str) -> Option<usize> {
    parse_str_arg(args, flag).and_then(|s| s.parse().ok())
}
