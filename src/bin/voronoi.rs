//! Builds the diagram of random sites and prints it as text.
//!
//! Usage: `voronoi [COUNT] [SEED] [-v...]`
//!
//! Output has one `v x y` line per vertex and one `s x1 y1 x2 y2` line per
//! edge, with rays cut at unit length.

use std::{env, error::Error};

use rand::{rngs::StdRng, SeedableRng};

use fortune_voronoi::{build_voronoi, utils, validation};

const DEFAULT_COUNT: usize = 100;
const RAY_LENGTH: f64 = 1.0;

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().skip(1).collect();
    let verbosity: usize = args.iter()
        .filter(|a| a.starts_with("-v") && a.chars().skip(1).all(|c| c == 'v'))
        .map(|a| a.len() - 1)
        .sum();
    let positional: Vec<&String> = args.iter().filter(|a| !a.starts_with('-')).collect();
    let count = match positional.first() {
        Some(arg) => arg.parse()?,
        None => DEFAULT_COUNT,
    };
    let seed = match positional.get(1) {
        Some(arg) => arg.parse()?,
        None => 0u64,
    };

    stderrlog::new()
        .module(module_path!())
        .module("fortune_voronoi")
        .verbosity(match verbosity {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        })
        .init()?;
    log::info!("up and running: {} sites, seed {}", count, seed);

    let mut rng = StdRng::seed_from_u64(seed);
    let sites = utils::random_sites(count, (0.0..1.0, 0.0..1.0), &mut rng);
    if let Some((lo, hi)) = utils::bounding_box(&sites) {
        log::debug!("sites span {:?} to {:?}", lo, hi);
    }

    let diagram = build_voronoi(&sites)?;
    let report = validation::validate(&diagram)?;
    log::info!("{}", report);

    for vertex in diagram.vertices() {
        println!("v {} {}", vertex.position.x(), vertex.position.y());
    }
    for [a, b] in diagram.segments(RAY_LENGTH) {
        println!("s {} {} {} {}", a.x(), a.y(), b.x(), b.y());
    }
    Ok(())
}
