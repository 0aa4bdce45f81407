//! London Rectangles
//!
//! Loads `id,lat,lon` lines (for example an OpenStreetMap node extract) from
//! the file given as the first argument, or synthesizes random points when no
//! file is given, then runs every grid-aligned sub-rectangle of greater
//! London against the index.
//!
//! ```text
//! cargo run --release --example london_rectangles -- latlon.subsetPlusAllLondon.txt
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use spatio_bkd::{IndexConfig, LatLonRect, PartitionBuilder, PointStore, load_lines};
use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::time::Instant;

const STEPS: usize = 5;
const MIN_LAT: f64 = 51.0919106;
const MAX_LAT: f64 = 51.6542719;
const MIN_LON: f64 = -0.3867282;
const MAX_LON: f64 = 0.8492337;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    println!("=== spatio-bkd - London Rectangles ===\n");

    let mut store = PointStore::new();
    let start = Instant::now();
    match std::env::args().nth(1) {
        Some(path) => {
            let report = load_lines(BufReader::new(File::open(&path)?), &mut store)?;
            println!(
                "✓ Loaded {} points from {} ({} rejected)",
                report.accepted, path, report.rejected
            );
        }
        None => {
            let mut rng = StdRng::seed_from_u64(0);
            for _ in 0..2_000_000 {
                store.append(
                    rng.random_range(MIN_LAT - 0.5..MAX_LAT + 0.5),
                    rng.random_range(MIN_LON - 0.5..MAX_LON + 0.5),
                )?;
            }
            println!("✓ Generated {} random points", store.len());
        }
    }
    println!("   took {:?}", start.elapsed());

    let start = Instant::now();
    let builder = PartitionBuilder::new(IndexConfig::default());
    let index = builder.build(store.seal()?)?;
    let stats = index.stats();
    println!(
        "✓ Built index in {:?}: {} blocks, depth {}, {:.1} MB",
        start.elapsed(),
        stats.num_blocks,
        stats.depth,
        stats.heap_bytes as f64 / (1024.0 * 1024.0)
    );

    let lat_at = |step: usize| MIN_LAT + step as f64 * (MAX_LAT - MIN_LAT) / STEPS as f64;
    let lon_at = |step: usize| MIN_LON + step as f64 * (MAX_LON - MIN_LON) / STEPS as f64;

    for iter in 0..5 {
        let start = Instant::now();
        let mut queries = 0;
        let mut total_hits = 0;
        for lat_step in 0..STEPS {
            for lon_step in 0..STEPS {
                for lat_end in lat_step + 1..=STEPS {
                    for lon_end in lon_step + 1..=STEPS {
                        let rect = LatLonRect::new(
                            lat_at(lat_step),
                            lat_at(lat_end),
                            lon_at(lon_step),
                            lon_at(lon_end),
                        );
                        let bbox = spatio_bkd::encoding::encode_rect(&rect)?;
                        total_hits += index.range_count(&bbox);
                        queries += 1;
                    }
                }
            }
        }
        println!(
            "   iter {}: {} queries, {} total hits in {:?}",
            iter,
            queries,
            total_hits,
            start.elapsed()
        );
    }

    Ok(())
}
