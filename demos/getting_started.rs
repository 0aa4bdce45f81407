//! Getting Started
//!
//! Builds a small index of European capitals and runs rectangle and polygon
//! queries against it.

use spatio_bkd::{GeoIndex, IndexConfig, LatLon, LatLonPolygon, LatLonRect};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    println!("=== spatio-bkd - Getting Started ===\n");

    let capitals = [
        (1, "London", 51.5074, -0.1278),
        (2, "Paris", 48.8566, 2.3522),
        (3, "Berlin", 52.5200, 13.4050),
        (4, "Madrid", 40.4168, -3.7038),
        (5, "Rome", 41.9028, 12.4964),
        (6, "Dublin", 53.3498, -6.2603),
        (7, "Amsterdam", 52.3676, 4.9041),
    ];

    let mut index = GeoIndex::with_config(IndexConfig::default().with_leaf_size(2))?;
    for &(id, _, lat, lon) in &capitals {
        index.insert(lat, lon, Some(id))?;
    }
    println!("✓ Buffered {} points", index.len());

    // Queries are refused until the tree is built
    assert!(index.count_in_rect(&LatLonRect::world()).is_err());

    let stats = index.seal()?.stats();
    println!(
        "✓ Sealed: {} blocks, {} split nodes, depth {}\n",
        stats.num_blocks, stats.num_split_nodes, stats.depth
    );

    let name_of = |id: u64| {
        capitals
            .iter()
            .find(|c| c.0 == id)
            .map(|c| c.1)
            .unwrap_or("?")
    };

    let north_west = LatLonRect::new(50.0, 55.0, -7.0, 5.0);
    let mut ids = index.ids_in_rect(&north_west)?;
    ids.sort_unstable();
    println!("1. Rectangle lat [50, 55], lon [-7, 5]");
    for id in ids {
        println!("   - {}", name_of(id));
    }

    let triangle = LatLonPolygon::new(vec![
        LatLon::new(40.0, -5.0),
        LatLon::new(50.0, 3.0),
        LatLon::new(40.0, 15.0),
    ]);
    let mut ids = index.ids_in_polygon(&triangle)?;
    ids.sort_unstable();
    println!("\n2. Triangle Madrid-Paris-Rome area");
    for id in ids {
        println!("   - {}", name_of(id));
    }

    println!(
        "\n3. Whole globe: {} points",
        index.count_in_rect(&LatLonRect::world())?
    );

    Ok(())
}
