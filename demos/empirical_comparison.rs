//! Filtered versus naive retrieval over a real differential store
//!
//! Builds a filter over the differential file, then times the filtered and
//! naive retrievers on keys drawn three ways: any database key, any
//! differential key, and database keys with no differential record.
//!
//! Usage: cargo run --release --example empirical_comparison [options.json] [queries]
//!
//! Without an options file the defaults are used (`differential.txt` and
//! `database.txt` in the working directory).

use anyhow::Context;
use bloomdiff::experiment::{compare_retrieval, sample_keys, SampleMode};
use bloomdiff::{DifferentialLookup, LookupOptions, NaiveLookup};
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    // Initialize logger
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let options = match args.next() {
        Some(path) => LookupOptions::from_json_file(&path)
            .with_context(|| format!("loading options from {}", path))?,
        None => LookupOptions::default(),
    };
    let queries = match args.next() {
        Some(arg) => arg.parse()?,
        None => 1000,
    };

    println!("Differential file: {:?}", options.differential_path);
    println!("Database file: {:?}", options.database_path);
    println!(
        "Filter: {} family, {} expected items, {} bits/element\n",
        options.family, options.expected_items, options.bits_per_element
    );

    let start = Instant::now();
    let filtered = DifferentialLookup::open(&options).context("building differential filter")?;
    println!(
        "Built filter in {:?}: {} keys, {} bits, {} hashes\n",
        start.elapsed(),
        filtered.filter().data_size(),
        filtered.filter().filter_size(),
        filtered.filter().num_hashes()
    );
    let naive = NaiveLookup::from_options(&options);

    let mut rng = rand::rng();
    for mode in SampleMode::ALL {
        let keys = match sample_keys(mode, filtered.differential(), filtered.database(), queries, &mut rng) {
            Ok(keys) => keys,
            Err(e) => {
                println!("Skipping {}: {}\n", mode, e);
                continue;
            }
        };

        println!("=== {} ===", mode);
        println!("{}\n", compare_retrieval(&filtered, &naive, &keys));
    }

    let stats = filtered.stats();
    println!("Filter rejections: {}", stats.filter_rejections);
    println!("Differential scans: {}", stats.differential_scans);
    println!(
        "False positives: {} ({:.4} of scans)",
        stats.false_positives,
        stats.false_positive_rate()
    );

    Ok(())
}
