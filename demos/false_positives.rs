//! False positive rates of the three hash families
//!
//! Inserts 1,000,000 random keys into a filter per family and bit budget,
//! probes with roughly 100,000 keys that were never inserted, and prints the
//! observed false positive rate next to the theoretical `0.6185^bits`.
//!
//! Usage: cargo run --release --example false_positives [key_count]

use bloomdiff::experiment::{false_positive_trial, KeySets};
use bloomdiff::FamilyKind;

const BITS_PER_ELEMENT: [usize; 3] = [4, 8, 10];

fn main() -> anyhow::Result<()> {
    // Initialize logger
    env_logger::init();

    let count = match std::env::args().nth(1) {
        Some(arg) => arg.parse()?,
        None => 1_000_000,
    };

    println!("Generating {} keys...", count);
    let mut rng = rand::rng();
    let keys = KeySets::generate(count, &mut rng);
    println!("{} inserted, {} probes\n", keys.inserted().len(), keys.probes().len());

    for bits in BITS_PER_ELEMENT {
        for family in FamilyKind::ALL {
            let report = false_positive_trial(&keys, family, bits, &mut rng)?;
            println!("{}\n", report);
        }
    }

    Ok(())
}
