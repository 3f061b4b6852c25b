// Empirical Comparison Tests for bloomdiff
// These tests run the sampling and timing harness against small record files

use bloomdiff::experiment::{compare_retrieval, sample_keys, SampleMode};
use bloomdiff::record::fold_case;
use bloomdiff::{DifferentialLookup, FamilyKind, LookupOptions, NaiveLookup, RecordFile};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use std::fs;
use tempfile::TempDir;

fn setup(dir: &TempDir) -> LookupOptions {
    let diff_path = dir.path().join("differential.txt");
    let db_path = dir.path().join("database.txt");

    let mut differential = String::new();
    let mut database = String::new();
    for i in 0..200 {
        database.push_str(&format!("word{} alpha beta gamma {} 1 1\n", i, 1800 + i));
        if i % 5 == 0 {
            differential.push_str(&format!("Word{} alpha beta gamma {} 4 4\n", i, 1900 + i));
        }
    }
    fs::write(&diff_path, differential).unwrap();
    fs::write(&db_path, database).unwrap();

    LookupOptions::new(diff_path, db_path).expected_items(40)
}

/// Test that the filtered and naive retrievers agree for every sample mode and family
#[test]
fn test_compare_retrieval_has_no_mismatches() {
    let dir = TempDir::new().unwrap();
    let mut rng = StdRng::seed_from_u64(2024);

    for family in FamilyKind::ALL {
        let options = setup(&dir).family(family);
        let filtered = DifferentialLookup::open_with_rng(&options, &mut rng).unwrap();
        let naive = NaiveLookup::from_options(&options);

        for mode in SampleMode::ALL {
            let keys =
                sample_keys(mode, filtered.differential(), filtered.database(), 50, &mut rng)
                    .unwrap();
            assert_eq!(keys.len(), 50);

            let report = compare_retrieval(&filtered, &naive, &keys);
            assert_eq!(report.queries, 50);
            assert_eq!(report.mismatches, 0, "{} / {}", family, mode);
        }
    }
}

/// Test that database-only samples never hit a shadowed key, even across case
#[test]
fn test_database_only_samples_skip_shadowed_keys() {
    let dir = TempDir::new().unwrap();
    let options = setup(&dir);
    let differential = RecordFile::new(&options.differential_path);
    let database = RecordFile::new(&options.database_path);

    let shadowed: HashSet<String> =
        differential.keys().unwrap().iter().map(|key| fold_case(key)).collect();
    assert_eq!(shadowed.len(), 40);

    let keys = sample_keys(
        SampleMode::DatabaseOnly,
        &differential,
        &database,
        500,
        &mut StdRng::seed_from_u64(11),
    )
    .unwrap();

    assert_eq!(keys.len(), 500);
    assert!(keys.iter().all(|key| !shadowed.contains(&fold_case(key))));
}

/// Test that a filtered lookup over database-only keys mostly skips the differential scan
#[test]
fn test_database_only_queries_are_mostly_rejected() {
    let dir = TempDir::new().unwrap();
    let options = setup(&dir).family(FamilyKind::Murmur).bits_per_element(10);
    let mut rng = StdRng::seed_from_u64(77);
    let filtered = DifferentialLookup::open_with_rng(&options, &mut rng).unwrap();
    let naive = NaiveLookup::from_options(&options);

    let keys = sample_keys(
        SampleMode::DatabaseOnly,
        filtered.differential(),
        filtered.database(),
        200,
        &mut rng,
    )
    .unwrap();
    let report = compare_retrieval(&filtered, &naive, &keys);
    assert_eq!(report.mismatches, 0);

    let stats = filtered.stats();
    assert_eq!(stats.differential_hits, 0);
    assert_eq!(stats.database_hits, 200);
    assert!(stats.filter_rejections > 150, "{:?}", stats);
}
