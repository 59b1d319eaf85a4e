use pretty_assertions::assert_eq;
use strata_tiles::TileError;
use strata_tiles::aggregate;
use strata_tiles::chrono;

fn assert_round_trip(earliest: i64, latest: i64, prefix: &str) {
    let path = chrono::encode(earliest, latest, prefix)
        .unwrap_or_else(|err| panic!("encode {earliest}..{latest}: {err}"));
    assert!(aggregate::depth(&path) <= chrono::MAX_DEPTH, "{path} is too deep");
    let bounds = chrono::decode(&path).unwrap_or_else(|err| panic!("decode {path}: {err}"));
    assert_eq!(
        (bounds.earliest, bounds.latest),
        (earliest, latest),
        "path {path}"
    );
}

#[test]
fn intervals_survive_encode_decode() {
    let samples = [
        (10_000_000, 0),
        (9_999_999, 9_999_998),
        (12_000, 11_000),
        (5_001, 5_000),
        (1, 0),
        (0, 0),
        (4_950, 4_450),
        (7_654_321, 1_234_567),
    ];
    for (earliest, latest) in samples {
        assert_round_trip(earliest, latest, "");
    }
}

#[test]
fn prefixed_intervals_survive_encode_decode() {
    assert_round_trip(999_999, 3, "1m");
    assert_round_trip(4_500, 4_499, "5k");
    assert_round_trip(900_000_000, 12, "1g");
}

#[test]
fn shared_prefix_groups_nearby_intervals() {
    let a = chrono::encode(5_200, 5_000, "").expect("encode a");
    let b = chrono::encode(5_150, 5_050, "").expect("encode b");
    let c = chrono::encode(9_000_000, 8_000_000, "").expect("encode c");
    let raw = [(a.as_str(), 2), (b.as_str(), 3), (c.as_str(), 7)];
    let buckets = aggregate::aggregate(raw, 4);
    assert_eq!(buckets.len(), 2);
    assert_eq!(buckets.values().sum::<u64>(), 12);
}

#[test]
fn exceeding_prefix_bound_is_out_of_range() {
    let err = chrono::encode(2_000_000, 0, "1m").expect_err("bound exceeded");
    assert!(matches!(err, TileError::OutOfRange(_)));
}
