//! Table plumbing tests: run-length streams, the two-level classifier, the
//! packed JSON/binary formats, and validation of corrupt inputs.

use relex::expr::grammar::{self, char_class};
use relex::scanner::PackedScanTables;
use relex::scanner::ScanTables;
use relex::scanner::tables::pack::{decode_rle, decode_wide, encode_rle, encode_wide};
use relex::scanner::tables::{load_packed_bin_bytes, load_packed_json_bytes, save_packed_bin};

// ---------- run-length streams ----------

#[test]
fn rle_round_trip() {
    let cases: Vec<Vec<u16>> = vec![
        vec![],
        vec![7],
        vec![1, 1, 1, 2, 2, 3],
        vec![0; 100_000],
        (0..1000).map(|i| (i % 5) as u16).collect(),
    ];
    for values in cases {
        let packed = encode_rle(&values);
        assert_eq!(decode_rle(&packed, values.len()).unwrap(), values);
    }
}

#[test]
fn rle_splits_runs_longer_than_a_count() {
    let values = vec![9u16; u16::MAX as usize + 10];
    let packed = encode_rle(&values);
    assert_eq!(packed.len(), 4);
    assert_eq!(decode_rle(&packed, values.len()).unwrap(), values);
}

#[test]
fn rle_rejects_malformed_streams() {
    assert!(decode_rle(&[3], 3).is_err(), "odd length");
    assert!(decode_rle(&[0, 7], 0).is_err(), "zero run");
    assert!(decode_rle(&[5, 7], 3).is_err(), "overrun");
    assert!(decode_rle(&[2, 7], 3).is_err(), "short");
}

#[test]
fn wide_round_trip() {
    let values = vec![0u32, 1, 0xFFFF, 0x10000, u32::MAX];
    let packed = encode_wide(&values);
    assert_eq!(decode_wide(&packed, values.len()).unwrap(), values);
    assert!(decode_wide(&packed, values.len() + 1).is_err());
}

// ---------- classifier ----------

#[test]
fn classifier_agrees_with_the_class_predicate() {
    let tables = ScanTables::unpack(&grammar::compile()).unwrap();
    let samples = [
        'a', 'b', 'e', 'z', 'A', 'G', '_', '$', '0', '9', ' ', '\t', '\n', '\r', '\u{2028}', '!',
        '"', '\'', '\\', '{', '}', '|', '?', '.', '/', '*', '@', '~', 'é', 'Ж', '中', '€',
        '\u{0}', '\u{10FFFF}',
    ];
    for c in samples {
        assert_eq!(
            tables.classifier().classify(c as u32),
            char_class(c),
            "class of {c:?}"
        );
    }
}

#[test]
fn surrogate_range_maps_to_the_default_class() {
    let tables = ScanTables::unpack(&grammar::compile()).unwrap();
    assert_eq!(tables.classifier().classify(0xD800), 0);
    assert_eq!(tables.classifier().classify(0x110000), 0);
}

// ---------- packed formats ----------

fn assert_same(a: &PackedScanTables, b: &PackedScanTables) {
    assert_eq!(a.n_states, b.n_states);
    assert_eq!(a.n_classes, b.n_classes);
    assert_eq!(a.cmap_top, b.cmap_top);
    assert_eq!(a.cmap_blocks, b.cmap_blocks);
    assert_eq!(a.row_offset, b.row_offset);
    assert_eq!(a.trans, b.trans);
    assert_eq!(a.action, b.action);
    assert_eq!(a.attrs, b.attrs);
    assert_eq!(a.mode_start, b.mode_start);
    assert_eq!(a.actions, b.actions);
    assert_eq!(a.bad_kind, b.bad_kind);
}

#[test]
fn json_round_trip() {
    let packed = grammar::compile();
    let bytes = serde_json::to_vec(&packed).unwrap();
    let back = load_packed_json_bytes(&bytes).unwrap();
    assert_same(&packed, &back);
}

#[test]
fn bin_round_trip_covers_every_action_variant() {
    let packed = grammar::compile();
    // The grammar exercises the whole action repertoire; a format bug in
    // any variant would show up here.
    let path = std::env::temp_dir().join(format!(
        "relex_tables_{}_{}.bin",
        std::process::id(),
        packed.n_states
    ));
    save_packed_bin(&path, &packed).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    let back = load_packed_bin_bytes(&bytes).unwrap();
    assert_same(&packed, &back);
    assert!(ScanTables::unpack(&back).is_ok());
}

#[test]
fn bin_rejects_bad_magic_and_truncation() {
    let packed = grammar::compile();
    let path = std::env::temp_dir().join(format!("relex_tables_neg_{}.bin", std::process::id()));
    save_packed_bin(&path, &packed).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    let mut bad = bytes.clone();
    bad[0] ^= 0xFF;
    assert!(load_packed_bin_bytes(&bad).is_err());

    assert!(load_packed_bin_bytes(&bytes[..bytes.len() / 2]).is_err());
    assert!(load_packed_bin_bytes(&[]).is_err());
}

// ---------- unpack validation ----------

#[test]
fn unpack_rejects_out_of_range_mode_start() {
    let mut packed = grammar::compile();
    packed.mode_start[0] = packed.n_states as u16;
    assert!(ScanTables::unpack(&packed).is_err());
}

#[test]
fn unpack_rejects_truncated_action_stream() {
    let mut packed = grammar::compile();
    packed.action.pop();
    packed.action.pop();
    assert!(ScanTables::unpack(&packed).is_err());
}

#[test]
fn unpack_rejects_undefined_action_ids() {
    let mut packed = grammar::compile();
    packed.actions.truncate(1);
    assert!(ScanTables::unpack(&packed).is_err());
}

#[test]
fn unpack_rejects_missing_modes() {
    let mut packed = grammar::compile();
    packed.mode_start.clear();
    assert!(ScanTables::unpack(&packed).is_err());
}
