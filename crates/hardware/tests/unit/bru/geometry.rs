//! Geometry, Configuration String and Persistence Tests.

use crate::common::harness::TestContext;
use crate::common::mocks::listener::MockLabels;
use pretty_assertions::assert_eq;
use predtab_core::bru::{PortId, PredictionTable};
use predtab_core::common::{ConfigError, LogicVector, MemoryError, SimTime};
use predtab_core::config::Config;
use predtab_core::memory::{MemoryLoader, Word};
use predtab_core::sim::Bench;

fn table() -> PredictionTable {
    PredictionTable::new(&Config::default()).unwrap()
}

// ══════════════════════════════════════════════════════════
// 1. Geometry
// ══════════════════════════════════════════════════════════

#[test]
fn default_geometry() {
    let t = table();
    assert_eq!(t.store().size(), 256);
    assert_eq!(t.store().bit_width(), 18);
    assert_eq!(t.access_latency(), SimTime::from_ns(30));
}

#[test]
fn connected_table_cannot_resize() {
    let mut tc = TestContext::new();
    assert!(!tc.table.can_change_size(&tc.bench));
    assert_eq!(
        tc.table.resize(&tc.bench, 64, 18),
        Err(MemoryError::FixedGeometry)
    );
    assert_eq!(tc.table.store().size(), 256);
}

#[test]
fn one_connected_port_is_enough_to_block() {
    let mut t = table();
    let mut bench = Bench::new();
    bench.set_connected(PortId::Commit, true);
    assert_eq!(t.set_size(&bench, 8), Err(MemoryError::FixedGeometry));
}

#[test]
fn unconnected_table_resizes_and_zeroes() {
    let mut t = table();
    t.store_mut().write(0, Word::Value(0x390AB));
    let bench = Bench::new();
    assert!(t.can_change_size(&bench));

    t.set_size(&bench, 16).unwrap();
    t.set_bit_width(&bench, 12).unwrap();
    assert_eq!(t.store().size(), 16);
    assert_eq!(t.store().bit_width(), 12);
    assert_eq!(t.store().peek(0), Some(Word::Value(0)));
    assert_eq!(t.standard_values().word_undefined, LogicVector::undefined(12));
}

#[test]
fn invalid_resize_is_rejected() {
    let mut t = table();
    let bench = Bench::new();
    assert!(matches!(
        t.resize(&bench, 0, 18),
        Err(MemoryError::InvalidGeometry { .. })
    ));
    assert_eq!(t.store().size(), 256);
}

#[test]
fn word_vector_reflects_store() {
    let mut t = table();
    t.store_mut().write(1, Word::Value(0x390AB));
    t.store_mut().write(2, Word::Undefined);
    assert_eq!(t.word_vector(1), LogicVector::new(18, 0x390AB));
    assert_eq!(t.word_vector(2), LogicVector::undefined(18));
    assert_eq!(t.word_vector(999), LogicVector::undefined(18));
}

// ══════════════════════════════════════════════════════════
// 2. Configuration string
// ══════════════════════════════════════════════════════════

#[test]
fn initialize_without_resource_fills_undefined() {
    let mut t = table();
    let report = t.initialize("1001 16 18", &MemoryLoader::new()).unwrap();
    assert!(report.is_none());
    assert_eq!(t.store().size(), 16);
    assert!(t.store().words().iter().all(|w| w.is_undefined()));
    assert_eq!(t.serialize(), "1001 16 18");
    assert_eq!(t.resource(), None);
}

#[test]
fn initialize_with_resource_loads_over_zeroes() {
    let loader = MemoryLoader::new().with("my table.txt", "0003:390ab\n");
    let mut t = table();
    let report = t
        .initialize("1001 8 18 my\\u0020table.txt", &loader)
        .unwrap()
        .unwrap();

    assert_eq!(report.records, 1);
    assert_eq!(t.store().peek(3), Some(Word::Value(0x390AB)));
    assert_eq!(t.store().peek(4), Some(Word::Value(0)));
    assert_eq!(t.resource(), Some("my table.txt"));
    assert_eq!(t.serialize(), "1001 8 18 my\\u0020table.txt");
}

#[test]
fn initialize_with_missing_resource_fails() {
    let mut t = table();
    let err = t.initialize("1001 8 18 nowhere.txt", &MemoryLoader::new());
    assert!(matches!(err, Err(ConfigError::Resource { ref name, .. }) if name == "nowhere.txt"));
    assert_eq!(t.store().size(), 8);
}

#[test]
fn malformed_string_leaves_table_untouched() {
    let mut t = table();
    t.store_mut().write(0, Word::Value(7));
    assert!(matches!(
        t.initialize("1001 lots 18", &MemoryLoader::new()),
        Err(ConfigError::BadNumber { field: "word_count", .. })
    ));
    assert!(matches!(
        t.initialize("1001", &MemoryLoader::new()),
        Err(ConfigError::MissingField("word_count"))
    ));
    assert!(matches!(
        t.initialize("1001 0 18", &MemoryLoader::new()),
        Err(ConfigError::Geometry(_))
    ));
    assert_eq!(t.store().size(), 256);
    assert_eq!(t.store().peek(0), Some(Word::Value(7)));
}

#[test]
fn serialize_default() {
    assert_eq!(table().serialize(), "1001 256 18");
}

// ══════════════════════════════════════════════════════════
// 3. Persistence
// ══════════════════════════════════════════════════════════

#[test]
fn from_config_loads_resource() {
    let mut config = Config::default();
    config.memory.resource = Some("boot.txt".into());
    let loader = MemoryLoader::new().with("boot.txt", "; warm table\n0005:390ab\n");
    let t = PredictionTable::from_config(&config, &loader).unwrap();
    assert_eq!(t.store().peek(5), Some(Word::Value(0x390AB)));
}

#[test]
fn save_then_load_restores_contents() {
    let mut a = table();
    a.store_mut().write(5, Word::Value(0x390AB));
    a.store_mut().write(6, Word::Undefined);
    let mut text = Vec::new();
    a.save(&mut text).unwrap();

    let mut b = table();
    let report = b.load(text.as_slice()).unwrap();
    assert!(report.is_clean());
    assert_eq!(b.store().words(), a.store().words());
}

#[test]
fn load_forwards_labels_to_sink() {
    let mut sink = MockLabels::new();
    sink.expect_add_label().times(2).return_const(());
    let mut t = table();
    t.set_label_sink(Box::new(sink));

    let report = t
        .load("#label 0000 a\n#label 0001 b\n0000:1\n".as_bytes())
        .unwrap();
    assert_eq!(report.labels, 2);
    assert!(t.take_label_sink().is_some());
}

// ══════════════════════════════════════════════════════════
// 4. Presentation
// ══════════════════════════════════════════════════════════

#[test]
fn animation_flag() {
    let mut t = table();
    assert!(!t.enable_animation());
    t.set_enable_animation_str("True");
    assert!(t.enable_animation());
    t.set_enable_animation_str("nope");
    assert!(!t.enable_animation());
    t.set_enable_animation(true);
    assert!(t.enable_animation());
}

#[test]
fn display_shows_geometry() {
    let t = table();
    assert!(t.to_string().contains("[256x18]"));
}
