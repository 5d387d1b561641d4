//! Word Store Tests.
//!
//! Verifies geometry validation, write masking, the read/write shadow registers,
//! and the three fill policies.

use crate::common::mocks::listener::MockListener;
use predtab_core::common::MemoryError;
use predtab_core::memory::{FillPolicy, GeometryPolicy, Word, WordStore};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rstest::rstest;
use std::rc::Rc;

// ══════════════════════════════════════════════════════════
// 1. Geometry
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(0, 18)]
#[case(16, 0)]
#[case(16, 64)]
fn rejects_unsupported_geometry(#[case] words: usize, #[case] width: u32) {
    assert_eq!(
        WordStore::new(words, width).err(),
        Some(MemoryError::InvalidGeometry {
            word_count: words,
            bit_width: width
        })
    );
}

#[test]
fn new_store_is_zeroed() {
    let store = WordStore::new(8, 18).unwrap();
    assert_eq!(store.size(), 8);
    assert!(store.words().iter().all(|w| *w == Word::Value(0)));
    assert_eq!(store.geometry_policy(), GeometryPolicy::Fixed);
}

#[test]
fn fixed_store_refuses_resize() {
    let mut store = WordStore::new(8, 18).unwrap();
    assert_eq!(store.resize(16, 18), Err(MemoryError::FixedGeometry));
    assert_eq!(store.set_size(4), Err(MemoryError::FixedGeometry));
    assert_eq!(store.size(), 8);
}

#[test]
fn set_bit_width_to_current_is_noop_even_when_fixed() {
    let mut store = WordStore::new(8, 18).unwrap();
    store.write(3, Word::Value(7));
    assert_eq!(store.set_bit_width(18), Ok(()));
    assert_eq!(store.peek(3), Some(Word::Value(7)));
}

#[test]
fn resize_reallocates_and_zeroes() {
    let mut store = WordStore::resizable(8, 18).unwrap();
    store.fill(FillPolicy::Undefined);
    let _ = store.read(1).unwrap();
    store.resize(32, 8).unwrap();

    assert_eq!(store.size(), 32);
    assert_eq!(store.bit_width(), 8);
    assert_eq!(store.bit_mask(), 0xFF);
    assert!(store.words().iter().all(|w| *w == Word::Value(0)));
    assert_eq!(store.shadow().last_read_addr, None);
}

#[test]
fn failed_resize_leaves_store_untouched() {
    let mut store = WordStore::resizable(8, 18).unwrap();
    store.write(2, Word::Value(0x123));
    assert!(store.resize(0, 18).is_err());
    assert_eq!(store.size(), 8);
    assert_eq!(store.peek(2), Some(Word::Value(0x123)));
}

// ══════════════════════════════════════════════════════════
// 2. Access
// ══════════════════════════════════════════════════════════

#[test]
fn write_masks_to_width() {
    let mut store = WordStore::new(4, 18).unwrap();
    store.write(0, Word::Value(0xFFFF_FFFF));
    assert_eq!(store.peek(0), Some(Word::Value(0x3FFFF)));
}

#[test]
fn write_out_of_range_is_ignored() {
    let mut store = WordStore::new(4, 18).unwrap();
    store.write(4, Word::Value(1));
    assert!(store.words().iter().all(|w| *w == Word::Value(0)));
    assert_eq!(store.shadow().last_write_addr, None);
}

#[test]
fn read_out_of_range_is_an_error() {
    let mut store = WordStore::new(4, 18).unwrap();
    assert_eq!(
        store.read(9),
        Err(MemoryError::AddressOutOfRange { addr: 9, size: 4 })
    );
    assert_eq!(store.shadow().last_read_addr, None);
}

#[test]
fn shadow_registers_track_last_access() {
    let mut store = WordStore::new(4, 18).unwrap();
    store.write(2, Word::Value(0x55));
    store.write(3, Word::Undefined);
    assert_eq!(store.read(2), Ok(Word::Value(0x55)));

    let shadow = store.shadow();
    assert_eq!(shadow.last_read_addr, Some(2));
    assert_eq!(shadow.last_read_value, Word::Value(0x55));
    assert_eq!(shadow.last_write_addr, Some(3));
    assert_eq!(shadow.last_write_value, Word::Undefined);
}

#[test]
fn peek_does_not_touch_shadow() {
    let mut store = WordStore::new(4, 18).unwrap();
    store.write(1, Word::Value(9));
    assert_eq!(store.peek(1), Some(Word::Value(9)));
    assert_eq!(store.shadow().last_read_addr, None);
}

#[test]
fn fetch_for_update_records_the_read_silently() {
    let mut mock = MockListener::new();
    mock.expect_on_read().never();
    mock.expect_on_write().return_const(());

    let mut store = WordStore::new(4, 18).unwrap();
    store.write(2, Word::Value(7));
    store.add_listener(Rc::new(mock));

    assert_eq!(store.fetch_for_update(2), Some(Word::Value(7)));
    assert_eq!(store.shadow().last_read_addr, Some(2));
    assert_eq!(store.shadow().last_read_value, Word::Value(7));
    assert_eq!(store.fetch_for_update(9), None);
    assert_eq!(store.shadow().last_read_addr, Some(2));
}

#[test]
fn undefined_query() {
    let mut store = WordStore::new(4, 18).unwrap();
    store.write(1, Word::Undefined);
    assert!(store.is_undefined(1));
    assert!(!store.is_undefined(0));
    assert!(store.is_undefined(100));
}

#[test]
fn display_summary() {
    let mut store = WordStore::new(4, 18).unwrap();
    store.write(1, Word::Value(0x2a));
    assert_eq!(
        store.to_string(),
        "[4x18]\nlast read at - data= X\nlast write at 1 data= 0x2a"
    );
}

// ══════════════════════════════════════════════════════════
// 3. Fills
// ══════════════════════════════════════════════════════════

#[test]
fn fill_undefined_then_zero() {
    let mut store = WordStore::new(16, 18).unwrap();
    store.fill(FillPolicy::Undefined);
    assert!(store.words().iter().all(|w| w.is_undefined()));
    store.fill(FillPolicy::Zero);
    assert!(store.words().iter().all(|w| *w == Word::Value(0)));
}

#[test]
fn random_fill_is_masked_and_seedable() {
    let mut a = WordStore::new(64, 5).unwrap();
    let mut b = WordStore::new(64, 5).unwrap();
    a.fill_random_with(&mut StdRng::seed_from_u64(7));
    b.fill_random_with(&mut StdRng::seed_from_u64(7));

    assert_eq!(a.words(), b.words());
    assert!(
        a.words()
            .iter()
            .all(|w| w.value().is_some_and(|v| v <= 0x1F))
    );
}

#[test]
fn random_fill_defines_every_word() {
    let mut store = WordStore::new(32, 18).unwrap();
    store.fill(FillPolicy::Undefined);
    store.fill(FillPolicy::Random);
    assert!(store.words().iter().all(|w| !w.is_undefined()));
}

proptest! {
    #[test]
    fn every_stored_value_fits_the_width(width in 1u32..=63, value: u64, addr in 0usize..8) {
        let mut store = WordStore::new(8, width).unwrap();
        store.write(addr, Word::Value(value));
        let mask = (1u64 << width) - 1;
        prop_assert_eq!(store.peek(addr), Some(Word::Value(value & mask)));
    }
}
