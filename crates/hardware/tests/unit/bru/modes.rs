//! Mode and Timing Tests.
//!
//! Verifies RESET and quiescent handling, the access latency of both outputs,
//! and what the table asks of its host.

use crate::common::harness::{TestContext, WE_COMMIT, bus};
use crate::common::mocks::host::MockHost;
use mockall::predicate::{always, eq};
use predtab_core::bru::{Mode, PortId, PredictionTable, SignalHost};
use predtab_core::common::{Logic, LogicVector, SimTime};
use predtab_core::config::Config;
use predtab_core::memory::Word;
use rstest::rstest;

// ══════════════════════════════════════════════════════════
// 1. Mode decoding
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(Logic::Zero, Mode::Reset)]
#[case(Logic::One, Mode::Run)]
#[case(Logic::U, Mode::Quiescent)]
#[case(Logic::X, Mode::Quiescent)]
#[case(Logic::Z, Mode::Quiescent)]
#[case(Logic::L, Mode::Quiescent)]
#[case(Logic::H, Mode::Quiescent)]
fn mode_levels(#[case] level: Logic, #[case] expected: Mode) {
    assert_eq!(Mode::from_logic(level), expected);
}

// ══════════════════════════════════════════════════════════
// 2. RESET
// ══════════════════════════════════════════════════════════

#[test]
fn reset_drives_undefined_and_blocks_writes() {
    let mut tc = TestContext::new();
    tc.commit(5, 9, 0x0AB);
    assert_eq!(tc.fetch(5, 9), (Some(3), Some(0x2AC)));

    tc.bench.drive_bit(PortId::Mode, Logic::Zero);
    tc.bench.drive_value(PortId::UpdateAddr, bus(5, 9));
    tc.bench.drive_value(PortId::WriteEnable, 0b01);
    tc.step(true, true);

    assert_eq!(tc.outputs(), (None, None));
    assert_eq!(tc.word(5), Word::Value(0x390AB));
    assert_eq!(tc.table.stats().resets, 1);

    let status = tc.bench.output(PortId::PredStatus);
    assert_eq!(status.width(), 2);
    assert_eq!(tc.bench.output(PortId::PredDest).width(), 32);
}

#[test]
fn leaving_reset_resumes_lookups() {
    let mut tc = TestContext::new();
    tc.commit(5, 9, 0x0AB);
    tc.bench.drive_bit(PortId::Mode, Logic::Zero);
    tc.step(false, false);
    tc.bench.drive_bit(PortId::Mode, Logic::One);
    assert_eq!(tc.fetch(5, 9), (Some(3), Some(0x2AC)));
}

// ══════════════════════════════════════════════════════════
// 3. Quiescent
// ══════════════════════════════════════════════════════════

#[test]
fn other_mode_levels_do_nothing() {
    let mut tc = TestContext::new();
    tc.commit(5, 9, 0x0AB);
    let _ = tc.fetch(5, 9);
    let posted = tc.bench.deliveries().len();

    tc.bench.drive_bit(PortId::Mode, Logic::Z);
    tc.bench.drive_value(PortId::UpdateAddr, bus(5, 9));
    tc.bench.drive_value(PortId::WriteEnable, 0b01);
    tc.step(true, true);

    assert_eq!(tc.bench.deliveries().len(), posted);
    assert_eq!(tc.outputs(), (Some(3), Some(0x2AC)));
    assert_eq!(tc.word(5), Word::Value(0x390AB));
    assert_eq!(tc.table.stats().steps_quiescent, 1);
}

// ══════════════════════════════════════════════════════════
// 4. Timing
// ══════════════════════════════════════════════════════════

#[test]
fn elaboration_drives_undefined_at_time_zero() {
    let tc = TestContext::new();
    let log = tc.bench.deliveries();
    assert_eq!(log.len(), 2);
    assert!(log.iter().all(|d| d.time == SimTime::ZERO));
    assert_eq!(tc.outputs(), (None, None));
}

#[test]
fn outputs_appear_after_access_latency() {
    let mut tc = TestContext::new();
    tc.commit(5, 9, 0x0AB);
    tc.bench.advance_by(SimTime::from_ns(1000));

    tc.bench.drive_value(PortId::FetchAddr, bus(5, 9));
    let start = tc.bench.deliveries().len();
    let due = tc.bench.now() + SimTime::from_ns(30);
    tc.bench.evaluate(&mut tc.table);

    let posted = &tc.bench.deliveries()[start..];
    assert_eq!(posted.len(), 2);
    assert!(posted.iter().all(|d| d.time == due));

    tc.bench.advance_by(SimTime::from_ns(29));
    assert_eq!(tc.outputs(), (None, None));
    tc.bench.advance_by(SimTime::from_ns(1));
    assert_eq!(tc.outputs(), (Some(3), Some(0x2AC)));
}

#[test]
fn reset_inside_latency_window_does_not_retract_posted_outputs() {
    let mut tc = TestContext::new();
    tc.commit(5, 9, 0x0AB);
    tc.bench.drive_value(PortId::FetchAddr, bus(5, 9));
    let t = tc.bench.now();
    tc.bench.evaluate(&mut tc.table);

    tc.bench.advance_by(SimTime::from_ns(10));
    tc.bench.drive_bit(PortId::Mode, Logic::Zero);
    tc.bench.evaluate(&mut tc.table);
    assert_eq!(tc.bench.pending(), 4);

    tc.bench.advance_to(t + SimTime::from_ns(30));
    assert_eq!(tc.outputs(), (Some(3), Some(0x2AC)));

    tc.bench.advance_to(t + SimTime::from_ns(39));
    assert_eq!(tc.outputs(), (Some(3), Some(0x2AC)));

    tc.bench.advance_to(t + SimTime::from_ns(40));
    assert_eq!(tc.outputs(), (None, None));
    assert_eq!(tc.bench.pending(), 0);
    assert_eq!(tc.table.stats().resets, 1);
}

#[test]
fn same_time_deliveries_apply_in_posting_order() {
    let mut tc = TestContext::new();
    tc.commit(5, 9, 0x0AB);
    tc.bench.drive_value(PortId::FetchAddr, bus(5, 9));
    let t = tc.bench.now();
    tc.bench.evaluate(&mut tc.table);
    tc.bench.drive_bit(PortId::Mode, Logic::Zero);
    tc.bench.evaluate(&mut tc.table);

    tc.bench.advance_to(t + SimTime::from_ns(30));
    assert_eq!(tc.outputs(), (None, None));
}

#[test]
fn latency_is_configurable() {
    let mut config = Config::default();
    config.predictor.access_latency_ns = 5;
    let mut tc = TestContext::with_config(&config);
    tc.bench.drive_value(PortId::FetchAddr, bus(0, 0));
    tc.bench.evaluate(&mut tc.table);
    assert!(
        tc.bench
            .deliveries()
            .iter()
            .skip(2)
            .all(|d| d.time == SimTime::from_ns(5))
    );
}

// ══════════════════════════════════════════════════════════
// 5. Host interface
// ══════════════════════════════════════════════════════════

fn host_at(now_ns: u64, mode: Logic, fetch: LogicVector) -> MockHost {
    let mut host = MockHost::new();
    host.expect_now().return_const(SimTime::from_ns(now_ns));
    host.expect_vector().returning(move |port| match port {
        PortId::FetchAddr => fetch,
        p => LogicVector::undefined(p.width()),
    });
    host.expect_bit().returning(move |port| match port {
        PortId::Mode => mode,
        _ => Logic::Zero,
    });
    host.expect_has_rising_edge().return_const(false);
    host.expect_is_connected().return_const(true);
    host
}

#[test]
fn run_step_delivers_both_outputs_once() {
    let mut table = PredictionTable::new(&Config::default()).unwrap();
    table.store_mut().write(5, Word::Value(0x390AB));

    let mut host = host_at(100, Logic::One, LogicVector::new(12, bus(5, 9)));
    let due = SimTime::from_ns(130);
    host.expect_deliver()
        .with(eq(PortId::PredStatus), eq(LogicVector::new(2, 3)), eq(due))
        .times(1)
        .return_const(());
    host.expect_deliver()
        .with(eq(PortId::PredDest), eq(LogicVector::new(32, 0x2AC)), eq(due))
        .times(1)
        .return_const(());

    table.evaluate(&mut host);
}

#[test]
fn reset_step_delivers_undefined() {
    let mut table = PredictionTable::new(&Config::default()).unwrap();
    let mut host = host_at(0, Logic::Zero, LogicVector::new(12, 0));
    host.expect_deliver()
        .with(eq(PortId::PredStatus), eq(LogicVector::undefined(2)), eq(SimTime::from_ns(30)))
        .times(1)
        .return_const(());
    host.expect_deliver()
        .with(eq(PortId::PredDest), eq(LogicVector::undefined(32)), eq(SimTime::from_ns(30)))
        .times(1)
        .return_const(());

    table.evaluate(&mut host);
}

#[test]
fn quiescent_step_delivers_nothing() {
    let mut table = PredictionTable::new(&Config::default()).unwrap();
    let mut host = host_at(0, Logic::W, LogicVector::new(12, 0));
    host.expect_deliver().with(always(), always(), always()).never();
    table.evaluate(&mut host);
}

#[test]
fn write_without_edges_is_suppressed_with_mock_host() {
    let mut table = PredictionTable::new(&Config::default()).unwrap();
    let mut host = MockHost::new();
    host.expect_now().return_const(SimTime::ZERO);
    host.expect_vector().returning(|port| match port {
        PortId::WriteEnable => LogicVector::new(2, WE_COMMIT),
        p => LogicVector::new(p.width(), 0x59),
    });
    host.expect_bit().return_const(Logic::One);
    host.expect_has_rising_edge()
        .returning(|port| port == PortId::Clock);
    host.expect_deliver().times(2).return_const(());

    table.evaluate(&mut host);
    assert_eq!(table.stats().suppressed_writes, 1);
    assert_eq!(table.store().peek(5), Some(Word::Value(0)));
}
