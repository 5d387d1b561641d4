use mockall::mock;
use predtab_core::memory::{LabelSink, MemoryListener, Word};
use std::cell::RefCell;

mock! {
    pub Listener {}
    impl MemoryListener for Listener {
        fn on_write(&self, addr: usize, old: Word, new: Word);
        fn on_read(&self, addr: usize, value: Word);
    }
}

mock! {
    pub Labels {}
    impl LabelSink for Labels {
        fn add_label(&mut self, addr: u64, name: &str);
    }
}

/// A single observed memory event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Read(usize, Word),
    Write(usize, Word, Word),
}

/// Listener that records every notification in order.
#[derive(Debug, Default)]
pub struct RecordingListener {
    pub events: RefCell<Vec<Event>>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes(&self) -> Vec<Event> {
        self.events
            .borrow()
            .iter()
            .copied()
            .filter(|e| matches!(e, Event::Write(..)))
            .collect()
    }

    pub fn reads(&self) -> Vec<Event> {
        self.events
            .borrow()
            .iter()
            .copied()
            .filter(|e| matches!(e, Event::Read(..)))
            .collect()
    }
}

impl MemoryListener for RecordingListener {
    fn on_write(&self, addr: usize, old: Word, new: Word) {
        self.events.borrow_mut().push(Event::Write(addr, old, new));
    }

    fn on_read(&self, addr: usize, value: Word) {
        self.events.borrow_mut().push(Event::Read(addr, value));
    }
}
