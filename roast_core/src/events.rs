//! The set of recorded milestones.
//!
//! `RoastEventSet` is a small `Copy` value: detection and manual marking
//! produce a new set instead of patching one in place, so a tick either
//! sees the old set or the new one, never a half-written mix.

use crate::types::{EventKind, RoastEvent};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RoastEventSet {
    slots: [Option<RoastEvent>; 8],
}

impl RoastEventSet {
    pub const fn new() -> Self {
        Self { slots: [None; 8] }
    }

    #[inline]
    pub fn get(&self, kind: EventKind) -> Option<&RoastEvent> {
        self.slots[kind.index()].as_ref()
    }

    #[inline]
    pub fn is_set(&self, kind: EventKind) -> bool {
        self.slots[kind.index()].is_some()
    }

    /// Returns a copy with `event` recorded, replacing any previous entry of
    /// the same kind.
    #[must_use]
    pub fn with_event(mut self, event: RoastEvent) -> Self {
        self.slots[event.kind.index()] = Some(event);
        self
    }

    /// Recorded events in milestone order.
    pub fn iter(&self) -> impl Iterator<Item = &RoastEvent> {
        self.slots.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}

impl FromIterator<RoastEvent> for RoastEventSet {
    fn from_iter<I: IntoIterator<Item = RoastEvent>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |set, ev| set.with_event(ev))
    }
}
