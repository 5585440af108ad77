//! Change notifications: mpsc-based bridge from the registry to observers
//! (UI refresh, dirty tracking, MIDI echo).

use std::sync::mpsc;

use super::address::ParamAddress;
use super::group::GroupId;

/// What a reset touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetScope {
    All,
    Instance { group: GroupId, key: u16 },
    /// Every note of one drum kit.
    DrumKit(u8),
}

/// Events emitted by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamEvent {
    /// A parameter was written. Emitted on every successful set, even when
    /// the value did not change.
    Changed {
        address: ParamAddress,
        old: u32,
        new: u32,
    },
    /// A group's current key moved to another instance.
    KeyChanged { group: GroupId, old: u16, new: u16 },
    /// Parameters were restored to their defaults.
    Reset(ResetScope),
}

/// Receiver half handed out by `ParamRegistry::subscribe`.
pub struct ParamEventReceiver {
    rx: mpsc::Receiver<ParamEvent>,
}

impl ParamEventReceiver {
    /// Non-blocking poll for the next event.
    pub fn poll(&self) -> Option<ParamEvent> {
        self.rx.try_recv().ok()
    }

    /// Drain all pending events.
    pub fn drain(&self) -> Vec<ParamEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }
}

/// Fan-out list of subscribers. Subscribers whose receiver was dropped are
/// pruned on the next emit.
#[derive(Debug, Default)]
pub(crate) struct Observers {
    senders: Vec<mpsc::Sender<ParamEvent>>,
}

impl Observers {
    pub fn subscribe(&mut self) -> ParamEventReceiver {
        let (tx, rx) = mpsc::channel();
        self.senders.push(tx);
        ParamEventReceiver { rx }
    }

    pub fn emit(&mut self, event: ParamEvent) {
        self.senders.retain(|tx| tx.send(event).is_ok());
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.senders.len()
    }
}
