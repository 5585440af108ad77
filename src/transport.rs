//! MIDI input bridge: a bounded queue of raw SysEx packets from a transport
//! thread to the thread that owns the registry.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::Arc;

use tracing::warn;

use crate::config::EditorConfig;
use crate::param::ParamRegistry;
use crate::session::{apply_frame, LoadSummary};
use crate::sysex::StreamReassembler;

/// Sender half: clone this for each MIDI input thread.
#[derive(Debug, Clone)]
pub struct SysexSender {
    tx: mpsc::SyncSender<Vec<u8>>,
    dropped: Arc<AtomicUsize>,
}

impl SysexSender {
    /// Queue a packet without blocking. A full queue drops the packet.
    /// Returns whether it was queued.
    pub fn send(&self, packet: &[u8]) -> bool {
        match self.tx.try_send(packet.to_vec()) {
            Ok(()) => true,
            Err(mpsc::TrySendError::Full(packet)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                warn!(bytes = packet.len(), "sysex queue full, packet dropped");
                false
            }
            Err(mpsc::TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Receiver half: held by the editor, drained on its own thread.
///
/// Packets need not be whole frames; a frame split across packets is
/// completed on a later drain.
#[derive(Debug)]
pub struct SysexReceiver {
    rx: mpsc::Receiver<Vec<u8>>,
    reassembler: StreamReassembler,
    dropped: Arc<AtomicUsize>,
}

impl SysexReceiver {
    /// Apply every queued packet to `registry`.
    pub fn drain_into(&mut self, registry: &mut ParamRegistry) -> LoadSummary {
        let mut summary = LoadSummary::new();
        let discarded = self.reassembler.discarded();
        while let Ok(packet) = self.rx.try_recv() {
            self.reassembler
                .feed(&packet, |frame| apply_frame(registry, frame, &mut summary));
        }
        summary.fragments_discarded = self.reassembler.discarded() - discarded;
        summary
    }

    /// Bytes of an incomplete frame carried over to the next drain.
    pub fn pending(&self) -> usize {
        self.reassembler.pending()
    }

    /// Packets dropped by senders because the queue was full.
    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Create a queue holding up to `capacity` packets.
pub fn sysex_channel(capacity: usize, max_frame_len: usize) -> (SysexSender, SysexReceiver) {
    let (tx, rx) = mpsc::sync_channel(capacity);
    let dropped = Arc::new(AtomicUsize::new(0));
    (
        SysexSender {
            tx,
            dropped: Arc::clone(&dropped),
        },
        SysexReceiver {
            rx,
            reassembler: StreamReassembler::with_max_frame_len(max_frame_len),
            dropped,
        },
    )
}

/// Create a queue sized by the editor configuration.
pub fn sysex_channel_from(config: &EditorConfig) -> (SysexSender, SysexReceiver) {
    sysex_channel(config.queue_capacity, config.max_frame_len)
}
