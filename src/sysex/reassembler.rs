//! Stream reassembly: turns arbitrarily chunked bytes into complete frames.
//!
//! Frame boundaries are found by the `F7` terminator alone. Leading garbage
//! is not skipped by scanning for `F0`; it stays glued to the next frame and
//! decoding rejects the result. Existing capture files rely on this
//! tolerance.

use tracing::warn;

use super::SYSEX_END;

/// Largest frame accepted by default: a bulk dump with a full 14-bit payload
/// plus its header, address, checksum and bookends.
pub const DEFAULT_MAX_FRAME_LEN: usize = 0x3FFF + 11;

const INITIAL_CAPACITY: usize = 1024;

/// Incremental frame splitter.
#[derive(Debug, Clone)]
pub struct StreamReassembler {
    buf: Vec<u8>,
    max_frame_len: usize,
    /// The pending frame outgrew `max_frame_len` and was dropped; skip up to
    /// its terminator.
    overflowed: bool,
    frames: usize,
    discarded: usize,
}

impl StreamReassembler {
    pub fn new() -> Self {
        Self::with_max_frame_len(DEFAULT_MAX_FRAME_LEN)
    }

    pub fn with_max_frame_len(max_frame_len: usize) -> Self {
        Self {
            buf: Vec::with_capacity(INITIAL_CAPACITY),
            max_frame_len,
            overflowed: false,
            frames: 0,
            discarded: 0,
        }
    }

    /// Consume a chunk, handing each completed frame (terminator included)
    /// to `on_frame`. Bytes after the last terminator are kept for the next
    /// call.
    pub fn feed<F>(&mut self, chunk: &[u8], mut on_frame: F)
    where
        F: FnMut(&[u8]),
    {
        let mut rest = chunk;
        while let Some(pos) = rest.iter().position(|&byte| byte == SYSEX_END) {
            let (head, tail) = rest.split_at(pos + 1);
            rest = tail;

            let len = self.buf.len() + head.len();
            if self.overflowed || len > self.max_frame_len {
                warn!(max = self.max_frame_len, "oversized frame discarded");
                self.overflowed = false;
                self.buf.clear();
                self.discarded += 1;
                continue;
            }

            self.frames += 1;
            if self.buf.is_empty() {
                on_frame(head);
            } else {
                self.buf.extend_from_slice(head);
                on_frame(&self.buf);
                self.buf.clear();
            }
        }

        if rest.is_empty() || self.overflowed {
            return;
        }
        if self.buf.len() + rest.len() > self.max_frame_len {
            self.buf.clear();
            self.overflowed = true;
        } else {
            self.buf.extend_from_slice(rest);
        }
    }

    /// End of stream: drop any unterminated fragment. Returns the number of
    /// bytes discarded.
    pub fn flush(&mut self) -> usize {
        if !self.overflowed && self.buf.is_empty() {
            return 0;
        }
        let dropped = self.buf.len();
        warn!(bytes = dropped, "unterminated trailing fragment discarded");
        self.buf.clear();
        self.overflowed = false;
        self.discarded += 1;
        dropped
    }

    /// Bytes waiting for a terminator.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Frames handed out so far.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Oversized frames and trailing fragments dropped so far.
    pub fn discarded(&self) -> usize {
        self.discarded
    }
}

impl Default for StreamReassembler {
    fn default() -> Self {
        Self::new()
    }
}
