//! Yamaha XG System Exclusive protocol: frame codec and stream reassembly.
//!
//! Two XG message forms are understood:
//!
//! - Parameter Change (`F0 43 1n 4C hh mm ll data.. F7`), one parameter per
//!   frame, no checksum.
//! - Bulk Dump (`F0 43 0n 4C ss ss hh mm ll data.. cs F7`), a checksummed run
//!   of consecutive parameters.
//!
//! Decoding accepts both. Encoding only ever produces Parameter Change
//! frames, so a session saved from a bulk-dump capture comes back as
//! individual parameter changes.

pub mod codec;
pub mod error;
pub mod reassembler;

pub use codec::{
    checksum, checksum_byte, decode, encode, encode_into, encode_params, parse_frame, Decoded,
    Halt, ParamUpdate,
};
pub use error::DecodeError;
pub use reassembler::StreamReassembler;

use crate::param::ParamAddress;

pub const SYSEX_START: u8 = 0xF0;
pub const SYSEX_END: u8 = 0xF7;

pub const MF_ID_YAMAHA: u8 = 0x43;
pub const MODEL_ID_XG: u8 = 0x4C;

/// Device number the editor transmits on. Received device numbers are
/// ignored.
pub const DEVICE_NUMBER: u8 = 0x00;

/// Mode nibble of the device byte (bits 4-6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SysexMode {
    BulkDump,
    ParameterChange,
}

impl SysexMode {
    pub fn from_device_byte(byte: u8) -> Result<Self, DecodeError> {
        match byte & 0x70 {
            0x00 => Ok(SysexMode::BulkDump),
            0x10 => Ok(SysexMode::ParameterChange),
            other => Err(DecodeError::UnsupportedMode(other)),
        }
    }

    pub fn bits(self) -> u8 {
        match self {
            SysexMode::BulkDump => 0x00,
            SysexMode::ParameterChange => 0x10,
        }
    }
}

/// One parsed XG frame, borrowing its data from the input buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SysexFrame<'a> {
    pub manufacturer_id: u8,
    /// Model ID, always [`MODEL_ID_XG`] for a successfully parsed frame.
    pub device_class: u8,
    pub mode: SysexMode,
    /// Device number bits of the device byte.
    pub device: u8,
    /// Target address (Parameter Change) or base address (Bulk Dump).
    pub address: ParamAddress,
    /// Value bytes (Parameter Change) or payload without checksum
    /// (Bulk Dump).
    pub data: &'a [u8],
}
