//! Frame-level decode errors.

use std::fmt;

use crate::param::ParamAddress;

/// Why a single frame could not be decoded. None of these are fatal to a
/// stream: the caller skips the frame and carries on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Missing `F0`/`F7` bookends, or too short for its own header or
    /// declared payload.
    MalformedFrame { reason: &'static str },
    UnrecognizedManufacturer(u8),
    UnrecognizedModel(u8),
    UnsupportedMode(u8),
    ChecksumMismatch { expected: u8, found: u8 },
    /// A well-formed Parameter Change for an address the registry does not
    /// define.
    UnknownAddress(ParamAddress),
}

impl DecodeError {
    pub(crate) fn malformed(reason: &'static str) -> Self {
        DecodeError::MalformedFrame { reason }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::MalformedFrame { reason } => write!(f, "malformed frame: {reason}"),
            DecodeError::UnrecognizedManufacturer(id) => {
                write!(f, "unrecognized manufacturer {id:02X}h")
            }
            DecodeError::UnrecognizedModel(id) => write!(f, "unrecognized model {id:02X}h"),
            DecodeError::UnsupportedMode(mode) => write!(f, "unsupported mode {mode:02X}h"),
            DecodeError::ChecksumMismatch { expected, found } => write!(
                f,
                "checksum mismatch: expected {expected:02X}h, found {found:02X}h"
            ),
            DecodeError::UnknownAddress(address) => write!(f, "unknown address {address}"),
        }
    }
}

impl std::error::Error for DecodeError {}
