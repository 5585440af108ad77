//! Error types for registry writes.

use std::fmt;

use super::address::ParamAddress;
use super::group::GroupId;

/// Why a registry write was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetError {
    /// No parameter is defined at this address.
    UnknownAddress(ParamAddress),
    /// Fewer data bytes than the parameter's declared size.
    Truncated {
        address: ParamAddress,
        expected: u8,
        got: usize,
    },
    /// Value outside the parameter's range, under the reject policy.
    OutOfRange {
        address: ParamAddress,
        requested: u32,
        min: u32,
        max: u32,
    },
    /// Not a valid instance key for the group.
    InvalidKey { group: GroupId, key: u16 },
}

impl fmt::Display for SetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetError::UnknownAddress(address) => write!(f, "unknown parameter address {address}"),
            SetError::Truncated {
                address,
                expected,
                got,
            } => write!(
                f,
                "parameter {address} needs {expected} data bytes, got {got}"
            ),
            SetError::OutOfRange {
                address,
                requested,
                min,
                max,
            } => write!(
                f,
                "value {requested} out of range {min}..={max} for parameter {address}"
            ),
            SetError::InvalidKey { group, key } => write!(f, "invalid {group} key {key}"),
        }
    }
}

impl std::error::Error for SetError {}
