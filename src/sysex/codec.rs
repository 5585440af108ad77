//! Stateless XG frame decoding and encoding.

use std::fmt;

use tracing::debug;

use super::error::DecodeError;
use super::{
    SysexFrame, SysexMode, DEVICE_NUMBER, MF_ID_YAMAHA, MODEL_ID_XG, SYSEX_END, SYSEX_START,
};
use crate::param::registry::encode_value;
use crate::param::{Param, ParamAddress, ParamSizes};

/// One parameter write extracted from a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamUpdate<'a> {
    pub address: ParamAddress,
    pub data: &'a [u8],
}

/// Why a bulk-dump walk stopped before the end of its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Halt {
    /// No parameter is defined at this address.
    UnknownAddress(ParamAddress),
    /// The parameter here is wider than the bytes left in the payload.
    SplitParameter(ParamAddress),
    /// `offset` payload bytes from `base` runs past low byte `7F`.
    AddressOverflow { base: ParamAddress, offset: usize },
}

impl fmt::Display for Halt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Halt::UnknownAddress(address) => write!(f, "unknown address {address}"),
            Halt::SplitParameter(address) => write!(f, "{address} cut short by end of payload"),
            Halt::AddressOverflow { base, offset } => {
                write!(f, "offset {offset} from {base} past the address block")
            }
        }
    }
}

/// Result of decoding one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded<'a> {
    pub mode: SysexMode,
    pub updates: Vec<ParamUpdate<'a>>,
    /// Set when a bulk-dump walk stopped early.
    pub halt: Option<Halt>,
}

impl Decoded<'_> {
    /// Whether every byte of the frame's payload was consumed.
    pub fn is_complete(&self) -> bool {
        self.halt.is_none()
    }
}

/// Running 7-bit sum.
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |sum, &byte| sum.wrapping_add(byte) & 0x7F)
}

/// The byte that brings `checksum(bytes)` to zero modulo 128.
pub fn checksum_byte(bytes: &[u8]) -> u8 {
    0x80u8.wrapping_sub(checksum(bytes)) & 0x7F
}

/// Validate the header of a complete frame and split out its address and
/// data. Bulk-dump checksums are verified here.
pub fn parse_frame(buf: &[u8]) -> Result<SysexFrame<'_>, DecodeError> {
    let &[SYSEX_START, ref body @ ..] = buf else {
        return Err(DecodeError::malformed("missing F0 start byte"));
    };
    let &[ref body @ .., SYSEX_END] = body else {
        return Err(DecodeError::malformed("missing F7 terminator"));
    };
    let &[manufacturer_id, ref body @ ..] = body else {
        return Err(DecodeError::malformed("empty frame"));
    };
    if manufacturer_id != MF_ID_YAMAHA {
        return Err(DecodeError::UnrecognizedManufacturer(manufacturer_id));
    }
    let &[device_byte, model_id, ref body @ ..] = body else {
        return Err(DecodeError::malformed("header truncated"));
    };
    if model_id != MODEL_ID_XG {
        return Err(DecodeError::UnrecognizedModel(model_id));
    }
    let mode = SysexMode::from_device_byte(device_byte)?;

    let (address, data) = match mode {
        SysexMode::ParameterChange => {
            let &[high, mid, low, ref data @ ..] = body else {
                return Err(DecodeError::malformed("parameter change address truncated"));
            };
            (ParamAddress::new(high, mid, low), data)
        }
        SysexMode::BulkDump => {
            let &[size_msb, size_lsb, high, mid, low, ref rest @ ..] = body else {
                return Err(DecodeError::malformed("bulk dump header truncated"));
            };
            let size = ((size_msb as usize) << 7) | size_lsb as usize;
            // Payload plus the checksum byte.
            if rest.len() < size + 1 {
                return Err(DecodeError::malformed("bulk dump shorter than declared size"));
            }
            let summed = &body[..5 + size];
            let found = rest[size];
            let expected = checksum_byte(summed);
            if found != expected {
                return Err(DecodeError::ChecksumMismatch { expected, found });
            }
            (ParamAddress::new(high, mid, low), &rest[..size])
        }
    };

    Ok(SysexFrame {
        manufacturer_id,
        device_class: model_id,
        mode,
        device: device_byte & 0x0F,
        address,
        data,
    })
}

/// Decode one complete frame into parameter writes.
///
/// Parameter widths come from `sizes`. A bulk dump is walked assuming its
/// parameters are contiguous and in ascending offset order, each consuming
/// its declared width; the walk stops at the first address `sizes` does not
/// know.
pub fn decode<'a, S>(buf: &'a [u8], sizes: &S) -> Result<Decoded<'a>, DecodeError>
where
    S: ParamSizes + ?Sized,
{
    let frame = parse_frame(buf)?;
    let decoded = match frame.mode {
        SysexMode::ParameterChange => {
            let size = sizes
                .param_size(frame.address)
                .ok_or(DecodeError::UnknownAddress(frame.address))?;
            let data = frame
                .data
                .get(..size as usize)
                .ok_or(DecodeError::malformed("parameter data shorter than declared size"))?;
            Decoded {
                mode: frame.mode,
                updates: vec![ParamUpdate {
                    address: frame.address,
                    data,
                }],
                halt: None,
            }
        }
        SysexMode::BulkDump => walk_bulk(frame.address, frame.data, sizes),
    };
    debug!(
        mode = ?decoded.mode,
        address = %frame.address,
        updates = decoded.updates.len(),
        complete = decoded.is_complete(),
        "frame decoded"
    );
    Ok(decoded)
}

fn walk_bulk<'a, S>(base: ParamAddress, payload: &'a [u8], sizes: &S) -> Decoded<'a>
where
    S: ParamSizes + ?Sized,
{
    let mut updates = Vec::new();
    let mut offset = 0;
    while offset < payload.len() {
        let Some(address) = base.offset(offset) else {
            return Decoded::bulk(updates, Some(Halt::AddressOverflow { base, offset }));
        };
        let Some(size) = sizes.param_size(address) else {
            return Decoded::bulk(updates, Some(Halt::UnknownAddress(address)));
        };
        let Some(data) = payload.get(offset..offset + size as usize) else {
            return Decoded::bulk(updates, Some(Halt::SplitParameter(address)));
        };
        updates.push(ParamUpdate { address, data });
        offset += size as usize;
    }
    Decoded::bulk(updates, None)
}

impl<'a> Decoded<'a> {
    fn bulk(updates: Vec<ParamUpdate<'a>>, halt: Option<Halt>) -> Self {
        Self {
            mode: SysexMode::BulkDump,
            updates,
            halt,
        }
    }
}

/// Append a Parameter Change frame for `param` to `out`.
pub fn encode_into(param: &Param, out: &mut Vec<u8>) {
    let address = param.address();
    out.extend_from_slice(&[
        SYSEX_START,
        MF_ID_YAMAHA,
        SysexMode::ParameterChange.bits() | DEVICE_NUMBER,
        MODEL_ID_XG,
        address.high,
        address.mid,
        address.low,
    ]);
    encode_value(param.value(), param.size(), out);
    out.push(SYSEX_END);
}

/// A Parameter Change frame for `param`.
pub fn encode(param: &Param) -> Vec<u8> {
    let mut out = Vec::with_capacity(8 + param.size() as usize);
    encode_into(param, &mut out);
    out
}

/// Concatenated Parameter Change frames, in iteration order.
pub fn encode_params<'p, I>(params: I) -> Vec<u8>
where
    I: IntoIterator<Item = &'p Param>,
{
    let mut out = Vec::new();
    for param in params {
        encode_into(param, &mut out);
    }
    out
}
