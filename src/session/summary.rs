//! Applying decoded frames to the registry, and the tally of what happened.

use std::fmt;

use tracing::warn;

use crate::param::{ParamAddress, ParamRegistry, SetError, SetOutcome};
use crate::sysex::{self, DecodeError, Halt};

/// Individual warnings kept per load. Counters keep going past this.
const MAX_WARNINGS: usize = 64;

/// A non-fatal problem met while applying a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// The frame at `index` was rejected whole.
    Skipped { index: usize, error: DecodeError },
    /// A bulk dump stopped walking before the end of its payload.
    PartialDump { index: usize, halt: Halt },
    /// A decoded value was clamped into range.
    Clamped {
        index: usize,
        address: ParamAddress,
        requested: u32,
        stored: u32,
    },
    /// The registry refused a decoded write.
    Rejected { index: usize, error: SetError },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadWarning::Skipped { index, error } => write!(f, "frame {index} skipped: {error}"),
            LoadWarning::PartialDump { index, halt } => {
                write!(f, "frame {index}: bulk dump stopped: {halt}")
            }
            LoadWarning::Clamped {
                index,
                address,
                requested,
                stored,
            } => write!(
                f,
                "frame {index}: {address} value {requested} clamped to {stored}"
            ),
            LoadWarning::Rejected { index, error } => write!(f, "frame {index}: {error}"),
        }
    }
}

/// Outcome of applying a stream of frames.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Complete frames seen.
    pub frames: usize,
    /// Parameter writes accepted (including clamped ones and triggers).
    pub params_loaded: usize,
    /// Frames rejected by decoding.
    pub frames_skipped: usize,
    /// Bulk dumps that stopped before the end of their payload.
    pub partial_dumps: usize,
    /// Unknown addresses met, in parameter changes or bulk walks.
    pub unknown_addresses: usize,
    pub clamped: usize,
    /// Writes refused by the registry.
    pub rejected: usize,
    /// Oversized frames and the unterminated tail dropped by reassembly.
    pub fragments_discarded: usize,
    pub warnings: Vec<LoadWarning>,
}

impl LoadSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether every frame applied in full.
    pub fn is_clean(&self) -> bool {
        self.frames_skipped == 0
            && self.partial_dumps == 0
            && self.clamped == 0
            && self.rejected == 0
            && self.fragments_discarded == 0
    }

    fn warn(&mut self, warning: LoadWarning) {
        // The registry already logs its own clamps.
        if !matches!(warning, LoadWarning::Clamped { .. }) {
            warn!("{warning}");
        }
        if self.warnings.len() < MAX_WARNINGS {
            self.warnings.push(warning);
        }
    }
}

impl fmt::Display for LoadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} parameters loaded, {} frames skipped",
            self.params_loaded, self.frames_skipped
        )
    }
}

/// Decode one complete frame and apply its writes, recording the outcome.
pub fn apply_frame(registry: &mut ParamRegistry, frame: &[u8], summary: &mut LoadSummary) {
    let index = summary.frames;
    summary.frames += 1;

    let decoded = match sysex::decode(frame, registry) {
        Ok(decoded) => decoded,
        Err(error) => {
            if matches!(error, DecodeError::UnknownAddress(_)) {
                summary.unknown_addresses += 1;
            }
            summary.frames_skipped += 1;
            summary.warn(LoadWarning::Skipped { index, error });
            return;
        }
    };

    for update in &decoded.updates {
        match registry.apply(update.address, update.data) {
            Ok(SetOutcome::Clamped { requested, stored }) => {
                summary.params_loaded += 1;
                summary.clamped += 1;
                summary.warn(LoadWarning::Clamped {
                    index,
                    address: update.address,
                    requested,
                    stored,
                });
            }
            Ok(_) => summary.params_loaded += 1,
            Err(error) => {
                summary.rejected += 1;
                summary.warn(LoadWarning::Rejected { index, error });
            }
        }
    }

    if let Some(halt) = decoded.halt {
        summary.partial_dumps += 1;
        if matches!(halt, Halt::UnknownAddress(_)) {
            summary.unknown_addresses += 1;
        }
        summary.warn(LoadWarning::PartialDump { index, halt });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::RangePolicy;

    #[test]
    fn parameter_change_applies() {
        let mut registry = ParamRegistry::new();
        let mut summary = LoadSummary::new();
        apply_frame(
            &mut registry,
            &[0xF0, 0x43, 0x10, 0x4C, 0x00, 0x00, 0x04, 0x22, 0xF7],
            &mut summary,
        );
        assert_eq!(summary.params_loaded, 1);
        assert!(summary.is_clean());
        assert_eq!(
            registry.find(ParamAddress::new(0, 0, 4)).unwrap().value(),
            0x22
        );
    }

    #[test]
    fn bad_frame_is_counted_not_fatal() {
        let mut registry = ParamRegistry::new();
        let mut summary = LoadSummary::new();
        apply_frame(&mut registry, &[0xF0, 0x41, 0x10, 0xF7], &mut summary);
        apply_frame(
            &mut registry,
            &[0xF0, 0x43, 0x10, 0x4C, 0x00, 0x00, 0x04, 0x22, 0xF7],
            &mut summary,
        );
        assert_eq!(summary.frames, 2);
        assert_eq!(summary.frames_skipped, 1);
        assert_eq!(summary.params_loaded, 1);
        assert_eq!(
            summary.warnings,
            vec![LoadWarning::Skipped {
                index: 0,
                error: DecodeError::UnrecognizedManufacturer(0x41)
            }]
        );
        assert_eq!(summary.to_string(), "1 parameters loaded, 1 frames skipped");
    }

    #[test]
    fn unknown_parameter_change_is_skipped() {
        let mut registry = ParamRegistry::new();
        let mut summary = LoadSummary::new();
        apply_frame(
            &mut registry,
            &[0xF0, 0x43, 0x10, 0x4C, 0x00, 0x00, 0x03, 0x22, 0xF7],
            &mut summary,
        );
        assert_eq!(summary.unknown_addresses, 1);
        assert_eq!(summary.frames_skipped, 1);
    }

    #[test]
    fn clamped_value_counts_as_loaded() {
        let mut registry = ParamRegistry::new();
        let mut summary = LoadSummary::new();
        apply_frame(
            &mut registry,
            &[0xF0, 0x43, 0x10, 0x4C, 0x00, 0x00, 0x06, 0x7F, 0xF7],
            &mut summary,
        );
        assert_eq!(summary.params_loaded, 1);
        assert_eq!(summary.clamped, 1);
        assert!(!summary.is_clean());
    }

    #[test]
    fn rejected_value_under_reject_policy() {
        let mut registry = ParamRegistry::with_policy(RangePolicy::Reject);
        let mut summary = LoadSummary::new();
        apply_frame(
            &mut registry,
            &[0xF0, 0x43, 0x10, 0x4C, 0x00, 0x00, 0x06, 0x7F, 0xF7],
            &mut summary,
        );
        assert_eq!(summary.params_loaded, 0);
        assert_eq!(summary.rejected, 1);
    }

    #[test]
    fn bulk_dump_overflow_is_partial_not_unknown() {
        let mut registry = ParamRegistry::new();
        let mut summary = LoadSummary::new();
        // Three zero bytes from 00 00 7E; checksum of 00 03 00 00 7E 00 00 00.
        let frame = [
            0xF0, 0x43, 0x00, 0x4C, 0x00, 0x03, 0x00, 0x00, 0x7E, 0x00, 0x00, 0x00, 0x7F, 0xF7,
        ];
        apply_frame(&mut registry, &frame, &mut summary);
        assert_eq!(summary.params_loaded, 2);
        assert_eq!(summary.partial_dumps, 1);
        assert_eq!(summary.unknown_addresses, 0);
        assert_eq!(
            summary.warnings,
            vec![LoadWarning::PartialDump {
                index: 0,
                halt: Halt::AddressOverflow {
                    base: ParamAddress::new(0x00, 0x00, 0x7E),
                    offset: 2
                }
            }]
        );
    }

    #[test]
    fn warnings_are_capped() {
        let mut registry = ParamRegistry::new();
        let mut summary = LoadSummary::new();
        for _ in 0..MAX_WARNINGS + 10 {
            apply_frame(&mut registry, &[0xF7], &mut summary);
        }
        assert_eq!(summary.frames_skipped, MAX_WARNINGS + 10);
        assert_eq!(summary.warnings.len(), MAX_WARNINGS);
    }
}
