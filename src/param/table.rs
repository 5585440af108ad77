//! Static XG parameter map.
//!
//! One table per parameter group, listing every parameter by its low-byte
//! offset within the group's address block. Values and ranges are in raw
//! data units (what travels on the wire), not display units.

/// A system-level action triggered by writing to a parameter, rather than a
/// stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// `00 00 7E`: XG System On, resets every parameter.
    XgSystemOn,
    /// `00 00 7F`: All Parameter Reset.
    AllParamReset,
    /// `00 00 7D`: Drum Setup Reset, the value selects the kit.
    DrumSetupReset,
}

/// One row of a parameter table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamDef {
    /// Low-byte offset within the group's address block.
    pub low: u8,
    /// Number of 7-bit data bytes (1 or 2).
    pub size: u8,
    pub min: u16,
    pub max: u16,
    pub default: u16,
    pub name: &'static str,
    pub trigger: Option<Trigger>,
}

const fn p(low: u8, size: u8, min: u16, max: u16, default: u16, name: &'static str) -> ParamDef {
    ParamDef {
        low,
        size,
        min,
        max,
        default,
        name,
        trigger: None,
    }
}

/// Single-byte parameter with the full 0-127 range.
const fn b(low: u8, default: u16, name: &'static str) -> ParamDef {
    p(low, 1, 0, 127, default, name)
}

/// Single-byte parameter centered on 64 with the -24..+24 range (40-88).
const fn c(low: u8, name: &'static str) -> ParamDef {
    p(low, 1, 0x28, 0x58, 0x40, name)
}

/// On/off switch.
const fn sw(low: u8, default: u16, name: &'static str) -> ParamDef {
    p(low, 1, 0, 1, default, name)
}

/// Two-byte effect type: MSB type, LSB sub-type.
const fn ty(low: u8, msb: u16, name: &'static str) -> ParamDef {
    p(low, 2, 0, 0x3FFF, msb << 7, name)
}

const fn t(low: u8, max: u16, trigger: Trigger, name: &'static str) -> ParamDef {
    ParamDef {
        low,
        size: 1,
        min: 0,
        max,
        default: 0,
        name,
        trigger: Some(trigger),
    }
}

pub static SYSTEM: &[ParamDef] = &[
    b(0x00, 0x40, "Master Tune"),
    b(0x04, 0x7F, "Master Volume"),
    b(0x05, 0x00, "Master Attenuator"),
    c(0x06, "Master Transpose"),
    t(0x7D, 1, Trigger::DrumSetupReset, "Drum Setup Reset"),
    t(0x7E, 0, Trigger::XgSystemOn, "XG System On"),
    t(0x7F, 0, Trigger::AllParamReset, "All Parameter Reset"),
];

pub static REVERB: &[ParamDef] = &[
    ty(0x00, 0x01, "Reverb Type"),
    b(0x02, 18, "Reverb Param 1"),
    b(0x03, 10, "Reverb Param 2"),
    b(0x04, 8, "Reverb Param 3"),
    b(0x05, 13, "Reverb Param 4"),
    b(0x06, 49, "Reverb Param 5"),
    b(0x07, 0, "Reverb Param 6"),
    b(0x08, 0, "Reverb Param 7"),
    b(0x09, 0, "Reverb Param 8"),
    b(0x0A, 0, "Reverb Param 9"),
    b(0x0B, 0, "Reverb Param 10"),
    b(0x0C, 0x40, "Reverb Return"),
    b(0x0D, 0x40, "Reverb Pan"),
    b(0x10, 40, "Reverb Param 11"),
    b(0x11, 0, "Reverb Param 12"),
    b(0x12, 3, "Reverb Param 13"),
    b(0x13, 0, "Reverb Param 14"),
    b(0x14, 0, "Reverb Param 15"),
    b(0x15, 0, "Reverb Param 16"),
];

pub static CHORUS: &[ParamDef] = &[
    ty(0x20, 0x41, "Chorus Type"),
    b(0x22, 6, "Chorus Param 1"),
    b(0x23, 54, "Chorus Param 2"),
    b(0x24, 77, "Chorus Param 3"),
    b(0x25, 106, "Chorus Param 4"),
    b(0x26, 0, "Chorus Param 5"),
    b(0x27, 28, "Chorus Param 6"),
    b(0x28, 64, "Chorus Param 7"),
    b(0x29, 46, "Chorus Param 8"),
    b(0x2A, 64, "Chorus Param 9"),
    b(0x2B, 0, "Chorus Param 10"),
    b(0x2C, 0x40, "Chorus Return"),
    b(0x2D, 0x40, "Chorus Pan"),
    b(0x2E, 0x00, "Chorus Send To Reverb"),
    b(0x30, 64, "Chorus Param 11"),
    b(0x31, 0, "Chorus Param 12"),
    b(0x32, 0, "Chorus Param 13"),
    b(0x33, 0, "Chorus Param 14"),
    b(0x34, 0, "Chorus Param 15"),
    b(0x35, 0, "Chorus Param 16"),
];

pub static VARIATION: &[ParamDef] = &[
    ty(0x40, 0x05, "Variation Type"),
    p(0x42, 2, 0, 0x3FFF, 3000, "Variation Param 1"),
    p(0x44, 2, 0, 0x3FFF, 2500, "Variation Param 2"),
    p(0x46, 2, 0, 0x3FFF, 3500, "Variation Param 3"),
    p(0x48, 2, 0, 0x3FFF, 3250, "Variation Param 4"),
    p(0x4A, 2, 0, 0x3FFF, 74, "Variation Param 5"),
    p(0x4C, 2, 0, 0x3FFF, 100, "Variation Param 6"),
    p(0x4E, 2, 0, 0x3FFF, 28, "Variation Param 7"),
    p(0x50, 2, 0, 0x3FFF, 64, "Variation Param 8"),
    p(0x52, 2, 0, 0x3FFF, 46, "Variation Param 9"),
    p(0x54, 2, 0, 0x3FFF, 64, "Variation Param 10"),
    b(0x56, 0x40, "Variation Return"),
    b(0x57, 0x40, "Variation Pan"),
    b(0x58, 0x00, "Variation Send To Reverb"),
    b(0x59, 0x00, "Variation Send To Chorus"),
    sw(0x5A, 0, "Variation Connection"),
    b(0x5B, 0x7F, "Variation Part"),
    b(0x5C, 0x40, "Variation MW Depth"),
    b(0x5D, 0x40, "Variation Bend Depth"),
    b(0x5E, 0x40, "Variation CAT Depth"),
    b(0x5F, 0x40, "Variation AC1 Depth"),
    b(0x60, 0x40, "Variation AC2 Depth"),
    b(0x70, 0, "Variation Param 11"),
    b(0x71, 0, "Variation Param 12"),
    b(0x72, 0, "Variation Param 13"),
    b(0x73, 0, "Variation Param 14"),
    b(0x74, 0, "Variation Param 15"),
    b(0x75, 0, "Variation Param 16"),
];

pub const PART_COUNT: u8 = 16;

/// Part that defaults to drum mode (part 10 on the front panel).
pub const DRUM_PART: u8 = 9;

pub const MULTIPART_BANK_MSB: u8 = 0x01;
pub const MULTIPART_RCV_CHANNEL: u8 = 0x04;
pub const MULTIPART_PART_MODE: u8 = 0x07;

pub static MULTIPART: &[ParamDef] = &[
    p(0x00, 1, 0, 32, 2, "Element Reserve"),
    b(0x01, 0, "Bank Select MSB"),
    b(0x02, 0, "Bank Select LSB"),
    b(0x03, 0, "Program Number"),
    p(0x04, 1, 0, 16, 0, "Rcv Channel"),
    sw(0x05, 1, "Mono/Poly Mode"),
    p(0x06, 1, 0, 2, 1, "Same Note Key Assign"),
    p(0x07, 1, 0, 5, 0, "Part Mode"),
    c(0x08, "Note Shift"),
    p(0x09, 2, 0, 255, 128, "Detune"),
    b(0x0B, 100, "Volume"),
    b(0x0C, 0x40, "Velocity Sense Depth"),
    b(0x0D, 0x40, "Velocity Sense Offset"),
    b(0x0E, 0x40, "Pan"),
    b(0x0F, 0x00, "Note Limit Low"),
    b(0x10, 0x7F, "Note Limit High"),
    b(0x11, 0x7F, "Dry Level"),
    b(0x12, 0x00, "Chorus Send"),
    b(0x13, 0x28, "Reverb Send"),
    b(0x14, 0x00, "Variation Send"),
    b(0x15, 0x40, "Vibrato Rate"),
    b(0x16, 0x40, "Vibrato Depth"),
    b(0x17, 0x40, "Vibrato Delay"),
    b(0x18, 0x40, "Filter Cutoff"),
    b(0x19, 0x40, "Filter Resonance"),
    b(0x1A, 0x40, "EG Attack"),
    b(0x1B, 0x40, "EG Decay"),
    b(0x1C, 0x40, "EG Release"),
    c(0x1D, "MW Pitch Control"),
    b(0x1E, 0x40, "MW Filter Control"),
    b(0x1F, 0x40, "MW Amplitude Control"),
    b(0x20, 0x0A, "MW LFO PMod Depth"),
    b(0x21, 0x00, "MW LFO FMod Depth"),
    b(0x22, 0x00, "MW LFO AMod Depth"),
    p(0x23, 1, 0x28, 0x58, 0x42, "Bend Pitch Control"),
    b(0x24, 0x40, "Bend Filter Control"),
    b(0x25, 0x40, "Bend Amplitude Control"),
    b(0x26, 0x00, "Bend LFO PMod Depth"),
    b(0x27, 0x00, "Bend LFO FMod Depth"),
    b(0x28, 0x00, "Bend LFO AMod Depth"),
    sw(0x30, 1, "Rcv Pitch Bend"),
    sw(0x31, 1, "Rcv Channel After Touch"),
    sw(0x32, 1, "Rcv Program Change"),
    sw(0x33, 1, "Rcv Control Change"),
    sw(0x34, 1, "Rcv Poly After Touch"),
    sw(0x35, 1, "Rcv Note Message"),
    sw(0x36, 1, "Rcv RPN"),
    sw(0x37, 1, "Rcv NRPN"),
    sw(0x38, 1, "Rcv Modulation"),
    sw(0x39, 1, "Rcv Volume"),
    sw(0x3A, 1, "Rcv Pan"),
    sw(0x3B, 1, "Rcv Expression"),
    sw(0x3C, 1, "Rcv Hold1"),
    sw(0x3D, 1, "Rcv Portamento"),
    sw(0x3E, 1, "Rcv Sostenuto"),
    sw(0x3F, 1, "Rcv Soft Pedal"),
    sw(0x40, 1, "Rcv Bank Select"),
    b(0x41, 0x40, "Scale Tuning C"),
    b(0x42, 0x40, "Scale Tuning C#"),
    b(0x43, 0x40, "Scale Tuning D"),
    b(0x44, 0x40, "Scale Tuning D#"),
    b(0x45, 0x40, "Scale Tuning E"),
    b(0x46, 0x40, "Scale Tuning F"),
    b(0x47, 0x40, "Scale Tuning F#"),
    b(0x48, 0x40, "Scale Tuning G"),
    b(0x49, 0x40, "Scale Tuning G#"),
    b(0x4A, 0x40, "Scale Tuning A"),
    b(0x4B, 0x40, "Scale Tuning A#"),
    b(0x4C, 0x40, "Scale Tuning B"),
    c(0x4D, "CAT Pitch Control"),
    b(0x4E, 0x40, "CAT Filter Control"),
    b(0x4F, 0x40, "CAT Amplitude Control"),
    b(0x50, 0x00, "CAT LFO PMod Depth"),
    b(0x51, 0x00, "CAT LFO FMod Depth"),
    b(0x52, 0x00, "CAT LFO AMod Depth"),
    c(0x53, "PAT Pitch Control"),
    b(0x54, 0x40, "PAT Filter Control"),
    b(0x55, 0x40, "PAT Amplitude Control"),
    b(0x56, 0x00, "PAT LFO PMod Depth"),
    b(0x57, 0x00, "PAT LFO FMod Depth"),
    b(0x58, 0x00, "PAT LFO AMod Depth"),
    p(0x59, 1, 0, 95, 0x10, "AC1 Controller Number"),
    c(0x5A, "AC1 Pitch Control"),
    b(0x5B, 0x40, "AC1 Filter Control"),
    b(0x5C, 0x40, "AC1 Amplitude Control"),
    b(0x5D, 0x00, "AC1 LFO PMod Depth"),
    b(0x5E, 0x00, "AC1 LFO FMod Depth"),
    b(0x5F, 0x00, "AC1 LFO AMod Depth"),
    p(0x60, 1, 0, 95, 0x11, "AC2 Controller Number"),
    c(0x61, "AC2 Pitch Control"),
    b(0x62, 0x40, "AC2 Filter Control"),
    b(0x63, 0x40, "AC2 Amplitude Control"),
    b(0x64, 0x00, "AC2 LFO PMod Depth"),
    b(0x65, 0x00, "AC2 LFO FMod Depth"),
    b(0x66, 0x00, "AC2 LFO AMod Depth"),
    sw(0x67, 0, "Portamento Switch"),
    b(0x68, 0x00, "Portamento Time"),
    b(0x69, 0x40, "Pitch EG Initial Level"),
    b(0x6A, 0x40, "Pitch EG Attack Time"),
    b(0x6B, 0x40, "Pitch EG Release Level"),
    b(0x6C, 0x40, "Pitch EG Release Time"),
    p(0x6D, 1, 1, 127, 1, "Velocity Limit Low"),
    p(0x6E, 1, 1, 127, 127, "Velocity Limit High"),
];

pub const DRUM_KIT_COUNT: u8 = 2;
pub const DRUM_NOTE_FIRST: u8 = 13;
pub const DRUM_NOTE_LAST: u8 = 84;

pub static DRUMSETUP: &[ParamDef] = &[
    b(0x00, 0x40, "Pitch Coarse"),
    b(0x01, 0x40, "Pitch Fine"),
    b(0x02, 0x7F, "Level"),
    b(0x03, 0x00, "Alternate Group"),
    b(0x04, 0x40, "Pan"),
    b(0x05, 0x40, "Reverb Send"),
    b(0x06, 0x00, "Chorus Send"),
    b(0x07, 0x7F, "Variation Send"),
    sw(0x08, 0, "Key Assign"),
    sw(0x09, 0, "Rcv Note Off"),
    sw(0x0A, 1, "Rcv Note On"),
    b(0x0B, 0x40, "Filter Cutoff"),
    b(0x0C, 0x40, "Filter Resonance"),
    b(0x0D, 0x40, "EG Attack"),
    b(0x0E, 0x40, "EG Decay 1"),
    b(0x0F, 0x40, "EG Decay 2"),
];

/// Default for a multipart parameter on a given part, where it differs from
/// the table default.
pub fn multipart_default(part: u8, def: &ParamDef) -> u16 {
    match def.low {
        MULTIPART_RCV_CHANNEL => part as u16,
        MULTIPART_BANK_MSB if part == DRUM_PART => 0x7F,
        MULTIPART_PART_MODE if part == DRUM_PART => 2,
        _ => def.default,
    }
}
