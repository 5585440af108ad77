//! Parameter groups: named partitions of the address space with an
//! optional instance selector ("current key").

use std::fmt;

use super::address::ParamAddress;
use super::table::{self, ParamDef};

/// Identifies one of the XG parameter groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupId {
    System,
    Reverb,
    Chorus,
    Variation,
    Multipart,
    Drumsetup,
}

impl GroupId {
    pub const ALL: [GroupId; 6] = [
        GroupId::System,
        GroupId::Reverb,
        GroupId::Chorus,
        GroupId::Variation,
        GroupId::Multipart,
        GroupId::Drumsetup,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GroupId::System => "SYSTEM",
            GroupId::Reverb => "REVERB",
            GroupId::Chorus => "CHORUS",
            GroupId::Variation => "VARIATION",
            GroupId::Multipart => "MULTIPART",
            GroupId::Drumsetup => "DRUMSETUP",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a group's instances map onto the address space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instances {
    /// One fixed `(high, mid)` block; the only valid key is 0.
    Single { high: u8, mid: u8 },
    /// `count` instances, the key selects the mid byte (multipart).
    Parts { high: u8, count: u8 },
    /// Drum kits × notes: key = `(kit << 7) | note`, kit selects the high
    /// byte offset from `high`, note selects the mid byte.
    DrumNotes {
        high: u8,
        kits: u8,
        first_note: u8,
        last_note: u8,
    },
}

impl Instances {
    pub fn is_valid_key(&self, key: u16) -> bool {
        match *self {
            Instances::Single { .. } => key == 0,
            Instances::Parts { count, .. } => key < count as u16,
            Instances::DrumNotes {
                kits,
                first_note,
                last_note,
                ..
            } => {
                let kit = key >> 7;
                let note = (key & 0x7F) as u8;
                kit < kits as u16 && (first_note..=last_note).contains(&note)
            }
        }
    }

    /// The first valid key, used as the initial current key.
    pub fn first_key(&self) -> u16 {
        match *self {
            Instances::Single { .. } | Instances::Parts { .. } => 0,
            Instances::DrumNotes { first_note, .. } => first_note as u16,
        }
    }

    /// All valid keys in ascending order.
    pub fn keys(&self) -> Vec<u16> {
        match *self {
            Instances::Single { .. } => vec![0],
            Instances::Parts { count, .. } => (0..count as u16).collect(),
            Instances::DrumNotes {
                kits,
                first_note,
                last_note,
                ..
            } => (0..kits as u16)
                .flat_map(|kit| (first_note..=last_note).map(move |note| (kit << 7) | note as u16))
                .collect(),
        }
    }

    /// `(high, mid)` prefix of one instance.
    pub fn prefix(&self, key: u16) -> Option<(u8, u8)> {
        if !self.is_valid_key(key) {
            return None;
        }
        Some(match *self {
            Instances::Single { high, mid } => (high, mid),
            Instances::Parts { high, .. } => (high, key as u8),
            Instances::DrumNotes { high, .. } => (high + (key >> 7) as u8, (key & 0x7F) as u8),
        })
    }

    /// Inverse of [`Instances::prefix`].
    pub fn key_of(&self, high: u8, mid: u8) -> Option<u16> {
        let key = match *self {
            Instances::Single { high: h, mid: m } => {
                if (h, m) != (high, mid) {
                    return None;
                }
                0
            }
            Instances::Parts { high: h, .. } => {
                if h != high {
                    return None;
                }
                mid as u16
            }
            Instances::DrumNotes { high: h, .. } => {
                if mid > 0x7F {
                    return None;
                }
                let kit = high.checked_sub(h)?;
                ((kit as u16) << 7) | mid as u16
            }
        };
        self.is_valid_key(key).then_some(key)
    }
}

/// A named view over part of the registry.
///
/// Groups own no parameters; they only know how to turn `(key, offset)` into
/// a [`ParamAddress`] the registry can look up.
#[derive(Debug, Clone)]
pub struct ParamGroup {
    id: GroupId,
    instances: Instances,
    defs: &'static [ParamDef],
    current_key: u16,
}

impl ParamGroup {
    pub fn new(id: GroupId, instances: Instances, defs: &'static [ParamDef]) -> Self {
        let current_key = instances.first_key();
        Self {
            id,
            instances,
            defs,
            current_key,
        }
    }

    /// The standard XG layout for a group.
    pub fn xg(id: GroupId) -> Self {
        let effect = Instances::Single {
            high: 0x02,
            mid: 0x01,
        };
        match id {
            GroupId::System => Self::new(
                id,
                Instances::Single {
                    high: 0x00,
                    mid: 0x00,
                },
                table::SYSTEM,
            ),
            GroupId::Reverb => Self::new(id, effect, table::REVERB),
            GroupId::Chorus => Self::new(id, effect, table::CHORUS),
            GroupId::Variation => Self::new(id, effect, table::VARIATION),
            GroupId::Multipart => Self::new(
                id,
                Instances::Parts {
                    high: 0x08,
                    count: table::PART_COUNT,
                },
                table::MULTIPART,
            ),
            GroupId::Drumsetup => Self::new(
                id,
                Instances::DrumNotes {
                    high: 0x30,
                    kits: table::DRUM_KIT_COUNT,
                    first_note: table::DRUM_NOTE_FIRST,
                    last_note: table::DRUM_NOTE_LAST,
                },
                table::DRUMSETUP,
            ),
        }
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.id.name()
    }

    pub fn instances(&self) -> &Instances {
        &self.instances
    }

    pub fn defs(&self) -> &'static [ParamDef] {
        self.defs
    }

    pub fn def(&self, offset: u8) -> Option<&'static ParamDef> {
        self.defs.iter().find(|def| def.low == offset)
    }

    pub fn current_key(&self) -> u16 {
        self.current_key
    }

    /// Replace the current key. Returns the previous key, or `None` if `key`
    /// is not a valid instance of this group.
    pub(crate) fn set_current_key(&mut self, key: u16) -> Option<u16> {
        if !self.instances.is_valid_key(key) {
            return None;
        }
        Some(std::mem::replace(&mut self.current_key, key))
    }

    /// Address of the parameter at `offset` within instance `key`.
    pub fn address_at(&self, key: u16, offset: u8) -> Option<ParamAddress> {
        self.def(offset)?;
        let (high, mid) = self.instances.prefix(key)?;
        Some(ParamAddress::new(high, mid, offset))
    }

    /// Address of the parameter at `offset` within the current instance.
    pub fn address(&self, offset: u8) -> Option<ParamAddress> {
        self.address_at(self.current_key, offset)
    }

    /// Every address belonging to instance `key`.
    pub fn instance_addresses(&self, key: u16) -> Vec<ParamAddress> {
        let Some((high, mid)) = self.instances.prefix(key) else {
            return Vec::new();
        };
        self.defs
            .iter()
            .map(|def| ParamAddress::new(high, mid, def.low))
            .collect()
    }

    /// Instance key of an address, if the address belongs to this group.
    pub fn locate(&self, address: ParamAddress) -> Option<u16> {
        self.def(address.low)?;
        self.instances.key_of(address.high, address.mid)
    }
}

/// Fixed-size collection of the six XG groups, indexed by [`GroupId`].
#[derive(Debug, Clone)]
pub(crate) struct GroupSet {
    groups: Vec<ParamGroup>,
}

impl GroupSet {
    pub fn xg() -> Self {
        Self {
            groups: GroupId::ALL.iter().map(|&id| ParamGroup::xg(id)).collect(),
        }
    }

    pub fn get(&self, id: GroupId) -> &ParamGroup {
        &self.groups[id.index()]
    }

    pub fn get_mut(&mut self, id: GroupId) -> &mut ParamGroup {
        &mut self.groups[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParamGroup> {
        self.groups.iter()
    }

    /// The group (and instance key) an address belongs to.
    pub fn locate(&self, address: ParamAddress) -> Option<(GroupId, u16)> {
        self.groups
            .iter()
            .find_map(|group| group.locate(address).map(|key| (group.id(), key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_group_has_only_key_zero() {
        let system = ParamGroup::xg(GroupId::System);
        assert!(system.instances().is_valid_key(0));
        assert!(!system.instances().is_valid_key(1));
        assert_eq!(system.instances().keys(), vec![0]);
    }

    #[test]
    fn multipart_key_selects_mid_byte() {
        let multipart = ParamGroup::xg(GroupId::Multipart);
        assert_eq!(
            multipart.address_at(3, 0x00),
            Some(ParamAddress::new(0x08, 0x03, 0x00))
        );
        assert_eq!(multipart.address_at(16, 0x00), None);
    }

    #[test]
    fn drum_key_encodes_kit_and_note() {
        let drums = ParamGroup::xg(GroupId::Drumsetup);
        let key = (1 << 7) | 36;
        assert_eq!(
            drums.address_at(key, 0x02),
            Some(ParamAddress::new(0x31, 36, 0x02))
        );
        assert!(!drums.instances().is_valid_key(12));
        assert!(!drums.instances().is_valid_key(85));
        assert!(!drums.instances().is_valid_key((2 << 7) | 36));
        assert_eq!(drums.current_key(), 13);
    }

    #[test]
    fn drum_keys_cover_both_kits() {
        let drums = ParamGroup::xg(GroupId::Drumsetup);
        let keys = drums.instances().keys();
        assert_eq!(keys.len(), 2 * 72);
        assert_eq!(keys[0], 13);
        assert_eq!(*keys.last().unwrap(), (1 << 7) | 84);
    }

    #[test]
    fn unknown_offset_has_no_address() {
        let multipart = ParamGroup::xg(GroupId::Multipart);
        // 0x0A is the second byte of the two-byte detune parameter.
        assert_eq!(multipart.address_at(0, 0x0A), None);
    }

    #[test]
    fn locate_inverts_address() {
        let groups = GroupSet::xg();
        assert_eq!(
            groups.locate(ParamAddress::new(0x08, 0x05, 0x0B)),
            Some((GroupId::Multipart, 5))
        );
        assert_eq!(
            groups.locate(ParamAddress::new(0x02, 0x01, 0x22)),
            Some((GroupId::Chorus, 0))
        );
        assert_eq!(
            groups.locate(ParamAddress::new(0x30, 40, 0x0F)),
            Some((GroupId::Drumsetup, 40))
        );
        assert_eq!(groups.locate(ParamAddress::new(0x10, 0x00, 0x00)), None);
    }

    #[test]
    fn set_current_key_rejects_invalid() {
        let mut multipart = ParamGroup::xg(GroupId::Multipart);
        assert_eq!(multipart.set_current_key(5), Some(0));
        assert_eq!(multipart.set_current_key(16), None);
        assert_eq!(multipart.current_key(), 5);
    }
}
