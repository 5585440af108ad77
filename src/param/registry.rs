//! Parameter registry: the authoritative store of every XG parameter.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::address::ParamAddress;
use super::error::SetError;
use super::event::{Observers, ParamEvent, ParamEventReceiver, ResetScope};
use super::group::{GroupId, GroupSet, ParamGroup};
use super::table::{self, ParamDef, Trigger};

/// What to do with a write outside a parameter's range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangePolicy {
    /// Store the nearest in-range value.
    #[default]
    Clamp,
    /// Refuse the write.
    Reject,
}

/// Lookup of declared parameter widths. Bulk-dump decoding walks its
/// payload with this.
pub trait ParamSizes {
    fn param_size(&self, address: ParamAddress) -> Option<u8>;
}

/// One parameter instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    address: ParamAddress,
    def: &'static ParamDef,
    default: u32,
    value: u32,
}

impl Param {
    fn new(address: ParamAddress, def: &'static ParamDef, default: u16) -> Self {
        Self {
            address,
            def,
            default: default as u32,
            value: default as u32,
        }
    }

    pub fn address(&self) -> ParamAddress {
        self.address
    }

    pub fn name(&self) -> &'static str {
        self.def.name
    }

    /// Number of 7-bit data bytes.
    pub fn size(&self) -> u8 {
        self.def.size
    }

    pub fn min(&self) -> u32 {
        self.def.min as u32
    }

    pub fn max(&self) -> u32 {
        self.def.max as u32
    }

    pub fn default(&self) -> u32 {
        self.default
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn is_default(&self) -> bool {
        self.value == self.default
    }

    pub fn trigger(&self) -> Option<Trigger> {
        self.def.trigger
    }

    /// The value as `size` 7-bit data bytes, most significant first.
    pub fn data_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.size() as usize);
        encode_value(self.value, self.size(), &mut out);
        out
    }
}

/// Accumulate data bytes most significant first, 7 bits per byte.
///
/// Bytes are not masked: a stray byte above `0x7F` yields a larger value,
/// which range checking then clamps, instead of bleeding into the
/// neighbouring 7-bit group.
pub fn decode_value(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .fold(0u32, |acc, &byte| acc.saturating_mul(0x80).saturating_add(byte as u32))
}

/// Append `value` as `size` 7-bit data bytes, most significant first.
pub fn encode_value(value: u32, size: u8, out: &mut Vec<u8>) {
    for i in (0..size as u32).rev() {
        out.push(((value >> (7 * i)) & 0x7F) as u8);
    }
}

/// Result of a successful write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    Stored,
    /// The requested value was out of range and the nearest bound was stored.
    Clamped { requested: u32, stored: u32 },
    /// The address is a system trigger; it ran instead of storing a value.
    Triggered(Trigger),
}

/// Owns every [`Param`] plus the group views over them.
#[derive(Debug)]
pub struct ParamRegistry {
    params: BTreeMap<ParamAddress, Param>,
    groups: GroupSet,
    observers: Observers,
    range_policy: RangePolicy,
}

impl ParamRegistry {
    /// Build the registry for the full XG parameter map, every parameter at
    /// its default.
    pub fn new() -> Self {
        let groups = GroupSet::xg();
        let mut params = BTreeMap::new();
        for group in groups.iter() {
            for key in group.instances().keys() {
                let Some((high, mid)) = group.instances().prefix(key) else {
                    continue;
                };
                for def in group.defs() {
                    let address = ParamAddress::new(high, mid, def.low);
                    let default = match group.id() {
                        GroupId::Multipart => table::multipart_default(key as u8, def),
                        _ => def.default,
                    };
                    params.insert(address, Param::new(address, def, default));
                }
            }
        }
        Self {
            params,
            groups,
            observers: Observers::default(),
            range_policy: RangePolicy::default(),
        }
    }

    pub fn with_policy(range_policy: RangePolicy) -> Self {
        Self {
            range_policy,
            ..Self::new()
        }
    }

    pub fn range_policy(&self) -> RangePolicy {
        self.range_policy
    }

    pub fn set_range_policy(&mut self, policy: RangePolicy) {
        self.range_policy = policy;
    }

    /// Number of parameters in the store.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Register an observer. Every subsequent write, key change and reset is
    /// delivered to it.
    pub fn subscribe(&mut self) -> ParamEventReceiver {
        self.observers.subscribe()
    }

    pub fn find(&self, address: ParamAddress) -> Option<&Param> {
        self.params.get(&address)
    }

    pub fn group(&self, id: GroupId) -> &ParamGroup {
        self.groups.get(id)
    }

    /// The group and instance key an address belongs to.
    pub fn locate(&self, address: ParamAddress) -> Option<(GroupId, u16)> {
        self.groups.locate(address)
    }

    /// Look up `offset` within the group's current instance.
    pub fn find_in_group(&self, id: GroupId, offset: u8) -> Option<&Param> {
        let address = self.groups.get(id).address(offset)?;
        self.find(address)
    }

    /// Look up `offset` within a specific instance.
    pub fn find_in_group_at(&self, id: GroupId, key: u16, offset: u8) -> Option<&Param> {
        let address = self.groups.get(id).address_at(key, offset)?;
        self.find(address)
    }

    /// Address-ordered traversal of every parameter.
    pub fn iter(&self) -> impl Iterator<Item = &Param> {
        self.params.values()
    }

    /// Write raw data bytes to a parameter. Returns whether the address was
    /// known and the write accepted.
    pub fn set(&mut self, address: ParamAddress, data: &[u8]) -> bool {
        self.apply(address, data).is_ok()
    }

    /// Write raw data bytes, reporting exactly what happened.
    ///
    /// Only the first `size` bytes are used; extra bytes are ignored.
    pub fn apply(&mut self, address: ParamAddress, data: &[u8]) -> Result<SetOutcome, SetError> {
        let size = self
            .param_size(address)
            .ok_or(SetError::UnknownAddress(address))?;
        let Some(bytes) = data.get(..size as usize) else {
            return Err(SetError::Truncated {
                address,
                expected: size,
                got: data.len(),
            });
        };
        self.set_value(address, decode_value(bytes))
    }

    /// Write a decoded value, as the UI does.
    pub fn set_value(&mut self, address: ParamAddress, value: u32) -> Result<SetOutcome, SetError> {
        let param = self
            .params
            .get(&address)
            .ok_or(SetError::UnknownAddress(address))?;
        let (min, max) = (param.min(), param.max());
        let stored = value.clamp(min, max);
        let outcome = if stored == value {
            SetOutcome::Stored
        } else {
            match self.range_policy {
                RangePolicy::Reject => {
                    return Err(SetError::OutOfRange {
                        address,
                        requested: value,
                        min,
                        max,
                    })
                }
                RangePolicy::Clamp => {
                    warn!(%address, requested = value, stored, "value out of range, clamped");
                    SetOutcome::Clamped {
                        requested: value,
                        stored,
                    }
                }
            }
        };

        if let Some(trigger) = param.trigger() {
            self.run_trigger(trigger, stored);
            return Ok(SetOutcome::Triggered(trigger));
        }

        let Some(param) = self.params.get_mut(&address) else {
            return Err(SetError::UnknownAddress(address));
        };
        let old = std::mem::replace(&mut param.value, stored);
        self.observers.emit(ParamEvent::Changed {
            address,
            old,
            new: stored,
        });
        Ok(outcome)
    }

    /// Write to `offset` within the group's current instance.
    pub fn set_in_group(
        &mut self,
        id: GroupId,
        offset: u8,
        value: u32,
    ) -> Result<SetOutcome, SetError> {
        let group = self.groups.get(id);
        let address = match group.address(offset) {
            Some(address) => address,
            None => {
                let (high, mid) = group
                    .instances()
                    .prefix(group.current_key())
                    .unwrap_or_default();
                return Err(SetError::UnknownAddress(ParamAddress::new(high, mid, offset)));
            }
        };
        self.set_value(address, value)
    }

    /// Select which instance group-relative lookups resolve to.
    pub fn set_current_key(&mut self, id: GroupId, key: u16) -> Result<(), SetError> {
        let old = self
            .groups
            .get_mut(id)
            .set_current_key(key)
            .ok_or(SetError::InvalidKey { group: id, key })?;
        if old != key {
            self.observers.emit(ParamEvent::KeyChanged {
                group: id,
                old,
                new: key,
            });
        }
        Ok(())
    }

    pub fn current_key(&self, id: GroupId) -> u16 {
        self.groups.get(id).current_key()
    }

    /// Restore every parameter to its default.
    pub fn reset_all(&mut self) {
        for param in self.params.values_mut() {
            param.value = param.default;
        }
        debug!("all parameters reset");
        self.observers.emit(ParamEvent::Reset(ResetScope::All));
    }

    /// Restore one instance of a group (one part, one drum note).
    pub fn reset_group(&mut self, id: GroupId, key: u16) -> Result<(), SetError> {
        let group = self.groups.get(id);
        if !group.instances().is_valid_key(key) {
            return Err(SetError::InvalidKey { group: id, key });
        }
        for address in group.instance_addresses(key) {
            if let Some(param) = self.params.get_mut(&address) {
                param.value = param.default;
            }
        }
        debug!(group = %id, key, "group instance reset");
        self.observers
            .emit(ParamEvent::Reset(ResetScope::Instance { group: id, key }));
        Ok(())
    }

    /// Restore every note of one drum kit.
    pub fn reset_drum_kit(&mut self, kit: u8) -> Result<(), SetError> {
        let group = self.groups.get(GroupId::Drumsetup);
        let keys: Vec<u16> = group
            .instances()
            .keys()
            .into_iter()
            .filter(|key| key >> 7 == kit as u16)
            .collect();
        if keys.is_empty() {
            return Err(SetError::InvalidKey {
                group: GroupId::Drumsetup,
                key: (kit as u16) << 7,
            });
        }
        for key in keys {
            for address in group.instance_addresses(key) {
                if let Some(param) = self.params.get_mut(&address) {
                    param.value = param.default;
                }
            }
        }
        debug!(kit, "drum kit reset");
        self.observers.emit(ParamEvent::Reset(ResetScope::DrumKit(kit)));
        Ok(())
    }

    /// Parameters whose value differs from their default, in address order.
    /// System triggers are never included.
    pub fn snapshot_non_default(&self) -> Vec<&Param> {
        self.params
            .values()
            .filter(|param| param.trigger().is_none() && !param.is_default())
            .collect()
    }

    fn run_trigger(&mut self, trigger: Trigger, value: u32) {
        match trigger {
            Trigger::XgSystemOn | Trigger::AllParamReset => self.reset_all(),
            Trigger::DrumSetupReset => {
                if let Err(e) = self.reset_drum_kit(value as u8) {
                    warn!("drum setup reset: {e}");
                }
            }
        }
    }
}

impl Default for ParamRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ParamSizes for ParamRegistry {
    fn param_size(&self, address: ParamAddress) -> Option<u8> {
        self.find(address).map(Param::size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MASTER_TUNE: ParamAddress = ParamAddress::new(0x00, 0x00, 0x00);
    const MASTER_VOLUME: ParamAddress = ParamAddress::new(0x00, 0x00, 0x04);
    const REVERB_TYPE: ParamAddress = ParamAddress::new(0x02, 0x01, 0x00);

    fn part_volume(part: u8) -> ParamAddress {
        ParamAddress::new(0x08, part, 0x0B)
    }

    #[test]
    fn new_registry_is_all_default() {
        let registry = ParamRegistry::new();
        assert!(registry.snapshot_non_default().is_empty());
        assert!(registry.iter().all(Param::is_default));
    }

    #[test]
    fn registry_covers_every_group() {
        let registry = ParamRegistry::new();
        let expected = table::SYSTEM.len()
            + table::REVERB.len()
            + table::CHORUS.len()
            + table::VARIATION.len()
            + table::MULTIPART.len() * 16
            + table::DRUMSETUP.len() * 2 * 72;
        assert_eq!(registry.len(), expected);
    }

    #[test]
    fn find_miss_returns_none() {
        let registry = ParamRegistry::new();
        assert!(registry.find(ParamAddress::new(0x00, 0x00, 0x01)).is_none());
        assert!(registry.find(ParamAddress::new(0x7F, 0x7F, 0x7F)).is_none());
    }

    #[test]
    fn set_single_byte() {
        let mut registry = ParamRegistry::new();
        assert!(registry.set(MASTER_VOLUME, &[0x50]));
        assert_eq!(registry.find(MASTER_VOLUME).unwrap().value(), 0x50);
    }

    #[test]
    fn set_two_byte_value() {
        let mut registry = ParamRegistry::new();
        assert!(registry.set(REVERB_TYPE, &[0x02, 0x11]));
        let param = registry.find(REVERB_TYPE).unwrap();
        assert_eq!(param.value(), (0x02 << 7) | 0x11);
        assert_eq!(param.data_bytes(), vec![0x02, 0x11]);
    }

    #[test]
    fn set_unknown_address_fails() {
        let mut registry = ParamRegistry::new();
        let address = ParamAddress::new(0x00, 0x00, 0x02);
        assert!(!registry.set(address, &[0x10]));
        assert_eq!(
            registry.apply(address, &[0x10]),
            Err(SetError::UnknownAddress(address))
        );
    }

    #[test]
    fn set_truncated_fails() {
        let mut registry = ParamRegistry::new();
        assert_eq!(
            registry.apply(REVERB_TYPE, &[0x02]),
            Err(SetError::Truncated {
                address: REVERB_TYPE,
                expected: 2,
                got: 1
            })
        );
        assert!(registry.find(REVERB_TYPE).unwrap().is_default());
    }

    #[test]
    fn out_of_range_is_clamped() {
        let mut registry = ParamRegistry::new();
        let transpose = ParamAddress::new(0x00, 0x00, 0x06);
        let outcome = registry.apply(transpose, &[0x70]).unwrap();
        assert_eq!(
            outcome,
            SetOutcome::Clamped {
                requested: 0x70,
                stored: 0x58
            }
        );
        assert_eq!(registry.find(transpose).unwrap().value(), 0x58);
    }

    #[test]
    fn high_bit_byte_clamps_instead_of_wrapping() {
        let mut registry = ParamRegistry::new();
        // 0x81 in the LSB must not carry into the MSB.
        registry.apply(REVERB_TYPE, &[0x7F, 0x81]).unwrap();
        assert_eq!(registry.find(REVERB_TYPE).unwrap().value(), 0x3FFF);
        // Neighbouring effect parameters untouched.
        let param1 = ParamAddress::new(0x02, 0x01, 0x02);
        assert!(registry.find(param1).unwrap().is_default());
    }

    #[test]
    fn reject_policy_refuses_out_of_range() {
        let mut registry = ParamRegistry::with_policy(RangePolicy::Reject);
        let result = registry.set_value(MASTER_VOLUME, 200);
        assert!(matches!(result, Err(SetError::OutOfRange { max: 127, .. })));
        assert!(registry.find(MASTER_VOLUME).unwrap().is_default());
    }

    #[test]
    fn change_notification_carries_old_and_new() {
        let mut registry = ParamRegistry::new();
        let rx = registry.subscribe();
        registry.set(MASTER_VOLUME, &[0x20]);
        assert_eq!(
            rx.drain(),
            vec![ParamEvent::Changed {
                address: MASTER_VOLUME,
                old: 0x7F,
                new: 0x20
            }]
        );
    }

    #[test]
    fn unchanged_write_still_notifies() {
        let mut registry = ParamRegistry::new();
        let rx = registry.subscribe();
        registry.set(MASTER_TUNE, &[0x40]);
        assert_eq!(rx.drain().len(), 1);
    }

    #[test]
    fn failed_write_does_not_notify() {
        let mut registry = ParamRegistry::new();
        let rx = registry.subscribe();
        registry.set(ParamAddress::new(0x00, 0x00, 0x03), &[0x00]);
        assert!(rx.poll().is_none());
    }

    #[test]
    fn find_in_group_follows_current_key() {
        let mut registry = ParamRegistry::new();
        registry.set(part_volume(3), &[0x11]);
        assert_eq!(
            registry.find_in_group(GroupId::Multipart, 0x0B).unwrap().value(),
            100
        );
        registry.set_current_key(GroupId::Multipart, 3).unwrap();
        let param = registry.find_in_group(GroupId::Multipart, 0x0B).unwrap();
        assert_eq!(param.address(), part_volume(3));
        assert_eq!(param.value(), 0x11);
    }

    #[test]
    fn current_key_isolation() {
        let mut registry = ParamRegistry::new();
        registry.set_current_key(GroupId::Multipart, 5).unwrap();
        for def in table::MULTIPART {
            registry
                .set_in_group(GroupId::Multipart, def.low, def.min as u32)
                .unwrap();
        }
        for part in (0..16u8).filter(|&p| p != 5) {
            for def in table::MULTIPART {
                let param = registry
                    .find(ParamAddress::new(0x08, part, def.low))
                    .unwrap();
                assert!(param.is_default(), "part {part} {} changed", def.name);
            }
        }
    }

    #[test]
    fn set_current_key_has_no_value_side_effects() {
        let mut registry = ParamRegistry::new();
        let rx = registry.subscribe();
        registry.set_current_key(GroupId::Multipart, 7).unwrap();
        assert!(registry.snapshot_non_default().is_empty());
        assert_eq!(
            rx.drain(),
            vec![ParamEvent::KeyChanged {
                group: GroupId::Multipart,
                old: 0,
                new: 7
            }]
        );
    }

    #[test]
    fn set_current_key_invalid() {
        let mut registry = ParamRegistry::new();
        assert_eq!(
            registry.set_current_key(GroupId::System, 1),
            Err(SetError::InvalidKey {
                group: GroupId::System,
                key: 1
            })
        );
        assert!(registry.set_current_key(GroupId::Drumsetup, 12).is_err());
        assert_eq!(registry.current_key(GroupId::Drumsetup), 13);
    }

    #[test]
    fn reset_all_restores_defaults() {
        let mut registry = ParamRegistry::new();
        registry.set(MASTER_VOLUME, &[0x00]);
        registry.set(part_volume(2), &[0x00]);
        registry.reset_all();
        assert!(registry.snapshot_non_default().is_empty());
    }

    #[test]
    fn reset_group_touches_one_instance() {
        let mut registry = ParamRegistry::new();
        registry.set(part_volume(2), &[0x00]);
        registry.set(part_volume(3), &[0x00]);
        registry.reset_group(GroupId::Multipart, 2).unwrap();
        assert!(registry.find(part_volume(2)).unwrap().is_default());
        assert_eq!(registry.find(part_volume(3)).unwrap().value(), 0);
    }

    #[test]
    fn xg_system_on_resets_everything() {
        let mut registry = ParamRegistry::new();
        registry.set(part_volume(1), &[0x10]);
        let rx = registry.subscribe();
        let outcome = registry.apply(ParamAddress::new(0x00, 0x00, 0x7E), &[0x00]);
        assert_eq!(outcome, Ok(SetOutcome::Triggered(Trigger::XgSystemOn)));
        assert!(registry.snapshot_non_default().is_empty());
        assert_eq!(rx.drain(), vec![ParamEvent::Reset(ResetScope::All)]);
    }

    #[test]
    fn drum_setup_reset_selects_kit() {
        let mut registry = ParamRegistry::new();
        let kit0 = ParamAddress::new(0x30, 36, 0x02);
        let kit1 = ParamAddress::new(0x31, 36, 0x02);
        registry.set(kit0, &[0x10]);
        registry.set(kit1, &[0x10]);
        registry.apply(ParamAddress::new(0x00, 0x00, 0x7D), &[0x01]).unwrap();
        assert_eq!(registry.find(kit0).unwrap().value(), 0x10);
        assert!(registry.find(kit1).unwrap().is_default());
    }

    #[test]
    fn snapshot_is_address_ordered() {
        let mut registry = ParamRegistry::new();
        registry.set(part_volume(9), &[0x01]);
        registry.set(MASTER_VOLUME, &[0x01]);
        registry.set(part_volume(0), &[0x01]);
        let addresses: Vec<ParamAddress> = registry
            .snapshot_non_default()
            .iter()
            .map(|p| p.address())
            .collect();
        assert_eq!(addresses, vec![MASTER_VOLUME, part_volume(0), part_volume(9)]);
    }

    #[test]
    fn snapshot_never_contains_triggers() {
        let mut registry = ParamRegistry::new();
        registry.apply(ParamAddress::new(0x00, 0x00, 0x7D), &[0x01]).unwrap();
        assert!(registry.snapshot_non_default().is_empty());
    }

    #[test]
    fn instance_defaults() {
        let registry = ParamRegistry::new();
        let channel = registry.find(ParamAddress::new(0x08, 0x0C, 0x04)).unwrap();
        assert_eq!(channel.default(), 12);
        let bank = registry.find(ParamAddress::new(0x08, 0x09, 0x01)).unwrap();
        assert_eq!(bank.default(), 0x7F);
    }

    #[test]
    fn value_codec() {
        let mut out = Vec::new();
        encode_value(0x1234, 2, &mut out);
        assert_eq!(out, vec![0x24, 0x34]);
        assert_eq!(decode_value(&out), 0x1234);
        assert_eq!(decode_value(&[]), 0);
    }
}
