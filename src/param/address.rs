//! Three-level XG parameter address.

use std::fmt;

/// A parameter address in the XG address space: `(high, mid, low)`.
///
/// Ordering is lexicographic on the three bytes, which is what makes
/// registry traversal (and therefore saved session files) deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParamAddress {
    pub high: u8,
    pub mid: u8,
    pub low: u8,
}

impl ParamAddress {
    pub const fn new(high: u8, mid: u8, low: u8) -> Self {
        Self { high, mid, low }
    }

    /// Address `count` bytes further along the low byte, if it stays within
    /// the 7-bit address range.
    pub fn offset(self, count: usize) -> Option<Self> {
        let low = self.low as usize + count;
        if low > 0x7F {
            return None;
        }
        Some(Self {
            low: low as u8,
            ..self
        })
    }

    pub fn to_bytes(self) -> [u8; 3] {
        [self.high, self.mid, self.low]
    }
}

impl From<(u8, u8, u8)> for ParamAddress {
    fn from((high, mid, low): (u8, u8, u8)) -> Self {
        Self { high, mid, low }
    }
}

impl fmt::Display for ParamAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X} {:02X} {:02X}", self.high, self.mid, self.low)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_lexicographic() {
        let a = ParamAddress::new(0x00, 0x7F, 0x7F);
        let b = ParamAddress::new(0x02, 0x00, 0x00);
        let c = ParamAddress::new(0x02, 0x01, 0x00);
        assert!(a < b);
        assert!(b < c);
        let mut list = vec![c, a, b];
        list.sort();
        assert_eq!(list, vec![a, b, c]);
    }

    #[test]
    fn offset_within_range() {
        let base = ParamAddress::new(0x08, 0x03, 0x10);
        assert_eq!(base.offset(2), Some(ParamAddress::new(0x08, 0x03, 0x12)));
    }

    #[test]
    fn offset_past_7bit_range() {
        let base = ParamAddress::new(0x02, 0x01, 0x7E);
        assert_eq!(base.offset(1), Some(ParamAddress::new(0x02, 0x01, 0x7F)));
        assert_eq!(base.offset(2), None);
    }

    #[test]
    fn display_as_hex_triple() {
        assert_eq!(ParamAddress::new(0x30, 0x24, 0x0B).to_string(), "30 24 0B");
    }
}
