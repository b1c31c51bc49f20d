//! Four-slot SpectrumScale permission strings.
//!
//! Every ACL entry carries exactly four slots in the fixed order read, write,
//! execute, control. A granted slot shows its letter and a denied slot shows
//! `-`, so `rwxc` grants everything and `----` grants nothing.

use std::fmt;
use std::str::FromStr;

/// Number of characters in a permission string.
pub const PERMS_LEN: usize = 4;

const SLOTS: [(u8, u8); PERMS_LEN] = [
    (b'r', AclPerms::READ),
    (b'w', AclPerms::WRITE),
    (b'x', AclPerms::EXECUTE),
    (b'c', AclPerms::CONTROL),
];

/// Permission bits for one ACL entry.
///
/// The value is a bit set over the four slots. Parsing is strict: the input
/// must be exactly four characters and each slot accepts only its own letter
/// or `-`. Surrounding whitespace is the caller's concern.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AclPerms(u8);

impl AclPerms {
    /// Read permission (`r`).
    pub const READ: u8 = 0b1000;
    /// Write permission (`w`).
    pub const WRITE: u8 = 0b0100;
    /// Execute or search permission (`x`).
    pub const EXECUTE: u8 = 0b0010;
    /// Control permission (`c`), the right to change the ACL itself.
    pub const CONTROL: u8 = 0b0001;

    const ALL_BITS: u8 = Self::READ | Self::WRITE | Self::EXECUTE | Self::CONTROL;

    /// `----`
    pub const NONE: Self = Self(0);
    /// `rwxc`
    pub const ALL: Self = Self(Self::ALL_BITS);

    /// Builds a value from raw bits, discarding anything outside the four slots.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::ALL_BITS)
    }

    /// Returns the raw bit set.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Slots granted by either operand.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Slots granted by both operands.
    #[must_use]
    pub const fn intersect(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// Returns `true` when every bit in `bits` is granted.
    #[must_use]
    pub const fn contains(self, bits: u8) -> bool {
        self.0 & bits == bits
    }

    /// Returns `true` when `other` grants nothing outside `self`.
    #[must_use]
    pub const fn covers(self, other: Self) -> bool {
        other.0 & !self.0 == 0
    }

    /// Returns `true` for `----`.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl FromStr for AclPerms {
    type Err = PermsError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let bytes = text.as_bytes();
        if bytes.len() != PERMS_LEN {
            return Err(PermsError::new(text));
        }

        let mut bits = 0;
        for (&byte, &(symbol, bit)) in bytes.iter().zip(SLOTS.iter()) {
            if byte == symbol {
                bits |= bit;
            } else if byte != b'-' {
                return Err(PermsError::new(text));
            }
        }
        Ok(Self(bits))
    }
}

impl fmt::Display for AclPerms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut text = [b'-'; PERMS_LEN];
        for (slot, &(symbol, bit)) in text.iter_mut().zip(SLOTS.iter()) {
            if self.0 & bit != 0 {
                *slot = symbol;
            }
        }
        // Every byte is ASCII.
        f.write_str(std::str::from_utf8(&text).map_err(|_| fmt::Error)?)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for AclPerms {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A permission string that is not four characters drawn from `r/-`, `w/-`,
/// `x/-`, `c/-` in that order.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid permission string '{text}': expected four characters matching [r-][w-][x-][c-]")]
pub struct PermsError {
    text: String,
}

impl PermsError {
    fn new(text: &str) -> Self {
        Self {
            text: text.to_owned(),
        }
    }

    /// The rejected input.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perms(text: &str) -> AclPerms {
        text.parse().expect("valid perms")
    }

    #[test]
    fn parses_full_and_empty() {
        assert_eq!(perms("rwxc"), AclPerms::ALL);
        assert_eq!(perms("----"), AclPerms::NONE);
        assert_eq!(perms("r-x-").bits(), AclPerms::READ | AclPerms::EXECUTE);
    }

    #[test]
    fn display_uses_slot_letters() {
        assert_eq!(perms("r-x-").to_string(), "r-x-");
        assert_eq!(AclPerms::from_bits(AclPerms::CONTROL).to_string(), "---c");
        assert_eq!(AclPerms::ALL.to_string(), "rwxc");
    }

    #[test]
    fn rejects_wrong_length() {
        for bad in ["", "rwx", "rwxcc", "rwx- "] {
            let err = bad.parse::<AclPerms>().expect_err("length must be four");
            assert_eq!(err.text(), bad);
        }
    }

    #[test]
    fn rejects_letters_in_wrong_slot() {
        for bad in ["wrxc", "rwcx", "RWXC", "r x-", "rwx?"] {
            assert!(bad.parse::<AclPerms>().is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn does_not_trim_input() {
        assert!(" r-x-".trim_end().parse::<AclPerms>().is_err());
        assert!(" r-x".parse::<AclPerms>().is_err());
    }

    #[test]
    fn union_and_intersect() {
        let rx = perms("r-x-");
        let rw = perms("rw--");
        assert_eq!(rx.union(rw), perms("rwx-"));
        assert_eq!(rx.intersect(rw), perms("r---"));
        assert!(perms("rwx-").covers(rx));
        assert!(!rx.covers(rw));
        assert!(rx.contains(AclPerms::READ | AclPerms::EXECUTE));
        assert!(!rx.contains(AclPerms::WRITE));
    }

    #[test]
    fn from_bits_masks_unknown_bits() {
        assert_eq!(AclPerms::from_bits(0xff), AclPerms::ALL);
        assert!(AclPerms::from_bits(0xf0).is_empty());
    }
}
