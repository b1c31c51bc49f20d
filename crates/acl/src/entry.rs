//! ACL entry vocabulary shared by the model and the text codec.

use std::fmt;

use crate::perms::AclPerms;

/// Prefix marking a line of combined text as belonging to the default ACL.
pub const DEFAULT_PREFIX: &str = "default:";

/// Which of a target's two ACL collections an operation addresses.
///
/// Every object has an access ACL. Directories additionally carry a default
/// ACL that newly created children inherit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AclKind {
    /// The ACL governing access to the object itself.
    Access,
    /// The inheritable ACL of a directory.
    Default,
}

impl AclKind {
    /// Lowercase name used in diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Default => "default",
        }
    }

    /// Line prefix used when the collection is rendered in combined text.
    #[must_use]
    pub const fn line_prefix(self) -> &'static str {
        match self {
            Self::Access => "",
            Self::Default => DEFAULT_PREFIX,
        }
    }
}

impl fmt::Display for AclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named principal: a user or group identified by name or numeric id.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Principal {
    /// A named user (`user:<id>:`).
    User(String),
    /// A named group (`group:<id>:`).
    Group(String),
}

impl Principal {
    /// Creates a user principal.
    pub fn user(name: impl Into<String>) -> Self {
        Self::User(name.into())
    }

    /// Creates a group principal.
    pub fn group(name: impl Into<String>) -> Self {
        Self::Group(name.into())
    }

    /// The qualifier text.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::User(name) | Self::Group(name) => name,
        }
    }

    /// The entry tag, `user` or `group`.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::User(_) => "user",
            Self::Group(_) => "group",
        }
    }

    /// Returns `true` if `name` can round-trip through the text format.
    ///
    /// Qualifiers must be non-empty, must not contain `:`, `#` or control
    /// characters, and must not start or end with whitespace.
    #[must_use]
    pub fn is_valid_name(name: &str) -> bool {
        !name.is_empty()
            && name.trim() == name
            && !name.chars().any(|c| c == ':' || c == '#' || c.is_control())
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tag(), self.name())
    }
}

/// Identity of an entry within one collection.
///
/// At most one entry exists per key. Comments and blank lines are anchored to
/// keys so they travel with the entry they followed.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EntryKey {
    /// `user::`
    Owner,
    /// `group::`
    OwningGroup,
    /// `other::`
    Other,
    /// `mask::`
    Mask,
    /// `user:<id>:` or `group:<id>:`
    Named(Principal),
}

impl EntryKey {
    /// Canonical emission rank. Named entries share the highest rank and are
    /// ordered among themselves by insertion.
    pub(crate) const fn rank(&self) -> u8 {
        match self {
            Self::Owner => 0,
            Self::OwningGroup => 1,
            Self::Other => 2,
            Self::Mask => 3,
            Self::Named(_) => 4,
        }
    }
}

/// One ACL entry as it appears on a line of text.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum AclEntry {
    /// Permissions of the owning user (`user::rwxc`).
    Owner(AclPerms),
    /// Permissions of the owning group (`group::r-x-`).
    Group(AclPerms),
    /// Permissions of everybody else (`other::----`).
    Other(AclPerms),
    /// Ceiling on named entries and the owning group (`mask::r-x-`).
    Mask(AclPerms),
    /// A named user entry.
    NamedUser {
        /// User name or numeric id.
        uid: String,
        /// Granted permissions before masking.
        perms: AclPerms,
    },
    /// A named group entry.
    NamedGroup {
        /// Group name or numeric id.
        gid: String,
        /// Granted permissions before masking.
        perms: AclPerms,
    },
}

impl AclEntry {
    /// Builds the named entry for `principal`.
    #[must_use]
    pub fn named(principal: Principal, perms: AclPerms) -> Self {
        match principal {
            Principal::User(uid) => Self::NamedUser { uid, perms },
            Principal::Group(gid) => Self::NamedGroup { gid, perms },
        }
    }

    /// The key identifying this entry within its collection.
    #[must_use]
    pub fn key(&self) -> EntryKey {
        match self {
            Self::Owner(_) => EntryKey::Owner,
            Self::Group(_) => EntryKey::OwningGroup,
            Self::Other(_) => EntryKey::Other,
            Self::Mask(_) => EntryKey::Mask,
            Self::NamedUser { uid, .. } => EntryKey::Named(Principal::User(uid.clone())),
            Self::NamedGroup { gid, .. } => EntryKey::Named(Principal::Group(gid.clone())),
        }
    }

    /// The permissions written on the entry's line.
    #[must_use]
    pub const fn perms(&self) -> AclPerms {
        match self {
            Self::Owner(perms)
            | Self::Group(perms)
            | Self::Other(perms)
            | Self::Mask(perms)
            | Self::NamedUser { perms, .. }
            | Self::NamedGroup { perms, .. } => *perms,
        }
    }

    /// Returns `true` for named user and named group entries.
    #[must_use]
    pub const fn is_named(&self) -> bool {
        matches!(self, Self::NamedUser { .. } | Self::NamedGroup { .. })
    }
}

impl fmt::Display for AclEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Owner(perms) => write!(f, "user::{perms}"),
            Self::Group(perms) => write!(f, "group::{perms}"),
            Self::Other(perms) => write!(f, "other::{perms}"),
            Self::Mask(perms) => write!(f, "mask::{perms}"),
            Self::NamedUser { uid, perms } => write!(f, "user:{uid}:{perms}"),
            Self::NamedGroup { gid, perms } => write!(f, "group:{gid}:{perms}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_render_as_acl_lines() {
        let rx: AclPerms = "r-x-".parse().expect("perms");
        assert_eq!(AclEntry::Owner(AclPerms::ALL).to_string(), "user::rwxc");
        assert_eq!(AclEntry::Mask(rx).to_string(), "mask::r-x-");
        assert_eq!(
            AclEntry::named(Principal::group("nfsnobody"), rx).to_string(),
            "group:nfsnobody:r-x-"
        );
    }

    #[test]
    fn named_key_carries_principal() {
        let entry = AclEntry::NamedUser {
            uid: "1001".into(),
            perms: AclPerms::NONE,
        };
        assert_eq!(entry.key(), EntryKey::Named(Principal::user("1001")));
        assert!(entry.is_named());
        assert!(!AclEntry::Other(AclPerms::NONE).is_named());
    }

    #[test]
    fn principal_names_are_validated() {
        assert!(Principal::is_valid_name("nfsnobody"));
        assert!(Principal::is_valid_name("1001"));
        assert!(!Principal::is_valid_name(""));
        assert!(!Principal::is_valid_name("a:b"));
        assert!(!Principal::is_valid_name("a#b"));
        assert!(!Principal::is_valid_name(" padded"));
        assert!(!Principal::is_valid_name("line\nbreak"));
    }
}
