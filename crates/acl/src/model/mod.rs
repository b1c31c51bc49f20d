//! The in-memory ACL of one target and the edit operations on it.

mod set;


pub use self::set::{AclSet, MaskState, NamedEntry};
pub(crate) use self::set::Conflict;

use std::fmt;
use std::path::{Path, PathBuf};

use logging::trace_acl;

use crate::codec;
use crate::entry::{AclKind, Principal};
use crate::error::AclError;
use crate::perms::AclPerms;

/// Owner permissions used when a collection without base entries is seeded.
pub const SEED_OWNER: AclPerms = AclPerms::ALL;
/// Owning group permissions used when seeding.
pub const SEED_GROUP: AclPerms = AclPerms::from_bits(AclPerms::READ | AclPerms::EXECUTE);
/// Other permissions used when seeding.
pub const SEED_OTHER: AclPerms = AclPerms::NONE;

/// Whether a target is a plain object or a directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// A regular file or any other non-directory object.
    File,
    /// A directory, which may also carry a default ACL.
    Directory,
}

impl ObjectKind {
    /// One-letter code used in listings and snapshots.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::File => "f",
            Self::Directory => "d",
        }
    }
}

/// The filesystem object an [`AclModel`] describes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AclTarget {
    path: PathBuf,
    kind: ObjectKind,
}

impl AclTarget {
    /// Creates a target of the given kind.
    pub fn new(path: impl Into<PathBuf>, kind: ObjectKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Creates a non-directory target.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(path, ObjectKind::File)
    }

    /// Creates a directory target.
    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Self::new(path, ObjectKind::Directory)
    }

    /// Target path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Target kind.
    #[must_use]
    pub const fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// Returns `true` for directories.
    #[must_use]
    pub const fn is_directory(&self) -> bool {
        matches!(self.kind, ObjectKind::Directory)
    }
}

/// An `#owner:` or `#group:` line describing who owns the target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AclMetadata {
    /// `#owner:<name>`
    Owner(String),
    /// `#group:<name>`
    Group(String),
}

impl AclMetadata {
    pub(crate) fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if let Some(name) = line.strip_prefix("#owner:") {
            Some(Self::Owner(name.trim().to_owned()))
        } else {
            line.strip_prefix("#group:")
                .map(|name| Self::Group(name.trim().to_owned()))
        }
    }

    pub(crate) const fn same_kind(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::Owner(_), Self::Owner(_)) | (Self::Group(_), Self::Group(_))
        )
    }

    /// The recorded owner or group name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Owner(name) | Self::Group(name) => name,
        }
    }
}

impl fmt::Display for AclMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Owner(name) => write!(f, "#owner:{name}"),
            Self::Group(name) => write!(f, "#group:{name}"),
        }
    }
}

/// The ACL state of one target: its access collection and, for
/// directories, its default collection.
///
/// Models are produced by [`AclModel::decode`], edited in place, and turned
/// back into text with [`AclModel::encode`]. Every edit leaves the model in
/// canonical form, so encoding never depends on the order edits were made
/// beyond what the edits themselves specify.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AclModel {
    target: AclTarget,
    metadata: Vec<AclMetadata>,
    access: AclSet,
    default: Option<AclSet>,
}

impl AclModel {
    /// An empty model with no entries and no default collection.
    #[must_use]
    pub fn new(target: AclTarget) -> Self {
        Self {
            target,
            metadata: Vec::new(),
            access: AclSet::default(),
            default: None,
        }
    }

    pub(crate) fn from_parts(
        target: AclTarget,
        metadata: Vec<AclMetadata>,
        access: AclSet,
        default: Option<AclSet>,
    ) -> Self {
        Self {
            target,
            metadata,
            access,
            default,
        }
    }

    /// Decodes combined ACL text. Lines prefixed with `default:` populate the
    /// default collection.
    ///
    /// # Errors
    ///
    /// Returns the first malformed or duplicated line, or
    /// [`AclError::NotDirectory`] when a non-directory carries default lines.
    pub fn decode(target: AclTarget, text: &str) -> Result<Self, AclError> {
        codec::decode(target, text)
    }

    /// Replaces the default collection with one decoded from `text`.
    ///
    /// Every entry line lands in the default collection whether or not it
    /// carries the `default:` prefix. Metadata lines are merged into the
    /// model; a kind already recorded is kept.
    pub fn load_default(&mut self, text: &str) -> Result<(), AclError> {
        if !self.target.is_directory() {
            return Err(AclError::NotDirectory {
                path: self.target.path.clone(),
            });
        }
        let (metadata, set) = codec::decode_default(text)?;
        for meta in metadata {
            if !self.metadata.iter().any(|known| known.same_kind(&meta)) {
                self.metadata.push(meta);
            }
        }
        self.default = Some(set);
        Ok(())
    }

    /// Renders both collections as combined text.
    #[must_use]
    pub fn encode(&self) -> String {
        codec::encode(self)
    }

    /// Renders one collection without line prefixes, the form `mmputacl`
    /// reads.
    pub fn encode_collection(&self, kind: AclKind) -> Result<String, AclError> {
        let set = self.collection_or_err(kind)?;
        Ok(codec::encode_collection(&self.metadata, set))
    }

    /// The target this model describes.
    #[must_use]
    pub const fn target(&self) -> &AclTarget {
        &self.target
    }

    /// `#owner:` and `#group:` lines in the order they were read.
    #[must_use]
    pub fn metadata(&self) -> &[AclMetadata] {
        &self.metadata
    }

    /// The owner recorded by `#owner:`.
    #[must_use]
    pub fn owner_name(&self) -> Option<&str> {
        self.metadata.iter().find_map(|meta| match meta {
            AclMetadata::Owner(name) => Some(name.as_str()),
            AclMetadata::Group(_) => None,
        })
    }

    /// The group recorded by `#group:`.
    #[must_use]
    pub fn group_name(&self) -> Option<&str> {
        self.metadata.iter().find_map(|meta| match meta {
            AclMetadata::Group(name) => Some(name.as_str()),
            AclMetadata::Owner(_) => None,
        })
    }

    /// The access collection.
    #[must_use]
    pub const fn access(&self) -> &AclSet {
        &self.access
    }

    /// The default collection, if it has been loaded.
    #[must_use]
    pub const fn default_acl(&self) -> Option<&AclSet> {
        self.default.as_ref()
    }

    /// The addressed collection, if present.
    #[must_use]
    pub const fn collection(&self, kind: AclKind) -> Option<&AclSet> {
        match kind {
            AclKind::Access => Some(&self.access),
            AclKind::Default => self.default.as_ref(),
        }
    }

    /// Permissions of a named user, or `----` when absent.
    #[must_use]
    pub fn named_user_perms(&self, kind: AclKind, uid: &str) -> AclPerms {
        self.named_perms(kind, &Principal::user(uid))
    }

    /// Permissions of a named group, or `----` when absent.
    #[must_use]
    pub fn named_group_perms(&self, kind: AclKind, gid: &str) -> AclPerms {
        self.named_perms(kind, &Principal::group(gid))
    }

    fn named_perms(&self, kind: AclKind, principal: &Principal) -> AclPerms {
        self.collection(kind)
            .and_then(|set| set.named_perms(principal))
            .unwrap_or(AclPerms::NONE)
    }

    /// Permissions of a named entry after masking, or `----` when absent.
    #[must_use]
    pub fn effective_perms(&self, kind: AclKind, principal: &Principal) -> AclPerms {
        self.collection(kind)
            .and_then(|set| set.effective_perms(principal))
            .unwrap_or(AclPerms::NONE)
    }

    /// Sets the owning user's permissions. The mask is untouched.
    ///
    /// Missing base entries are seeded as for [`AclModel::add_named`], so the
    /// collection always encodes as a complete ACL.
    pub fn set_owner_perm(&mut self, kind: AclKind, perms: AclPerms) -> Result<(), AclError> {
        let set = self.seeded(kind)?;
        set.set_owner(perms);
        set.normalize();
        Ok(())
    }

    /// Sets the owning group's permissions and recomputes the mask.
    pub fn set_group_perm(&mut self, kind: AclKind, perms: AclPerms) -> Result<(), AclError> {
        let set = self.seeded(kind)?;
        set.set_owning_group(perms);
        set.recompute_mask();
        set.normalize();
        Ok(())
    }

    /// Sets the permissions of everybody else. The mask is untouched.
    pub fn set_other_perm(&mut self, kind: AclKind, perms: AclPerms) -> Result<(), AclError> {
        let set = self.seeded(kind)?;
        set.set_other(perms);
        set.normalize();
        Ok(())
    }

    /// Adds a named user, or replaces its permissions in place.
    pub fn add_named_user(
        &mut self,
        kind: AclKind,
        uid: &str,
        perms: AclPerms,
    ) -> Result<(), AclError> {
        self.add_named(kind, Principal::user(uid), perms)
    }

    /// Adds a named group, or replaces its permissions in place.
    pub fn add_named_group(
        &mut self,
        kind: AclKind,
        gid: &str,
        perms: AclPerms,
    ) -> Result<(), AclError> {
        self.add_named(kind, Principal::group(gid), perms)
    }

    /// Adds or replaces a named entry.
    ///
    /// A collection missing any base entry is seeded first. Default
    /// collections copy the missing values from the access collection;
    /// otherwise `rwxc`, `r-x-` and `----` are used.
    pub fn add_named(
        &mut self,
        kind: AclKind,
        principal: Principal,
        perms: AclPerms,
    ) -> Result<(), AclError> {
        if !Principal::is_valid_name(principal.name()) {
            return Err(AclError::InvalidPrincipal {
                name: principal.name().to_owned(),
            });
        }

        let path = self.target.path.clone();
        let set = self.seeded(kind)?;
        set.upsert_named(principal.clone(), perms);
        set.recompute_mask();
        set.normalize();

        if let Some(mask) = set.mask().filter(|mask| !mask.covers(perms)) {
            trace_acl!(
                path = %path.display(),
                kind = %kind,
                "{principal}:{perms} is limited to {} by mask {mask}",
                perms.intersect(mask)
            );
        }
        Ok(())
    }

    /// Removes a named user.
    pub fn remove_named_user(&mut self, kind: AclKind, uid: &str) -> Result<(), AclError> {
        self.remove_named(kind, &Principal::user(uid))
    }

    /// Removes a named group.
    pub fn remove_named_group(&mut self, kind: AclKind, gid: &str) -> Result<(), AclError> {
        self.remove_named(kind, &Principal::group(gid))
    }

    /// Removes a named entry and recomputes the mask. Comments that followed
    /// the entry move to the entry before it.
    pub fn remove_named(&mut self, kind: AclKind, principal: &Principal) -> Result<(), AclError> {
        let path = self.target.path.clone();
        let set = self.collection_mut(kind)?;
        if !set.remove_named(principal) {
            return Err(AclError::EntryNotFound {
                path,
                kind,
                principal: principal.clone(),
            });
        }
        set.recompute_mask();
        set.normalize();
        Ok(())
    }

    /// Removes every named entry and returns the mask to derived mode.
    /// Base entries stay.
    pub fn clear_all(&mut self, kind: AclKind) -> Result<(), AclError> {
        self.edit(kind, AclSet::clear_extended)
    }

    /// Fixes the mask at `perms`. Later additions and removals leave it in
    /// place until [`AclModel::clear_all`] runs.
    pub fn pin_mask(&mut self, kind: AclKind, perms: AclPerms) -> Result<(), AclError> {
        self.edit(kind, |set| set.pin_mask(perms))
    }

    /// The collection for `kind` with any missing base entry filled in.
    fn seeded(&mut self, kind: AclKind) -> Result<&mut AclSet, AclError> {
        let (owner, group, other) = (
            self.access.owner().unwrap_or(SEED_OWNER),
            self.access.owning_group().unwrap_or(SEED_GROUP),
            self.access.other().unwrap_or(SEED_OTHER),
        );
        let path = self.target.path.clone();
        let set = self.collection_mut(kind)?;
        if !set.has_base_entries() {
            trace_acl!(path = %path.display(), kind = %kind, "seeding missing base entries");
            set.seed_base(owner, group, other);
        }
        Ok(set)
    }

    fn edit(&mut self, kind: AclKind, change: impl FnOnce(&mut AclSet)) -> Result<(), AclError> {
        let set = self.collection_mut(kind)?;
        change(set);
        set.normalize();
        Ok(())
    }

    fn collection_or_err(&self, kind: AclKind) -> Result<&AclSet, AclError> {
        self.check_kind(kind)?;
        self.collection(kind)
            .ok_or_else(|| AclError::MissingTargetCollection {
                path: self.target.path.clone(),
                kind,
            })
    }

    fn collection_mut(&mut self, kind: AclKind) -> Result<&mut AclSet, AclError> {
        self.check_kind(kind)?;
        match kind {
            AclKind::Access => Ok(&mut self.access),
            AclKind::Default => {
                self.default
                    .as_mut()
                    .ok_or_else(|| AclError::MissingTargetCollection {
                        path: self.target.path.clone(),
                        kind,
                    })
            }
        }
    }

    fn check_kind(&self, kind: AclKind) -> Result<(), AclError> {
        if kind == AclKind::Default && !self.target.is_directory() {
            return Err(AclError::NotDirectory {
                path: self.target.path.clone(),
            });
        }
        Ok(())
    }
}
