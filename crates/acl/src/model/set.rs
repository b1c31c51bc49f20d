//! One ACL collection: base entries, named entries, mask state and the
//! comment lines anchored among them.

use crate::entry::{AclEntry, EntryKey, Principal};
use crate::perms::AclPerms;

/// How the mask of a collection is determined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MaskState {
    /// The union of the owning group and every named entry.
    #[default]
    Derived,
    /// Read from text and different from the derived value. The next
    /// recomputation replaces it with [`MaskState::Derived`].
    Loaded(AclPerms),
    /// Set explicitly. Recomputation leaves it alone until the collection is
    /// cleared.
    Pinned(AclPerms),
}

/// A named user or group entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamedEntry {
    principal: Principal,
    perms: AclPerms,
}

impl NamedEntry {
    /// The user or group this entry grants to.
    #[must_use]
    pub const fn principal(&self) -> &Principal {
        &self.principal
    }

    /// Granted permissions before masking.
    #[must_use]
    pub const fn perms(&self) -> AclPerms {
        self.perms
    }
}

/// A comment or blank line, kept verbatim and anchored to the entry it
/// followed. `None` anchors precede the first entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Note {
    pub(crate) anchor: Option<EntryKey>,
    pub(crate) text: String,
}

impl Note {
    fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A collision found while decoding.
#[derive(Debug)]
pub(crate) enum Conflict {
    Singleton(&'static str),
    Named(Principal),
}

/// One ACL collection, either the access ACL or the default ACL of a target.
///
/// Singleton entries are optional so that freshly fetched text with missing
/// base lines survives a round trip. Named entries keep insertion order with
/// users and groups interleaved as they were read or added.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AclSet {
    owner: Option<AclPerms>,
    group: Option<AclPerms>,
    other: Option<AclPerms>,
    mask: MaskState,
    named: Vec<NamedEntry>,
    notes: Vec<Note>,
}

impl AclSet {
    /// Owning user permissions.
    #[must_use]
    pub const fn owner(&self) -> Option<AclPerms> {
        self.owner
    }

    /// Owning group permissions.
    #[must_use]
    pub const fn owning_group(&self) -> Option<AclPerms> {
        self.group
    }

    /// Permissions for everybody else.
    #[must_use]
    pub const fn other(&self) -> Option<AclPerms> {
        self.other
    }

    /// How the mask is currently determined.
    #[must_use]
    pub const fn mask_state(&self) -> MaskState {
        self.mask
    }

    /// Named entries in emission order.
    #[must_use]
    pub fn named(&self) -> &[NamedEntry] {
        &self.named
    }

    /// The effective mask, or `None` when the collection has neither an
    /// owning group nor named entries to derive it from.
    #[must_use]
    pub fn mask(&self) -> Option<AclPerms> {
        match self.mask {
            MaskState::Loaded(perms) | MaskState::Pinned(perms) => Some(perms),
            MaskState::Derived if self.group.is_none() && self.named.is_empty() => None,
            MaskState::Derived => Some(self.derived_mask()),
        }
    }

    /// Permissions granted to `principal` before masking.
    #[must_use]
    pub fn named_perms(&self, principal: &Principal) -> Option<AclPerms> {
        self.named
            .iter()
            .find(|entry| &entry.principal == principal)
            .map(|entry| entry.perms)
    }

    /// Permissions granted to `principal` after the mask is applied.
    #[must_use]
    pub fn effective_perms(&self, principal: &Principal) -> Option<AclPerms> {
        let mask = self.mask().unwrap_or(AclPerms::ALL);
        self.named_perms(principal).map(|perms| perms.intersect(mask))
    }

    /// Returns `true` if the collection holds at least one entry.
    #[must_use]
    pub fn has_entries(&self) -> bool {
        !self.emission_keys().is_empty()
    }

    /// Returns `true` if the owner, owning group and other entries are all present.
    #[must_use]
    pub const fn has_base_entries(&self) -> bool {
        self.owner.is_some() && self.group.is_some() && self.other.is_some()
    }

    /// Entries in emission order: owner, owning group, other, mask, then
    /// named entries. The mask appears only when there are named entries or
    /// its value is not derived.
    #[must_use]
    pub fn entries(&self) -> Vec<AclEntry> {
        let mut entries = Vec::with_capacity(4 + self.named.len());
        entries.extend(self.owner.map(AclEntry::Owner));
        entries.extend(self.group.map(AclEntry::Group));
        entries.extend(self.other.map(AclEntry::Other));
        entries.extend(self.mask_line().map(AclEntry::Mask));
        entries.extend(
            self.named
                .iter()
                .map(|entry| AclEntry::named(entry.principal.clone(), entry.perms)),
        );
        entries
    }

    pub(crate) fn notes(&self) -> impl Iterator<Item = &Note> {
        self.notes.iter()
    }

    fn derived_mask(&self) -> AclPerms {
        self.named
            .iter()
            .fold(self.group.unwrap_or(AclPerms::NONE), |mask, entry| {
                mask.union(entry.perms)
            })
    }

    fn mask_line(&self) -> Option<AclPerms> {
        match self.mask {
            MaskState::Derived if self.named.is_empty() => None,
            _ => self.mask(),
        }
    }

    fn emission_keys(&self) -> Vec<EntryKey> {
        self.entries().iter().map(AclEntry::key).collect()
    }

    pub(crate) fn insert_decoded(&mut self, entry: AclEntry) -> Result<(), Conflict> {
        fn fill(
            slot: &mut Option<AclPerms>,
            perms: AclPerms,
            tag: &'static str,
        ) -> Result<(), Conflict> {
            if slot.is_some() {
                return Err(Conflict::Singleton(tag));
            }
            *slot = Some(perms);
            Ok(())
        }

        match entry {
            AclEntry::Owner(perms) => fill(&mut self.owner, perms, "user::"),
            AclEntry::Group(perms) => fill(&mut self.group, perms, "group::"),
            AclEntry::Other(perms) => fill(&mut self.other, perms, "other::"),
            AclEntry::Mask(perms) => {
                if matches!(self.mask, MaskState::Loaded(_)) {
                    return Err(Conflict::Singleton("mask::"));
                }
                self.mask = MaskState::Loaded(perms);
                Ok(())
            }
            AclEntry::NamedUser { uid, perms } => self.push_named(Principal::User(uid), perms),
            AclEntry::NamedGroup { gid, perms } => self.push_named(Principal::Group(gid), perms),
        }
    }

    fn push_named(&mut self, principal: Principal, perms: AclPerms) -> Result<(), Conflict> {
        if self.named_perms(&principal).is_some() {
            return Err(Conflict::Named(principal));
        }
        self.named.push(NamedEntry { principal, perms });
        Ok(())
    }

    pub(crate) fn push_note(&mut self, anchor: Option<EntryKey>, text: &str) {
        self.notes.push(Note {
            anchor,
            text: text.to_owned(),
        });
    }

    /// Drops blank lines that come before the first entry.
    pub(crate) fn drop_leading_blanks(&mut self) {
        self.notes
            .retain(|note| note.anchor.is_some() || !note.is_blank());
    }

    pub(crate) fn set_owner(&mut self, perms: AclPerms) {
        self.owner = Some(perms);
    }

    pub(crate) fn set_owning_group(&mut self, perms: AclPerms) {
        self.group = Some(perms);
    }

    pub(crate) fn set_other(&mut self, perms: AclPerms) {
        self.other = Some(perms);
    }

    /// Fills whichever base entries are missing.
    pub(crate) fn seed_base(&mut self, owner: AclPerms, group: AclPerms, other: AclPerms) {
        self.owner.get_or_insert(owner);
        self.group.get_or_insert(group);
        self.other.get_or_insert(other);
    }

    /// Replaces the perms of an existing entry in place or appends a new one.
    pub(crate) fn upsert_named(&mut self, principal: Principal, perms: AclPerms) {
        match self.named.iter_mut().find(|entry| entry.principal == principal) {
            Some(entry) => entry.perms = perms,
            None => self.named.push(NamedEntry { principal, perms }),
        }
    }

    /// Removes the entry for `principal`, handing its comments to the entry
    /// emitted just before it. Returns `false` if there was no such entry.
    pub(crate) fn remove_named(&mut self, principal: &Principal) -> bool {
        let Some(index) = self
            .named
            .iter()
            .position(|entry| &entry.principal == principal)
        else {
            return false;
        };

        let removed = EntryKey::Named(principal.clone());
        let keys = self.emission_keys();
        let predecessor = keys
            .iter()
            .position(|key| *key == removed)
            .and_then(|position| position.checked_sub(1))
            .map(|position| keys[position].clone());
        for note in &mut self.notes {
            if note.anchor.as_ref() == Some(&removed) {
                note.anchor.clone_from(&predecessor);
            }
        }

        self.named.remove(index);
        true
    }

    pub(crate) fn pin_mask(&mut self, perms: AclPerms) {
        self.mask = MaskState::Pinned(perms);
    }

    /// Drops every named entry and releases any loaded or pinned mask.
    pub(crate) fn clear_extended(&mut self) {
        self.named.clear();
        self.mask = MaskState::Derived;
    }

    /// Returns the mask to derived mode unless it is pinned.
    pub(crate) fn recompute_mask(&mut self) {
        if !matches!(self.mask, MaskState::Pinned(_)) {
            self.mask = MaskState::Derived;
        }
    }

    /// Restores the canonical form after decoding or editing.
    ///
    /// A loaded mask equal to the derived value becomes derived. Comments
    /// anchored to entries that are no longer emitted move to the nearest
    /// preceding entry. Comments are ordered by the position of their anchor,
    /// and blank lines that would end the collection are dropped.
    pub(crate) fn normalize(&mut self) {
        if let MaskState::Loaded(perms) = self.mask {
            if perms == self.derived_mask() {
                self.mask = MaskState::Derived;
            }
        }

        let keys = self.emission_keys();
        for note in &mut self.notes {
            let dangling = note.anchor.as_ref().filter(|anchor| !keys.contains(anchor));
            if let Some(rank) = dangling.map(EntryKey::rank) {
                note.anchor = keys.iter().rev().find(|key| key.rank() < rank).cloned();
            }
        }

        let position = |note: &Note| {
            note.anchor.as_ref().map_or(0, |anchor| {
                keys.iter()
                    .position(|key| key == anchor)
                    .map_or(0, |index| index + 1)
            })
        };
        self.notes.sort_by_key(position);

        let last = keys.len();
        while self
            .notes
            .last()
            .is_some_and(|note| note.is_blank() && position(note) == last)
        {
            self.notes.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perms(text: &str) -> AclPerms {
        text.parse().expect("valid perms")
    }

    fn base() -> AclSet {
        let mut set = AclSet::default();
        set.seed_base(perms("rwxc"), perms("r-x-"), perms("----"));
        set
    }

    #[test]
    fn derived_mask_tracks_owning_group_without_named_entries() {
        let mut set = base();
        assert_eq!(set.mask(), Some(perms("r-x-")));
        set.set_owning_group(perms("rw--"));
        assert_eq!(set.mask(), Some(perms("rw--")));
        assert!(set.entries().iter().all(|entry| !matches!(entry, AclEntry::Mask(_))));
    }

    #[test]
    fn mask_line_appears_with_named_entries() {
        let mut set = base();
        set.upsert_named(Principal::user("bob"), perms("rw--"));
        let entries = set.entries();
        assert_eq!(entries[3], AclEntry::Mask(perms("rwx-")));
        assert_eq!(set.effective_perms(&Principal::user("bob")), Some(perms("rw--")));
    }

    #[test]
    fn upsert_keeps_position() {
        let mut set = base();
        set.upsert_named(Principal::user("a"), perms("r---"));
        set.upsert_named(Principal::group("b"), perms("r---"));
        set.upsert_named(Principal::user("a"), perms("rw--"));
        let names: Vec<_> = set.named().iter().map(|e| e.principal().to_string()).collect();
        assert_eq!(names, ["user:a", "group:b"]);
        assert_eq!(set.named_perms(&Principal::user("a")), Some(perms("rw--")));
    }

    #[test]
    fn pinned_mask_survives_recompute() {
        let mut set = base();
        set.pin_mask(perms("r---"));
        set.upsert_named(Principal::user("a"), perms("rwx-"));
        set.recompute_mask();
        assert_eq!(set.mask(), Some(perms("r---")));
        assert_eq!(set.effective_perms(&Principal::user("a")), Some(perms("r---")));
        set.clear_extended();
        assert_eq!(set.mask_state(), MaskState::Derived);
    }

    #[test]
    fn loaded_mask_equal_to_derived_collapses() {
        let mut set = base();
        set.insert_decoded(AclEntry::Mask(perms("r-x-"))).expect("mask");
        set.normalize();
        assert_eq!(set.mask_state(), MaskState::Derived);
    }

    #[test]
    fn removed_entry_hands_notes_to_predecessor() {
        let mut set = base();
        set.upsert_named(Principal::user("a"), perms("r---"));
        set.upsert_named(Principal::user("b"), perms("r---"));
        set.push_note(Some(EntryKey::Named(Principal::user("b"))), "# about b");
        assert!(set.remove_named(&Principal::user("b")));
        set.normalize();
        let anchors: Vec<_> = set.notes().map(|note| note.anchor.clone()).collect();
        assert_eq!(anchors, [Some(EntryKey::Named(Principal::user("a")))]);
        assert!(!set.remove_named(&Principal::user("b")));
    }

    #[test]
    fn trailing_blank_lines_are_dropped() {
        let mut set = base();
        set.push_note(Some(EntryKey::Other), "# keep");
        set.push_note(Some(EntryKey::Other), "");
        set.push_note(Some(EntryKey::OwningGroup), "");
        set.normalize();
        let texts: Vec<_> = set.notes().map(|note| note.text.as_str()).collect();
        assert_eq!(texts, ["", "# keep"]);
    }

    #[test]
    fn duplicate_singletons_conflict() {
        let mut set = AclSet::default();
        set.insert_decoded(AclEntry::Other(AclPerms::NONE)).expect("first");
        assert!(matches!(
            set.insert_decoded(AclEntry::Other(AclPerms::NONE)),
            Err(Conflict::Singleton("other::"))
        ));
    }
}
