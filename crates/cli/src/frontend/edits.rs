use std::path::Path;

use acl::{AclError, AclKind, AclModel, AclPerms, Principal};
use logging::trace_skip;

/// The edits requested on the command line.
///
/// [`EditPlan::apply`] runs them in a fixed order regardless of how the
/// options were given: clear, base permissions, removals, additions, mask.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct EditPlan {
    pub(crate) clear: bool,
    pub(crate) owner: Option<AclPerms>,
    pub(crate) group: Option<AclPerms>,
    pub(crate) other: Option<AclPerms>,
    pub(crate) remove: Vec<Principal>,
    pub(crate) add: Vec<(Principal, AclPerms)>,
    pub(crate) mask: Option<AclPerms>,
}

impl EditPlan {
    pub(crate) fn is_empty(&self) -> bool {
        !self.clear
            && self.owner.is_none()
            && self.group.is_none()
            && self.other.is_none()
            && self.remove.is_empty()
            && self.add.is_empty()
            && self.mask.is_none()
    }

    /// Applies the plan to one collection of `model`.
    ///
    /// Removing an entry that is not present is logged and skipped, so one
    /// plan can run over a whole tree.
    pub(crate) fn apply(&self, model: &mut AclModel, kind: AclKind) -> Result<(), AclError> {
        if self.clear {
            model.clear_all(kind)?;
        }
        if let Some(perms) = self.owner {
            model.set_owner_perm(kind, perms)?;
        }
        if let Some(perms) = self.group {
            model.set_group_perm(kind, perms)?;
        }
        if let Some(perms) = self.other {
            model.set_other_perm(kind, perms)?;
        }
        for principal in &self.remove {
            match model.remove_named(kind, principal) {
                Ok(()) => {}
                Err(AclError::EntryNotFound { .. }) => {
                    skip_missing(model.target().path(), kind, principal);
                }
                Err(error) => return Err(error),
            }
        }
        for (principal, perms) in &self.add {
            model.add_named(kind, principal.clone(), *perms)?;
        }
        if let Some(perms) = self.mask {
            model.pin_mask(kind, perms)?;
        }
        Ok(())
    }
}

fn skip_missing(path: &Path, kind: AclKind, principal: &Principal) {
    trace_skip!(
        path = %path.display(),
        "no {kind} entry for {principal}, nothing to remove"
    );
}
