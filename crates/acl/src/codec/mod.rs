//! crates/acl/src/codec/mod.rs
//!
//! Line-oriented ACL text format.
//!
//! # Format
//!
//! ```text
//! #owner:smithj
//! #group:staff
//! user::rwxc
//! group::r-x-
//! other::----
//! mask::r-x-
//! group:nfsnobody:r-x- #effective:r-x-
//!
//! default:user::rwxc
//! default:group::r-x-
//! default:other::----
//! ```
//!
//! Each entry is `tag:qualifier:perms`. The qualifier is empty for the owning
//! user, owning group, other and mask. Named entries and the owning group may
//! carry a trailing `#effective:<perms>` annotation; it is checked on input
//! and recomputed on output. Lines starting with `#` are comments, except the
//! first `#owner:` and `#group:` lines, which record ownership. Comments and
//! blank lines are preserved next to the entry they followed.

mod decode;
mod encode;


pub(crate) use self::decode::decode_default;
pub(crate) use self::encode::encode_collection;

use crate::error::AclError;
use crate::model::{AclModel, AclTarget};

/// Annotation written after named entries.
pub const EFFECTIVE_TAG: &str = "#effective:";
const EFFECTIVE_KEY: &str = "effective:";

/// Decodes combined ACL text for `target`.
///
/// `\r\n` line endings and whitespace around fields are accepted. Errors
/// carry the one-based number and text of the offending line.
pub fn decode(target: AclTarget, text: &str) -> Result<AclModel, AclError> {
    let decoded = decode::decode_combined(text)?;
    if decoded.default.is_some() && !target.is_directory() {
        return Err(AclError::NotDirectory {
            path: target.path().to_path_buf(),
        });
    }
    Ok(AclModel::from_parts(
        target,
        decoded.metadata,
        decoded.access,
        decoded.default,
    ))
}

/// Renders `model` as combined text.
///
/// For any model produced by [`decode`], decoding the output yields an equal
/// model.
#[must_use]
pub fn encode(model: &AclModel) -> String {
    encode::encode_model(model)
}
