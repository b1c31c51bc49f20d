#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `acl` models the POSIX-style access control lists that IBM SpectrumScale
//! (GPFS) exposes through `mmgetacl` and `mmputacl`. Text fetched from the
//! filesystem is decoded into an [`AclModel`], edited through a small set of
//! operations, and encoded back into text that `mmputacl` accepts.
//!
//! # Design
//!
//! - [`AclPerms`] is a four-slot bit set (`rwxc`) with strict parsing.
//! - [`AclSet`] holds one collection: optional owner, owning group and other
//!   entries, named users and groups in insertion order, a [`MaskState`],
//!   and the comment lines found between entries.
//! - [`AclModel`] pairs the access collection with the optional default
//!   collection of a directory and exposes the edit operations.
//! - [`codec`] converts between text and models.
//! - [`AclGateway`] is the seam to the filesystem. The `mmfs` crate
//!   implements it with the GPFS command-line tools; tests use an in-memory
//!   implementation.
//!
//! # Invariants
//!
//! - A collection holds at most one owner, owning group, other and mask
//!   entry, and at most one entry per named user or group.
//! - Unless pinned, the mask equals the union of the owning group and every
//!   named entry. It is written only when named entries exist or when its
//!   value differs from that union.
//! - Decoding the encoding of a decoded model yields an equal model.
//! - Default collections exist only on directory targets.
//!
//! # Errors
//!
//! Decoding and editing report [`AclError`]. Gateway failures are
//! [`GatewayError`], and the fetch and apply helpers combine both in
//! [`ExchangeError`].
//!
//! # Examples
//!
//! ```
//! use acl::{AclKind, AclModel, AclTarget};
//!
//! let text = "user::rwxc\ngroup::r-x-\nother::----\n";
//! let mut model = AclModel::decode(AclTarget::file("/gpfs/data/report.csv"), text)?;
//! model.add_named_group(AclKind::Access, "nfsnobody", "r-x-".parse()?)?;
//!
//! assert_eq!(
//!     model.encode(),
//!     "user::rwxc\ngroup::r-x-\nother::----\nmask::r-x-\ngroup:nfsnobody:r-x- #effective:r-x-\n"
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod codec;
mod entry;
mod error;
mod gateway;
mod model;
mod perms;
#[cfg(feature = "serde")]
mod snapshot;

pub use entry::{AclEntry, AclKind, DEFAULT_PREFIX, EntryKey, Principal};
pub use error::{AclError, LineRef};
pub use gateway::{
    AclGateway, ExchangeError, GatewayError, apply_model, fetch_model, fetch_parent_default,
};
pub use model::{
    AclMetadata, AclModel, AclSet, AclTarget, MaskState, NamedEntry, ObjectKind, SEED_GROUP,
    SEED_OTHER, SEED_OWNER,
};
pub use perms::{AclPerms, PERMS_LEN, PermsError};
#[cfg(feature = "serde")]
pub use snapshot::{AclSnapshot, CollectionSnapshot, NamedSnapshot};
