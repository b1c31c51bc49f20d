use crate::entry::AclKind;
use crate::model::{AclMetadata, AclModel, AclSet};

use super::EFFECTIVE_TAG;

pub(super) fn encode_model(model: &AclModel) -> String {
    let mut out = String::new();
    write_metadata(&mut out, model.metadata());
    write_set(&mut out, model.access(), AclKind::Access.line_prefix());

    if let Some(default) = model.default_acl().filter(|set| set.has_entries()) {
        out.push('\n');
        write_set(&mut out, default, AclKind::Default.line_prefix());
    }
    out
}

/// Renders a single collection with no line prefix.
pub(crate) fn encode_collection(metadata: &[AclMetadata], set: &AclSet) -> String {
    let mut out = String::new();
    write_metadata(&mut out, metadata);
    write_set(&mut out, set, "");
    out
}

fn write_metadata(out: &mut String, metadata: &[AclMetadata]) {
    for meta in metadata {
        push_line(out, &meta.to_string());
    }
}

fn write_set(out: &mut String, set: &AclSet, prefix: &str) {
    for note in set.notes().filter(|note| note.anchor.is_none()) {
        if prefix.is_empty() {
            push_line(out, &note.text);
        } else if !note.text.trim().is_empty() {
            out.push_str(prefix);
            push_line(out, &note.text);
        }
    }

    let mask = set.mask();
    for entry in set.entries() {
        out.push_str(prefix);
        out.push_str(&entry.to_string());
        if let Some(mask) = mask.filter(|_| entry.is_named()) {
            out.push(' ');
            out.push_str(EFFECTIVE_TAG);
            out.push_str(&entry.perms().intersect(mask).to_string());
        }
        out.push('\n');

        let key = entry.key();
        for note in set.notes().filter(|note| note.anchor.as_ref() == Some(&key)) {
            push_line(out, &note.text);
        }
    }
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}
