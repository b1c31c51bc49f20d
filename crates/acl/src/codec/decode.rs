use logging::trace_codec;

use crate::entry::{AclEntry, AclKind, DEFAULT_PREFIX, EntryKey, Principal};
use crate::error::{AclError, LineRef};
use crate::model::{AclMetadata, AclSet, Conflict};
use crate::perms::AclPerms;

use super::EFFECTIVE_KEY;

pub(super) struct Decoded {
    pub(super) metadata: Vec<AclMetadata>,
    pub(super) access: AclSet,
    pub(super) default: Option<AclSet>,
}

pub(super) fn decode_combined(text: &str) -> Result<Decoded, AclError> {
    Decoder::new(None).run(text)
}

/// Decodes text fetched for a default ACL. Every entry lands in the default
/// collection, prefixed or not.
pub(crate) fn decode_default(text: &str) -> Result<(Vec<AclMetadata>, AclSet), AclError> {
    let decoded = Decoder::new(Some(AclKind::Default)).run(text)?;
    let mut set = decoded.default.unwrap_or_default();
    set.drop_leading_blanks();
    Ok((decoded.metadata, set))
}

struct Decoder {
    forced: Option<AclKind>,
    metadata: Vec<AclMetadata>,
    access: AclSet,
    default: Option<AclSet>,
    section: AclKind,
    last_access: Option<EntryKey>,
    last_default: Option<EntryKey>,
}

impl Decoder {
    fn new(forced: Option<AclKind>) -> Self {
        Self {
            forced,
            metadata: Vec::new(),
            access: AclSet::default(),
            default: forced.map(|_| AclSet::default()),
            section: forced.unwrap_or(AclKind::Access),
            last_access: None,
            last_default: None,
        }
    }

    fn run(mut self, text: &str) -> Result<Decoded, AclError> {
        // `lines` strips a trailing `\r` along with the `\n`.
        for (index, line) in text.lines().enumerate() {
            self.line(index + 1, line)?;
        }

        self.access.normalize();
        if let Some(default) = self.default.as_mut() {
            default.normalize();
        }
        trace_codec!(
            lines = text.lines().count(),
            named = self.access.named().len(),
            has_default = self.default.is_some(),
            "decoded ACL text"
        );
        Ok(Decoded {
            metadata: self.metadata,
            access: self.access,
            default: self.default,
        })
    }

    fn line(&mut self, number: usize, line: &str) -> Result<(), AclError> {
        // `default:#...` is a comment opening the default section.
        if let Some(comment) = line
            .trim_start()
            .strip_prefix(DEFAULT_PREFIX)
            .filter(|rest| rest.trim_start().starts_with('#'))
        {
            self.section = AclKind::Default;
            self.note(comment);
            return Ok(());
        }

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            match AclMetadata::parse(trimmed) {
                Some(meta) if !self.metadata.iter().any(|known| known.same_kind(&meta)) => {
                    self.metadata.push(meta);
                }
                _ => self.note(line),
            }
            return Ok(());
        }

        let (kind, body) = match trimmed.strip_prefix(DEFAULT_PREFIX) {
            Some(rest) => (AclKind::Default, rest),
            None => (AclKind::Access, trimmed),
        };
        let kind = self.forced.unwrap_or(kind);

        let entry = parse_entry(body).map_err(|error| error.at(LineRef::new(number, line)))?;
        let key = entry.key();
        self.collection(kind)
            .insert_decoded(entry)
            .map_err(|conflict| match conflict {
                Conflict::Singleton(entry) => AclError::DuplicateSingletonEntry {
                    entry,
                    at: LineRef::new(number, line),
                },
                Conflict::Named(principal) => AclError::DuplicateNamedEntry {
                    principal,
                    at: LineRef::new(number, line),
                },
            })?;

        self.section = kind;
        match kind {
            AclKind::Access => self.last_access = Some(key),
            AclKind::Default => self.last_default = Some(key),
        }
        Ok(())
    }

    fn note(&mut self, line: &str) {
        let anchor = match self.section {
            AclKind::Access => self.last_access.clone(),
            AclKind::Default => self.last_default.clone(),
        };
        self.collection(self.section).push_note(anchor, line);
    }

    fn collection(&mut self, kind: AclKind) -> &mut AclSet {
        match kind {
            AclKind::Access => &mut self.access,
            AclKind::Default => self.default.get_or_insert_with(AclSet::default),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub(super) enum EntryError {
    Unrecognized,
    Perms(String),
}

impl EntryError {
    fn at(self, at: LineRef) -> AclError {
        match self {
            Self::Unrecognized => AclError::UnrecognizedAclLine { at },
            Self::Perms(perms) => AclError::InvalidPermissionFormat {
                perms,
                at: Some(at),
            },
        }
    }
}

enum Tag {
    Owner,
    OwningGroup,
    Other,
    Mask,
    Named(Principal),
}

fn parse_perms(text: &str) -> Result<AclPerms, EntryError> {
    let text = text.trim();
    text.parse()
        .map_err(|_| EntryError::Perms(text.to_owned()))
}

/// Parses the body of an entry line, after any `default:` prefix.
pub(super) fn parse_entry(body: &str) -> Result<AclEntry, EntryError> {
    let (content, annotation) = match body.split_once('#') {
        Some((content, annotation)) => (content, Some(annotation)),
        None => (body, None),
    };

    let fields: Vec<&str> = content.split(':').collect();
    let [tag, qualifier, perms] = fields.as_slice() else {
        return Err(EntryError::Unrecognized);
    };
    let qualifier = qualifier.trim();
    let tag = match (tag.trim(), qualifier.is_empty()) {
        ("user", true) => Tag::Owner,
        ("group", true) => Tag::OwningGroup,
        ("other", true) => Tag::Other,
        ("mask", true) => Tag::Mask,
        ("user", false) => Tag::Named(Principal::user(qualifier)),
        ("group", false) => Tag::Named(Principal::group(qualifier)),
        _ => return Err(EntryError::Unrecognized),
    };
    let perms = parse_perms(perms)?;

    if let Some(annotation) = annotation {
        let annotated = matches!(tag, Tag::OwningGroup | Tag::Named(_));
        let effective = annotation
            .trim()
            .strip_prefix(EFFECTIVE_KEY)
            .filter(|_| annotated)
            .ok_or(EntryError::Unrecognized)?;
        parse_perms(effective)?;
    }

    Ok(match tag {
        Tag::Owner => AclEntry::Owner(perms),
        Tag::OwningGroup => AclEntry::Group(perms),
        Tag::Other => AclEntry::Other(perms),
        Tag::Mask => AclEntry::Mask(perms),
        Tag::Named(principal) => AclEntry::named(principal, perms),
    })
}
