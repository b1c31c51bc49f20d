use std::ffi::OsString;
use std::path::PathBuf;

use acl::{AclPerms, Principal};
use clap::ArgMatches;
use logging::VerbosityConfig;
use mmfs::MmfsConfig;

use super::command_builder::clap_command;
use super::edits::EditPlan;
use crate::error::UsageError;

pub(crate) const PROGRAM_NAME: &str = "ssacl";

/// Everything `ssacl` was asked to do.
#[derive(Clone, Debug)]
pub(crate) struct ParsedArgs {
    pub(crate) show_help: bool,
    pub(crate) show_version: bool,
    pub(crate) list: bool,
    pub(crate) json: bool,
    pub(crate) default_acl: bool,
    pub(crate) recursive: bool,
    pub(crate) dry_run: bool,
    pub(crate) jobs: Option<usize>,
    pub(crate) edits: EditPlan,
    pub(crate) verbosity: VerbosityConfig,
    pub(crate) mmfs: MmfsConfig,
    pub(crate) paths: Vec<PathBuf>,
}

impl ParsedArgs {
    /// Listing is implied when nothing else was requested.
    pub(crate) fn lists(&self) -> bool {
        self.list || (!self.json && self.edits.is_empty())
    }
}

pub(crate) fn parse_args<I, S>(arguments: I) -> Result<ParsedArgs, UsageError>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut args: Vec<OsString> = arguments.into_iter().map(Into::into).collect();
    if args.is_empty() {
        args.push(OsString::from(PROGRAM_NAME));
    }
    let mut matches = clap_command(PROGRAM_NAME).try_get_matches_from(args)?;

    let show_help = matches.get_flag("help");
    let show_version = matches.get_flag("version");
    let verbosity = parse_verbosity(&mut matches)?;
    let dry_run = matches.get_flag("dry-run");

    let mut mmfs = MmfsConfig::from_env().with_dry_run(dry_run);
    if let Some(path) = take_path(&mut matches, "mmgetacl") {
        mmfs = mmfs.with_mmgetacl(path);
    }
    if let Some(path) = take_path(&mut matches, "mmputacl") {
        mmfs = mmfs.with_mmputacl(path);
    }

    let edits = EditPlan {
        clear: matches.get_flag("clear"),
        owner: take_perms(&mut matches, "user-perms", "--user-perms")?,
        group: take_perms(&mut matches, "group-perms", "--group-perms")?,
        other: take_perms(&mut matches, "other-perms", "--other-perms")?,
        remove: take_removals(&mut matches)?,
        add: take_additions(&mut matches)?,
        mask: take_perms(&mut matches, "mask", "--mask")?,
    };

    let paths: Vec<PathBuf> = matches
        .remove_many::<OsString>("paths")
        .map(|values| values.map(PathBuf::from).collect())
        .unwrap_or_default();
    if paths.is_empty() && !show_help && !show_version {
        return Err(UsageError::MissingPaths);
    }

    Ok(ParsedArgs {
        show_help,
        show_version,
        list: matches.get_flag("list"),
        json: matches.get_flag("json"),
        default_acl: matches.get_flag("default"),
        recursive: matches.get_flag("recursive"),
        dry_run,
        jobs: matches.remove_one::<u16>("jobs").map(usize::from),
        edits,
        verbosity,
        mmfs,
        paths,
    })
}

/// Builds the verbosity from `-v`, `--info` and `--debug`.
pub(crate) fn parse_verbosity(matches: &mut ArgMatches) -> Result<VerbosityConfig, UsageError> {
    let mut config = VerbosityConfig::from_verbose_level(matches.get_count("verbose"));
    if let Some(lists) = matches.remove_many::<String>("info") {
        for list in lists {
            config.apply_info_list(&list).map_err(UsageError::Verbosity)?;
        }
    }
    if let Some(lists) = matches.remove_many::<String>("debug") {
        for list in lists {
            config.apply_debug_list(&list).map_err(UsageError::Verbosity)?;
        }
    }
    Ok(config)
}

pub(crate) fn take_path(matches: &mut ArgMatches, id: &str) -> Option<OsString> {
    matches
        .remove_one::<OsString>(id)
        .filter(|value| !value.is_empty())
}

fn take_perms(
    matches: &mut ArgMatches,
    id: &str,
    option: &'static str,
) -> Result<Option<AclPerms>, UsageError> {
    matches
        .remove_one::<String>(id)
        .map(|value| parse_perms(option, &value))
        .transpose()
}

fn parse_perms(option: &'static str, value: &str) -> Result<AclPerms, UsageError> {
    value.parse().map_err(|error: acl::PermsError| UsageError::InvalidValue {
        option,
        value: value.to_owned(),
        reason: error.to_string(),
    })
}

fn take_removals(matches: &mut ArgMatches) -> Result<Vec<Principal>, UsageError> {
    let users = take_names(matches, "remove-user", "--remove-user")?
        .into_iter()
        .map(Principal::user);
    let groups = take_names(matches, "remove-group", "--remove-group")?
        .into_iter()
        .map(Principal::group);
    Ok(users.chain(groups).collect())
}

fn take_names(
    matches: &mut ArgMatches,
    id: &str,
    option: &'static str,
) -> Result<Vec<String>, UsageError> {
    let names = take_values(matches, id);
    for name in &names {
        check_name(option, name, name)?;
    }
    Ok(names)
}

fn take_additions(matches: &mut ArgMatches) -> Result<Vec<(Principal, AclPerms)>, UsageError> {
    let mut additions = Vec::new();
    for value in take_values(matches, "add-user") {
        let (name, perms) = parse_named_perms("--add-user", &value)?;
        additions.push((Principal::user(name), perms));
    }
    for value in take_values(matches, "add-group") {
        let (name, perms) = parse_named_perms("--add-group", &value)?;
        additions.push((Principal::group(name), perms));
    }
    Ok(additions)
}

fn take_values(matches: &mut ArgMatches, id: &str) -> Vec<String> {
    matches
        .remove_many::<String>(id)
        .map(Iterator::collect)
        .unwrap_or_default()
}

/// Splits `NAME:PERM` at its last colon.
pub(crate) fn parse_named_perms(
    option: &'static str,
    value: &str,
) -> Result<(String, AclPerms), UsageError> {
    let Some((name, perms)) = value.rsplit_once(':') else {
        return Err(UsageError::InvalidValue {
            option,
            value: value.to_owned(),
            reason: "expected NAME:PERM".to_owned(),
        });
    };
    check_name(option, value, name)?;
    let perms = parse_perms(option, perms)?;
    Ok((name.to_owned(), perms))
}

fn check_name(option: &'static str, value: &str, name: &str) -> Result<(), UsageError> {
    if Principal::is_valid_name(name) {
        Ok(())
    } else {
        Err(UsageError::InvalidValue {
            option,
            value: value.to_owned(),
            reason: format!("'{name}' is not a valid user or group name"),
        })
    }
}
