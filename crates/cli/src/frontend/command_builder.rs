use clap::{Arg, ArgAction, Command as ClapCommand, builder::OsStringValueParser};

pub(crate) fn clap_command(program_name: &'static str) -> ClapCommand {
    let command = ClapCommand::new(program_name)
        .about("Show and edit POSIX ACLs on SpectrumScale (GPFS) filesystems.")
        .override_usage(format!("{program_name} [OPTIONS] PATH..."))
        .disable_help_flag(true)
        .disable_version_flag(true);
    let command = output_arguments(command);
    let command = edit_arguments(command);
    let command = run_arguments(command);
    command.arg(
        Arg::new("paths")
            .value_name("PATH")
            .help("Files or directories to process.")
            .num_args(0..)
            .action(ArgAction::Append)
            .value_parser(OsStringValueParser::new()),
    )
}

fn output_arguments(command: ClapCommand) -> ClapCommand {
    command
        .arg(
            Arg::new("help")
                .long("help")
                .short('h')
                .help("Show this help message and exit.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("version")
                .long("version")
                .short('V')
                .help("Output version information and exit.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list")
                .long("list")
                .short('l')
                .help("Print the ACL of each path after any edits.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the ACL of each path as one JSON object per line.")
                .action(ArgAction::SetTrue)
                .conflicts_with("list"),
        )
}

fn perm_argument(id: &'static str, long: &'static str, help: &'static str) -> Arg {
    Arg::new(id)
        .long(long)
        .value_name("PERM")
        .help(help)
        .num_args(1)
        .action(ArgAction::Set)
}

fn edit_arguments(command: ClapCommand) -> ClapCommand {
    command
        .arg(
            Arg::new("add-user")
                .long("add-user")
                .short('u')
                .value_name("NAME:PERM")
                .help("Add a named user entry, or replace its permissions.")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("add-group")
                .long("add-group")
                .short('g')
                .value_name("NAME:PERM")
                .help("Add a named group entry, or replace its permissions.")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("remove-user")
                .long("remove-user")
                .value_name("NAME")
                .help("Remove a named user entry.")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("remove-group")
                .long("remove-group")
                .value_name("NAME")
                .help("Remove a named group entry.")
                .action(ArgAction::Append),
        )
        .arg(perm_argument(
            "user-perms",
            "user-perms",
            "Replace the owning user's permissions.",
        ))
        .arg(perm_argument(
            "group-perms",
            "group-perms",
            "Replace the owning group's permissions.",
        ))
        .arg(perm_argument(
            "other-perms",
            "other-perms",
            "Replace the permissions of everyone else.",
        ))
        .arg(perm_argument(
            "mask",
            "mask",
            "Fix the mask at PERM instead of deriving it.",
        ))
        .arg(
            Arg::new("clear")
                .long("clear")
                .help("Remove every named entry before other edits.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("default")
                .long("default")
                .short('d')
                .help("Edit the default ACL of directories instead of the access ACL.")
                .action(ArgAction::SetTrue),
        )
}

fn run_arguments(command: ClapCommand) -> ClapCommand {
    command
        .arg(
            Arg::new("recursive")
                .long("recursive")
                .short('r')
                .help("Also process every entry below each directory.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .short('n')
                .help("Fetch and edit, but only log the commands that would apply changes.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("jobs")
                .long("jobs")
                .short('j')
                .value_name("N")
                .help("Process up to N paths at once.")
                .num_args(1)
                .value_parser(clap::value_parser!(u16).range(1..)),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Increase verbosity; repeat for more detail.")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("info")
                .long("info")
                .value_name("FLAGS")
                .help("Fine-grained informational output (apply, name, skip, stats).")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .value_name("FLAGS")
                .help("Fine-grained debug output (acl, cmd, codec, exit, walk).")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("mmgetacl")
                .long("mmgetacl")
                .value_name("PATH")
                .help("Location of mmgetacl (default: $SSACL_MMGETACL or /usr/lpp/mmfs/bin/mmgetacl).")
                .num_args(1)
                .value_parser(OsStringValueParser::new()),
        )
        .arg(
            Arg::new("mmputacl")
                .long("mmputacl")
                .value_name("PATH")
                .help("Location of mmputacl (default: $SSACL_MMPUTACL or /usr/lpp/mmfs/bin/mmputacl).")
                .num_args(1)
                .value_parser(OsStringValueParser::new()),
        )
}
