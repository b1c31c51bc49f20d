//! Flag enums and level structures for info and debug verbosity.

/// Info flags for user-facing progress categories.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InfoFlag {
    /// ACL changes written, or that would be written in dry-run mode.
    Apply,
    /// Paths as they are processed.
    Name,
    /// Entries skipped during recursion.
    Skip,
    /// End-of-run summary.
    Stats,
}

impl InfoFlag {
    /// Every info flag, in the order they are listed in help output.
    pub const ALL: [Self; 4] = [Self::Apply, Self::Name, Self::Skip, Self::Stats];

    /// The token accepted by `--info`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Apply => "apply",
            Self::Name => "name",
            Self::Skip => "skip",
            Self::Stats => "stats",
        }
    }
}

/// Debug flags for internal diagnostic categories.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DebugFlag {
    /// ACL model edits and mask decisions.
    Acl,
    /// External command execution.
    Cmd,
    /// ACL text decoding.
    Codec,
    /// Exit status and cleanup.
    Exit,
    /// Directory traversal.
    Walk,
}

impl DebugFlag {
    /// Every debug flag, in the order they are listed in help output.
    pub const ALL: [Self; 5] = [Self::Acl, Self::Cmd, Self::Codec, Self::Exit, Self::Walk];

    /// The token accepted by `--debug`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Acl => "acl",
            Self::Cmd => "cmd",
            Self::Codec => "codec",
            Self::Exit => "exit",
            Self::Walk => "walk",
        }
    }
}

/// Info verbosity levels for each flag.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InfoLevels {
    /// Applied change level.
    pub apply: u8,
    /// Path name level.
    pub name: u8,
    /// Skipped entry level.
    pub skip: u8,
    /// Summary level.
    pub stats: u8,
}

impl InfoLevels {
    /// Get the level for a specific flag.
    pub fn get(&self, flag: InfoFlag) -> u8 {
        match flag {
            InfoFlag::Apply => self.apply,
            InfoFlag::Name => self.name,
            InfoFlag::Skip => self.skip,
            InfoFlag::Stats => self.stats,
        }
    }

    /// Set the level for a specific flag.
    pub fn set(&mut self, flag: InfoFlag, level: u8) {
        match flag {
            InfoFlag::Apply => self.apply = level,
            InfoFlag::Name => self.name = level,
            InfoFlag::Skip => self.skip = level,
            InfoFlag::Stats => self.stats = level,
        }
    }

    /// Set all flags to the specified level.
    pub fn set_all(&mut self, level: u8) {
        for flag in InfoFlag::ALL {
            self.set(flag, level);
        }
    }
}

/// Debug verbosity levels for each flag.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DebugLevels {
    /// ACL model level.
    pub acl: u8,
    /// Command execution level.
    pub cmd: u8,
    /// Text codec level.
    pub codec: u8,
    /// Exit status level.
    pub exit: u8,
    /// Traversal level.
    pub walk: u8,
}

impl DebugLevels {
    /// Get the level for a specific flag.
    pub fn get(&self, flag: DebugFlag) -> u8 {
        match flag {
            DebugFlag::Acl => self.acl,
            DebugFlag::Cmd => self.cmd,
            DebugFlag::Codec => self.codec,
            DebugFlag::Exit => self.exit,
            DebugFlag::Walk => self.walk,
        }
    }

    /// Set the level for a specific flag.
    pub fn set(&mut self, flag: DebugFlag, level: u8) {
        match flag {
            DebugFlag::Acl => self.acl = level,
            DebugFlag::Cmd => self.cmd = level,
            DebugFlag::Codec => self.codec = level,
            DebugFlag::Exit => self.exit = level,
            DebugFlag::Walk => self.walk = level,
        }
    }

    /// Set all flags to the specified level.
    pub fn set_all(&mut self, level: u8) {
        for flag in DebugFlag::ALL {
            self.set(flag, level);
        }
    }
}
