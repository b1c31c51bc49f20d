//! Verbosity configuration combining info and debug levels.

use super::levels::{DebugFlag, DebugLevels, InfoFlag, InfoLevels};

/// Combined verbosity configuration for info and debug flags.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VerbosityConfig {
    /// Info flag levels.
    pub info: InfoLevels,
    /// Debug flag levels.
    pub debug: DebugLevels,
}

impl VerbosityConfig {
    /// Create a configuration from the number of `-v` flags.
    ///
    /// Warnings and errors are shown at every level. One `-v` reports applied
    /// changes, skips and the summary; two add path names and command and
    /// ACL diagnostics; three add codec, traversal and exit diagnostics; four
    /// or more raise every debug flag to level 2.
    pub fn from_verbose_level(level: u8) -> Self {
        let mut config = Self::default();

        if level >= 1 {
            config.info.apply = 1;
            config.info.skip = 1;
            config.info.stats = 1;
        }
        if level >= 2 {
            config.info.name = 1;
            config.debug.acl = 1;
            config.debug.cmd = 1;
        }
        if level >= 3 {
            config.info.skip = 2;
            config.debug.codec = 1;
            config.debug.exit = 1;
            config.debug.walk = 1;
        }
        if level >= 4 {
            config.info.set_all(2);
            config.debug.set_all(2);
        }

        config
    }

    /// Apply a single info flag token (e.g., "apply", "name2", "all0").
    pub fn apply_info_flag(&mut self, token: &str) -> Result<(), String> {
        let (name, level) = parse_flag_token(token)?;

        if name.eq_ignore_ascii_case("all") {
            self.info.set_all(level);
            return Ok(());
        }
        let flag = InfoFlag::ALL
            .into_iter()
            .find(|flag| flag.name() == name)
            .ok_or_else(|| format!("unknown info flag: {name}"))?;

        self.info.set(flag, level);
        Ok(())
    }

    /// Apply a single debug flag token (e.g., "cmd", "acl2", "all").
    pub fn apply_debug_flag(&mut self, token: &str) -> Result<(), String> {
        let (name, level) = parse_flag_token(token)?;

        if name.eq_ignore_ascii_case("all") {
            self.debug.set_all(level);
            return Ok(());
        }
        let flag = DebugFlag::ALL
            .into_iter()
            .find(|flag| flag.name() == name)
            .ok_or_else(|| format!("unknown debug flag: {name}"))?;

        self.debug.set(flag, level);
        Ok(())
    }

    /// Apply a comma-separated list of info tokens, as given to `--info`.
    pub fn apply_info_list(&mut self, list: &str) -> Result<(), String> {
        split_list(list).try_for_each(|token| self.apply_info_flag(token))
    }

    /// Apply a comma-separated list of debug tokens, as given to `--debug`.
    pub fn apply_debug_list(&mut self, list: &str) -> Result<(), String> {
        split_list(list).try_for_each(|token| self.apply_debug_flag(token))
    }
}

fn split_list(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|token| !token.is_empty())
}

/// Parse a flag token like "name2" into ("name", 2) or "cmd" into ("cmd", 1).
fn parse_flag_token(token: &str) -> Result<(&str, u8), String> {
    if token.is_empty() {
        return Err("empty flag token".to_string());
    }

    match token.find(|c: char| c.is_ascii_digit()) {
        Some(0) => Err(format!("missing flag name in: {token}")),
        Some(pos) => {
            let (name, level) = token.split_at(pos);
            let level = level
                .parse::<u8>()
                .map_err(|_| format!("invalid level in flag: {token}"))?;
            Ok((name, level))
        }
        None => Ok((token, 1)),
    }
}
