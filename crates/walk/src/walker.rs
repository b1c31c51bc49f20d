use crate::entry::WalkEntry;
use crate::error::WalkError;
use logging::trace_walk;
use std::collections::HashSet;
use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Depth-first iterator over the entries below a root.
///
/// Failures below the root are yielded as `Err` items; the walker then moves
/// on to the next sibling.
pub struct Walker {
    root: PathBuf,
    follow_symlinks: bool,
    root_entry: Option<WalkEntry>,
    pending: Option<WalkError>,
    stack: Vec<DirectoryState>,
    visited: HashSet<PathBuf>,
}

impl Walker {
    pub(crate) fn new(
        root: PathBuf,
        follow_symlinks: bool,
        include_root: bool,
    ) -> Result<Self, WalkError> {
        let root = absolutize(root)?;
        trace_walk!(root = %root.display(), "starting traversal");

        let metadata =
            fs::symlink_metadata(&root).map_err(|error| WalkError::root(root.clone(), error))?;

        let mut walker = Self {
            root,
            follow_symlinks,
            root_entry: None,
            pending: None,
            stack: Vec::new(),
            visited: HashSet::new(),
        };

        let descends = walker.directory_target(&walker.root, &metadata)?.is_some();
        if descends {
            if let Err(error) = walker.push_directory(walker.root.clone(), PathBuf::new(), 0) {
                walker.pending = Some(error);
            }
        }
        if include_root {
            walker.root_entry = Some(WalkEntry {
                full_path: walker.root.clone(),
                relative_path: PathBuf::new(),
                metadata,
                depth: 0,
                is_root: true,
                descends,
            });
        }

        Ok(walker)
    }

    /// Returns the directory to descend into for an entry, if any.
    fn directory_target(
        &self,
        path: &Path,
        metadata: &fs::Metadata,
    ) -> Result<Option<PathBuf>, WalkError> {
        let file_type = metadata.file_type();
        if file_type.is_dir() {
            return Ok(Some(path.to_path_buf()));
        }
        if !(file_type.is_symlink() && self.follow_symlinks) {
            return Ok(None);
        }
        match fs::metadata(path) {
            Ok(target) if target.is_dir() => fs::canonicalize(path)
                .map(Some)
                .map_err(|error| WalkError::canonicalize(path.to_path_buf(), error)),
            Ok(_) => Ok(None),
            // Dangling links are yielded as plain entries.
            Err(_) => Ok(None),
        }
    }

    fn push_directory(
        &mut self,
        fs_path: PathBuf,
        relative_prefix: PathBuf,
        depth: usize,
    ) -> Result<(), WalkError> {
        let canonical = fs::canonicalize(&fs_path)
            .map_err(|error| WalkError::canonicalize(fs_path.clone(), error))?;
        if !self.visited.insert(canonical) {
            trace_walk!(path = %fs_path.display(), "directory already visited");
            return Ok(());
        }

        let state = DirectoryState::read(fs_path, relative_prefix, depth)?;
        self.stack.push(state);
        Ok(())
    }

    fn prepare_entry(
        &mut self,
        full_path: PathBuf,
        relative_path: PathBuf,
        depth: usize,
    ) -> Result<WalkEntry, WalkError> {
        let metadata = fs::symlink_metadata(&full_path)
            .map_err(|error| WalkError::metadata(full_path.clone(), error))?;
        let target = self.directory_target(&full_path, &metadata)?;
        let descends = target.is_some();

        if let Some(dir_path) = target {
            if let Err(error) = self.push_directory(dir_path, relative_path.clone(), depth) {
                self.pending = Some(error);
            }
        }

        Ok(WalkEntry {
            full_path,
            relative_path,
            metadata,
            depth,
            is_root: false,
            descends,
        })
    }
}

impl Iterator for Walker {
    type Item = Result<WalkEntry, WalkError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(entry) = self.root_entry.take() {
            return Some(Ok(entry));
        }
        if let Some(error) = self.pending.take() {
            return Some(Err(error));
        }

        loop {
            let (full_path, relative_path, depth) = {
                let state = self.stack.last_mut()?;
                let Some(name) = state.next_name() else {
                    self.stack.pop();
                    continue;
                };
                let full_path = state.fs_path.join(&name);
                let relative_path = state.relative_prefix.join(&name);
                (full_path, relative_path, state.depth + 1)
            };

            return Some(self.prepare_entry(full_path, relative_path, depth));
        }
    }
}

struct DirectoryState {
    fs_path: PathBuf,
    relative_prefix: PathBuf,
    entries: std::vec::IntoIter<OsString>,
    depth: usize,
}

impl DirectoryState {
    fn read(fs_path: PathBuf, relative_prefix: PathBuf, depth: usize) -> Result<Self, WalkError> {
        let mut entries = fs::read_dir(&fs_path)
            .and_then(|read_dir| {
                read_dir
                    .map(|entry| entry.map(|entry| entry.file_name()))
                    .collect::<Result<Vec<_>, _>>()
            })
            .map_err(|error| WalkError::read_dir(fs_path.clone(), error))?;
        entries.sort();

        trace_walk!(
            path = %fs_path.display(),
            entries = entries.len(),
            "entering directory"
        );

        Ok(Self {
            fs_path,
            relative_prefix,
            entries: entries.into_iter(),
            depth,
        })
    }

    fn next_name(&mut self) -> Option<OsString> {
        self.entries.next()
    }
}

fn absolutize(path: PathBuf) -> Result<PathBuf, WalkError> {
    if path.is_absolute() {
        Ok(path)
    } else {
        let cwd = env::current_dir().map_err(|error| WalkError::root(path.clone(), error))?;
        Ok(cwd.join(path))
    }
}
