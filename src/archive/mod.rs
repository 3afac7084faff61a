pub mod writer;

use crate::context::{Context, DirLayout};
use crate::request::PackageRequest;
use crate::result::Result;
use crate::utils;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Entry name FunctionCompute invokes as the program entry point
pub const BOOTSTRAP: &str = "bootstrap";

/// Alternate entry point name, archived as an executable under its own name
pub const SCF_BOOTSTRAP: &str = "scf_bootstrap";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryContent {
    /// Bytes streamed from this file at write time
    File(PathBuf),
    /// Zero-length directory marker
    Directory,
    /// Symbolic link to another entry name
    Symlink(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryMode {
    /// rwxrwxrwx
    Executable,
    /// rwxr-xr-x, for the bootstrap symlink
    Link,
    /// Whatever the zip writer uses when no permissions are given
    Default,
}

impl EntryMode {
    pub fn unix_permissions(self) -> Option<u32> {
        match self {
            EntryMode::Executable => Some(0o777),
            EntryMode::Link => Some(0o755),
            EntryMode::Default => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub content: EntryContent,
    pub mode: EntryMode,
}

impl ArchiveEntry {
    pub fn file<S: Into<String>>(name: S, source: PathBuf, mode: EntryMode) -> Self {
        Self {
            name: name.into(),
            content: EntryContent::File(source),
            mode,
        }
    }

    pub fn directory<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            content: EntryContent::Directory,
            mode: EntryMode::Default,
        }
    }

    pub fn symlink<S: Into<String>, T: Into<String>>(name: S, target: T) -> Self {
        Self {
            name: name.into(),
            content: EntryContent::Symlink(target.into()),
            mode: EntryMode::Link,
        }
    }
}

impl fmt::Display for ArchiveEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.content {
            EntryContent::Symlink(target) => write!(f, "{} -> {}", self.name, target),
            EntryContent::Directory => write!(f, "{}", self.name),
            EntryContent::File(source) => match self.mode.unix_permissions() {
                Some(mode) => write!(f, "{} ({}, {:o})", self.name, source.display(), mode),
                None => write!(f, "{} ({})", self.name, source.display()),
            },
        }
    }
}

/// Ordered entries with unique names, in the order they will be written
#[derive(Debug, Default)]
pub struct Plan {
    entries: Vec<ArchiveEntry>,
    index: HashMap<String, usize>,
}

impl Plan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. A name that is already planned keeps its position but
    /// takes the new entry; the replaced entry is returned.
    pub fn push(&mut self, entry: ArchiveEntry) -> Option<ArchiveEntry> {
        match self.index.get(&entry.name) {
            Some(&slot) => Some(std::mem::replace(&mut self.entries[slot], entry)),
            None => {
                self.index.insert(entry.name.clone(), self.entries.len());
                self.entries.push(entry);
                None
            }
        }
    }

    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }
}

/// Resolve a request into the entries of the archive.
///
/// Directory listing happens here; file contents are only read when the
/// plan is written.
pub fn plan(ctx: &Context, request: &PackageRequest) -> Result<Plan> {
    let mut plan = Plan::new();

    if let Some(executable) = &request.executable {
        plan_executable(&mut plan, executable)?;
    }

    for path in &request.supplemental {
        plan_supplemental(ctx, &mut plan, path)?;
    }

    Ok(plan)
}

/// Plan the request and write the archive to `request.output`
pub fn build(ctx: &Context, request: &PackageRequest) -> Result<Plan> {
    let plan = plan(ctx, request)?;
    writer::write(ctx, &plan, &request.output)?;
    Ok(plan)
}

fn add(plan: &mut Plan, entry: ArchiveEntry) -> Result<()> {
    if let Some(replaced) = plan.push(entry) {
        cliclack::log::warning(format!(
            "{} appears more than once, keeping the last one",
            replaced.name
        ))?;
    }
    Ok(())
}

fn plan_executable(plan: &mut Plan, executable: &Path) -> Result<()> {
    let name = utils::base_name(executable)
        .ok_or_else(|| std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("{} is not a file", executable.display()),
        ))?;

    if name != BOOTSTRAP {
        add(plan, ArchiveEntry::symlink(BOOTSTRAP, name.as_str()))?;
    }

    add(plan, ArchiveEntry::file(name, executable.to_path_buf(), EntryMode::Executable))
}

fn plan_supplemental(ctx: &Context, plan: &mut Plan, path: &Path) -> Result<()> {
    if path.as_os_str() == SCF_BOOTSTRAP {
        return add(plan, ArchiveEntry::file(SCF_BOOTSTRAP, path.to_path_buf(), EntryMode::Executable));
    }

    if path.is_dir() {
        return plan_directory(ctx, plan, path);
    }

    add(plan, ArchiveEntry::file(utils::given_name(path), path.to_path_buf(), EntryMode::Default))
}

/// Depth-first, siblings sorted by name, each directory marker ahead of its children
fn plan_directory(ctx: &Context, plan: &mut Plan, root: &Path) -> Result<()> {
    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry?;

        let name = match ctx.layout {
            DirLayout::Flatten => entry.file_name().to_string_lossy().into_owned(),
            DirLayout::Preserve => utils::relative_name(root, entry.path()),
        };

        if entry.file_type().is_dir() {
            add(plan, ArchiveEntry::directory(format!("{}/", name)))?;
        } else {
            add(plan, ArchiveEntry::file(name, entry.into_path(), EntryMode::Default))?;
        }
    }

    Ok(())
}
