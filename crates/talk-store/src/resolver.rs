//! Storage directory capability.
//!
//! The store never decides on its own where profiles live; it asks a
//! [`DirectoryResolver`] once when opened.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use directories::UserDirs;

/// Environment variable consulted by [`EnvDirectory::downloads`].
pub const TALK_HOME_VAR: &str = "TALK_HOME";

/// Produces the directory a store keeps its `.talk` files in.
pub trait DirectoryResolver {
    fn resolve(&self) -> io::Result<PathBuf>;
}

impl<F> DirectoryResolver for F
where
    F: Fn() -> io::Result<PathBuf>,
{
    fn resolve(&self) -> io::Result<PathBuf> {
        self()
    }
}

/// A caller-supplied directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixedDirectory(PathBuf);

impl FixedDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }
}

impl DirectoryResolver for FixedDirectory {
    fn resolve(&self) -> io::Result<PathBuf> {
        Ok(self.0.clone())
    }
}

/// A directory named by an environment variable, with an optional fallback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnvDirectory {
    var: String,
    fallback: Option<PathBuf>,
}

impl EnvDirectory {
    pub fn new(var: impl Into<String>, fallback: Option<PathBuf>) -> Self {
        Self {
            var: var.into(),
            fallback,
        }
    }

    /// `$TALK_HOME` if set, else the platform downloads folder.
    pub fn downloads() -> Self {
        Self::new(TALK_HOME_VAR, platform_downloads())
    }
}

impl DirectoryResolver for EnvDirectory {
    fn resolve(&self) -> io::Result<PathBuf> {
        match env::var_os(&self.var) {
            Some(value) if !value.is_empty() => Ok(PathBuf::from(value)),
            _ => self.fallback.clone().ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("{} is not set and no fallback directory is configured", self.var),
                )
            }),
        }
    }
}

/// The platform downloads folder (XDG `DOWNLOAD` dir, `~/Downloads` on
/// macOS, the Known Folder on Windows).
fn platform_downloads() -> Option<PathBuf> {
    UserDirs::new().and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
}
