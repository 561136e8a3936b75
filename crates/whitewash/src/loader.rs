//! Whitelist file resolution and loading.
//!
//! The default whitelist is looked up in an ordered list of directories;
//! the first one containing `whitelist.yaml` wins.

use std::fs::File;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::whitelist::{Whitelist, WhitelistFormat};
use crate::ConfigError;

/// File name of the default whitelist
pub const WHITELIST_FILE: &str = "whitelist.yaml";

/// Ordered list of directories searched for whitelist files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPath {
    dirs: Vec<PathBuf>,
}

impl Default for SearchPath {
    /// `/etc/whitewash`, the platform data directory, then
    /// `/usr/local/share/whitewash`.
    fn default() -> Self {
        let mut search = vec![PathBuf::from("/etc/whitewash")];
        if let Some(data_dir) = dirs::data_dir() {
            search.push(data_dir.join("whitewash"));
        }
        search.push(PathBuf::from("/usr/local/share/whitewash"));
        Self { dirs: search }
    }
}

impl SearchPath {
    pub fn new<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            dirs: dirs.into_iter().map(Into::into).collect(),
        }
    }

    /// Search `dir` before every existing entry
    pub fn prepend(&mut self, dir: impl Into<PathBuf>) -> &mut Self {
        self.dirs.insert(0, dir.into());
        self
    }

    /// Search `dir` after every existing entry
    pub fn push(&mut self, dir: impl Into<PathBuf>) -> &mut Self {
        self.dirs.push(dir.into());
        self
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// First readable `file` in the search path
    pub fn find(&self, file: &str) -> Option<PathBuf> {
        self.dirs.iter().map(|dir| dir.join(file)).find(|candidate| {
            candidate.is_file() && File::open(candidate).is_ok()
        })
    }

    /// Load `whitelist.yaml` from the first directory that has one
    pub fn load_whitelist(&self) -> Result<Whitelist, ConfigError> {
        self.load_named(WHITELIST_FILE, WhitelistFormat::Yaml)
    }

    /// Load `file` from the first directory that has one
    pub fn load_named(&self, file: &str, format: WhitelistFormat) -> Result<Whitelist, ConfigError> {
        let path = self.find(file).ok_or_else(|| ConfigError::NotFound {
            file: file.to_string(),
            searched: self.dirs.clone(),
        })?;
        load_whitelist_from_path(&path, format)
    }
}

/// Load the default whitelist from the default search path.
pub fn load_default_whitelist() -> Result<Whitelist, ConfigError> {
    SearchPath::default().load_whitelist()
}

/// Load a whitelist from a specific file.
pub fn load_whitelist_from_path(path: &Path, format: WhitelistFormat) -> Result<Whitelist, ConfigError> {
    debug!("reading whitelist {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let whitelist = Whitelist::parse(&content, format)?;
    info!("loaded whitelist from {}", path.display());
    Ok(whitelist)
}
