// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Lenses CLI Authors

//! Finding a configuration file on disk
//!
//! The search runs over directories × filenames × codecs:
//!
//! 1. `<home>/.lenses/`
//! 2. the directory of the running executable
//! 3. the current working directory
//!
//! In each directory the names of [`CONFIGURATION_FILENAMES`] are tried in
//! order, and every existing file is offered to each codec in turn. The first
//! file a codec accepts wins. Failures of single combinations are only
//! logged; the caller sees either the winning configuration or one error for
//! the whole search.

use super::codec::{default_codecs, ConfigurationCodec};
use super::configuration::Configuration;
use super::error::ConfigError;
use log::{debug, warn};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the per-user configuration directory inside the home directory
pub const HOME_CONFIGURATION_DIR: &str = ".lenses";

/// File names looked up in every search directory, in order
pub const CONFIGURATION_FILENAMES: &[&str] = &[
    "lenses.yml",
    "lenses.yaml",
    "lenses.json",
    ".lenses.yml",
    ".lenses.yaml",
    ".lenses.json",
    "lenses-cli.yml",
    "lenses-cli.yaml",
    "lenses-cli.json",
    ".lenses-cli.yml",
    ".lenses-cli.yaml",
    ".lenses-cli.json",
];

/// A configuration together with where it was read from
#[derive(Debug, Clone)]
pub struct LocatedConfiguration {
    /// The decoded configuration
    pub configuration: Configuration,
    /// The file it was decoded from
    pub path: PathBuf,
    /// Name of the codec that accepted the file
    pub format: &'static str,
}

/// Outcome of looking at one directory
enum Lookup {
    Found(LocatedConfiguration),
    /// Files existed but none decoded; holds the first of them
    Undecodable(PathBuf),
    Missing,
}

/// Searches directories for a decodable configuration file
#[derive(Debug)]
pub struct ConfigurationLocator {
    codecs: Vec<Box<dyn ConfigurationCodec>>,
}

impl Default for ConfigurationLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigurationLocator {
    /// A locator trying JSON, then YAML
    pub fn new() -> Self {
        Self::with_codecs(default_codecs())
    }

    /// A locator trying the given codecs in order
    pub fn with_codecs(codecs: Vec<Box<dyn ConfigurationCodec>>) -> Self {
        Self { codecs }
    }

    /// Names of the registered formats
    pub fn formats(&self) -> Vec<&'static str> {
        self.codecs.iter().map(|codec| codec.name()).collect()
    }

    /// Read one file, trying every codec
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if the file cannot be read, and
    /// [`ConfigError::Decode`] if no codec accepts its contents.
    pub fn read_file(&self, path: &Path) -> Result<LocatedConfiguration, ConfigError> {
        let bytes = fs::read(path).map_err(|e| ConfigError::io(path, e))?;

        for codec in &self.codecs {
            match codec.decode(&bytes) {
                Ok(configuration) => {
                    debug!("Decoded {} as {}", path.display(), codec.name());
                    return Ok(LocatedConfiguration {
                        configuration,
                        path: path.to_path_buf(),
                        format: codec.name(),
                    });
                }
                Err(e) => debug!("{} is not {}: {e}", path.display(), codec.name()),
            }
        }

        Err(ConfigError::Decode {
            path: path.to_path_buf(),
            formats: self.formats(),
        })
    }

    /// Look for a configuration file inside `dir`
    ///
    /// # Errors
    ///
    /// [`ConfigError::NotFound`] when none of the file names exist, and
    /// [`ConfigError::Decode`] when some exist but none could be decoded.
    pub fn lookup(&self, dir: &Path) -> Result<LocatedConfiguration, ConfigError> {
        match self.lookup_dir(dir) {
            Lookup::Found(located) => Ok(located),
            Lookup::Undecodable(path) => Err(ConfigError::Decode {
                path,
                formats: self.formats(),
            }),
            Lookup::Missing => Err(ConfigError::NotFound {
                searched: vec![dir.to_path_buf()],
            }),
        }
    }

    /// Look through `dirs` in order; the first decodable file wins
    ///
    /// # Errors
    ///
    /// When nothing is found, [`ConfigError::Decode`] if any candidate file
    /// existed but could not be decoded, [`ConfigError::NotFound`] otherwise.
    pub fn search<P: AsRef<Path>>(&self, dirs: &[P]) -> Result<LocatedConfiguration, ConfigError> {
        let mut undecodable = None;

        for dir in dirs {
            match self.lookup_dir(dir.as_ref()) {
                Lookup::Found(located) => return Ok(located),
                Lookup::Undecodable(path) => {
                    warn!("Ignoring unreadable configuration file {}", path.display());
                    if undecodable.is_none() {
                        undecodable = Some(path);
                    }
                }
                Lookup::Missing => {}
            }
        }

        match undecodable {
            Some(path) => Err(ConfigError::Decode {
                path,
                formats: self.formats(),
            }),
            None => Err(ConfigError::NotFound {
                searched: dirs.iter().map(|d| d.as_ref().to_path_buf()).collect(),
            }),
        }
    }

    fn lookup_dir(&self, dir: &Path) -> Lookup {
        let mut undecodable = None;

        for filename in CONFIGURATION_FILENAMES {
            let path = dir.join(filename);
            if !path.is_file() {
                continue;
            }

            match self.read_file(&path) {
                Ok(located) => return Lookup::Found(located),
                Err(e) => {
                    debug!("Skipping {}: {e}", path.display());
                    if undecodable.is_none() {
                        undecodable = Some(path);
                    }
                }
            }
        }

        match undecodable {
            Some(path) => Lookup::Undecodable(path),
            None => Lookup::Missing,
        }
    }
}

/// The directories searched by default, highest priority first
///
/// Directories that cannot be determined are left out.
pub fn default_search_roots() -> Vec<PathBuf> {
    let mut roots = Vec::with_capacity(3);

    if let Some(home) = home_dir() {
        roots.push(home.join(HOME_CONFIGURATION_DIR));
    }

    match std::env::current_exe() {
        Ok(exe) => {
            if let Some(dir) = exe.parent() {
                roots.push(dir.to_path_buf());
            }
        }
        Err(e) => warn!("Cannot determine the executable directory: {e}"),
    }

    match std::env::current_dir() {
        Ok(cwd) => roots.push(cwd),
        Err(e) => warn!("Cannot determine the working directory: {e}"),
    }

    roots
}

/// The home directory of the current user
///
/// The user database is consulted first, then `HOME`, then the
/// platform-specific variables (`home` on Plan 9, `HOMEDRIVE` + `HOMEPATH`
/// or `USERPROFILE` on Windows). Returns `None` when nothing is set.
pub fn home_dir() -> Option<PathBuf> {
    resolve_home_dir(
        user_record_home_dir(),
        |name| std::env::var_os(name),
        std::env::consts::OS,
    )
}

fn resolve_home_dir<F>(user_record: Option<PathBuf>, var: F, os: &str) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<OsString>,
{
    let non_empty = |value: Option<OsString>| value.filter(|v| !v.is_empty());

    if let Some(home) = user_record.filter(|p| !p.as_os_str().is_empty()) {
        return Some(home);
    }

    if let Some(home) = non_empty(var("HOME")) {
        return Some(PathBuf::from(home));
    }

    match os {
        "plan9" => non_empty(var("home")).map(PathBuf::from),
        "windows" => {
            let mut home = var("HOMEDRIVE").unwrap_or_default();
            home.push(var("HOMEPATH").unwrap_or_default());
            non_empty(Some(home))
                .or_else(|| non_empty(var("USERPROFILE")))
                .map(PathBuf::from)
        }
        _ => None,
    }
}

#[cfg(unix)]
fn user_record_home_dir() -> Option<PathBuf> {
    use std::ffi::{CStr, OsStr};
    use std::io;
    use std::os::unix::ffi::OsStrExt;

    let mut buf: Vec<libc::c_char> = vec![0; 1024];

    loop {
        let mut passwd: libc::passwd = unsafe { std::mem::zeroed() };
        let mut result: *mut libc::passwd = std::ptr::null_mut();

        let rc = unsafe {
            libc::getpwuid_r(
                libc::getuid(),
                &mut passwd,
                buf.as_mut_ptr(),
                buf.len(),
                &mut result,
            )
        };

        if rc == libc::ERANGE && buf.len() < 1 << 20 {
            buf.resize(buf.len() * 2, 0);
            continue;
        }

        if rc != 0 {
            debug!(
                "Cannot read the user database: {}",
                io::Error::from_raw_os_error(rc)
            );
            return None;
        }

        if result.is_null() || passwd.pw_dir.is_null() {
            return None;
        }

        // pw_dir points into `buf`, which is still alive here.
        let dir = unsafe { CStr::from_ptr(passwd.pw_dir) };
        return Some(PathBuf::from(OsStr::from_bytes(dir.to_bytes())));
    }
}

#[cfg(not(unix))]
fn user_record_home_dir() -> Option<PathBuf> {
    None
}
