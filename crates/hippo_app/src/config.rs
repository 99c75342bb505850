//! Stored credentials: README author data and the intranet login.
//!
//! Kept as JSON under the user config directory. A missing file is not an
//! error; the runner prompts for the values and saves them.

use std::fmt;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use hippo_engine::{ensure_output_dir, ArtifactWriter, Author, LoginCredentials, PersistError};
use hippo_logging::hippo_info;
use serde::{Deserialize, Serialize};

use crate::cli::ConfigArgs;

const APP_DIR: &str = "hipposcraper";
const CREDENTIALS_FILE: &str = "credentials.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no user config directory on this system, pass --config")]
    NoConfigDir,
    #[error("cannot read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("{path} is not a valid credentials file: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("cannot encode credentials: {0}")]
    Serialize(serde_json::Error),
    #[error("cannot save credentials: {0}")]
    Write(#[from] PersistError),
    #[error("credentials have no {0}, run `hipposcraper config`")]
    Incomplete(&'static str),
    #[error("prompt failed: {0}")]
    Prompt(io::Error),
}

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub github_username: String,
    #[serde(default)]
    pub intranet_username: String,
    #[serde(default)]
    pub intranet_password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("author", &self.author)
            .field("github_username", &self.github_username)
            .field("intranet_username", &self.intranet_username)
            .field("intranet_password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Overwrite the fields given on the command line.
    pub fn apply(&mut self, args: &ConfigArgs) {
        let fields = [
            (&mut self.author, &args.author),
            (&mut self.github_username, &args.github),
            (&mut self.intranet_username, &args.username),
            (&mut self.intranet_password, &args.password),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                *field = value.trim().to_string();
            }
        }
    }

    /// First field a scrape cannot do without, if any is empty.
    pub fn missing_field(&self) -> Option<&'static str> {
        [
            ("author", &self.author),
            ("GitHub username", &self.github_username),
            ("intranet username", &self.intranet_username),
            ("intranet password", &self.intranet_password),
        ]
        .into_iter()
        .find(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
    }

    pub fn ensure_complete(&self) -> Result<(), ConfigError> {
        match self.missing_field() {
            Some(field) => Err(ConfigError::Incomplete(field)),
            None => Ok(()),
        }
    }

    pub fn author(&self) -> Author {
        Author {
            name: self.author.clone(),
            github_username: self.github_username.clone(),
        }
    }

    pub fn login(&self) -> LoginCredentials {
        LoginCredentials {
            login: self.intranet_username.clone(),
            password: self.intranet_password.clone(),
        }
    }
}

pub fn default_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR).join(CREDENTIALS_FILE))
        .ok_or(ConfigError::NoConfigDir)
}

/// Load credentials, or `None` when the file does not exist yet.
pub fn load(path: &Path) -> Result<Option<Credentials>, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

pub fn save(path: &Path, credentials: &Credentials) -> Result<PathBuf, ConfigError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(CREDENTIALS_FILE);
    ensure_output_dir(dir)?;
    let json = serde_json::to_string_pretty(credentials).map_err(ConfigError::Serialize)?;
    let saved = ArtifactWriter::new(dir).write(name, &json)?;
    hippo_info!("Credentials saved to {}", saved.display());
    Ok(saved)
}

/// Ask for every field, keeping the current value on empty input.
pub fn prompt(
    current: &Credentials,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<Credentials, ConfigError> {
    let mut updated = current.clone();
    let fields = [
        ("Author name", &mut updated.author, false),
        ("GitHub username", &mut updated.github_username, false),
        ("Intranet username", &mut updated.intranet_username, false),
        ("Intranet password", &mut updated.intranet_password, true),
    ];
    for (label, field, secret) in fields {
        let shown = if secret && !field.is_empty() {
            "********"
        } else {
            field.as_str()
        };
        write!(output, "{label} [{shown}]: ").map_err(ConfigError::Prompt)?;
        output.flush().map_err(ConfigError::Prompt)?;

        let mut line = String::new();
        input.read_line(&mut line).map_err(ConfigError::Prompt)?;
        let line = line.trim();
        if !line.is_empty() {
            *field = line.to_string();
        }
    }
    Ok(updated)
}
