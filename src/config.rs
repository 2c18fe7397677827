use std::{collections::BTreeMap, fmt, io::ErrorKind, path::Path};

use serde::Deserialize;
use serde_yaml::Value;

use crate::error::SetupError;

pub const TOKEN_ENV: &str = "GITHUB_TOKEN";
pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_GITIGNORE_URL: &str = "https://raw.githubusercontent.com/github/gitignore/main";

const MASK: &str = "**********";

/// Flat repository description read from the YAML config file.
///
/// Optional fields stay `None` unless the file sets them, so the provider's
/// own defaults apply to anything left out.
#[derive(Deserialize, Default)]
pub struct Config {
    pub github_token: Option<String>,
    pub repo_name: Option<String>,
    pub private: Option<bool>,
    pub description: Option<String>,
    pub homepage: Option<String>,
    pub has_wiki: Option<bool>,
    pub has_issues: Option<bool>,
    pub auto_init: Option<bool>,
    pub gitignore_type: Option<String>,
    pub api_url: Option<String>,
    pub gitignore_url: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Config {
    /// Reads, parses and validates the config at `path`.
    ///
    /// A non-empty `env_token` replaces whatever credential the file holds.
    pub fn load(path: &Path, env_token: Option<String>) -> Result<Self, SetupError> {
        let content = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                SetupError::ConfigNotFound(path.to_path_buf())
            } else {
                SetupError::ConfigRead {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let mut config = Self::from_yaml(&content)?;
        if let Some(token) = env_token.filter(|token| !token.trim().is_empty()) {
            log::debug!("Using credential from {}", TOKEN_ENV);
            config.github_token = Some(token);
        }
        config.validate()?;

        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self, SetupError> {
        let blank = content
            .lines()
            .map(str::trim)
            .all(|line| line.is_empty() || line.starts_with('#') || line == "---");
        if blank {
            return Ok(Self::default());
        }

        let value: Value = serde_yaml::from_str(content)?;
        if value.is_null() {
            return Ok(Self::default());
        }

        Ok(serde_yaml::from_value(value)?)
    }

    pub fn validate(&self) -> Result<(), SetupError> {
        if self.token().trim().is_empty() {
            return Err(SetupError::ConfigValidation("github_token"));
        }
        if self.repo_name().trim().is_empty() {
            return Err(SetupError::ConfigValidation("repo_name"));
        }

        Ok(())
    }

    /// Empty until validated; a key left blank in the file is `None`.
    pub fn token(&self) -> &str {
        self.github_token.as_deref().unwrap_or_default()
    }

    pub fn repo_name(&self) -> &str {
        self.repo_name.as_deref().unwrap_or_default()
    }

    pub fn api_url(&self) -> &str {
        self.api_url
            .as_deref()
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
    }

    pub fn gitignore_url(&self) -> &str {
        self.gitignore_url
            .as_deref()
            .unwrap_or(DEFAULT_GITIGNORE_URL)
            .trim_end_matches('/')
    }
}

// Used for the verbose echo, one "  key: value" line per set field.
impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  github_token: {}", MASK)?;
        writeln!(f, "  repo_name: {}", self.repo_name())?;

        let optional: [(&str, Option<String>); 9] = [
            ("private", self.private.map(|v| v.to_string())),
            ("description", self.description.clone()),
            ("homepage", self.homepage.clone()),
            ("has_wiki", self.has_wiki.map(|v| v.to_string())),
            ("has_issues", self.has_issues.map(|v| v.to_string())),
            ("auto_init", self.auto_init.map(|v| v.to_string())),
            ("gitignore_type", self.gitignore_type.clone()),
            ("api_url", self.api_url.clone()),
            ("gitignore_url", self.gitignore_url.clone()),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                writeln!(f, "  {}: {}", key, value)?;
            }
        }

        for (key, value) in &self.extra {
            let rendered = serde_yaml::to_string(value).map_err(|_| fmt::Error)?;
            writeln!(f, "  {}: {}", key, rendered.trim_end())?;
        }

        Ok(())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("github_token", &MASK)
            .field("repo_name", &self.repo_name)
            .field("private", &self.private)
            .field("description", &self.description)
            .field("homepage", &self.homepage)
            .field("has_wiki", &self.has_wiki)
            .field("has_issues", &self.has_issues)
            .field("auto_init", &self.auto_init)
            .field("gitignore_type", &self.gitignore_type)
            .field("api_url", &self.api_url)
            .field("gitignore_url", &self.gitignore_url)
            .field("extra", &self.extra)
            .finish()
    }
}
