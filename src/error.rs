use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Config file '{}' not found", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Could not read config file '{}'", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error parsing YAML config: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("Missing required field in config: {0}")]
    ConfigValidation(&'static str),

    #[error("Could not build HTTP client")]
    HttpClient(#[source] reqwest::Error),

    #[error("Repository '{0}' may already exist")]
    RepositoryExists(String),

    #[error("Error creating repository ({status}). Response: {body}")]
    Provisioning { status: StatusCode, body: String },

    #[error("No response from {url}")]
    ProvisioningUnreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Cannot derive a directory name from clone URL '{0}'")]
    CloneTarget(String),

    #[error("Error cloning repository into '{}'", .path.display())]
    CloneFailed {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error("Error writing '{}'", .path.display())]
    GitignoreWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error committing .gitignore")]
    GitignoreCommit(#[source] git2::Error),
}
