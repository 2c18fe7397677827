use std::time::Duration;

use reqwest::{
    blocking::Client,
    header::{ACCEPT, AUTHORIZATION},
    StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::{config::Config, error::SetupError};

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

pub fn http_client() -> Result<Client, SetupError> {
    Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(Duration::from_secs(30))
        .build()
        .map_err(SetupError::HttpClient)
}

/// Body of `POST /user/repos`. Unset fields are left out entirely.
#[derive(Serialize, Debug, PartialEq)]
pub struct CreateRepository<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_wiki: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_issues: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_init: Option<bool>,
}

impl<'a> From<&'a Config> for CreateRepository<'a> {
    fn from(config: &'a Config) -> Self {
        Self {
            name: config.repo_name(),
            private: config.private,
            description: config.description.as_deref(),
            homepage: config.homepage.as_deref(),
            has_wiki: config.has_wiki,
            has_issues: config.has_issues,
            auto_init: config.auto_init,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct CreatedRepository {
    pub clone_url: String,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
}

pub struct Provisioner {
    client: Client,
    api_url: String,
    token: String,
}

impl Provisioner {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            api_url: config.api_url().to_string(),
            token: config.token().to_string(),
        }
    }

    /// Creates the repository described by `config` and returns where to clone it from.
    ///
    /// Runs exactly once: a name collision is reported, never retried.
    pub fn create_repository(&self, config: &Config) -> Result<CreatedRepository, SetupError> {
        let url = format!("{}/user/repos", self.api_url);
        let request = CreateRepository::from(config);

        log::info!("Creating GitHub repository: {}...", request.name);
        log::debug!("POST {} {:?}", url, request);

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, GITHUB_ACCEPT)
            .json(&request)
            .send()
            .map_err(|source| SetupError::ProvisioningUnreachable { url, source })?;

        let status = response.status();
        let body = response.text().map_err(|e| SetupError::Provisioning {
            status,
            body: format!("<unreadable response body: {}>", e),
        })?;

        let created = interpret_response(status, &body, request.name)?;
        if let Some(full_name) = &created.full_name {
            log::debug!("Provider assigned {}", full_name);
        }
        log::info!(
            "Repository created successfully: {}",
            created.html_url.as_deref().unwrap_or(&created.clone_url)
        );

        Ok(created)
    }
}

fn interpret_response(
    status: StatusCode,
    body: &str,
    repo_name: &str,
) -> Result<CreatedRepository, SetupError> {
    if status.is_success() {
        return serde_json::from_str(body).map_err(|e| {
            log::debug!("Unexpected repository payload: {}", e);
            SetupError::Provisioning {
                status,
                body: body.to_string(),
            }
        });
    }

    if status == StatusCode::CONFLICT || status == StatusCode::UNPROCESSABLE_ENTITY {
        log::debug!("Provider refused creation: {}", body);
        return Err(SetupError::RepositoryExists(repo_name.to_string()));
    }

    Err(SetupError::Provisioning {
        status,
        body: body.to_string(),
    })
}
