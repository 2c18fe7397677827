use std::{borrow::Cow, path::PathBuf};

use git2::{Commit, ErrorCode, Oid, PushOptions, Repository, Signature};
use reqwest::{blocking::Client, StatusCode};

use crate::{clone::remote_callbacks, error::SetupError, templates};

pub const COMMIT_MESSAGE: &str = "Add .gitignore file";

const COMMITTER_NAME: &str = "repo-bootstrap";
const COMMITTER_EMAIL: &str = "repo-bootstrap@localhost";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateSource {
    Remote,
    BuiltIn,
    Default,
}

pub struct GitignoreSeeder {
    client: Client,
    base_url: String,
}

impl GitignoreSeeder {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetches `<kind>.gitignore` from the template collection.
    ///
    /// Anything but a 200 counts as "no such template". Identifiers that could
    /// reach outside the collection are never fetched.
    pub fn fetch_template(&self, kind: &str) -> Option<String> {
        if !is_template_name(kind) {
            log::warn!("Not fetching gitignore template for {:?}: not a plain name", kind);
            return None;
        }

        let url = format!("{}/{}.gitignore", self.base_url, kind);

        let response = match self.client.get(&url).send() {
            Ok(response) => response,
            Err(e) => {
                log::warn!("Could not fetch {}: {}", url, e);
                return None;
            }
        };

        if response.status() != StatusCode::OK {
            log::debug!("{} answered {}", url, response.status());
            return None;
        }

        match response.text() {
            Ok(text) => Some(text),
            Err(e) => {
                log::warn!("Could not read {}: {}", url, e);
                None
            }
        }
    }

    /// Writes the template for `kind` to `.gitignore`, commits it and pushes to `origin`.
    ///
    /// A commit or push failure leaves the written file in place.
    pub fn seed(
        &self,
        repo: &Repository,
        kind: &str,
        token: Option<&str>,
    ) -> Result<TemplateSource, SetupError> {
        log::info!("Adding .gitignore file for {}...", kind);

        let (content, source) = resolve_template(kind, self.fetch_template(kind));
        match source {
            TemplateSource::Remote => log::info!("Added .gitignore file for {}", kind),
            TemplateSource::BuiltIn | TemplateSource::Default => {
                log::warn!("Could not find gitignore template for {}.", kind);
                log::info!("Creating a basic .gitignore file instead.");
            }
        }

        write_gitignore(repo, &content)?;
        commit_and_push(repo, token).map_err(SetupError::GitignoreCommit)?;
        log::info!("Committed and pushed .gitignore file");

        Ok(source)
    }
}

fn is_template_name(kind: &str) -> bool {
    !kind.is_empty() && !kind.contains(&['/', '\\', '?', '#'][..]) && !kind.contains("..")
}

pub fn resolve_template(kind: &str, fetched: Option<String>) -> (Cow<'static, str>, TemplateSource) {
    if let Some(content) = fetched {
        return (Cow::Owned(content), TemplateSource::Remote);
    }

    match templates::builtin(kind) {
        Some(content) => (Cow::Borrowed(content), TemplateSource::BuiltIn),
        None => (Cow::Borrowed(templates::DEFAULT), TemplateSource::Default),
    }
}

pub fn write_gitignore(repo: &Repository, content: &str) -> Result<PathBuf, SetupError> {
    let path = repo
        .workdir()
        .ok_or_else(|| {
            SetupError::GitignoreCommit(git2::Error::from_str(
                "repository has no working directory",
            ))
        })?
        .join(".gitignore");

    std::fs::write(&path, content).map_err(|source| SetupError::GitignoreWrite {
        path: path.clone(),
        source,
    })?;

    Ok(path)
}

pub fn commit_and_push(repo: &Repository, token: Option<&str>) -> Result<Oid, git2::Error> {
    let mut index = repo.index()?;
    index.add_path(std::path::Path::new(".gitignore"))?;
    index.write()?;

    let tree = repo.find_tree(index.write_tree()?)?;
    let signature = repo
        .signature()
        .or_else(|_| Signature::now(COMMITTER_NAME, COMMITTER_EMAIL))?;

    // An empty repository has an unborn HEAD, the first commit has no parent.
    let parent = match repo.head() {
        Ok(head) => Some(head.peel_to_commit()?),
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => None,
        Err(e) => return Err(e),
    };
    let parents: Vec<&Commit> = parent.iter().collect();

    let oid = repo.commit(
        Some("HEAD"),
        &signature,
        &signature,
        COMMIT_MESSAGE,
        &tree,
        &parents,
    )?;

    let head = repo.head()?;
    let branch = head
        .name()
        .ok_or_else(|| git2::Error::from_str("HEAD is not a valid UTF-8 reference"))?;
    let refspec = format!("{}:{}", branch, branch);

    let mut callbacks = remote_callbacks(token);
    callbacks.push_update_reference(|refname, status| match status {
        Some(message) => Err(git2::Error::from_str(&format!(
            "push of {} was rejected: {}",
            refname, message
        ))),
        None => Ok(()),
    });
    let mut options = PushOptions::new();
    options.remote_callbacks(callbacks);

    let mut remote = repo.find_remote("origin")?;
    remote.push(&[refspec.as_str()], Some(&mut options))?;

    Ok(oid)
}
