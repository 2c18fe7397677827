use std::path::{Path, PathBuf};

use git2::{build::RepoBuilder, Cred, CredentialType, FetchOptions, RemoteCallbacks, Repository};

use crate::error::SetupError;

/// Local directory name for a clone URL: the last path segment without `.git`.
pub fn directory_from_url(clone_url: &str) -> Option<&str> {
    let segment = clone_url
        .trim_end_matches('/')
        .rsplit(|c: char| c == '/' || c == ':')
        .next()?;
    let name = segment.strip_suffix(".git").unwrap_or(segment);

    (!name.is_empty()).then_some(name)
}

pub fn target_directory(clone_url: &str, explicit: Option<&Path>) -> Result<PathBuf, SetupError> {
    if let Some(dir) = explicit {
        return Ok(dir.to_path_buf());
    }

    directory_from_url(clone_url)
        .map(PathBuf::from)
        .ok_or_else(|| SetupError::CloneTarget(clone_url.to_string()))
}

pub fn clone_repository(
    clone_url: &str,
    target: &Path,
    token: Option<&str>,
) -> Result<Repository, SetupError> {
    log::info!("Cloning repository to {}...", target.display());

    let mut fetch = FetchOptions::new();
    fetch.remote_callbacks(remote_callbacks(token));

    let repo = RepoBuilder::new()
        .fetch_options(fetch)
        .clone(clone_url, target)
        .map_err(|source| SetupError::CloneFailed {
            path: target.to_path_buf(),
            source,
        })?;

    log::info!("Repository cloned successfully to {}", target.display());
    Ok(repo)
}

/// Callbacks answering an HTTPS credential request with the API token.
///
/// libgit2 asks again after a rejected credential, so only the first request
/// is answered.
pub(crate) fn remote_callbacks(token: Option<&str>) -> RemoteCallbacks<'_> {
    let mut callbacks = RemoteCallbacks::new();

    if let Some(token) = token {
        let mut attempts = 0;
        callbacks.credentials(move |_url, _username, allowed| {
            attempts += 1;
            if attempts > 1 {
                return Err(git2::Error::from_str("credentials were rejected"));
            }
            if !allowed.contains(CredentialType::USER_PASS_PLAINTEXT) {
                return Err(git2::Error::from_str(
                    "remote does not accept token authentication",
                ));
            }
            Cred::userpass_plaintext("x-access-token", token)
        });
    }

    callbacks
}
