//! Synology DSM FileStation client: the daily sheets end up on a DiskStation share.

mod response;

use std::{path::Path, time::Duration};

use reqwest::{Url, multipart};
use serde::Deserialize;

use self::response::Response;
use crate::prelude::*;

pub struct FileStation {
    client: reqwest::Client,
    base_url: Url,
}

#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl FileStation {
    pub fn new(base_url: Url) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("heliograph")
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self { client, base_url })
    }

    /// Open an authenticated FileStation session.
    #[instrument(skip_all, fields(username = %credentials.username))]
    pub async fn login(&self, credentials: &Credentials) -> Result<Session<'_>> {
        #[derive(Deserialize)]
        struct LoginData {
            sid: String,
        }

        info!("logging in…");
        let url = self.base_url.join("webapi/auth.cgi")?;
        let data: LoginData = self
            .client
            .get(url)
            .query(&[
                ("api", "SYNO.API.Auth"),
                ("version", "6"),
                ("method", "login"),
                ("account", credentials.username.as_str()),
                ("passwd", credentials.password.as_str()),
                ("session", "FileStation"),
                ("format", "sid"),
            ])
            .send()
            .await
            .context("failed to call the authentication endpoint")?
            .json::<Response<LoginData>>()
            .await
            .context("failed to deserialize the authentication response")?
            .into_data()
            .context("authentication failed")?;
        Ok(Session { api: self, sid: data.sid })
    }
}

/// An authenticated FileStation session, valid until [`Session::logout`].
#[must_use]
pub struct Session<'a> {
    api: &'a FileStation,
    sid: String,
}

impl Session<'_> {
    /// Upload the file into the remote directory.
    ///
    /// Returns whether the server accepted the upload.
    #[instrument(skip_all, fields(remote_dir = remote_dir, path = %local_path.display()))]
    pub async fn upload(&self, remote_dir: &str, local_path: &Path) -> Result<bool> {
        let file_name = local_path
            .file_name()
            .with_context(|| format!("`{}` has no file name", local_path.display()))?
            .to_string_lossy()
            .into_owned();
        let contents = tokio::fs::read(local_path)
            .await
            .with_context(|| format!("failed to read `{}`", local_path.display()))?;
        let form = multipart::Form::new()
            .text("api", "SYNO.FileStation.Upload")
            .text("version", "2")
            .text("method", "upload")
            .text("path", remote_dir.to_owned())
            .text("create_parents", "true")
            .text("overwrite", "true")
            .part("file", multipart::Part::bytes(contents).file_name(file_name));

        info!("uploading…");
        let url = self.api.base_url.join("webapi/entry.cgi")?;
        let response: Response<serde_json::Value> = self
            .api
            .client
            .post(url)
            .query(&[("_sid", self.sid.as_str())])
            .multipart(form)
            .send()
            .await
            .context("failed to call the upload endpoint")?
            .json()
            .await
            .context("failed to deserialize the upload response")?;
        Ok(response.is_success())
    }

    /// Upload with a bounded number of attempts, stopping on the first success.
    ///
    /// The daily upload is a low-frequency operation, so the attempts run back
    /// to back without backoff. Transport errors and rejections both consume
    /// an attempt.
    pub async fn upload_with_retry(
        &self,
        remote_dir: &str,
        local_path: &Path,
        max_attempts: usize,
    ) -> bool {
        for attempt in 1..=max_attempts {
            match self.upload(remote_dir, local_path).await {
                Ok(true) => {
                    info!(attempt, "uploaded");
                    return true;
                }
                Ok(false) => warn!(attempt, max_attempts, "the server rejected the upload"),
                Err(error) => warn!(attempt, max_attempts, "the upload attempt failed: {error:#}"),
            }
        }
        false
    }

    /// Close the session. Failures are only logged: the session expires
    /// server-side anyway.
    pub async fn logout(self) {
        if let Err(error) = self.try_logout().await {
            warn!("failed to log out: {error:#}");
        }
    }

    #[instrument(skip_all)]
    async fn try_logout(&self) -> Result {
        info!("logging out…");
        let url = self.api.base_url.join("webapi/auth.cgi")?;
        self.api
            .client
            .get(url)
            .query(&[
                ("api", "SYNO.API.Auth"),
                ("version", "6"),
                ("method", "logout"),
                ("session", "FileStation"),
                ("_sid", self.sid.as_str()),
            ])
            .send()
            .await
            .context("failed to call the authentication endpoint")?;
        Ok(())
    }
}
