use std::path::PathBuf;

use clap::Parser;

use crate::{cli::file_station::FileStationArgs, prelude::*};

#[derive(Parser)]
pub struct UploadArgs {
    #[clap(flatten)]
    file_station: FileStationArgs,

    /// Remote directory the file is uploaded into.
    #[clap(long = "upload-path", env = "UPLOAD_PATH")]
    upload_path: String,

    /// Local file to upload, typically a daily sheet kept after a failed upload.
    file: PathBuf,
}

impl UploadArgs {
    pub async fn run(self) -> Result {
        let api = self.file_station.client()?;
        let session = api.login(&self.file_station.credentials()).await?;
        let uploaded = session.upload(&self.upload_path, &self.file).await;
        session.logout().await;
        ensure!(uploaded?, "the server rejected the upload");
        info!("uploaded");
        Ok(())
    }
}
