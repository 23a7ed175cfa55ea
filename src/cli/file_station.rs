use clap::Parser;
use reqwest::Url;

use crate::{
    api::file_station::{Credentials, FileStation},
    prelude::*,
};

#[derive(Parser)]
pub struct FileStationArgs {
    /// DiskStation base URL. For example: `https://nas.local:5001`.
    #[clap(long = "file-station-url", env = "FILE_STATION_URL")]
    base_url: Url,

    #[clap(long = "file-station-username", env = "FILE_STATION_USERNAME")]
    username: String,

    #[clap(long = "file-station-password", env = "FILE_STATION_PASSWORD")]
    password: String,
}

impl FileStationArgs {
    pub fn client(&self) -> Result<FileStation> {
        FileStation::new(self.base_url.clone())
    }

    pub fn credentials(&self) -> Credentials {
        Credentials { username: self.username.clone(), password: self.password.clone() }
    }
}
