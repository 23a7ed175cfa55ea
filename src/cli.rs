mod file_station;
mod inverter;
mod probe;
mod record;
mod upload;

use clap::{Parser, Subcommand};

use crate::cli::{probe::ProbeArgs, record::RecordArgs, upload::UploadArgs};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Main command: sample the inverter every minute and upload the daily sheet at midnight.
    #[clap(name = "record")]
    Record(Box<RecordArgs>),

    /// Read all monitored registers once and print them.
    #[clap(name = "probe")]
    Probe(Box<ProbeArgs>),

    /// Upload a file through the FileStation client, for example a daily sheet
    /// that was kept on disk after a failed upload.
    #[clap(name = "upload")]
    Upload(Box<UploadArgs>),
}
