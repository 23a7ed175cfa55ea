use std::{path::PathBuf, time::Duration};

use bon::Builder;
use chrono::Local;
use clap::Parser;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

use crate::{
    api::{
        file_station::{Credentials, FileStation},
        inverter,
        inverter::Endpoint,
    },
    cli::{file_station::FileStationArgs, inverter::InverterArgs},
    core::{
        buffer::MetricBuffer,
        reading::Reading,
        schedule::{DaySchedule, align},
    },
    export::DailySheet,
    prelude::*,
};

#[derive(Parser)]
pub struct RecordArgs {
    #[clap(flatten)]
    inverter: InverterArgs,

    #[clap(flatten)]
    file_station: FileStationArgs,

    /// Remote directory the daily sheets are uploaded into.
    #[clap(long = "upload-path", env = "UPLOAD_PATH")]
    upload_path: String,

    /// Local directory the daily sheets are rendered into.
    #[clap(long = "sheet-dir", env = "SHEET_DIR", default_value = ".")]
    sheet_dir: PathBuf,

    /// How many times a daily upload may be attempted before giving up.
    #[clap(long = "upload-max-attempts", env = "UPLOAD_MAX_ATTEMPTS", default_value = "3")]
    upload_max_attempts: usize,
}

impl RecordArgs {
    pub async fn run(self) -> Result {
        let now = Local::now();
        let alignment = align(&now)?;
        info!(
            first_tick_at = %alignment.first_tick_at,
            ticks_until_day_close = alignment.ticks_until_day_close,
            "aligned to the minute boundary",
        );
        let first_tick_at = Instant::now()
            + (alignment.first_tick_at - now).to_std().context("the first tick is in the past")?;
        Recorder::builder()
            .endpoint(self.inverter.endpoint())
            .file_station(self.file_station.client()?)
            .credentials(self.file_station.credentials())
            .upload_path(self.upload_path)
            .sheet_dir(self.sheet_dir)
            .upload_max_attempts(self.upload_max_attempts)
            .schedule(DaySchedule::new(alignment.ticks_until_day_close))
            .build()
            .run(first_tick_at)
            .await
    }
}

/// The minute-tick control loop: samples the inverter on every tick and rolls
/// the day over past midnight.
#[derive(Builder)]
struct Recorder {
    endpoint: Endpoint,
    file_station: FileStation,
    credentials: Credentials,
    upload_path: String,
    sheet_dir: PathBuf,
    upload_max_attempts: usize,
    schedule: DaySchedule,

    #[builder(default)]
    buffer: MetricBuffer,

    sheet: Option<DailySheet>,
}

impl Recorder {
    const TICK_PERIOD: Duration = Duration::from_secs(60);

    async fn run(mut self, first_tick_at: Instant) -> Result {
        let mut interval = interval_at(first_tick_at, Self::TICK_PERIOD);
        // Fixed rate: a tick delayed behind a slow day-close still fires, it
        // never overlaps with or drops the next one.
        interval.set_missed_tick_behavior(MissedTickBehavior::Burst);
        loop {
            interval.tick().await;
            self.on_tick().await;
        }
    }

    async fn on_tick(&mut self) {
        let duties = self.schedule.advance();
        if duties.open_day {
            self.open_day();
        }
        if duties.close_day {
            if let Err(error) = self.close_day().await {
                error!("failed to close the day: {error:#}");
            }
            self.open_day();
        }
        match self.sample().await {
            Ok(reading) => self.buffer.append(reading),
            Err(error) => warn!("skipping this minute's sample: {error:#}"),
        }
    }

    /// Establish the sheet target the day's readings will be rendered into.
    fn open_day(&mut self) {
        let sheet = DailySheet::new(&self.sheet_dir, Local::now().date_naive());
        info!(path = %sheet.path().display(), "opened the daily sheet");
        self.sheet = Some(sheet);
    }

    /// Capture one reading.
    ///
    /// Any failure aborts the whole sample: a bad tick produces a gap in the
    /// day, never a partial row.
    async fn sample(&mut self) -> Result<Reading> {
        let mut client = inverter::Client::connect(&self.endpoint).await?;
        let timestamp = Local::now();
        let sample = client.read_sample().await?;
        client.disconnect().await;
        Ok(Reading::new(timestamp, &sample))
    }

    /// Drain the buffer, render the sheet, and upload it.
    ///
    /// The local file is removed only after a successful upload; otherwise it
    /// stays on disk for `heliograph upload`.
    #[instrument(skip_all)]
    async fn close_day(&mut self) -> Result {
        let sheet = self.sheet.take().context("no daily sheet is open")?;
        let readings = self.buffer.drain_and_clear();
        info!(n_readings = readings.len(), path = %sheet.path().display(), "closing the day…");
        sheet.render(&readings)?;

        let session = self.file_station.login(&self.credentials).await?;
        let uploaded = session
            .upload_with_retry(&self.upload_path, sheet.path(), self.upload_max_attempts)
            .await;
        session.logout().await;

        if uploaded {
            tokio::fs::remove_file(sheet.path())
                .await
                .with_context(|| format!("failed to remove `{}`", sheet.path().display()))?;
            info!("uploaded and removed the daily sheet");
        } else {
            warn!(
                path = %sheet.path().display(),
                "the upload did not go through, keeping the sheet for manual recovery",
            );
        }
        Ok(())
    }
}
