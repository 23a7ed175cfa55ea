//! Daily sheet rendering.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::{core::reading::Reading, prelude::*};

/// One day's spreadsheet target.
///
/// Day-open fixes the path and layout; the rows are rendered in a single pass
/// at day-close, from the drained buffer.
#[must_use]
pub struct DailySheet {
    path: PathBuf,
}

impl DailySheet {
    const HEADER: [&str; 8] = [
        "Timestamp",
        "DC input 1 (kW)",
        "DC input 2 (kW)",
        "Battery charge (%)",
        "Consumption from PV (kW)",
        "Consumption from Battery (kW)",
        "Grid purchase (kW)",
        "Grid feed-in (kW)",
    ];

    pub fn new(directory: &Path, date: NaiveDate) -> Self {
        Self { path: directory.join(format!("{}.csv", date.format("%Y-%m-%d"))) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the header and all the readings to the sheet file.
    #[instrument(skip_all, fields(path = %self.path.display(), n_readings = readings.len()))]
    pub fn render(&self, readings: &[Reading]) -> Result {
        let mut writer = csv::Writer::from_path(&self.path)
            .with_context(|| format!("failed to create `{}`", self.path.display()))?;
        writer.write_record(Self::HEADER)?;
        for reading in readings {
            writer.write_record([
                reading.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                format!("{:.2}", reading.dc_input_1.into_kilowatts()),
                format!("{:.2}", reading.dc_input_2.into_kilowatts()),
                reading.battery_charge.0.to_string(),
                format!("{:.2}", reading.consumption_from_pv.into_kilowatts()),
                format!("{:.2}", reading.consumption_from_battery.into_kilowatts()),
                format!("{:.2}", reading.grid_purchase.into_kilowatts()),
                format!("{:.2}", reading.grid_feed_in.into_kilowatts()),
            ])?;
        }
        writer.flush().context("failed to flush the sheet")?;
        Ok(())
    }
}
