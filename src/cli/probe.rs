use clap::Parser;
use comfy_table::Table;

use crate::{api::inverter, cli::inverter::InverterArgs, prelude::*};

#[derive(Parser)]
pub struct ProbeArgs {
    #[clap(flatten)]
    inverter: InverterArgs,
}

impl ProbeArgs {
    /// Read all monitored registers once and print them.
    pub async fn run(self) -> Result {
        let mut client = inverter::Client::connect(&self.inverter.endpoint()).await?;
        let sample = client.read_sample().await?;
        client.disconnect().await;

        let mut table = Table::new();
        table.set_header(["Metric", "Value"]);
        table.add_row(["DC input 1".to_owned(), format!("{:.1} W", sample.dc_input_1)]);
        table.add_row(["DC input 2".to_owned(), format!("{:.1} W", sample.dc_input_2)]);
        table.add_row(["Battery charge".to_owned(), format!("{}%", sample.battery_charge)]);
        table.add_row([
            "Consumption from PV".to_owned(),
            format!("{:.1} W", sample.consumption_from_pv),
        ]);
        table.add_row([
            "Consumption from battery".to_owned(),
            format!("{:.1} W", sample.consumption_from_battery),
        ]);
        table.add_row(["Grid exchange".to_owned(), format!("{:+.1} W", sample.grid_exchange)]);
        println!("{table}");
        Ok(())
    }
}
