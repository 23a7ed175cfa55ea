use clap::Parser;

use crate::api::inverter::Endpoint;

#[derive(Parser)]
pub struct InverterArgs {
    /// Inverter Modbus TCP host.
    #[clap(long = "inverter-host", env = "INVERTER_HOST")]
    host: String,

    /// Inverter Modbus TCP port.
    #[clap(long = "inverter-port", env = "INVERTER_PORT", default_value = "1502")]
    port: u16,

    /// Modbus unit identifier of the inverter.
    #[clap(long = "inverter-unit-id", env = "INVERTER_UNIT_ID", default_value = "71")]
    unit_id: u8,
}

impl InverterArgs {
    pub fn endpoint(&self) -> Endpoint {
        Endpoint { host: self.host.clone(), port: self.port, unit_id: self.unit_id }
    }
}
