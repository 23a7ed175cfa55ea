//! Modbus TCP client for the Plenticore hybrid inverter.

pub mod register;

use std::time::Duration;

use tokio::{net::TcpStream, time::timeout};
use tokio_modbus::{
    Slave,
    client::{Client as _, Reader, tcp::attach_slave},
};

use self::register::Register;
use crate::prelude::*;

/// Modbus connection endpoint of the inverter.
#[derive(Clone)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    pub unit_id: u8,
}

/// One raw pass over the monitored registers, before normalization.
#[must_use]
#[derive(Copy, Clone)]
pub struct RegisterSample {
    pub dc_input_1: f32,
    pub dc_input_2: f32,
    pub battery_charge: u16,
    pub consumption_from_pv: f32,
    pub consumption_from_battery: f32,

    /// Signed: positive is purchase from the grid, negative is feed-in.
    pub grid_exchange: f32,
}

#[must_use]
pub struct Client(tokio_modbus::client::Context);

impl Client {
    const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
    const READ_TIMEOUT: Duration = Duration::from_secs(10);

    #[instrument(skip_all, fields(host = %endpoint.host, port = endpoint.port))]
    pub async fn connect(endpoint: &Endpoint) -> Result<Self> {
        debug!("connecting…");
        let stream = timeout(
            Self::CONNECT_TIMEOUT,
            TcpStream::connect((endpoint.host.as_str(), endpoint.port)),
        )
        .await
        .context("timed out while connecting to the inverter")?
        .context("failed to connect to the inverter")?;
        stream.set_nodelay(true)?;
        Ok(Self(attach_slave(stream, Slave(endpoint.unit_id))))
    }

    /// Read every register that makes up one sample.
    #[instrument(skip_all)]
    pub async fn read_sample(&mut self) -> Result<RegisterSample> {
        Ok(RegisterSample {
            dc_input_1: f32::try_from(self.read(register::POWER_DC1).await?)?,
            dc_input_2: f32::try_from(self.read(register::POWER_DC2).await?)?,
            battery_charge: u16::try_from(self.read(register::BATTERY_STATE_OF_CHARGE).await?)?,
            consumption_from_pv: f32::try_from(
                self.read(register::HOME_CONSUMPTION_FROM_PV).await?,
            )?,
            consumption_from_battery: f32::try_from(
                self.read(register::HOME_CONSUMPTION_FROM_BATTERY).await?,
            )?,
            grid_exchange: f32::try_from(self.read(register::HOME_CONSUMPTION_FROM_GRID).await?)?,
        })
    }

    /// Close the connection. Errors are only logged, the next tick reconnects anyway.
    pub async fn disconnect(mut self) {
        if let Err(error) = self.0.disconnect().await {
            debug!("failed to disconnect from the inverter: {error:#}");
        }
    }

    #[instrument(skip_all, level = "debug", fields(address = register.address))]
    async fn read(&mut self, register: Register) -> Result<register::Value> {
        let words = self.read_words(register).await?;
        let value = register.data_type.decode(&words);
        debug!(?value, "read");
        Ok(value)
    }

    async fn read_words(&mut self, register: Register) -> Result<Vec<u16>> {
        let n_words = register.data_type.num_words();
        let words = timeout(
            Self::READ_TIMEOUT,
            self.0.read_holding_registers(register.address, n_words),
        )
        .await
        .with_context(|| format!("timed out reading register #{}", register.address))???;
        ensure!(
            words.len() == usize::from(n_words),
            "read {} words from register #{} while expected {}",
            words.len(),
            register.address,
            n_words,
        );
        Ok(words)
    }
}
