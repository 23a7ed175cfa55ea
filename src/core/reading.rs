use chrono::{DateTime, Local};

use crate::{
    api::inverter::RegisterSample,
    quantity::{Percent, Watts},
};

/// One timestamped set of inverter metrics captured in a single tick.
#[must_use]
#[derive(Clone, Debug)]
pub struct Reading {
    pub timestamp: DateTime<Local>,
    pub dc_input_1: Watts,
    pub dc_input_2: Watts,
    pub battery_charge: Percent,
    pub consumption_from_pv: Watts,
    pub consumption_from_battery: Watts,
    pub grid_purchase: Watts,
    pub grid_feed_in: Watts,
}

impl Reading {
    /// Normalize a raw register sample.
    ///
    /// The DC inputs are floored at zero, and the signed grid exchange is
    /// split at zero: positive becomes purchase, negated negative becomes
    /// feed-in, so at most one of the two is nonzero.
    pub fn new(timestamp: DateTime<Local>, sample: &RegisterSample) -> Self {
        let grid_exchange = f64::from(sample.grid_exchange);
        Self {
            timestamp,
            dc_input_1: Watts::from(sample.dc_input_1).floored_at_zero(),
            dc_input_2: Watts::from(sample.dc_input_2).floored_at_zero(),
            battery_charge: Percent::from(sample.battery_charge),
            consumption_from_pv: Watts::from(sample.consumption_from_pv),
            consumption_from_battery: Watts::from(sample.consumption_from_battery),
            grid_purchase: Watts(grid_exchange.max(0.0)),
            grid_feed_in: Watts((-grid_exchange).max(0.0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn sample() -> RegisterSample {
        RegisterSample {
            dc_input_1: 0.0,
            dc_input_2: 0.0,
            battery_charge: 57,
            consumption_from_pv: 0.0,
            consumption_from_battery: 0.0,
            grid_exchange: 0.0,
        }
    }

    #[test]
    fn positive_grid_exchange_is_a_purchase() {
        let reading = Reading::new(Local::now(), &RegisterSample { grid_exchange: 250.5, ..sample() });
        assert_relative_eq!(reading.grid_purchase.0, 250.5);
        assert_eq!(reading.grid_feed_in, Watts::ZERO);
    }

    #[test]
    fn negative_grid_exchange_is_a_feed_in() {
        let reading = Reading::new(Local::now(), &RegisterSample { grid_exchange: -250.5, ..sample() });
        assert_eq!(reading.grid_purchase, Watts::ZERO);
        assert_relative_eq!(reading.grid_feed_in.0, 250.5);
    }

    #[test]
    fn zero_grid_exchange_splits_into_two_zeroes() {
        let reading = Reading::new(Local::now(), &sample());
        assert_eq!(reading.grid_purchase, Watts::ZERO);
        assert_eq!(reading.grid_feed_in, Watts::ZERO);
    }

    #[test]
    fn negative_dc_inputs_are_floored() {
        let reading = Reading::new(
            Local::now(),
            &RegisterSample { dc_input_1: -3.2, dc_input_2: -0.1, ..sample() },
        );
        assert_eq!(reading.dc_input_1, Watts::ZERO);
        assert_eq!(reading.dc_input_2, Watts::ZERO);
    }

    #[test]
    fn non_negative_dc_inputs_pass_through() {
        let reading = Reading::new(
            Local::now(),
            &RegisterSample { dc_input_1: 1185.0, dc_input_2: 0.0, ..sample() },
        );
        assert_relative_eq!(reading.dc_input_1.0, 1185.0);
        assert_eq!(reading.dc_input_2, Watts::ZERO);
    }
}
