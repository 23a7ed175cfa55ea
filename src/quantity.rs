use std::fmt::{Debug, Display, Formatter};

use derive_more::From;

/// Instantaneous power.
#[must_use]
#[derive(Copy, Clone, From, PartialEq, PartialOrd)]
pub struct Watts(pub f64);

impl Watts {
    pub const ZERO: Self = Self(0.0);

    /// Sensor noise and reverse-flow artifacts may dip just below zero.
    pub fn floored_at_zero(self) -> Self {
        Self(self.0.max(0.0))
    }

    #[must_use]
    pub fn into_kilowatts(self) -> f64 {
        self.0 / 1000.0
    }
}

impl From<f32> for Watts {
    fn from(power: f32) -> Self {
        Self(f64::from(power))
    }
}

impl Display for Watts {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.0} W", self.0)
    }
}

impl Debug for Watts {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

/// Integer percentage, as the battery reports its state of charge.
#[must_use]
#[derive(Copy, Clone, Eq, From, Ord, PartialEq, PartialOrd)]
pub struct Percent(pub u16);

impl Display for Percent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl Debug for Percent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn negative_power_is_floored() {
        assert_eq!(Watts(-42.5).floored_at_zero(), Watts::ZERO);
    }

    #[test]
    fn non_negative_power_passes_through() {
        assert_relative_eq!(Watts(1185.0).floored_at_zero().0, 1185.0);
        assert_eq!(Watts::ZERO.floored_at_zero(), Watts::ZERO);
    }

    #[test]
    fn kilowatt_conversion() {
        assert_relative_eq!(Watts(1234.5).into_kilowatts(), 1.2345);
    }
}
