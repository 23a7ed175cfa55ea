use crate::core::reading::Reading;

/// Accumulates the open day's readings.
///
/// Owned by the recorder and passed around explicitly: an append happens only
/// on a successful sample, and the day-close drain transfers the whole
/// sequence out at once, so no reading is ever delivered twice.
#[must_use]
#[derive(Default)]
pub struct MetricBuffer(Vec<Reading>);

impl MetricBuffer {
    pub fn append(&mut self, reading: Reading) {
        self.0.push(reading);
    }

    /// Take every buffered reading, leaving the buffer empty.
    pub fn drain_and_clear(&mut self) -> Vec<Reading> {
        std::mem::take(&mut self.0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Local;

    use super::*;
    use crate::api::inverter::RegisterSample;

    fn reading() -> Reading {
        Reading::new(
            Local::now(),
            &RegisterSample {
                dc_input_1: 100.0,
                dc_input_2: 200.0,
                battery_charge: 57,
                consumption_from_pv: 300.0,
                consumption_from_battery: 0.0,
                grid_exchange: -150.0,
            },
        )
    }

    #[test]
    fn append_grows_by_one() {
        let mut buffer = MetricBuffer::default();
        assert!(buffer.is_empty());
        buffer.append(reading());
        assert_eq!(buffer.len(), 1);
        buffer.append(reading());
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn drain_empties_the_buffer() {
        let mut buffer = MetricBuffer::default();
        buffer.append(reading());
        buffer.append(reading());
        assert_eq!(buffer.drain_and_clear().len(), 2);
        assert!(buffer.is_empty());
    }

    #[test]
    fn a_second_drain_yields_nothing() {
        let mut buffer = MetricBuffer::default();
        buffer.append(reading());
        let _ = buffer.drain_and_clear();
        assert!(buffer.drain_and_clear().is_empty());
    }
}
