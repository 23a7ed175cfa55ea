pub mod buffer;
pub mod reading;
pub mod schedule;
