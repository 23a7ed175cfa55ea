pub mod file_station;
pub mod inverter;
