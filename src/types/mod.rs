pub mod date_range;
pub mod incidence;
pub mod joined;
pub mod region;
pub mod weather;
