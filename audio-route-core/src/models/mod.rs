pub mod config;
pub mod device;
pub mod error;
pub mod params;
pub mod profile;
pub mod warning;
