pub mod behaviours;
pub mod config;
pub mod preview;
pub mod resolve;
pub mod simulate;
