//! `Probe` implementations standing in for a real thermocouple transport.
//!
//! - [`SimulatedRoaster`]: deterministic BT/ET curve of a full roast
//! - [`ReplayProbe`]: plays back a saved roast profile

pub mod error;
pub mod replay;
pub mod sim;

pub use error::DeviceError;
pub use replay::ReplayProbe;
pub use sim::{SimCfg, SimulatedRoaster};
