//! Hardware abstraction traits
//!
//! These traits define the interface between the application logic
//! and board-specific implementations.

pub mod network;
pub mod output;

pub use network::NetworkLink;
pub use output::{ActuatorError, ActuatorOutput};
