//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod actuator;
pub mod controller;
pub mod display;
pub mod http;
pub mod link;
pub mod tick;

pub use actuator::{actuator_task, Outputs};
pub use controller::controller_task;
pub use display::{display_task, Lcd};
pub use http::http_task;
pub use link::{connection_task, net_task, WifiLink};
pub use tick::tick_task;
