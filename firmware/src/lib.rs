//! Firmware of a push-button receipt printer running on a Raspberry Pi.
//!
//! Tapping the button prints a slip, holding it shuts the board down.
//! Images dropped into the queue directory get printed in the background.
//! The decisions are made by `slip_control`, this crate binds them to the
//! board and the printer.

#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod config;
pub mod error;
pub mod handlers;
pub mod spool;
pub mod system;
pub mod testlib;

pub use app::App;
pub use config::{Args, Config};
pub use error::{Error, Result};
pub use handlers::{Devices, Greeter, Handlers};
