//! Minimal protocol plumbing for the Bluetooth daemon
//!
//! Only the subset of the daemon's object model the BLE engine needs: a closed
//! value type, the message envelope, and the transport seams.

pub mod constants;
pub mod transport;
pub mod value;

pub use self::constants::*;
pub use self::transport::{EventHandler, LogTransport, Message, Transport};
pub use self::value::{Dict, Value};
