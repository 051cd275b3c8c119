//! bluexpc - A client-side BLE engine for the macOS Bluetooth daemon
//!
//! This library speaks the daemon's opcode/payload protocol: it decodes
//! inbound events into a typed model of discovered peripherals and their
//! GATT hierarchy, encodes outbound commands for scanning, connecting,
//! discovery and reads, and builds the attribute table for acting as a local
//! GATT server.

pub mod ble;
pub mod error;
pub mod gatt;
pub mod host;
pub mod uuid;
pub mod xpc;

// Re-export common types for convenience
pub use ble::{Ble, Event, EventBus, EventKind, SubscriptionId};
pub use error::{BleError, ChannelError, DispatchError, Result, ValueError};
pub use gatt::{
    Advertisement, Characteristic, Descriptor, Peripheral, Property, Service, State,
};
pub use uuid::Uuid;
pub use xpc::{Dict, EventHandler, LogTransport, Message, Transport, Value};
