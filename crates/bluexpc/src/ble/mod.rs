//! BLE central and peripheral engine on top of the daemon protocol

pub mod advertisement;
pub mod command;
pub mod dispatch;
pub mod engine;
pub mod event;

#[cfg(test)]
mod tests;

pub use engine::Ble;
pub use event::{Event, EventBus, EventKind, Listener, SubscriptionId};
