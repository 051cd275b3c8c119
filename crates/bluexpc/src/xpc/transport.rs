//! Message envelope and the channel seams to the Bluetooth daemon
//!
//! A transport owns the actual inter-process channel. The engine only sees
//! the `Transport` trait for outbound messages and implements `EventHandler`
//! for inbound ones. Whoever opens the channel hands the engine handle to the
//! transport, which passes it back on every callback.

use super::constants::{KEY_MSG_ARGS, KEY_MSG_ID};
use super::value::{Dict, Value};
use crate::error::{ChannelError, ValueError};
use log::info;

/// A protocol message: an opcode plus an optional argument dictionary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: i64,
    pub args: Option<Dict>,
}

impl Message {
    pub fn new(id: i64, args: Dict) -> Self {
        Self { id, args: Some(args) }
    }

    /// A message without arguments
    pub fn bare(id: i64) -> Self {
        Self { id, args: None }
    }

    /// Arguments, or an empty dictionary for bare messages
    pub fn args(&self) -> Dict {
        self.args.clone().unwrap_or_default()
    }

    /// Encodes the two-field envelope. Bare messages omit the args key.
    pub fn to_value(&self) -> Value {
        let mut envelope = Dict::new().with(KEY_MSG_ID, self.id);
        if let Some(args) = &self.args {
            envelope.insert(KEY_MSG_ARGS, args.clone());
        }
        Value::Dict(envelope)
    }

    /// Decodes an inbound envelope. Both the opcode and the args are required.
    pub fn from_dict(envelope: &Dict) -> Result<Self, ValueError> {
        let id = envelope.get_int(KEY_MSG_ID)?;
        let args = envelope.get_dict(KEY_MSG_ARGS)?.clone();
        Ok(Self::new(id, args))
    }
}

/// Outbound half of a daemon channel
pub trait Transport: Send + Sync {
    /// Sends a message. Delivery is fire-and-forget; any reply arrives later
    /// as an ordinary inbound event.
    fn send(&self, message: &Message) -> Result<(), ChannelError>;
}

/// Inbound half: receives either a decoded envelope or a lifecycle error
pub trait EventHandler: Send + Sync {
    fn handle_event(&self, event: Result<Dict, ChannelError>);
}

/// Transport that only logs what would be sent.
///
/// Useful where no daemon channel is available; it never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTransport;

impl Transport for LogTransport {
    fn send(&self, message: &Message) -> Result<(), ChannelError> {
        info!("send {}", message.to_value());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_roundtrip() {
        let message = Message::new(29, Dict::new().with("kCBMsgArgUUIDs", Value::Array(vec![])));
        let value = message.to_value();
        let envelope = value.as_dict().unwrap();
        assert_eq!(envelope.get_int(KEY_MSG_ID), Ok(29));
        assert_eq!(Message::from_dict(envelope), Ok(message));
    }

    #[test]
    fn test_bare_message_omits_args() {
        let value = Message::bare(9).to_value();
        let envelope = value.as_dict().unwrap();
        assert_eq!(envelope.len(), 1);
        assert!(!envelope.contains(KEY_MSG_ARGS));
        assert!(Message::from_dict(envelope).is_err());
    }
}
