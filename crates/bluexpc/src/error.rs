//! Error types for the bluexpc library
//!
//! This module defines the error types used throughout the library, one enum
//! per layer: value decoding, the daemon channel, inbound dispatch, and the
//! outward-facing operations.

use crate::uuid::Uuid;
use thiserror::Error;

/// Errors raised by the typed accessors of the value codec
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("Missing field: {0}")]
    MissingKey(String),

    #[error("Field {key} has type {found}, expected {expected}")]
    WrongType {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Field {key} is out of range: {value}")]
    OutOfRange { key: String, value: i64 },

    #[error("Invalid UUID: {0}")]
    InvalidUuid(String),
}

/// Connection-lifecycle errors delivered by a transport instead of a message
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    #[error("connection invalid")]
    Invalid,

    #[error("connection interrupted")]
    Interrupted,

    #[error("connection terminated")]
    Terminated,

    #[error("channel error: {0}")]
    Other(String),
}

/// Reasons an inbound message is dropped without emitting an event
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Malformed message: {0}")]
    Value(#[from] ValueError),

    #[error("No peripheral {0}")]
    UnknownPeripheral(Uuid),

    #[error("No service with start handle {0}")]
    UnknownService(u16),

    #[error("No characteristic with handle {0}")]
    UnknownCharacteristic(u16),

    #[error("Invalid radio state {0}")]
    InvalidState(i64),

    #[error("{operation} failed with result {result}")]
    OperationFailed {
        operation: &'static str,
        result: i64,
    },
}

/// Errors returned by the engine's outward operations
#[derive(Error, Debug)]
pub enum BleError {
    #[error("No peripheral {0}")]
    UnknownPeripheral(Uuid),

    #[error("No service {0}")]
    UnknownService(String),

    #[error("No characteristic {0}")]
    UnknownCharacteristic(String),

    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),
}

pub type Result<T> = std::result::Result<T, BleError>;
