//! GATT (Generic Attribute Profile) model
//!
//! This module holds the discovered remote hierarchy (peripherals, services,
//! characteristics and descriptors) and the local attribute table used when
//! acting as a GATT server.

pub mod known;
pub mod registry;
pub mod server;
pub mod types;


pub use registry::{HandleMap, Registry, Shared};
pub use server::{wire_flags, Attribute, AttributeTable, Characteristic, Descriptor, Service};
pub use types::{
    Advertisement, CharacteristicDescriptor, Peripheral, Property, ServiceCharacteristic,
    ServiceData, ServiceHandle, State,
};
