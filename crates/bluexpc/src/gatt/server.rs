//! GATT Server attribute table
//!
//! This module turns a locally defined service tree into the sequence of
//! messages that installs it in the daemon. Attribute ids are assigned in
//! declaration order, starting at 1: each service header, then each of its
//! characteristics. Id 0 means "no attribute".

use super::types::Property;
use crate::uuid::Uuid;
use crate::xpc::{
    Dict, Message, Value, KEY_ARG_ATTRIBUTE_ID, KEY_ARG_ATTRIBUTE_IDS,
    KEY_ARG_ATTRIBUTE_PERMISSIONS, KEY_ARG_CHARACTERISTICS, KEY_ARG_CHARACTERISTIC_PROPERTIES,
    KEY_ARG_DATA, KEY_ARG_DESCRIPTORS, KEY_ARG_TYPE, KEY_ARG_UUID, MSG_REMOVE_SERVICES,
    MSG_SET_SERVICES, SERVICE_TYPE_PRIMARY,
};

// Wire property bits
pub const PROPERTY_READ: u32 = 0x0002;
pub const PROPERTY_WRITE_WITHOUT_RESPONSE: u32 = 0x0004;
pub const PROPERTY_WRITE: u32 = 0x0008;
pub const PROPERTY_NOTIFY: u32 = 0x0010;
pub const PROPERTY_INDICATE: u32 = 0x0020;
pub const PROPERTY_NOTIFY_ENCRYPTION_REQUIRED: u32 = 0x0100;
pub const PROPERTY_INDICATE_ENCRYPTION_REQUIRED: u32 = 0x0200;

// Wire permission bits
pub const PERMISSION_READABLE: u32 = 0x01;
pub const PERMISSION_WRITEABLE: u32 = 0x02;
pub const PERMISSION_READ_ENCRYPTION_REQUIRED: u32 = 0x04;
pub const PERMISSION_WRITE_ENCRYPTION_REQUIRED: u32 = 0x08;

/// A descriptor with a static value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    pub uuid: Uuid,
    pub value: Vec<u8>,
}

impl Descriptor {
    pub fn new(uuid: Uuid, value: Vec<u8>) -> Self {
        Self { uuid, value }
    }
}

/// A locally served characteristic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Characteristic {
    pub uuid: Uuid,
    pub properties: Property,
    /// Capabilities that require an encrypted link
    pub secure: Property,
    pub descriptors: Vec<Descriptor>,
    pub value: Vec<u8>,
}

impl Characteristic {
    pub fn new(uuid: Uuid, properties: Property) -> Self {
        Self {
            uuid,
            properties,
            secure: Property::empty(),
            descriptors: Vec::new(),
            value: Vec::new(),
        }
    }

    pub fn with_secure(mut self, secure: Property) -> Self {
        self.secure = secure;
        self
    }

    pub fn with_value(mut self, value: Vec<u8>) -> Self {
        self.value = value;
        self
    }

    pub fn with_descriptor(mut self, descriptor: Descriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    /// Wire property and permission bitmasks for this characteristic
    pub fn wire_flags(&self) -> (u32, u32) {
        wire_flags(self.properties, self.secure)
    }
}

/// A locally served primary service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    pub uuid: Uuid,
    pub characteristics: Vec<Characteristic>,
}

impl Service {
    pub fn new(uuid: Uuid) -> Self {
        Self {
            uuid,
            characteristics: Vec::new(),
        }
    }

    pub fn with_characteristic(mut self, characteristic: Characteristic) -> Self {
        self.characteristics.push(characteristic);
        self
    }
}

/// Derives the daemon's (properties, permissions) bitmasks.
///
/// Write takes its permission bit from the WriteWithoutResponse secure flag,
/// not from its own.
pub fn wire_flags(properties: Property, secure: Property) -> (u32, u32) {
    let mut wire_properties = 0;
    let mut permissions = 0;

    if properties.contains(Property::READ) {
        wire_properties |= PROPERTY_READ;
        permissions |= if secure.contains(Property::READ) {
            PERMISSION_READ_ENCRYPTION_REQUIRED
        } else {
            PERMISSION_READABLE
        };
    }

    if properties.contains(Property::WRITE_WITHOUT_RESPONSE) {
        wire_properties |= PROPERTY_WRITE_WITHOUT_RESPONSE;
        permissions |= if secure.contains(Property::WRITE_WITHOUT_RESPONSE) {
            PERMISSION_WRITE_ENCRYPTION_REQUIRED
        } else {
            PERMISSION_WRITEABLE
        };
    }

    if properties.contains(Property::WRITE) {
        wire_properties |= PROPERTY_WRITE;
        permissions |= if secure.contains(Property::WRITE_WITHOUT_RESPONSE) {
            PERMISSION_WRITE_ENCRYPTION_REQUIRED
        } else {
            PERMISSION_WRITEABLE
        };
    }

    if properties.contains(Property::NOTIFY) {
        wire_properties |= if secure.contains(Property::NOTIFY) {
            PROPERTY_NOTIFY_ENCRYPTION_REQUIRED
        } else {
            PROPERTY_NOTIFY
        };
    }

    if properties.contains(Property::INDICATE) {
        wire_properties |= if secure.contains(Property::INDICATE) {
            PROPERTY_INDICATE_ENCRYPTION_REQUIRED
        } else {
            PROPERTY_INDICATE
        };
    }

    (wire_properties, permissions)
}

/// An entry of the local attribute table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attribute {
    Service(Service),
    Characteristic(Characteristic),
}

impl Attribute {
    pub fn uuid(&self) -> Uuid {
        match self {
            Attribute::Service(s) => s.uuid,
            Attribute::Characteristic(c) => c.uuid,
        }
    }
}

/// Local attributes by attribute id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeTable {
    /// Index 0 is the "no attribute" sentinel
    attributes: Vec<Option<Attribute>>,
    last_service_attribute_id: u32,
}

impl AttributeTable {
    /// Builds the table for `services` and the messages that install it.
    ///
    /// The first message removes all services; then one set-services message
    /// per service carries its characteristics and descriptors.
    pub fn build(services: &[Service]) -> (Self, Vec<Message>) {
        let mut table = AttributeTable {
            attributes: vec![None],
            last_service_attribute_id: 0,
        };
        let mut messages = vec![Message::bare(MSG_REMOVE_SERVICES)];
        let mut attribute_id: u32 = 1;

        for service in services {
            let service_id = attribute_id;
            table.attributes.push(Some(Attribute::Service(service.clone())));
            table.last_service_attribute_id = service_id;
            attribute_id += 1;

            let mut characteristics = Vec::with_capacity(service.characteristics.len());
            for characteristic in &service.characteristics {
                let (properties, permissions) = characteristic.wire_flags();
                let descriptors: Vec<Value> = characteristic
                    .descriptors
                    .iter()
                    .map(|d| {
                        Value::Dict(
                            Dict::new()
                                .with(KEY_ARG_DATA, d.value.clone())
                                .with(KEY_ARG_UUID, d.uuid.to_string()),
                        )
                    })
                    .collect();

                characteristics.push(Value::Dict(
                    Dict::new()
                        .with(KEY_ARG_ATTRIBUTE_ID, attribute_id)
                        .with(KEY_ARG_ATTRIBUTE_PERMISSIONS, permissions)
                        .with(KEY_ARG_CHARACTERISTIC_PROPERTIES, properties)
                        .with(KEY_ARG_DATA, characteristic.value.clone())
                        .with(KEY_ARG_DESCRIPTORS, descriptors)
                        .with(KEY_ARG_UUID, characteristic.uuid.to_string()),
                ));
                table
                    .attributes
                    .push(Some(Attribute::Characteristic(characteristic.clone())));
                attribute_id += 1;
            }

            messages.push(Message::new(
                MSG_SET_SERVICES,
                Dict::new()
                    .with(KEY_ARG_ATTRIBUTE_ID, service_id)
                    .with(KEY_ARG_ATTRIBUTE_IDS, Vec::<Value>::new())
                    .with(KEY_ARG_CHARACTERISTICS, characteristics)
                    .with(KEY_ARG_TYPE, SERVICE_TYPE_PRIMARY)
                    .with(KEY_ARG_UUID, service.uuid.to_string()),
            ));
        }

        (table, messages)
    }

    /// The attribute pushed under `id`; `None` for 0 or unknown ids.
    pub fn get(&self, id: u32) -> Option<&Attribute> {
        self.attributes.get(id as usize).and_then(Option::as_ref)
    }

    /// Number of attributes, excluding the sentinel
    pub fn len(&self) -> usize {
        self.attributes.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Attribute id of the last service header, 0 when empty
    pub fn last_service_attribute_id(&self) -> u32 {
        self.last_service_attribute_id
    }
}
