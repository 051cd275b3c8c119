//! Example demonstrating a local GATT server
//!
//! This example builds a battery service and a custom service, pushes them to
//! the daemon and prints the attribute ids they were assigned. Messages go to
//! a logging transport, so it runs without a daemon.

use bluexpc::gatt::Attribute;
use bluexpc::{Ble, Characteristic, Descriptor, LogTransport, Property, Service, Uuid};
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let ble = Ble::new(Arc::new(LogTransport));
    ble.init()?;

    // Battery service with a readable, notifying level
    let battery = Service::new(Uuid::from_u16(0x180F)).with_characteristic(
        Characteristic::new(Uuid::from_u16(0x2A19), Property::READ | Property::NOTIFY)
            .with_value(vec![100])
            .with_descriptor(Descriptor::new(Uuid::from_u16(0x2901), b"Battery".to_vec())),
    );

    // Custom service with a write that needs an encrypted link
    let custom_uuid: Uuid = "b40e1000-5e7c-1c3e-0000-000000000000".parse()?;
    let command_uuid: Uuid = "b40e1003-5e7c-1c3e-0000-000000000000".parse()?;
    let custom = Service::new(custom_uuid).with_characteristic(
        Characteristic::new(command_uuid, Property::WRITE | Property::WRITE_WITHOUT_RESPONSE)
            .with_secure(Property::WRITE_WITHOUT_RESPONSE),
    );

    ble.set_services(&[battery, custom])?;

    let mut id = 1;
    while let Some(attribute) = ble.attribute(id) {
        match attribute {
            Attribute::Service(s) => println!("{:>3}  service         {}", id, s.uuid.hyphenated()),
            Attribute::Characteristic(c) => {
                let (properties, permissions) = c.wire_flags();
                println!(
                    "{:>3}  characteristic  {}  [{}] properties 0x{:03x} permissions 0x{:02x}",
                    id,
                    c.uuid.hyphenated(),
                    c.properties,
                    properties,
                    permissions
                );
            }
        }
        id += 1;
    }

    Ok(())
}
