//! Wire constants of the Bluetooth daemon protocol
//!
//! Opcodes and payload key names must match the daemon exactly.

/// Mach service name of the Bluetooth daemon
pub const BLUED_SERVICE: &str = "com.apple.blued";

// Inbound event opcodes
pub const EVT_STATE_CHANGE: i64 = 6;
pub const EVT_ADVERTISING_START: i64 = 16;
pub const EVT_ADVERTISING_STOP: i64 = 17;
pub const EVT_DISCOVER: i64 = 37;
pub const EVT_CONNECT: i64 = 38;
pub const EVT_DISCONNECT: i64 = 40;
pub const EVT_MTU_CHANGE: i64 = 53;
pub const EVT_RSSI_UPDATE: i64 = 54;
pub const EVT_SERVICES_DISCOVER: i64 = 55;
pub const EVT_CHARACTERISTICS_DISCOVER: i64 = 63;
pub const EVT_READ: i64 = 70;
pub const EVT_DESCRIPTORS_DISCOVER: i64 = 75;

// Outbound command opcodes
pub const MSG_INIT: i64 = 1;
pub const MSG_START_ADVERTISING: i64 = 8;
pub const MSG_STOP_ADVERTISING: i64 = 9;
pub const MSG_SET_SERVICES: i64 = 10;
pub const MSG_REMOVE_SERVICES: i64 = 12;
pub const MSG_START_SCANNING: i64 = 29;
pub const MSG_STOP_SCANNING: i64 = 30;
pub const MSG_CONNECT: i64 = 31;
pub const MSG_DISCONNECT: i64 = 32;
pub const MSG_UPDATE_RSSI: i64 = 43;
pub const MSG_DISCOVER_SERVICES: i64 = 44;
pub const MSG_DISCOVER_CHARACTERISTICS: i64 = 61;
pub const MSG_READ: i64 = 64;
pub const MSG_DISCOVER_DESCRIPTORS: i64 = 69;

// Envelope
pub const KEY_MSG_ID: &str = "kCBMsgId";
pub const KEY_MSG_ARGS: &str = "kCBMsgArgs";

// Message arguments
pub const KEY_ARG_ATT_MTU: &str = "kCBMsgArgATTMTU";
pub const KEY_ARG_ADVERTISEMENT_DATA: &str = "kCBMsgArgAdvertisementData";
pub const KEY_ARG_ATTRIBUTE_ID: &str = "kCBMsgArgAttributeID";
pub const KEY_ARG_ATTRIBUTE_IDS: &str = "kCBMsgArgAttributeIDs";
pub const KEY_ARG_ATTRIBUTE_PERMISSIONS: &str = "kCBMsgArgAttributePermissions";
pub const KEY_ARG_CHARACTERISTICS: &str = "kCBMsgArgCharacteristics";
pub const KEY_ARG_CHARACTERISTIC_HANDLE: &str = "kCBMsgArgCharacteristicHandle";
pub const KEY_ARG_CHARACTERISTIC_PROPERTIES: &str = "kCBMsgArgCharacteristicProperties";
pub const KEY_ARG_CHARACTERISTIC_VALUE_HANDLE: &str = "kCBMsgArgCharacteristicValueHandle";
pub const KEY_ARG_DATA: &str = "kCBMsgArgData";
pub const KEY_ARG_DESCRIPTORS: &str = "kCBMsgArgDescriptors";
pub const KEY_ARG_DESCRIPTOR_HANDLE: &str = "kCBMsgArgDescriptorHandle";
pub const KEY_ARG_DEVICE_UUID: &str = "kCBMsgArgDeviceUUID";
pub const KEY_ARG_IS_NOTIFICATION: &str = "kCBMsgArgIsNotification";
pub const KEY_ARG_NAME: &str = "kCBMsgArgName";
pub const KEY_ARG_OPTIONS: &str = "kCBMsgArgOptions";
pub const KEY_ARG_RESULT: &str = "kCBMsgArgResult";
pub const KEY_ARG_RSSI: &str = "kCBMsgArgRssi";
pub const KEY_ARG_SERVICES: &str = "kCBMsgArgServices";
pub const KEY_ARG_SERVICE_END_HANDLE: &str = "kCBMsgArgServiceEndHandle";
pub const KEY_ARG_SERVICE_START_HANDLE: &str = "kCBMsgArgServiceStartHandle";
pub const KEY_ARG_STATE: &str = "kCBMsgArgState";
pub const KEY_ARG_TYPE: &str = "kCBMsgArgType";
pub const KEY_ARG_UUID: &str = "kCBMsgArgUUID";
pub const KEY_ARG_UUIDS: &str = "kCBMsgArgUUIDs";

// Option keys
pub const KEY_OPT_SHOW_POWER_ALERT: &str = "kCBInitOptionShowPowerAlert";
pub const KEY_OPT_ALLOW_DUPLICATES: &str = "kCBScanOptionAllowDuplicates";
pub const KEY_OPT_NOTIFY_ON_DISCONNECTION: &str = "kCBConnectOptionNotifyOnDisconnection";

// Advertisement data
pub const KEY_ADV_LOCAL_NAME: &str = "kCBAdvDataLocalName";
pub const KEY_ADV_TX_POWER_LEVEL: &str = "kCBAdvDataTxPowerLevel";
pub const KEY_ADV_MANUFACTURER_DATA: &str = "kCBAdvDataManufacturerData";
pub const KEY_ADV_SERVICE_DATA: &str = "kCBAdvDataServiceData";
pub const KEY_ADV_SERVICE_UUIDS: &str = "kCBAdvDataServiceUUIDs";
pub const KEY_ADV_IS_CONNECTABLE: &str = "kCBAdvDataIsConnectable";
pub const KEY_ADV_APPLE_MFG_DATA: &str = "kCBAdvDataAppleMfgData";
pub const KEY_ADV_APPLE_BEACON_KEY: &str = "kCBAdvDataAppleBeaconKey";

// Service declaration type for the local attribute table (0 would exclude it)
pub const SERVICE_TYPE_PRIMARY: i64 = 1;
