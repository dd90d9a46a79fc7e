//! USB enumeration data for the mascon controllers.
//!
//! Descriptors are byte-exact copies of what the hardware reports. HID report
//! descriptors are composed at compile time from the same handful of item
//! blocks every TAITO controller uses:
//!
//! - Type 2: preamble, pad byte, axes (brake, power, horn), D-pad, 6 buttons, end
//! - Shinkansen: preamble, axes (brake, power, pedal), D-pad, 6 buttons, pad byte, end
//! - Ryojouhen: preamble, axes, D-pad, 7 buttons, 3 pad bytes, end
//!
//! See <https://marcriera.github.io/ddgo-controller-docs/controllers/usb/>.

use crate::ids::{BCD_DEVICE, BCD_USB, VENDOR_ID};
use crate::types::MasconVariant;

pub const USB_DESCRIPTOR_TYPE_DEVICE: u8 = 0x01;
pub const USB_DESCRIPTOR_TYPE_CONFIGURATION: u8 = 0x02;
pub const USB_DESCRIPTOR_TYPE_STRING: u8 = 0x03;
pub const USB_DESCRIPTOR_TYPE_INTERFACE: u8 = 0x04;
pub const USB_DESCRIPTOR_TYPE_ENDPOINT: u8 = 0x05;
pub const USB_DESCRIPTOR_TYPE_HID: u8 = 0x21;
pub const USB_DESCRIPTOR_TYPE_HID_REPORT: u8 = 0x22;

pub const USB_DEVICE_DESC_SIZE: u8 = 18;
pub const USB_CONFIGURATION_DESC_SIZE: u8 = 9;
pub const USB_INTERFACE_DESC_SIZE: u8 = 9;
pub const USB_ENDPOINT_DESC_SIZE: u8 = 7;

pub const USB_CLASS_HID: u8 = 0x03;
pub const USB_ENDPOINT_TYPE_INTERRUPT: u8 = 0x03;

/// Interrupt IN endpoint number carrying the input report.
pub const INTERRUPT_IN_ENDPOINT: u8 = 1;
/// `bEndpointAddress` of the interrupt IN endpoint.
pub const INTERRUPT_IN_EP_ADDR: u8 = 0x80 | INTERRUPT_IN_ENDPOINT;
pub const INTERRUPT_MAX_PACKET_SIZE: u16 = 8;
/// `bInterval`, 20 frames at full speed.
pub const INTERRUPT_INTERVAL: u8 = 0x14;
/// `bMaxPacketSize0` of the control endpoint.
pub const CONTROL_MAX_PACKET_SIZE: u8 = 0x08;

const fn lo(value: u16) -> u8 {
    (value & 0xFF) as u8
}

const fn hi(value: u16) -> u8 {
    (value >> 8) as u8
}

const fn device_descriptor(subclass: u8, product: u16) -> [u8; USB_DEVICE_DESC_SIZE as usize] {
    [
        USB_DEVICE_DESC_SIZE,       // bLength
        USB_DESCRIPTOR_TYPE_DEVICE, // bDescriptorType
        lo(BCD_USB),                // bcdUSB (1.1)
        hi(BCD_USB),
        0xFF,     // bDeviceClass (vendor specific)
        subclass, // bDeviceSubClass
        0x00,     // bDeviceProtocol
        CONTROL_MAX_PACKET_SIZE,
        lo(VENDOR_ID), // idVendor
        hi(VENDOR_ID),
        lo(product), // idProduct
        hi(product),
        lo(BCD_DEVICE), // bcdDevice (1.02)
        hi(BCD_DEVICE),
        0x01, // iManufacturer
        0x02, // iProduct
        0x03, // iSerialNumber
        0x01, // bNumConfigurations
    ]
}

pub const TYPE2_DEVICE_DESCRIPTOR: [u8; 18] = device_descriptor(0x04, 0x0004);
pub const SHINKANSEN_DEVICE_DESCRIPTOR: [u8; 18] = device_descriptor(0x05, 0x0005);
pub const RYOJOUHEN_DEVICE_DESCRIPTOR: [u8; 18] = device_descriptor(0xFF, 0x0007);

const CONFIG_TOTAL_LEN: u16 = 25;

/// Configuration, interface and endpoint descriptors shared by every model.
pub const CONFIG_DESCRIPTOR: [u8; CONFIG_TOTAL_LEN as usize] = [
    USB_CONFIGURATION_DESC_SIZE,       // bLength
    USB_DESCRIPTOR_TYPE_CONFIGURATION, // bDescriptorType
    lo(CONFIG_TOTAL_LEN),              // wTotalLength
    hi(CONFIG_TOTAL_LEN),
    0x01, // bNumInterfaces
    0x01, // bConfigurationValue
    0x00, // iConfiguration
    0xA0, // bmAttributes (bus powered, remote wakeup)
    0xFA, // bMaxPower (500mA)
    // Interface
    USB_INTERFACE_DESC_SIZE,
    USB_DESCRIPTOR_TYPE_INTERFACE,
    0x00, // bInterfaceNumber
    0x00, // bAlternateSetting
    0x01, // bNumEndpoints
    USB_CLASS_HID,
    0x00, // bInterfaceSubClass
    0x00, // bInterfaceProtocol
    0x00, // iInterface
    // Endpoint (interrupt IN)
    USB_ENDPOINT_DESC_SIZE,
    USB_DESCRIPTOR_TYPE_ENDPOINT,
    INTERRUPT_IN_EP_ADDR,
    USB_ENDPOINT_TYPE_INTERRUPT,
    lo(INTERRUPT_MAX_PACKET_SIZE),
    hi(INTERRUPT_MAX_PACKET_SIZE),
    INTERRUPT_INTERVAL,
];

pub const HID_PREAMBLE: [u8; 6] = [
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x04, // Usage (Joystick)
    0xA1, 0x01, // Collection (Application)
];

pub const HID_PAD_BYTE: [u8; 6] = [
    0x75, 0x08, // Report Size (8)
    0x95, 0x01, // Report Count (1)
    0x81, 0x01, // Input (Const)
];

pub const HID_AXES: [u8; 22] = [
    0x09, 0x01, // Usage (Pointer)
    0xA1, 0x00, // Collection (Physical)
    0x09, 0x30, // Usage (X)
    0x09, 0x31, // Usage (Y)
    0x09, 0x32, // Usage (Z)
    0x15, 0x00, // Logical Minimum (0)
    0x26, 0xFF, 0x00, // Logical Maximum (255)
    0x75, 0x08, // Report Size (8)
    0x95, 0x03, // Report Count (3)
    0x81, 0x02, // Input (Data,Var,Abs)
    0xC0, // End Collection
];

pub const HID_DPAD: [u8; 21] = [
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x25, 0x07, // Logical Maximum (7)
    0x46, 0x3B, 0x01, // Physical Maximum (315)
    0x75, 0x04, // Report Size (4)
    0x95, 0x01, // Report Count (1)
    0x65, 0x14, // Unit (Eng Rot: Degrees)
    0x09, 0x39, // Usage (Hat switch)
    0x81, 0x42, // Input (Data,Var,Abs,Null)
    0x65, 0x00, // Unit (None)
    0x95, 0x01, // Report Count (1)
];

/// Button block for `count` buttons, padded to a whole byte.
pub const fn hid_buttons(count: u8) -> [u8; 26] {
    [
        0x81, 0x01, // Input (Const), hat padding nibble
        0x05, 0x09, // Usage Page (Button)
        0x19, 0x01, // Usage Minimum (1)
        0x29, count, // Usage Maximum (count)
        0x15, 0x00, // Logical Minimum (0)
        0x25, 0x01, // Logical Maximum (1)
        0x35, 0x00, // Physical Minimum (0)
        0x45, 0x01, // Physical Maximum (1)
        0x75, 0x01, // Report Size (1)
        0x95, count, // Report Count (count)
        0x81, 0x02, // Input (Data,Var,Abs)
        0x95, 8 - count, // Report Count (padding)
        0x81, 0x01, // Input (Const)
    ]
}

pub const HID_END: [u8; 1] = [0xC0];

const SIX_BUTTONS: [u8; 26] = hid_buttons(6);
const SEVEN_BUTTONS: [u8; 26] = hid_buttons(7);

const fn total_len(parts: &[&[u8]]) -> usize {
    let mut len = 0;
    let mut i = 0;
    while i < parts.len() {
        len += parts[i].len();
        i += 1;
    }
    len
}

const fn assemble<const N: usize>(parts: &[&[u8]]) -> [u8; N] {
    let mut out = [0u8; N];
    let mut pos = 0;
    let mut i = 0;
    while i < parts.len() {
        let part = parts[i];
        let mut j = 0;
        while j < part.len() {
            out[pos] = part[j];
            pos += 1;
            j += 1;
        }
        i += 1;
    }
    assert!(pos == N, "descriptor fragments do not fill the table");
    out
}

const TYPE2_HID_PARTS: &[&[u8]] = &[
    &HID_PREAMBLE,
    &HID_PAD_BYTE,
    &HID_AXES, // brake, power, horn
    &HID_DPAD,
    &SIX_BUTTONS,
    &HID_END,
];

const SHINKANSEN_HID_PARTS: &[&[u8]] = &[
    &HID_PREAMBLE,
    &HID_AXES, // brake, power, pedal
    &HID_DPAD,
    &SIX_BUTTONS,
    &HID_PAD_BYTE,
    &HID_END,
];

const RYOJOUHEN_HID_PARTS: &[&[u8]] = &[
    &HID_PREAMBLE,
    &HID_AXES, // brake, power, pedal
    &HID_DPAD,
    &SEVEN_BUTTONS,
    &HID_PAD_BYTE,
    &HID_PAD_BYTE,
    &HID_PAD_BYTE,
    &HID_END,
];

pub const TYPE2_HID_REPORT_DESCRIPTOR: [u8; total_len(TYPE2_HID_PARTS)] =
    assemble(TYPE2_HID_PARTS);

pub const SHINKANSEN_HID_REPORT_DESCRIPTOR: [u8; total_len(SHINKANSEN_HID_PARTS)] =
    assemble(SHINKANSEN_HID_PARTS);

pub const RYOJOUHEN_HID_REPORT_DESCRIPTOR: [u8; total_len(RYOJOUHEN_HID_PARTS)] =
    assemble(RYOJOUHEN_HID_PARTS);

/// String descriptor table; index 0 is the (empty) language slot.
pub type StringTable = [&'static str; 4];

pub const TYPE2_STRINGS: StringTable = ["", "TAITO", "TAITO_DENSYA_CON_T01", "TCPP20009"];
pub const SHINKANSEN_STRINGS: StringTable = ["", "TAITO", "TAITO_DENSYA_CON_T02", "TCPP20011"];
pub const RYOJOUHEN_STRINGS: StringTable = ["", "TAITO", "TAITO_DENSYA_CON_T03", "TCPP20014"];

/// Index of the product string inside a [`StringTable`].
pub const STRING_INDEX_PRODUCT: usize = 2;

/// Every descriptor a model presents during enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptorSet {
    pub variant: MasconVariant,
    pub device: &'static [u8],
    pub config: &'static [u8],
    pub hid_report: &'static [u8],
    pub strings: &'static StringTable,
}

impl DescriptorSet {
    pub fn for_variant(variant: MasconVariant) -> Self {
        match variant {
            MasconVariant::Type2 => Self {
                variant,
                device: &TYPE2_DEVICE_DESCRIPTOR,
                config: &CONFIG_DESCRIPTOR,
                hid_report: &TYPE2_HID_REPORT_DESCRIPTOR,
                strings: &TYPE2_STRINGS,
            },
            MasconVariant::Shinkansen => Self {
                variant,
                device: &SHINKANSEN_DEVICE_DESCRIPTOR,
                config: &CONFIG_DESCRIPTOR,
                hid_report: &SHINKANSEN_HID_REPORT_DESCRIPTOR,
                strings: &SHINKANSEN_STRINGS,
            },
            MasconVariant::Ryojouhen => Self {
                variant,
                device: &RYOJOUHEN_DEVICE_DESCRIPTOR,
                config: &CONFIG_DESCRIPTOR,
                hid_report: &RYOJOUHEN_HID_REPORT_DESCRIPTOR,
                strings: &RYOJOUHEN_STRINGS,
            },
        }
    }

    /// String at `index`, `None` past the end of the table.
    pub fn string(&self, index: usize) -> Option<&'static str> {
        self.strings.get(index).copied()
    }

    pub fn product_string(&self) -> &'static str {
        self.strings[STRING_INDEX_PRODUCT]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hid_report_lengths() {
        assert_eq!(TYPE2_HID_REPORT_DESCRIPTOR.len(), 82);
        assert_eq!(SHINKANSEN_HID_REPORT_DESCRIPTOR.len(), 82);
        assert_eq!(RYOJOUHEN_HID_REPORT_DESCRIPTOR.len(), 94);
    }

    #[test]
    fn type2_pad_precedes_axes() {
        assert_eq!(&TYPE2_HID_REPORT_DESCRIPTOR[..6], &HID_PREAMBLE);
        assert_eq!(&TYPE2_HID_REPORT_DESCRIPTOR[6..12], &HID_PAD_BYTE);
        assert_eq!(&TYPE2_HID_REPORT_DESCRIPTOR[12..34], &HID_AXES);
        assert_eq!(TYPE2_HID_REPORT_DESCRIPTOR.last(), Some(&0xC0));
    }

    #[test]
    fn shinkansen_pad_trails_buttons() {
        let d = &SHINKANSEN_HID_REPORT_DESCRIPTOR;
        assert_eq!(&d[6..28], &HID_AXES);
        assert_eq!(&d[d.len() - 7..d.len() - 1], &HID_PAD_BYTE);
    }

    #[test]
    fn button_block_counts() {
        let six = hid_buttons(6);
        assert_eq!(six[7], 6);
        assert_eq!(six[19], 6);
        assert_eq!(six[23], 2);
        let seven = hid_buttons(7);
        assert_eq!(seven[23], 1);
    }

    #[test]
    fn device_descriptor_fields() {
        let d = &TYPE2_DEVICE_DESCRIPTOR;
        assert_eq!(d[0], 18);
        assert_eq!(d[1], USB_DESCRIPTOR_TYPE_DEVICE);
        assert_eq!(u16::from_le_bytes([d[2], d[3]]), 0x0110);
        assert_eq!(d[5], 0x04);
        assert_eq!(u16::from_le_bytes([d[8], d[9]]), VENDOR_ID);
        assert_eq!(u16::from_le_bytes([d[10], d[11]]), 0x0004);
        assert_eq!(SHINKANSEN_DEVICE_DESCRIPTOR[5], 0x05);
        assert_eq!(RYOJOUHEN_DEVICE_DESCRIPTOR[5], 0xFF);
        assert_eq!(RYOJOUHEN_DEVICE_DESCRIPTOR[10], 0x07);
    }

    #[test]
    fn config_descriptor_endpoint() {
        let ep = &CONFIG_DESCRIPTOR[18..];
        assert_eq!(ep, &[0x07, 0x05, 0x81, 0x03, 0x08, 0x00, 0x14]);
        assert_eq!(u16::from_le_bytes([CONFIG_DESCRIPTOR[2], CONFIG_DESCRIPTOR[3]]), 25);
    }

    #[test]
    fn descriptor_sets_match_variant() {
        for variant in MasconVariant::ALL {
            let set = DescriptorSet::for_variant(variant);
            assert_eq!(set.variant, variant);
            assert_eq!(set.device[5], variant.device_subclass());
            assert_eq!(set.string(3), Some(variant.model_code()));
            assert_eq!(set.string(4), None);
        }
        assert_eq!(
            DescriptorSet::for_variant(MasconVariant::Shinkansen).product_string(),
            "TAITO_DENSYA_CON_T02"
        );
    }
}
