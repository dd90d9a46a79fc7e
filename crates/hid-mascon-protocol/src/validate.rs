//! Structural checks on device and configuration descriptors.
//!
//! Runs once at device creation so a broken table aborts the attach instead of
//! confusing the guest during enumeration. Only layout is checked: lengths,
//! descriptor types, and interface/endpoint counts.

use crate::descriptors::{
    USB_CONFIGURATION_DESC_SIZE, USB_DESCRIPTOR_TYPE_CONFIGURATION, USB_DESCRIPTOR_TYPE_DEVICE,
    USB_DESCRIPTOR_TYPE_ENDPOINT, USB_DESCRIPTOR_TYPE_INTERFACE, USB_DEVICE_DESC_SIZE,
    USB_ENDPOINT_DESC_SIZE, USB_INTERFACE_DESC_SIZE,
};
use crate::{MasconError, MasconResult};

/// Forward-only reader over a descriptor byte stream.
struct DescriptorReader<'a> {
    kind: &'static str,
    buffer: &'a [u8],
    position: usize,
}

impl<'a> DescriptorReader<'a> {
    fn new(kind: &'static str, buffer: &'a [u8]) -> Self {
        Self {
            kind,
            buffer,
            position: 0,
        }
    }

    fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.position)
    }

    fn error(&self, reason: impl Into<String>) -> MasconError {
        MasconError::InvalidDescriptor {
            kind: self.kind,
            reason: reason.into(),
        }
    }

    fn read_u8(&mut self) -> MasconResult<u8> {
        let value = self
            .buffer
            .get(self.position)
            .copied()
            .ok_or_else(|| self.error(format!("unexpected end of data at byte {}", self.position)))?;
        self.position += 1;
        Ok(value)
    }

    fn read_u16_le(&mut self) -> MasconResult<u16> {
        let lo = u16::from(self.read_u8()?);
        let hi = u16::from(self.read_u8()?);
        Ok(lo | (hi << 8))
    }

    fn peek_u8(&self, offset: usize) -> Option<u8> {
        self.buffer.get(self.position + offset).copied()
    }

    /// Check a descriptor header (`bLength`, `bDescriptorType`) and consume it.
    fn header(&mut self, expected_type: u8, expected_len: u8) -> MasconResult<()> {
        let length = self.read_u8()?;
        let descriptor_type = self.read_u8()?;
        if descriptor_type != expected_type {
            return Err(self.error(format!(
                "expected descriptor type {expected_type:#04x}, got {descriptor_type:#04x}"
            )));
        }
        if length != expected_len {
            return Err(self.error(format!(
                "descriptor type {expected_type:#04x} has bLength {length}, expected {expected_len}"
            )));
        }
        if self.remaining() < usize::from(length) - 2 {
            return Err(self.error(format!(
                "descriptor type {expected_type:#04x} truncated: {} of {} bytes",
                self.remaining() + 2,
                length
            )));
        }
        Ok(())
    }
}

/// Parsed standard device descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceDescriptor {
    pub bcd_usb: u16,
    pub device_class: u8,
    pub device_subclass: u8,
    pub device_protocol: u8,
    pub max_packet_size0: u8,
    pub vendor_id: u16,
    pub product_id: u16,
    pub bcd_device: u16,
    pub manufacturer_index: u8,
    pub product_index: u8,
    pub serial_index: u8,
    pub num_configurations: u8,
}

impl DeviceDescriptor {
    pub fn parse(data: &[u8]) -> MasconResult<Self> {
        let mut r = DescriptorReader::new("device", data);
        r.header(USB_DESCRIPTOR_TYPE_DEVICE, USB_DEVICE_DESC_SIZE)?;
        let desc = Self {
            bcd_usb: r.read_u16_le()?,
            device_class: r.read_u8()?,
            device_subclass: r.read_u8()?,
            device_protocol: r.read_u8()?,
            max_packet_size0: r.read_u8()?,
            vendor_id: r.read_u16_le()?,
            product_id: r.read_u16_le()?,
            bcd_device: r.read_u16_le()?,
            manufacturer_index: r.read_u8()?,
            product_index: r.read_u8()?,
            serial_index: r.read_u8()?,
            num_configurations: r.read_u8()?,
        };
        if !matches!(desc.max_packet_size0, 8 | 16 | 32 | 64) {
            return Err(r.error(format!(
                "invalid bMaxPacketSize0 {}",
                desc.max_packet_size0
            )));
        }
        if desc.num_configurations == 0 {
            return Err(r.error("no configurations"));
        }
        if r.remaining() != 0 {
            return Err(r.error(format!("{} trailing bytes", r.remaining())));
        }
        Ok(desc)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointDescriptor {
    pub address: u8,
    pub attributes: u8,
    pub max_packet_size: u16,
    pub interval: u8,
}

impl EndpointDescriptor {
    pub fn number(&self) -> u8 {
        self.address & 0x0F
    }

    pub fn is_in(&self) -> bool {
        self.address & 0x80 != 0
    }

    /// Transfer type bits of `bmAttributes`.
    pub fn transfer_type(&self) -> u8 {
        self.attributes & 0x03
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDescriptor {
    pub number: u8,
    pub alternate_setting: u8,
    pub class: u8,
    pub subclass: u8,
    pub protocol: u8,
    pub endpoints: Vec<EndpointDescriptor>,
}

/// Parsed configuration descriptor with its interfaces and endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDescriptor {
    pub total_length: u16,
    pub configuration_value: u8,
    pub attributes: u8,
    pub max_power: u8,
    pub interfaces: Vec<InterfaceDescriptor>,
}

impl ConfigDescriptor {
    pub fn parse(data: &[u8]) -> MasconResult<Self> {
        let mut r = DescriptorReader::new("configuration", data);
        r.header(USB_DESCRIPTOR_TYPE_CONFIGURATION, USB_CONFIGURATION_DESC_SIZE)?;
        let total_length = r.read_u16_le()?;
        let num_interfaces = r.read_u8()?;
        let configuration_value = r.read_u8()?;
        let _configuration_string = r.read_u8()?;
        let attributes = r.read_u8()?;
        let max_power = r.read_u8()?;

        if usize::from(total_length) != data.len() {
            return Err(r.error(format!(
                "wTotalLength {total_length} does not match {} bytes",
                data.len()
            )));
        }

        let mut interfaces = Vec::with_capacity(usize::from(num_interfaces));
        for _ in 0..num_interfaces {
            r.header(USB_DESCRIPTOR_TYPE_INTERFACE, USB_INTERFACE_DESC_SIZE)?;
            let number = r.read_u8()?;
            let alternate_setting = r.read_u8()?;
            let num_endpoints = r.read_u8()?;
            let class = r.read_u8()?;
            let subclass = r.read_u8()?;
            let protocol = r.read_u8()?;
            let _interface_string = r.read_u8()?;

            let mut endpoints = Vec::with_capacity(usize::from(num_endpoints));
            while endpoints.len() < usize::from(num_endpoints) {
                // Class-specific descriptors (HID, ...) may sit between the
                // interface and its endpoints.
                if r.peek_u8(1) != Some(USB_DESCRIPTOR_TYPE_ENDPOINT) {
                    let skip = r.read_u8()?;
                    if skip < 2 || r.remaining() < usize::from(skip) - 1 {
                        return Err(r.error("malformed class-specific descriptor"));
                    }
                    r.position += usize::from(skip) - 1;
                    continue;
                }
                r.header(USB_DESCRIPTOR_TYPE_ENDPOINT, USB_ENDPOINT_DESC_SIZE)?;
                endpoints.push(EndpointDescriptor {
                    address: r.read_u8()?,
                    attributes: r.read_u8()?,
                    max_packet_size: r.read_u16_le()?,
                    interval: r.read_u8()?,
                });
            }

            interfaces.push(InterfaceDescriptor {
                number,
                alternate_setting,
                class,
                subclass,
                protocol,
                endpoints,
            });
        }

        if r.remaining() != 0 {
            return Err(r.error(format!("{} trailing bytes", r.remaining())));
        }

        Ok(Self {
            total_length,
            configuration_value,
            attributes,
            max_power,
            interfaces,
        })
    }

    /// Look up an endpoint by address across all interfaces.
    pub fn endpoint(&self, address: u8) -> Option<&EndpointDescriptor> {
        self.interfaces
            .iter()
            .flat_map(|i| i.endpoints.iter())
            .find(|e| e.address == address)
    }
}
