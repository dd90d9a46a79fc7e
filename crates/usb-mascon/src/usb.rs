//! USB transport boundary.
//!
//! The host transport owns enumeration, scheduling and address assignment; a
//! device model only sees packets. Control transfers are answered by a
//! [`ControlHandler`], interrupt traffic by the device model itself.

use densha_hid_mascon_protocol::descriptors::{
    USB_DESCRIPTOR_TYPE_CONFIGURATION, USB_DESCRIPTOR_TYPE_DEVICE, USB_DESCRIPTOR_TYPE_HID_REPORT,
    USB_DESCRIPTOR_TYPE_STRING,
};
use densha_hid_mascon_protocol::{ConfigDescriptor, DescriptorSet, DeviceDescriptor};
use tracing::{debug, trace};

use crate::DeviceResult;

pub const USB_REQUEST_GET_STATUS: u8 = 0x00;
pub const USB_REQUEST_SET_ADDRESS: u8 = 0x05;
pub const USB_REQUEST_GET_DESCRIPTOR: u8 = 0x06;
pub const USB_REQUEST_GET_CONFIGURATION: u8 = 0x08;
pub const USB_REQUEST_SET_CONFIGURATION: u8 = 0x09;

pub const HID_REQUEST_SET_IDLE: u8 = 0x0A;

/// US English, the only language the string table carries.
pub const LANGID_EN_US: u16 = 0x0409;

/// Packet identifier of a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsbToken {
    Setup,
    In,
    Out,
}

/// Completion status written back into a packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PacketStatus {
    #[default]
    Success,
    Stall,
    IoError,
}

/// Bus speed of the emulated port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UsbSpeed {
    #[default]
    Full,
}

/// A single transfer as seen by the device.
///
/// `buffer_size` is the host buffer capacity; the device never writes more
/// than that into `data`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsbPacket {
    pub pid: UsbToken,
    pub endpoint: u8,
    pub buffer_size: usize,
    pub data: Vec<u8>,
    pub status: PacketStatus,
}

impl UsbPacket {
    pub fn new(pid: UsbToken, endpoint: u8, buffer_size: usize) -> Self {
        Self {
            pid,
            endpoint,
            buffer_size,
            data: Vec::with_capacity(buffer_size),
            status: PacketStatus::Success,
        }
    }

    /// IN token on `endpoint` with room for `buffer_size` bytes.
    pub fn token_in(endpoint: u8, buffer_size: usize) -> Self {
        Self::new(UsbToken::In, endpoint, buffer_size)
    }

    /// OUT token carrying `data`.
    pub fn token_out(endpoint: u8, data: &[u8]) -> Self {
        Self {
            pid: UsbToken::Out,
            endpoint,
            buffer_size: data.len(),
            data: data.to_vec(),
            status: PacketStatus::Success,
        }
    }

    /// Bytes actually transferred.
    pub fn actual_length(&self) -> usize {
        self.data.len()
    }

    /// Append `bytes`, truncated to the space left in the host buffer.
    pub fn push_data(&mut self, bytes: &[u8]) -> usize {
        let room = self.buffer_size.saturating_sub(self.data.len());
        let n = bytes.len().min(room);
        self.data.extend_from_slice(&bytes[..n]);
        n
    }
}

/// Eight-byte SETUP stage of a control transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SetupPacket {
    pub bm_request_type: u8,
    pub b_request: u8,
    pub w_value: u16,
    pub w_index: u16,
    pub w_length: u16,
}

impl SetupPacket {
    pub fn new(bm_request_type: u8, b_request: u8, w_value: u16, w_index: u16, w_length: u16) -> Self {
        Self {
            bm_request_type,
            b_request,
            w_value,
            w_index,
            w_length,
        }
    }

    /// GET_DESCRIPTOR addressed to the device.
    pub fn get_descriptor(descriptor_type: u8, index: u8, w_index: u16, w_length: u16) -> Self {
        Self::new(
            0x80,
            USB_REQUEST_GET_DESCRIPTOR,
            (u16::from(descriptor_type) << 8) | u16::from(index),
            w_index,
            w_length,
        )
    }

    pub fn parse(bytes: [u8; 8]) -> Self {
        Self {
            bm_request_type: bytes[0],
            b_request: bytes[1],
            w_value: u16::from_le_bytes([bytes[2], bytes[3]]),
            w_index: u16::from_le_bytes([bytes[4], bytes[5]]),
            w_length: u16::from_le_bytes([bytes[6], bytes[7]]),
        }
    }

    pub fn is_device_to_host(&self) -> bool {
        self.bm_request_type & 0x80 != 0
    }

    /// 0 standard, 1 class, 2 vendor.
    pub fn request_type(&self) -> u8 {
        (self.bm_request_type >> 5) & 0x03
    }

    /// 0 device, 1 interface, 2 endpoint.
    pub fn recipient(&self) -> u8 {
        self.bm_request_type & 0x1F
    }

    pub fn descriptor_type(&self) -> u8 {
        (self.w_value >> 8) as u8
    }

    pub fn descriptor_index(&self) -> u8 {
        (self.w_value & 0x00FF) as u8
    }
}

/// Outcome of a control request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlResponse {
    Data(Vec<u8>),
    Ack,
    Stall,
}

/// Per-device record kept by the transport: identity, descriptors and the
/// enumeration state the standard requests mutate.
#[derive(Debug, Clone)]
pub struct UsbDeviceRecord {
    pub port: u32,
    pub speed: UsbSpeed,
    pub product_desc: &'static str,
    pub descriptors: DescriptorSet,
    pub device_descriptor: DeviceDescriptor,
    pub config_descriptor: ConfigDescriptor,
    pub address: u8,
    pub configuration: u8,
    pub attached: bool,
}

impl UsbDeviceRecord {
    /// Build the record, validating the descriptor set first.
    pub fn new(port: u32, descriptors: DescriptorSet) -> DeviceResult<Self> {
        let device_descriptor = DeviceDescriptor::parse(descriptors.device)?;
        let config_descriptor = ConfigDescriptor::parse(descriptors.config)?;

        Ok(Self {
            port,
            speed: UsbSpeed::Full,
            product_desc: descriptors.product_string(),
            descriptors,
            device_descriptor,
            config_descriptor,
            address: 0,
            configuration: 0,
            attached: false,
        })
    }

    /// Connect to the bus in the default (unaddressed, unconfigured) state.
    pub fn attach(&mut self) {
        self.attached = true;
        self.address = 0;
        self.configuration = 0;
        debug!("Attached '{}' on port {}", self.product_desc, self.port);
    }

    pub fn is_configured(&self) -> bool {
        self.configuration != 0
    }

    /// Serialized string descriptor at `index`; index 0 is the language table.
    pub fn string_descriptor(&self, index: u8) -> Option<Vec<u8>> {
        if index == 0 {
            let [lo, hi] = LANGID_EN_US.to_le_bytes();
            return Some(vec![0x04, USB_DESCRIPTOR_TYPE_STRING, lo, hi]);
        }
        self.descriptors
            .string(usize::from(index))
            .map(build_string_descriptor_utf16le)
    }
}

/// Answers control transfers on behalf of a device.
pub trait ControlHandler: Send {
    fn handle_control(
        &mut self,
        record: &mut UsbDeviceRecord,
        setup: &SetupPacket,
        data: Option<&[u8]>,
    ) -> ControlResponse;
}

/// Standard chapter 9 requests plus the HID class requests the controllers
/// need during enumeration. Everything else stalls.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardControlHandler;

impl StandardControlHandler {
    fn get_descriptor(record: &UsbDeviceRecord, setup: &SetupPacket) -> Option<Vec<u8>> {
        match (setup.recipient(), setup.descriptor_type()) {
            (0, USB_DESCRIPTOR_TYPE_DEVICE) => Some(record.descriptors.device.to_vec()),
            (0, USB_DESCRIPTOR_TYPE_CONFIGURATION) => Some(record.descriptors.config.to_vec()),
            (0, USB_DESCRIPTOR_TYPE_STRING) => record.string_descriptor(setup.descriptor_index()),
            (1, USB_DESCRIPTOR_TYPE_HID_REPORT) if setup.w_index == 0 => {
                Some(record.descriptors.hid_report.to_vec())
            }
            _ => None,
        }
    }
}

impl ControlHandler for StandardControlHandler {
    fn handle_control(
        &mut self,
        record: &mut UsbDeviceRecord,
        setup: &SetupPacket,
        _data: Option<&[u8]>,
    ) -> ControlResponse {
        trace!(
            "Control request type {:02X} request {:02X} value {:04X} index {:04X} length {}",
            setup.bm_request_type, setup.b_request, setup.w_value, setup.w_index, setup.w_length
        );

        match (setup.bm_request_type, setup.b_request) {
            (0x80 | 0x81, USB_REQUEST_GET_DESCRIPTOR) => Self::get_descriptor(record, setup)
                .map(|v| ControlResponse::Data(clamp_response(v, setup.w_length)))
                .unwrap_or(ControlResponse::Stall),
            (0x80 | 0x81, USB_REQUEST_GET_STATUS) => {
                ControlResponse::Data(clamp_response(vec![0, 0], setup.w_length))
            }
            (0x00, USB_REQUEST_SET_ADDRESS) => {
                if setup.w_value > 127 {
                    return ControlResponse::Stall;
                }
                record.address = (setup.w_value & 0x007F) as u8;
                ControlResponse::Ack
            }
            (0x80, USB_REQUEST_GET_CONFIGURATION) => {
                ControlResponse::Data(clamp_response(vec![record.configuration], setup.w_length))
            }
            (0x00, USB_REQUEST_SET_CONFIGURATION) => {
                let config = (setup.w_value & 0x00FF) as u8;
                if config != 0 && config != record.config_descriptor.configuration_value {
                    return ControlResponse::Stall;
                }
                record.configuration = config;
                ControlResponse::Ack
            }
            (0x21, HID_REQUEST_SET_IDLE) => ControlResponse::Ack,
            _ => ControlResponse::Stall,
        }
    }
}

/// Truncate a response to the host's requested length.
pub fn clamp_response(mut data: Vec<u8>, w_length: u16) -> Vec<u8> {
    data.truncate(usize::from(w_length));
    data
}

/// USB string descriptor: length, type, then UTF-16LE code units.
pub fn build_string_descriptor_utf16le(s: &str) -> Vec<u8> {
    let units: Vec<u16> = s.encode_utf16().take(126).collect();
    let mut out = Vec::with_capacity(2 + units.len() * 2);
    out.push((2 + units.len() * 2) as u8);
    out.push(USB_DESCRIPTOR_TYPE_STRING);
    for unit in units {
        out.extend_from_slice(&unit.to_le_bytes());
    }
    out
}

/// A device model plugged into the emulated bus.
///
/// Each model is a tagged implementation of this trait; the transport calls
/// these entry points and never looks inside the state.
pub trait UsbDeviceModel {
    fn record(&self) -> &UsbDeviceRecord;

    /// Device connected to a port.
    fn handle_attach(&mut self);

    /// Bus reset.
    fn handle_reset(&mut self);

    /// Control transfer on endpoint 0.
    fn handle_control(&mut self, packet: &mut UsbPacket, setup: &SetupPacket, data: Option<&[u8]>);

    /// Interrupt or bulk traffic on any other endpoint.
    fn handle_data(&mut self, packet: &mut UsbPacket);
}
