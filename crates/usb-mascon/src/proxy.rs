//! Registry-facing device proxy.

use densha_hid_mascon_protocol::MasconVariant;
use tracing::info;

use crate::bindings::{InputBindingInfo, binding_info};
use crate::freeze::{SaveState, SnapshotReader, SnapshotWriter};
use crate::settings::{MASCON_SETTINGS, MasconSettings, SettingInfo};
use crate::state::MasconState;
use crate::usb::UsbDeviceModel;
use crate::{DeviceError, DeviceResult, SnapshotResult};

/// A device type the host can list, configure and instantiate.
pub trait DeviceProxy {
    type Device;

    /// Human-readable device name.
    fn name(&self) -> &'static str;

    /// Stable identifier used in configuration files.
    fn type_name(&self) -> &'static str;

    /// Display names of the subtypes, indexed by subtype number.
    fn subtypes(&self) -> &'static [&'static str];

    fn bindings(&self, subtype: u32) -> &'static [InputBindingInfo];

    fn settings(&self, subtype: u32) -> &'static [SettingInfo];

    fn create_device(
        &self,
        settings: &MasconSettings,
        port: u32,
        subtype: u32,
    ) -> DeviceResult<Self::Device>;

    fn update_settings(&self, device: &mut Self::Device, settings: &MasconSettings);

    fn get_binding_value(&self, device: &Self::Device, bind_index: u32) -> f32;

    fn set_binding_value(&self, device: &mut Self::Device, bind_index: u32, value: f32);

    fn freeze_save(&self, device: &Self::Device, writer: &mut SnapshotWriter)
        -> SnapshotResult<()>;

    fn freeze_load(
        &self,
        device: &mut Self::Device,
        reader: &mut SnapshotReader<'_>,
    ) -> SnapshotResult<()>;
}

/// Subtype names, in subtype order. Ryojouhen is not creatable and is not listed.
static SUBTYPES: [&str; 2] = ["Type 2", "Shinkansen"];

/// Proxy for the Densha de GO! controller family.
#[derive(Debug, Clone, Copy, Default)]
pub struct MasconDevice;

impl MasconDevice {
    fn creatable_variant(subtype: u32) -> Option<MasconVariant> {
        MasconVariant::from_subtype(subtype).filter(|v| (v.subtype() as usize) < SUBTYPES.len())
    }
}

impl DeviceProxy for MasconDevice {
    type Device = MasconState;

    fn name(&self) -> &'static str {
        "Densha Controller"
    }

    fn type_name(&self) -> &'static str {
        "DenshaCon"
    }

    fn subtypes(&self) -> &'static [&'static str] {
        &SUBTYPES
    }

    fn bindings(&self, subtype: u32) -> &'static [InputBindingInfo] {
        Self::creatable_variant(subtype)
            .map(binding_info)
            .unwrap_or_default()
    }

    fn settings(&self, _subtype: u32) -> &'static [SettingInfo] {
        &MASCON_SETTINGS
    }

    fn create_device(
        &self,
        settings: &MasconSettings,
        port: u32,
        subtype: u32,
    ) -> DeviceResult<MasconState> {
        let variant = match MasconVariant::from_subtype(subtype) {
            Some(variant) => variant,
            None => return Err(DeviceError::UnsupportedSubtype(subtype)),
        };

        let mut state = MasconState::new(port, variant)?;
        state.apply_settings(settings);
        info!(
            "{} '{}' created on port {}",
            self.name(),
            state.record().product_desc,
            port
        );
        Ok(state)
    }

    fn update_settings(&self, device: &mut MasconState, settings: &MasconSettings) {
        device.apply_settings(settings);
    }

    fn get_binding_value(&self, device: &MasconState, bind_index: u32) -> f32 {
        device.get_bind_value(bind_index)
    }

    fn set_binding_value(&self, device: &mut MasconState, bind_index: u32, value: f32) {
        device.set_bind_value(bind_index, value);
    }

    fn freeze_save(&self, device: &MasconState, writer: &mut SnapshotWriter) -> SnapshotResult<()> {
        device.freeze_save(writer)
    }

    fn freeze_load(
        &self,
        device: &mut MasconState,
        reader: &mut SnapshotReader<'_>,
    ) -> SnapshotResult<()> {
        device.freeze_load(reader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use densha_hid_mascon_protocol::ControlId;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn test_metadata() {
        let proxy = MasconDevice;
        assert_eq!(proxy.name(), "Densha Controller");
        assert_eq!(proxy.type_name(), "DenshaCon");
        assert_eq!(proxy.subtypes(), &["Type 2", "Shinkansen"]);
        assert_eq!(proxy.bindings(0).len(), 12);
        assert_eq!(proxy.bindings(1).len(), 12);
        assert!(proxy.bindings(2).is_empty());
        assert!(proxy.bindings(42).is_empty());
        assert_eq!(proxy.settings(0).len(), 1);
    }

    #[test]
    fn test_create_each_subtype() -> TestResult {
        let proxy = MasconDevice;
        let settings = MasconSettings::default();
        let type2 = proxy.create_device(&settings, 0, 0)?;
        assert_eq!(type2.variant(), MasconVariant::Type2);
        assert_eq!(type2.record().product_desc, "TAITO_DENSYA_CON_T01");

        let shinkansen = proxy.create_device(&settings, 1, 1)?;
        assert_eq!(shinkansen.variant(), MasconVariant::Shinkansen);
        assert_eq!(shinkansen.port(), 1);
        assert_eq!(shinkansen.record().product_desc, "TAITO_DENSYA_CON_T02");
        Ok(())
    }

    #[test]
    fn test_create_rejects_unsupported() {
        let proxy = MasconDevice;
        let settings = MasconSettings::default();
        assert!(matches!(
            proxy.create_device(&settings, 0, 2),
            Err(DeviceError::UnsupportedVariant(MasconVariant::Ryojouhen))
        ));
        assert!(matches!(
            proxy.create_device(&settings, 0, 9),
            Err(DeviceError::UnsupportedSubtype(9))
        ));
    }

    #[test]
    fn test_settings_applied() -> TestResult {
        let proxy = MasconDevice;
        let settings = MasconSettings {
            passthrough: true,
            trace_reports: false,
        };
        let mut device = proxy.create_device(&settings, 0, 0)?;
        assert!(device.passthrough());

        proxy.update_settings(
            &mut device,
            &MasconSettings {
                passthrough: false,
                trace_reports: true,
            },
        );
        assert!(!device.passthrough());
        assert!(device.settings().trace_reports);
        Ok(())
    }

    #[test]
    fn test_binding_passthrough() -> TestResult {
        let proxy = MasconDevice;
        let mut device = proxy.create_device(&MasconSettings::default(), 0, 1)?;
        proxy.set_binding_value(&mut device, ControlId::C.index(), 1.0);
        assert_eq!(proxy.get_binding_value(&device, ControlId::C.index()), 1.0);
        assert_eq!(proxy.get_binding_value(&device, ControlId::D.index()), 0.0);
        Ok(())
    }

    #[test]
    fn test_freeze_via_proxy() -> TestResult {
        let proxy = MasconDevice;
        let mut device = proxy.create_device(&MasconSettings::default(), 0, 0)?;
        proxy.set_binding_value(&mut device, ControlId::Power.index(), 1.0);

        let mut writer = SnapshotWriter::new();
        proxy.freeze_save(&device, &mut writer)?;
        let bytes = writer.into_bytes();

        device.handle_reset();
        assert_eq!(device.power(), 0);

        let mut reader = SnapshotReader::new(&bytes);
        proxy.freeze_load(&mut device, &mut reader)?;
        assert_eq!(device.power(), 255);
        Ok(())
    }
}
