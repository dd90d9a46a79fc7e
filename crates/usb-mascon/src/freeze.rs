//! Save-state serialization.
//!
//! Layout: marker (u32 LE length + ASCII), then power, then brake. Everything
//! else is live input the host re-drives after a load.

use tracing::{debug, warn};

use crate::state::MasconState;
use crate::{SnapshotError, SnapshotResult};

pub const MASCON_FREEZE_MARKER: &str = "MasconDevice";

/// Append-only snapshot buffer.
#[derive(Debug, Clone, Default)]
pub struct SnapshotWriter {
    buffer: Vec<u8>,
}

impl SnapshotWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    pub fn write_u32_le(&mut self, value: u32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_marker(&mut self, marker: &str) -> SnapshotResult<()> {
        let len =
            u32::try_from(marker.len()).map_err(|_| SnapshotError::MarkerTooLong(marker.len()))?;
        self.write_u32_le(len);
        self.buffer.extend_from_slice(marker.as_bytes());
        Ok(())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }
}

/// Cursor over a snapshot buffer.
#[derive(Debug, Clone)]
pub struct SnapshotReader<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> SnapshotReader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.position
    }

    fn take(&mut self, needed: usize) -> SnapshotResult<&'a [u8]> {
        let remaining = self.remaining();
        if needed > remaining {
            return Err(SnapshotError::Truncated { needed, remaining });
        }
        let bytes = &self.buffer[self.position..self.position + needed];
        self.position += needed;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> SnapshotResult<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u32_le(&mut self) -> SnapshotResult<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Consume a marker and check it equals `expected`.
    pub fn read_marker(&mut self, expected: &'static str) -> SnapshotResult<()> {
        let len = self.read_u32_le()? as usize;
        let bytes = self.take(len)?;
        if bytes != expected.as_bytes() {
            return Err(SnapshotError::MarkerMismatch {
                expected,
                found: String::from_utf8_lossy(bytes).into_owned(),
            });
        }
        Ok(())
    }

    /// Fail unless the whole buffer has been consumed.
    pub fn finish(&self) -> SnapshotResult<()> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(SnapshotError::TrailingBytes(n)),
        }
    }
}

/// Device state that survives a save/load cycle.
pub trait SaveState {
    /// Append this device's record to a shared stream.
    fn freeze_save(&self, writer: &mut SnapshotWriter) -> SnapshotResult<()>;

    /// Read this device's record from a shared stream.
    ///
    /// On error nothing is modified; the reader position is unspecified.
    fn freeze_load(&mut self, reader: &mut SnapshotReader<'_>) -> SnapshotResult<()>;

    /// Standalone snapshot of this device.
    fn save_state(&self) -> SnapshotResult<Vec<u8>> {
        let mut writer = SnapshotWriter::new();
        self.freeze_save(&mut writer)?;
        Ok(writer.into_bytes())
    }

    /// Restore from a standalone snapshot, rejecting trailing bytes.
    fn load_state(&mut self, bytes: &[u8]) -> SnapshotResult<()>;
}

impl SaveState for MasconState {
    fn freeze_save(&self, writer: &mut SnapshotWriter) -> SnapshotResult<()> {
        writer.write_marker(MASCON_FREEZE_MARKER)?;
        writer.write_u8(self.data.power);
        writer.write_u8(self.data.brake);
        Ok(())
    }

    fn freeze_load(&mut self, reader: &mut SnapshotReader<'_>) -> SnapshotResult<()> {
        let (power, brake) = read_levers(reader).inspect_err(|e| {
            warn!("Mascon port {} save state rejected: {}", self.port, e);
        })?;
        self.data.power = power;
        self.data.brake = brake;
        debug!(
            "Mascon port {} restored power {:02X} brake {:02X}",
            self.port, power, brake
        );
        Ok(())
    }

    fn load_state(&mut self, bytes: &[u8]) -> SnapshotResult<()> {
        let mut reader = SnapshotReader::new(bytes);
        let levers = read_levers(&mut reader).and_then(|levers| {
            reader.finish()?;
            Ok(levers)
        });
        let (power, brake) = levers.inspect_err(|e| {
            warn!("Mascon port {} save state rejected: {}", self.port, e);
        })?;
        self.data.power = power;
        self.data.brake = brake;
        Ok(())
    }
}

fn read_levers(reader: &mut SnapshotReader<'_>) -> SnapshotResult<(u8, u8)> {
    reader.read_marker(MASCON_FREEZE_MARKER)?;
    let power = reader.read_u8()?;
    let brake = reader.read_u8()?;
    Ok((power, brake))
}

#[cfg(test)]
mod tests {
    use super::*;
    use densha_hid_mascon_protocol::{ControlId, MasconVariant};

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    fn blob(marker: &str, power: u8, brake: u8) -> SnapshotResult<Vec<u8>> {
        let mut writer = SnapshotWriter::new();
        writer.write_marker(marker)?;
        writer.write_u8(power);
        writer.write_u8(brake);
        Ok(writer.into_bytes())
    }

    #[test]
    fn test_layout() -> TestResult {
        let mut state = MasconState::new(0, MasconVariant::Type2)?;
        state.set_bind_value(ControlId::Power.index(), 1.0);
        state.set_bind_value(ControlId::Brake.index(), 0.5);
        let bytes = state.save_state()?;
        assert_eq!(&bytes[..4], &12u32.to_le_bytes());
        assert_eq!(&bytes[4..16], b"MasconDevice");
        assert_eq!(&bytes[16..], &[0xFF, 0x80]);
        Ok(())
    }

    #[test]
    fn test_write_marker_length_prefix() -> TestResult {
        let mut writer = SnapshotWriter::new();
        writer.write_marker("Pad")?;
        writer.write_marker("")?;
        assert_eq!(writer.as_bytes(), &[3, 0, 0, 0, b'P', b'a', b'd', 0, 0, 0, 0]);
        assert_eq!(
            SnapshotError::MarkerTooLong(70_000).to_string(),
            "Save state marker is 70000 bytes, longer than a u32 length prefix"
        );
        Ok(())
    }

    #[test]
    fn test_load_restores_levers_only() -> TestResult {
        let mut state = MasconState::new(0, MasconVariant::Shinkansen)?;
        state.set_bind_value(ControlId::Select.index(), 1.0);
        state.load_state(&blob(MASCON_FREEZE_MARKER, 0x40, 0x20)?)?;
        assert_eq!((state.power(), state.brake()), (0x40, 0x20));
        assert_eq!(state.get_bind_value(ControlId::Select.index()), 1.0);
        Ok(())
    }

    #[test]
    fn test_marker_mismatch_leaves_state() -> TestResult {
        let mut state = MasconState::new(0, MasconVariant::Type2)?;
        state.set_bind_value(ControlId::Power.index(), 1.0);
        let err = state.load_state(&blob("PadDevice", 0, 0)?);
        assert!(matches!(err, Err(SnapshotError::MarkerMismatch { .. })));
        assert_eq!(state.power(), 255);
        Ok(())
    }

    #[test]
    fn test_truncated_leaves_state() -> TestResult {
        let mut state = MasconState::new(0, MasconVariant::Type2)?;
        state.set_bind_value(ControlId::Brake.index(), 1.0);
        let full = blob(MASCON_FREEZE_MARKER, 0x11, 0x22)?;
        let err = state.load_state(&full[..full.len() - 1]);
        assert_eq!(err, Err(SnapshotError::Truncated { needed: 1, remaining: 0 }));
        assert_eq!(state.brake(), 255);
        Ok(())
    }

    #[test]
    fn test_trailing_bytes_rejected() -> TestResult {
        let mut state = MasconState::new(0, MasconVariant::Type2)?;
        let mut bytes = blob(MASCON_FREEZE_MARKER, 0x11, 0x22)?;
        bytes.push(0);
        assert_eq!(state.load_state(&bytes), Err(SnapshotError::TrailingBytes(1)));
        assert_eq!(state.power(), 0);
        Ok(())
    }

    #[test]
    fn test_shared_stream() -> TestResult {
        let mut first = MasconState::new(0, MasconVariant::Type2)?;
        let mut second = MasconState::new(1, MasconVariant::Shinkansen)?;
        first.set_bind_value(ControlId::Power.index(), 0.25);
        second.set_bind_value(ControlId::Brake.index(), 0.75);

        let mut writer = SnapshotWriter::new();
        first.freeze_save(&mut writer)?;
        second.freeze_save(&mut writer)?;
        let bytes = writer.into_bytes();

        let mut restored_first = MasconState::new(0, MasconVariant::Type2)?;
        let mut restored_second = MasconState::new(1, MasconVariant::Shinkansen)?;
        let mut reader = SnapshotReader::new(&bytes);
        restored_first.freeze_load(&mut reader)?;
        restored_second.freeze_load(&mut reader)?;
        reader.finish()?;

        assert_eq!(restored_first.power(), first.power());
        assert_eq!(restored_second.brake(), second.brake());
        Ok(())
    }

    #[test]
    fn test_oversized_marker_length() {
        let mut bytes = u32::MAX.to_le_bytes().to_vec();
        bytes.extend_from_slice(b"Mascon");
        let mut reader = SnapshotReader::new(&bytes);
        assert!(matches!(
            reader.read_marker(MASCON_FREEZE_MARKER),
            Err(SnapshotError::Truncated { .. })
        ));
    }
}
