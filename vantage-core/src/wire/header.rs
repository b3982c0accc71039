//! Packet header and packet type enumeration.

use crate::error::VantageError;
use crate::wire::{FRAME_METADATA_SIZE, MAX_PACKET_SIZE};

/// Encoded size of a [`PacketHeader`] on the wire.
pub const HEADER_SIZE: usize = 8;

// ── PacketType ───────────────────────────────────────────────────

/// Discriminant for every packet the protocol defines.
///
/// `Disconnect` and `Handshake` are reserved in the numbering but are
/// never produced or consumed by either session engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum PacketType {
    /// Host → viewer: one full encoded screen frame.
    ScreenFrame = 1,
    /// Viewer → host: one mouse event.
    MouseInput = 2,
    /// Viewer → host: one keyboard event.
    KeyboardInput = 3,
    /// Reserved — connection termination.
    Disconnect = 4,
    /// Reserved — initial connection exchange.
    Handshake = 5,
}

impl TryFrom<u32> for PacketType {
    type Error = VantageError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(PacketType::ScreenFrame),
            2 => Ok(PacketType::MouseInput),
            3 => Ok(PacketType::KeyboardInput),
            4 => Ok(PacketType::Disconnect),
            5 => Ok(PacketType::Handshake),
            other => Err(VantageError::UnknownVariant {
                type_name: "PacketType",
                value: other,
            }),
        }
    }
}

// ── PacketHeader ─────────────────────────────────────────────────

/// Fixed 8-byte header preceding every payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketHeader {
    pub packet_type: PacketType,
    /// Exact byte length of the payload that follows, header excluded.
    pub data_size: u32,
}

impl PacketHeader {
    pub fn new(packet_type: PacketType, data_size: u32) -> Self {
        Self {
            packet_type,
            data_size,
        }
    }

    /// Serialize to bytes (little-endian).
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[0..4].copy_from_slice(&(self.packet_type as u32).to_le_bytes());
        buf[4..8].copy_from_slice(&self.data_size.to_le_bytes());
        buf
    }

    /// Deserialize from bytes.
    pub fn decode(data: &[u8]) -> Result<Self, VantageError> {
        if data.len() < HEADER_SIZE {
            return Err(VantageError::InvalidHeader("header truncated"));
        }
        let raw_type = u32::from_le_bytes(data[0..4].try_into().unwrap());
        let data_size = u32::from_le_bytes(data[4..8].try_into().unwrap());
        Ok(Self {
            packet_type: PacketType::try_from(raw_type)?,
            data_size,
        })
    }

    /// Validate the declared size of a `ScreenFrame` payload before any
    /// of it is read: it must at least hold the frame metadata and never
    /// exceed the hard packet cap.
    pub fn validate_frame_size(&self) -> Result<(), VantageError> {
        let size = self.data_size as usize;
        if size < FRAME_METADATA_SIZE {
            return Err(VantageError::InvalidPacketLength {
                expected: FRAME_METADATA_SIZE,
                actual: size,
            });
        }
        if size > MAX_PACKET_SIZE {
            return Err(VantageError::PayloadTooLarge {
                size,
                max: MAX_PACKET_SIZE,
            });
        }
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_roundtrip() {
        let hdr = PacketHeader::new(PacketType::ScreenFrame, 4096);
        let encoded = hdr.encode();
        assert_eq!(encoded.len(), HEADER_SIZE);

        let decoded = PacketHeader::decode(&encoded).unwrap();
        assert_eq!(decoded, hdr);
    }

    #[test]
    fn header_layout_is_packed_little_endian() {
        let hdr = PacketHeader::new(PacketType::MouseInput, 13);
        let encoded = hdr.encode();
        assert_eq!(&encoded[0..4], &[2, 0, 0, 0]);
        assert_eq!(&encoded[4..8], &[13, 0, 0, 0]);
    }

    #[test]
    fn header_too_short() {
        assert!(PacketHeader::decode(&[0u8; 7]).is_err());
    }

    #[test]
    fn unknown_packet_type_rejected() {
        let mut bytes = PacketHeader::new(PacketType::ScreenFrame, 0).encode();
        bytes[0] = 99;
        let err = PacketHeader::decode(&bytes).unwrap_err();
        assert!(matches!(err, VantageError::UnknownVariant { value: 99, .. }));
    }

    #[test]
    fn all_reserved_types_decode() {
        for raw in 1u32..=5 {
            assert!(PacketType::try_from(raw).is_ok());
        }
        assert!(PacketType::try_from(0).is_err());
        assert!(PacketType::try_from(6).is_err());
    }

    #[test]
    fn frame_size_bounds() {
        let too_small = PacketHeader::new(PacketType::ScreenFrame, 11);
        assert!(too_small.validate_frame_size().is_err());

        let minimum = PacketHeader::new(PacketType::ScreenFrame, FRAME_METADATA_SIZE as u32);
        assert!(minimum.validate_frame_size().is_ok());

        let too_big = PacketHeader::new(PacketType::ScreenFrame, MAX_PACKET_SIZE as u32 + 1);
        assert!(matches!(
            too_big.validate_frame_size(),
            Err(VantageError::PayloadTooLarge { .. })
        ));

        let maximum = PacketHeader::new(PacketType::ScreenFrame, MAX_PACKET_SIZE as u32);
        assert!(maximum.validate_frame_size().is_ok());
    }
}
