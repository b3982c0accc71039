//! Mouse and keyboard event wire types.
//!
//! Input packets are small and fixed-size: the host rejects any
//! MOUSE_INPUT or KEYBOARD_INPUT packet whose declared payload length
//! differs from the exact wire size below.

use crate::error::VantageError;

/// Encoded size of a [`MouseEvent`] on the wire.
pub const MOUSE_EVENT_SIZE: usize = 13;

/// Encoded size of a [`KeyboardEvent`] on the wire.
pub const KEYBOARD_EVENT_SIZE: usize = 9;

// ── Mouse ────────────────────────────────────────────────────────

/// Kind of mouse event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MouseEventKind {
    Move = 0,
    LeftDown = 1,
    LeftUp = 2,
    RightDown = 3,
    RightUp = 4,
    MiddleDown = 5,
    MiddleUp = 6,
    Wheel = 7,
}

impl TryFrom<u8> for MouseEventKind {
    type Error = VantageError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(MouseEventKind::Move),
            1 => Ok(MouseEventKind::LeftDown),
            2 => Ok(MouseEventKind::LeftUp),
            3 => Ok(MouseEventKind::RightDown),
            4 => Ok(MouseEventKind::RightUp),
            5 => Ok(MouseEventKind::MiddleDown),
            6 => Ok(MouseEventKind::MiddleUp),
            7 => Ok(MouseEventKind::Wheel),
            other => Err(VantageError::UnknownVariant {
                type_name: "MouseEventKind",
                value: other as u32,
            }),
        }
    }
}

/// Mouse input event sent from viewer to host.
///
/// `x`/`y` are host-screen pixel coordinates in the sender's coordinate
/// space; the protocol performs no scaling. `wheel_delta` is meaningful
/// only for [`MouseEventKind::Wheel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub x: i32,
    pub y: i32,
    pub wheel_delta: i32,
}

impl MouseEvent {
    /// Create a mouse move event.
    pub fn move_to(x: i32, y: i32) -> Self {
        Self {
            kind: MouseEventKind::Move,
            x,
            y,
            wheel_delta: 0,
        }
    }

    /// Create a button press/release event.
    pub fn button(kind: MouseEventKind, x: i32, y: i32) -> Self {
        Self {
            kind,
            x,
            y,
            wheel_delta: 0,
        }
    }

    /// Create a wheel event.
    pub fn wheel(x: i32, y: i32, delta: i32) -> Self {
        Self {
            kind: MouseEventKind::Wheel,
            x,
            y,
            wheel_delta: delta,
        }
    }

    /// Serialize to bytes (little-endian, packed).
    pub fn encode(&self) -> [u8; MOUSE_EVENT_SIZE] {
        let mut buf = [0u8; MOUSE_EVENT_SIZE];
        buf[0] = self.kind as u8;
        buf[1..5].copy_from_slice(&self.x.to_le_bytes());
        buf[5..9].copy_from_slice(&self.y.to_le_bytes());
        buf[9..13].copy_from_slice(&self.wheel_delta.to_le_bytes());
        buf
    }

    /// Deserialize from bytes.
    pub fn decode(data: &[u8]) -> Result<Self, VantageError> {
        if data.len() < MOUSE_EVENT_SIZE {
            return Err(VantageError::InvalidHeader("mouse event truncated"));
        }
        Ok(Self {
            kind: MouseEventKind::try_from(data[0])?,
            x: i32::from_le_bytes(data[1..5].try_into().unwrap()),
            y: i32::from_le_bytes(data[5..9].try_into().unwrap()),
            wheel_delta: i32::from_le_bytes(data[9..13].try_into().unwrap()),
        })
    }
}

// ── Keyboard ─────────────────────────────────────────────────────

/// Kind of keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum KeyboardEventKind {
    KeyDown = 0,
    KeyUp = 1,
}

impl TryFrom<u8> for KeyboardEventKind {
    type Error = VantageError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(KeyboardEventKind::KeyDown),
            1 => Ok(KeyboardEventKind::KeyUp),
            other => Err(VantageError::UnknownVariant {
                type_name: "KeyboardEventKind",
                value: other as u32,
            }),
        }
    }
}

/// Keyboard input event sent from viewer to host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardEvent {
    pub kind: KeyboardEventKind,
    /// Virtual key code (platform-specific numbering).
    pub virtual_key: u32,
    /// Hardware scan code.
    pub scan_code: u32,
}

impl KeyboardEvent {
    /// Create a key press event.
    pub fn down(virtual_key: u32, scan_code: u32) -> Self {
        Self {
            kind: KeyboardEventKind::KeyDown,
            virtual_key,
            scan_code,
        }
    }

    /// Create a key release event.
    pub fn up(virtual_key: u32, scan_code: u32) -> Self {
        Self {
            kind: KeyboardEventKind::KeyUp,
            virtual_key,
            scan_code,
        }
    }

    /// Serialize to bytes (little-endian, packed).
    pub fn encode(&self) -> [u8; KEYBOARD_EVENT_SIZE] {
        let mut buf = [0u8; KEYBOARD_EVENT_SIZE];
        buf[0] = self.kind as u8;
        buf[1..5].copy_from_slice(&self.virtual_key.to_le_bytes());
        buf[5..9].copy_from_slice(&self.scan_code.to_le_bytes());
        buf
    }

    /// Deserialize from bytes.
    pub fn decode(data: &[u8]) -> Result<Self, VantageError> {
        if data.len() < KEYBOARD_EVENT_SIZE {
            return Err(VantageError::InvalidHeader("keyboard event truncated"));
        }
        Ok(Self {
            kind: KeyboardEventKind::try_from(data[0])?,
            virtual_key: u32::from_le_bytes(data[1..5].try_into().unwrap()),
            scan_code: u32::from_le_bytes(data[5..9].try_into().unwrap()),
        })
    }
}

// ── Tests ────────────────────────────────────────────────────────
