//! Wire codec — fixed-layout binary (en/de)coding of every packet shape.
//!
//! Pure functions over byte slices, no I/O and no shared state. All
//! multi-byte integers are little-endian and all layouts are packed: the
//! byte offsets below are a wire-compatibility contract between host and
//! viewer, not an implementation detail.
//!
//! ## Wire format
//!
//! **Packet header** (8 bytes):
//! ```text
//! type:       u32  (4)
//! data_size:  u32  (4)   exact byte length of the payload that follows
//! ```
//!
//! **Frame metadata** (12 bytes, followed by `data_size - 12` bytes of JPEG):
//! ```text
//! width:      u32  (4)
//! height:     u32  (4)
//! quality:    u32  (4)
//! ```
//!
//! **Mouse event** (13 bytes):
//! ```text
//! kind:        u8  (1)
//! x:          i32  (4)
//! y:          i32  (4)
//! wheel_delta:i32  (4)
//! ```
//!
//! **Keyboard event** (9 bytes):
//! ```text
//! kind:        u8  (1)
//! virtual_key:u32  (4)
//! scan_code:  u32  (4)
//! ```

mod frame;
mod header;
mod input;

pub use frame::{FRAME_METADATA_SIZE, FrameMetadata};
pub use header::{HEADER_SIZE, PacketHeader, PacketType};
pub use input::{
    KEYBOARD_EVENT_SIZE, KeyboardEvent, KeyboardEventKind, MOUSE_EVENT_SIZE, MouseEvent,
    MouseEventKind,
};

/// Maximum size of a single packet payload (10 MiB).
pub const MAX_PACKET_SIZE: usize = 10 * 1024 * 1024;

/// Default listening port (the classic VNC port).
pub const DEFAULT_PORT: u16 = 5900;

/// Default target frame rate in Hz.
pub const DEFAULT_FPS: u32 = 30;

/// Default JPEG quality (valid range 1–100).
pub const DEFAULT_QUALITY: u32 = 75;
