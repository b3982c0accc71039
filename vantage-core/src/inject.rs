//! Input injection boundary.
//!
//! Applying a decoded mouse or keyboard event to the local OS input
//! queue is platform work (Win32 `SendInput`, XTest, CGEvent). The
//! host session depends only on the [`InputSink`] trait; an injection
//! failure is logged by the session and never tears it down.

use tracing::debug;

use crate::error::VantageError;
use crate::wire::{KeyboardEvent, MouseEvent};

/// Consumes decoded input events received from the viewer.
pub trait InputSink: Send + Sync {
    fn inject_mouse(&self, event: &MouseEvent) -> Result<(), VantageError>;
    fn inject_keyboard(&self, event: &KeyboardEvent) -> Result<(), VantageError>;
}

/// Sink that traces events instead of injecting them.
///
/// The default on hosts without a platform injector wired in; also
/// handy when debugging the input path end to end.
#[derive(Debug, Default)]
pub struct TracingInjector;

impl InputSink for TracingInjector {
    fn inject_mouse(&self, event: &MouseEvent) -> Result<(), VantageError> {
        debug!(kind = ?event.kind, x = event.x, y = event.y, "mouse event");
        Ok(())
    }

    fn inject_keyboard(&self, event: &KeyboardEvent) -> Result<(), VantageError> {
        debug!(
            kind = ?event.kind,
            virtual_key = event.virtual_key,
            scan_code = event.scan_code,
            "keyboard event"
        );
        Ok(())
    }
}
