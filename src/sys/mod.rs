//! Logic for interacting with the native window system.
//!
//! The engine never talks to the OS directly: everything it needs is expressed through the
//! [WindowSystem] trait so that it can be driven by a real backend, a scripted replay or a test
//! double.
use crate::{
    pure::{Arrangement, Decorations},
    window::{Handle, WindowDescriptor},
    Result,
};
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(test)]
pub mod mock;

/// Notifications about top level windows.
///
/// Events for a given handle must be delivered in the order the window system emitted them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WindowEvent {
    /// A new top level window has appeared on screen
    Created(Handle),
    /// A window that was previously hidden has shown itself
    Shown(Handle),
    /// A window has been destroyed. Its handle may be reused by the window system.
    Destroyed(Handle),
    /// The style bits of a window have changed
    StyleChanged(Handle),
    /// The display name of a window has changed
    TitleChanged(Handle),
    /// A window has been minimized
    Minimized(Handle),
    /// A minimized window has been restored
    Restored(Handle),
}

impl WindowEvent {
    /// The window this event refers to
    pub fn handle(&self) -> Handle {
        match *self {
            Self::Created(h)
            | Self::Shown(h)
            | Self::Destroyed(h)
            | Self::StyleChanged(h)
            | Self::TitleChanged(h)
            | Self::Minimized(h)
            | Self::Restored(h) => h,
        }
    }
}

/// A handle on a running native window system.
///
/// Operations targeting a window that has already been destroyed should return
/// [Error::StaleHandle][crate::Error::StaleHandle]: the engine drops these silently as
/// destruction notifications race with in-flight work.
pub trait WindowSystem {
    /// Block until the next event is available or `timeout` elapses.
    ///
    /// Returns `Ok(None)` on timeout. A `timeout` of `None` waits indefinitely. Returning
    /// [Error::ConnectionClosed][crate::Error::ConnectionClosed] stops the engine event loop.
    fn next_event(&self, timeout: Option<Duration>) -> Result<Option<WindowEvent>>;

    /// The top level windows that already exist when the engine starts.
    fn existing_windows(&self) -> Result<Vec<Handle>>;

    /// Take a fresh snapshot of the given window, returning `None` if it no longer exists.
    fn describe(&self, handle: Handle) -> Result<Option<WindowDescriptor>>;

    /// Put a window on screen.
    fn show(&self, handle: Handle) -> Result<()>;

    /// Take a window off screen without destroying it.
    fn hide(&self, handle: Handle) -> Result<()>;

    /// Give a window input focus and raise it.
    fn activate(&self, handle: Handle) -> Result<()>;

    /// Push a window to the bottom of the z-order.
    fn move_to_bottom(&self, handle: Handle) -> Result<()>;

    /// Set or clear the topmost flag of a window.
    fn set_topmost(&self, handle: Handle, topmost: bool) -> Result<()>;

    /// Apply titlebar, border and taskbar settings to a window.
    fn decorate(&self, handle: Handle, decorations: Decorations) -> Result<()>;

    /// Remove the application menu of a window.
    fn remove_menu(&self, handle: Handle) -> Result<()>;

    /// Force a redraw of a single window, or of the whole desktop if `handle` is `None`.
    fn redraw(&self, handle: Option<Handle>) -> Result<()>;

    /// Position the windows of an active workspace according to its layout.
    fn arrange(&self, arrangement: &Arrangement) -> Result<()>;
}
