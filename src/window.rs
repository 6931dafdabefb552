//! Window identity and the descriptor snapshot that rules are evaluated against
use bitflags::bitflags;
use std::{fmt, ops::Deref};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An opaque native window handle.
///
/// Handles are stable for the lifetime of the window they identify but may be reused by the
/// window system once that window has been destroyed.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Handle(pub(crate) u32);

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl Deref for Handle {
    type Target = u32;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<u32> for Handle {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

bitflags! {
    /// The base style bits of a window.
    ///
    /// Bits without a named constant are retained so that containment tests always operate on
    /// the raw mask reported by the window system.
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct WindowStyle: u32 {
        /// A pop-up window
        const POPUP          = 0x8000_0000;
        /// A child window
        const CHILD          = 0x4000_0000;
        /// Initially minimized
        const MINIMIZE       = 0x2000_0000;
        /// Initially visible
        const VISIBLE        = 0x1000_0000;
        /// Initially disabled
        const DISABLED       = 0x0800_0000;
        /// Clips child windows relative to each other
        const CLIPSIBLINGS   = 0x0400_0000;
        /// Excludes the area occupied by child windows when drawing
        const CLIPCHILDREN   = 0x0200_0000;
        /// Initially maximized
        const MAXIMIZE       = 0x0100_0000;
        /// Has a title bar (BORDER | DLGFRAME)
        const CAPTION        = 0x00C0_0000;
        /// Has a thin-line border
        const BORDER         = 0x0080_0000;
        /// Has a dialog box style border
        const DLGFRAME       = 0x0040_0000;
        /// Has a vertical scroll bar
        const VSCROLL        = 0x0020_0000;
        /// Has a horizontal scroll bar
        const HSCROLL        = 0x0010_0000;
        /// Has a window menu on its title bar
        const SYSMENU        = 0x0008_0000;
        /// Has a sizing border
        const THICKFRAME     = 0x0004_0000;
        /// Has a minimize button
        const MINIMIZEBOX    = 0x0002_0000;
        /// Has a maximize button
        const MAXIMIZEBOX    = 0x0001_0000;
    }
}

bitflags! {
    /// The extended style bits of a window.
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ExtendedStyle: u32 {
        /// Has a double border
        const DLGMODALFRAME  = 0x0000_0001;
        /// Does not notify its parent on creation or destruction
        const NOPARENTNOTIFY = 0x0000_0004;
        /// Placed above all non-topmost windows
        const TOPMOST        = 0x0000_0008;
        /// Accepts drag-drop files
        const ACCEPTFILES    = 0x0000_0010;
        /// Painted after its siblings
        const TRANSPARENT    = 0x0000_0020;
        /// An MDI child window
        const MDICHILD       = 0x0000_0040;
        /// A floating toolbar
        const TOOLWINDOW     = 0x0000_0080;
        /// Has a raised border
        const WINDOWEDGE     = 0x0000_0100;
        /// Has a sunken border
        const CLIENTEDGE     = 0x0000_0200;
        /// Has a question mark in its title bar
        const CONTEXTHELP    = 0x0000_0400;
        /// Has a three-dimensional border style
        const STATICEDGE     = 0x0002_0000;
        /// Forced onto the taskbar when visible
        const APPWINDOW      = 0x0004_0000;
        /// A layered window
        const LAYERED        = 0x0008_0000;
        /// Descendants are painted bottom to top using double buffering
        const COMPOSITED     = 0x0200_0000;
        /// Does not become the foreground window when clicked
        const NOACTIVATE     = 0x0800_0000;
    }
}

/// An immutable snapshot of a native window taken at the point a rule is evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WindowDescriptor {
    /// The native handle of the window
    pub handle: Handle,
    /// The window class name
    pub class_name: String,
    /// The display name of the window. May be empty if the application has not set it yet.
    pub title: String,
    /// The name of the process that owns the window
    pub process_name: String,
    /// The base style bits
    pub style: WindowStyle,
    /// The extended style bits
    pub ex_style: ExtendedStyle,
    /// The owner window (if any)
    pub owner: Option<Handle>,
    /// Whether or not the window is currently topmost
    pub topmost: bool,
}

impl WindowDescriptor {
    /// Create a new descriptor with empty style masks, no owner and not topmost.
    pub fn new(
        handle: u32,
        class_name: impl Into<String>,
        title: impl Into<String>,
        process_name: impl Into<String>,
    ) -> Self {
        Self {
            handle: Handle(handle),
            class_name: class_name.into(),
            title: title.into(),
            process_name: process_name.into(),
            style: WindowStyle::empty(),
            ex_style: ExtendedStyle::empty(),
            owner: None,
            topmost: false,
        }
    }

    /// Set the raw style bits, retaining unnamed bits.
    pub fn with_style(mut self, bits: u32) -> Self {
        self.style = WindowStyle::from_bits_retain(bits);
        self
    }

    /// Set the raw extended style bits, retaining unnamed bits.
    pub fn with_ex_style(mut self, bits: u32) -> Self {
        self.ex_style = ExtendedStyle::from_bits_retain(bits);
        self.topmost = self.ex_style.contains(ExtendedStyle::TOPMOST);
        self
    }

    /// Set the owner window.
    pub fn with_owner(mut self, owner: u32) -> Self {
        self.owner = Some(Handle(owner));
        self
    }

    /// Whether this window looks like a top level application window: not a tool window and
    /// with no owner.
    pub fn is_app_window(&self) -> bool {
        !self.ex_style.contains(ExtendedStyle::TOOLWINDOW) && self.owner.is_none()
    }

    /// Whether the window currently draws a titlebar
    pub fn has_titlebar(&self) -> bool {
        self.style.contains(WindowStyle::CAPTION)
    }

    /// Whether the window currently draws a sizing border
    pub fn has_borders(&self) -> bool {
        self.style.contains(WindowStyle::THICKFRAME)
    }

    /// Whether the window currently has a taskbar entry.
    ///
    /// App windows always get one. Tool windows and owned windows only do if they opt in.
    pub fn in_taskbar(&self) -> bool {
        self.ex_style.contains(ExtendedStyle::APPWINDOW) || self.is_app_window()
    }
}
