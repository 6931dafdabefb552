//! Layout variants and the arrangements handed to the layout geometry collaborator
use crate::window::Handle;
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter, EnumProperty, EnumString, IntoStaticStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The arrangement algorithm applied to the visible windows of an active workspace.
///
/// The geometry of each variant is computed outside of this crate: only the selection of a
/// variant and the windows it applies to are tracked here.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    AsRefStr,
    Display,
    EnumIter,
    EnumProperty,
    EnumString,
    IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LayoutKind {
    /// A main area with the remaining windows stacked beside it
    #[default]
    #[strum(serialize = "Tile", props(symbol = "[]="))]
    Tile,
    /// The top window fills the monitor
    #[strum(serialize = "Full Screen", props(symbol = "[M]"))]
    FullScreen,
    /// Windows keep whatever position they choose
    #[strum(serialize = "Floating", props(symbol = "><>"))]
    Floating,
}

impl LayoutKind {
    /// The human readable name of this layout.
    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// A short symbol for displaying this layout in a status bar.
    pub fn symbol(&self) -> &'static str {
        strum::EnumProperty::get_str(self, "symbol").unwrap_or("???")
    }

    /// The layout following this one, wrapping around at the end.
    pub fn next(&self) -> Self {
        Self::iter()
            .cycle()
            .skip_while(|l| l != self)
            .nth(1)
            .unwrap_or_default()
    }
}

/// The windows of one active workspace that a layout should position, in tiling order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Arrangement {
    /// The monitor the workspace is displayed on
    pub monitor: usize,
    /// The id of the workspace being arranged
    pub workspace: usize,
    /// The selected layout variant
    pub layout: LayoutKind,
    /// Visible windows handled by the layout in insertion order
    pub tiled: Vec<Handle>,
    /// Visible windows that float above the layout
    pub floating: Vec<Handle>,
}
