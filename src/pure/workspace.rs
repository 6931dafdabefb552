//! Workspaces and the per window memberships they hold
use crate::{
    pure::layout::LayoutKind,
    rules::{Decoration, PlacementSpec},
    window::Handle,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The state of a single (window, workspace) membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MembershipState {
    /// Placed but the created-delay of the matching rule has not yet elapsed
    Pending,
    /// Shown whenever the workspace is active
    Visible,
    /// Explicitly hidden by a lifecycle action until the window shows itself again
    Hidden,
    /// Minimized by the user or application
    Minimized,
}

/// The decorations a window system should apply to a window.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Decorations {
    /// Titlebar visibility
    pub titlebar: Decoration,
    /// Window border visibility
    pub borders: Decoration,
    /// Taskbar and alt-tab presence
    pub in_taskbar: Decoration,
}

/// Membership of one window within one workspace along with its per-workspace settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Membership {
    pub(crate) handle: Handle,
    pub(crate) state: MembershipState,
    pub(crate) floating: bool,
    pub(crate) titlebar: Decoration,
    pub(crate) borders: Decoration,
    pub(crate) in_taskbar: Decoration,
    pub(crate) hide_from_taskbar_when_inactive: bool,
}

impl Membership {
    pub(crate) fn new(handle: Handle, spec: &PlacementSpec, state: MembershipState) -> Self {
        Self {
            handle,
            state,
            floating: spec.floating,
            titlebar: spec.titlebar,
            borders: spec.borders,
            in_taskbar: spec.in_taskbar,
            hide_from_taskbar_when_inactive: spec.hide_from_taskbar_when_inactive,
        }
    }

    /// The decorations for the window while this membership is the one on screen
    pub fn decorations(&self) -> Decorations {
        Decorations {
            titlebar: self.titlebar,
            borders: self.borders,
            in_taskbar: self.in_taskbar,
        }
    }

    /// The member window
    pub fn handle(&self) -> Handle {
        self.handle
    }

    /// The current state of this membership
    pub fn state(&self) -> MembershipState {
        self.state
    }

    /// Whether the window floats on this workspace
    pub fn is_floating(&self) -> bool {
        self.floating
    }

    /// Titlebar visibility on this workspace
    pub fn titlebar(&self) -> Decoration {
        self.titlebar
    }

    /// Border visibility on this workspace
    pub fn borders(&self) -> Decoration {
        self.borders
    }

    /// Taskbar presence on this workspace
    pub fn in_taskbar(&self) -> Decoration {
        self.in_taskbar
    }

    /// Whether the window should be removed from the taskbar while this workspace is inactive
    pub fn hide_from_taskbar_when_inactive(&self) -> bool {
        self.hide_from_taskbar_when_inactive
    }
}

/// A named, ordered collection of window memberships with a single active layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    pub(crate) id: usize,
    pub(crate) name: String,
    pub(crate) monitor: usize,
    pub(crate) layout: LayoutKind,
    pub(crate) bars: Vec<String>,
    pub(crate) members: Vec<Membership>,
}

impl Workspace {
    pub(crate) fn new<T>(id: usize, name: T, monitor: usize, layout: LayoutKind) -> Self
    where
        T: Into<String>,
    {
        Self {
            id,
            name: name.into(),
            monitor,
            layout,
            bars: vec![],
            members: vec![],
        }
    }

    /// The 1-based id of this workspace
    pub fn id(&self) -> usize {
        self.id
    }

    /// The name of this workspace
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The index of the monitor that owns this workspace
    pub fn monitor(&self) -> usize {
        self.monitor
    }

    /// The currently selected layout
    pub fn layout(&self) -> LayoutKind {
        self.layout
    }

    /// The names of the bars shown alongside this workspace
    pub fn bars(&self) -> &[String] {
        &self.bars
    }

    /// Iterate over the memberships of this workspace in insertion order
    pub fn members(&self) -> impl Iterator<Item = &Membership> {
        self.members.iter()
    }

    /// Whether this workspace has no members
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// The number of members, whatever their state
    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the given window is a member of this workspace
    pub fn contains(&self, handle: Handle) -> bool {
        self.members.iter().any(|m| m.handle == handle)
    }

    /// The membership of the given window, if it has one here
    pub fn member(&self, handle: Handle) -> Option<&Membership> {
        self.members.iter().find(|m| m.handle == handle)
    }

    pub(crate) fn member_mut(&mut self, handle: Handle) -> Option<&mut Membership> {
        self.members.iter_mut().find(|m| m.handle == handle)
    }

    /// Append a membership, returning `false` if the window is already a member.
    pub(crate) fn insert(&mut self, m: Membership) -> bool {
        if self.contains(m.handle) {
            return false;
        }
        self.members.push(m);

        true
    }

    pub(crate) fn remove(&mut self, handle: Handle) -> Option<Membership> {
        let ix = self.members.iter().position(|m| m.handle == handle)?;

        Some(self.members.remove(ix))
    }

    /// Visible members handled by the layout, in tiling order
    pub fn tiled(&self) -> impl Iterator<Item = Handle> + '_ {
        self.members
            .iter()
            .filter(|m| m.state == MembershipState::Visible && !m.floating)
            .map(|m| m.handle)
    }

    /// Visible members floating above the layout
    pub fn floating(&self) -> impl Iterator<Item = Handle> + '_ {
        self.members
            .iter()
            .filter(|m| m.state == MembershipState::Visible && m.floating)
            .map(|m| m.handle)
    }
}
