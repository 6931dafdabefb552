//! Owned, read-only views of the workspace state for use by status bars and other observers
use crate::{
    pure::{LayoutKind, Membership, MembershipState, WorkspaceSet},
    window::Handle,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The state of a single monitor at the time a [Snapshot] was taken.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MonitorSnapshot {
    /// The position of the monitor in the configured monitor list
    pub index: usize,
    /// The monitor name
    pub name: String,
    /// The id of the workspace shown on this monitor
    pub active_workspace: usize,
    /// The ids of every workspace owned by this monitor
    pub workspaces: Vec<usize>,
    /// Windows shown on this monitor outside of its active workspace
    pub temporarily_shown: Vec<Handle>,
}

/// The state of a single workspace at the time a [Snapshot] was taken.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WorkspaceSnapshot {
    /// The workspace id, starting from 1
    pub id: usize,
    /// The workspace name
    pub name: String,
    /// The index of the monitor that owns this workspace
    pub monitor: usize,
    /// Whether this workspace is currently shown on its monitor
    pub active: bool,
    /// The selected layout
    pub layout: LayoutKind,
    /// The display name of the selected layout
    pub layout_name: String,
    /// Status bars shown alongside this workspace
    pub bars: Vec<String>,
    /// Member windows in insertion order
    pub members: Vec<Membership>,
}

impl WorkspaceSnapshot {
    /// The member windows of this workspace in insertion order
    pub fn windows(&self) -> impl Iterator<Item = Handle> + '_ {
        self.members.iter().map(|m| m.handle)
    }

    /// The members of this workspace in the given state
    pub fn in_state(&self, state: MembershipState) -> impl Iterator<Item = Handle> + '_ {
        self.members
            .iter()
            .filter(move |m| m.state == state)
            .map(|m| m.handle)
    }
}

/// A point in time copy of the workspace state.
///
/// Membership changes between window notifications so observers must take a new snapshot rather
/// than holding on to the live state.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Snapshot {
    /// The monitor holding focus
    pub current_monitor: usize,
    /// The active workspace of the focused monitor
    pub current_workspace: usize,
    /// The workspace that was current before this one
    pub previous_workspace: Option<usize>,
    /// Every monitor in index order
    pub monitors: Vec<MonitorSnapshot>,
    /// Every workspace in id order
    pub workspaces: Vec<WorkspaceSnapshot>,
}

impl Snapshot {
    /// Look up a workspace by id
    pub fn workspace(&self, id: usize) -> Option<&WorkspaceSnapshot> {
        self.workspaces.iter().find(|w| w.id == id)
    }

    /// Every managed window in the snapshot, without duplicates for shared windows
    pub fn all_windows(&self) -> Vec<Handle> {
        let mut windows: Vec<Handle> = Vec::new();
        for h in self.workspaces.iter().flat_map(|w| w.windows()) {
            if !windows.contains(&h) {
                windows.push(h);
            }
        }

        windows
    }

    /// Whether the given window is a member of any workspace
    pub fn contains(&self, handle: Handle) -> bool {
        self.workspaces.iter().any(|w| w.windows().any(|h| h == handle))
    }
}

impl WorkspaceSet {
    /// Take an owned [Snapshot] of the current state.
    pub fn snapshot(&self) -> Snapshot {
        let monitors = self
            .monitors
            .iter()
            .map(|m| MonitorSnapshot {
                index: m.index,
                name: m.name.clone(),
                active_workspace: m.active,
                workspaces: m.workspaces.clone(),
                temporarily_shown: m.temporarily_shown.clone(),
            })
            .collect();

        let workspaces = self
            .workspaces
            .iter()
            .map(|w| WorkspaceSnapshot {
                id: w.id,
                name: w.name.clone(),
                monitor: w.monitor,
                active: self.is_active(w.id),
                layout: w.layout,
                layout_name: w.layout.name().to_owned(),
                bars: w.bars.clone(),
                members: w.members.clone(),
            })
            .collect();

        Snapshot {
            current_monitor: self.current_monitor,
            current_workspace: self.current_workspace_id(),
            previous_workspace: self.previous_workspace,
            monitors,
            workspaces,
        }
    }
}
