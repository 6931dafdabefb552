//! The full set of workspaces and monitors along with every membership transition.
//!
//! Nothing in this module talks to the window system: [WorkspaceSet] only records what should
//! be on screen and the engine diffs that against what it last asked the window system to show.
use crate::{
    config::Config,
    pure::{
        layout::{Arrangement, LayoutKind},
        monitor::Monitor,
        workspace::{Decorations, Membership, MembershipState, Workspace},
    },
    rules::{Decoration, PlacementSpec, WorkspaceRef},
    window::Handle,
    Error, Result,
};
use std::collections::HashSet;
use tracing::warn;

/// The side-effect free workspace and monitor state of the engine.
///
/// Every (window, workspace) pair has at most one [Membership]: a window placed on several
/// workspaces (a shared window) has independent settings on each of them. Exactly one workspace
/// is active on each monitor at all times and inactive workspaces keep their memberships
/// untouched until they are next shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceSet {
    pub(crate) workspaces: Vec<Workspace>, // indexed by id - 1
    pub(crate) monitors: Vec<Monitor>,
    pub(crate) current_monitor: usize,
    // the last workspace to be current before this one
    pub(crate) previous_workspace: Option<usize>,
}

impl WorkspaceSet {
    /// Create the initial state described by a [Config].
    ///
    /// # Errors
    /// This method will error if there are no monitors, if a monitor has no workspaces, if a
    /// workspace refers to an unknown monitor, if workspace names are not unique or if a
    /// starting workspace is not owned by its monitor.
    pub fn try_new(config: &Config) -> Result<Self> {
        if config.monitors.is_empty() {
            return Err(Error::NoMonitors);
        }

        let mut seen = HashSet::new();
        let mut workspaces = Vec::with_capacity(config.workspaces.len());
        for (ix, spec) in config.workspaces.iter().enumerate() {
            if spec.monitor >= config.monitors.len() {
                return Err(Error::UnknownMonitor(spec.monitor));
            }
            if !seen.insert(spec.name.as_str()) {
                return Err(Error::DuplicateWorkspaceName {
                    name: spec.name.clone(),
                });
            }

            let mut ws = Workspace::new(ix + 1, &spec.name, spec.monitor, spec.layout);
            ws.bars = spec.bars.clone();
            workspaces.push(ws);
        }

        let mut monitors = Vec::with_capacity(config.monitors.len());
        for (index, spec) in config.monitors.iter().enumerate() {
            let owned: Vec<usize> = workspaces
                .iter()
                .filter(|w| w.monitor == index)
                .map(|w| w.id)
                .collect();

            let active = match config.starting_workspace(index) {
                Some(id) if owned.contains(&id) => id,
                Some(id) if !owned.is_empty() => {
                    return Err(Error::InvalidStartingWorkspace {
                        monitor: index,
                        workspace: id,
                    })
                }
                _ => return Err(Error::NoWorkspacesForMonitor { monitor: index }),
            };

            monitors.push(Monitor::new(index, &spec.name, active, owned));
        }

        Ok(Self {
            workspaces,
            monitors,
            current_monitor: 0,
            previous_workspace: None,
        })
    }

    /// The monitor that currently has focus
    pub fn current_monitor(&self) -> &Monitor {
        &self.monitors[self.current_monitor]
    }

    /// The id of the workspace active on the focused monitor
    pub fn current_workspace_id(&self) -> usize {
        self.current_monitor().active
    }

    /// The workspace active on the focused monitor
    pub fn current_workspace(&self) -> &Workspace {
        &self.workspaces[self.current_workspace_id() - 1]
    }

    /// The last workspace to be current before the one that is current now
    pub fn previous_workspace(&self) -> Option<usize> {
        self.previous_workspace
    }

    /// Look up a workspace by id
    pub fn workspace(&self, id: usize) -> Option<&Workspace> {
        id.checked_sub(1).and_then(|ix| self.workspaces.get(ix))
    }

    fn workspace_mut(&mut self, id: usize) -> Result<&mut Workspace> {
        id.checked_sub(1)
            .and_then(|ix| self.workspaces.get_mut(ix))
            .ok_or(Error::UnknownWorkspace(id))
    }

    /// Iterate over all workspaces in id order
    pub fn workspaces(&self) -> impl Iterator<Item = &Workspace> {
        self.workspaces.iter()
    }

    /// Iterate over all monitors in index order
    pub fn monitors(&self) -> impl Iterator<Item = &Monitor> {
        self.monitors.iter()
    }

    /// Whether the given workspace is active on any monitor
    pub fn is_active(&self, id: usize) -> bool {
        self.monitors.iter().any(|m| m.active == id)
    }

    fn active_workspaces(&self) -> impl Iterator<Item = &Workspace> {
        self.monitors.iter().flat_map(|m| self.workspace(m.active))
    }

    /// Whether the given window is a member of any workspace
    pub fn contains(&self, handle: Handle) -> bool {
        self.workspaces.iter().any(|w| w.contains(handle))
    }

    /// The ids of every workspace the given window is a member of
    pub fn workspaces_for(&self, handle: Handle) -> Vec<usize> {
        self.workspaces
            .iter()
            .filter(|w| w.contains(handle))
            .map(|w| w.id)
            .collect()
    }

    fn memberships_mut(&mut self, handle: Handle) -> impl Iterator<Item = &mut Membership> {
        self.workspaces
            .iter_mut()
            .flat_map(move |w| w.member_mut(handle))
    }

    fn member_mut(&mut self, handle: Handle, id: usize) -> Result<&mut Membership> {
        self.workspace_mut(id)?
            .member_mut(handle)
            .ok_or(Error::UnknownWindow(handle))
    }

    /// The workspace ids that the given placement specs resolve to.
    ///
    /// References to the current workspace are dropped when the current workspace is also
    /// targeted explicitly so that the window only has a single membership there.
    pub fn targets(&self, specs: &[PlacementSpec]) -> Vec<(usize, PlacementSpec)> {
        let current = self.current_workspace_id();
        let explicit_current = specs.iter().any(|s| s.workspace == WorkspaceRef::Id(current));
        let mut targets: Vec<(usize, PlacementSpec)> = Vec::with_capacity(specs.len());

        for spec in specs {
            let id = match spec.workspace {
                WorkspaceRef::Current if explicit_current => continue,
                WorkspaceRef::Current => current,
                WorkspaceRef::Id(id) => id,
            };

            if self.workspace(id).is_none() {
                warn!(id, "placement refers to an unknown workspace");
                continue;
            }

            if !targets.iter().any(|(t, _)| *t == id) {
                targets.push((id, *spec));
            }
        }

        targets
    }

    /// Add a window to each workspace targeted by `specs` with the given initial state.
    ///
    /// Returns the ids of the workspaces the window was added to.
    pub fn place(
        &mut self,
        handle: Handle,
        specs: &[PlacementSpec],
        state: MembershipState,
    ) -> Vec<usize> {
        let mut placed = Vec::new();

        for (id, spec) in self.targets(specs) {
            if let Ok(ws) = self.workspace_mut(id) {
                if ws.insert(Membership::new(handle, &spec, state)) {
                    placed.push(id);
                }
            }
        }

        placed
    }

    /// Remove a window from every workspace, returning the ids of the workspaces it was a
    /// member of.
    pub fn remove_window(&mut self, handle: Handle) -> Vec<usize> {
        for m in self.monitors.iter_mut() {
            m.temporarily_shown.retain(|h| *h != handle);
        }

        self.workspaces
            .iter_mut()
            .filter_map(|w| w.remove(handle).map(|_| w.id))
            .collect()
    }

    fn transition(
        &mut self,
        handle: Handle,
        from: &[MembershipState],
        to: MembershipState,
    ) -> bool {
        let mut changed = false;
        for m in self.memberships_mut(handle) {
            if from.contains(&m.state) {
                m.state = to;
                changed = true;
            }
        }

        changed
    }

    /// Move every `Pending` membership of a window to the given state once its created-delay
    /// has elapsed.
    pub fn commit_pending(&mut self, handle: Handle, state: MembershipState) -> bool {
        self.transition(handle, &[MembershipState::Pending], state)
    }

    /// Allow a hidden window back on screen.
    pub fn reveal(&mut self, handle: Handle) -> bool {
        self.transition(handle, &[MembershipState::Hidden], MembershipState::Visible)
    }

    /// Mark a window as minimized on all of its workspaces.
    pub fn minimize(&mut self, handle: Handle) -> bool {
        use MembershipState::*;

        self.transition(handle, &[Pending, Visible], Minimized)
    }

    /// Restore a minimized window on all of its workspaces.
    pub fn restore(&mut self, handle: Handle) -> bool {
        self.transition(handle, &[MembershipState::Minimized], MembershipState::Visible)
    }

    /// Whether a window is a `Visible` or `Pending` member of any active workspace.
    pub fn is_on_active_workspace(&self, handle: Handle) -> bool {
        self.active_workspaces().any(|w| {
            w.member(handle).map_or(false, |m| {
                matches!(m.state, MembershipState::Visible | MembershipState::Pending)
            })
        })
    }

    /// Leave a window on screen on the current monitor until the next workspace switch.
    pub fn show_temporarily(&mut self, handle: Handle) {
        let ix = self.current_monitor;
        self.monitors[ix].show_temporarily(handle);
    }

    /// The set of windows that should currently be on screen.
    ///
    /// `Pending` windows are always included: they are left exactly as the application created
    /// them until their created-delay elapses.
    pub fn on_screen(&self) -> HashSet<Handle> {
        let mut visible: HashSet<Handle> = self
            .active_workspaces()
            .flat_map(|w| w.members())
            .filter(|m| m.state == MembershipState::Visible)
            .map(|m| m.handle)
            .collect();

        visible.extend(
            self.workspaces
                .iter()
                .flat_map(|w| w.members())
                .filter(|m| m.state == MembershipState::Pending)
                .map(|m| m.handle),
        );

        for m in self.monitors.iter() {
            visible.extend(m.temporarily_shown.iter().copied());
        }

        visible
    }

    /// The decorations a window should currently have, if they are determined by its
    /// memberships.
    ///
    /// A window that is visible on an active workspace takes the decorations of that
    /// membership. A window that is not on screen is only removed from the taskbar, and only if
    /// one of its memberships requests it.
    pub fn effective_decorations(&self, handle: Handle) -> Option<Decorations> {
        let active = self
            .active_workspaces()
            .flat_map(|w| w.member(handle))
            .find(|m| m.state == MembershipState::Visible);

        if let Some(m) = active {
            return Some(m.decorations());
        }

        let mut memberships = self.workspaces.iter().flat_map(|w| w.member(handle));
        let first = memberships.next()?;

        let hide = first.hide_from_taskbar_when_inactive
            || memberships.any(|m| m.hide_from_taskbar_when_inactive);

        if hide {
            Some(Decorations {
                in_taskbar: Decoration::Hidden,
                ..first.decorations()
            })
        } else {
            None
        }
    }

    /// The arrangement of each active workspace in monitor order.
    pub fn arrangements(&self) -> Vec<Arrangement> {
        self.monitors
            .iter()
            .flat_map(|m| self.arrangement_for(m.active))
            .collect()
    }

    /// The arrangement of a single workspace.
    pub fn arrangement_for(&self, id: usize) -> Option<Arrangement> {
        let w = self.workspace(id)?;

        Some(Arrangement {
            monitor: w.monitor,
            workspace: w.id,
            layout: w.layout,
            tiled: w.tiled().collect(),
            floating: w.floating().collect(),
        })
    }

    /// Make the given workspace current.
    ///
    /// If the workspace is already active on another monitor then focus moves to that monitor.
    /// Otherwise the workspace replaces the active workspace of the monitor that owns it and any
    /// temporarily shown windows on that monitor are dropped.
    ///
    /// Returns `false` if the workspace was already current.
    pub fn switch_to(&mut self, id: usize) -> Result<bool> {
        let target_monitor = self.workspace(id).ok_or(Error::UnknownWorkspace(id))?.monitor;
        let current = self.current_workspace_id();

        if current == id {
            return Ok(false);
        }

        if let Some(m) = self.monitors.iter().position(|m| m.active == id) {
            self.current_monitor = m;
            self.previous_workspace = Some(current);
            return Ok(true);
        }

        let prev_monitor = self.current_monitor;
        self.monitors[prev_monitor].temporarily_shown.clear();

        let m = &mut self.monitors[target_monitor];
        m.active = id;
        m.temporarily_shown.clear();

        self.current_monitor = target_monitor;
        self.previous_workspace = Some(current);

        Ok(true)
    }

    /// Switch back to the workspace that was current before the current one.
    pub fn switch_to_previous(&mut self) -> Result<bool> {
        match self.previous_workspace {
            Some(id) => self.switch_to(id),
            None => Ok(false),
        }
    }

    /// Set the layout of a workspace, returning `false` if it was already selected.
    pub fn set_layout(&mut self, id: usize, layout: LayoutKind) -> Result<bool> {
        let w = self.workspace_mut(id)?;
        if w.layout == layout {
            return Ok(false);
        }
        w.layout = layout;

        Ok(true)
    }

    /// Select the next layout for a workspace, returning the new layout.
    pub fn cycle_layout(&mut self, id: usize) -> Result<LayoutKind> {
        let w = self.workspace_mut(id)?;
        w.layout = w.layout.next();

        Ok(w.layout)
    }

    /// Toggle whether a window floats on the given workspace, returning the new value.
    pub fn toggle_floating(&mut self, handle: Handle, id: usize) -> Result<bool> {
        let m = self.member_mut(handle, id)?;
        m.floating = !m.floating;

        Ok(m.floating)
    }

    /// Toggle the titlebar of a window on the given workspace, returning the new setting.
    pub fn toggle_titlebar(
        &mut self,
        handle: Handle,
        id: usize,
        currently_shown: bool,
    ) -> Result<Decoration> {
        let m = self.member_mut(handle, id)?;
        m.titlebar = m.titlebar.toggled(currently_shown);

        Ok(m.titlebar)
    }

    /// Toggle the borders of a window on the given workspace, returning the new setting.
    pub fn toggle_borders(
        &mut self,
        handle: Handle,
        id: usize,
        currently_shown: bool,
    ) -> Result<Decoration> {
        let m = self.member_mut(handle, id)?;
        m.borders = m.borders.toggled(currently_shown);

        Ok(m.borders)
    }

    /// Toggle the taskbar presence of a window on the given workspace, returning the new
    /// setting.
    pub fn toggle_taskbar(
        &mut self,
        handle: Handle,
        id: usize,
        currently_shown: bool,
    ) -> Result<Decoration> {
        let m = self.member_mut(handle, id)?;
        m.in_taskbar = m.in_taskbar.toggled(currently_shown);

        Ok(m.in_taskbar)
    }

    /// Share an already managed window with another workspace, copying the settings of its
    /// first existing membership.
    ///
    /// Returns `false` if the window was already a member of the workspace.
    pub fn add_window_to_workspace(&mut self, handle: Handle, id: usize) -> Result<bool> {
        let template = self
            .workspaces
            .iter()
            .find_map(|w| w.member(handle))
            .copied()
            .ok_or(Error::UnknownWindow(handle))?;

        Ok(self.workspace_mut(id)?.insert(template))
    }

    /// Move a window's membership from one workspace to another, keeping its settings.
    ///
    /// If the window is already a member of the target workspace its existing membership there
    /// is kept and the source membership is dropped.
    pub fn move_window_to_workspace(
        &mut self,
        handle: Handle,
        from: usize,
        to: usize,
    ) -> Result<bool> {
        if from == to {
            return Ok(false);
        }
        // check the target exists before modifying anything
        self.workspace_mut(to)?;

        let m = self
            .workspace_mut(from)?
            .remove(handle)
            .ok_or(Error::UnknownWindow(handle))?;
        self.workspace_mut(to)?.insert(m);

        Ok(true)
    }

    /// Remove a window from a single workspace.
    ///
    /// A window always keeps at least one membership: `false` is returned without modifying
    /// anything if this is the only workspace the window belongs to.
    pub fn remove_window_from_workspace(&mut self, handle: Handle, id: usize) -> Result<bool> {
        let ids = self.workspaces_for(handle);
        if !ids.contains(&id) {
            self.workspace_mut(id)?;
            return Err(Error::UnknownWindow(handle));
        }
        if ids.len() == 1 {
            return Ok(false);
        }

        Ok(self.workspace_mut(id)?.remove(handle).is_some())
    }

    /// Move a workspace to a different monitor, making it active there.
    ///
    /// If the workspace was active on its previous monitor, the first remaining workspace of that
    /// monitor becomes active in its place.
    ///
    /// # Errors
    /// A monitor must always own at least one workspace: moving the only workspace of a monitor
    /// returns [Error::LastWorkspaceOnMonitor].
    pub fn move_workspace_to_monitor(&mut self, id: usize, monitor: usize) -> Result<bool> {
        let from = self.workspace(id).ok_or(Error::UnknownWorkspace(id))?.monitor;
        if monitor >= self.monitors.len() {
            return Err(Error::UnknownMonitor(monitor));
        }
        if from == monitor {
            return Ok(false);
        }
        if self.monitors[from].workspaces.len() == 1 {
            return Err(Error::LastWorkspaceOnMonitor { monitor: from });
        }

        let current = self.current_workspace_id();

        let src = &mut self.monitors[from];
        src.workspaces.retain(|w| *w != id);
        if src.active == id {
            src.active = src.workspaces[0];
            src.temporarily_shown.clear();
        }

        let dst = &mut self.monitors[monitor];
        dst.workspaces.push(id);
        dst.active = id;
        dst.temporarily_shown.clear();

        self.workspace_mut(id)?.monitor = monitor;
        self.current_monitor = monitor;
        if current != id {
            self.previous_workspace = Some(current);
        }

        Ok(true)
    }
}
