//! Core engine logic for driving window placement from window system events
use crate::{
    config::Config,
    pure::{Decorations, LayoutKind, Snapshot, WorkspaceSet},
    rules::{Cosmetics, LifecycleActions},
    sys::{WindowEvent, WindowSystem},
    window::{Handle, WindowDescriptor},
    Error, Result,
};
use std::{
    collections::{HashMap, HashSet},
    mem::take,
    time::Instant,
};
use tracing::{error, info, span, trace, Level};

mod handle;
pub mod scheduler;

use scheduler::{Deferred, Scheduler};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What the engine remembers about a window it has placed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ManagedWindow {
    /// The most recent descriptor fetched for this window
    pub descriptor: WindowDescriptor,
    /// The index of the rule that placed this window
    pub rule: usize,
    /// Lifecycle actions copied from the matching rule
    pub actions: LifecycleActions,
    /// Cosmetic hints copied from the matching rule
    pub cosmetics: Cosmetics,
}

/// Mutable engine state that is handed to event handlers alongside the [WindowSystem].
#[derive(Debug)]
pub struct State<'c> {
    pub(crate) config: &'c Config,
    pub(crate) workspaces: WorkspaceSet,
    pub(crate) scheduler: Scheduler,
    pub(crate) windows: HashMap<Handle, ManagedWindow>,
    // Windows that resolved as unmanaged or matched no rule. These are never re-evaluated
    // until they are destroyed.
    pub(crate) ignored: HashSet<Handle>,
    // What we last asked the window system to have on screen
    pub(crate) mapped: HashSet<Handle>,
    pub(crate) decorated: HashMap<Handle, Decorations>,
    pub(crate) diagnostics: Vec<Error>,
}

impl<'c> State<'c> {
    pub(crate) fn try_new(config: &'c Config) -> Result<Self> {
        Ok(Self {
            config,
            workspaces: WorkspaceSet::try_new(config)?,
            scheduler: Scheduler::new(),
            windows: HashMap::new(),
            ignored: HashSet::new(),
            mapped: HashSet::new(),
            decorated: HashMap::new(),
            diagnostics: Vec::new(),
        })
    }

    /// The configuration this state was built from
    pub fn config(&self) -> &Config {
        self.config
    }

    /// The current workspace and monitor state
    pub fn workspaces(&self) -> &WorkspaceSet {
        &self.workspaces
    }

    /// Details of a managed window
    pub fn window(&self, handle: Handle) -> Option<&ManagedWindow> {
        self.windows.get(&handle)
    }

    /// Whether a window has been seen and left unmanaged
    pub fn is_ignored(&self, handle: Handle) -> bool {
        self.ignored.contains(&handle)
    }

    /// Whether a window has deferred work outstanding
    pub fn is_deferred(&self, handle: Handle) -> bool {
        self.scheduler.is_pending(handle)
    }

    pub(crate) fn is_known(&self, handle: Handle) -> bool {
        self.windows.contains_key(&handle)
            || self.ignored.contains(&handle)
            || self.scheduler.is_pending(handle)
    }

    /// Push the current workspace state out to the window system.
    ///
    /// Only the difference between what is now on screen and what was on screen after the last
    /// refresh is sent: windows are shown or hidden, decorations are re-applied where they have
    /// changed and every active workspace is re-arranged.
    pub(crate) fn refresh<S>(&mut self, sys: &S) -> Result<()>
    where
        S: WindowSystem,
    {
        let on_screen = self.workspaces.on_screen();

        let mut hide: Vec<Handle> = self.mapped.difference(&on_screen).copied().collect();
        let mut show: Vec<Handle> = on_screen.difference(&self.mapped).copied().collect();
        hide.sort();
        show.sort();

        for handle in hide {
            trace!(%handle, "hiding window");
            drop_stale(sys.hide(handle))?;
        }

        for handle in show {
            trace!(%handle, "showing window");
            drop_stale(sys.show(handle))?;

            let redraw = self
                .windows
                .get(&handle)
                .map(|w| w.cosmetics.redraw_on_show)
                .unwrap_or(false);

            if redraw {
                drop_stale(sys.redraw(Some(handle)))?;
            }
        }

        self.mapped = on_screen;

        let mut handles: Vec<Handle> = self.windows.keys().copied().collect();
        handles.sort();

        for handle in handles {
            let wanted = match self.workspaces.effective_decorations(handle) {
                Some(d) => d,
                None => continue,
            };

            // Nothing has been applied yet is the same as everything being left as is
            let applied = self.decorated.get(&handle).copied().unwrap_or_default();
            if applied != wanted {
                trace!(%handle, ?wanted, "updating window decorations");
                drop_stale(sys.decorate(handle, wanted))?;
                self.decorated.insert(handle, wanted);
            }
        }

        for arrangement in self.workspaces.arrangements() {
            sys.arrange(&arrangement)?;
        }

        Ok(())
    }

    /// Run `f` against the workspace state and then refresh the window system.
    pub(crate) fn modify_and_refresh<S, F, T>(&mut self, sys: &S, f: F) -> Result<T>
    where
        S: WindowSystem,
        F: FnOnce(&mut WorkspaceSet) -> Result<T>,
    {
        let res = f(&mut self.workspaces)?;
        self.refresh(sys)?;

        Ok(res)
    }
}

// Destruction notifications race with in-flight work so a window vanishing underneath us is
// not an error.
pub(crate) fn drop_stale(res: Result<()>) -> Result<()> {
    match res {
        Err(Error::StaleHandle(handle)) => {
            trace!(%handle, "window no longer exists: dropping request");
            Ok(())
        }
        res => res,
    }
}

/// The window placement engine.
///
/// An engine owns a [WindowSystem] and the [State] of every window it has seen. All window
/// system events and deferred work are processed sequentially by a single caller: either by
/// calling [Engine::run] or by driving [Engine::handle_event] and [Engine::tick] directly.
#[derive(Debug)]
pub struct Engine<'c, S>
where
    S: WindowSystem,
{
    sys: S,
    state: State<'c>,
}

impl<'c, S> Engine<'c, S>
where
    S: WindowSystem,
{
    /// Create a new engine with the initial workspace state described by `config`.
    pub fn new(config: &'c Config, sys: S) -> Result<Self> {
        Ok(Self {
            sys,
            state: State::try_new(config)?,
        })
    }

    /// The underlying window system
    pub fn sys(&self) -> &S {
        &self.sys
    }

    /// The current engine state
    pub fn state(&self) -> &State<'c> {
        &self.state
    }

    /// An owned copy of the current workspace state
    pub fn snapshot(&self) -> Snapshot {
        self.state.workspaces.snapshot()
    }

    /// Take all diagnostics recorded since the last call.
    ///
    /// Diagnostics are recoverable problems such as a rule predicate failing or a window that
    /// no rule matched. They never stop the engine.
    pub fn drain_diagnostics(&mut self) -> Vec<Error> {
        take(&mut self.state.diagnostics)
    }

    /// Place every window that already exists.
    ///
    /// Existing windows are resolved without retries, created-delays or lifecycle actions.
    #[tracing::instrument(level = "info", skip_all)]
    pub fn scan_existing(&mut self, now: Instant) -> Result<()> {
        let Self { sys, state } = self;

        let existing = sys.existing_windows()?;
        info!(n_windows = existing.len(), "placing existing windows");

        for handle in existing {
            if let Err(e) = handle::existing(handle, now, state, sys) {
                error!(%e, %handle, "unable to place existing window");
            }
        }

        state.refresh(sys)
    }

    /// Process a single window system event.
    pub fn handle_event(&mut self, event: WindowEvent, now: Instant) -> Result<()> {
        let Self { sys, state } = self;
        trace!(?event, "handling event");

        match event {
            WindowEvent::Created(h) => handle::created(h, now, state, sys),
            WindowEvent::Shown(h) => handle::shown(h, now, state, sys),
            WindowEvent::Destroyed(h) => handle::destroyed(h, state, sys),
            WindowEvent::StyleChanged(h) => handle::style_changed(h, now, state, sys),
            WindowEvent::TitleChanged(h) => handle::title_changed(h, state, sys),
            WindowEvent::Minimized(h) => handle::minimized(h, state, sys),
            WindowEvent::Restored(h) => handle::restored(h, state, sys),
        }
    }

    /// Run all deferred work that is due at `now`.
    ///
    /// A failure in one piece of deferred work is logged and does not prevent the rest from
    /// running.
    pub fn tick(&mut self, now: Instant) {
        let Self { sys, state } = self;

        while let Some((handle, kind)) = state.scheduler.pop_due(now) {
            let res = match kind {
                Deferred::Retry(attempt) => handle::retry(handle, attempt, now, state, sys),
                Deferred::CreatedDelay { on_current } => {
                    handle::created_delay_elapsed(handle, on_current, state, sys)
                }
            };

            if let Err(e) = res {
                error!(%e, %handle, ?kind, "error running deferred work");
            }
        }
    }

    /// Place existing windows and then process events until the window system connection is
    /// closed.
    ///
    /// Errors from individual event handlers are logged and do not stop the engine.
    pub fn run(&mut self) -> Result<()> {
        let span = span!(target: "casement", Level::INFO, "casement");
        let _enter = span.enter();

        self.scan_existing(Instant::now())?;

        loop {
            let now = Instant::now();
            self.tick(now);

            let timeout = self
                .state
                .scheduler
                .next_deadline()
                .map(|d| d.saturating_duration_since(now));

            match self.sys.next_event(timeout) {
                Ok(Some(event)) => {
                    if let Err(e) = self.handle_event(event, Instant::now()) {
                        error!(%e, ?event, "error handling event");
                    }
                }
                Ok(None) => (),
                Err(Error::ConnectionClosed) => {
                    info!("window system connection closed: exiting");
                    return Ok(());
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Make a workspace current, showing it on its monitor.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn switch_to_workspace(&mut self, id: usize) -> Result<bool> {
        self.state
            .modify_and_refresh(&self.sys, |ws| ws.switch_to(id))
    }

    /// Switch back to the previously current workspace.
    pub fn switch_to_previous_workspace(&mut self) -> Result<bool> {
        self.state
            .modify_and_refresh(&self.sys, |ws| ws.switch_to_previous())
    }

    /// Select a layout for a workspace.
    pub fn set_layout(&mut self, id: usize, layout: LayoutKind) -> Result<bool> {
        self.state
            .modify_and_refresh(&self.sys, |ws| ws.set_layout(id, layout))
    }

    /// Move a workspace on to the next layout.
    pub fn cycle_layout(&mut self, id: usize) -> Result<LayoutKind> {
        self.state
            .modify_and_refresh(&self.sys, |ws| ws.cycle_layout(id))
    }

    /// Toggle floating for a window on the current workspace.
    pub fn toggle_floating(&mut self, handle: Handle) -> Result<bool> {
        let id = self.state.workspaces.current_workspace_id();
        self.state
            .modify_and_refresh(&self.sys, |ws| ws.toggle_floating(handle, id))
    }

    /// Toggle the titlebar of a window on the current workspace.
    pub fn toggle_titlebar(&mut self, handle: Handle) -> Result<()> {
        let id = self.state.workspaces.current_workspace_id();
        let shown = self.descriptor(handle)?.has_titlebar();
        self.state
            .modify_and_refresh(&self.sys, |ws| ws.toggle_titlebar(handle, id, shown))
            .map(|_| ())
    }

    /// Toggle the borders of a window on the current workspace.
    pub fn toggle_borders(&mut self, handle: Handle) -> Result<()> {
        let id = self.state.workspaces.current_workspace_id();
        let shown = self.descriptor(handle)?.has_borders();
        self.state
            .modify_and_refresh(&self.sys, |ws| ws.toggle_borders(handle, id, shown))
            .map(|_| ())
    }

    /// Toggle the taskbar entry of a window on the current workspace.
    pub fn toggle_taskbar(&mut self, handle: Handle) -> Result<()> {
        let id = self.state.workspaces.current_workspace_id();
        let shown = self.descriptor(handle)?.in_taskbar();
        self.state
            .modify_and_refresh(&self.sys, |ws| ws.toggle_taskbar(handle, id, shown))
            .map(|_| ())
    }

    /// Share a managed window with another workspace.
    pub fn add_window_to_workspace(&mut self, handle: Handle, id: usize) -> Result<bool> {
        self.state
            .modify_and_refresh(&self.sys, |ws| ws.add_window_to_workspace(handle, id))
    }

    /// Move a managed window to another workspace.
    ///
    /// The window leaves the current workspace if it is a member of it, otherwise it leaves
    /// the first workspace it belongs to.
    pub fn move_window_to_workspace(&mut self, handle: Handle, to: usize) -> Result<bool> {
        let ws = &self.state.workspaces;
        let from = if ws.current_workspace().contains(handle) {
            ws.current_workspace_id()
        } else {
            *ws.workspaces_for(handle)
                .first()
                .ok_or(Error::UnknownWindow(handle))?
        };

        self.state
            .modify_and_refresh(&self.sys, |ws| ws.move_window_to_workspace(handle, from, to))
    }

    /// Remove a managed window from one of the workspaces it is shared with.
    pub fn remove_window_from_workspace(&mut self, handle: Handle, id: usize) -> Result<bool> {
        self.state
            .modify_and_refresh(&self.sys, |ws| ws.remove_window_from_workspace(handle, id))
    }

    /// Move a workspace to another monitor.
    pub fn move_workspace_to_monitor(&mut self, id: usize, monitor: usize) -> Result<bool> {
        self.state
            .modify_and_refresh(&self.sys, |ws| ws.move_workspace_to_monitor(id, monitor))
    }

    fn descriptor(&self, handle: Handle) -> Result<&WindowDescriptor> {
        self.state
            .windows
            .get(&handle)
            .map(|w| &w.descriptor)
            .ok_or(Error::UnknownWindow(handle))
    }
}
