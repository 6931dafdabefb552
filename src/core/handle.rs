//! Window event handlers for use in the main event loop
use crate::{
    core::{drop_stale, scheduler::Deferred, ManagedWindow, State},
    pure::MembershipState,
    rules::{
        resolve::{Attempt, Placement, Resolution, Resolver},
        OnCreatedOnCurrent, OnShown,
    },
    sys::WindowSystem,
    window::{Handle, WindowDescriptor},
    Error, Result,
};
use std::time::Instant;
use tracing::{debug, trace, warn};

// What to do with a window once the window system has caught up with a state change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FollowUp {
    Activate,
    MoveToBottom,
    Nothing,
}

fn describe<S>(handle: Handle, sys: &S) -> Result<Option<WindowDescriptor>>
where
    S: WindowSystem,
{
    match sys.describe(handle) {
        Ok(None) | Err(Error::StaleHandle(_)) => {
            trace!(%handle, "window no longer exists: dropping");
            Ok(None)
        }
        res => res,
    }
}

pub(crate) fn created<S>(handle: Handle, now: Instant, state: &mut State<'_>, sys: &S) -> Result<()>
where
    S: WindowSystem,
{
    if state.is_known(handle) {
        trace!(%handle, "window is already known: ignoring creation");
        return Ok(());
    }

    match describe(handle, sys)? {
        Some(d) => evaluate(d, Attempt::first(), now, state, sys),
        None => Ok(()),
    }
}

pub(crate) fn existing<S>(
    handle: Handle,
    now: Instant,
    state: &mut State<'_>,
    sys: &S,
) -> Result<()>
where
    S: WindowSystem,
{
    if state.is_known(handle) {
        return Ok(());
    }

    match describe(handle, sys)? {
        Some(d) => evaluate(d, Attempt::initial_scan(), now, state, sys),
        None => Ok(()),
    }
}

pub(crate) fn retry<S>(
    handle: Handle,
    attempt: Attempt,
    now: Instant,
    state: &mut State<'_>,
    sys: &S,
) -> Result<()>
where
    S: WindowSystem,
{
    trace!(%handle, retries = attempt.retries, "retrying resolution");

    match describe(handle, sys)? {
        Some(d) => evaluate(d, attempt, now, state, sys),
        None => Ok(()),
    }
}

fn evaluate<S>(
    d: WindowDescriptor,
    attempt: Attempt,
    now: Instant,
    state: &mut State<'_>,
    sys: &S,
) -> Result<()>
where
    S: WindowSystem,
{
    let handle = d.handle;
    let config = state.config;
    let resolution = Resolver::new(config.rules()).resolve(&d, attempt, &mut state.diagnostics);

    match resolution {
        Resolution::Unmanaged { .. } => {
            state.ignored.insert(handle);
            Ok(())
        }

        Resolution::Deferred { after, next, .. } => {
            state
                .scheduler
                .schedule(handle, now, after, Deferred::Retry(next));
            Ok(())
        }

        Resolution::Placed(p) => place(d, p, attempt.initial_scan, now, state, sys),
    }
}

fn place<S>(
    d: WindowDescriptor,
    p: Placement,
    initial_scan: bool,
    now: Instant,
    state: &mut State<'_>,
    sys: &S,
) -> Result<()>
where
    S: WindowSystem,
{
    let handle = d.handle;
    let targets = state.workspaces.targets(&p.placements);
    let on_active = targets.iter().any(|(id, _)| state.workspaces.is_active(*id));

    let initial = if !on_active && p.actions.on_created == OnShown::HideWindow {
        MembershipState::Hidden
    } else if p.created_delay.is_some() {
        MembershipState::Pending
    } else {
        MembershipState::Visible
    };

    let placed = state.workspaces.place(handle, &p.placements, initial);
    if placed.is_empty() {
        warn!(%handle, rule = p.rule, "rule did not target any known workspace: leaving unmanaged");
        state.ignored.insert(handle);
        return Ok(());
    }

    debug!(%handle, rule = p.rule, workspaces = ?placed, ?initial, "placed window");

    // The window is on screen when we first hear about it
    state.mapped.insert(handle);
    state.windows.insert(
        handle,
        ManagedWindow {
            descriptor: d,
            rule: p.rule,
            actions: p.actions,
            cosmetics: p.cosmetics,
        },
    );

    if !p.cosmetics.show_menu {
        drop_stale(sys.remove_menu(handle))?;
    }

    if initial_scan {
        return state.refresh(sys);
    }

    // Which set of created actions applies is fixed now, even if the user switches workspace
    // before a created-delay elapses.
    let on_current = state.workspaces.current_workspace().contains(handle);

    match p.created_delay {
        Some(after) => {
            let kind = Deferred::CreatedDelay { on_current };
            state.scheduler.schedule(handle, now, after, kind);
            state.refresh(sys)
        }

        None => {
            let follow_up = apply_created_actions(handle, on_current, state)?;
            state.refresh(sys)?;
            run_created_follow_up(handle, follow_up, state, sys)
        }
    }
}

pub(crate) fn created_delay_elapsed<S>(
    handle: Handle,
    on_current: bool,
    state: &mut State<'_>,
    sys: &S,
) -> Result<()>
where
    S: WindowSystem,
{
    if !state.windows.contains_key(&handle) {
        return Ok(());
    }

    state
        .workspaces
        .commit_pending(handle, MembershipState::Visible);

    let follow_up = apply_created_actions(handle, on_current, state)?;
    state.refresh(sys)?;

    run_created_follow_up(handle, follow_up, state, sys)
}

fn apply_created_actions(
    handle: Handle,
    on_current: bool,
    state: &mut State<'_>,
) -> Result<FollowUp> {
    let actions = match state.windows.get(&handle) {
        Some(w) => w.actions,
        None => return Ok(FollowUp::Nothing),
    };

    if on_current {
        // The user may have moved on to another workspace while a created-delay was running
        if !state.workspaces.is_on_active_workspace(handle) {
            trace!(%handle, "workspace the window was created on is no longer active");
            return Ok(FollowUp::Nothing);
        }

        return Ok(match actions.on_created_on_current {
            OnCreatedOnCurrent::ActivateWindow => FollowUp::Activate,
            OnCreatedOnCurrent::MoveToBottom => FollowUp::MoveToBottom,
        });
    }

    apply_shown_action(handle, actions.on_created, state)
}

fn run_created_follow_up<S>(
    handle: Handle,
    follow_up: FollowUp,
    state: &mut State<'_>,
    sys: &S,
) -> Result<()>
where
    S: WindowSystem,
{
    let w = match state.windows.get(&handle) {
        Some(w) => w,
        None => return Ok(()),
    };

    if w.descriptor.topmost && !w.actions.preserve_topmost {
        trace!(%handle, "clearing topmost flag");
        drop_stale(sys.set_topmost(handle, false))?;
    }

    if w.cosmetics.redraw_desktop_on_create {
        sys.redraw(None)?;
    }

    run_follow_up(handle, follow_up, sys)
}

fn run_follow_up<S>(handle: Handle, follow_up: FollowUp, sys: &S) -> Result<()>
where
    S: WindowSystem,
{
    match follow_up {
        FollowUp::Activate => drop_stale(sys.activate(handle)),
        FollowUp::MoveToBottom => drop_stale(sys.move_to_bottom(handle)),
        FollowUp::Nothing => Ok(()),
    }
}

// Bring a window that is not on any active workspace to the user's attention (or not)
fn apply_shown_action(handle: Handle, action: OnShown, state: &mut State<'_>) -> Result<FollowUp> {
    let ws = &mut state.workspaces;
    if ws.is_on_active_workspace(handle) {
        return Ok(FollowUp::Nothing);
    }

    trace!(%handle, ?action, "window is not on an active workspace");

    match action {
        OnShown::SwitchToWindowsWorkspace => {
            ws.reveal(handle);
            let ids = ws.workspaces_for(handle);
            let target = ids.iter().find(|&&id| ws.is_active(id)).or(ids.first());
            if let Some(&id) = target {
                ws.switch_to(id)?;
            }
            Ok(FollowUp::Activate)
        }

        OnShown::MoveWindowToCurrentWorkspace => {
            ws.reveal(handle);
            let current = ws.current_workspace_id();
            if let Some(&from) = ws.workspaces_for(handle).first() {
                ws.move_window_to_workspace(handle, from, current)?;
            }
            Ok(FollowUp::Activate)
        }

        OnShown::TemporarilyShowOnCurrentWorkspace => {
            ws.show_temporarily(handle);
            Ok(FollowUp::Activate)
        }

        // Left in its current state: the next refresh takes it back off screen
        OnShown::HideWindow => Ok(FollowUp::Nothing),
    }
}

pub(crate) fn shown<S>(handle: Handle, now: Instant, state: &mut State<'_>, sys: &S) -> Result<()>
where
    S: WindowSystem,
{
    let action = match state.windows.get(&handle) {
        Some(w) => w.actions.on_hidden_shown,
        None => return created(handle, now, state, sys),
    };

    // The window system put it on screen: make sure we hide it again if it should not be
    state.mapped.insert(handle);

    if state.workspaces.on_screen().contains(&handle) {
        return state.refresh(sys);
    }

    let follow_up = apply_shown_action(handle, action, state)?;
    state.refresh(sys)?;

    run_follow_up(handle, follow_up, sys)
}

pub(crate) fn destroyed<S>(handle: Handle, state: &mut State<'_>, sys: &S) -> Result<()>
where
    S: WindowSystem,
{
    state.scheduler.cancel(handle);
    state.ignored.remove(&handle);
    state.decorated.remove(&handle);

    if state.windows.remove(&handle).is_none() {
        return Ok(());
    }

    let ids = state.workspaces.remove_window(handle);
    debug!(%handle, workspaces = ?ids, "window destroyed");

    // Already gone so there is nothing to hide
    state.mapped.remove(&handle);

    state.refresh(sys)
}

pub(crate) fn style_changed<S>(
    handle: Handle,
    now: Instant,
    state: &mut State<'_>,
    sys: &S,
) -> Result<()>
where
    S: WindowSystem,
{
    if !state.windows.contains_key(&handle) {
        // Windows that were created without a caption sometimes only become real top level
        // windows once their style is set.
        return created(handle, now, state, sys);
    }

    update_descriptor(handle, state, sys)
}

pub(crate) fn title_changed<S>(handle: Handle, state: &mut State<'_>, sys: &S) -> Result<()>
where
    S: WindowSystem,
{
    if !state.windows.contains_key(&handle) {
        return Ok(());
    }

    update_descriptor(handle, state, sys)?;

    let update_icon = state
        .windows
        .get(&handle)
        .map(|w| w.cosmetics.update_icon)
        .unwrap_or(false);

    if update_icon && state.mapped.contains(&handle) {
        drop_stale(sys.redraw(Some(handle)))?;
    }

    Ok(())
}

fn update_descriptor<S>(handle: Handle, state: &mut State<'_>, sys: &S) -> Result<()>
where
    S: WindowSystem,
{
    if let Some(d) = describe(handle, sys)? {
        if let Some(w) = state.windows.get_mut(&handle) {
            trace!(%handle, title = %d.title, "updating window descriptor");
            w.descriptor = d;
        }
    }

    Ok(())
}

pub(crate) fn minimized<S>(handle: Handle, state: &mut State<'_>, sys: &S) -> Result<()>
where
    S: WindowSystem,
{
    if !state.workspaces.minimize(handle) {
        return Ok(());
    }

    // The window system has already taken it off screen
    state.mapped.remove(&handle);

    state.refresh(sys)
}

pub(crate) fn restored<S>(handle: Handle, state: &mut State<'_>, sys: &S) -> Result<()>
where
    S: WindowSystem,
{
    if !state.workspaces.restore(handle) {
        return Ok(());
    }

    state.mapped.insert(handle);

    state.refresh(sys)
}
