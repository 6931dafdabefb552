//! Shared helpers for integration tests
#![allow(dead_code)]
use casement::{
    config::{Config, MonitorSpec, WorkspaceSpec},
    pure::{Arrangement, Decorations},
    rules::{Rule, RuleBuilder},
    sys::{WindowEvent, WindowSystem},
    Error, Handle, Result, WindowDescriptor,
};
use std::{
    cell::RefCell,
    collections::{HashMap, VecDeque},
    time::Duration,
};

/// Something the engine asked the window system to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Show(Handle),
    Hide(Handle),
    Activate(Handle),
    MoveToBottom(Handle),
    SetTopmost(Handle, bool),
    Decorate(Handle, Decorations),
    RemoveMenu(Handle),
    Redraw(Option<Handle>),
    Arrange(Arrangement),
}

impl Call {
    pub fn handle(&self) -> Option<Handle> {
        match self {
            Self::Show(h)
            | Self::Hide(h)
            | Self::Activate(h)
            | Self::MoveToBottom(h)
            | Self::SetTopmost(h, _)
            | Self::Decorate(h, _)
            | Self::RemoveMenu(h) => Some(*h),
            Self::Redraw(h) => *h,
            Self::Arrange(_) => None,
        }
    }
}

/// A scripted window system that records every request made of it.
///
/// Once the scripted events have all been delivered, [WindowSystem::next_event] returns
/// [Error::ConnectionClosed].
#[derive(Debug, Default)]
pub struct RecordingWindowSystem {
    windows: RefCell<HashMap<Handle, WindowDescriptor>>,
    existing: Vec<Handle>,
    events: RefCell<VecDeque<WindowEvent>>,
    calls: RefCell<Vec<Call>>,
}

impl RecordingWindowSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Windows that are already on screen when the engine starts
    pub fn with_existing(descriptors: impl IntoIterator<Item = WindowDescriptor>) -> Self {
        let s = Self::default();
        let mut existing = Vec::new();
        for d in descriptors {
            existing.push(d.handle);
            s.add(d);
        }

        Self { existing, ..s }
    }

    pub fn add(&self, d: WindowDescriptor) {
        self.windows.borrow_mut().insert(d.handle, d);
    }

    pub fn remove(&self, handle: Handle) {
        self.windows.borrow_mut().remove(&handle);
    }

    pub fn set_title(&self, handle: Handle, title: &str) {
        if let Some(d) = self.windows.borrow_mut().get_mut(&handle) {
            d.title = title.to_owned();
        }
    }

    pub fn push_event(&self, event: WindowEvent) {
        self.events.borrow_mut().push_back(event);
    }

    pub fn take_calls(&self) -> Vec<Call> {
        self.calls.take()
    }

    /// Calls that refer to a specific window, dropping arrangements
    pub fn take_calls_for(&self, handle: Handle) -> Vec<Call> {
        self.calls
            .take()
            .into_iter()
            .filter(|c| c.handle() == Some(handle))
            .collect()
    }

    fn record(&self, handle: Handle, call: Call) -> Result<()> {
        if !self.windows.borrow().contains_key(&handle) {
            return Err(Error::StaleHandle(handle));
        }
        self.calls.borrow_mut().push(call);

        Ok(())
    }
}

impl WindowSystem for RecordingWindowSystem {
    fn next_event(&self, _: Option<Duration>) -> Result<Option<WindowEvent>> {
        match self.events.borrow_mut().pop_front() {
            Some(e) => Ok(Some(e)),
            None => Err(Error::ConnectionClosed),
        }
    }

    fn existing_windows(&self) -> Result<Vec<Handle>> {
        Ok(self.existing.clone())
    }

    fn describe(&self, handle: Handle) -> Result<Option<WindowDescriptor>> {
        Ok(self.windows.borrow().get(&handle).cloned())
    }

    fn show(&self, handle: Handle) -> Result<()> {
        self.record(handle, Call::Show(handle))
    }

    fn hide(&self, handle: Handle) -> Result<()> {
        self.record(handle, Call::Hide(handle))
    }

    fn activate(&self, handle: Handle) -> Result<()> {
        self.record(handle, Call::Activate(handle))
    }

    fn move_to_bottom(&self, handle: Handle) -> Result<()> {
        self.record(handle, Call::MoveToBottom(handle))
    }

    fn set_topmost(&self, handle: Handle, topmost: bool) -> Result<()> {
        self.record(handle, Call::SetTopmost(handle, topmost))
    }

    fn decorate(&self, handle: Handle, decorations: Decorations) -> Result<()> {
        self.record(handle, Call::Decorate(handle, decorations))
    }

    fn remove_menu(&self, handle: Handle) -> Result<()> {
        self.record(handle, Call::RemoveMenu(handle))
    }

    fn redraw(&self, handle: Option<Handle>) -> Result<()> {
        self.calls.borrow_mut().push(Call::Redraw(handle));
        Ok(())
    }

    fn arrange(&self, arrangement: &Arrangement) -> Result<()> {
        self.calls
            .borrow_mut()
            .push(Call::Arrange(arrangement.clone()));
        Ok(())
    }
}

/// A single monitor with `n_ws` workspaces named "1".."n" and the given rules followed by a
/// catch-all that places windows on the current workspace.
pub fn config(n_ws: usize, rules: impl IntoIterator<Item = RuleBuilder>) -> Config {
    builder(n_ws, 1, rules)
        .rules([Rule::catch_all()])
        .build()
        .expect("valid config")
}

pub fn builder(
    n_ws: usize,
    n_monitors: usize,
    rules: impl IntoIterator<Item = RuleBuilder>,
) -> casement::config::ConfigBuilder {
    let mut b = Config::builder();
    for m in 0..n_monitors {
        b = b.monitor(MonitorSpec::new(format!("monitor-{m}")));
    }
    for ix in 0..n_ws {
        b = b.workspace(WorkspaceSpec::new((ix + 1).to_string(), ix % n_monitors));
    }
    for r in rules {
        b = b.rule(r);
    }

    b
}

pub fn window(handle: u32, class: &str, title: &str) -> WindowDescriptor {
    WindowDescriptor::new(handle, class, title, "app")
}

pub fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
