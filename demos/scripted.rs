//! casement :: scripted replay
//!
//! Runs the engine against a canned sequence of window events using a rule table modelled on a
//! typical desktop setup: editors, chat windows that stay out of the way until asked for and
//! dialogs that float. Every request the engine makes of the window system is logged.
//!
//! Run with `RUST_LOG=debug cargo run --example scripted` to see the placement decisions.
use casement::{
    config::{Config, MonitorSpec, WorkspaceSpec},
    pure::{Arrangement, Decorations, LayoutKind},
    rules::{Decoration, OnCreatedOnCurrent, OnShown, PlacementSpec, Rule},
    sys::{WindowEvent, WindowSystem},
    window::{WindowDescriptor, WindowStyle},
    Engine, Error, Handle, Result,
};
use std::{
    cell::RefCell,
    collections::{HashMap, VecDeque},
    time::Duration,
};
use tracing::info;
use tracing_subscriber::{self, prelude::*, EnvFilter};

const WS_MAXIMIZEBOX: u32 = 0x0001_0000;
const WS_CAPTION: u32 = 0x00C0_0000;
const WS_THICKFRAME: u32 = 0x0004_0000;

struct ScriptedWindowSystem {
    windows: HashMap<Handle, WindowDescriptor>,
    script: RefCell<VecDeque<(Duration, WindowEvent)>>,
}

impl ScriptedWindowSystem {
    fn new(windows: Vec<WindowDescriptor>, script: Vec<(u64, WindowEvent)>) -> Self {
        Self {
            windows: windows.into_iter().map(|d| (d.handle, d)).collect(),
            script: RefCell::new(
                script
                    .into_iter()
                    .map(|(ms, e)| (Duration::from_millis(ms), e))
                    .collect(),
            ),
        }
    }

    fn check(&self, handle: Handle) -> Result<()> {
        if self.windows.contains_key(&handle) {
            Ok(())
        } else {
            Err(Error::StaleHandle(handle))
        }
    }
}

impl WindowSystem for ScriptedWindowSystem {
    fn next_event(&self, timeout: Option<Duration>) -> Result<Option<WindowEvent>> {
        let mut script = self.script.borrow_mut();
        let (wait, event) = match script.pop_front() {
            Some(next) => next,
            None => return Err(Error::ConnectionClosed),
        };

        // Deferred work due before the next scripted event gets a chance to run first
        if let Some(t) = timeout {
            if t < wait {
                std::thread::sleep(t);
                script.push_front((wait - t, event));
                return Ok(None);
            }
        }

        std::thread::sleep(wait);
        Ok(Some(event))
    }

    fn existing_windows(&self) -> Result<Vec<Handle>> {
        Ok(vec![Handle::from(0x10)])
    }

    fn describe(&self, handle: Handle) -> Result<Option<WindowDescriptor>> {
        Ok(self.windows.get(&handle).cloned())
    }

    fn show(&self, handle: Handle) -> Result<()> {
        self.check(handle)?;
        info!(%handle, "show");
        Ok(())
    }

    fn hide(&self, handle: Handle) -> Result<()> {
        self.check(handle)?;
        info!(%handle, "hide");
        Ok(())
    }

    fn activate(&self, handle: Handle) -> Result<()> {
        self.check(handle)?;
        info!(%handle, "activate");
        Ok(())
    }

    fn move_to_bottom(&self, handle: Handle) -> Result<()> {
        self.check(handle)?;
        info!(%handle, "move to bottom");
        Ok(())
    }

    fn set_topmost(&self, handle: Handle, topmost: bool) -> Result<()> {
        self.check(handle)?;
        info!(%handle, topmost, "set topmost");
        Ok(())
    }

    fn decorate(&self, handle: Handle, decorations: Decorations) -> Result<()> {
        self.check(handle)?;
        info!(%handle, ?decorations, "decorate");
        Ok(())
    }

    fn remove_menu(&self, handle: Handle) -> Result<()> {
        self.check(handle)?;
        info!(%handle, "remove menu");
        Ok(())
    }

    fn redraw(&self, handle: Option<Handle>) -> Result<()> {
        info!(?handle, "redraw");
        Ok(())
    }

    fn arrange(&self, a: &Arrangement) -> Result<()> {
        info!(
            workspace = a.workspace,
            layout = a.layout.symbol(),
            tiled = ?a.tiled,
            floating = ?a.floating,
            "arrange"
        );
        Ok(())
    }
}

fn config() -> Result<Config> {
    let hidden = |id| {
        PlacementSpec::on(id)
            .titlebar(Decoration::Hidden)
            .borders(Decoration::Hidden)
    };

    Config::builder()
        .monitor(MonitorSpec::new("primary"))
        .workspace(WorkspaceSpec::new("main", 0).bar("workspaces"))
        .workspace(WorkspaceSpec::new("web", 0).layout(LayoutKind::FullScreen))
        .workspace(WorkspaceSpec::new("code", 0))
        .workspace(WorkspaceSpec::new("chat", 0))
        .rule(
            Rule::builder()
                .class_name("^Vim$")
                .placement(hidden(3))
                .created_delay(Duration::from_millis(100)),
        )
        .rule(
            Rule::builder()
                .class_name("^Chrome_WidgetWin_1$")
                .placement(PlacementSpec::on(2)),
        )
        .rule(Rule::builder().class_name("^tSkMainForm.*").placement(hidden(4)))
        .rule(
            Rule::builder()
                .class_name("^TConversationForm.*")
                .placement(hidden(4))
                .on_created(OnShown::HideWindow)
                .on_created_on_current(OnCreatedOnCurrent::MoveToBottom),
        )
        .rule(Rule::builder().class_name("^Shell_TrayWnd$").unmanaged())
        .rule(
            Rule::builder()
                .class_name("^#32770$")
                .retry_after(Duration::from_millis(500))
                .placement(PlacementSpec::current().floating()),
        )
        .rule(Rule::builder().style_contains(WindowStyle::POPUP).unmanaged())
        .rule(
            Rule::builder()
                .style_not_contains(WindowStyle::MAXIMIZEBOX)
                .retry_after(Duration::from_millis(300))
                .placement(PlacementSpec::current().floating()),
        )
        .rule(Rule::builder().retry_after(Duration::from_millis(300)))
        .build()
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .finish()
        .init();

    let app = WS_CAPTION | WS_THICKFRAME | WS_MAXIMIZEBOX;
    let windows = vec![
        WindowDescriptor::new(0x10, "Shell_TrayWnd", "", "explorer"),
        WindowDescriptor::new(0x20, "Vim", "notes.md - VIM", "gvim").with_style(app),
        WindowDescriptor::new(0x30, "Chrome_WidgetWin_1", "Inbox", "chrome").with_style(app),
        WindowDescriptor::new(0x40, "tSkMainForm", "Skype", "skype").with_style(app),
        WindowDescriptor::new(0x50, "TConversationForm", "Chat", "skype").with_style(app),
        WindowDescriptor::new(0x60, "#32770", "Options", "explorer").with_style(WS_CAPTION),
    ];

    let script = vec![
        (10, WindowEvent::Created(Handle::from(0x20))),
        (200, WindowEvent::Created(Handle::from(0x30))),
        (10, WindowEvent::Created(Handle::from(0x40))),
        (10, WindowEvent::Created(Handle::from(0x50))),
        (10, WindowEvent::Shown(Handle::from(0x50))),
        (10, WindowEvent::Created(Handle::from(0x60))),
        (600, WindowEvent::Destroyed(Handle::from(0x60))),
    ];

    let config = config()?;
    let mut engine = Engine::new(&config, ScriptedWindowSystem::new(windows, script))?;
    engine.run()?;

    for w in engine.snapshot().workspaces {
        let windows: Vec<String> = w.windows().map(|h| h.to_string()).collect();
        info!(id = w.id, name = %w.name, layout = %w.layout_name, ?windows, "final state");
    }

    for e in engine.drain_diagnostics() {
        info!(%e, "diagnostic");
    }

    Ok(())
}
