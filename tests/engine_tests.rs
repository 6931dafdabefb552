//! End to end behaviour of the engine against a scripted window system
use casement::{
    pure::{Arrangement, Decorations, LayoutKind, MembershipState},
    rules::{Cosmetics, Decoration, OnCreatedOnCurrent, OnShown, PlacementSpec, Retry, Rule},
    sys::WindowEvent,
    Engine, Error, Handle, WindowDescriptor,
};
use simple_test_case::test_case;
use std::time::Instant;

mod common;

use common::{builder, config, init_tracing, ms, window, Call, RecordingWindowSystem};

fn h(n: u32) -> Handle {
    Handle::from(n)
}

fn state_on(
    engine: &Engine<'_, RecordingWindowSystem>,
    id: usize,
    handle: Handle,
) -> Option<MembershipState> {
    let snap = engine.snapshot();
    let ws = snap.workspace(id)?;
    let m = ws.members.iter().find(|m| m.handle() == handle)?;

    Some(m.state())
}

#[test]
fn created_delay_holds_a_window_pending_until_it_elapses() {
    init_tracing();
    let config = config(
        5,
        [Rule::builder()
            .class_name("^Vim$")
            .placement(
                PlacementSpec::on(3)
                    .titlebar(Decoration::Hidden)
                    .borders(Decoration::Hidden),
            )
            .created_delay(ms(100))],
    );
    let sys = RecordingWindowSystem::new();
    sys.add(WindowDescriptor::new(1, "Vim", "", "vim"));
    let mut engine = Engine::new(&config, sys).unwrap();
    let t0 = Instant::now();

    engine.handle_event(WindowEvent::Created(h(1)), t0).unwrap();
    assert_eq!(state_on(&engine, 3, h(1)), Some(MembershipState::Pending));
    assert!(engine.sys().take_calls_for(h(1)).is_empty());

    engine.tick(t0 + ms(50));
    assert_eq!(state_on(&engine, 3, h(1)), Some(MembershipState::Pending));

    engine.tick(t0 + ms(100));
    assert_eq!(state_on(&engine, 3, h(1)), Some(MembershipState::Visible));
    assert_eq!(engine.snapshot().current_workspace, 3);

    let hidden = Decorations {
        titlebar: Decoration::Hidden,
        borders: Decoration::Hidden,
        in_taskbar: Decoration::AsIs,
    };
    assert_eq!(
        engine.sys().take_calls_for(h(1)),
        vec![Call::Decorate(h(1), hidden), Call::Activate(h(1))]
    );
}

#[test]
fn switching_away_during_a_created_delay_keeps_the_new_workspace() {
    let config = config(3, [Rule::builder().class_name("^Vim$").created_delay(ms(100))]);
    let sys = RecordingWindowSystem::new();
    sys.add(window(1, "Vim", "notes.md"));
    let mut engine = Engine::new(&config, sys).unwrap();
    let t0 = Instant::now();

    engine.handle_event(WindowEvent::Created(h(1)), t0).unwrap();
    engine.switch_to_workspace(2).unwrap();
    engine.sys().take_calls();

    engine.tick(t0 + ms(100));

    assert_eq!(engine.snapshot().current_workspace, 2);
    assert_eq!(state_on(&engine, 1, h(1)), Some(MembershipState::Visible));
    assert_eq!(engine.sys().take_calls_for(h(1)), vec![Call::Hide(h(1))]);
}

#[test]
fn unmanaged_windows_never_join_a_workspace() {
    let config = config(3, [Rule::builder().class_name("^Shell_TrayWnd$").unmanaged()]);
    let sys = RecordingWindowSystem::new();
    sys.add(window(1, "Shell_TrayWnd", ""));
    let mut engine = Engine::new(&config, sys).unwrap();
    let t0 = Instant::now();

    engine.handle_event(WindowEvent::Created(h(1)), t0).unwrap();
    engine.handle_event(WindowEvent::Shown(h(1)), t0).unwrap();
    engine.switch_to_workspace(2).unwrap();

    assert!(engine.state().is_ignored(h(1)));
    assert!(!engine.snapshot().contains(h(1)));
    assert!(engine.sys().take_calls_for(h(1)).is_empty());
    assert!(engine.drain_diagnostics().is_empty());
}

#[test]
fn windows_matching_no_rule_are_reported_once() {
    let config = builder(2, 1, [Rule::builder().class_name("^Vim$")])
        .build_permissive()
        .unwrap();
    let sys = RecordingWindowSystem::new();
    sys.add(window(1, "Notepad", "untitled"));
    let mut engine = Engine::new(&config, sys).unwrap();
    let t0 = Instant::now();

    engine.handle_event(WindowEvent::Created(h(1)), t0).unwrap();
    engine.handle_event(WindowEvent::Shown(h(1)), t0).unwrap();

    let diagnostics = engine.drain_diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert!(matches!(diagnostics[0], Error::UnresolvableWindow(handle) if handle == h(1)));
    assert!(!engine.snapshot().contains(h(1)));
}

#[test]
fn failing_predicates_are_reported_and_skipped() {
    let config = config(
        2,
        [Rule::builder()
            .custom(|_| Err(Error::Custom("owner lookup failed".into())))
            .placement(PlacementSpec::on(2))],
    );
    let sys = RecordingWindowSystem::new();
    sys.add(window(1, "Notepad", "untitled"));
    let mut engine = Engine::new(&config, sys).unwrap();

    engine.handle_event(WindowEvent::Created(h(1)), Instant::now()).unwrap();

    let diagnostics = engine.drain_diagnostics();
    assert!(matches!(diagnostics[..], [Error::PredicateEvaluation { rule: 0, .. }]));
    // picked up by the catch-all instead
    assert_eq!(state_on(&engine, 1, h(1)), Some(MembershipState::Visible));
}

#[test]
fn each_placement_creates_an_independent_membership() {
    let config = config(
        3,
        [Rule::builder()
            .class_name("^Chrome")
            .placement(PlacementSpec::on(1))
            .placement(PlacementSpec::on(2).floating())],
    );
    let sys = RecordingWindowSystem::new();
    sys.add(window(1, "Chrome_WidgetWin_1", "Inbox"));
    let mut engine = Engine::new(&config, sys).unwrap();

    engine.handle_event(WindowEvent::Created(h(1)), Instant::now()).unwrap();

    let snap = engine.snapshot();
    let on_1 = snap.workspace(1).and_then(|w| w.members.first().copied()).unwrap();
    let on_2 = snap.workspace(2).and_then(|w| w.members.first().copied()).unwrap();

    assert!(!on_1.is_floating());
    assert!(on_2.is_floating());
    assert_eq!(engine.sys().take_calls_for(h(1)), vec![Call::Activate(h(1))]);
}

#[test_case(OnCreatedOnCurrent::ActivateWindow, Call::Activate(h(1)); "activate")]
#[test_case(OnCreatedOnCurrent::MoveToBottom, Call::MoveToBottom(h(1)); "move to bottom")]
#[test]
fn created_on_current_action(action: OnCreatedOnCurrent, expected: Call) {
    let config = config(2, [Rule::builder().class_name("^Vim$").on_created_on_current(action)]);
    let sys = RecordingWindowSystem::new();
    sys.add(window(1, "Vim", "notes.md"));
    let mut engine = Engine::new(&config, sys).unwrap();

    engine.handle_event(WindowEvent::Created(h(1)), Instant::now()).unwrap();

    assert_eq!(engine.sys().take_calls_for(h(1)), vec![expected]);
}

#[test]
fn switching_workspaces_keeps_memberships() {
    let config = config(3, []);
    let sys = RecordingWindowSystem::new();
    sys.add(window(1, "Vim", "notes.md"));
    let mut engine = Engine::new(&config, sys).unwrap();

    engine.handle_event(WindowEvent::Created(h(1)), Instant::now()).unwrap();
    engine.sys().take_calls();

    assert!(engine.switch_to_workspace(2).unwrap());
    assert_eq!(state_on(&engine, 1, h(1)), Some(MembershipState::Visible));
    assert_eq!(engine.sys().take_calls_for(h(1)), vec![Call::Hide(h(1))]);

    assert!(engine.switch_to_previous_workspace().unwrap());
    assert_eq!(engine.snapshot().current_workspace, 1);
    assert_eq!(engine.sys().take_calls_for(h(1)), vec![Call::Show(h(1))]);
}

#[test]
fn hide_window_suppresses_re_shows() {
    let config = config(
        3,
        [Rule::builder()
            .class_name("^tSkMainForm$")
            .placement(PlacementSpec::on(2))
            .on_created(OnShown::HideWindow)
            .on_hidden_shown(OnShown::HideWindow)],
    );
    let sys = RecordingWindowSystem::new();
    sys.add(window(1, "tSkMainForm", "Skype"));
    let mut engine = Engine::new(&config, sys).unwrap();
    let t0 = Instant::now();

    engine.handle_event(WindowEvent::Created(h(1)), t0).unwrap();
    assert_eq!(state_on(&engine, 2, h(1)), Some(MembershipState::Hidden));
    assert_eq!(engine.sys().take_calls_for(h(1)), vec![Call::Hide(h(1))]);

    engine.handle_event(WindowEvent::Shown(h(1)), t0).unwrap();
    assert_eq!(state_on(&engine, 2, h(1)), Some(MembershipState::Hidden));
    assert_eq!(engine.sys().take_calls_for(h(1)), vec![Call::Hide(h(1))]);

    // hidden windows stay hidden when their workspace is shown
    engine.switch_to_workspace(2).unwrap();
    assert!(engine.sys().take_calls_for(h(1)).is_empty());
}

#[test]
fn re_shown_hidden_window_can_switch_to_its_workspace() {
    let config = config(
        3,
        [Rule::builder()
            .class_name("^tSkMainForm$")
            .placement(PlacementSpec::on(2))
            .on_created(OnShown::HideWindow)
            .on_hidden_shown(OnShown::SwitchToWindowsWorkspace)],
    );
    let sys = RecordingWindowSystem::new();
    sys.add(window(1, "tSkMainForm", "Skype"));
    let mut engine = Engine::new(&config, sys).unwrap();
    let t0 = Instant::now();

    engine.handle_event(WindowEvent::Created(h(1)), t0).unwrap();
    engine.sys().take_calls();
    engine.handle_event(WindowEvent::Shown(h(1)), t0).unwrap();

    assert_eq!(engine.snapshot().current_workspace, 2);
    assert_eq!(state_on(&engine, 2, h(1)), Some(MembershipState::Visible));
    assert_eq!(engine.sys().take_calls_for(h(1)), vec![Call::Activate(h(1))]);
}

#[test]
fn created_on_inactive_workspace_can_be_moved_to_current() {
    let config = config(
        3,
        [Rule::builder()
            .class_name("^#32770$")
            .placement(PlacementSpec::on(3))
            .on_created(OnShown::MoveWindowToCurrentWorkspace)],
    );
    let sys = RecordingWindowSystem::new();
    sys.add(window(1, "#32770", "Options"));
    let mut engine = Engine::new(&config, sys).unwrap();

    engine.handle_event(WindowEvent::Created(h(1)), Instant::now()).unwrap();

    assert_eq!(engine.snapshot().current_workspace, 1);
    assert_eq!(state_on(&engine, 1, h(1)), Some(MembershipState::Visible));
    assert_eq!(state_on(&engine, 3, h(1)), None);
}

#[test]
fn temporarily_shown_windows_are_hidden_on_the_next_switch() {
    let config = config(
        3,
        [Rule::builder()
            .class_name("^BitComet$")
            .placement(PlacementSpec::on(3))
            .on_created(OnShown::TemporarilyShowOnCurrentWorkspace)],
    );
    let sys = RecordingWindowSystem::new();
    sys.add(window(1, "BitComet", "Downloads"));
    let mut engine = Engine::new(&config, sys).unwrap();

    engine.handle_event(WindowEvent::Created(h(1)), Instant::now()).unwrap();
    assert_eq!(engine.snapshot().monitors[0].temporarily_shown, vec![h(1)]);
    assert_eq!(engine.sys().take_calls_for(h(1)), vec![Call::Activate(h(1))]);

    engine.switch_to_workspace(2).unwrap();
    assert!(engine.snapshot().monitors[0].temporarily_shown.is_empty());
    assert_eq!(engine.sys().take_calls_for(h(1)), vec![Call::Hide(h(1))]);
}

#[test]
fn retries_continue_while_the_title_is_empty() {
    let config = config(
        3,
        [Rule::builder()
            .class_name("^BitComet$")
            .placement(PlacementSpec::on(2))
            .retry(Retry {
                after: ms(300),
                max_attempts: 3,
            })],
    );
    let sys = RecordingWindowSystem::new();
    sys.add(window(1, "BitComet", ""));
    let mut engine = Engine::new(&config, sys).unwrap();
    let t0 = Instant::now();

    engine.handle_event(WindowEvent::Created(h(1)), t0).unwrap();
    assert!(engine.state().is_deferred(h(1)));
    assert!(!engine.snapshot().contains(h(1)));

    engine.tick(t0 + ms(300));
    assert!(engine.state().is_deferred(h(1)));
    assert!(!engine.snapshot().contains(h(1)));

    engine.sys().set_title(h(1), "Downloads");
    engine.tick(t0 + ms(600));

    assert!(!engine.state().is_deferred(h(1)));
    assert_eq!(state_on(&engine, 2, h(1)), Some(MembershipState::Visible));
    assert_eq!(
        engine.state().window(h(1)).map(|w| w.descriptor.title.as_str()),
        Some("Downloads")
    );
}

#[test]
fn destroying_a_window_cancels_deferred_work() {
    let config = builder(2, 1, [])
        .rules([Rule::builder().retry_after(ms(300)).build().unwrap()])
        .build()
        .unwrap();
    let sys = RecordingWindowSystem::new();
    sys.add(window(1, "Vim", ""));
    let mut engine = Engine::new(&config, sys).unwrap();
    let t0 = Instant::now();

    engine.handle_event(WindowEvent::Created(h(1)), t0).unwrap();
    assert!(engine.state().is_deferred(h(1)));

    engine.sys().remove(h(1));
    engine.handle_event(WindowEvent::Destroyed(h(1)), t0 + ms(10)).unwrap();
    engine.tick(t0 + ms(1000));

    assert!(!engine.state().is_deferred(h(1)));
    assert!(!engine.snapshot().contains(h(1)));
    assert!(engine.sys().take_calls_for(h(1)).is_empty());
}

#[test]
fn destroying_a_pending_window_cancels_its_created_delay() {
    let config = config(2, [Rule::builder().class_name("^Vim$").created_delay(ms(100))]);
    let sys = RecordingWindowSystem::new();
    sys.add(window(1, "Vim", ""));
    let mut engine = Engine::new(&config, sys).unwrap();
    let t0 = Instant::now();

    engine.handle_event(WindowEvent::Created(h(1)), t0).unwrap();
    engine.sys().remove(h(1));
    engine.handle_event(WindowEvent::Destroyed(h(1)), t0).unwrap();
    engine.tick(t0 + ms(100));

    assert!(engine.state().window(h(1)).is_none());
    assert!(engine.sys().take_calls_for(h(1)).is_empty());
}

#[test]
fn minimized_windows_leave_the_arrangement_until_restored() {
    let config = config(2, []);
    let sys = RecordingWindowSystem::new();
    sys.add(window(1, "Vim", "a"));
    sys.add(window(2, "Vim", "b"));
    let mut engine = Engine::new(&config, sys).unwrap();
    let t0 = Instant::now();

    engine.handle_event(WindowEvent::Created(h(1)), t0).unwrap();
    engine.handle_event(WindowEvent::Created(h(2)), t0).unwrap();
    engine.handle_event(WindowEvent::Minimized(h(1)), t0).unwrap();

    assert_eq!(state_on(&engine, 1, h(1)), Some(MembershipState::Minimized));
    let tiled = engine.state().workspaces().arrangement_for(1).unwrap().tiled;
    assert_eq!(tiled, vec![h(2)]);

    engine.handle_event(WindowEvent::Restored(h(1)), t0).unwrap();
    let tiled = engine.state().workspaces().arrangement_for(1).unwrap().tiled;
    assert_eq!(tiled, vec![h(1), h(2)]);
}

#[test_case(false, vec![Call::SetTopmost(h(1), false), Call::Activate(h(1))]; "cleared")]
#[test_case(true, vec![Call::Activate(h(1))]; "preserved")]
#[test]
fn topmost_flag(preserve: bool, expected: Vec<Call>) {
    let mut rule = Rule::builder().class_name("^Vim$");
    if preserve {
        rule = rule.preserve_topmost();
    }
    let config = config(2, [rule]);
    let sys = RecordingWindowSystem::new();
    sys.add(window(1, "Vim", "a").with_ex_style(0x0000_0008));
    let mut engine = Engine::new(&config, sys).unwrap();

    engine.handle_event(WindowEvent::Created(h(1)), Instant::now()).unwrap();

    assert_eq!(engine.sys().take_calls_for(h(1)), expected);
}

#[test]
fn inactive_windows_can_leave_the_taskbar() {
    let config = config(
        2,
        [Rule::builder()
            .class_name("^Vim$")
            .placement(PlacementSpec::on(1).hide_from_taskbar_when_inactive())],
    );
    let sys = RecordingWindowSystem::new();
    sys.add(window(1, "Vim", "a"));
    let mut engine = Engine::new(&config, sys).unwrap();

    engine.handle_event(WindowEvent::Created(h(1)), Instant::now()).unwrap();
    engine.sys().take_calls();
    engine.switch_to_workspace(2).unwrap();

    let off_taskbar = Decorations {
        in_taskbar: Decoration::Hidden,
        ..Decorations::default()
    };
    assert_eq!(
        engine.sys().take_calls_for(h(1)),
        vec![Call::Hide(h(1)), Call::Decorate(h(1), off_taskbar)]
    );
}

#[test]
fn toggling_decorations_uses_the_current_window_style() {
    let config = config(2, []);
    let sys = RecordingWindowSystem::new();
    // WS_CAPTION | WS_THICKFRAME
    sys.add(window(1, "Vim", "a").with_style(0x00C4_0000));
    let mut engine = Engine::new(&config, sys).unwrap();

    engine.handle_event(WindowEvent::Created(h(1)), Instant::now()).unwrap();
    engine.sys().take_calls();
    engine.toggle_titlebar(h(1)).unwrap();

    let expected = Decorations {
        titlebar: Decoration::Hidden,
        ..Decorations::default()
    };
    assert_eq!(engine.sys().take_calls_for(h(1)), vec![Call::Decorate(h(1), expected)]);
}

#[test]
fn user_operations_on_unknown_windows_are_errors() {
    let config = config(2, []);
    let mut engine = Engine::new(&config, RecordingWindowSystem::new()).unwrap();

    assert!(matches!(engine.toggle_floating(h(9)), Err(Error::UnknownWindow(_))));
    assert!(matches!(engine.move_window_to_workspace(h(9), 2), Err(Error::UnknownWindow(_))));
    assert!(matches!(engine.switch_to_workspace(7), Err(Error::UnknownWorkspace(7))));
}

#[test]
fn existing_windows_are_placed_without_delay_or_actions() {
    let config = config(
        3,
        [Rule::builder()
            .class_name("^Vim$")
            .placement(PlacementSpec::on(2))
            .created_delay(ms(100))
            .retry_after(ms(300))],
    );
    let sys =
        RecordingWindowSystem::with_existing([window(1, "Vim", "a"), window(2, "Notepad", "b")]);
    let mut engine = Engine::new(&config, sys).unwrap();

    engine.scan_existing(Instant::now()).unwrap();

    assert_eq!(state_on(&engine, 2, h(1)), Some(MembershipState::Visible));
    assert_eq!(state_on(&engine, 1, h(2)), Some(MembershipState::Visible));
    assert!(!engine.state().is_deferred(h(1)));
    assert_eq!(engine.snapshot().current_workspace, 1);
    // workspace 2 is not on screen
    assert_eq!(engine.sys().take_calls_for(h(1)), vec![Call::Hide(h(1))]);
}

#[test]
fn run_stops_cleanly_when_the_connection_closes() {
    init_tracing();
    let config = config(2, []);
    let sys = RecordingWindowSystem::with_existing([window(1, "Vim", "a")]);
    sys.add(window(2, "Notepad", "b"));
    sys.push_event(WindowEvent::Created(h(2)));
    sys.push_event(WindowEvent::TitleChanged(h(2)));
    let mut engine = Engine::new(&config, sys).unwrap();

    engine.run().unwrap();

    let snap = engine.snapshot();
    assert!(snap.contains(h(1)));
    assert!(snap.contains(h(2)));
}

#[test]
fn menus_are_removed_unless_the_rule_keeps_them() {
    let cosmetics = Cosmetics {
        show_menu: false,
        ..Cosmetics::default()
    };
    let config = config(2, [Rule::builder().class_name("^Vim$").cosmetics(cosmetics)]);
    let sys = RecordingWindowSystem::new();
    sys.add(window(1, "Vim", "a"));
    sys.add(window(2, "Notepad", "b"));
    let mut engine = Engine::new(&config, sys).unwrap();
    let t0 = Instant::now();

    engine.handle_event(WindowEvent::Created(h(1)), t0).unwrap();
    engine.handle_event(WindowEvent::Created(h(2)), t0).unwrap();

    let calls = engine.sys().take_calls();
    let for_window = |handle: Handle| {
        calls
            .iter()
            .filter(|c| c.handle() == Some(handle))
            .cloned()
            .collect::<Vec<_>>()
    };
    assert_eq!(
        for_window(h(1)),
        vec![Call::RemoveMenu(h(1)), Call::Activate(h(1))]
    );
    assert_eq!(for_window(h(2)), vec![Call::Activate(h(2))]);
}

#[test]
fn style_changes_refresh_known_windows_and_place_new_ones() {
    let config = config(2, []);
    let sys = RecordingWindowSystem::new();
    sys.add(window(1, "Vim", "a"));
    sys.add(window(2, "Notepad", "b"));
    let mut engine = Engine::new(&config, sys).unwrap();
    let t0 = Instant::now();

    engine.handle_event(WindowEvent::Created(h(1)), t0).unwrap();
    engine.sys().take_calls();

    // WS_CAPTION
    engine.sys().add(window(1, "Vim", "a").with_style(0x00C0_0000));
    engine.handle_event(WindowEvent::StyleChanged(h(1)), t0).unwrap();

    let w = engine.state().window(h(1)).unwrap();
    assert!(w.descriptor.has_titlebar());
    assert!(engine.sys().take_calls_for(h(1)).is_empty());

    // never seen a Created for this one
    engine.handle_event(WindowEvent::StyleChanged(h(2)), t0).unwrap();

    assert_eq!(state_on(&engine, 1, h(2)), Some(MembershipState::Visible));
    assert_eq!(engine.sys().take_calls_for(h(2)), vec![Call::Activate(h(2))]);
}

#[test_case(true, vec![Call::Redraw(Some(h(1)))]; "update icon")]
#[test_case(false, vec![]; "keep icon")]
#[test]
fn title_changes(update_icon: bool, expected: Vec<Call>) {
    let cosmetics = Cosmetics {
        update_icon,
        ..Cosmetics::default()
    };
    let config = config(2, [Rule::builder().class_name("^Vim$").cosmetics(cosmetics)]);
    let sys = RecordingWindowSystem::new();
    sys.add(window(1, "Vim", "a"));
    let mut engine = Engine::new(&config, sys).unwrap();
    let t0 = Instant::now();

    engine.handle_event(WindowEvent::Created(h(1)), t0).unwrap();
    engine.sys().take_calls();
    engine.sys().set_title(h(1), "b");
    engine.handle_event(WindowEvent::TitleChanged(h(1)), t0).unwrap();

    assert_eq!(engine.state().window(h(1)).unwrap().descriptor.title, "b");
    assert_eq!(engine.sys().take_calls_for(h(1)), expected);
}

#[test]
fn redraw_on_show_redraws_each_time_the_workspace_returns() {
    let cosmetics = Cosmetics {
        redraw_on_show: true,
        ..Cosmetics::default()
    };
    let config = config(2, [Rule::builder().class_name("^Vim$").cosmetics(cosmetics)]);
    let sys = RecordingWindowSystem::new();
    sys.add(window(1, "Vim", "a"));
    let mut engine = Engine::new(&config, sys).unwrap();

    engine.handle_event(WindowEvent::Created(h(1)), Instant::now()).unwrap();
    engine.sys().take_calls();

    engine.switch_to_workspace(2).unwrap();
    assert_eq!(engine.sys().take_calls_for(h(1)), vec![Call::Hide(h(1))]);

    engine.switch_to_workspace(1).unwrap();
    assert_eq!(
        engine.sys().take_calls_for(h(1)),
        vec![Call::Show(h(1)), Call::Redraw(Some(h(1)))]
    );
}

#[test]
fn desktop_is_redrawn_after_creation_when_requested() {
    let cosmetics = Cosmetics {
        redraw_desktop_on_create: true,
        ..Cosmetics::default()
    };
    let config = config(2, [Rule::builder().class_name("^Vim$").cosmetics(cosmetics)]);
    let sys = RecordingWindowSystem::new();
    sys.add(window(1, "Vim", "a"));
    let mut engine = Engine::new(&config, sys).unwrap();

    engine.handle_event(WindowEvent::Created(h(1)), Instant::now()).unwrap();

    let calls: Vec<Call> = engine
        .sys()
        .take_calls()
        .into_iter()
        .filter(|c| !matches!(c, Call::Arrange(_)))
        .collect();
    assert_eq!(calls, vec![Call::Redraw(None), Call::Activate(h(1))]);
}

#[test]
fn layout_changes_rearrange_without_touching_membership() {
    let config = config(2, []);
    let sys = RecordingWindowSystem::new();
    sys.add(window(1, "Vim", "a"));
    sys.add(window(2, "Notepad", "b"));
    let mut engine = Engine::new(&config, sys).unwrap();
    let t0 = Instant::now();

    engine.handle_event(WindowEvent::Created(h(1)), t0).unwrap();
    engine.handle_event(WindowEvent::Created(h(2)), t0).unwrap();
    engine.sys().take_calls();
    let members = |e: &Engine<'_, RecordingWindowSystem>| {
        e.snapshot().workspace(1).map(|ws| ws.members.clone())
    };
    let before = members(&engine);
    let arrangement = |layout| Arrangement {
        monitor: 0,
        workspace: 1,
        layout,
        tiled: vec![h(1), h(2)],
        floating: vec![],
    };

    assert!(engine.set_layout(1, LayoutKind::FullScreen).unwrap());
    assert_eq!(
        engine.sys().take_calls(),
        vec![Call::Arrange(arrangement(LayoutKind::FullScreen))]
    );

    assert_eq!(engine.cycle_layout(1).unwrap(), LayoutKind::Floating);
    assert_eq!(
        engine.sys().take_calls(),
        vec![Call::Arrange(arrangement(LayoutKind::Floating))]
    );

    assert_eq!(members(&engine), before);
}

#[test]
fn shared_windows_stay_on_screen_across_their_workspaces() {
    let config = config(3, []);
    let sys = RecordingWindowSystem::new();
    sys.add(window(1, "Vim", "a"));
    let mut engine = Engine::new(&config, sys).unwrap();

    engine.handle_event(WindowEvent::Created(h(1)), Instant::now()).unwrap();
    engine.sys().take_calls();

    assert!(engine.add_window_to_workspace(h(1), 2).unwrap());
    assert_eq!(state_on(&engine, 2, h(1)), Some(MembershipState::Visible));
    assert!(engine.sys().take_calls_for(h(1)).is_empty());

    engine.switch_to_workspace(2).unwrap();
    assert!(engine.sys().take_calls_for(h(1)).is_empty());

    assert!(engine.remove_window_from_workspace(h(1), 2).unwrap());
    assert_eq!(state_on(&engine, 2, h(1)), None);
    assert_eq!(state_on(&engine, 1, h(1)), Some(MembershipState::Visible));
    assert_eq!(engine.sys().take_calls_for(h(1)), vec![Call::Hide(h(1))]);
}

#[test]
fn moving_a_workspace_to_another_monitor_shows_its_windows() {
    let config = builder(3, 2, []).rules([Rule::catch_all()]).build().unwrap();
    let sys = RecordingWindowSystem::new();
    sys.add(window(1, "Vim", "a"));
    let mut engine = Engine::new(&config, sys).unwrap();

    engine.handle_event(WindowEvent::Created(h(1)), Instant::now()).unwrap();
    // workspace 3 shares monitor 0 with workspace 1 so is not on screen
    engine.move_window_to_workspace(h(1), 3).unwrap();
    assert_eq!(
        engine.sys().take_calls_for(h(1)),
        vec![Call::Activate(h(1)), Call::Hide(h(1))]
    );

    assert!(engine.move_workspace_to_monitor(3, 1).unwrap());

    let snap = engine.snapshot();
    assert_eq!(snap.current_monitor, 1);
    assert_eq!(snap.current_workspace, 3);
    assert_eq!(snap.monitors[0].workspaces, vec![1]);
    assert_eq!(engine.sys().take_calls_for(h(1)), vec![Call::Show(h(1))]);

    assert!(matches!(
        engine.move_workspace_to_monitor(1, 1),
        Err(Error::LastWorkspaceOnMonitor { monitor: 0 })
    ));
}
