mod common;

use common::{Harness, bindings};
use markmenu_engine::{
    CaptureOwner, ChordPhase, ControllerEvent, MenuId, Point, Rect, Toolkit, WidgetKind,
};
use menu_config::{Config, Timing};
use menu_keys::{Buttons, Key, Modifiers};

const E2E: &[(&str, &str)] = &[("F12", "start"), ("F12+SecondaryButton", "radial_b")];

/// E2E plus an explicit binding for the two-button activation chord.
const CHORDS: &[(&str, &str)] = &[
    ("F12", "start"),
    ("F12+SecondaryButton", "radial_b"),
    ("F12+SecondaryButton+PrimaryButton", "start"),
];

fn press_f12(h: &mut Harness, buttons: Buttons) {
    h.ctl.key_press(Key::F12, Modifiers::empty(), buttons, false);
}

fn shown(name: &str) -> ControllerEvent {
    ControllerEvent::MenuShown(MenuId::from(name))
}

#[test]
fn activation_shows_default_menu_at_cursor() {
    let mut h = Harness::new(E2E);
    press_f12(&mut h, Buttons::empty());

    assert!(h.ctl.is_visible());
    assert_eq!(h.current().as_deref(), Some("start"));
    let start = h.id("start");
    assert_eq!(
        h.scene().widget_rect(start),
        Some(Rect::new(650, 350, 300, 300))
    );
    assert_eq!(
        h.events(),
        vec![ControllerEvent::ActivationPressed, shown("start")]
    );
    // No buttons held: the overlay does not take the mouse.
    assert_eq!(h.ctl.capture_owner(), CaptureOwner::Released);
    let main = h.id("main");
    assert_eq!(h.scene().window_state(main), Some((0.15, true)));
}

#[test]
fn activation_events_fire_once_per_physical_press() {
    let mut h = Harness::new(E2E);
    press_f12(&mut h, Buttons::empty());
    h.ctl
        .key_press(Key::F12, Modifiers::empty(), Buttons::empty(), true);
    press_f12(&mut h, Buttons::empty());
    h.ctl.key_release(Key::F12, true);
    assert!(h.ctl.is_visible());
    h.ctl.key_release(Key::F12, false);
    h.ctl.key_release(Key::F12, false);

    assert_eq!(
        h.events(),
        vec![
            ControllerEvent::ActivationPressed,
            shown("start"),
            ControllerEvent::ActivationReleased,
            ControllerEvent::Hidden,
        ]
    );
    let main = h.id("main");
    assert_eq!(h.scene().window_state(main), Some((1.0, false)));
}

#[test]
fn end_to_end_secondary_chord() {
    let mut h = Harness::new(E2E);
    press_f12(&mut h, Buttons::SECONDARY);
    assert_eq!(h.current().as_deref(), Some("radial_b"));
    assert_eq!(h.ctl.capture_owner(), CaptureOwner::Overlay);
    assert_eq!(h.scene().mouse_grabber(), Some(h.scene().overlay()));
    assert!(
        h.scene()
            .calls_contains("send_mouse:press:secondarybutton:overlay")
    );

    h.scene_mut().advance(common::ms(10));
    h.ctl.mouse_release(Buttons::empty(), Modifiers::empty());
    h.scene_mut().advance(common::ms(10));
    h.ctl.key_release(Key::F12, false);
    h.advance(200);

    assert!(!h.ctl.is_visible());
    assert_eq!(h.scene().count_calls("hide_overlay"), 1);
    assert_eq!(h.scene().mouse_grabber(), None);
    let events = h.events();
    assert_eq!(events[1], shown("radial_b"));
    assert_eq!(
        events
            .iter()
            .filter(|e| **e == ControllerEvent::Hidden)
            .count(),
        1
    );
}

#[test]
fn end_to_end_key_released_first() {
    let mut h = Harness::new(E2E);
    press_f12(&mut h, Buttons::SECONDARY);
    h.ctl.key_release(Key::F12, false);
    h.scene_mut().take_calls();
    h.ctl.mouse_release(Buttons::empty(), Modifiers::empty());
    h.advance(200);

    assert!(h.scene().calls().is_empty());
    let hidden = h
        .events()
        .into_iter()
        .filter(|e| *e == ControllerEvent::Hidden)
        .count();
    assert_eq!(hidden, 1);
}

#[test]
fn near_simultaneous_releases_coalesce() {
    let mut h = Harness::new(CHORDS);
    press_f12(&mut h, Buttons::SECONDARY | Buttons::PRIMARY);
    h.ctl.mouse_release(Buttons::SECONDARY, Modifiers::empty());
    assert_eq!(h.ctl.chord().phase(), ChordPhase::PendingRelease);
    assert!(h.ctl.next_deadline().is_some());

    h.advance(30);
    h.ctl.mouse_release(Buttons::empty(), Modifiers::empty());
    assert_eq!(h.ctl.chord().resolutions(), 1);
    assert_eq!(h.ctl.next_deadline(), None);

    h.advance(100);
    assert_eq!(h.ctl.chord().resolutions(), 1);
    assert_eq!(h.current().as_deref(), Some("start"));
}

#[test]
fn spaced_releases_resolve_twice() {
    let mut h = Harness::new(CHORDS);
    press_f12(&mut h, Buttons::SECONDARY | Buttons::PRIMARY);
    h.ctl.mouse_release(Buttons::SECONDARY, Modifiers::empty());

    // Multi-button tolerance is 75ms; the timer resolves with secondary still held.
    h.advance(74);
    assert_eq!(h.ctl.chord().resolutions(), 0);
    h.advance(26);
    assert_eq!(h.ctl.chord().resolutions(), 1);
    assert_eq!(h.current().as_deref(), Some("radial_b"));

    h.ctl.mouse_release(Buttons::empty(), Modifiers::empty());
    assert_eq!(h.ctl.chord().resolutions(), 2);
    assert_eq!(h.current().as_deref(), Some("start"));
}

#[test]
fn single_button_tolerance_is_shorter() {
    let mut h = Harness::new(E2E);
    press_f12(&mut h, Buttons::SECONDARY);
    h.ctl
        .mouse_press(Buttons::SECONDARY | Buttons::PRIMARY, Modifiers::empty());
    h.ctl.mouse_release(Buttons::SECONDARY, Modifiers::empty());
    h.advance(40);
    assert_eq!(h.ctl.chord().resolutions(), 1);
}

#[test]
fn tuned_tolerance_applies() {
    let mut cfg = Config::from_bindings(bindings(CHORDS));
    cfg.timing = Timing {
        multi_release_ms: 150,
        ..Timing::default()
    };
    let mut h = Harness::with_config(&cfg);
    press_f12(&mut h, Buttons::SECONDARY | Buttons::PRIMARY);
    h.ctl.mouse_release(Buttons::SECONDARY, Modifiers::empty());
    h.advance(100);
    h.ctl.mouse_release(Buttons::empty(), Modifiers::empty());
    assert_eq!(h.ctl.chord().resolutions(), 1);
}

#[test]
fn modifier_fallback_on_activation() {
    let entries = &[("F12", "start"), ("F12+Shift", "shifted")];
    let mut h = Harness::new(entries);
    h.ctl
        .key_press(Key::F12, Modifiers::SHIFT, Buttons::empty(), false);
    assert_eq!(h.current().as_deref(), Some("shifted"));
    h.ctl.key_release(Key::F12, false);

    h.ctl
        .key_press(Key::F12, Modifiers::CONTROL, Buttons::empty(), false);
    assert_eq!(h.current().as_deref(), Some("start"));
}

#[test]
fn unbound_button_combination_is_inert() {
    let mut h = Harness::new(E2E);
    press_f12(&mut h, Buttons::TERTIARY);
    assert!(!h.ctl.is_visible());
    assert_eq!(h.current(), None);
    assert_eq!(h.events(), vec![ControllerEvent::ActivationPressed]);
    assert_eq!(h.scene().count_calls("show_overlay"), 0);
    assert_eq!(h.scene().count_calls("set_window_opacity"), 0);
    assert_eq!(h.ctl.capture_owner(), CaptureOwner::Released);

    // The key is still held; releasing it ends the gesture quietly.
    assert!(h.ctl.is_activation_held());
    h.ctl.key_release(Key::F12, false);
    assert_eq!(h.events(), vec![ControllerEvent::ActivationReleased]);
}

#[test]
fn hover_transition_swaps_and_anchors() {
    let mut h = Harness::new(E2E);
    press_f12(&mut h, Buttons::empty());
    h.events();

    let launcher = h.child("start", "i_edit");
    h.hover(launcher);
    assert!(h.ctl.transitions().pending().is_some());
    h.advance(7);
    assert_eq!(h.current().as_deref(), Some("start"));
    h.advance(1);

    assert_eq!(h.current().as_deref(), Some("edit#submenu"));
    assert_eq!(h.events(), vec![shown("edit#submenu")]);
    let equivalent = h.child("edit#submenu", "i_edit");
    assert_eq!(
        h.scene().widget_rect(equivalent).map(|r| r.center()),
        Some(h.scene().cursor_pos())
    );
    assert!(!h.scene().is_shown(h.id("start")));
    assert!(h.ctl.transitions().in_transition());
    h.advance(16);
    assert!(!h.ctl.transitions().in_transition());

    // Hovering the equivalent launcher inside the submenu it opens is a no-op.
    h.ctl.hover_enter(equivalent);
    assert!(h.ctl.transitions().pending().is_none());
}

#[test]
fn hover_leave_cancels_transition() {
    let mut h = Harness::new(E2E);
    press_f12(&mut h, Buttons::empty());
    let launcher = h.child("start", "i_edit");
    h.hover(launcher);
    h.ctl.hover_leave(launcher);
    h.advance(50);

    assert_eq!(h.ctl.transitions().completed(), 0);
    assert_eq!(h.current().as_deref(), Some("start"));
}

#[test]
fn transition_aborts_when_cursor_moved_away() {
    let mut h = Harness::new(E2E);
    press_f12(&mut h, Buttons::empty());
    let launcher = h.child("start", "i_edit");
    h.hover(launcher);
    h.scene_mut().set_cursor(Point::new(800, 420));
    h.advance(8);

    assert_eq!(h.ctl.transitions().completed(), 0);
    assert_eq!(h.current().as_deref(), Some("start"));
    assert_eq!(h.ctl.next_deadline(), None);
}

#[test]
fn transition_tolerates_hover_margin() {
    let mut h = Harness::new(E2E);
    press_f12(&mut h, Buttons::empty());
    let launcher = h.child("start", "i_edit");
    h.hover(launcher);
    // Launcher spans y 350..400; 403 is within the 5px margin.
    h.scene_mut().set_cursor(Point::new(800, 403));
    h.advance(8);
    assert_eq!(h.ctl.transitions().completed(), 1);
}

#[test]
fn toggles_flip_on_hover_in_submenus_only() {
    let mut h = Harness::new(E2E);
    press_f12(&mut h, Buttons::empty());
    let launcher = h.child("start", "i_edit");
    h.hover(launcher);
    h.advance(8);

    let chk = h.child("edit#submenu", "chk_snap");
    h.hover(chk);
    assert!(h.scene().is_checked(chk));
    h.ctl.hover_enter(chk);
    assert!(!h.scene().is_checked(chk));
}

#[test]
fn release_over_action_clicks_and_hides() {
    let mut h = Harness::new(E2E);
    press_f12(&mut h, Buttons::empty());
    h.ctl.mouse_press(Buttons::PRIMARY, Modifiers::empty());
    let copy = h.child("start", "btn_copy");
    h.scene_mut().hover(copy);
    h.events();
    h.ctl.mouse_release(Buttons::empty(), Modifiers::empty());

    assert!(h.scene().calls_contains("clicked:btn_copy"));
    assert!(!h.ctl.is_visible());
    assert_eq!(
        h.events(),
        vec![ControllerEvent::Hidden, ControllerEvent::ActionFired(copy)]
    );
    assert_eq!(h.ctl.capture_owner(), CaptureOwner::Released);
}

#[test]
fn release_over_launcher_opens_standalone_window() {
    let mut h = Harness::new(E2E);
    press_f12(&mut h, Buttons::SECONDARY);
    let paste = h.child("radial_b", "btn_paste");
    // radial_b has no launcher; switch to start first.
    h.ctl.mouse_release(Buttons::empty(), Modifiers::empty());
    assert_eq!(h.current().as_deref(), Some("start"));
    assert!(h.scene().is_shown(h.id("start")));
    assert!(!h.scene().is_shown(paste));

    h.ctl.mouse_press(Buttons::PRIMARY, Modifiers::empty());
    let launcher = h.child("start", "btn_prefs");
    h.scene_mut().hover(launcher);
    h.events();
    h.ctl.mouse_release(Buttons::empty(), Modifiers::empty());

    assert!(!h.ctl.is_visible());
    assert!(h.scene().calls_contains("show_window:prefs:675,500"));
    assert_eq!(
        h.events(),
        vec![ControllerEvent::Hidden, shown("prefs")]
    );
    h.ctl.key_release(Key::F12, false);
    assert_eq!(h.events(), vec![ControllerEvent::ActivationReleased]);
}

#[test]
fn release_outside_current_menu_is_ignored() {
    let mut h = Harness::new(E2E);
    let overlay = h.scene().overlay();
    h.scene_mut().add_widget(
        Some(overlay),
        "hud",
        Rect::new(0, 0, 100, 100),
        WidgetKind::Action,
    );
    press_f12(&mut h, Buttons::empty());
    h.ctl.mouse_press(Buttons::PRIMARY, Modifiers::empty());
    h.scene_mut().set_cursor(Point::new(50, 50));
    h.ctl.mouse_release(Buttons::empty(), Modifiers::empty());

    assert!(h.ctl.is_visible());
    assert_eq!(h.ctl.chord().resolutions(), 0);
    assert!(!h.scene().calls_contains("clicked:hud"));
}

#[test]
fn hide_is_idempotent() {
    let mut h = Harness::new(E2E);
    press_f12(&mut h, Buttons::SECONDARY);
    h.ctl.hide();
    let calls = h.scene().calls().len();
    h.ctl.hide();
    h.ctl.hide();

    assert_eq!(h.scene().calls().len(), calls);
    assert_eq!(h.scene().count_calls("hide_overlay"), 1);
    let hidden = h
        .events()
        .into_iter()
        .filter(|e| *e == ControllerEvent::Hidden)
        .count();
    assert_eq!(hidden, 1);
    assert_eq!(h.ctl.chord().phase(), ChordPhase::Idle);
    assert_eq!(h.ctl.next_deadline(), None);
}

#[test]
fn hide_cancels_pending_timers() {
    let mut h = Harness::new(CHORDS);
    press_f12(&mut h, Buttons::SECONDARY | Buttons::PRIMARY);
    h.ctl.mouse_release(Buttons::SECONDARY, Modifiers::empty());
    h.ctl.key_release(Key::F12, false);
    h.advance(500);
    assert_eq!(h.ctl.chord().resolutions(), 0);
    assert_eq!(h.scene().count_calls("show_overlay"), 1);
}

#[test]
fn explicit_show_uses_default_menu_and_hint() {
    let mut h = Harness::new(E2E);
    let node = h.ctl.show(None, Some(Point::new(400, 400))).expect("shown");
    assert_eq!(node.name.as_str(), "start");
    assert_eq!(
        h.scene().widget_rect(node.id),
        Some(Rect::new(250, 250, 300, 300))
    );
    assert!(h.ctl.show(Some(&MenuId::from("ghost")), None).is_none());
    assert_eq!(h.current().as_deref(), Some("start"));
}

#[test]
fn explicit_show_dims_other_windows() {
    let mut h = Harness::new(&[("F12", "start")]);
    let main = h.id("main");
    let tools = h.id("tools");
    h.ctl.show(None, None).expect("shown");
    assert_eq!(h.scene().window_state(main), Some((0.15, true)));
    assert_eq!(h.scene().window_state(tools), Some((0.15, true)));

    // A second show leaves the recorded windows alone.
    let before = h.scene().count_calls("set_window_opacity");
    h.ctl.show(Some(&MenuId::from("radial_b")), None).expect("shown");
    assert_eq!(h.scene().count_calls("set_window_opacity"), before);

    h.ctl.hide();
    assert_eq!(h.scene().window_state(main), Some((1.0, false)));
}

#[test]
fn no_activation_key_makes_show_inert() {
    let mut h = Harness::new(&[("SecondaryButton", "radial_b")]);
    assert_eq!(h.ctl.bindings().activation_key(), None);
    assert!(h.ctl.show(None, None).is_none());
    press_f12(&mut h, Buttons::SECONDARY);
    assert!(h.scene().calls().is_empty());
    assert!(h.events().is_empty());
}

#[test]
fn extra_keys_switch_menus_while_visible() {
    let mut h = Harness::new(&[("F12", "start"), ("F12+Tab", "radial_b")]);
    h.ctl
        .key_press(Key::Tab, Modifiers::empty(), Buttons::empty(), false);
    assert!(!h.ctl.is_visible());

    press_f12(&mut h, Buttons::empty());
    h.ctl
        .key_press(Key::Tab, Modifiers::empty(), Buttons::empty(), false);
    assert_eq!(h.current().as_deref(), Some("radial_b"));
}

#[test]
fn mouse_presses_switch_menus_while_visible() {
    let mut h = Harness::new(E2E);
    press_f12(&mut h, Buttons::empty());
    h.ctl
        .mouse_press(Buttons::SECONDARY, Modifiers::empty());
    assert_eq!(h.current().as_deref(), Some("radial_b"));
}

#[test]
fn rebinding_takes_effect_immediately() {
    let mut h = Harness::new(E2E);
    h.ctl.set_bindings(&bindings(&[("F11", "radial_b")]));
    press_f12(&mut h, Buttons::empty());
    assert!(!h.ctl.is_visible());
    h.ctl
        .key_press(Key::F11, Modifiers::empty(), Buttons::empty(), false);
    assert_eq!(h.current().as_deref(), Some("radial_b"));
}

#[test]
fn external_popups_are_dismissed_on_activation() {
    let mut h = Harness::new(E2E);
    h.scene_mut().add_popup("ctx", Rect::new(780, 480, 100, 100));
    let canvas = h.id("canvas");
    h.scene_mut().grab_mouse(canvas).expect("grab");
    press_f12(&mut h, Buttons::SECONDARY);

    assert!(
        h.scene()
            .calls_contains("send_mouse:release:secondarybutton:canvas")
    );
    assert!(h.scene().calls_contains("close_popup:ctx"));
    assert_eq!(h.scene().mouse_grabber(), Some(h.scene().overlay()));
}

#[test]
fn host_failures_are_swallowed() {
    let mut h = Harness::new(E2E);
    h.scene_mut().fail("grab_mouse");
    h.scene_mut().fail("set_window_opacity");
    press_f12(&mut h, Buttons::SECONDARY);
    assert!(h.ctl.is_visible());
    assert_eq!(h.ctl.capture_owner(), CaptureOwner::Released);
    assert!(!h.ctl.presenter().is_dimmed(h.id("main")));

    h.ctl.mouse_release(Buttons::empty(), Modifiers::empty());
    let copy = h.child("start", "btn_copy");
    h.scene_mut().fail("send_mouse");
    h.ctl.mouse_press(Buttons::PRIMARY, Modifiers::empty());
    h.scene_mut().hover(copy);
    h.events();
    h.ctl.mouse_release(Buttons::empty(), Modifiers::empty());
    assert!(!h.ctl.is_visible());
    assert_eq!(h.events(), vec![ControllerEvent::Hidden]);
}

#[test]
fn widget_destroyed_mid_gesture() {
    let mut h = Harness::new(E2E);
    press_f12(&mut h, Buttons::empty());
    let launcher = h.child("start", "i_edit");
    h.hover(launcher);
    h.scene_mut().remove_widget(launcher);
    h.advance(8);
    assert_eq!(h.ctl.transitions().completed(), 0);

    let start = h.id("start");
    h.scene_mut().remove_widget(start);
    h.ctl.hide();
    assert!(!h.ctl.is_visible());
}

#[test]
fn apply_config_retunes_and_rebinds() {
    let mut h = Harness::new(&[("F12", "start")]);
    let mut cfg = Config::from_bindings(bindings(&[
        ("F11", "start"),
        ("F11+SecondaryButton", "shifted"),
        ("F11+SecondaryButton+PrimaryButton", "radial_b"),
    ]));
    cfg.timing.multi_release_ms = 200;
    h.ctl.apply_config(&cfg);
    assert_eq!(h.ctl.bindings().activation_key(), Some(Key::F11));

    h.ctl.key_press(
        Key::F11,
        Modifiers::empty(),
        Buttons::SECONDARY | Buttons::PRIMARY,
        false,
    );
    assert!(h.ctl.is_activation_held());
    assert_eq!(h.current().as_deref(), Some("radial_b"));

    h.ctl.mouse_release(Buttons::SECONDARY, Modifiers::empty());
    h.advance(100);
    assert_eq!(h.ctl.chord().resolutions(), 0);
    h.advance(150);
    assert_eq!(h.current().as_deref(), Some("shifted"));

    h.ctl.key_release(Key::F11, false);
    assert!(!h.ctl.is_activation_held());
    let scene = h.ctl.into_host();
    assert!(!scene.overlay_visible());
}
