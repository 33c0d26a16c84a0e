use egui::{Context, Event, Key, Modifiers, PointerButton, Pos2, TouchDeviceId, TouchId, TouchPhase};

use super::test_popup::{new_manager, register};
use super::{BackdropEvent, DismissRoute, EventDisposition};

fn key(key: Key, pressed: bool) -> Event {
    Event::Key {
        key,
        physical_key: None,
        pressed,
        repeat: false,
        modifiers: Modifiers::NONE,
    }
}

fn touch(phase: TouchPhase) -> Event {
    Event::Touch {
        device_id: TouchDeviceId(0),
        id: TouchId(0),
        phase,
        pos: Pos2::ZERO,
        force: None,
    }
}

fn pointer(button: PointerButton, pressed: bool) -> Event {
    Event::PointerButton {
        pos: Pos2::new(10.0, 10.0),
        button,
        pressed,
        modifiers: Modifiers::NONE,
    }
}

fn begin_pass_at(ctx: &Context, time: f64, events: Vec<Event>) {
    let raw = egui::RawInput {
        time: Some(time),
        events,
        ..Default::default()
    };
    ctx.begin_pass(raw);
}

#[test]
fn escape_press_closes_the_topmost_popup_only() {
    let mut manager = new_manager();
    let a = register(&mut manager, "a");
    let b = register(&mut manager, "b");
    manager.open_modal("a", Some(2001), None, "", true);
    manager.open_modal("b", Some(2002), None, "", true);

    let ctx = Context::default();
    begin_pass_at(&ctx, 0.0, vec![key(Key::Escape, true)]);
    manager.ui_frame(&ctx);
    let _ = ctx.end_pass();

    assert_eq!(b.calls(), ["close"]);
    assert!(a.calls().is_empty());
    assert_eq!(manager.stack().len(), 1);
    assert_eq!(manager.backdrop_z_index(), Some(2001));
}

#[test]
fn escape_release_and_other_keys_are_ignored() {
    let mut manager = new_manager();
    let a = register(&mut manager, "a");
    manager.open_modal("a", Some(2001), None, "", true);

    assert_eq!(manager.handle_event(&key(Key::Escape, false)), None);
    assert_eq!(manager.handle_event(&key(Key::Enter, true)), None);
    assert!(a.calls().is_empty());

    assert_eq!(
        manager.handle_event(&key(Key::Escape, true)),
        Some(DismissRoute::Close)
    );
    assert_eq!(a.calls(), ["close"]);
}

#[test]
fn frame_time_drives_the_backdrop_teardown() {
    let mut manager = new_manager();
    let _a = register(&mut manager, "a");
    let ctx = Context::default();

    begin_pass_at(&ctx, 0.0, Vec::new());
    manager.ui_frame(&ctx);
    let _ = ctx.end_pass();

    manager.open_modal("a", Some(2001), None, "", true);
    manager.close_modal("a");
    let backdrop = *manager.backdrop().expect("backdrop after open");

    begin_pass_at(&ctx, 0.1, Vec::new());
    manager.ui_frame(&ctx);
    let _ = ctx.end_pass();
    assert_eq!(manager.now().as_millis(), 100);
    assert_eq!(manager.backdrop(), Some(&backdrop));
    assert!(manager.host().is_attached(&backdrop));

    begin_pass_at(&ctx, 0.25, Vec::new());
    manager.ui_frame(&ctx);
    let _ = ctx.end_pass();
    assert_eq!(manager.backdrop(), None);
    assert!(!manager.host().is_attached(&backdrop));
    assert_eq!(manager.pending_tasks(), 0);
}

#[test]
fn egui_events_map_to_backdrop_events() {
    assert_eq!(
        BackdropEvent::from_egui(&touch(TouchPhase::Move)),
        Some(BackdropEvent::TouchMove)
    );
    assert_eq!(BackdropEvent::from_egui(&touch(TouchPhase::Start)), None);
    assert_eq!(
        BackdropEvent::from_egui(&pointer(PointerButton::Primary, false)),
        Some(BackdropEvent::Click(PointerButton::Primary))
    );
    assert_eq!(
        BackdropEvent::from_egui(&pointer(PointerButton::Primary, true)),
        None
    );
    assert_eq!(BackdropEvent::from_egui(&key(Key::Escape, true)), None);
}

#[test]
fn backdrop_events_without_a_backdrop_are_ignored() {
    let mut manager = new_manager();
    let a = register(&mut manager, "a");

    let click = BackdropEvent::Click(PointerButton::Primary);
    assert_eq!(manager.handle_backdrop_event(click), EventDisposition::Ignored);

    manager.open_modal("a", Some(2001), None, "", true);
    let released = BackdropEvent::from_egui(&pointer(PointerButton::Primary, false))
        .expect("release maps to a click");
    assert_eq!(manager.handle_backdrop_event(released), EventDisposition::Consumed);
    assert_eq!(a.calls(), ["close"]);
}
