//! # Input Module
//!
//! Discrete input events for the game.
//!
//! Macroquad key/mouse state is polled once per frame and flattened into
//! [`InputEvent`] values. Downstream consumers (the roll textbox, the battle
//! scene, the overworld) only ever see this enum, which keeps the
//! input-gating contract of the textbox unit-testable without a window.

use macroquad::prelude::*;

/// A discrete input event delivered once on the frame it happened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Enter key
    Confirm,
    /// Space bar
    Space,
    /// Escape key
    Cancel,
    /// Primary (left) mouse click at screen position
    PrimaryClick(Vec2),
    /// Move in a direction on the overworld (dx, dy)
    Step(i32, i32),
    /// Select battle move slot 0-3 (keys 1-4)
    MoveSlot(usize),
    /// Attempt a capture with the best available scroll (key C)
    Capture,
    /// Flee the battle (key R)
    Run,
}

/// Polls macroquad for this frame's input events.
///
/// Order matters downstream: the battle scene feeds these to the roll
/// textbox first, which consumes all of them while it is showing.
pub fn poll_events() -> Vec<InputEvent> {
    let mut events = Vec::new();

    if is_key_pressed(KeyCode::Enter) {
        events.push(InputEvent::Confirm);
    }
    if is_key_pressed(KeyCode::Space) {
        events.push(InputEvent::Space);
    }
    if is_key_pressed(KeyCode::Escape) {
        events.push(InputEvent::Cancel);
    }
    if is_mouse_button_pressed(MouseButton::Left) {
        let (x, y) = mouse_position();
        events.push(InputEvent::PrimaryClick(vec2(x, y)));
    }

    // Movement - arrows and WASD
    if is_key_pressed(KeyCode::Up) || is_key_pressed(KeyCode::W) {
        events.push(InputEvent::Step(0, -1));
    }
    if is_key_pressed(KeyCode::Down) || is_key_pressed(KeyCode::S) {
        events.push(InputEvent::Step(0, 1));
    }
    if is_key_pressed(KeyCode::Left) || is_key_pressed(KeyCode::A) {
        events.push(InputEvent::Step(-1, 0));
    }
    if is_key_pressed(KeyCode::Right) || is_key_pressed(KeyCode::D) {
        events.push(InputEvent::Step(1, 0));
    }

    // Battle commands
    let slot_keys = [KeyCode::Key1, KeyCode::Key2, KeyCode::Key3, KeyCode::Key4];
    for (slot, key) in slot_keys.iter().enumerate() {
        if is_key_pressed(*key) {
            events.push(InputEvent::MoveSlot(slot));
        }
    }
    if is_key_pressed(KeyCode::C) {
        events.push(InputEvent::Capture);
    }
    if is_key_pressed(KeyCode::R) {
        events.push(InputEvent::Run);
    }

    events
}
