//! # Roll Feedback Textbox
//!
//! A retro-styled modal textbox that shows the breakdown line of the latest
//! roll and gates all input until dismissed.
//!
//! The state machine is deliberately simple: `Idle` (input passes through)
//! and `Showing` (every input event is consumed; Enter, Space, or a primary
//! click dismisses). While the box is up the combat resolver must not apply
//! further effects — this is the blocking-modal contract the resolver polls
//! via [`RollTextbox::is_showing`].

use crate::input::InputEvent;
use crate::rolling::RollResult;
use macroquad::prelude::*;

/// Prompt blink rate in toggles per second (0.5s on / 0.5s off).
const BLINK_HZ: f32 = 2.0;

/// Labels stripped from the front of roll text, case-insensitively.
const ROLL_LABELS: [&str; 4] = ["check:", "save:", "attack:", "damage:"];

/// The roll feedback textbox state machine.
enum TextboxState {
    Idle,
    Showing { text: String, blink_t: f32 },
}

/// Blocking modal textbox for roll results.
///
/// # Examples
///
/// ```
/// use vessels::{InputEvent, RollTextbox};
///
/// let mut textbox = RollTextbox::new();
/// textbox.show("Attack: 5 -> hit");
/// assert!(textbox.is_showing());
/// assert!(textbox.handle_event(&InputEvent::Confirm));
/// assert!(!textbox.is_showing());
/// ```
pub struct RollTextbox {
    state: TextboxState,
}

impl RollTextbox {
    pub fn new() -> Self {
        Self {
            state: TextboxState::Idle,
        }
    }

    /// Shows a roll result, normalizing its text first.
    pub fn show(&mut self, raw: &str) {
        self.state = TextboxState::Showing {
            text: clean_roll_text(raw),
            blink_t: 0.0,
        };
    }

    /// Shows a published [`RollResult`]. The kind label is redundant on
    /// screen, so normalization strips it from the breakdown line.
    pub fn show_roll(&mut self, result: &RollResult) {
        log::debug!("{:?} roll: {} -> {}", result.kind(), result.text(), result.total());
        self.show(result.text());
    }

    /// True while the box is on screen and gating input.
    pub fn is_showing(&self) -> bool {
        matches!(self.state, TextboxState::Showing { .. })
    }

    /// The normalized text currently shown, if any.
    pub fn current_text(&self) -> Option<&str> {
        match &self.state {
            TextboxState::Showing { text, .. } => Some(text),
            TextboxState::Idle => None,
        }
    }

    /// Force-dismisses the box. Safe to call when already idle.
    pub fn dismiss(&mut self) {
        self.state = TextboxState::Idle;
    }

    /// Feeds one input event to the textbox.
    ///
    /// Returns true if the event was consumed. While showing, every event is
    /// consumed; Enter, Space, or a primary click also dismisses the box.
    pub fn handle_event(&mut self, event: &InputEvent) -> bool {
        if !self.is_showing() {
            return false;
        }
        match event {
            InputEvent::Confirm | InputEvent::Space | InputEvent::PrimaryClick(_) => {
                self.dismiss();
            }
            // Everything else is swallowed so e.g. Run can't trigger mid-popup
            _ => {}
        }
        true
    }

    /// Advances the blink timer. Cosmetic only; never affects dismissal.
    pub fn advance(&mut self, dt: f32) {
        if let TextboxState::Showing { blink_t, .. } = &mut self.state {
            *blink_t += dt;
        }
    }

    /// Draws the box along the bottom of the screen.
    pub fn draw(&self) {
        let TextboxState::Showing { text, blink_t } = &self.state else {
            return;
        };

        let sw = screen_width();
        let sh = screen_height();
        let margin_x = 36.0;
        let margin_bottom = 28.0;
        let box_h = 120.0;
        let rect = Rect::new(margin_x, sh - box_h - margin_bottom, sw - margin_x * 2.0, box_h);

        draw_textbox_frame(rect);

        let inner_pad = 20.0;
        let text_x = rect.x + inner_pad;
        let font_size = 28.0;
        let lines = wrap_text(text, rect.w - inner_pad * 2.0, |s| {
            measure_text(s, None, font_size as u16, 1.0).width
        });

        let mut y = rect.y + inner_pad + font_size * 0.75;
        for line in &lines {
            draw_text(line, text_x, y, font_size, Color::new(0.06, 0.06, 0.06, 1.0));
            y += font_size + 6.0;
        }

        let blink_on = (blink_t * BLINK_HZ) as i32 % 2 == 0;
        if blink_on {
            let prompt = "Press Enter to continue";
            let psize = 20.0;
            let dims = measure_text(prompt, None, psize as u16, 1.0);
            let px = rect.x + rect.w - 14.0 - dims.width;
            let py = rect.y + rect.h - 12.0;
            draw_text(prompt, px - 1.0, py - 1.0, psize, Color::new(0.92, 0.92, 0.92, 1.0));
            draw_text(prompt, px, py, psize, Color::new(0.16, 0.16, 0.16, 1.0));
        }
    }
}

impl Default for RollTextbox {
    fn default() -> Self {
        Self::new()
    }
}

/// Gen-1 style box: light fill, double border, corner diamonds.
fn draw_textbox_frame(rect: Rect) {
    draw_rectangle(rect.x, rect.y, rect.w, rect.h, Color::new(0.96, 0.96, 0.96, 1.0));
    draw_rectangle_lines(rect.x, rect.y, rect.w, rect.h, 4.0, BLACK);
    draw_rectangle_lines(
        rect.x + 4.0,
        rect.y + 4.0,
        rect.w - 8.0,
        rect.h - 8.0,
        2.0,
        Color::new(0.24, 0.24, 0.24, 1.0),
    );

    let d = 5.0;
    let corners = [
        (rect.x + 8.0, rect.y + 8.0),
        (rect.x + rect.w - 8.0, rect.y + 8.0),
        (rect.x + 8.0, rect.y + rect.h - 8.0),
        (rect.x + rect.w - 8.0, rect.y + rect.h - 8.0),
    ];
    for (cx, cy) in corners {
        draw_poly(cx, cy, 4, d, 45.0, Color::new(0.24, 0.24, 0.24, 1.0));
    }
}

/// Strips a leading `Check:`/`Save:`/`Attack:`/`Damage:` label
/// (case-insensitive) and rewrites `->` to `=`.
pub fn clean_roll_text(s: &str) -> String {
    let trimmed = s.trim_start();
    let lower = trimmed.to_lowercase();
    let body = ROLL_LABELS
        .iter()
        .find(|label| lower.starts_with(**label))
        .map(|label| &trimmed[label.len()..])
        .unwrap_or(trimmed);
    body.replace("->", "=").trim().to_string()
}

/// Greedy word wrap: accumulate words while the line still fits `max_w`
/// under the supplied measure function, otherwise start a new line.
pub fn wrap_text(text: &str, max_w: f32, measure: impl Fn(&str) -> f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if current.is_empty() || measure(&candidate) <= max_w {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputEvent;
    use macroquad::math::vec2;

    #[test]
    fn test_clean_strips_labels_case_insensitively() {
        assert_eq!(clean_roll_text("Attack: 5 -> hit"), "5 = hit");
        assert_eq!(clean_roll_text("DAMAGE: 2d6 = 7"), "2d6 = 7");
        assert_eq!(clean_roll_text("check: d20(3) = 3"), "d20(3) = 3");
        assert_eq!(clean_roll_text("sAvE: d20(9) vs DC 13"), "d20(9) vs DC 13");
    }

    #[test]
    fn test_clean_leaves_unlabeled_text_alone() {
        assert_eq!(clean_roll_text("Capture: d20(12) = 12"), "Capture: d20(12) = 12");
        assert_eq!(clean_roll_text("plain text"), "plain text");
    }

    #[test]
    fn test_clean_rewrites_every_arrow() {
        assert_eq!(clean_roll_text("a -> b -> c"), "a = b = c");
    }

    #[test]
    fn test_idle_consumes_nothing() {
        let mut textbox = RollTextbox::new();
        assert!(!textbox.handle_event(&InputEvent::Confirm));
        assert!(!textbox.handle_event(&InputEvent::MoveSlot(0)));
        assert!(!textbox.handle_event(&InputEvent::Run));
    }

    #[test]
    fn test_showing_consumes_everything() {
        let mut textbox = RollTextbox::new();
        textbox.show("Attack: 17 -> HIT");
        // Non-dismissing events are swallowed without leaving Showing
        assert!(textbox.handle_event(&InputEvent::Run));
        assert!(textbox.is_showing());
        assert!(textbox.handle_event(&InputEvent::MoveSlot(2)));
        assert!(textbox.is_showing());
    }

    #[test]
    fn test_dismiss_triggers() {
        for trigger in [
            InputEvent::Confirm,
            InputEvent::Space,
            InputEvent::PrimaryClick(vec2(10.0, 10.0)),
        ] {
            let mut textbox = RollTextbox::new();
            textbox.show("Save: 9 vs DC 13");
            assert!(textbox.handle_event(&trigger));
            assert!(!textbox.is_showing());
        }
    }

    #[test]
    fn test_dismiss_is_idempotent() {
        let mut textbox = RollTextbox::new();
        textbox.dismiss();
        textbox.show("Damage: 4");
        textbox.dismiss();
        textbox.dismiss();
        assert!(!textbox.is_showing());
    }

    #[test]
    fn test_shown_text_is_normalized() {
        let mut textbox = RollTextbox::new();
        textbox.show("Attack: 5 -> hit");
        assert_eq!(textbox.current_text(), Some("5 = hit"));
    }

    #[test]
    fn test_show_roll_displays_the_result_text() {
        use crate::rolling::Roller;

        let mut roller = Roller::seeded(3);
        let attack = roller.roll_attack(2, 11, 0, 20);
        let expected = clean_roll_text(&attack.text);

        let mut textbox = RollTextbox::new();
        textbox.show_roll(&RollResult::Attack(attack));
        assert!(textbox.is_showing());
        assert_eq!(textbox.current_text(), Some(expected.as_str()));
        assert!(!textbox.current_text().unwrap().starts_with("Attack:"));
    }

    #[test]
    fn test_wrap_greedy_fill() {
        // Measure by character count: max 10 "pixels", 1 per char
        let lines = wrap_text("the quick brown fox", 10.0, |s| s.len() as f32);
        assert_eq!(lines, vec!["the quick", "brown fox"]);
    }

    #[test]
    fn test_wrap_overlong_word_gets_own_line() {
        let lines = wrap_text("a extraordinarily b", 6.0, |s| s.len() as f32);
        assert_eq!(lines, vec!["a", "extraordinarily", "b"]);
    }

    #[test]
    fn test_wrap_empty() {
        let lines = wrap_text("", 20.0, |s| s.len() as f32);
        assert!(lines.is_empty());
    }
}
