//! # Rendering Module
//!
//! Immediate-mode drawing for the overworld and the battle scene. Layout
//! math is split from drawing so tests can check geometry without a window:
//! [`battle_layout`] computes the two side rectangles the animation engine
//! needs, and the draw functions consume what the state modules expose.

use crate::combat::moves::Move;
use crate::combat::party::Combatant;
use crate::world::{Overworld, Tile};
use macroquad::prelude::*;

/// Where the two battling sides sit on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BattleLayout {
    /// Player's creature, lower left
    pub ally_rect: Rect,
    /// Wild creature, upper right
    pub enemy_rect: Rect,
}

/// Computes the side rectangles for a given screen size. The ally sits in
/// the lower left, the enemy in the upper right, both sized against the
/// smaller screen dimension so the layout survives resizing.
pub fn battle_layout(screen_w: f32, screen_h: f32) -> BattleLayout {
    let side = (screen_w.min(screen_h) * 0.28).max(32.0);
    BattleLayout {
        ally_rect: Rect::new(screen_w * 0.12, screen_h * 0.62 - side / 2.0, side, side),
        enemy_rect: Rect::new(screen_w * 0.88 - side, screen_h * 0.28 - side / 2.0, side, side),
    }
}

fn tile_color(tile: Tile) -> Color {
    match tile {
        Tile::Grass => Color::new(0.35, 0.55, 0.30, 1.0),
        Tile::TallGrass => Color::new(0.20, 0.42, 0.22, 1.0),
        Tile::Rock => Color::new(0.45, 0.42, 0.40, 1.0),
        Tile::Water => Color::new(0.22, 0.35, 0.60, 1.0),
    }
}

/// Draws the overworld grid and the player marker, scaled to fit the screen.
pub fn draw_overworld(world: &Overworld) {
    let tile_w = screen_width() / world.width() as f32;
    let tile_h = screen_height() / world.height() as f32;

    for y in 0..world.height() {
        for x in 0..world.width() {
            draw_rectangle(
                x as f32 * tile_w,
                y as f32 * tile_h,
                tile_w + 1.0,
                tile_h + 1.0,
                tile_color(world.tile(x, y)),
            );
        }
    }

    let (px, py) = world.player();
    draw_circle(
        (px as f32 + 0.5) * tile_w,
        (py as f32 + 0.5) * tile_h,
        tile_w.min(tile_h) * 0.35,
        GOLD,
    );
}

/// Draws one side's creature panel: a placeholder body, name, level, and
/// HP bar.
pub fn draw_combatant_panel(rect: Rect, combatant: &Combatant, facing_right: bool) {
    let body = if facing_right { SKYBLUE } else { BEIGE };
    draw_rectangle(rect.x, rect.y, rect.w, rect.h, body);
    draw_rectangle_lines(rect.x, rect.y, rect.w, rect.h, 2.0, DARKGRAY);

    let label = format!("{} Lv{}", combatant.name, combatant.level);
    draw_text(&label, rect.x, rect.y - 26.0, 20.0, WHITE);
    draw_hp_bar(rect.x, rect.y - 18.0, rect.w, combatant.hp, combatant.max_hp);
}

fn draw_hp_bar(x: f32, y: f32, w: f32, hp: i32, max_hp: i32) {
    let frac = (hp.max(0) as f32 / max_hp.max(1) as f32).clamp(0.0, 1.0);
    let color = if frac > 0.5 {
        GREEN
    } else if frac > 0.25 {
        YELLOW
    } else {
        RED
    };
    draw_rectangle(x, y, w, 8.0, DARKGRAY);
    draw_rectangle(x, y, w * frac, 8.0, color);
    draw_rectangle_lines(x, y, w, 8.0, 1.0, BLACK);
}

/// Draws the move menu along the bottom: one numbered entry per slot with
/// remaining PP, plus the capture/run hints.
pub fn draw_move_menu(slots: &[(&'static Move, u32)]) {
    let base_y = screen_height() - 70.0;
    for (i, (mv, pp)) in slots.iter().enumerate().take(4) {
        let line = format!("[{}] {} (PP {})", i + 1, mv.label, pp);
        draw_text(&line, 16.0, base_y + i as f32 * 16.0, 18.0, WHITE);
    }
    draw_text(
        "[C] Capture   [R] Run",
        screen_width() - 240.0,
        base_y,
        18.0,
        LIGHTGRAY,
    );
}

/// Draws the rolling battle log, newest line at the bottom.
pub fn draw_message_log(messages: &[String]) {
    let visible = 4usize;
    let start = messages.len().saturating_sub(visible);
    for (i, line) in messages[start..].iter().enumerate() {
        draw_text(line, 16.0, 24.0 + i as f32 * 18.0, 18.0, WHITE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_rects_are_on_screen() {
        let layout = battle_layout(800.0, 600.0);
        for rect in [layout.ally_rect, layout.enemy_rect] {
            assert!(rect.x >= 0.0 && rect.y >= 0.0);
            assert!(rect.x + rect.w <= 800.0);
            assert!(rect.y + rect.h <= 600.0);
        }
    }

    #[test]
    fn test_ally_lower_left_enemy_upper_right() {
        let layout = battle_layout(800.0, 600.0);
        assert!(layout.ally_rect.x < layout.enemy_rect.x);
        assert!(layout.ally_rect.y > layout.enemy_rect.y);
    }

    #[test]
    fn test_rects_never_overlap() {
        for (w, h) in [(640.0, 480.0), (800.0, 600.0), (1920.0, 1080.0), (300.0, 200.0)] {
            let layout = battle_layout(w, h);
            let a = layout.ally_rect;
            let e = layout.enemy_rect;
            let overlap = a.x < e.x + e.w && e.x < a.x + a.w && a.y < e.y + e.h && e.y < a.y + a.h;
            assert!(!overlap, "sides overlap at {}x{}", w, h);
        }
    }

    #[test]
    fn test_layout_scales_with_screen() {
        let small = battle_layout(400.0, 300.0);
        let large = battle_layout(1600.0, 1200.0);
        assert!(large.ally_rect.w > small.ally_rect.w);
    }
}
