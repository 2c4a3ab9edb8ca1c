//! # Move Animation Engine
//!
//! Maps a move identifier to a class sprite and drives a timed visual effect
//! over the battle scene: melee moves drop onto the target from above,
//! projectiles travel from the attacker to the target while rotating to face
//! their direction of travel.
//!
//! All pose math is pure and clocked by a caller-supplied `now` in seconds,
//! so the state machine can be driven by synthetic clocks in tests. Drawing
//! happens separately from the last computed pose.
//!
//! Missing sprites are never errors: an unresolvable identifier or an absent
//! asset simply leaves the animation inactive and combat resolution proceeds
//! without a visual.

use crate::assets::{MoveSprite, SpriteSource};
use crate::combat::Side;
use macroquad::prelude::*;

/// Default animation length in seconds.
pub const DEFAULT_DURATION: f64 = 0.5;

/// Default melee sprite rotation so the blade points downward.
pub const DEFAULT_ANGLE_DEG: f32 = -90.0;

/// Ordered prefix table mapping move-identifier prefixes to display classes.
///
/// Checked top to bottom, first match wins. The order is load-bearing: some
/// identifiers could match more than one prefix, and precedence here decides.
const CLASS_PREFIXES: &[(&str, &str)] = &[
    ("barb", "Barbarian"),
    ("druid", "Druid"),
    ("rogue", "Rogue"),
    ("wizard", "Wizard"),
    ("cleric", "Cleric"),
    ("paladin", "Paladin"),
    ("ranger", "Ranger"),
    ("warlock", "Warlock"),
    ("monk", "Monk"),
    ("sorc", "Sorcerer"),
    ("arti", "Artificer"),
    ("bh", "Bloodhunter"),
    ("fighter", "Fighter"),
    ("bard", "Bard"),
    ("dragon", "Dragon"),
    ("owlbear", "Owlbear"),
    ("beholder", "Beholder"),
    ("golem", "Golem"),
    ("ogre", "Ogre"),
    ("nothic", "Nothic"),
    ("myconid", "Myconid"),
];

/// Classes whose moves use the melee drop animation; everything else is a
/// projectile.
const MELEE_CLASSES: &[&str] = &[
    "Paladin",
    "Fighter",
    "Barbarian",
    "Monk",
    "Rogue",
    "Bloodhunter",
];

/// Resolves the display class and level encoded in a move identifier.
///
/// The class is the first matching prefix from the ordered table; the level
/// is the digits of a `_l<N>_` segment. Either may be absent.
///
/// # Examples
///
/// ```
/// use vessels::resolve_class_and_level;
///
/// assert_eq!(
///     resolve_class_and_level("barb_l1_wild_swing"),
///     (Some("Barbarian"), Some(1))
/// );
/// assert_eq!(resolve_class_and_level("bonk"), (None, None));
/// ```
pub fn resolve_class_and_level(move_id: &str) -> (Option<&'static str>, Option<u32>) {
    let id = move_id.to_lowercase();
    let class = CLASS_PREFIXES
        .iter()
        .find(|(prefix, _)| id.starts_with(prefix))
        .map(|(_, display)| *display);
    (class, extract_level(&id))
}

/// Finds the first `_l<digits>_` segment and parses the digits.
fn extract_level(id: &str) -> Option<u32> {
    let bytes = id.as_bytes();
    let mut search_from = 0;
    while let Some(found) = id[search_from..].find("_l") {
        let digits_start = search_from + found + 2;
        let digit_count = id[digits_start..]
            .bytes()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if digit_count > 0 && bytes.get(digits_start + digit_count) == Some(&b'_') {
            return id[digits_start..digits_start + digit_count].parse().ok();
        }
        search_from += found + 1;
    }
    None
}

/// Composes the sprite-asset key for a resolved class and level.
pub fn sprite_key(class: Option<&str>, level: Option<u32>) -> Option<String> {
    match (class, level) {
        (Some(class), Some(level)) => Some(format!("{}{}", class, level)),
        _ => None,
    }
}

/// Visual treatment for a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationKind {
    /// Drop onto the target from above
    Melee,
    /// Travel from attacker center to target center
    Projectile,
}

/// Animation kind for a move identifier, derived from its class prefix.
pub fn animation_kind_for(move_id: &str) -> AnimationKind {
    let (class, _) = resolve_class_and_level(move_id);
    match class {
        Some(class) if MELEE_CLASSES.contains(&class) => AnimationKind::Melee,
        _ => AnimationKind::Projectile,
    }
}

/// Cubic ease-in: slow start, fast finish.
pub fn ease_in_cubic(p: f32) -> f32 {
    p * p * p
}

/// Where and how to draw the animation sprite this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpritePose {
    /// Sprite center in screen coordinates
    pub center: Vec2,
    /// Uniform scale applied to the sprite's natural size
    pub scale: f32,
    /// Rotation in degrees (inverted rotation sense, matching the renderer)
    pub rotation_deg: f32,
}

/// The move animation state machine.
///
/// One of these exists per battle, owned by the combat resolver. At most one
/// animation is in flight at a time; [`MoveAnimation::start`] resets any
/// previous state.
pub struct MoveAnimation {
    active: bool,
    start_time: f64,
    duration: f64,
    sprite: Option<MoveSprite>,
    angle_deg: f32,
    target_side: Side,
    move_id: String,
    kind: AnimationKind,
    pose: Option<SpritePose>,
}

impl MoveAnimation {
    /// Creates an inactive animation engine.
    pub fn new() -> Self {
        Self {
            active: false,
            start_time: 0.0,
            duration: DEFAULT_DURATION,
            sprite: None,
            angle_deg: DEFAULT_ANGLE_DEG,
            target_side: Side::Enemy,
            move_id: String::new(),
            kind: AnimationKind::Projectile,
            pose: None,
        }
    }

    /// Begins an animation for `move_id` aimed at `target_side`.
    ///
    /// The sprite is looked up by class+level key through `sprites`. If the
    /// identifier resolves to no class or level, or the sprite is missing,
    /// the animation stays inactive — a silent no-op, not an error.
    pub fn start(&mut self, target_side: Side, move_id: &str, sprites: &dyn SpriteSource, now: f64) {
        let (class, level) = resolve_class_and_level(move_id);
        let sprite = sprite_key(class, level).and_then(|key| sprites.sprite(&key));
        if sprite.is_none() {
            log::debug!("no animation sprite for move '{}', skipping visual", move_id);
        }

        self.kind = animation_kind_for(move_id);
        self.active = sprite.is_some();
        self.sprite = sprite;
        self.start_time = now;
        self.duration = DEFAULT_DURATION;
        self.angle_deg = DEFAULT_ANGLE_DEG;
        self.target_side = target_side;
        self.move_id = move_id.to_string();
        self.pose = None;
    }

    /// True while an animation is in flight.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The pose computed by the last [`MoveAnimation::tick`], if any.
    pub fn pose(&self) -> Option<SpritePose> {
        self.pose
    }

    pub fn kind(&self) -> AnimationKind {
        self.kind
    }

    pub fn target_side(&self) -> Side {
        self.target_side
    }

    /// Force-clears the animation and releases the sprite.
    /// Safe to call when already inactive.
    pub fn cancel(&mut self) {
        self.active = false;
        self.sprite = None;
        self.pose = None;
    }

    /// Advances the animation to `now` (seconds) and recomputes the pose.
    ///
    /// `ally_rect` / `enemy_rect` are the on-screen rectangles of the two
    /// sides. Returns true while still animating; returns false and resets
    /// once elapsed reaches the duration or a needed rectangle is missing.
    pub fn tick(&mut self, now: f64, ally_rect: Option<Rect>, enemy_rect: Option<Rect>) -> bool {
        if !self.active {
            return false;
        }
        let Some(sprite) = &self.sprite else {
            self.cancel();
            return false;
        };

        let target_rect = match self.target_side {
            Side::Enemy => enemy_rect,
            Side::Ally => ally_rect,
        };
        let Some(target) = target_rect else {
            self.cancel();
            return false;
        };

        let duration = self.duration.max(0.001);
        let elapsed = (now - self.start_time).clamp(0.0, duration);
        let p = (elapsed / duration) as f32;

        let sprite_dim = sprite.size.x.max(sprite.size.y).max(1.0);
        let (tx, ty) = (target.x + target.w / 2.0, target.y + target.h / 2.0);

        let pose = match self.kind {
            AnimationKind::Melee => {
                let start_y = ty - target.h * 1.2;
                let y = start_y + (ty - start_y) * ease_in_cubic(p);
                let base = target.w.max(target.h).max(1.0);
                SpritePose {
                    center: vec2(tx, y),
                    scale: (base / sprite_dim).clamp(0.5, 1.2),
                    rotation_deg: self.angle_deg,
                }
            }
            AnimationKind::Projectile => {
                // Attacker is the opposite side from the target
                let source_rect = match self.target_side.opposite() {
                    Side::Enemy => enemy_rect,
                    Side::Ally => ally_rect,
                };
                let Some(source) = source_rect else {
                    self.cancel();
                    return false;
                };
                let (sx, sy) = (source.x + source.w / 2.0, source.y + source.h / 2.0);
                let (dx, dy) = (tx - sx, ty - sy);
                let dist = (dx * dx + dy * dy).sqrt().max(1.0);
                SpritePose {
                    center: vec2(sx + dx * p, sy + dy * p),
                    // Negated so the sprite visually faces the travel direction
                    rotation_deg: -dy.atan2(dx).to_degrees(),
                    scale: (dist / sprite_dim * 0.5).clamp(0.6, 1.0),
                }
            }
        };
        self.pose = Some(pose);

        if elapsed >= duration {
            // Natural completion: release the sprite but keep the final pose
            // readable until the next start/cancel.
            self.active = false;
            self.sprite = None;
            return false;
        }
        true
    }

    /// Draws the sprite at the last computed pose.
    pub fn draw(&self) {
        let (Some(pose), Some(sprite)) = (&self.pose, &self.sprite) else {
            return;
        };
        let Some(texture) = &sprite.texture else {
            return;
        };
        let size = sprite.size * pose.scale;
        draw_texture_ex(
            texture,
            pose.center.x - size.x / 2.0,
            pose.center.y - size.y / 2.0,
            WHITE,
            DrawTextureParams {
                dest_size: Some(size),
                rotation: pose.rotation_deg.to_radians(),
                ..Default::default()
            },
        );
    }
}

impl Default for MoveAnimation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    struct FakeSprites {
        size: Vec2,
    }

    impl SpriteSource for FakeSprites {
        fn sprite(&self, _key: &str) -> Option<MoveSprite> {
            Some(MoveSprite {
                texture: None,
                size: self.size,
            })
        }
    }

    struct NoSprites;

    impl SpriteSource for NoSprites {
        fn sprite(&self, _key: &str) -> Option<MoveSprite> {
            None
        }
    }

    fn fake_sprites() -> FakeSprites {
        FakeSprites {
            size: vec2(64.0, 64.0),
        }
    }

    #[test]
    fn test_resolve_known_classes() {
        assert_eq!(
            resolve_class_and_level("barb_l1_wild_swing"),
            (Some("Barbarian"), Some(1))
        );
        assert_eq!(
            resolve_class_and_level("sorc_l3_chaos_jolt"),
            (Some("Sorcerer"), Some(3))
        );
        assert_eq!(
            resolve_class_and_level("bh_l2_crimson_rite"),
            (Some("Bloodhunter"), Some(2))
        );
        assert_eq!(
            resolve_class_and_level("myconid_l1_spore_burst"),
            (Some("Myconid"), Some(1))
        );
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        assert_eq!(
            resolve_class_and_level("Wizard_L2_fire_bolt"),
            (Some("Wizard"), Some(2))
        );
    }

    #[test]
    fn test_resolve_unknown_prefix() {
        assert_eq!(resolve_class_and_level("bonk"), (None, None));
        assert_eq!(resolve_class_and_level(""), (None, None));
        assert_eq!(resolve_class_and_level("xyzzy_l1_zap"), (None, Some(1)));
    }

    #[test]
    fn test_resolve_missing_level_pattern() {
        // No trailing underscore after the digits, so no level
        assert_eq!(resolve_class_and_level("barb_l1"), (Some("Barbarian"), None));
        assert_eq!(resolve_class_and_level("barb_swing"), (Some("Barbarian"), None));
        // "_l" with no digits
        assert_eq!(resolve_class_and_level("barb_lx_swing"), (Some("Barbarian"), None));
    }

    #[test]
    fn test_prefix_precedence_is_first_match() {
        // "bard" appears after "barb" in the table; "barb..." ids must not
        // be eaten by it, and "bard..." ids resolve past the earlier rows.
        assert_eq!(resolve_class_and_level("bard_l1_inspire").0, Some("Bard"));
        assert_eq!(resolve_class_and_level("barb_l1_swing").0, Some("Barbarian"));
    }

    #[test]
    fn test_multi_digit_level() {
        assert_eq!(resolve_class_and_level("dragon_l12_breath").1, Some(12));
    }

    #[test]
    fn test_sprite_key_composition() {
        assert_eq!(
            sprite_key(Some("Wizard"), Some(2)),
            Some("Wizard2".to_string())
        );
        assert_eq!(sprite_key(Some("Wizard"), None), None);
        assert_eq!(sprite_key(None, Some(2)), None);
    }

    #[test]
    fn test_melee_vs_projectile_classes() {
        assert_eq!(animation_kind_for("paladin_l1_smite"), AnimationKind::Melee);
        assert_eq!(animation_kind_for("rogue_l1_backstab"), AnimationKind::Melee);
        assert_eq!(animation_kind_for("wizard_l1_fire_bolt"), AnimationKind::Projectile);
        assert_eq!(animation_kind_for("dragon_l1_fire_breath"), AnimationKind::Projectile);
        // Unresolvable ids default to projectile (never animate anyway)
        assert_eq!(animation_kind_for("bonk"), AnimationKind::Projectile);
    }

    #[test]
    fn test_ease_endpoints() {
        assert_eq!(ease_in_cubic(0.0), 0.0);
        assert_eq!(ease_in_cubic(1.0), 1.0);
    }

    #[test]
    fn test_start_with_missing_sprite_stays_inactive() {
        let mut anim = MoveAnimation::new();
        anim.start(Side::Enemy, "barb_l1_wild_swing", &NoSprites, 0.0);
        assert!(!anim.is_active());
        assert!(!anim.tick(0.1, Some(Rect::new(0.0, 0.0, 10.0, 10.0)), Some(Rect::new(0.0, 0.0, 10.0, 10.0))));
    }

    #[test]
    fn test_start_with_unresolvable_id_stays_inactive() {
        let mut anim = MoveAnimation::new();
        anim.start(Side::Enemy, "bonk", &fake_sprites(), 0.0);
        assert!(!anim.is_active());
    }

    #[test]
    fn test_melee_drops_onto_target_center() {
        let mut anim = MoveAnimation::new();
        anim.start(Side::Enemy, "barb_l1_wild_swing", &fake_sprites(), 0.0);
        assert!(anim.is_active());

        let enemy = Rect::new(100.0, 200.0, 80.0, 60.0);
        let ally = Rect::new(0.0, 0.0, 80.0, 60.0);
        let (cx, cy) = (140.0, 230.0);

        // At p=0 the sprite sits 1.2x target height above center
        anim.tick(0.0, Some(ally), Some(enemy));
        let pose = anim.pose().expect("pose at start");
        assert!((pose.center.x - cx).abs() < 1e-3);
        assert!((pose.center.y - (cy - 60.0 * 1.2)).abs() < 1e-3);

        // At the end it reaches target center; tick reports finished
        let still = anim.tick(DEFAULT_DURATION, Some(ally), Some(enemy));
        assert!(!still);
        assert!(!anim.is_active());
    }

    #[test]
    fn test_melee_end_pose_is_target_center() {
        let mut anim = MoveAnimation::new();
        anim.start(Side::Enemy, "fighter_l1_crosscut", &fake_sprites(), 0.0);
        let enemy = Rect::new(100.0, 200.0, 80.0, 60.0);

        // At elapsed == duration the final pose is the target center
        anim.tick(DEFAULT_DURATION, Some(Rect::new(0.0, 0.0, 1.0, 1.0)), Some(enemy));
        let pose = anim.pose().expect("final pose");
        assert!((pose.center.x - 140.0).abs() < 1e-3);
        assert!((pose.center.y - 230.0).abs() < 1e-3);
        assert_eq!(pose.rotation_deg, DEFAULT_ANGLE_DEG);
    }

    #[test]
    fn test_melee_scale_clamped() {
        let mut anim = MoveAnimation::new();
        anim.start(
            Side::Enemy,
            "monk_l1_flurry",
            &FakeSprites { size: vec2(10.0, 10.0) },
            0.0,
        );
        // Huge target vs tiny sprite: scale caps at 1.2
        let enemy = Rect::new(0.0, 0.0, 1000.0, 1000.0);
        anim.tick(0.1, Some(Rect::new(0.0, 0.0, 1.0, 1.0)), Some(enemy));
        assert_eq!(anim.pose().unwrap().scale, 1.2);
    }

    #[test]
    fn test_projectile_travels_between_centers() {
        let mut anim = MoveAnimation::new();
        anim.start(Side::Enemy, "wizard_l1_fire_bolt", &fake_sprites(), 0.0);
        assert_eq!(anim.kind(), AnimationKind::Projectile);

        // Ally (source) centered at (0,0); enemy (target) centered at (100,0)
        let ally = Rect::new(-10.0, -10.0, 20.0, 20.0);
        let enemy = Rect::new(90.0, -10.0, 20.0, 20.0);

        anim.tick(0.0, Some(ally), Some(enemy));
        let start = anim.pose().unwrap();
        assert!((start.center.x - 0.0).abs() < 1e-3);
        assert!((start.center.y - 0.0).abs() < 1e-3);

        anim.tick(DEFAULT_DURATION * 0.5, Some(ally), Some(enemy));
        let mid = anim.pose().unwrap();
        assert!((mid.center.x - 50.0).abs() < 1e-2);
        assert!((mid.center.y - 0.0).abs() < 1e-3);

        // Horizontal travel to the right: facing angle is zero
        assert!((mid.rotation_deg - 0.0).abs() < 1e-3);
    }

    #[test]
    fn test_projectile_rotation_is_negated_atan2() {
        let mut anim = MoveAnimation::new();
        anim.start(Side::Enemy, "warlock_l1_eldritch_blast", &fake_sprites(), 0.0);
        // Target is down-right of source: dy > 0, so the angle is negative
        let ally = Rect::new(-5.0, -5.0, 10.0, 10.0);
        let enemy = Rect::new(95.0, 95.0, 10.0, 10.0);
        anim.tick(0.1, Some(ally), Some(enemy));
        let pose = anim.pose().unwrap();
        assert!((pose.rotation_deg - (-45.0)).abs() < 1e-3);
    }

    #[test]
    fn test_missing_target_rect_cancels() {
        let mut anim = MoveAnimation::new();
        anim.start(Side::Enemy, "barb_l1_wild_swing", &fake_sprites(), 0.0);
        assert!(anim.is_active());
        assert!(!anim.tick(0.1, Some(Rect::new(0.0, 0.0, 1.0, 1.0)), None));
        assert!(!anim.is_active());
    }

    #[test]
    fn test_projectile_missing_source_rect_cancels() {
        let mut anim = MoveAnimation::new();
        anim.start(Side::Enemy, "wizard_l1_fire_bolt", &fake_sprites(), 0.0);
        assert!(!anim.tick(0.1, None, Some(Rect::new(0.0, 0.0, 1.0, 1.0))));
        assert!(!anim.is_active());
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut anim = MoveAnimation::new();
        anim.cancel();
        anim.start(Side::Ally, "ogre_l1_club_smash", &fake_sprites(), 0.0);
        anim.cancel();
        anim.cancel();
        assert!(!anim.is_active());
        assert!(anim.pose().is_none());
    }

    #[test]
    fn test_enemy_attack_targets_ally_rect() {
        let mut anim = MoveAnimation::new();
        anim.start(Side::Ally, "ogre_l1_club_smash", &fake_sprites(), 0.0);
        let ally = Rect::new(0.0, 0.0, 20.0, 20.0);
        let enemy = Rect::new(100.0, 0.0, 20.0, 20.0);
        anim.tick(0.0, Some(ally), Some(enemy));
        // Projectile sourced from the enemy rect center
        let pose = anim.pose().unwrap();
        assert!((pose.center.x - 110.0).abs() < 1e-3);
    }

    proptest! {
        #[test]
        fn prop_ease_monotone_and_bounded(a in 0.0f32..=1.0, b in 0.0f32..=1.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(ease_in_cubic(lo) <= ease_in_cubic(hi));
            prop_assert!((0.0..=1.0).contains(&ease_in_cubic(a)));
        }

        #[test]
        fn prop_projectile_endpoints_are_side_centers(
            sx in -500.0f32..500.0, sy in -500.0f32..500.0,
            tx in -500.0f32..500.0, ty in -500.0f32..500.0,
            w in 1.0f32..200.0, h in 1.0f32..200.0,
        ) {
            let ally = Rect::new(sx, sy, w, h);
            let enemy = Rect::new(tx, ty, w, h);
            let mut anim = MoveAnimation::new();
            anim.start(Side::Enemy, "wizard_l1_fire_bolt", &fake_sprites(), 0.0);

            anim.tick(0.0, Some(ally), Some(enemy));
            let start = anim.pose().unwrap();
            prop_assert!((start.center.x - (sx + w / 2.0)).abs() < 1e-2);
            prop_assert!((start.center.y - (sy + h / 2.0)).abs() < 1e-2);

            anim.tick(DEFAULT_DURATION, Some(ally), Some(enemy));
            let end = anim.pose().unwrap();
            prop_assert!((end.center.x - (tx + w / 2.0)).abs() < 1e-2);
            prop_assert!((end.center.y - (ty + h / 2.0)).abs() < 1e-2);
        }
    }
}
