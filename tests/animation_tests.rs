//! Integration tests for the move-animation engine driven through the
//! public API with a synthetic clock and fake sprite sources.

use macroquad::prelude::*;
use vessels::combat::animation::{MoveAnimation, DEFAULT_DURATION};
use vessels::{AnimationKind, MoveSprite, Side, SpriteSource};

struct FakeSprites;

impl SpriteSource for FakeSprites {
    fn sprite(&self, _key: &str) -> Option<MoveSprite> {
        Some(MoveSprite {
            texture: None,
            size: vec2(64.0, 64.0),
        })
    }
}

struct NoSprites;

impl SpriteSource for NoSprites {
    fn sprite(&self, _key: &str) -> Option<MoveSprite> {
        None
    }
}

fn rects() -> (Rect, Rect) {
    // Ally lower left, enemy upper right, like the battle layout
    (
        Rect::new(100.0, 400.0, 120.0, 120.0),
        Rect::new(600.0, 100.0, 120.0, 120.0),
    )
}

#[test]
fn melee_animation_runs_for_half_a_second() {
    let (ally, enemy) = rects();
    let mut anim = MoveAnimation::new();
    anim.start(Side::Enemy, "barb_l1_wild_swing", &FakeSprites, 10.0);
    assert_eq!(anim.kind(), AnimationKind::Melee);

    // Just before the duration elapses it is still running
    assert!(anim.tick(10.0 + DEFAULT_DURATION - 0.01, Some(ally), Some(enemy)));
    assert!(anim.is_active());

    // At the duration it reports finished
    assert!(!anim.tick(10.0 + DEFAULT_DURATION, Some(ally), Some(enemy)));
    assert!(!anim.is_active());
}

#[test]
fn melee_descends_monotonically_onto_the_target() {
    let (ally, enemy) = rects();
    let mut anim = MoveAnimation::new();
    anim.start(Side::Enemy, "paladin_l1_smite", &FakeSprites, 0.0);

    let mut last_y = f32::NEG_INFINITY;
    for frame in 0..=10 {
        let now = DEFAULT_DURATION * frame as f64 / 10.0;
        anim.tick(now, Some(ally), Some(enemy));
        let pose = anim.pose().expect("pose each frame");
        assert!(pose.center.y >= last_y, "melee sprite moved upward");
        assert_eq!(pose.center.x, enemy.x + enemy.w / 2.0);
        last_y = pose.center.y;
    }
    // Final resting point is the target center
    let end = anim.pose().unwrap();
    assert!((end.center.y - (enemy.y + enemy.h / 2.0)).abs() < 1e-3);
}

#[test]
fn projectile_crosses_the_midpoint_between_centers() {
    // Source centered at (0, 0), target at (100, 0)
    let ally = Rect::new(-10.0, -10.0, 20.0, 20.0);
    let enemy = Rect::new(90.0, -10.0, 20.0, 20.0);

    let mut anim = MoveAnimation::new();
    anim.start(Side::Enemy, "wizard_l1_fire_bolt", &FakeSprites, 0.0);
    assert_eq!(anim.kind(), AnimationKind::Projectile);

    anim.tick(DEFAULT_DURATION / 2.0, Some(ally), Some(enemy));
    let mid = anim.pose().unwrap();
    assert!((mid.center.x - 50.0).abs() < 1.0);
    assert!(mid.center.y.abs() < 1e-3);
}

#[test]
fn enemy_projectile_travels_toward_the_ally() {
    let (ally, enemy) = rects();
    let mut anim = MoveAnimation::new();
    // Wild ogre attacking: target side is Ally
    anim.start(Side::Ally, "ogre_l1_club_smash", &FakeSprites, 0.0);

    anim.tick(0.0, Some(ally), Some(enemy));
    let start = anim.pose().unwrap();
    assert!((start.center.x - (enemy.x + enemy.w / 2.0)).abs() < 1e-2);

    anim.tick(DEFAULT_DURATION, Some(ally), Some(enemy));
    let end = anim.pose().unwrap();
    assert!((end.center.x - (ally.x + ally.w / 2.0)).abs() < 1e-2);
}

#[test]
fn missing_sprite_is_a_silent_no_op() {
    let (ally, enemy) = rects();
    let mut anim = MoveAnimation::new();
    anim.start(Side::Enemy, "barb_l1_wild_swing", &NoSprites, 0.0);
    assert!(!anim.is_active());
    assert!(!anim.tick(0.1, Some(ally), Some(enemy)));
    assert!(anim.pose().is_none());
}

#[test]
fn starting_a_new_animation_replaces_the_old_one() {
    let (ally, enemy) = rects();
    let mut anim = MoveAnimation::new();
    anim.start(Side::Enemy, "barb_l1_wild_swing", &FakeSprites, 0.0);
    anim.tick(0.1, Some(ally), Some(enemy));

    anim.start(Side::Ally, "wizard_l1_fire_bolt", &FakeSprites, 0.2);
    assert!(anim.is_active());
    assert_eq!(anim.kind(), AnimationKind::Projectile);
    assert_eq!(anim.target_side(), Side::Ally);
    // Pose from the previous run is gone until the first tick
    assert!(anim.pose().is_none());
}
