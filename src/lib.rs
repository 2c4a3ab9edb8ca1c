//! # Vessels
//!
//! A 2D monster-collecting role-playing game: overworld traversal with random
//! encounters, dice-based turn combat against wild creatures, capture scrolls,
//! and a timed move-animation engine.
//!
//! ## Architecture Overview
//!
//! The game is built from a handful of cooperating systems:
//!
//! - **Rolling**: dice checks, saves, attacks, and damage with readable
//!   breakdown text, plus the blocking roll-feedback textbox
//! - **Combat**: turn resolution, move definitions, parties, buffs, capture,
//!   and the move-animation state machine
//! - **World**: a thin overworld walk that produces wild encounters
//! - **Scenes**: overworld / battle / game-over flow on top of macroquad
//!
//! Everything runs on a single frame-driven thread. The combat resolver never
//! blocks; it polls two conditions each frame — "is the roll textbox still
//! showing" and "is the move animation still active" — and only advances the
//! turn once both are clear.

pub mod assets;
pub mod audio;
pub mod combat;
pub mod input;
pub mod items;
pub mod rendering;
pub mod rolling;
pub mod scenes;
pub mod world;

pub use assets::{AssetStore, MoveSprite, SpriteSource};
pub use audio::AudioBank;
pub use combat::{
    animation::{resolve_class_and_level, AnimationKind, MoveAnimation, SpritePose},
    buffs::{Buff, BuffStat},
    capture::{attempt_capture, base_dc_for_level, hp_dc_adjust, CaptureContext, CaptureOutcome},
    moves::{library, Ability, Move, MoveEffect, TargetSelector},
    party::{AbilityMods, Combatant, Party, PARTY_SIZE},
    resolver::{BattleCommand, BattleEvent, BattlePhase, BattleState},
    type_chart::{class_damage_type, effectiveness, move_damage_type, DamageType},
    Side,
};
pub use input::InputEvent;
pub use items::{Inventory, ScrollKind};
pub use rendering::{battle_layout, BattleLayout};
pub use rolling::{
    textbox::RollTextbox, AttackRoll, CheckRoll, CritRule, D20Roll, DamageRoll, RollKind,
    RollResult, Roller, SaveRoll,
};
pub use scenes::{SceneManager, SceneType};
pub use world::{Overworld, WildEncounter};

/// Core error type for the Vessels game.
#[derive(thiserror::Error, Debug)]
pub enum VesselsError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Game state is invalid
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// A dice expression could not be parsed
    #[error("Invalid dice notation: {0}")]
    InvalidDice(String),

    /// A move could not be executed
    #[error("Invalid move: {0}")]
    InvalidMove(String),
}

/// Result type used throughout the Vessels codebase.
pub type VesselsResult<T> = Result<T, VesselsError>;

/// Version information for the game.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game configuration constants.
pub mod config {
    /// Default seed when none is supplied on the command line
    pub const DEFAULT_SEED: u64 = 12345;

    /// Overworld width in tiles
    pub const OVERWORLD_WIDTH: i32 = 24;

    /// Overworld height in tiles
    pub const OVERWORLD_HEIGHT: i32 = 16;

    /// Steps that are always encounter-free after a battle
    pub const ENCOUNTER_GRACE_STEPS: u32 = 3;

    /// One-in-N encounter chance per step past the grace period
    pub const ENCOUNTER_DIE: u32 = 10;

    /// DC for the Dexterity check to flee a battle
    pub const FLEE_DC: i32 = 10;
}
