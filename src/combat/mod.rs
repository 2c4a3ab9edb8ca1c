//! # Combat Module
//!
//! Turn-based combat between the player's party and a wild creature:
//! move definitions, dice-driven resolution, capture attempts, buffs, and the
//! move-animation state machine.
//!
//! The [`resolver::BattleState`] is the coordination point. It owns the dice
//! [`crate::Roller`], the [`animation::MoveAnimation`] engine, and the
//! [`crate::RollTextbox`] — no module-level state anywhere in combat.

pub mod animation;
pub mod buffs;
pub mod capture;
pub mod moves;
pub mod party;
pub mod resolver;
pub mod type_chart;

use serde::{Deserialize, Serialize};

/// Which side of the battle a combatant (or animation target) is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The player's party
    Ally,
    /// The wild creature / opposing party
    Enemy,
}

impl Side {
    /// The opposite side; a projectile's source is the opposite of its target.
    pub fn opposite(self) -> Side {
        match self {
            Side::Ally => Side::Enemy,
            Side::Enemy => Side::Ally,
        }
    }
}
