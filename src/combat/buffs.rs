//! # Buff Subsystem
//!
//! Temporary stat modifiers carried by combatants. Each buff has a magnitude,
//! a remaining-turn counter, and a source label for messages. Buffs are
//! stored in application order and expire as combat rounds elapse.

use serde::{Deserialize, Serialize};

/// Which derived stat a buff modifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuffStat {
    /// Armor class
    Ac,
    /// To-hit bonus
    AttackBonus,
    /// Flat damage bonus
    DamageBonus,
    /// Initiative bonus
    Initiative,
}

/// A temporary modifier applied to one combatant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Buff {
    pub name: String,
    pub stat: BuffStat,
    pub magnitude: i32,
    /// Rounds left, counted down at the end of each combat round
    pub turns_remaining: u32,
    /// Where the buff came from, for combat messages
    pub source: String,
}

impl Buff {
    pub fn new(name: &str, stat: BuffStat, magnitude: i32, turns: u32, source: &str) -> Self {
        Self {
            name: name.to_string(),
            stat,
            magnitude,
            turns_remaining: turns,
            source: source.to_string(),
        }
    }
}

/// Sums the active magnitudes for one stat over an ordered buff list.
pub fn buff_total(buffs: &[Buff], stat: BuffStat) -> i32 {
    buffs
        .iter()
        .filter(|b| b.stat == stat)
        .map(|b| b.magnitude)
        .sum()
}

/// Counts one elapsed round against every buff, removing the expired ones.
/// Returns the names of buffs that wore off, in their application order.
pub fn tick_buffs(buffs: &mut Vec<Buff>) -> Vec<String> {
    let mut expired = Vec::new();
    for buff in buffs.iter_mut() {
        buff.turns_remaining = buff.turns_remaining.saturating_sub(1);
    }
    buffs.retain(|b| {
        if b.turns_remaining == 0 {
            expired.push(b.name.clone());
            false
        } else {
            true
        }
    });
    expired
}
