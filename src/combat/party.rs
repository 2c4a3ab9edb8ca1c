//! # Combatants and Party Slots
//!
//! A [`Combatant`] is one creature's full combat stat block: HP, armor class,
//! ability modifiers, initiative, and an ordered buff list. A [`Party`] is
//! the fixed six-slot ordered sequence both sides of a battle use; a wild
//! encounter is simply a party with one occupied slot.

use crate::combat::buffs::{buff_total, tick_buffs, Buff, BuffStat};
use crate::combat::moves::Ability;
use serde::{Deserialize, Serialize};

/// Fixed party capacity.
pub const PARTY_SIZE: usize = 6;

/// Proficiency bonus for a character level, 5e progression.
pub fn proficiency_for_level(level: u32) -> i32 {
    2 + ((level.max(1) - 1) / 4) as i32
}

/// Ability modifiers for the six scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityMods {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

impl AbilityMods {
    pub fn get(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Str => self.strength,
            Ability::Dex => self.dexterity,
            Ability::Con => self.constitution,
            Ability::Int => self.intelligence,
            Ability::Wis => self.wisdom,
            Ability::Cha => self.charisma,
        }
    }
}

/// One creature's combat stat block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combatant {
    pub name: String,
    /// Class string used to pick the move kit (e.g. "Barbarian", "Myconid")
    pub class_name: String,
    pub level: u32,
    pub hp: i32,
    pub max_hp: i32,
    pub ac: i32,
    pub mods: AbilityMods,
    /// Flat initiative bonus on top of the d20 + DEX roll
    pub initiative: i32,
    /// Ordered list of active buffs
    pub buffs: Vec<Buff>,
    pub fainted: bool,
}

impl Combatant {
    pub fn new(name: &str, class_name: &str, level: u32, max_hp: i32, ac: i32) -> Self {
        Self {
            name: name.to_string(),
            class_name: class_name.to_string(),
            level,
            hp: max_hp,
            max_hp,
            ac,
            mods: AbilityMods::default(),
            initiative: 0,
            buffs: Vec::new(),
            fainted: false,
        }
    }

    pub fn with_mods(mut self, mods: AbilityMods) -> Self {
        self.mods = mods;
        self
    }

    /// AC including active buffs.
    pub fn effective_ac(&self) -> i32 {
        self.ac + buff_total(&self.buffs, BuffStat::Ac)
    }

    /// To-hit bonus for a move using `ability`: proficiency + mod + buffs.
    pub fn attack_bonus(&self, ability: Ability) -> i32 {
        proficiency_for_level(self.level)
            + self.mods.get(ability)
            + buff_total(&self.buffs, BuffStat::AttackBonus)
    }

    /// Flat damage bonus for a move using `ability`: mod + buffs.
    pub fn damage_bonus(&self, ability: Ability) -> i32 {
        self.mods.get(ability) + buff_total(&self.buffs, BuffStat::DamageBonus)
    }

    /// Save DC imposed on targets of this creature's save-based moves.
    pub fn save_dc(&self, ability: Ability) -> i32 {
        8 + proficiency_for_level(self.level) + self.mods.get(ability)
    }

    /// Initiative bonus: flat + DEX + buffs.
    pub fn initiative_bonus(&self) -> i32 {
        self.initiative + self.mods.dexterity + buff_total(&self.buffs, BuffStat::Initiative)
    }

    /// Applies damage, flooring HP at 0. Returns true if this faints the
    /// combatant (false when already fainted).
    pub fn apply_damage(&mut self, amount: i32) -> bool {
        if self.fainted {
            return false;
        }
        self.hp = (self.hp - amount.max(0)).max(0);
        if self.hp == 0 {
            self.fainted = true;
            return true;
        }
        false
    }

    /// Heals up to max HP. A fainted combatant revives at the healed value.
    pub fn heal(&mut self, amount: i32) {
        self.hp = (self.hp + amount.max(0)).min(self.max_hp);
        if self.hp > 0 {
            self.fainted = false;
        }
    }

    pub fn is_standing(&self) -> bool {
        !self.fainted && self.hp > 0
    }

    /// Counts one elapsed round against this combatant's buffs.
    pub fn tick_buffs(&mut self) -> Vec<String> {
        tick_buffs(&mut self.buffs)
    }
}

/// Fixed-capacity ordered party: slot index -> combatant or empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Party {
    slots: [Option<Combatant>; PARTY_SIZE],
}

impl Party {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single wild creature as a one-slot party.
    pub fn wild(combatant: Combatant) -> Self {
        let mut party = Self::new();
        party.slots[0] = Some(combatant);
        party
    }

    /// Adds to the first free slot. Returns the slot index, or gives the
    /// combatant back when the party is full.
    pub fn add(&mut self, combatant: Combatant) -> Result<usize, Combatant> {
        match self.slots.iter_mut().enumerate().find(|(_, s)| s.is_none()) {
            Some((idx, slot)) => {
                *slot = Some(combatant);
                Ok(idx)
            }
            None => Err(combatant),
        }
    }

    pub fn get(&self, idx: usize) -> Option<&Combatant> {
        self.slots.get(idx).and_then(|s| s.as_ref())
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut Combatant> {
        self.slots.get_mut(idx).and_then(|s| s.as_mut())
    }

    /// Removes and returns the combatant at `idx`.
    pub fn remove(&mut self, idx: usize) -> Option<Combatant> {
        self.slots.get_mut(idx).and_then(|s| s.take())
    }

    /// Swaps two slots (either may be empty).
    pub fn swap(&mut self, a: usize, b: usize) {
        if a < PARTY_SIZE && b < PARTY_SIZE {
            self.slots.swap(a, b);
        }
    }

    /// Lowest-indexed slot with a standing combatant. Slot order is the
    /// deterministic tie-break for everything turn-ordered.
    pub fn first_standing(&self) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.as_ref().is_some_and(|c| c.is_standing()))
    }

    /// True when no combatant in the party can still fight.
    pub fn is_defeated(&self) -> bool {
        self.first_standing().is_none()
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(|s| s.is_some())
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Combatant)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|c| (i, c)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, &mut Combatant)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(i, s)| s.as_mut().map(|c| (i, c)))
    }
}
