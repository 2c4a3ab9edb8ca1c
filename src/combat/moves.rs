//! # Move Definitions
//!
//! Immutable move data looked up by identifier. A move's identifier encodes
//! its class and level (`barb_l1_wild_swing`) and is what the animation
//! engine uses to pick a sprite; the numeric fields drive resolution.
//!
//! The melee/projectile category is never stored — it is derived from the
//! identifier's class prefix by [`crate::combat::animation::animation_kind_for`].

use crate::combat::animation::resolve_class_and_level;
use crate::combat::buffs::BuffStat;
use serde::{Deserialize, Serialize};

/// The six ability scores a move can key off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ability {
    Str,
    Dex,
    Con,
    Int,
    Wis,
    Cha,
}

/// Who a move is aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetSelector {
    /// The user's own side (heals, self-buffs)
    SelfSide,
    /// The opposing side's active combatant
    Enemy,
}

/// What a move does once it connects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveEffect {
    /// Deal the rolled dice as damage
    Damage,
    /// Restore the rolled dice as HP
    Heal,
    /// Apply a temporary stat modifier
    Buff {
        stat: BuffStat,
        magnitude: i32,
        turns: u32,
    },
}

/// Immutable definition of one move. Looked up by id, never mutated.
#[derive(Debug, Clone, Copy)]
pub struct Move {
    /// Unique id encoding class + level + variant, e.g. `barb_l1_wild_swing`
    pub id: &'static str,
    pub label: &'static str,
    pub desc: &'static str,
    /// Damage/heal dice as (count, sides)
    pub dice: (u32, u32),
    /// Ability score backing the move (to-hit bonus or save DC)
    pub ability: Ability,
    /// True: attack roll vs AC. False: target saves vs the user's DC.
    pub to_hit: bool,
    /// Which ability the target saves with when `to_hit` is false
    pub save_ability: Ability,
    pub target: TargetSelector,
    pub effect: MoveEffect,
    pub max_pp: u32,
}

/// Fallback move when a kit is empty or out of PP. Its id carries no class
/// prefix, so it resolves to no sprite and animates as nothing.
pub const BONK: Move = Move {
    id: "bonk",
    label: "Bonk",
    desc: "A desperate thump.",
    dice: (1, 4),
    ability: Ability::Str,
    to_hit: true,
    save_ability: Ability::Dex,
    target: TargetSelector::Enemy,
    effect: MoveEffect::Damage,
    max_pp: u32::MAX,
};

/// The level-1 move kits, one or two moves per class.
const LIBRARY: &[Move] = &[
    Move {
        id: "barb_l1_wild_swing",
        label: "Wild Swing",
        desc: "A reckless overhead chop.",
        dice: (1, 8),
        ability: Ability::Str,
        to_hit: true,
        save_ability: Ability::Dex,
        target: TargetSelector::Enemy,
        effect: MoveEffect::Damage,
        max_pp: 20,
    },
    Move {
        id: "fighter_l1_crosscut",
        label: "Crosscut",
        desc: "A disciplined slash across the guard.",
        dice: (1, 8),
        ability: Ability::Str,
        to_hit: true,
        save_ability: Ability::Dex,
        target: TargetSelector::Enemy,
        effect: MoveEffect::Damage,
        max_pp: 20,
    },
    Move {
        id: "rogue_l1_backstab",
        label: "Backstab",
        desc: "A quick blade from the flank.",
        dice: (1, 6),
        ability: Ability::Dex,
        to_hit: true,
        save_ability: Ability::Dex,
        target: TargetSelector::Enemy,
        effect: MoveEffect::Damage,
        max_pp: 20,
    },
    Move {
        id: "monk_l1_flurry",
        label: "Flurry",
        desc: "A rapid series of strikes.",
        dice: (1, 4),
        ability: Ability::Dex,
        to_hit: true,
        save_ability: Ability::Dex,
        target: TargetSelector::Enemy,
        effect: MoveEffect::Damage,
        max_pp: 25,
    },
    Move {
        id: "paladin_l1_smite",
        label: "Smite",
        desc: "A radiant hammer blow.",
        dice: (1, 8),
        ability: Ability::Str,
        to_hit: true,
        save_ability: Ability::Dex,
        target: TargetSelector::Enemy,
        effect: MoveEffect::Damage,
        max_pp: 20,
    },
    Move {
        id: "bh_l1_crimson_rite",
        label: "Crimson Rite",
        desc: "A blood-fueled cut.",
        dice: (1, 6),
        ability: Ability::Str,
        to_hit: true,
        save_ability: Ability::Dex,
        target: TargetSelector::Enemy,
        effect: MoveEffect::Damage,
        max_pp: 20,
    },
    Move {
        id: "wizard_l1_fire_bolt",
        label: "Fire Bolt",
        desc: "A mote of flame hurled at the foe.",
        dice: (1, 10),
        ability: Ability::Int,
        to_hit: true,
        save_ability: Ability::Dex,
        target: TargetSelector::Enemy,
        effect: MoveEffect::Damage,
        max_pp: 20,
    },
    Move {
        id: "sorc_l1_chaos_jolt",
        label: "Chaos Jolt",
        desc: "Raw magic, loosely aimed.",
        dice: (1, 8),
        ability: Ability::Cha,
        to_hit: true,
        save_ability: Ability::Dex,
        target: TargetSelector::Enemy,
        effect: MoveEffect::Damage,
        max_pp: 20,
    },
    Move {
        id: "warlock_l1_eldritch_blast",
        label: "Eldritch Blast",
        desc: "A crackling beam from beyond.",
        dice: (1, 10),
        ability: Ability::Cha,
        to_hit: true,
        save_ability: Ability::Dex,
        target: TargetSelector::Enemy,
        effect: MoveEffect::Damage,
        max_pp: 20,
    },
    Move {
        id: "druid_l1_thorn_whip",
        label: "Thorn Whip",
        desc: "A vine lashes out.",
        dice: (1, 6),
        ability: Ability::Wis,
        to_hit: true,
        save_ability: Ability::Dex,
        target: TargetSelector::Enemy,
        effect: MoveEffect::Damage,
        max_pp: 20,
    },
    Move {
        id: "ranger_l1_pin_down",
        label: "Pin Down",
        desc: "An arrow to slow the quarry.",
        dice: (1, 6),
        ability: Ability::Dex,
        to_hit: true,
        save_ability: Ability::Dex,
        target: TargetSelector::Enemy,
        effect: MoveEffect::Damage,
        max_pp: 20,
    },
    Move {
        id: "arti_l1_scrap_cannon",
        label: "Scrap Cannon",
        desc: "An improvised burst of shrapnel.",
        dice: (1, 8),
        ability: Ability::Int,
        to_hit: true,
        save_ability: Ability::Dex,
        target: TargetSelector::Enemy,
        effect: MoveEffect::Damage,
        max_pp: 20,
    },
    Move {
        id: "cleric_l1_healing_word",
        label: "Healing Word",
        desc: "A whispered mend.",
        dice: (1, 4),
        ability: Ability::Wis,
        to_hit: false,
        save_ability: Ability::Dex,
        target: TargetSelector::SelfSide,
        effect: MoveEffect::Heal,
        max_pp: 20,
    },
    Move {
        id: "bard_l1_inspire",
        label: "Inspire",
        desc: "A verse that sharpens the next strike.",
        dice: (0, 0),
        ability: Ability::Cha,
        to_hit: false,
        save_ability: Ability::Dex,
        target: TargetSelector::SelfSide,
        effect: MoveEffect::Buff {
            stat: BuffStat::AttackBonus,
            magnitude: 2,
            turns: 3,
        },
        max_pp: 20,
    },
    // Monster kits
    Move {
        id: "dragon_l1_fire_breath",
        label: "Fire Breath",
        desc: "A cone of flame.",
        dice: (2, 6),
        ability: Ability::Con,
        to_hit: false,
        save_ability: Ability::Dex,
        target: TargetSelector::Enemy,
        effect: MoveEffect::Damage,
        max_pp: 20,
    },
    Move {
        id: "owlbear_l1_maul",
        label: "Maul",
        desc: "Claws and beak together.",
        dice: (1, 10),
        ability: Ability::Str,
        to_hit: true,
        save_ability: Ability::Dex,
        target: TargetSelector::Enemy,
        effect: MoveEffect::Damage,
        max_pp: 20,
    },
    Move {
        id: "beholder_l1_eye_ray",
        label: "Eye Ray",
        desc: "A searing beam from one of many eyes.",
        dice: (1, 10),
        ability: Ability::Int,
        to_hit: true,
        save_ability: Ability::Dex,
        target: TargetSelector::Enemy,
        effect: MoveEffect::Damage,
        max_pp: 20,
    },
    Move {
        id: "golem_l1_slam",
        label: "Slam",
        desc: "A stone fist falls.",
        dice: (1, 8),
        ability: Ability::Str,
        to_hit: true,
        save_ability: Ability::Dex,
        target: TargetSelector::Enemy,
        effect: MoveEffect::Damage,
        max_pp: 20,
    },
    Move {
        id: "ogre_l1_club_smash",
        label: "Club Smash",
        desc: "A tree trunk, applied liberally.",
        dice: (1, 8),
        ability: Ability::Str,
        to_hit: true,
        save_ability: Ability::Dex,
        target: TargetSelector::Enemy,
        effect: MoveEffect::Damage,
        max_pp: 20,
    },
    Move {
        id: "nothic_l1_rotting_gaze",
        label: "Rotting Gaze",
        desc: "A stare that withers.",
        dice: (1, 6),
        ability: Ability::Int,
        to_hit: false,
        save_ability: Ability::Con,
        target: TargetSelector::Enemy,
        effect: MoveEffect::Damage,
        max_pp: 20,
    },
    Move {
        id: "myconid_l1_spore_burst",
        label: "Spore Burst",
        desc: "A choking cloud of spores.",
        dice: (1, 4),
        ability: Ability::Con,
        to_hit: false,
        save_ability: Ability::Con,
        target: TargetSelector::Enemy,
        effect: MoveEffect::Damage,
        max_pp: 20,
    },
];

/// The full builtin move library.
pub fn library() -> &'static [Move] {
    LIBRARY
}

/// Looks up a move by id. `"bonk"` resolves to the fallback move.
pub fn find(id: &str) -> Option<&'static Move> {
    if id == BONK.id {
        return Some(&BONK);
    }
    LIBRARY.iter().find(|m| m.id == id)
}

/// The moves available to a combatant of the given class.
pub fn moves_for_class(class_name: &str) -> Vec<&'static Move> {
    LIBRARY
        .iter()
        .filter(|m| resolve_class_and_level(m.id).0 == Some(class_name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::animation::{animation_kind_for, resolve_class_and_level, AnimationKind};

    #[test]
    fn test_every_library_id_resolves_class_and_level() {
        for mv in library() {
            let (class, level) = resolve_class_and_level(mv.id);
            assert!(class.is_some(), "{} has no class prefix", mv.id);
            assert_eq!(level, Some(1), "{} is not a level-1 id", mv.id);
        }
    }

    #[test]
    fn test_find_by_id() {
        let mv = find("wizard_l1_fire_bolt").expect("fire bolt exists");
        assert_eq!(mv.label, "Fire Bolt");
        assert!(find("no_such_move").is_none());
    }

    #[test]
    fn test_bonk_is_always_findable_and_spriteless() {
        let bonk = find("bonk").expect("bonk exists");
        assert_eq!(resolve_class_and_level(bonk.id), (None, None));
        assert_eq!(bonk.max_pp, u32::MAX);
    }

    #[test]
    fn test_moves_for_class() {
        let barbarian = moves_for_class("Barbarian");
        assert_eq!(barbarian.len(), 1);
        assert_eq!(barbarian[0].id, "barb_l1_wild_swing");

        let myconid = moves_for_class("Myconid");
        assert_eq!(myconid.len(), 1);
        assert!(!myconid[0].to_hit);

        assert!(moves_for_class("Accountant").is_empty());
    }

    #[test]
    fn test_melee_kits_match_melee_classes() {
        assert_eq!(animation_kind_for("barb_l1_wild_swing"), AnimationKind::Melee);
        assert_eq!(animation_kind_for("cleric_l1_healing_word"), AnimationKind::Projectile);
        assert_eq!(animation_kind_for("dragon_l1_fire_breath"), AnimationKind::Projectile);
    }
}
