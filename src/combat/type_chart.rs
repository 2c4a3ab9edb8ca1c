//! # Damage Type Effectiveness
//!
//! Class-vs-class damage multipliers. Every class deals one damage type and
//! carries two weaknesses (2x damage taken) and two resistances (0.5x).
//! Monster classes are not in the chart, so damage to and from them is
//! always 1x.

use crate::combat::animation::resolve_class_and_level;

/// The eight damage types classes deal and defend against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageType {
    Piercing,
    Bludgeoning,
    Slashing,
    Psychic,
    Radiant,
    Necrotic,
    Lightning,
    Fire,
}

struct ClassTypes {
    class: &'static str,
    deals: DamageType,
    /// Damage types this class takes double from
    weak_to: [DamageType; 2],
    /// Damage types this class takes half from
    resists: [DamageType; 2],
}

use DamageType::*;

const CHART: &[ClassTypes] = &[
    ClassTypes {
        class: "Druid",
        deals: Piercing,
        weak_to: [Bludgeoning, Fire],
        resists: [Lightning, Piercing],
    },
    ClassTypes {
        class: "Barbarian",
        deals: Bludgeoning,
        weak_to: [Slashing, Psychic],
        resists: [Fire, Bludgeoning],
    },
    ClassTypes {
        class: "Rogue",
        deals: Slashing,
        weak_to: [Piercing, Radiant],
        resists: [Psychic, Slashing],
    },
    ClassTypes {
        class: "Bard",
        deals: Psychic,
        weak_to: [Necrotic, Bludgeoning],
        resists: [Radiant, Psychic],
    },
    ClassTypes {
        class: "Cleric",
        deals: Radiant,
        weak_to: [Necrotic, Psychic],
        resists: [Radiant, Piercing],
    },
    ClassTypes {
        class: "Fighter",
        deals: Slashing,
        weak_to: [Lightning, Psychic],
        resists: [Piercing, Bludgeoning],
    },
    ClassTypes {
        class: "Monk",
        deals: Bludgeoning,
        weak_to: [Radiant, Fire],
        resists: [Piercing, Psychic],
    },
    ClassTypes {
        class: "Paladin",
        deals: Radiant,
        weak_to: [Necrotic, Slashing],
        resists: [Radiant, Bludgeoning],
    },
    ClassTypes {
        class: "Ranger",
        deals: Piercing,
        weak_to: [Fire, Necrotic],
        resists: [Lightning, Piercing],
    },
    ClassTypes {
        class: "Sorcerer",
        deals: Lightning,
        weak_to: [Piercing, Bludgeoning],
        resists: [Fire, Lightning],
    },
    ClassTypes {
        class: "Warlock",
        deals: Necrotic,
        weak_to: [Radiant, Fire],
        resists: [Psychic, Necrotic],
    },
    ClassTypes {
        class: "Wizard",
        deals: Fire,
        weak_to: [Piercing, Slashing],
        resists: [Psychic, Fire],
    },
    ClassTypes {
        class: "Artificer",
        deals: Lightning,
        weak_to: [Fire, Necrotic],
        resists: [Bludgeoning, Lightning],
    },
    ClassTypes {
        class: "Bloodhunter",
        deals: Necrotic,
        weak_to: [Radiant, Slashing],
        resists: [Fire, Necrotic],
    },
];

fn entry(class_name: &str) -> Option<&'static ClassTypes> {
    CHART
        .iter()
        .find(|e| e.class.eq_ignore_ascii_case(class_name.trim()))
}

/// The damage type a class deals. `None` for classes outside the chart.
pub fn class_damage_type(class_name: &str) -> Option<DamageType> {
    entry(class_name).map(|e| e.deals)
}

/// The damage type behind a move: the class encoded in its identifier, or
/// the attacker's own class when the id carries no prefix (Bonk).
pub fn move_damage_type(move_id: &str, attacker_class: &str) -> Option<DamageType> {
    resolve_class_and_level(move_id)
        .0
        .and_then(class_damage_type)
        .or_else(|| class_damage_type(attacker_class))
}

/// Multiplier for `attack_type` landing on a `defender_class` combatant:
/// 2.0 against a weakness, 0.5 against a resistance, otherwise 1.0.
pub fn effectiveness(attack_type: DamageType, defender_class: &str) -> f32 {
    let Some(defender) = entry(defender_class) else {
        return 1.0;
    };
    if defender.weak_to.contains(&attack_type) {
        2.0
    } else if defender.resists.contains(&attack_type) {
        0.5
    } else {
        1.0
    }
}

/// Applies a multiplier to a damage total, truncating toward zero.
pub fn scale_damage(total: i32, multiplier: f32) -> i32 {
    (total.max(0) as f32 * multiplier) as i32
}
