//! # Dice Rolling Module
//!
//! The dice roller behind every combat outcome: d20 checks, saving throws,
//! attack rolls, damage dice, and free-form `NdM±B` notation.
//!
//! Every roll produces both a numeric total and a human-readable breakdown
//! line (e.g. `Attack: d20(14) +3 = 17 vs AC 12 -> HIT`). The breakdown text
//! is what the [`textbox::RollTextbox`] shows to the player; the totals are
//! what the combat resolver consumes.
//!
//! The [`Roller`] owns its RNG. There is no process-wide dice state: whoever
//! needs dice holds a `Roller`, and seeding one makes every outcome it
//! produces reproducible.

pub mod textbox;

use crate::{VesselsError, VesselsResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// D&D 5e style ability modifier: `floor((score - 10) / 2)`.
pub fn ability_mod(score: i32) -> i32 {
    (score - 10).div_euclid(2)
}

/// Formats a signed modifier like `+3`, `-1`, or `+0`.
fn fmt_mod(n: i32) -> String {
    format!("{:+}", n)
}

/// Advantage suffix for breakdown text.
fn adv_suffix(adv: i32) -> &'static str {
    match adv.signum() {
        1 => " [ADV]",
        -1 => " [DIS]",
        _ => "",
    }
}

/// How critical hits scale damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CritRule {
    /// Roll the damage dice twice (5e default)
    DoubleDice,
    /// Double the final total
    DoubleTotal,
}

/// Kind tag for a published roll result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollKind {
    Check,
    Save,
    Attack,
    Damage,
}

/// A raw d20 roll with modifier and advantage applied.
#[derive(Debug, Clone)]
pub struct D20Roll {
    pub total: i32,
    pub d20: i32,
    pub second_d20: Option<i32>,
    /// The die actually kept after advantage/disadvantage
    pub used: i32,
    pub modifier: i32,
    /// +1 advantage, -1 disadvantage, 0 normal
    pub advantage: i32,
    pub nat20: bool,
    pub nat1: bool,
    pub text: String,
}

/// An ability/skill check, optionally against a DC.
#[derive(Debug, Clone)]
pub struct CheckRoll {
    pub total: i32,
    /// `None` when no DC was given
    pub success: Option<bool>,
    pub dc: Option<i32>,
    pub roll: D20Roll,
    pub text: String,
}

/// A saving throw against a DC.
#[derive(Debug, Clone)]
pub struct SaveRoll {
    pub total: i32,
    pub success: bool,
    pub dc: i32,
    pub roll: D20Roll,
    pub text: String,
}

/// An attack roll against armor class.
#[derive(Debug, Clone)]
pub struct AttackRoll {
    pub total: i32,
    pub hit: bool,
    pub target_ac: i32,
    pub crit: bool,
    pub fumble: bool,
    pub roll: D20Roll,
    pub text: String,
}

/// A damage roll.
#[derive(Debug, Clone)]
pub struct DamageRoll {
    pub total: i32,
    pub dice: (u32, u32),
    pub rolls: Vec<i32>,
    pub bonus: i32,
    pub crit: bool,
    pub text: String,
}

/// A tagged roll result as published to the feedback textbox.
///
/// Created once per roll invocation and never mutated afterwards.
#[derive(Debug, Clone)]
pub enum RollResult {
    Check(CheckRoll),
    Save(SaveRoll),
    Attack(AttackRoll),
    Damage(DamageRoll),
}

impl RollResult {
    pub fn kind(&self) -> RollKind {
        match self {
            RollResult::Check(_) => RollKind::Check,
            RollResult::Save(_) => RollKind::Save,
            RollResult::Attack(_) => RollKind::Attack,
            RollResult::Damage(_) => RollKind::Damage,
        }
    }

    pub fn total(&self) -> i32 {
        match self {
            RollResult::Check(r) => r.total,
            RollResult::Save(r) => r.total,
            RollResult::Attack(r) => r.total,
            RollResult::Damage(r) => r.total,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            RollResult::Check(r) => &r.text,
            RollResult::Save(r) => &r.text,
            RollResult::Attack(r) => &r.text,
            RollResult::Damage(r) => &r.text,
        }
    }
}

/// Self-contained dice roller with an owned RNG.
///
/// # Examples
///
/// ```
/// use vessels::Roller;
///
/// let mut roller = Roller::seeded(7);
/// let attack = roller.roll_attack(3, 12, 0, 20);
/// assert_eq!(attack.total, attack.roll.used + 3);
/// ```
pub struct Roller {
    rng: StdRng,
}

impl Roller {
    /// Creates a roller seeded from system entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a deterministic roller from a seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Rolls `n` dice with `die` faces. Returns (sum, individual rolls).
    pub fn roll_dice(&mut self, n: u32, die: u32) -> (i32, Vec<i32>) {
        let rolls: Vec<i32> = (0..n)
            .map(|_| self.rng.gen_range(1..=die.max(1)) as i32)
            .collect();
        (rolls.iter().sum(), rolls)
    }

    /// Sum of rolling `n` dice with `m` faces.
    pub fn roll_ndm(&mut self, n: u32, m: u32) -> i32 {
        self.roll_dice(n, m).0
    }

    /// Rolls a d20 with modifier and advantage/disadvantage.
    ///
    /// `adv`: +1 advantage, -1 disadvantage, 0 normal.
    pub fn roll_d20(&mut self, modifier: i32, adv: i32) -> D20Roll {
        let r1 = self.rng.gen_range(1..=20);
        let r2 = if adv != 0 {
            Some(self.rng.gen_range(1..=20))
        } else {
            None
        };
        let used = match (r2, adv.signum()) {
            (Some(b), 1) => r1.max(b),
            (Some(b), -1) => r1.min(b),
            _ => r1,
        };
        let total = used + modifier;
        let nat20 = used == 20;
        let nat1 = used == 1;

        let mod_txt = if modifier != 0 {
            format!(" {}", fmt_mod(modifier))
        } else {
            String::new()
        };
        let text = format!("d20({}){}{} = {}", used, mod_txt, adv_suffix(adv), total);

        D20Roll {
            total,
            d20: r1,
            second_d20: r2,
            used,
            modifier,
            advantage: adv,
            nat20,
            nat1,
            text,
        }
    }

    /// Ability/skill check: `d20 + ability_mod + prof? + misc`, optionally vs a DC.
    pub fn roll_check(
        &mut self,
        score: i32,
        proficiency: bool,
        prof_bonus: i32,
        dc: Option<i32>,
        adv: i32,
        misc_bonus: i32,
    ) -> CheckRoll {
        let modifier = ability_mod(score) + if proficiency { prof_bonus } else { 0 } + misc_bonus;
        self.roll_check_mod(modifier, dc, adv)
    }

    /// Ability check from a precomputed modifier, the form combatant stat
    /// blocks feed the resolver (flee attempts).
    pub fn roll_check_mod(&mut self, modifier: i32, dc: Option<i32>, adv: i32) -> CheckRoll {
        let roll = self.roll_d20(modifier, adv);
        let success = dc.map(|dc| roll.total >= dc);

        let dc_txt = match (dc, success) {
            (Some(dc), Some(ok)) => format!(" vs DC {} {}", dc, if ok { "✔" } else { "✖" }),
            _ => String::new(),
        };
        let text = format!("Check: {}{}", roll.text, dc_txt);
        let total = roll.total;
        CheckRoll {
            total,
            success,
            dc,
            roll,
            text,
        }
    }

    /// Saving throw vs DC, from an ability score.
    pub fn roll_save(
        &mut self,
        score: i32,
        proficiency: bool,
        prof_bonus: i32,
        dc: i32,
        adv: i32,
        misc_bonus: i32,
    ) -> SaveRoll {
        let modifier = ability_mod(score) + if proficiency { prof_bonus } else { 0 } + misc_bonus;
        self.roll_save_mod(modifier, dc, adv)
    }

    /// Saving throw vs DC from a precomputed modifier. Monster stat blocks
    /// store modifiers rather than scores, so the resolver uses this form.
    pub fn roll_save_mod(&mut self, modifier: i32, dc: i32, adv: i32) -> SaveRoll {
        let roll = self.roll_d20(modifier, adv);
        let success = roll.total >= dc;
        let text = format!(
            "Save: {} vs DC {} {}",
            roll.text,
            dc,
            if success { "✔" } else { "✖" }
        );
        let total = roll.total;
        SaveRoll {
            total,
            success,
            dc,
            roll,
            text,
        }
    }

    /// Attack roll vs AC. Nat 1 auto-misses; `crit_range` and above crits.
    pub fn roll_attack(
        &mut self,
        attack_bonus: i32,
        target_ac: i32,
        adv: i32,
        crit_range: i32,
    ) -> AttackRoll {
        let roll = self.roll_d20(attack_bonus, adv);
        let crit = roll.used >= crit_range;
        let fumble = roll.used == 1;
        let hit = if crit {
            true
        } else if fumble {
            false
        } else {
            roll.total >= target_ac
        };

        let bonus_txt = if attack_bonus != 0 {
            format!(" {}", fmt_mod(attack_bonus))
        } else {
            String::new()
        };
        let flags = if crit {
            " (CRIT!)"
        } else if fumble {
            " (FUMBLE!)"
        } else {
            ""
        };
        let text = format!(
            "Attack: d20({}){}{} = {} vs AC {} -> {}{}",
            roll.used,
            adv_suffix(roll.advantage),
            bonus_txt,
            roll.total,
            target_ac,
            if hit { "HIT" } else { "MISS" },
            flags
        );
        let total = roll.total;
        AttackRoll {
            total,
            hit,
            target_ac,
            crit,
            fumble,
            roll,
            text,
        }
    }

    /// Damage roll: `(count, die)` plus a flat bonus, with crit scaling.
    pub fn roll_damage(
        &mut self,
        dice: (u32, u32),
        bonus: i32,
        crit: bool,
        crit_rule: CritRule,
    ) -> DamageRoll {
        let (count, die) = dice;
        let (rolls, mut total) = if crit && crit_rule == CritRule::DoubleDice {
            let (s1, mut r1) = self.roll_dice(count, die);
            let (s2, r2) = self.roll_dice(count, die);
            r1.extend(r2);
            (r1, s1 + s2 + bonus)
        } else {
            let (s, r) = self.roll_dice(count, die);
            (r, s + bonus)
        };
        if crit && crit_rule == CritRule::DoubleTotal {
            total *= 2;
        }

        let bonus_txt = if bonus != 0 {
            format!(" {}", fmt_mod(bonus))
        } else {
            String::new()
        };
        let crit_txt = if crit { " (CRIT)" } else { "" };
        let text = format!(
            "Damage: {}d{} rolls {:?}{}{} = {}",
            count, die, rolls, bonus_txt, crit_txt, total
        );
        DamageRoll {
            total,
            dice,
            rolls,
            bonus,
            crit,
            text,
        }
    }

    /// Rolls free-form dice notation, e.g. `"2d6+3"`.
    pub fn roll_notation(&mut self, expr: &str) -> VesselsResult<DamageRoll> {
        let (count, die, bonus) = parse_notation(expr)?;
        Ok(self.roll_damage((count, die), bonus, false, CritRule::DoubleDice))
    }
}

impl Default for Roller {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses very simple `NdM` (no modifiers). `"2d6"` -> (2, 6), `"d8"` -> (1, 8).
fn parse_simple_d(s: &str) -> VesselsResult<(u32, u32)> {
    let s = s.trim().to_lowercase();
    let (left, right) = s
        .split_once('d')
        .ok_or_else(|| VesselsError::InvalidDice(format!("'{}', expected NdM like '2d6'", s)))?;
    let count: u32 = if left.is_empty() {
        1
    } else {
        left.parse()
            .map_err(|_| VesselsError::InvalidDice(format!("bad dice count in '{}'", s)))?
    };
    let die: u32 = right
        .parse()
        .map_err(|_| VesselsError::InvalidDice(format!("bad die size in '{}'", s)))?;
    if die == 0 {
        return Err(VesselsError::InvalidDice(format!(
            "die size must be positive in '{}'",
            s
        )));
    }
    Ok((count, die))
}

/// Minimal parser for `NdM[+/-B]`, e.g. `"2d6+3"`, `"1d8-1"`, `"d20"`.
pub fn parse_notation(expr: &str) -> VesselsResult<(u32, u32, i32)> {
    let expr: String = expr.trim().to_lowercase().replace(' ', "");
    let sign_pos = expr.rfind(['+', '-']);
    let (d_part, bonus) = match sign_pos {
        // a leading '-' would split an empty dice part; treat that as unparseable
        Some(0) | None => (expr.as_str(), 0),
        Some(pos) => {
            let bonus: i32 = expr[pos..]
                .parse()
                .map_err(|_| VesselsError::InvalidDice(format!("bad bonus in '{}'", expr)))?;
            (&expr[..pos], bonus)
        }
    };
    let (count, die) = parse_simple_d(d_part)?;
    Ok((count, die, bonus))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_ability_mod_matches_5e_table() {
        assert_eq!(ability_mod(10), 0);
        assert_eq!(ability_mod(11), 0);
        assert_eq!(ability_mod(12), 1);
        assert_eq!(ability_mod(8), -1);
        assert_eq!(ability_mod(9), -1);
        assert_eq!(ability_mod(20), 5);
        assert_eq!(ability_mod(1), -5);
    }

    #[test]
    fn test_d20_range_and_total() {
        let mut roller = Roller::seeded(1);
        for _ in 0..200 {
            let r = roller.roll_d20(3, 0);
            assert!((1..=20).contains(&r.used));
            assert_eq!(r.total, r.used + 3);
            assert!(r.second_d20.is_none());
        }
    }

    #[test]
    fn test_advantage_keeps_best_disadvantage_keeps_worst() {
        let mut roller = Roller::seeded(2);
        for _ in 0..200 {
            let adv = roller.roll_d20(0, 1);
            let b = adv.second_d20.expect("advantage rolls a second die");
            assert_eq!(adv.used, adv.d20.max(b));

            let dis = roller.roll_d20(0, -1);
            let b = dis.second_d20.expect("disadvantage rolls a second die");
            assert_eq!(dis.used, dis.d20.min(b));
        }
    }

    #[test]
    fn test_attack_nat1_always_misses_nat20_always_hits() {
        let mut roller = Roller::seeded(3);
        for _ in 0..500 {
            let r = roller.roll_attack(0, 10, 0, 20);
            if r.roll.used == 1 {
                assert!(!r.hit, "nat 1 must miss");
            }
            if r.roll.used == 20 {
                assert!(r.hit && r.crit, "nat 20 must crit");
            }
        }
    }

    #[test]
    fn test_attack_text_shape() {
        let mut roller = Roller::seeded(4);
        let r = roller.roll_attack(3, 12, 0, 20);
        assert!(r.text.starts_with("Attack: d20("));
        assert!(r.text.contains("vs AC 12"));
        assert!(r.text.contains("->"));
    }

    #[test]
    fn test_damage_double_dice_crit_rolls_twice() {
        let mut roller = Roller::seeded(5);
        let r = roller.roll_damage((2, 6), 1, true, CritRule::DoubleDice);
        assert_eq!(r.rolls.len(), 4);
        assert_eq!(r.total, r.rolls.iter().sum::<i32>() + 1);
        assert!(r.text.contains("(CRIT)"));
    }

    #[test]
    fn test_damage_double_total_crit() {
        let mut roller = Roller::seeded(6);
        let r = roller.roll_damage((1, 4), 2, true, CritRule::DoubleTotal);
        assert_eq!(r.rolls.len(), 1);
        assert_eq!(r.total, (r.rolls[0] + 2) * 2);
    }

    #[test]
    fn test_save_success_is_total_vs_dc() {
        let mut roller = Roller::seeded(7);
        for _ in 0..100 {
            let r = roller.roll_save(14, true, 2, 13, 0, 0);
            assert_eq!(r.success, r.total >= 13);
        }
    }

    #[test]
    fn test_check_applies_score_mod_and_dc() {
        let mut roller = Roller::seeded(8);
        for _ in 0..100 {
            // Score 16 -> +3, proficient +2
            let r = roller.roll_check(16, true, 2, Some(12), 0, 0);
            assert_eq!(r.total, r.roll.used + 5);
            assert_eq!(r.success, Some(r.total >= 12));
            assert!(r.text.starts_with("Check:"));
        }
        // No DC: no verdict
        let r = roller.roll_check(10, false, 2, None, 0, 0);
        assert_eq!(r.success, None);
        assert!(!r.text.contains("vs DC"));
    }

    #[test]
    fn test_roll_result_carries_kind_total_and_text() {
        let mut roller = Roller::seeded(9);
        let check = roller.roll_check_mod(2, Some(10), 0);
        let result = RollResult::Check(check.clone());
        assert_eq!(result.kind(), RollKind::Check);
        assert_eq!(result.total(), check.total);
        assert_eq!(result.text(), check.text);

        let attack = roller.roll_attack(3, 12, 0, 20);
        let result = RollResult::Attack(attack.clone());
        assert_eq!(result.kind(), RollKind::Attack);
        assert_eq!(result.total(), attack.total);
    }

    #[test]
    fn test_notation_parsing() {
        assert_eq!(parse_notation("2d6+3").unwrap(), (2, 6, 3));
        assert_eq!(parse_notation("1d8-1").unwrap(), (1, 8, -1));
        assert_eq!(parse_notation("d20").unwrap(), (1, 20, 0));
        assert!(parse_notation("banana").is_err());
        assert!(parse_notation("2d0").is_err());
    }

    #[test]
    fn test_seeded_rollers_are_reproducible() {
        let mut a = Roller::seeded(99);
        let mut b = Roller::seeded(99);
        for _ in 0..50 {
            assert_eq!(a.roll_d20(0, 0).used, b.roll_d20(0, 0).used);
        }
    }

    proptest! {
        #[test]
        fn prop_damage_within_dice_bounds(count in 1u32..6, die in 1u32..12, bonus in -3i32..6) {
            let mut roller = Roller::seeded(11);
            let r = roller.roll_damage((count, die), bonus, false, CritRule::DoubleDice);
            let min = count as i32 + bonus;
            let max = (count * die) as i32 + bonus;
            prop_assert!(r.total >= min && r.total <= max);
        }

        #[test]
        fn prop_notation_roundtrip(count in 1u32..9, die in 1u32..20, bonus in -9i32..9) {
            let expr = if bonus == 0 {
                format!("{}d{}", count, die)
            } else {
                format!("{}d{}{:+}", count, die, bonus)
            };
            prop_assert_eq!(parse_notation(&expr).unwrap(), (count, die, bonus));
        }
    }
}
