//! # Battle Resolver
//!
//! The turn state machine for one battle. A [`BattleState`] owns the dice
//! [`Roller`], the [`MoveAnimation`] engine, and the [`RollTextbox`], and is
//! stepped once per frame by [`BattleState::update`] with the frame clock and
//! this frame's input events.
//!
//! Resolution is staged: each roll becomes a pending step whose breakdown
//! text must be shown (and dismissed) in the textbox before its outcome —
//! damage, healing, a buff, a capture — lands on the parties. Turn order
//! never advances while the textbox is showing or an animation is in flight,
//! so the player always sees every roll.
//!
//! `update` returns [`BattleEvent`]s instead of touching audio or scene state
//! directly, which keeps the whole resolver runnable in headless tests.

use crate::assets::SpriteSource;
use crate::combat::animation::MoveAnimation;
use crate::combat::buffs::{Buff, BuffStat};
use crate::combat::capture::{attempt_capture, CaptureContext};
use crate::combat::moves::{moves_for_class, Move, MoveEffect, TargetSelector, BONK};
use crate::combat::party::{Combatant, Party};
use crate::combat::type_chart;
use crate::combat::Side;
use crate::config::FLEE_DC;
use crate::input::InputEvent;
use crate::items::Inventory;
use crate::rolling::textbox::RollTextbox;
use crate::rolling::{CritRule, RollResult, Roller};
use crate::{VesselsError, VesselsResult};
use macroquad::prelude::Rect;
use std::collections::{HashMap, VecDeque};

/// What the player asked the battle to do this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleCommand {
    /// Use the move in slot `n` of the active ally's kit
    UseMove(usize),
    /// Throw the best available capture scroll
    Capture,
    /// Flee the battle
    Run,
}

/// Something the outside world should react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BattleEvent {
    /// Play a sound effect by key
    Sfx(&'static str),
    /// A line for the battle log
    Message(String),
    /// The battle is over and one side won
    Ended { victor: Side },
    /// A wild creature was captured and joined the party
    Captured { name: String },
    /// The player fled
    Fled,
}

/// Coarse battle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattlePhase {
    /// Waiting on a player command
    PlayerTurn,
    /// A turn's steps are still playing out
    Resolving,
    /// The enemy acts as soon as the scene is idle
    EnemyTurn,
    /// Over. `victor` is `None` when the player fled.
    Finished { victor: Option<Side> },
}

/// What a dismissed roll step does to the parties.
enum Outcome {
    None,
    Damage { side: Side, amount: i32 },
    Heal { side: Side, amount: i32 },
    Buff { side: Side, buff: Buff },
    Capture { success: bool },
    Flee { success: bool },
}

/// What a step puts in the textbox: a published roll, or a plain line.
enum StepDisplay {
    Roll(RollResult),
    Note(String),
}

/// One staged resolution step: shown first, outcome applied on dismissal.
struct PendingStep {
    display: StepDisplay,
    /// Whether showing this step plays the dice sound
    sfx: bool,
    outcome: Outcome,
}

impl PendingStep {
    fn roll(result: RollResult, outcome: Outcome) -> Self {
        Self {
            display: StepDisplay::Roll(result),
            sfx: true,
            outcome,
        }
    }

    /// A dice line that is not one of the four tagged roll kinds (heal
    /// totals, capture attempts). Still plays the dice sound.
    fn dice(text: String, outcome: Outcome) -> Self {
        Self {
            display: StepDisplay::Note(text),
            sfx: true,
            outcome,
        }
    }

    fn note(text: String, outcome: Outcome) -> Self {
        Self {
            display: StepDisplay::Note(text),
            sfx: false,
            outcome,
        }
    }
}

/// One battle between the player's party and a wild creature.
pub struct BattleState {
    allies: Party,
    enemies: Party,
    active_ally: usize,
    active_enemy: usize,
    inventory: Inventory,
    phase: BattlePhase,
    /// Acting order decided by initiative, index 0 acts first each round
    order: [Side; 2],
    turn_idx: usize,
    round: u32,
    roller: Roller,
    pub animation: MoveAnimation,
    pub feedback: RollTextbox,
    queue: VecDeque<PendingStep>,
    /// The step currently showing in the textbox
    current: Option<PendingStep>,
    /// Remaining PP per side and move id; absent means full
    pp: HashMap<(Side, &'static str), u32>,
    /// Events raised outside `update` (initiative, construction), drained
    /// at the start of the next `update`
    pending_events: Vec<BattleEvent>,
}

impl BattleState {
    /// Starts a battle against one wild creature and rolls initiative.
    ///
    /// Fails when the party has nobody standing.
    pub fn new(
        allies: Party,
        wild: Combatant,
        inventory: Inventory,
        mut roller: Roller,
    ) -> VesselsResult<Self> {
        let active_ally = allies
            .first_standing()
            .ok_or_else(|| VesselsError::InvalidState("battle with no standing ally".into()))?;

        let wild_name = wild.name.clone();
        let wild_level = wild.level;
        let ally_bonus = allies
            .get(active_ally)
            .map(|c| c.initiative_bonus())
            .unwrap_or(0);
        let enemy_bonus = wild.initiative_bonus();

        let ally_init = roller.roll_d20(ally_bonus, 0).total;
        let enemy_init = roller.roll_d20(enemy_bonus, 0).total;
        // Ties go to the player
        let order = if ally_init >= enemy_init {
            [Side::Ally, Side::Enemy]
        } else {
            [Side::Enemy, Side::Ally]
        };
        let phase = match order[0] {
            Side::Ally => BattlePhase::PlayerTurn,
            Side::Enemy => BattlePhase::EnemyTurn,
        };

        let pending_events = vec![
            BattleEvent::Message(format!("A wild {} (Lv {}) appeared!", wild_name, wild_level)),
            BattleEvent::Message(format!(
                "Initiative: {} vs {} - {} act first!",
                ally_init,
                enemy_init,
                match order[0] {
                    Side::Ally => "you",
                    Side::Enemy => "they",
                }
            )),
        ];
        log::info!(
            "battle started vs {} (initiative {} vs {})",
            wild_name,
            ally_init,
            enemy_init
        );

        Ok(Self {
            allies,
            enemies: Party::wild(wild),
            active_ally,
            active_enemy: 0,
            inventory,
            phase,
            order,
            turn_idx: 0,
            round: 1,
            roller,
            animation: MoveAnimation::new(),
            feedback: RollTextbox::new(),
            queue: VecDeque::new(),
            current: None,
            pp: HashMap::new(),
            pending_events,
        })
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn allies(&self) -> &Party {
        &self.allies
    }

    pub fn enemies(&self) -> &Party {
        &self.enemies
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// The acting combatant of a side, if any slot is active.
    pub fn active(&self, side: Side) -> Option<&Combatant> {
        match side {
            Side::Ally => self.allies.get(self.active_ally),
            Side::Enemy => self.enemies.get(self.active_enemy),
        }
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, BattlePhase::Finished { .. })
    }

    /// The active ally's move kit with remaining PP per slot.
    pub fn player_move_slots(&self) -> Vec<(&'static Move, u32)> {
        let Some(ally) = self.active(Side::Ally) else {
            return Vec::new();
        };
        moves_for_class(&ally.class_name)
            .into_iter()
            .map(|m| (m, self.pp_remaining(Side::Ally, m)))
            .collect()
    }

    fn pp_remaining(&self, side: Side, mv: &'static Move) -> u32 {
        self.pp.get(&(side, mv.id)).copied().unwrap_or(mv.max_pp)
    }

    /// Force-clears the textbox and animation. Unapplied steps are dropped.
    /// Called on scene teardown so nothing leaks into the next battle.
    pub fn teardown(&mut self) {
        self.animation.cancel();
        self.feedback.dismiss();
        self.queue.clear();
        self.current = None;
    }

    /// Hands the party and bag back when the battle is done.
    pub fn into_spoils(self) -> (Party, Inventory) {
        (self.allies, self.inventory)
    }

    /// Steps the battle one frame.
    ///
    /// `now` is the frame clock in seconds, `dt` the frame delta. The side
    /// rectangles feed the animation pose math; `None` (headless) cancels any
    /// in-flight animation. Input events are offered to the textbox first —
    /// while it is showing it consumes everything, so no command can slip
    /// past an unacknowledged roll.
    pub fn update(
        &mut self,
        now: f64,
        dt: f32,
        events: &[InputEvent],
        ally_rect: Option<Rect>,
        enemy_rect: Option<Rect>,
        sprites: &dyn SpriteSource,
    ) -> Vec<BattleEvent> {
        let mut out = std::mem::take(&mut self.pending_events);

        self.feedback.advance(dt);
        let mut command = None;
        for event in events {
            if self.feedback.handle_event(event) {
                continue;
            }
            let cmd = match event {
                InputEvent::MoveSlot(slot) => Some(BattleCommand::UseMove(*slot)),
                InputEvent::Capture => Some(BattleCommand::Capture),
                InputEvent::Run => Some(BattleCommand::Run),
                _ => None,
            };
            if command.is_none() {
                command = cmd;
            }
        }

        let animating = self.animation.tick(now, ally_rect, enemy_rect);

        if !self.feedback.is_showing() {
            if let Some(step) = self.current.take() {
                self.apply_outcome(step.outcome, &mut out);
            }
            if let Some(step) = self.queue.pop_front() {
                if step.sfx {
                    out.push(BattleEvent::Sfx(crate::audio::SFX_DICE_ROLL));
                }
                match &step.display {
                    StepDisplay::Roll(result) => self.feedback.show_roll(result),
                    StepDisplay::Note(text) => self.feedback.show(text),
                }
                self.current = Some(step);
            } else if !animating {
                match self.phase {
                    BattlePhase::Resolving => self.advance_turn(&mut out),
                    BattlePhase::EnemyTurn => {
                        self.enemy_act(now, sprites, &mut out);
                        self.phase = BattlePhase::Resolving;
                    }
                    BattlePhase::PlayerTurn => {
                        if let Some(cmd) = command {
                            self.execute_command(cmd, now, sprites, &mut out);
                        }
                    }
                    BattlePhase::Finished { .. } => {}
                }
            }
        }

        out
    }

    fn execute_command(
        &mut self,
        cmd: BattleCommand,
        now: f64,
        sprites: &dyn SpriteSource,
        out: &mut Vec<BattleEvent>,
    ) {
        match cmd {
            BattleCommand::UseMove(slot) => {
                let kit = self
                    .active(Side::Ally)
                    .map(|a| moves_for_class(&a.class_name))
                    .unwrap_or_default();
                let Some(&mv) = kit.get(slot) else {
                    out.push(BattleEvent::Message("No move in that slot.".into()));
                    return;
                };
                if self.pp_remaining(Side::Ally, mv) == 0 {
                    out.push(BattleEvent::Message(format!("{} is out of PP!", mv.label)));
                    return;
                }
                self.execute_move(Side::Ally, mv, now, sprites, out);
                self.phase = BattlePhase::Resolving;
            }
            BattleCommand::Capture => {
                let Some(kind) = self.inventory.first_available() else {
                    out.push(BattleEvent::Message("No capture scrolls left!".into()));
                    return;
                };
                let Some(target) = self.active(Side::Enemy) else {
                    return;
                };
                let ctx = CaptureContext {
                    level: target.level,
                    max_hp: target.max_hp,
                    cur_hp: target.hp,
                    dc_mod: kind.dc_mod(),
                    auto_success: kind.auto_success(),
                    capture_bonus: 0,
                    advantage: 0,
                };
                self.inventory.take(kind);
                out.push(BattleEvent::Message(format!("You hurl a {}!", kind.label())));
                let outcome = attempt_capture(&mut self.roller, &ctx);
                let success = outcome.success;
                self.queue.push_back(PendingStep::dice(
                    outcome.text,
                    Outcome::Capture { success },
                ));
                self.phase = BattlePhase::Resolving;
            }
            BattleCommand::Run => {
                // Getting away is a DEX check, not a guarantee
                let dex = self
                    .active(Side::Ally)
                    .map(|a| a.mods.dexterity)
                    .unwrap_or(0);
                let check = self.roller.roll_check_mod(dex, Some(FLEE_DC), 0);
                let success = check.success.unwrap_or(false);
                self.queue.push_back(PendingStep::roll(
                    RollResult::Check(check),
                    Outcome::Flee { success },
                ));
                self.phase = BattlePhase::Resolving;
            }
        }
    }

    /// Rolls one move and queues its resolution steps.
    fn execute_move(
        &mut self,
        side: Side,
        mv: &'static Move,
        now: f64,
        sprites: &dyn SpriteSource,
        out: &mut Vec<BattleEvent>,
    ) {
        let target_side = match mv.target {
            TargetSelector::SelfSide => side,
            TargetSelector::Enemy => side.opposite(),
        };
        let (attacker_name, attacker_class, attack_bonus, damage_bonus, save_dc, ability_bonus) = {
            let Some(a) = self.active(side) else { return };
            (
                a.name.clone(),
                a.class_name.clone(),
                a.attack_bonus(mv.ability),
                a.damage_bonus(mv.ability),
                a.save_dc(mv.ability),
                a.mods.get(mv.ability),
            )
        };
        let (target_ac, target_save_mod, target_class) = {
            let Some(t) = self.active(target_side) else {
                return;
            };
            (
                t.effective_ac(),
                t.mods.get(mv.save_ability),
                t.class_name.clone(),
            )
        };

        if mv.max_pp != u32::MAX {
            let left = self.pp.entry((side, mv.id)).or_insert(mv.max_pp);
            *left = left.saturating_sub(1);
        }

        out.push(BattleEvent::Message(format!(
            "{} used {}!",
            attacker_name, mv.label
        )));
        self.animation.start(target_side, mv.id, sprites, now);

        match mv.effect {
            MoveEffect::Damage => {
                if mv.to_hit {
                    let attack = self.roller.roll_attack(attack_bonus, target_ac, 0, 20);
                    let hit = attack.hit;
                    let crit = attack.crit;
                    self.queue
                        .push_back(PendingStep::roll(RollResult::Attack(attack), Outcome::None));
                    if hit {
                        self.queue_damage_step(
                            mv,
                            damage_bonus,
                            crit,
                            target_side,
                            &attacker_class,
                            &target_class,
                            out,
                        );
                    }
                } else {
                    let save = self.roller.roll_save_mod(target_save_mod, save_dc, 0);
                    let failed = !save.success;
                    self.queue
                        .push_back(PendingStep::roll(RollResult::Save(save), Outcome::None));
                    if failed {
                        self.queue_damage_step(
                            mv,
                            damage_bonus,
                            false,
                            target_side,
                            &attacker_class,
                            &target_class,
                            out,
                        );
                    }
                }
            }
            MoveEffect::Heal => {
                let (sum, rolls) = self.roller.roll_dice(mv.dice.0, mv.dice.1);
                let total = (sum + ability_bonus).max(0);
                let text = format!(
                    "Heal: {}d{} rolls {:?} {:+} = {}",
                    mv.dice.0, mv.dice.1, rolls, ability_bonus, total
                );
                self.queue.push_back(PendingStep::dice(
                    text,
                    Outcome::Heal {
                        side: target_side,
                        amount: total,
                    },
                ));
            }
            MoveEffect::Buff {
                stat,
                magnitude,
                turns,
            } => {
                let buff = Buff::new(mv.label, stat, magnitude, turns, &attacker_name);
                let text = format!(
                    "{}: {:+} {} for {} turns",
                    mv.label,
                    magnitude,
                    stat_label(stat),
                    turns
                );
                self.queue.push_back(PendingStep::note(
                    text,
                    Outcome::Buff {
                        side: target_side,
                        buff,
                    },
                ));
            }
        }
    }

    /// Rolls damage for a connected move, applies the class type chart, and
    /// queues the resulting step. The shown line carries the raw roll; the
    /// multiplier lands on the applied amount and is reported separately.
    #[allow(clippy::too_many_arguments)]
    fn queue_damage_step(
        &mut self,
        mv: &'static Move,
        damage_bonus: i32,
        crit: bool,
        target_side: Side,
        attacker_class: &str,
        target_class: &str,
        out: &mut Vec<BattleEvent>,
    ) {
        let damage = self
            .roller
            .roll_damage(mv.dice, damage_bonus, crit, CritRule::DoubleDice);
        let multiplier = type_chart::move_damage_type(mv.id, attacker_class)
            .map(|t| type_chart::effectiveness(t, target_class))
            .unwrap_or(1.0);
        let amount = type_chart::scale_damage(damage.total, multiplier);
        if multiplier > 1.0 {
            out.push(BattleEvent::Message("It's super effective! (2x)".into()));
        } else if multiplier < 1.0 {
            out.push(BattleEvent::Message(
                "It's not very effective... (0.5x)".into(),
            ));
        }
        self.queue.push_back(PendingStep::roll(
            RollResult::Damage(damage),
            Outcome::Damage {
                side: target_side,
                amount,
            },
        ));
    }

    fn enemy_act(&mut self, now: f64, sprites: &dyn SpriteSource, out: &mut Vec<BattleEvent>) {
        let Some(enemy) = self.active(Side::Enemy) else {
            return;
        };
        let class = enemy.class_name.clone();
        let usable: Vec<&'static Move> = moves_for_class(&class)
            .into_iter()
            .filter(|m| self.pp_remaining(Side::Enemy, m) > 0)
            .collect();
        let mv = if usable.is_empty() {
            &BONK
        } else {
            let idx = self.roller.roll_ndm(1, usable.len() as u32) as usize - 1;
            usable[idx]
        };
        self.execute_move(Side::Enemy, mv, now, sprites, out);
    }

    /// Applies a dismissed step's outcome to the parties.
    fn apply_outcome(&mut self, outcome: Outcome, out: &mut Vec<BattleEvent>) {
        match outcome {
            Outcome::None => {}
            Outcome::Damage { side, amount } => {
                let (name, fainted) = match self.active_mut(side) {
                    Some(target) => (target.name.clone(), target.apply_damage(amount)),
                    None => return,
                };
                if fainted {
                    out.push(BattleEvent::Message(format!("{} fainted!", name)));
                    self.handle_faint(side, out);
                }
            }
            Outcome::Heal { side, amount } => {
                if let Some(target) = self.active_mut(side) {
                    target.heal(amount);
                    let name = target.name.clone();
                    out.push(BattleEvent::Message(format!(
                        "{} recovered {} HP!",
                        name, amount
                    )));
                }
            }
            Outcome::Buff { side, buff } => {
                if let Some(target) = self.active_mut(side) {
                    let name = target.name.clone();
                    let label = buff.name.clone();
                    target.buffs.push(buff);
                    out.push(BattleEvent::Message(format!("{} gained {}!", name, label)));
                }
            }
            Outcome::Capture { success } => self.apply_capture(success, out),
            Outcome::Flee { success } => {
                if success {
                    out.push(BattleEvent::Message("You fled!".into()));
                    out.push(BattleEvent::Fled);
                    self.phase = BattlePhase::Finished { victor: None };
                } else {
                    // The turn is spent; the enemy gets its go
                    out.push(BattleEvent::Message("Couldn't get away!".into()));
                }
            }
        }
    }

    fn apply_capture(&mut self, success: bool, out: &mut Vec<BattleEvent>) {
        let Some(target) = self.enemies.get(self.active_enemy) else {
            return;
        };
        let name = target.name.clone();
        if !success {
            out.push(BattleEvent::Message(format!("{} broke free!", name)));
            return;
        }
        if self.allies.is_full() {
            // The scroll worked but there is nowhere to put the creature
            out.push(BattleEvent::Message(format!(
                "The party is full! {} slipped away from the scroll!",
                name
            )));
            return;
        }
        if let Some(creature) = self.enemies.remove(self.active_enemy) {
            // add cannot fail here, fullness was just checked
            let _ = self.allies.add(creature);
        }
        out.push(BattleEvent::Captured { name: name.clone() });
        out.push(BattleEvent::Message(format!("{} joined the party!", name)));
        self.finish(Side::Ally, out);
    }

    fn handle_faint(&mut self, side: Side, out: &mut Vec<BattleEvent>) {
        let party = match side {
            Side::Ally => &self.allies,
            Side::Enemy => &self.enemies,
        };
        match party.first_standing() {
            None => {
                self.finish(side.opposite(), out);
            }
            Some(next) => match side {
                Side::Ally => {
                    self.active_ally = next;
                    let name = self.allies.get(next).map(|c| c.name.clone());
                    if let Some(name) = name {
                        out.push(BattleEvent::Message(format!("Go, {}!", name)));
                    }
                }
                Side::Enemy => {
                    self.active_enemy = next;
                }
            },
        }
    }

    fn finish(&mut self, victor: Side, out: &mut Vec<BattleEvent>) {
        if self.is_over() {
            return;
        }
        self.phase = BattlePhase::Finished {
            victor: Some(victor),
        };
        log::info!("battle over, victor: {:?}", victor);
        out.push(BattleEvent::Ended { victor });
    }

    /// Hands the turn to the next side in initiative order. A full wrap
    /// counts a round and ages every standing combatant's buffs.
    fn advance_turn(&mut self, out: &mut Vec<BattleEvent>) {
        if self.is_over() {
            return;
        }
        self.turn_idx = (self.turn_idx + 1) % self.order.len();
        if self.turn_idx == 0 {
            self.round += 1;
            let mut expired = Vec::new();
            for party in [&mut self.allies, &mut self.enemies] {
                for (_, combatant) in party.iter_mut() {
                    if !combatant.is_standing() {
                        continue;
                    }
                    let name = combatant.name.clone();
                    for buff in combatant.tick_buffs() {
                        expired.push(format!("{}'s {} wore off.", name, buff));
                    }
                }
            }
            for line in expired {
                out.push(BattleEvent::Message(line));
            }
        }
        self.phase = match self.order[self.turn_idx] {
            Side::Ally => BattlePhase::PlayerTurn,
            Side::Enemy => BattlePhase::EnemyTurn,
        };
    }

    fn active_mut(&mut self, side: Side) -> Option<&mut Combatant> {
        match side {
            Side::Ally => self.allies.get_mut(self.active_ally),
            Side::Enemy => self.enemies.get_mut(self.active_enemy),
        }
    }
}

fn stat_label(stat: BuffStat) -> &'static str {
    match stat {
        BuffStat::Ac => "AC",
        BuffStat::AttackBonus => "attack",
        BuffStat::DamageBonus => "damage",
        BuffStat::Initiative => "initiative",
    }
}
