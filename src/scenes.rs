//! # Scene Management
//!
//! The overworld / battle / game-over flow. [`SceneManager`] owns everything
//! that outlives a single battle — the party, the bag, the world, loaded
//! assets and sounds — and moves the party in and out of [`BattleState`]s as
//! encounters come and go.
//!
//! `update` takes the frame clock and a precomputed [`BattleLayout`] instead
//! of reading the window itself, so the whole state flow runs headless in
//! tests; only `draw` touches the screen.

use crate::assets::AssetStore;
use crate::audio::{AudioBank, SFX_DICE_ROLL};
use crate::combat::party::{AbilityMods, Combatant, Party};
use crate::combat::resolver::{BattleEvent, BattleState};
use crate::combat::Side;
use crate::input::InputEvent;
use crate::items::Inventory;
use crate::rendering::{
    battle_layout, draw_combatant_panel, draw_message_log, draw_move_menu, draw_overworld,
    BattleLayout,
};
use crate::rolling::Roller;
use crate::world::Overworld;
use macroquad::prelude::*;

/// Which scene currently has the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneType {
    Overworld,
    Battle,
    GameOver,
}

/// Longest the battle log grows before old lines are dropped.
const LOG_CAP: usize = 40;

/// Owns the long-lived game state and routes each frame to the active scene.
pub struct SceneManager {
    scene: SceneType,
    assets: AssetStore,
    audio: AudioBank,
    world: Overworld,
    party: Party,
    inventory: Inventory,
    battle: Option<BattleState>,
    messages: Vec<String>,
    seed: u64,
}

fn starter_party() -> Party {
    let mut party = Party::new();
    let fighter = Combatant::new("Robin", "Fighter", 1, 24, 14).with_mods(AbilityMods {
        strength: 3,
        dexterity: 1,
        constitution: 2,
        ..AbilityMods::default()
    });
    let wizard = Combatant::new("Imri", "Wizard", 1, 16, 11).with_mods(AbilityMods {
        intelligence: 3,
        dexterity: 2,
        ..AbilityMods::default()
    });
    let cleric = Combatant::new("Sable", "Cleric", 1, 20, 13).with_mods(AbilityMods {
        wisdom: 3,
        constitution: 1,
        ..AbilityMods::default()
    });
    // A fresh party can never be full, these adds always land
    let _ = party.add(fighter);
    let _ = party.add(wizard);
    let _ = party.add(cleric);
    party
}

impl SceneManager {
    pub fn new(seed: u64) -> Self {
        Self {
            scene: SceneType::Overworld,
            assets: AssetStore::new(),
            audio: AudioBank::new(),
            world: Overworld::generate(seed),
            party: starter_party(),
            inventory: Inventory::starting(),
            battle: None,
            messages: vec!["Tall grass hides wild creatures. Tread carefully.".to_string()],
            seed,
        }
    }

    /// Loads sprites and sounds. Misses are tolerated, see the asset module.
    pub async fn load(&mut self) {
        self.assets.load_move_library().await;
        self.audio.load(SFX_DICE_ROLL).await;
    }

    pub fn scene(&self) -> SceneType {
        self.scene
    }

    pub fn party(&self) -> &Party {
        &self.party
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    fn push_message(&mut self, line: String) {
        self.messages.push(line);
        if self.messages.len() > LOG_CAP {
            let drop = self.messages.len() - LOG_CAP;
            self.messages.drain(..drop);
        }
    }

    /// Moves the party and bag into a new battle against `creature`.
    pub fn start_battle(&mut self, creature: Combatant) {
        if self.party.first_standing().is_none() {
            // Nobody can fight; don't hand an unwinnable party to a battle
            self.scene = SceneType::GameOver;
            return;
        }
        let party = std::mem::take(&mut self.party);
        let inventory = std::mem::take(&mut self.inventory);
        match BattleState::new(party, creature, inventory, Roller::new()) {
            Ok(battle) => {
                self.battle = Some(battle);
                self.scene = SceneType::Battle;
            }
            Err(e) => {
                // Nobody standing: straight to game over
                log::warn!("cannot start battle: {}", e);
                self.scene = SceneType::GameOver;
            }
        }
    }

    /// Steps the active scene one frame.
    pub fn update(&mut self, now: f64, dt: f32, events: &[InputEvent], layout: BattleLayout) {
        match self.scene {
            SceneType::Overworld => self.update_overworld(events),
            SceneType::Battle => self.update_battle(now, dt, events, layout),
            SceneType::GameOver => self.update_game_over(events),
        }
    }

    fn update_overworld(&mut self, events: &[InputEvent]) {
        for event in events {
            if let InputEvent::Step(dx, dy) = event {
                if let Some(encounter) = self.world.step(*dx, *dy) {
                    self.start_battle(encounter.creature);
                    return;
                }
            }
        }
    }

    fn update_battle(&mut self, now: f64, dt: f32, events: &[InputEvent], layout: BattleLayout) {
        let Some(battle) = self.battle.as_mut() else {
            self.scene = SceneType::Overworld;
            return;
        };

        let produced = battle.update(
            now,
            dt,
            events,
            Some(layout.ally_rect),
            Some(layout.enemy_rect),
            &self.assets,
        );

        let mut lost = false;
        let mut over = false;
        for event in produced {
            match event {
                BattleEvent::Sfx(key) => self.audio.play_sfx(key),
                BattleEvent::Message(line) => self.push_message(line),
                BattleEvent::Captured { name } => {
                    self.push_message(format!("{} was bound to a scroll!", name));
                }
                BattleEvent::Ended { victor } => {
                    over = true;
                    lost = victor == Side::Enemy;
                }
                BattleEvent::Fled => over = true,
            }
        }

        // Keep the scene up until the last roll is acknowledged and the
        // final animation lands, then tear down.
        if over || self.battle.as_ref().is_some_and(|b| b.is_over()) {
            if let Some(battle) = self.battle.as_ref() {
                if battle.feedback.is_showing() || battle.animation.is_active() {
                    return;
                }
            }
            if let Some(mut battle) = self.battle.take() {
                battle.teardown();
                let (party, inventory) = battle.into_spoils();
                self.party = party;
                self.inventory = inventory;
            }
            self.world.after_battle();
            if lost || self.party.is_defeated() {
                self.scene = SceneType::GameOver;
                self.push_message("The party has fallen.".to_string());
            } else {
                self.scene = SceneType::Overworld;
            }
        }
    }

    fn update_game_over(&mut self, events: &[InputEvent]) {
        let confirmed = events
            .iter()
            .any(|e| matches!(e, InputEvent::Confirm | InputEvent::Space));
        if !confirmed {
            return;
        }
        // New run on the same map seed: full heal, fresh bag
        for (_, member) in self.party.iter_mut() {
            member.heal(member.max_hp);
            member.buffs.clear();
        }
        self.inventory = Inventory::starting();
        self.world = Overworld::generate(self.seed);
        self.scene = SceneType::Overworld;
        self.push_message("A new dawn. The party stirs.".to_string());
    }

    /// Draws the active scene. The only place the window is touched.
    pub fn draw(&self) {
        clear_background(Color::new(0.08, 0.08, 0.10, 1.0));
        match self.scene {
            SceneType::Overworld => {
                draw_overworld(&self.world);
                draw_message_log(&self.messages);
            }
            SceneType::Battle => self.draw_battle(),
            SceneType::GameOver => {
                let msg = "The party has fallen. Press Enter.";
                let w = measure_text(msg, None, 32, 1.0).width;
                draw_text(
                    msg,
                    (screen_width() - w) / 2.0,
                    screen_height() / 2.0,
                    32.0,
                    RED,
                );
            }
        }
    }

    fn draw_battle(&self) {
        let Some(battle) = self.battle.as_ref() else {
            return;
        };
        let layout = battle_layout(screen_width(), screen_height());
        if let Some(ally) = battle.active(Side::Ally) {
            draw_combatant_panel(layout.ally_rect, ally, true);
        }
        if let Some(enemy) = battle.active(Side::Enemy) {
            draw_combatant_panel(layout.enemy_rect, enemy, false);
        }
        draw_move_menu(&battle.player_move_slots());
        draw_message_log(&self.messages);
        battle.animation.draw();
        battle.feedback.draw();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wild() -> Combatant {
        Combatant::new("Wild Ogre", "Ogre", 1, 12, 10)
    }

    fn layout() -> BattleLayout {
        battle_layout(800.0, 600.0)
    }

    #[test]
    fn test_starts_in_overworld_with_party() {
        let mgr = SceneManager::new(1);
        assert_eq!(mgr.scene(), SceneType::Overworld);
        assert_eq!(mgr.party().len(), 3);
    }

    #[test]
    fn test_start_battle_switches_scene() {
        let mut mgr = SceneManager::new(1);
        mgr.start_battle(wild());
        assert_eq!(mgr.scene(), SceneType::Battle);
        // The party moved into the battle
        assert!(mgr.party().is_empty());
    }

    #[test]
    fn test_fleeing_returns_to_overworld_with_party() {
        let mut mgr = SceneManager::new(1);
        // +30 DEX so the flee check cannot fail
        mgr.party.get_mut(0).unwrap().mods.dexterity = 30;
        mgr.start_battle(wild());

        let mut now = 0.0;
        for _ in 0..200 {
            let events = if mgr
                .battle
                .as_ref()
                .is_some_and(|b| b.feedback.is_showing())
            {
                vec![InputEvent::Confirm]
            } else {
                vec![InputEvent::Run]
            };
            mgr.update(now, 0.016, &events, layout());
            now += 0.016;
            if mgr.scene() == SceneType::Overworld {
                break;
            }
        }
        assert_eq!(mgr.scene(), SceneType::Overworld);
        assert_eq!(mgr.party().len(), 3);
        assert!(mgr.messages().iter().any(|m| m.contains("You fled!")));
    }

    #[test]
    fn test_game_over_reset_heals_party() {
        let mut mgr = SceneManager::new(1);
        for (_, member) in mgr.party.iter_mut() {
            member.apply_damage(999);
        }
        mgr.scene = SceneType::GameOver;
        mgr.update(0.0, 0.016, &[InputEvent::Confirm], layout());
        assert_eq!(mgr.scene(), SceneType::Overworld);
        assert!(mgr.party().iter().all(|(_, m)| m.is_standing()));
    }

    #[test]
    fn test_log_is_capped() {
        let mut mgr = SceneManager::new(1);
        for i in 0..200 {
            mgr.push_message(format!("line {}", i));
        }
        assert_eq!(mgr.messages().len(), LOG_CAP);
        assert!(mgr.messages().last().unwrap().contains("199"));
    }
}
