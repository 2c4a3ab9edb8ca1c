//! # Overworld Module
//!
//! A small walkable tile grid that produces wild encounters. The overworld is
//! deliberately thin: tiles, collision, and an encounter roll in tall grass.
//! Everything visual lives in the rendering module; this one is pure state
//! and fully headless.

use crate::combat::party::{AbilityMods, Combatant};
use crate::config::{ENCOUNTER_DIE, ENCOUNTER_GRACE_STEPS, OVERWORLD_HEIGHT, OVERWORLD_WIDTH};
use crate::rolling::Roller;
use serde::{Deserialize, Serialize};

/// One overworld tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tile {
    Grass,
    /// Where wild creatures lurk
    TallGrass,
    Rock,
    Water,
}

impl Tile {
    pub fn walkable(self) -> bool {
        matches!(self, Tile::Grass | Tile::TallGrass)
    }
}

/// A wild creature stepped up from the tall grass.
#[derive(Debug, Clone)]
pub struct WildEncounter {
    pub creature: Combatant,
}

/// Species table for wild spawns: name, class, base HP, AC.
const WILD_SPECIES: &[(&str, &str, i32, i32)] = &[
    ("Wild Ogre", "Ogre", 15, 11),
    ("Wild Owlbear", "Owlbear", 17, 13),
    ("Wild Golem", "Golem", 18, 14),
    ("Wild Nothic", "Nothic", 12, 12),
    ("Wild Myconid", "Myconid", 10, 10),
    ("Wild Beholder", "Beholder", 14, 13),
    ("Wild Dragon", "Dragon", 16, 14),
];

/// The walkable overworld grid and the player's position on it.
pub struct Overworld {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
    player: (i32, i32),
    /// Steps taken since the last encounter (or battle), for the grace window
    steps_since_encounter: u32,
    roller: Roller,
}

impl Overworld {
    /// Generates a deterministic map from a seed: bordered in rock, with
    /// scattered rocks, a pond, and tall-grass patches. The player starts at
    /// the center, which generation keeps clear.
    pub fn generate(seed: u64) -> Self {
        let (width, height) = (OVERWORLD_WIDTH, OVERWORLD_HEIGHT);
        let mut roller = Roller::seeded(seed);
        let mut tiles = vec![Tile::Grass; (width * height) as usize];

        let mut set = |tiles: &mut Vec<Tile>, x: i32, y: i32, tile: Tile| {
            if (0..width).contains(&x) && (0..height).contains(&y) {
                tiles[(y * width + x) as usize] = tile;
            }
        };

        for x in 0..width {
            set(&mut tiles, x, 0, Tile::Rock);
            set(&mut tiles, x, height - 1, Tile::Rock);
        }
        for y in 0..height {
            set(&mut tiles, 0, y, Tile::Rock);
            set(&mut tiles, width - 1, y, Tile::Rock);
        }

        // Tall-grass patches
        for _ in 0..6 {
            let cx = roller.roll_ndm(1, (width - 4) as u32) + 1;
            let cy = roller.roll_ndm(1, (height - 4) as u32) + 1;
            for dx in 0..3 {
                for dy in 0..3 {
                    set(&mut tiles, cx + dx, cy + dy, Tile::TallGrass);
                }
            }
        }

        // Scattered rocks and a small pond
        for _ in 0..10 {
            let x = roller.roll_ndm(1, (width - 2) as u32);
            let y = roller.roll_ndm(1, (height - 2) as u32);
            set(&mut tiles, x, y, Tile::Rock);
        }
        let px = roller.roll_ndm(1, (width - 5) as u32) + 1;
        let py = roller.roll_ndm(1, (height - 5) as u32) + 1;
        for dx in 0..2 {
            for dy in 0..2 {
                set(&mut tiles, px + dx, py + dy, Tile::Water);
            }
        }

        // Keep the spawn clear
        let player = (width / 2, height / 2);
        set(&mut tiles, player.0, player.1, Tile::Grass);

        log::info!("overworld generated from seed {}", seed);
        Self {
            width,
            height,
            tiles,
            player,
            steps_since_encounter: 0,
            roller,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn player(&self) -> (i32, i32) {
        self.player
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        (0..self.width).contains(&x) && (0..self.height).contains(&y)
    }

    /// The tile at (x, y); out of bounds reads as rock.
    pub fn tile(&self, x: i32, y: i32) -> Tile {
        if self.in_bounds(x, y) {
            self.tiles[(y * self.width + x) as usize]
        } else {
            Tile::Rock
        }
    }

    /// Resets the encounter grace window. Called when a battle ends so the
    /// player gets a few safe steps.
    pub fn after_battle(&mut self) {
        self.steps_since_encounter = 0;
    }

    /// Tries to walk one tile. Blocked moves are silent no-ops. A step that
    /// lands in tall grass past the grace window rolls the encounter die.
    pub fn step(&mut self, dx: i32, dy: i32) -> Option<WildEncounter> {
        let (nx, ny) = (self.player.0 + dx, self.player.1 + dy);
        if !self.tile(nx, ny).walkable() {
            return None;
        }
        self.player = (nx, ny);
        self.steps_since_encounter += 1;

        if self.tile(nx, ny) != Tile::TallGrass {
            return None;
        }
        if self.steps_since_encounter <= ENCOUNTER_GRACE_STEPS {
            return None;
        }
        if self.roller.roll_ndm(1, ENCOUNTER_DIE) != 1 {
            return None;
        }

        self.steps_since_encounter = 0;
        Some(self.spawn_wild())
    }

    /// Rolls up a wild creature from the species table.
    fn spawn_wild(&mut self) -> WildEncounter {
        let pick = self.roller.roll_ndm(1, WILD_SPECIES.len() as u32) as usize - 1;
        let (name, class, base_hp, ac) = WILD_SPECIES[pick];
        let level = self.roller.roll_ndm(1, 3) as u32;
        let hp = base_hp + 2 * (level as i32 - 1) + self.roller.roll_ndm(1, 4) - 2;
        let creature = Combatant::new(name, class, level, hp.max(1), ac).with_mods(AbilityMods {
            strength: 2,
            constitution: 1,
            ..AbilityMods::default()
        });
        log::debug!("wild encounter: {} (Lv {}, {} HP)", name, level, hp);
        WildEncounter { creature }
    }
}
