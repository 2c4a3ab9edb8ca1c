//! # Items Module
//!
//! Capture scrolls and the inventory that holds them. Each scroll carries a
//! flat DC adjustment for capture attempts; the Scroll of Eternity binds
//! automatically. Shop and bag presentation live outside the core.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The four capture scrolls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScrollKind {
    Command,
    Sealing,
    Subjugation,
    Eternity,
}

impl ScrollKind {
    /// Cheapest-first order, used when auto-picking a scroll in battle.
    pub const ALL: [ScrollKind; 4] = [
        ScrollKind::Command,
        ScrollKind::Sealing,
        ScrollKind::Subjugation,
        ScrollKind::Eternity,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ScrollKind::Command => "Scroll of Command",
            ScrollKind::Sealing => "Scroll of Sealing",
            ScrollKind::Subjugation => "Scroll of Subjugation",
            ScrollKind::Eternity => "Scroll of Eternity",
        }
    }

    /// Flat capture DC adjustment (negative = easier).
    pub fn dc_mod(self) -> i32 {
        match self {
            ScrollKind::Command => 2,
            ScrollKind::Sealing => 0,
            ScrollKind::Subjugation => -2,
            ScrollKind::Eternity => 0,
        }
    }

    /// The master scroll succeeds regardless of the roll.
    pub fn auto_success(self) -> bool {
        matches!(self, ScrollKind::Eternity)
    }
}

/// Scroll counts owned by the player.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    scrolls: HashMap<ScrollKind, u32>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// The default starting bag.
    pub fn starting() -> Self {
        let mut inv = Self::new();
        inv.add(ScrollKind::Command, 5);
        inv.add(ScrollKind::Sealing, 2);
        inv
    }

    pub fn count(&self, kind: ScrollKind) -> u32 {
        self.scrolls.get(&kind).copied().unwrap_or(0)
    }

    pub fn add(&mut self, kind: ScrollKind, amount: u32) {
        *self.scrolls.entry(kind).or_insert(0) += amount;
    }

    /// Consumes one scroll of `kind`. Returns false if none were left.
    pub fn take(&mut self, kind: ScrollKind) -> bool {
        match self.scrolls.get_mut(&kind) {
            Some(n) if *n > 0 => {
                *n -= 1;
                true
            }
            _ => false,
        }
    }

    /// The first scroll kind with stock, in cheapest-first order.
    pub fn first_available(&self) -> Option<ScrollKind> {
        ScrollKind::ALL.into_iter().find(|k| self.count(*k) > 0)
    }
}
