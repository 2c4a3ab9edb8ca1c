//! # Asset Module
//!
//! Resolves class+level sprite keys (`"Wizard1"`) to textures. A miss is a
//! normal answer, not an error: the animation engine treats an absent sprite
//! as "no visual effect" and combat carries on.

use macroquad::prelude::*;
use std::collections::HashMap;

/// A loaded move sprite: the texture (absent in headless tests) plus its
/// natural size, which the pose math scales against.
#[derive(Clone)]
pub struct MoveSprite {
    pub texture: Option<Texture2D>,
    pub size: Vec2,
}

/// The seam between the animation engine and asset storage.
pub trait SpriteSource {
    /// Resolves a sprite key. `None` means not found; callers branch on
    /// presence rather than handling an error.
    fn sprite(&self, key: &str) -> Option<MoveSprite>;
}

/// Texture store keyed by sprite-asset name.
#[derive(Default)]
pub struct AssetStore {
    sprites: HashMap<String, MoveSprite>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a move sprite from `assets/moves/<key>.png`, caching the result.
    /// Missing files are logged at debug level and simply not inserted.
    pub async fn load_move_sprite(&mut self, key: &str) {
        if self.sprites.contains_key(key) {
            return;
        }
        let path = format!("assets/moves/{}.png", key);
        match load_texture(&path).await {
            Ok(texture) => {
                let size = vec2(texture.width(), texture.height());
                self.sprites.insert(
                    key.to_string(),
                    MoveSprite {
                        texture: Some(texture),
                        size,
                    },
                );
            }
            Err(e) => {
                log::debug!("move sprite '{}' not available: {}", path, e);
            }
        }
    }

    /// Pre-loads sprites for every move in the builtin library.
    pub async fn load_move_library(&mut self) {
        for mv in crate::combat::moves::library() {
            let (class, level) = crate::combat::animation::resolve_class_and_level(mv.id);
            if let Some(key) = crate::combat::animation::sprite_key(class, level) {
                self.load_move_sprite(&key).await;
            }
        }
        log::info!("loaded {} move sprites", self.sprites.len());
    }

    /// Inserts a sprite directly. Used by tests and procedural placeholders.
    pub fn insert(&mut self, key: &str, sprite: MoveSprite) {
        self.sprites.insert(key.to_string(), sprite);
    }
}

impl SpriteSource for AssetStore {
    fn sprite(&self, key: &str) -> Option<MoveSprite> {
        self.sprites.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_miss_is_none() {
        let store = AssetStore::new();
        assert!(store.sprite("Wizard1").is_none());
    }

    #[test]
    fn test_insert_then_hit() {
        let mut store = AssetStore::new();
        store.insert(
            "Wizard1",
            MoveSprite {
                texture: None,
                size: vec2(32.0, 48.0),
            },
        );
        let sprite = store.sprite("Wizard1").expect("inserted sprite resolves");
        assert_eq!(sprite.size, vec2(32.0, 48.0));
    }
}
