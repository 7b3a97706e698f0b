//! Item rarity tiers and the damage scale they carry.

use serde::{Deserialize, Serialize};

use crate::constants::RARITY_STAR_SCALE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ItemRarity {
    Damaged,
    #[default]
    Common,
    Uncommon,
    Rare,
    Legendary,
}

impl ItemRarity {
    pub const ALL: [ItemRarity; 5] = [
        ItemRarity::Damaged,
        ItemRarity::Common,
        ItemRarity::Uncommon,
        ItemRarity::Rare,
        ItemRarity::Legendary,
    ];

    pub fn stars(self) -> u32 {
        match self {
            ItemRarity::Damaged => 1,
            ItemRarity::Common => 2,
            ItemRarity::Uncommon => 3,
            ItemRarity::Rare => 4,
            ItemRarity::Legendary => 5,
        }
    }

    /// Linear RGB used by the pickup widget glow.
    pub fn color(self) -> [f32; 3] {
        match self {
            ItemRarity::Damaged => [0.4, 0.4, 0.4],
            ItemRarity::Common => [0.9, 0.9, 0.9],
            ItemRarity::Uncommon => [0.2, 0.8, 0.2],
            ItemRarity::Rare => [0.2, 0.4, 1.0],
            ItemRarity::Legendary => [1.0, 0.55, 0.0],
        }
    }

    pub fn damage_multiplier(self) -> f32 {
        star_multiplier(self.stars())
    }
}

/// `1 + (stars - 1) * 0.15`; a one-star item is unscaled.
pub fn star_multiplier(stars: u32) -> f32 {
    1.0 + stars.saturating_sub(1) as f32 * RARITY_STAR_SCALE
}

/// One row of the rarity data table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RarityRow {
    pub rarity: ItemRarity,
    pub stars: u32,
    pub color: [f32; 3],
}

impl RarityRow {
    pub fn multiplier(&self) -> f32 {
        star_multiplier(self.stars)
    }
}

pub fn default_rarity_table() -> Vec<RarityRow> {
    ItemRarity::ALL
        .iter()
        .map(|&rarity| RarityRow {
            rarity,
            stars: rarity.stars(),
            color: rarity.color(),
        })
        .collect()
}
