//! The ability catalog and the two-stage weighted draw.
//!
//! Stage one picks a category from a fixed weight table; stage two picks
//! an ability among that category's candidates by per-ability weight.
//! Weights do not need to sum to 1 — each walk draws uniformly over the
//! summed weight and subtracts entry weights until the remainder drops
//! to zero or below.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// The five ability categories, walked in this fixed order during the
/// stage-one draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Attack,
    Buff,
    Debuff,
    Support,
    Blank,
}

/// One catalog entry. The gameplay magnitudes (damage, charges, heal
/// range, multiplier) are opaque payload here — the session core carries
/// them but never interprets them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ability {
    /// Short wire code; empty for the blank entry.
    pub code: &'static str,
    /// Selection weight within the category.
    pub weight: f64,
    pub category: Category,
    pub base_damage: u32,
    pub charges: u8,
    pub max_charges: u8,
    pub damage_multiplier: Option<u32>,
    /// Min/max health restored, for support abilities.
    pub heal_range: Option<(u32, u32)>,
}

const fn ability(
    code: &'static str,
    weight: f64,
    category: Category,
    base_damage: u32,
    charges: u8,
    max_charges: u8,
) -> Ability {
    Ability {
        code,
        weight,
        category,
        base_damage,
        charges,
        max_charges,
        damage_multiplier: None,
        heal_range: None,
    }
}

/// The full catalog, in draw order.
pub const CATALOG: &[Ability] = &[
    ability("la", 0.26, Category::Attack, 30, 1, 1),
    ability("bo", 0.26, Category::Attack, 40, 1, 1),
    ability("ai", 0.26, Category::Attack, 0, 1, 1),
    ability("sn", 0.26, Category::Attack, 50, 1, 1),
    ability("nu", 0.04, Category::Attack, 40, 1, 1),
    ability("ha", 0.2, Category::Buff, 15, 2, 3),
    ability("tr", 0.2, Category::Buff, 0, 2, 2),
    Ability {
        damage_multiplier: Some(2),
        ..ability("ra", 0.2, Category::Buff, 0, 2, 2)
    },
    ability("te", 0.2, Category::Buff, 0, 1, 1),
    ability("in", 0.2, Category::Buff, 0, 2, 2),
    ability("de", 0.3, Category::Debuff, 0, 1, 1),
    ability("mi", 0.4, Category::Debuff, 20, 1, 1),
    ability("fr", 0.3, Category::Debuff, 0, 1, 1),
    Ability {
        heal_range: Some((30, 50)),
        ..ability("he", 0.45, Category::Support, 0, 1, 1)
    },
    Ability {
        heal_range: Some((100, 100)),
        ..ability("li", 0.1, Category::Support, 0, 1, 1)
    },
    ability("sh", 0.45, Category::Support, 0, 1, 1),
    ability("", 1.0, Category::Blank, 0, 0, 0),
];

/// Stage-one weight table, walked in this order.
pub const CATEGORY_WEIGHTS: &[(Category, f64)] = &[
    (Category::Attack, 0.19),
    (Category::Buff, 0.19),
    (Category::Debuff, 0.19),
    (Category::Support, 0.19),
    (Category::Blank, 0.24),
];

/// Draws one ability code using the thread-local generator.
///
/// Returns the short code, or the empty string for the blank entry.
/// Stateless and reentrant.
pub fn draw() -> &'static str {
    draw_with(&mut rand::rng())
}

/// Draws one ability code from the given generator.
pub fn draw_with(rng: &mut impl Rng) -> &'static str {
    let category = draw_category(rng);
    let candidates: Vec<&Ability> = CATALOG
        .iter()
        .filter(|a| a.category == category)
        .collect();

    let total: f64 = candidates.iter().map(|a| a.weight).sum();
    let mut remainder = rng.random_range(0.0..total);

    for (i, candidate) in candidates.iter().enumerate() {
        // The last candidate absorbs whatever probability space is left,
        // so rounding can never leave the walk without a result.
        if i == candidates.len() - 1 {
            return candidate.code;
        }
        remainder -= candidate.weight;
        if remainder <= 0.0 {
            return candidate.code;
        }
    }
    unreachable!("every category has at least one catalog entry")
}

/// Stage one: pick a category by walking the fixed weight table.
fn draw_category(rng: &mut impl Rng) -> Category {
    let total: f64 = CATEGORY_WEIGHTS.iter().map(|(_, w)| w).sum();
    let mut remainder = rng.random_range(0.0..total);

    for (category, weight) in CATEGORY_WEIGHTS {
        remainder -= weight;
        if remainder <= 0.0 {
            return *category;
        }
    }
    // Only reachable through floating-point underflow on the final
    // subtraction; the last table entry takes it.
    CATEGORY_WEIGHTS[CATEGORY_WEIGHTS.len() - 1].0
}

/// Looks up a catalog entry by code.
pub fn by_code(code: &str) -> Option<&'static Ability> {
    CATALOG.iter().find(|a| a.code == code)
}
