//! Layered bonus stack for equipment and level bonuses.
//!
//! Application order: Flat → Increased (summed) → More → Less → Clamp.

/// A single bonus on one stat. Percentages are integers (20 = 20%).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Bonus {
    /// Added to the base before any percentage.
    Flat(i32),
    /// Summed with other increases, then applied once.
    Increased(i32),
    /// Applied individually: ×(1 + p/100).
    More(i32),
    /// Applied individually: ×(1 − p/100).
    Less(i32),
}

/// Bonuses collected for one stat.
///
/// ```
/// # use game_core::stats::{Bonus, BonusStack};
/// let mut stack = BonusStack::new();
/// stack.add(Bonus::Flat(5));
/// stack.add(Bonus::Increased(20));
/// stack.add(Bonus::Increased(15));
/// stack.add(Bonus::More(50));
/// stack.add(Bonus::Less(10));
/// // (10 + 5) × 1.35 × 1.5 × 0.9 = 27.3
/// assert_eq!(stack.apply(10, 0, 100), 27);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BonusStack {
    bonuses: Vec<Bonus>,
}

impl BonusStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, bonus: Bonus) {
        self.bonuses.push(bonus);
    }

    pub fn extend(&mut self, bonuses: impl IntoIterator<Item = Bonus>) {
        self.bonuses.extend(bonuses);
    }

    pub fn is_empty(&self) -> bool {
        self.bonuses.is_empty()
    }

    /// `clamp((base + flat) × (1 + inc/100) × Π more × Π less, min, max)`
    pub fn apply(&self, base: i32, min: i32, max: i32) -> i32 {
        let mut flat = 0i64;
        let mut increased = 0i64;
        for bonus in &self.bonuses {
            match bonus {
                Bonus::Flat(value) => flat += i64::from(*value),
                Bonus::Increased(pct) => increased += i64::from(*pct),
                Bonus::More(_) | Bonus::Less(_) => {}
            }
        }

        let mut value = (i64::from(base) + flat) * (100 + increased).max(0) / 100;
        for bonus in &self.bonuses {
            match bonus {
                Bonus::More(pct) => value = value * (100 + i64::from(*pct)).max(0) / 100,
                Bonus::Less(pct) => value = value * (100 - i64::from(*pct)).max(0) / 100,
                Bonus::Flat(_) | Bonus::Increased(_) => {}
            }
        }

        value.clamp(i64::from(min), i64::from(max)) as i32
    }
}

impl FromIterator<Bonus> for BonusStack {
    fn from_iter<T: IntoIterator<Item = Bonus>>(iter: T) -> Self {
        Self {
            bonuses: iter.into_iter().collect(),
        }
    }
}
