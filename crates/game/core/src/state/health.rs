/// Current and maximum health of one combatant.
///
/// `current` is always within `[0, max]`; every mutation saturates at the bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HealthPool {
    current: u32,
    max: u32,
}

impl HealthPool {
    /// Creates a pool filled to `max`.
    pub const fn full(max: u32) -> Self {
        Self { current: max, max }
    }

    /// Creates a pool, clamping `current` into `[0, max]`.
    pub fn new(current: u32, max: u32) -> Self {
        Self {
            current: current.min(max),
            max,
        }
    }

    #[inline]
    pub const fn current(&self) -> u32 {
        self.current
    }

    #[inline]
    pub const fn max(&self) -> u32 {
        self.max
    }

    #[inline]
    pub const fn is_depleted(&self) -> bool {
        self.current == 0
    }

    /// Health still missing from full.
    pub const fn missing(&self) -> u32 {
        self.max - self.current
    }

    /// Subtracts damage, flooring at zero. Returns the amount actually removed.
    pub fn damage(&mut self, amount: u32) -> u32 {
        let before = self.current;
        self.current = crate::combat::apply_damage(self.current, amount);
        before - self.current
    }

    /// Adds healing, capped at `max`. Returns the amount actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.current;
        self.current = crate::combat::apply_healing(self.current, amount, self.max);
        self.current - before
    }

    /// Returns true when `current / max` is strictly below `percent`%.
    pub fn is_below_percent(&self, percent: u8) -> bool {
        u64::from(self.current) * 100 < u64::from(percent) * u64::from(self.max)
    }
}
