//! Identity newtypes.
//!
//! The engine never holds references to foreign entities, only these keys.
//! Heroes, items, quests, and enemies are resolved through the oracles once at
//! session start and copied into the session.

macro_rules! identity {
    ($(#[$meta:meta])* $name:ident($inner:ty), $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub $inner);

        impl $name {
            #[inline]
            pub const fn get(self) -> $inner {
                self.0
            }
        }

        impl From<$inner> for $name {
            fn from(value: $inner) -> Self {
                Self(value)
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

identity!(
    /// Combat session identity (aggregate root key).
    SessionId(u64),
    "session"
);
identity!(
    /// Owning player account.
    PlayerId(u32),
    "player"
);
identity!(HeroId(u32), "hero");
identity!(EnemyId(u32), "enemy");
identity!(QuestId(u32), "quest");
identity!(ItemId(u32), "item");
identity!(
    /// Party combo (class-composition synergy) identity.
    ComboId(u32),
    "combo"
);

/// Either side of an encounter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Combatant {
    Hero(HeroId),
    Enemy(EnemyId),
}

impl Combatant {
    pub const fn is_hero(&self) -> bool {
        matches!(self, Self::Hero(_))
    }

    /// Stable numeric key used when deriving roll seeds. Enemies occupy the
    /// upper half of the key space so they never collide with heroes.
    pub const fn seed_key(&self) -> u32 {
        match self {
            Self::Hero(id) => id.0 & 0x7fff_ffff,
            Self::Enemy(id) => id.0 | 0x8000_0000,
        }
    }
}

impl core::fmt::Display for Combatant {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Hero(id) => id.fmt(f),
            Self::Enemy(id) => id.fmt(f),
        }
    }
}
