//! Navigation profile: the agent's size class and the link kinds it may use.
//!
//! Both travel with every path request so the path service can pick the
//! matching mesh and reject edges the agent cannot traverse.

use std::fmt;
use std::ops::{BitAnd, BitOr};

/// Size class of an agent.  Selects which nav meshes (and link profiles)
/// are eligible for it.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum NavSize {
    Small,
    #[default]
    Regular,
    Large,
}

impl NavSize {
    pub const ALL: [NavSize; 3] = [NavSize::Small, NavSize::Regular, NavSize::Large];

    pub fn as_str(self) -> &'static str {
        match self {
            NavSize::Small   => "small",
            NavSize::Regular => "regular",
            NavSize::Large   => "large",
        }
    }
}

impl fmt::Display for NavSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── LinkFlags ─────────────────────────────────────────────────────────────────

/// Bitmask of traversable link kinds.
///
/// On a path waypoint the flags describe the segment *leaving* that
/// waypoint; in a [`NavConfig`][crate::NavConfig] they describe what the
/// agent is allowed to use.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct LinkFlags(pub u16);

impl LinkFlags {
    pub const NONE:     LinkFlags = LinkFlags(0);
    pub const WALK:     LinkFlags = LinkFlags(1 << 0);
    pub const SWIM:     LinkFlags = LinkFlags(1 << 1);
    pub const JUMP:     LinkFlags = LinkFlags(1 << 2);
    pub const DROP:     LinkFlags = LinkFlags(1 << 3);
    pub const LEDGE:    LinkFlags = LinkFlags(1 << 4);
    pub const CLIMB:    LinkFlags = LinkFlags(1 << 5);
    pub const TELEPORT: LinkFlags = LinkFlags(1 << 6);
    pub const ALL:      LinkFlags = LinkFlags(0x7f);

    const NAMES: [(LinkFlags, &'static str); 7] = [
        (LinkFlags::WALK, "walk"),
        (LinkFlags::SWIM, "swim"),
        (LinkFlags::JUMP, "jump"),
        (LinkFlags::DROP, "drop"),
        (LinkFlags::LEDGE, "ledge"),
        (LinkFlags::CLIMB, "climb"),
        (LinkFlags::TELEPORT, "teleport"),
    ];

    #[inline]
    pub fn contains(self, other: LinkFlags) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn intersects(self, other: LinkFlags) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn with(self, other: LinkFlags) -> LinkFlags {
        LinkFlags(self.0 | other.0)
    }

    #[inline]
    pub fn without(self, other: LinkFlags) -> LinkFlags {
        LinkFlags(self.0 & !other.0)
    }
}

impl Default for LinkFlags {
    fn default() -> Self {
        LinkFlags::ALL
    }
}

impl BitOr for LinkFlags {
    type Output = LinkFlags;
    fn bitor(self, rhs: LinkFlags) -> LinkFlags {
        self.with(rhs)
    }
}

impl BitAnd for LinkFlags {
    type Output = LinkFlags;
    fn bitand(self, rhs: LinkFlags) -> LinkFlags {
        LinkFlags(self.0 & rhs.0)
    }
}

impl fmt::Display for LinkFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let mut first = true;
        for (flag, name) in LinkFlags::NAMES {
            if self.contains(flag) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}
