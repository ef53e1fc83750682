//! Team identification and per-team data storage.
//!
//! ## TeamId
//!
//! The battle is always fought between exactly two teams.
//!
//! ## TeamMap
//!
//! Fixed two-slot storage indexed by `TeamId`. Used for lives, scores and
//! bar fills so that nothing in the engine needs string-keyed lookups.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two competing teams.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamId {
    Team1,
    Team2,
}

impl TeamId {
    /// Both teams, in turn order.
    pub const ALL: [TeamId; 2] = [TeamId::Team1, TeamId::Team2];

    /// The opposing team.
    ///
    /// ```
    /// use interview_battle::core::TeamId;
    ///
    /// assert_eq!(TeamId::Team1.other(), TeamId::Team2);
    /// assert_eq!(TeamId::Team2.other(), TeamId::Team1);
    /// ```
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            TeamId::Team1 => TeamId::Team2,
            TeamId::Team2 => TeamId::Team1,
        }
    }

    /// Slot index (0 for team 1, 1 for team 2).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            TeamId::Team1 => 0,
            TeamId::Team2 => 1,
        }
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Team {}", self.index() + 1)
    }
}

/// Per-team data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use interview_battle::core::{TeamId, TeamMap};
///
/// let mut lives: TeamMap<u32> = TeamMap::with_value(5);
/// lives[TeamId::Team2] -= 1;
///
/// assert_eq!(lives[TeamId::Team1], 5);
/// assert_eq!(lives[TeamId::Team2], 4);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamMap<T> {
    pub team1: T,
    pub team2: T,
}

impl<T> TeamMap<T> {
    /// Create a map with values from a factory function.
    pub fn new(factory: impl Fn(TeamId) -> T) -> Self {
        Self {
            team1: factory(TeamId::Team1),
            team2: factory(TeamId::Team2),
        }
    }

    /// Create a map with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            team1: value.clone(),
            team2: value,
        }
    }

    #[must_use]
    pub fn get(&self, team: TeamId) -> &T {
        match team {
            TeamId::Team1 => &self.team1,
            TeamId::Team2 => &self.team2,
        }
    }

    pub fn get_mut(&mut self, team: TeamId) -> &mut T {
        match team {
            TeamId::Team1 => &mut self.team1,
            TeamId::Team2 => &mut self.team2,
        }
    }

    /// Iterate over (TeamId, &T) pairs in turn order.
    pub fn iter(&self) -> impl Iterator<Item = (TeamId, &T)> {
        [(TeamId::Team1, &self.team1), (TeamId::Team2, &self.team2)].into_iter()
    }

    /// Build a new map by transforming each entry.
    pub fn map<U>(&self, f: impl Fn(TeamId, &T) -> U) -> TeamMap<U> {
        TeamMap {
            team1: f(TeamId::Team1, &self.team1),
            team2: f(TeamId::Team2, &self.team2),
        }
    }
}

impl<T> Index<TeamId> for TeamMap<T> {
    type Output = T;

    fn index(&self, team: TeamId) -> &Self::Output {
        self.get(team)
    }
}

impl<T> IndexMut<TeamId> for TeamMap<T> {
    fn index_mut(&mut self, team: TeamId) -> &mut Self::Output {
        self.get_mut(team)
    }
}
