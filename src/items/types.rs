use serde::{Deserialize, Serialize};
use std::fmt;

/// Rarity tier of a collectible item. Totally ordered; Artifact is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    Common = 0,
    Rare = 1,
    Epic = 2,
    Legendary = 3,
    Artifact = 4,
}

impl Tier {
    /// All tiers in ascending order.
    pub const ALL: [Tier; 5] = [
        Tier::Common,
        Tier::Rare,
        Tier::Epic,
        Tier::Legendary,
        Tier::Artifact,
    ];

    /// Returns the display name for this tier.
    pub fn name(&self) -> &'static str {
        match self {
            Tier::Common => "Common",
            Tier::Rare => "Rare",
            Tier::Epic => "Epic",
            Tier::Legendary => "Legendary",
            Tier::Artifact => "Artifact",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Tier::Common => "⚪",
            Tier::Rare => "🔵",
            Tier::Epic => "🟣",
            Tier::Legendary => "🟡",
            Tier::Artifact => "🔴",
        }
    }

    /// Position in the total order, usable as a table index.
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Option<Tier> {
        Tier::ALL.get(index).copied()
    }

    /// The next tier up, or `None` for Artifact.
    pub fn next(&self) -> Option<Tier> {
        Tier::from_index(self.index() + 1)
    }

    pub fn is_terminal(&self) -> bool {
        self.next().is_none()
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u32);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Immutable catalog row. Owned by the catalog collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDefinition {
    pub id: ItemId,
    pub name: String,
    pub tier: Tier,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_active")]
    pub active: bool,
    /// Advisory: units issued to all players.
    #[serde(default)]
    pub total_issued: i64,
    /// Advisory: number of distinct holders.
    #[serde(default)]
    pub unique_holders: i64,
}

fn default_active() -> bool {
    true
}

impl ItemDefinition {
    pub fn new(id: u32, name: impl Into<String>, tier: Tier) -> Self {
        Self {
            id: ItemId(id),
            name: name.into(),
            tier,
            description: String::new(),
            active: true,
            total_issued: 0,
            unique_holders: 0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Short label such as "🟣 Storm Drake".
    pub fn label(&self) -> String {
        format!("{} {}", self.tier.emoji(), self.name)
    }
}
