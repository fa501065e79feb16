//! Default milestone catalog.

use super::types::{Category, Condition, Difficulty, MilestoneDefinition, MilestoneId, Reward};
use crate::items::Tier;
use Category::*;
use Condition as C;
use Difficulty as D;

struct Row {
    name: &'static str,
    description: &'static str,
    icon: &'static str,
    category: Category,
    condition: Condition,
    threshold: u64,
    coins: u64,
    experience: u64,
    difficulty: Difficulty,
    points: u64,
    hidden: bool,
}

#[allow(clippy::too_many_arguments)]
const fn row(
    name: &'static str,
    description: &'static str,
    icon: &'static str,
    category: Category,
    condition: Condition,
    threshold: u64,
    coins: u64,
    experience: u64,
    difficulty: Difficulty,
    points: u64,
) -> Row {
    Row {
        name,
        description,
        icon,
        category,
        condition,
        threshold,
        coins,
        experience,
        difficulty,
        points,
        hidden: false,
    }
}

const fn hidden(mut r: Row) -> Row {
    r.hidden = true;
    r
}

#[rustfmt::skip]
const ROWS: &[Row] = &[
    // ═══════════════════════════════════════════════════════════════
    // COLLECTION
    // ═══════════════════════════════════════════════════════════════
    row("First Card", "Receive your first item", "🎴", Collection, C::TotalItems, 1, 25, 10, D::Easy, 5),
    row("Collector", "Own 10 items", "📚", Collection, C::TotalItems, 10, 100, 50, D::Normal, 15),
    row("Master Collector", "Own 50 items", "🏆", Collection, C::TotalItems, 50, 500, 200, D::Hard, 30),
    row("Collection Legend", "Own 100 items", "👑", Collection, C::TotalItems, 100, 1000, 500, D::Legendary, 50),
    row("Rare Find", "Own a Rare item", "🔵", Collection, C::ItemsOfTier { tier: Tier::Rare }, 1, 50, 25, D::Normal, 10),
    row("Epic Collector", "Own an Epic item", "🟣", Collection, C::ItemsOfTier { tier: Tier::Epic }, 1, 150, 75, D::Hard, 20),
    row("Legend Hunter", "Own a Legendary item", "🟡", Collection, C::ItemsOfTier { tier: Tier::Legendary }, 1, 300, 150, D::Hard, 35),
    row("Artifact Master", "Own an Artifact item", "🔴", Collection, C::ItemsOfTier { tier: Tier::Artifact }, 1, 1000, 500, D::Legendary, 100),
    row("Hoarder", "Own 500 items", "🔥", Collection, C::TotalItems, 500, 2000, 1000, D::Legendary, 100),
    row("Twins and More", "Hold 10 copies of one item", "👥", Collection, C::MaxDuplicates, 10, 500, 200, D::Normal, 25),
    row("Copy Machine", "Hold 50 copies of one item", "🔄", Collection, C::MaxDuplicates, 50, 2000, 800, D::Hard, 75),
    row("Rainbow", "Hold 20 items of every tier", "🌈", Collection, C::AllTiersOwned, 20, 1500, 800, D::Hard, 80),
    row("Completionist", "Own every item in the catalog", "📖", Collection, C::CompleteCatalog, 1, 5000, 2000, D::Legendary, 200),
    // ═══════════════════════════════════════════════════════════════
    // ECONOMY
    // ═══════════════════════════════════════════════════════════════
    row("Well Off", "Hold 1,000 coins", "💰", Economy, C::CoinBalance, 1000, 0, 100, D::Normal, 15),
    row("Wealthy", "Hold 10,000 coins", "💎", Economy, C::CoinBalance, 10_000, 0, 500, D::Hard, 40),
    row("First Purchase", "Open your first bundle", "🛒", Economy, C::BundlePurchases, 1, 50, 0, D::Easy, 5),
    row("Regular Customer", "Open 25 bundles", "🛒", Economy, C::BundlePurchases, 25, 800, 300, D::Normal, 30),
    row("Shopaholic", "Open 100 bundles", "🛍️", Economy, C::BundlePurchases, 100, 3000, 1000, D::Hard, 60),
    row("Tycoon", "Hold 50,000 coins", "💎", Economy, C::CoinBalance, 50_000, 5000, 1500, D::Hard, 80),
    row("Magnate", "Hold 200,000 coins", "👑", Economy, C::CoinBalance, 200_000, 20_000, 5000, D::Legendary, 150),
    row("Merchant", "Sell 200 items", "💰", Economy, C::ItemsSold, 200, 1000, 400, D::Normal, 35),
    row("Trade Baron", "Earn 100,000 coins from sales", "🏦", Economy, C::SellingProfit, 100_000, 10_000, 3000, D::Legendary, 120),
    // ═══════════════════════════════════════════════════════════════
    // GENERAL
    // ═══════════════════════════════════════════════════════════════
    row("Getting Started", "Reach level 2", "⭐", General, C::Level, 2, 50, 0, D::Easy, 5),
    row("Apprentice", "Reach level 5", "⭐", General, C::Level, 5, 200, 100, D::Normal, 15),
    row("Adept", "Reach level 10", "⭐", General, C::Level, 10, 500, 250, D::Hard, 30),
    row("Expert", "Reach level 20", "🌟", General, C::Level, 20, 1000, 500, D::Legendary, 50),
    row("Week Streak", "Play 7 days in a row", "📅", General, C::DailyStreak, 7, 300, 150, D::Normal, 20),
    row("Month Streak", "Play 30 days in a row", "🗓️", General, C::DailyStreak, 30, 1000, 500, D::Hard, 40),
    row("High Flyer", "Reach level 25", "🚀", General, C::Level, 25, 2500, 1000, D::Hard, 60),
    row("Half Century", "Reach level 50", "⭐", General, C::Level, 50, 10_000, 5000, D::Legendary, 200),
    row("Two Month Streak", "Play 60 days in a row", "🎖️", General, C::DailyStreak, 60, 3000, 1500, D::Hard, 80),
    row("Year of Play", "Play 365 days in a row", "⚔️", General, C::DailyStreak, 365, 20_000, 10_000, D::Legendary, 500),
    row("Busy Day", "Receive 100 items in one day", "⚡", General, C::ItemsToday, 100, 2000, 800, D::Hard, 60),
    // ═══════════════════════════════════════════════════════════════
    // BATTLE
    // ═══════════════════════════════════════════════════════════════
    row("First Victory", "Win a battle", "⚔️", Battle, C::BattlesWon, 1, 50, 25, D::Easy, 5),
    row("Veteran", "Win 25 battles", "🛡️", Battle, C::BattlesWon, 25, 500, 200, D::Normal, 20),
    row("Warlord", "Win 100 battles", "🗡️", Battle, C::BattlesWon, 100, 2000, 800, D::Hard, 50),
    // ═══════════════════════════════════════════════════════════════
    // SPECIAL
    // ═══════════════════════════════════════════════════════════════
    hidden(row("Lucky Strike", "Receive an Artifact", "🍀", Special, C::ArtifactsReceived, 1, 777, 333, D::Legendary, 77)),
    hidden(row("Early Bird", "Receive an item before 06:00", "🌅", Special, C::MorningItems, 1, 100, 0, D::Normal, 15)),
    hidden(row("Midnight Pull", "Receive an item during the midnight hour", "🌙", Special, C::ItemsAtHour { hour: 0 }, 1, 1000, 400, D::Special, 50)),
    hidden(row("Golden Run", "Receive 5 Legendary items in a row", "🥇", Special, C::LegendaryStreak, 5, 5000, 2000, D::Legendary, 150)),
    hidden(row("Artifact Magnet", "Receive 10 Artifacts in one month", "🧲", Special, C::ArtifactsThisMonth, 10, 10_000, 5000, D::Legendary, 300)),
    row("Event Graduate", "Complete a campaign", "🎓", Special, C::CampaignsCompleted, 1, 1000, 500, D::Normal, 40),
    row("Event Regular", "Complete 10 campaigns", "🏆", Special, C::CampaignsCompleted, 10, 5000, 2500, D::Hard, 100),
    row("Event Legend", "Complete 50 campaigns", "👑", Special, C::CampaignsCompleted, 50, 25_000, 10_000, D::Legendary, 300),
    hidden(row("Perfectionist", "Earn every milestone in a category", "💯", Special, C::PerfectCategory { category: None }, 1, 3000, 1500, D::Hard, 80)),
    row("Decorated", "Earn 50 milestones", "🏅", Special, C::MilestonesGranted, 50, 8000, 4000, D::Legendary, 200),
    hidden(row("Grand Master", "Earn every other milestone", "🌟", Special, C::AllMilestones, 1, 50_000, 25_000, D::Legendary, 1000)),
    row("Vault", "Own 1,500 items", "💥", Special, C::TotalItems, 1500, 15_000, 8000, D::Legendary, 400),
    hidden(row("Whirlwind", "Receive 500 items in one day", "🌪️", Special, C::ItemsToday, 500, 10_000, 5000, D::Legendary, 250)),
    hidden(row("Millionaire", "Hold 1,000,000 coins", "💸", Special, C::CoinBalance, 1_000_000, 500_000, 50_000, D::Legendary, 2000)),
    hidden(row("Devoted", "Play on 1,000 different days", "⏰", Special, C::DaysPlayed, 1000, 100_000, 50_000, D::Legendary, 1000)),
    hidden(row("Artifact Vault", "Receive 100 Artifacts", "👑", Special, C::ArtifactsReceived, 100, 50_000, 25_000, D::Legendary, 500)),
    hidden(row("Ten Thousand", "Own 10,000 items", "🤯", Special, C::TotalItems, 10_000, 100_000, 50_000, D::Legendary, 1500)),
    hidden(row("Big Spender", "Spend 1,000,000 coins on bundles", "👑", Special, C::CoinsSpent, 1_000_000, 200_000, 75_000, D::Legendary, 800)),
    hidden(row("High Noon", "Receive an item during the noon hour", "☀️", Special, C::ItemsAtHour { hour: 12 }, 1, 500, 200, D::Special, 30)),
    hidden(row("Night Owl", "Receive 100 items at night", "🦉", Special, C::NightItems, 100, 2000, 800, D::Hard, 60)),
    hidden(row("Dawn Chorus", "Receive 100 items before 06:00", "🐦", Special, C::MorningItems, 100, 2000, 800, D::Hard, 60)),
    hidden(row("Around the Clock", "Receive items in all 24 hours", "🕐", Special, C::DistinctHours, 24, 5000, 2000, D::Legendary, 150)),
    hidden(row("Unbroken", "Receive 1,000 items in a row", "🔥", Special, C::ItemStreak, 1000, 25_000, 10_000, D::Legendary, 400)),
    hidden(row("Pinnacle", "Reach level 100", "🔱", Special, C::Level, 100, 1_000_000, 100_000, D::Legendary, 5000)),
];

/// Production milestone catalog with ids assigned in display order.
pub fn default_milestones() -> Vec<MilestoneDefinition> {
    ROWS.iter()
        .enumerate()
        .map(|(i, r)| MilestoneDefinition {
            id: MilestoneId(i as u32 + 1),
            name: r.name.to_string(),
            description: r.description.to_string(),
            icon: r.icon.to_string(),
            category: r.category,
            condition: r.condition,
            threshold: r.threshold,
            reward: Reward {
                coins: r.coins,
                experience: r.experience,
            },
            points: r.points,
            hidden: r.hidden,
            difficulty: r.difficulty,
        })
        .collect()
}

/// Look up a milestone by id.
pub fn get_milestone(
    milestones: &[MilestoneDefinition],
    id: MilestoneId,
) -> Option<&MilestoneDefinition> {
    milestones.iter().find(|m| m.id == id)
}

/// All milestones in a category, in catalog order.
pub fn milestones_by_category(
    milestones: &[MilestoneDefinition],
    category: Category,
) -> Vec<&MilestoneDefinition> {
    milestones.iter().filter(|m| m.category == category).collect()
}
