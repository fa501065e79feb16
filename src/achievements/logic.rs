//! Milestone evaluation against a player snapshot.

use super::types::*;
use crate::character::{PlayerId, PlayerState};
use crate::core::mutation::StateMutation;
use crate::items::{Catalog, Tier};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};

/// Units owned per tier. Items missing from the catalog are not counted.
fn owned_by_tier<C: Catalog>(player: &PlayerState, catalog: &C) -> [u64; 5] {
    let mut counts = [0u64; 5];
    for (&id, &qty) in &player.inventory {
        if let Some(def) = catalog.item(id) {
            counts[def.tier.index()] += qty as u64;
        }
    }
    counts
}

/// (granted, total) over `milestones` other than `exclude`.
fn granted_among<'a>(
    player: &PlayerState,
    milestones: impl Iterator<Item = &'a MilestoneDefinition>,
    exclude: MilestoneId,
) -> (u64, u64) {
    milestones
        .filter(|m| m.id != exclude)
        .fold((0, 0), |(granted, total), m| {
            (granted + player.is_granted(m.id) as u64, total + 1)
        })
}

/// All-or-nothing progress; an empty set of candidates never completes.
fn complete_set(granted: u64, total: u64) -> MilestoneProgress {
    if total == 0 {
        MilestoneProgress {
            current: 0,
            target: 1,
        }
    } else {
        MilestoneProgress {
            current: granted,
            target: total,
        }
    }
}

/// Measures `def` against `player`.
pub fn progress<C: Catalog>(
    def: &MilestoneDefinition,
    player: &PlayerState,
    milestones: &[MilestoneDefinition],
    catalog: &C,
    now: DateTime<Utc>,
) -> MilestoneProgress {
    let activity = &player.activity;
    let counter = |current: u64| MilestoneProgress {
        current,
        target: def.threshold,
    };

    match def.condition {
        Condition::TotalItems => counter(player.total_items()),
        Condition::ItemsOfTier { tier } => counter(owned_by_tier(player, catalog)[tier.index()]),
        Condition::Level => counter(player.level as u64),
        Condition::CoinBalance => counter(player.coins),
        Condition::DailyStreak => counter(activity.daily_streak as u64),
        Condition::BundlePurchases => counter(activity.bundle_purchases),
        Condition::CampaignsCompleted => counter(activity.campaigns_completed),
        Condition::MaxDuplicates => counter(player.max_duplicates() as u64),
        Condition::AllTiersOwned => {
            let counts = owned_by_tier(player, catalog);
            counter(counts.iter().copied().min().unwrap_or(0))
        }
        Condition::CompleteCatalog => {
            let active = catalog.active_items();
            let owned = active.iter().filter(|def| player.owns(def.id)).count();
            complete_set(owned as u64, active.len() as u64)
        }
        Condition::MilestonesGranted => counter(player.granted.len() as u64),
        Condition::AllMilestones => {
            let (granted, total) = granted_among(player, milestones.iter(), def.id);
            complete_set(granted, total)
        }
        Condition::PerfectCategory {
            category: Some(category),
        } => {
            let in_category = milestones.iter().filter(|m| m.category == category);
            let (granted, total) = granted_among(player, in_category, def.id);
            complete_set(granted, total)
        }
        Condition::PerfectCategory { category: None } => {
            let any_perfect = Category::ALL.iter().any(|&category| {
                let in_category = milestones.iter().filter(|m| m.category == category);
                let (granted, total) = granted_among(player, in_category, def.id);
                total > 0 && granted == total
            });
            MilestoneProgress {
                current: any_perfect as u64,
                target: 1,
            }
        }
        Condition::ItemsAtHour { hour } => counter(activity.received_at_hour(hour)),
        Condition::DistinctHours => counter(activity.distinct_hours() as u64),
        Condition::NightItems => counter(activity.night_items),
        Condition::MorningItems => counter(activity.morning_items),
        Condition::ItemsToday => counter(activity.items_on(now.date_naive())),
        Condition::LegendaryStreak => counter(activity.max_legendary_streak as u64),
        Condition::ItemStreak => counter(activity.max_item_streak),
        Condition::ArtifactsReceived => counter(activity.received_by_tier[Tier::Artifact.index()]),
        Condition::ArtifactsThisMonth => {
            let month = Some((chrono::Datelike::year(&now), chrono::Datelike::month(&now)));
            let current = if activity.artifact_month == month {
                activity.artifacts_this_month
            } else {
                0
            };
            counter(current)
        }
        Condition::CoinsSpent => counter(activity.coins_spent),
        Condition::ItemsSold => counter(activity.items_sold),
        Condition::SellingProfit => counter(activity.selling_profit),
        Condition::DaysPlayed => counter(activity.days_played as u64),
        Condition::BattlesWon => counter(player.battle.battles_won),
    }
}

/// Returns every milestone newly earned by `player`.
///
/// Rewards from one grant can satisfy another (coins, level, milestone
/// counts), so evaluation repeats on a scratch copy until nothing new is
/// granted. Running it again on the snapshot with the grants applied yields
/// nothing. Safe to retry.
pub fn evaluate<C: Catalog>(
    player: &PlayerState,
    milestones: &[MilestoneDefinition],
    catalog: &C,
    now: DateTime<Utc>,
) -> Vec<Grant> {
    let mut scratch = player.clone();
    let mut grants = Vec::new();

    loop {
        let before = grants.len();
        for def in milestones {
            if scratch.is_granted(def.id) {
                continue;
            }
            let p = progress(def, &scratch, milestones, catalog, now);
            tracing::debug!(milestone = %def.id, current = p.current, target = p.target, "milestone checked");
            if !p.is_met() {
                continue;
            }

            scratch.granted.insert(def.id);
            scratch.achievement_points += def.points;
            scratch.coins = scratch.coins.saturating_add(def.reward.coins);
            scratch.add_experience(def.reward.experience);

            tracing::info!(
                player = player.player_id,
                milestone = %def.id,
                name = %def.name,
                points = def.points,
                "milestone granted"
            );
            grants.push(Grant::from_definition(def));
        }
        if grants.len() == before {
            break;
        }
    }
    grants
}

/// Flattens grants into the mutations that persist them.
pub fn grant_mutations(grants: &[Grant]) -> Vec<StateMutation> {
    grants.iter().flat_map(Grant::mutations).collect()
}

/// Updates advisory statistics for freshly granted milestones.
pub fn record_grants(
    stats: &mut BTreeMap<MilestoneId, MilestoneStats>,
    player: PlayerId,
    grants: &[Grant],
    at: DateTime<Utc>,
) {
    for grant in grants {
        stats.entry(grant.id).or_default().record(player, at);
    }
}

/// Completion overview for `player`.
pub fn summary(player: &PlayerState, milestones: &[MilestoneDefinition]) -> MilestoneSummary {
    let total = milestones
        .iter()
        .map(|m| m.id)
        .collect::<BTreeSet<_>>()
        .len();
    let completed = milestones
        .iter()
        .map(|m| m.id)
        .filter(|id| player.is_granted(*id))
        .collect::<BTreeSet<_>>()
        .len();
    let percentage = if total == 0 {
        0.0
    } else {
        (completed as f64 / total as f64 * 1000.0).round() / 10.0
    };

    let mut by_category = BTreeMap::new();
    for m in milestones {
        let entry = by_category.entry(m.category).or_insert((0, 0));
        entry.1 += 1;
        if player.is_granted(m.id) {
            entry.0 += 1;
        }
    }

    MilestoneSummary {
        total,
        completed,
        percentage,
        points: player.achievement_points,
        by_category,
    }
}

/// Milestones for a default listing: hidden ones only once granted.
pub fn visible_milestones<'m>(
    player: &PlayerState,
    milestones: &'m [MilestoneDefinition],
) -> Vec<&'m MilestoneDefinition> {
    milestones
        .iter()
        .filter(|m| !m.hidden || player.is_granted(m.id))
        .collect()
}
