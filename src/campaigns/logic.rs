use super::types::*;
use crate::bundles::logic::Receipts;
use crate::bundles::DrawnItem;
use crate::character::{PlayerId, PlayerState};
use crate::core::error::{DataIntegrityError, EngineResult, PolicyViolation};
use crate::core::mutation::StateMutation;
use crate::items::Catalog;
use chrono::{DateTime, Utc};

/// Current value of `metric` for `player`.
///
/// Items missing from the catalog never match a tier.
pub fn metric_value<C: Catalog>(player: &PlayerState, metric: &TargetMetric, catalog: &C) -> u64 {
    match metric {
        TargetMetric::TotalItems => player.total_items(),
        TargetMetric::ItemsOfTier { tier } => player
            .inventory
            .iter()
            .filter(|(id, _)| catalog.item(**id).is_some_and(|def| def.tier == *tier))
            .map(|(_, &q)| q as u64)
            .sum(),
        TargetMetric::SpecificItems { items } => items
            .iter()
            .map(|&id| player.quantity(id) as u64)
            .sum(),
        TargetMetric::Level => player.level as u64,
        TargetMetric::CoinBalance => player.coins,
    }
}

/// Recomputes progress for one campaign.
///
/// The completion flag flips at most once. After that the stored record is
/// left untouched, but the returned value is still the live one.
pub fn update_progress<C: Catalog>(
    player: &PlayerState,
    campaign: &CampaignDefinition,
    catalog: &C,
    now: DateTime<Utc>,
) -> ProgressUpdate {
    let value = metric_value(player, &campaign.metric, catalog);
    let existing = player.campaign(campaign.id);
    let mut update = ProgressUpdate {
        campaign: campaign.id,
        value,
        target: campaign.target,
        completed_now: false,
        mutations: Vec::new(),
    };

    if existing.is_some_and(|p| p.completed) {
        return update;
    }

    let mut progress = existing
        .cloned()
        .unwrap_or_else(|| CampaignProgress::new(campaign.target));
    progress.current_value = value;
    progress.target = campaign.target;
    if value >= campaign.target {
        progress.completed = true;
        progress.completed_at = Some(now);
        update.completed_now = true;
    }

    if existing != Some(&progress) {
        update.mutations.push(StateMutation::SetCampaignProgress {
            campaign: campaign.id,
            progress,
        });
    }
    if update.completed_now {
        update.mutations.push(StateMutation::RecordCampaignCompleted);
        tracing::info!(
            player = player.player_id,
            campaign = %campaign.id,
            value,
            "campaign completed"
        );
    }
    update
}

/// Updates every campaign active at `now`.
pub fn refresh_active<C: Catalog>(
    player: &PlayerState,
    campaigns: &[CampaignDefinition],
    catalog: &C,
    now: DateTime<Utc>,
) -> Vec<ProgressUpdate> {
    campaigns
        .iter()
        .filter(|c| c.is_active(now))
        .map(|c| update_progress(player, c, catalog, now))
        .collect()
}

/// Pays out a completed campaign. Single use.
pub fn claim_reward<C: Catalog>(
    player: &PlayerState,
    campaign: &CampaignDefinition,
    catalog: &C,
    now: DateTime<Utc>,
) -> EngineResult<ClaimOutcome> {
    let progress = match player.campaign(campaign.id) {
        Some(p) if p.completed => p,
        _ => return Err(PolicyViolation::NotCompleted.into()),
    };
    if progress.reward_claimed {
        return Err(PolicyViolation::AlreadyClaimed.into());
    }

    let reward = &campaign.reward;
    let mut receipts = Receipts::new(player);
    let mut claimed = progress.clone();
    claimed.reward_claimed = true;
    claimed.claimed_at = Some(now);
    receipts.log.push(StateMutation::SetCampaignProgress {
        campaign: campaign.id,
        progress: claimed,
    });
    if reward.coins > 0 {
        receipts.log.push(StateMutation::CreditCoins {
            amount: reward.coins,
        });
    }
    if reward.experience > 0 {
        receipts.log.push(StateMutation::GrantExperience {
            amount: reward.experience,
        });
    }
    let mut items = Vec::with_capacity(reward.items.len());
    for &id in &reward.items {
        let def = catalog
            .item(id)
            .ok_or(DataIntegrityError::UnknownItem { id })?;
        receipts.receive(def, now);
        items.push(DrawnItem::from_definition(def, true));
    }

    tracing::info!(
        player = player.player_id,
        campaign = %campaign.id,
        coins = reward.coins,
        experience = reward.experience,
        items = items.len(),
        "campaign reward claimed"
    );

    let (mutations, catalog_mutations) = receipts.log.into_parts();
    Ok(ClaimOutcome {
        campaign: campaign.id,
        coins: reward.coins,
        experience: reward.experience,
        items,
        title: reward.title.clone(),
        mutations,
        catalog_mutations,
    })
}

/// Ranks players by progress, earliest completion first on ties.
pub fn leaderboard<'a>(
    entries: impl IntoIterator<Item = (PlayerId, &'a CampaignProgress)>,
    limit: usize,
) -> Vec<(PlayerId, &'a CampaignProgress)> {
    let mut ranked: Vec<_> = entries.into_iter().collect();
    ranked.sort_by(|(a_id, a), (b_id, b)| {
        b.current_value
            .cmp(&a.current_value)
            .then_with(|| match (a.completed_at, b.completed_at) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            })
            .then_with(|| a_id.cmp(b_id))
    });
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::{InMemoryCatalog, ItemId, Tier};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 3, 12, 0, 0).unwrap()
    }

    fn campaign(metric: TargetMetric, target: u64) -> CampaignDefinition {
        CampaignDefinition {
            id: CampaignId(7),
            name: "Collector Week".to_string(),
            description: String::new(),
            start: now() - Duration::days(2),
            end: now() + Duration::days(5),
            metric,
            target,
            reward: CampaignReward {
                coins: 100,
                experience: 40,
                items: vec![ItemId(11)],
                title: Some("Collector".to_string()),
            },
        }
    }

    #[test]
    fn test_metric_values() {
        let catalog = InMemoryCatalog::sample();
        let mut player = PlayerState::new(1);
        player.add_item(ItemId(1), 3);
        player.add_item(ItemId(8), 2);
        player.add_item(ItemId(999), 1);

        assert_eq!(metric_value(&player, &TargetMetric::TotalItems, &catalog), 6);
        assert_eq!(
            metric_value(
                &player,
                &TargetMetric::ItemsOfTier { tier: Tier::Epic },
                &catalog
            ),
            2
        );
        assert_eq!(
            metric_value(
                &player,
                &TargetMetric::SpecificItems {
                    items: vec![ItemId(1), ItemId(2)]
                },
                &catalog
            ),
            3
        );
        assert_eq!(metric_value(&player, &TargetMetric::Level, &catalog), 1);
        assert_eq!(metric_value(&player, &TargetMetric::CoinBalance, &catalog), 600);
    }

    #[test]
    fn test_completion_is_reported_once() {
        let catalog = InMemoryCatalog::sample();
        let c = campaign(TargetMetric::TotalItems, 2);
        let mut player = PlayerState::new(1);
        player.add_item(ItemId(1), 2);

        let first = update_progress(&player, &c, &catalog, now());
        assert!(first.completed_now);
        player.apply_all(&first.mutations).unwrap();
        assert_eq!(player.activity.campaigns_completed, 1);

        let second = update_progress(&player, &c, &catalog, now());
        assert!(!second.completed_now);
        assert!(second.mutations.is_empty());
    }

    #[test]
    fn test_completed_record_frozen_after_regression() {
        let catalog = InMemoryCatalog::sample();
        let c = campaign(TargetMetric::TotalItems, 2);
        let mut player = PlayerState::new(1);
        player.add_item(ItemId(1), 2);
        let first = update_progress(&player, &c, &catalog, now());
        player.apply_all(&first.mutations).unwrap();

        player.remove_item(ItemId(1), 2).unwrap();
        let later = update_progress(&player, &c, &catalog, now());
        assert_eq!(later.value, 0);
        let stored = player.campaign(c.id).unwrap();
        assert!(stored.completed);
        assert_eq!(stored.current_value, 2);
    }

    #[test]
    fn test_unchanged_progress_emits_nothing() {
        let catalog = InMemoryCatalog::sample();
        let c = campaign(TargetMetric::TotalItems, 10);
        let mut player = PlayerState::new(1);
        player.add_item(ItemId(1), 1);
        let first = update_progress(&player, &c, &catalog, now());
        assert_eq!(first.mutations.len(), 1);
        player.apply_all(&first.mutations).unwrap();

        let again = update_progress(&player, &c, &catalog, now());
        assert!(again.mutations.is_empty());
    }

    #[test]
    fn test_claim_requires_completion() {
        let catalog = InMemoryCatalog::sample();
        let c = campaign(TargetMetric::TotalItems, 10);
        let player = PlayerState::new(1);
        let err = claim_reward(&player, &c, &catalog, now()).unwrap_err();
        assert_eq!(err.policy(), Some(&PolicyViolation::NotCompleted));
    }

    #[test]
    fn test_claim_pays_out_and_is_single_use() {
        let catalog = InMemoryCatalog::sample();
        let c = campaign(TargetMetric::Level, 1);
        let mut player = PlayerState::new(1);
        let update = update_progress(&player, &c, &catalog, now());
        player.apply_all(&update.mutations).unwrap();

        let outcome = claim_reward(&player, &c, &catalog, now()).unwrap();
        assert_eq!(outcome.title.as_deref(), Some("Collector"));
        player.apply_all(&outcome.mutations).unwrap();
        assert_eq!(player.coins, 700);
        assert_eq!(player.experience, 40);
        assert_eq!(player.quantity(ItemId(11)), 1);

        let err = claim_reward(&player, &c, &catalog, now()).unwrap_err();
        assert_eq!(err.policy(), Some(&PolicyViolation::AlreadyClaimed));
    }

    #[test]
    fn test_claim_with_unknown_reward_item() {
        let catalog = InMemoryCatalog::sample();
        let mut c = campaign(TargetMetric::Level, 1);
        c.reward.items = vec![ItemId(404)];
        let mut player = PlayerState::new(1);
        let update = update_progress(&player, &c, &catalog, now());
        player.apply_all(&update.mutations).unwrap();

        let err = claim_reward(&player, &c, &catalog, now()).unwrap_err();
        assert!(!err.is_policy());
    }

    #[test]
    fn test_refresh_skips_inactive_campaigns() {
        let catalog = InMemoryCatalog::sample();
        let active = campaign(TargetMetric::TotalItems, 5);
        let mut expired = campaign(TargetMetric::TotalItems, 5);
        expired.id = CampaignId(8);
        expired.end = now() - Duration::days(1);

        let player = PlayerState::new(1);
        let updates = refresh_active(&player, &[active, expired], &catalog, now());
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].campaign, CampaignId(7));
    }

    #[test]
    fn test_leaderboard_order() {
        let t = now();
        let mut a = CampaignProgress::new(10);
        a.current_value = 10;
        a.completed_at = Some(t);
        let mut b = CampaignProgress::new(10);
        b.current_value = 10;
        b.completed_at = Some(t - Duration::hours(1));
        let mut c = CampaignProgress::new(10);
        c.current_value = 4;

        let ranked = leaderboard([(1, &a), (2, &b), (3, &c)], 2);
        let ids: Vec<PlayerId> = ranked.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![2, 1]);
    }
}
