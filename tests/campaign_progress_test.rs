//! Integration test: campaign progress
//!
//! Progress is recomputed from the snapshot on every call. Completion is
//! reported once, rewards are claimed once, and the engine facade routes
//! claims by campaign id.

use cardkeep::campaigns::{
    claim_reward, update_progress, CampaignDefinition, CampaignId, CampaignReward, TargetMetric,
};
use cardkeep::core::PolicyViolation;
use cardkeep::items::{InMemoryCatalog, ItemId};
use cardkeep::{Engine, EngineConfig, PlayerState};
use chrono::{DateTime, Duration, TimeZone, Utc};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 12, 20, 10, 0, 0).unwrap()
}

fn fifty_items() -> CampaignDefinition {
    CampaignDefinition {
        id: CampaignId(1),
        name: "Winter Collection".to_string(),
        description: "Own fifty cards".to_string(),
        start: now() - Duration::days(3),
        end: now() + Duration::days(11),
        metric: TargetMetric::TotalItems,
        target: 50,
        reward: CampaignReward {
            coins: 250,
            experience: 100,
            items: vec![ItemId(9)],
            title: Some("Winter Collector".to_string()),
        },
    }
}

#[test]
fn test_fifty_items_completes_once_and_claims_once() {
    let catalog = InMemoryCatalog::sample();
    let campaign = fifty_items();
    let mut player = PlayerState::new(1);
    player.add_item(ItemId(1), 49);

    let update = update_progress(&player, &campaign, &catalog, now());
    assert_eq!(update.value, 49);
    assert!(!update.completed_now);
    player.apply_all(&update.mutations).unwrap();
    assert!(!player.campaign(campaign.id).unwrap().completed);

    player.add_item(ItemId(2), 1);
    let update = update_progress(&player, &campaign, &catalog, now());
    assert!(update.completed_now);
    player.apply_all(&update.mutations).unwrap();
    assert!(player.campaign(campaign.id).unwrap().completed);

    let again = update_progress(&player, &campaign, &catalog, now());
    assert!(!again.completed_now);

    let claim = claim_reward(&player, &campaign, &catalog, now()).unwrap();
    player.apply_all(&claim.mutations).unwrap();
    assert_eq!(player.coins, 850);
    assert_eq!(player.quantity(ItemId(9)), 1);

    let err = claim_reward(&player, &campaign, &catalog, now()).unwrap_err();
    assert_eq!(err.policy(), Some(&PolicyViolation::AlreadyClaimed));
}

#[test]
fn test_progress_self_heals_from_snapshot() {
    let catalog = InMemoryCatalog::sample();
    let campaign = fifty_items();
    let mut player = PlayerState::new(1);
    player.add_item(ItemId(1), 30);
    let update = update_progress(&player, &campaign, &catalog, now());
    player.apply_all(&update.mutations).unwrap();

    // External correction lowers the inventory.
    player.remove_item(ItemId(1), 10).unwrap();
    let update = update_progress(&player, &campaign, &catalog, now());
    player.apply_all(&update.mutations).unwrap();
    assert_eq!(player.campaign(campaign.id).unwrap().current_value, 20);
}

#[test]
fn test_engine_refresh_and_claim() {
    let config = EngineConfig {
        campaigns: vec![fifty_items()],
        ..EngineConfig::default()
    };
    let engine = Engine::new(config, InMemoryCatalog::sample());
    let mut player = PlayerState::new(1);
    player.add_item(ItemId(3), 50);

    let updates = engine.refresh_campaigns(&player, now());
    assert_eq!(updates.len(), 1);
    assert!(updates[0].completed_now);
    for update in &updates {
        player.apply_all(&update.mutations).unwrap();
    }

    let claim = engine.claim_campaign(&player, CampaignId(1), now()).unwrap();
    assert_eq!(claim.title.as_deref(), Some("Winter Collector"));

    let outside = engine.refresh_campaigns(&player, now() + Duration::days(30));
    assert!(outside.is_empty());
}
