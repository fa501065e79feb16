//! Bundle opening, the free daily draw, and the item exchange.

pub mod daily;
pub mod exchange;
pub mod logic;
pub mod types;

pub use daily::{daily_cooldown_remaining, draw_daily, DailyOutcome};
pub use exchange::{buy_tier, sell_item, PurchaseOutcome, SaleOutcome};
pub use logic::{check_bundle_cooldown, open_bundle, BundleOutcome};
pub use types::{default_bundles, BundleDefinition, BundleId, BundleOdds, DrawnItem};
