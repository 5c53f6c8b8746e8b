//! # Domain Types
//!
//! Core domain types used throughout the Pointlings backend.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      User       │   │   Pointling     │   │      Item       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  user_id        │◄──│  user_id (FK)   │   │  item_id        │       │
//! │  │  display_name   │   │  level ≥ 1      │   │  category       │       │
//! │  │  point_balance  │   │  current_xp     │   │  slot?          │       │
//! │  │  (≥ 0)          │   │  required_xp    │   │  price_points?  │       │
//! │  └────────┬────────┘   └────────┬────────┘   │  unlock_level?  │       │
//! │           │                     │            └────────┬────────┘       │
//! │           │                     │ PointlingItem       │                │
//! │           │                     └──── (pointling, item) ┘                │
//! │           │                           equipped: bool                    │
//! │           ▼                                                             │
//! │  PointSpend (append-only)       XpEvent (append-only)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! All entities use integer surrogate keys assigned by the store.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::leveling::XpProgress;

/// User identifier.
pub type UserId = i64;

/// Pointling identifier.
pub type PointlingId = i64;

/// Catalog item identifier.
pub type ItemId = i64;

/// Opaque appearance map stored with each pointling.
pub type Look = serde_json::Map<String, serde_json::Value>;

// =============================================================================
// XP Source
// =============================================================================

/// Where an XP grant came from.
///
/// ## Caps
/// ```text
/// ┌──────────┬────────────────┬──────────────┐
/// │ Source   │ Per action max │ Daily max    │
/// ├──────────┼────────────────┼──────────────┤
/// │ RECEIPT  │ 10             │ 50           │
/// │ PLAY     │ 20             │ 100          │
/// │ DAILY    │ 10             │ 10           │
/// └──────────┴────────────────┴──────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum XpSource {
    /// Scanning a purchase receipt.
    Receipt,
    /// Playing with the pointling.
    Play,
    /// Daily check-in bonus.
    Daily,
}

impl XpSource {
    /// Every source, in declaration order.
    pub const ALL: [XpSource; 3] = [XpSource::Receipt, XpSource::Play, XpSource::Daily];

    /// Largest amount a single grant may carry.
    pub const fn per_action_cap(self) -> i64 {
        match self {
            XpSource::Receipt => 10,
            XpSource::Play => 20,
            XpSource::Daily => 10,
        }
    }

    /// Largest cumulative amount per UTC calendar day.
    pub const fn daily_cap(self) -> i64 {
        match self {
            XpSource::Receipt => 50,
            XpSource::Play => 100,
            XpSource::Daily => 10,
        }
    }

    /// Stored/wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            XpSource::Receipt => "RECEIPT",
            XpSource::Play => "PLAY",
            XpSource::Daily => "DAILY",
        }
    }
}

impl fmt::Display for XpSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for XpSource {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        XpSource::ALL
            .into_iter()
            .find(|source| source.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| not_allowed("source", XpSource::ALL.map(XpSource::as_str)))
    }
}

// =============================================================================
// Item Classification
// =============================================================================

/// Broad catalog grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum ItemCategory {
    /// Wearable; always occupies a slot.
    Accessory,
    /// Body feature (colour, pattern); may be slotless.
    Feature,
}

/// Equip slot. At most one equipped item per pointling per slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum ItemSlot {
    Hat,
    Shoes,
    Face,
    Wings,
}

/// Item rarity tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum ItemRarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl ItemCategory {
    pub const ALL: [ItemCategory; 2] = [ItemCategory::Accessory, ItemCategory::Feature];

    pub const fn as_str(self) -> &'static str {
        match self {
            ItemCategory::Accessory => "ACCESSORY",
            ItemCategory::Feature => "FEATURE",
        }
    }
}

impl ItemSlot {
    pub const ALL: [ItemSlot; 4] = [ItemSlot::Hat, ItemSlot::Shoes, ItemSlot::Face, ItemSlot::Wings];

    pub const fn as_str(self) -> &'static str {
        match self {
            ItemSlot::Hat => "HAT",
            ItemSlot::Shoes => "SHOES",
            ItemSlot::Face => "FACE",
            ItemSlot::Wings => "WINGS",
        }
    }
}

impl ItemRarity {
    pub const ALL: [ItemRarity; 4] = [
        ItemRarity::Common,
        ItemRarity::Rare,
        ItemRarity::Epic,
        ItemRarity::Legendary,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ItemRarity::Common => "COMMON",
            ItemRarity::Rare => "RARE",
            ItemRarity::Epic => "EPIC",
            ItemRarity::Legendary => "LEGENDARY",
        }
    }
}

macro_rules! impl_display_from_str {
    ($ty:ident, $field:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $ty::ALL
                    .into_iter()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
                    .ok_or_else(|| not_allowed($field, $ty::ALL.map($ty::as_str)))
            }
        }
    };
}

impl_display_from_str!(ItemCategory, "category");
impl_display_from_str!(ItemSlot, "slot");
impl_display_from_str!(ItemRarity, "rarity");

fn not_allowed<const N: usize>(field: &str, allowed: [&str; N]) -> ValidationError {
    ValidationError::NotAllowed {
        field: field.to_string(),
        allowed: allowed.iter().map(|s| s.to_string()).collect(),
    }
}

// =============================================================================
// User
// =============================================================================

/// A player account holding a point balance.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct User {
    pub user_id: UserId,
    pub display_name: String,
    /// Spendable points. Never negative.
    pub point_balance: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Pointling
// =============================================================================

/// A user's virtual pet.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Pointling {
    pub pointling_id: PointlingId,
    pub user_id: UserId,
    pub nickname: Option<String>,
    /// Starts at 1.
    pub level: i64,
    /// Cumulative XP; not reset on level-up.
    pub current_xp: i64,
    /// Threshold `current_xp` must reach for the next level.
    pub required_xp: i64,
    #[ts(type = "Record<string, unknown>")]
    pub look: Look,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Pointling {
    /// Leveling state as a value.
    #[inline]
    pub fn progress(&self) -> XpProgress {
        XpProgress {
            level: self.level,
            current_xp: self.current_xp,
            required_xp: self.required_xp,
        }
    }
}

// =============================================================================
// Item
// =============================================================================

/// A catalog entry.
///
/// `price_points` and `unlock_level` are independent: an item may be
/// purchasable, level-gated, both, or neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Item {
    pub item_id: ItemId,
    pub category: ItemCategory,
    pub slot: Option<ItemSlot>,
    pub asset_id: String,
    pub name: String,
    pub rarity: ItemRarity,
    pub price_points: Option<i64>,
    pub unlock_level: Option<i64>,
}

impl Item {
    /// Price if the item can be bought with points.
    #[inline]
    pub fn price(&self) -> Option<i64> {
        self.price_points
    }

    /// Whether a pointling at `level` passes the unlock gate.
    pub fn is_unlocked_at(&self, level: i64) -> bool {
        self.unlock_level.map_or(true, |required| level >= required)
    }
}

/// Fields for creating a catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewItem {
    pub category: ItemCategory,
    #[serde(default)]
    pub slot: Option<ItemSlot>,
    pub asset_id: String,
    pub name: String,
    pub rarity: ItemRarity,
    #[serde(default)]
    pub price_points: Option<i64>,
    #[serde(default)]
    pub unlock_level: Option<i64>,
}

/// Optional catalog filters; `None` matches everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemFilter {
    pub category: Option<ItemCategory>,
    pub rarity: Option<ItemRarity>,
    pub slot: Option<ItemSlot>,
}

// =============================================================================
// Pointling Item (ownership edge)
// =============================================================================

/// An item owned by a pointling, joined with its catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct PointlingItem {
    pub pointling_id: PointlingId,
    pub item_id: ItemId,
    #[ts(as = "String")]
    pub acquired_at: DateTime<Utc>,
    pub equipped: bool,
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub item: Item,
}

// =============================================================================
// XP Event
// =============================================================================

/// One row of the append-only XP log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct XpEvent {
    pub event_id: i64,
    pub pointling_id: PointlingId,
    pub source: XpSource,
    pub xp_amount: i64,
    #[ts(as = "String")]
    pub event_ts: DateTime<Utc>,
}

/// An XP event before the store assigns its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewXpEvent {
    pub pointling_id: PointlingId,
    pub source: XpSource,
    pub xp_amount: i64,
    pub event_ts: DateTime<Utc>,
}

// =============================================================================
// Point Spend
// =============================================================================

/// One row of the append-only purchase log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct PointSpend {
    pub spend_id: i64,
    pub user_id: UserId,
    pub item_id: ItemId,
    pub points_spent: i64,
    #[ts(as = "String")]
    pub spend_ts: DateTime<Utc>,
}

/// A spend before the store assigns its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewPointSpend {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub points_spent: i64,
    pub spend_ts: DateTime<Utc>,
}

/// Spend history row with the purchased item attached.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SpendHistoryEntry {
    #[serde(flatten)]
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub spend: PointSpend,
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub item: Item,
}

// =============================================================================
// Pagination
// =============================================================================

/// Limit/offset window for list endpoints.
///
/// Out-of-range values fall back to defaults instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    pub const DEFAULT_LIMIT: i64 = 50;
    pub const MAX_LIMIT: i64 = 100;

    /// Builds a page from optional query parameters.
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        Page {
            limit: limit
                .filter(|l| (1..=Self::MAX_LIMIT).contains(l))
                .unwrap_or(Self::DEFAULT_LIMIT),
            offset: offset.filter(|o| *o >= 0).unwrap_or(0),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Page::new(None, None)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xp_source_caps() {
        assert_eq!(XpSource::Receipt.per_action_cap(), 10);
        assert_eq!(XpSource::Play.per_action_cap(), 20);
        assert_eq!(XpSource::Daily.per_action_cap(), 10);
        assert_eq!(XpSource::Receipt.daily_cap(), 50);
        assert_eq!(XpSource::Play.daily_cap(), 100);
        assert_eq!(XpSource::Daily.daily_cap(), 10);
    }

    #[test]
    fn test_xp_source_parse() {
        assert_eq!("RECEIPT".parse::<XpSource>().unwrap(), XpSource::Receipt);
        assert_eq!("play".parse::<XpSource>().unwrap(), XpSource::Play);
        assert!("LOGIN".parse::<XpSource>().is_err());
    }

    #[test]
    fn test_xp_source_serde_matches_storage() {
        let json = serde_json::to_string(&XpSource::Daily).unwrap();
        assert_eq!(json, "\"DAILY\"");
    }

    #[test]
    fn test_item_enums_parse() {
        assert_eq!("hat".parse::<ItemSlot>().unwrap(), ItemSlot::Hat);
        assert_eq!("EPIC".parse::<ItemRarity>().unwrap(), ItemRarity::Epic);
        let err = "TAIL".parse::<ItemSlot>().unwrap_err();
        assert!(err.to_string().starts_with("slot must be one of"));
    }

    #[test]
    fn test_unlock_gate() {
        let item = Item {
            item_id: 1,
            category: ItemCategory::Accessory,
            slot: Some(ItemSlot::Hat),
            asset_id: "hat_party".into(),
            name: "Party Hat".into(),
            rarity: ItemRarity::Rare,
            price_points: None,
            unlock_level: Some(5),
        };
        assert!(!item.is_unlocked_at(4));
        assert!(item.is_unlocked_at(5));

        let ungated = Item {
            unlock_level: None,
            ..item
        };
        assert!(ungated.is_unlocked_at(1));
    }

    #[test]
    fn test_page_defaults_and_clamping() {
        assert_eq!(Page::default(), Page { limit: 50, offset: 0 });
        assert_eq!(Page::new(Some(20), Some(40)), Page { limit: 20, offset: 40 });
        assert_eq!(Page::new(Some(0), Some(-1)), Page { limit: 50, offset: 0 });
        assert_eq!(Page::new(Some(101), None).limit, 50);
    }
}
