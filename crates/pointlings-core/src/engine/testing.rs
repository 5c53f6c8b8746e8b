//! In-memory store used by the engine unit tests.
//!
//! A transaction works on a snapshot of the state and writes it back on
//! commit; dropping it discards the snapshot.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::error::CoreResult;
use crate::leveling::{required_xp_for_level, XpProgress};
use crate::store::{Store, StoreTx};
use crate::types::*;

#[derive(Debug, Clone, Default)]
struct State {
    next_id: i64,
    users: BTreeMap<UserId, User>,
    pointlings: BTreeMap<PointlingId, Pointling>,
    items: BTreeMap<ItemId, Item>,
    edges: BTreeMap<(PointlingId, ItemId), (DateTime<Utc>, bool)>,
    events: Vec<XpEvent>,
    spends: Vec<PointSpend>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn edge(&self, pointling_id: PointlingId, item_id: ItemId) -> Option<PointlingItem> {
        let (acquired_at, equipped) = *self.edges.get(&(pointling_id, item_id))?;
        Some(PointlingItem {
            pointling_id,
            item_id,
            acquired_at,
            equipped,
            item: self.items.get(&item_id)?.clone(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn add_user(&self, balance: i64) -> UserId {
        let mut state = self.lock();
        let user_id = state.next_id();
        state.users.insert(
            user_id,
            User {
                user_id,
                display_name: format!("user-{user_id}"),
                point_balance: balance,
                created_at: Utc::now(),
            },
        );
        user_id
    }

    pub fn add_pointling(&self, user_id: UserId) -> PointlingId {
        let mut state = self.lock();
        let pointling_id = state.next_id();
        let start = XpProgress::initial();
        state.pointlings.insert(
            pointling_id,
            Pointling {
                pointling_id,
                user_id,
                nickname: None,
                level: start.level,
                current_xp: start.current_xp,
                required_xp: start.required_xp,
                look: Look::new(),
                created_at: Utc::now(),
            },
        );
        pointling_id
    }

    pub fn add_item(
        &self,
        category: ItemCategory,
        slot: Option<ItemSlot>,
        rarity: ItemRarity,
        price_points: Option<i64>,
        unlock_level: Option<i64>,
    ) -> ItemId {
        let mut state = self.lock();
        let item_id = state.next_id();
        state.items.insert(
            item_id,
            Item {
                item_id,
                category,
                slot,
                asset_id: format!("asset-{item_id}"),
                name: format!("item-{item_id}"),
                rarity,
                price_points,
                unlock_level,
            },
        );
        item_id
    }

    pub fn add_xp_event(&self, pointling_id: PointlingId, source: XpSource, amount: i64, at: DateTime<Utc>) {
        let mut state = self.lock();
        let event_id = state.next_id();
        state.events.push(XpEvent {
            event_id,
            pointling_id,
            source,
            xp_amount: amount,
            event_ts: at,
        });
    }

    pub fn give(&self, pointling_id: PointlingId, item_id: ItemId) {
        self.lock()
            .edges
            .insert((pointling_id, item_id), (Utc::now(), false));
    }

    pub fn set_level(&self, pointling_id: PointlingId, level: i64) {
        let mut state = self.lock();
        let pointling = state.pointlings.get_mut(&pointling_id).unwrap();
        pointling.level = level;
        pointling.required_xp = required_xp_for_level(level);
    }

    pub fn pointling(&self, pointling_id: PointlingId) -> Pointling {
        self.lock().pointlings[&pointling_id].clone()
    }

    pub fn balance(&self, user_id: UserId) -> i64 {
        self.lock().users[&user_id].point_balance
    }

    pub fn owns(&self, pointling_id: PointlingId, item_id: ItemId) -> bool {
        self.lock().edges.contains_key(&(pointling_id, item_id))
    }

    pub fn edge_count(&self, pointling_id: PointlingId) -> usize {
        self.lock()
            .edges
            .keys()
            .filter(|(p, _)| *p == pointling_id)
            .count()
    }

    pub fn equipped(&self, pointling_id: PointlingId) -> Vec<ItemId> {
        self.lock()
            .edges
            .iter()
            .filter(|((p, _), (_, equipped))| *p == pointling_id && *equipped)
            .map(|((_, item), _)| *item)
            .collect()
    }

    pub fn xp_event_count(&self) -> usize {
        self.lock().events.len()
    }

    pub fn spend_count(&self) -> usize {
        self.lock().spends.len()
    }
}

pub(crate) struct MemoryTx {
    shared: Arc<Mutex<State>>,
    working: State,
}

#[async_trait]
impl Store for MemoryStore {
    type Tx = MemoryTx;

    async fn begin(&self) -> CoreResult<MemoryTx> {
        Ok(MemoryTx {
            shared: Arc::clone(&self.state),
            working: self.lock().clone(),
        })
    }

    async fn find_user(&self, user_id: UserId) -> CoreResult<Option<User>> {
        Ok(self.lock().users.get(&user_id).cloned())
    }

    async fn find_pointling(&self, pointling_id: PointlingId) -> CoreResult<Option<Pointling>> {
        Ok(self.lock().pointlings.get(&pointling_id).cloned())
    }

    async fn find_item(&self, item_id: ItemId) -> CoreResult<Option<Item>> {
        Ok(self.lock().items.get(&item_id).cloned())
    }

    async fn unlocks_for_level(&self, level: i64) -> CoreResult<Vec<Item>> {
        Ok(self
            .lock()
            .items
            .values()
            .filter(|i| i.unlock_level == Some(level))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl StoreTx for MemoryTx {
    async fn lock_pointling(&mut self, pointling_id: PointlingId) -> CoreResult<Option<Pointling>> {
        Ok(self.working.pointlings.get(&pointling_id).cloned())
    }

    async fn xp_granted_on(
        &mut self,
        pointling_id: PointlingId,
        source: XpSource,
        day: NaiveDate,
    ) -> CoreResult<i64> {
        Ok(self
            .working
            .events
            .iter()
            .filter(|e| e.pointling_id == pointling_id && e.source == source)
            .filter(|e| e.event_ts.date_naive() == day)
            .map(|e| e.xp_amount)
            .sum())
    }

    async fn insert_xp_event(&mut self, event: NewXpEvent) -> CoreResult<XpEvent> {
        let event = XpEvent {
            event_id: self.working.next_id(),
            pointling_id: event.pointling_id,
            source: event.source,
            xp_amount: event.xp_amount,
            event_ts: event.event_ts,
        };
        self.working.events.push(event.clone());
        Ok(event)
    }

    async fn update_progress(&mut self, pointling_id: PointlingId, progress: XpProgress) -> CoreResult<()> {
        if let Some(p) = self.working.pointlings.get_mut(&pointling_id) {
            p.level = progress.level;
            p.current_xp = progress.current_xp;
            p.required_xp = progress.required_xp;
        }
        Ok(())
    }

    async fn debit_balance(&mut self, user_id: UserId, amount: i64) -> CoreResult<Option<i64>> {
        Ok(self
            .working
            .users
            .get_mut(&user_id)
            .filter(|u| u.point_balance >= amount)
            .map(|u| {
                u.point_balance -= amount;
                u.point_balance
            }))
    }

    async fn grant_item(
        &mut self,
        pointling_id: PointlingId,
        item_id: ItemId,
        acquired_at: DateTime<Utc>,
    ) -> CoreResult<bool> {
        let key = (pointling_id, item_id);
        if self.working.edges.contains_key(&key) {
            return Ok(false);
        }
        self.working.edges.insert(key, (acquired_at, false));
        Ok(true)
    }

    async fn insert_point_spend(&mut self, spend: NewPointSpend) -> CoreResult<PointSpend> {
        let spend = PointSpend {
            spend_id: self.working.next_id(),
            user_id: spend.user_id,
            item_id: spend.item_id,
            points_spent: spend.points_spent,
            spend_ts: spend.spend_ts,
        };
        self.working.spends.push(spend.clone());
        Ok(spend)
    }

    async fn total_spent_by_user(&mut self, user_id: UserId) -> CoreResult<i64> {
        Ok(self
            .working
            .spends
            .iter()
            .filter(|s| s.user_id == user_id)
            .map(|s| s.points_spent)
            .sum())
    }

    async fn unequip_slot_siblings(&mut self, pointling_id: PointlingId, item_id: ItemId) -> CoreResult<u64> {
        let Some(slot) = self.working.items.get(&item_id).and_then(|i| i.slot) else {
            return Ok(0);
        };
        let items = self.working.items.clone();
        let mut count = 0;
        for ((p, other), (_, equipped)) in self.working.edges.iter_mut() {
            let same_slot = items.get(other).and_then(|i| i.slot) == Some(slot);
            if *p == pointling_id && *other != item_id && same_slot && *equipped {
                *equipped = false;
                count += 1;
            }
        }
        Ok(count)
    }

    async fn set_equipped(
        &mut self,
        pointling_id: PointlingId,
        item_id: ItemId,
        equipped: bool,
    ) -> CoreResult<Option<PointlingItem>> {
        let Some(edge) = self.working.edges.get_mut(&(pointling_id, item_id)) else {
            return Ok(None);
        };
        edge.1 = equipped;
        Ok(self.working.edge(pointling_id, item_id))
    }

    async fn commit(self) -> CoreResult<()> {
        *self.shared.lock().unwrap() = self.working;
        Ok(())
    }

    async fn rollback(self) -> CoreResult<()> {
        Ok(())
    }
}
