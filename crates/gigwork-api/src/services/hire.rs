//! Hire coordination.
//!
//! The hire operation atomically transitions a gig to assigned, marks
//! the chosen bid hired, rejects every sibling bid, and then notifies
//! the hired freelancer. Hires targeting the same gig serialize on a
//! per-gig mutex; the store's revision check backstops the commit.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tokio::time::timeout;
use tracing::{info, warn};

use gigwork_models::{BidId, BidStatus, GigId, UserId, WsMessage};
use gigwork_notify::NotificationChannel;
use gigwork_store::{BidRepository, GigRepository, MemoryStore, StoreError};

use crate::metrics;

/// Hire failure kinds, surfaced to the caller verbatim and never
/// retried automatically.
#[derive(Debug, Error)]
pub enum HireError {
    #[error("Bid not found: {0}")]
    BidNotFound(BidId),

    #[error("Gig not found: {0}")]
    GigNotFound(GigId),

    #[error("Actor is not the gig owner")]
    Unauthorized,

    #[error("Gig already assigned")]
    AlreadyAssigned,

    #[error("Transaction failed: {0}")]
    Txn(#[from] StoreError),
}

/// Receipt returned on a successful hire.
#[derive(Debug, Clone)]
pub struct HireReceipt {
    pub gig_id: GigId,
    pub gig_title: String,
    pub bid_id: BidId,
    pub freelancer_id: UserId,
}

/// Coordinates the hire transaction and its post-commit notification.
#[derive(Clone)]
pub struct HireService {
    store: MemoryStore,
    gigs: GigRepository,
    bids: BidRepository,
    channel: Arc<dyn NotificationChannel>,
    notify_timeout: Duration,
    gig_locks: Arc<RwLock<HashMap<GigId, Arc<Mutex<()>>>>>,
}

impl HireService {
    /// Create a new hire service.
    pub fn new(
        store: MemoryStore,
        channel: Arc<dyn NotificationChannel>,
        notify_timeout: Duration,
    ) -> Self {
        Self {
            gigs: GigRepository::new(store.clone()),
            bids: BidRepository::new(store.clone()),
            store,
            channel,
            notify_timeout,
            gig_locks: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Hire the freelancer behind `bid_id` on behalf of `actor_id`.
    ///
    /// On success the gig is assigned, the bid is hired, and every
    /// sibling bid is rejected, all in one commit. The freelancer
    /// notification goes out strictly after the commit and its failure
    /// never affects the result.
    pub async fn hire(
        &self,
        bid_id: &BidId,
        actor_id: &UserId,
    ) -> Result<HireReceipt, HireError> {
        // Resolve the bid first to learn which gig to serialize on.
        let bid = self
            .bids
            .get(bid_id)
            .await?
            .ok_or_else(|| HireError::BidNotFound(bid_id.clone()))?;
        let gig_id = bid.gig_id.clone();

        let result = {
            let lock = self.gig_lock(&gig_id).await;
            let _guard = lock.lock().await;
            self.hire_locked(bid_id, actor_id).await
        };
        self.prune_gig_lock(&gig_id).await;

        let receipt = result?;

        self.notify_hired(&receipt).await;

        Ok(receipt)
    }

    /// The transactional part, executed under the gig's mutex.
    async fn hire_locked(
        &self,
        bid_id: &BidId,
        actor_id: &UserId,
    ) -> Result<HireReceipt, HireError> {
        let mut txn = self.store.begin();

        // Re-read both documents through the transaction so the commit
        // revalidates them.
        let bid = self
            .bids
            .get_tx(&mut txn, bid_id)
            .await?
            .ok_or_else(|| HireError::BidNotFound(bid_id.clone()))?;
        let gig = self
            .gigs
            .get_tx(&mut txn, &bid.gig_id)
            .await?
            .ok_or_else(|| HireError::GigNotFound(bid.gig_id.clone()))?;

        // Expected-outcome failures return before anything is staged;
        // there is nothing to roll back.
        if gig.owner_id != *actor_id {
            return Err(HireError::Unauthorized);
        }
        if !gig.is_open() {
            metrics::record_hire_conflict();
            return Err(HireError::AlreadyAssigned);
        }

        let receipt = HireReceipt {
            gig_id: gig.id.clone(),
            gig_title: gig.title.clone(),
            bid_id: bid.id.clone(),
            freelancer_id: bid.freelancer_id.clone(),
        };

        self.gigs.set_tx(&mut txn, gig.assign());
        self.bids.set_tx(&mut txn, bid.hire());
        self.bids.update_where_tx(
            &mut txn,
            receipt.gig_id.clone(),
            receipt.bid_id.clone(),
            BidStatus::Rejected,
        );

        self.store.commit(txn).await?;

        metrics::record_hire();
        info!("Hired bid {} for gig {}", receipt.bid_id, receipt.gig_id);

        Ok(receipt)
    }

    /// Publish the hire confirmation to the freelancer. Best-effort:
    /// failures and timeouts are logged and abandoned, never retried.
    async fn notify_hired(&self, receipt: &HireReceipt) {
        let payload = WsMessage::hired(receipt.gig_id.clone(), receipt.gig_title.clone());
        let publish = self.channel.publish(&receipt.freelancer_id, payload);

        match timeout(self.notify_timeout, publish).await {
            Ok(Ok(())) => {
                metrics::record_notification_sent();
            }
            Ok(Err(e)) => {
                metrics::record_notification_dropped();
                warn!(
                    "Hire notification for {} dropped: {}",
                    receipt.freelancer_id, e
                );
            }
            Err(_) => {
                metrics::record_notification_dropped();
                warn!(
                    "Hire notification for {} abandoned after {:?}",
                    receipt.freelancer_id, self.notify_timeout
                );
            }
        }
    }

    /// Get or create the mutex serializing hires for a gig.
    async fn gig_lock(&self, gig_id: &GigId) -> Arc<Mutex<()>> {
        let mut locks = self.gig_locks.write().await;
        locks.entry(gig_id.clone()).or_default().clone()
    }

    /// Drop a gig's mutex once nobody holds or waits on it.
    async fn prune_gig_lock(&self, gig_id: &GigId) {
        let mut locks = self.gig_locks.write().await;
        if let Some(lock) = locks.get(gig_id) {
            // Strong count 1 means only the map still references it.
            if Arc::strong_count(lock) == 1 {
                locks.remove(gig_id);
            }
        }
    }
}
