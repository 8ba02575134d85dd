//! Versioned in-memory document engine.
//!
//! Every document carries a monotonic revision. Transactional reads
//! record the revision they observed; commit re-checks all of them
//! under the engine write lock and applies the staged writes only if
//! none changed, so two transactions that both read the same gig
//! revision cannot both commit.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use gigwork_models::{Bid, BidId, BidStatus, Gig, GigId};

use crate::error::{StoreError, StoreResult};

type Revision = u64;

#[derive(Debug, Clone)]
struct Versioned<T> {
    revision: Revision,
    value: T,
}

#[derive(Default)]
struct Tables {
    gigs: HashMap<GigId, Versioned<Gig>>,
    bids: HashMap<BidId, Versioned<Bid>>,
}

/// Key of a document observed by a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum DocKey {
    Gig(GigId),
    Bid(BidId),
}

/// Write staged inside a transaction, applied at commit.
#[derive(Debug, Clone)]
enum StagedWrite {
    PutGig(Gig),
    PutBid(Bid),
    /// Set the status of every bid referencing `gig_id` except `exclude`.
    /// The matching set is resolved at commit time, under the write lock.
    UpdateBidsWhere {
        gig_id: GigId,
        exclude: BidId,
        status: BidStatus,
    },
}

/// Unit of work over the store.
///
/// Returned by [`MemoryStore::begin`] and consumed by
/// [`MemoryStore::commit`] or [`MemoryStore::abort`]. Dropping a
/// transaction without committing discards it with no visible effect.
#[derive(Debug, Default)]
pub struct Transaction {
    /// Revision observed per document; `None` records "observed absent".
    reads: HashMap<DocKey, Option<Revision>>,
    writes: Vec<StagedWrite>,
}

impl Transaction {
    /// Stage a gig write.
    pub fn put_gig(&mut self, gig: Gig) {
        self.writes.push(StagedWrite::PutGig(gig));
    }

    /// Stage a bid write.
    pub fn put_bid(&mut self, bid: Bid) {
        self.writes.push(StagedWrite::PutBid(bid));
    }

    /// Stage a bulk status update for every other bid of a gig.
    pub fn update_bids_where(&mut self, gig_id: GigId, exclude: BidId, status: BidStatus) {
        self.writes.push(StagedWrite::UpdateBidsWhere {
            gig_id,
            exclude,
            status,
        });
    }
}

/// Shared in-memory document store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a unit of work.
    pub fn begin(&self) -> Transaction {
        Transaction::default()
    }

    /// Read a gig from committed state.
    pub async fn get_gig(&self, id: &GigId) -> StoreResult<Option<Gig>> {
        let tables = self.tables.read().await;
        Ok(tables.gigs.get(id).map(|v| v.value.clone()))
    }

    /// Read a bid from committed state.
    pub async fn get_bid(&self, id: &BidId) -> StoreResult<Option<Bid>> {
        let tables = self.tables.read().await;
        Ok(tables.bids.get(id).map(|v| v.value.clone()))
    }

    /// Read a gig through a transaction, recording the observed revision.
    pub async fn txn_get_gig(
        &self,
        txn: &mut Transaction,
        id: &GigId,
    ) -> StoreResult<Option<Gig>> {
        let tables = self.tables.read().await;
        let entry = tables.gigs.get(id);
        txn.reads
            .insert(DocKey::Gig(id.clone()), entry.map(|v| v.revision));
        Ok(entry.map(|v| v.value.clone()))
    }

    /// Read a bid through a transaction, recording the observed revision.
    pub async fn txn_get_bid(
        &self,
        txn: &mut Transaction,
        id: &BidId,
    ) -> StoreResult<Option<Bid>> {
        let tables = self.tables.read().await;
        let entry = tables.bids.get(id);
        txn.reads
            .insert(DocKey::Bid(id.clone()), entry.map(|v| v.revision));
        Ok(entry.map(|v| v.value.clone()))
    }

    /// List committed bids referencing a gig.
    pub async fn bids_for_gig(&self, gig_id: &GigId) -> StoreResult<Vec<Bid>> {
        let tables = self.tables.read().await;
        Ok(tables
            .bids
            .values()
            .filter(|v| v.value.gig_id == *gig_id)
            .map(|v| v.value.clone())
            .collect())
    }

    /// Commit a transaction: verify every observed revision, then apply
    /// all staged writes atomically. On any mismatch nothing is applied.
    pub async fn commit(&self, txn: Transaction) -> StoreResult<()> {
        let mut tables = self.tables.write().await;

        for (key, observed) in &txn.reads {
            let current = match key {
                DocKey::Gig(id) => tables.gigs.get(id).map(|v| v.revision),
                DocKey::Bid(id) => tables.bids.get(id).map(|v| v.revision),
            };
            if current != *observed {
                let what = match key {
                    DocKey::Gig(id) => format!("gig {}", id),
                    DocKey::Bid(id) => format!("bid {}", id),
                };
                return Err(StoreError::txn_conflict(format!(
                    "{} changed since transaction start",
                    what
                )));
            }
        }

        let write_count = txn.writes.len();
        for write in txn.writes {
            match write {
                StagedWrite::PutGig(gig) => {
                    upsert(&mut tables.gigs, gig.id.clone(), gig);
                }
                StagedWrite::PutBid(bid) => {
                    upsert(&mut tables.bids, bid.id.clone(), bid);
                }
                StagedWrite::UpdateBidsWhere {
                    gig_id,
                    exclude,
                    status,
                } => {
                    for (id, entry) in tables.bids.iter_mut() {
                        if entry.value.gig_id == gig_id && *id != exclude {
                            entry.value.status = status;
                            entry.value.updated_at = Utc::now();
                            entry.revision += 1;
                        }
                    }
                }
            }
        }

        debug!("Committed transaction with {} writes", write_count);
        Ok(())
    }

    /// Abort a transaction, discarding staged writes.
    pub async fn abort(&self, txn: Transaction) {
        debug!("Aborted transaction with {} staged writes", txn.writes.len());
        drop(txn);
    }

    /// Upsert a gig outside any transaction. Used by the collaborators
    /// that create gigs, and by tests.
    pub async fn put_gig(&self, gig: Gig) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        upsert(&mut tables.gigs, gig.id.clone(), gig);
        Ok(())
    }

    /// Upsert a bid outside any transaction.
    pub async fn put_bid(&self, bid: Bid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        upsert(&mut tables.bids, bid.id.clone(), bid);
        Ok(())
    }
}

fn upsert<K, T>(table: &mut HashMap<K, Versioned<T>>, key: K, value: T)
where
    K: std::hash::Hash + Eq,
{
    match table.get_mut(&key) {
        Some(entry) => {
            entry.revision += 1;
            entry.value = value;
        }
        None => {
            table.insert(
                key,
                Versioned {
                    revision: 1,
                    value,
                },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gigwork_models::GigStatus;

    fn gig(id: &str, owner: &str) -> Gig {
        Gig::new(GigId::from(id), owner, "Test gig")
    }

    fn bid(id: &str, gig_id: &str, freelancer: &str) -> Bid {
        Bid::new(BidId::from(id), GigId::from(gig_id), freelancer, 1_000)
    }

    #[tokio::test]
    async fn test_commit_applies_all_writes() {
        let store = MemoryStore::new();
        store.put_gig(gig("g1", "owner")).await.unwrap();
        store.put_bid(bid("b1", "g1", "f1")).await.unwrap();
        store.put_bid(bid("b2", "g1", "f2")).await.unwrap();

        let mut txn = store.begin();
        let g = store
            .txn_get_gig(&mut txn, &GigId::from("g1"))
            .await
            .unwrap()
            .unwrap();
        let b = store
            .txn_get_bid(&mut txn, &BidId::from("b1"))
            .await
            .unwrap()
            .unwrap();
        txn.put_gig(g.assign());
        txn.put_bid(b.hire());
        txn.update_bids_where(GigId::from("g1"), BidId::from("b1"), BidStatus::Rejected);
        store.commit(txn).await.unwrap();

        let g = store.get_gig(&GigId::from("g1")).await.unwrap().unwrap();
        assert_eq!(g.status, GigStatus::Assigned);
        let b1 = store.get_bid(&BidId::from("b1")).await.unwrap().unwrap();
        assert_eq!(b1.status, BidStatus::Hired);
        let b2 = store.get_bid(&BidId::from("b2")).await.unwrap().unwrap();
        assert_eq!(b2.status, BidStatus::Rejected);
    }

    #[tokio::test]
    async fn test_abort_leaves_no_trace() {
        let store = MemoryStore::new();
        store.put_gig(gig("g1", "owner")).await.unwrap();

        let mut txn = store.begin();
        let g = store
            .txn_get_gig(&mut txn, &GigId::from("g1"))
            .await
            .unwrap()
            .unwrap();
        txn.put_gig(g.assign());
        store.abort(txn).await;

        let g = store.get_gig(&GigId::from("g1")).await.unwrap().unwrap();
        assert_eq!(g.status, GigStatus::Open);
    }

    #[tokio::test]
    async fn test_conflicting_commit_applies_nothing() {
        let store = MemoryStore::new();
        store.put_gig(gig("g1", "owner")).await.unwrap();
        store.put_bid(bid("b1", "g1", "f1")).await.unwrap();

        // Both transactions observe the same gig revision.
        let mut first = store.begin();
        let g1 = store
            .txn_get_gig(&mut first, &GigId::from("g1"))
            .await
            .unwrap()
            .unwrap();
        let mut second = store.begin();
        let g2 = store
            .txn_get_gig(&mut second, &GigId::from("g1"))
            .await
            .unwrap()
            .unwrap();
        let b2 = store
            .txn_get_bid(&mut second, &BidId::from("b1"))
            .await
            .unwrap()
            .unwrap();

        first.put_gig(g1.assign());
        store.commit(first).await.unwrap();

        second.put_gig(g2.assign());
        second.put_bid(b2.hire());
        let err = store.commit(second).await.unwrap_err();
        assert!(err.is_conflict());

        // The loser's bid write must not have landed.
        let b = store.get_bid(&BidId::from("b1")).await.unwrap().unwrap();
        assert_eq!(b.status, BidStatus::Pending);
    }

    #[tokio::test]
    async fn test_observed_absent_conflicts_with_later_insert() {
        let store = MemoryStore::new();

        let mut txn = store.begin();
        let missing = store
            .txn_get_gig(&mut txn, &GigId::from("g1"))
            .await
            .unwrap();
        assert!(missing.is_none());

        store.put_gig(gig("g1", "owner")).await.unwrap();

        txn.put_gig(gig("g1", "someone-else"));
        let err = store.commit(txn).await.unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_update_where_skips_excluded_and_other_gigs() {
        let store = MemoryStore::new();
        store.put_bid(bid("b1", "g1", "f1")).await.unwrap();
        store.put_bid(bid("b2", "g1", "f2")).await.unwrap();
        store.put_bid(bid("b3", "g2", "f3")).await.unwrap();

        let mut txn = store.begin();
        txn.update_bids_where(GigId::from("g1"), BidId::from("b1"), BidStatus::Rejected);
        store.commit(txn).await.unwrap();

        let b1 = store.get_bid(&BidId::from("b1")).await.unwrap().unwrap();
        let b2 = store.get_bid(&BidId::from("b2")).await.unwrap().unwrap();
        let b3 = store.get_bid(&BidId::from("b3")).await.unwrap().unwrap();
        assert_eq!(b1.status, BidStatus::Pending);
        assert_eq!(b2.status, BidStatus::Rejected);
        assert_eq!(b3.status, BidStatus::Pending);
    }
}
