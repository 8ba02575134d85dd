//! Typed repositories for Gigs and Bids.

use tracing::info;

use gigwork_models::{Bid, BidId, BidStatus, Gig, GigId};

use crate::engine::{MemoryStore, Transaction};
use crate::error::StoreResult;

/// Repository for gig documents.
#[derive(Clone)]
pub struct GigRepository {
    store: MemoryStore,
}

impl GigRepository {
    /// Create a new gig repository.
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    /// Get a gig by ID from committed state.
    pub async fn get(&self, id: &GigId) -> StoreResult<Option<Gig>> {
        self.store.get_gig(id).await
    }

    /// Get a gig by ID through a transaction.
    pub async fn get_tx(&self, txn: &mut Transaction, id: &GigId) -> StoreResult<Option<Gig>> {
        self.store.txn_get_gig(txn, id).await
    }

    /// Stage a gig write inside a transaction.
    pub fn set_tx(&self, txn: &mut Transaction, gig: Gig) {
        txn.put_gig(gig);
    }

    /// Create or replace a gig record outside any transaction.
    pub async fn put(&self, gig: Gig) -> StoreResult<()> {
        let id = gig.id.clone();
        self.store.put_gig(gig).await?;
        info!("Created gig record: {}", id);
        Ok(())
    }
}

/// Repository for bid documents.
#[derive(Clone)]
pub struct BidRepository {
    store: MemoryStore,
}

impl BidRepository {
    /// Create a new bid repository.
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    /// Get a bid by ID from committed state.
    pub async fn get(&self, id: &BidId) -> StoreResult<Option<Bid>> {
        self.store.get_bid(id).await
    }

    /// Get a bid by ID through a transaction.
    pub async fn get_tx(&self, txn: &mut Transaction, id: &BidId) -> StoreResult<Option<Bid>> {
        self.store.txn_get_bid(txn, id).await
    }

    /// Stage a bid write inside a transaction.
    pub fn set_tx(&self, txn: &mut Transaction, bid: Bid) {
        txn.put_bid(bid);
    }

    /// Stage a bulk status update for every bid of `gig_id` except
    /// `exclude`. Resolved against committed state at commit time.
    pub fn update_where_tx(
        &self,
        txn: &mut Transaction,
        gig_id: GigId,
        exclude: BidId,
        status: BidStatus,
    ) {
        txn.update_bids_where(gig_id, exclude, status);
    }

    /// List committed bids referencing a gig.
    pub async fn list_for_gig(&self, gig_id: &GigId) -> StoreResult<Vec<Bid>> {
        self.store.bids_for_gig(gig_id).await
    }

    /// Create or replace a bid record outside any transaction.
    pub async fn put(&self, bid: Bid) -> StoreResult<()> {
        let id = bid.id.clone();
        self.store.put_bid(bid).await?;
        info!("Created bid record: {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_repositories_share_the_engine() {
        let store = MemoryStore::new();
        let gigs = GigRepository::new(store.clone());
        let bids = BidRepository::new(store.clone());

        let gig = Gig::new(GigId::from("g1"), "owner", "Paint a fence");
        gigs.put(gig).await.unwrap();
        bids.put(Bid::new(
            BidId::from("b1"),
            GigId::from("g1"),
            "freelancer",
            5_000,
        ))
        .await
        .unwrap();

        let mut txn = store.begin();
        let gig = gigs.get_tx(&mut txn, &GigId::from("g1")).await.unwrap().unwrap();
        let bid = bids.get_tx(&mut txn, &BidId::from("b1")).await.unwrap().unwrap();
        gigs.set_tx(&mut txn, gig.assign());
        bids.set_tx(&mut txn, bid.hire());
        store.commit(txn).await.unwrap();

        let listed = bids.list_for_gig(&GigId::from("g1")).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].status, BidStatus::Hired);
    }
}
