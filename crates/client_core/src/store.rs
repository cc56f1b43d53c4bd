use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::{domain::AuctionId, error::AuctionError};

use crate::ImageData;

/// Store handle shared by every session on the UI thread.
pub type SharedAuctionStore = Rc<RefCell<AuctionStore>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AuctionStatus {
    Open,
    Sold,
    Deleted { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct AuctionRecord {
    pub id: AuctionId,
    pub seller: String,
    pub title: String,
    pub description: String,
    pub reserve_price: u32,
    pub buyout_price: u32,
    pub increment: u32,
    #[serde(skip)]
    pub image: Option<ImageData>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub current_bid: u32,
    pub current_bidder: Option<String>,
    pub status: AuctionStatus,
}

impl AuctionRecord {
    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        self.status == AuctionStatus::Open && now < self.ends_at
    }

    /// Smallest amount the next bid may have.
    pub fn minimum_bid(&self) -> u32 {
        if self.current_bidder.is_none() {
            self.reserve_price
        } else {
            self.current_bid.saturating_add(self.increment)
        }
    }
}

/// Validated input for [`AuctionStore::create`].
#[derive(Debug, Clone)]
pub struct NewAuction {
    pub seller: String,
    pub title: String,
    pub description: String,
    pub reserve_price: u32,
    pub buyout_price: u32,
    pub increment: u32,
    pub image: Option<ImageData>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct AuctionStore {
    auctions: BTreeMap<AuctionId, AuctionRecord>,
    next_id: i64,
}

impl AuctionStore {
    pub fn shared() -> SharedAuctionStore {
        Rc::new(RefCell::new(Self::default()))
    }

    pub fn create(&mut self, auction: NewAuction) -> AuctionId {
        self.next_id += 1;
        let id = AuctionId(self.next_id);
        self.auctions.insert(
            id,
            AuctionRecord {
                id,
                seller: auction.seller,
                title: auction.title,
                description: auction.description,
                reserve_price: auction.reserve_price,
                buyout_price: auction.buyout_price,
                increment: auction.increment,
                image: auction.image,
                starts_at: auction.starts_at,
                ends_at: auction.ends_at,
                current_bid: 0,
                current_bidder: None,
                status: AuctionStatus::Open,
            },
        );
        tracing::info!(auction_id = id.0, "auction created");
        id
    }

    pub fn get(&self, id: AuctionId) -> Option<&AuctionRecord> {
        self.auctions.get(&id)
    }

    pub fn get_mut(&mut self, id: AuctionId) -> Result<&mut AuctionRecord, AuctionError> {
        self.auctions
            .get_mut(&id)
            .ok_or_else(|| AuctionError::not_found(format!("Auction {} does not exist", id.0)))
    }

    /// Auctions that have not been deleted, oldest first.
    pub fn list(&self) -> Vec<&AuctionRecord> {
        self.auctions
            .values()
            .filter(|record| !matches!(record.status, AuctionStatus::Deleted { .. }))
            .collect()
    }
}
