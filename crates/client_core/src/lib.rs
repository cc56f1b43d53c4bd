//! Auction state consumed by the auction view: the observable field set, the
//! commands a view may send, and an in-memory implementation backed by a
//! shared [`AuctionStore`].

use serde::Serialize;
use shared::{
    domain::{AuctionId, AuctionPhase},
    error::ActionOutcome,
};
use tokio::sync::watch;

pub mod clock;
pub mod config;
mod local_state;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::AuctionDefaults;
pub use local_state::{LocalAuctionState, Session};
pub use store::{AuctionRecord, AuctionStatus, AuctionStore, NewAuction, SharedAuctionStore};

/// Decoded RGBA preview of an auction image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageData {
    pub width: usize,
    pub height: usize,
    #[serde(skip)]
    pub rgba: Vec<u8>,
}

/// Every value an auction view binds to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuctionFields {
    pub id: Option<AuctionId>,
    pub header: String,
    pub title: String,
    pub description: String,
    pub error: String,
    pub increment: u32,
    pub reason: String,
    pub reserve_price: u32,
    pub time_hours: u32,
    pub timer: String,
    pub buyout_price: u32,
    pub image: Option<ImageData>,
    pub current_bidder: String,
    pub current_bid: u32,
    pub incoming_bid: u32,
    pub seller: String,
    pub phase: AuctionPhase,
    pub moderator_visible: bool,
    pub disable_as_in_display: bool,
}

/// A user edit of one bound field, sent from the view to the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    Title(String),
    Description(String),
    ReservePrice(u32),
    BuyoutPrice(u32),
    Increment(u32),
    TimeToRun(u32),
    IncomingBid(u32),
    Reason(String),
    Image(Option<ImageData>),
}

/// State object behind an auction view.
///
/// Implementations own every observable field. Commands that can fail return
/// an [`ActionOutcome`] and mirror its text into [`AuctionFields::error`].
pub trait AuctionViewModel {
    fn fields(&self) -> AuctionFields;

    /// Receiver notified whenever any observable field changes.
    fn subscribe(&self) -> watch::Receiver<AuctionFields>;

    fn is_moderator(&self) -> bool;

    fn edit(&mut self, edit: FieldEdit);

    /// Clears the error text and the pending bid and reason. Without a
    /// selected auction the fields leave creation mode and freeze.
    fn reset(&mut self);

    /// Clears the values of a previous auction from the creation fields.
    fn wipe(&mut self);

    /// Switches to creation mode with default prices and duration.
    fn set_for_start(&mut self);

    fn start_auction(&mut self) -> ActionOutcome;

    fn place_bid(&mut self) -> ActionOutcome;

    fn buyout(&mut self) -> ActionOutcome;

    fn delete_auction(&mut self) -> ActionOutcome;

    fn leave_auction_view(&mut self);
}
