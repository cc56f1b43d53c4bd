use chrono::{DateTime, Duration, Utc};
use shared::{
    domain::{AuctionId, AuctionPhase, Role},
    error::{ActionOutcome, AuctionError},
};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{
    clock::{Clock, SystemClock},
    config::AuctionDefaults,
    store::{AuctionRecord, AuctionStatus, NewAuction, SharedAuctionStore},
    AuctionFields, AuctionViewModel, FieldEdit,
};

const START_HEADER: &str = "Start auction";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub username: String,
    pub role: Role,
}

impl Session {
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            role,
        }
    }
}

/// In-memory auction state for one signed-in user.
///
/// Several sessions may share one store; each keeps its own field set and
/// selected auction.
pub struct LocalAuctionState<C = SystemClock> {
    store: SharedAuctionStore,
    session: Session,
    defaults: AuctionDefaults,
    clock: C,
    selected: Option<AuctionId>,
    fields: watch::Sender<AuctionFields>,
}

impl<C: Clock> LocalAuctionState<C> {
    pub fn new(
        store: SharedAuctionStore,
        session: Session,
        defaults: AuctionDefaults,
        clock: C,
    ) -> Self {
        let (fields, _) = watch::channel(AuctionFields {
            moderator_visible: session.role.is_moderator(),
            disable_as_in_display: true,
            ..AuctionFields::default()
        });
        Self {
            store,
            session,
            defaults,
            clock,
            selected: None,
            fields,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn selected(&self) -> Option<AuctionId> {
        self.selected
    }

    /// Selects the auction a display view shows.
    pub fn open_auction(&mut self, id: AuctionId) -> Result<(), AuctionError> {
        if self.store.borrow().get(id).is_none() {
            return Err(AuctionError::not_found(format!(
                "Auction {} does not exist",
                id.0
            )));
        }
        self.selected = Some(id);
        self.project_selected();
        debug!(auction_id = id.0, "auction selected");
        Ok(())
    }

    /// Pushes the remaining time and the leading bid of the selected auction
    /// into the view and closes it once the auction has run out. Bids placed
    /// by other sessions on the shared store show up here.
    pub fn refresh_countdown(&self) {
        let Some(id) = self.selected else {
            return;
        };
        let now = self.clock.now();
        let store = self.store.borrow();
        let Some(record) = store.get(id) else {
            return;
        };
        let timer = timer_text(record, now);
        let phase = phase_of(record, now);
        let bidder = record.current_bidder.clone().unwrap_or_default();
        let bid = record.current_bid;

        let changed = self.fields.send_if_modified(|f| {
            if f.phase == AuctionPhase::Creating {
                return false;
            }
            let closing = f.phase != phase;
            let outbid = f.current_bid != bid || f.current_bidder != bidder;
            let changed = closing || outbid || f.timer != timer;
            f.timer = timer;
            f.phase = phase;
            f.current_bid = bid;
            f.current_bidder = bidder;
            if closing {
                f.incoming_bid = 0;
            }
            changed
        });
        if changed && phase == AuctionPhase::Closed {
            info!(auction_id = id.0, "auction closed");
        }
    }

    fn project_selected(&self) {
        let Some(id) = self.selected else {
            return;
        };
        let now = self.clock.now();
        let store = self.store.borrow();
        if let Some(record) = store.get(id) {
            self.fields.send_modify(|f| project(record, now, f));
        }
    }

    fn finish(&self, action: &'static str, result: Result<(), AuctionError>) -> ActionOutcome {
        let outcome = ActionOutcome::from(result);
        if outcome.is_success() {
            info!(action, user = %self.session.username, "auction action succeeded");
        } else {
            warn!(action, user = %self.session.username, error = outcome.error_text(), "auction action rejected");
        }
        let error = outcome.error_text().to_string();
        self.fields.send_modify(|f| f.error = error);
        outcome
    }

    fn selected_id(&self) -> Result<AuctionId, AuctionError> {
        self.selected
            .ok_or_else(|| AuctionError::not_found("No auction is selected"))
    }

    fn try_start_auction(&mut self) -> Result<(), AuctionError> {
        if self.session.role.is_moderator() {
            return Err(AuctionError::unauthorized("Moderators cannot start auctions"));
        }

        let draft = self.fields.borrow().clone();
        if draft.phase != AuctionPhase::Creating {
            return Err(AuctionError::validation("This auction has already been started"));
        }
        if draft.title.trim().is_empty() {
            return Err(AuctionError::validation("Title is required"));
        }
        if draft.description.trim().is_empty() {
            return Err(AuctionError::validation("Description is required"));
        }
        let max_hours = self.defaults.max_duration_hours;
        if draft.time_hours == 0 || draft.time_hours > max_hours {
            return Err(AuctionError::validation(format!(
                "Duration must be between 1 and {max_hours} hours"
            )));
        }
        if draft.reserve_price == 0 {
            return Err(AuctionError::validation("Reserve price must be greater than 0"));
        }
        if draft.increment == 0 {
            return Err(AuctionError::validation("Bid increment must be greater than 0"));
        }
        if draft.buyout_price != 0 && draft.buyout_price < draft.reserve_price {
            return Err(AuctionError::validation(
                "Buyout price must not be lower than the reserve price",
            ));
        }

        let starts_at = self.clock.now();
        let ends_at = Duration::try_hours(i64::from(draft.time_hours))
            .and_then(|run| starts_at.checked_add_signed(run))
            .ok_or_else(|| AuctionError::validation("Duration is too long"))?;
        let id = self.store.borrow_mut().create(NewAuction {
            seller: self.session.username.clone(),
            title: draft.title.trim().to_string(),
            description: draft.description.trim().to_string(),
            reserve_price: draft.reserve_price,
            buyout_price: draft.buyout_price,
            increment: draft.increment,
            image: draft.image,
            starts_at,
            ends_at,
        });
        self.selected = Some(id);
        self.project_selected();
        Ok(())
    }

    fn try_place_bid(&mut self) -> Result<(), AuctionError> {
        if self.session.role.is_moderator() {
            return Err(AuctionError::unauthorized("Moderators cannot place bids"));
        }
        let id = self.selected_id()?;
        let amount = self.fields.borrow().incoming_bid;
        let now = self.clock.now();

        {
            let mut store = self.store.borrow_mut();
            let record = store.get_mut(id)?;
            if !record.is_open_at(now) {
                return Err(AuctionError::already_closed("Auction is closed"));
            }
            if record.seller == self.session.username {
                return Err(AuctionError::unauthorized("You cannot bid on your own auction"));
            }
            let minimum = record.minimum_bid();
            if amount < minimum {
                return Err(AuctionError::validation(format!("Bid must be at least {minimum}")));
            }
            record.current_bid = amount;
            record.current_bidder = Some(self.session.username.clone());
        }

        info!(auction_id = id.0, amount, "bid placed");
        self.project_selected();
        self.fields.send_modify(|f| f.incoming_bid = 0);
        Ok(())
    }

    fn try_buyout(&mut self) -> Result<(), AuctionError> {
        if self.session.role.is_moderator() {
            return Err(AuctionError::unauthorized("Moderators cannot buy auctions"));
        }
        let id = self.selected_id()?;
        let now = self.clock.now();

        {
            let mut store = self.store.borrow_mut();
            let record = store.get_mut(id)?;
            if record.buyout_price == 0 {
                return Err(AuctionError::validation("This auction has no buyout price"));
            }
            if !record.is_open_at(now) {
                return Err(AuctionError::already_closed("Auction is closed"));
            }
            if record.seller == self.session.username {
                return Err(AuctionError::unauthorized("You cannot buy your own auction"));
            }
            if record.current_bidder.is_some() && record.current_bid >= record.buyout_price {
                return Err(AuctionError::validation(
                    "A bid at or above the buyout price is already active",
                ));
            }
            record.current_bid = record.buyout_price;
            record.current_bidder = Some(self.session.username.clone());
            record.status = AuctionStatus::Sold;
        }

        info!(auction_id = id.0, "auction bought out");
        self.project_selected();
        Ok(())
    }

    fn try_delete_auction(&mut self) -> Result<(), AuctionError> {
        if !self.session.role.is_moderator() {
            return Err(AuctionError::unauthorized("Only moderators can delete auctions"));
        }
        let id = self.selected_id()?;
        let reason = self.fields.borrow().reason.trim().to_string();
        if reason.is_empty() {
            return Err(AuctionError::validation(
                "A reason is required to delete an auction",
            ));
        }
        let now = self.clock.now();

        {
            let mut store = self.store.borrow_mut();
            let record = store.get_mut(id)?;
            if !record.is_open_at(now) {
                return Err(AuctionError::already_closed("Auction is already closed"));
            }
            record.status = AuctionStatus::Deleted {
                reason: reason.clone(),
            };
        }

        info!(auction_id = id.0, %reason, "auction deleted by moderator");
        self.project_selected();
        Ok(())
    }
}

impl<C: Clock> AuctionViewModel for LocalAuctionState<C> {
    fn fields(&self) -> AuctionFields {
        self.fields.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<AuctionFields> {
        self.fields.subscribe()
    }

    fn is_moderator(&self) -> bool {
        self.session.role.is_moderator()
    }

    fn edit(&mut self, edit: FieldEdit) {
        let always_editable = matches!(edit, FieldEdit::IncomingBid(_) | FieldEdit::Reason(_));
        self.fields.send_if_modified(|f| {
            if f.disable_as_in_display && !always_editable {
                debug!(?edit, "ignoring edit of a field frozen for display");
                return false;
            }
            match edit {
                FieldEdit::IncomingBid(amount) => f.incoming_bid = amount,
                FieldEdit::Reason(reason) => f.reason = reason,
                FieldEdit::Title(title) => f.title = title,
                FieldEdit::Description(description) => f.description = description,
                FieldEdit::ReservePrice(price) => f.reserve_price = price,
                FieldEdit::BuyoutPrice(price) => f.buyout_price = price,
                FieldEdit::Increment(increment) => f.increment = increment,
                FieldEdit::TimeToRun(hours) => f.time_hours = hours,
                FieldEdit::Image(image) => f.image = image,
            }
            true
        });
    }

    fn reset(&mut self) {
        let moderator_visible = self.session.role.is_moderator();
        let selected = self.selected;
        self.fields.send_modify(|f| {
            f.error.clear();
            f.incoming_bid = 0;
            f.reason.clear();
            f.moderator_visible = moderator_visible;
            if selected.is_none() && f.phase == AuctionPhase::Creating {
                f.phase = AuctionPhase::Closed;
                f.disable_as_in_display = true;
            }
        });
        self.project_selected();
    }

    fn wipe(&mut self) {
        self.fields.send_modify(|f| {
            f.id = None;
            f.title.clear();
            f.description.clear();
            f.image = None;
            f.seller.clear();
            f.current_bidder.clear();
            f.current_bid = 0;
            f.incoming_bid = 0;
            f.timer.clear();
            f.reason.clear();
            f.error.clear();
        });
    }

    fn set_for_start(&mut self) {
        self.selected = None;
        let defaults = self.defaults.clone();
        self.fields.send_modify(|f| {
            f.header = START_HEADER.to_string();
            f.phase = AuctionPhase::Creating;
            f.disable_as_in_display = false;
            f.reserve_price = defaults.reserve_price;
            f.buyout_price = defaults.buyout_price;
            f.increment = defaults.increment;
            f.time_hours = defaults.duration_hours;
        });
    }

    fn start_auction(&mut self) -> ActionOutcome {
        let result = self.try_start_auction();
        self.finish("start_auction", result)
    }

    fn place_bid(&mut self) -> ActionOutcome {
        let result = self.try_place_bid();
        self.finish("place_bid", result)
    }

    fn buyout(&mut self) -> ActionOutcome {
        let result = self.try_buyout();
        self.finish("buyout", result)
    }

    fn delete_auction(&mut self) -> ActionOutcome {
        let result = self.try_delete_auction();
        self.finish("delete_auction", result)
    }

    fn leave_auction_view(&mut self) {
        self.selected = None;
        let moderator_visible = self.session.role.is_moderator();
        self.fields.send_replace(AuctionFields {
            moderator_visible,
            disable_as_in_display: true,
            ..AuctionFields::default()
        });
    }
}

fn phase_of(record: &AuctionRecord, now: DateTime<Utc>) -> AuctionPhase {
    if record.is_open_at(now) {
        AuctionPhase::AcceptingBids
    } else {
        AuctionPhase::Closed
    }
}

fn timer_text(record: &AuctionRecord, now: DateTime<Utc>) -> String {
    match &record.status {
        AuctionStatus::Sold => "Sold".to_string(),
        AuctionStatus::Deleted { .. } => "Deleted".to_string(),
        AuctionStatus::Open if now >= record.ends_at => "Closed".to_string(),
        AuctionStatus::Open => format_remaining(record.ends_at - now),
    }
}

/// Formats a remaining duration as `HH:MM:SS`; hours may exceed 24.
pub(crate) fn format_remaining(remaining: Duration) -> String {
    let total = remaining.num_seconds().max(0);
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

fn project(record: &AuctionRecord, now: DateTime<Utc>, f: &mut AuctionFields) {
    f.id = Some(record.id);
    f.header = format!("Auction #{}", record.id.0);
    f.title = record.title.clone();
    f.description = record.description.clone();
    f.reserve_price = record.reserve_price;
    f.buyout_price = record.buyout_price;
    f.increment = record.increment;
    f.time_hours = u32::try_from((record.ends_at - record.starts_at).num_hours()).unwrap_or(0);
    f.image = record.image.clone();
    f.seller = record.seller.clone();
    f.current_bid = record.current_bid;
    f.current_bidder = record.current_bidder.clone().unwrap_or_default();
    f.timer = timer_text(record, now);
    f.phase = phase_of(record, now);
    f.disable_as_in_display = true;
}

#[cfg(test)]
#[path = "tests/local_state_tests.rs"]
mod tests;
