//! Pure derivation of what the auction view shows from the auction fields.

use client_core::{AuctionFields, FieldEdit};
use serde::Serialize;
use shared::domain::WindowType;

use crate::controller::events::{ActionKind, ViewAction};

/// Controls of the auction view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    HeaderLabel,
    IdLabel,
    TitleArea,
    DescriptionArea,
    ReservePriceField,
    BuyoutPriceField,
    IncrementField,
    ImageView,
    ErrorLabel,
    BackButton,
    // start group
    ImportButton,
    TimeLabel,
    TimeField,
    HoursLabel,
    StartAuctionButton,
    CancelButton,
    // bid group
    TimerCountdownLabel,
    CurrentBidderTextLabel,
    CurrentBidderLabel,
    CurrentBidTextLabel,
    CurrentBidLabel,
    BidLabel,
    IncomingBidField,
    PlaceBidButton,
    BuyNowButton,
    // moderator group
    SomethingWrongLabel,
    SellerTextLabel,
    SellerLabel,
    ReasonArea,
    DeleteButton,
}

impl Control {
    pub const ALL: [Control; 30] = [
        Control::HeaderLabel,
        Control::IdLabel,
        Control::TitleArea,
        Control::DescriptionArea,
        Control::ReservePriceField,
        Control::BuyoutPriceField,
        Control::IncrementField,
        Control::ImageView,
        Control::ErrorLabel,
        Control::BackButton,
        Control::ImportButton,
        Control::TimeLabel,
        Control::TimeField,
        Control::HoursLabel,
        Control::StartAuctionButton,
        Control::CancelButton,
        Control::TimerCountdownLabel,
        Control::CurrentBidderTextLabel,
        Control::CurrentBidderLabel,
        Control::CurrentBidTextLabel,
        Control::CurrentBidLabel,
        Control::BidLabel,
        Control::IncomingBidField,
        Control::PlaceBidButton,
        Control::BuyNowButton,
        Control::SomethingWrongLabel,
        Control::SellerTextLabel,
        Control::SellerLabel,
        Control::ReasonArea,
        Control::DeleteButton,
    ];
}

const FROZEN_IN_DISPLAY: [Control; 5] = [
    Control::TitleArea,
    Control::DescriptionArea,
    Control::ReservePriceField,
    Control::BuyoutPriceField,
    Control::IncrementField,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GroupVisibility {
    pub start_group: bool,
    pub bid_group: bool,
    pub bid_entry: bool,
    pub buy_now: bool,
    pub moderator_group: bool,
}

impl GroupVisibility {
    pub fn derive(window_type: WindowType, fields: &AuctionFields, is_moderator: bool) -> Self {
        let start_group =
            window_type == WindowType::StartAuction && fields.phase.shows_start_controls();
        let bid_group = !start_group;
        let bid_entry = bid_group && fields.phase.accepts_bids() && !is_moderator;
        Self {
            start_group,
            bid_group,
            bid_entry,
            buy_now: bid_entry && fields.buyout_price > 0,
            moderator_group: fields.moderator_visible,
        }
    }

    fn shows(&self, control: Control) -> bool {
        match control {
            Control::ImportButton
            | Control::TimeLabel
            | Control::TimeField
            | Control::HoursLabel
            | Control::StartAuctionButton
            | Control::CancelButton => self.start_group,
            Control::TimerCountdownLabel
            | Control::CurrentBidderTextLabel
            | Control::CurrentBidderLabel
            | Control::CurrentBidTextLabel
            | Control::CurrentBidLabel
            | Control::BidLabel => self.bid_group,
            Control::IncomingBidField | Control::PlaceBidButton => self.bid_entry,
            Control::BuyNowButton => self.buy_now,
            Control::SomethingWrongLabel
            | Control::SellerTextLabel
            | Control::SellerLabel
            | Control::ReasonArea
            | Control::DeleteButton => self.moderator_group,
            Control::HeaderLabel
            | Control::IdLabel
            | Control::TitleArea
            | Control::DescriptionArea
            | Control::ReservePriceField
            | Control::BuyoutPriceField
            | Control::IncrementField
            | Control::ImageView
            | Control::ErrorLabel
            | Control::BackButton => true,
        }
    }
}

/// Everything the auction view displays, derived from one field snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuctionViewRender {
    pub window_type: WindowType,
    pub id: String,
    pub header: String,
    pub title: String,
    pub description: String,
    pub error: String,
    pub increment: String,
    pub reason: String,
    pub reserve_price: String,
    pub time_to_run: String,
    pub timer: String,
    pub buyout_price: String,
    pub image_size: Option<[usize; 2]>,
    pub current_bidder: String,
    pub current_bid: String,
    pub incoming_bid: String,
    pub seller: String,
    pub visibility: GroupVisibility,
    pub visible_controls: Vec<Control>,
    pub fields_disabled: bool,
    pub permitted: Vec<ActionKind>,
}

impl AuctionViewRender {
    pub fn derive(window_type: WindowType, fields: &AuctionFields, is_moderator: bool) -> Self {
        let visibility = GroupVisibility::derive(window_type, fields, is_moderator);

        let mut permitted = vec![ActionKind::Cancel];
        if visibility.start_group {
            permitted.extend([ActionKind::StartAuction, ActionKind::ImportImage]);
        }
        if visibility.bid_entry {
            permitted.push(ActionKind::PlaceBid);
        }
        if visibility.buy_now {
            permitted.push(ActionKind::BuyNow);
        }
        if visibility.moderator_group {
            permitted.push(ActionKind::Delete);
        }

        Self {
            window_type,
            id: fields.id.map(|id| id.0.to_string()).unwrap_or_default(),
            header: fields.header.clone(),
            title: fields.title.clone(),
            description: fields.description.clone(),
            error: fields.error.clone(),
            increment: fields.increment.to_string(),
            reason: fields.reason.clone(),
            reserve_price: fields.reserve_price.to_string(),
            time_to_run: fields.time_hours.to_string(),
            timer: fields.timer.clone(),
            buyout_price: fields.buyout_price.to_string(),
            image_size: fields.image.as_ref().map(|image| [image.width, image.height]),
            current_bidder: fields.current_bidder.clone(),
            current_bid: fields.current_bid.to_string(),
            incoming_bid: fields.incoming_bid.to_string(),
            seller: fields.seller.clone(),
            visibility,
            visible_controls: Control::ALL
                .into_iter()
                .filter(|control| visibility.shows(*control))
                .collect(),
            fields_disabled: fields.disable_as_in_display,
            permitted,
        }
    }

    pub fn is_visible(&self, control: Control) -> bool {
        self.visibility.shows(control)
    }

    pub fn is_enabled(&self, control: Control) -> bool {
        if control == Control::ImageView {
            return self.visibility.start_group;
        }
        self.is_visible(control) && !(self.fields_disabled && FROZEN_IN_DISPLAY.contains(&control))
    }

    pub fn permits(&self, kind: ActionKind) -> bool {
        self.permitted.contains(&kind)
    }

    /// Whether the view currently offers `action` to the user.
    pub fn allows(&self, action: &ViewAction) -> bool {
        match action {
            ViewAction::Edit(edit) => self.is_enabled(edit_target(edit)),
            other => other.kind().is_some_and(|kind| self.permits(kind)),
        }
    }
}

fn edit_target(edit: &FieldEdit) -> Control {
    match edit {
        FieldEdit::Title(_) => Control::TitleArea,
        FieldEdit::Description(_) => Control::DescriptionArea,
        FieldEdit::ReservePrice(_) => Control::ReservePriceField,
        FieldEdit::BuyoutPrice(_) => Control::BuyoutPriceField,
        FieldEdit::Increment(_) => Control::IncrementField,
        FieldEdit::TimeToRun(_) => Control::TimeField,
        FieldEdit::IncomingBid(_) => Control::IncomingBidField,
        FieldEdit::Reason(_) => Control::ReasonArea,
        FieldEdit::Image(_) => Control::ImageView,
    }
}

/// Converts the text of a numeric field; blank or unparsable text reads as 0.
pub fn parse_int_field(text: &str) -> u32 {
    text.trim().parse().unwrap_or(0)
}
