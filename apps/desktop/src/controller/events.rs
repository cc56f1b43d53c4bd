//! User intents raised by the auction view and console input events.

use client_core::FieldEdit;
use serde::Serialize;

/// Something the user did in the auction view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewAction {
    StartAuction,
    PlaceBid,
    BuyNow,
    Delete,
    Cancel,
    Back,
    ImportImage,
    Edit(FieldEdit),
}

/// Button-like actions the view may offer. Field edits are gated per control
/// instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    StartAuction,
    PlaceBid,
    BuyNow,
    Delete,
    Cancel,
    ImportImage,
}

impl ViewAction {
    pub fn kind(&self) -> Option<ActionKind> {
        match self {
            ViewAction::StartAuction => Some(ActionKind::StartAuction),
            ViewAction::PlaceBid => Some(ActionKind::PlaceBid),
            ViewAction::BuyNow => Some(ActionKind::BuyNow),
            ViewAction::Delete => Some(ActionKind::Delete),
            ViewAction::Cancel | ViewAction::Back => Some(ActionKind::Cancel),
            ViewAction::ImportImage => Some(ActionKind::ImportImage),
            ViewAction::Edit(_) => None,
        }
    }
}

pub enum UiEvent {
    Input(String),
    InputClosed,
}
