use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub i64);
    };
}

id_newtype!(AuctionId);

/// Mode an auction view is opened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowType {
    StartAuction,
    DisplayAuction,
}

/// Window the navigation collaborator should switch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationTarget {
    AllAuctions,
    DisplayAuction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Moderator,
    Bidder,
}

impl Role {
    pub fn is_moderator(self) -> bool {
        matches!(self, Role::Moderator)
    }
}

/// Lifecycle phase of the auction shown in a view.
///
/// `Creating` is the only phase in which the start controls are shown; the
/// bid display is shown in every other phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuctionPhase {
    Creating,
    AcceptingBids,
    #[default]
    Closed,
}

impl AuctionPhase {
    pub fn shows_start_controls(self) -> bool {
        self == AuctionPhase::Creating
    }

    pub fn accepts_bids(self) -> bool {
        self == AuctionPhase::AcceptingBids
    }
}
