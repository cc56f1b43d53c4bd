use serde::Serialize;

use crate::controller::render::{AuctionViewRender, Control};

pub const CREATION_PANE_HEIGHT: f32 = 680.0;
pub const BIDDER_PANE_HEIGHT: f32 = 680.0;
/// Moderators get room for the seller and deletion reason controls.
pub const MODERATOR_PANE_HEIGHT: f32 = 960.0;
pub const CREATION_ACTION_ROW_Y: f32 = 625.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaneLayout {
    pub pref_height: f32,
    /// Vertical offset of the start/cancel row; `None` keeps the default.
    pub action_row_y: Option<f32>,
    pub focus: Option<Control>,
}

impl PaneLayout {
    pub fn creation() -> Self {
        Self {
            pref_height: CREATION_PANE_HEIGHT,
            action_row_y: Some(CREATION_ACTION_ROW_Y),
            focus: Some(Control::TitleArea),
        }
    }

    pub fn display(is_moderator: bool) -> Self {
        Self {
            pref_height: if is_moderator {
                MODERATOR_PANE_HEIGHT
            } else {
                BIDDER_PANE_HEIGHT
            },
            action_row_y: None,
            focus: None,
        }
    }
}

/// What the window manager embeds: the pane layout and the latest render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewSurface {
    pub layout: PaneLayout,
    pub render: AuctionViewRender,
}
