//! Controller binding the auction view to its auction state.
//!
//! The controller owns no auction data. Field changes flow from the state
//! through a watch subscription into a fresh [`AuctionViewRender`]; user
//! actions flow back as discrete state commands. Handlers never fail: the
//! state reports problems through its error field.

use client_core::{AuctionFields, AuctionViewModel, FieldEdit};
use shared::domain::{NavigationTarget, WindowType};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{
    controller::{events::ViewAction, orchestration::Navigator, render::AuctionViewRender},
    media,
    ui::{
        dialogs::{ViewDialogs, AUCTION_IMAGE_FILTER},
        layout::{PaneLayout, ViewSurface},
    },
};

const LEAVE_TITLE: &str = "Confirmation";
const LEAVE_HEADER: &str = "Are you sure you want to leave?";

pub struct AuctionViewController<S, N, D> {
    state: S,
    navigator: N,
    dialogs: D,
    window_type: WindowType,
    updates: watch::Receiver<AuctionFields>,
    root: ViewSurface,
}

impl<S, N, D> AuctionViewController<S, N, D>
where
    S: AuctionViewModel,
    N: Navigator,
    D: ViewDialogs,
{
    pub fn init(window_type: WindowType, state: S, navigator: N, dialogs: D) -> Self {
        let updates = state.subscribe();
        let render = AuctionViewRender::derive(window_type, &state.fields(), state.is_moderator());
        let mut controller = Self {
            state,
            navigator,
            dialogs,
            window_type,
            updates,
            root: ViewSurface {
                layout: PaneLayout::display(false),
                render,
            },
        };
        controller.reset(window_type);
        controller
    }

    pub fn reset(&mut self, window_type: WindowType) {
        debug!(?window_type, "resetting auction view");
        self.window_type = window_type;
        self.state.reset();
        match window_type {
            WindowType::StartAuction => self.set_for_start(),
            WindowType::DisplayAuction => self.set_for_display(),
        }
        self.render_latest();
    }

    fn set_for_start(&mut self) {
        self.state.set_for_start();
        self.state.wipe();
        self.root.layout = PaneLayout::creation();
    }

    fn set_for_display(&mut self) {
        self.root.layout = PaneLayout::display(self.state.is_moderator());
    }

    pub fn root(&self) -> &ViewSurface {
        &self.root
    }

    pub fn window_type(&self) -> WindowType {
        self.window_type
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    pub fn leave_auction_view(&mut self) {
        self.state.leave_auction_view();
        self.sync();
    }

    /// Re-renders if the state changed since the last render. Returns whether
    /// a new render was produced.
    pub fn sync(&mut self) -> bool {
        match self.updates.has_changed() {
            Ok(true) => {
                self.render_latest();
                true
            }
            Ok(false) => false,
            Err(_) => {
                warn!("auction state dropped its field channel");
                false
            }
        }
    }

    fn render_latest(&mut self) {
        let fields = self.updates.borrow_and_update().clone();
        self.root.render =
            AuctionViewRender::derive(self.window_type, &fields, self.state.is_moderator());
    }

    pub fn handle(&mut self, action: ViewAction) {
        if !self.root.render.allows(&action) {
            debug!(?action, "ignoring action the view does not offer");
            return;
        }

        match action {
            ViewAction::StartAuction => self.start_auction_pressed(),
            ViewAction::PlaceBid => self.place_bid_pressed(),
            ViewAction::BuyNow => self.buy_now_pressed(),
            ViewAction::Delete => self.delete_pressed(),
            ViewAction::Cancel | ViewAction::Back => self.cancel_pressed(),
            ViewAction::ImportImage => self.import_pressed(),
            ViewAction::Edit(edit) => self.state.edit(edit),
        }
        self.sync();
    }

    fn start_auction_pressed(&mut self) {
        let outcome = self.state.start_auction();
        self.sync();
        if outcome.is_success() {
            self.navigator.open_view(NavigationTarget::DisplayAuction);
        }
    }

    fn place_bid_pressed(&mut self) {
        let outcome = self.state.place_bid();
        debug!(?outcome, "place bid finished");
    }

    fn buy_now_pressed(&mut self) {
        let outcome = self.state.buyout();
        debug!(?outcome, "buyout finished");
    }

    fn delete_pressed(&mut self) {
        let outcome = self.state.delete_auction();
        self.sync();
        if outcome.allows_leaving_after_delete() {
            self.navigator.open_view(NavigationTarget::AllAuctions);
        }
    }

    fn cancel_pressed(&mut self) {
        if !self.dialogs.confirm(LEAVE_TITLE, LEAVE_HEADER) {
            debug!("leave declined");
            return;
        }
        self.leave_auction_view();
        self.navigator.open_view(NavigationTarget::AllAuctions);
    }

    fn import_pressed(&mut self) {
        self.state.edit(FieldEdit::Image(None));
        self.sync();

        let Some(path) = self.dialogs.pick_image(&AUCTION_IMAGE_FILTER) else {
            debug!("image selection cancelled");
            return;
        };
        if !AUCTION_IMAGE_FILTER.matches(&path) {
            warn!(path = %path.display(), "selected file is not a png or jpg image");
            return;
        }

        match media::load_preview(&path) {
            Ok(image) => {
                info!(path = %path.display(), width = image.width, height = image.height, "auction image loaded");
                self.state.edit(FieldEdit::Image(Some(image)));
            }
            Err(err) => warn!("failed to load auction image: {err:#}"),
        }
    }
}

#[cfg(test)]
#[path = "tests/auction_view_tests.rs"]
mod tests;
