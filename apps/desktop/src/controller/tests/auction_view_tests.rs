use super::*;
use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    env, fs,
    path::PathBuf,
    rc::Rc,
    time::{SystemTime, UNIX_EPOCH},
};

use chrono::{Duration, TimeZone, Utc};
use client_core::{
    AuctionDefaults, AuctionStatus, AuctionStore, Clock, LocalAuctionState, ManualClock,
    NewAuction, Session, SharedAuctionStore,
};
use shared::domain::{AuctionId, Role};

use crate::{
    controller::render::Control,
    ui::{
        dialogs::ImageFilter,
        layout::{BIDDER_PANE_HEIGHT, CREATION_ACTION_ROW_Y, MODERATOR_PANE_HEIGHT},
    },
};

#[derive(Clone, Default)]
struct RecordingNavigator {
    opened: Rc<RefCell<Vec<NavigationTarget>>>,
}

impl Navigator for RecordingNavigator {
    fn open_view(&mut self, target: NavigationTarget) {
        self.opened.borrow_mut().push(target);
    }
}

#[derive(Clone, Default)]
struct ScriptedDialogs {
    confirm_answer: bool,
    confirms_asked: Rc<Cell<u32>>,
    picks: Rc<RefCell<VecDeque<Option<PathBuf>>>>,
}

impl ViewDialogs for ScriptedDialogs {
    fn confirm(&mut self, title: &str, header: &str) -> bool {
        assert_eq!(title, "Confirmation");
        assert_eq!(header, "Are you sure you want to leave?");
        self.confirms_asked.set(self.confirms_asked.get() + 1);
        self.confirm_answer
    }

    fn pick_image(&mut self, filter: &ImageFilter) -> Option<PathBuf> {
        assert_eq!(filter.extensions, &["png", "jpg"]);
        self.picks
            .borrow_mut()
            .pop_front()
            .expect("unexpected image dialog")
    }
}

type TestController =
    AuctionViewController<LocalAuctionState<ManualClock>, RecordingNavigator, ScriptedDialogs>;

struct Fixture {
    store: SharedAuctionStore,
    clock: ManualClock,
    navigator: RecordingNavigator,
    dialogs: ScriptedDialogs,
}

impl Fixture {
    fn new() -> Self {
        Self {
            store: AuctionStore::shared(),
            clock: ManualClock::new(Utc.with_ymd_and_hms(2026, 8, 20, 14, 0, 0).unwrap()),
            navigator: RecordingNavigator::default(),
            dialogs: ScriptedDialogs::default(),
        }
    }

    fn confirming(mut self) -> Self {
        self.dialogs.confirm_answer = true;
        self
    }

    fn seed_auction(&self, buyout_price: u32) -> AuctionId {
        let starts_at = self.clock.now();
        self.store.borrow_mut().create(NewAuction {
            seller: "sid".into(),
            title: "Tea set".into(),
            description: "Porcelain, six cups".into(),
            reserve_price: 100,
            buyout_price,
            increment: 10,
            image: None,
            starts_at,
            ends_at: starts_at + Duration::hours(1),
        })
    }

    fn controller(
        &self,
        name: &str,
        role: Role,
        window_type: WindowType,
        open: Option<AuctionId>,
    ) -> TestController {
        let mut state = LocalAuctionState::new(
            self.store.clone(),
            Session::new(name, role),
            AuctionDefaults::default(),
            self.clock.clone(),
        );
        if let Some(id) = open {
            state.open_auction(id).expect("open auction");
        }
        AuctionViewController::init(
            window_type,
            state,
            self.navigator.clone(),
            self.dialogs.clone(),
        )
    }

    fn queue_pick(&self, pick: Option<PathBuf>) {
        self.dialogs.picks.borrow_mut().push_back(pick);
    }

    fn opened(&self) -> Vec<NavigationTarget> {
        self.navigator.opened.borrow().clone()
    }
}

fn temp_png(width: u32, height: u32) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("auction_view_test_{suffix}.png"));
    image::RgbaImage::new(width, height)
        .save(&path)
        .expect("write png");
    path
}

fn fill_draft(controller: &mut TestController) {
    controller.handle(ViewAction::Edit(FieldEdit::Title("Tea set".into())));
    controller.handle(ViewAction::Edit(FieldEdit::Description("Six cups".into())));
}

#[test]
fn start_window_shows_creation_controls() {
    let fixture = Fixture::new();
    let controller = fixture.controller("sam", Role::Bidder, WindowType::StartAuction, None);

    let root = controller.root();
    assert_eq!(root.layout, PaneLayout::creation());
    assert_eq!(root.layout.action_row_y, Some(CREATION_ACTION_ROW_Y));
    assert_eq!(root.layout.focus, Some(Control::TitleArea));

    let render = &root.render;
    assert!(render.is_visible(Control::ImportButton));
    assert!(render.is_visible(Control::StartAuctionButton));
    assert!(!render.is_visible(Control::CurrentBidLabel));
    assert!(!render.is_visible(Control::PlaceBidButton));
    assert!(!render.is_visible(Control::DeleteButton));
    assert!(render.is_enabled(Control::TitleArea));
    assert_eq!(
        render.reserve_price,
        AuctionDefaults::default().reserve_price.to_string()
    );
}

#[test]
fn bidder_viewing_open_auction_sees_bid_controls_only() {
    let fixture = Fixture::new();
    let id = fixture.seed_auction(0);
    let controller = fixture.controller("bea", Role::Bidder, WindowType::DisplayAuction, Some(id));

    let root = controller.root();
    assert_eq!(root.layout.pref_height, BIDDER_PANE_HEIGHT);
    let render = &root.render;
    for control in [
        Control::IncomingBidField,
        Control::PlaceBidButton,
        Control::CurrentBidLabel,
        Control::TimerCountdownLabel,
    ] {
        assert!(render.is_visible(control), "{control:?} should be visible");
    }
    for control in [
        Control::StartAuctionButton,
        Control::ImportButton,
        Control::SellerLabel,
        Control::DeleteButton,
        Control::ReasonArea,
        Control::BuyNowButton,
    ] {
        assert!(!render.is_visible(control), "{control:?} should be hidden");
    }
    assert!(render.fields_disabled);
    assert!(!render.is_enabled(Control::TitleArea));
    assert_eq!(render.timer, "01:00:00");
}

#[test]
fn moderator_viewing_closed_auction_sees_moderation_controls() {
    let fixture = Fixture::new();
    let id = fixture.seed_auction(0);
    fixture.clock.advance(Duration::hours(2));
    let mut controller =
        fixture.controller("mia", Role::Moderator, WindowType::DisplayAuction, Some(id));

    controller.handle(ViewAction::Edit(FieldEdit::Reason("duplicate listing".into())));

    let root = controller.root();
    assert_eq!(root.layout.pref_height, MODERATOR_PANE_HEIGHT);
    let render = &root.render;
    assert_eq!(render.reason, "duplicate listing");
    assert_eq!(render.seller, "sid");
    for control in [
        Control::SellerLabel,
        Control::SellerTextLabel,
        Control::DeleteButton,
        Control::ReasonArea,
    ] {
        assert!(render.is_visible(control), "{control:?} should be visible");
    }
    assert!(!render.is_visible(Control::IncomingBidField));
    assert!(!render.is_visible(Control::PlaceBidButton));
    assert!(!render.is_visible(Control::StartAuctionButton));
}

#[test]
fn start_auction_navigates_only_without_error() {
    let fixture = Fixture::new();
    let mut controller = fixture.controller("sam", Role::Bidder, WindowType::StartAuction, None);

    controller.handle(ViewAction::StartAuction);
    assert_eq!(controller.root().render.error, "Title is required");
    assert!(fixture.opened().is_empty());
    assert!(controller.root().render.visibility.start_group);

    fill_draft(&mut controller);
    controller.handle(ViewAction::StartAuction);
    assert!(controller.root().render.error.is_empty());
    assert_eq!(fixture.opened(), vec![NavigationTarget::DisplayAuction]);

    controller.reset(WindowType::DisplayAuction);
    let render = &controller.root().render;
    assert!(render.visibility.bid_group);
    assert!(render.fields_disabled);
    assert_eq!(render.seller, "sam");
    assert!(!render.id.is_empty());
}

#[test]
fn delete_navigates_away_after_success() {
    let fixture = Fixture::new();
    let id = fixture.seed_auction(0);
    let mut controller =
        fixture.controller("mia", Role::Moderator, WindowType::DisplayAuction, Some(id));

    controller.handle(ViewAction::Delete);
    assert!(!controller.root().render.error.is_empty());
    assert!(fixture.opened().is_empty());

    controller.handle(ViewAction::Edit(FieldEdit::Reason("stolen goods".into())));
    controller.handle(ViewAction::Delete);
    assert!(controller.root().render.error.is_empty());
    assert_eq!(fixture.opened(), vec![NavigationTarget::AllAuctions]);
    assert!(matches!(
        fixture.store.borrow().get(id).expect("record").status,
        AuctionStatus::Deleted { .. }
    ));
}

#[test]
fn deleting_closed_auction_still_navigates_away() {
    let fixture = Fixture::new();
    let id = fixture.seed_auction(0);
    fixture.clock.advance(Duration::hours(5));
    let mut controller =
        fixture.controller("mia", Role::Moderator, WindowType::DisplayAuction, Some(id));

    controller.handle(ViewAction::Edit(FieldEdit::Reason("spam".into())));
    controller.handle(ViewAction::Delete);

    assert_eq!(controller.root().render.error, "Auction is already closed");
    assert_eq!(fixture.opened(), vec![NavigationTarget::AllAuctions]);
}

#[test]
fn other_delete_failures_keep_the_view_open() {
    let fixture = Fixture::new();
    let mut controller =
        fixture.controller("mia", Role::Moderator, WindowType::DisplayAuction, None);

    controller.handle(ViewAction::Edit(FieldEdit::Reason("spam".into())));
    controller.handle(ViewAction::Delete);

    assert_eq!(controller.root().render.error, "No auction is selected");
    assert!(fixture.opened().is_empty());
}

#[test]
fn hidden_delete_is_ignored_for_bidders() {
    let fixture = Fixture::new();
    let id = fixture.seed_auction(0);
    let mut controller = fixture.controller("bea", Role::Bidder, WindowType::DisplayAuction, Some(id));

    controller.handle(ViewAction::Delete);

    assert!(controller.root().render.error.is_empty());
    assert!(fixture.opened().is_empty());
    assert_eq!(
        fixture.store.borrow().get(id).expect("record").status,
        AuctionStatus::Open
    );
}

#[test]
fn rejected_bid_is_shown_in_place() {
    let fixture = Fixture::new();
    let id = fixture.seed_auction(0);
    let mut controller = fixture.controller("bea", Role::Bidder, WindowType::DisplayAuction, Some(id));

    controller.handle(ViewAction::Edit(FieldEdit::IncomingBid(10)));
    controller.handle(ViewAction::PlaceBid);
    assert_eq!(controller.root().render.error, "Bid must be at least 100");

    controller.handle(ViewAction::Edit(FieldEdit::IncomingBid(120)));
    controller.handle(ViewAction::PlaceBid);
    let render = &controller.root().render;
    assert!(render.error.is_empty());
    assert_eq!(render.current_bid, "120");
    assert_eq!(render.current_bidder, "bea");
    assert_eq!(render.incoming_bid, "0");
}

#[test]
fn buy_now_closes_bidding() {
    let fixture = Fixture::new();
    let id = fixture.seed_auction(500);
    let mut controller = fixture.controller("bea", Role::Bidder, WindowType::DisplayAuction, Some(id));
    assert!(controller.root().render.is_visible(Control::BuyNowButton));

    controller.handle(ViewAction::BuyNow);

    let render = &controller.root().render;
    assert_eq!(render.timer, "Sold");
    assert!(!render.is_visible(Control::PlaceBidButton));
    assert!(render.is_visible(Control::CurrentBidLabel));
    assert_eq!(render.current_bid, "500");
}

#[test]
fn declined_leave_keeps_the_view() {
    let fixture = Fixture::new();
    let id = fixture.seed_auction(0);
    let mut controller = fixture.controller("bea", Role::Bidder, WindowType::DisplayAuction, Some(id));

    controller.handle(ViewAction::Back);

    assert_eq!(fixture.dialogs.confirms_asked.get(), 1);
    assert!(fixture.opened().is_empty());
    assert_eq!(controller.state().selected(), Some(id));
}

#[test]
fn confirmed_cancel_releases_the_view() {
    let fixture = Fixture::new().confirming();
    let mut controller = fixture.controller("sam", Role::Bidder, WindowType::StartAuction, None);
    fill_draft(&mut controller);

    controller.handle(ViewAction::Cancel);

    assert_eq!(fixture.opened(), vec![NavigationTarget::AllAuctions]);
    assert!(controller.root().render.title.is_empty());
    assert_eq!(controller.state().selected(), None);
}

#[test]
fn cancelled_import_leaves_preview_empty() {
    let fixture = Fixture::new();
    let png = temp_png(4, 3);
    fixture.queue_pick(Some(png.clone()));
    fixture.queue_pick(None);
    let mut controller = fixture.controller("sam", Role::Bidder, WindowType::StartAuction, None);

    controller.handle(ViewAction::ImportImage);
    assert_eq!(controller.root().render.image_size, Some([4, 3]));

    controller.handle(ViewAction::ImportImage);
    assert_eq!(controller.root().render.image_size, None);

    fs::remove_file(png).expect("cleanup");
}

#[test]
fn import_ignores_files_outside_the_filter() {
    let fixture = Fixture::new();
    fixture.queue_pick(Some(PathBuf::from("/tmp/scan.bmp")));
    let mut controller = fixture.controller("sam", Role::Bidder, WindowType::StartAuction, None);

    controller.handle(ViewAction::ImportImage);

    assert_eq!(controller.root().render.image_size, None);
    assert!(fixture.dialogs.picks.borrow().is_empty());
}

#[test]
fn import_is_not_offered_while_displaying() {
    let fixture = Fixture::new();
    let id = fixture.seed_auction(0);
    fixture.queue_pick(None);
    let mut controller = fixture.controller("bea", Role::Bidder, WindowType::DisplayAuction, Some(id));

    controller.handle(ViewAction::ImportImage);

    assert_eq!(fixture.dialogs.picks.borrow().len(), 1);
}

#[test]
fn reentering_start_always_yields_empty_creation_fields() {
    let fixture = Fixture::new();
    let mut controller = fixture.controller("sam", Role::Bidder, WindowType::StartAuction, None);
    fill_draft(&mut controller);
    assert_eq!(controller.root().render.title, "Tea set");

    controller.reset(WindowType::StartAuction);
    let first = controller.root().clone();
    controller.reset(WindowType::StartAuction);

    assert_eq!(&first, controller.root());
    assert!(first.render.title.is_empty());
    assert!(first.render.description.is_empty());
    assert_eq!(first.render.image_size, None);
    assert!(first.render.error.is_empty());
}

#[test]
fn display_reset_without_auction_freezes_the_draft() {
    let fixture = Fixture::new();
    let mut controller = fixture.controller("sam", Role::Bidder, WindowType::StartAuction, None);
    fill_draft(&mut controller);

    controller.reset(WindowType::DisplayAuction);

    let render = &controller.root().render;
    assert!(render.fields_disabled);
    assert!(!render.visibility.start_group);
    assert!(!render.is_enabled(Control::TitleArea));
    assert!(!render.is_visible(Control::PlaceBidButton));

    controller.handle(ViewAction::Edit(FieldEdit::Title("sneaky".into())));
    assert_eq!(controller.root().render.title, "Tea set");
    assert_eq!(controller.state().fields().title, "Tea set");
}

#[test]
fn countdown_push_rerenders_and_closes_bidding() {
    let fixture = Fixture::new();
    let id = fixture.seed_auction(0);
    let mut controller = fixture.controller("bea", Role::Bidder, WindowType::DisplayAuction, Some(id));

    fixture.clock.advance(Duration::minutes(30));
    controller.state().refresh_countdown();
    assert!(controller.sync());
    assert_eq!(controller.root().render.timer, "00:30:00");
    assert!(!controller.sync());

    fixture.clock.advance(Duration::hours(1));
    controller.state().refresh_countdown();
    assert!(controller.sync());
    let render = &controller.root().render;
    assert_eq!(render.timer, "Closed");
    assert!(!render.is_visible(Control::IncomingBidField));
    assert!(render.is_visible(Control::CurrentBidLabel));
}
