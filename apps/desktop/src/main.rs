use std::{io::BufRead, path::PathBuf, thread, time::Duration};

mod console;
mod controller;
mod media;
mod ui;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use client_core::{
    config::load_defaults, AuctionStore, Clock, LocalAuctionState, NewAuction, Session,
    SharedAuctionStore, SystemClock,
};
use crossbeam_channel::{bounded, select, Receiver, Sender};
use shared::domain::{AuctionId, NavigationTarget, Role, WindowType};
use tracing_subscriber::EnvFilter;

use crate::{
    console::{parse_command, ConsoleCommand, HELP},
    controller::{
        auction_view::AuctionViewController, events::UiEvent, orchestration::ChannelNavigator,
    },
    ui::dialogs::RfdDialogs,
};

type ConsoleController =
    AuctionViewController<LocalAuctionState<SystemClock>, ChannelNavigator, RfdDialogs>;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RoleArg {
    Bidder,
    Moderator,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum WindowArg {
    Start,
    Display,
}

#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = "alice")]
    username: String,
    #[arg(long, value_enum, default_value_t = RoleArg::Bidder)]
    role: RoleArg,
    #[arg(long, value_enum, default_value_t = WindowArg::Start)]
    window: WindowArg,
    /// Auction shown by the display window; defaults to the first listed one.
    #[arg(long)]
    auction_id: Option<i64>,
    /// TOML file with auction creation defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Creates a sample auction owned by another seller.
    #[arg(long)]
    seed_demo: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config_path = args.config.clone().or_else(default_config_path);
    let defaults =
        load_defaults(config_path.as_deref()).context("failed to load auction defaults")?;

    let store = AuctionStore::shared();
    if args.seed_demo {
        seed_demo(&store, &SystemClock);
    }

    let role = match args.role {
        RoleArg::Bidder => Role::Bidder,
        RoleArg::Moderator => Role::Moderator,
    };
    let mut state = LocalAuctionState::new(
        store.clone(),
        Session::new(args.username.clone(), role),
        defaults,
        SystemClock,
    );

    let window_type = match args.window {
        WindowArg::Start => WindowType::StartAuction,
        WindowArg::Display => {
            let id = args
                .auction_id
                .map(AuctionId)
                .or_else(|| store.borrow().list().first().map(|record| record.id))
                .context("no auction to display; pass --auction-id or --seed-demo")?;
            state.open_auction(id)?;
            WindowType::DisplayAuction
        }
    };

    let (nav_tx, nav_rx) = bounded::<NavigationTarget>(16);
    let mut controller =
        AuctionViewController::init(window_type, state, ChannelNavigator::new(nav_tx), RfdDialogs);
    tracing::info!(username = %args.username, ?role, ?window_type, "auction view ready");
    print_view(&controller)?;

    let (ui_tx, ui_rx) = bounded::<UiEvent>(64);
    spawn_stdin_reader(ui_tx);
    run_event_loop(&mut controller, &store, &ui_rx, &nav_rx)
}

fn run_event_loop(
    controller: &mut ConsoleController,
    store: &SharedAuctionStore,
    ui_rx: &Receiver<UiEvent>,
    nav_rx: &Receiver<NavigationTarget>,
) -> Result<()> {
    let ticks = crossbeam_channel::tick(Duration::from_secs(1));

    loop {
        select! {
            recv(ui_rx) -> event => match event {
                Ok(UiEvent::Input(line)) => match parse_command(&line) {
                    Ok(Some(ConsoleCommand::Quit)) => break,
                    Ok(Some(command)) => run_command(controller, store, command)?,
                    Ok(None) => {}
                    Err(err) => eprintln!("{err}"),
                },
                Ok(UiEvent::InputClosed) | Err(_) => break,
            },
            recv(ticks) -> _ => {
                controller.state().refresh_countdown();
                controller.sync();
            }
        }

        while let Ok(target) = nav_rx.try_recv() {
            navigate(controller, store, target)?;
        }
    }

    tracing::info!("auction view closed");
    Ok(())
}

fn run_command(
    controller: &mut ConsoleController,
    store: &SharedAuctionStore,
    command: ConsoleCommand,
) -> Result<()> {
    match command {
        ConsoleCommand::New => controller.reset(WindowType::StartAuction),
        ConsoleCommand::Open(id) => match controller.state_mut().open_auction(id) {
            Ok(()) => controller.reset(WindowType::DisplayAuction),
            Err(err) => {
                eprintln!("{err}");
                return Ok(());
            }
        },
        ConsoleCommand::List => {
            print_auction_list(store);
            return Ok(());
        }
        ConsoleCommand::Help => {
            println!("{HELP}");
            return Ok(());
        }
        ConsoleCommand::Show | ConsoleCommand::Quit => {}
        ConsoleCommand::Actions(actions) => {
            for action in actions {
                controller.handle(action);
            }
        }
    }
    print_view(controller)
}

fn navigate(
    controller: &mut ConsoleController,
    store: &SharedAuctionStore,
    target: NavigationTarget,
) -> Result<()> {
    tracing::info!(?target, from = ?controller.window_type(), "switching window");
    match target {
        NavigationTarget::DisplayAuction => {
            controller.reset(WindowType::DisplayAuction);
            print_view(controller)
        }
        NavigationTarget::AllAuctions => {
            print_auction_list(store);
            println!("type 'open <id>' or 'new'");
            Ok(())
        }
    }
}

fn print_view(controller: &ConsoleController) -> Result<()> {
    let rendered =
        serde_json::to_string_pretty(controller.root()).context("failed to render view")?;
    println!("{rendered}");
    Ok(())
}

fn print_auction_list(store: &SharedAuctionStore) {
    let store = store.borrow();
    let auctions = store.list();
    if auctions.is_empty() {
        println!("no auctions");
        return;
    }
    for record in auctions {
        println!(
            "#{:<4} {:<24} seller={:<12} bid={:<6} {:?}",
            record.id.0, record.title, record.seller, record.current_bid, record.status
        );
    }
}

fn spawn_stdin_reader(ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if ui_tx.send(UiEvent::Input(line)).is_err() {
                return;
            }
        }
        let _ = ui_tx.send(UiEvent::InputClosed);
    });
}

fn seed_demo(store: &SharedAuctionStore, clock: &impl Clock) {
    let starts_at = clock.now();
    let id = store.borrow_mut().create(NewAuction {
        seller: "demo-seller".into(),
        title: "Brass telescope".into(),
        description: "Victorian-era brass telescope with tripod".into(),
        reserve_price: 150,
        buyout_price: 900,
        increment: 25,
        image: None,
        starts_at,
        ends_at: starts_at + chrono::Duration::minutes(15),
    });
    tracing::info!(auction_id = id.0, "seeded demo auction");
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("auction_desktop").join("auction.toml"))
}
