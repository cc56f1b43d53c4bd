//! Line commands that drive the auction view from a terminal.

use client_core::FieldEdit;
use shared::domain::AuctionId;
use thiserror::Error;

use crate::controller::{events::ViewAction, render::parse_int_field};

pub const HELP: &str = "\
commands:
  new                       open the start-auction view
  open <id>                 display an auction
  list                      list auctions
  title|description <text>  edit the draft
  reserve|buyout|increment|hours <n>
  bid <n>                   place a bid
  buynow                    buy at the buyout price
  reason <text>             deletion reason (moderators)
  delete                    delete the auction (moderators)
  start                     start the drafted auction
  import                    choose an image
  cancel | back             leave the view
  show                      print the view
  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    New,
    Open(AuctionId),
    List,
    Show,
    Help,
    Quit,
    Actions(Vec<ViewAction>),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}'; type 'help' for a list")]
    Unknown(String),
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
    #[error("'{0}' is not an auction id")]
    BadAuctionId(String),
}

pub fn parse_command(line: &str) -> Result<Option<ConsoleCommand>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let text = |name: &'static str| {
        if rest.is_empty() {
            Err(CommandError::MissingArgument(name))
        } else {
            Ok(rest.to_string())
        }
    };
    let edit = |edit: FieldEdit| ConsoleCommand::Actions(vec![ViewAction::Edit(edit)]);

    let command = match word.to_ascii_lowercase().as_str() {
        "new" => ConsoleCommand::New,
        "open" => {
            let raw = text("open")?;
            let id = raw
                .parse::<i64>()
                .map_err(|_| CommandError::BadAuctionId(raw.clone()))?;
            ConsoleCommand::Open(AuctionId(id))
        }
        "list" => ConsoleCommand::List,
        "show" => ConsoleCommand::Show,
        "help" => ConsoleCommand::Help,
        "quit" | "exit" => ConsoleCommand::Quit,
        "title" => edit(FieldEdit::Title(text("title")?)),
        "description" => edit(FieldEdit::Description(text("description")?)),
        "reason" => edit(FieldEdit::Reason(text("reason")?)),
        "reserve" => edit(FieldEdit::ReservePrice(parse_int_field(&text("reserve")?))),
        "buyout" => edit(FieldEdit::BuyoutPrice(parse_int_field(&text("buyout")?))),
        "increment" => edit(FieldEdit::Increment(parse_int_field(&text("increment")?))),
        "hours" => edit(FieldEdit::TimeToRun(parse_int_field(&text("hours")?))),
        "bid" => ConsoleCommand::Actions(vec![
            ViewAction::Edit(FieldEdit::IncomingBid(parse_int_field(&text("bid")?))),
            ViewAction::PlaceBid,
        ]),
        "buynow" => ConsoleCommand::Actions(vec![ViewAction::BuyNow]),
        "delete" => ConsoleCommand::Actions(vec![ViewAction::Delete]),
        "start" => ConsoleCommand::Actions(vec![ViewAction::StartAuction]),
        "import" => ConsoleCommand::Actions(vec![ViewAction::ImportImage]),
        "cancel" => ConsoleCommand::Actions(vec![ViewAction::Cancel]),
        "back" => ConsoleCommand::Actions(vec![ViewAction::Back]),
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}
