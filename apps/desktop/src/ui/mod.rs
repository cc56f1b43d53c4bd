//! View surface primitives: pane layout and native dialogs.

pub mod dialogs;
pub mod layout;
