//! Controller layer: view actions, derived render, navigation, and the auction view controller.

pub mod auction_view;
pub mod events;
pub mod orchestration;
pub mod render;
