//! Navigation requests from the auction view to the window manager queue.

use crossbeam_channel::{Sender, TrySendError};
use shared::domain::NavigationTarget;

/// Receives fire-and-forget requests to switch windows.
pub trait Navigator {
    fn open_view(&mut self, target: NavigationTarget);
}

pub struct ChannelNavigator {
    nav_tx: Sender<NavigationTarget>,
}

impl ChannelNavigator {
    pub fn new(nav_tx: Sender<NavigationTarget>) -> Self {
        Self { nav_tx }
    }
}

impl Navigator for ChannelNavigator {
    fn open_view(&mut self, target: NavigationTarget) {
        dispatch_navigation(&self.nav_tx, target);
    }
}

pub fn dispatch_navigation(nav_tx: &Sender<NavigationTarget>, target: NavigationTarget) {
    match nav_tx.try_send(target) {
        Ok(()) => tracing::debug!(?target, "queued navigation request"),
        Err(TrySendError::Full(_)) => {
            tracing::warn!(?target, "navigation queue is full; dropping request");
        }
        Err(TrySendError::Disconnected(_)) => {
            tracing::warn!(?target, "window manager disconnected; dropping navigation request");
        }
    }
}
