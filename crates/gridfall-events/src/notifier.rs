//! Per-connection event fan-out.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use gridfall_protocol::SocketId;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, trace};

use crate::LifecycleEvent;

/// Registry of delivery channels, one per live connection.
///
/// Cheap to clone — all clones share the same registry. Sending to an
/// unregistered or closed connection silently drops the event; a player
/// who vanished mid-flow is not an error for the emitter.
#[derive(Clone, Default)]
pub struct EventNotifier {
    senders: Arc<Mutex<HashMap<SocketId, UnboundedSender<LifecycleEvent>>>>,
}

impl EventNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a connection and returns the receiving end of its
    /// delivery channel. Re-registering a socket replaces the previous
    /// channel.
    pub fn register(
        &self,
        socket_id: SocketId,
    ) -> UnboundedReceiver<LifecycleEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut senders =
            self.senders.lock().expect("notifier mutex poisoned");
        senders.insert(socket_id, tx);
        rx
    }

    /// Drops a connection's delivery channel.
    pub fn unregister(&self, socket_id: &SocketId) {
        let mut senders =
            self.senders.lock().expect("notifier mutex poisoned");
        senders.remove(socket_id);
    }

    /// Delivers one event to one connection.
    pub fn send_to(&self, socket_id: &SocketId, event: LifecycleEvent) {
        let senders = self.senders.lock().expect("notifier mutex poisoned");
        match senders.get(socket_id) {
            Some(sender) => {
                trace!(%socket_id, event = event.name(), "event dispatched");
                let _ = sender.send(event);
            }
            None => {
                debug!(
                    %socket_id,
                    event = event.name(),
                    "dropping event for unregistered connection"
                );
            }
        }
    }
}
