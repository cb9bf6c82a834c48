use std::{collections::HashMap, sync::Arc};

use devtrack_shared::LiveEvent;
use tokio::sync::{
    mpsc::{self, error::TrySendError},
    oneshot,
};
use tracing::debug;
use uuid::Uuid;

type Listener = mpsc::Sender<Arc<LiveEvent>>;

enum Command {
    Subscribe { id: Uuid, listener: Listener },
    Unsubscribe(Uuid),
    Publish(Arc<LiveEvent>),
    Count(oneshot::Sender<usize>),
}

/// Fans live events out to every registered listener.
///
/// The listener set lives inside a single task and is only ever touched by
/// that task. Every operation on the handle is a message on one unbounded
/// queue, so none of them block and they are applied in the order they were
/// submitted.
pub struct Broker {
    commands: mpsc::UnboundedSender<Command>,
    buffer: usize,
}

/// Receiving end of one listener. Dropping it unsubscribes.
pub struct Subscription {
    id: Uuid,
    events: mpsc::Receiver<Arc<LiveEvent>>,
    commands: mpsc::UnboundedSender<Command>,
}

impl Broker {
    /// Spawns the event loop on the current tokio runtime. `buffer` is the
    /// number of undelivered events a listener may have queued before new
    /// ones are dropped for it.
    pub fn new(buffer: usize) -> Self {
        let (commands, receiver) = mpsc::unbounded_channel();
        tokio::spawn(run(receiver));
        Self {
            commands,
            buffer: buffer.max(1),
        }
    }

    pub fn subscribe(&self) -> Subscription {
        let id = Uuid::new_v4();
        let (listener, events) = mpsc::channel(self.buffer);
        let _ = self.commands.send(Command::Subscribe { id, listener });
        Subscription {
            id,
            events,
            commands: self.commands.clone(),
        }
    }

    /// Fire and forget.
    pub fn publish(&self, event: LiveEvent) {
        let _ = self.commands.send(Command::Publish(Arc::new(event)));
    }

    pub async fn subscriber_count(&self) -> usize {
        let (reply, count) = oneshot::channel();
        if self.commands.send(Command::Count(reply)).is_err() {
            return 0;
        }
        count.await.unwrap_or(0)
    }
}

impl Subscription {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Deregisters the listener. Events still queued for it are discarded.
    pub fn unsubscribe(self) {}

    /// Next event for this listener, `None` once the broker is gone.
    pub async fn recv(&mut self) -> Option<Arc<LiveEvent>> {
        self.events.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let _ = self.commands.send(Command::Unsubscribe(self.id));
    }
}

async fn run(mut commands: mpsc::UnboundedReceiver<Command>) {
    let mut listeners: HashMap<Uuid, Listener> = HashMap::new();

    while let Some(command) = commands.recv().await {
        match command {
            Command::Subscribe { id, listener } => {
                listeners.insert(id, listener);
                debug!(%id, listeners = listeners.len(), "listener subscribed");
            }
            Command::Unsubscribe(id) => {
                if listeners.remove(&id).is_some() {
                    debug!(%id, listeners = listeners.len(), "listener unsubscribed");
                }
            }
            Command::Publish(event) => {
                listeners.retain(|id, listener| match listener.try_send(event.clone()) {
                    Ok(()) => true,
                    Err(TrySendError::Full(_)) => {
                        debug!(%id, kind = ?event.kind, "listener is full, dropping event");
                        true
                    }
                    Err(TrySendError::Closed(_)) => false,
                });
            }
            Command::Count(reply) => {
                let _ = reply.send(listeners.len());
            }
        }
    }
}
