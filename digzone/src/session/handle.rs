//! Client handle to a running session.

use tokio::sync::{broadcast, mpsc, oneshot};

use super::{HintKind, PurchaseOutcome, SessionError, SessionEvent, SessionSnapshot};

/// Requests processed by the session task.
pub(super) enum Command {
    Purchase {
        kind: HintKind,
        reply: oneshot::Sender<Result<PurchaseOutcome, SessionError>>,
    },
    Snapshot {
        reply: oneshot::Sender<SessionSnapshot>,
    },
}

/// Cloneable handle for talking to a session task.
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<Command>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionHandle {
    pub(super) fn new(
        commands: mpsc::Sender<Command>,
        events: broadcast::Sender<SessionEvent>,
    ) -> Self {
        Self { commands, events }
    }

    /// Buys a hint.
    pub async fn purchase(&self, kind: HintKind) -> Result<PurchaseOutcome, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Command::Purchase { kind, reply })
            .await
            .map_err(|_| SessionError::Closed)?;
        rx.await.map_err(|_| SessionError::Closed)?
    }

    /// Copies the current session state.
    pub async fn snapshot(&self) -> Result<SessionSnapshot, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Command::Snapshot { reply })
            .await
            .map_err(|_| SessionError::Closed)?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    /// Subscribes to session events from this point on.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Returns true once the session task has exited.
    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }
}
