//! Push-based location source.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;

use super::{LocationSource, PlayerLocation, DEFAULT_CHANNEL_CAPACITY};

/// Location source fed by the host application.
///
/// The stream can be taken once; later calls to
/// [`updates`](LocationSource::updates) return an already-closed receiver.
pub struct ChannelLocationSource {
    last: Arc<Mutex<Option<PlayerLocation>>>,
    receiver: Mutex<Option<mpsc::Receiver<PlayerLocation>>>,
}

/// Handle used by the host to push fixes.
#[derive(Clone)]
pub struct LocationSender {
    last: Arc<Mutex<Option<PlayerLocation>>>,
    tx: mpsc::Sender<PlayerLocation>,
}

impl ChannelLocationSource {
    /// Creates a source with the default channel capacity.
    pub fn new() -> (Self, LocationSender) {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> (Self, LocationSender) {
        let (tx, rx) = mpsc::channel(capacity);
        let last = Arc::new(Mutex::new(None));

        let source = Self {
            last: Arc::clone(&last),
            receiver: Mutex::new(Some(rx)),
        };
        (source, LocationSender { last, tx })
    }

    /// Seeds the cached fix returned by `last_known`.
    pub fn with_last_known(self, location: PlayerLocation) -> Self {
        *self.last.lock() = Some(location);
        self
    }
}

impl LocationSource for ChannelLocationSource {
    async fn last_known(&self) -> Option<PlayerLocation> {
        *self.last.lock()
    }

    fn updates(&self, _interval: Duration) -> mpsc::Receiver<PlayerLocation> {
        match self.receiver.lock().take() {
            Some(rx) => rx,
            None => mpsc::channel(1).1,
        }
    }
}

impl LocationSender {
    /// Pushes a fix. Returns false once the consumer has gone away.
    pub async fn send(&self, location: PlayerLocation) -> bool {
        *self.last.lock() = Some(location);
        self.tx.send(location).await.is_ok()
    }
}
