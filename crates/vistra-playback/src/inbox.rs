//! Cross-thread message intake.
//!
//! Transports (websocket readers, file loaders) run on their own
//! threads but the playback engine mutates its cache only on one
//! thread, run-to-completion. The inbox is the sole crossing point:
//! any thread may push messages through an [`InboxSender`], and the
//! playback thread drains everything pending in one go between render
//! ticks.

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};

use crate::dispatch::InboundMessage;

/// Create a connected sender/inbox pair.
pub fn inbox() -> (InboxSender, Inbox) {
    let (tx, rx) = unbounded();
    (InboxSender { tx }, Inbox { rx })
}

/// Cloneable handle transports use to push messages from any thread.
#[derive(Clone)]
pub struct InboxSender {
    tx: Sender<InboundMessage>,
}

impl InboxSender {
    /// Push a message toward the playback thread.
    ///
    /// Returns `false` when the inbox side has been dropped (session
    /// torn down) — transports treat that as a signal to stop.
    pub fn send(&self, message: InboundMessage) -> bool {
        self.tx.send(message).is_ok()
    }
}

/// The playback thread's receiving end.
pub struct Inbox {
    rx: Receiver<InboundMessage>,
}

impl Inbox {
    /// Drain every pending message, in arrival order, into `each`.
    ///
    /// Never blocks: messages that arrive while draining are picked up
    /// this pass, and an empty inbox returns immediately. Returns the
    /// number of messages processed.
    pub fn drain(&self, mut each: impl FnMut(InboundMessage)) -> usize {
        let mut processed = 0;
        loop {
            match self.rx.try_recv() {
                Ok(message) => {
                    each(message);
                    processed += 1;
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return processed,
            }
        }
    }

    /// Whether any message is waiting.
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}
