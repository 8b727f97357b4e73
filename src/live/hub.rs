//! In-process change hub: match writes are broadcast to every subscribed view.

use crate::live::{ChangeEvent, FeedMessage, FeedStatus, MatchFeed};
use crate::models::{TournamentError, TournamentId};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::mpsc;

/// Buffered messages per subscriber before the subscriber's feed lags and fails over.
const FEED_BUFFER: usize = 64;

#[derive(Clone, Debug)]
pub struct MatchHub {
    tx: broadcast::Sender<(TournamentId, ChangeEvent)>,
}

impl MatchHub {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Broadcast a change. Returns the number of live subscriptions that will see it.
    pub fn publish(&self, tournament_id: TournamentId, event: ChangeEvent) -> usize {
        self.tx.send((tournament_id, event)).unwrap_or(0)
    }
}

impl Default for MatchHub {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl MatchFeed for MatchHub {
    /// Forward this tournament's changes into a dedicated channel. The first message is
    /// `Subscribed`; a lagging subscriber gets `ChannelError` and its feed ends.
    fn subscribe(
        &self,
        tournament_id: TournamentId,
    ) -> Result<mpsc::Receiver<FeedMessage>, TournamentError> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| TournamentError::Subscription(e.to_string()))?;
        let mut rx = self.tx.subscribe();
        let (tx, out) = mpsc::channel(FEED_BUFFER);
        runtime.spawn(async move {
            if tx.send(FeedMessage::Status(FeedStatus::Subscribed)).await.is_err() {
                return;
            }
            loop {
                tokio::select! {
                    _ = tx.closed() => return,
                    msg = rx.recv() => match msg {
                        Ok((id, event)) if id == tournament_id => {
                            if tx.send(FeedMessage::Change(event)).await.is_err() {
                                return;
                            }
                        }
                        Ok(_) => {}
                        Err(RecvError::Lagged(missed)) => {
                            log::warn!(
                                "Match feed for {} lagged, {} change(s) missed",
                                tournament_id,
                                missed
                            );
                            let _ = tx.send(FeedMessage::Status(FeedStatus::ChannelError)).await;
                            return;
                        }
                        Err(RecvError::Closed) => {
                            let _ = tx.send(FeedMessage::Status(FeedStatus::Closed)).await;
                            return;
                        }
                    },
                }
            }
        });
        Ok(out)
    }
}
