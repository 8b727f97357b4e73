//! Live match data: push subscription with a polling fallback, feeding a per-view cache.

mod hub;
mod refresher;

use crate::models::{GameMatch, MatchId, TournamentError, TournamentId};
use std::future::Future;
use tokio::sync::mpsc;

pub use hub::MatchHub;
pub use refresher::{spawn_refresher, LiveMatches, RefreshHandle, DEFAULT_POLL_INTERVAL};

/// A row-level change to a tournament's matches.
#[derive(Clone, Debug, PartialEq)]
pub enum ChangeEvent {
    Insert(GameMatch),
    /// Full new row; replaces the match with the same id.
    Update(GameMatch),
    Delete(MatchId),
}

/// Subscription health as reported by the feed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FeedStatus {
    Subscribed,
    ChannelError,
    TimedOut,
    /// The feed ended; no further changes will arrive.
    Closed,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FeedMessage {
    Status(FeedStatus),
    Change(ChangeEvent),
}

/// Full fetch of a tournament's matches (the polling path).
pub trait MatchSource: Send + Sync + 'static {
    fn fetch_matches(
        &self,
        tournament_id: TournamentId,
    ) -> impl Future<Output = Result<Vec<GameMatch>, TournamentError>> + Send;
}

/// Push notifications for a tournament's matches (the realtime path).
pub trait MatchFeed {
    fn subscribe(
        &self,
        tournament_id: TournamentId,
    ) -> Result<mpsc::Receiver<FeedMessage>, TournamentError>;
}
