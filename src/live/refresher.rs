//! Per-view match cache kept current by the feed, falling back to fixed-interval polling.

use crate::live::{ChangeEvent, FeedMessage, FeedStatus, MatchFeed, MatchSource};
use crate::models::{GameMatch, TournamentId};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior};

/// Poll period while the feed is down.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// The match list a view renders from. Cheap to clone; clones share the same list.
#[derive(Clone, Debug, Default)]
pub struct LiveMatches {
    inner: Arc<RwLock<Vec<GameMatch>>>,
}

impl LiveMatches {
    pub fn new(matches: Vec<GameMatch>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(matches)),
        }
    }

    pub fn snapshot(&self) -> Vec<GameMatch> {
        match self.inner.read() {
            Ok(g) => g.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Replace the whole list (result of a poll).
    pub fn replace(&self, matches: Vec<GameMatch>) {
        let mut g = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *g = matches;
    }

    /// Apply one change. Updates and deletes of unknown ids are ignored; an insert of a
    /// known id replaces it.
    pub fn apply(&self, event: ChangeEvent) {
        let mut g = self.inner.write().unwrap_or_else(|e| e.into_inner());
        match event {
            ChangeEvent::Insert(m) => match g.iter_mut().find(|x| x.id == m.id) {
                Some(existing) => *existing = m,
                None => g.push(m),
            },
            ChangeEvent::Update(m) => {
                if let Some(existing) = g.iter_mut().find(|x| x.id == m.id) {
                    *existing = m;
                }
            }
            ChangeEvent::Delete(id) => g.retain(|x| x.id != id),
        }
    }
}

/// Running refresher. Shut it down (or drop it) when the view goes away; both the
/// subscription and the poller stop.
pub struct RefreshHandle {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl RefreshHandle {
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(());
        if let Err(e) = self.task.await {
            log::error!("Refresher task failed: {}", e);
        }
    }
}

/// First tick one period from now.
fn start_poller(period: Duration) -> Interval {
    let mut poller = tokio::time::interval_at(Instant::now() + period, period);
    poller.set_missed_tick_behavior(MissedTickBehavior::Delay);
    poller
}

async fn next_message(feed: &mut Option<mpsc::Receiver<FeedMessage>>) -> Option<FeedMessage> {
    match feed {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

async fn next_tick(poller: &mut Option<Interval>) {
    match poller {
        Some(p) => {
            p.tick().await;
        }
        None => std::future::pending().await,
    }
}

/// Keep `live` in sync with `tournament_id`'s matches.
///
/// Changes from `feed` are applied as they arrive. If subscribing fails, or the feed
/// reports an error, timeout or closure, `source` is polled every `poll_interval` until
/// the feed reports `Subscribed` again or the handle is shut down.
pub fn spawn_refresher<S, F>(
    tournament_id: TournamentId,
    source: Arc<S>,
    feed: &F,
    live: LiveMatches,
    poll_interval: Duration,
) -> RefreshHandle
where
    S: MatchSource,
    F: MatchFeed + ?Sized,
{
    let subscription = feed.subscribe(tournament_id);
    let (shutdown, mut shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let mut poller = None;
        let mut feed = match subscription {
            Ok(rx) => Some(rx),
            Err(e) => {
                log::warn!(
                    "Realtime unavailable for {} ({}); polling every {:?}",
                    tournament_id,
                    e,
                    poll_interval
                );
                poller = Some(start_poller(poll_interval));
                None
            }
        };

        loop {
            tokio::select! {
                _ = &mut shutdown_rx => break,
                msg = next_message(&mut feed) => match msg {
                    Some(FeedMessage::Change(event)) => live.apply(event),
                    Some(FeedMessage::Status(FeedStatus::Subscribed)) => {
                        if poller.take().is_some() {
                            log::info!("Realtime restored for {}; polling stopped", tournament_id);
                        }
                    }
                    other => {
                        if matches!(other, None | Some(FeedMessage::Status(FeedStatus::Closed))) {
                            feed = None;
                        }
                        if poller.is_none() {
                            log::warn!(
                                "Realtime failed for {} ({:?}); polling every {:?}",
                                tournament_id,
                                other,
                                poll_interval
                            );
                            poller = Some(start_poller(poll_interval));
                        }
                    }
                },
                _ = next_tick(&mut poller) => match source.fetch_matches(tournament_id).await {
                    Ok(matches) => live.replace(matches),
                    Err(e) => log::error!("Error fetching latest matches for {}: {}", tournament_id, e),
                },
            }
        }
        log::debug!("Refresher for {} stopped", tournament_id);
    });

    RefreshHandle { shutdown, task }
}
