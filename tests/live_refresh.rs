//! Integration tests for the live match cache: push changes, polling fallback, shutdown.

use billiard_tournament_web::live::{
    spawn_refresher, ChangeEvent, FeedMessage, FeedStatus, LiveMatches, MatchFeed, MatchHub,
    MatchSource,
};
use billiard_tournament_web::store::{TournamentData, TournamentStore};
use billiard_tournament_web::{
    GameMatch, MatchStatus, MatchType, MatchUpdate, Team, Tournament, TournamentError,
    TournamentFormat, TournamentId,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;
use uuid::Uuid;

const POLL: Duration = Duration::from_secs(5);

/// Feed driven by the test through an mpsc sender; subscribing a second time fails.
struct ScriptedFeed {
    rx: Mutex<Option<mpsc::Receiver<FeedMessage>>>,
}

impl ScriptedFeed {
    fn new() -> (Self, mpsc::Sender<FeedMessage>) {
        let (tx, rx) = mpsc::channel(16);
        let feed = Self {
            rx: Mutex::new(Some(rx)),
        };
        (feed, tx)
    }

    fn offline() -> Self {
        Self {
            rx: Mutex::new(None),
        }
    }
}

impl MatchFeed for ScriptedFeed {
    fn subscribe(
        &self,
        _tournament_id: TournamentId,
    ) -> Result<mpsc::Receiver<FeedMessage>, TournamentError> {
        self.rx
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| TournamentError::Subscription("realtime offline".to_string()))
    }
}

/// Returns a fixed match list and counts fetches.
struct CountingSource {
    fetches: AtomicUsize,
    matches: Vec<GameMatch>,
}

impl CountingSource {
    fn new(matches: Vec<GameMatch>) -> Arc<Self> {
        Arc::new(Self {
            fetches: AtomicUsize::new(0),
            matches,
        })
    }

    fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl MatchSource for CountingSource {
    async fn fetch_matches(
        &self,
        _tournament_id: TournamentId,
    ) -> Result<Vec<GameMatch>, TournamentError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.matches.clone())
    }
}

fn pending_match(tournament_id: TournamentId) -> GameMatch {
    let mut m = GameMatch::new(tournament_id, MatchType::Group);
    m.round_name = Some("group-1".to_string());
    m
}

#[test]
fn cache_applies_row_changes() {
    let tid = Uuid::new_v4();
    let a = pending_match(tid);
    let b = pending_match(tid);
    let live = LiveMatches::new(vec![a.clone()]);

    live.apply(ChangeEvent::Insert(b.clone()));
    let mut a_live = a.clone();
    a_live.status = MatchStatus::InProgress;
    live.apply(ChangeEvent::Update(a_live.clone()));
    live.apply(ChangeEvent::Update(pending_match(tid)));
    assert_eq!(live.snapshot(), vec![a_live, b.clone()]);

    live.apply(ChangeEvent::Delete(a.id));
    live.apply(ChangeEvent::Delete(Uuid::new_v4()));
    assert_eq!(live.snapshot(), vec![b.clone()]);

    // Re-inserting a known id replaces instead of duplicating.
    live.apply(ChangeEvent::Insert(b.clone()));
    assert_eq!(live.snapshot().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn pushed_changes_reach_the_view() {
    let tid = Uuid::new_v4();
    let (feed, tx) = ScriptedFeed::new();
    let source = CountingSource::new(Vec::new());
    let live = LiveMatches::default();
    let handle = spawn_refresher(tid, Arc::clone(&source), &feed, live.clone(), POLL);

    let m = pending_match(tid);
    tx.send(FeedMessage::Status(FeedStatus::Subscribed)).await.unwrap();
    tx.send(FeedMessage::Change(ChangeEvent::Insert(m.clone()))).await.unwrap();
    sleep(Duration::from_millis(10)).await;

    assert_eq!(live.snapshot(), vec![m]);
    sleep(Duration::from_secs(30)).await;
    assert_eq!(source.fetches(), 0);
    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn channel_error_falls_back_to_polling_until_resubscribed() {
    let tid = Uuid::new_v4();
    let (feed, tx) = ScriptedFeed::new();
    let m = pending_match(tid);
    let source = CountingSource::new(vec![m.clone()]);
    let live = LiveMatches::default();
    let handle = spawn_refresher(tid, Arc::clone(&source), &feed, live.clone(), POLL);

    tx.send(FeedMessage::Status(FeedStatus::Subscribed)).await.unwrap();
    tx.send(FeedMessage::Status(FeedStatus::ChannelError)).await.unwrap();
    sleep(Duration::from_secs(11)).await;

    assert_eq!(source.fetches(), 2);
    assert_eq!(live.snapshot(), vec![m]);

    tx.send(FeedMessage::Status(FeedStatus::Subscribed)).await.unwrap();
    sleep(Duration::from_secs(30)).await;
    assert_eq!(source.fetches(), 2);
    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn timeout_then_quick_recovery_never_polls() {
    let tid = Uuid::new_v4();
    let (feed, tx) = ScriptedFeed::new();
    let source = CountingSource::new(Vec::new());
    let handle = spawn_refresher(tid, Arc::clone(&source), &feed, LiveMatches::default(), POLL);

    tx.send(FeedMessage::Status(FeedStatus::TimedOut)).await.unwrap();
    sleep(Duration::from_secs(1)).await;
    tx.send(FeedMessage::Status(FeedStatus::Subscribed)).await.unwrap();
    sleep(Duration::from_secs(30)).await;

    assert_eq!(source.fetches(), 0);
    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn failed_subscribe_polls_immediately() {
    let tid = Uuid::new_v4();
    let source = CountingSource::new(vec![pending_match(tid)]);
    let live = LiveMatches::default();
    let handle = spawn_refresher(
        tid,
        Arc::clone(&source),
        &ScriptedFeed::offline(),
        live.clone(),
        POLL,
    );

    sleep(Duration::from_secs(4)).await;
    assert_eq!(source.fetches(), 0);
    sleep(Duration::from_secs(2)).await;
    assert_eq!(source.fetches(), 1);
    assert_eq!(live.snapshot().len(), 1);
    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn closed_feed_falls_back_to_polling() {
    let tid = Uuid::new_v4();
    let (feed, tx) = ScriptedFeed::new();
    let source = CountingSource::new(Vec::new());
    let handle = spawn_refresher(tid, Arc::clone(&source), &feed, LiveMatches::default(), POLL);

    drop(tx);
    sleep(Duration::from_secs(16)).await;

    assert_eq!(source.fetches(), 3);
    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn shutdown_stops_polling() {
    let tid = Uuid::new_v4();
    let source = CountingSource::new(Vec::new());
    let handle = spawn_refresher(
        tid,
        Arc::clone(&source),
        &ScriptedFeed::offline(),
        LiveMatches::default(),
        POLL,
    );

    sleep(Duration::from_secs(6)).await;
    handle.shutdown().await;
    sleep(Duration::from_secs(60)).await;

    assert_eq!(source.fetches(), 1);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_handle_stops_polling() {
    let tid = Uuid::new_v4();
    let source = CountingSource::new(Vec::new());
    let handle = spawn_refresher(
        tid,
        Arc::clone(&source),
        &ScriptedFeed::offline(),
        LiveMatches::default(),
        POLL,
    );

    drop(handle);
    sleep(Duration::from_secs(60)).await;

    assert_eq!(source.fetches(), 0);
}

#[test]
fn hub_subscribe_needs_a_runtime() {
    let hub = MatchHub::default();
    assert!(matches!(
        hub.subscribe(Uuid::new_v4()),
        Err(TournamentError::Subscription(_))
    ));
}

#[tokio::test]
async fn hub_reports_lagging_subscriber() {
    let hub = MatchHub::new(2);
    let tid = Uuid::new_v4();
    let mut rx = hub.subscribe(tid).unwrap();
    for _ in 0..5 {
        hub.publish(tid, ChangeEvent::Delete(Uuid::new_v4()));
    }

    assert_eq!(rx.recv().await, Some(FeedMessage::Status(FeedStatus::Subscribed)));
    assert_eq!(rx.recv().await, Some(FeedMessage::Status(FeedStatus::ChannelError)));
    assert_eq!(rx.recv().await, None);
}

fn seeded_store() -> (Arc<TournamentStore>, TournamentData) {
    let tournament = Tournament::new("Club Night", TournamentFormat::GroupKnockout, 4);
    let teams = vec![
        Team::new(tournament.id, "Rack Attack"),
        Team::new(tournament.id, "Side Pocket"),
    ];
    let mut m = pending_match(tournament.id);
    m.team1_id = Some(teams[0].id);
    m.team2_id = Some(teams[1].id);
    let data = TournamentData {
        tournament,
        teams,
        matches: vec![m],
    };
    let store = TournamentStore::new(vec![data.clone()], MatchHub::default());
    (Arc::new(store), data)
}

#[tokio::test(start_paused = true)]
async fn store_writes_reach_subscribed_views() {
    let (store, data) = seeded_store();
    let tid = data.tournament.id;
    let live = LiveMatches::new(data.matches.clone());
    let other_live = LiveMatches::new(Vec::new());
    let handle = spawn_refresher(tid, Arc::clone(&store), store.hub(), live.clone(), POLL);
    let other = spawn_refresher(
        Uuid::new_v4(),
        Arc::clone(&store),
        store.hub(),
        other_live.clone(),
        POLL,
    );

    let update = MatchUpdate {
        status: Some(MatchStatus::Completed),
        team1_score: Some(7),
        team2_score: Some(4),
        ..MatchUpdate::default()
    };
    store.update_match(tid, data.matches[0].id, &update).unwrap();
    sleep(Duration::from_millis(10)).await;

    let view = live.snapshot();
    assert_eq!(view.len(), 1);
    assert_eq!(view[0].status, MatchStatus::Completed);
    assert_eq!(view[0].team1_score, Some(7));
    assert_eq!(view[0].winner_id, data.matches[0].team1_id);
    assert!(other_live.snapshot().is_empty());

    handle.shutdown().await;
    other.shutdown().await;
}
