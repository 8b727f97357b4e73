//! Single binary web server: dashboard and tournament pages, JSON API, bracket captures.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT, DATA_FILE,
//! POLL_INTERVAL_SECS.

use actix_web::{
    get, put,
    web::{Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use billiard_tournament_web::{
    all_group_standings,
    config::ServerConfig,
    export::standings_csv,
    layout_bracket, layout_section,
    live::{spawn_refresher, LiveMatches, MatchHub, RefreshHandle},
    logic::build_section,
    recent_results,
    render::{
        render_dashboard, render_tournament_page, CapturedImage, SectionCapture, SvgCapture,
    },
    store::{TournamentData, TournamentStore},
    upcoming_matches, GameMatch, LayoutConfig, MatchId, MatchUpdate, SectionKind, Team,
    TournamentError, TournamentId,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Dashboard lists return at most this many matches.
const DASHBOARD_LIMIT: usize = 10;

/// Shared state: the backend store plus one live match cache per tournament view.
struct AppState {
    store: Arc<TournamentStore>,
    views: HashMap<TournamentId, LiveMatches>,
    layout: LayoutConfig,
}

impl AppState {
    /// Tournament data with matches taken from the live view cache.
    fn view(&self, id: TournamentId) -> Result<TournamentData, TournamentError> {
        let mut data = self.store.get(id)?;
        if let Some(live) = self.views.get(&id) {
            data.matches = live.snapshot();
        }
        Ok(data)
    }

    /// Every tournament's live matches and teams, for the dashboard lists.
    fn all_matches(&self) -> Result<(Vec<GameMatch>, Vec<Team>), TournamentError> {
        let mut matches = Vec::new();
        let mut teams = Vec::new();
        for data in self.store.all()? {
            let id = data.tournament.id;
            match self.views.get(&id) {
                Some(live) => matches.extend(live.snapshot()),
                None => matches.extend(data.matches),
            }
            teams.extend(data.teams);
        }
        Ok((matches, teams))
    }
}

type AppData = Data<AppState>;

fn error_response(e: &TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "success": false, "error": e.to_string() });
    match e {
        TournamentError::TournamentNotFound(_)
        | TournamentError::MatchNotFound(_)
        | TournamentError::UnknownGroup(_) => HttpResponse::NotFound().json(body),
        TournamentError::IncompleteResult(_)
        | TournamentError::InvalidWinner(_)
        | TournamentError::UnknownSection(_) => HttpResponse::BadRequest().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

/// Path segment: tournament id (e.g. /api/tournament/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and match id.
#[derive(Deserialize)]
struct TournamentMatchPath {
    id: TournamentId,
    match_id: MatchId,
}

/// Path segments: tournament id and bracket section slug.
#[derive(Deserialize)]
struct SectionPath {
    id: TournamentId,
    section: String,
}

/// Path segments: tournament id and group name.
#[derive(Deserialize)]
struct GroupPath {
    id: TournamentId,
    group: String,
}

#[derive(Deserialize)]
struct MatchesQuery {
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[derive(Deserialize)]
struct CaptureQuery {
    #[serde(default)]
    download: Option<u8>,
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "billiard-tournament-web",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

#[get("/api/tournaments")]
async fn api_tournaments(state: AppData) -> HttpResponse {
    match state.store.summaries() {
        Ok(tournaments) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "tournaments": tournaments,
        })),
        Err(e) => error_response(&e),
    }
}

/// Tournament header, teams and live matches.
#[get("/api/tournament/{id}")]
async fn api_tournament(state: AppData, path: Path<TournamentPath>) -> HttpResponse {
    match state.view(path.id) {
        Ok(data) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "tournament": data.tournament,
            "teams": data.teams,
            "matches": data.matches,
        })),
        Err(e) => error_response(&e),
    }
}

#[get("/api/tournament/{id}/standings")]
async fn api_standings(state: AppData, path: Path<TournamentPath>) -> HttpResponse {
    match state.view(path.id) {
        Ok(data) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "groups": all_group_standings(&data.matches, &data.teams),
        })),
        Err(e) => error_response(&e),
    }
}

#[get("/api/tournament/{id}/standings.csv")]
async fn api_standings_csv(state: AppData, path: Path<TournamentPath>) -> HttpResponse {
    let csv = state
        .view(path.id)
        .and_then(|data| standings_csv(&all_group_standings(&data.matches, &data.teams)));
    match csv {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                "Content-Disposition",
                "attachment; filename=\"standings.csv\"",
            ))
            .body(body),
        Err(e) => error_response(&e),
    }
}

/// Laid-out bracket sections (positions, connectors, sizes). Empty sections are omitted.
#[get("/api/tournament/{id}/bracket")]
async fn api_bracket(state: AppData, path: Path<TournamentPath>) -> HttpResponse {
    match state.view(path.id) {
        Ok(data) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "format": data.tournament.format,
            "sections": layout_bracket(&data.tournament.format, &data.matches, &state.layout),
        })),
        Err(e) => error_response(&e),
    }
}

/// Dashboard lists across all tournaments: `?type=lastMatches` for results, else upcoming.
#[get("/api/matches")]
async fn api_matches(state: AppData, query: Query<MatchesQuery>) -> HttpResponse {
    let (matches, teams) = match state.all_matches() {
        Ok(all) => all,
        Err(e) => return error_response(&e),
    };
    let list = if query.kind.as_deref() == Some("lastMatches") {
        recent_results(&matches, &teams, DASHBOARD_LIMIT)
    } else {
        upcoming_matches(&matches, &teams, DASHBOARD_LIMIT)
    };
    HttpResponse::Ok().json(serde_json::json!({ "success": true, "matches": list }))
}

/// Record a score/status change; the change reaches the views through the hub.
#[put("/api/tournament/{id}/matches/{match_id}")]
async fn api_update_match(
    state: AppData,
    path: Path<TournamentMatchPath>,
    body: Json<MatchUpdate>,
) -> HttpResponse {
    match state.store.update_match(path.id, path.match_id, &body) {
        Ok(updated) => {
            log::info!("Match {} updated ({:?})", updated.id, updated.status);
            HttpResponse::Ok().json(serde_json::json!({ "success": true, "match": updated }))
        }
        Err(e) => error_response(&e),
    }
}

#[get("/")]
async fn page_dashboard(state: AppData) -> HttpResponse {
    let result = state.store.summaries().and_then(|summaries| {
        let (matches, teams) = state.all_matches()?;
        Ok(render_dashboard(
            &summaries,
            &upcoming_matches(&matches, &teams, DASHBOARD_LIMIT),
            &recent_results(&matches, &teams, DASHBOARD_LIMIT),
        ))
    });
    match result {
        Ok(html) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(html),
        Err(e) => error_response(&e),
    }
}

#[get("/tournament/{id}")]
async fn page_tournament(state: AppData, path: Path<TournamentPath>) -> HttpResponse {
    match state.view(path.id) {
        Ok(data) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(render_tournament_page(&data, &state.layout)),
        Err(e) => error_response(&e),
    }
}

/// Capture one bracket section as an image.
#[get("/tournament/{id}/bracket/{section}/capture")]
async fn bracket_capture(
    state: AppData,
    path: Path<SectionPath>,
    query: Query<CaptureQuery>,
) -> HttpResponse {
    let Some(kind) = SectionKind::from_slug(&path.section) else {
        return error_response(&TournamentError::UnknownSection(path.section.clone()));
    };
    let data = match state.view(path.id) {
        Ok(data) => data,
        Err(e) => return error_response(&e),
    };
    let section = layout_section(
        build_section(kind, &data.tournament.format, &data.matches),
        &state.layout,
    );
    match SvgCapture.capture(kind.title(), &section, &data.teams, &state.layout) {
        Ok(image) => image_response(image, query.download.unwrap_or(0) != 0),
        Err(e) => {
            log::error!("Error capturing screenshot of {}: {}", kind.slug(), e);
            error_response(&e)
        }
    }
}

/// Capture one group's standings table as an image.
#[get("/tournament/{id}/groups/{group}/capture")]
async fn group_capture(
    state: AppData,
    path: Path<GroupPath>,
    query: Query<CaptureQuery>,
) -> HttpResponse {
    let data = match state.view(path.id) {
        Ok(data) => data,
        Err(e) => return error_response(&e),
    };
    let Some(group) = all_group_standings(&data.matches, &data.teams)
        .into_iter()
        .find(|g| g.name == path.group)
    else {
        return error_response(&TournamentError::UnknownGroup(path.group.clone()));
    };
    match SvgCapture.capture_group(&group) {
        Ok(image) => image_response(image, query.download.unwrap_or(0) != 0),
        Err(e) => {
            log::error!("Error capturing screenshot of {}: {}", group.name, e);
            error_response(&e)
        }
    }
}

fn image_response(image: CapturedImage, download: bool) -> HttpResponse {
    let mut resp = HttpResponse::Ok();
    resp.content_type(image.content_type);
    if download {
        resp.insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", image.file_name),
        ));
    }
    resp.body(image.bytes)
}

/// One live view cache and refresher per tournament.
fn start_views(
    store: &Arc<TournamentStore>,
    config: &ServerConfig,
) -> Result<(HashMap<TournamentId, LiveMatches>, Vec<RefreshHandle>), TournamentError> {
    let mut views = HashMap::new();
    let mut handles = Vec::new();
    for data in store.all()? {
        let id = data.tournament.id;
        let live = LiveMatches::new(data.matches);
        handles.push(spawn_refresher(
            id,
            Arc::clone(store),
            store.hub(),
            live.clone(),
            config.poll_interval,
        ));
        views.insert(id, live);
    }
    Ok((views, handles))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    let store = Arc::new(
        TournamentStore::load(&config.data_file, MatchHub::default()).map_err(std::io::Error::other)?,
    );
    let (views, handles) = start_views(&store, &config).map_err(std::io::Error::other)?;

    let bind = (config.host.as_str(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(AppState {
        store,
        views,
        layout: LayoutConfig::default(),
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(page_dashboard)
            .service(page_tournament)
            .service(bracket_capture)
            .service(group_capture)
            .service(api_health)
            .service(favicon)
            .service(api_tournaments)
            .service(api_tournament)
            .service(api_standings)
            .service(api_standings_csv)
            .service(api_bracket)
            .service(api_matches)
            .service(api_update_match)
    })
    .bind(bind)?
    .run()
    .await?;

    for handle in handles {
        handle.shutdown().await;
    }
    log::info!("Server stopped");
    Ok(())
}
