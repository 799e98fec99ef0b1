//! Single binary web server: overview pages rendered server-side, organizer API via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. See `padel_tournament_web::config` for the env vars.
//!
//! API calls that read or write teams/matches take the tournament scope as `?tournament=<id>`;
//! without it they work on the global (no tournament) scope.

use actix_files::Files;
use actix_session::{storage::CookieSessionStore, Session, SessionMiddleware};
use actix_web::{
    cookie::Key,
    delete, get, post, put,
    web::{self, Bytes, Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use padel_tournament_web::{
    config::ServerConfig,
    logic::{self, AuthState, Credentials, WritePolicy},
    models::{DisplaySettings, DisplayTable, TableSettings},
    render, Match, MatchId, MatchStatus, MemoryStore, Scope, Settings, Store, Team, TeamId,
    Tournament, TournamentError, TournamentId, Workbook,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

type AppState = Data<MemoryStore>;

/// Directory uploaded tournament icons are written to (served under /media).
struct MediaDir(PathBuf);

/// Seconds between overview auto-refreshes.
struct RefreshSecs(u32);

const AUTH_KEY: &str = "auth";

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

/// `?tournament=<id>`; absent means the global scope.
#[derive(Deserialize)]
struct ScopeQuery {
    tournament: Option<TournamentId>,
}

impl ScopeQuery {
    fn scope(&self) -> Scope {
        self.tournament
    }
}

/// `?tid=<id>` on the HTML pages; absent falls back to the active tournament.
#[derive(Deserialize)]
struct PageQuery {
    tid: Option<TournamentId>,
}

#[derive(Deserialize)]
struct CascadeQuery {
    #[serde(default)]
    cascade: bool,
}

#[derive(Deserialize)]
struct IconQuery {
    ext: String,
}

#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

#[derive(Deserialize)]
struct TeamPath {
    team_id: TeamId,
}

#[derive(Deserialize)]
struct MatchPath {
    match_id: MatchId,
}

#[derive(Deserialize)]
struct SheetPath {
    name: String,
}

#[derive(Deserialize)]
struct ActiveTournamentBody {
    tournament_id: Option<TournamentId>,
}

#[derive(Deserialize)]
struct GenerateBody {
    #[serde(default)]
    groups: Vec<String>,
    #[serde(default = "default_start_id")]
    start_id: MatchId,
    #[serde(default)]
    policy: WritePolicy,
}

fn default_start_id() -> MatchId {
    1
}

#[derive(Deserialize)]
struct ManualMatchBody {
    group: String,
    team1_id: TeamId,
    team2_id: TeamId,
    match_id: Option<MatchId>,
    #[serde(default)]
    status: MatchStatus,
}

#[derive(Deserialize)]
struct ClearScoresBody {
    #[serde(default)]
    groups: Vec<String>,
    #[serde(default)]
    reset_status: bool,
}

#[derive(Deserialize)]
struct SetPasswordBody {
    password: String,
    confirm: String,
}

#[derive(Deserialize)]
struct LoginBody {
    password: String,
    #[serde(default = "default_remember")]
    remember: bool,
}

fn default_remember() -> bool {
    true
}

#[derive(Deserialize)]
struct TokenBody {
    token: String,
}

#[derive(Serialize)]
struct AuthResponse {
    state: AuthState,
    password_set: bool,
    /// Only on a password login with `remember`; the client keeps it for token logins.
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<String>,
}

#[derive(Deserialize)]
struct DisplayTableBody {
    table: DisplayTable,
    #[serde(flatten)]
    settings: TableSettings,
}

/// JSON for Ok, `{ "error": ... }` with a matching status for Err.
fn respond<T: Serialize>(result: Result<T, TournamentError>) -> HttpResponse {
    match result {
        Ok(v) => HttpResponse::Ok().json(v),
        Err(e) => error_response(&e),
    }
}

fn error_response(e: &TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        TournamentError::Validation(_) => HttpResponse::BadRequest().json(body),
        TournamentError::AuthenticationFailure | TournamentError::Unauthorized => {
            HttpResponse::Unauthorized().json(body)
        }
        TournamentError::TournamentNotFound(_)
        | TournamentError::TeamNotFound(_)
        | TournamentError::MatchNotFound(_) => HttpResponse::NotFound().json(body),
        TournamentError::Storage(msg) => {
            log::error!("Storage error: {}", msg);
            HttpResponse::InternalServerError().json(body)
        }
    }
}

fn auth_state(session: &Session) -> AuthState {
    session
        .get::<AuthState>(AUTH_KEY)
        .ok()
        .flatten()
        .unwrap_or_default()
}

fn set_auth_state(session: &Session, state: AuthState) -> Result<(), TournamentError> {
    session
        .insert(AUTH_KEY, state)
        .map_err(|e| TournamentError::Storage(e.to_string()))
}

fn require_organizer(session: &Session) -> Result<(), TournamentError> {
    if auth_state(session).is_logged_in() {
        Ok(())
    } else {
        Err(TournamentError::Unauthorized)
    }
}

/// Run an organizer-only action.
fn organizer<T: Serialize>(
    session: &Session,
    action: impl FnOnce() -> Result<T, TournamentError>,
) -> HttpResponse {
    respond(require_organizer(session).and_then(|()| action()))
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "padel-tournament-web",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

// ---- pages ----

/// Landing page with tournament cards; `/?tid=<id>` jumps to that tournament's overview.
#[get("/")]
async fn page_home(state: AppState, query: Query<PageQuery>) -> HttpResponse {
    if let Some(tid) = query.tid {
        return HttpResponse::Found()
            .insert_header(("Location", format!("/overview?tid={}", tid)))
            .finish();
    }
    match state.tournaments() {
        Ok(list) => {
            let today = chrono::Local::now().date_naive();
            let html = render::home_page(&logic::upcoming(&list, today), &logic::held(&list, today));
            HttpResponse::Ok()
                .content_type("text/html; charset=utf-8")
                .body(html)
        }
        Err(e) => error_response(&e),
    }
}

/// Live overview: played matches, winner board, roster.
#[get("/overview")]
async fn page_overview(
    state: AppState,
    refresh: Data<RefreshSecs>,
    query: Query<PageQuery>,
) -> HttpResponse {
    let result = state.settings().and_then(|settings| {
        let scope = query.tid.or(settings.active_tournament_id);
        let overview = state.overview(scope)?;
        let now = chrono::Local::now().naive_local();
        Ok(render::overview_page(&overview, &settings.display, now, refresh.0))
    });
    match result {
        Ok(html) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(html),
        Err(e) => error_response(&e),
    }
}

// ---- public read API ----

#[get("/api/overview")]
async fn api_overview(state: AppState, query: Query<ScopeQuery>) -> HttpResponse {
    respond(state.overview(query.scope()))
}

#[get("/api/standings")]
async fn api_standings(state: AppState, query: Query<ScopeQuery>) -> HttpResponse {
    respond(state.standings(query.scope()))
}

#[get("/api/tournaments")]
async fn api_list_tournaments(state: AppState) -> HttpResponse {
    respond(state.tournaments())
}

#[get("/api/teams")]
async fn api_list_teams(state: AppState, query: Query<ScopeQuery>) -> HttpResponse {
    respond(state.teams(query.scope()))
}

#[get("/api/matches")]
async fn api_list_matches(state: AppState, query: Query<ScopeQuery>) -> HttpResponse {
    respond(state.matches(query.scope()))
}

#[get("/api/settings/active")]
async fn api_get_active(state: AppState) -> HttpResponse {
    respond(state.active_scope())
}

#[get("/api/settings/display")]
async fn api_get_display(state: AppState) -> HttpResponse {
    respond(state.settings().map(|s| s.display))
}

// ---- auth ----

fn auth_response(store: &MemoryStore, state: AuthState, token: Option<String>) -> Result<AuthResponse, TournamentError> {
    Ok(AuthResponse {
        state,
        password_set: store.settings()?.admin_password_hash.is_some(),
        token,
    })
}

#[get("/api/auth/status")]
async fn api_auth_status(state: AppState, session: Session) -> HttpResponse {
    respond(auth_response(&state, auth_state(&session), None))
}

/// Set the first organizer password (only while none is stored).
#[post("/api/auth/password")]
async fn api_set_password(state: AppState, body: Json<SetPasswordBody>) -> HttpResponse {
    respond(set_password(&state, &body))
}

fn set_password(store: &MemoryStore, body: &SetPasswordBody) -> Result<AuthResponse, TournamentError> {
    let credentials = Credentials::from_settings(&store.settings()?);
    let hash = logic::set_initial_password(&credentials, &body.password, &body.confirm)?;
    store.update_settings(&mut |s: &mut Settings| s.admin_password_hash = Some(hash.clone()))?;
    log::info!("Admin password set");
    auth_response(store, AuthState::LoggedOut, None)
}

#[post("/api/auth/login")]
async fn api_login(state: AppState, session: Session, body: Json<LoginBody>) -> HttpResponse {
    respond(login(&state, &session, &body))
}

fn login(store: &MemoryStore, session: &Session, body: &LoginBody) -> Result<AuthResponse, TournamentError> {
    let credentials = Credentials::from_settings(&store.settings()?);
    let new_state = auth_state(session)
        .login_with_password(&credentials, &body.password)
        .inspect_err(|_| log::warn!("Failed organizer login"))?;
    let token = if body.remember {
        let (token, hash) = logic::issue_remember_token()?;
        store.update_settings(&mut |s: &mut Settings| s.admin_token_hash = Some(hash.clone()))?;
        Some(token)
    } else {
        store.update_settings(&mut |s: &mut Settings| s.admin_token_hash = None)?;
        None
    };
    set_auth_state(session, new_state)?;
    log::info!("Organizer logged in");
    auth_response(store, new_state, token)
}

/// "Remember me" login with a token handed out by a previous password login.
#[post("/api/auth/token")]
async fn api_token_login(state: AppState, session: Session, body: Json<TokenBody>) -> HttpResponse {
    let result = state.settings().and_then(|settings| {
        let credentials = Credentials::from_settings(&settings);
        let new_state = auth_state(&session).login_with_token(&credentials, &body.token)?;
        set_auth_state(&session, new_state)?;
        auth_response(&state, new_state, None)
    });
    respond(result)
}

/// Log out and revoke the remember token.
#[post("/api/auth/logout")]
async fn api_logout(state: AppState, session: Session) -> HttpResponse {
    let result = state
        .update_settings(&mut |s: &mut Settings| s.admin_token_hash = None)
        .and_then(|()| {
            let new_state = auth_state(&session).logout();
            session.purge();
            auth_response(&state, new_state, None)
        });
    respond(result)
}

// ---- organizer: tournaments ----

#[post("/api/tournaments")]
async fn api_add_tournament(state: AppState, session: Session, body: Json<Tournament>) -> HttpResponse {
    organizer(&session, || {
        state.add_tournament(body.into_inner())?;
        state.tournaments()
    })
}

/// Save the whole tournament table (inline edits).
#[put("/api/tournaments")]
async fn api_save_tournaments(
    state: AppState,
    session: Session,
    body: Json<Vec<Tournament>>,
) -> HttpResponse {
    organizer(&session, || {
        state.save_tournaments(body.into_inner())?;
        state.tournaments()
    })
}

#[delete("/api/tournaments/{id}")]
async fn api_delete_tournament(
    state: AppState,
    session: Session,
    path: Path<TournamentPath>,
    query: Query<CascadeQuery>,
) -> HttpResponse {
    organizer(&session, || {
        state.delete_tournament(path.id, query.cascade)?;
        log::info!("Deleted tournament {} (cascade: {})", path.id, query.cascade);
        state.tournaments()
    })
}

#[delete("/api/tournaments")]
async fn api_delete_all_tournaments(
    state: AppState,
    session: Session,
    query: Query<CascadeQuery>,
) -> HttpResponse {
    organizer(&session, || {
        state.delete_all_tournaments(query.cascade)?;
        log::info!("Deleted all tournaments (cascade: {})", query.cascade);
        state.tournaments()
    })
}

/// Upload a tournament icon: raw image bytes, `?ext=png|jpg|jpeg`.
#[post("/api/tournaments/{id}/icon")]
async fn api_upload_icon(
    state: AppState,
    session: Session,
    media: Data<MediaDir>,
    path: Path<TournamentPath>,
    query: Query<IconQuery>,
    body: Bytes,
) -> HttpResponse {
    if let Err(e) = require_organizer(&session) {
        return error_response(&e);
    }
    let ext = query.ext.trim_start_matches('.').to_ascii_lowercase();
    if !matches!(ext.as_str(), "png" | "jpg" | "jpeg") {
        return error_response(&TournamentError::validation("Icon must be PNG or JPG"));
    }
    if let Err(e) = state.tournament(path.id) {
        return error_response(&e);
    }
    let file_name = format!("t_{}.{}", path.id, ext);
    let file_path = media.0.join(&file_name);
    if let Err(e) = tokio::fs::write(&file_path, &body).await {
        return error_response(&TournamentError::Storage(format!(
            "{}: {}",
            file_path.display(),
            e
        )));
    }
    respond(
        state
            .set_tournament_icon(path.id, file_name)
            .and_then(|()| state.tournament(path.id)),
    )
}

#[put("/api/settings/active")]
async fn api_set_active(
    state: AppState,
    session: Session,
    body: Json<ActiveTournamentBody>,
) -> HttpResponse {
    organizer(&session, || {
        state.set_active_tournament(body.tournament_id)?;
        state.active_scope()
    })
}

#[put("/api/settings/display")]
async fn api_set_display(
    state: AppState,
    session: Session,
    body: Json<DisplayTableBody>,
) -> HttpResponse {
    organizer(&session, || {
        let DisplayTableBody { table, settings } = body.into_inner();
        state.update_settings(&mut |s: &mut Settings| {
            *s.display.table_mut(table) = settings.clone();
        })?;
        state.settings().map(|s| s.display)
    })
}

/// Reset every table to all columns and default headers.
#[delete("/api/settings/display")]
async fn api_reset_display(state: AppState, session: Session) -> HttpResponse {
    organizer(&session, || {
        state.update_settings(&mut |s: &mut Settings| s.display = DisplaySettings::default())?;
        state.settings().map(|s| s.display)
    })
}

// ---- organizer: teams ----

#[post("/api/teams")]
async fn api_add_team(
    state: AppState,
    session: Session,
    query: Query<ScopeQuery>,
    body: Json<Team>,
) -> HttpResponse {
    organizer(&session, || {
        state.add_team(query.scope(), body.into_inner())?;
        state.teams(query.scope())
    })
}

/// Save the scope's whole team table.
#[put("/api/teams")]
async fn api_save_teams(
    state: AppState,
    session: Session,
    query: Query<ScopeQuery>,
    body: Json<Vec<Team>>,
) -> HttpResponse {
    organizer(&session, || {
        state.save_teams(query.scope(), body.into_inner())?;
        state.teams(query.scope())
    })
}

#[delete("/api/teams/{team_id}")]
async fn api_delete_team(
    state: AppState,
    session: Session,
    path: Path<TeamPath>,
    query: Query<ScopeQuery>,
) -> HttpResponse {
    organizer(&session, || {
        if !state.delete_team(query.scope(), path.team_id)? {
            return Err(TournamentError::TeamNotFound(path.team_id));
        }
        state.teams(query.scope())
    })
}

// ---- organizer: matches ----

/// Save the scope's whole match table (scores and status edits).
#[put("/api/matches")]
async fn api_save_matches(
    state: AppState,
    session: Session,
    query: Query<ScopeQuery>,
    body: Json<Vec<Match>>,
) -> HttpResponse {
    organizer(&session, || {
        state.save_matches(query.scope(), body.into_inner())?;
        state.matches(query.scope())
    })
}

#[delete("/api/matches/{match_id}")]
async fn api_delete_match(
    state: AppState,
    session: Session,
    path: Path<MatchPath>,
    query: Query<ScopeQuery>,
) -> HttpResponse {
    organizer(&session, || {
        if !state.delete_match(query.scope(), path.match_id)? {
            return Err(TournamentError::MatchNotFound(path.match_id));
        }
        state.matches(query.scope())
    })
}

/// Round-robin fixtures per group (replace or append).
#[post("/api/matches/generate")]
async fn api_generate_matches(
    state: AppState,
    session: Session,
    query: Query<ScopeQuery>,
    body: Json<GenerateBody>,
) -> HttpResponse {
    organizer(&session, || {
        state.generate_fixtures(query.scope(), &body.groups, body.start_id, body.policy)?;
        state.matches(query.scope())
    })
}

#[post("/api/matches/manual")]
async fn api_manual_match(
    state: AppState,
    session: Session,
    query: Query<ScopeQuery>,
    body: Json<ManualMatchBody>,
) -> HttpResponse {
    organizer(&session, || {
        state.add_manual_match(
            query.scope(),
            &body.group,
            body.team1_id,
            body.team2_id,
            body.match_id,
            body.status,
        )
    })
}

#[post("/api/matches/clear-scores")]
async fn api_clear_scores(
    state: AppState,
    session: Session,
    query: Query<ScopeQuery>,
    body: Json<ClearScoresBody>,
) -> HttpResponse {
    organizer(&session, || {
        state.clear_scores(query.scope(), &body.groups, body.reset_status)?;
        state.matches(query.scope())
    })
}

// ---- organizer: workbook import/export ----

#[get("/api/workbook/template")]
async fn api_workbook_template() -> HttpResponse {
    respond(padel_tournament_web::template())
}

#[get("/api/workbook/export")]
async fn api_workbook_export(state: AppState, session: Session, query: Query<ScopeQuery>) -> HttpResponse {
    organizer(&session, || state.export_workbook(query.scope()))
}

/// One sheet of the export as a CSV download.
#[get("/api/workbook/sheets/{name}")]
async fn api_workbook_sheet(
    state: AppState,
    session: Session,
    path: Path<SheetPath>,
    query: Query<ScopeQuery>,
) -> HttpResponse {
    let result = require_organizer(&session)
        .and_then(|()| state.export_workbook(query.scope()))
        .and_then(|wb| {
            wb.sheet(&path.name)
                .map(str::to_string)
                .ok_or_else(|| TournamentError::validation(format!("Unknown sheet '{}'", path.name)))
        });
    match result {
        Ok(csv) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                "Content-Disposition",
                format!("attachment; filename=\"{}.csv\"", path.name.to_lowercase()),
            ))
            .body(csv),
        Err(e) => error_response(&e),
    }
}

/// Replace the scope's teams and matches with an uploaded workbook.
#[post("/api/workbook/import")]
async fn api_workbook_import(
    state: AppState,
    session: Session,
    query: Query<ScopeQuery>,
    body: Json<Workbook>,
) -> HttpResponse {
    organizer(&session, || {
        let (teams, matches) = state.import_workbook(query.scope(), &body)?;
        Ok(serde_json::json!({ "teams": teams, "matches": matches }))
    })
}

/// Write the snapshot when something changed. Runs on the blocking pool.
async fn autosave(state: AppState) {
    if !state.is_dirty() {
        return;
    }
    let store = state.clone();
    match tokio::task::spawn_blocking(move || store.save()).await {
        Ok(Ok(())) => log::debug!("Saved data snapshot"),
        Ok(Err(e)) => log::error!("Autosave failed: {}", e),
        Err(e) => log::error!("Autosave task failed: {}", e),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let store = MemoryStore::open(config.data_file.clone())
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
    let state = Data::new(store);
    std::fs::create_dir_all(&config.media_dir)?;
    let media = Data::new(MediaDir(config.media_dir.clone()));
    let refresh = Data::new(RefreshSecs(config.refresh_secs));
    let key = match &config.session_key {
        Some(bytes) => Key::from(bytes.as_slice()),
        None => Key::generate(),
    };

    // Background task: write the snapshot to disk when dirty
    let state_autosave = state.clone();
    let autosave_every = Duration::from_secs(config.autosave_secs);
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(autosave_every);
        loop {
            interval.tick().await;
            autosave(state_autosave.clone()).await;
        }
    });

    let media_dir = config.media_dir.clone();
    let state_server = state.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(SessionMiddleware::new(CookieSessionStore::default(), key.clone()))
            .app_data(state_server.clone())
            .app_data(media.clone())
            .app_data(refresh.clone())
            .service(page_home)
            .service(page_overview)
            .service(api_health)
            .service(favicon)
            .service(api_overview)
            .service(api_standings)
            .service(api_list_tournaments)
            .service(api_list_teams)
            .service(api_list_matches)
            .service(api_get_active)
            .service(api_get_display)
            .service(api_auth_status)
            .service(api_set_password)
            .service(api_login)
            .service(api_token_login)
            .service(api_logout)
            .service(api_add_tournament)
            .service(api_save_tournaments)
            .service(api_delete_tournament)
            .service(api_delete_all_tournaments)
            .service(api_upload_icon)
            .service(api_set_active)
            .service(api_set_display)
            .service(api_reset_display)
            .service(api_add_team)
            .service(api_save_teams)
            .service(api_delete_team)
            .service(api_save_matches)
            .service(api_delete_match)
            .service(api_generate_matches)
            .service(api_manual_match)
            .service(api_clear_scores)
            .service(api_workbook_template)
            .service(api_workbook_export)
            .service(api_workbook_sheet)
            .service(api_workbook_import)
            .service(Files::new("/media", media_dir.clone()))
            .default_service(web::to(|| async {
                HttpResponse::NotFound().json(serde_json::json!({ "error": "Not found" }))
            }))
    })
    .bind(bind)?
    .run()
    .await?;

    log::info!("Shutting down, saving data to {}", config.data_file.display());
    state
        .save()
        .map_err(|e| std::io::Error::other(e.to_string()))
}
