use crate::actions;
use crate::errors::{AppError, ClientError};
use crate::models::{
    CategoryFilter, DownloadResponse, GameDraft, GamePatch, GameRecord, SessionResponse, StatsSummary,
};
use crate::state::AppState;
use crate::stats::{PANEL_SIZE, recent_games, top_games};
use crate::ui::{
    PageContext, render_admin, render_details, render_index, render_login, render_restricted,
    render_stats,
};
use axum::{
    Form, Json,
    extract::{Path, Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    pub category: Option<String>,
}

impl CatalogQuery {
    fn selection(&self) -> Result<CategoryFilter, AppError> {
        self.category
            .as_deref()
            .unwrap_or_default()
            .parse()
            .map_err(|err: ClientError| AppError::bad_request(err.to_string()))
    }
}

/// Admin form fields. Blank fields are left out of an update.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub download_link: String,
    #[serde(default)]
    pub category: String,
}

impl GameForm {
    pub fn into_draft(self) -> Result<GameDraft, ClientError> {
        Ok(GameDraft {
            category: self.category.parse()?,
            title: self.title,
            description: self.description,
            image: self.image,
            download_link: self.download_link,
        })
    }

    pub fn into_patch(self) -> Result<GamePatch, ClientError> {
        let category = match non_blank(self.category) {
            Some(label) => Some(label.parse()?),
            None => None,
        };
        Ok(GamePatch {
            title: non_blank(self.title),
            description: non_blank(self.description),
            image: non_blank(self.image),
            download_link: non_blank(self.download_link),
            category,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub secret: String,
}

pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Html<String>, AppError> {
    let selected = query.selection()?;
    let ctx = page_context(&state).await;
    let store = state.store.lock().await;
    let games = store.catalog.filtered(selected);
    Ok(Html(render_index(&ctx, &games, selected)))
}

pub async fn game_details(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let game = state.store.lock().await.catalog.get(&id).cloned();
    let game = game.ok_or_else(|| AppError::not_found(format!("game not found: {id}")))?;
    let ctx = page_context(&state).await;
    Ok(Html(render_details(&ctx, &game)))
}

/// Sends the browser on to the download link once the download is counted.
/// Any failure lands back on the catalog, where the error notice shows.
pub async fn download(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let game = match actions::download(&state, &id).await {
        Ok(game) => game,
        Err(_) => return Redirect::to("/").into_response(),
    };
    match HeaderValue::try_from(game.download_link.trim()) {
        Ok(location) => (StatusCode::SEE_OTHER, [(header::LOCATION, location)]).into_response(),
        Err(err) => {
            warn!("download link of {} is not a valid Location: {err}", game.id);
            state
                .store
                .lock()
                .await
                .notices
                .error("Download failed", "The download link of this game is not valid.");
            Redirect::to("/").into_response()
        }
    }
}

pub async fn admin_page(State(state): State<AppState>) -> Response {
    let ctx = page_context(&state).await;
    if !ctx.is_admin {
        return restricted(&ctx);
    }
    let games = state.store.lock().await.catalog.records().to_vec();
    Html(render_admin(&ctx, &games)).into_response()
}

pub async fn create_game(State(state): State<AppState>, Form(form): Form<GameForm>) -> Response {
    if let Some(denied) = require_admin(&state).await {
        return denied;
    }
    match form.into_draft() {
        Ok(draft) => {
            let _ = actions::create_game(&state, draft).await;
        }
        Err(err) => report_form_error(&state, "Could not add game", &err).await,
    }
    Redirect::to("/admin").into_response()
}

pub async fn update_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<GameForm>,
) -> Response {
    if let Some(denied) = require_admin(&state).await {
        return denied;
    }
    match form.into_patch() {
        Ok(patch) => {
            let _ = actions::update_game(&state, &id, patch).await;
        }
        Err(err) => report_form_error(&state, "Could not update game", &err).await,
    }
    Redirect::to("/admin").into_response()
}

pub async fn delete_game(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    if let Some(denied) = require_admin(&state).await {
        return denied;
    }
    let _ = actions::remove_game(&state, &id).await;
    Redirect::to("/admin").into_response()
}

pub async fn stats_page(State(state): State<AppState>) -> Response {
    let ctx = page_context(&state).await;
    if !ctx.is_admin {
        return restricted(&ctx);
    }
    let store = state.store.lock().await;
    let records = store.catalog.records();
    let top = top_games(records, PANEL_SIZE);
    let recent = recent_games(records, PANEL_SIZE);
    Html(render_stats(&ctx, &store.stats, &top, &recent)).into_response()
}

pub async fn login_page(State(state): State<AppState>) -> Html<String> {
    let ctx = page_context(&state).await;
    Html(render_login(&ctx, None))
}

pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let unlocked = state.gate.lock().await.login(&form.secret).await?;
    if unlocked {
        return Ok(Redirect::to("/admin").into_response());
    }
    let ctx = page_context(&state).await;
    let page = render_login(&ctx, Some("Incorrect passphrase."));
    Ok((StatusCode::UNAUTHORIZED, Html(page)).into_response())
}

pub async fn logout(State(state): State<AppState>) -> Result<Redirect, AppError> {
    state.gate.lock().await.logout().await?;
    Ok(Redirect::to("/"))
}

pub async fn refresh(State(state): State<AppState>) -> Redirect {
    let _ = actions::load_catalog(&state).await;
    Redirect::to("/")
}

pub async fn api_games(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<Vec<GameRecord>>, AppError> {
    let selected = query.selection()?;
    let store = state.store.lock().await;
    let games = store.catalog.filtered(selected).into_iter().cloned().collect();
    Ok(Json(games))
}

pub async fn api_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GameRecord>, AppError> {
    let game = state.store.lock().await.catalog.get(&id).cloned();
    game.map(Json)
        .ok_or_else(|| AppError::not_found(format!("game not found: {id}")))
}

pub async fn api_download(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DownloadResponse>, AppError> {
    let game = actions::download(&state, &id).await?;
    Ok(Json(DownloadResponse {
        id: game.id,
        clicks: game.clicks,
        download_link: game.download_link,
    }))
}

pub async fn api_stats(State(state): State<AppState>) -> Result<Json<StatsSummary>, AppError> {
    state.gate.lock().await.ensure_admin()?;
    Ok(Json(state.store.lock().await.stats.clone()))
}

pub async fn api_session(State(state): State<AppState>) -> Json<SessionResponse> {
    Json(SessionResponse {
        admin: state.is_admin().await,
    })
}

/// Header data plus the notices queued since the last page, which are
/// consumed here.
async fn page_context(state: &AppState) -> PageContext {
    let is_admin = state.is_admin().await;
    let mut store = state.store.lock().await;
    PageContext {
        total_games: store.catalog.len(),
        total_downloads: store.catalog.total_downloads(),
        is_admin,
        notices: store.notices.drain(),
    }
}

async fn require_admin(state: &AppState) -> Option<Response> {
    if state.is_admin().await {
        return None;
    }
    let ctx = page_context(state).await;
    Some(restricted(&ctx))
}

fn restricted(ctx: &PageContext) -> Response {
    (StatusCode::FORBIDDEN, Html(render_restricted(ctx))).into_response()
}

async fn report_form_error(state: &AppState, title: &str, err: &ClientError) {
    warn!("rejected admin form: {err}");
    state
        .store
        .lock()
        .await
        .notices
        .error(title, actions::describe(err));
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
