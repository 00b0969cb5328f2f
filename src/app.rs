use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/games/:id", get(handlers::game_details))
        .route("/games/:id/download", post(handlers::download))
        .route("/admin", get(handlers::admin_page))
        .route("/admin/games", post(handlers::create_game))
        .route("/admin/games/:id", post(handlers::update_game))
        .route("/admin/games/:id/delete", post(handlers::delete_game))
        .route("/stats", get(handlers::stats_page))
        .route("/login", get(handlers::login_page).post(handlers::login))
        .route("/logout", post(handlers::logout))
        .route("/refresh", post(handlers::refresh))
        .route("/api/games", get(handlers::api_games))
        .route("/api/games/:id", get(handlers::api_game))
        .route("/api/games/:id/download", post(handlers::api_download))
        .route("/api/stats", get(handlers::api_stats))
        .route("/api/session", get(handlers::api_session))
        .with_state(state)
}
