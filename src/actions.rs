//! Orchestration of user actions against the backend and the local store.
//!
//! Every action talks to the backend first and touches the local store only
//! after the backend call succeeded, so a failure never leaves a partial
//! mutation behind. Failures are logged and queued as error notices before
//! being returned to the caller. The store lock is never held across a
//! backend call.

use crate::catalog::Catalog;
use crate::errors::ClientError;
use crate::models::{GameDraft, GamePatch, GameRecord};
use crate::notify::RETRY_HINT;
use crate::state::AppState;
use tracing::{error, info, warn};

/// Replaces the local catalog with the backend's, then refreshes stats.
pub async fn load_catalog(state: &AppState) -> Result<(), ClientError> {
    match state.backend.list_games().await {
        Ok(games) => {
            let catalog = Catalog::from_records(games);
            info!("loaded {} games", catalog.len());
            state.store.lock().await.catalog = catalog;
        }
        Err(err) => {
            error!("error fetching games: {err}");
            report(state, "Could not load games", &err).await;
            return Err(err);
        }
    }
    refresh_stats(state).await
}

/// Re-fetches the stats summary. A failure keeps the previous summary and
/// is only logged.
pub async fn refresh_stats(state: &AppState) -> Result<(), ClientError> {
    match state.backend.stats().await {
        Ok(stats) => {
            state.store.lock().await.stats = stats;
            Ok(())
        }
        Err(err) => {
            error!("error loading stats: {err}");
            Err(err)
        }
    }
}

/// Counts a download of `id` and returns the updated record, whose
/// `download_link` the caller navigates to. Nothing changes locally when
/// the link cannot be navigated to or the backend increment fails.
pub async fn download(state: &AppState, id: &str) -> Result<GameRecord, ClientError> {
    let found = state.store.lock().await.catalog.get(id).cloned();
    let Some(record) = found else {
        let err = ClientError::NotFound(id.to_string());
        warn!("download requested for unknown game {id}");
        report(state, "Download failed", &err).await;
        return Err(err);
    };

    if let Err(err) = record.navigable_link() {
        warn!("refusing download of {id}: {err}");
        report(state, "Download failed", &err).await;
        return Err(err);
    }

    if let Err(err) = state.backend.increment_download(&record.id).await {
        error!("error incrementing download for {}: {err}", record.id);
        report(state, "Download failed", &err).await;
        return Err(err);
    }

    let updated = {
        let mut store = state.store.lock().await;
        store.catalog.increment_clicks(&record.id);
        store.catalog.get(&record.id).cloned()
    };

    // stats failure does not undo a counted download
    let _ = refresh_stats(state).await;

    let updated = updated.unwrap_or_else(|| GameRecord {
        clicks: record.clicks.saturating_add(1),
        ..record
    });
    info!("download started for {} ({} clicks)", updated.id, updated.clicks);
    state.store.lock().await.notices.success(
        format!("Download started: {}", updated.title),
        "The download link was opened.",
    );
    Ok(updated)
}

pub async fn create_game(state: &AppState, draft: GameDraft) -> Result<GameRecord, ClientError> {
    let draft = draft.normalized();
    if let Err(err) = draft.validate() {
        warn!("rejected new game: {err}");
        report(state, "Could not add game", &err).await;
        return Err(err);
    }

    let record = match state.backend.create_game(&draft).await {
        Ok(record) => record,
        Err(err) => {
            error!("error creating game: {err}");
            report(state, "Could not add game", &err).await;
            return Err(err);
        }
    };

    state.store.lock().await.catalog.prepend(record.clone());
    let _ = refresh_stats(state).await;

    info!("created game {} ({})", record.id, record.title);
    state.store.lock().await.notices.success(
        "Game added",
        format!("{} was added to the library.", record.title),
    );
    Ok(record)
}

/// Sends `patch` to the backend; the record it answers with replaces the
/// local copy.
pub async fn update_game(
    state: &AppState,
    id: &str,
    patch: GamePatch,
) -> Result<GameRecord, ClientError> {
    let patch = patch.normalized();
    if let Err(err) = patch.validate() {
        warn!("rejected update of {id}: {err}");
        report(state, "Could not update game", &err).await;
        return Err(err);
    }

    let record = match state.backend.update_game(id, &patch).await {
        Ok(record) => record,
        Err(err) => {
            error!("error updating game {id}: {err}");
            report(state, "Could not update game", &err).await;
            return Err(err);
        }
    };

    let replaced = state.store.lock().await.catalog.replace(record.clone());
    if !replaced {
        warn!("updated game {id} is not in the local catalog");
    }
    let _ = refresh_stats(state).await;

    state
        .store
        .lock()
        .await
        .notices
        .success("Game updated", "Your changes were saved.");
    Ok(record)
}

pub async fn remove_game(state: &AppState, id: &str) -> Result<(), ClientError> {
    if let Err(err) = state.backend.delete_game(id).await {
        error!("error deleting game {id}: {err}");
        report(state, "Could not remove game", &err).await;
        return Err(err);
    }

    if state.store.lock().await.catalog.remove(id).is_none() {
        warn!("deleted game {id} was not in the local catalog");
    }
    let _ = refresh_stats(state).await;

    info!("removed game {id}");
    state
        .store
        .lock()
        .await
        .notices
        .success("Game removed", "The game was removed from the library.");
    Ok(())
}

/// User-facing explanation for an error notice.
pub fn describe(err: &ClientError) -> String {
    match err {
        ClientError::Network(_) | ClientError::Storage(_) => RETRY_HINT.to_string(),
        ClientError::Validation(message) => format!("{message}. Check the data and try again."),
        ClientError::NotFound(id) => format!("No game with id {id} exists."),
        ClientError::Auth => "Admin access is required.".to_string(),
    }
}

async fn report(state: &AppState, title: &str, err: &ClientError) {
    state.store.lock().await.notices.error(title, describe(err));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::GameBackend;
    use crate::mock::MockBackend;
    use crate::models::{Category, StatsSummary};
    use crate::notify::NoticeLevel;
    use crate::storage::MemorySessionStore;
    use async_trait::async_trait;
    use std::sync::Arc;

    /// Serves a fixed catalog and rejects every write.
    struct ReadOnlyBackend {
        games: Vec<GameRecord>,
    }

    #[async_trait]
    impl GameBackend for ReadOnlyBackend {
        async fn list_games(&self) -> Result<Vec<GameRecord>, ClientError> {
            Ok(self.games.clone())
        }

        async fn create_game(&self, _draft: &GameDraft) -> Result<GameRecord, ClientError> {
            Err(ClientError::Network("503 Service Unavailable".into()))
        }

        async fn update_game(&self, _id: &str, _patch: &GamePatch) -> Result<GameRecord, ClientError> {
            Err(ClientError::Network("503 Service Unavailable".into()))
        }

        async fn delete_game(&self, _id: &str) -> Result<(), ClientError> {
            Err(ClientError::Network("503 Service Unavailable".into()))
        }

        async fn increment_download(&self, _id: &str) -> Result<(), ClientError> {
            Err(ClientError::Network("connection reset".into()))
        }

        async fn stats(&self) -> Result<StatsSummary, ClientError> {
            Ok(crate::stats::aggregate(&self.games))
        }
    }

    fn draft(title: &str) -> GameDraft {
        GameDraft {
            title: title.to_string(),
            description: "A new game".into(),
            image: "https://example.com/x.jpg".into(),
            download_link: "https://example.com/x".into(),
            category: Category::Rpg,
        }
    }

    async fn state_with(backend: Arc<dyn GameBackend>) -> AppState {
        let state = AppState::new(backend, Arc::new(MemorySessionStore::default())).await;
        load_catalog(&state).await.unwrap();
        state
    }

    async fn snapshot(state: &AppState) -> (Catalog, StatsSummary) {
        let store = state.store.lock().await;
        (store.catalog.clone(), store.stats.clone())
    }

    #[tokio::test]
    async fn download_increments_exactly_one_record() {
        let state = state_with(Arc::new(MockBackend::with_fixtures())).await;
        let (before, stats_before) = snapshot(&state).await;

        let updated = download(&state, "3").await.unwrap();
        assert_eq!(updated.download_link, "https://example.com/gtav");

        let (after, stats_after) = snapshot(&state).await;
        assert_eq!(after.len(), before.len());
        for (old, new) in before.records().iter().zip(after.records()) {
            if old.id == "3" {
                assert_eq!(new.clicks, old.clicks + 1);
            } else {
                assert_eq!(old, new);
            }
        }
        assert_eq!(stats_after.total_downloads, stats_before.total_downloads + 1);
        assert_eq!(stats_after.recent_activity[0].game_title, "Grand Theft Auto V");

        let notices = state.store.lock().await.notices.drain();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].title, "Download started: Grand Theft Auto V");
    }

    #[tokio::test]
    async fn failed_download_changes_nothing() {
        let games = crate::mock::fixture_games();
        let state = state_with(Arc::new(ReadOnlyBackend { games })).await;
        let before = snapshot(&state).await;

        let result = download(&state, "1").await;
        assert_eq!(result, Err(ClientError::Network("connection reset".into())));
        assert_eq!(snapshot(&state).await, before);

        let notices = state.store.lock().await.notices.drain();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert_eq!(notices[0].description, RETRY_HINT);
    }

    #[tokio::test]
    async fn unusable_link_is_refused_before_counting() {
        let mut games = crate::mock::fixture_games();
        games[0].download_link = "https://example.com/jogo\nsimulacao".into();
        let state = state_with(Arc::new(MockBackend::new(games))).await;
        let before = snapshot(&state).await;

        let result = download(&state, "1").await;
        assert!(matches!(result, Err(ClientError::Validation(_))));
        assert_eq!(snapshot(&state).await, before);
        let backend_games = state.backend.list_games().await.unwrap();
        assert_eq!(backend_games[0].clicks, 1547);
        assert_eq!(state.store.lock().await.notices.drain()[0].title, "Download failed");
    }

    #[tokio::test]
    async fn created_link_is_stored_as_validated() {
        let state = state_with(Arc::new(MockBackend::new(Vec::new()))).await;
        let mut split = draft("X");
        split.download_link = "https://example.com/jogo\nsimulacao".into();

        let created = create_game(&state, split).await.unwrap();
        assert_eq!(created.download_link, "https://example.com/jogosimulacao");

        let downloaded = download(&state, &created.id).await.unwrap();
        assert_eq!(downloaded.navigable_link().unwrap(), "https://example.com/jogosimulacao");
        assert_eq!(downloaded.clicks, 1);
    }

    #[tokio::test]
    async fn update_stores_canonical_link() {
        let state = state_with(Arc::new(MockBackend::with_fixtures())).await;
        let patch = GamePatch {
            download_link: Some("https://example.com/novo\tlink".into()),
            ..GamePatch::default()
        };
        let updated = update_game(&state, "2", patch).await.unwrap();
        assert_eq!(updated.download_link, "https://example.com/novolink");
    }

    #[tokio::test]
    async fn download_of_unknown_game_is_not_found() {
        let state = state_with(Arc::new(MockBackend::with_fixtures())).await;
        let before = snapshot(&state).await;
        assert_eq!(
            download(&state, "nope").await,
            Err(ClientError::NotFound("nope".into()))
        );
        assert_eq!(snapshot(&state).await, before);
    }

    #[tokio::test]
    async fn create_on_empty_catalog_then_prepends() {
        let state = state_with(Arc::new(MockBackend::new(Vec::new()))).await;

        let first = create_game(&state, draft("X")).await.unwrap();
        {
            let store = state.store.lock().await;
            assert_eq!(store.catalog.len(), 1);
            assert_eq!(store.catalog.records()[0].clicks, 0);
            assert_eq!(store.stats.total_games, 1);
        }

        let second = create_game(&state, draft("Y")).await.unwrap();
        let store = state.store.lock().await;
        let ids: Vec<&str> = store.catalog.records().iter().map(|game| game.id.as_str()).collect();
        assert_eq!(ids, vec![second.id.as_str(), first.id.as_str()]);
    }

    #[tokio::test]
    async fn invalid_draft_never_reaches_backend() {
        let state = state_with(Arc::new(MockBackend::new(Vec::new()))).await;
        let mut bad = draft("X");
        bad.download_link = "nowhere".into();

        let result = create_game(&state, bad).await;
        assert!(matches!(result, Err(ClientError::Validation(_))));
        assert!(state.backend.list_games().await.unwrap().is_empty());
        assert!(state.store.lock().await.catalog.is_empty());
    }

    #[tokio::test]
    async fn failed_writes_leave_catalog_untouched() {
        let games = crate::mock::fixture_games();
        let state = state_with(Arc::new(ReadOnlyBackend { games })).await;
        let before = snapshot(&state).await;

        assert!(create_game(&state, draft("X")).await.is_err());
        assert!(update_game(&state, "1", GamePatch {
            title: Some("Renamed".into()),
            ..GamePatch::default()
        })
        .await
        .is_err());
        assert!(remove_game(&state, "1").await.is_err());

        assert_eq!(snapshot(&state).await, before);
        let titles: Vec<String> = state
            .store
            .lock()
            .await
            .notices
            .drain()
            .into_iter()
            .map(|notice| notice.title)
            .collect();
        assert_eq!(
            titles,
            vec!["Could not add game", "Could not update game", "Could not remove game"]
        );
    }

    #[tokio::test]
    async fn update_takes_server_record_and_keeps_clicks() {
        let state = state_with(Arc::new(MockBackend::with_fixtures())).await;
        let patch = GamePatch {
            title: Some("Elden Ring: Shadow of the Erdtree".into()),
            ..GamePatch::default()
        };
        let updated = update_game(&state, "6", patch).await.unwrap();
        assert_eq!(updated.clicks, 4321);

        let store = state.store.lock().await;
        let local = store.catalog.get("6").unwrap();
        assert_eq!(local, &updated);
    }

    #[tokio::test]
    async fn update_of_unknown_id_reports_not_found() {
        let state = state_with(Arc::new(MockBackend::with_fixtures())).await;
        let before = snapshot(&state).await;
        let result = update_game(&state, "missing", GamePatch::default()).await;
        assert_eq!(result, Err(ClientError::NotFound("missing".into())));
        assert_eq!(snapshot(&state).await, before);
        let notices = state.store.lock().await.notices.drain();
        assert_eq!(notices[0].description, "No game with id missing exists.");
    }

    #[tokio::test]
    async fn remove_drops_record_and_refreshes_stats() {
        let state = state_with(Arc::new(MockBackend::with_fixtures())).await;
        remove_game(&state, "4").await.unwrap();
        let store = state.store.lock().await;
        assert!(store.catalog.get("4").is_none());
        assert_eq!(store.stats.total_games, 5);
        assert_eq!(store.stats.top_game.title, "Elden Ring");
    }
}
