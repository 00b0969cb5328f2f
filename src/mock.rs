use crate::backend::GameBackend;
use crate::errors::ClientError;
use crate::models::{Category, GameDraft, GamePatch, GameRecord, StatsSummary};
use crate::stats::{ActivityLog, aggregate_with_activity};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::Mutex;
use tracing::info;

/// In-process backend used when no backend URL is configured.
///
/// Ids come from the wall clock in milliseconds, bumped past the last one
/// handed out so two creations in the same millisecond stay distinct.
/// Stats are recomputed from the held catalog; the activity log grows with
/// each download.
pub struct MockBackend {
    inner: Mutex<MockData>,
}

#[derive(Default)]
struct MockData {
    games: Vec<GameRecord>,
    activity: ActivityLog,
    last_id: i64,
}

impl MockBackend {
    pub fn new(games: Vec<GameRecord>) -> Self {
        Self {
            inner: Mutex::new(MockData {
                games,
                ..MockData::default()
            }),
        }
    }

    pub fn with_fixtures() -> Self {
        Self::new(fixture_games())
    }
}

impl MockData {
    fn next_id(&mut self) -> String {
        let now = Utc::now().timestamp_millis();
        self.last_id = now.max(self.last_id + 1);
        self.last_id.to_string()
    }

    fn find_mut(&mut self, id: &str) -> Result<&mut GameRecord, ClientError> {
        self.games
            .iter_mut()
            .find(|game| game.id == id)
            .ok_or_else(|| ClientError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl GameBackend for MockBackend {
    async fn list_games(&self) -> Result<Vec<GameRecord>, ClientError> {
        Ok(self.inner.lock().await.games.clone())
    }

    async fn create_game(&self, draft: &GameDraft) -> Result<GameRecord, ClientError> {
        draft.validate()?;
        let mut data = self.inner.lock().await;
        let id = data.next_id();
        let record = draft.normalized().into_record(id, Utc::now());
        data.games.insert(0, record.clone());
        info!(id = %record.id, title = %record.title, "mock backend created game");
        Ok(record)
    }

    async fn update_game(&self, id: &str, patch: &GamePatch) -> Result<GameRecord, ClientError> {
        patch.validate()?;
        let mut data = self.inner.lock().await;
        let record = data.find_mut(id)?;
        patch.apply_to(record);
        Ok(record.clone())
    }

    async fn delete_game(&self, id: &str) -> Result<(), ClientError> {
        let mut data = self.inner.lock().await;
        let before = data.games.len();
        data.games.retain(|game| game.id != id);
        if data.games.len() == before {
            return Err(ClientError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn increment_download(&self, id: &str) -> Result<(), ClientError> {
        let mut data = self.inner.lock().await;
        let record = data.find_mut(id)?;
        record.clicks = record.clicks.saturating_add(1);
        let title = record.title.clone();
        data.activity.record(&title);
        Ok(())
    }

    async fn stats(&self) -> Result<StatsSummary, ClientError> {
        let data = self.inner.lock().await;
        Ok(aggregate_with_activity(&data.games, &data.activity))
    }
}

/// The six sample games shipped with the catalog.
pub fn fixture_games() -> Vec<GameRecord> {
    vec![
        fixture(
            "1",
            "Cyberpunk 2077",
            "An open-world action RPG set in Night City, a megalopolis obsessed with power, glamour and body modification.",
            "https://images.unsplash.com/photo-1542751371-adc38448a05e?w=800&h=600&fit=crop",
            "https://example.com/cyberpunk2077",
            Category::Rpg,
            1547,
            utc(2024, 1, 15, 10, 30),
        ),
        fixture(
            "2",
            "The Witcher 3: Wild Hunt",
            "An epic open-world fantasy RPG where you play Geralt of Rivia, a monster hunter searching for his adopted daughter.",
            "https://images.unsplash.com/photo-1518709268805-4e9042af2176?w=800&h=600&fit=crop",
            "https://example.com/witcher3",
            Category::Rpg,
            2341,
            utc(2024, 1, 20, 14, 15),
        ),
        fixture(
            "3",
            "Grand Theft Auto V",
            "Open-world action adventure set in Los Santos, a fictional city based on Los Angeles.",
            "https://images.unsplash.com/photo-1493711662062-fa541adb3fc8?w=800&h=600&fit=crop",
            "https://example.com/gtav",
            Category::Action,
            3892,
            utc(2024, 1, 25, 9, 45),
        ),
        fixture(
            "4",
            "Counter-Strike 2",
            "The newest chapter of CS, rebuilt on Source 2 with improved graphics and refined mechanics.",
            "https://images.unsplash.com/photo-1542751371-adc38448a05e?w=800&h=600&fit=crop",
            "https://example.com/cs2",
            Category::Fps,
            5673,
            utc(2024, 2, 1, 16, 20),
        ),
        fixture(
            "5",
            "Red Dead Redemption 2",
            "An open-world western epic about outlaws fighting to survive in the heart of America.",
            "https://images.unsplash.com/photo-1511512578047-dfb367046420?w=800&h=600&fit=crop",
            "https://example.com/rdr2",
            Category::Adventure,
            2156,
            utc(2024, 2, 5, 11, 10),
        ),
        fixture(
            "6",
            "Elden Ring",
            "A dark fantasy action RPG from FromSoftware and George R.R. Martin.",
            "https://images.unsplash.com/photo-1538481199464-7160b8f4df9b?w=800&h=600&fit=crop",
            "https://example.com/eldenring",
            Category::Rpg,
            4321,
            utc(2024, 2, 10, 13, 30),
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn fixture(
    id: &str,
    title: &str,
    description: &str,
    image: &str,
    download_link: &str,
    category: Category,
    clicks: u64,
    date_added: DateTime<Utc>,
) -> GameRecord {
    GameRecord {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        image: image.to_string(),
        download_link: download_link.to_string(),
        category,
        clicks,
        date_added,
    }
}

fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}
