use crate::errors::ClientError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Game categories. The serialized labels are the values the backend stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "RPG")]
    Rpg,
    #[serde(rename = "Ação")]
    Action,
    #[serde(rename = "FPS")]
    Fps,
    #[serde(rename = "Aventura")]
    Adventure,
    #[serde(rename = "Estratégia")]
    Strategy,
    #[serde(rename = "Esporte")]
    Sports,
    #[serde(rename = "Corrida")]
    Racing,
    #[serde(rename = "Simulação")]
    Simulation,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Rpg,
        Category::Action,
        Category::Fps,
        Category::Adventure,
        Category::Strategy,
        Category::Sports,
        Category::Racing,
        Category::Simulation,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Rpg => "RPG",
            Category::Action => "Ação",
            Category::Fps => "FPS",
            Category::Adventure => "Aventura",
            Category::Strategy => "Estratégia",
            Category::Sports => "Esporte",
            Category::Racing => "Corrida",
            Category::Simulation => "Simulação",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = ClientError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        Category::ALL
            .into_iter()
            .find(|category| category.label() == value)
            .ok_or_else(|| ClientError::Validation(format!("unknown category '{value}'")))
    }
}

/// The category selector of the catalog page: everything, or one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub const ALL_LABEL: &'static str = "All";

    pub fn label(self) -> &'static str {
        match self {
            CategoryFilter::All => Self::ALL_LABEL,
            CategoryFilter::Only(category) => category.label(),
        }
    }

    /// Every selectable option, `All` first.
    pub fn options() -> impl Iterator<Item = CategoryFilter> {
        std::iter::once(CategoryFilter::All).chain(Category::ALL.into_iter().map(CategoryFilter::Only))
    }
}

impl FromStr for CategoryFilter {
    type Err = ClientError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "" | "All" | "Todos" => Ok(CategoryFilter::All),
            other => other.parse().map(CategoryFilter::Only),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image: String,
    pub download_link: String,
    pub category: Category,
    #[serde(default)]
    pub clicks: u64,
    #[serde(with = "timestamp")]
    pub date_added: DateTime<Utc>,
}

/// Fields of a new record; id, clicks and date are assigned on creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDraft {
    pub title: String,
    pub description: String,
    pub image: String,
    pub download_link: String,
    pub category: Category,
}

impl GameDraft {
    pub fn validate(&self) -> Result<(), ClientError> {
        require_text("title", &self.title)?;
        require_text("description", &self.description)?;
        require_url("image", &self.image)?;
        require_url("downloadLink", &self.download_link)?;
        Ok(())
    }

    /// Trimmed copy of the draft, with links in their parsed form.
    pub fn normalized(&self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            image: canonical_url(&self.image),
            download_link: canonical_url(&self.download_link),
            category: self.category,
        }
    }

    pub fn into_record(self, id: String, date_added: DateTime<Utc>) -> GameRecord {
        GameRecord {
            id,
            title: self.title,
            description: self.description,
            image: self.image,
            download_link: self.download_link,
            category: self.category,
            clicks: 0,
            date_added,
        }
    }
}

/// Partial update. `clicks` and `dateAdded` are not patchable.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GamePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

impl GamePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.image.is_none()
            && self.download_link.is_none()
            && self.category.is_none()
    }

    /// Same canonical link form as [`GameDraft::normalized`].
    pub fn normalized(&self) -> Self {
        Self {
            title: self.title.as_deref().map(|title| title.trim().to_string()),
            description: self.description.as_deref().map(|text| text.trim().to_string()),
            image: self.image.as_deref().map(canonical_url),
            download_link: self.download_link.as_deref().map(canonical_url),
            category: self.category,
        }
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if let Some(title) = &self.title {
            require_text("title", title)?;
        }
        if let Some(description) = &self.description {
            require_text("description", description)?;
        }
        if let Some(image) = &self.image {
            require_url("image", image)?;
        }
        if let Some(link) = &self.download_link {
            require_url("downloadLink", link)?;
        }
        Ok(())
    }

    pub fn apply_to(&self, record: &mut GameRecord) {
        if let Some(title) = &self.title {
            record.title = title.clone();
        }
        if let Some(description) = &self.description {
            record.description = description.clone();
        }
        if let Some(image) = &self.image {
            record.image = image.clone();
        }
        if let Some(link) = &self.download_link {
            record.download_link = link.clone();
        }
        if let Some(category) = self.category {
            record.category = category;
        }
    }
}

impl GameRecord {
    /// The download link, if a browser can be redirected to it.
    pub fn navigable_link(&self) -> Result<&str, ClientError> {
        if self.download_link.chars().any(char::is_control) {
            return Err(ClientError::Validation(format!(
                "download link of {} contains control characters",
                self.title
            )));
        }
        require_url("downloadLink", &self.download_link)?;
        Ok(self.download_link.trim())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopGame {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub clicks: u64,
}

impl TopGame {
    pub const NONE_TITLE: &'static str = "N/A";

    /// Placeholder reported for an empty catalog.
    pub fn sentinel() -> Self {
        Self {
            id: None,
            title: Self::NONE_TITLE.to_string(),
            clicks: 0,
        }
    }
}

impl From<&GameRecord> for TopGame {
    fn from(record: &GameRecord) -> Self {
        Self {
            id: Some(record.id.clone()),
            title: record.title.clone(),
            clicks: record.clicks,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    #[serde(rename = "game", alias = "gameTitle")]
    pub game_title: String,
    #[serde(rename = "clicks", alias = "clicksDelta")]
    pub clicks_delta: u64,
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub total_games: u64,
    pub total_downloads: u64,
    pub top_game: TopGame,
    #[serde(default)]
    pub recent_activity: Vec<ActivityEntry>,
}

impl Default for StatsSummary {
    fn default() -> Self {
        Self {
            total_games: 0,
            total_downloads: 0,
            top_game: TopGame::sentinel(),
            recent_activity: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadResponse {
    pub id: String,
    pub clicks: u64,
    pub download_link: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub admin: bool,
}

fn require_text(field: &str, value: &str) -> Result<(), ClientError> {
    if value.trim().is_empty() {
        return Err(ClientError::Validation(format!("{field} is required")));
    }
    Ok(())
}

fn require_url(field: &str, value: &str) -> Result<(), ClientError> {
    require_text(field, value)?;
    let parsed = url::Url::parse(value.trim())
        .map_err(|err| ClientError::Validation(format!("{field} is not a valid URL: {err}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(ClientError::Validation(format!(
            "{field} must use http or https, not {scheme}"
        ))),
    }
}

/// `value` as the URL parser serializes it, with tabs and newlines removed.
/// Unparsable input is kept trimmed for `validate` to reject.
fn canonical_url(value: &str) -> String {
    let value = value.trim();
    url::Url::parse(value)
        .map(String::from)
        .unwrap_or_else(|_| value.to_string())
}

/// Timestamps are written as RFC 3339. On read, offset-less ISO-8601 values
/// (what the backend emits) are taken as UTC.
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp '{raw}'")))
    }

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(value) = DateTime::parse_from_rfc3339(raw) {
            return Some(value.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }
}
