//! The user's stated interests, as read by the relevance filter.
//!
//! Absent or `null` fields read as empty; a store with nothing saved yields
//! the default profile rather than an error.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    #[serde(deserialize_with = "null_as_default")]
    pub occupation: String,
    #[serde(deserialize_with = "null_as_default")]
    pub current_work: String,
    #[serde(deserialize_with = "null_as_default")]
    pub topics: Vec<String>,
}

impl UserProfile {
    pub fn is_empty(&self) -> bool {
        self.occupation.trim().is_empty()
            && self.current_work.trim().is_empty()
            && self.topics.iter().all(|t| t.trim().is_empty())
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Error, Debug)]
pub enum PreferenceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed preferences: {0}")]
    Json(#[from] serde_json::Error),
}

#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn load(&self) -> Result<UserProfile, PreferenceError>;
    async fn save(&self, profile: &UserProfile) -> Result<(), PreferenceError>;
}

/// Preferences kept as a JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFilePreferenceStore {
    path: PathBuf,
}

impl JsonFilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PreferenceStore for JsonFilePreferenceStore {
    async fn load(&self) -> Result<UserProfile, PreferenceError> {
        let json = match tokio::fs::read_to_string(&self.path).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No preferences saved, using defaults");
                return Ok(UserProfile::default());
            }
            Err(e) => return Err(e.into()),
        };

        if json.trim().is_empty() || json.trim() == "null" {
            return Ok(UserProfile::default());
        }
        Ok(serde_json::from_str(&json)?)
    }

    async fn save(&self, profile: &UserProfile) -> Result<(), PreferenceError> {
        let json = serde_json::to_string_pretty(profile)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}

/// In-process store, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    profile: RwLock<Option<UserProfile>>,
}

impl MemoryPreferenceStore {
    pub fn new(profile: UserProfile) -> Self {
        Self {
            profile: RwLock::new(Some(profile)),
        }
    }
}

#[async_trait]
impl PreferenceStore for MemoryPreferenceStore {
    async fn load(&self) -> Result<UserProfile, PreferenceError> {
        Ok(self.profile.read().await.clone().unwrap_or_default())
    }

    async fn save(&self, profile: &UserProfile) -> Result<(), PreferenceError> {
        *self.profile.write().await = Some(profile.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("letterbox-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_missing_and_null_fields_are_empty() {
        let profile: UserProfile =
            serde_json::from_str(r#"{"occupation": null, "topics": ["rust", "ai"]}"#).unwrap();
        assert_eq!(profile.occupation, "");
        assert_eq!(profile.current_work, "");
        assert_eq!(profile.topics, vec!["rust", "ai"]);

        let profile: UserProfile = serde_json::from_str(r#"{"topics": null}"#).unwrap();
        assert!(profile.is_empty());
    }

    #[test]
    fn test_camel_case_fields() {
        let profile = UserProfile {
            occupation: "Engineer".to_string(),
            current_work: "Search ranking".to_string(),
            topics: vec![],
        };
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["currentWork"], "Search ranking");
    }

    #[tokio::test]
    async fn test_file_store_roundtrip() {
        let path = temp_path("roundtrip.json");
        let store = JsonFilePreferenceStore::new(&path);
        let profile = UserProfile {
            occupation: "Analyst".to_string(),
            current_work: "Chip supply chains".to_string(),
            topics: vec!["semiconductors".to_string()],
        };

        store.save(&profile).await.unwrap();
        assert_eq!(store.load().await.unwrap(), profile);

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_file_store_missing_file_is_default() {
        let store = JsonFilePreferenceStore::new(temp_path("does-not-exist.json"));
        assert_eq!(store.load().await.unwrap(), UserProfile::default());
    }

    #[tokio::test]
    async fn test_file_store_malformed_json() {
        let path = temp_path("malformed.json");
        tokio::fs::write(&path, "{not json").await.unwrap();

        let result = JsonFilePreferenceStore::new(&path).load().await;
        assert!(matches!(result, Err(PreferenceError::Json(_))));

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryPreferenceStore::default();
        assert!(store.load().await.unwrap().is_empty());

        let profile = UserProfile {
            topics: vec!["climate".to_string()],
            ..Default::default()
        };
        store.save(&profile).await.unwrap();
        assert_eq!(store.load().await.unwrap(), profile);
    }
}
