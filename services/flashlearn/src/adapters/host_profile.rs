//! services/flashlearn/src/adapters/host_profile.rs
//!
//! A file-backed stand-in for the embedding host. It implements the `ProfileService`
//! port on top of a directory laid out as:
//!
//! ```text
//! {host_dir}/
//! ├── profile.json      # the player's UserProfile (optional)
//! ├── properties.json   # key/value profile properties
//! └── events.jsonl      # append-only analytics log
//! ```

use async_trait::async_trait;
use chrono::Utc;
use flashlearn_core::domain::UserProfile;
use flashlearn_core::ports::{PortError, PortResult, ProfileService};
use serde_json::{json, Map, Value};
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::info;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

pub struct FileHostProfile {
    dir: PathBuf,
    /// Serializes read-modify-write cycles on `properties.json`.
    properties_lock: Mutex<()>,
}

impl FileHostProfile {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            properties_lock: Mutex::new(()),
        }
    }

    fn profile_path(&self) -> PathBuf {
        self.dir.join("profile.json")
    }

    fn properties_path(&self) -> PathBuf {
        self.dir.join("properties.json")
    }

    fn events_path(&self) -> PathBuf {
        self.dir.join("events.jsonl")
    }

    async fn read_properties(&self) -> PortResult<Map<String, Value>> {
        match tokio::fs::read_to_string(self.properties_path()).await {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(PortError::Unavailable(e.to_string())),
        }
    }
}

//=========================================================================================
// `ProfileService` Trait Implementation
//=========================================================================================

#[async_trait]
impl ProfileService for FileHostProfile {
    async fn ready(&self, activity_id: &str) -> PortResult<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| PortError::Unavailable(format!("{}: {}", self.dir.display(), e)))?;
        info!(
            "Host profile directory {} attached to activity '{}'.",
            self.dir.display(),
            activity_id
        );
        Ok(())
    }

    async fn fetch_profile(&self) -> PortResult<UserProfile> {
        match tokio::fs::read_to_string(self.profile_path()).await {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(PortError::NotFound("player profile".to_string()))
            }
            Err(e) => Err(PortError::Unavailable(e.to_string())),
        }
    }

    async fn get_property(&self, key: &str) -> PortResult<Option<Value>> {
        let _guard = self.properties_lock.lock().await;
        Ok(self.read_properties().await?.remove(key))
    }

    async fn set_property(&self, key: &str, value: Value) -> PortResult<()> {
        let _guard = self.properties_lock.lock().await;
        let mut properties = self.read_properties().await?;
        properties.insert(key.to_string(), value);

        let serialized = serde_json::to_string_pretty(&Value::Object(properties))?;
        tokio::fs::write(self.properties_path(), serialized)
            .await
            .map_err(|e| PortError::Unavailable(e.to_string()))?;
        Ok(())
    }

    async fn track_event(&self, event_name: &str, payload: Value) -> PortResult<()> {
        let line = json!({
            "event": event_name,
            "payload": payload,
            "recordedAt": Utc::now(),
        });

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.events_path())
            .await
            .map_err(|e| PortError::Unavailable(e.to_string()))?;
        file.write_all(format!("{}\n", line).as_bytes())
            .await
            .map_err(|e| PortError::Unavailable(e.to_string()))?;
        Ok(())
    }
}
