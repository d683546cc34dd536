//! crates/flashlearn_core/src/gateway.rs
//!
//! The handle every component uses to reach the host profile service.
//!
//! The gateway is either `Uninitialized` (no host, or the handshake failed) or
//! `Ready` with a live service. Callers match on it once here instead of checking a
//! nullable global before every call.

use chrono::Utc;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::{UserProfile, UserStudySets};
use crate::ports::{PortError, PortResult, ProfileService};

/// Profile property holding the mirrored study set collection.
pub const USER_STUDY_SETS_KEY: &str = "userStudySets";
/// Analytics event emitted whenever a quest configuration is consumed.
pub const CONFIG_CHANGED_EVENT: &str = "quest:configChanged";
/// Analytics event carrying the completion report of a study session.
pub const ACTIVITY_ENDED_EVENT: &str = "event:activityEnded";

#[derive(Clone, Default)]
pub enum ProfileGateway {
    #[default]
    Uninitialized,
    Ready(Arc<dyn ProfileService>),
}

impl fmt::Debug for ProfileGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileGateway::Uninitialized => f.write_str("ProfileGateway::Uninitialized"),
            ProfileGateway::Ready(_) => f.write_str("ProfileGateway::Ready"),
        }
    }
}

impl ProfileGateway {
    /// Performs the host handshake once. Any failure leaves the gateway uninitialized.
    pub async fn connect(activity_id: &str, service: Option<Arc<dyn ProfileService>>) -> Self {
        let Some(service) = service else {
            info!("No profile service configured; running local-only.");
            return ProfileGateway::Uninitialized;
        };

        match service.ready(activity_id).await {
            Ok(()) => {
                info!("Profile service ready for activity '{}'.", activity_id);
                ProfileGateway::Ready(service)
            }
            Err(e) => {
                warn!("Profile service handshake failed, running local-only: {}", e);
                ProfileGateway::Uninitialized
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ProfileGateway::Ready(_))
    }

    pub async fn fetch_profile(&self) -> PortResult<UserProfile> {
        match self {
            ProfileGateway::Ready(service) => service.fetch_profile().await,
            ProfileGateway::Uninitialized => Err(not_initialized()),
        }
    }

    /// The host profile, or a generated anonymous identity on any failure.
    pub async fn player_profile(&self) -> UserProfile {
        match self.fetch_profile().await {
            Ok(profile) => profile,
            Err(e) => {
                warn!("Falling back to anonymous profile: {}", e);
                UserProfile::anonymous(Utc::now())
            }
        }
    }

    pub async fn get_property(&self, key: &str) -> PortResult<Option<Value>> {
        match self {
            ProfileGateway::Ready(service) => service.get_property(key).await,
            ProfileGateway::Uninitialized => Err(not_initialized()),
        }
    }

    /// Returns whether the host accepted the value. Failures are logged, never raised.
    pub async fn set_property(&self, key: &str, value: Value) -> bool {
        match self {
            ProfileGateway::Ready(service) => match service.set_property(key, value).await {
                Ok(()) => true,
                Err(e) => {
                    warn!("Failed to save profile property '{}': {}", key, e);
                    false
                }
            },
            ProfileGateway::Uninitialized => {
                debug!("Skipping profile property '{}': gateway uninitialized.", key);
                false
            }
        }
    }

    /// Fire-and-forget from the caller's point of view: errors are swallowed.
    pub async fn track_event(&self, event_name: &str, payload: Value) {
        match self {
            ProfileGateway::Ready(service) => {
                if let Err(e) = service.track_event(event_name, payload).await {
                    warn!("Failed to track event '{}': {}", event_name, e);
                }
            }
            ProfileGateway::Uninitialized => {
                debug!("Dropping event '{}': gateway uninitialized.", event_name);
            }
        }
    }

    /// Reads the mirrored collection. A present but malformed value is an error.
    pub async fn user_study_sets(&self) -> PortResult<Option<UserStudySets>> {
        match self.get_property(USER_STUDY_SETS_KEY).await? {
            Some(Value::Null) | None => Ok(None),
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
        }
    }

    pub async fn save_user_study_sets(&self, sets: &UserStudySets) -> bool {
        match serde_json::to_value(sets) {
            Ok(value) => self.set_property(USER_STUDY_SETS_KEY, value).await,
            Err(e) => {
                warn!("Failed to serialize study set mirror: {}", e);
                false
            }
        }
    }
}

fn not_initialized() -> PortError {
    PortError::Unavailable("profile service not initialized".to_string())
}
