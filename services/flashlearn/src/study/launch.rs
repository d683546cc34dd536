//! services/flashlearn/src/study/launch.rs
//!
//! Turns the URL an embedding host opens the app with into a route plus the
//! navigation context a study session is started from.

use chrono::{DateTime, Utc};
use flashlearn_core::domain::QuestConfig;
use tracing::{info, warn};
use url::{ParseError, Url};

/// Prefix of study ids that denote an ephemeral, host-configured session.
pub const EPHEMERAL_PREFIX: &str = "quest-";
/// Query parameter carrying the URL-encoded quest configuration.
pub const CONFIG_PARAM: &str = "config";
/// Base that bare launch paths are resolved against.
const LAUNCH_BASE: &str = "http://localhost/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    Create,
    Study(String),
    NotFound(String),
}

impl Route {
    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Route::Dashboard,
            "/create" => Route::Create,
            _ => match trimmed.strip_prefix("/study/") {
                Some(id) if !id.is_empty() && !id.contains('/') => {
                    let id = urlencoding::decode(id)
                        .map(|decoded| decoded.into_owned())
                        .unwrap_or_else(|_| id.to_string());
                    Route::Study(id)
                }
                _ => Route::NotFound(path.to_string()),
            },
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Dashboard => "/".to_string(),
            Route::Create => "/create".to_string(),
            Route::Study(id) => format!("/study/{}", urlencoding::encode(id)),
            Route::NotFound(path) => path.clone(),
        }
    }
}

/// In-process state carried along with a navigation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavigationContext {
    pub quest_config: Option<QuestConfig>,
}

impl NavigationContext {
    pub fn with_config(config: QuestConfig) -> Self {
        Self {
            quest_config: Some(config),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Navigation {
    pub route: Route,
    pub context: NavigationContext,
}

pub fn is_ephemeral_target(id: &str) -> bool {
    id.starts_with(EPHEMERAL_PREFIX)
}

/// Parses an absolute launch URL, or a bare `/path?query` resolved against a local base.
fn parse_launch_url(raw: &str) -> Option<Url> {
    let parsed = match Url::parse(raw) {
        Err(ParseError::RelativeUrlWithoutBase) => {
            Url::parse(LAUNCH_BASE).and_then(|base| base.join(raw))
        }
        parsed => parsed,
    };
    match parsed {
        Ok(url) => Some(url),
        Err(e) => {
            warn!("Ignoring unparseable launch URL '{}': {}", raw, e);
            None
        }
    }
}

/// Returns the first value of query parameter `name`, form-decoded.
pub fn query_param(url: &str, name: &str) -> Option<String> {
    first_query_value(&parse_launch_url(url)?, name)
}

fn first_query_value(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// Parses the `config` query parameter. Malformed payloads are logged and ignored.
pub fn config_from_url(url: &str) -> Option<QuestConfig> {
    parse_launch_url(url).and_then(|url| quest_config_param(&url))
}

/// Hosts sometimes encode the JSON twice, so a failed parse is retried after one more
/// round of percent-decoding.
fn quest_config_param(url: &Url) -> Option<QuestConfig> {
    let raw = first_query_value(url, CONFIG_PARAM)?;

    let first_error = match serde_json::from_str::<QuestConfig>(&raw) {
        Ok(config) => return Some(config),
        Err(e) => e,
    };

    let parsed = urlencoding::decode(&raw)
        .ok()
        .and_then(|decoded| serde_json::from_str::<QuestConfig>(&decoded).ok());
    if parsed.is_none() {
        warn!("Invalid config parameter, ignoring it: {}", first_error);
    }
    parsed
}

/// Resolves where the app should open.
///
/// A quest configuration on any non-study route redirects to a fresh ephemeral study
/// id. On a study route the configuration is attached to that route instead.
pub fn resolve_launch(raw: &str, now: DateTime<Utc>) -> Navigation {
    let Some(url) = parse_launch_url(raw) else {
        return Navigation {
            route: Route::NotFound(raw.to_string()),
            context: NavigationContext::default(),
        };
    };
    let route = Route::parse(url.path());

    match quest_config_param(&url) {
        Some(config) if !matches!(route, Route::Study(_)) => {
            let temp_id = format!("{}{}", EPHEMERAL_PREFIX, now.timestamp_millis());
            info!("Quest config detected in launch URL; opening study set {}.", temp_id);
            Navigation {
                route: Route::Study(temp_id),
                context: NavigationContext::with_config(config),
            }
        }
        config => Navigation {
            route,
            context: NavigationContext {
                quest_config: config,
            },
        },
    }
}
