//! Shared fakes for the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use flashlearn_core::domain::UserProfile;
use flashlearn_core::ports::{LocalCache, PortError, PortResult, ProfileService};
use flashlearn_core::ProfileGateway;
use flashlearn_lib::adapters::MemoryCache;
use flashlearn_lib::study::{Analytics, StudySetStore};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

//=========================================================================================
// Recording Profile Service
//=========================================================================================

/// An in-memory host that records every call and can be told to fail.
#[derive(Default)]
pub struct RecordingHost {
    pub properties: Mutex<HashMap<String, Value>>,
    pub events: Mutex<Vec<(String, Value)>>,
    pub get_calls: AtomicUsize,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
    /// Holds the next property write back for a moment before applying it.
    pub slow_next_write: AtomicBool,
}

impl RecordingHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_property(key: &str, value: Value) -> Arc<Self> {
        let host = Self::default();
        host.properties
            .lock()
            .unwrap()
            .insert(key.to_string(), value);
        Arc::new(host)
    }

    pub fn property(&self, key: &str) -> Option<Value> {
        self.properties.lock().unwrap().get(key).cloned()
    }

    pub fn events_named(&self, name: &str) -> Vec<Value> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(event, _)| event == name)
            .map(|(_, payload)| payload.clone())
            .collect()
    }
}

#[async_trait]
impl ProfileService for RecordingHost {
    async fn ready(&self, _activity_id: &str) -> PortResult<()> {
        Ok(())
    }

    async fn fetch_profile(&self) -> PortResult<UserProfile> {
        Ok(UserProfile {
            id: "player-1".to_string(),
            name: Some("Player".to_string()),
            avatar: None,
            anonymous: false,
            verified: Some(true),
        })
    }

    async fn get_property(&self, key: &str) -> PortResult<Option<Value>> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(PortError::Unavailable("host unreachable".to_string()));
        }
        Ok(self.property(key))
    }

    async fn set_property(&self, key: &str, value: Value) -> PortResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PortError::Unavailable("host unreachable".to_string()));
        }
        if self.slow_next_write.swap(false, Ordering::SeqCst) {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        }
        self.properties
            .lock()
            .unwrap()
            .insert(key.to_string(), value);
        Ok(())
    }

    async fn track_event(&self, event_name: &str, payload: Value) -> PortResult<()> {
        self.events
            .lock()
            .unwrap()
            .push((event_name.to_string(), payload));
        Ok(())
    }
}

//=========================================================================================
// Counting Cache
//=========================================================================================

/// A `MemoryCache` that counts writes and can refuse them.
#[derive(Default)]
pub struct CountingCache {
    inner: MemoryCache,
    pub writes: AtomicUsize,
    pub fail_writes: AtomicBool,
}

impl CountingCache {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_entry(key: &str, value: &str) -> Arc<Self> {
        Arc::new(Self {
            inner: MemoryCache::with_entry(key, value),
            ..Self::default()
        })
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocalCache for CountingCache {
    async fn read(&self, key: &str) -> PortResult<Option<String>> {
        self.inner.read(key).await
    }

    async fn write(&self, key: &str, value: &str) -> PortResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PortError::Unexpected("disk full".to_string()));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.write(key, value).await
    }
}

//=========================================================================================
// Helpers
//=========================================================================================

pub fn store_with(cache: Arc<CountingCache>, host: Option<Arc<RecordingHost>>) -> StudySetStore {
    let gateway = match host {
        Some(host) => ProfileGateway::Ready(host),
        None => ProfileGateway::Uninitialized,
    };
    StudySetStore::new(cache, Analytics::new(gateway))
}

/// Lets fire-and-forget tasks spawned on the test runtime run to completion.
pub async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}
