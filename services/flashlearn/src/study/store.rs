//! services/flashlearn/src/study/store.rs
//!
//! The canonical in-memory collection of study sets.
//!
//! On load the store reconciles two backends: the local cache wins whenever it holds
//! anything, the profile service mirror is consulted only when the cache is empty, and a
//! built-in sample collection covers the case where both come up empty. Every mutation is
//! written to the cache first and then mirrored to the profile service in the background.

use chrono::Utc;
use flashlearn_core::domain::{Flashcard, NewStudySet, QuestConfig, StudySet, UserStudySets};
use flashlearn_core::ports::LocalCache;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::study::analytics::Analytics;
use crate::study::samples::sample_study_sets;

/// Local cache key holding the JSON-serialized collection.
pub const STORAGE_KEY: &str = "flashlearn_study_sets";
/// Creator assigned to sets materialized from a quest configuration.
pub const QUESTED_CREATOR: &str = "Quested";
/// Creator assigned to sets adopted from the profile mirror.
pub const REMOTE_CREATOR: &str = "You";
const DEFAULT_QUEST_TITLE: &str = "Quested Study Set";

pub struct StudySetStore {
    cache: Arc<dyn LocalCache>,
    analytics: Analytics,
    study_sets: Vec<StudySet>,
    loaded: bool,
    /// Last millisecond stamp handed out, so ids stay unique within one millisecond.
    last_stamp: i64,
    /// Sequence number of the newest mirror snapshot handed to the background.
    mirror_seq: u64,
    /// Sequence number of the newest snapshot already sent to the profile service.
    mirrored_seq: Arc<Mutex<u64>>,
}

impl StudySetStore {
    pub fn new(cache: Arc<dyn LocalCache>, analytics: Analytics) -> Self {
        Self {
            cache,
            analytics,
            study_sets: Vec::new(),
            loaded: false,
            last_stamp: 0,
            mirror_seq: 0,
            mirrored_seq: Arc::new(Mutex::new(0)),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn analytics(&self) -> &Analytics {
        &self.analytics
    }

    //=====================================================================================
    // Load Protocol
    //=====================================================================================

    /// Reconciles cache and profile mirror into the collection. Runs once; later calls
    /// return the current collection untouched.
    pub async fn load(&mut self) -> &[StudySet] {
        if self.loaded {
            return &self.study_sets;
        }

        let cached = self.read_local().await;
        if !cached.is_empty() {
            info!("Loaded {} study sets from the local cache.", cached.len());
            self.study_sets = cached;
            self.loaded = true;
            return &self.study_sets;
        }

        if let Some(remote) = self.fetch_remote().await {
            info!("Adopted {} study sets from the profile mirror.", remote.len());
            self.study_sets = remote;
            self.persist_local().await;
        }

        if self.study_sets.is_empty() {
            info!("No stored study sets found; seeding the sample collection.");
            self.study_sets = sample_study_sets();
            self.persist_local().await;
        }

        self.loaded = true;
        &self.study_sets
    }

    async fn read_local(&self) -> Vec<StudySet> {
        match self.cache.read(STORAGE_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<StudySet>>(&raw) {
                Ok(sets) => sets,
                Err(e) => {
                    warn!("Ignoring unreadable local cache contents: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to read the local cache: {}", e);
                Vec::new()
            }
        }
    }

    async fn fetch_remote(&self) -> Option<Vec<StudySet>> {
        match self.analytics.gateway().user_study_sets().await {
            Ok(Some(mirror)) if !mirror.is_empty() => {
                let today = Utc::now().date_naive();
                Some(
                    mirror
                        .sets
                        .into_iter()
                        .map(|(id, record)| record.into_study_set(&id, REMOTE_CREATOR, today))
                        .collect(),
                )
            }
            Ok(_) => {
                debug!("Profile mirror holds no study sets.");
                None
            }
            Err(e) => {
                warn!("Failed to fetch study sets from the profile service: {}", e);
                None
            }
        }
    }

    //=====================================================================================
    // Queries
    //=====================================================================================

    pub fn study_sets(&self) -> &[StudySet] {
        &self.study_sets
    }

    /// The first `limit` sets, as shown in the dashboard's recent tab.
    pub fn recent(&self, limit: usize) -> &[StudySet] {
        &self.study_sets[..limit.min(self.study_sets.len())]
    }

    pub fn get_study_set(&self, id: &str) -> Option<&StudySet> {
        self.study_sets.iter().find(|set| set.id == id)
    }

    fn contains(&self, id: &str) -> bool {
        self.get_study_set(id).is_some()
    }

    //=====================================================================================
    // Write Protocol
    //=====================================================================================

    /// Adds a user-authored set and returns its new id.
    pub async fn add_study_set(&mut self, new_set: NewStudySet) -> String {
        if let Some(config) = &new_set.quest_config {
            self.analytics.config_changed(config);
        }

        let id = self.fresh_id("set");
        let today = Utc::now().date_naive();
        let study_set = StudySet {
            id: id.clone(),
            title: new_set.title,
            description: new_set.description,
            cards: new_set.cards,
            creator: new_set.creator,
            created_at: today,
            updated_at: today,
            quest_config: new_set.quest_config,
            difficulty: new_set.difficulty,
            time_limit: new_set.time_limit,
        };

        self.commit(study_set).await;
        id
    }

    /// Materializes a quest configuration as a persisted set and returns its id.
    ///
    /// The requested id is used when free. If it is already taken, a stamped variant is
    /// appended instead so existing entries are never replaced.
    pub async fn create_from_quest_config(
        &mut self,
        config: QuestConfig,
        requested_id: Option<&str>,
    ) -> String {
        let stamp = self.next_stamp();
        let id = match requested_id {
            Some(id) if !self.contains(id) => id.to_string(),
            Some(id) => {
                warn!("Study set id '{}' already exists; storing under a new id.", id);
                self.fresh_id(id)
            }
            None => self.fresh_id("quest"),
        };

        let cards = config
            .cards
            .iter()
            .enumerate()
            .map(|(index, card)| Flashcard {
                id: format!("quest-card-{}-{}", index, stamp),
                term: card.term.clone(),
                definition: card.definition.clone(),
            })
            .collect();

        let today = Utc::now().date_naive();
        let study_set = StudySet {
            id: id.clone(),
            title: config
                .title
                .clone()
                .unwrap_or_else(|| DEFAULT_QUEST_TITLE.to_string()),
            description: config.description.clone().unwrap_or_default(),
            cards,
            creator: QUESTED_CREATOR.to_string(),
            created_at: today,
            updated_at: today,
            quest_config: Some(config.clone()),
            difficulty: config.difficulty,
            time_limit: config.time_limit,
        };

        self.analytics.config_changed(&config);
        self.commit(study_set).await;
        id
    }

    async fn commit(&mut self, study_set: StudySet) {
        self.study_sets.push(study_set);
        self.persist_local().await;
        self.mirror_remote();
    }

    async fn persist_local(&self) {
        let serialized = match serde_json::to_string(&self.study_sets) {
            Ok(serialized) => serialized,
            Err(e) => {
                error!("Failed to serialize study sets: {}", e);
                return;
            }
        };
        if let Err(e) = self.cache.write(STORAGE_KEY, &serialized).await {
            error!("Failed to write study sets to the local cache: {}", e);
        }
    }

    /// Best-effort background copy of the collection to the profile service.
    ///
    /// Snapshots are sent one at a time; a snapshot that is older than one already sent
    /// is dropped, so the mirror never moves backwards.
    fn mirror_remote(&mut self) {
        let gateway = self.analytics.gateway().clone();
        if !gateway.is_ready() {
            debug!("Profile service unavailable; skipping mirror.");
            return;
        }

        self.mirror_seq += 1;
        let seq = self.mirror_seq;
        let mirror = UserStudySets::from_sets(&self.study_sets);
        let mirrored_seq = self.mirrored_seq.clone();
        self.analytics.spawn(async move {
            let mut mirrored = mirrored_seq.lock().await;
            if *mirrored > seq {
                debug!("Skipping stale mirror snapshot {} (already sent {}).", seq, *mirrored);
                return;
            }
            if gateway.save_user_study_sets(&mirror).await {
                debug!("Mirrored {} study sets to the profile service.", mirror.sets.len());
            }
            *mirrored = seq;
        });
    }

    //=====================================================================================
    // Id Generation
    //=====================================================================================

    fn next_stamp(&mut self) -> i64 {
        let now = Utc::now().timestamp_millis();
        self.last_stamp = now.max(self.last_stamp + 1);
        self.last_stamp
    }

    /// `{prefix}-{stamp}`, bumping the stamp until the id is unused.
    fn fresh_id(&mut self, prefix: &str) -> String {
        loop {
            let id = format!("{}-{}", prefix, self.next_stamp());
            if !self.contains(&id) {
                return id;
            }
        }
    }
}
