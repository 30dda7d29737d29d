use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{debug, warn};

use crate::engine::tracker::{StreakTracker, TrackerEvent};
use crate::store::schema::{HistoryData, ProfileData, SCHEMA_VERSION};

const PROFILE_FILE: &str = "profile.json";
const HISTORY_FILE: &str = "history.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("schema version {found} in {} (expected {expected})", path.display())]
    StaleSchema {
        path: PathBuf,
        found: u32,
        expected: u32,
    },
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    /// `<data dir>/streakr`, or `./streakr` when the platform has none.
    pub fn default_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("streakr")
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self, StoreError> {
        fs::create_dir_all(&base_dir).map_err(io_err(&base_dir))?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    /// Missing files load as `T::default()`.
    fn load<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T, StoreError> {
        let path = self.file_path(name);
        if !path.exists() {
            return Ok(T::default());
        }
        let content = fs::read_to_string(&path).map_err(io_err(&path))?;
        serde_json::from_str(&content).map_err(|source| StoreError::Json { path, source })
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<(), StoreError> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        let mut file = fs::File::create(&tmp_path).map_err(io_err(&tmp_path))?;
        file.write_all(json.as_bytes()).map_err(io_err(&tmp_path))?;
        file.sync_all().map_err(io_err(&tmp_path))?;

        fs::rename(&tmp_path, &path).map_err(io_err(&path))?;
        Ok(())
    }

    pub fn load_profile(&self) -> Result<ProfileData, StoreError> {
        let profile: ProfileData = self.load(PROFILE_FILE)?;
        if profile.needs_reset() {
            return Err(StoreError::StaleSchema {
                path: self.file_path(PROFILE_FILE),
                found: profile.schema_version,
                expected: SCHEMA_VERSION,
            });
        }
        Ok(profile)
    }

    pub fn save_profile(&self, data: &ProfileData) -> Result<(), StoreError> {
        self.save(PROFILE_FILE, data)
    }

    pub fn load_history(&self) -> Result<HistoryData, StoreError> {
        self.load(HISTORY_FILE)
    }

    pub fn save_history(&self, data: &HistoryData) -> Result<(), StoreError> {
        self.save(HISTORY_FILE, data)
    }

    /// Load counters and history, recovering what can be recovered.
    ///
    /// An unreadable history is dropped. When there is history, it wins over
    /// the profile: an unreadable, stale, or lagging profile is replaced by
    /// the replayed counters.
    pub fn load_state(&self) -> (StreakTracker, Vec<TrackerEvent>) {
        let events = match self.load_history() {
            Ok(history) => history.events,
            Err(e) => {
                warn!(error = %e, "discarding unreadable history");
                Vec::new()
            }
        };

        let tracker = match self.load_profile() {
            Ok(profile) if events.is_empty() => {
                let mut tracker = profile.tracker;
                tracker.normalize();
                tracker
            }
            Ok(profile) => {
                let replayed = StreakTracker::replay(&events);
                if profile.tracker != replayed {
                    warn!(
                        saved = ?profile.tracker,
                        ?replayed,
                        "profile out of step with history, using replay"
                    );
                }
                replayed
            }
            Err(e) => {
                warn!(error = %e, events = events.len(), "rebuilding profile from history");
                StreakTracker::replay(&events)
            }
        };

        debug!(?tracker, events = events.len(), "loaded state");
        (tracker, events)
    }

    pub fn save_state(
        &self,
        tracker: &StreakTracker,
        events: &[TrackerEvent],
    ) -> Result<(), StoreError> {
        self.save_history(&HistoryData {
            schema_version: SCHEMA_VERSION,
            events: events.to_vec(),
        })?;
        self.save_profile(&ProfileData::new(*tracker))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tracker::EventKind;
    use chrono::{NaiveDate, Utc};
    use tempfile::TempDir;

    fn make_test_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    fn log_event() -> TrackerEvent {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        TrackerEvent::new(EventKind::Log, Utc::now(), date)
    }

    #[test]
    fn test_empty_store_loads_defaults() {
        let (_dir, store) = make_test_store();
        let (tracker, events) = store.load_state();
        assert_eq!(tracker, StreakTracker::default());
        assert!(events.is_empty());
    }

    #[test]
    fn test_profile_file_layout() {
        let (_dir, store) = make_test_store();
        let tracker = StreakTracker {
            streak_days: 4,
            best_streak: 9,
            total_days_logged: 20,
        };
        store.save_profile(&ProfileData::new(tracker)).unwrap();

        let raw = fs::read_to_string(store.file_path(PROFILE_FILE)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["schema_version"], 1);
        assert_eq!(value["streak_days"], 4);
        assert_eq!(value["best_streak"], 9);
        assert_eq!(value["total_days_logged"], 20);
    }

    #[test]
    fn test_save_leaves_no_tmp_files() {
        let (dir, store) = make_test_store();
        store
            .save_state(&StreakTracker::default(), &[log_event()])
            .unwrap();
        let tmp_files: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("tmp"))
            .collect();
        assert!(tmp_files.is_empty(), "no residual .tmp files");
    }

    #[test]
    fn test_corrupt_profile_rebuilds_from_history() {
        let (_dir, store) = make_test_store();
        let events = vec![log_event(), log_event(), log_event()];
        store
            .save_state(&StreakTracker::default(), &events)
            .unwrap();
        fs::write(store.file_path(PROFILE_FILE), "{ not json").unwrap();

        assert!(matches!(store.load_profile(), Err(StoreError::Json { .. })));
        let (tracker, loaded) = store.load_state();
        assert_eq!(loaded.len(), 3);
        assert_eq!(tracker.streak_days, 3);
        assert_eq!(tracker.total_days_logged, 3);
    }

    #[test]
    fn test_stale_schema_is_rejected() {
        let (_dir, store) = make_test_store();
        fs::write(
            store.file_path(PROFILE_FILE),
            r#"{"schema_version": 0, "streak_days": 5, "best_streak": 5, "total_days_logged": 5}"#,
        )
        .unwrap();
        let err = store.load_profile().unwrap_err();
        assert!(matches!(err, StoreError::StaleSchema { found: 0, .. }));
        assert!(err.to_string().contains("expected 1"));

        // No history to replay, so everything starts over
        let (tracker, _) = store.load_state();
        assert_eq!(tracker, StreakTracker::default());
    }

    #[test]
    fn test_corrupt_history_is_dropped() {
        let (_dir, store) = make_test_store();
        let tracker = StreakTracker {
            streak_days: 2,
            best_streak: 2,
            total_days_logged: 2,
        };
        store.save_profile(&ProfileData::new(tracker)).unwrap();
        fs::write(store.file_path(HISTORY_FILE), "[[[").unwrap();

        let (loaded, events) = store.load_state();
        assert_eq!(loaded, tracker);
        assert!(events.is_empty());
    }

    #[test]
    fn test_lagging_profile_is_replaced_by_history() {
        let (_dir, store) = make_test_store();
        let mut events = vec![log_event()];
        store
            .save_state(&StreakTracker::replay(&events), &events)
            .unwrap();

        // History lands but the profile rename cannot
        let blocker = store.file_path("profile.tmp");
        fs::create_dir(&blocker).unwrap();
        events.push(TrackerEvent::new(
            EventKind::Log,
            Utc::now(),
            NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
        ));
        let result = store.save_state(&StreakTracker::replay(&events), &events);
        assert!(matches!(result, Err(StoreError::Io { .. })));
        fs::remove_dir(&blocker).unwrap();

        assert_eq!(store.load_profile().unwrap().tracker.total_days_logged, 1);

        let (tracker, loaded) = store.load_state();
        assert_eq!(loaded.len(), 2);
        assert_eq!(tracker, StreakTracker::replay(&events));
        assert_eq!(tracker.total_days_logged, 2);
    }

    #[test]
    fn test_profile_kept_when_history_is_empty() {
        let (_dir, store) = make_test_store();
        let tracker = StreakTracker {
            streak_days: 3,
            best_streak: 6,
            total_days_logged: 10,
        };
        store.save_state(&tracker, &[]).unwrap();
        let (loaded, events) = store.load_state();
        assert_eq!(loaded, tracker);
        assert!(events.is_empty());
    }

    #[test]
    fn test_save_into_missing_dir_errors() {
        let (dir, _store) = make_test_store();
        let bad_store = JsonStore {
            base_dir: dir.path().join("nonexistent_subdir"),
        };
        let result = bad_store.save_profile(&ProfileData::default());
        assert!(matches!(result, Err(StoreError::Io { .. })));
    }
}
