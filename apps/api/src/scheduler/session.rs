//! Planner Session — ties the engine to a [`ScheduleBackend`].
//!
//! Mutations are optimistic: a committed drag updates the in-memory map
//! synchronously, then persistence and telemetry run on spawned tasks.
//! Failures there are logged and swallowed; the local map remains the
//! source of truth for the rest of the session.

#![allow(dead_code)]

use std::sync::Arc;

use serde_json::json;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::models::schedule::{ActivityItem, CustomTask, PlacementMap};
use crate::models::user::Preferences;
use crate::scheduler::catalog::{build_catalog, sanitize_duration, sanitize_name};
use crate::scheduler::drag::{DragController, DragOutcome, DropTarget};
use crate::scheduler::grid::{inbox_items, week_view, WeekView};
use crate::scheduler::placement::PlacementStore;
use crate::sync::{NewCustomTask, ScheduleBackend, SyncError};

#[derive(Debug, Error)]
pub enum SessionError {
    /// User input rejected at the creation boundary; surfaced inline.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Sync(#[from] SyncError),
}

pub struct PlannerSession {
    backend: Arc<dyn ScheduleBackend>,
    preferences: Preferences,
    custom_tasks: Vec<CustomTask>,
    catalog: Vec<ActivityItem>,
    store: PlacementStore,
    drag: DragController,
}

impl PlannerSession {
    /// Loads the profile and builds the initial state. The persisted map is
    /// adopted as-is; existing placements re-associate with regenerated
    /// items by id.
    pub async fn start(backend: Arc<dyn ScheduleBackend>) -> Result<Self, SessionError> {
        let profile = backend.load_profile().await?;
        let catalog = build_catalog(&profile.preferences, &profile.custom_tasks);

        let session = Self {
            backend,
            preferences: profile.preferences,
            custom_tasks: profile.custom_tasks,
            catalog,
            store: PlacementStore::from_map(profile.placements),
            drag: DragController::new(),
        };
        session.emit("SESSION_START", json!({}));
        Ok(session)
    }

    pub fn catalog(&self) -> &[ActivityItem] {
        &self.catalog
    }

    pub fn placements(&self) -> &PlacementMap {
        self.store.map()
    }

    pub fn week_view(&self) -> WeekView {
        week_view(&self.catalog, self.store.map())
    }

    pub fn inbox(&self) -> Vec<&ActivityItem> {
        inbox_items(&self.catalog, self.store.map())
    }

    /// Forwards a gesture start; false when one is already active.
    pub fn drag_start(&mut self, activity_id: &str) -> bool {
        self.drag.drag_start(activity_id)
    }

    /// Ends the active gesture. Committing outcomes queue a best-effort
    /// persist and a telemetry event; the caller never waits on either.
    pub fn drag_end(&mut self, target: DropTarget) -> DragOutcome {
        let dragged = self.drag.dragging_id().map(str::to_string);
        let outcome = self.drag.drag_end(&self.catalog, &mut self.store, target);

        if outcome.committed() {
            self.queue_persist();
            if let Some(activity_id) = dragged {
                match outcome {
                    DragOutcome::Placed(slot) => self.emit(
                        "TASK_MOVED",
                        json!({ "activity_id": activity_id, "slot": slot.to_string() }),
                    ),
                    DragOutcome::ReturnedToInbox => {
                        self.emit("TASK_RETURNED", json!({ "activity_id": activity_id }))
                    }
                    _ => {}
                }
            }
        }
        outcome
    }

    /// Creates a custom task: validated locally, persisted, then folded
    /// into a rebuilt catalog. This path does wait for the server, since
    /// the item's id is server-assigned.
    pub async fn create_custom_task(
        &mut self,
        name: &str,
        duration_hours: f64,
        location: &str,
    ) -> Result<CustomTask, SessionError> {
        let name = sanitize_name(name)
            .ok_or_else(|| SessionError::Validation("Activity name must not be empty".into()))?;
        let task = NewCustomTask {
            name,
            duration_hours: sanitize_duration(duration_hours),
            location: location.trim().to_string(),
        };

        let known: Vec<Uuid> = self.custom_tasks.iter().map(|t| t.id).collect();
        self.custom_tasks = self.backend.create_task(&task).await?;
        self.rebuild_catalog();

        let created = self
            .custom_tasks
            .iter()
            .find(|t| !known.contains(&t.id))
            .or_else(|| self.custom_tasks.last())
            .cloned()
            .ok_or_else(|| SessionError::Validation("Server returned no tasks".into()))?;
        self.emit("TASK_CREATED", json!({ "task_id": created.id }));
        Ok(created)
    }

    /// Deletes a custom task, clearing any placement that referenced it so
    /// no dangling entry survives the delete path.
    pub async fn delete_custom_task(&mut self, id: Uuid) -> Result<(), SessionError> {
        self.backend.delete_task(id).await?;
        self.custom_tasks.retain(|t| t.id != id);
        self.store.unplace(&id.to_string());
        self.rebuild_catalog();
        self.queue_persist();
        self.emit("TASK_DELETED", json!({ "task_id": id }));
        Ok(())
    }

    fn rebuild_catalog(&mut self) {
        self.catalog = build_catalog(&self.preferences, &self.custom_tasks);
    }

    /// Fire-and-forget full-map upsert. Each call sends the complete
    /// current map, so late or repeated deliveries are harmless.
    fn queue_persist(&self) {
        let backend = Arc::clone(&self.backend);
        let snapshot = self.store.map().clone();
        tokio::spawn(async move {
            if let Err(e) = backend.save_placements(&snapshot).await {
                warn!("Failed to persist placements: {e}");
            }
        });
    }

    fn emit(&self, event_type: &'static str, payload: serde_json::Value) {
        let backend = Arc::clone(&self.backend);
        tokio::spawn(async move {
            if let Err(e) = backend.log_event(event_type, payload).await {
                warn!("Failed to log {event_type}: {e}");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schedule::{ActivityCategory, SlotId, Weekday};
    use crate::sync::ProfileData;
    use std::sync::Mutex;

    /// Recording in-memory backend.
    struct MockBackend {
        profile: ProfileData,
        saved: Mutex<Vec<PlacementMap>>,
        tasks: Mutex<Vec<CustomTask>>,
        events: Mutex<Vec<String>>,
        fail_saves: bool,
    }

    impl MockBackend {
        fn new(profile: ProfileData) -> Self {
            let tasks = profile.custom_tasks.clone();
            Self {
                profile,
                saved: Mutex::new(Vec::new()),
                tasks: Mutex::new(tasks),
                events: Mutex::new(Vec::new()),
                fail_saves: false,
            }
        }
    }

    #[async_trait::async_trait]
    impl ScheduleBackend for MockBackend {
        async fn load_profile(&self) -> Result<ProfileData, SyncError> {
            Ok(self.profile.clone())
        }

        async fn save_placements(
            &self,
            placements: &PlacementMap,
        ) -> Result<PlacementMap, SyncError> {
            if self.fail_saves {
                return Err(SyncError::Api {
                    status: 500,
                    message: "boom".to_string(),
                });
            }
            self.saved.lock().unwrap().push(placements.clone());
            Ok(placements.clone())
        }

        async fn create_task(&self, task: &NewCustomTask) -> Result<Vec<CustomTask>, SyncError> {
            let mut tasks = self.tasks.lock().unwrap();
            tasks.push(CustomTask {
                id: Uuid::new_v4(),
                name: task.name.clone(),
                duration_hours: task.duration_hours,
                location: task.location.clone(),
            });
            Ok(tasks.clone())
        }

        async fn delete_task(&self, id: Uuid) -> Result<(), SyncError> {
            self.tasks.lock().unwrap().retain(|t| t.id != id);
            Ok(())
        }

        async fn log_event(
            &self,
            event_type: &str,
            _payload: serde_json::Value,
        ) -> Result<(), SyncError> {
            self.events.lock().unwrap().push(event_type.to_string());
            Ok(())
        }
    }

    fn profile_with_work(hours: f64) -> ProfileData {
        ProfileData {
            preferences: Preferences {
                work_hours: hours,
                hobbies: vec![],
                location: String::new(),
                ..Preferences::default()
            },
            custom_tasks: vec![],
            placements: PlacementMap::new(),
        }
    }

    /// Unsizes the mock once so tests keep a typed handle for assertions.
    async fn start_session(backend: &Arc<MockBackend>) -> PlannerSession {
        let backend = Arc::clone(backend) as Arc<dyn ScheduleBackend>;
        PlannerSession::start(backend).await.unwrap()
    }

    /// Lets spawned fire-and-forget tasks run to completion.
    async fn drain_spawned() {
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_start_builds_catalog_and_adopts_placements() {
        let mut profile = profile_with_work(4.0);
        profile
            .placements
            .insert("work-0".to_string(), SlotId::new(Weekday::Mon, 9));

        let backend = Arc::new(MockBackend::new(profile));
        let session = PlannerSession::start(backend).await.unwrap();

        assert_eq!(session.catalog().len(), 1);
        assert_eq!(
            session.placements().get("work-0"),
            Some(&SlotId::new(Weekday::Mon, 9))
        );
        // Placed items are not in the inbox.
        assert!(session.inbox().is_empty());
    }

    #[tokio::test]
    async fn test_committed_drag_persists_full_map() {
        let backend = Arc::new(MockBackend::new(profile_with_work(4.0)));
        let mut session = start_session(&backend).await;

        assert!(session.drag_start("work-0"));
        let outcome = session.drag_end(DropTarget::Slot(SlotId::new(Weekday::Tue, 10)));
        assert!(outcome.committed());
        drain_spawned().await;

        let saved = backend.saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(
            saved[0].get("work-0"),
            Some(&SlotId::new(Weekday::Tue, 10))
        );
    }

    #[tokio::test]
    async fn test_rejected_drag_persists_nothing() {
        let backend = Arc::new(MockBackend::new(profile_with_work(8.0)));
        let mut session = start_session(&backend).await;

        session.drag_start("work-0");
        session.drag_end(DropTarget::Slot(SlotId::new(Weekday::Mon, 9)));
        drain_spawned().await;
        backend.saved.lock().unwrap().clear();

        // work-1 is another 4h block; dropping it on the occupied range fails.
        session.drag_start("work-1");
        let outcome = session.drag_end(DropTarget::Slot(SlotId::new(Weekday::Mon, 11)));
        assert!(!outcome.committed());
        drain_spawned().await;

        assert!(backend.saved.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_persistence_failure_keeps_local_state() {
        let mut backend = MockBackend::new(profile_with_work(4.0));
        backend.fail_saves = true;
        let backend = Arc::new(backend);
        let mut session = start_session(&backend).await;

        session.drag_start("work-0");
        session.drag_end(DropTarget::Slot(SlotId::new(Weekday::Wed, 12)));
        drain_spawned().await;

        // The optimistic local state stands despite the failed save.
        assert_eq!(
            session.placements().get("work-0"),
            Some(&SlotId::new(Weekday::Wed, 12))
        );
    }

    #[tokio::test]
    async fn test_repeated_saves_of_same_map_are_idempotent() {
        let backend = Arc::new(MockBackend::new(profile_with_work(4.0)));
        let mut session = start_session(&backend).await;

        session.drag_start("work-0");
        session.drag_end(DropTarget::Slot(SlotId::new(Weekday::Mon, 9)));
        session.drag_start("work-0");
        session.drag_end(DropTarget::Slot(SlotId::new(Weekday::Mon, 9)));
        drain_spawned().await;

        let saved = backend.saved.lock().unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0], saved[1]);
    }

    #[tokio::test]
    async fn test_create_custom_task_validates_and_rebuilds() {
        let backend = Arc::new(MockBackend::new(profile_with_work(0.0)));
        let mut session = start_session(&backend).await;

        assert!(matches!(
            session.create_custom_task("   ", 1.0, "").await,
            Err(SessionError::Validation(_))
        ));

        let task = session
            .create_custom_task("  Dentist ", 0.1, " Downtown ")
            .await
            .unwrap();
        assert_eq!(task.name, "Dentist");
        assert_eq!(task.duration_hours, 0.5); // floored at the half-hour
        assert!(session
            .catalog()
            .iter()
            .any(|i| i.id == task.id.to_string() && i.category == ActivityCategory::Custom));
    }

    #[tokio::test]
    async fn test_delete_placed_custom_task_clears_placement() {
        let backend = Arc::new(MockBackend::new(profile_with_work(0.0)));
        let mut session = start_session(&backend).await;

        let task = session.create_custom_task("Gym", 1.0, "").await.unwrap();
        session.drag_start(&task.id.to_string());
        session.drag_end(DropTarget::Slot(SlotId::new(Weekday::Sat, 10)));

        session.delete_custom_task(task.id).await.unwrap();
        drain_spawned().await;

        assert!(session.placements().is_empty());
        assert!(session.catalog().is_empty());
        // The persisted map no longer references the deleted task either.
        let saved = backend.saved.lock().unwrap();
        assert!(saved.last().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_inbox_and_grid_partition_the_catalog() {
        let backend = Arc::new(MockBackend::new(profile_with_work(10.0)));
        let mut session = start_session(&backend).await;
        assert_eq!(session.catalog().len(), 3);

        session.drag_start("work-1");
        session.drag_end(DropTarget::Slot(SlotId::new(Weekday::Thu, 8)));

        let inbox_ids: Vec<&str> = session.inbox().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(inbox_ids, vec!["work-0", "work-2"]);
        assert_eq!(session.placements().len(), 1);
    }

    #[tokio::test]
    async fn test_session_emits_telemetry_for_commits() {
        let backend = Arc::new(MockBackend::new(profile_with_work(4.0)));
        let mut session = start_session(&backend).await;

        session.drag_start("work-0");
        session.drag_end(DropTarget::Slot(SlotId::new(Weekday::Mon, 9)));
        session.drag_start("work-0");
        session.drag_end(DropTarget::Inbox);
        drain_spawned().await;

        let events = backend.events.lock().unwrap();
        assert!(events.contains(&"SESSION_START".to_string()));
        assert!(events.contains(&"TASK_MOVED".to_string()));
        assert!(events.contains(&"TASK_RETURNED".to_string()));
    }
}
