#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use chrono::NaiveDate;

    use crate::mock::{MockFaultConfig, MockFaults};
    use crate::{
        Entity, EntityStore, FixedClock, Operation, SequentialIds, StoreError, StoreOptions,
    };

    // ─── Helpers ───────────────────────────────────────────────────────

    #[derive(Debug, Clone, PartialEq)]
    struct Widget {
        id: String,
        name: String,
        colour: String,
        added_on: NaiveDate,
    }

    struct WidgetDraft {
        name: String,
        colour: String,
    }

    #[derive(Default)]
    struct WidgetPatch {
        name: Option<String>,
        colour: Option<String>,
    }

    impl Entity for Widget {
        type Draft = WidgetDraft;
        type Patch = WidgetPatch;
        const KIND: &'static str = "Widget";

        fn id(&self) -> &str {
            &self.id
        }

        fn from_draft(id: String, draft: WidgetDraft, today: NaiveDate) -> Self {
            Self {
                id,
                name: draft.name,
                colour: draft.colour,
                added_on: today,
            }
        }

        fn apply(&mut self, patch: WidgetPatch) {
            if let Some(name) = patch.name {
                self.name = name;
            }
            if let Some(colour) = patch.colour {
                self.colour = colour;
            }
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn widget(id: &str, name: &str) -> Widget {
        Widget {
            id: id.to_string(),
            name: name.to_string(),
            colour: "grey".to_string(),
            added_on: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }

    fn seed() -> Vec<Widget> {
        vec![widget("1", "bolt"), widget("2", "nut"), widget("3", "washer")]
    }

    fn draft(name: &str) -> WidgetDraft {
        WidgetDraft {
            name: name.to_string(),
            colour: "red".to_string(),
        }
    }

    fn test_options() -> StoreOptions {
        StoreOptions::immediate()
            .with_latency(Duration::from_millis(500))
            .with_ids(Arc::new(SequentialIds::new("w-")))
            .with_clock(Arc::new(FixedClock(today())))
    }

    async fn loaded_store(options: StoreOptions) -> EntityStore<Widget> {
        let store = EntityStore::new(seed(), options);
        store.load_all().await.expect("seed load should succeed");
        store
    }

    // ─── load_all ──────────────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn store_starts_empty_until_loaded() {
        let store = EntityStore::new(seed(), test_options());
        assert!(store.is_empty());
        assert!(!store.is_loading());

        let items = store.load_all().await.unwrap();
        assert_eq!(items, seed());
        assert_eq!(store.snapshot(), seed());
    }

    #[tokio::test(start_paused = true)]
    async fn load_all_waits_for_latency() {
        let store = EntityStore::new(seed(), test_options());
        let started = tokio::time::Instant::now();

        store.load_all().await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn load_all_discards_local_changes() {
        let store = loaded_store(test_options()).await;
        store.create(draft("gear")).await.unwrap();
        assert_eq!(store.len(), 4);

        store.load_all().await.unwrap();
        assert_eq!(store.snapshot(), seed());
    }

    // ─── create ────────────────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn create_appends_input_with_fresh_id() {
        let store = loaded_store(test_options()).await;

        let created = store.create(draft("gear")).await.unwrap();

        let expected = Widget {
            id: "w-1".to_string(),
            name: "gear".to_string(),
            colour: "red".to_string(),
            added_on: today(),
        };
        assert_eq!(created, expected);

        let matching: Vec<_> = store
            .snapshot()
            .into_iter()
            .filter(|w| w.name == "gear")
            .collect();
        assert_eq!(matching, vec![expected]);
        assert_eq!(store.snapshot().last().map(|w| w.id.as_str()), Some("w-1"));
    }

    #[tokio::test(start_paused = true)]
    async fn create_two_records_returns_different_ids() {
        let store = loaded_store(test_options()).await;

        let a = store.create(draft("gear")).await.unwrap();
        let b = store.create(draft("gear")).await.unwrap();

        assert_ne!(a.id, b.id, "each record should get a unique id");
        assert_eq!(store.len(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_create_appends_nothing() {
        let (faults, tracker) = MockFaults::with_config(MockFaultConfig {
            always_fail: vec![Operation::Create],
            ..MockFaultConfig::default()
        });
        let store = loaded_store(test_options().with_faults(Arc::new(faults))).await;

        let result = store.create(draft("gear")).await;

        assert_eq!(
            result,
            Err(StoreError::Transient {
                kind: "Widget",
                op: Operation::Create
            })
        );
        assert_eq!(store.snapshot(), seed());
        assert_eq!(tracker.create_count(), 1);
        assert_eq!(tracker.failure_count(), 1);
    }

    // ─── update ────────────────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn update_merges_patch_onto_record() {
        let store = loaded_store(test_options()).await;

        let updated = store
            .update(
                "2",
                WidgetPatch {
                    colour: Some("blue".to_string()),
                    ..WidgetPatch::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "nut", "untouched fields keep their value");
        assert_eq!(updated.colour, "blue");
        assert_eq!(store.get("2"), Some(updated));
        assert_eq!(store.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn update_missing_id_fails_without_mutation() {
        let (faults, tracker) = MockFaults::new();
        let store = loaded_store(test_options().with_faults(Arc::new(faults))).await;
        let before = store.snapshot();

        let result = store
            .update(
                "nope",
                WidgetPatch {
                    name: Some("ghost".to_string()),
                    ..WidgetPatch::default()
                },
            )
            .await;

        assert_eq!(
            result,
            Err(StoreError::NotFound {
                kind: "Widget",
                id: "nope".to_string()
            })
        );
        assert_eq!(store.snapshot(), before);
        assert_eq!(tracker.update_count(), 0, "not-found is decided before the API call");
        assert_eq!(store.last_error(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn update_loses_race_against_earlier_delete() {
        let store = loaded_store(test_options()).await;

        let deleter = tokio::spawn({
            let store = store.clone();
            async move { store.delete("1").await }
        });
        // Let the delete start its latency timer first.
        tokio::task::yield_now().await;
        tokio::time::advance(Duration::from_millis(1)).await;

        let result = store
            .update(
                "1",
                WidgetPatch {
                    name: Some("late".to_string()),
                    ..WidgetPatch::default()
                },
            )
            .await;

        assert!(matches!(result, Err(StoreError::NotFound { .. })));
        assert_eq!(deleter.await.unwrap(), Ok(true));
        assert!(!store.contains("1"));
    }

    // ─── delete ────────────────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn delete_existing_record_succeeds() {
        let store = loaded_store(test_options()).await;

        assert_eq!(store.delete("3").await, Ok(true));
        assert_eq!(store.snapshot(), vec![widget("1", "bolt"), widget("2", "nut")]);
    }

    #[tokio::test(start_paused = true)]
    async fn delete_missing_id_is_a_noop() {
        let store = loaded_store(test_options()).await;
        let mut sub = store.subscribe();

        assert_eq!(store.delete("nope").await, Ok(false));
        assert_eq!(store.snapshot(), seed());
        assert!(!sub.has_changed(), "nothing to republish");
        assert_eq!(sub.items(), seed());
    }

    // ─── Loading and error signals ─────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn injected_failure_sets_error_and_keeps_items() {
        let (faults, _tracker) = MockFaults::scripted([false, true]);
        let store = loaded_store(test_options().with_faults(Arc::new(faults))).await;

        let result = store.load_all().await;

        assert!(result.as_ref().is_err_and(|e| e.is_retryable()));
        assert_eq!(store.last_error().as_deref(), Some("Simulated API error"));
        assert_eq!(store.snapshot(), seed());
        assert!(!store.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn retry_after_failure_clears_error() {
        let (faults, tracker) = MockFaults::scripted([true]);
        let store = EntityStore::new(seed(), test_options().with_faults(Arc::new(faults)));

        assert!(store.load_all().await.is_err());
        assert!(store.last_error().is_some());
        assert!(store.is_empty());

        store.load_all().await.unwrap();
        assert_eq!(store.last_error(), None);
        assert_eq!(store.snapshot(), seed());
        assert_eq!(tracker.load_all_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn loading_flag_tracks_in_flight_operations() {
        let store = EntityStore::new(seed(), test_options());

        let task = tokio::spawn({
            let store = store.clone();
            async move { store.load_all().await }
        });
        tokio::task::yield_now().await;
        assert!(store.is_loading());

        task.await.unwrap().unwrap();
        assert!(!store.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_operation_commits_nothing() {
        let store = loaded_store(test_options()).await;

        let result = tokio::time::timeout(Duration::from_millis(100), store.create(draft("gear"))).await;

        assert!(result.is_err(), "create should still be waiting on latency");
        assert_eq!(store.snapshot(), seed());
        assert!(!store.is_loading());
    }

    // ─── Subscriptions ─────────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn subscriber_sees_each_mutation() {
        let store = loaded_store(test_options()).await;
        let mut sub = store.subscribe();
        assert_eq!(sub.items(), seed());

        let writer = tokio::spawn({
            let store = store.clone();
            async move { store.create(draft("gear")).await }
        });

        sub.changed().await.unwrap();
        assert_eq!(sub.items().len(), 4);
        writer.await.unwrap().unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn subscriber_is_notified_of_errors() {
        let (faults, _tracker) = MockFaults::scripted([false, true]);
        let store = loaded_store(test_options().with_faults(Arc::new(faults))).await;
        let mut sub = store.subscribe();

        let _ = store.delete("1").await;

        assert!(sub.has_changed());
        assert_eq!(sub.error().as_deref(), Some("Simulated API error"));
        assert_eq!(sub.items(), seed());
    }

    #[tokio::test(start_paused = true)]
    async fn subscriber_waits_on_loading_flag() {
        let store = EntityStore::new(seed(), test_options());
        let mut sub = store.subscribe();
        assert!(!sub.loading());

        let task = tokio::spawn({
            let store = store.clone();
            async move { store.load_all().await }
        });

        assert!(sub.loading_changed().await.unwrap());
        assert!(!sub.loading_changed().await.unwrap());
        assert_eq!(sub.items(), seed());
        task.await.unwrap().unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn unsubscribe_detaches_observer() {
        let store = EntityStore::new(seed(), test_options());
        let first = store.subscribe();
        let second = store.subscribe();
        assert_eq!(store.subscriber_count(), 2);

        first.unsubscribe();
        assert_eq!(store.subscriber_count(), 1);

        drop(second);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn subscription_reports_closed_store() {
        let store = EntityStore::new(seed(), test_options());
        let mut sub = store.subscribe();
        drop(store);

        let err = sub.changed().await.unwrap_err();
        assert_eq!(err.kind, "Widget");
    }
}
