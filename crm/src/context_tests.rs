#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use store::mock::{MockFaultConfig, MockFaults};
    use store::{FaultPolicy, FixedClock, NoFaults, Operation, SequentialIds, StoreOptions};

    use crate::context::{AppContext, StoreKind};
    use crate::filter::EnumFilter;
    use crate::forms::{CustomerForm, ProjectForm};
    use crate::models::{CustomerStatus, PaymentPatch, PaymentStatus, Role, UserPatch};
    use crate::queries::payment_totals;
    use crate::views::{CustomerFilter, PaymentFilter, ProjectFilter, UserFilter, ViewError};

    // ─── Helpers ───────────────────────────────────────────────────────

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn options(faults: Arc<dyn FaultPolicy>) -> StoreOptions {
        StoreOptions::immediate()
            .with_faults(faults)
            .with_ids(Arc::new(SequentialIds::new("id-")))
            .with_clock(Arc::new(FixedClock(today())))
    }

    async fn loaded() -> AppContext {
        let ctx = AppContext::new(options(Arc::new(NoFaults)));
        ctx.load_all().await.unwrap();
        ctx
    }

    fn names(customers: &[crate::models::Customer]) -> Vec<&str> {
        customers.iter().map(|c| c.name.as_str()).collect()
    }

    // ─── Loading ───────────────────────────────────────────────────────

    #[tokio::test]
    async fn stores_start_empty_until_loaded() {
        let ctx = AppContext::new(options(Arc::new(NoFaults)));
        assert!(ctx.customers.is_empty());

        ctx.load_all().await.unwrap();
        assert_eq!(ctx.customers.len(), 3);
        assert_eq!(ctx.projects.len(), 2);
        assert_eq!(ctx.payments.len(), 4);
        assert_eq!(ctx.users.len(), 3);
    }

    #[tokio::test]
    async fn load_all_attempts_every_store_and_reports_first_failure() {
        let (faults, tracker) = MockFaults::scripted([false, true, false, false, false, false, true]);
        let ctx = AppContext::new(options(Arc::new(faults)));

        let err = ctx.load_all().await.unwrap_err();

        assert_eq!(err.kind(), "Project");
        assert!(err.is_retryable());
        assert_eq!(tracker.load_all_count(), StoreKind::ALL.len());
        assert_eq!(ctx.customers.len(), 3);
        assert!(ctx.projects.is_empty());
        assert!(ctx.users.is_empty());
        assert_eq!(ctx.projects.last_error().as_deref(), Some("Simulated API error"));
    }

    #[tokio::test]
    async fn retry_reloads_only_failed_stores() {
        let (faults, tracker) = MockFaults::scripted([true]);
        let ctx = AppContext::new(options(Arc::new(faults)));

        ctx.retry_load(1).await.unwrap();

        assert_eq!(tracker.load_all_count(), StoreKind::ALL.len() + 1);
        assert_eq!(ctx.customers.len(), 3);
        assert_eq!(ctx.customers.last_error(), None);
    }

    #[tokio::test]
    async fn retry_gives_up_after_the_last_attempt() {
        let (faults, tracker) = MockFaults::with_config(MockFaultConfig {
            always_fail: vec![Operation::LoadAll],
            ..MockFaultConfig::default()
        });
        let ctx = AppContext::new(options(Arc::new(faults)));

        let err = ctx.retry_load(2).await.unwrap_err();

        assert_eq!(err.to_string(), "Simulated API error");
        assert_eq!(tracker.load_all_count(), StoreKind::ALL.len() * 3);
    }

    // ─── Views ─────────────────────────────────────────────────────────

    #[tokio::test]
    async fn customer_scenarios_on_seed_data() {
        let ctx = loaded().await;

        let mut view = ctx.customer_view(CustomerFilter {
            status: EnumFilter::Only(CustomerStatus::Inactive),
            ..CustomerFilter::default()
        });
        assert_eq!(names(&view.current().unwrap()), ["Michael Brown"]);

        let rows = view
            .set_filter(CustomerFilter {
                search: "em".into(),
                ..CustomerFilter::default()
            })
            .unwrap();
        assert_eq!(names(&rows), ["Emily Davis"]);

        let rows = view.set_filter(CustomerFilter::default()).unwrap();
        assert_eq!(rows, ctx.customers.snapshot());
    }

    #[tokio::test]
    async fn view_recomputes_after_create() {
        let ctx = loaded().await;
        let mut view = ctx.customer_view(CustomerFilter {
            search: "ada".into(),
            ..CustomerFilter::default()
        });
        assert!(view.current().unwrap().is_empty());

        let draft = CustomerForm {
            name: "Ada Lovelace".into(),
            email: "ada@email.com".into(),
            phone: "+1 (555) 000-0000".into(),
            address: "1 Engine Way".into(),
            status: CustomerStatus::Active,
        }
        .submit()
        .unwrap();
        let created = ctx.customers.create(draft).await.unwrap();

        let rows = view.next().await.unwrap().unwrap();
        assert_eq!(rows, vec![created.clone()]);
        assert_eq!(created.id, "id-1");
        assert_eq!(created.created_at, today());
        assert!(created.projects.is_empty());
    }

    #[tokio::test]
    async fn joined_view_follows_every_input_store() {
        let ctx = loaded().await;
        let mut view = ctx.project_view(ProjectFilter {
            search: "robert".into(),
            ..ProjectFilter::default()
        });
        assert_eq!(view.current().unwrap().len(), 1);

        let rename = crate::models::CustomerPatch {
            name: Some("Bob Johnson".into()),
            ..Default::default()
        };
        ctx.customers.update("1", rename).await.unwrap();

        let rows = view.next().await.unwrap().unwrap();
        assert!(rows.is_empty());

        let rows = view
            .update_filter(|f| f.search = "bob".into())
            .unwrap();
        assert_eq!(rows[0].customer_name, "Bob Johnson");
    }

    #[tokio::test]
    async fn store_failure_surfaces_as_view_error() {
        let (faults, _tracker) = MockFaults::with_config(MockFaultConfig {
            always_fail: vec![Operation::Create],
            ..MockFaultConfig::default()
        });
        let ctx = AppContext::new(options(Arc::new(faults)));
        ctx.load_all().await.unwrap();
        let mut view = ctx.customer_view(CustomerFilter::default());

        let draft = CustomerForm {
            name: "Ada".into(),
            email: "ada@email.com".into(),
            phone: "1".into(),
            address: "1 Engine Way".into(),
            ..CustomerForm::default()
        }
        .submit()
        .unwrap();
        assert!(ctx.customers.create(draft).await.is_err());

        let err = view.next().await.unwrap().unwrap_err();
        assert_eq!(
            err,
            ViewError {
                kind: "Customer",
                message: "Simulated API error".into(),
            }
        );
        assert_eq!(ctx.customers.len(), 3);
    }

    #[tokio::test]
    async fn dashboard_tracks_payments() {
        let ctx = loaded().await;
        let mut dashboard = ctx.dashboard_view();
        assert_eq!(dashboard.current().unwrap().total_revenue, 2310.0);

        ctx.payments
            .update("3", PaymentPatch::paid(today(), "REC-003"))
            .await
            .unwrap();

        let stats = dashboard.next().await.unwrap().unwrap();
        assert_eq!(stats.total_revenue, 3570.0);

        let paid_only = PaymentFilter {
            status: EnumFilter::Only(PaymentStatus::Paid),
            ..PaymentFilter::default()
        };
        let rows = ctx.payment_view(paid_only).current().unwrap();
        let totals = payment_totals(rows.iter().map(|r| &r.payment));
        assert_eq!(totals.paid, 3570.0);
        assert_eq!(totals.pending, 0.0);
    }

    #[tokio::test]
    async fn created_project_owns_its_quotation() {
        let ctx = loaded().await;
        let form = ProjectForm {
            name: "Brown Rooftop".into(),
            customer_id: "3".into(),
            address: "789 Pine Rd, Anywhere, USA".into(),
            package_id: "1".into(),
            ..ProjectForm::default()
        };
        let draft = form
            .submit(&ctx.packages.snapshot(), ctx.options().ids.as_ref(), today())
            .unwrap();

        let project = ctx.projects.create(draft).await.unwrap();

        assert_eq!(project.quotation.project_id, project.id);
        assert_eq!(project.quotation.total_amount, 4200.0);
        assert_eq!(ctx.projects.len(), 3);
    }

    #[tokio::test]
    async fn user_view_follows_role_changes() {
        let ctx = loaded().await;
        let mut admins = ctx.user_view(UserFilter {
            role: EnumFilter::Only(Role::Admin),
            ..UserFilter::default()
        });
        let rows = admins.current().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Sarah Manager");

        ctx.users
            .update(
                "3",
                UserPatch {
                    role: Some(Role::Admin),
                    ..UserPatch::default()
                },
            )
            .await
            .unwrap();

        let rows = admins.next().await.unwrap().unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn dropping_a_view_detaches_its_subscriptions() {
        let ctx = loaded().await;
        let before = ctx.customers.subscriber_count();

        let view = ctx.payment_view(PaymentFilter::default());
        assert_eq!(ctx.customers.subscriber_count(), before + 1);

        drop(view);
        assert_eq!(ctx.customers.subscriber_count(), before);
    }
}
