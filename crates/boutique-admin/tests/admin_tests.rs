//! Back-office services against the seeded in-memory backend

use boutique_admin::{
    export_csv, AdminAuth, AdminCredentials, AdminError, AuthError, DateFilter, OrderManager,
    ProductManager, Statistics,
};
use boutique_backend::{Backend, BackendError, MemoryBackend};
use boutique_catalog::{
    FetchOutcome, Money, OrderId, OrderQuery, OrderStatus, ProductDraft, ProductQuery,
};
use boutique_storage::{FileStore, ADMIN_SESSION_SLOT};
use boutique_test_utils::{
    at, product_id, seeded_backend, FailingWriteStore, ADMIN_EMAIL, ADMIN_PASSWORD,
};
use chrono::Duration;
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn credentials() -> AdminCredentials {
    AdminCredentials::from_password(ADMIN_EMAIL, ADMIN_PASSWORD)
}

// ============================================================================
// Statistics
// ============================================================================

#[tokio::test]
async fn dashboard_over_sample_shop() {
    let stats = Statistics::new(seeded_backend());
    let dash = stats.dashboard_at(at(2025, 3, 20)).await.ready().unwrap();

    assert_eq!(dash.total_products, 3);
    assert_eq!(dash.low_stock_items, 2);
    assert_eq!(dash.total_orders, 4);
    assert_eq!(dash.total_customers, 3);
    assert_eq!(dash.total_revenue, Money::from_major(4000));
    // Delivered revenue is 2000 in both February and March
    assert_eq!(dash.revenue_growth, 0.0);
    // Three March orders against one in February
    assert_eq!(dash.order_growth, 200.0);
    assert_eq!(dash.status_distribution[&OrderStatus::Cancelled], 1);
}

#[tokio::test]
async fn dashboard_on_empty_shop_is_empty_not_failed() {
    let stats = Statistics::new(Arc::new(MemoryBackend::new()));
    assert!(matches!(stats.dashboard().await, FetchOutcome::Empty));
}

#[tokio::test]
async fn dashboard_reports_backend_failure() {
    let backend = seeded_backend();
    backend.set_fail_reads(true);
    let outcome = Statistics::new(backend).dashboard().await;

    assert!(outcome.is_failed());
    assert!(matches!(outcome.error(), Some(BackendError::Unavailable(_))));
}

#[tokio::test]
async fn revenue_series_and_best_sellers() {
    let stats = Statistics::new(seeded_backend());

    let series = stats
        .revenue_series(3, at(2025, 3, 20))
        .await
        .ready()
        .unwrap();
    let orders: Vec<u64> = series.iter().map(|m| m.orders).collect();
    assert_eq!(orders, vec![0, 1, 3]);
    assert_eq!(series[2].revenue, Money::from_major(2000));

    let top = stats.top_products(2).await.ready().unwrap();
    let names: Vec<&str> = top.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Robe Fleurie", "Jupe Plissée"]);
    assert_eq!(top[0].total_quantity, 3);
    assert_eq!(top[0].total_revenue, Money::from_major(3000));
}

#[tokio::test]
async fn revenue_series_before_first_sale_is_empty() {
    let stats = Statistics::new(seeded_backend());
    let outcome = stats.revenue_series(2, at(2024, 12, 20)).await;
    assert!(matches!(outcome, FetchOutcome::Empty));
}

// ============================================================================
// Orders
// ============================================================================

#[tokio::test]
async fn export_filters_and_renders_csv() {
    let manager = OrderManager::new(seeded_backend());
    let rows = manager
        .export(&OrderQuery::new().status(OrderStatus::Delivered).limit(1))
        .await
        .unwrap();

    // Paging of the incoming query is ignored
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].order_id, OrderId::from(2));
    assert_eq!(rows[0].items, "Robe Fleurie (1); Foulard (2)");

    let csv = export_csv(&rows);
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[1],
        "2,yacine,yacine@example.com,2000.00,delivered,2025-03-03,Robe Fleurie (1); Foulard (2)"
    );
}

#[tokio::test]
async fn week_filter_limits_order_list() {
    let manager = OrderManager::new(seeded_backend());
    let query = DateFilter::Week.apply(OrderQuery::new(), at(2025, 3, 20));

    let page = manager.list(&query).await.ready().unwrap();
    let ids: Vec<&str> = page.items.iter().map(|o| o.id.as_str()).collect();
    assert_eq!(ids, vec!["4"]);
}

#[tokio::test]
async fn status_update_round_trips() {
    let backend = seeded_backend();
    let manager = OrderManager::new(backend.clone());

    let order = manager
        .update_status(&OrderId::from(3), OrderStatus::Shipped)
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Shipped);

    let err = manager
        .update_status(&OrderId::from(99), OrderStatus::Shipped)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AdminError::Backend(BackendError::NotFound { .. })
    ));
}

// ============================================================================
// Products
// ============================================================================

#[tokio::test]
async fn product_lifecycle() {
    let backend = seeded_backend();
    let manager = ProductManager::new(backend.clone());

    let mut draft = ProductDraft::new("Chemise Lin", "hauts", Money::from_major(2600));
    draft.add_size("M");
    let created = manager.create(&draft).await.unwrap();
    assert_eq!(created.id, product_id(4));

    draft.name = "Chemise Lin Blanche".into();
    let updated = manager.update(&created.id, &draft).await.unwrap();
    assert_eq!(updated.name, "Chemise Lin Blanche");

    manager.delete(&created.id).await.unwrap();
    assert_eq!(manager.get(&created.id).await.unwrap(), None);

    let page = manager.list(&ProductQuery::new()).await.ready().unwrap();
    assert_eq!(page.total_count, 3);
}

#[tokio::test]
async fn low_stock_uses_configured_threshold() {
    let manager = ProductManager::new(seeded_backend()).with_low_stock_threshold(5);
    let low = manager.low_stock(10).await.ready().unwrap();
    let ids: Vec<&str> = low.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["3", "2"]);

    let backend = seeded_backend();
    backend.set_fail_reads(true);
    assert!(ProductManager::new(backend).low_stock(10).await.is_failed());
}

// ============================================================================
// Auth
// ============================================================================

#[test]
fn session_survives_restart_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let now = at(2025, 3, 20);
    {
        let auth = AdminAuth::new(FileStore::open(dir.path()).unwrap(), credentials());
        auth.login_at(ADMIN_EMAIL, ADMIN_PASSWORD, now).unwrap();
    }

    let auth = AdminAuth::new(FileStore::open(dir.path()).unwrap(), credentials());
    let user = auth.check_session_at(now + Duration::minutes(10)).unwrap();
    assert_eq!(user.email, ADMIN_EMAIL);

    auth.logout();
    assert_eq!(auth.check_session_at(now + Duration::minutes(11)), None);
}

#[test]
fn login_succeeds_when_session_cannot_be_saved() {
    let auth = AdminAuth::new(FailingWriteStore::new(), credentials());

    assert!(auth.login(ADMIN_EMAIL, ADMIN_PASSWORD).is_ok());
    assert_eq!(auth.require(), Err(AuthError::NotAuthenticated));
}

#[test]
fn stale_session_from_store_is_rejected() {
    let now = at(2025, 3, 20);
    let raw = format!(
        r#"{{"user":{{"email":"{ADMIN_EMAIL}","role":"admin"}},"timestamp":{},"expiresAt":{}}}"#,
        (now - Duration::hours(2)).timestamp_millis(),
        (now - Duration::hours(1)).timestamp_millis(),
    );
    let auth = AdminAuth::new(
        FailingWriteStore::with_slot(ADMIN_SESSION_SLOT, &raw),
        credentials(),
    );

    assert!(auth.session().is_some());
    assert_eq!(auth.check_session_at(now), None);
}

#[tokio::test]
async fn backend_trait_object_is_shared_between_services() {
    let backend: Arc<dyn Backend> = seeded_backend();
    let products = ProductManager::new(Arc::clone(&backend));
    let stats = Statistics::new(backend);

    products.delete(&product_id(3)).await.unwrap();
    let dash = stats.dashboard_at(at(2025, 3, 20)).await.ready().unwrap();
    assert_eq!(dash.total_products, 2);
}
