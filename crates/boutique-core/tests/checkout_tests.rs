//! Checkout and storefront wiring

use boutique_backend::{BackendError, MemoryBackend};
use boutique_cart::{CartStore, Quantity};
use boutique_catalog::{Money, OrderStatus, Product};
use boutique_core::{BoutiqueConfig, CheckoutError, CheckoutForm, CheckoutService, Storefront};
use boutique_storage::{MemoryStore, CART_SLOT};
use boutique_test_utils::{
    product_a, product_b, seeded_backend, ADMIN_EMAIL, ADMIN_PASSWORD,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn form() -> CheckoutForm {
    CheckoutForm::new(
        "Amina Benali",
        "amina@example.com",
        "0555 12 34 56",
        "12 Rue Didouche Mourad, Alger",
    )
}

fn filled_cart() -> CartStore<MemoryStore> {
    let mut cart = CartStore::open(MemoryStore::new());
    cart.add(&product_a(), Quantity::new(2).unwrap(), Some("M"), None);
    cart.add_one(&product_b());
    cart
}

// ============================================================================
// Checkout
// ============================================================================

#[tokio::test]
async fn submit_writes_order_and_items_then_clears_cart() {
    let backend = seeded_backend();
    let checkout = CheckoutService::new(backend.clone());
    let mut cart = filled_cart();

    let order = checkout.submit(&form(), &mut cart).await.unwrap();

    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.total_amount, Money::from_major(2500));
    assert_eq!(order.items.len(), 2);
    assert_eq!(order.items[0].quantity, 2);
    assert_eq!(order.items[0].price_each, Money::from_major(1000));
    assert!(cart.is_empty());
    assert_eq!(cart.bridge().load(CART_SLOT).as_deref(), Some(r#"{"items":[]}"#));

    let stored = backend.orders();
    assert_eq!(stored.len(), 5);
    let placed = stored.iter().find(|o| o.id == order.id).unwrap();
    assert_eq!(placed.items.len(), 2);
    assert_eq!(placed.customer_name, "Amina Benali");
}

#[tokio::test]
async fn empty_cart_is_rejected_before_any_write() {
    let backend = seeded_backend();
    let checkout = CheckoutService::new(backend.clone());
    let mut cart = CartStore::open(MemoryStore::new());

    let err = checkout.submit(&form(), &mut cart).await.unwrap_err();
    assert!(matches!(err, CheckoutError::EmptyCart));
    assert_eq!(backend.orders().len(), 4);
}

#[tokio::test]
async fn invalid_form_leaves_cart_untouched() {
    let backend = seeded_backend();
    let checkout = CheckoutService::new(backend.clone());
    let mut cart = filled_cart();
    let bad = CheckoutForm {
        customer_email: "amina-at-example".into(),
        shipping_address: "  ".into(),
        ..form()
    };

    match checkout.submit(&bad, &mut cart).await.unwrap_err() {
        CheckoutError::Validation(v) => {
            assert!(v.has_field("customer_email"));
            assert!(v.has_field("shipping_address"));
            assert!(!v.has_field("customer_name"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(cart.item_count(), 3);
    assert_eq!(backend.orders().len(), 4);
}

#[tokio::test]
async fn failed_order_insert_keeps_cart() {
    let backend = seeded_backend();
    backend.set_fail_order_insert(true);
    let checkout = CheckoutService::new(backend.clone());
    let mut cart = filled_cart();

    let err = checkout.submit(&form(), &mut cart).await.unwrap_err();
    assert!(matches!(err, CheckoutError::OrderInsert(BackendError::Unavailable(_))));
    assert!(err.is_retryable());
    assert_eq!(cart.item_count(), 3);
}

#[tokio::test]
async fn failed_items_roll_back_the_order() {
    let backend = seeded_backend();
    backend.set_fail_order_items(true);
    let checkout = CheckoutService::new(backend.clone());
    let mut cart = filled_cart();

    let err = checkout.submit(&form(), &mut cart).await.unwrap_err();
    assert!(matches!(
        err,
        CheckoutError::ItemsInsert {
            rolled_back: true,
            ..
        }
    ));
    assert_eq!(backend.orders().len(), 4);
    assert_eq!(backend.order_items().len(), 5);
    assert_eq!(cart.item_count(), 3);
}

#[tokio::test]
async fn failed_rollback_is_reported() {
    let backend = seeded_backend();
    backend.set_fail_order_items(true);
    backend.set_fail_order_delete(true);
    let checkout = CheckoutService::new(backend.clone());
    let mut cart = filled_cart();

    let err = checkout.submit(&form(), &mut cart).await.unwrap_err();
    assert!(matches!(
        err,
        CheckoutError::ItemsInsert {
            rolled_back: false,
            ..
        }
    ));
    // Orphaned order stays behind
    assert_eq!(backend.orders().len(), 5);
    assert!(!cart.is_empty());
}

#[tokio::test]
async fn unknown_product_rejects_whole_order() {
    let backend = seeded_backend();
    let checkout = CheckoutService::new(backend.clone());
    let mut cart = filled_cart();
    cart.add_one(&Product::new(99, "Retiré", Money::from_major(100)));

    let err = checkout.submit(&form(), &mut cart).await.unwrap_err();
    assert!(matches!(
        err.backend_error(),
        Some(BackendError::Rejected(_))
    ));
    assert_eq!(backend.orders().len(), 4);
    assert_eq!(backend.order_items().len(), 5);
    assert_eq!(cart.lines().len(), 3);
}

// ============================================================================
// Storefront
// ============================================================================

fn config_in(dir: &std::path::Path) -> BoutiqueConfig {
    BoutiqueConfig::new()
        .with_data_dir(dir)
        .with_admin(ADMIN_EMAIL, boutique_admin::password_digest(ADMIN_PASSWORD))
        .with_low_stock_threshold(5)
}

#[test]
fn cart_survives_storefront_restart() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut shop = Storefront::open(config_in(dir.path())).unwrap();
        shop.cart_mut()
            .add(&product_a(), Quantity::new(3).unwrap(), Some("L"), Some("Blue"));
    }

    let shop = Storefront::open(config_in(dir.path())).unwrap();
    assert_eq!(shop.cart().item_count(), 3);
    assert_eq!(shop.cart().lines()[0].key().to_string(), "1-L-Blue");
}

#[test]
fn admin_session_shares_the_store() {
    let dir = tempfile::tempdir().unwrap();
    {
        let shop = Storefront::open(config_in(dir.path())).unwrap();
        shop.admin_auth()
            .unwrap()
            .login(ADMIN_EMAIL, ADMIN_PASSWORD)
            .unwrap();
    }

    let shop = Storefront::open(config_in(dir.path())).unwrap();
    let user = shop.admin_auth().unwrap().check_session().unwrap();
    assert_eq!(user.role, "admin");
}

#[test]
fn admin_auth_needs_configured_credentials() {
    let shop = Storefront::new(
        BoutiqueConfig::new(),
        MemoryStore::new(),
        Arc::new(MemoryBackend::new()),
    );
    assert!(shop.admin_auth().is_err());
}

#[tokio::test]
async fn storefront_checkout_and_admin_views() {
    let backend = seeded_backend();
    let mut shop = Storefront::new(
        BoutiqueConfig::new().with_low_stock_threshold(5).with_page_size(2),
        MemoryStore::new(),
        backend,
    );

    let page = shop.browse(&shop.product_query()).await.ready().unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total_pages, 2);

    shop.cart_mut().add_one(&product_b());
    let order = shop.checkout(&form()).await.unwrap();
    assert_eq!(order.total_amount, Money::from_major(500));
    assert!(shop.cart().is_empty());

    let low = shop.products().low_stock(10).await.ready().unwrap();
    assert_eq!(low.len(), 2);

    let listed = shop
        .orders()
        .list(&boutique_catalog::OrderQuery::new().status(OrderStatus::Pending))
        .await
        .ready()
        .unwrap();
    assert_eq!(listed.total_count, 2);
}
