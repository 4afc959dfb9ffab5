//! Integration tests for the product store against the mock backend.

use std::path::Path;

use rust_decimal::Decimal;
use taskmart_client::{ApiClient, ClientConfig, ProductFilter, ProductStore, SessionStore, StoreError};
use taskmart_core::{ProductDraft, ProductId, ProductPatch, ProductStatus, ProductVariant, Variations};
use taskmart_integration_tests::MockBackend;

fn dec(s: &str) -> Decimal {
    s.parse().expect("valid decimal literal")
}

/// Build a client against the mock backend and sign up a fresh user.
async fn signed_in(backend: &MockBackend, dir: &Path) -> ApiClient {
    let config = ClientConfig::new(&backend.base_url, dir);
    let client = ApiClient::new(&config).expect("build client");
    let mut session = SessionStore::new(client.auth(), client.clone(), dir.to_path_buf());
    session
        .signup("Ada", "ada@example.com", "hunter2!")
        .await
        .expect("signup");
    client
}

// ============================================================================
// CRUD
// ============================================================================

#[tokio::test]
async fn test_create_appends_servers_copy() {
    let backend = MockBackend::spawn().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let client = signed_in(&backend, dir.path()).await;
    let mut store = ProductStore::new(client.products());

    let mut draft = ProductDraft::new("Mug", dec("9.99"));
    draft.discount_price = Some(dec("7.50"));
    let product = store.create(&draft).await.expect("create product");

    assert_eq!(store.products().len(), 1);
    assert_eq!(product.title, "Mug");
    assert_eq!(product.discount_price, Some(dec("7.50")));
    assert_eq!(product.effective_price(), dec("7.50"));
}

#[tokio::test]
async fn test_invalid_draft_rejected_client_side() {
    let backend = MockBackend::spawn().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let client = signed_in(&backend, dir.path()).await;
    let mut store = ProductStore::new(client.products());

    let result = store.create(&ProductDraft::new("Mug", dec("-1"))).await;

    assert!(matches!(result, Err(StoreError::InvalidProduct(_))));
    assert!(store.products().is_empty());
    assert!(store.error().is_none());
}

#[tokio::test]
async fn test_update_replaces_by_id() {
    let backend = MockBackend::spawn().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let client = signed_in(&backend, dir.path()).await;
    let mut store = ProductStore::new(client.products());

    let product = store
        .create(&ProductDraft::new("Mug", dec("9.99")))
        .await
        .expect("create");

    let mut draft = ProductDraft::new("Big Mug", dec("12.99"));
    draft.status = ProductStatus::OutOfStock;
    store.update(product.id, &draft).await.expect("update");

    assert_eq!(store.products().len(), 1);
    assert_eq!(store.products()[0].title, "Big Mug");
    assert_eq!(store.products()[0].status, ProductStatus::OutOfStock);
}

#[tokio::test]
async fn test_patch_only_touches_present_fields() {
    let backend = MockBackend::spawn().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let client = signed_in(&backend, dir.path()).await;
    let mut store = ProductStore::new(client.products());

    let mut draft = ProductDraft::new("Mug", dec("9.99"));
    draft.stock = Some(5);
    let product = store.create(&draft).await.expect("create");

    let patch = ProductPatch::status(ProductStatus::Discontinued);
    let updated = store.patch(product.id, &patch).await.expect("patch");

    assert_eq!(updated.status, ProductStatus::Discontinued);
    assert_eq!(updated.title, "Mug");
    assert_eq!(updated.price, dec("9.99"));
    assert_eq!(updated.stock, Some(5));
}

#[tokio::test]
async fn test_delete_failure_keeps_catalog_and_sets_error() {
    let backend = MockBackend::spawn().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let client = signed_in(&backend, dir.path()).await;
    let mut store = ProductStore::new(client.products());

    store
        .create(&ProductDraft::new("Mug", dec("9.99")))
        .await
        .expect("create");

    let result = store.delete(ProductId::new(999)).await;

    assert!(result.is_err());
    assert_eq!(store.products().len(), 1);
    assert_eq!(store.error(), Some("Failed to delete product"));
}

// ============================================================================
// Seeded catalog & filtering
// ============================================================================

#[tokio::test]
async fn test_refresh_picks_up_seeded_catalog() {
    let backend = MockBackend::spawn().await;
    backend.seed_product("Red Shirt", "20.00", Some("15.00"), Some(10));
    backend.seed_product("Blue Shirt", "25.00", None, Some(3));

    let dir = tempfile::tempdir().expect("tempdir");
    let client = signed_in(&backend, dir.path()).await;
    let mut store = ProductStore::new(client.products());

    store.refresh().await.expect("refresh");

    assert_eq!(store.products().len(), 2);
    assert_eq!(store.products()[0].effective_price(), dec("15.00"));
    assert_eq!(store.products()[1].effective_price(), dec("25.00"));
}

#[tokio::test]
async fn test_variants_survive_refresh_and_resolve() {
    let backend = MockBackend::spawn().await;
    let shirt = backend.seed_product("Shirt", "20.00", Some("15.00"), Some(10));
    let red: Variations = [("color".to_string(), "Red".to_string())].into();
    backend.seed_variants(
        shirt.id,
        vec![ProductVariant {
            variation_values: red.clone(),
            price: dec("22.00"),
            stock: 2,
        }],
    );

    let dir = tempfile::tempdir().expect("tempdir");
    let client = signed_in(&backend, dir.path()).await;
    let mut store = ProductStore::new(client.products());
    store.refresh().await.expect("refresh");

    let fetched = &store.products()[0];
    let variant = fetched.variant_for(&red).expect("variant resolved");
    assert_eq!(variant.stock, 2);

    // A matched variant's price wins over discountPrice ?? price.
    assert_eq!(fetched.price_for(&red), dec("22.00"));
    let blue: Variations = [("color".to_string(), "Blue".to_string())].into();
    assert_eq!(fetched.price_for(&blue), dec("15.00"));
}

#[tokio::test]
async fn test_filter_over_catalog() {
    let backend = MockBackend::spawn().await;
    backend.seed_product("Red Shirt", "20.00", None, None);
    backend.seed_product("Red Mug", "9.99", None, None);
    backend.seed_product("Blue Shirt", "25.00", None, None);

    let dir = tempfile::tempdir().expect("tempdir");
    let client = signed_in(&backend, dir.path()).await;
    let mut store = ProductStore::new(client.products());
    store.refresh().await.expect("refresh");

    let filter = ProductFilter {
        status: Some(ProductStatus::Available),
        search: Some("shirt".to_string()),
    };
    let matched = filter.apply(store.products());

    let titles: Vec<&str> = matched.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Red Shirt", "Blue Shirt"]);
}
