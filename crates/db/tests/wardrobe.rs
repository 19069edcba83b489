//! Integration tests for wardrobe persistence: catalog saves, filtering,
//! and owner scoping.

use assert_matches::assert_matches;
use best_dressed_core::wardrobe::WardrobeFilter;
use best_dressed_db::models::catalog_item::{CatalogItem, CreateCatalogItem};
use best_dressed_db::models::user::CreateUser;
use best_dressed_db::models::wardrobe_item::{CreateWardrobeItem, SaveOutcome};
use best_dressed_db::repositories::{CatalogItemRepo, UserRepo, WardrobeItemRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool, username: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "x".to_string(),
            is_staff: false,
        },
    )
    .await
    .unwrap()
    .id
}

async fn new_catalog_item(pool: &PgPool, title: &str) -> CatalogItem {
    CatalogItemRepo::create(
        pool,
        &CreateCatalogItem {
            title: title.to_string(),
            description: format!("{title} description"),
            tag: Some("top".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
}

fn manual_item(title: &str, category: &str, brand: &str, color: &str) -> CreateWardrobeItem {
    CreateWardrobeItem {
        title: title.to_string(),
        category: Some(category.to_string()),
        brand: brand.to_string(),
        color: color.to_string(),
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Save from catalog
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_save_from_catalog_once(pool: PgPool) {
    let user = new_user(&pool, "alice").await;
    let item = new_catalog_item(&pool, "Oxford shirt").await;

    let first = WardrobeItemRepo::save_from_catalog(&pool, user, &item).await.unwrap();
    assert_matches!(first, SaveOutcome::Created(ref w) if w.catalog_item_id == Some(item.id));
    if let SaveOutcome::Created(w) = first {
        assert_eq!(w.title, "Oxford shirt");
        assert_eq!(w.category, "top");
    }

    let second = WardrobeItemRepo::save_from_catalog(&pool, user, &item).await.unwrap();
    assert_matches!(second, SaveOutcome::AlreadyExists);

    assert_eq!(WardrobeItemRepo::count_for_user(&pool, user).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_saves_yield_one_row(pool: PgPool) {
    let user = new_user(&pool, "bob").await;
    let item = new_catalog_item(&pool, "Chinos").await;

    let (a, b) = tokio::join!(
        WardrobeItemRepo::save_from_catalog(&pool, user, &item),
        WardrobeItemRepo::save_from_catalog(&pool, user, &item),
    );
    let outcomes = [a.unwrap(), b.unwrap()];
    let created = outcomes
        .iter()
        .filter(|o| matches!(o, SaveOutcome::Created(_)))
        .count();
    assert_eq!(created, 1);
    assert_eq!(WardrobeItemRepo::count_for_user(&pool, user).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_same_catalog_item_for_two_users(pool: PgPool) {
    let alice = new_user(&pool, "alice").await;
    let bob = new_user(&pool, "bob").await;
    let item = new_catalog_item(&pool, "Scarf").await;

    assert_matches!(
        WardrobeItemRepo::save_from_catalog(&pool, alice, &item).await.unwrap(),
        SaveOutcome::Created(_)
    );
    assert_matches!(
        WardrobeItemRepo::save_from_catalog(&pool, bob, &item).await.unwrap(),
        SaveOutcome::Created(_)
    );
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_filters_by_category_and_search(pool: PgPool) {
    let user = new_user(&pool, "carol").await;
    WardrobeItemRepo::create(&pool, user, &manual_item("Linen shirt", "top", "Uniqlo", "white"))
        .await
        .unwrap();
    WardrobeItemRepo::create(&pool, user, &manual_item("Runner", "shoes", "Nike", "black"))
        .await
        .unwrap();
    WardrobeItemRepo::create(&pool, user, &manual_item("Boot", "shoes", "Blundstone", "brown"))
        .await
        .unwrap();

    let shoes = WardrobeItemRepo::list(&pool, user, &WardrobeFilter::from_params(Some("shoes"), None, None))
        .await
        .unwrap();
    assert_eq!(shoes.len(), 2);

    let nike = WardrobeItemRepo::list(&pool, user, &WardrobeFilter::from_params(Some("all"), Some("nIkE"), None))
        .await
        .unwrap();
    assert_eq!(nike.len(), 1);
    assert_eq!(nike[0].title, "Runner");

    let by_color = WardrobeItemRepo::list(&pool, user, &WardrobeFilter::from_params(None, Some("WHITE"), None))
        .await
        .unwrap();
    assert_eq!(by_color.len(), 1);

    let by_title = WardrobeItemRepo::list(&pool, user, &WardrobeFilter::from_params(None, None, Some("title")))
        .await
        .unwrap();
    let titles: Vec<_> = by_title.iter().map(|w| w.title.as_str()).collect();
    assert_eq!(titles, vec!["Boot", "Linen shirt", "Runner"]);

    let by_brand_desc = WardrobeItemRepo::list(&pool, user, &WardrobeFilter::from_params(None, None, Some("-brand")))
        .await
        .unwrap();
    assert_eq!(by_brand_desc[0].brand, "Uniqlo");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_wildcards_match_literally(pool: PgPool) {
    let user = new_user(&pool, "dana").await;
    WardrobeItemRepo::create(&pool, user, &manual_item("100% wool", "outerwear", "", ""))
        .await
        .unwrap();
    WardrobeItemRepo::create(&pool, user, &manual_item("1000 wool", "outerwear", "", ""))
        .await
        .unwrap();

    let hits = WardrobeItemRepo::list(&pool, user, &WardrobeFilter::from_params(None, Some("100%"), None))
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "100% wool");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_category_counts_are_zero_filled(pool: PgPool) {
    let user = new_user(&pool, "erin").await;
    WardrobeItemRepo::create(&pool, user, &manual_item("Tee", "top", "", ""))
        .await
        .unwrap();
    WardrobeItemRepo::create(&pool, user, &manual_item("Tank", "top", "", ""))
        .await
        .unwrap();

    let counts = WardrobeItemRepo::category_counts(&pool, user).await.unwrap();
    assert_eq!(counts.len(), 7);
    let top = counts.iter().find(|c| c.category == "top").unwrap();
    assert_eq!(top.count, 2);
    let shoes = counts.iter().find(|c| c.category == "shoes").unwrap();
    assert_eq!(shoes.count, 0);
}

// ---------------------------------------------------------------------------
// Ownership
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_other_users_items_are_invisible(pool: PgPool) {
    let owner = new_user(&pool, "owner").await;
    let intruder = new_user(&pool, "intruder").await;
    let item = WardrobeItemRepo::create(&pool, owner, &manual_item("Coat", "outerwear", "", ""))
        .await
        .unwrap();

    assert!(WardrobeItemRepo::find_for_user(&pool, item.id, intruder).await.unwrap().is_none());
    assert!(WardrobeItemRepo::update(&pool, item.id, intruder, &manual_item("Mine", "top", "", ""))
        .await
        .unwrap()
        .is_none());
    assert!(!WardrobeItemRepo::delete(&pool, item.id, intruder).await.unwrap());
    assert!(WardrobeItemRepo::delete(&pool, item.id, owner).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_catalog_delete_keeps_wardrobe_copy(pool: PgPool) {
    let user = new_user(&pool, "fay").await;
    let item = CatalogItemRepo::create(
        &pool,
        &CreateCatalogItem {
            title: "Listing".to_string(),
            description: "From a seller".to_string(),
            seller_id: Some("seller-9".to_string()),
            item_id: Some("v1|123|0".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    WardrobeItemRepo::save_from_catalog(&pool, user, &item).await.unwrap();

    let deleted = CatalogItemRepo::delete_by_seller(&pool, "seller-9").await.unwrap();
    assert_eq!(deleted, 1);

    let items = WardrobeItemRepo::list(&pool, user, &WardrobeFilter::default()).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].catalog_item_id, None);
}
