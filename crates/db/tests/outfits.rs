//! Integration tests for the outfit query engine and outfit writes.

use assert_matches::assert_matches;
use best_dressed_core::outfit::OutfitFilter;
use best_dressed_db::models::outfit::{CreateOutfit, OutfitWrite};
use best_dressed_db::models::user::CreateUser;
use best_dressed_db::models::wardrobe_item::CreateWardrobeItem;
use best_dressed_db::repositories::{OutfitRepo, UserRepo, WardrobeItemRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool, username: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: String::new(),
            password_hash: "x".to_string(),
            is_staff: false,
        },
    )
    .await
    .unwrap()
    .id
}

async fn new_items(pool: &PgPool, user_id: i64, count: usize) -> Vec<i64> {
    let mut ids = Vec::new();
    for i in 0..count {
        let item = WardrobeItemRepo::create(
            pool,
            user_id,
            &CreateWardrobeItem {
                title: format!("Item {i}"),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        ids.push(item.id);
    }
    ids
}

fn outfit(name: &str, occasion: &str, season: &str, items: &[i64]) -> CreateOutfit {
    CreateOutfit {
        name: name.to_string(),
        occasion: occasion.to_string(),
        season: season.to_string(),
        items: items.to_vec(),
        ..Default::default()
    }
}

async fn create(pool: &PgPool, user_id: i64, input: &CreateOutfit) -> i64 {
    match OutfitRepo::create(pool, user_id, input).await.unwrap() {
        OutfitWrite::Saved(o) => o.outfit.id,
        OutfitWrite::NameTaken => panic!("name unexpectedly taken: {}", input.name),
    }
}

async fn backdate(pool: &PgPool, outfit_id: i64, days: i64) {
    sqlx::query("UPDATE outfits SET created_at = NOW() - make_interval(days => $2::INT) WHERE id = $1")
        .bind(outfit_id)
        .bind(days as i32)
        .execute(pool)
        .await
        .unwrap();
}

fn collection(name: &str) -> OutfitFilter {
    OutfitFilter::from_params(Some(name), None, None, None, None, None)
}

fn names(list: &[best_dressed_db::models::outfit::OutfitWithItems]) -> Vec<&str> {
    list.iter().map(|o| o.outfit.name.as_str()).collect()
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_links_items_and_rejects_duplicate_name(pool: PgPool) {
    let user = new_user(&pool, "alice").await;
    let items = new_items(&pool, user, 2).await;

    let written = OutfitRepo::create(&pool, user, &outfit("Brunch", "casual", "summer", &items))
        .await
        .unwrap();
    assert_matches!(written, OutfitWrite::Saved(ref o) if o.item_count == 2 && o.items.len() == 2);

    let again = OutfitRepo::create(&pool, user, &outfit("Brunch", "", "", &[]))
        .await
        .unwrap();
    assert_matches!(again, OutfitWrite::NameTaken);
    assert_eq!(OutfitRepo::count_for_user(&pool, user).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_replaces_items_and_guards_name(pool: PgPool) {
    let user = new_user(&pool, "bob").await;
    let items = new_items(&pool, user, 3).await;
    let first = create(&pool, user, &outfit("Office", "business", "", &items[..2])).await;
    create(&pool, user, &outfit("Gym", "athletic", "", &[])).await;

    let renamed = OutfitRepo::update(&pool, first, user, &outfit("Gym", "business", "", &[]))
        .await
        .unwrap();
    assert_matches!(renamed, Some(OutfitWrite::NameTaken));

    let updated = OutfitRepo::update(&pool, first, user, &outfit("Office 2", "formal", "fall", &items[2..]))
        .await
        .unwrap();
    assert_matches!(updated, Some(OutfitWrite::Saved(ref o)) if o.item_count == 1 && o.outfit.season == "fall");

    let other = new_user(&pool, "mallory").await;
    let foreign = OutfitRepo::update(&pool, first, other, &outfit("Stolen", "", "", &[]))
        .await
        .unwrap();
    assert!(foreign.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_renames_to_same_name(pool: PgPool) {
    let user = new_user(&pool, "carol").await;
    let first = create(&pool, user, &outfit("Picnic", "", "", &[])).await;
    let second = create(&pool, user, &outfit("Wedding", "", "", &[])).await;
    let target = outfit("Weekend", "casual", "", &[]);

    let (a, b) = tokio::join!(
        OutfitRepo::update(&pool, first, user, &target),
        OutfitRepo::update(&pool, second, user, &target),
    );
    let outcomes = [a.unwrap(), b.unwrap()];
    let saved = outcomes
        .iter()
        .filter(|o| matches!(o, Some(OutfitWrite::Saved(_))))
        .count();
    let taken = outcomes
        .iter()
        .filter(|o| matches!(o, Some(OutfitWrite::NameTaken)))
        .count();
    assert_eq!((saved, taken), (1, 1));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_toggle_favorite(pool: PgPool) {
    let user = new_user(&pool, "carol").await;
    let id = create(&pool, user, &outfit("Date night", "date", "", &[])).await;

    assert_eq!(OutfitRepo::toggle_favorite(&pool, id, user).await.unwrap(), Some(true));
    assert_eq!(OutfitRepo::toggle_favorite(&pool, id, user).await.unwrap(), Some(false));

    let other = new_user(&pool, "eve").await;
    assert_eq!(OutfitRepo::toggle_favorite(&pool, id, other).await.unwrap(), None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_copies_items_and_resets_favorite(pool: PgPool) {
    let user = new_user(&pool, "dave").await;
    let items = new_items(&pool, user, 2).await;
    let mut input = outfit("Weekend", "casual", "spring", &items);
    input.is_favorite = true;
    let id = create(&pool, user, &input).await;

    let copy = OutfitRepo::duplicate(&pool, id, user).await.unwrap().unwrap();
    assert_eq!(copy.outfit.name, "Weekend (Copy)");
    assert!(!copy.outfit.is_favorite);
    assert_eq!(copy.outfit.occasion, "casual");
    assert_eq!(copy.item_count, 2);
    assert_ne!(copy.outfit.id, id);

    let second = OutfitRepo::duplicate(&pool, id, user).await.unwrap().unwrap();
    assert_eq!(second.outfit.name, "Weekend (Copy 2)");

    let other = new_user(&pool, "trudy").await;
    assert!(OutfitRepo::duplicate(&pool, id, other).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_incomplete_is_fewer_than_three_items(pool: PgPool) {
    let user = new_user(&pool, "frank").await;
    let items = new_items(&pool, user, 3).await;
    create(&pool, user, &outfit("Empty", "", "", &[])).await;
    create(&pool, user, &outfit("Two", "", "", &items[..2])).await;
    create(&pool, user, &outfit("Three", "", "", &items)).await;

    let list = OutfitRepo::list(&pool, user, &collection("incomplete")).await.unwrap();
    let mut got = names(&list);
    got.sort();
    assert_eq!(got, vec!["Empty", "Two"]);

    // Search narrows the listing; the collection rule is unchanged.
    let filter = OutfitFilter::from_params(Some("incomplete"), None, None, None, Some("two"), Some("-name"));
    let list = OutfitRepo::list(&pool, user, &filter).await.unwrap();
    assert_eq!(names(&list), vec!["Two"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_recent_window_is_thirty_days(pool: PgPool) {
    let user = new_user(&pool, "gina").await;
    create(&pool, user, &outfit("Now", "", "", &[])).await;
    let old = create(&pool, user, &outfit("Old", "", "", &[])).await;
    let recentish = create(&pool, user, &outfit("Recentish", "", "", &[])).await;
    backdate(&pool, old, 31).await;
    backdate(&pool, recentish, 29).await;

    let list = OutfitRepo::list(&pool, user, &collection("recent")).await.unwrap();
    let mut got = names(&list);
    got.sort();
    assert_eq!(got, vec!["Now", "Recentish"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_occasion_and_season_collections(pool: PgPool) {
    let user = new_user(&pool, "hank").await;
    create(&pool, user, &outfit("Suit", "business", "winter", &[])).await;
    create(&pool, user, &outfit("Gown", "formal", "", &[])).await;
    create(&pool, user, &outfit("Picnic", "date", "summer", &[])).await;

    assert_eq!(names(&OutfitRepo::list(&pool, user, &collection("work")).await.unwrap()), vec!["Suit"]);
    assert_eq!(names(&OutfitRepo::list(&pool, user, &collection("formal")).await.unwrap()), vec!["Gown"]);
    assert_eq!(names(&OutfitRepo::list(&pool, user, &collection("date")).await.unwrap()), vec!["Picnic"]);
    assert_eq!(names(&OutfitRepo::list(&pool, user, &collection("summer")).await.unwrap()), vec!["Picnic"]);
    assert_eq!(names(&OutfitRepo::list(&pool, user, &collection("winter")).await.unwrap()), vec!["Suit"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_collection_counts_ignore_search(pool: PgPool) {
    let user = new_user(&pool, "iris").await;
    let items = new_items(&pool, user, 3).await;
    let mut fav = outfit("Fav", "casual", "summer", &items);
    fav.is_favorite = true;
    create(&pool, user, &fav).await;
    create(&pool, user, &outfit("Work", "business", "winter", &[])).await;

    let other = new_user(&pool, "jack").await;
    create(&pool, other, &outfit("Not mine", "casual", "summer", &[])).await;

    let counts = OutfitRepo::collection_counts(&pool, user).await.unwrap();
    assert_eq!(counts.len(), 9);
    assert_eq!(counts["favorites"], 1);
    assert_eq!(counts["summer"], 1);
    assert_eq!(counts["winter"], 1);
    assert_eq!(counts["casual"], 1);
    assert_eq!(counts["work"], 1);
    assert_eq!(counts["date"], 0);
    assert_eq!(counts["formal"], 0);
    assert_eq!(counts["recent"], 2);
    assert_eq!(counts["incomplete"], 1);
}

// ---------------------------------------------------------------------------
// Filters and sorting
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_triple_filters_apply_without_collection(pool: PgPool) {
    let user = new_user(&pool, "kate").await;
    let mut a = outfit("A", "casual", "summer", &[]);
    a.is_favorite = true;
    create(&pool, user, &a).await;
    create(&pool, user, &outfit("B", "casual", "winter", &[])).await;
    create(&pool, user, &outfit("C", "formal", "summer", &[])).await;

    let filter = OutfitFilter::from_params(None, Some("casual"), None, None, None, Some("name"));
    assert_eq!(names(&OutfitRepo::list(&pool, user, &filter).await.unwrap()), vec!["A", "B"]);

    let filter = OutfitFilter::from_params(None, Some("casual"), Some("summer"), None, None, None);
    assert_eq!(names(&OutfitRepo::list(&pool, user, &filter).await.unwrap()), vec!["A"]);

    let filter = OutfitFilter::from_params(None, None, None, Some("true"), None, None);
    assert_eq!(names(&OutfitRepo::list(&pool, user, &filter).await.unwrap()), vec!["A"]);

    // A collection wins over the triple.
    let filter = OutfitFilter::from_params(Some("formal"), Some("casual"), None, Some("true"), None, None);
    assert_eq!(names(&OutfitRepo::list(&pool, user, &filter).await.unwrap()), vec!["C"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_covers_name_description_occasion_season(pool: PgPool) {
    let user = new_user(&pool, "liam").await;
    let mut described = outfit("Plain", "", "", &[]);
    described.description = "Great for the BEACH".to_string();
    create(&pool, user, &described).await;
    create(&pool, user, &outfit("Beach day", "", "", &[])).await;
    create(&pool, user, &outfit("Party", "night_out", "", &[])).await;
    create(&pool, user, &outfit("Snow", "", "winter", &[])).await;

    let search = |term: &'static str| OutfitFilter::from_params(None, None, None, None, Some(term), Some("name"));
    assert_eq!(names(&OutfitRepo::list(&pool, user, &search("beach")).await.unwrap()), vec!["Beach day", "Plain"]);
    assert_eq!(names(&OutfitRepo::list(&pool, user, &search("NIGHT")).await.unwrap()), vec!["Party"]);
    assert_eq!(names(&OutfitRepo::list(&pool, user, &search("wint")).await.unwrap()), vec!["Snow"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_name_sort_reverses(pool: PgPool) {
    let user = new_user(&pool, "mia").await;
    for name in ["Bravo", "Alpha", "Charlie"] {
        create(&pool, user, &outfit(name, "", "", &[])).await;
    }

    let asc = OutfitRepo::list(&pool, user, &OutfitFilter::from_params(None, None, None, None, None, Some("name")))
        .await
        .unwrap();
    let desc = OutfitRepo::list(&pool, user, &OutfitFilter::from_params(None, None, None, None, None, Some("-name")))
        .await
        .unwrap();

    let mut reversed = names(&desc);
    reversed.reverse();
    assert_eq!(names(&asc), vec!["Alpha", "Bravo", "Charlie"]);
    assert_eq!(names(&asc), reversed);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_sort_defaults_to_newest_first(pool: PgPool) {
    let user = new_user(&pool, "noah").await;
    let older = create(&pool, user, &outfit("Older", "", "", &[])).await;
    create(&pool, user, &outfit("Newer", "", "", &[])).await;
    backdate(&pool, older, 2).await;

    let filter = OutfitFilter::from_params(None, None, None, None, None, Some("price; DROP TABLE outfits"));
    let list = OutfitRepo::list(&pool, user, &filter).await.unwrap();
    assert_eq!(names(&list), vec!["Newer", "Older"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_item_count_sort_and_eager_items(pool: PgPool) {
    let user = new_user(&pool, "olga").await;
    let items = new_items(&pool, user, 3).await;
    create(&pool, user, &outfit("One", "", "", &items[..1])).await;
    create(&pool, user, &outfit("Three", "", "", &items)).await;
    create(&pool, user, &outfit("None", "", "", &[])).await;

    let filter = OutfitFilter::from_params(None, None, None, None, None, Some("-item_count"));
    let list = OutfitRepo::list(&pool, user, &filter).await.unwrap();
    assert_eq!(names(&list), vec!["Three", "One", "None"]);
    assert_eq!(list[0].items.len(), 3);
    assert_eq!(list[1].items.len(), 1);
    assert!(list[2].items.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_dashboard_stats(pool: PgPool) {
    let user = new_user(&pool, "pia").await;
    create(&pool, user, &outfit("A", "casual", "summer", &[])).await;
    create(&pool, user, &outfit("B", "casual", "", &[])).await;
    create(&pool, user, &outfit("C", "formal", "summer", &[])).await;

    let seasons = OutfitRepo::season_stats(&pool, user).await.unwrap();
    assert_eq!(seasons.len(), 1);
    assert_eq!((seasons[0].key.as_str(), seasons[0].count), ("summer", 2));

    let occasions = OutfitRepo::occasion_stats(&pool, user).await.unwrap();
    assert_eq!((occasions[0].key.as_str(), occasions[0].count), ("casual", 2));
    assert_eq!((occasions[1].key.as_str(), occasions[1].count), ("formal", 1));

    assert_eq!(OutfitRepo::recent(&pool, user, 2).await.unwrap().len(), 2);
    assert!(OutfitRepo::random(&pool, user).await.unwrap().is_some());
}
