//! Integration tests for forum threads, posts, likes, saves, and IP bans.

use chrono::{Duration, Utc};
use best_dressed_db::models::forum::{CreatePost, CreateThread};
use best_dressed_db::models::user::CreateUser;
use best_dressed_db::repositories::{BannedIpRepo, PostRepo, ThreadRepo, UserRepo};
use sqlx::PgPool;

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

fn thread(title: &str) -> CreateThread {
    CreateThread {
        title: title.to_string(),
        content: format!("{title} body"),
        outfit_id: None,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_thread_listing_counts(pool: PgPool) {
    let alice = new_user(&pool, "alice").await;
    let bob = new_user(&pool, "bob").await;
    let first = ThreadRepo::create(&pool, alice, &thread("First")).await.unwrap();
    ThreadRepo::create(&pool, bob, &thread("Second")).await.unwrap();

    PostRepo::create(&pool, first.id, bob, &CreatePost { content: "Nice".to_string() })
        .await
        .unwrap();
    let like = ThreadRepo::toggle_like(&pool, first.id, bob).await.unwrap();
    assert!(like.liked);
    assert_eq!(like.like_count, 1);
    assert!(ThreadRepo::toggle_save(&pool, first.id, bob).await.unwrap());

    let listed = ThreadRepo::list(&pool, Some(bob)).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].thread.title, "Second");
    let first_summary = &listed[1];
    assert_eq!(first_summary.author, "alice");
    assert_eq!(first_summary.reply_count, 1);
    assert_eq!(first_summary.like_count, 1);
    assert!(first_summary.is_saved);

    let anonymous = ThreadRepo::list(&pool, None).await.unwrap();
    assert!(anonymous.iter().all(|t| !t.is_saved));

    let saved = ThreadRepo::list_saved(&pool, bob).await.unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].thread.id, first.id);

    let unliked = ThreadRepo::toggle_like(&pool, first.id, bob).await.unwrap();
    assert!(!unliked.liked);
    assert_eq!(unliked.like_count, 0);
    assert!(!ThreadRepo::toggle_save(&pool, first.id, bob).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_posts_are_oldest_first_and_cascade(pool: PgPool) {
    let alice = new_user(&pool, "alice").await;
    let t = ThreadRepo::create(&pool, alice, &thread("Topic")).await.unwrap();
    for content in ["one", "two", "three"] {
        PostRepo::create(&pool, t.id, alice, &CreatePost { content: content.to_string() })
            .await
            .unwrap();
    }

    let posts = PostRepo::list_for_thread(&pool, t.id).await.unwrap();
    let contents: Vec<_> = posts.iter().map(|p| p.content.as_str()).collect();
    assert_eq!(contents, vec!["one", "two", "three"]);

    let edited = PostRepo::update(&pool, posts[0].id, "uno").await.unwrap().unwrap();
    assert_eq!(edited.content, "uno");
    let liked = PostRepo::toggle_like(&pool, posts[0].id, alice).await.unwrap();
    assert_eq!(liked.like_count, 1);

    assert!(ThreadRepo::delete(&pool, t.id).await.unwrap());
    assert!(PostRepo::find_by_id(&pool, posts[0].id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ban_activity(pool: PgPool) {
    let now = Utc::now();
    BannedIpRepo::ban(&pool, "203.0.113.7", Some("spam"), None).await.unwrap();
    BannedIpRepo::ban(&pool, "203.0.113.8", None, Some(now - Duration::hours(1)))
        .await
        .unwrap();
    BannedIpRepo::ban(&pool, "203.0.113.9", None, Some(now + Duration::hours(1)))
        .await
        .unwrap();

    let active = BannedIpRepo::find_active(&pool, "203.0.113.7", now).await.unwrap().unwrap();
    assert_eq!(active.reason.as_deref(), Some("spam"));
    assert!(BannedIpRepo::find_active(&pool, "203.0.113.8", now).await.unwrap().is_none());
    assert!(BannedIpRepo::find_active(&pool, "203.0.113.9", now).await.unwrap().is_some());
    assert!(BannedIpRepo::find_active(&pool, "198.51.100.1", now).await.unwrap().is_none());

    assert!(BannedIpRepo::lift(&pool, "203.0.113.7").await.unwrap());
    assert!(BannedIpRepo::find_active(&pool, "203.0.113.7", now).await.unwrap().is_none());
}
