//! Integration tests for the article repository against a real database:
//! revision ledger, publish latch, view counting, uniqueness and links.

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use yemenpedia_core::article::ArticleStatus;
use yemenpedia_core::pagination::PageRequest;
use yemenpedia_core::roles::Role;
use yemenpedia_db::models::article::{ArticleFilter, CreateArticle, UpdateArticle};
use yemenpedia_db::models::category::CreateCategory;
use yemenpedia_db::models::user::{CreateUser, User};
use yemenpedia_db::repositories::{
    ArticleRepo, ArticleRevisionRepo, CategoryRepo, SearchRepo, UserRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool, username: &str, role: Role) -> User {
    let input = CreateUser {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password_hash: "not-a-real-hash".to_string(),
        display_name: username.to_string(),
        role,
    };
    UserRepo::create(pool, &input).await.unwrap()
}

fn new_article(title: &str, content: &str, status: ArticleStatus) -> CreateArticle {
    CreateArticle {
        title: title.to_string(),
        slug: None,
        content: content.to_string(),
        summary: Some(format!("ملخص {title}")),
        categories: Vec::new(),
        tags: vec!["تاريخ".to_string()],
        language: None,
        status: Some(status),
        featured: None,
        images: Vec::new(),
        references: Vec::new(),
        related_articles: Vec::new(),
    }
}

fn new_category(name: &str, name_ar: &str) -> CreateCategory {
    CreateCategory {
        name: name.to_string(),
        name_ar: name_ar.to_string(),
        slug: None,
        description: None,
        parent_id: None,
        icon: None,
        color: None,
        sort_order: None,
    }
}

fn content_update(content: &str) -> UpdateArticle {
    UpdateArticle {
        content: Some(content.to_string()),
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Revisions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_content_change_appends_revision_of_old_body(pool: PgPool) {
    let author = new_user(&pool, "author", Role::Editor).await;
    let editor = new_user(&pool, "editor", Role::Editor).await;
    let now = Utc::now();

    let article = ArticleRepo::create(
        &pool,
        &new_article("Sanaa", "X", ArticleStatus::Draft),
        "sanaa",
        author.id,
        now,
    )
    .await
    .unwrap();
    assert_eq!(
        ArticleRevisionRepo::count_for_article(&pool, article.id).await.unwrap(),
        0,
        "a new article has no revisions"
    );

    let later = now + Duration::minutes(5);
    let updated =
        ArticleRepo::update(&pool, article.id, &content_update("Y"), None, editor.id, later)
            .await
        .unwrap()
        .expect("article exists");

    assert_eq!(updated.content, "Y");
    assert_eq!(updated.last_edited_by, Some(editor.id));

    let revisions = ArticleRevisionRepo::list_for_article(&pool, article.id).await.unwrap();
    assert_eq!(revisions.len(), 1);
    let rev = &revisions[0];
    assert_eq!(rev.seq, 1);
    assert_eq!(rev.content, "X", "the revision holds the replaced body");
    assert_eq!(rev.summary, "");
    assert_eq!(rev.editor_id, Some(editor.id));
    assert_eq!(rev.editor_username.as_deref(), Some("editor"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_identical_or_missing_content_appends_nothing(pool: PgPool) {
    let author = new_user(&pool, "author", Role::Editor).await;
    let now = Utc::now();
    let article = ArticleRepo::create(
        &pool,
        &new_article("Aden", "body", ArticleStatus::Draft),
        "aden",
        author.id,
        now,
    )
    .await
    .unwrap();

    ArticleRepo::update(&pool, article.id, &content_update("body"), None, author.id, now)
        .await
        .unwrap();
    let title_only = UpdateArticle {
        title: Some("Aden City".to_string()),
        ..Default::default()
    };
    ArticleRepo::update(&pool, article.id, &title_only, None, author.id, now)
        .await
        .unwrap();

    assert_eq!(
        ArticleRevisionRepo::count_for_article(&pool, article.id).await.unwrap(),
        0
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_revision_sequence_is_dense_and_newest_first(pool: PgPool) {
    let author = new_user(&pool, "author", Role::Editor).await;
    let now = Utc::now();
    let article = ArticleRepo::create(
        &pool,
        &new_article("Taiz", "v0", ArticleStatus::Draft),
        "taiz",
        author.id,
        now,
    )
    .await
    .unwrap();

    for body in ["v1", "v2", "v3"] {
        ArticleRepo::update(&pool, article.id, &content_update(body), None, author.id, now)
            .await
            .unwrap();
    }

    let revisions = ArticleRevisionRepo::list_for_article(&pool, article.id).await.unwrap();
    let seqs: Vec<i32> = revisions.iter().map(|r| r.seq).collect();
    let bodies: Vec<&str> = revisions.iter().map(|r| r.content.as_str()).collect();
    assert_eq!(seqs, vec![3, 2, 1]);
    assert_eq!(bodies, vec!["v2", "v1", "v0"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_revisions_are_immutable(pool: PgPool) {
    let author = new_user(&pool, "author", Role::Editor).await;
    let now = Utc::now();
    let article = ArticleRepo::create(
        &pool,
        &new_article("Marib", "old", ArticleStatus::Draft),
        "marib",
        author.id,
        now,
    )
    .await
    .unwrap();
    ArticleRepo::update(&pool, article.id, &content_update("new"), None, author.id, now)
        .await
        .unwrap();

    let result =
        sqlx::query("UPDATE article_revisions SET content = 'tampered' WHERE article_id = $1")
        .bind(article.id)
        .execute(&pool)
        .await;
    assert!(result.is_err(), "revision rows must reject edits");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleting_editor_keeps_revision(pool: PgPool) {
    let author = new_user(&pool, "author", Role::Editor).await;
    let editor = new_user(&pool, "leaver", Role::Editor).await;
    let now = Utc::now();
    let article = ArticleRepo::create(
        &pool,
        &new_article("Ibb", "old", ArticleStatus::Draft),
        "ibb",
        author.id,
        now,
    )
    .await
    .unwrap();
    ArticleRepo::update(&pool, article.id, &content_update("new"), None, editor.id, now)
        .await
        .unwrap();

    assert!(UserRepo::delete(&pool, editor.id).await.unwrap());

    let revisions = ArticleRevisionRepo::list_for_article(&pool, article.id).await.unwrap();
    assert_eq!(revisions.len(), 1);
    assert_eq!(revisions[0].editor_id, None);
    assert_eq!(revisions[0].content, "old");
}

// ---------------------------------------------------------------------------
// Publish latch and views
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_published_at_is_set_once(pool: PgPool) {
    let author = new_user(&pool, "author", Role::Editor).await;
    let t0 = Utc::now();
    let article = ArticleRepo::create(
        &pool,
        &new_article("Hadramaut", "body", ArticleStatus::Draft),
        "hadramaut",
        author.id,
        t0,
    )
    .await
    .unwrap();
    assert_eq!(article.published_at, None);

    let publish = UpdateArticle {
        status: Some(ArticleStatus::Published),
        ..Default::default()
    };
    let t1 = t0 + Duration::hours(1);
    let published = ArticleRepo::update(&pool, article.id, &publish, None, author.id, t1)
        .await
        .unwrap()
        .unwrap();
    let first_published_at = published.published_at.expect("stamped on publish");

    let archive = UpdateArticle {
        status: Some(ArticleStatus::Archived),
        ..Default::default()
    };
    let t2 = t1 + Duration::hours(1);
    ArticleRepo::update(&pool, article.id, &archive, None, author.id, t2)
        .await
        .unwrap();
    let t3 = t2 + Duration::hours(1);
    let republished = ArticleRepo::update(&pool, article.id, &publish, None, author.id, t3)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(republished.published_at, Some(first_published_at));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_record_view_counts_every_read(pool: PgPool) {
    let author = new_user(&pool, "author", Role::Editor).await;
    let article = ArticleRepo::create(
        &pool,
        &new_article("Socotra", "island", ArticleStatus::Published),
        "socotra",
        author.id,
        Utc::now(),
    )
    .await
    .unwrap();

    let mut handles = Vec::new();
    for _ in 0..10 {
        let pool = pool.clone();
        handles.push(tokio::spawn(async move {
            ArticleRepo::record_view(&pool, "socotra").await.unwrap()
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let reloaded = ArticleRepo::find_by_id(&pool, article.id).await.unwrap().unwrap();
    assert_eq!(reloaded.views, 10);
    assert_eq!(reloaded.updated_at, article.updated_at, "views do not touch updated_at");

    assert!(ArticleRepo::record_view(&pool, "missing").await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Uniqueness, listing and links
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_slug_violates_unique_constraint(pool: PgPool) {
    let author = new_user(&pool, "author", Role::Editor).await;
    let now = Utc::now();
    let first = new_article("One", "a", ArticleStatus::Draft);
    ArticleRepo::create(&pool, &first, "same", author.id, now).await.unwrap();

    assert!(ArticleRepo::slug_or_title_taken(&pool, "same", "Other", None).await.unwrap());
    assert!(!ArticleRepo::slug_or_title_taken(&pool, "fresh", "Other", None).await.unwrap());

    let second = new_article("Two", "b", ArticleStatus::Draft);
    let err = ArticleRepo::create(&pool, &second, "same", author.id, now).await.unwrap_err();
    assert_matches!(err, sqlx::Error::Database(ref db) if db.code().as_deref() == Some("23505"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_filters_by_status_category_and_tag(pool: PgPool) {
    let author = new_user(&pool, "author", Role::Editor).await;
    let history = CategoryRepo::create(&pool, &new_category("History", "التاريخ"), "history")
        .await
        .unwrap();
    let now = Utc::now();

    let mut in_category = new_article("Saba", "kingdom", ArticleStatus::Published);
    in_category.categories = vec![history.id];
    ArticleRepo::create(&pool, &in_category, "saba", author.id, now).await.unwrap();
    let himyar = new_article("Himyar", "kingdom", ArticleStatus::Published);
    ArticleRepo::create(&pool, &himyar, "himyar", author.id, now).await.unwrap();
    let draft = new_article("Draft", "wip", ArticleStatus::Draft);
    ArticleRepo::create(&pool, &draft, "draft", author.id, now).await.unwrap();

    let published = ArticleFilter {
        status: ArticleStatus::Published,
        ..Default::default()
    };
    assert_eq!(ArticleRepo::count(&pool, &published).await.unwrap(), 2);
    let drafts = ArticleFilter {
        status: ArticleStatus::Draft,
        ..Default::default()
    };
    assert_eq!(ArticleRepo::count(&pool, &drafts).await.unwrap(), 1);

    let by_category = ArticleFilter {
        status: ArticleStatus::Published,
        category: Some(history.id),
        ..Default::default()
    };
    let rows = ArticleRepo::list(&pool, &by_category, PageRequest::default()).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].slug, "saba");

    let by_tag = ArticleFilter {
        status: ArticleStatus::Published,
        tag: Some("غير موجود".to_string()),
        ..Default::default()
    };
    assert_eq!(ArticleRepo::count(&pool, &by_tag).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleting_category_keeps_articles(pool: PgPool) {
    let author = new_user(&pool, "author", Role::Editor).await;
    let geo = CategoryRepo::create(&pool, &new_category("Geography", "الجغرافيا"), "geography")
        .await
        .unwrap();
    let mut input = new_article("Mountains", "high", ArticleStatus::Published);
    input.categories = vec![geo.id];
    let article = ArticleRepo::create(&pool, &input, "mountains", author.id, Utc::now())
        .await
        .unwrap();
    assert_eq!(CategoryRepo::refs_for_article(&pool, article.id).await.unwrap().len(), 1);

    assert!(CategoryRepo::delete(&pool, geo.id).await.unwrap());

    assert!(ArticleRepo::find_by_id(&pool, article.id).await.unwrap().is_some());
    assert!(CategoryRepo::refs_for_article(&pool, article.id).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_related_links_skip_self(pool: PgPool) {
    let author = new_user(&pool, "author", Role::Editor).await;
    let now = Utc::now();
    let coffee = new_article("Coffee", "mocha", ArticleStatus::Published);
    let other = ArticleRepo::create(&pool, &coffee, "coffee", author.id, now).await.unwrap();
    let trade = new_article("Trade", "ports", ArticleStatus::Published);
    let article = ArticleRepo::create(&pool, &trade, "trade", author.id, now).await.unwrap();

    let links = UpdateArticle {
        related_articles: Some(vec![other.id, article.id]),
        ..Default::default()
    };
    ArticleRepo::update(&pool, article.id, &links, None, author.id, now)
        .await
        .unwrap();

    let related = ArticleRepo::related_for(&pool, article.id).await.unwrap();
    assert_eq!(related.len(), 1);
    assert_eq!(related[0].id, other.id);
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_only_returns_published_matches(pool: PgPool) {
    let author = new_user(&pool, "author", Role::Editor).await;
    let now = Utc::now();
    let old_city = new_article("صنعاء القديمة", "مدينة تاريخية", ArticleStatus::Published);
    ArticleRepo::create(&pool, &old_city, "old-sanaa", author.id, now).await.unwrap();
    let new_city = new_article("صنعاء الجديدة", "مسودة", ArticleStatus::Draft);
    ArticleRepo::create(&pool, &new_city, "new-sanaa", author.id, now).await.unwrap();

    let results = SearchRepo::search(&pool, "صنعاء", None, None, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].slug, "old-sanaa");
    assert_eq!(SearchRepo::count(&pool, "صنعاء", None, None).await.unwrap(), 1);

    let suggestions = SearchRepo::suggest(&pool, "%صنع%", 5).await.unwrap();
    assert_eq!(suggestions.len(), 1);

    let context = SearchRepo::context_articles(&pool, "تاريخية", 3).await.unwrap();
    assert_eq!(context.len(), 1);
    assert_eq!(context[0].title, "صنعاء القديمة");
}
