//! Runs against a disposable PostgreSQL container.
//!
//! These tests need a Docker daemon: `cargo test -p snip-storage -- --ignored`.

use std::time::Duration;

use snip_core::{ListRange, NewShortLink, ShortCode, ShortLink};
use snip_storage::{PostgresRepository, ReadRepository, Repository, StorageError};
use snip_test_infra::postgres::{PostgresConfig, PostgresServer};
use sqlx::postgres::PgPoolOptions;

struct Fixture {
    _postgres: PostgresServer,
    repo: PostgresRepository,
}

impl Fixture {
    async fn start() -> Self {
        let postgres = PostgresServer::new(PostgresConfig::builder().build())
            .await
            .expect("start postgres");
        let url = postgres.database_url().await.expect("postgres url");
        let pool = connect_with_retry(&url).await;

        let repo = PostgresRepository::new(pool);
        repo.ensure_schema().await.expect("create schema");

        Self {
            _postgres: postgres,
            repo,
        }
    }
}

async fn connect_with_retry(url: &str) -> sqlx::PgPool {
    let mut last_error = None;

    for _ in 0..20 {
        match PgPoolOptions::new().max_connections(5).connect(url).await {
            Ok(pool) => return pool,
            Err(err) => {
                last_error = Some(err);
                tokio::time::sleep(Duration::from_millis(500)).await;
            }
        }
    }

    panic!("failed to connect postgres: {last_error:?}");
}

fn new_link(source: &str, code: &str) -> NewShortLink {
    NewShortLink {
        source: source.to_string(),
        code: ShortCode::new_unchecked(code),
    }
}

#[tokio::test]
#[ignore = "requires docker"]
async fn sequence_starts_unset_and_advances() {
    let fixture = Fixture::start().await;

    assert_eq!(fixture.repo.last_id().await.unwrap(), None);

    let link = fixture
        .repo
        .insert_generated(new_link("http://google.com", "aaaaaaaaaa"))
        .await
        .unwrap();
    assert_eq!(link.id, 1);
    assert_eq!(fixture.repo.last_id().await.unwrap(), Some(1));

    assert_eq!(fixture.repo.next_id().await.unwrap(), 2);
    assert_eq!(fixture.repo.last_id().await.unwrap(), Some(2));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn insert_with_reserved_id_and_read_back() {
    let fixture = Fixture::start().await;

    let id = fixture.repo.next_id().await.unwrap();
    let link = new_link("https://example.com", "aaaaaaaaaa").with_id(id);
    fixture.repo.insert(&link).await.unwrap();

    assert_eq!(fixture.repo.get(id).await.unwrap(), Some(link.clone()));
    assert_eq!(
        fixture
            .repo
            .get_by_code(&ShortCode::new_unchecked("aaaaaaaaaa"))
            .await
            .unwrap(),
        Some(link)
    );
}

#[tokio::test]
#[ignore = "requires docker"]
async fn insert_conflicts_when_id_already_exists() {
    let fixture = Fixture::start().await;
    let link = new_link("https://one.example", "aaaaaaaaaa").with_id(1);

    fixture.repo.insert(&link).await.unwrap();
    let err = fixture.repo.insert(&link).await.unwrap_err();

    assert!(matches!(err, StorageError::Conflict(_)));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn update_and_delete_report_affected_rows() {
    let fixture = Fixture::start().await;
    let link = fixture
        .repo
        .insert_generated(new_link("https://old.example", "aaaaaaaaaa"))
        .await
        .unwrap();

    let changed = ShortLink {
        source: "https://new.example".to_string(),
        ..link.clone()
    };
    assert!(fixture.repo.update(&changed).await.unwrap());
    assert_eq!(fixture.repo.get(link.id).await.unwrap(), Some(changed));

    assert!(fixture.repo.delete(link.id).await.unwrap());
    assert!(fixture.repo.get(link.id).await.unwrap().is_none());
    assert!(!fixture.repo.delete(link.id).await.unwrap());

    let missing = ShortLink { id: 42, ..link };
    assert!(!fixture.repo.update(&missing).await.unwrap());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn list_orders_by_id_and_slices() {
    let fixture = Fixture::start().await;

    assert!(fixture
        .repo
        .list(ListRange::default())
        .await
        .unwrap()
        .is_empty());

    for i in 0..5 {
        fixture
            .repo
            .insert_generated(new_link(&format!("https://{i}.example"), "c"))
            .await
            .unwrap();
    }

    let page = fixture.repo.list(ListRange::new(1, 2)).await.unwrap();
    let ids: Vec<u64> = page.into_iter().map(|link| link.id).collect();
    assert_eq!(ids, vec![2, 3]);
}
