//! Postgres adapters against a throwaway container. Needs a Docker daemon:
//! `cargo test --test pg_repository_tests -- --ignored`

use std::time::Duration;

use chrono::Utc;
use sqlx::postgres::{PgPool, PgPoolOptions};
use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, GenericImage, ImageExt};
use uuid::Uuid;

use farmhub::dto::UpdateCommunityDto;
use farmhub::models::{Community, NewCommunity, NewUser, OtpCode, User, UserRole};
use farmhub::repository::{
    CommunityRepository, DuplicateEmail, OtpStore, PgCommunityRepository, PgOtpStore,
    PgUserRepository, UserRepository,
};

async fn postgres() -> (ContainerAsync<GenericImage>, PgPool) {
    let container = GenericImage::new("postgres", "16-alpine")
        .with_exposed_port(5432.tcp())
        .with_wait_for(WaitFor::message_on_stderr(
            "database system is ready to accept connections",
        ))
        .with_env_var("POSTGRES_HOST_AUTH_METHOD", "trust")
        .with_startup_timeout(Duration::from_secs(120))
        .start()
        .await
        .expect("Failed to start PostgreSQL container");

    let port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("PostgreSQL port");
    let url = format!("postgres://postgres@localhost:{port}/postgres?sslmode=disable");

    // The ready message is also logged by the init server, so retry briefly.
    let mut attempt = 0;
    let pool = loop {
        match PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&url)
            .await
        {
            Ok(pool) => break pool,
            Err(_) if attempt < 10 => {
                attempt += 1;
                tokio::time::sleep(Duration::from_millis(500)).await;
            }
            Err(e) => panic!("Failed to connect to PostgreSQL: {e}"),
        }
    };

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");
    (container, pool)
}

fn otp(email: &str, code: &str) -> OtpCode {
    OtpCode::new(
        email.to_string(),
        code.to_string(),
        Utc::now() + chrono::Duration::minutes(5),
    )
}

fn user(email: &str) -> User {
    User::new(NewUser {
        name: "Ravi Grower".to_string(),
        email: email.to_string(),
        password_hash: "not-a-real-hash".to_string(),
        role: UserRole::User,
        phone: "+15555550142".to_string(),
    })
}

#[tokio::test]
#[ignore = "needs Docker"]
async fn otp_consume_succeeds_once_and_only_for_checked_hash() {
    let (_container, pool) = postgres().await;
    let store = PgOtpStore::new(pool);
    store.upsert(&otp("a@x.com", "hash-a")).await.unwrap();

    assert!(!store.consume("a@x.com", "hash-b").await.unwrap());

    let (first, second) = tokio::join!(
        store.consume("a@x.com", "hash-a"),
        store.consume("a@x.com", "hash-a"),
    );
    assert!(first.unwrap() ^ second.unwrap());
    assert!(store.find("a@x.com").await.unwrap().unwrap().consumed);
}

#[tokio::test]
#[ignore = "needs Docker"]
async fn otp_upsert_resets_attempts_and_ignores_stale_writes() {
    let (_container, pool) = postgres().await;
    let store = PgOtpStore::new(pool);
    store.upsert(&otp("a@x.com", "hash-a")).await.unwrap();

    assert_eq!(store.record_failed_attempt("a@x.com", "hash-a").await.unwrap(), 1);
    assert_eq!(store.record_failed_attempt("a@x.com", "hash-a").await.unwrap(), 2);
    assert!(store.consume("a@x.com", "hash-a").await.unwrap());

    store.upsert(&otp("a@x.com", "hash-b")).await.unwrap();
    let record = store.find("a@x.com").await.unwrap().unwrap();
    assert_eq!(record.code, "hash-b");
    assert_eq!(record.attempts, 0);
    assert!(!record.consumed);

    assert_eq!(store.record_failed_attempt("a@x.com", "hash-a").await.unwrap(), 0);
    store.delete("a@x.com", "hash-a").await.unwrap();
    assert!(store.find("a@x.com").await.unwrap().is_some());

    store.delete("a@x.com", "hash-b").await.unwrap();
    assert!(store.find("a@x.com").await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "needs Docker"]
async fn duplicate_user_email_is_reported_as_such() {
    let (_container, pool) = postgres().await;
    let users = PgUserRepository::new(pool);

    let stored = users.insert(&user("ravi@farm.io")).await.unwrap();
    assert_eq!(stored.email, "ravi@farm.io");
    assert!(!stored.is_verified);

    let err = users.insert(&user("ravi@farm.io")).await.unwrap_err();
    assert!(err.is::<DuplicateEmail>());
}

#[tokio::test]
#[ignore = "needs Docker"]
async fn set_role_and_verification_update_flags() {
    let (_container, pool) = postgres().await;
    let users = PgUserRepository::new(pool);
    let stored = users.insert(&user("ravi@farm.io")).await.unwrap();

    let farmer = users
        .set_role(stored.id, UserRole::Farmer)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(farmer.role, UserRole::Farmer);
    assert!(farmer.is_farmer);
    assert!(!farmer.is_admin);

    let admin = users
        .set_role(stored.id, UserRole::Admin)
        .await
        .unwrap()
        .unwrap();
    assert!(admin.is_admin);
    assert!(!admin.is_farmer);

    assert!(users
        .set_role(Uuid::new_v4(), UserRole::User)
        .await
        .unwrap()
        .is_none());

    let verified = users.mark_verified("ravi@farm.io").await.unwrap().unwrap();
    assert!(verified.is_verified);
    assert_eq!(
        users.find_by_email("ravi@farm.io").await.unwrap().unwrap().id,
        stored.id
    );
}

#[tokio::test]
#[ignore = "needs Docker"]
async fn community_update_is_partial_and_image_can_be_cleared() {
    let (_container, pool) = postgres().await;
    let communities = PgCommunityRepository::new(pool);
    let community = communities
        .insert(&Community::new(NewCommunity {
            name: "Orchard Keepers".to_string(),
            description: "Fruit trees in dry climates".to_string(),
            created_by: Uuid::new_v4().to_string(),
            image_url: Some("https://img.example.com/orchard.png".to_string()),
            categories: vec!["fruit".to_string()],
        }))
        .await
        .unwrap();
    assert_eq!(community.member_count, 1);

    let renamed = communities
        .update(
            community.id,
            &UpdateCommunityDto {
                name: Some("Orchard Growers".to_string()),
                ..UpdateCommunityDto::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(renamed.name, "Orchard Growers");
    assert_eq!(renamed.description, community.description);
    assert_eq!(renamed.image_url, community.image_url);
    assert_eq!(renamed.categories, community.categories);

    let cleared = communities
        .update(
            community.id,
            &UpdateCommunityDto {
                image_url: Some(None),
                ..UpdateCommunityDto::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cleared.image_url, None);
    assert_eq!(cleared.name, "Orchard Growers");

    assert_eq!(communities.list().await.unwrap().len(), 1);
    assert!(communities.delete(community.id).await.unwrap());
    assert!(!communities.delete(community.id).await.unwrap());
    assert!(communities.find(community.id).await.unwrap().is_none());
}
