//! Remap orchestration against an in-memory network.

use common::client::{ClientError, CollectionError, FetchError, NetworkClient, Scope, TYPE_TAG_DNS};
use common::remap::{remap, RemapError};
use common::testkit::{RacingWriter, TestNetwork};

#[tokio::test]
async fn test_first_remap_inserts_at_version_zero() -> anyhow::Result<()> {
    let net = TestNetwork::new();
    net.publish_www("blog.alice", [1; 32]);

    let outcome = remap(&net.session(), "alice", "blog", "safe://blog.alice").await?;
    assert!(outcome.inserted);
    assert_eq!(outcome.version, 0);

    // Web content is referenced by address
    let entry = net.client.entry("alice", "blog").unwrap();
    assert_eq!(entry.value, vec![1; 32]);
    assert_eq!(entry.version, 0);
    Ok(())
}

#[tokio::test]
async fn test_remap_existing_entry_updates_to_next_version() -> anyhow::Result<()> {
    let net = TestNetwork::new();
    net.publish_www("blog.alice", [1; 32]);
    net.publish_www("new-blog.alice", [2; 32]);
    let session = net.session();

    remap(&session, "alice", "blog", "safe://blog.alice").await?;
    let outcome = remap(&session, "alice", "blog", "safe://new-blog.alice").await?;
    assert!(!outcome.inserted);
    assert_eq!(outcome.version, 1);
    assert_eq!(net.client.entry("alice", "blog").unwrap().value, vec![2; 32]);
    Ok(())
}

#[tokio::test]
async fn test_remap_twice_is_idempotent_and_advances_twice() {
    let net = TestNetwork::new();
    net.publish_www("blog.alice", [1; 32]);
    let session = net.session();

    let first = remap(&session, "alice", "blog", "safe://blog.alice")
        .await
        .unwrap();
    let second = remap(&session, "alice", "blog", "safe://blog.alice")
        .await
        .unwrap();
    let third = remap(&session, "alice", "blog", "safe://blog.alice")
        .await
        .unwrap();

    // Same mapping, no interleaving writer: succeeds every time and
    // lands at initial + 2.
    assert_eq!(first.version, 0);
    assert_eq!(third.version, second.version + 1);
    assert_eq!(net.client.entry("alice", "blog").unwrap().version, 2);
}

#[tokio::test]
async fn test_non_web_target_is_captured_by_value() {
    let net = TestNetwork::new();
    net.publish_store("ledger.bob", [3; 32], 999);
    net.client
        .put_serialised("ledger.bob", b"serialized-ledger".to_vec());

    remap(&net.session(), "bob", "ledger", "safe://ledger.bob")
        .await
        .unwrap();

    let entry = net.client.entry("bob", "ledger").unwrap();
    assert_eq!(entry.value, b"serialized-ledger".to_vec());
}

#[tokio::test]
async fn test_bare_identifier_target_resolves_without_publication() {
    let net = TestNetwork::new();
    let locator = TestNetwork::xor_locator([4; 32], Some(15002));

    let outcome = remap(&net.session(), "alice", "cdn", &locator)
        .await
        .unwrap();
    assert!(outcome.inserted);
    assert_eq!(net.client.entry("alice", "cdn").unwrap().value, vec![4; 32]);
}

#[tokio::test]
async fn test_racing_writer_surfaces_version_conflict() {
    let net = TestNetwork::new();
    net.publish_www("blog.alice", [1; 32]);

    // Seed the entry through a well-behaved session first
    remap(&net.session(), "alice", "blog", "safe://blog.alice")
        .await
        .unwrap();

    let racing = net.session_with(RacingWriter::new(net.client.clone()));
    let failure = remap(&racing, "alice", "blog", "safe://blog.alice")
        .await
        .unwrap_err();
    assert_eq!(failure.sub_name, "blog");
    assert_eq!(failure.public_name, "alice");
    assert!(matches!(
        failure.reason,
        RemapError::Collection(CollectionError::VersionConflict { .. })
    ));

    // The interloper's write stands; ours never landed
    assert_eq!(net.client.entry("alice", "blog").unwrap().value, b"interloper".to_vec());
}

#[tokio::test]
async fn test_permission_denied_fails_whole_remap() {
    let net = TestNetwork::new();
    net.publish_www("blog.alice", [1; 32]);
    net.client.deny_permission(true);

    let failure = remap(&net.session(), "alice", "blog", "safe://blog.alice")
        .await
        .unwrap_err();
    assert!(matches!(
        failure.reason,
        RemapError::Client(ClientError::PermissionDenied(_))
    ));
    assert!(net.client.entry("alice", "blog").is_none());
}

#[tokio::test]
async fn test_unreachable_target_fails_remap() {
    let net = TestNetwork::new();

    let failure = remap(&net.session(), "alice", "blog", "safe://nowhere.nobody")
        .await
        .unwrap_err();
    assert!(matches!(
        failure.reason,
        RemapError::Fetch(FetchError::Unreachable(_))
    ));
}

#[tokio::test]
async fn test_permission_request_is_narrowly_scoped() {
    let net = TestNetwork::new();
    net.publish_www("blog.alice", [1; 32]);

    remap(&net.session(), "alice", "blog", "safe://blog.alice")
        .await
        .unwrap();

    let granted = net.client.granted();
    assert_eq!(granted.len(), 1);
    let (address, type_tag, scopes) = &granted[0];
    assert_eq!(
        *address,
        hex::encode(net.client.derive_collection_address("alice"))
    );
    assert_eq!(*type_tag, TYPE_TAG_DNS);
    assert_eq!(scopes, &vec![Scope::Insert, Scope::Update]);
}
