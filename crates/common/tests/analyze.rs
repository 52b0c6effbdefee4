//! Locator analysis against an in-memory network.

use common::client::FileInfo;
use common::locator::{analyze, FieldKind, LocatorError};
use common::testkit::TestNetwork;
use common::xor_url::{self, SHA3_256};

#[tokio::test]
async fn test_bare_identifier_reports_decoded_fields() {
    let net = TestNetwork::new();
    let session = net.session();

    let digest = [0xab; 32];
    let locator = TestNetwork::xor_locator(digest, Some(15002));

    let report = analyze(&session, &locator).await.unwrap();
    assert_eq!(report.value("Information about"), Some(locator.as_str()));
    assert_eq!(report.value("Targeted resource type"), Some("immutable blob"));
    assert_eq!(report.value("Type tag"), Some("15002"));
    assert_eq!(
        report.value("XoR name"),
        Some(format!("0x{}", "ab".repeat(32)).as_str())
    );
    assert_eq!(report.value("XoR name length"), Some("32"));
    assert_eq!(report.value("Content type"), Some("NONE"));
    assert_eq!(report.value("Hash type"), Some("sha3-256"));
    assert_eq!(report.value("CID version"), Some("1"));
}

#[tokio::test]
async fn test_bare_identifier_without_port_has_no_type_tag() {
    let net = TestNetwork::new();
    let locator = TestNetwork::xor_locator([1; 32], None);

    let report = analyze(&net.session(), &locator).await.unwrap();
    assert_eq!(report.value("Type tag"), Some("NONE"));
}

#[tokio::test]
async fn test_unreachable_name_still_reports_static_fields() {
    let net = TestNetwork::new();

    // Nothing published at 'alice'; fetch fails but analysis succeeds
    let report = analyze(&net.session(), "safe://blog.alice").await.unwrap();
    assert_eq!(report.value("Information about"), Some("safe://blog.alice"));
    assert_eq!(report.value("Targeted resource type"), None);
    assert_eq!(report.value("Type tag"), None);
}

#[tokio::test]
async fn test_named_lookup_reports_resolved_target() {
    let net = TestNetwork::new();
    net.publish_www("blog.alice", [2; 32]);

    let report = analyze(&net.session(), "safe://blog.alice").await.unwrap();
    assert_eq!(report.value("Targeted resource type"), Some("files container"));
    assert_eq!(report.value("Type tag"), Some("15002"));
    assert_eq!(
        report.value("XoR name"),
        Some(format!("0x{}", "02".repeat(32)).as_str())
    );
    assert_eq!(report.value("XoR name length"), Some("32"));

    let expected = format!(
        "safe://{}",
        xor_url::encode(SHA3_256, &[2; 32], "raw").unwrap()
    );
    assert_eq!(report.value("XoR-URL"), Some(expected.as_str()));

    let field = report
        .fields
        .iter()
        .find(|field| field.label == "XoR-URL")
        .unwrap();
    assert_eq!(field.kind, FieldKind::Locator);
}

#[tokio::test]
async fn test_path_reports_file_metadata() {
    let net = TestNetwork::new();
    net.publish_www("blog.alice", [2; 32]);
    net.client.put_file(
        "blog.alice",
        "index.html",
        FileInfo {
            size: 1024,
            version: 3,
            data_map: [9; 32],
            created: "2018-11-02T10:00:00Z".to_string(),
            modified: "2018-11-05T09:30:00Z".to_string(),
            user_metadata: "text/html".to_string(),
        },
    );

    let report = analyze(&net.session(), "safe://blog.alice/index.html")
        .await
        .unwrap();
    assert_eq!(report.value("URL path"), Some("/index.html"));
    assert_eq!(report.value("File size"), Some("1024 bytes"));
    assert_eq!(report.value("File's version"), Some("3"));
    assert_eq!(
        report.value("File's XoR name"),
        Some(format!("0x{}", "09".repeat(32)).as_str())
    );
    assert_eq!(report.value("File's user metadata"), Some("text/html"));
}

#[tokio::test]
async fn test_missing_file_omits_file_fields() {
    let net = TestNetwork::new();
    net.publish_www("blog.alice", [2; 32]);

    let report = analyze(&net.session(), "safe://blog.alice/missing.html")
        .await
        .unwrap();
    assert_eq!(report.value("URL path"), Some("/missing.html"));
    assert_eq!(report.value("File size"), None);
}

#[tokio::test]
async fn test_field_order_is_the_contract_order() {
    let net = TestNetwork::new();
    let locator = TestNetwork::xor_locator([7; 32], Some(1));

    let report = analyze(&net.session(), &format!("{}/sub/path", locator))
        .await
        .unwrap();
    assert_eq!(
        report.labels(),
        vec![
            "Information about",
            "Targeted resource type",
            "Type tag",
            "XoR name",
            "XoR name length",
            "Content type",
            "Hash type",
            "CID version",
            "URL path",
        ]
    );
}

#[tokio::test]
async fn test_invalid_locator_is_an_error() {
    let net = TestNetwork::new();
    let err = analyze(&net.session(), "blog.alice").await.unwrap_err();
    assert_eq!(err, LocatorError::InvalidLocator("blog.alice".to_string()));
}
