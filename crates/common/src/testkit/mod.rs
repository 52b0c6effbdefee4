//! Lightweight harness for exercising the core operations against an
//! in-memory network, without external infrastructure.
//!
//! # Example
//!
//! ```rust,ignore
//! use common::testkit::TestNetwork;
//!
//! #[tokio::test]
//! async fn test_remap() -> anyhow::Result<()> {
//!     let net = TestNetwork::new();
//!     net.publish_www("blog.alice", [1; 32]);
//!     let outcome =
//!         common::remap::remap(&net.session(), "alice", "blog", "safe://blog.alice").await?;
//!     assert_eq!(outcome.version, 0);
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use crate::client::{
    Address, AppInfo, ClientError, Collection, CollectionError, Entry, FetchError, FileInfo,
    MemoryClient, NameAndTag, NetworkClient, Resource, ResourceKind, Scope, TYPE_TAG_WWW,
};
use crate::session::Session;
use crate::xor_url::{self, SHA3_256};

/// A seeded in-memory network plus session factory.
#[derive(Debug, Default, Clone)]
pub struct TestNetwork {
    pub client: MemoryClient,
}

impl TestNetwork {
    pub fn new() -> Self {
        Self {
            client: MemoryClient::new(),
        }
    }

    pub fn session(&self) -> Session {
        Session::new(Arc::new(self.client.clone()), AppInfo::default())
    }

    /// Session over an arbitrary client sharing this network's store.
    pub fn session_with(&self, client: impl NetworkClient + 'static) -> Session {
        Session::new(Arc::new(client), AppInfo::default())
    }

    /// Publish a web-content container under a host name.
    pub fn publish_www(&self, host: &str, address: Address) {
        self.client
            .put_resource(host, ResourceKind::Container, address, TYPE_TAG_WWW);
    }

    /// Publish a non-web resource (captured by value when remapped to).
    pub fn publish_store(&self, host: &str, address: Address, type_tag: u64) {
        self.client
            .put_resource(host, ResourceKind::VersionedStore, address, type_tag);
    }

    /// Bare XOR-URL locator for an address, with an optional type tag.
    pub fn xor_locator(address: Address, type_tag: Option<u64>) -> String {
        let text = xor_url::encode(SHA3_256, &address, "raw").expect("32-byte digest encodes");
        match type_tag {
            Some(tag) => format!("safe://{}:{}", text, tag),
            None => format!("safe://{}", text),
        }
    }
}

/// Decorator that simulates an external writer racing the caller: after
/// every successful `get`, the underlying entry is advanced one version
/// before the caller can write back.
#[derive(Debug, Clone)]
pub struct RacingWriter {
    inner: MemoryClient,
}

impl RacingWriter {
    pub fn new(inner: MemoryClient) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl NetworkClient for RacingWriter {
    async fn initialise(&self, app: &AppInfo) -> Result<(), ClientError> {
        self.inner.initialise(app).await
    }

    fn is_connected(&self) -> bool {
        self.inner.is_connected()
    }

    async fn gen_auth_uri(&self) -> Result<String, ClientError> {
        self.inner.gen_auth_uri().await
    }

    async fn authorise(&self, req_uri: &str) -> Result<String, ClientError> {
        self.inner.authorise(req_uri).await
    }

    async fn login_from_uri(&self, auth_uri: &str) -> Result<(), ClientError> {
        self.inner.login_from_uri(auth_uri).await
    }

    async fn fetch(&self, locator: &str) -> Result<Resource, FetchError> {
        self.inner.fetch(locator).await
    }

    async fn canonical_identity(&self, resource: &Resource) -> Result<NameAndTag, FetchError> {
        self.inner.canonical_identity(resource).await
    }

    async fn serialise(&self, resource: &Resource) -> Result<Vec<u8>, FetchError> {
        self.inner.serialise(resource).await
    }

    async fn file_info(
        &self,
        resource: &Resource,
        path: &str,
    ) -> Result<Option<FileInfo>, FetchError> {
        self.inner.file_info(resource, path).await
    }

    fn derive_collection_address(&self, name: &str) -> Address {
        self.inner.derive_collection_address(name)
    }

    async fn open_collection(
        &self,
        address: Address,
        type_tag: u64,
    ) -> Result<Box<dyn Collection>, ClientError> {
        let inner = self.inner.open_collection(address, type_tag).await?;
        Ok(Box::new(RacingCollection { inner }))
    }

    async fn request_write_permission(
        &self,
        address: Address,
        type_tag: u64,
        scopes: &[Scope],
    ) -> Result<(), ClientError> {
        self.inner
            .request_write_permission(address, type_tag, scopes)
            .await
    }
}

#[derive(Debug)]
struct RacingCollection {
    inner: Box<dyn Collection>,
}

#[async_trait]
impl Collection for RacingCollection {
    async fn get(&self, key: &str) -> Result<Option<Entry>, CollectionError> {
        let entry = self.inner.get(key).await?;
        if let Some(current) = &entry {
            // The interleaved writer lands between our read and write.
            self.inner
                .update(key, b"interloper", current.version + 1)
                .await?;
        }
        Ok(entry)
    }

    async fn insert(&self, key: &str, value: &[u8]) -> Result<(), CollectionError> {
        self.inner.insert(key, value).await
    }

    async fn update(&self, key: &str, value: &[u8], version: u64) -> Result<(), CollectionError> {
        self.inner.update(key, value, version).await
    }

    async fn keys(&self) -> Result<Vec<String>, CollectionError> {
        self.inner.keys().await
    }
}
