//! Collaborator boundary for the external network client.
//!
//! Authentication, fetch, canonical identity, hashing and versioned
//! entry mutation are all delegated to a pre-existing client behind
//! these traits. The crate
//! ships [`MemoryClient`], an in-memory (optionally file-persisted)
//! implementation used by the CLI and tests; a real network backend
//! implements the same seams.

mod memory;

pub use memory::MemoryClient;

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Type tag of the public-name (DNS-like) entry collections.
pub const TYPE_TAG_DNS: u64 = 15001;
/// Type tag of web-content containers; only these are referenced by
/// address when remapping, anything else is captured by value.
pub const TYPE_TAG_WWW: u64 = 15002;

/// A network address: a 32-byte XoR name.
pub type Address = [u8; 32];

/// Descriptor the client presents to the network when authorising.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppInfo {
    pub id: String,
    pub name: String,
    pub vendor: String,
}

impl Default for AppInfo {
    fn default() -> Self {
        Self {
            id: "net.safeurl.app".to_string(),
            name: "safeurl".to_string(),
            vendor: "safeurl contributors".to_string(),
        }
    }
}

/// Shape of a fetched remote resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceKind {
    /// A files container
    Container,
    /// A linked-data (RDF-style) resource
    LinkedData,
    /// A versioned key-value store
    VersionedStore,
    /// An immutable blob
    ImmutableBlob,
    Unknown,
}

impl ResourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::Container => "files container",
            ResourceKind::LinkedData => "linked-data resource",
            ResourceKind::VersionedStore => "versioned store",
            ResourceKind::ImmutableBlob => "immutable blob",
            ResourceKind::Unknown => "UNKNOWN",
        }
    }
}

/// Result of fetching a locator. Consumed read-only; request-scoped.
#[derive(Debug, Clone)]
pub struct Resource {
    pub kind: ResourceKind,
    /// The locator the resource was fetched with
    pub locator: String,
    /// Sub-path component of the locator, if any
    pub path: Option<String>,
}

/// Canonical identity of a resource on the network.
#[derive(Debug, Clone)]
pub struct NameAndTag {
    pub address: Address,
    pub type_tag: u64,
    /// Canonical XOR-URL locator for the resource
    pub xor_url: String,
}

/// One entry of a versioned collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub value: Vec<u8>,
    pub version: u64,
}

/// File-level metadata for a path inside a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub size: u64,
    pub version: u64,
    /// XoR name of the file's data map
    pub data_map: Address,
    pub created: String,
    pub modified: String,
    pub user_metadata: String,
}

/// Write scopes for a permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scope {
    Insert,
    Update,
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("not connected to the network")]
    Disconnected,
    #[error("authorisation denied: {0}")]
    AuthDenied(String),
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("client error: {0}")]
    Other(String),
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("unreachable: {0}")]
    Unreachable(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CollectionError {
    /// The expected version does not follow the stored one; another
    /// writer advanced the entry between read and write.
    #[error("version conflict on '{key}': store at {stored}, write asked for {asked}")]
    VersionConflict { key: String, stored: u64, asked: u64 },
    /// Insert of a key that already exists
    #[error("entry '{0}' already exists")]
    EntryExists(String),
    /// Update of a key that does not exist
    #[error("entry '{0}' does not exist")]
    NoSuchEntry(String),
    #[error("store error: {0}")]
    Store(String),
}

/// The external network client.
///
/// Every method is a suspending call awaited in sequence; no two core
/// operations run concurrently over one client, so implementations need
/// no ordering guarantees beyond per-call atomicity.
#[async_trait]
pub trait NetworkClient: Send + Sync + Debug {
    /// Register the app descriptor with the network client.
    async fn initialise(&self, app: &AppInfo) -> Result<(), ClientError>;

    /// Whether the underlying session currently reports connected.
    fn is_connected(&self) -> bool;

    /// Generate an authorisation request URI for the app.
    async fn gen_auth_uri(&self) -> Result<String, ClientError>;

    /// Exchange an authorisation request URI for an approved connection
    /// URI (out of band in the real client).
    async fn authorise(&self, req_uri: &str) -> Result<String, ClientError>;

    /// Complete login with an approved connection URI.
    async fn login_from_uri(&self, auth_uri: &str) -> Result<(), ClientError>;

    /// Fetch the resource a locator targets.
    async fn fetch(&self, locator: &str) -> Result<Resource, FetchError>;

    /// The canonical `{address, type tag}` identity of a resource.
    async fn canonical_identity(&self, resource: &Resource) -> Result<NameAndTag, FetchError>;

    /// Serialized snapshot of a resource's content, for capture-by-value.
    async fn serialise(&self, resource: &Resource) -> Result<Vec<u8>, FetchError>;

    /// File metadata for a path inside a container resource, when the
    /// container can serve it.
    async fn file_info(
        &self,
        resource: &Resource,
        path: &str,
    ) -> Result<Option<FileInfo>, FetchError>;

    /// One-way hash of a public name to its collection address.
    fn derive_collection_address(&self, name: &str) -> Address;

    /// Open a handle on the versioned entry collection at an address.
    async fn open_collection(
        &self,
        address: Address,
        type_tag: u64,
    ) -> Result<Box<dyn Collection>, ClientError>;

    /// Request elevated write permission, scoped to exactly one
    /// collection identity.
    async fn request_write_permission(
        &self,
        address: Address,
        type_tag: u64,
        scopes: &[Scope],
    ) -> Result<(), ClientError>;
}

/// A remote versioned entry collection.
///
/// Absent entries are a tagged outcome (`Ok(None)`), not an error code:
/// callers branch on presence, they never match error strings.
#[async_trait]
pub trait Collection: Send + Sync + Debug {
    /// Read an entry. `Ok(None)` when the key has never been set.
    async fn get(&self, key: &str) -> Result<Option<Entry>, CollectionError>;

    /// Insert a fresh entry at version 0.
    async fn insert(&self, key: &str, value: &[u8]) -> Result<(), CollectionError>;

    /// Write an entry at `version`, which must be exactly one past the
    /// stored version (optimistic concurrency; no retry on conflict).
    async fn update(&self, key: &str, value: &[u8], version: u64) -> Result<(), CollectionError>;

    /// Keys currently present, in lexical order.
    async fn keys(&self) -> Result<Vec<String>, CollectionError>;
}
