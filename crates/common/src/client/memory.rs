//! In-memory network client, optionally persisted to a JSON file.
//!
//! Backs the CLI and the test suites. Resources are published under
//! their host name; entry collections live at sha3-256-derived
//! addresses. Bare XOR-URL locators that were never published still
//! resolve: the resource is synthesized from the decoded identifier,
//! as a content-addressed network would serve it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};
use tracing::{debug, warn};

use crate::locator::{Lookup, ParsedLocator};
use crate::xor_url::{self, SHA3_256 as SHA3_256_CODE};

use super::{
    Address, AppInfo, ClientError, Collection, CollectionError, Entry, FetchError, FileInfo,
    NameAndTag, NetworkClient, Resource, ResourceKind, Scope,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredResource {
    kind: ResourceKind,
    address: Address,
    type_tag: u64,
    /// Snapshot returned by `serialise`; generated when absent
    serialised: Option<Vec<u8>>,
    #[serde(default)]
    files: BTreeMap<String, FileInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoredCollection {
    type_tag: u64,
    entries: BTreeMap<String, Entry>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Store {
    /// Published resources, keyed by host name
    resources: BTreeMap<String, StoredResource>,
    /// Entry collections, keyed by hex collection address
    collections: BTreeMap<String, StoredCollection>,
}

/// Per-process connection state; never persisted.
#[derive(Debug, Default)]
struct Runtime {
    connected: bool,
    deny_auth: bool,
    deny_permission: bool,
    granted: Vec<(String, u64, Vec<Scope>)>,
}

#[derive(Debug, Clone)]
pub struct MemoryClient {
    store: Arc<RwLock<Store>>,
    runtime: Arc<RwLock<Runtime>>,
    persist_path: Option<PathBuf>,
}

impl Default for MemoryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryClient {
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(Store::default())),
            runtime: Arc::new(RwLock::new(Runtime::default())),
            persist_path: None,
        }
    }

    /// Open a client over a JSON store file; starts empty when the file
    /// does not exist yet.
    pub fn open(path: &Path) -> Result<Self, ClientError> {
        let store = if path.exists() {
            let raw = std::fs::read_to_string(path)
                .map_err(|e| ClientError::Other(format!("failed to read store: {}", e)))?;
            serde_json::from_str(&raw)
                .map_err(|e| ClientError::Other(format!("corrupt store file: {}", e)))?
        } else {
            Store::default()
        };
        Ok(Self {
            store: Arc::new(RwLock::new(store)),
            runtime: Arc::new(RwLock::new(Runtime::default())),
            persist_path: Some(path.to_path_buf()),
        })
    }

    fn persist(&self) -> Result<(), CollectionError> {
        let Some(path) = &self.persist_path else {
            return Ok(());
        };
        let raw = serde_json::to_string_pretty(&*self.store.read())
            .map_err(|e| CollectionError::Store(e.to_string()))?;
        std::fs::write(path, raw).map_err(|e| CollectionError::Store(e.to_string()))
    }

    /// Publish a resource under a host name.
    pub fn put_resource(&self, host: &str, kind: ResourceKind, address: Address, type_tag: u64) {
        self.store.write().resources.insert(
            host.to_string(),
            StoredResource {
                kind,
                address,
                type_tag,
                serialised: None,
                files: BTreeMap::new(),
            },
        );
        if let Err(e) = self.persist() {
            warn!(host, error = %e, "failed to persist seeded resource");
        }
    }

    /// Attach a serialized snapshot to a published resource.
    pub fn put_serialised(&self, host: &str, snapshot: Vec<u8>) {
        if let Some(resource) = self.store.write().resources.get_mut(host) {
            resource.serialised = Some(snapshot);
        }
        if let Err(e) = self.persist() {
            warn!(host, error = %e, "failed to persist serialized snapshot");
        }
    }

    /// Attach file metadata under a path of a published container.
    pub fn put_file(&self, host: &str, path: &str, info: FileInfo) {
        if let Some(resource) = self.store.write().resources.get_mut(host) {
            resource.files.insert(path.to_string(), info);
        }
        if let Err(e) = self.persist() {
            warn!(host, path, error = %e, "failed to persist file metadata");
        }
    }

    /// Read an entry of the collection derived from `name`.
    pub fn entry(&self, name: &str, key: &str) -> Option<Entry> {
        let address = hex::encode(derive_address(name));
        self.store
            .read()
            .collections
            .get(&address)
            .and_then(|collection| collection.entries.get(key))
            .cloned()
    }

    pub fn deny_auth(&self, deny: bool) {
        self.runtime.write().deny_auth = deny;
    }

    pub fn deny_permission(&self, deny: bool) {
        self.runtime.write().deny_permission = deny;
    }

    pub fn disconnect(&self) {
        self.runtime.write().connected = false;
    }

    /// Permission grants recorded so far: (hex address, type tag, scopes).
    pub fn granted(&self) -> Vec<(String, u64, Vec<Scope>)> {
        self.runtime.read().granted.clone()
    }

    fn stored_identity(&self, locator: &str) -> Result<NameAndTag, FetchError> {
        let parsed =
            ParsedLocator::parse(locator).map_err(|e| FetchError::Unreachable(e.to_string()))?;
        let host = parsed.host();

        if let Some(stored) = self.store.read().resources.get(&host) {
            return Ok(NameAndTag {
                address: stored.address,
                type_tag: stored.type_tag,
                xor_url: canonical_locator(&stored.address),
            });
        }

        match parsed.lookup() {
            Lookup::Bare(xor_url) => {
                let address: Address = xor_url
                    .address
                    .clone()
                    .try_into()
                    .map_err(|_| FetchError::Unreachable("address is not 32 bytes".to_string()))?;
                Ok(NameAndTag {
                    address,
                    type_tag: xor_url.type_tag.unwrap_or(0),
                    xor_url: canonical_locator(&address),
                })
            }
            Lookup::Named => Err(FetchError::Unreachable(format!(
                "no resource published at '{}'",
                host
            ))),
        }
    }
}

fn derive_address(name: &str) -> Address {
    let digest = Sha3_256::digest(name.as_bytes());
    let mut address = [0u8; 32];
    address.copy_from_slice(&digest);
    address
}

fn canonical_locator(address: &Address) -> String {
    match xor_url::encode(SHA3_256_CODE, address, "raw") {
        Ok(text) => format!("safe://{}", text),
        // 32-byte digests always encode; keep the signature infallible
        Err(_) => String::new(),
    }
}

fn default_snapshot(address: &Address, type_tag: u64) -> Vec<u8> {
    serde_json::json!({
        "address": format!("0x{}", hex::encode(address)),
        "type_tag": type_tag,
    })
    .to_string()
    .into_bytes()
}

#[async_trait]
impl NetworkClient for MemoryClient {
    async fn initialise(&self, app: &AppInfo) -> Result<(), ClientError> {
        debug!(app_id = %app.id, "initialising app with in-memory network");
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.runtime.read().connected
    }

    async fn gen_auth_uri(&self) -> Result<String, ClientError> {
        Ok("safe-auth://request".to_string())
    }

    async fn authorise(&self, req_uri: &str) -> Result<String, ClientError> {
        if self.runtime.read().deny_auth {
            return Err(ClientError::AuthDenied(
                "authorisation request refused".to_string(),
            ));
        }
        Ok(format!("{}/granted", req_uri))
    }

    async fn login_from_uri(&self, _auth_uri: &str) -> Result<(), ClientError> {
        self.runtime.write().connected = true;
        Ok(())
    }

    async fn fetch(&self, locator: &str) -> Result<Resource, FetchError> {
        if !self.is_connected() {
            return Err(FetchError::Unauthorized("not logged in".to_string()));
        }

        let parsed =
            ParsedLocator::parse(locator).map_err(|e| FetchError::Unreachable(e.to_string()))?;
        let host = parsed.host();

        if let Some(stored) = self.store.read().resources.get(&host) {
            return Ok(Resource {
                kind: stored.kind,
                locator: locator.to_string(),
                path: parsed.path.clone(),
            });
        }

        // Unpublished but content-addressed: synthesize from the
        // identifier itself.
        match parsed.lookup() {
            Lookup::Bare(xor_url) => Ok(Resource {
                kind: if xor_url.content_type().is_some() {
                    ResourceKind::Container
                } else {
                    ResourceKind::ImmutableBlob
                },
                locator: locator.to_string(),
                path: parsed.path.clone(),
            }),
            Lookup::Named => Err(FetchError::Unreachable(format!(
                "no resource published at '{}'",
                host
            ))),
        }
    }

    async fn canonical_identity(&self, resource: &Resource) -> Result<NameAndTag, FetchError> {
        self.stored_identity(&resource.locator)
    }

    async fn serialise(&self, resource: &Resource) -> Result<Vec<u8>, FetchError> {
        let parsed = ParsedLocator::parse(&resource.locator)
            .map_err(|e| FetchError::Unreachable(e.to_string()))?;
        if let Some(stored) = self.store.read().resources.get(&parsed.host()) {
            if let Some(snapshot) = &stored.serialised {
                return Ok(snapshot.clone());
            }
            return Ok(default_snapshot(&stored.address, stored.type_tag));
        }
        let identity = self.stored_identity(&resource.locator)?;
        Ok(default_snapshot(&identity.address, identity.type_tag))
    }

    async fn file_info(
        &self,
        resource: &Resource,
        path: &str,
    ) -> Result<Option<FileInfo>, FetchError> {
        let parsed = ParsedLocator::parse(&resource.locator)
            .map_err(|e| FetchError::Unreachable(e.to_string()))?;
        Ok(self
            .store
            .read()
            .resources
            .get(&parsed.host())
            .and_then(|stored| stored.files.get(path))
            .cloned())
    }

    fn derive_collection_address(&self, name: &str) -> Address {
        derive_address(name)
    }

    async fn open_collection(
        &self,
        address: Address,
        type_tag: u64,
    ) -> Result<Box<dyn Collection>, ClientError> {
        let key = hex::encode(address);
        if let Some(collection) = self.store.read().collections.get(&key) {
            if collection.type_tag != type_tag {
                return Err(ClientError::Other(format!(
                    "collection {} exists with type tag {}, not {}",
                    key, collection.type_tag, type_tag
                )));
            }
        }
        // A missing collection materializes on first insert, never on
        // open, so read-only inspection leaves no trace in the store.
        Ok(Box::new(MemoryCollection {
            client: self.clone(),
            address: key,
            type_tag,
        }))
    }

    async fn request_write_permission(
        &self,
        address: Address,
        type_tag: u64,
        scopes: &[Scope],
    ) -> Result<(), ClientError> {
        let mut runtime = self.runtime.write();
        if runtime.deny_permission {
            return Err(ClientError::PermissionDenied(format!(
                "write access to collection 0x{} (tag {}) refused",
                hex::encode(address),
                type_tag
            )));
        }
        runtime
            .granted
            .push((hex::encode(address), type_tag, scopes.to_vec()));
        Ok(())
    }
}

#[derive(Debug)]
struct MemoryCollection {
    client: MemoryClient,
    /// Hex collection address
    address: String,
    type_tag: u64,
}

#[async_trait]
impl Collection for MemoryCollection {
    async fn get(&self, key: &str) -> Result<Option<Entry>, CollectionError> {
        Ok(self
            .client
            .store
            .read()
            .collections
            .get(&self.address)
            .and_then(|collection| collection.entries.get(key))
            .cloned())
    }

    async fn insert(&self, key: &str, value: &[u8]) -> Result<(), CollectionError> {
        {
            let mut store = self.client.store.write();
            let collection = store
                .collections
                .entry(self.address.clone())
                .or_insert_with(|| StoredCollection {
                    type_tag: self.type_tag,
                    entries: BTreeMap::new(),
                });
            if collection.entries.contains_key(key) {
                return Err(CollectionError::EntryExists(key.to_string()));
            }
            collection.entries.insert(
                key.to_string(),
                Entry {
                    value: value.to_vec(),
                    version: 0,
                },
            );
        }
        self.client.persist()
    }

    async fn update(&self, key: &str, value: &[u8], version: u64) -> Result<(), CollectionError> {
        {
            let mut store = self.client.store.write();
            let collection = store
                .collections
                .get_mut(&self.address)
                .ok_or_else(|| CollectionError::NoSuchEntry(key.to_string()))?;
            let entry = collection
                .entries
                .get_mut(key)
                .ok_or_else(|| CollectionError::NoSuchEntry(key.to_string()))?;
            if version != entry.version + 1 {
                return Err(CollectionError::VersionConflict {
                    key: key.to_string(),
                    stored: entry.version,
                    asked: version,
                });
            }
            entry.value = value.to_vec();
            entry.version = version;
        }
        self.client.persist()
    }

    async fn keys(&self) -> Result<Vec<String>, CollectionError> {
        Ok(self
            .client
            .store
            .read()
            .collections
            .get(&self.address)
            .map(|collection| collection.entries.keys().cloned().collect())
            .unwrap_or_default())
    }
}
