//! Remap orchestrator.
//!
//! Rebinds a sub-name under a public name to a new target resource.
//! Web-content targets (type tag [`TYPE_TAG_WWW`]) are referenced by
//! their network address; anything else is captured by value as a
//! serialized snapshot, so the link always resolves to something
//! stable. The write is a single optimistic read-modify-write against
//! the public name's entry collection; a version conflict is a normal,
//! reportable outcome and is never retried here.

use serde::Serialize;
use tracing::{debug, info};

use crate::client::{
    ClientError, CollectionError, FetchError, Scope, TYPE_TAG_DNS, TYPE_TAG_WWW,
};
use crate::session::Session;

#[derive(Debug, thiserror::Error)]
pub enum RemapError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Collection(#[from] CollectionError),
}

/// Single user-facing failure shape: the operation's inputs plus the
/// underlying reason. Nothing is assumed committed when this surfaces.
#[derive(Debug, thiserror::Error)]
#[error("failed to remap 'safe://{sub_name}.{public_name}': {reason}")]
pub struct RemapFailure {
    pub sub_name: String,
    pub public_name: String,
    pub reason: RemapError,
}

/// The effective mapping after a successful remap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemapOutcome {
    pub public_name: String,
    pub sub_name: String,
    pub target_locator: String,
    /// Version the entry was written at
    pub version: u64,
    /// Whether the entry was inserted fresh rather than updated
    pub inserted: bool,
}

/// Rebind `sub_name` under `public_name` to the resource targeted by
/// `target_locator`.
pub async fn remap(
    session: &Session,
    public_name: &str,
    sub_name: &str,
    target_locator: &str,
) -> Result<RemapOutcome, RemapFailure> {
    run(session, public_name, sub_name, target_locator)
        .await
        .map_err(|reason| RemapFailure {
            sub_name: sub_name.to_string(),
            public_name: public_name.to_string(),
            reason,
        })
}

async fn run(
    session: &Session,
    public_name: &str,
    sub_name: &str,
    target_locator: &str,
) -> Result<RemapOutcome, RemapError> {
    session.ensure_connected().await?;
    let client = session.client();

    let resource = client.fetch(target_locator).await?;
    let identity = client.canonical_identity(&resource).await?;
    debug!(
        type_tag = identity.type_tag,
        address = %hex::encode(identity.address),
        "resolved remap target"
    );

    // Reference web content by address; capture anything else by value.
    let value = if identity.type_tag == TYPE_TAG_WWW {
        identity.address.to_vec()
    } else {
        client.serialise(&resource).await?
    };

    let address = client.derive_collection_address(public_name);
    client
        .request_write_permission(address, TYPE_TAG_DNS, &[Scope::Insert, Scope::Update])
        .await?;
    let collection = client.open_collection(address, TYPE_TAG_DNS).await?;

    let outcome = match collection.get(sub_name).await? {
        Some(current) => {
            let version = current.version + 1;
            collection.update(sub_name, &value, version).await?;
            RemapOutcome {
                public_name: public_name.to_string(),
                sub_name: sub_name.to_string(),
                target_locator: target_locator.to_string(),
                version,
                inserted: false,
            }
        }
        None => {
            collection.insert(sub_name, &value).await?;
            RemapOutcome {
                public_name: public_name.to_string(),
                sub_name: sub_name.to_string(),
                target_locator: target_locator.to_string(),
                version: 0,
                inserted: true,
            }
        }
    };

    info!(
        sub_name,
        public_name,
        version = outcome.version,
        inserted = outcome.inserted,
        "remapped sub-name"
    );
    Ok(outcome)
}
