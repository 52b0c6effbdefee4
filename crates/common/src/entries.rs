//! Raw entry creation and inspection.
//!
//! The low-level counterpart of remapping: write arbitrary string
//! entries into the collection derived from a name, at a caller-chosen
//! numeric type tag, and read them back as an ordered field report.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::info;

use crate::client::{ClientError, CollectionError, Scope};
use crate::locator::{Field, FieldKind, UrlReport};
use crate::session::Session;

#[derive(Debug, thiserror::Error)]
pub enum EntriesError {
    /// The structured payload is not a JSON object of string entries
    #[error("malformed entries payload: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Collection(#[from] CollectionError),
}

#[derive(Debug, thiserror::Error)]
#[error("failed entry operation on '{name}' (tag {type_tag}): {reason}")]
pub struct EntriesFailure {
    pub name: String,
    pub type_tag: u64,
    pub reason: EntriesError,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntriesOutcome {
    pub name: String,
    pub type_tag: u64,
    /// Hex address of the owning collection
    pub address: String,
    /// Number of entries written
    pub count: usize,
}

/// Create raw entries under `name` from a JSON object payload
/// (`{"key": "value", ...}`). Every entry is inserted fresh at
/// version 0; an existing key fails the whole operation.
pub async fn create_entries(
    session: &Session,
    name: &str,
    type_tag: u64,
    payload: &str,
) -> Result<EntriesOutcome, EntriesFailure> {
    let fail = |reason: EntriesError| EntriesFailure {
        name: name.to_string(),
        type_tag,
        reason,
    };

    let entries: BTreeMap<String, String> =
        serde_json::from_str(payload).map_err(|e| fail(e.into()))?;

    let run = async {
        session.ensure_connected().await?;
        let client = session.client();

        let address = client.derive_collection_address(name);
        client
            .request_write_permission(address, type_tag, &[Scope::Insert])
            .await?;
        let collection = client.open_collection(address, type_tag).await?;

        // All-or-nothing: reject the whole payload before writing
        // anything, so a colliding key leaves no partial state behind.
        for key in entries.keys() {
            if collection.get(key).await?.is_some() {
                return Err(CollectionError::EntryExists(key.clone()).into());
            }
        }

        for (key, value) in &entries {
            collection.insert(key, value.as_bytes()).await?;
        }

        info!(name, type_tag, count = entries.len(), "created raw entries");
        Ok::<_, EntriesError>(EntriesOutcome {
            name: name.to_string(),
            type_tag,
            address: format!("0x{}", hex::encode(address)),
            count: entries.len(),
        })
    };

    run.await.map_err(fail)
}

/// Inspect entries under `name`: the requested keys, or every key when
/// none are given. Values render as UTF-8 when possible, hex otherwise.
pub async fn list_entries(
    session: &Session,
    name: &str,
    type_tag: u64,
    keys: &[String],
) -> Result<UrlReport, EntriesFailure> {
    let run = async {
        session.ensure_connected().await?;
        let client = session.client();

        let address = client.derive_collection_address(name);
        let collection = client.open_collection(address, type_tag).await?;

        let keys = if keys.is_empty() {
            collection.keys().await?
        } else {
            keys.to_vec()
        };

        let mut report = UrlReport::default();
        report.fields.push(Field {
            label: "Collection".to_string(),
            value: name.to_string(),
            kind: FieldKind::Text,
        });
        report.fields.push(Field {
            label: "Type tag".to_string(),
            value: type_tag.to_string(),
            kind: FieldKind::Text,
        });
        report.fields.push(Field {
            label: "XoR name".to_string(),
            value: format!("0x{}", hex::encode(address)),
            kind: FieldKind::Text,
        });

        for key in &keys {
            let value = match collection.get(key).await? {
                Some(entry) => format!(
                    "{} (version {})",
                    render_value(&entry.value),
                    entry.version
                ),
                None => "ABSENT".to_string(),
            };
            report.fields.push(Field {
                label: key.clone(),
                value,
                kind: FieldKind::Text,
            });
        }

        Ok::<_, EntriesError>(report)
    };

    run.await.map_err(|reason| EntriesFailure {
        name: name.to_string(),
        type_tag,
        reason,
    })
}

fn render_value(value: &[u8]) -> String {
    match std::str::from_utf8(value) {
        Ok(text) => text.to_string(),
        Err(_) => format!("0x{}", hex::encode(value)),
    }
}
