//! Ordered analysis report for a locator.
//!
//! The field order is a contract of the core, not a presentation
//! choice: locator summary, resource kind, identifier fields (bare) or
//! resolved-target fields (named), then path-specific fields. A fetch
//! failure never aborts the analysis; dynamically fetched fields are
//! simply omitted.

use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use crate::client::ResourceKind;
use crate::session::Session;

use super::{Lookup, LocatorError, ParsedLocator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldKind {
    Text,
    /// The value is itself a locator; presentation layers hyperlink it
    Locator,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub label: String,
    pub value: String,
    pub kind: FieldKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UrlReport {
    pub fields: Vec<Field>,
}

impl UrlReport {
    fn text(&mut self, label: &str, value: impl ToString) {
        self.fields.push(Field {
            label: label.to_string(),
            value: value.to_string(),
            kind: FieldKind::Text,
        });
    }

    fn locator(&mut self, label: &str, value: impl ToString) {
        self.fields.push(Field {
            label: label.to_string(),
            value: value.to_string(),
            kind: FieldKind::Locator,
        });
    }

    /// First value reported under a label, if any.
    pub fn value(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.label == label)
            .map(|field| field.value.as_str())
    }

    pub fn labels(&self) -> Vec<&str> {
        self.fields.iter().map(|field| field.label.as_str()).collect()
    }
}

impl fmt::Display for UrlReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for field in &self.fields {
            writeln!(f, "{}: {}", field.label, field.value)?;
        }
        Ok(())
    }
}

/// Analyse a locator: parse it, fetch what the network will serve, and
/// report every derivable field in contract order.
pub async fn analyze(session: &Session, locator: &str) -> Result<UrlReport, LocatorError> {
    let parsed = ParsedLocator::parse(locator)?;
    debug!(host = %parsed.host(), "analysing locator");

    // Fetch is best-effort: unreachable or unauthenticated targets
    // still get the statically derivable fields.
    let fetched = match session.ensure_connected().await {
        Ok(()) => match session.client().fetch(locator).await {
            Ok(resource) => Some(resource),
            Err(e) => {
                warn!(error = %e, "fetch failed, reporting static fields only");
                None
            }
        },
        Err(e) => {
            warn!(error = %e, "could not connect, reporting static fields only");
            None
        }
    };

    let mut report = UrlReport::default();
    report.locator("Information about", locator);
    if let Some(resource) = &fetched {
        report.text("Targeted resource type", resource.kind.label());
    }

    match parsed.lookup() {
        Lookup::Bare(xor_url) => {
            // `raw` carries no content type; display rule only, the
            // decoded identifier itself stays lossless.
            match xor_url.type_tag {
                Some(tag) => report.text("Type tag", tag),
                None => report.text("Type tag", "NONE"),
            }
            report.text("XoR name", xor_url.address_hex());
            report.text("XoR name length", xor_url.address.len());
            report.text("Content type", xor_url.content_type().unwrap_or("NONE"));
            report.text("Hash type", xor_url.hash_name);
            report.text("CID version", xor_url.version);
        }
        Lookup::Named => {
            if let Some(resource) = &fetched {
                match session.client().canonical_identity(resource).await {
                    Ok(identity) => {
                        report.text("Type tag", identity.type_tag);
                        report.text("XoR name", format!("0x{}", hex::encode(identity.address)));
                        report.text("XoR name length", identity.address.len());
                        report.locator("XoR-URL", &identity.xor_url);
                    }
                    Err(e) => warn!(error = %e, "could not resolve canonical identity"),
                }
            }
        }
    }

    if let Some(path) = &parsed.path {
        report.text("URL path", path);
        if let Some(resource) = &fetched {
            if resource.kind == ResourceKind::Container {
                let relative = path.trim_start_matches('/');
                match session.client().file_info(resource, relative).await {
                    Ok(Some(file)) => {
                        report.text("File size", format!("{} bytes", file.size));
                        report.text("File's version", file.version);
                        report.text("File's XoR name", format!("0x{}", hex::encode(file.data_map)));
                        report.text("File's creation timestamp", &file.created);
                        report.text("File's modification timestamp", &file.modified);
                        report.text("File's user metadata", &file.user_metadata);
                    }
                    Ok(None) => debug!(path = relative, "no file at path"),
                    Err(e) => warn!(error = %e, "failed to read file info for path"),
                }
            }
        }
    }

    Ok(report)
}
