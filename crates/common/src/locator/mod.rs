//! Locator parsing and resolution policy.
//!
//! A locator is a scheme-qualified name such as `safe://blog.alice` or a
//! bare identifier like `safe://bafk...:15002`. The host component
//! splits on `.`: the last label is the public name, everything before
//! it the sub-name path. A host with no sub-name labels may itself be a
//! XOR-URL; the decision policy lives in [`ParsedLocator::lookup`].

mod report;

pub use report::{analyze, Field, FieldKind, UrlReport};

use serde::Serialize;
use url::Url;

use crate::xor_url::XorUrl;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LocatorError {
    #[error("invalid locator '{0}': missing scheme or host")]
    InvalidLocator(String),
}

/// A locator split into its structural components. Derived purely from
/// the locator string; no network access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedLocator {
    pub scheme: String,
    /// Labels preceding the public name, outermost first. Empty iff the
    /// host may be a bare identifier.
    pub sub_name_path: Vec<String>,
    pub public_name: String,
    /// Optional numeric port component, asserted as the type tag
    pub type_tag: Option<u64>,
    pub path: Option<String>,
}

/// How a locator resolves: a bare decoded identifier, or a
/// public-name lookup against the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Bare(XorUrl),
    Named,
}

impl ParsedLocator {
    pub fn parse(locator: &str) -> Result<Self, LocatorError> {
        let url =
            Url::parse(locator).map_err(|_| LocatorError::InvalidLocator(locator.to_string()))?;
        let host = url
            .host_str()
            .filter(|host| !host.is_empty())
            .ok_or_else(|| LocatorError::InvalidLocator(locator.to_string()))?;

        let mut sub_name_path: Vec<String> = host.split('.').map(str::to_string).collect();
        let public_name = sub_name_path
            .pop()
            .ok_or_else(|| LocatorError::InvalidLocator(locator.to_string()))?;

        let path = match url.path() {
            "" | "/" => None,
            p => Some(p.to_string()),
        };

        Ok(Self {
            scheme: url.scheme().to_string(),
            sub_name_path,
            public_name,
            type_tag: url.port().map(u64::from),
            path,
        })
    }

    /// The dotted sub-name, if any labels are present.
    pub fn sub_name(&self) -> Option<String> {
        if self.sub_name_path.is_empty() {
            None
        } else {
            Some(self.sub_name_path.join("."))
        }
    }

    /// The full host component.
    pub fn host(&self) -> String {
        match self.sub_name() {
            Some(sub) => format!("{}.{}", sub, self.public_name),
            None => self.public_name.clone(),
        }
    }

    /// Decide how this locator resolves.
    ///
    /// With sub-name labels present the locator is always a named
    /// lookup; identifier decoding is never attempted. A bare host is
    /// tried as a XOR-URL first; a label that fails to decode falls
    /// back to a zero-segment public-name lookup rather than surfacing
    /// the decode error (existing behavior, kept intentionally).
    pub fn lookup(&self) -> Lookup {
        if !self.sub_name_path.is_empty() {
            return Lookup::Named;
        }
        match XorUrl::decode(&self.public_name) {
            Ok(mut xor_url) => {
                xor_url.type_tag = self.type_tag;
                Lookup::Bare(xor_url)
            }
            Err(_) => Lookup::Named,
        }
    }
}
