/**
 * XOR-URL codec.
 * Decodes and re-encodes the self-describing identifier
 *  envelope (CID version + codec + multihash) used to
 *  address content on the network.
 */
pub mod xor_url;
/**
 * Locator parsing and analysis.
 * Splits a scheme-qualified name into sub-name path and
 *  public name, decides between bare-identifier and
 *  named-lookup resolution, and builds the ordered
 *  analysis report.
 */
pub mod locator;
/**
 * Collaborator boundary for the external network client:
 *  authentication, fetch, identity, versioned entry
 *  collections and permission requests, plus an in-memory
 *  implementation.
 */
pub mod client;
/**
 * Explicit session handle over a network client with
 *  lazy connect-or-reuse semantics.
 */
pub mod session;
/**
 * Remap orchestrator: rebinds a sub-name under a public
 *  name to a new target resource via a read-modify-write
 *  on the public name's entry collection.
 */
pub mod remap;
/**
 * Raw entry creation and inspection at caller-chosen
 *  type tags.
 */
pub mod entries;
/**
 * Helpers for seeding an in-memory network in tests.
 */
pub mod testkit;

pub mod prelude {
    pub use crate::client::{AppInfo, MemoryClient, NetworkClient, TYPE_TAG_DNS, TYPE_TAG_WWW};
    pub use crate::locator::{analyze, Field, FieldKind, ParsedLocator, UrlReport};
    pub use crate::remap::{remap, RemapFailure, RemapOutcome};
    pub use crate::session::Session;
    pub use crate::xor_url::{XorUrl, XorUrlError};
}
