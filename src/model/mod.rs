//! Configuration resource types.
//!
//! # Data Flow
//! ```text
//! seed file (YAML) / request body (JSON)
//!     → profile.rs (ClientSslProfile, ChainElement)
//!     → identity.rs (ResourceId: "~partition~name")
//!     → store (keyed by ResourceId)
//! ```

pub mod cipher_group;
pub mod identity;
pub mod profile;

pub use cipher_group::CipherGroups;
pub use identity::{PathError, ResourceId};
pub use profile::{ChainElement, ClientSslProfile};
