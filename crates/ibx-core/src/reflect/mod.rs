//! Attribute reflection between host state and remote objects
//!
//! ```text
//! host state ──► descriptors ──► convert ──► serialize ──► RemoteObject ──► client
//!                                                                             │
//! host state ◄──────────────────────────── deserialize ◄── RemoteObject ◄─────┘
//! ```
//!
//! The only non-uniform field is `extattrs`, which the remote side wraps one
//! level deeper than the host does (see [`extattrs`]).

pub mod convert;
pub mod deserialize;
pub mod extattrs;
pub mod serialize;

pub use convert::convert;
pub use deserialize::deserialize;
pub use serialize::{serialize, serialize_attribute};
