//! Remote object → host state
//!
//! Every field except `_ref` is classified by [`ValueKind`]:
//! - scalars (including explicit nulls) are written as-is
//! - `extattrs` is unwrapped into a flat mapping
//! - any other compound field is dropped; the host keeps whatever value it
//!   already had for that key

use tracing::debug;

use crate::object::{EXTATTRS_FIELD, REF_FIELD, RemoteObject};
use crate::reflect::extattrs;
use crate::traits::ResourceData;
use crate::value::{ValueKind, fatal};

/// Reflect `object` into host state
///
/// # Panics
///
/// If `extattrs` is not a mapping of `{"value": <string>}` wrappers.
pub fn deserialize(mut object: RemoteObject, data: &mut dyn ResourceData) {
    if let Some(reference) = object.take_reference() {
        debug!("Stripped {} {} from remote object", REF_FIELD, reference);
    }

    for (key, value) in object {
        match ValueKind::of(&value) {
            ValueKind::Scalar => {
                debug!("Setting key {} to {}", key, value);
                data.set(&key, value);
            }
            _ if key == EXTATTRS_FIELD => {
                let flat = extattrs::unwrap(&value).unwrap_or_else(|err| fatal(err));
                debug!("Setting key {} to {}", key, flat);
                data.set(&key, flat);
            }
            kind => {
                debug!("Dropping {:?} field {} from remote object", kind, key);
            }
        }
    }
}
