// # Resource Data Trait
//
// Defines the interface to the host's per-resource state.
//
// ## Purpose
//
// The host framework (plan/diff engine, state storage) is external to the
// bridge. It exposes the resource being operated on through four primitives:
// - read a planned attribute value and whether it is set
// - ask whether an attribute differs from the last synced state
// - write a value reflected back from the remote API
// - accept the plan as synced once the remote API has applied it
// - get/set the resource identity
//
// ## Implementations
//
// - `MemoryResourceData`: in-memory, snapshot-able (tests, `ibxctl`)

use serde_json::Value;

/// Host-side view of one resource instance
///
/// An empty identity means the resource does not exist from the host's
/// point of view.
pub trait ResourceData: Send + Sync {
    /// Current value of `key` and whether it is set
    ///
    /// Returns `None` when the attribute is absent or null. Empty strings,
    /// zero and `false` are set values.
    fn get_ok(&self, key: &str) -> Option<Value>;

    /// Whether `key` differs from the last synced state
    fn has_change(&self, key: &str) -> bool;

    /// Write a value into host-visible state
    fn set(&mut self, key: &str, value: Value);

    /// Accept every planned value as synced
    ///
    /// Called after the remote API applied a Create or Update, before the
    /// read-back. Values the read-back does not reflect (compound fields
    /// other than `extattrs`) keep the applied plan.
    fn commit_planned(&mut self);

    /// Set the resource identity; `""` marks the resource absent
    fn set_id(&mut self, id: &str);

    /// Resource identity; `""` when absent
    fn id(&self) -> &str;
}
