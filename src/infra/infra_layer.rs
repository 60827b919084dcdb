// The infra module contains implementations of core traits.
// Each external service gets its own submodule.

#[path = "ai/mod.rs"]
pub mod ai;

#[path = "google_sheets/mod.rs"]
pub mod google_sheets;

#[path = "delivery/mod.rs"]
pub mod delivery;
