// The core module contains all business logic and the ports (traits) that
// infra implements. Each feature gets its own submodule.

#[path = "standings/mod.rs"]
pub mod standings;

#[path = "ai/mod.rs"]
pub mod ai;

#[path = "messages/mod.rs"]
pub mod messages;

#[path = "delivery/mod.rs"]
pub mod delivery;

#[path = "run/mod.rs"]
pub mod run;
