// The infra module contains implementations of core traits.
// Each feature implementation goes in its own submodule.

#[path = "progression/progression_stores.rs"]
pub mod progression;
