//! Behaviours: pure functions from runtime state to style variables
//!
//! - `definition` - the `Behaviour` type and option helpers
//! - `state` - `BehaviourState` and the `StateKey` names behaviours declare
//! - `vars` - ordered style-variable output
//! - `registry` / `resolver` - id lookup and dependency-first expansion
//! - `compose` - several behaviours folded onto one target
//! - `builtins` - the stock behaviour set

pub mod builtins;
mod compose;
mod definition;
mod registry;
mod resolver;
mod state;
mod vars;

pub use builtins::register_builtins;
pub use compose::compose;
pub use definition::{option_f64, option_str, Behaviour, ComputeFn, NONE_ID};
pub use registry::{BehaviourCategory, BehaviourRegistry};
pub use resolver::BehaviourResolver;
pub use state::{BehaviourState, StateKey};
pub use vars::{StyleValue, StyleVars};
