pub mod behaviour;
pub mod config;
pub mod driver;
pub mod error;
pub mod motion;

pub use behaviour::{Behaviour, BehaviourRegistry, BehaviourResolver, BehaviourState, StyleVars};
pub use config::{EasingType, EngineConfig};
pub use driver::{DriverFactory, FrameLoop, MomentumDriver, ScrollContext, ScrollDriver};
pub use error::{Error, Result};
