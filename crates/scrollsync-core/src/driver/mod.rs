//! Runtime: per-context scroll drivers, their factory, the frame loop, and
//! the momentum engine used for carousel navigation

mod element;
mod factory;
mod frame_loop;
mod intersection;
mod momentum;
mod scroll;

pub use element::{ContainerId, Element, Headless, Rect, ScrollContext, ScrollSurface, SurfaceProvider};
pub use factory::DriverFactory;
pub use frame_loop::{FrameLoop, LoopSummary};
pub use intersection::IntersectionTracker;
pub use momentum::{snap_target, MomentumDriver, MomentumEvent, MomentumPhase};
pub use scroll::{
    progress_for, DriverStats, FrameReport, Interaction, ScrollDriver, VisibilityGetter,
    PRERASTER_OPACITY_FLOOR,
};
