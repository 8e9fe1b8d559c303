pub mod control;
pub mod launcher;
pub mod orchestrator;

pub use control::SessionControl;
pub use launcher::{BoundPortal, PortalContext, PortalLauncher, ServeFuture};
pub use orchestrator::{CleanupPolicy, SessionOrchestrator, SessionSettings};
