pub mod phase_descriptor;
pub mod session_ctx;

pub use phase_descriptor::{resolve_descriptor, PhaseDescriptor};
pub use session_ctx::SessionCtx;
