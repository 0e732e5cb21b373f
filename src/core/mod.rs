pub mod cancel;
pub mod clock;
pub mod frame;
pub mod pointer;
pub mod run_loop;
pub mod session;
pub mod timer;
pub mod viewport;

pub use cancel::CancelToken;
pub use clock::Clock;
pub use frame::FrameTiming;
pub use pointer::{PointerState, PointerTracker};
pub use run_loop::{RunLoop, RunSummary};
pub use session::{advance_frame, Session};
pub use timer::FpsCounter;
pub use viewport::Viewport;
