pub mod clock;
pub mod shutdown;

pub use clock::{Clock, FixedClock, SystemClock};
pub use shutdown::{ShutdownCoordinator, ShutdownSignal};
