pub mod cancellation;
pub mod env;
pub mod io;
pub mod progress_bars;
pub mod throttle;

pub use cancellation::CancellationToken;
pub use throttle::Throttle;
