mod broadcaster;
mod session_rng;

pub mod memory;

pub use broadcaster::SessionBroadcaster;
pub use session_rng::SessionRng;
