/* 📖 # What is the Platform Abstraction Layer?

The PAL is the seam between the lookup logic and the outside world
(environment, HTTP client, HTTP server). Code depends on the `Pal` trait,
`RealPal` backs it with the OS and the network, `MockPal` with in-memory
state for deterministic tests.
*/

pub mod http;
pub mod mock;
pub mod real_pal;
mod traits;

pub use mock::MockPal;
pub use real_pal::RealPal;
pub use traits::{Pal, PalHandle};
