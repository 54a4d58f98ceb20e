/* 📖 # Why have thing_lookup_base as a core library?
thing_lookup_base holds the error type, tracing setup and the platform abstraction
layer shared by the engine and the command line binary.
*/

pub mod error;
pub mod pal;
mod pal_tests;
pub mod tracing;

pub use error::{Error as ThingLookupError, ErrorKind, Result as LookupResult, ResultExt};
pub use pal::{MockPal, Pal, PalHandle, RealPal};
