/* 📖 # What lives in thing_lookup_engine?

The lookup flow itself: the thing record, where the lookup service lives, the
HTTP client side of `GET /things/{id}`, the page it renders into and the
controller tying them together. Everything platform specific comes in through
`thing_lookup_base::PalHandle`.
*/

pub mod config;
pub mod controller;
pub mod service;
pub mod thing;
pub mod view;

pub use config::{LookupConfig, load_config};
pub use controller::LookupController;
pub use service::{HttpLookupService, LookupError, LookupService, classify_response};
pub use thing::{LookupRequest, ThingRecord};
pub use view::{TextView, View, ViewState};
