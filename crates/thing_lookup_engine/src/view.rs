/* 📖 # Why a View trait between the controller and the page?

The controller only ever does two things to the page: show a record or show
an error. Putting those two calls behind a trait keeps the state machine
independent of how the page is drawn; `TextView` is the slot-based page used
by the command line, tests use it or a recording double.
*/

use crate::thing::ThingRecord;

/// What is currently rendered.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewState {
    /// Nothing submitted yet.
    #[default]
    Idle,
    /// The last settled lookup produced this record.
    Displaying(ThingRecord),
    /// The last settled lookup failed with this message.
    Failed(String),
}

/// Render target driven by the lookup controller.
///
/// Each call replaces whatever was shown before: `show_record` clears the
/// error indicator and `show_error` clears all record fields.
pub trait View {
    fn show_record(&mut self, record: &ThingRecord);
    fn show_error(&mut self, message: &str);
}

pub const THING_ID_SLOT: &str = "thing-id";
pub const THING_NAME_SLOT: &str = "thing-name";
pub const THING_LOCATION_SLOT: &str = "thing-location";
pub const THING_TYPE_SLOT: &str = "thing-type";
pub const ERROR_SLOT: &str = "error";

/// Record slots with their labels, in display order.
const RECORD_SLOTS: [(&str, &str); 4] = [
    (THING_ID_SLOT, "thing ID:"),
    (THING_NAME_SLOT, "thing name:"),
    (THING_LOCATION_SLOT, "thing location:"),
    (THING_TYPE_SLOT, "thing type:"),
];

/// A text page with four labelled record slots and an error slot.
///
/// ```
/// use thing_lookup_engine::{TextView, ThingRecord, View};
///
/// let mut view = TextView::new();
/// assert_eq!(view.render().lines().next(), Some("thing ID:"));
///
/// view.show_record(&ThingRecord::new("1", "Widget", "Aisle 5", "Tool"));
/// assert_eq!(view.render().lines().next(), Some("thing ID: 1"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextView {
    id: String,
    name: String,
    location: String,
    thing_type: String,
    error: String,
}

impl TextView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current content of a named slot, `None` for an unknown slot name.
    pub fn slot(&self, name: &str) -> Option<&str> {
        let value = match name {
            THING_ID_SLOT => &self.id,
            THING_NAME_SLOT => &self.name,
            THING_LOCATION_SLOT => &self.location,
            THING_TYPE_SLOT => &self.thing_type,
            ERROR_SLOT => &self.error,
            _ => return None,
        };
        Some(value.as_str())
    }

    pub fn is_error_visible(&self) -> bool {
        !self.error.is_empty()
    }

    pub fn is_record_visible(&self) -> bool {
        RECORD_SLOTS
            .iter()
            .any(|(slot, _)| self.slot(slot).is_some_and(|value| !value.is_empty()))
    }

    /// Render the page: one line per record slot, then the error line if any.
    ///
    /// An empty slot renders as its bare label, e.g. `thing ID:`.
    pub fn render(&self) -> String {
        let mut page = String::new();
        for (slot, label) in RECORD_SLOTS {
            page.push_str(label);
            if let Some(value) = self.slot(slot).filter(|value| !value.is_empty()) {
                page.push(' ');
                page.push_str(value);
            }
            page.push('\n');
        }
        if self.is_error_visible() {
            page.push_str("error: ");
            page.push_str(&self.error);
            page.push('\n');
        }
        page
    }
}

impl View for TextView {
    fn show_record(&mut self, record: &ThingRecord) {
        self.id = record.id().to_string();
        self.name = record.name().to_string();
        self.location = record.location().to_string();
        self.thing_type = record.thing_type().to_string();
        self.error.clear();
    }

    fn show_error(&mut self, message: &str) {
        self.id.clear();
        self.name.clear();
        self.location.clear();
        self.thing_type.clear();
        self.error = message.to_string();
    }
}
