/* 📖 # Why does on_submit take &mut self?

A submission runs to completion before the next one is looked at: the
outbound request is the only place the controller waits, and the exclusive
borrow makes it impossible to start a second lookup while one is in flight.
The policy is "last response wins". Every settled response replaces the whole
visible state, nothing is cancelled and nothing is retried.
*/

use tracing::{debug, info, instrument, warn};

use crate::service::LookupService;
use crate::thing::LookupRequest;
use crate::view::{View, ViewState};

/// Drives a [`View`] from submissions, using a [`LookupService`] for lookups.
#[derive(Debug)]
pub struct LookupController<S, V> {
    service: S,
    view: V,
    state: ViewState,
}

impl<S: LookupService, V: View> LookupController<S, V> {
    pub fn new(service: S, view: V) -> Self {
        Self {
            service,
            view,
            state: ViewState::Idle,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Look up `id` and render the outcome.
    ///
    /// A blank identifier is not a lookup attempt: no request is sent and the
    /// state is left as it was.
    #[instrument(skip(self))]
    pub fn on_submit(&mut self, id: &str) -> &ViewState {
        let Some(request) = LookupRequest::new(id) else {
            debug!("ignoring blank submission");
            return &self.state;
        };

        self.state = match self.service.fetch_by_id(&request) {
            Ok(record) => {
                info!(id = %record.id(), "displaying thing");
                self.view.show_record(&record);
                ViewState::Displaying(record)
            }
            Err(error) => {
                warn!(%error, "lookup failed");
                let message = error.user_message();
                self.view.show_error(message);
                ViewState::Failed(message.to_string())
            }
        };
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;
    use crate::service::LookupError;
    use crate::thing::ThingRecord;
    use crate::view::TextView;
    use expect_test::expect;

    /// Answers lookups from a script and records the identifiers it was asked for.
    #[derive(Debug, Default)]
    struct ScriptedService {
        answers: RefCell<VecDeque<Result<ThingRecord, LookupError>>>,
        requested: RefCell<Vec<String>>,
    }

    impl ScriptedService {
        fn new(answers: impl IntoIterator<Item = Result<ThingRecord, LookupError>>) -> Self {
            Self {
                answers: RefCell::new(answers.into_iter().collect()),
                requested: RefCell::default(),
            }
        }

        fn requested(&self) -> Vec<String> {
            self.requested.borrow().clone()
        }
    }

    impl LookupService for ScriptedService {
        fn fetch_by_id(&self, request: &LookupRequest) -> Result<ThingRecord, LookupError> {
            self.requested.borrow_mut().push(request.id().to_string());
            self.answers
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(LookupError::Unclassified {
                    reason: "script exhausted".to_string(),
                }))
        }
    }

    /// Records every render call.
    #[derive(Debug, Default)]
    struct RecordingView {
        calls: Vec<String>,
    }

    impl View for RecordingView {
        fn show_record(&mut self, record: &ThingRecord) {
            self.calls.push(format!("record {}", record.id()));
        }

        fn show_error(&mut self, message: &str) {
            self.calls.push(format!("error {}", message));
        }
    }

    fn widget() -> ThingRecord {
        ThingRecord::new("1", "Widget", "Aisle 5", "Tool")
    }

    fn controller(
        answers: impl IntoIterator<Item = Result<ThingRecord, LookupError>>,
    ) -> LookupController<ScriptedService, TextView> {
        LookupController::new(ScriptedService::new(answers), TextView::new())
    }

    #[test]
    fn test_starts_idle() {
        let controller = controller([]);
        assert_eq!(controller.state(), &ViewState::Idle);
        assert!(!controller.view().is_record_visible());
        assert!(!controller.view().is_error_visible());
    }

    #[test]
    fn test_success_displays_record() {
        let mut controller = controller([Ok(widget())]);

        let state = controller.on_submit("1").clone();

        assert_eq!(state, ViewState::Displaying(widget()));
        assert!(!controller.view().is_error_visible());
        expect![[r#"
            thing ID: 1
            thing name: Widget
            thing location: Aisle 5
            thing type: Tool
        "#]]
        .assert_eq(&controller.view().render());
    }

    #[test]
    fn test_failures_map_to_messages() {
        let mut controller = controller([
            Err(LookupError::InvalidId),
            Err(LookupError::NotFound),
            Err(LookupError::Unclassified {
                reason: "unexpected status 500 Internal Server Error".to_string(),
            }),
        ]);

        assert_eq!(
            controller.on_submit("abc"),
            &ViewState::Failed("Invalid ID supplied".to_string())
        );
        assert_eq!(
            controller.on_submit("999"),
            &ViewState::Failed("thing not found".to_string())
        );
        assert_eq!(controller.on_submit("2"), &ViewState::Failed("failed".to_string()));
        expect![[r#"
            thing ID:
            thing name:
            thing location:
            thing type:
            error: failed
        "#]]
        .assert_eq(&controller.view().render());
    }

    #[test]
    fn test_failure_after_success_clears_fields() {
        let mut controller = controller([Ok(widget()), Err(LookupError::NotFound)]);

        controller.on_submit("1");
        controller.on_submit("999");

        assert!(!controller.view().is_record_visible());
        assert!(controller.view().is_error_visible());
    }

    #[test]
    fn test_success_after_failure_clears_error() {
        let mut controller = controller([Err(LookupError::InvalidId), Ok(widget())]);

        controller.on_submit("abc");
        controller.on_submit("1");

        assert_eq!(controller.state(), &ViewState::Displaying(widget()));
        assert!(!controller.view().is_error_visible());
    }

    #[test]
    fn test_blank_submission_is_ignored() {
        let mut controller = controller([Ok(widget())]);
        controller.on_submit("1");

        assert_eq!(controller.on_submit("   "), &ViewState::Displaying(widget()));
        assert_eq!(controller.on_submit(""), &ViewState::Displaying(widget()));
        assert_eq!(controller.service().requested(), vec!["1"]);
    }

    #[test]
    fn test_submission_is_trimmed() {
        let mut controller = controller([Ok(widget())]);
        controller.on_submit(" 1\t");
        assert_eq!(controller.service().requested(), vec!["1"]);
    }

    #[test]
    fn test_same_id_twice_gives_same_record() {
        let mut controller = controller([Ok(widget()), Ok(widget())]);

        let first = controller.on_submit("1").clone();
        let first_page = controller.view().render();
        let second = controller.on_submit("1").clone();

        assert_eq!(first, second);
        assert_eq!(first_page, controller.view().render());
        assert_eq!(controller.service().requested(), vec!["1", "1"]);
    }

    #[test]
    fn test_one_render_call_per_settled_submission() {
        let service = ScriptedService::new([
            Ok(widget()),
            Err(LookupError::NotFound),
            Err(LookupError::InvalidId),
        ]);
        let mut controller = LookupController::new(service, RecordingView::default());

        controller.on_submit("1");
        controller.on_submit("");
        controller.on_submit("999");
        controller.on_submit("abc");

        assert_eq!(
            controller.view().calls,
            vec![
                "record 1",
                "error thing not found",
                "error Invalid ID supplied"
            ]
        );
    }

    #[test]
    fn test_no_retry_after_failure() {
        let mut controller = controller([
            Err(LookupError::Unclassified {
                reason: "connection refused".to_string(),
            }),
            Ok(widget()),
        ]);

        controller.on_submit("1");

        assert_eq!(controller.state(), &ViewState::Failed("failed".to_string()));
        assert_eq!(controller.service().requested(), vec!["1"]);
    }
}
