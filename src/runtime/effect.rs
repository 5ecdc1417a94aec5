use crate::core::form::{FieldId, FormState};
use crate::runtime::navigation::Route;
use crate::runtime::scheduler::SchedulerCommand;
use crate::state::status::SubmissionStatus;

/// Side effects requested by the controller; the screen runtime applies them.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    StatusChanged(SubmissionStatus),
    FocusField(FieldId),
    RunAction { run_id: u64, form: FormState },
    Schedule(SchedulerCommand),
    Navigate(Route),
}
