pub mod action;
pub mod executor;
pub mod mock;
pub mod run_state;

pub use action::{Action, ActionError, ActionOutcome, ActionReply, FnAction, action_fn};
pub use executor::{ActionCompletion, ActionExecutor, ActionInvocation};
pub use mock::MockBackend;
pub use run_state::RunState;
