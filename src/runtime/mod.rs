pub mod controller;
pub mod effect;
pub mod event;
pub mod navigation;
pub mod scheduler;
pub mod screen;

pub use controller::{SubmissionController, SubmitRejected};
pub use navigation::{NavigationError, NavigationGateway, Route, TracingGateway};
pub use screen::Screen;
