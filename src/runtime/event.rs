use crate::runtime::navigation::Route;

/// Events the screen scheduler emits when a timer fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenEvent {
    Navigate(Route),
    AdvanceSlide,
}
