pub mod carousel;
pub mod status;
pub mod validation;
pub mod view;

pub use carousel::{Carousel, Slide};
pub use status::{Notice, SubmissionStatus, Tone};
pub use validation::ErrorState;
pub use view::ScreenView;
