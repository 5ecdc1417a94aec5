use crate::core::form::FormState;
use crate::state::carousel::Carousel;
use crate::state::status::{Notice, SubmissionStatus};
use crate::state::validation::ErrorState;
use serde::Serialize;

/// Snapshot of everything the presentation layer renders for one screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenView {
    pub status: SubmissionStatus,
    pub values: FormState,
    pub errors: ErrorState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slide: Option<SlideView>,
    pub submit_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlideView {
    pub index: usize,
    pub count: usize,
    pub title: String,
    pub image: String,
}

impl SlideView {
    pub fn from_carousel(carousel: &Carousel) -> Option<Self> {
        let slide = carousel.current()?;
        Some(Self {
            index: carousel.active(),
            count: carousel.slides().len(),
            title: slide.title.clone(),
            image: slide.image.clone(),
        })
    }
}
