use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_ADVANCE_INTERVAL: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    pub image: String,
    pub title: String,
}

impl Slide {
    pub fn new(image: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            title: title.into(),
        }
    }
}

pub fn default_slides() -> Vec<Slide> {
    vec![
        Slide::new("/images/shoe1.png", "Stunning Stores For Your Brand"),
        Slide::new("/images/shoe2.png", "Seamless User Experience"),
        Slide::new("/images/fas1.png", "Seamless Buying Experience"),
    ]
}

/// Promotional slides beside the auth forms. Advancing wraps in both directions.
#[derive(Debug, Clone)]
pub struct Carousel {
    slides: Vec<Slide>,
    active: usize,
    interval: Duration,
}

impl Carousel {
    pub fn new(slides: Vec<Slide>) -> Self {
        Self {
            slides,
            active: 0,
            interval: DEFAULT_ADVANCE_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn current(&self) -> Option<&Slide> {
        self.slides.get(self.active)
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn next(&mut self) {
        if !self.slides.is_empty() {
            self.active = (self.active + 1) % self.slides.len();
        }
    }

    pub fn prev(&mut self) {
        if !self.slides.is_empty() {
            self.active = (self.active + self.slides.len() - 1) % self.slides.len();
        }
    }

    /// Returns false and leaves the carousel untouched for an out-of-range index.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index < self.slides.len() {
            self.active = index;
            true
        } else {
            false
        }
    }
}

impl Default for Carousel {
    fn default() -> Self {
        Self::new(default_slides())
    }
}
