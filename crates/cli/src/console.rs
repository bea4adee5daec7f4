//! Terminal presenter and upload progress bar.

use indicatif::{ProgressBar, ProgressStyle};
use sobra_core::{Presenter, ProgressObserver};
use std::sync::atomic::{AtomicBool, Ordering};

/// Prints alerts to stdout and remembers whether the screen asked to go back.
#[derive(Default)]
pub struct ConsolePresenter {
    navigated_back: AtomicBool,
}

impl ConsolePresenter {
    pub fn navigated_back(&self) -> bool {
        self.navigated_back.load(Ordering::Acquire)
    }
}

impl Presenter for ConsolePresenter {
    fn alert(&self, message: &str) {
        println!("{message}");
    }

    fn navigate_back(&self) {
        tracing::debug!("registration screen closed");
        self.navigated_back.store(true, Ordering::Release);
    }
}

/// Renders upload percentages on an `indicatif` bar.
pub struct UploadBar {
    bar: ProgressBar,
}

impl UploadBar {
    pub fn new() -> Self {
        let bar = ProgressBar::new(100);
        if let Ok(style) = ProgressStyle::with_template("Enviando {bar:40.cyan/blue} {pos:>3}%") {
            bar.set_style(style);
        }
        Self { bar }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for UploadBar {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressObserver for UploadBar {
    fn on_progress(&self, percent: u8) {
        self.bar.set_position(u64::from(percent));
    }
}
