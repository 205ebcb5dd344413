//! Progress spinner shown on stderr while scanning.

use std::borrow::Cow;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Spinner with a single status message.
#[derive(Clone)]
pub struct Progress {
    bar: ProgressBar,
}

impl Progress {
    /// Spinner on stderr, or a hidden one when `quiet`.
    pub fn new(quiet: bool) -> Self {
        if quiet {
            return Self::hidden();
        }

        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    /// Spinner that never draws.
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    pub fn set_message(&self, message: impl Into<Cow<'static, str>>) {
        self.bar.set_message(message);
    }

    #[cfg(test)]
    pub fn message(&self) -> String {
        self.bar.message()
    }

    /// Remove the spinner line.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
