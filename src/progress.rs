//! `indicatif`-backed fetch progress.
//!
//! Implements [`FetchObserver`] so the fetcher stays unaware of how
//! progress is drawn.

use crate::api::{FetchEvent, FetchObserver};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar over the cities of one batch, with per-city errors
/// printed above it as they happen.
pub struct IndicatifObserver {
    bar: ProgressBar,
}

impl IndicatifObserver {
    /// Creates a bar drawn on stderr. Its length is set when the batch
    /// starts.
    #[must_use]
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template("{msg} {wide_bar:.cyan/dim} {pos}/{len} [{elapsed_precise}]")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("##-"),
        );
        Self { bar }
    }

    /// Observer that tracks progress without drawing anything
    #[must_use]
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Current position and length of the bar
    #[must_use]
    pub fn position(&self) -> (u64, Option<u64>) {
        (self.bar.position(), self.bar.length())
    }
}

impl Default for IndicatifObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchObserver for IndicatifObserver {
    fn on_event(&self, event: FetchEvent<'_>) {
        match event {
            FetchEvent::Started { total } => {
                self.bar.set_length(total as u64);
                self.bar.set_position(0);
                self.bar.set_message("Fetching weather data");
            }
            FetchEvent::Progress {
                city,
                processed,
                error,
                ..
            } => {
                if let Some(error) = error {
                    let line = style(error.user_message()).red().to_string();
                    // a hidden bar swallows println
                    if self.bar.is_hidden() {
                        eprintln!("{line}");
                    } else {
                        self.bar.println(line);
                    }
                }
                self.bar.set_message(format!("Fetched {city}"));
                self.bar.set_position(processed as u64);
            }
            FetchEvent::Finished { .. } => self.bar.finish_and_clear(),
        }
    }
}
