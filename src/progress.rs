//! Progress reporting support (requires `progress` feature)

use indicatif::{ProgressBar, ProgressStyle};

/// Callback for progress updates: `(destinations_done, destinations_total)`
pub type ProgressCallback = Box<dyn Fn(usize, usize) + Send + Sync>;

/// Create a default progress bar counting finished destinations
#[must_use]
pub fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {msg} [{bar:40.cyan/blue}] {pos}/{len} destinations")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );
    pb
}
