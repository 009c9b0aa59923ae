//! Progress display constants

/// Width of the progress bar display
pub const PROGRESS_BAR_WIDTH: usize = 30;
