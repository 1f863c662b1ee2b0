/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    /// Zero-based index of the question on screen.
    pub index: usize,
    pub total: usize,
    pub answered: usize,
    pub is_complete: bool,
}

impl SessionProgress {
    /// `(index + 1) / total`, as a percentage for the progress bar.
    #[must_use]
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let pct = (self.index + 1) as f64 / self.total as f64 * 100.0;
        pct
    }

    /// Label such as `Question 2 of 5`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("Question {} of {}", self.index + 1, self.total)
    }
}
