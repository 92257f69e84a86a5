#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateStats {
    pub emails_processed: u64,
    pub total_processing_time_ms: u64,
}

impl AggregateStats {
    pub fn record(&mut self, processing_time_ms: u64) {
        self.emails_processed += 1;
        self.total_processing_time_ms += processing_time_ms;
    }

    /// Mean request time in seconds, one decimal place; 0 before any request.
    pub fn average_seconds(&self) -> f64 {
        if self.emails_processed == 0 {
            return 0.0;
        }
        let seconds =
            self.total_processing_time_ms as f64 / self.emails_processed as f64 / 1000.0;
        (seconds * 10.0).round() / 10.0
    }
}
