use uuid::Uuid;

/// Отслеживает последний запрос дашборда и текущую загрузку,
/// чтобы устаревшие ответы не перезаписывали экран
#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    latest: u64,
    upload_id: Option<Uuid>,
}

impl RequestTracker {
    /// Start a request; every earlier ticket becomes stale
    pub fn begin(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub fn set_upload(&mut self, upload_id: Uuid) {
        self.upload_id = Some(upload_id);
    }

    /// Forget the upload and invalidate requests in flight
    pub fn reset(&mut self) {
        self.upload_id = None;
        self.latest += 1;
    }

    pub fn is_latest(&self, ticket: u64) -> bool {
        ticket == self.latest
    }

    /// A response is applied only for the newest ticket and the known upload
    pub fn accepts(&self, ticket: u64, upload_id: Uuid) -> bool {
        self.is_latest(ticket) && self.upload_id.map_or(true, |id| id == upload_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_older_response_is_dropped() {
        let mut tracker = RequestTracker::default();
        let upload = Uuid::new_v4();
        let first = tracker.begin();
        let second = tracker.begin();
        // The slow first response arrives after the second one was started
        assert!(!tracker.is_latest(first));
        assert!(!tracker.accepts(first, upload));
        assert!(tracker.accepts(second, upload));
    }

    #[test]
    fn test_response_for_previous_upload_is_dropped() {
        let mut tracker = RequestTracker::default();
        let old_upload = Uuid::new_v4();
        let new_upload = Uuid::new_v4();
        let ticket = tracker.begin();
        tracker.set_upload(new_upload);
        assert!(!tracker.accepts(ticket, old_upload));
        assert!(tracker.accepts(ticket, new_upload));
    }

    #[test]
    fn test_unknown_upload_accepts_first_response() {
        let mut tracker = RequestTracker::default();
        let ticket = tracker.begin();
        assert!(tracker.accepts(ticket, Uuid::new_v4()));
    }

    #[test]
    fn test_reset_invalidates_requests_in_flight() {
        let mut tracker = RequestTracker::default();
        let upload = Uuid::new_v4();
        tracker.set_upload(upload);
        let ticket = tracker.begin();
        tracker.reset();
        assert!(!tracker.accepts(ticket, upload));
    }
}
