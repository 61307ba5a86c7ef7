// tests/admission/decision_metadata_tests.rs

#[cfg(test)]
mod tests {

    use crate::TestClock;
    use flux_admission::{AdmissionConfig, AdmissionController};
    use std::time::Duration;

    #[test]
    fn check_returns_detailed_decision() {
        let clock = TestClock::new(0.0);
        let controller = AdmissionController::with_config(AdmissionConfig::new(1.0, 3), clock).unwrap();

        let decision = controller.check("client1");
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 2);
        assert!(decision.retry_after.is_none());
    }

    #[test]
    fn remaining_counts_down_to_zero() {
        let clock = TestClock::new(0.0);
        let controller = AdmissionController::with_config(AdmissionConfig::new(1.0, 3), clock).unwrap();

        let remaining: Vec<u32> = (0..3).map(|_| controller.check("client1").remaining).collect();
        assert_eq!(remaining, vec![2, 1, 0]);

        let denied = controller.check("client1");
        assert!(!denied.allowed);
        assert_eq!(denied.remaining, 0);
    }

    #[test]
    fn retry_after_reflects_refill_rate() {
        let clock = TestClock::new(0.0);
        let controller =
            AdmissionController::with_config(AdmissionConfig::new(2.0, 1), clock.clone()).unwrap();

        assert!(controller.check("client1").allowed);

        // 2 tokens/sec: a full token is 0.5s away
        let denied = controller.check("client1");
        assert_eq!(denied.retry_after, Some(Duration::from_millis(500)));

        // after 0.25s half a token has accrued
        clock.advance(0.25);
        let denied = controller.check("client1");
        assert_eq!(denied.retry_after, Some(Duration::from_millis(250)));
    }
}
