use rand::Rng;
use std::time::Duration;

/// Calculate exponential backoff delay with jitter
pub fn calculate_backoff_delay(attempt: u32, base_delay: Duration) -> Duration {
    // Cap the exponent so the multiplication cannot overflow
    let capped_attempt = attempt.min(10);

    // base * 2^attempt, in milliseconds
    let base_ms = u64::try_from(base_delay.as_millis()).unwrap_or(u64::MAX);
    let delay_ms = base_ms.saturating_mul(2_u64.saturating_pow(capped_attempt));

    // Add jitter: ±30% randomness
    let jitter_factor = rand::thread_rng().gen_range(0.7..1.3);
    let delay_with_jitter = (delay_ms as f64 * jitter_factor).round() as u64;

    Duration::from_millis(delay_with_jitter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_progression() {
        let base_delay = Duration::from_millis(500);

        let delay0 = calculate_backoff_delay(0, base_delay);
        let delay1 = calculate_backoff_delay(1, base_delay);
        let delay2 = calculate_backoff_delay(2, base_delay);

        assert!(delay0.as_millis() >= 350 && delay0.as_millis() <= 650); // 500ms ±30%
        assert!(delay1.as_millis() >= 700 && delay1.as_millis() <= 1300); // 1s ±30%
        assert!(delay2.as_millis() >= 1400 && delay2.as_millis() <= 2600); // 2s ±30%
    }

    #[test]
    fn test_backoff_cap() {
        let base_delay = Duration::from_millis(500);

        // 500ms * 2^10 = 512s, with jitter 358s-666s
        let delay_high = calculate_backoff_delay(25, base_delay);
        let delay_capped = calculate_backoff_delay(10, base_delay);

        assert!(delay_high.as_secs() >= 358 && delay_high.as_secs() <= 666);
        assert!(delay_capped.as_secs() >= 358 && delay_capped.as_secs() <= 666);
    }

    #[test]
    fn test_zero_base_delay() {
        assert_eq!(calculate_backoff_delay(3, Duration::ZERO), Duration::ZERO);
    }
}
