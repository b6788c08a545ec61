use std::time::Duration;

/// Delay before reconnect attempt `attempt` (1-based): `initial` doubled per
/// attempt, at most 16x, never above `max`.
pub fn reconnect_delay(attempt: u32, initial: Duration, max: Duration) -> Duration {
    let multiplier = 1u32 << attempt.saturating_sub(1).min(4);
    initial.saturating_mul(multiplier).min(max)
}
