//! Production-mode cooldown
//!
//! Before a production session proceeds, the manager can pause so an operator
//! has a chance to abort. The pause is injectable and skipped when the
//! configured period is zero.

use std::time::Duration;

/// Pause applied when a production configuration is accepted
pub trait Cooldown: Send + Sync {
    /// Block for the given period
    fn wait(&self, period: Duration);
}

/// Sleeps one second at a time, logging the seconds left
#[derive(Debug, Default, Clone, Copy)]
pub struct CountdownCooldown;

impl Cooldown for CountdownCooldown {
    fn wait(&self, period: Duration) {
        let mut remaining = period.as_secs();
        log::debug!("production mode starts in {}s", remaining);
        while remaining > 0 {
            std::thread::sleep(Duration::from_secs(1));
            remaining -= 1;
            log::debug!(" {}s", remaining);
        }
        let fraction = period - Duration::from_secs(period.as_secs());
        if !fraction.is_zero() {
            std::thread::sleep(fraction);
        }
    }
}

/// Skips the pause entirely
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCooldown;

impl Cooldown for NoCooldown {
    fn wait(&self, _period: Duration) {}
}
