use std::time::Duration;
use tracing::Level;

// Initialize tracing for tests
#[ctor::ctor]
fn init_tracing() { tracing_subscriber::fmt().with_max_level(Level::DEBUG).with_test_writer().init(); }

#[allow(unused)]
pub fn ms(millis: u64) -> Duration { Duration::from_millis(millis) }

/// Assert that `start.elapsed()` landed on `expected`, allowing for timer wheel rounding
#[allow(unused)]
#[track_caller]
pub fn assert_elapsed(start: tokio::time::Instant, expected: Duration, context: &str) {
    let elapsed = start.elapsed();
    assert!(elapsed >= expected && elapsed < expected + ms(5), "{context}: expected {expected:?}, got {elapsed:?}");
}
