//! Wall clock
//!
//! Uptime from the embassy time driver plus the epoch at boot. The epoch
//! starts at the build time and is corrected by companion time syncs.

use embassy_time::Instant;
use portable_atomic::{AtomicU64, Ordering};

include!(concat!(env!("OUT_DIR"), "/build_epoch.rs"));

/// Unix epoch milliseconds at uptime zero
static BOOT_EPOCH_MS: AtomicU64 = AtomicU64::new(BUILD_EPOCH_MS);

/// Current Unix time in milliseconds
pub fn now_ms() -> u64 {
    BOOT_EPOCH_MS.load(Ordering::Relaxed) + Instant::now().as_millis()
}

/// Set the current Unix time in milliseconds
pub fn set_now_ms(epoch_ms: u64) {
    let uptime = Instant::now().as_millis();
    BOOT_EPOCH_MS.store(epoch_ms.saturating_sub(uptime), Ordering::Relaxed);
}
