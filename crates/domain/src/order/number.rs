//! Human-presentable order number generation.

use chrono::Utc;
use rand::Rng;

/// Prefix carried by every generated order number.
const PREFIX: &str = "ORD";

/// Generates an order number: `ORD` + current epoch milliseconds + a
/// zero-padded 3-digit random suffix.
///
/// The result is human-legible and looks monotonically increasing without
/// requiring a central sequence authority. Uniqueness is best-effort: two
/// calls within the same millisecond can collide if they draw the same
/// suffix. Acceptable for low-volume, single-process use; a hardened
/// deployment should source order numbers from the persistence service
/// instead.
pub fn generate_order_number() -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix: u32 = rand::thread_rng().gen_range(0..1000);
    format!("{PREFIX}{millis}{suffix:03}")
}
