use chrono::Utc;
use rand::RngCore;

use crate::db_types::OrderId;

const ORDER_ID_PREFIX: &str = "TOPUP_";
const RANDOM_SUFFIX_BYTES: usize = 8;

/// Generates a fresh order identifier: `TOPUP_<base36 unix-millis>_<16 hex chars>`.
///
/// The timestamp keeps ids roughly sortable; the 64-bit random suffix makes them unguessable, which matters
/// because the id is the only credential protecting guest orders.
pub fn new_order_id() -> OrderId {
    let millis = Utc::now().timestamp_millis().max(0) as u128;
    let mut suffix = [0u8; RANDOM_SUFFIX_BYTES];
    rand::thread_rng().fill_bytes(&mut suffix);
    let suffix = suffix.iter().map(|b| format!("{b:02x}")).collect::<String>();
    OrderId(format!("{ORDER_ID_PREFIX}{}_{suffix}", to_base36(millis)))
}

fn to_base36(mut n: u128) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).expect("base36 digits are always ASCII")
}
