//!
//! # Backup schedule
//!
//! Spreads backups of different databases over the day: the hour is derived from
//! a 64-bit FNV-1 hash of the cron job name, and each job runs twice, 12 hours apart.
//! Same name always yields the same schedule.
//!

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1 (multiply, then xor).
/// Written out since the `fnv` crate only provides FNV-1a, which yields different hours.
pub fn fnv1(data: &[u8]) -> u64 {
    data.iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        hash.wrapping_mul(FNV_PRIME) ^ u64::from(*byte)
    })
}

/// first run hour, in `0..12`
pub fn schedule_hour(name: &str) -> u8 {
    (fnv1(name.as_bytes()) % 12) as u8
}

/// cron expression running at minute 0 of `h` and `h + 12`
pub fn backup_schedule(name: &str) -> String {
    let hour = schedule_hour(name);
    format!("0 {},{} * * *", hour, hour + 12)
}
