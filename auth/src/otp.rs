//! One-time password generation.

use rand::Rng;

/// Generate a numeric OTP of `length` digits.
///
/// Each digit is drawn uniformly, so every code in `0..10^length` is equally
/// likely. Leading zeros are kept.
#[must_use]
pub fn generate_otp(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

/// Returns `true` if `otp` has the shape of a code we could have issued.
#[must_use]
pub fn is_well_formed(otp: &str, length: usize) -> bool {
    otp.len() == length && otp.bytes().all(|b| b.is_ascii_digit())
}
