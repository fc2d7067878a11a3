//! Random identifiers: profile folder names, icon file names, and action IDs.
//! Nothing here is checked for collisions beyond what the callers do; the alphabets and
//! lengths give enough entropy for a single run.

use rand::Rng;

use crate::config::PROFILE_SUFFIX;

const UPPER_ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const LOWER_ALPHANUMERIC: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of the random basename given to copied icons.
pub const ICON_TOKEN_LEN: usize = 28;

fn sample(rng: &mut impl Rng, alphabet: &[u8], len: usize) -> String {
    (0..len)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())] as char)
        .collect()
}

/// Uppercase A-Z0-9 token.
pub fn random_token(len: usize) -> String {
    sample(&mut rand::thread_rng(), UPPER_ALPHANUMERIC, len)
}

/// `XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX.sdProfile`
pub fn profile_folder_name() -> String {
    let segments: Vec<String> = [8, 4, 4, 4, 12].iter().map(|&n| random_token(n)).collect();
    format!("{}{}", segments.join("-"), PROFILE_SUFFIX)
}

/// Five hyphen-joined groups of eight lowercase alphanumerics.
pub fn action_id() -> String {
    let mut rng = rand::thread_rng();
    let groups: Vec<String> = (0..5)
        .map(|_| sample(&mut rng, LOWER_ALPHANUMERIC, 8))
        .collect();
    groups.join("-")
}
