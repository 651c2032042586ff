//! Maps a registration number to a question number.

/// Question number for `reg_no`.
///
/// Uses the last two ASCII digits when there are at least two, the single
/// digit when there is one, and otherwise `|string_hash(reg_no)| % 100`.
/// Never fails; the result is always below 100.
pub fn derive_question_number(reg_no: &str) -> u32 {
    let digits: Vec<u32> = reg_no.chars().filter_map(|c| c.to_digit(10)).collect();
    match digits.as_slice() {
        [.., tens, ones] => tens * 10 + ones,
        [only] => *only,
        [] => hash_bucket(string_hash(reg_no)),
    }
}

/// `|hash| % 100`, with the absolute value taken in 64 bits so `i32::MIN`
/// stays non-negative.
fn hash_bucket(hash: i32) -> u32 {
    (i64::from(hash).abs() % 100) as u32
}

/// 31-multiplier hash over UTF-16 code units with 32-bit wrap-around.
///
/// Stable across runs and platforms, unlike `std::hash`.
pub fn string_hash(s: &str) -> i32 {
    s.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}
