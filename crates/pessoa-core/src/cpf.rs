//! CPF input helpers.
//!
//! The login field masks input as the user types: non-digits are dropped, at
//! most 11 digits are kept, and separators appear once the following group
//! has started (`123.4`, `123.456.7`, `123.456.789-0`). No checksum checks.

/// Number of digits in a CPF.
pub const DIGITS: usize = 11;

/// Digits of `input`, in order, with everything else dropped.
pub fn digits(input: &str) -> String {
  input.chars().filter(char::is_ascii_digit).collect()
}

/// Apply the progressive `000.000.000-00` mask to `input`.
pub fn mask(input: &str) -> String {
  let digits: Vec<char> = input
    .chars()
    .filter(char::is_ascii_digit)
    .take(DIGITS)
    .collect();

  let mut out = String::with_capacity(DIGITS + 3);
  for (i, d) in digits.iter().enumerate() {
    match i {
      3 | 6 => out.push('.'),
      9 => out.push('-'),
      _ => {}
    }
    out.push(*d);
  }
  out
}

/// Whether `value` is a complete, masked CPF (`000.000.000-00`).
pub fn is_formatted(value: &str) -> bool {
  let bytes = value.as_bytes();
  bytes.len() == 14
    && bytes.iter().enumerate().all(|(i, b)| match i {
      3 | 7 => *b == b'.',
      11 => *b == b'-',
      _ => b.is_ascii_digit(),
    })
}
