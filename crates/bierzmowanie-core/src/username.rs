//! Login names for accounts provisioned on someone's behalf.

/// `rodzic.<given>.<family>`, lowercased and folded to ASCII.
pub fn parent_username_base(given: &str, family: &str) -> String {
  format!("rodzic.{}.{}", fold(given), fold(family))
}

/// The `n`th candidate login for `base`: the base itself first, then the
/// base with a numeric suffix.
pub fn with_suffix(base: &str, n: u32) -> String {
  if n == 0 { base.to_owned() } else { format!("{base}{n}") }
}

/// Lowercase, transliterate Polish letters, and drop anything that is not
/// an ASCII letter or digit. Hyphens in double-barrelled names survive.
fn fold(name: &str) -> String {
  name
    .trim()
    .chars()
    .flat_map(char::to_lowercase)
    .filter_map(|c| match c {
      'ą' => Some('a'),
      'ć' => Some('c'),
      'ę' => Some('e'),
      'ł' => Some('l'),
      'ń' => Some('n'),
      'ó' => Some('o'),
      'ś' => Some('s'),
      'ź' | 'ż' => Some('z'),
      '-' => Some('-'),
      c if c.is_ascii_alphanumeric() => Some(c),
      _ => None,
    })
    .collect()
}
