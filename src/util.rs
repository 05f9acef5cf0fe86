//! Small utility helpers used across modules.

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values.
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = tpl.to_string();
  for (k, v) in pairs {
    let needle = format!("{{{}}}", k);
    out = out.replace(&needle, v);
  }
  out
}

/// Log-safe truncation for large strings (char-boundary aware).
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut cut = max;
  while !s.is_char_boundary(cut) {
    cut -= 1;
  }
  format!("{}… ({} bytes total)", &s[..cut], s.len())
}

/// Round to `digits` significant figures. Zero and non-finite values pass through.
pub fn round_sig(x: f64, digits: i32) -> f64 {
  if x == 0.0 || !x.is_finite() {
    return x;
  }
  let magnitude = x.abs().log10().floor() as i32;
  let factor = 10f64.powi(digits - 1 - magnitude);
  (x * factor).round() / factor
}

/// Human formatting for computed quantities: 4 significant figures, no trailing zeros.
pub fn fmt_num(x: f64) -> String {
  let r = round_sig(x, 4);
  if r.abs() >= 1e6 || (r != 0.0 && r.abs() < 1e-4) {
    return format!("{:.3e}", r);
  }
  let s = format!("{:.6}", r);
  let s = s.trim_end_matches('0').trim_end_matches('.');
  if s == "-0" { "0".into() } else { s.to_string() }
}

/// Whitespace word count, as used by the solve-time heuristic.
pub fn word_count(s: &str) -> usize {
  s.split_whitespace().count()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fill_template_replaces_all_keys() {
    let out = fill_template("{a} and {b} and {a}", &[("a", "x"), ("b", "y")]);
    assert_eq!(out, "x and y and x");
  }

  #[test]
  fn rounding_and_formatting() {
    assert_eq!(round_sig(863.8376, 4), 863.8);
    assert_eq!(round_sig(0.015708, 3), 0.0157);
    assert_eq!(fmt_num(4.0), "4");
    assert_eq!(fmt_num(1254.0), "1254");
    assert_eq!(fmt_num(0.015708), "0.01571");
    assert_eq!(fmt_num(12.50), "12.5");
  }

  #[test]
  fn truncation_respects_char_boundaries() {
    assert_eq!(trunc_for_log("σσσ", 1), "… (6 bytes total)");
    assert_eq!(trunc_for_log("σσσ", 3), "σ… (6 bytes total)");
    assert_eq!(trunc_for_log("short", 10), "short");
  }

  #[test]
  fn words_are_counted_on_whitespace() {
    assert_eq!(word_count("  a 100 N force\n acts "), 4);
  }
}
