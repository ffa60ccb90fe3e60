//! printf-style number formatting.
//!
//! A format string holds exactly one conversion, `%[flags][width][.precision]conv`,
//! optionally surrounded by literal text (`%%` is a literal percent sign).
//!
//! - flags: `-` (left-align), `+`, space, `0` (zero-pad)
//! - conv: `f`, `e`, `E`, `g`, `G`, `d`, `i`
//!
//! Output matches C for finite inputs (`%.2e` of 1234.5 is `1.23e+03`).
//! Non-finite values format as an empty string so missing cells stay blank.

use std::str::FromStr;

use crate::error::AppError;

const DEFAULT_PRECISION: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conv {
    Fixed,
    Exp { upper: bool },
    General { upper: bool },
    Int,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Flags {
    left: bool,
    plus: bool,
    space: bool,
    zero: bool,
}

/// A parsed numeric format specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FmtSpec {
    source: String,
    prefix: String,
    suffix: String,
    flags: Flags,
    width: Option<usize>,
    precision: Option<usize>,
    conv: Conv,
}

impl FmtSpec {
    pub fn parse(s: &str) -> Result<Self, AppError> {
        let chars: Vec<char> = s.chars().collect();
        let mut prefix = String::new();
        let mut suffix = String::new();
        let mut spec: Option<(Flags, Option<usize>, Option<usize>, Conv)> = None;

        let mut i = 0;
        while i < chars.len() {
            let ch = chars[i];
            if ch != '%' {
                if spec.is_some() { suffix.push(ch) } else { prefix.push(ch) }
                i += 1;
                continue;
            }
            if chars.get(i + 1) == Some(&'%') {
                if spec.is_some() { suffix.push('%') } else { prefix.push('%') }
                i += 2;
                continue;
            }
            if spec.is_some() {
                return Err(AppError::format(format!("'{s}' has more than one conversion")));
            }
            i += 1;

            let mut flags = Flags::default();
            while let Some(&c) = chars.get(i) {
                match c {
                    '-' => flags.left = true,
                    '+' => flags.plus = true,
                    ' ' => flags.space = true,
                    '0' => flags.zero = true,
                    _ => break,
                }
                i += 1;
            }
            let width = read_number(&chars, &mut i);
            let precision = if chars.get(i) == Some(&'.') {
                i += 1;
                Some(read_number(&chars, &mut i).unwrap_or(0))
            } else {
                None
            };
            let conv = match chars.get(i) {
                Some('f') | Some('F') => Conv::Fixed,
                Some('e') => Conv::Exp { upper: false },
                Some('E') => Conv::Exp { upper: true },
                Some('g') => Conv::General { upper: false },
                Some('G') => Conv::General { upper: true },
                Some('d') | Some('i') => Conv::Int,
                Some(other) => {
                    return Err(AppError::format(format!(
                        "'{s}': unsupported conversion '%{other}'"
                    )));
                }
                None => return Err(AppError::format(format!("'{s}': incomplete conversion"))),
            };
            i += 1;
            spec = Some((flags, width, precision, conv));
        }

        let Some((flags, width, precision, conv)) = spec else {
            return Err(AppError::format(format!("'{s}' has no numeric conversion (e.g. %.3f)")));
        };

        Ok(Self {
            source: s.to_string(),
            prefix,
            suffix,
            flags,
            width,
            precision,
            conv,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Format one value; non-finite values give an empty string.
    pub fn apply(&self, value: f64) -> String {
        if !value.is_finite() {
            return String::new();
        }
        let body = match self.conv {
            Conv::Fixed => format!("{:.*}", self.precision.unwrap_or(DEFAULT_PRECISION), value.abs()),
            Conv::Exp { upper } => format_exp(value.abs(), self.precision.unwrap_or(DEFAULT_PRECISION), upper),
            Conv::General { upper } => {
                format_general(value.abs(), self.precision.unwrap_or(DEFAULT_PRECISION), upper)
            }
            Conv::Int => format!("{:.0}", value.abs()),
        };

        let sign = if value.is_sign_negative() {
            "-"
        } else if self.flags.plus {
            "+"
        } else if self.flags.space {
            " "
        } else {
            ""
        };

        let len = sign.chars().count() + body.chars().count();
        let padded = match self.width {
            Some(w) if w > len => {
                let pad = w - len;
                if self.flags.left {
                    format!("{sign}{body}{}", " ".repeat(pad))
                } else if self.flags.zero {
                    format!("{sign}{}{body}", "0".repeat(pad))
                } else {
                    format!("{}{sign}{body}", " ".repeat(pad))
                }
            }
            _ => format!("{sign}{body}"),
        };

        format!("{}{padded}{}", self.prefix, self.suffix)
    }
}

impl FromStr for FmtSpec {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Default for FmtSpec {
    fn default() -> Self {
        // "%.3f" always parses.
        Self {
            source: "%.3f".to_string(),
            prefix: String::new(),
            suffix: String::new(),
            flags: Flags::default(),
            width: None,
            precision: Some(3),
            conv: Conv::Fixed,
        }
    }
}

fn read_number(chars: &[char], i: &mut usize) -> Option<usize> {
    let start = *i;
    while chars.get(*i).is_some_and(|c| c.is_ascii_digit()) {
        *i += 1;
    }
    if *i == start {
        return None;
    }
    chars[start..*i].iter().collect::<String>().parse().ok()
}

/// Split Rust's `{:e}` output into mantissa and exponent.
fn rust_exp_parts(value: f64, precision: usize) -> (String, i32) {
    let s = format!("{:.*e}", precision, value);
    match s.split_once('e') {
        Some((mantissa, exp)) => (mantissa.to_string(), exp.parse().unwrap_or(0)),
        None => (s, 0),
    }
}

fn format_exp(value: f64, precision: usize, upper: bool) -> String {
    let (mantissa, exp) = rust_exp_parts(value, precision);
    let e = if upper { 'E' } else { 'e' };
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{mantissa}{e}{sign}{:02}", exp.abs())
}

fn format_general(value: f64, precision: usize, upper: bool) -> String {
    let p = precision.max(1);
    let exp = if value == 0.0 { 0 } else { rust_exp_parts(value, p - 1).1 };
    if exp < -4 || exp >= p as i32 {
        let full = format_exp(value, p - 1, upper);
        let split_at = full.find(['e', 'E']).unwrap_or(full.len());
        let (mantissa, rest) = full.split_at(split_at);
        format!("{}{rest}", strip_trailing_zeros(mantissa))
    } else {
        let decimals = (p as i32 - 1 - exp).max(0) as usize;
        strip_trailing_zeros(&format!("{:.*}", decimals, value))
    }
}

fn strip_trailing_zeros(s: &str) -> String {
    if !s.contains('.') {
        return s.to_string();
    }
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f(spec: &str, v: f64) -> String {
        FmtSpec::parse(spec).unwrap().apply(v)
    }

    #[test]
    fn fixed_point() {
        assert_eq!(f("%.3f", 1.23456), "1.235");
        assert_eq!(f("%.3f", -0.5), "-0.500");
        assert_eq!(f("%.0f", 120.0), "120");
        assert_eq!(f("%.2f", 2.0), "2.00");
        assert_eq!(f("%f", 1.5), "1.500000");
    }

    #[test]
    fn exponent_is_c_style() {
        assert_eq!(f("%.2e", 1234.5), "1.23e+03");
        assert_eq!(f("%.1E", 0.000123), "1.2E-04");
        assert_eq!(f("%.2e", 0.0), "0.00e+00");
    }

    #[test]
    fn general_switches_notation() {
        assert_eq!(f("%g", 0.0001), "0.0001");
        assert_eq!(f("%g", 0.00001), "1e-05");
        assert_eq!(f("%.3g", 1234.0), "1.23e+03");
        assert_eq!(f("%.3g", 12.5), "12.5");
        assert_eq!(f("%g", 100.0), "100");
    }

    #[test]
    fn integers_flags_and_width() {
        assert_eq!(f("%d", 41.6), "42");
        assert_eq!(f("%+.1f", 2.0), "+2.0");
        assert_eq!(f("%6.2f", 3.14159), "  3.14");
        assert_eq!(f("%-6.2f|", 3.14159), "3.14  |");
        assert_eq!(f("%06.2f", -3.14159), "-03.14");
    }

    #[test]
    fn literal_text_and_percent() {
        assert_eq!(f("%.1f%%", 12.34), "12.3%");
        assert_eq!(f("~%.1f", 1.0), "~1.0");
    }

    #[test]
    fn non_finite_is_blank() {
        assert_eq!(f("%.3f", f64::NAN), "");
        assert_eq!(f("%.3f", f64::INFINITY), "");
    }

    #[test]
    fn rejects_malformed_specs() {
        for bad in ["", "abc", "%", "%.3", "%.3q", "%.3f %.2f", "%s"] {
            let err = FmtSpec::parse(bad).unwrap_err();
            assert_eq!(err.exit_code(), 4, "{bad}");
        }
    }
}
