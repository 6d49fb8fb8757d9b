use std::fmt::{self, Write as _};
use std::sync::Arc;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Host-supplied label callback. Returning `None` (or an empty string) asks
/// for the default label instead.
///
/// Runs synchronously on the paint path once per visible label per frame, so
/// it must not block.
pub type LabelFormatterFn = Arc<dyn Fn(f64) -> Option<String> + Send + Sync + 'static>;

/// Label used whenever no formatter produces text: the value rounded to an
/// integer, as `%.0f` would.
#[must_use]
pub fn default_label(value: f64) -> String {
    format!("{value:.0}")
}

/// Unit of the epoch values fed to a date formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EpochUnit {
    #[default]
    Seconds,
    Millis,
}

/// Produces axis and value label text.
#[derive(Clone, Default)]
pub enum LabelFormatter {
    #[default]
    Default,
    Number(NumberFormat),
    Date(DateFormat),
    Custom(LabelFormatterFn),
}

impl fmt::Debug for LabelFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("Default"),
            Self::Number(format) => f.debug_tuple("Number").field(format).finish(),
            Self::Date(format) => f.debug_tuple("Date").field(format).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl LabelFormatter {
    /// printf-style numeric formatter; an empty pattern selects the default.
    pub fn number(pattern: &str) -> ChartResult<Self> {
        if pattern.is_empty() {
            return Ok(Self::Default);
        }
        NumberFormat::parse(pattern).map(Self::Number)
    }

    /// strftime-style date formatter; an empty pattern selects the default.
    pub fn date(pattern: &str, unit: EpochUnit, utc_offset_minutes: i32) -> ChartResult<Self> {
        if pattern.is_empty() {
            return Ok(Self::Default);
        }
        DateFormat::new(pattern, unit, utc_offset_minutes).map(Self::Date)
    }

    #[must_use]
    pub fn custom(callback: impl Fn(f64) -> Option<String> + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(callback))
    }

    #[must_use]
    pub fn format(&self, value: f64) -> String {
        let text = match self {
            Self::Default => None,
            Self::Number(format) => Some(format.format(value)),
            Self::Date(format) => format.format(value),
            Self::Custom(callback) => callback(value),
        };
        match text {
            Some(text) if !text.is_empty() => text,
            _ => default_label(value),
        }
    }
}

/// Calendar formatter over an epoch value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormat {
    pattern: String,
    unit: EpochUnit,
    offset: FixedOffset,
}

impl DateFormat {
    pub fn new(pattern: &str, unit: EpochUnit, utc_offset_minutes: i32) -> ChartResult<Self> {
        if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
            return Err(ChartError::InvalidConfig(format!(
                "invalid date label pattern `{pattern}`"
            )));
        }
        let offset = FixedOffset::east_opt(utc_offset_minutes.saturating_mul(60)).ok_or_else(
            || {
                ChartError::InvalidConfig(format!(
                    "date label utc offset out of range: {utc_offset_minutes} minutes"
                ))
            },
        )?;
        Ok(Self {
            pattern: pattern.to_owned(),
            unit,
            offset,
        })
    }

    /// `None` when the value does not map onto a representable instant.
    #[must_use]
    pub fn format(&self, value: f64) -> Option<String> {
        if !value.is_finite() {
            return None;
        }
        let millis = match self.unit {
            EpochUnit::Seconds => value * 1_000.0,
            EpochUnit::Millis => value,
        };
        if millis.abs() >= i64::MAX as f64 {
            return None;
        }
        let instant = DateTime::from_timestamp_millis(millis.round() as i64)?;
        let local = instant.with_timezone(&self.offset);
        let mut out = String::new();
        write!(out, "{}", local.format_with_items(StrftimeItems::new(&self.pattern))).ok()?;
        Some(out)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conversion {
    Decimal,
    Fixed,
    Exponent { upper: bool },
    General { upper: bool },
    Hex { upper: bool },
    Octal,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Flags {
    left_align: bool,
    plus: bool,
    space: bool,
    zero_pad: bool,
    alternate: bool,
    grouping: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ConversionSpec {
    flags: Flags,
    width: usize,
    precision: Option<usize>,
    conversion: Conversion,
}

/// Parsed printf-style pattern: literal text around at most one conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormat {
    prefix: String,
    spec: Option<ConversionSpec>,
    suffix: String,
}

impl NumberFormat {
    pub fn parse(pattern: &str) -> ChartResult<Self> {
        let invalid = |reason: &str| {
            ChartError::InvalidConfig(format!("invalid number label format `{pattern}`: {reason}"))
        };

        let mut prefix = String::new();
        let mut suffix = String::new();
        let mut spec = None;
        let mut chars = pattern.chars().peekable();

        while let Some(ch) = chars.next() {
            if ch != '%' {
                if spec.is_none() {
                    prefix.push(ch);
                } else {
                    suffix.push(ch);
                }
                continue;
            }
            if chars.peek() == Some(&'%') {
                chars.next();
                if spec.is_none() {
                    prefix.push('%');
                } else {
                    suffix.push('%');
                }
                continue;
            }
            if spec.is_some() {
                return Err(invalid("only one conversion is supported"));
            }

            let mut flags = Flags::default();
            while let Some(&flag) = chars.peek() {
                match flag {
                    '-' => flags.left_align = true,
                    '+' => flags.plus = true,
                    ' ' => flags.space = true,
                    '0' => flags.zero_pad = true,
                    '#' => flags.alternate = true,
                    ',' => flags.grouping = true,
                    _ => break,
                }
                chars.next();
            }

            let mut width = 0usize;
            while let Some(digit) = chars.peek().and_then(|ch| ch.to_digit(10)) {
                width = width.saturating_mul(10).saturating_add(digit as usize);
                chars.next();
            }

            let mut precision = None;
            if chars.peek() == Some(&'.') {
                chars.next();
                let mut value = 0usize;
                while let Some(digit) = chars.peek().and_then(|ch| ch.to_digit(10)) {
                    value = value.saturating_mul(10).saturating_add(digit as usize);
                    chars.next();
                }
                if value > 32 {
                    return Err(invalid("precision must be <= 32"));
                }
                precision = Some(value);
            }

            let conversion = match chars.next() {
                Some('d' | 'i') => Conversion::Decimal,
                Some('f' | 'F') => Conversion::Fixed,
                Some('e') => Conversion::Exponent { upper: false },
                Some('E') => Conversion::Exponent { upper: true },
                Some('g') => Conversion::General { upper: false },
                Some('G') => Conversion::General { upper: true },
                Some('x') => Conversion::Hex { upper: false },
                Some('X') => Conversion::Hex { upper: true },
                Some('o') => Conversion::Octal,
                Some('s') => Conversion::Text,
                Some(other) => return Err(invalid(&format!("unsupported conversion `{other}`"))),
                None => return Err(invalid("dangling `%`")),
            };

            spec = Some(ConversionSpec {
                flags,
                width,
                precision,
                conversion,
            });
        }

        Ok(Self {
            prefix,
            spec,
            suffix,
        })
    }

    #[must_use]
    pub fn format(&self, value: f64) -> String {
        let mut out = self.prefix.clone();
        if let Some(spec) = self.spec {
            out.push_str(&format_conversion(spec, value));
        }
        out.push_str(&self.suffix);
        out
    }
}

fn format_conversion(spec: ConversionSpec, value: f64) -> String {
    let flags = spec.flags;
    let zero_pad = flags.zero_pad && !flags.left_align;

    if !value.is_finite() {
        let body = if value.is_nan() { "NaN" } else { "Infinity" };
        let sign = sign_prefix(value == f64::NEG_INFINITY, flags);
        return pad(sign, body.to_owned(), spec.width, flags.left_align, false);
    }

    let negative = value < 0.0;
    let magnitude = value.abs();
    let (prefix, body) = match spec.conversion {
        Conversion::Decimal => {
            let digits = format!("{:.0}", magnitude.round());
            let digits = if flags.grouping {
                group_thousands(&digits)
            } else {
                digits
            };
            (sign_prefix(value.round() < 0.0, flags), digits)
        }
        Conversion::Fixed => {
            let precision = spec.precision.unwrap_or(6);
            let mut body = format!("{magnitude:.precision$}");
            if flags.grouping {
                body = group_fixed(&body);
            }
            if flags.alternate && precision == 0 {
                body.push('.');
            }
            (sign_prefix(negative, flags), body)
        }
        Conversion::Exponent { upper } => (
            sign_prefix(negative, flags),
            c_exponent(magnitude, spec.precision.unwrap_or(6), upper),
        ),
        Conversion::General { upper } => (
            sign_prefix(negative, flags),
            c_general(
                magnitude,
                spec.precision.unwrap_or(6),
                upper,
                flags.alternate,
            ),
        ),
        Conversion::Hex { upper } => {
            let integer = value.round() as i64;
            let body = if upper {
                format!("{integer:X}")
            } else {
                format!("{integer:x}")
            };
            let radix = match (flags.alternate, upper) {
                (true, false) => "0x",
                (true, true) => "0X",
                (false, _) => "",
            };
            (radix, body)
        }
        Conversion::Octal => {
            let integer = value.round() as i64;
            (if flags.alternate { "0" } else { "" }, format!("{integer:o}"))
        }
        Conversion::Text => {
            let text = value.to_string();
            let text = match spec.precision {
                Some(limit) => text.chars().take(limit).collect(),
                None => text,
            };
            return pad("", text, spec.width, flags.left_align, false);
        }
    };

    pad(prefix, body, spec.width, flags.left_align, zero_pad)
}

fn sign_prefix(negative: bool, flags: Flags) -> &'static str {
    if negative {
        "-"
    } else if flags.plus {
        "+"
    } else if flags.space {
        " "
    } else {
        ""
    }
}

fn pad(prefix: &str, body: String, width: usize, left_align: bool, zero_pad: bool) -> String {
    let len = prefix.chars().count() + body.chars().count();
    let fill = width.saturating_sub(len);
    if fill == 0 {
        format!("{prefix}{body}")
    } else if left_align {
        format!("{prefix}{body}{}", " ".repeat(fill))
    } else if zero_pad {
        format!("{prefix}{}{body}", "0".repeat(fill))
    } else {
        format!("{}{prefix}{body}", " ".repeat(fill))
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn group_fixed(body: &str) -> String {
    match body.split_once('.') {
        Some((integer, fraction)) => format!("{}.{fraction}", group_thousands(integer)),
        None => group_thousands(body),
    }
}

/// `%e`: mantissa with `precision` decimals and an exponent of at least two digits.
fn c_exponent(magnitude: f64, precision: usize, upper: bool) -> String {
    let rust = format!("{magnitude:.precision$e}");
    let (mantissa, exponent) = rust.split_once('e').unwrap_or((rust.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let sign = if exponent < 0 { '-' } else { '+' };
    let marker = if upper { 'E' } else { 'e' };
    format!("{mantissa}{marker}{sign}{:02}", exponent.abs())
}

/// `%g`: fixed or exponent notation depending on the decimal exponent, with
/// trailing zeros removed unless `alternate` is set.
fn c_general(magnitude: f64, precision: usize, upper: bool, alternate: bool) -> String {
    let significant = precision.max(1);
    let probe = format!("{magnitude:.prec$e}", prec = significant - 1);
    let exponent: i32 = probe
        .split_once('e')
        .and_then(|(_, exp)| exp.parse().ok())
        .unwrap_or(0);

    let body = if exponent < -4 || exponent >= significant as i32 {
        c_exponent(magnitude, significant - 1, upper)
    } else {
        let decimals = (significant as i32 - 1 - exponent).max(0) as usize;
        format!("{magnitude:.decimals$}")
    };

    if alternate {
        return body;
    }
    strip_trailing_zeros(&body)
}

fn strip_trailing_zeros(body: &str) -> String {
    let (number, exponent) = match body.find(['e', 'E']) {
        Some(index) => body.split_at(index),
        None => (body, ""),
    };
    let number = if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    };
    format!("{number}{exponent}")
}

#[cfg(test)]
mod tests {
    use super::{NumberFormat, c_exponent, c_general, group_thousands};

    #[test]
    fn fixed_precision_and_literals() {
        let format = NumberFormat::parse("$%.2f USD").expect("valid format");
        assert_eq!(format.format(3.14159), "$3.14 USD");
        assert_eq!(format.format(-2.0), "$-2.00 USD");
    }

    #[test]
    fn width_and_padding_flags() {
        assert_eq!(NumberFormat::parse("%6.1f").expect("valid").format(2.34), "   2.3");
        assert_eq!(NumberFormat::parse("%-5d|").expect("valid").format(42.0), "42   |");
        assert_eq!(NumberFormat::parse("%05d").expect("valid").format(-42.0), "-0042");
        assert_eq!(NumberFormat::parse("%+d").expect("valid").format(7.0), "+7");
    }

    #[test]
    fn decimal_rounds_and_groups() {
        assert_eq!(NumberFormat::parse("%d").expect("valid").format(41.6), "42");
        assert_eq!(
            NumberFormat::parse("%,d").expect("valid").format(1_234_567.0),
            "1,234,567"
        );
        assert_eq!(group_thousands("100"), "100");
    }

    #[test]
    fn exponent_and_general_follow_c_conventions() {
        assert_eq!(c_exponent(1500.0, 2, false), "1.50e+03");
        assert_eq!(c_exponent(0.00012, 1, true), "1.2E-04");
        assert_eq!(c_general(100_000.0, 6, false, false), "100000");
        assert_eq!(c_general(1_000_000.0, 6, false, false), "1e+06");
        assert_eq!(c_general(0.5, 6, false, false), "0.5");
    }

    #[test]
    fn hex_octal_and_percent_literal() {
        assert_eq!(NumberFormat::parse("%#x").expect("valid").format(255.0), "0xff");
        assert_eq!(NumberFormat::parse("%o").expect("valid").format(8.0), "10");
        assert_eq!(NumberFormat::parse("%d%%").expect("valid").format(50.0), "50%");
    }

    #[test]
    fn rejects_unsupported_patterns() {
        assert!(NumberFormat::parse("%q").is_err());
        assert!(NumberFormat::parse("%d %d").is_err());
        assert!(NumberFormat::parse("value %").is_err());
    }
}
