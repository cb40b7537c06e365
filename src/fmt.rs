//! Shared formatting utilities for size display and console output

use console::Emoji;

/// Package emoji for the tool banner
pub const PACKAGE: Emoji = Emoji("📦", "#");

/// Magnifier emoji for measurement steps
pub const MICROSCOPE: Emoji = Emoji("🔎", ">>");

/// Checkmark emoji for success
pub const CHECKMARK: Emoji = Emoji("✅", "[OK]");

/// Hammer emoji for build operations
pub const HAMMER: Emoji = Emoji("🔨", ">");

/// Sparkles emoji for completion/success
pub const SPARKLES: Emoji = Emoji("✨", "*");

/// Info emoji for informational messages
pub const INFO: Emoji = Emoji("ℹ️", "i");

/// Chart emoji for metrics/statistics
pub const CHART: Emoji = Emoji("📊", "~");

/// Warning emoji for caution/alerts
pub const WARNING: Emoji = Emoji("⚠️", "!");

/// Pick the emoji or its ASCII fallback.
///
/// The fallback is used when `NO_EMOJI` is set (`--no-emoji`) or the
/// terminal cannot render emoji.
pub fn icon(emoji: Emoji<'static, 'static>) -> &'static str {
    if std::env::var_os("NO_EMOJI").is_some() || !console::Term::stdout().features().wants_emoji() {
        emoji.1
    } else {
        emoji.0
    }
}

const UNITS: [&str; 5] = ["KB", "MB", "GB", "TB", "PB"];

/// Format bytes as a compact human-readable size string.
///
/// Base 1024, at most two decimals, trailing zeros dropped and no space
/// between value and unit.
///
/// # Examples
///
/// ```
/// use bundle_checker::fmt::format_bytes;
///
/// assert_eq!(format_bytes(0), "0B");
/// assert_eq!(format_bytes(1000), "1000B");
/// assert_eq!(format_bytes(1024), "1KB");
/// assert_eq!(format_bytes(2000), "1.95KB");
/// assert_eq!(format_bytes(1_572_864), "1.5MB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{}B", bytes);
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = UNITS[0];
    for next in &UNITS[1..] {
        if value < 1024.0 {
            break;
        }
        value /= 1024.0;
        unit = next;
    }

    format!("{}{}", trim_decimals(&format!("{:.2}", value)), unit)
}

/// Parse a size such as `1572864`, `500KB` or `1.5MB` into bytes.
///
/// Units are case-insensitive and use base 1024, matching [`format_bytes`].
///
/// # Examples
///
/// ```
/// use bundle_checker::fmt::parse_size;
///
/// assert_eq!(parse_size("1000"), Ok(1000));
/// assert_eq!(parse_size("1.5MB"), Ok(1_572_864));
/// assert_eq!(parse_size("2 kb"), Ok(2048));
/// assert!(parse_size("lots").is_err());
/// ```
pub fn parse_size(input: &str) -> Result<u64, String> {
    let trimmed = input.trim();
    let split = trimmed
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(trimmed.len());
    let (number, unit) = trimmed.split_at(split);

    let value: f64 = number
        .parse()
        .map_err(|_| format!("'{}' is not a size (try 1572864, 500KB or 1.5MB)", input))?;

    let unit = unit.trim().to_ascii_uppercase();
    let exponent = match unit.as_str() {
        "" | "B" => 0,
        other => UNITS
            .iter()
            .position(|u| *u == other)
            .map(|i| i as i32 + 1)
            .ok_or_else(|| format!("unknown size unit '{}'", other))?,
    };

    let bytes = value * 1024f64.powi(exponent);
    if !bytes.is_finite() || bytes > u64::MAX as f64 {
        return Err(format!("'{}' is too large", input));
    }
    Ok(bytes.round() as u64)
}

/// Drop trailing zeros (and a dangling dot) from a fixed-point string.
fn trim_decimals(fixed: &str) -> &str {
    if !fixed.contains('.') {
        return fixed;
    }
    fixed.trim_end_matches('0').trim_end_matches('.')
}
