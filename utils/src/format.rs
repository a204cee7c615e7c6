//! Display formatting for amounts and counters.

use mgrant_types::MicroAmount;

/// Ticker shown after token amounts.
pub const TOKEN_SYMBOL: &str = "STX";

/// Format a micro-unit amount with thousands separators, e.g. `12,500.25 STX`.
pub fn format_amount(amount: MicroAmount) -> String {
    let plain = amount.to_string();
    let (whole, frac) = match plain.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (plain.as_str(), None),
    };
    let grouped = group_thousands(whole);
    match frac {
        Some(f) => format!("{grouped}.{f} {TOKEN_SYMBOL}"),
        None => format!("{grouped} {TOKEN_SYMBOL}"),
    }
}

/// Compact counter: `950`, `1.2K`, `3.4M`.
pub fn format_compact(n: u64) -> String {
    if n < 1_000 {
        n.to_string()
    } else if n < 1_000_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    }
}

/// Basis points as a percentage with one decimal, e.g. `6250` -> `62.5%`.
pub fn format_bps(bps: u32) -> String {
    format!("{}.{}%", bps / 100, (bps % 100) / 10)
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_are_grouped() {
        assert_eq!(format_amount(MicroAmount::new(12_500_250_000)), "12,500.25 STX");
        assert_eq!(format_amount(MicroAmount::new(999_000_000)), "999 STX");
        assert_eq!(format_amount(MicroAmount::new(1_000_000_000_000)), "1,000,000 STX");
        assert_eq!(format_amount(MicroAmount::ZERO), "0 STX");
    }

    #[test]
    fn compact_counters() {
        assert_eq!(format_compact(950), "950");
        assert_eq!(format_compact(1_240), "1.2K");
        assert_eq!(format_compact(3_400_000), "3.4M");
    }

    #[test]
    fn bps_as_percent() {
        assert_eq!(format_bps(6_250), "62.5%");
        assert_eq!(format_bps(10_000), "100.0%");
        assert_eq!(format_bps(5), "0.0%");
    }
}
