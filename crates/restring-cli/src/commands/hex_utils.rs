//! Numeric argument parsing for offsets and ranges.

use anyhow::Result;
use restring_core::FreeRange;

/// Parse an image offset given as `0x` hex, `0o` octal or plain decimal.
pub fn parse_offset(s: &str) -> Result<usize> {
    let t = s.trim();
    let (digits, radix) = if let Some(hex) = t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")) {
        (hex, 16)
    } else if let Some(oct) = t.strip_prefix("0o").or_else(|| t.strip_prefix("0O")) {
        (oct, 8)
    } else {
        (t, 10)
    };
    usize::from_str_radix(digits, radix)
        .map_err(|e| anyhow::anyhow!("Invalid offset {s:?}: {e}"))
}

/// Parse a free-range argument of the form `START:END`.
pub fn parse_range(s: &str) -> Result<FreeRange> {
    let Some((start, end)) = s.split_once(':') else {
        anyhow::bail!("Invalid range {s:?}: expected START:END");
    };
    Ok(FreeRange::new(parse_offset(start)?, parse_offset(end)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_offset_radix_prefixes() {
        assert_eq!(parse_offset("0x4F000").unwrap(), 0x4F000);
        assert_eq!(parse_offset("0X10").unwrap(), 16);
        assert_eq!(parse_offset("0o20").unwrap(), 16);
        assert_eq!(parse_offset("1000").unwrap(), 1000);
    }

    #[test]
    fn test_parse_offset_invalid() {
        assert!(parse_offset("0xZZZ").is_err());
        assert!(parse_offset("ten").is_err());
        assert!(parse_offset("").is_err());
    }

    #[test]
    fn test_parse_range() {
        let range = parse_range("0x4F000:0x50000").unwrap();
        assert_eq!(range.start(), 0x4F000);
        assert_eq!(range.end(), 0x50000);

        let mixed = parse_range("1024:0x500").unwrap();
        assert_eq!(mixed.start(), 1024);
        assert_eq!(mixed.end(), 0x500);
    }

    #[test]
    fn test_parse_range_requires_separator() {
        assert!(parse_range("0x1000").is_err());
        assert!(parse_range("0x1000-0x2000").is_err());
    }
}
