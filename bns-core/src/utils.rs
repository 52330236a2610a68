//! Small helpers: address checks, unit conversion, money formatting, fs.

use std::path::Path;
use std::str::FromStr;

use alloy::primitives::{utils, Address, U256};

use crate::error::{BnsError, Result};

/// True if `address` is a `0x`-prefixed 20-byte hex address.
///
/// All-lowercase and all-uppercase digits are accepted as is; mixed case must
/// carry a valid EIP-55 checksum.
pub fn is_eth_address(address: &str) -> bool {
    let Some(digits) = address.strip_prefix("0x") else {
        return false;
    };
    if digits.len() != 40 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return false;
    }

    let single_case = !digits.bytes().any(|b| b.is_ascii_uppercase())
        || !digits.bytes().any(|b| b.is_ascii_lowercase());
    single_case || Address::parse_checksummed(address, None).is_ok()
}

/// Parses an address, mapping failures to a validation error.
pub fn parse_address(address: &str) -> Result<Address> {
    Address::from_str(address.trim())
        .map_err(|e| BnsError::ValidationError(format!("invalid address '{}': {}", address, e)))
}

/// Parses a decimal ether amount into wei.
pub fn parse_ether(amount: &str) -> Result<U256> {
    utils::parse_ether(amount.trim())
        .map_err(|e| BnsError::ValidationError(format!("invalid ether amount '{}': {}", amount, e)))
}

/// 256-bit two's complement of `num`, as a 0x-prefixed 32-byte hex word.
pub fn num_to_bytes32(num: i128) -> String {
    let word = if num >= 0 {
        U256::from(num as u128)
    } else {
        U256::MAX - U256::from((-(num + 1)) as u128)
    };
    format!("0x{}", hex::encode(word.to_be_bytes::<32>()))
}

/// Left-pads a hex string (without prefix) to 64 digits and adds `0x`.
pub fn pad_to_bytes32(hex_digits: &str) -> String {
    let digits = hex_digits.strip_prefix("0x").unwrap_or(hex_digits);
    format!("0x{:0>64}", digits)
}

/// Inserts thousands separators into the integer part of a decimal string.
///
/// A missing fractional part becomes `.0`.
pub fn money_format(amount: &str) -> String {
    let mut parts = amount.splitn(2, '.');
    let integer = parts.next().unwrap_or("0");
    let decimals = parts.next().filter(|d| !d.is_empty()).unwrap_or("0");

    let (sign, digits) = match integer.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", integer),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    format!("{}{}.{}", sign, grouped, decimals)
}

/// Formats with 2 decimals when `num >= 1`, otherwise keeps `places`
/// significant decimals after the leading zeros.
pub fn to_fixed(num: f64, places: usize) -> String {
    if num >= 1.0 {
        return format!("{:.2}", num);
    }

    let repr = num.to_string();
    let leading_zeros = repr
        .split('.')
        .nth(1)
        .map(|frac| frac.chars().take_while(|c| *c == '0').count())
        .unwrap_or(0);

    format!("{:.*}", leading_zeros + places, num)
}

/// `money_format(to_fixed(num, 4))`.
pub fn format_money(num: f64) -> String {
    money_format(&to_fixed(num, 4))
}

/// Days to milliseconds.
pub fn days_to_millis(days: u64) -> u64 {
    60 * 60 * 24 * days * 1000
}

/// Hours to milliseconds.
pub fn hours_to_millis(hours: u64) -> u64 {
    60 * 60 * hours * 1000
}

/// Minutes to milliseconds.
pub fn minutes_to_millis(minutes: u64) -> u64 {
    60 * minutes * 1000
}

/// Upper-cases the first character.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// True if the path exists and is readable metadata-wise.
pub async fn path_exists(path: impl AsRef<Path>) -> bool {
    tokio::fs::metadata(path.as_ref()).await.is_ok()
}

/// Creates a directory and its parents if missing.
pub async fn ensure_dir(path: impl AsRef<Path>) -> Result<()> {
    tokio::fs::create_dir_all(path.as_ref()).await?;
    Ok(())
}

/// Removes a file; a missing file is not an error.
pub async fn remove_file_if_exists(path: impl AsRef<Path>) -> Result<()> {
    match tokio::fs::remove_file(path.as_ref()).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_is_eth_address() {
        assert!(is_eth_address("0x5ea7D6A33D3655F661C298ac8086708148883c34"));
        assert!(is_eth_address("0x0000000000000000000000000000000000000000"));
        assert!(!is_eth_address("0x5ea7D6A33D"));
        assert!(!is_eth_address("5ea7D6A33D3655F661C298ac8086708148883c3411"));
    }

    #[test]
    fn test_is_eth_address_checks_mixed_case_checksum() {
        assert!(is_eth_address("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"));
        assert!(is_eth_address("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"));
        assert!(is_eth_address("0x5AAEB6053F3E94C9B9A09F33669435E7EF1BEAED"));
        assert!(!is_eth_address("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAeD"));
        assert!(!is_eth_address("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAeg"));
    }

    #[test]
    fn test_parse_ether() {
        assert_eq!(parse_ether("1").unwrap(), U256::from(10u64).pow(U256::from(18u64)));
        assert_eq!(parse_ether("0.5").unwrap(), U256::from(500_000_000_000_000_000u64));
        assert!(parse_ether("abc").is_err());
    }

    #[test]
    fn test_num_to_bytes32() {
        assert_eq!(num_to_bytes32(1), format!("0x{}1", "0".repeat(63)));
        assert_eq!(num_to_bytes32(-1), format!("0x{}", "f".repeat(64)));
        assert_eq!(num_to_bytes32(-2), format!("0x{}e", "f".repeat(63)));
    }

    #[test]
    fn test_pad_to_bytes32() {
        assert_eq!(pad_to_bytes32("ff"), format!("0x{}ff", "0".repeat(62)));
        assert_eq!(pad_to_bytes32("0xff").len(), 66);
    }

    #[test_case("1234567.89", "1,234,567.89" ; "millions")]
    #[test_case("123", "123.0" ; "no decimals")]
    #[test_case("1000", "1,000.0" ; "thousand")]
    #[test_case("-98765.4", "-98,765.4" ; "negative")]
    fn test_money_format(input: &str, expected: &str) {
        assert_eq!(money_format(input), expected);
    }

    #[test_case(1234.5678, "1234.57" ; "above one")]
    #[test_case(0.5, "0.5000" ; "no leading zeros")]
    #[test_case(0.000123456, "0.0001235" ; "three leading zeros")]
    fn test_to_fixed(input: f64, expected: &str) {
        assert_eq!(to_fixed(input, 4), expected);
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(1234567.891), "1,234,567.89");
    }

    #[test]
    fn test_time_conversions() {
        assert_eq!(days_to_millis(1), 86_400_000);
        assert_eq!(hours_to_millis(2), 7_200_000);
        assert_eq!(minutes_to_millis(3), 180_000);
    }

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("registrar"), "Registrar");
        assert_eq!(capitalize_first(""), "");
    }

    #[tokio::test]
    async fn test_fs_helpers() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/c");

        ensure_dir(&nested).await.unwrap();
        assert!(path_exists(&nested).await);

        let file = nested.join("x.json");
        tokio::fs::write(&file, b"{}").await.unwrap();
        remove_file_if_exists(&file).await.unwrap();
        assert!(!path_exists(&file).await);
        remove_file_if_exists(&file).await.unwrap();
    }
}
