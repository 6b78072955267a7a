//! Card input normalization.
//!
//! Pure functions that turn raw keystroke input into display strings for a
//! card form: grouped card number, `MM/YY` expiry and CVV. Brand detection
//! works on leading-digit prefixes and the Luhn checksum catches single-digit
//! typos. Nothing here touches the network or keeps state between calls.

use serde::{Deserialize, Serialize};

/// Maximum digits kept for a standard (4-4-4-4) card number
pub const MAX_CARD_DIGITS: usize = 16;

/// Maximum digits kept for an Amex (4-6-5) card number
pub const MAX_AMEX_DIGITS: usize = 15;

/// Card numbers shorter than this never pass the checksum
pub const MIN_LUHN_DIGITS: usize = 13;

/// Digit-count range the form accepts as a complete card number
pub const CARD_LENGTH_RANGE: std::ops::RangeInclusive<usize> = 13..=19;

const STANDARD_GROUPS: &[usize] = &[4, 4, 4, 4];
const AMEX_GROUPS: &[usize] = &[4, 6, 5];

/// Card network detected from the leading digits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardBrand {
    Visa,
    Mastercard,
    Amex,
    Discover,
    Jcb,
    DinersClub,
    UnionPay,
}

impl CardBrand {
    /// Human-readable network name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Visa => "Visa",
            Self::Mastercard => "Mastercard",
            Self::Amex => "American Express",
            Self::Discover => "Discover",
            Self::Jcb => "JCB",
            Self::DinersClub => "Diners Club",
            Self::UnionPay => "UnionPay",
        }
    }

    /// Short badge shown next to the number field
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Visa => "VISA",
            Self::Mastercard => "MC",
            Self::Amex => "AMEX",
            Self::Discover => "DISC",
            Self::Jcb => "JCB",
            Self::DinersClub => "DC",
            Self::UnionPay => "UP",
        }
    }
}

impl std::fmt::Display for CardBrand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Inclusive numeric range over the first `len` digits
struct PrefixRange {
    len: usize,
    lo: u32,
    hi: u32,
}

const fn prefix(len: usize, lo: u32, hi: u32) -> PrefixRange {
    PrefixRange { len, lo, hi }
}

impl PrefixRange {
    fn matches(&self, digits: &str) -> bool {
        digits
            .get(..self.len)
            .and_then(|head| head.parse::<u32>().ok())
            .is_some_and(|value| (self.lo..=self.hi).contains(&value))
    }
}

// Checked top to bottom; Discover's 622126-622925 block has to win over
// UnionPay's broader 62 prefix.
const BRAND_RULES: &[(CardBrand, &[PrefixRange])] = &[
    (CardBrand::Visa, &[prefix(1, 4, 4)]),
    (
        CardBrand::Mastercard,
        &[prefix(2, 51, 55), prefix(4, 2221, 2720)],
    ),
    (CardBrand::Amex, &[prefix(2, 34, 34), prefix(2, 37, 37)]),
    (
        CardBrand::Discover,
        &[
            prefix(4, 6011, 6011),
            prefix(2, 65, 65),
            prefix(3, 644, 649),
            prefix(6, 622126, 622925),
        ],
    ),
    (CardBrand::Jcb, &[prefix(4, 3528, 3589)]),
    (
        CardBrand::DinersClub,
        &[prefix(3, 300, 305), prefix(2, 36, 36), prefix(2, 38, 38)],
    ),
    (CardBrand::UnionPay, &[prefix(2, 62, 62)]),
];

fn digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

fn is_amex_prefix(digits: &str) -> bool {
    digits.starts_with("34") || digits.starts_with("37")
}

fn group_digits(digits: &str, sizes: &[usize]) -> String {
    let mut parts = Vec::with_capacity(sizes.len());
    let mut rest = digits;
    for &size in sizes {
        if rest.is_empty() {
            break;
        }
        let (head, tail) = rest.split_at(size.min(rest.len()));
        parts.push(head);
        rest = tail;
    }
    parts.join(" ")
}

/// Group a card number for display.
///
/// Non-digits are dropped. Amex prefixes (`34`, `37`) group as 4-6-5 and keep
/// at most 15 digits, everything else groups as 4-4-4-4 with at most 16.
/// Input with fewer than four digits is returned untouched.
pub fn format_card_number(raw: &str) -> String {
    let digits = digits_only(raw);
    if digits.len() < 4 {
        return raw.to_string();
    }

    let (limit, groups) = if is_amex_prefix(&digits) {
        (MAX_AMEX_DIGITS, AMEX_GROUPS)
    } else {
        (MAX_CARD_DIGITS, STANDARD_GROUPS)
    };
    let kept = &digits[..digits.len().min(limit)];
    group_digits(kept, groups)
}

/// Format an expiry as `MM/YY`. No calendar validation: `"9999"` gives `"99/99"`.
pub fn format_expiry(raw: &str) -> String {
    let digits: String = digits_only(raw).chars().take(4).collect();
    if digits.len() >= 2 {
        format!("{}/{}", &digits[..2], &digits[2..])
    } else {
        digits
    }
}

/// Keep up to four digits of a security code
pub fn format_cvv(raw: &str) -> String {
    digits_only(raw).chars().take(4).collect()
}

/// Detect the card network from the leading digits.
///
/// Returns `None` for empty input or an unknown prefix.
pub fn detect_card_type(number: &str) -> Option<CardBrand> {
    let digits = digits_only(number);
    if digits.is_empty() {
        return None;
    }

    BRAND_RULES
        .iter()
        .find(|(_, ranges)| ranges.iter().any(|range| range.matches(&digits)))
        .map(|(brand, _)| *brand)
}

/// Luhn (mod 10) checksum over the digits of `number`
pub fn validate_luhn(number: &str) -> bool {
    let digits: Vec<u32> = number.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() < MIN_LUHN_DIGITS {
        return false;
    }

    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(idx, &digit)| {
            if idx % 2 == 1 {
                let doubled = digit * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                digit
            }
        })
        .sum();

    sum % 10 == 0
}

/// A card number as typed into the form, kept as bare digits
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardInput {
    digits: String,
}

impl CardInput {
    /// Normalize raw input the same way the display formatter does
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self {
            digits: digits_only(&format_card_number(raw)),
        }
    }

    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// Grouped display string (at most 19 characters, 17 for Amex)
    pub fn display(&self) -> String {
        format_card_number(&self.digits)
    }

    pub fn brand(&self) -> Option<CardBrand> {
        detect_card_type(&self.digits)
    }

    pub fn last_four(&self) -> Option<&str> {
        self.digits.get(self.digits.len().checked_sub(4)?..)
    }

    /// Length-only completeness check used to enable the submit button
    pub fn is_complete(&self) -> bool {
        CARD_LENGTH_RANGE.contains(&self.digits.len())
    }

    pub fn passes_checksum(&self) -> bool {
        validate_luhn(&self.digits)
    }

    /// Complete and checksum-valid
    pub fn is_valid(&self) -> bool {
        self.is_complete() && self.passes_checksum()
    }
}

/// State of the card entry step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDetails {
    pub holder_name: String,
    pub number: CardInput,
    pub expiry: String,
    pub cvv: String,
}

impl CardDetails {
    pub fn set_holder_name(&mut self, raw: &str) {
        self.holder_name = raw.to_string();
    }

    pub fn set_number(&mut self, raw: &str) {
        self.number = CardInput::parse(raw);
    }

    pub fn set_expiry(&mut self, raw: &str) {
        self.expiry = format_expiry(raw);
    }

    pub fn set_cvv(&mut self, raw: &str) {
        self.cvv = format_cvv(raw);
    }

    fn expiry_is_complete(&self) -> bool {
        let bytes = self.expiry.as_bytes();
        bytes.len() == 5
            && bytes[2] == b'/'
            && bytes[..2].iter().chain(&bytes[3..]).all(u8::is_ascii_digit)
    }

    /// Every field is filled in and the card number passes validation
    pub fn is_submittable(&self) -> bool {
        !self.holder_name.trim().is_empty()
            && self.number.is_valid()
            && self.expiry_is_complete()
            && (3..=4).contains(&self.cvv.len())
    }
}
