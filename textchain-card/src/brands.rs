//! Card brand catalog

use regex::Regex;
use std::sync::LazyLock;

/// Name reported when no brand pattern matches
pub const UNKNOWN: &str = "Unknown";

/// One card network: display name, prefix/length pattern, allowed lengths
#[derive(Debug)]
pub struct CardBrand {
    pub name: &'static str,
    pub pattern: Regex,
    pub valid_lengths: &'static [usize],
}

impl CardBrand {
    fn new(name: &'static str, pattern: &str, valid_lengths: &'static [usize]) -> Self {
        Self {
            name,
            // Catalog patterns are constants covered by tests
            pattern: Regex::new(pattern).expect("card brand pattern"),
            valid_lengths,
        }
    }

    pub fn accepts_length(&self, len: usize) -> bool {
        self.valid_lengths.contains(&len)
    }
}

/// Brands in match-priority order
pub static CARD_BRANDS: LazyLock<Vec<CardBrand>> = LazyLock::new(|| {
    vec![
        CardBrand::new("Visa", r"^4[0-9]{12}(?:[0-9]{3})?(?:[0-9]{3})?$", &[13, 16, 19]),
        CardBrand::new("Verve", r"^(?:506[01]|507[89]|6500)[0-9]{12,15}$", &[16, 18, 19]),
        CardBrand::new(
            "Mastercard",
            r"^(?:5[1-5][0-9]{14}|2(?:22[1-9][0-9]{12}|2[3-9][0-9]{13}|[3-6][0-9]{14}|7[01][0-9]{13}|720[0-9]{12}))$",
            &[16],
        ),
        CardBrand::new("American Express", r"^3[47][0-9]{13}$", &[15]),
        CardBrand::new("Discover", r"^6(?:011|5[0-9]{2})[0-9]{12}$", &[16]),
        CardBrand::new("Diners Club", r"^3(?:0[0-5]|[68][0-9])[0-9]{11}$", &[14]),
        // 2131 and 1800 prefixes are 15 digits, 35xx is 16
        CardBrand::new("JCB", r"^(?:2131|1800|35[0-9]{3})[0-9]{11}$", &[15, 16]),
    ]
});

/// Catalog entry by display name
pub fn find_brand(name: &str) -> Option<&'static CardBrand> {
    CARD_BRANDS.iter().find(|b| b.name == name)
}
