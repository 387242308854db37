//! Currency normalization
//!
//! Every exchange speaks its own asset vocabulary ("XBT" on Kraken,
//! "BTC" everywhere else). This module collapses those vocabularies into
//! one canonical code so equality and hashing are exchange-agnostic.
//!
//! Normalization is permissive: a code we have never seen still builds a
//! `Currency` (kind `Unknown`) carrying the uppercased raw code, so one
//! newly listed asset cannot break a whole catalog load.

use std::fmt;

// =============================================================================
// Known currency tables
// =============================================================================

/// (canonical code, display name, symbol)
const FIAT: &[(&str, &str, Option<&str>)] = &[
    ("BRL", "Brazilian Real", Some("R$")),
    ("CAD", "Canadian Dollar", Some("$")),
    ("CNY", "Chinese Yuan", Some("¥")),
    ("EUR", "Euro", Some("€")),
    ("GBP", "British Pound", Some("£")),
    ("JPY", "Japanese Yen", Some("¥")),
    ("KRW", "South Korean Won", Some("₩")),
    ("RUB", "Russian Ruble", Some("₽")),
    ("TRY", "Turkish Lira", Some("₺")),
    ("USD", "United States Dollar", Some("$")),
];

const CRYPTO: &[(&str, &str, Option<&str>)] = &[
    ("ADA", "Cardano", None),
    ("BCH", "Bitcoin Cash", None),
    ("BTC", "Bitcoin", Some("₿")),
    ("DASH", "Dash", None),
    ("DOGE", "Dogecoin", Some("Ð")),
    ("EOS", "EOS", None),
    ("ETC", "Ethereum Classic", Some("⟠")),
    ("ETH", "Ethereum", Some("Ξ")),
    ("GNO", "Gnosis", None),
    ("LTC", "Litecoin", Some("Ł")),
    ("MLN", "Melon", None),
    ("NMC", "Namecoin", Some("ℕ")),
    ("PPC", "Peercoin", Some("Ᵽ")),
    ("REP", "Augur", None),
    ("SOL", "Solana", None),
    ("USDT", "Tether", Some("₮")),
    ("XLM", "Stellar Lumens", None),
    ("XMR", "Monero", Some("ɱ")),
    ("XRP", "Ripple", None),
    ("XTZ", "Tezos", None),
    ("ZEC", "Zcash", None),
];

/// Wire-code aliases used by specific exchanges, mapped to canonical codes.
const ALIASES: &[(&str, &str)] = &[
    ("XBT", "BTC"),  // Kraken, Bitfinex
    ("BCC", "BCH"),  // early Binance listing
    ("DSH", "DASH"), // HitBTC
    ("RUR", "RUB"),  // BTC-E era
    ("STR", "XLM"),  // Poloniex
    ("XDG", "DOGE"), // Kraken
];

/// POSIX locale region -> fiat currency code.
const LOCALE_CURRENCIES: &[(&str, &str)] = &[
    ("AT", "EUR"),
    ("BE", "EUR"),
    ("BR", "BRL"),
    ("CA", "CAD"),
    ("CN", "CNY"),
    ("DE", "EUR"),
    ("ES", "EUR"),
    ("FI", "EUR"),
    ("FR", "EUR"),
    ("GB", "GBP"),
    ("IE", "EUR"),
    ("IT", "EUR"),
    ("JP", "JPY"),
    ("KR", "KRW"),
    ("NL", "EUR"),
    ("PT", "EUR"),
    ("RU", "RUB"),
    ("TR", "TRY"),
    ("US", "USD"),
];

// =============================================================================
// Currency
// =============================================================================

/// Asset classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurrencyKind {
    Crypto,
    Fiat,
    /// Not in the known tables; carries the raw code verbatim.
    Unknown,
}

/// A normalized, immutable currency identity.
///
/// Equality and hashing are defined on the canonical code only, so a
/// `Currency` built from "XBT" equals one built from "BTC".
#[derive(Debug, Clone)]
pub struct Currency {
    code: String,
    kind: CurrencyKind,
}

impl Currency {
    /// Build a currency from a wire code.
    ///
    /// Uppercases the input, strips a single leading Kraken-convention
    /// "X"/"Z" prefix when the remainder resolves to a known code, then
    /// collapses known aliases. Returns `None` only for empty or
    /// non-alphanumeric input; anything else yields at worst an `Unknown`
    /// currency carrying the raw code.
    pub fn from_code(raw: &str) -> Option<Currency> {
        let code = raw.trim().to_ascii_uppercase();
        if code.is_empty() || !code.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return None;
        }
        Some(Self::normalize(code))
    }

    fn normalize(code: String) -> Currency {
        if let Some(known) = Self::lookup(&code) {
            return known;
        }

        // Kraken prefixes crypto codes with "X" and fiat with "Z"
        // (e.g. "XXBT", "ZUSD"). Strip one prefix character, but only when
        // what remains is a code we actually recognize.
        if code.len() >= 4 && (code.starts_with('X') || code.starts_with('Z')) {
            if let Some(known) = Self::lookup(&code[1..]) {
                return known;
            }
        }

        Currency {
            code,
            kind: CurrencyKind::Unknown,
        }
    }

    fn lookup(code: &str) -> Option<Currency> {
        let canonical = ALIASES
            .iter()
            .find(|(alias, _)| *alias == code)
            .map(|(_, canonical)| *canonical)
            .unwrap_or(code);

        if CRYPTO.iter().any(|(c, _, _)| *c == canonical) {
            return Some(Currency {
                code: canonical.to_string(),
                kind: CurrencyKind::Crypto,
            });
        }
        if FIAT.iter().any(|(c, _, _)| *c == canonical) {
            return Some(Currency {
                code: canonical.to_string(),
                kind: CurrencyKind::Fiat,
            });
        }
        None
    }

    /// Build the fiat currency for a POSIX locale string (e.g. "en_US.UTF-8").
    pub fn from_locale(locale: &str) -> Option<Currency> {
        let tag = locale.split('.').next().unwrap_or(locale);
        let region = tag.split(['_', '-']).nth(1)?.to_ascii_uppercase();
        let code = LOCALE_CURRENCIES
            .iter()
            .find(|(r, _)| *r == region)
            .map(|(_, c)| *c)?;
        Currency::from_code(code)
    }

    /// Canonical uppercase code, e.g. "BTC".
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn kind(&self) -> CurrencyKind {
        self.kind
    }

    pub fn is_crypto(&self) -> bool {
        self.kind == CurrencyKind::Crypto
    }

    pub fn is_fiat(&self) -> bool {
        self.kind == CurrencyKind::Fiat
    }

    /// Is this Bitcoin (used for catalog ordering)?
    pub fn is_bitcoin(&self) -> bool {
        self.code == "BTC"
    }

    pub fn is_bitcoin_cash(&self) -> bool {
        self.code == "BCH"
    }

    /// Human-readable name; falls back to the code for unknown assets.
    pub fn display_name(&self) -> &str {
        CRYPTO
            .iter()
            .chain(FIAT.iter())
            .find(|(c, _, _)| *c == self.code)
            .map(|(_, name, _)| *name)
            .unwrap_or(&self.code)
    }

    /// Display symbol, when one exists (e.g. "₿", "$").
    pub fn symbol(&self) -> Option<&str> {
        CRYPTO
            .iter()
            .chain(FIAT.iter())
            .find(|(c, _, _)| *c == self.code)
            .and_then(|(_, _, symbol)| *symbol)
    }
}

impl PartialEq for Currency {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for Currency {}

impl std::hash::Hash for Currency {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

/// Resolve the fiat currency of the running system's locale, consulting
/// LC_ALL, LC_MONETARY and LANG in that order.
pub fn system_locale_currency() -> Option<Currency> {
    for var in ["LC_ALL", "LC_MONETARY", "LANG"] {
        if let Ok(value) = std::env::var(var) {
            if let Some(currency) = Currency::from_locale(&value) {
                return Some(currency);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_codes_normalize_to_themselves() {
        for code in ["BTC", "ETH", "USD", "USDT", "DASH"] {
            let currency = Currency::from_code(code).unwrap();
            assert_eq!(currency.code(), code);
        }
    }

    #[test]
    fn test_case_is_insensitive() {
        assert_eq!(
            Currency::from_code("btc").unwrap(),
            Currency::from_code("BTC").unwrap()
        );
    }

    #[test]
    fn test_aliases_collapse() {
        for (alias, canonical) in [
            ("XBT", "BTC"),
            ("DSH", "DASH"),
            ("RUR", "RUB"),
            ("XDG", "DOGE"),
            ("STR", "XLM"),
            ("BCC", "BCH"),
        ] {
            let currency = Currency::from_code(alias).unwrap();
            assert_eq!(currency.code(), canonical, "alias {}", alias);
        }
    }

    #[test]
    fn test_kraken_prefixes_stripped() {
        assert_eq!(Currency::from_code("XXBT").unwrap().code(), "BTC");
        assert_eq!(Currency::from_code("XETH").unwrap().code(), "ETH");
        assert_eq!(Currency::from_code("ZUSD").unwrap().code(), "USD");
        assert_eq!(Currency::from_code("ZEUR").unwrap().code(), "EUR");
    }

    #[test]
    fn test_short_x_codes_not_stripped() {
        // XRP and XTZ are real assets, not prefixed codes
        assert_eq!(Currency::from_code("XRP").unwrap().code(), "XRP");
        assert_eq!(Currency::from_code("XTZ").unwrap().code(), "XTZ");
    }

    #[test]
    fn test_unknown_code_is_permissive() {
        let currency = Currency::from_code("wavesx").unwrap();
        assert_eq!(currency.code(), "WAVESX");
        assert_eq!(currency.kind(), CurrencyKind::Unknown);
        assert_eq!(currency.display_name(), "WAVESX");
        assert!(currency.symbol().is_none());
    }

    #[test]
    fn test_invalid_input_fails() {
        assert!(Currency::from_code("").is_none());
        assert!(Currency::from_code("   ").is_none());
        assert!(Currency::from_code("BTC-USD").is_none());
    }

    #[test]
    fn test_classification() {
        assert!(Currency::from_code("BTC").unwrap().is_crypto());
        assert!(Currency::from_code("USD").unwrap().is_fiat());
        assert!(!Currency::from_code("USDT").unwrap().is_fiat());
    }

    #[test]
    fn test_equality_is_exchange_agnostic() {
        assert_eq!(
            Currency::from_code("XBT").unwrap(),
            Currency::from_code("btc").unwrap()
        );
    }

    #[test]
    fn test_from_locale() {
        assert_eq!(Currency::from_locale("en_US.UTF-8").unwrap().code(), "USD");
        assert_eq!(Currency::from_locale("de_DE").unwrap().code(), "EUR");
        assert_eq!(Currency::from_locale("ja_JP.eucJP").unwrap().code(), "JPY");
        assert!(Currency::from_locale("C").is_none());
        assert!(Currency::from_locale("").is_none());
    }

    #[test]
    fn test_display_metadata() {
        let btc = Currency::from_code("BTC").unwrap();
        assert_eq!(btc.display_name(), "Bitcoin");
        assert_eq!(btc.symbol(), Some("₿"));
        let jpy = Currency::from_code("JPY").unwrap();
        assert_eq!(jpy.display_name(), "Japanese Yen");
    }

    proptest! {
        /// Normalization is idempotent: feeding a canonical code back in
        /// yields the same currency.
        #[test]
        fn prop_normalization_idempotent(raw in "[A-Za-z0-9]{1,8}") {
            if let Some(first) = Currency::from_code(&raw) {
                let second = Currency::from_code(first.code()).unwrap();
                prop_assert_eq!(first.code(), second.code());
                prop_assert_eq!(first.kind(), second.kind());
            }
        }
    }
}
