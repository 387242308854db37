//! Currency pairs
//!
//! A `CurrencyPair` is the normalized (base, quote) identity plus the
//! exchange-specific wire code that produced it. Outbound requests use the
//! wire code; everything else in the crate compares normalized identities.

use std::cmp::Ordering;
use std::fmt;

use super::currency::Currency;

/// An ordered (base, quote) currency pair.
///
/// `custom_code` is the exchange's own identifier for the pair
/// ("BTC-USD" on Coinbase, "BTCUSDT" on Binance, "XXBTZUSD" on Kraken).
/// Equality and hashing ignore it: two pairs are the same pair no matter
/// which exchange's vocabulary they were built from.
#[derive(Debug, Clone)]
pub struct CurrencyPair {
    base: Currency,
    quote: Currency,
    custom_code: String,
}

impl CurrencyPair {
    /// Build from already-normalized currencies. When `custom_code` is
    /// `None` the concatenated normalized codes are used, matching the
    /// convention of exchanges with no separator.
    pub fn new(base: Currency, quote: Currency, custom_code: Option<String>) -> Self {
        let custom_code =
            custom_code.unwrap_or_else(|| format!("{}{}", base.code(), quote.code()));
        Self {
            base,
            quote,
            custom_code,
        }
    }

    /// Build from raw wire codes. Fails when either code fails to
    /// normalize (empty or garbage input).
    pub fn from_codes(base: &str, quote: &str, custom_code: Option<String>) -> Option<Self> {
        let base = Currency::from_code(base)?;
        let quote = Currency::from_code(quote)?;
        Some(Self::new(base, quote, custom_code))
    }

    /// Parse the persisted "BASE-QUOTE" form written by [`code`](Self::code).
    pub fn from_code(code: &str) -> Option<Self> {
        let (base, quote) = code.split_once('-')?;
        Self::from_codes(base, quote, None)
    }

    pub fn base(&self) -> &Currency {
        &self.base
    }

    pub fn quote(&self) -> &Currency {
        &self.quote
    }

    /// The exchange-scoped wire identifier.
    pub fn custom_code(&self) -> &str {
        &self.custom_code
    }

    /// Normalized display/storage code, e.g. `code("-")` -> "BTC-USD".
    /// This is the form persisted to configuration.
    pub fn code(&self, separator: &str) -> String {
        format!("{}{}{}", self.base.code(), separator, self.quote.code())
    }

    /// Same pair priced on another exchange: identical identity, new wire
    /// code. Pairs are immutable, so switching exchanges replaces them.
    pub fn with_custom_code(&self, custom_code: String) -> Self {
        Self {
            base: self.base.clone(),
            quote: self.quote.clone(),
            custom_code,
        }
    }

    fn sort_rank(currency: &Currency) -> u8 {
        if currency.is_bitcoin() {
            0
        } else if currency.is_bitcoin_cash() {
            1
        } else {
            2
        }
    }
}

impl PartialEq for CurrencyPair {
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base && self.quote == other.quote
    }
}

impl Eq for CurrencyPair {}

impl std::hash::Hash for CurrencyPair {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.base.hash(state);
        self.quote.hash(state);
    }
}

impl Ord for CurrencyPair {
    /// Bitcoin first, Bitcoin Cash next, then lexicographic by base and
    /// quote code. Gives catalogs a stable, deterministic listing.
    fn cmp(&self, other: &Self) -> Ordering {
        Self::sort_rank(&self.base)
            .cmp(&Self::sort_rank(&other.base))
            .then_with(|| self.base.code().cmp(other.base.code()))
            .then_with(|| self.quote.code().cmp(other.quote.code()))
    }
}

impl PartialOrd for CurrencyPair {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for CurrencyPair {
    /// Renders the normalized "BASE-QUOTE" form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.base.code(), self.quote.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(base: &str, quote: &str) -> CurrencyPair {
        CurrencyPair::from_codes(base, quote, None).unwrap()
    }

    #[test]
    fn test_equality_ignores_custom_code() {
        let a = CurrencyPair::from_codes("BTC", "USD", Some("btcusd".into())).unwrap();
        let b = CurrencyPair::from_codes("BTC", "USD", Some("XBTUSD".into())).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_equality_normalizes_aliases() {
        assert_eq!(pair("XBT", "ZUSD"), pair("BTC", "USD"));
    }

    #[test]
    fn test_default_custom_code_is_concatenation() {
        assert_eq!(pair("BTC", "USD").custom_code(), "BTCUSD");
    }

    #[test]
    fn test_code_rendering_and_parsing_round_trip() {
        let original = pair("ETH", "EUR");
        assert_eq!(original.code("-"), "ETH-EUR");
        assert_eq!(original.code("/"), "ETH/EUR");
        let parsed = CurrencyPair::from_code(&original.code("-")).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_from_codes_rejects_garbage() {
        assert!(CurrencyPair::from_codes("", "USD", None).is_none());
        assert!(CurrencyPair::from_codes("BTC", "US D", None).is_none());
        assert!(CurrencyPair::from_code("BTCUSD").is_none());
    }

    #[test]
    fn test_with_custom_code_keeps_identity() {
        let a = pair("BTC", "USD");
        let b = a.with_custom_code("tBTCUSD".into());
        assert_eq!(a, b);
        assert_eq!(b.custom_code(), "tBTCUSD");
    }

    #[test]
    fn test_bitcoin_sorts_first() {
        let mut pairs = vec![
            pair("ETH", "USD"),
            pair("ADA", "USD"),
            pair("BTC", "USD"),
            pair("BCH", "EUR"),
        ];
        pairs.sort();
        assert_eq!(pairs[0], pair("BTC", "USD"));
        assert_eq!(pairs[1], pair("BCH", "EUR"));
        assert_eq!(pairs[2], pair("ADA", "USD"));
        assert_eq!(pairs[3], pair("ETH", "USD"));
    }

    #[test]
    fn test_quote_breaks_ties() {
        let mut pairs = vec![pair("BTC", "USDT"), pair("BTC", "EUR"), pair("BTC", "USD")];
        pairs.sort();
        assert_eq!(pairs[0].quote().code(), "EUR");
        assert_eq!(pairs[1].quote().code(), "USD");
        assert_eq!(pairs[2].quote().code(), "USDT");
    }

    #[test]
    fn test_sorting_is_deterministic() {
        let mut a = vec![pair("ETH", "BTC"), pair("BTC", "USD"), pair("XRP", "EUR")];
        let mut b = a.clone();
        a.sort();
        b.sort();
        b.sort();
        assert_eq!(a, b);
    }
}
