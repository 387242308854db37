//! Normalized currency and pair data model.

pub mod currency;
pub mod pair;

pub use currency::{system_locale_currency, Currency, CurrencyKind};
pub use pair::CurrencyPair;
