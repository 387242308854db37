//! Selection reconciliation
//!
//! Maps a previously selected set of pairs onto a freshly loaded catalog,
//! preserving user intent across exchange and catalog changes. Every rule
//! here exists because exchanges disagree: one quotes in USD where another
//! only has USDT, one lists a pair the next does not.

use crate::model::{Currency, CurrencyPair};

/// Hard cap on concurrently watched pairs.
pub const MAX_SELECTED_PAIRS: usize = 5;

/// Reconcile a previous selection against a new catalog.
///
/// Match priority per previous pair: exact normalized match, then the
/// USD↔USDT quote fallback (same base, tether-or-dollar quote). Matched
/// pairs adopt the catalog entry — and with it the new exchange's wire
/// code. If nothing survives, the default-selection priority applies:
/// locale-currency quote, then USD/USDT quote, then the first pair in the
/// (sorted) catalog.
pub fn reconcile(
    previous: &[CurrencyPair],
    catalog: &[CurrencyPair],
    locale_currency: Option<&Currency>,
) -> Vec<CurrencyPair> {
    if catalog.is_empty() {
        return Vec::new();
    }

    let mut selected: Vec<CurrencyPair> = Vec::new();
    for pair in previous {
        let matched = catalog
            .iter()
            .find(|candidate| *candidate == pair)
            .or_else(|| {
                catalog.iter().find(|candidate| {
                    candidate.base() == pair.base()
                        && is_dollar_like(candidate.quote())
                        && is_dollar_like(pair.quote())
                })
            });
        if let Some(found) = matched {
            if !selected.contains(found) {
                selected.push(found.clone());
            }
        } else {
            tracing::debug!(pair = %pair, "Selection not available in new catalog");
        }
    }

    if selected.is_empty() {
        selected.push(default_pair(catalog, locale_currency).clone());
    }

    selected.truncate(MAX_SELECTED_PAIRS);
    selected.sort();
    selected
}

/// The pair to watch when nothing carries over.
pub fn default_pair<'a>(
    catalog: &'a [CurrencyPair],
    locale_currency: Option<&Currency>,
) -> &'a CurrencyPair {
    if let Some(locale) = locale_currency {
        if let Some(pair) = catalog.iter().find(|pair| pair.quote() == locale) {
            return pair;
        }
    }
    catalog
        .iter()
        .find(|pair| is_dollar_like(pair.quote()))
        .unwrap_or(&catalog[0])
}

fn is_dollar_like(currency: &Currency) -> bool {
    currency.code() == "USD" || currency.code() == "USDT"
}
