//! Exchange adapter trait definition
//!
//! The ExchangeAdapter trait is the per-exchange plugin contract: each
//! implementation knows one exchange's wire protocol and nothing about
//! scheduling, selection, or caching — those live in the coordinator.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::adapters::errors::{ExchangeError, ExchangeResult};
use crate::adapters::types::{ExchangeSite, PriceUpdate};
use crate::model::CurrencyPair;

/// Common trait for all exchange adapters.
///
/// Adapters are read-only market data clients. The coordinator guarantees
/// at most one active fetch path (polling XOR streaming) per exchange
/// instance; adapters never have to defend against overlapping rounds.
#[async_trait]
pub trait ExchangeAdapter: Send + Sync {
    /// The site this adapter talks to.
    fn site(&self) -> ExchangeSite;

    /// Whether the exchange offers a streaming ticker feed. When false,
    /// the coordinator polls even if the real-time interval is selected.
    fn supports_streaming(&self) -> bool {
        false
    }

    /// Fetch the catalog of tradable pairs.
    ///
    /// Performs exactly one read against the exchange's product-list
    /// endpoint. Entries whose currency codes fail to normalize are
    /// dropped, never fatal.
    async fn list_available_pairs(&self) -> ExchangeResult<Vec<CurrencyPair>>;

    /// One polling round for the selected pairs.
    ///
    /// Batched where the exchange supports it, otherwise per-pair requests
    /// jointly awaited. A single pair's failure is logged and that pair is
    /// simply absent from the returned batch.
    async fn fetch_prices(&self, selected: &[CurrencyPair]) -> ExchangeResult<Vec<PriceUpdate>>;

    /// Open one persistent streaming connection subscribed to the selected
    /// pairs, pushing each inbound tick into `updates`.
    ///
    /// Returns the reader task's handle so the caller owns cancellation.
    /// The task ends on disconnect (dropping `updates` with it); the
    /// sequence is exhausted at that point and is never restarted here —
    /// reconnection is an explicit caller decision.
    async fn open_stream(
        &self,
        selected: &[CurrencyPair],
        updates: mpsc::UnboundedSender<PriceUpdate>,
    ) -> ExchangeResult<JoinHandle<()>> {
        let _ = (selected, updates);
        Err(ExchangeError::StreamingUnsupported(self.site()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::test_utils::MockAdapter;

    #[tokio::test]
    async fn test_mock_adapter_lists_catalog() {
        let adapter = MockAdapter::with_catalog(&[("BTC", "USD"), ("ETH", "USD")]);
        let pairs = adapter.list_available_pairs().await.unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].code("-"), "BTC-USD");
    }

    #[tokio::test]
    async fn test_default_open_stream_is_unsupported() {
        struct PollOnly;

        #[async_trait]
        impl ExchangeAdapter for PollOnly {
            fn site(&self) -> ExchangeSite {
                ExchangeSite::Kraken
            }
            async fn list_available_pairs(&self) -> ExchangeResult<Vec<CurrencyPair>> {
                Ok(Vec::new())
            }
            async fn fetch_prices(
                &self,
                _selected: &[CurrencyPair],
            ) -> ExchangeResult<Vec<PriceUpdate>> {
                Ok(Vec::new())
            }
        }

        let adapter = PollOnly;
        assert!(!adapter.supports_streaming());
        let (tx, _rx) = mpsc::unbounded_channel();
        let err = adapter.open_stream(&[], tx).await.unwrap_err();
        assert!(matches!(err, ExchangeError::StreamingUnsupported(_)));
    }
}
