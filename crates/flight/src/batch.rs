//! Batch flight evaluation — concurrent fan-out over many flights.
//!
//! Each lookup resolves independently; one flight's failure never
//! cancels or blocks the others, and the output order matches the
//! input order.

use calmwing_core::error::FlightError;
use calmwing_core::flight::{FlightContext, FlightQuery, FlightSource};
use futures::future::join_all;
use tracing::debug;

/// The outcome of one flight lookup within a batch.
#[derive(Debug)]
pub struct FlightOutcome {
    pub query: FlightQuery,
    pub result: Result<FlightContext, FlightError>,
}

/// Evaluate many flights concurrently, collecting every outcome.
pub async fn evaluate_flights(
    source: &dyn FlightSource,
    queries: &[FlightQuery],
) -> Vec<FlightOutcome> {
    let lookups = queries.iter().map(|query| async move {
        let result = source.fetch(query).await;
        FlightOutcome {
            query: query.clone(),
            result,
        }
    });

    let outcomes = join_all(lookups).await;
    debug!(
        total = outcomes.len(),
        failed = outcomes.iter().filter(|o| o.result.is_err()).count(),
        "batch evaluation complete"
    );
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::static_source::StaticFlightSource;
    use async_trait::async_trait;

    /// Fails every flight number starting with "X".
    struct FlakySource;

    #[async_trait]
    impl FlightSource for FlakySource {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn fetch(&self, query: &FlightQuery) -> Result<FlightContext, FlightError> {
            if query.flight_number.starts_with('X') {
                Err(FlightError::Unavailable("simulated outage".into()))
            } else {
                Ok(FlightContext::unknown())
            }
        }
    }

    fn queries(numbers: &[&str]) -> Vec<FlightQuery> {
        numbers
            .iter()
            .map(|n| FlightQuery {
                flight_number: n.to_string(),
                date: None,
            })
            .collect()
    }

    #[tokio::test]
    async fn all_successes() {
        let source = StaticFlightSource;
        let outcomes = evaluate_flights(&source, &queries(&["UA328", "BA117", "LH400"])).await;
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.iter().all(|o| o.result.is_ok()));
    }

    #[tokio::test]
    async fn one_failure_does_not_affect_siblings() {
        let source = FlakySource;
        let outcomes = evaluate_flights(&source, &queries(&["UA1", "X999", "BA2"])).await;

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].result.is_ok());
        assert!(outcomes[1].result.is_err());
        assert!(outcomes[2].result.is_ok());
    }

    #[tokio::test]
    async fn output_order_matches_input_order() {
        let source = StaticFlightSource;
        let input = queries(&["AA10", "AA11", "AA12"]);
        let outcomes = evaluate_flights(&source, &input).await;

        for (outcome, query) in outcomes.iter().zip(&input) {
            assert_eq!(outcome.query.flight_number, query.flight_number);
        }
    }

    #[tokio::test]
    async fn empty_batch_is_fine() {
        let source = StaticFlightSource;
        let outcomes = evaluate_flights(&source, &[]).await;
        assert!(outcomes.is_empty());
    }
}
