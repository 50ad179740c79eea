mod engine;
pub mod rules;

pub use engine::{HeuristicScorer, CONFIDENCE_RANGE};

pub fn predicate_ids() -> Vec<&'static str> {
  rules::RiskPredicate::ALL
    .iter()
    .map(|p| p.meta().id)
    .collect()
}
