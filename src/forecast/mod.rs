// =============================================================================
// Forecast Module
// =============================================================================
//
// The deterministic core of the service:
// - Percentage deltas for the three underlying quotes
// - Weighted combination and dead-zone classification
// - Agreement bonus and clamped confidence
// - Per-gram price projection

pub mod predictor;

pub use predictor::{
    ComponentDeltas, Forecast, InvalidInput, MarketReading, Predictor, GRAMS_PER_TROY_OUNCE,
};
