#![deny(warnings)]
pub mod draft;
pub mod model;
pub mod sampler;
pub mod stats;

pub use draft::{DraftSimulator, EmptyDraftError, Pick};
pub use model::card::Card;
pub use model::pool::{Pool, PoolError};
pub use sampler::WeightedSampler;
pub use stats::DraftStatistics;
