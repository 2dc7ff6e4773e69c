//! Index sources for the batch iterators: epoch orders and uniform draws,
//! both driven by an explicit [`RandomSource`].

pub mod epoch_order;
pub mod random_source;
pub mod uniform_sampler;

pub use epoch_order::EpochOrder;
pub use random_source::RandomSource;
pub use uniform_sampler::UniformSampler;
