pub mod calculators;
pub mod engine;
pub mod state;
pub mod stats;
pub mod view;

#[cfg(test)]
pub(crate) mod tests;
