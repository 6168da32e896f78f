pub mod config;
pub mod error;
pub mod fetcher;
pub mod notifier;
pub mod pipeline;
pub mod scorer;
#[cfg(test)]
mod test_support;
pub mod types;
