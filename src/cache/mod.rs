pub mod counter;
pub mod keys;

pub use counter::MokaCounterStore;
pub use keys::RateLimitKey;

use crate::config::Config;

pub fn init_counter_store(config: &Config) -> MokaCounterStore {
    MokaCounterStore::new(config.rate_limit_capacity, config.rate_limit_window)
}
