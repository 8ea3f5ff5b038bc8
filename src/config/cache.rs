//! Cache configuration module.
//!
//! The cache policy itself lives with the data structure; this module plugs it
//! into the file/environment configuration layer.

use super::{ConfigResult, Validate};
use crate::data_structures::puka_cuckoo_cache::PukaCuckooCacheConfig;
use crate::error::config::ConfigError;

impl Validate for PukaCuckooCacheConfig {
    fn validate(&self) -> ConfigResult<()> {
        self.check()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}
