//! Config singleton storage trait.

use crate::StoreError;
use dac_types::CustodianConfig;

/// Trait for the configuration singleton.
pub trait ConfigStore {
    /// The stored configuration, or `None` if it was never written.
    fn get_config(&self) -> Result<Option<CustodianConfig>, StoreError>;

    /// Replace the stored configuration.
    fn put_config(&self, config: &CustodianConfig) -> Result<(), StoreError>;

    /// Read the configuration, persisting the defaults on first access.
    fn load_or_init_config(&self) -> Result<CustodianConfig, StoreError> {
        match self.get_config()? {
            Some(config) => Ok(config),
            None => {
                let config = CustodianConfig::default();
                self.put_config(&config)?;
                Ok(config)
            }
        }
    }
}
