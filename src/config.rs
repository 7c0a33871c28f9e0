//! Capacity and load-factor settings for `DynamicArray` and `HashTable`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("initial capacity must be at least 1")]
    ZeroCapacity,
    #[error("initial capacity {0} is not a power of two")]
    CapacityNotPowerOfTwo(usize),
    #[error("growth factor {0} must be at least 2")]
    GrowthTooSmall(usize),
    #[error("growth factor {0} is not a power of two")]
    GrowthNotPowerOfTwo(usize),
    #[error("load thresholds out of order: min {min} must be below max {max}")]
    LoadThresholds { min: f64, max: f64 },
    #[error("array max load {0} must be below 1.0")]
    ArrayMaxLoad(f64),
}

/// Settings for a `DynamicArray`.
///
/// After an append, the array grows when `len / capacity > max_load`.
/// Before an erase, it shrinks when `len / capacity < min_load`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrayConfig {
    pub initial_capacity: usize,
    pub growth_factor: usize,
    pub max_load: f64,
    pub min_load: f64,
}

impl ArrayConfig {
    pub const DEFAULT: Self = Self {
        initial_capacity: 16,
        growth_factor: 2,
        max_load: 0.75,
        min_load: 0.25,
    };

    /// Chain settings used by `TableConfig::DEFAULT`: room for three
    /// entries before the first grow.
    pub const BUCKET: Self = Self {
        initial_capacity: 4,
        ..Self::DEFAULT
    };

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.growth_factor < 2 {
            return Err(ConfigError::GrowthTooSmall(self.growth_factor));
        }
        check_thresholds(self.min_load, self.max_load)?;
        // An append must always land inside the current capacity.
        if self.max_load >= 1.0 {
            return Err(ConfigError::ArrayMaxLoad(self.max_load));
        }
        Ok(())
    }
}

impl Default for ArrayConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Settings for a `HashTable`.
///
/// Both the initial capacity and the growth factor must be powers of two so
/// that every capacity the table ever reaches is one as well; bucket indices
/// are computed with `hash & (capacity - 1)`.
///
/// The table grows when the load *before* an insert is `>= max_load`, and
/// shrinks when the load *before* an erase is `<= min_load`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableConfig {
    pub initial_capacity: usize,
    pub growth_factor: usize,
    pub max_load: f64,
    pub min_load: f64,
    /// Settings for each bucket's chain.
    pub bucket: ArrayConfig,
}

impl TableConfig {
    pub const DEFAULT: Self = Self {
        initial_capacity: 16,
        growth_factor: 2,
        max_load: 0.75,
        min_load: 0.25,
        bucket: ArrayConfig::BUCKET,
    };

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if !self.initial_capacity.is_power_of_two() {
            return Err(ConfigError::CapacityNotPowerOfTwo(self.initial_capacity));
        }
        if self.growth_factor < 2 {
            return Err(ConfigError::GrowthTooSmall(self.growth_factor));
        }
        if !self.growth_factor.is_power_of_two() {
            return Err(ConfigError::GrowthNotPowerOfTwo(self.growth_factor));
        }
        check_thresholds(self.min_load, self.max_load)?;
        self.bucket.validate()
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn check_thresholds(min: f64, max: f64) -> Result<(), ConfigError> {
    // Written so that NaN fails as well.
    if !(min >= 0.0 && max > 0.0 && min < max) {
        return Err(ConfigError::LoadThresholds { min, max });
    }
    Ok(())
}
