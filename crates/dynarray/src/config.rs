//! Container configuration parameters.

use crate::error::ArrayError;
use crate::raw::capacity_overflow;

/// Configuration for a [`DynamicArray`](crate::DynamicArray).
///
/// Controls the initial allocation and the growth multiplier applied when an
/// insert finds the container full. Validated at construction; the container
/// keeps its own copy and never changes it afterwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArrayConfig {
    /// Number of slots allocated up front.
    ///
    /// Default: 8. Must be at least 1.
    pub initial_capacity: usize,

    /// Multiplier applied to capacity when the container is full.
    ///
    /// Default: 2.0. Must be finite and strictly greater than 1.0.
    pub growth_factor: f64,
}

impl ArrayConfig {
    /// Default initial capacity.
    pub const DEFAULT_INITIAL_CAPACITY: usize = 8;

    /// Default growth multiplier.
    pub const DEFAULT_GROWTH_FACTOR: f64 = 2.0;

    /// Create a config with the given initial capacity and the default
    /// growth factor.
    pub fn new(initial_capacity: usize) -> Self {
        Self {
            initial_capacity,
            growth_factor: Self::DEFAULT_GROWTH_FACTOR,
        }
    }

    /// Replace the growth factor.
    #[must_use]
    pub fn with_growth_factor(mut self, growth_factor: f64) -> Self {
        self.growth_factor = growth_factor;
        self
    }

    /// Check both parameters, capacity first.
    pub fn validate(&self) -> Result<(), ArrayError> {
        if self.initial_capacity == 0 {
            return Err(ArrayError::InvalidCapacity {
                requested: self.initial_capacity,
            });
        }
        if !self.growth_factor.is_finite() || self.growth_factor <= 1.0 {
            return Err(ArrayError::InvalidGrowthFactor {
                factor: self.growth_factor,
            });
        }
        Ok(())
    }

    /// Capacity to grow to from `current`.
    ///
    /// `floor(current * growth_factor)`, raised to `current + 1` when the
    /// product does not increase capacity (small capacities, factors close
    /// to 1.0). A drained container (capacity 0) grows to 1.
    ///
    /// # Panics
    ///
    /// Panics with "capacity overflow" if the result does not fit in `usize`.
    pub fn next_capacity(&self, current: usize) -> usize {
        let scaled = (current as f64 * self.growth_factor).floor();
        let mut next = if scaled < usize::MAX as f64 {
            scaled as usize
        } else {
            capacity_overflow()
        };
        if next <= current {
            next = current.checked_add(1).unwrap_or_else(|| capacity_overflow());
        }
        next.max(1)
    }
}

impl Default for ArrayConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INITIAL_CAPACITY)
    }
}
