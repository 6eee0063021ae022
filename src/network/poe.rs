use serde::Serialize;

use crate::network::ModelError;

/// Power-over-ethernet state of a port, in watts.
///
/// Invariants are enforced on every mutation, not just at construction:
/// `max` is always strictly positive and `usage` always stays within
/// `0..=max` relative to the other current value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoeConfig {
    enabled: bool,
    max: f64,
    usage: f64,
}

impl PoeConfig {
    pub fn new(enabled: bool, max: f64, usage: f64) -> Result<Self, ModelError> {
        if max <= 0.0 {
            return Err(ModelError::PoeMaxNotPositive);
        }
        if usage < 0.0 {
            return Err(ModelError::PoeUsageNegative);
        }
        if usage > max {
            return Err(ModelError::PoeUsageAboveMax { usage, max });
        }
        Ok(PoeConfig {
            enabled,
            max,
            usage,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Sets the maximum power. Fails if the new max would fall below the
    /// current usage.
    pub fn set_max(&mut self, max: f64) -> Result<(), ModelError> {
        if max <= 0.0 {
            return Err(ModelError::PoeMaxNotPositive);
        }
        if max < self.usage {
            return Err(ModelError::PoeMaxBelowUsage {
                max,
                usage: self.usage,
            });
        }
        self.max = max;
        Ok(())
    }

    pub fn usage(&self) -> f64 {
        self.usage
    }

    /// Sets the current usage. Fails if the new usage would exceed the
    /// current max.
    pub fn set_usage(&mut self, usage: f64) -> Result<(), ModelError> {
        if usage < 0.0 {
            return Err(ModelError::PoeUsageNegative);
        }
        if usage > self.max {
            return Err(ModelError::PoeUsageAboveMax {
                usage,
                max: self.max,
            });
        }
        self.usage = usage;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_max_rejected() {
        assert_eq!(
            PoeConfig::new(true, 0.0, 0.0),
            Err(ModelError::PoeMaxNotPositive)
        );
    }

    #[test]
    fn test_usage_above_max_rejected() {
        assert!(matches!(
            PoeConfig::new(true, 15.4, 16.0),
            Err(ModelError::PoeUsageAboveMax { .. })
        ));
        let mut poe = PoeConfig::new(true, 15.4, 3.0).unwrap();
        assert!(matches!(
            poe.set_usage(20.0),
            Err(ModelError::PoeUsageAboveMax { .. })
        ));
        assert_eq!(poe.usage(), 3.0);
    }

    #[test]
    fn test_max_below_usage_rejected() {
        let mut poe = PoeConfig::new(true, 15.4, 10.0).unwrap();
        assert!(matches!(
            poe.set_max(5.0),
            Err(ModelError::PoeMaxBelowUsage { .. })
        ));
        assert_eq!(poe.max(), 15.4);
    }

    #[test]
    fn test_sequential_updates() {
        let mut poe = PoeConfig::new(false, 15.4, 10.0).unwrap();
        poe.set_max(30.0).unwrap();
        poe.set_usage(25.0).unwrap();
        poe.enable();
        assert!(poe.is_enabled());
        assert_eq!(poe.max(), 30.0);
        assert_eq!(poe.usage(), 25.0);
    }

    #[test]
    fn test_negative_usage_rejected() {
        let mut poe = PoeConfig::new(true, 15.4, 0.0).unwrap();
        assert_eq!(poe.set_usage(-1.0), Err(ModelError::PoeUsageNegative));
    }
}
