use crate::error::{Error, Result};
use crate::util::ensure_interval;

/// A schedule for a value that decays once per episode
pub trait Decay {
    /// Calculate the value for the next episode from the current one
    fn next(&self, value: f32) -> f32;
}

/// A constant value
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Constant;

impl Decay for Constant {
    fn next(&self, value: f32) -> f32 {
        value
    }
}

/// v<sub>t+1</sub> = max(v<sub>t</sub> * r, v<sub>f</sub>)
///
/// A value starting below the floor `vf` is raised to it after one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Multiplicative {
    rate: f32,
    floor: f32,
}

impl Multiplicative {
    /// **Returns** [`Error::InvalidParameter`] if `rate` is not in `(0,1]` or `floor` is not
    /// in `[0,1]`
    pub fn new(rate: f32, floor: f32) -> Result<Self> {
        if rate <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "rate",
                value: rate.into(),
                min: 0.0,
                max: 1.0,
            });
        }
        ensure_interval!(rate, 0.0f32, 1.0f32);
        ensure_interval!(floor, 0.0f32, 1.0f32);
        Ok(Self { rate, floor })
    }
}

impl Decay for Multiplicative {
    fn next(&self, value: f32) -> f32 {
        let &Self { rate, floor } = self;
        (value * rate).max(floor)
    }
}
