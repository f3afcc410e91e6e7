use std::fmt::{Debug, Formatter};

/// Signed power reading as reported by the device.
///
/// Negative values mean the circuit is feeding power back.
#[derive(Copy, Clone, PartialEq, PartialOrd)]
pub struct Watts(pub f64);

impl Watts {
    pub const ZERO: Self = Self(0.0);
}

impl Debug for Watts {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}W", self.0)
    }
}
