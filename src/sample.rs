use std::fmt::Debug;

use num_traits::{Bounded, FromPrimitive, Num, ToPrimitive};

pub trait AudioSample:
    Num + Copy + Send + Sync + PartialOrd + ToPrimitive + FromPrimitive + Bounded + Debug + 'static
{
    fn silence() -> Self;

    fn to_f64_normalized(self) -> f64;

    fn from_f64_normalized(value: f64) -> Self;
}

impl AudioSample for f32 {
    fn silence() -> Self {
        0.0
    }

    fn to_f64_normalized(self) -> f64 {
        self as f64
    }

    fn from_f64_normalized(value: f64) -> Self {
        value.clamp(-1.0, 1.0) as f32
    }
}

impl AudioSample for f64 {
    fn silence() -> Self {
        0.0
    }

    fn to_f64_normalized(self) -> f64 {
        self
    }

    fn from_f64_normalized(value: f64) -> Self {
        value.clamp(-1.0, 1.0)
    }
}

impl AudioSample for i16 {
    fn silence() -> Self {
        0
    }

    fn to_f64_normalized(self) -> f64 {
        self as f64 / i16::MAX as f64
    }

    fn from_f64_normalized(value: f64) -> Self {
        (value.clamp(-1.0, 1.0) * i16::MAX as f64) as i16
    }
}

impl AudioSample for i32 {
    fn silence() -> Self {
        0
    }

    fn to_f64_normalized(self) -> f64 {
        self as f64 / i32::MAX as f64
    }

    fn from_f64_normalized(value: f64) -> Self {
        (value.clamp(-1.0, 1.0) * i32::MAX as f64) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silence_is_normalized_zero() {
        assert_eq!(f32::silence().to_f64_normalized(), 0.0);
        assert_eq!(i16::silence().to_f64_normalized(), 0.0);
        assert_eq!(i32::silence().to_f64_normalized(), 0.0);
    }

    #[test]
    fn test_i16_normalized_round_trip() {
        assert_eq!(i16::from_f64_normalized(0.0), 0);
        assert_eq!(i16::from_f64_normalized(1.0), i16::MAX);
        assert!((i16::MAX.to_f64_normalized() - 1.0).abs() < 1e-9);

        // Truncating conversion may lose at most one step.
        let original = 12_345i16;
        let round_tripped = i16::from_f64_normalized(original.to_f64_normalized());
        assert!((round_tripped - original).abs() <= 1);
    }

    #[test]
    fn test_from_f64_normalized_clamps() {
        assert_eq!(f32::from_f64_normalized(1.5), 1.0);
        assert_eq!(f32::from_f64_normalized(-2.0), -1.0);
        assert_eq!(i16::from_f64_normalized(2.0), i16::MAX);
        assert_eq!(i32::from_f64_normalized(-3.0), -i32::MAX);
    }
}
