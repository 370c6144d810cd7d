use fixed::types::I32F32;

/// Q32.32 fixed-point: 32 integer bits, 32 fractional bits.
///
/// Used for display quantities (carton heights) so the state hash covers
/// them exactly on every platform.
pub type Fixed64 = I32F32;

/// Ticks are the atomic unit of simulation time.
pub type Ticks = u64;

/// Convert an f64 to Fixed64. Use only for initialization, never in sim loop.
#[inline]
pub fn f64_to_fixed64(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

/// Convert Fixed64 to f64. Use only for display/snapshots, never in sim loop.
#[inline]
pub fn fixed64_to_f64(v: Fixed64) -> f64 {
    v.to_num::<f64>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_exact_halves() {
        let h = f64_to_fixed64(3.5);
        assert_eq!(fixed64_to_f64(h), 3.5);
    }

    #[test]
    fn small_integers_are_exact() {
        for i in 0..6 {
            let v = f64_to_fixed64(i as f64);
            assert_eq!(fixed64_to_f64(v), i as f64);
        }
    }
}
