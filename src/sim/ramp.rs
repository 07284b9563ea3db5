//! Inlet velocity ramp
//!
//! Spinning the inlet up gradually keeps the early transient from shocking
//! the lattice. The ramp is linear in step count: after `n` steps the inlet
//! runs at `u0 * n / duration`, reaching `u0` exactly at step `duration` and
//! holding there until the next reset.

/// Linear ramp-up schedule for the inlet speed
#[derive(Debug, Clone)]
pub struct VelocityRamp {
    /// Steps to reach the target speed
    duration: u32,
    /// Steps taken since the last reset, saturating at `duration`
    elapsed: u32,
    /// Current inlet speed for the given target
    current: f64,
}

impl VelocityRamp {
    pub fn new(duration: u32) -> Self {
        Self {
            duration,
            elapsed: 0,
            current: 0.0,
        }
    }

    /// Advance one step and return the inlet speed for the step.
    /// Duration 0 means no ramp: the target applies immediately.
    pub fn advance(&mut self, target: f64) -> f64 {
        if self.elapsed < self.duration {
            self.elapsed += 1;
            self.current = target * f64::from(self.elapsed) / f64::from(self.duration);
        } else {
            self.current = target;
        }
        self.current
    }

    /// Inlet speed as of the last `advance`
    pub fn current(&self) -> f64 {
        self.current
    }

    /// True while the inlet is still below the target
    pub fn is_ramping(&self) -> bool {
        self.elapsed < self.duration
    }

    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    /// Return to the start of the ramp
    pub fn reset(&mut self) {
        self.elapsed = 0;
        self.current = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_ramp_schedule() {
        let mut ramp = VelocityRamp::new(500);
        assert_eq!(ramp.current(), 0.0);
        assert!(ramp.is_ramping());

        for n in 1..=500u32 {
            let speed = ramp.advance(0.15);
            assert_eq!(speed, 0.15 * f64::from(n) / 500.0, "step {n}");
        }
        assert_eq!(ramp.current(), 0.15);
        assert!(!ramp.is_ramping());

        // Steady thereafter
        for _ in 0..100 {
            assert_eq!(ramp.advance(0.15), 0.15);
        }
    }

    #[test]
    fn test_ten_steps_of_default_ramp() {
        let mut ramp = VelocityRamp::new(500);
        for _ in 0..10 {
            ramp.advance(0.15);
        }
        assert!((ramp.current() - 0.15 * 10.0 / 500.0).abs() < 1e-15);
    }

    #[test]
    fn test_reset_restarts_ramp() {
        let mut ramp = VelocityRamp::new(100);
        for _ in 0..150 {
            ramp.advance(0.2);
        }
        assert!(!ramp.is_ramping());

        ramp.reset();
        assert_eq!(ramp.elapsed(), 0);
        assert_eq!(ramp.current(), 0.0);
        assert!(ramp.is_ramping());
        assert_eq!(ramp.advance(0.2), 0.2 / 100.0);
    }

    #[test]
    fn test_zero_duration_is_immediately_steady() {
        let mut ramp = VelocityRamp::new(0);
        assert!(!ramp.is_ramping());
        assert_eq!(ramp.advance(0.15), 0.15);
    }

    #[test]
    fn test_target_change_mid_ramp_rescales() {
        let mut ramp = VelocityRamp::new(10);
        for _ in 0..5 {
            ramp.advance(0.1);
        }
        // The ramp holds a fraction, not a speed, so a new target takes
        // effect on the very next step.
        assert_eq!(ramp.advance(0.3), 0.3 * 6.0 / 10.0);
    }

    proptest! {
        #[test]
        fn ramp_is_exact_at_whole_steps(
            duration in 1u32..1000,
            steps in 0u32..1500,
            target in 0.01f64..0.3,
        ) {
            let mut ramp = VelocityRamp::new(duration);
            for _ in 0..steps {
                ramp.advance(target);
            }
            let n = steps.min(duration);
            let expected = target * f64::from(n) / f64::from(duration);
            prop_assert!((ramp.current() - expected).abs() < 1e-15);
        }

        #[test]
        fn ramp_is_monotonic(duration in 1u32..200, target in 0.01f64..0.3) {
            let mut ramp = VelocityRamp::new(duration);
            let mut previous = 0.0;
            for _ in 0..(duration + 20) {
                let speed = ramp.advance(target);
                prop_assert!(speed >= previous);
                previous = speed;
            }
            prop_assert_eq!(previous, target);
        }
    }
}
