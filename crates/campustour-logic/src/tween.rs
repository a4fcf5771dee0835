//! Fixed-duration interpolation of a set of scalar channels.

/// Quadratic ease-in-out on `0..=1`.
pub fn ease_quadratic_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t < 1.0 {
        0.5 * t * t
    } else {
        let t = t - 1.0;
        -0.5 * (t * (t - 2.0) - 1.0)
    }
}

/// Result of advancing a tween by one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenStep<const N: usize> {
    /// Interpolated values for this tick.
    Running([f32; N]),
    /// The tween reached its end; the values are the exact end values.
    Finished([f32; N]),
}

/// Interpolates `N` channels jointly from `start` to `end` over a fixed
/// duration. All channels finish on the same tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween<const N: usize> {
    start: [f32; N],
    end: [f32; N],
    elapsed_ms: f32,
    duration_ms: f32,
}

impl<const N: usize> Tween<N> {
    pub fn new(start: [f32; N], end: [f32; N], duration_ms: f32) -> Self {
        Self {
            start,
            end,
            elapsed_ms: 0.0,
            duration_ms: duration_ms.max(0.0),
        }
    }

    /// Linear progress through the duration, `0..=1`.
    pub fn progress(&self) -> f32 {
        if self.duration_ms <= 0.0 {
            1.0
        } else {
            (self.elapsed_ms / self.duration_ms).min(1.0)
        }
    }

    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }

    pub fn end(&self) -> [f32; N] {
        self.end
    }

    /// Eased values at the current progress.
    pub fn values(&self) -> [f32; N] {
        let k = ease_quadratic_in_out(self.progress());
        let mut out = self.start;
        for (v, e) in out.iter_mut().zip(self.end.iter()) {
            *v += (e - *v) * k;
        }
        out
    }

    /// Move time forward by `dt_ms` (negative deltas count as zero).
    pub fn advance(&mut self, dt_ms: f32) -> TweenStep<N> {
        self.elapsed_ms += dt_ms.max(0.0);
        if self.is_finished() {
            TweenStep::Finished(self.end)
        } else {
            TweenStep::Running(self.values())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easing_is_symmetric() {
        assert_eq!(ease_quadratic_in_out(0.0), 0.0);
        assert_eq!(ease_quadratic_in_out(1.0), 1.0);
        assert!((ease_quadratic_in_out(0.5) - 0.5).abs() < 1e-6);
        assert!((ease_quadratic_in_out(0.25) - 0.125).abs() < 1e-6);
        assert!((ease_quadratic_in_out(0.75) - 0.875).abs() < 1e-6);
    }

    #[test]
    fn channels_finish_together() {
        let mut tween = Tween::new([0.0, 10.0, -4.0], [1.0, 0.0, 4.0], 1000.0);
        match tween.advance(500.0) {
            TweenStep::Running(v) => {
                assert!((v[0] - 0.5).abs() < 1e-6);
                assert!((v[1] - 5.0).abs() < 1e-6);
                assert!(v[2].abs() < 1e-6);
            }
            other => panic!("expected running, got {other:?}"),
        }
        assert_eq!(tween.advance(600.0), TweenStep::Finished([1.0, 0.0, 4.0]));
        assert!(tween.is_finished());
    }

    #[test]
    fn zero_duration_finishes_immediately() {
        let mut tween = Tween::new([3.0], [7.0], 0.0);
        assert_eq!(tween.advance(0.0), TweenStep::Finished([7.0]));
    }

    #[test]
    fn negative_delta_does_not_rewind() {
        let mut tween = Tween::new([0.0], [1.0], 100.0);
        tween.advance(50.0);
        tween.advance(-40.0);
        assert!((tween.progress() - 0.5).abs() < 1e-6);
    }
}
