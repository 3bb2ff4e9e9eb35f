//! Frame timing for the stats overlay

use std::time::Duration;

use instant::Instant;

/// Exponentially smoothed frame time
#[derive(Debug, Clone)]
pub struct FrameStats {
    last_frame: Option<Instant>,
    smoothed_ms: f32,
    frame_count: u64,
    smoothing: f32,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self {
            last_frame: None,
            smoothed_ms: 0.0,
            frame_count: 0,
            smoothing: 0.1,
        }
    }
}

impl FrameStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the start of a new frame
    pub fn tick(&mut self) {
        let now = Instant::now();
        if let Some(last) = self.last_frame.replace(now) {
            self.record(now - last);
        }
    }

    /// Fold one frame duration into the running average
    pub fn record(&mut self, frame_time: Duration) {
        let ms = frame_time.as_secs_f32() * 1000.0;
        self.smoothed_ms = if self.frame_count == 0 {
            ms
        } else {
            self.smoothed_ms + self.smoothing * (ms - self.smoothed_ms)
        };
        self.frame_count += 1;
    }

    pub fn frame_time_ms(&self) -> f32 {
        self.smoothed_ms
    }

    pub fn fps(&self) -> f32 {
        if self.smoothed_ms > 0.0 {
            1000.0 / self.smoothed_ms
        } else {
            0.0
        }
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn label(&self) -> String {
        format!("{:.2} ms/frame ({:.0} FPS)", self.frame_time_ms(), self.fps())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_first_frame_sets_average() {
        let mut stats = FrameStats::new();
        assert_eq!(stats.fps(), 0.0);

        stats.record(Duration::from_millis(20));
        assert_relative_eq!(stats.frame_time_ms(), 20.0, epsilon = 1e-4);
        assert_relative_eq!(stats.fps(), 50.0, epsilon = 1e-3);
    }

    #[test]
    fn test_average_moves_towards_new_frames() {
        let mut stats = FrameStats::new();
        stats.record(Duration::from_millis(10));
        stats.record(Duration::from_millis(20));

        assert_relative_eq!(stats.frame_time_ms(), 11.0, epsilon = 1e-4);
        assert_eq!(stats.frame_count(), 2);
        assert_eq!(stats.label(), "11.00 ms/frame (91 FPS)");
    }
}
