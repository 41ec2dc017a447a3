//! Release velocity estimation for drags.
//!
//! Impulse strategy over a short ring of recent samples: each segment's speed
//! is fed into a running kinetic energy, and the release velocity is the speed
//! that energy corresponds to. Velocities come out in units per millisecond,
//! the unit the decay model and the gesture snapshot use.

/// Ring buffer size for velocity tracking samples.
const HISTORY_SIZE: usize = 20;

/// Only samples within the last 100ms contribute.
const HORIZON_MS: i64 = 100;

/// A gap longer than this between consecutive samples means the pointer
/// stopped in between; samples before the gap are ignored.
pub const ASSUME_STOPPED_MS: i64 = 40;

#[derive(Clone, Copy, Debug, Default)]
struct DataPointAtTime {
    time_ms: i64,
    data_point: f64,
}

/// Velocity tracker for one axis of absolute positions.
///
/// ```ignore
/// let mut tracker = VelocityTracker1D::new();
/// tracker.add_data_point(time_ms, position);
/// let velocity = tracker.calculate_velocity(); // units/ms
/// ```
#[derive(Clone, Debug)]
pub struct VelocityTracker1D {
    samples: [Option<DataPointAtTime>; HISTORY_SIZE],
    index: usize,
}

impl Default for VelocityTracker1D {
    fn default() -> Self {
        Self::new()
    }
}

impl VelocityTracker1D {
    pub fn new() -> Self {
        Self {
            samples: [None; HISTORY_SIZE],
            index: 0,
        }
    }

    /// Record `data_point` as the position at `time_ms`.
    pub fn add_data_point(&mut self, time_ms: i64, data_point: f64) {
        self.index = (self.index + 1) % HISTORY_SIZE;
        self.samples[self.index] = Some(DataPointAtTime {
            time_ms,
            data_point,
        });
    }

    /// Velocity in units/ms; 0.0 without enough samples or when the pointer has stopped.
    pub fn calculate_velocity(&self) -> f64 {
        let mut data_points = [0.0f64; HISTORY_SIZE];
        let mut times = [0.0f64; HISTORY_SIZE];
        let mut sample_count = 0;

        let Some(newest) = self.samples[self.index] else {
            return 0.0;
        };

        let mut current_index = self.index;
        let mut previous = newest;
        while let Some(sample) = self.samples[current_index] {
            let age = newest.time_ms - sample.time_ms;
            let gap = previous.time_ms - sample.time_ms;
            if age > HORIZON_MS || gap > ASSUME_STOPPED_MS {
                break;
            }
            previous = sample;
            data_points[sample_count] = sample.data_point;
            times[sample_count] = -(age as f64);

            current_index = if current_index == 0 {
                HISTORY_SIZE - 1
            } else {
                current_index - 1
            };
            sample_count += 1;
            if sample_count >= HISTORY_SIZE {
                break;
            }
        }

        impulse_velocity(&data_points[..sample_count], &times[..sample_count])
    }

    pub fn reset(&mut self) {
        self.samples = [None; HISTORY_SIZE];
        self.index = 0;
    }
}

/// Impulse estimate over samples ordered newest first.
fn impulse_velocity(data_points: &[f64], times: &[f64]) -> f64 {
    if data_points.len() < 2 {
        return 0.0;
    }
    let start = data_points.len() - 1;
    let mut work = 0.0;
    let mut next_time = times[start];
    for i in (1..=start).rev() {
        let current_time = next_time;
        next_time = times[i - 1];
        if current_time == next_time {
            continue;
        }
        let segment = (data_points[i - 1] - data_points[i]) / (next_time - current_time);
        let previous = kinetic_energy_to_velocity(work);
        work += (segment - previous) * segment.abs();
        if i == start {
            work *= 0.5;
        }
    }
    kinetic_energy_to_velocity(work)
}

/// Speed of a unit mass carrying `kinetic_energy`, signed by direction.
fn kinetic_energy_to_velocity(kinetic_energy: f64) -> f64 {
    kinetic_energy.signum() * (2.0 * kinetic_energy.abs()).sqrt()
}
