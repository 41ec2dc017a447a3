use crate::pan::Axis;

/// Per-gesture state: the resolved direction and how much displacement each
/// axis has already received. Created at grant, dropped at release.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GestureSession {
    direction: Option<Axis>,
    delivered_x: f64,
    delivered_y: f64,
}

impl GestureSession {
    pub(crate) fn new(forced: Option<Axis>) -> Self {
        Self {
            direction: forced,
            delivered_x: 0.0,
            delivered_y: 0.0,
        }
    }

    pub(crate) fn direction(&self) -> Option<Axis> {
        self.direction
    }

    /// Fix the direction once the squared displacement exceeds `lock_distance`.
    ///
    /// Returns the axis only on the call that resolved it. Ties go to `Y`.
    pub(crate) fn resolve_direction(&mut self, dx: f64, dy: f64, lock_distance: f64) -> Option<Axis> {
        if self.direction.is_some() {
            return None;
        }
        let dx2 = dx * dx;
        let dy2 = dy * dy;
        if dx2 + dy2 <= lock_distance {
            return None;
        }
        let axis = if dx2 > dy2 { Axis::X } else { Axis::Y };
        self.direction = Some(axis);
        Some(axis)
    }

    /// Whether `axis` may receive deltas and release handling.
    pub(crate) fn delivers(&self, axis: Axis, lock_direction: bool) -> bool {
        !lock_direction || self.direction == Some(axis)
    }

    /// Turn a cumulative displacement into the part `axis` has not seen yet.
    pub(crate) fn take_delta(&mut self, axis: Axis, cumulative: f64) -> f64 {
        let delivered = match axis {
            Axis::X => &mut self.delivered_x,
            Axis::Y => &mut self.delivered_y,
        };
        let delta = cumulative - *delivered;
        *delivered = cumulative;
        delta
    }
}
