use std::ops::Sub;

pub type PointerId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
    /// The platform took the pointer away; the gesture ends without a fling.
    Cancel,
}

/// Position in logical pixels.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A single pointer sample as delivered by the platform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub id: PointerId,
    pub kind: PointerEventKind,
    pub position: Point,
    /// Event uptime in milliseconds.
    pub time_ms: u64,
}

impl PointerEvent {
    pub fn new(id: PointerId, kind: PointerEventKind, position: Point, time_ms: u64) -> Self {
        Self {
            id,
            kind,
            position,
            time_ms,
        }
    }

    pub fn down(id: PointerId, x: f64, y: f64, time_ms: u64) -> Self {
        Self::new(id, PointerEventKind::Down, Point::new(x, y), time_ms)
    }

    pub fn moved(id: PointerId, x: f64, y: f64, time_ms: u64) -> Self {
        Self::new(id, PointerEventKind::Move, Point::new(x, y), time_ms)
    }

    pub fn up(id: PointerId, x: f64, y: f64, time_ms: u64) -> Self {
        Self::new(id, PointerEventKind::Up, Point::new(x, y), time_ms)
    }

    pub fn cancel(id: PointerId, x: f64, y: f64, time_ms: u64) -> Self {
        Self::new(id, PointerEventKind::Cancel, Point::new(x, y), time_ms)
    }
}
