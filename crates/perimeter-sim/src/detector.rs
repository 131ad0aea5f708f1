//! Boundary crossing detection.
//!
//! Detection consumes before/after motion samples and a per-boundary
//! `CrossingState`; it never reads positions from the world itself. Beam
//! grids fire on each left-to-right pass of the grid line, rings fire on
//! the outside-to-inside transition only.

use glam::DVec2;

use perimeter_core::components::CrossingState;
use perimeter_core::constants::*;
use perimeter_core::enums::SensorKind;
use perimeter_core::geometry::{span_contains, square_contains};
use perimeter_core::types::GeoPoint;

/// One step of an entity's motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSample {
    pub previous: DVec2,
    pub current: DVec2,
    /// Width and height of the entity's footprint. Zero for point entities.
    pub extent: DVec2,
    pub speed_factor: f64,
}

impl MotionSample {
    /// Sample for a point entity moving between geographic positions.
    pub fn geo(previous: GeoPoint, current: GeoPoint) -> Self {
        Self {
            previous: previous.as_vec(),
            current: current.as_vec(),
            extent: DVec2::ZERO,
            speed_factor: 0.0,
        }
    }
}

/// What a detector reports when it fires.
#[derive(Debug, Clone, PartialEq)]
pub enum Crossing {
    /// 1-based indices of the beams broken, with a speed estimate.
    Beams { beams: Vec<u8>, speed: f64 },
    /// The entity moved from outside to inside the boundary.
    Entered,
}

pub trait CrossingDetector {
    /// Sensor family owning this boundary.
    fn sensor(&self) -> SensorKind;

    /// Evaluate one motion step, updating `state`.
    fn evaluate(&self, sample: &MotionSample, state: &mut CrossingState) -> Option<Crossing>;
}

/// Vertical grid of horizontal beams at a fixed x.
#[derive(Debug, Clone, PartialEq)]
pub struct BeamGrid {
    pub line_x: f64,
    /// Beam y positions, top to bottom.
    pub beams: Vec<f64>,
}

impl Default for BeamGrid {
    fn default() -> Self {
        Self {
            line_x: BEAM_LINE_X,
            beams: BEAM_POSITIONS.to_vec(),
        }
    }
}

impl BeamGrid {
    /// Beams intersecting the vertical span `[top, bottom]`, 1-based.
    pub fn beams_in_span(&self, top: f64, bottom: f64) -> Vec<u8> {
        self.beams
            .iter()
            .enumerate()
            .filter(|&(_, &y)| span_contains(top, bottom, y))
            .map(|(i, _)| (i + 1) as u8)
            .collect()
    }
}

impl CrossingDetector for BeamGrid {
    fn sensor(&self) -> SensorKind {
        SensorKind::Laser
    }

    fn evaluate(&self, sample: &MotionSample, state: &mut CrossingState) -> Option<Crossing> {
        state.inside = Some(sample.current.x >= self.line_x);
        if !(sample.previous.x < self.line_x && self.line_x <= sample.current.x) {
            return None;
        }
        let top = sample.current.y;
        let beams = self.beams_in_span(top, top + sample.extent.y);
        if beams.is_empty() {
            return None;
        }
        let speed = (sample.current.x - sample.previous.x).abs() * sample.speed_factor / BEAM_SPEED_NORMALIZATION;
        Some(Crossing::Beams { beams, speed })
    }
}

/// Square ring of half-extent `radius` around `center` (degrees).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingPerimeter {
    pub sensor: SensorKind,
    pub center: GeoPoint,
    pub radius: f64,
}

impl RingPerimeter {
    pub fn contains(&self, point: DVec2) -> bool {
        square_contains(self.center.as_vec(), self.radius, point)
    }
}

impl CrossingDetector for RingPerimeter {
    fn sensor(&self) -> SensorKind {
        self.sensor
    }

    fn evaluate(&self, sample: &MotionSample, state: &mut CrossingState) -> Option<Crossing> {
        let inside = self.contains(sample.current);
        let previous = state.inside.replace(inside);
        (previous == Some(false) && inside).then_some(Crossing::Entered)
    }
}

/// The three site rings, outermost first.
pub fn site_rings(center: GeoPoint, laser: f64, fiber: f64, radar: f64) -> [RingPerimeter; 3] {
    [
        RingPerimeter {
            sensor: SensorKind::Laser,
            center,
            radius: laser,
        },
        RingPerimeter {
            sensor: SensorKind::Fiber,
            center,
            radius: fiber,
        },
        RingPerimeter {
            sensor: SensorKind::Radar,
            center,
            radius: radar,
        },
    ]
}
