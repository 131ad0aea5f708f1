//! Enumeration types used throughout the simulation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Threat classification drawn at spawn for geographic threats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatKind {
    Person,
    Vehicle,
    Animal,
    Drone,
    Unknown,
}

impl ThreatKind {
    pub const ALL: [ThreatKind; 5] = [
        ThreatKind::Person,
        ThreatKind::Vehicle,
        ThreatKind::Animal,
        ThreatKind::Drone,
        ThreatKind::Unknown,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Person => "Person",
            Self::Vehicle => "Vehicle",
            Self::Animal => "Animal",
            Self::Drone => "Drone",
            Self::Unknown => "Unknown",
        }
    }
}

/// Threat level. Ordered so that `High > Medium > Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Broad class of a planar figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FigureClass {
    SmallAnimal,
    LargeAnimal,
    Human,
    Vehicle,
}

/// Figures available to the beam-grid simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FigureKind {
    Rabbit,
    Squirrel,
    Deer,
    Bear,
    Human,
    Soldier,
    Car,
    Truck,
}

/// Static characteristics of a figure kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FigureSpec {
    pub class: FigureClass,
    pub width: f64,
    pub height: f64,
    /// Multiplier applied to horizontal displacement for speed estimates.
    pub speed_factor: f64,
    pub severity: Severity,
}

impl FigureKind {
    pub const ALL: [FigureKind; 8] = [
        FigureKind::Rabbit,
        FigureKind::Squirrel,
        FigureKind::Deer,
        FigureKind::Bear,
        FigureKind::Human,
        FigureKind::Soldier,
        FigureKind::Car,
        FigureKind::Truck,
    ];

    pub fn spec(&self) -> FigureSpec {
        use FigureClass::*;
        let (class, width, height, speed_factor, severity) = match self {
            Self::Rabbit => (SmallAnimal, 30.0, 20.0, 10.0, Severity::Low),
            Self::Squirrel => (SmallAnimal, 25.0, 30.0, 8.0, Severity::Low),
            Self::Deer => (LargeAnimal, 60.0, 80.0, 15.0, Severity::Medium),
            Self::Bear => (LargeAnimal, 80.0, 100.0, 12.0, Severity::High),
            Self::Human => (Human, 40.0, 90.0, 5.0, Severity::Medium),
            Self::Soldier => (Human, 45.0, 90.0, 7.0, Severity::High),
            Self::Car => (Vehicle, 90.0, 50.0, 25.0, Severity::Medium),
            Self::Truck => (Vehicle, 120.0, 70.0, 20.0, Severity::High),
        };
        FigureSpec {
            class,
            width,
            height,
            speed_factor,
            severity,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Rabbit => "Rabbit",
            Self::Squirrel => "Squirrel",
            Self::Deer => "Deer",
            Self::Bear => "Bear",
            Self::Human => "Human",
            Self::Soldier => "Soldier",
            Self::Car => "Car",
            Self::Truck => "Truck",
        }
    }
}

/// Sensor families making up the perimeter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    Camera,
    Laser,
    Fiber,
    Radar,
}

impl SensorKind {
    pub const ALL: [SensorKind; 4] = [
        SensorKind::Camera,
        SensorKind::Laser,
        SensorKind::Fiber,
        SensorKind::Radar,
    ];

    /// Stable index into per-sensor tables.
    pub fn index(&self) -> usize {
        match self {
            Self::Camera => 0,
            Self::Laser => 1,
            Self::Fiber => 2,
            Self::Radar => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Camera => "camera",
            Self::Laser => "laser",
            Self::Fiber => "fiber",
            Self::Radar => "radar",
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sensor priority derived from the environment. Ordered `High > Medium > Low`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// Operational status of a sensor family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorStatus {
    #[default]
    Active,
    Standby,
    Fault,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sensitivity {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    #[default]
    Clear,
    Rain,
    Fog,
    Snow,
    Sandstorm,
    Hail,
    Thunderstorm,
    Hurricane,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    #[default]
    Day,
    Night,
    Dusk,
    Dawn,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Terrain {
    #[default]
    Urban,
    Forest,
    Desert,
    Mountain,
    Coastal,
}

/// Lifecycle phase of a geographic threat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatPhase {
    /// Created, not yet advanced by a motion tick.
    #[default]
    Spawned,
    /// Drifting toward the protected site.
    Moving,
    /// Resolved by an operator or reached the inner zone. Frozen.
    Assessed,
    /// Older than the TTL. Frozen until the cleanup sweep drops it.
    Expired,
}

/// How an assessed threat was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    ReachedSite,
    Dismissed,
    Investigating,
}

/// Category of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    EnvironmentChange,
    SensorConfigChange,
    PerimeterBreach,
    LaserCrossing,
}

impl LogKind {
    /// System entries record configuration changes rather than detections.
    pub fn is_system(&self) -> bool {
        matches!(self, Self::EnvironmentChange | Self::SensorConfigChange)
    }
}

/// Severity attached to a log entry. Configuration changes are `Info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogSeverity {
    Info,
    Low,
    Medium,
    High,
}

impl From<Severity> for LogSeverity {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Low => Self::Low,
            Severity::Medium => Self::Medium,
            Severity::High => Self::High,
        }
    }
}

/// Run state of the simulation context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimPhase {
    /// Timers disarmed. Manual entity operations still apply.
    #[default]
    Idle,
    Running,
    Paused,
}
