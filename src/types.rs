use serde::{Deserialize, Serialize};

// ============================================================================
// CONFIGURATION
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub segments: SegmentConfig,
    pub projections: ProjectionConfig,
    pub thresholds: Thresholds,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentConfig {
    pub input_dir: String,
    /// Segments with fewer ticks than this are discarded before evaluation
    pub min_ticks: usize,
    /// Keep input order in the report instead of completion order
    pub deterministic_order: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Substring terms; when non-empty a projection must match one of them
    pub include: Vec<String>,
    /// Substring terms; a projection matching any of them is skipped
    pub exclude: Vec<String>,
    /// Exact projection names that are never built
    pub ignore: Vec<String>,
}

/// Numeric limits shared by the relational and behavioural predicates.
/// Distances are in road-longitudinal metres, speeds in m/s, times in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Longitudinal lead that must be exceeded for "behind" / "ahead"
    pub behind_offset: f64,
    /// Maximum absolute longitudinal offset for "beside"
    pub beside_offset: f64,
    /// Both actors must keep at least this speed through an overtake
    pub min_overtake_speed: f64,
    /// Largest gap that still counts as following
    pub follow_max_gap: f64,
    /// How long following must be sustained
    pub follow_min_duration: f64,
    /// Fraction of ticks for prevalence predicates (inclusive)
    pub prevalence: f64,
    /// Speeds at or below this count as standing still
    pub stop_speed: f64,
    /// How long a standstill must be sustained to count as stopping
    pub min_stop_duration: f64,
    /// Speeding means exceeding `speed_limit * speeding_tolerance`
    pub speeding_tolerance: f64,
    /// Monitor limit for braking, as a positive deceleration in m/s²
    pub max_deceleration: f64,
    /// Monitor limit for same-lane longitudinal clearance
    pub min_gap: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            behind_offset: 2.0,
            beside_offset: 2.0,
            min_overtake_speed: 5.0,
            follow_max_gap: 30.0,
            follow_min_duration: 3.0,
            prevalence: 0.5,
            stop_speed: 0.1,
            min_stop_duration: 2.0,
            speeding_tolerance: 1.1,
            max_deceleration: 6.0,
            min_gap: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub report_path: String,
    /// Missing instances listed per projection in the coverage report
    pub max_missing_listed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

// ============================================================================
// ACTORS & ENVIRONMENT
// ============================================================================

/// Stable actor identity, valid across all ticks of a segment.
pub type ActorId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorKind {
    Vehicle,
    Bicycle,
    Pedestrian,
}

impl ActorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vehicle => "VEHICLE",
            Self::Bicycle => "BICYCLE",
            Self::Pedestrian => "PEDESTRIAN",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    #[default]
    Clear,
    Cloudy,
    Rain,
    Fog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    #[default]
    Day,
    Twilight,
    Night,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightState {
    Red,
    Yellow,
    Green,
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Environment {
    pub weather: Weather,
    pub time_of_day: TimeOfDay,
}

/// Lane-topology state in road coordinates.
///
/// Lane ids follow the usual road-network convention: negative ids drive
/// along increasing `s`, positive ids against it, and the absolute value
/// grows from the road centre outwards (so a larger `|lane_id|` is further
/// to the driver's right).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaneState {
    pub road_id: i32,
    pub lane_id: i32,
    /// Longitudinal position along the road reference line
    pub s: f64,
    #[serde(default)]
    pub in_junction: bool,
    #[serde(default)]
    pub speed_limit: Option<f64>,
}

impl LaneState {
    /// +1.0 if traffic in this lane moves towards increasing `s`.
    pub fn driving_sign(&self) -> f64 {
        if self.lane_id < 0 {
            1.0
        } else {
            -1.0
        }
    }
}

/// Kinematic and lane state of one actor at one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActorState {
    pub id: ActorId,
    pub kind: ActorKind,
    pub speed: f64,
    #[serde(default)]
    pub acceleration: f64,
    pub lane: LaneState,
    /// Signal controlling this actor's lane, if any
    #[serde(default)]
    pub traffic_light: Option<LightState>,
}
