// ── Chart view models ──
//
// Rendering-library agnostic series for the four chart kinds. Colors are
// `#rrggbb` strings as produced by the backend.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::alert::Severity;
use super::metrics::HistoricalSample;

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Bar,
    Gauge,
    Pie,
    Line,
}

/// Top processes by memory with their CPU values; both series share `labels`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BarChartView {
    pub labels: Vec<String>,
    pub memory: Vec<f64>,
    pub cpu: Vec<f64>,
}

/// One dial of the gauge chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dial {
    pub value: f64,
    pub max: f64,
    pub level: Severity,
    pub color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GaugeView {
    pub cpu: Dial,
    pub memory: Dial,
    pub processes: Dial,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Slice {
    pub label: String,
    pub count: u64,
    pub color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PieChartView {
    pub memory: Vec<Slice>,
    pub cpu: Vec<Slice>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineChartView {
    pub hours: u32,
    pub points: Vec<HistoricalSample>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChartData {
    Bar(BarChartView),
    Gauge(GaugeView),
    Pie(PieChartView),
    Line(LineChartView),
}

impl ChartData {
    pub fn kind(&self) -> ChartKind {
        match self {
            Self::Bar(_) => ChartKind::Bar,
            Self::Gauge(_) => ChartKind::Gauge,
            Self::Pie(_) => ChartKind::Pie,
            Self::Line(_) => ChartKind::Line,
        }
    }
}
