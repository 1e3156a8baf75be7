use serde::Serialize;

//
// ─── CHARTS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
}

/// One series of a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<u32>,
    pub background_colors: Vec<String>,
    pub border_color: String,
    pub border_width: u8,
    pub fill: bool,
    pub tension: f32,
}

/// Declarative chart description handed to an external charting library.
///
/// Both dashboard charts plot percentages, so the y axis is fixed to
/// `0..=y_max` with `tick_suffix` appended to each tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
    pub show_legend: bool,
    pub y_max: u32,
    pub tick_suffix: String,
}

impl ChartSpec {
    #[must_use]
    pub fn percentage(kind: ChartKind, title: impl Into<String>, labels: Vec<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            labels,
            datasets: Vec::new(),
            show_legend: false,
            y_max: 100,
            tick_suffix: "%".into(),
        }
    }

    #[must_use]
    pub fn with_dataset(mut self, dataset: ChartDataset) -> Self {
        self.datasets.push(dataset);
        self
    }
}

//
// ─── WIDGETS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImprovementArea {
    pub subject: String,
    pub topic: String,
    pub score: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActivityAction {
    Started,
    Completed,
}

impl ActivityAction {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityAction::Started => "Started",
            ActivityAction::Completed => "Completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityEntry {
    pub action: ActivityAction,
    pub exam: String,
    pub score: Option<u32>,
    pub when: String,
}
