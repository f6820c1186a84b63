use crate::{
    metrics::HostMetrics,
    status::{RadioState, StatusSnapshot},
};

pub const DEFAULT_TITLE: &str = "INTERLINK";

/// Semantic icons the panel knows how to draw.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Glyph {
    Wifi,
    Processor,
    Thermometer,
    Antenna,
    Microphone,
    Transmit,
    Receive,
}

/// Which of the two alternating screens to show.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ScreenKind {
    Metrics,
    #[default]
    Status,
}

impl ScreenKind {
    pub fn toggle(self) -> Self {
        match self {
            ScreenKind::Metrics => ScreenKind::Status,
            ScreenKind::Status => ScreenKind::Metrics,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScreenRow {
    pub glyph: Glyph,
    pub label: String,
    /// Secondary icon and text drawn on the right half of the row.
    pub aside: Option<(Glyph, String)>,
}

impl ScreenRow {
    fn new(glyph: Glyph, label: impl Into<String>) -> Self {
        Self {
            glyph,
            label: label.into(),
            aside: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indicator {
    pub glyph: Glyph,
    pub label: &'static str,
    pub highlighted: bool,
}

/// TX and RX blocks. Only constructible from a [`RadioState`], so exactly one
/// block is ever highlighted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorPair {
    tx: Indicator,
    rx: Indicator,
}

impl IndicatorPair {
    pub fn from_state(state: RadioState) -> Self {
        let transmitting = state.is_transmitting();
        Self {
            tx: Indicator {
                glyph: Glyph::Transmit,
                label: "TX",
                highlighted: transmitting,
            },
            rx: Indicator {
                glyph: Glyph::Receive,
                label: "RX",
                highlighted: !transmitting,
            },
        }
    }

    pub fn tx(&self) -> &Indicator {
        &self.tx
    }

    pub fn rx(&self) -> &Indicator {
        &self.rx
    }
}

/// A complete, immutable description of one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenState {
    pub kind: ScreenKind,
    pub title: String,
    pub rows: [ScreenRow; 2],
    pub indicators: IndicatorPair,
}

impl ScreenState {
    /// Plain-text rendering used by the headless panel and log output.
    pub fn summary(&self) -> String {
        let row = |r: &ScreenRow| match &r.aside {
            Some((_, aside)) => format!("{} {}", r.label, aside),
            None => r.label.clone(),
        };
        let mark = |i: &Indicator| {
            if i.highlighted {
                format!("[{}]", i.label)
            } else {
                format!(" {} ", i.label)
            }
        };
        format!(
            "{} | {} | {} | {}{}",
            self.title,
            row(&self.rows[0]),
            row(&self.rows[1]),
            mark(self.indicators.tx()),
            mark(self.indicators.rx())
        )
    }
}

pub fn compose(
    kind: ScreenKind,
    title: &str,
    metrics: &HostMetrics,
    status: &StatusSnapshot,
) -> ScreenState {
    match kind {
        ScreenKind::Metrics => compose_metrics(title, metrics, status.radio),
        ScreenKind::Status => compose_status(title, status),
    }
}

pub fn compose_metrics(title: &str, metrics: &HostMetrics, radio: RadioState) -> ScreenState {
    let mut cpu = ScreenRow::new(Glyph::Processor, format_cpu(metrics.cpu_percent));
    cpu.aside = Some((Glyph::Thermometer, metrics.temperature.clone()));
    ScreenState {
        kind: ScreenKind::Metrics,
        title: title.to_string(),
        rows: [ScreenRow::new(Glyph::Wifi, metrics.ip_address.clone()), cpu],
        indicators: IndicatorPair::from_state(radio),
    }
}

pub fn compose_status(title: &str, status: &StatusSnapshot) -> ScreenState {
    ScreenState {
        kind: ScreenKind::Status,
        title: title.to_string(),
        rows: [
            ScreenRow::new(Glyph::Antenna, status.conference.clone()),
            ScreenRow::new(Glyph::Microphone, status.speaker.clone()),
        ],
        indicators: IndicatorPair::from_state(status.radio),
    }
}

fn format_cpu(percent: f32) -> String {
    format!("{percent:.1}%")
}
