use serde::{Deserialize, Serialize};

/// One market bar. `time` is a Unix epoch in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    pub fn is_up(&self) -> bool {
        self.close >= self.open
    }
}

/// CSS-style color string. The empty / `na` / `NaN` forms are the
/// not-available sentinel inherited from the indicator-authoring convention:
/// a point whose resolved color is `na` contributes no value at its slot.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub String);

impl Color {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn na() -> Self {
        Self("na".to_string())
    }

    pub fn is_na(&self) -> bool {
        self.0.is_empty() || self.0 == "na" || self.0 == "NaN"
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Splits an `rgba(r,g,b,a)` string into its base color and alpha.
    /// Anything else keeps its text and gets the 0.3 fill alpha.
    pub fn parse_opacity(&self) -> (Color, f32) {
        let s = self.0.trim();
        if let Some(body) = s
            .strip_prefix("rgba(")
            .or_else(|| s.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let parts: Vec<&str> = body.split(',').map(str::trim).collect();
            if parts.len() >= 3 {
                let alpha = parts
                    .get(3)
                    .and_then(|a| a.parse::<f32>().ok())
                    .unwrap_or(1.0);
                let base = format!("rgb({},{},{})", parts[0], parts[1], parts[2]);
                return (Color(base), alpha);
            }
        }
        (self.clone(), 0.3)
    }
}

impl From<&str> for Color {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Value carried by one indicator point: a plain scalar, or a 4-tuple
/// `[open, high, low, close]` for the `bar`/`candle` styles.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlotValue {
    Scalar(f64),
    Ohlc([f64; 4]),
}

impl PlotValue {
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(v) if v.is_finite() => Some(*v),
            _ => None,
        }
    }

    pub fn as_ohlc(&self) -> Option<[f64; 4]> {
        match self {
            Self::Ohlc(v) if v.iter().all(|x| x.is_finite()) => Some(*v),
            _ => None,
        }
    }
}

/// Per-point style overrides. Every field falls back to the plot-level
/// option of the same name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PointOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<super::plot_configs::ShapeKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<super::plot_configs::ShapeLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<super::plot_configs::MarkerSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub textcolor: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wickcolor: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bordercolor: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
}

/// One sparse indicator sample. `time` stays f64 because upstream feeds
/// deliver jittered timestamps; the time index owns the rounding rules.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IndicatorPoint {
    pub time: f64,
    pub value: Option<PlotValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<PointOptions>,
}

impl IndicatorPoint {
    pub fn scalar(time: f64, value: f64) -> Self {
        Self {
            time,
            value: Some(PlotValue::Scalar(value)),
            options: None,
        }
    }

    pub fn gap(time: f64) -> Self {
        Self {
            time,
            value: None,
            options: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.options.get_or_insert_with(PointOptions::default).color = Some(Color::new(color));
        self
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.options.get_or_insert_with(PointOptions::default).offset = Some(offset);
        self
    }
}
