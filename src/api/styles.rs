//! Chart style tree.
//!
//! Every leaf that may depend on the drawn content is a `StyleValue`: either a
//! literal or a callback resolved per drawn item at draw time. JSON
//! configuration only ever produces literals.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Deserializer};
use smallvec::SmallVec;

use crate::api::store::ChartStore;
use crate::error::ChartResult;
use crate::render::figure::TextStyle;
use crate::render::{Color, DrawingSurface, LineType, PolygonType};

/// Callback receiving the drawing surface, the drawn text and the store.
pub type StyleCallback<T> = Rc<dyn Fn(&dyn DrawingSurface, &str, &dyn ChartStore) -> T>;

pub enum StyleValue<T> {
    Static(T),
    Computed(StyleCallback<T>),
}

impl<T: Clone> StyleValue<T> {
    pub fn computed(
        callback: impl Fn(&dyn DrawingSurface, &str, &dyn ChartStore) -> T + 'static,
    ) -> Self {
        Self::Computed(Rc::new(callback))
    }

    /// Resolves the value for one drawn item.
    pub fn resolve(&self, surface: &dyn DrawingSurface, content: &str, store: &dyn ChartStore) -> T {
        match self {
            Self::Static(value) => value.clone(),
            Self::Computed(callback) => callback(surface, content, store),
        }
    }

    #[must_use]
    pub fn as_static(&self) -> Option<&T> {
        match self {
            Self::Static(value) => Some(value),
            Self::Computed(_) => None,
        }
    }
}

impl<T> From<T> for StyleValue<T> {
    fn from(value: T) -> Self {
        Self::Static(value)
    }
}

impl<T: Clone> Clone for StyleValue<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Static(value) => Self::Static(value.clone()),
            Self::Computed(callback) => Self::Computed(Rc::clone(callback)),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for StyleValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(value) => f.debug_tuple("Static").field(value).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Literals compare by value, callbacks by identity.
impl<T: PartialEq> PartialEq for StyleValue<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Static(lhs), Self::Static(rhs)) => lhs == rhs,
            (Self::Computed(lhs), Self::Computed(rhs)) => Rc::ptr_eq(lhs, rhs),
            _ => false,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for StyleValue<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Self::Static)
    }
}

fn hex(value: &str) -> Color {
    Color::parse(value).unwrap_or(Color::BLACK)
}

fn dash(values: &[f64]) -> SmallVec<[f64; 4]> {
    SmallVec::from_slice(values)
}

/// Reference price the bar/last-price color is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CandleColorCompareRule {
    #[default]
    CurrentOpen,
    PreviousClose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TooltipShowRule {
    #[default]
    Always,
    FollowCross,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TooltipIconPosition {
    Left,
    #[default]
    Middle,
    Right,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct Styles {
    pub candle: CandleStyles,
    pub indicator: IndicatorStyles,
    pub x_axis: AxisStyles,
    pub y_axis: AxisStyles,
    pub separator: SeparatorStyles,
    pub crosshair: CrosshairStyles,
}

impl Styles {
    /// Parses a (possibly partial) JSON style tree over the defaults.
    pub fn from_json(json: &str) -> ChartResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct CandleStyles {
    pub bar: CandleBarStyles,
    pub price_mark: PriceMarkStyles,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CandleBarStyles {
    pub compare_rule: CandleColorCompareRule,
    pub up_color: Color,
    pub down_color: Color,
    pub no_change_color: Color,
}

impl Default for CandleBarStyles {
    fn default() -> Self {
        Self {
            compare_rule: CandleColorCompareRule::CurrentOpen,
            up_color: hex("#2dc08e"),
            down_color: hex("#f92855"),
            no_change_color: hex("#888888"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PriceMarkStyles {
    pub show: bool,
    pub last: LastPriceMarkStyles,
}

impl Default for PriceMarkStyles {
    fn default() -> Self {
        Self {
            show: true,
            last: LastPriceMarkStyles::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LastPriceMarkStyles {
    pub show: bool,
    pub compare_rule: CandleColorCompareRule,
    pub up_color: Color,
    pub down_color: Color,
    pub no_change_color: Color,
    pub line: PriceMarkLineStyles,
    pub text: PriceMarkTextStyles,
}

impl Default for LastPriceMarkStyles {
    fn default() -> Self {
        Self {
            show: true,
            compare_rule: CandleColorCompareRule::CurrentOpen,
            up_color: hex("#2dc08e"),
            down_color: hex("#f92855"),
            no_change_color: hex("#888888"),
            line: PriceMarkLineStyles::default(),
            text: PriceMarkTextStyles::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PriceMarkLineStyles {
    pub show: bool,
    pub style: LineType,
    pub size: f64,
    pub dashed_value: SmallVec<[f64; 4]>,
}

impl Default for PriceMarkLineStyles {
    fn default() -> Self {
        Self {
            show: true,
            style: LineType::Dashed,
            size: 1.0,
            dashed_value: dash(&[4.0, 4.0]),
        }
    }
}

/// Badge style; the background follows the last-price color.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PriceMarkTextStyles {
    pub show: bool,
    pub style: PolygonType,
    pub color: StyleValue<Color>,
    pub size: f64,
    pub family: String,
    pub weight: String,
    pub padding_left: f64,
    pub padding_top: f64,
    pub padding_right: f64,
    pub padding_bottom: f64,
    pub border_style: LineType,
    pub border_size: f64,
    pub border_color: Color,
    pub border_dashed_value: SmallVec<[f64; 4]>,
    pub border_radius: f64,
}

impl Default for PriceMarkTextStyles {
    fn default() -> Self {
        Self {
            show: true,
            style: PolygonType::Fill,
            color: StyleValue::Static(Color::WHITE),
            size: 12.0,
            family: "Helvetica Neue".to_owned(),
            weight: "normal".to_owned(),
            padding_left: 4.0,
            padding_top: 4.0,
            padding_right: 4.0,
            padding_bottom: 4.0,
            border_style: LineType::Solid,
            border_size: 0.0,
            border_color: Color::TRANSPARENT,
            border_dashed_value: dash(&[2.0, 2.0]),
            border_radius: 2.0,
        }
    }
}

impl PriceMarkTextStyles {
    #[must_use]
    pub fn to_text_style(&self, background: Color) -> TextStyle {
        TextStyle {
            style: self.style,
            color: self.color.clone(),
            size: self.size,
            family: self.family.clone(),
            weight: self.weight.clone(),
            padding_left: self.padding_left,
            padding_top: self.padding_top,
            padding_right: self.padding_right,
            padding_bottom: self.padding_bottom,
            border_style: self.border_style,
            border_color: StyleValue::Static(self.border_color),
            border_size: self.border_size,
            border_dashed_value: self.border_dashed_value.clone(),
            border_radius: self.border_radius,
            background_color: StyleValue::Static(background),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct IndicatorStyles {
    pub up_color: Color,
    pub down_color: Color,
    pub no_change_color: Color,
    /// Palette cycled by line figures without their own color.
    pub lines: Vec<IndicatorLineStyles>,
    pub tooltip: IndicatorTooltipStyles,
}

impl Default for IndicatorStyles {
    fn default() -> Self {
        let lines = ["#ff9600", "#935ebd", "#2196f3", "#e11d74", "#01c5c4"]
            .into_iter()
            .map(|color| IndicatorLineStyles {
                color: hex(color),
                ..IndicatorLineStyles::default()
            })
            .collect();
        Self {
            up_color: hex("#2dc08eb3"),
            down_color: hex("#f92855b3"),
            no_change_color: hex("#888888"),
            lines,
            tooltip: IndicatorTooltipStyles::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct IndicatorLineStyles {
    pub style: LineType,
    pub size: f64,
    pub dashed_value: SmallVec<[f64; 4]>,
    pub color: Color,
}

impl Default for IndicatorLineStyles {
    fn default() -> Self {
        Self {
            style: LineType::Solid,
            size: 1.0,
            dashed_value: dash(&[2.0, 2.0]),
            color: hex("#ff9600"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct IndicatorTooltipStyles {
    pub show_rule: TooltipShowRule,
    pub show_name: bool,
    pub show_params: bool,
    /// Legend text when a value is missing.
    pub default_value: String,
    pub offset_left: f64,
    pub offset_top: f64,
    pub offset_right: f64,
    pub offset_bottom: f64,
    pub text: TooltipTextStyles,
    pub icons: Vec<TooltipIconStyles>,
}

impl Default for IndicatorTooltipStyles {
    fn default() -> Self {
        Self {
            show_rule: TooltipShowRule::Always,
            show_name: true,
            show_params: true,
            default_value: "n/a".to_owned(),
            offset_left: 4.0,
            offset_top: 6.0,
            offset_right: 4.0,
            offset_bottom: 6.0,
            text: TooltipTextStyles::default(),
            icons: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TooltipTextStyles {
    pub size: f64,
    pub family: String,
    pub weight: String,
    pub color: StyleValue<Color>,
    pub margin_left: f64,
    pub margin_top: f64,
    pub margin_right: f64,
    pub margin_bottom: f64,
}

impl Default for TooltipTextStyles {
    fn default() -> Self {
        Self {
            size: 12.0,
            family: "Helvetica Neue".to_owned(),
            weight: "normal".to_owned(),
            color: StyleValue::Static(hex("#76808f")),
            margin_left: 8.0,
            margin_top: 4.0,
            margin_right: 8.0,
            margin_bottom: 4.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TooltipIconStyles {
    pub id: String,
    pub position: TooltipIconPosition,
    /// Glyph text painted as the icon.
    pub icon: String,
    pub font_family: String,
    pub size: f64,
    pub color: Color,
    pub active_color: Color,
    pub background_color: Color,
    pub active_background_color: Color,
    pub margin_left: f64,
    pub margin_top: f64,
    pub margin_right: f64,
    pub margin_bottom: f64,
    pub padding_left: f64,
    pub padding_top: f64,
    pub padding_right: f64,
    pub padding_bottom: f64,
}

impl Default for TooltipIconStyles {
    fn default() -> Self {
        Self {
            id: String::new(),
            position: TooltipIconPosition::Middle,
            icon: String::new(),
            font_family: "icomoon".to_owned(),
            size: 14.0,
            color: hex("#76808f"),
            active_color: hex("#76808f"),
            background_color: Color::TRANSPARENT,
            active_background_color: hex("#76808f26"),
            margin_left: 0.0,
            margin_top: 0.0,
            margin_right: 0.0,
            margin_bottom: 0.0,
            padding_left: 0.0,
            padding_top: 0.0,
            padding_right: 0.0,
            padding_bottom: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AxisStyles {
    pub show: bool,
    /// Fixed axis thickness; `None` sizes the axis from its labels.
    pub size: Option<f64>,
    pub axis_line: AxisLineStyles,
    pub tick_line: TickLineStyles,
    pub tick_text: TickTextStyles,
}

impl Default for AxisStyles {
    fn default() -> Self {
        Self {
            show: true,
            size: None,
            axis_line: AxisLineStyles::default(),
            tick_line: TickLineStyles::default(),
            tick_text: TickTextStyles::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AxisLineStyles {
    pub show: bool,
    pub color: Color,
    pub size: f64,
}

impl Default for AxisLineStyles {
    fn default() -> Self {
        Self {
            show: true,
            color: hex("#dddddd"),
            size: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TickLineStyles {
    pub show: bool,
    pub size: f64,
    pub length: f64,
    pub color: Color,
}

impl Default for TickLineStyles {
    fn default() -> Self {
        Self {
            show: true,
            size: 1.0,
            length: 3.0,
            color: hex("#dddddd"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TickTextStyles {
    pub show: bool,
    pub color: StyleValue<Color>,
    pub size: f64,
    pub family: String,
    pub weight: String,
    pub margin_start: f64,
    pub margin_end: f64,
}

impl Default for TickTextStyles {
    fn default() -> Self {
        Self {
            show: true,
            color: StyleValue::Static(hex("#76808f")),
            size: 12.0,
            family: "Helvetica Neue".to_owned(),
            weight: "normal".to_owned(),
            margin_start: 4.0,
            margin_end: 4.0,
        }
    }
}

impl TickTextStyles {
    #[must_use]
    pub fn to_text_style(&self) -> TextStyle {
        TextStyle {
            color: self.color.clone(),
            size: self.size,
            family: self.family.clone(),
            weight: self.weight.clone(),
            ..TextStyle::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SeparatorStyles {
    pub size: f64,
    pub color: Color,
    pub fill: bool,
}

impl Default for SeparatorStyles {
    fn default() -> Self {
        Self {
            size: 1.0,
            color: hex("#dddddd"),
            fill: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CrosshairStyles {
    pub show: bool,
    pub horizontal: CrosshairDirectionStyles,
    pub vertical: CrosshairDirectionStyles,
}

impl Default for CrosshairStyles {
    fn default() -> Self {
        Self {
            show: true,
            horizontal: CrosshairDirectionStyles::default(),
            vertical: CrosshairDirectionStyles::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CrosshairDirectionStyles {
    pub show: bool,
    pub line: PriceMarkLineStyles,
    pub line_color: Color,
    pub text: CrosshairTextStyles,
}

impl Default for CrosshairDirectionStyles {
    fn default() -> Self {
        Self {
            show: true,
            line: PriceMarkLineStyles {
                dashed_value: dash(&[4.0, 2.0]),
                ..PriceMarkLineStyles::default()
            },
            line_color: hex("#76808f"),
            text: CrosshairTextStyles::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CrosshairTextStyles {
    pub show: bool,
    pub color: StyleValue<Color>,
    pub size: f64,
    pub family: String,
    pub weight: String,
    pub padding_left: f64,
    pub padding_top: f64,
    pub padding_right: f64,
    pub padding_bottom: f64,
    pub border_radius: f64,
    pub background_color: StyleValue<Color>,
}

impl Default for CrosshairTextStyles {
    fn default() -> Self {
        Self {
            show: true,
            color: StyleValue::Static(Color::WHITE),
            size: 12.0,
            family: "Helvetica Neue".to_owned(),
            weight: "normal".to_owned(),
            padding_left: 4.0,
            padding_top: 4.0,
            padding_right: 4.0,
            padding_bottom: 4.0,
            border_radius: 2.0,
            background_color: StyleValue::Static(hex("#686d76")),
        }
    }
}

impl CrosshairTextStyles {
    #[must_use]
    pub fn to_text_style(&self) -> TextStyle {
        TextStyle {
            color: self.color.clone(),
            size: self.size,
            family: self.family.clone(),
            weight: self.weight.clone(),
            padding_left: self.padding_left,
            padding_top: self.padding_top,
            padding_right: self.padding_right,
            padding_bottom: self.padding_bottom,
            border_radius: self.border_radius,
            background_color: self.background_color.clone(),
            ..TextStyle::default()
        }
    }
}
