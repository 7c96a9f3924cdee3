use serde::{Deserialize, Serialize};

use super::format::format_precision;
use super::ticks::{
    INDEX_TICK_TARGET_SPACING_PX, MAX_TICKS, MIN_TICKS, VALUE_TICK_TARGET_SPACING_PX,
    log_ladder_values, nice_values, select_ticks_with_min_spacing, step_decimal_places,
    tick_target_count,
};
use super::types::KLineData;

const ONE_DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Value-space transform applied by an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AxisName {
    #[default]
    Normal,
    /// Labels show the relative change from the first visible close.
    Percentage,
    /// Uniform spacing in signed base-10 log units.
    Logarithm,
}

impl AxisName {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Percentage => "percentage",
            Self::Logarithm => "logarithm",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AxisPosition {
    Left,
    #[default]
    Right,
    Top,
    Bottom,
}

impl AxisPosition {
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

/// Domain an axis measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisKind {
    /// Price or indicator values.
    Value,
    /// Data indices of the shared time axis.
    Index,
}

/// Construction-time capabilities of an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisDescriptor {
    pub name: AxisName,
    pub kind: AxisKind,
    /// Whether the axis derives its ticks from its own range.
    pub supports_auto_ticks: bool,
}

impl AxisDescriptor {
    #[must_use]
    pub const fn value(name: AxisName) -> Self {
        Self {
            name,
            kind: AxisKind::Value,
            supports_auto_ticks: true,
        }
    }

    #[must_use]
    pub const fn index() -> Self {
        Self {
            name: AxisName::Normal,
            kind: AxisKind::Index,
            supports_auto_ticks: false,
        }
    }
}

/// Fraction of the axis extent reserved above and below the fitted data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisGap {
    pub top: f64,
    pub bottom: f64,
}

impl Default for AxisGap {
    fn default() -> Self {
        Self {
            top: 0.2,
            bottom: 0.1,
        }
    }
}

/// User-facing axis options; merged into the live axis by the owning pane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisOptions {
    pub name: AxisName,
    pub position: AxisPosition,
    pub inside: bool,
    pub reverse: bool,
    pub scroll_zoom_enabled: bool,
    pub gap: AxisGap,
    pub show: bool,
}

impl Default for AxisOptions {
    fn default() -> Self {
        Self {
            name: AxisName::Normal,
            position: AxisPosition::Right,
            inside: false,
            reverse: false,
            scroll_zoom_enabled: true,
            gap: AxisGap::default(),
            show: true,
        }
    }
}

impl AxisOptions {
    #[must_use]
    pub fn left() -> Self {
        Self {
            position: AxisPosition::Left,
            show: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn bottom() -> Self {
        Self {
            position: AxisPosition::Bottom,
            ..Self::default()
        }
    }
}

/// One labelled position on an axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisTick {
    pub coord: f64,
    pub text: String,
    pub value: f64,
}

impl AxisTick {
    #[must_use]
    pub fn new(coord: f64, text: impl Into<String>, value: f64) -> Self {
        Self {
            coord,
            text: text.into(),
            value,
        }
    }
}

/// Axis domain in three spaces: raw values, transformed ("real") values used
/// for pixel mapping, and display values used for labels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisRange {
    pub from: f64,
    pub to: f64,
    pub real_from: f64,
    pub real_to: f64,
    pub display_from: f64,
    pub display_to: f64,
}

impl AxisRange {
    #[must_use]
    pub fn real_span(&self) -> f64 {
        self.real_to - self.real_from
    }

    /// Zero, inverted or non-finite ranges cannot drive a pixel mapping.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        let span = self.real_span();
        !span.is_finite() || span <= 0.0
    }
}

/// Value or index axis with its cached tick set.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    descriptor: AxisDescriptor,
    options: AxisOptions,
    range: AxisRange,
    base_value: Option<f64>,
    extent_px: f64,
    ticks: Vec<AxisTick>,
    auto_calc_ticks: bool,
}

impl Axis {
    #[must_use]
    pub fn new(descriptor: AxisDescriptor, options: AxisOptions) -> Self {
        Self {
            descriptor: AxisDescriptor {
                name: options.name,
                ..descriptor
            },
            options,
            range: AxisRange::default(),
            base_value: None,
            extent_px: 0.0,
            ticks: Vec::new(),
            auto_calc_ticks: false,
        }
    }

    #[must_use]
    pub fn descriptor(&self) -> AxisDescriptor {
        self.descriptor
    }

    #[must_use]
    pub fn name(&self) -> AxisName {
        self.descriptor.name
    }

    #[must_use]
    pub fn options(&self) -> &AxisOptions {
        &self.options
    }

    #[must_use]
    pub fn position(&self) -> AxisPosition {
        self.options.position
    }

    /// Merges options without discarding range or tick cache.
    pub fn apply_options(&mut self, options: AxisOptions) {
        let name_changed = self.descriptor.name != options.name;
        self.descriptor.name = options.name;
        self.options = options;
        if name_changed {
            self.recompute_range_spaces();
        }
    }

    #[must_use]
    pub fn auto_calc_ticks(&self) -> bool {
        self.auto_calc_ticks
    }

    pub fn set_auto_calc_ticks(&mut self, enabled: bool) {
        self.auto_calc_ticks = enabled;
    }

    #[must_use]
    pub fn is_vertical(&self) -> bool {
        self.options.position.is_vertical()
    }

    /// `true` when the axis line sits at pixel 0 of the axis widget and labels
    /// grow away from it (left/top aligned).
    #[must_use]
    pub fn is_from_zero(&self) -> bool {
        let inside = self.options.inside;
        match self.options.position {
            AxisPosition::Left | AxisPosition::Top => inside,
            AxisPosition::Right | AxisPosition::Bottom => !inside,
        }
    }

    #[must_use]
    pub fn extent(&self) -> f64 {
        self.extent_px
    }

    pub fn set_extent(&mut self, extent_px: f64) {
        self.extent_px = if extent_px.is_finite() {
            extent_px.max(0.0)
        } else {
            0.0
        };
    }

    #[must_use]
    pub fn range(&self) -> AxisRange {
        self.range
    }

    #[must_use]
    pub fn base_value(&self) -> Option<f64> {
        self.base_value
    }

    /// Sets the reference used by percentage display values.
    pub fn set_base_value(&mut self, base_value: Option<f64>) {
        self.base_value = base_value.filter(|base| base.is_finite() && *base != 0.0);
        self.recompute_range_spaces();
    }

    pub fn set_range(&mut self, from: f64, to: f64) {
        self.range.from = from;
        self.range.to = to;
        self.recompute_range_spaces();
    }

    /// Fits the range to `[min, max]` leaving the configured gap ratios free.
    ///
    /// Equal bounds are padded so the data still gets a usable mapping.
    pub fn fit_range(&mut self, min: f64, max: f64) {
        if !min.is_finite() || !max.is_finite() || max < min {
            return;
        }
        let mut real_min = self.value_to_real(min);
        let mut real_max = self.value_to_real(max);
        if real_max - real_min <= f64::EPSILON * real_max.abs().max(1.0) {
            let pad = (real_max.abs() * 0.01).max(1.0);
            real_min -= pad;
            real_max += pad;
        }
        let gap = self.options.gap;
        let top = gap.top.clamp(0.0, 0.45);
        let bottom = gap.bottom.clamp(0.0, 0.45);
        let total = (real_max - real_min) / (1.0 - top - bottom);
        let real_from = real_min - total * bottom;
        let real_to = real_max + total * top;
        self.set_range(self.real_to_value(real_from), self.real_to_value(real_to));
    }

    fn recompute_range_spaces(&mut self) {
        let real_from = self.value_to_real(self.range.from);
        let real_to = self.value_to_real(self.range.to);
        self.range.real_from = real_from;
        self.range.real_to = real_to;
        self.range.display_from = self.real_to_display(real_from);
        self.range.display_to = self.real_to_display(real_to);
    }

    #[must_use]
    pub fn value_to_real(&self, value: f64) -> f64 {
        match self.descriptor.name {
            AxisName::Logarithm => log_real(value),
            AxisName::Normal | AxisName::Percentage => value,
        }
    }

    #[must_use]
    pub fn real_to_value(&self, real: f64) -> f64 {
        match self.descriptor.name {
            AxisName::Logarithm => log_value(real),
            AxisName::Normal | AxisName::Percentage => real,
        }
    }

    #[must_use]
    pub fn real_to_display(&self, real: f64) -> f64 {
        match (self.descriptor.name, self.base_value) {
            (AxisName::Percentage, Some(base)) => (real - base) / base * 100.0,
            _ => real,
        }
    }

    #[must_use]
    pub fn display_to_real(&self, display: f64) -> f64 {
        match (self.descriptor.name, self.base_value) {
            (AxisName::Percentage, Some(base)) => display / 100.0 * base + base,
            _ => display,
        }
    }

    /// Formats a display value as label text.
    #[must_use]
    pub fn display_value_to_text(&self, display: f64, precision: u32) -> String {
        match self.descriptor.name {
            AxisName::Percentage if self.base_value.is_some() => {
                format!("{}%", format_precision(display, 2))
            }
            AxisName::Logarithm => format_precision(log_value(display), precision),
            _ => format_precision(display, precision),
        }
    }

    /// Label text for a raw value, going through the real and display spaces.
    #[must_use]
    pub fn value_to_text(&self, value: f64, precision: u32) -> String {
        self.display_value_to_text(self.real_to_display(self.value_to_real(value)), precision)
    }

    /// Maps a value to a pixel offset along the axis extent.
    ///
    /// A degenerate range or extent maps every value onto itself.
    #[must_use]
    pub fn value_to_pixel(&self, value: f64) -> f64 {
        self.real_to_pixel(self.value_to_real(value))
    }

    #[must_use]
    pub fn pixel_to_value(&self, pixel: f64) -> f64 {
        if self.is_identity() {
            return pixel;
        }
        let rate = self.pixel_to_rate(pixel);
        let real = self.range.real_from + rate * self.range.real_span();
        self.real_to_value(real)
    }

    /// Pixel for `value`, clamped inside the extent so a label or line drawn
    /// there never clips at the pane edge.
    #[must_use]
    pub fn value_to_nice_pixel(&self, value: f64) -> f64 {
        let pixel = self.value_to_pixel(value);
        if self.is_identity() {
            return pixel;
        }
        let extent = self.extent_px;
        pixel.min(extent * 0.98).max(extent * 0.05).round()
    }

    /// Pixels per unit of index for index axes, 0 when degenerate.
    #[must_use]
    pub fn bar_space(&self) -> f64 {
        if self.is_identity() {
            return 0.0;
        }
        self.extent_px / self.range.real_span()
    }

    fn is_identity(&self) -> bool {
        self.range.is_degenerate() || self.extent_px <= 0.0
    }

    fn real_to_pixel(&self, real: f64) -> f64 {
        if self.is_identity() {
            return real;
        }
        let rate = (real - self.range.real_from) / self.range.real_span();
        let flipped = self.is_vertical() != self.options.reverse;
        if flipped {
            (1.0 - rate) * self.extent_px
        } else {
            rate * self.extent_px
        }
    }

    fn pixel_to_rate(&self, pixel: f64) -> f64 {
        let rate = pixel / self.extent_px;
        let flipped = self.is_vertical() != self.options.reverse;
        if flipped { 1.0 - rate } else { rate }
    }

    #[must_use]
    pub fn ticks(&self) -> &[AxisTick] {
        &self.ticks
    }

    pub fn clear_ticks(&mut self) {
        self.ticks.clear();
    }

    /// Rebuilds value ticks from the current range when auto calculation is on.
    ///
    /// `min_spacing_px` is the label height; ticks closer than that are dropped.
    pub fn calc_value_ticks(&mut self, precision: u32, min_spacing_px: f64) {
        if !self.auto_calc_ticks {
            return;
        }
        self.ticks.clear();
        if self.is_identity() {
            return;
        }

        let target = tick_target_count(
            self.extent_px,
            VALUE_TICK_TARGET_SPACING_PX.max(min_spacing_px),
            MIN_TICKS,
            MAX_TICKS,
        );
        let range = self.range;
        let mut candidates = Vec::with_capacity(target + 2);
        if self.descriptor.name == AxisName::Logarithm {
            let values = log_ladder_values(range.from.min(range.to), range.from.max(range.to), target);
            let values = if values.is_empty() {
                let (reals, _) = nice_values(range.real_from, range.real_to, target);
                reals.into_iter().map(|real| self.real_to_value(real)).collect()
            } else {
                values
            };
            for value in values {
                let real = self.value_to_real(value);
                candidates.push(AxisTick::new(
                    self.real_to_pixel(real),
                    self.display_value_to_text(self.real_to_display(real), precision),
                    value,
                ));
            }
        } else {
            let (displays, step) = nice_values(range.display_from, range.display_to, target);
            let places = precision.max(step_decimal_places(step));
            for display in displays {
                let real = self.display_to_real(display);
                candidates.push(AxisTick::new(
                    self.real_to_pixel(real),
                    self.display_value_to_text(display, places),
                    self.real_to_value(real),
                ));
            }
        }

        let extent = self.extent_px;
        candidates.retain(|tick| tick.coord.is_finite() && tick.coord >= 0.0 && tick.coord <= extent);
        self.ticks = select_ticks_with_min_spacing(candidates, min_spacing_px);
    }

    /// Rebuilds index ticks labelled with bar timestamps.
    pub fn calc_index_ticks(&mut self, data: &[KLineData], min_spacing_px: f64) {
        self.ticks.clear();
        if self.is_identity() || data.is_empty() {
            return;
        }

        let target = tick_target_count(
            self.extent_px,
            INDEX_TICK_TARGET_SPACING_PX.max(min_spacing_px),
            MIN_TICKS,
            MAX_TICKS,
        );
        let range = self.range;
        let (indices, step) = nice_values(range.real_from, range.real_to, target);
        let step = step.max(1.0);
        let step_ms = average_interval_ms(data).saturating_mul(step as i64);
        let format = if step_ms < ONE_DAY_MS { "%H:%M" } else { "%m-%d" };

        let mut candidates = Vec::with_capacity(indices.len());
        for index in indices {
            if index < 0.0 || index.fract() != 0.0 {
                continue;
            }
            let Some(bar) = data.get(index as usize) else {
                continue;
            };
            let Some(time) = bar.datetime() else {
                continue;
            };
            candidates.push(AxisTick::new(
                self.real_to_pixel(index),
                time.format(format).to_string(),
                index,
            ));
        }

        let extent = self.extent_px;
        candidates.retain(|tick| tick.coord >= 0.0 && tick.coord <= extent);
        self.ticks = select_ticks_with_min_spacing(candidates, min_spacing_px);
    }
}

fn average_interval_ms(data: &[KLineData]) -> i64 {
    match (data.first(), data.last()) {
        (Some(first), Some(last)) if data.len() > 1 => {
            (last.timestamp - first.timestamp) / (data.len() as i64 - 1)
        }
        _ => ONE_DAY_MS,
    }
}

/// Smallest value a logarithm axis resolves; anything at or below it maps to
/// the floor instead of an undefined logarithm.
const LOG_FLOOR: f64 = 1e-12;

fn log_real(value: f64) -> f64 {
    if value.is_nan() {
        return LOG_FLOOR.log10();
    }
    value.max(LOG_FLOOR).log10()
}

fn log_value(real: f64) -> f64 {
    if real.is_nan() {
        return LOG_FLOOR;
    }
    10_f64.powf(real)
}

#[cfg(test)]
mod tests {
    use super::{Axis, AxisDescriptor, AxisName, AxisOptions, AxisPosition};

    fn value_axis(options: AxisOptions, extent: f64, from: f64, to: f64) -> Axis {
        let mut axis = Axis::new(AxisDescriptor::value(options.name), options);
        axis.set_extent(extent);
        axis.set_range(from, to);
        axis.set_auto_calc_ticks(true);
        axis
    }

    #[test]
    fn vertical_axis_puts_higher_values_nearer_the_top() {
        let axis = value_axis(AxisOptions::default(), 200.0, 0.0, 100.0);
        assert_eq!(axis.value_to_pixel(100.0), 0.0);
        assert_eq!(axis.value_to_pixel(0.0), 200.0);
        assert_eq!(axis.value_to_pixel(25.0), 150.0);
        assert_eq!(axis.pixel_to_value(150.0), 25.0);
    }

    #[test]
    fn reversed_vertical_axis_grows_downwards() {
        let options = AxisOptions {
            reverse: true,
            ..AxisOptions::default()
        };
        let axis = value_axis(options, 200.0, 0.0, 100.0);
        assert_eq!(axis.value_to_pixel(25.0), 50.0);
        assert_eq!(axis.pixel_to_value(50.0), 25.0);
    }

    #[test]
    fn degenerate_range_is_identity_without_ticks() {
        let mut axis = value_axis(AxisOptions::default(), 200.0, 5.0, 5.0);
        assert_eq!(axis.value_to_pixel(42.0), 42.0);
        assert_eq!(axis.pixel_to_value(13.0), 13.0);
        axis.calc_value_ticks(2, 12.0);
        assert!(axis.ticks().is_empty());

        axis.set_range(10.0, 1.0);
        assert_eq!(axis.value_to_pixel(3.0), 3.0);
    }

    #[test]
    fn from_zero_follows_position_and_inside() {
        let mut axis = value_axis(AxisOptions::default(), 100.0, 0.0, 1.0);
        assert!(axis.is_from_zero());
        axis.apply_options(AxisOptions {
            inside: true,
            ..AxisOptions::default()
        });
        assert!(!axis.is_from_zero());
        axis.apply_options(AxisOptions {
            position: AxisPosition::Left,
            ..AxisOptions::default()
        });
        assert!(!axis.is_from_zero());
        axis.apply_options(AxisOptions::bottom());
        assert!(axis.is_from_zero());
    }

    #[test]
    fn nice_pixel_stays_inside_extent() {
        let axis = value_axis(AxisOptions::default(), 200.0, 0.0, 100.0);
        assert_eq!(axis.value_to_nice_pixel(100.0), 10.0);
        assert_eq!(axis.value_to_nice_pixel(-20.0), 196.0);
        assert_eq!(axis.value_to_nice_pixel(50.0), 100.0);
    }

    #[test]
    fn percentage_ticks_are_relative_to_base() {
        let options = AxisOptions {
            name: AxisName::Percentage,
            ..AxisOptions::default()
        };
        let mut axis = value_axis(options, 400.0, 90.0, 110.0);
        axis.set_base_value(Some(100.0));
        assert_eq!(axis.range().display_from, -10.0);
        assert_eq!(axis.range().display_to, 10.0);
        assert_eq!(axis.value_to_text(105.0, 2), "5.00%");
        axis.calc_value_ticks(2, 12.0);
        assert!(axis.ticks().iter().any(|tick| tick.text == "0.00%"));
    }

    #[test]
    fn logarithm_round_trips_positive_values() {
        let options = AxisOptions {
            name: AxisName::Logarithm,
            ..AxisOptions::default()
        };
        let axis = value_axis(options, 300.0, 1.0, 1000.0);
        let pixel = axis.value_to_pixel(10.0);
        assert!((pixel - 200.0).abs() < 1e-9);
        assert!((axis.pixel_to_value(pixel) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn logarithm_maps_sub_unit_prices_monotonically() {
        let options = AxisOptions {
            name: AxisName::Logarithm,
            ..AxisOptions::default()
        };
        let axis = value_axis(options, 300.0, 0.1, 1.0);
        let pixel = axis.value_to_pixel(0.5);
        assert!((axis.pixel_to_value(pixel) - 0.5).abs() < 1e-12);
        assert!(axis.value_to_pixel(0.2) > pixel);
        assert!(axis.value_to_pixel(0.8) < pixel);
        assert!((axis.value_to_pixel(0.1) - 300.0).abs() < 1e-9);
        assert!(axis.value_to_pixel(1.0).abs() < 1e-9);
    }

    #[test]
    fn logarithm_fit_and_ticks_for_sub_unit_prices() {
        let options = AxisOptions {
            name: AxisName::Logarithm,
            ..AxisOptions::default()
        };
        let mut axis = value_axis(options, 300.0, 1.0, 10.0);
        axis.fit_range(0.2, 0.8);
        let range = axis.range();
        assert!(range.from > 0.0 && range.from < 0.2);
        assert!(range.to > 0.8 && range.to < 2.0);

        axis.calc_value_ticks(2, 12.0);
        let ticks = axis.ticks();
        assert!(ticks.len() >= 2);
        assert!(ticks.windows(2).all(|pair| pair[1].coord > pair[0].coord));
        assert!(ticks.windows(2).all(|pair| pair[1].value < pair[0].value));
        assert!(ticks.iter().all(|tick| tick.value > 0.0 && tick.value < 2.0));
    }

    #[test]
    fn logarithm_floors_non_positive_values() {
        let options = AxisOptions {
            name: AxisName::Logarithm,
            ..AxisOptions::default()
        };
        let axis = value_axis(options, 300.0, 0.1, 1.0);
        assert!(axis.value_to_pixel(0.0).is_finite());
        assert_eq!(axis.value_to_pixel(-5.0), axis.value_to_pixel(0.0));
    }

    #[test]
    fn value_ticks_are_sorted_unique_and_inside() {
        let mut axis = value_axis(AxisOptions::default(), 300.0, 12.3, 98.7);
        axis.calc_value_ticks(2, 14.0);
        let ticks = axis.ticks();
        assert!(ticks.len() >= 2);
        assert!(ticks.windows(2).all(|pair| pair[1].coord > pair[0].coord));
        assert!(ticks.windows(2).all(|pair| pair[1].value != pair[0].value));
        assert!(ticks.iter().all(|tick| (0.0..=300.0).contains(&tick.coord)));
    }

    #[test]
    fn fit_range_reserves_gaps() {
        let mut axis = value_axis(AxisOptions::default(), 100.0, 0.0, 1.0);
        axis.fit_range(10.0, 17.0);
        let range = axis.range();
        assert!((range.to - (17.0 + 10.0 * 0.2)).abs() < 1e-9);
        assert!((range.from - (10.0 - 10.0 * 0.1)).abs() < 1e-9);
    }

    #[test]
    fn index_ticks_are_labelled_with_times() {
        use crate::core::KLineData;
        let data: Vec<KLineData> = (0..50)
            .map(|i| {
                KLineData::new(i64::from(i) * 60_000, 1.0, 2.0, 0.5, 1.5).expect("valid bar")
            })
            .collect();
        let mut axis = Axis::new(AxisDescriptor::index(), AxisOptions::bottom());
        axis.set_extent(500.0);
        axis.set_range(-0.5, 49.5);
        axis.calc_index_ticks(&data, 40.0);
        assert!(!axis.ticks().is_empty());
        assert_eq!(axis.ticks()[0].text, "00:00");
        assert!(axis.ticks().windows(2).all(|pair| pair[1].coord > pair[0].coord));
    }
}
