use indexmap::IndexMap;
use tracing::debug;

use crate::api::indicator::Indicator;
use crate::api::styles::Styles;
use crate::core::{
    KLineData, PaneId, Precision, VisibleRange, format_big_number, format_decimal_fold,
    format_thousands,
};
use crate::interaction::{ChartAction, Crosshair, TooltipIconKey, TooltipTitleKey};
use crate::telemetry::EVENTS_TARGET;

/// Chart state consumed by the drawing pipeline.
///
/// Views only read through this interface during a draw pass; the setters are
/// called by figure event actions and by the layout manager.
pub trait ChartStore {
    fn data_list(&self) -> &[KLineData];
    fn visible_range(&self) -> VisibleRange;
    fn precision(&self) -> Precision;
    fn styles(&self) -> &Styles;
    fn crosshair(&self) -> &Crosshair;
    fn set_crosshair(&mut self, crosshair: Crosshair);

    fn format_big_number(&self, value: &str) -> String;
    fn format_thousands(&self, value: &str) -> String;
    fn format_decimal_fold(&self, value: &str) -> String;

    fn indicators_by_pane_id(&self, pane_id: PaneId) -> &[Indicator];

    fn active_tooltip_icon(&self) -> Option<&TooltipIconKey>;
    fn active_tooltip_title(&self) -> Option<&TooltipTitleKey>;
    /// Replaces the active icon; returns whether the key changed.
    fn set_active_tooltip_icon(&mut self, key: Option<TooltipIconKey>) -> bool;
    /// Replaces the active title; returns whether the key changed.
    fn set_active_tooltip_title(&mut self, key: Option<TooltipTitleKey>) -> bool;

    fn execute_action(&mut self, action: ChartAction);
}

/// In-memory reference store.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    data: Vec<KLineData>,
    visible_range: VisibleRange,
    precision: Precision,
    styles: Styles,
    crosshair: Crosshair,
    indicators: IndexMap<PaneId, Vec<Indicator>>,
    active_icon: Option<TooltipIconKey>,
    active_title: Option<TooltipTitleKey>,
    executed_actions: Vec<ChartAction>,
    thousands_separator: String,
    decimal_fold_threshold: usize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            visible_range: VisibleRange::default(),
            precision: Precision::default(),
            styles: Styles::default(),
            crosshair: Crosshair::default(),
            indicators: IndexMap::new(),
            active_icon: None,
            active_title: None,
            executed_actions: Vec::new(),
            thousands_separator: ",".to_owned(),
            decimal_fold_threshold: 3,
        }
    }
}

impl MemoryStore {
    #[must_use]
    pub fn new(data: Vec<KLineData>) -> Self {
        let mut store = Self::default();
        store.set_data_list(data);
        store
    }

    /// Replaces the series and shows all of it.
    pub fn set_data_list(&mut self, data: Vec<KLineData>) {
        self.visible_range = VisibleRange::new(0, data.len());
        self.data = data;
        debug!(bars = self.data.len(), "data list replaced");
    }

    /// Sets the visible window, clamped to the data length.
    pub fn set_visible_range(&mut self, range: VisibleRange) {
        let to = range.to.min(self.data.len());
        self.visible_range = VisibleRange::new(range.from.min(to), to);
    }

    pub fn set_precision(&mut self, precision: Precision) {
        self.precision = precision;
    }

    pub fn set_styles(&mut self, styles: Styles) {
        self.styles = styles;
    }

    pub fn styles_mut(&mut self) -> &mut Styles {
        &mut self.styles
    }

    /// Empty separator disables grouping.
    pub fn set_thousands_separator(&mut self, separator: impl Into<String>) {
        self.thousands_separator = separator.into();
    }

    /// Zero disables folding.
    pub fn set_decimal_fold_threshold(&mut self, threshold: usize) {
        self.decimal_fold_threshold = threshold;
    }

    pub fn add_indicator(&mut self, pane_id: PaneId, indicator: Indicator) {
        self.indicators.entry(pane_id).or_default().push(indicator);
    }

    /// Removes every indicator of `pane_id`, returning them.
    pub fn remove_indicators(&mut self, pane_id: PaneId) -> Vec<Indicator> {
        self.indicators.shift_remove(&pane_id).unwrap_or_default()
    }

    pub fn indicators_mut(&mut self, pane_id: PaneId) -> Option<&mut Vec<Indicator>> {
        self.indicators.get_mut(&pane_id)
    }

    #[must_use]
    pub fn executed_actions(&self) -> &[ChartAction] {
        &self.executed_actions
    }

    /// Hands the executed actions to the caller and empties the log.
    pub fn take_executed_actions(&mut self) -> Vec<ChartAction> {
        std::mem::take(&mut self.executed_actions)
    }
}

impl ChartStore for MemoryStore {
    fn data_list(&self) -> &[KLineData] {
        &self.data
    }

    fn visible_range(&self) -> VisibleRange {
        self.visible_range
    }

    fn precision(&self) -> Precision {
        self.precision
    }

    fn styles(&self) -> &Styles {
        &self.styles
    }

    fn crosshair(&self) -> &Crosshair {
        &self.crosshair
    }

    fn set_crosshair(&mut self, crosshair: Crosshair) {
        self.crosshair = crosshair;
    }

    fn format_big_number(&self, value: &str) -> String {
        format_big_number(value)
    }

    fn format_thousands(&self, value: &str) -> String {
        format_thousands(value, &self.thousands_separator)
    }

    fn format_decimal_fold(&self, value: &str) -> String {
        format_decimal_fold(value, self.decimal_fold_threshold)
    }

    fn indicators_by_pane_id(&self, pane_id: PaneId) -> &[Indicator] {
        self.indicators
            .get(&pane_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn active_tooltip_icon(&self) -> Option<&TooltipIconKey> {
        self.active_icon.as_ref()
    }

    fn active_tooltip_title(&self) -> Option<&TooltipTitleKey> {
        self.active_title.as_ref()
    }

    fn set_active_tooltip_icon(&mut self, key: Option<TooltipIconKey>) -> bool {
        if self.active_icon == key {
            return false;
        }
        self.active_icon = key;
        true
    }

    fn set_active_tooltip_title(&mut self, key: Option<TooltipTitleKey>) -> bool {
        if self.active_title == key {
            return false;
        }
        self.active_title = key;
        true
    }

    fn execute_action(&mut self, action: ChartAction) {
        debug!(target: EVENTS_TARGET, action = ?action.action, icon = %action.icon.icon_id, "chart action executed");
        self.executed_actions.push(action);
    }
}
