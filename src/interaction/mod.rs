use serde::{Deserialize, Serialize};

use crate::api::store::ChartStore;
use crate::core::{Coordinate, KLineData, PaneId};

/// Pointer-anchored state shared by the crosshair, last-price and tooltip views.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Crosshair {
    /// Pointer x in main-widget coordinates.
    pub x: Option<f64>,
    /// Pointer y in the anchored pane's coordinates.
    pub y: Option<f64>,
    pub pane_id: Option<PaneId>,
    pub data_index: Option<usize>,
    pub kline_data: Option<KLineData>,
}

impl Crosshair {
    #[must_use]
    pub fn is_anchored(&self) -> bool {
        self.pane_id.is_some()
    }
}

/// Identity of one tooltip icon; compared field by field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TooltipIconKey {
    pub pane_id: PaneId,
    pub indicator_name: String,
    pub icon_id: String,
}

impl TooltipIconKey {
    #[must_use]
    pub fn new(pane_id: PaneId, indicator_name: impl Into<String>, icon_id: impl Into<String>) -> Self {
        Self {
            pane_id,
            indicator_name: indicator_name.into(),
            icon_id: icon_id.into(),
        }
    }
}

/// Identity of one indicator tooltip title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TooltipTitleKey {
    pub pane_id: PaneId,
    pub indicator_name: String,
}

impl TooltipTitleKey {
    #[must_use]
    pub fn new(pane_id: PaneId, indicator_name: impl Into<String>) -> Self {
        Self {
            pane_id,
            indicator_name: indicator_name.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    OnTooltipIconClick,
}

/// Action delivered to subscribers through `ChartStore::execute_action`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartAction {
    pub action: ActionType,
    pub icon: TooltipIconKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerEventKind {
    Move,
    Click,
}

/// Pointer event in chart (root) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub x: f64,
    pub y: f64,
}

impl PointerEvent {
    #[must_use]
    pub const fn moved(x: f64, y: f64) -> Self {
        Self {
            kind: PointerEventKind::Move,
            x,
            y,
        }
    }

    #[must_use]
    pub const fn clicked(x: f64, y: f64) -> Self {
        Self {
            kind: PointerEventKind::Click,
            x,
            y,
        }
    }

    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.x, self.y)
    }
}

/// Store mutation bound to a figure event; the identity key travels as data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FigureEventAction {
    ActivateTooltipIcon(TooltipIconKey),
    ActivateTooltipTitle(TooltipTitleKey),
    Execute(ChartAction),
}

impl FigureEventAction {
    /// Applies the mutation; returns whether the event is consumed.
    pub fn apply(&self, store: &mut dyn ChartStore) -> bool {
        match self {
            Self::ActivateTooltipIcon(key) => {
                store.set_active_tooltip_icon(Some(key.clone()));
            }
            Self::ActivateTooltipTitle(key) => {
                store.set_active_tooltip_title(Some(key.clone()));
            }
            Self::Execute(action) => store.execute_action(action.clone()),
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{ActionType, ChartAction, FigureEventAction, TooltipIconKey, TooltipTitleKey};
    use crate::api::store::{ChartStore, MemoryStore};
    use crate::core::PaneId;

    #[test]
    fn keys_compare_structurally() {
        let a = TooltipIconKey::new(PaneId::Candle, "MA", "settings");
        let b = TooltipIconKey::new(PaneId::Candle, "MA".to_owned(), "settings".to_owned());
        assert_eq!(a, b);
        assert_ne!(a, TooltipIconKey::new(PaneId::Indicator(1), "MA", "settings"));
    }

    #[test]
    fn actions_mutate_the_store() {
        let mut store = MemoryStore::default();
        let icon = TooltipIconKey::new(PaneId::Candle, "MA", "close");
        assert!(FigureEventAction::ActivateTooltipIcon(icon.clone()).apply(&mut store));
        assert_eq!(store.active_tooltip_icon(), Some(&icon));

        let title = TooltipTitleKey::new(PaneId::Candle, "MA");
        assert!(FigureEventAction::ActivateTooltipTitle(title.clone()).apply(&mut store));
        assert_eq!(store.active_tooltip_title(), Some(&title));

        let action = ChartAction {
            action: ActionType::OnTooltipIconClick,
            icon,
        };
        assert!(FigureEventAction::Execute(action.clone()).apply(&mut store));
        assert_eq!(store.executed_actions(), &[action]);
    }
}
