use serde::{Deserialize, Serialize};

/// Severity of a redraw request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpdateLevel {
    /// Re-record overlay layers (crosshair, tooltips).
    Overlay,
    /// Re-record main layers (bars, axes, last price).
    Main,
    /// Re-record both layers without relayout.
    Drawer,
    /// Relayout, then re-record both layers.
    All,
}

impl UpdateLevel {
    #[must_use]
    pub const fn requires_layout(self) -> bool {
        matches!(self, Self::All)
    }

    #[must_use]
    pub const fn includes_main(self) -> bool {
        !matches!(self, Self::Overlay)
    }

    #[must_use]
    pub const fn includes_overlay(self) -> bool {
        !matches!(self, Self::Main)
    }
}

#[cfg(test)]
mod tests {
    use super::UpdateLevel;

    #[test]
    fn levels_select_layers() {
        assert!(!UpdateLevel::Overlay.includes_main());
        assert!(UpdateLevel::Overlay.includes_overlay());
        assert!(!UpdateLevel::Main.includes_overlay());
        assert!(UpdateLevel::Drawer.includes_main() && UpdateLevel::Drawer.includes_overlay());
        assert!(UpdateLevel::All.requires_layout());
        assert!(!UpdateLevel::Drawer.requires_layout());
    }
}
