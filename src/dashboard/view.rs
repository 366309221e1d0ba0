//! Panel navigation.

use std::fmt;

use serde::Serialize;

/// Dashboard panels. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Panel {
    #[default]
    Overview,
    Generation,
    Storage,
    Demand,
    Alerts,
}

impl Panel {
    /// All panels in navigation order.
    pub const ALL: [Panel; 5] = [
        Self::Overview,
        Self::Generation,
        Self::Storage,
        Self::Demand,
        Self::Alerts,
    ];

    /// Parses a panel name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.title().eq_ignore_ascii_case(name))
    }

    /// Display title of the panel.
    pub fn title(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Generation => "Generation",
            Self::Storage => "Storage",
            Self::Demand => "Demand",
            Self::Alerts => "Alerts",
        }
    }

    fn position(self) -> usize {
        Self::ALL.iter().position(|p| *p == self).unwrap_or(0)
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Navigation entry with its active flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub panel: Panel,
    pub active: bool,
}

/// Tracks which panel is shown.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    active: Panel,
}

impl ViewState {
    pub fn active(&self) -> Panel {
        self.active
    }

    pub fn is_active(&self, panel: Panel) -> bool {
        self.active == panel
    }

    /// Activates `panel` and returns the previously active one.
    pub fn switch(&mut self, panel: Panel) -> Panel {
        std::mem::replace(&mut self.active, panel)
    }

    /// Activates the next panel, wrapping around.
    pub fn cycle(&mut self) -> Panel {
        let next = Panel::ALL[(self.active.position() + 1) % Panel::ALL.len()];
        self.switch(next)
    }

    /// Navigation items in order, with exactly one marked active.
    pub fn nav(&self) -> [NavItem; 5] {
        Panel::ALL.map(|panel| NavItem {
            panel,
            active: panel == self.active,
        })
    }
}
