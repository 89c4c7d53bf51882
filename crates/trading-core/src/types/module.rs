//! Module roles and hook kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared role of a strategy module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleRole {
    Entry,
    Exit,
    RiskManagement,
    MoneyManagement,
    Indicator,
    Statistic,
    Other,
}

impl ModuleRole {
    /// Indicator-rooted modules are dispatched before all others.
    pub fn is_indicator(&self) -> bool {
        matches!(self, ModuleRole::Indicator)
    }
}

impl fmt::Display for ModuleRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ModuleRole::Entry => "entry",
            ModuleRole::Exit => "exit",
            ModuleRole::RiskManagement => "risk_management",
            ModuleRole::MoneyManagement => "money_management",
            ModuleRole::Indicator => "indicator",
            ModuleRole::Statistic => "statistic",
            ModuleRole::Other => "other",
        };
        f.write_str(s)
    }
}

/// Event hooks a module may implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hook {
    OnBar,
    OnTick,
    OnOrder,
    OnOrderUpdate,
    OnFill,
    OnPosition,
    OnCalculate,
    /// `risk_management(order, state) -> Option<order>`, risk modules only
    RiskManagement,
    /// `position_size(order, state)`, money management modules only
    PositionSize,
}

impl Hook {
    /// Role a module must carry for this hook to be bound.
    pub fn required_role(&self) -> Option<ModuleRole> {
        match self {
            Hook::RiskManagement => Some(ModuleRole::RiskManagement),
            Hook::PositionSize => Some(ModuleRole::MoneyManagement),
            _ => None,
        }
    }

    /// Check whether a module of `role` may bind this hook.
    pub fn accepts(&self, role: ModuleRole) -> bool {
        self.required_role().map_or(true, |required| required == role)
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Hook::OnBar => "on_bar",
            Hook::OnTick => "on_tick",
            Hook::OnOrder => "on_order",
            Hook::OnOrderUpdate => "on_order_update",
            Hook::OnFill => "on_fill",
            Hook::OnPosition => "on_position",
            Hook::OnCalculate => "on_calculate",
            Hook::RiskManagement => "risk_management",
            Hook::PositionSize => "position_size",
        };
        f.write_str(s)
    }
}
