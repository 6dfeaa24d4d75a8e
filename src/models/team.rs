//! Team codes offered by the check-in form.

/// Icon shown for team codes outside the known set.
pub const DEFAULT_TEAM_ICON: &str = "👥";

/// One of the fixed teams an attendee can check in with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Team {
    Water,
    Zero,
    Power,
}

impl Team {
    /// All known teams in form order.
    pub const ALL: [Team; 3] = [Team::Water, Team::Zero, Team::Power];

    /// Look up a team by its short code. Codes are case-sensitive.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "water" => Some(Team::Water),
            "zero" => Some(Team::Zero),
            "power" => Some(Team::Power),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Team::Water => "water",
            Team::Zero => "zero",
            Team::Power => "power",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Team::Water => "🌊",
            Team::Zero => "🌿",
            Team::Power => "⚡",
        }
    }

    /// Display name of the team's option in the check-in form.
    pub fn display_name(&self) -> &'static str {
        match self {
            Team::Water => "Team Water Wise",
            Team::Zero => "Team Net Zero",
            Team::Power => "Team Renewables",
        }
    }
}

/// Icon for any team code, falling back to [`DEFAULT_TEAM_ICON`].
pub fn team_icon(code: &str) -> &'static str {
    Team::from_code(code)
        .map(|team| team.icon())
        .unwrap_or(DEFAULT_TEAM_ICON)
}
