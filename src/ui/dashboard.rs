//! Render-side view state and its text rendering.

use std::fmt::Write;

use crate::models::{team_icon, AttendeeRecord, Team, TeamCounts};

/// Cells in the progress bar.
pub const BAR_WIDTH: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterStyle {
    Normal,
    Bounce,
    Milestone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GreetingPhase {
    Entering,
    Visible,
    Leaving,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Greeting {
    /// Identifies which check-in produced this greeting
    pub generation: u64,
    pub text: String,
    pub phase: GreetingPhase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Star {
    pub id: u64,
    /// Column within the bar row
    pub column: usize,
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    pub count: u32,
    pub capacity: u32,
    pub percentage: u32,
    pub team_counts: TeamCounts,
    pub attendees: Vec<AttendeeRecord>,
    pub counter_style: CounterStyle,
    pub progress_pulse: bool,
    pub bumped_team: Option<Team>,
    pub greeting: Option<Greeting>,
    pub stars: Vec<Star>,
    pub alert: Option<String>,
}

impl Dashboard {
    pub fn new(capacity: u32) -> Self {
        Self {
            count: 0,
            capacity,
            percentage: 0,
            team_counts: TeamCounts::default(),
            attendees: Vec::new(),
            counter_style: CounterStyle::Normal,
            progress_pulse: false,
            bumped_team: None,
            greeting: None,
            stars: Vec::new(),
            alert: None,
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        let counter = match self.counter_style {
            CounterStyle::Normal => self.count.to_string(),
            CounterStyle::Bounce => format!("» {} «", self.count),
            CounterStyle::Milestone => format!("★ {} ★", self.count),
        };
        let _ = writeln!(out, "Attendance: {} / {}", counter, self.capacity);

        if !self.stars.is_empty() {
            let mut row = vec![' '; BAR_WIDTH + 2];
            for star in &self.stars {
                if let Some(cell) = row.get_mut(star.column) {
                    *cell = '⭐';
                }
            }
            let _ = writeln!(out, "{}", row.into_iter().collect::<String>().trim_end());
        }

        let _ = writeln!(
            out,
            "{}{}",
            progress_bar(self.percentage),
            if self.progress_pulse { " ~" } else { "" }
        );

        let teams = Team::ALL
            .iter()
            .map(|team| {
                let bump = if self.bumped_team == Some(*team) { "+" } else { "" };
                format!(
                    "{} {}: {}{}",
                    team.icon(),
                    strip_team_prefix(team.display_name()),
                    self.team_counts.get(*team),
                    bump
                )
            })
            .collect::<Vec<_>>()
            .join("   ");
        let _ = writeln!(out, "{}", teams);

        if let Some(greeting) = &self.greeting {
            if greeting.phase == GreetingPhase::Visible {
                let _ = writeln!(out, "{}", greeting.text);
            }
        }

        if let Some(alert) = &self.alert {
            let _ = writeln!(out, "! {}", alert);
        }

        if self.attendees.is_empty() {
            let _ = writeln!(out, "No attendees yet");
        } else {
            let _ = writeln!(out, "Checked in ({}):", self.attendees.len());
            for attendee in &self.attendees {
                let _ = writeln!(
                    out,
                    "  {}  {} {}",
                    attendee.name,
                    team_icon(&attendee.team),
                    strip_team_prefix(&attendee.team_name)
                );
            }
        }

        out
    }
}

/// `[████░░░…] 24%`; the fill stops at 100% but the label does not.
pub fn progress_bar(percentage: u32) -> String {
    let filled = (percentage.min(100) as usize * BAR_WIDTH + 50) / 100;
    format!(
        "[{}{}] {}%",
        "█".repeat(filled),
        "░".repeat(BAR_WIDTH - filled),
        percentage
    )
}

/// Drop the first `"Team "` from a team label.
fn strip_team_prefix(label: &str) -> String {
    label.replacen("Team ", "", 1)
}
