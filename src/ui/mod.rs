//! Terminal presentation layer.
//!
//! Turns store updates into dashboard changes and the short-lived effects that
//! follow each check-in (counter bounce, milestone stars, progress pulse, team
//! counter bounce, welcome greeting).

mod dashboard;
mod effects;
pub mod form;

pub use dashboard::*;
pub use effects::*;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};

use crate::models::{random_fraction, AttendanceState, AttendeeRecord, Team};
use crate::store::AttendanceView;

const COUNTER_BOUNCE: Duration = Duration::from_millis(300);
const MILESTONE_HOLD: Duration = Duration::from_millis(500);
const PROGRESS_PULSE: Duration = Duration::from_millis(600);
const TEAM_BOUNCE: Duration = Duration::from_millis(200);
const GREETING_FADE_IN: Duration = Duration::from_millis(50);
const GREETING_HOLD: Duration = Duration::from_millis(3000);
const GREETING_FADE_OUT: Duration = Duration::from_millis(400);
const STAR_COUNT: u64 = 6;
const STAR_LIFETIME_MS: u64 = 1000;
const STAR_STAGGER_MS: u64 = 100;

pub const CAPACITY_ALERT: &str = "Maximum attendance reached!";

pub struct Presenter {
    dashboard: Arc<Mutex<Dashboard>>,
    effects: EffectScheduler,
    milestone_every: u32,
    greeting_generation: u64,
    next_star_id: u64,
}

impl Presenter {
    pub fn new(capacity: u32, milestone_every: u32, redraw: mpsc::UnboundedSender<()>) -> Self {
        let dashboard = Arc::new(Mutex::new(Dashboard::new(capacity)));
        let effects = EffectScheduler::new(&dashboard, redraw);
        Self {
            dashboard,
            effects,
            milestone_every: milestone_every.max(1),
            greeting_generation: 0,
            next_star_id: 0,
        }
    }

    /// Show `state` as-is, without effects. Used after restore and reset.
    pub async fn show_state(&self, state: &AttendanceState, view: AttendanceView) {
        let mut dashboard = self.dashboard.lock().await;
        *dashboard = Dashboard::new(view.capacity);
        dashboard.count = view.count;
        dashboard.percentage = view.percentage;
        dashboard.team_counts = view.team_counts;
        dashboard.attendees = state.attendees.clone();
    }

    /// Apply one check-in and schedule its effects.
    pub async fn on_check_in(&mut self, record: &AttendeeRecord, view: AttendanceView) {
        let milestone = view.count % self.milestone_every == 0;
        let team = Team::from_code(&record.team);
        self.greeting_generation += 1;
        let generation = self.greeting_generation;

        let mut star_ids = Vec::new();
        {
            let mut dashboard = self.dashboard.lock().await;
            dashboard.count = view.count;
            dashboard.capacity = view.capacity;
            dashboard.percentage = view.percentage;
            dashboard.team_counts = view.team_counts;
            dashboard.attendees.push(record.clone());
            dashboard.alert = view.capacity_exceeded.then(|| CAPACITY_ALERT.to_string());
            dashboard.progress_pulse = true;
            dashboard.counter_style = if milestone {
                CounterStyle::Milestone
            } else {
                CounterStyle::Bounce
            };
            if team.is_some() {
                dashboard.bumped_team = team;
            }
            dashboard.greeting = Some(Greeting {
                generation,
                text: format!("Welcome {} from {}!", record.name, record.team_name),
                phase: GreetingPhase::Entering,
            });

            if milestone {
                for _ in 0..STAR_COUNT {
                    let star = Star {
                        id: self.next_star_id,
                        column: (random_fraction() * (BAR_WIDTH + 2) as f64) as usize,
                    };
                    self.next_star_id += 1;
                    star_ids.push(star.id);
                    dashboard.stars.push(star);
                }
            }
        }

        self.effects.schedule(COUNTER_BOUNCE, |d| {
            d.counter_style = CounterStyle::Normal;
        });

        if milestone {
            tracing::info!("Milestone reached: {} check-ins", view.count);
            self.effects.schedule(MILESTONE_HOLD, |d| {
                d.counter_style = CounterStyle::Normal;
            });
            for (i, id) in (0u64..).zip(star_ids) {
                let delay = Duration::from_millis(STAR_LIFETIME_MS + i * STAR_STAGGER_MS);
                self.effects.schedule(delay, move |d| {
                    d.stars.retain(|star| star.id != id);
                });
            }
        }

        self.effects.schedule(PROGRESS_PULSE, |d| {
            d.progress_pulse = false;
        });

        if let Some(team) = team {
            self.effects.schedule(TEAM_BOUNCE, move |d| {
                if d.bumped_team == Some(team) {
                    d.bumped_team = None;
                }
            });
        }

        self.schedule_greeting(generation);
    }

    fn schedule_greeting(&mut self, generation: u64) {
        let set_phase = move |phase: GreetingPhase| {
            move |d: &mut Dashboard| {
                if let Some(greeting) = d.greeting.as_mut() {
                    if greeting.generation == generation {
                        greeting.phase = phase;
                    }
                }
            }
        };

        self.effects
            .schedule(GREETING_FADE_IN, set_phase(GreetingPhase::Visible));
        self.effects
            .schedule(GREETING_HOLD, set_phase(GreetingPhase::Leaving));
        self.effects
            .schedule(GREETING_HOLD + GREETING_FADE_OUT, move |d| {
                if d.greeting.as_ref().map(|g| g.generation) == Some(generation) {
                    d.greeting = None;
                }
            });
    }

    pub async fn render(&self) -> String {
        self.dashboard.lock().await.render()
    }

    /// Cancel pending effects; the dashboard keeps whatever state it has.
    pub fn shutdown(&mut self) {
        self.effects.shutdown();
    }

    #[cfg(test)]
    pub(crate) fn dashboard(&self) -> Arc<Mutex<Dashboard>> {
        Arc::clone(&self.dashboard)
    }
}
