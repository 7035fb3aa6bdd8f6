//! Episode and reporting-window statistics.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::training::EpisodeOutcome;

use super::game::StandCounters;
use super::state::{CombatAction, CombatState};

/// Counts past `u32::MAX` pin to the maximum.
fn saturate(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// What happened in one combat episode.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeStats {
    pub steps: u32,
    pub total_reward: f64,
    pub end_kills: u32,
    pub end_deaths: u32,
    pub stand_count: u32,
    pub attack_count: u32,
    pub failed_stands: u32,
    pub hp_regenerated_from_stand: u32,
    /// XP left over toward the next level at episode end.
    pub xp_gained: u32,
    pub levels_gained: u32,
    pub stand_out_of_combat_while_injured: u32,
    pub stand_out_of_combat_at_full_hp: u32,
    /// Ended by the step cap.
    pub truncated: bool,
}

impl EpisodeStats {
    /// Collect stats from a trained episode and the environment's counters.
    pub fn from_outcome(outcome: &EpisodeOutcome<CombatState>, counters: StandCounters) -> Self {
        let end = &outcome.terminal_state;
        let count = |a: CombatAction| {
            outcome
                .action_counts
                .get(a.index())
                .copied()
                .map_or(0, saturate)
        };

        Self {
            steps: saturate(outcome.steps),
            total_reward: outcome.total_reward,
            end_kills: end.kills,
            end_deaths: end.deaths,
            stand_count: count(CombatAction::Stand),
            attack_count: count(CombatAction::Attack),
            failed_stands: counters.failed_stands,
            hp_regenerated_from_stand: counters.hp_regenerated_from_stand,
            xp_gained: end.xp_collected,
            levels_gained: end.levels_increased,
            stand_out_of_combat_while_injured: counters.stand_out_of_combat_while_injured,
            stand_out_of_combat_at_full_hp: counters.stand_out_of_combat_at_full_hp,
            truncated: outcome.truncated,
        }
    }
}

/// Running totals over a reporting window.
#[derive(Clone, Debug, Default)]
pub struct StatsWindow {
    episodes: u64,
    steps: u64,
    reward: f64,
    stands: u64,
    attacks: u64,
    failed_stands: u64,
    regen_hp: u64,
    xp_left: u64,
    levels: u64,
    kills: u64,
    deaths: u64,
    stand_injured: u64,
    stand_full: u64,
    truncated: u64,
}

impl StatsWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Episodes since the last report.
    pub fn len(&self) -> u64 {
        self.episodes
    }

    pub fn is_empty(&self) -> bool {
        self.episodes == 0
    }

    /// Add one episode.
    pub fn push(&mut self, es: &EpisodeStats) {
        self.episodes += 1;
        self.steps += u64::from(es.steps);
        self.reward += es.total_reward;
        self.stands += u64::from(es.stand_count);
        self.attacks += u64::from(es.attack_count);
        self.failed_stands += u64::from(es.failed_stands);
        self.regen_hp += u64::from(es.hp_regenerated_from_stand);
        self.xp_left += u64::from(es.xp_gained);
        self.levels += u64::from(es.levels_gained);
        self.kills += u64::from(es.end_kills);
        self.deaths += u64::from(es.end_deaths);
        self.stand_injured += u64::from(es.stand_out_of_combat_while_injured);
        self.stand_full += u64::from(es.stand_out_of_combat_at_full_hp);
        self.truncated += u64::from(es.truncated);
    }

    /// Averages over the window, then start a new window.
    ///
    /// Returns `None` if no episode was pushed since the last report.
    pub fn report(&mut self, episode: u64) -> Option<WindowReport> {
        if self.is_empty() {
            return None;
        }
        let n = self.episodes as f64;
        let avg = |total: u64| total as f64 / n;

        let report = WindowReport {
            episode,
            episodes: self.episodes,
            avg_reward: self.reward / n,
            avg_steps: avg(self.steps),
            kill_death_ratio: self.kills as f64 / self.deaths.max(1) as f64,
            avg_kills: avg(self.kills),
            avg_deaths: avg(self.deaths),
            avg_attacks: avg(self.attacks),
            avg_stands: avg(self.stands),
            avg_failed_stands: avg(self.failed_stands),
            avg_regen_hp: avg(self.regen_hp),
            avg_stand_injured: avg(self.stand_injured),
            avg_stand_full_hp: avg(self.stand_full),
            avg_levels: avg(self.levels),
            avg_xp_left: avg(self.xp_left),
            truncated: self.truncated,
        };

        *self = Self::default();
        Some(report)
    }
}

/// Per-episode averages over one reporting window.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WindowReport {
    /// Episode number the window ended at.
    pub episode: u64,
    /// Episodes in the window.
    pub episodes: u64,
    pub avg_reward: f64,
    pub avg_steps: f64,
    /// Window kills over window deaths (deaths floored at 1).
    pub kill_death_ratio: f64,
    pub avg_kills: f64,
    pub avg_deaths: f64,
    pub avg_attacks: f64,
    pub avg_stands: f64,
    pub avg_failed_stands: f64,
    pub avg_regen_hp: f64,
    pub avg_stand_injured: f64,
    pub avg_stand_full_hp: f64,
    pub avg_levels: f64,
    pub avg_xp_left: f64,
    /// Episodes ended by the step cap.
    pub truncated: u64,
}

impl fmt::Display for WindowReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[Ep {}] avgR={:.3} avgSteps={:.1} | K/D={:.2} (K={:.2} D={:.2}) | act: atk={:.1} stand={:.1} \
             | standFail={:.2} regenHp={:.2} | standInjured={:.2} standFull={:.2} | lvl+={:.2} xpLeft={:.1}",
            self.episode,
            self.avg_reward,
            self.avg_steps,
            self.kill_death_ratio,
            self.avg_kills,
            self.avg_deaths,
            self.avg_attacks,
            self.avg_stands,
            self.avg_failed_stands,
            self.avg_regen_hp,
            self.avg_stand_injured,
            self.avg_stand_full_hp,
            self.avg_levels,
            self.avg_xp_left,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode(kills: u32, deaths: u32, reward: f64) -> EpisodeStats {
        EpisodeStats {
            steps: 10,
            total_reward: reward,
            end_kills: kills,
            end_deaths: deaths,
            attack_count: 6,
            stand_count: 4,
            ..EpisodeStats::default()
        }
    }

    #[test]
    fn test_empty_window_has_no_report() {
        let mut window = StatsWindow::new();
        assert!(window.report(10).is_none());
    }

    #[test]
    fn test_window_averages() {
        let mut window = StatsWindow::new();
        window.push(&episode(30, 2, 28.0));
        window.push(&episode(10, 30, -20.0));

        let report = window.report(2).unwrap();
        assert_eq!(report.episode, 2);
        assert_eq!(report.episodes, 2);
        assert_eq!(report.avg_reward, 4.0);
        assert_eq!(report.avg_steps, 10.0);
        assert_eq!(report.avg_kills, 20.0);
        assert_eq!(report.avg_deaths, 16.0);
        assert_eq!(report.kill_death_ratio, 40.0 / 32.0);
        assert_eq!(report.avg_attacks, 6.0);
        assert_eq!(report.avg_stands, 4.0);
    }

    #[test]
    fn test_report_resets_window() {
        let mut window = StatsWindow::new();
        window.push(&episode(1, 0, 1.0));
        assert!(window.report(1).is_some());
        assert!(window.is_empty());
        assert!(window.report(2).is_none());
    }

    #[test]
    fn test_kd_floors_deaths() {
        let mut window = StatsWindow::new();
        window.push(&episode(30, 0, 30.0));
        assert_eq!(window.report(1).unwrap().kill_death_ratio, 30.0);
    }

    #[test]
    fn test_from_outcome() {
        let outcome = EpisodeOutcome {
            steps: 5,
            total_reward: 0.99,
            terminal_state: CombatState {
                kills: 1,
                xp_collected: 12,
                ..CombatState::default()
            },
            truncated: false,
            action_counts: vec![2, 3],
            clipped_per_epoch: vec![0; 4],
        };
        let counters = StandCounters {
            failed_stands: 0,
            hp_regenerated_from_stand: 1,
            stand_out_of_combat_while_injured: 1,
            stand_out_of_combat_at_full_hp: 0,
        };

        let es = EpisodeStats::from_outcome(&outcome, counters);
        assert_eq!(es.steps, 5);
        assert_eq!(es.stand_count, 2);
        assert_eq!(es.attack_count, 3);
        assert_eq!(es.end_kills, 1);
        assert_eq!(es.xp_gained, 12);
        assert_eq!(es.hp_regenerated_from_stand, 1);
    }

    #[test]
    fn test_from_outcome_saturates_counts() {
        let outcome = EpisodeOutcome {
            steps: usize::MAX,
            total_reward: 0.0,
            terminal_state: CombatState::default(),
            truncated: true,
            action_counts: vec![usize::MAX, 7],
            clipped_per_epoch: vec![0; 4],
        };

        let es = EpisodeStats::from_outcome(&outcome, StandCounters::default());
        assert_eq!(es.steps, u32::MAX);
        assert_eq!(es.stand_count, u32::MAX);
        assert_eq!(es.attack_count, 7);
    }

    #[test]
    fn test_report_display() {
        let mut window = StatsWindow::new();
        window.push(&episode(3, 1, 2.0));
        let line = window.report(10_000).unwrap().to_string();
        assert!(line.starts_with("[Ep 10000] avgR=2.000 avgSteps=10.0 | K/D=3.00"));
    }
}
