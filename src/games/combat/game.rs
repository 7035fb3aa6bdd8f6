//! Combat rules.

use tracing::trace;

use crate::core::{Result, TrainRng};
use crate::env::{Environment, StepResult};

use super::state::{CombatAction, CombatConfig, CombatState, Skill};

/// Reward for killing the npc.
pub const KILL_REWARD: f64 = 1.0;

/// Reward for dying.
pub const DEATH_REWARD: f64 = -1.0;

/// Reward for standing still while the npc is attacking.
pub const STAND_IN_COMBAT_REWARD: f64 = -0.01;

/// Per-episode stand diagnostics. Cleared by [`CombatEnv::reset`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StandCounters {
    /// Deaths caused by standing in combat.
    pub failed_stands: u32,
    pub hp_regenerated_from_stand: u32,
    pub stand_out_of_combat_while_injured: u32,
    pub stand_out_of_combat_at_full_hp: u32,
}

/// Single-opponent melee simulation.
///
/// Owns its dice RNG; the network never draws from it.
#[derive(Clone, Debug)]
pub struct CombatEnv {
    config: CombatConfig,
    rng: TrainRng,
    counters: StandCounters,
}

impl CombatEnv {
    /// Create an environment.
    pub fn new(config: CombatConfig, rng: TrainRng) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rng,
            counters: StandCounters::default(),
        })
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    /// Counters accumulated since the last reset.
    pub fn counters(&self) -> StandCounters {
        self.counters
    }

    fn roll_player_hit(&mut self, s: &CombatState) -> u32 {
        roll_hit(&mut self.rng, s.attack, s.npc_defence, s.strength)
    }

    fn roll_npc_hit(&mut self, s: &CombatState) -> u32 {
        roll_hit(&mut self.rng, s.npc_attack, s.defence, s.npc_strength)
    }

    fn attack(&mut self, s: &mut CombatState) -> f64 {
        let mut reward = 0.0;
        s.in_combat = true;

        let dealt = self.roll_player_hit(s);
        if dealt >= s.npc_current_hp {
            reward += KILL_REWARD;
            s.kills += 1;
            s.in_combat = false;
            let remaining = s.npc_current_hp;
            gain_experience(s, remaining);
            s.npc_current_hp = s.npc_max_hp;
            s.stands = 0;
        } else {
            s.npc_current_hp -= dealt;
            gain_experience(s, dealt);
        }

        // A dead npc does not hit back.
        if s.in_combat {
            let taken = self.roll_npc_hit(s);
            if taken >= s.current_hp {
                reward += DEATH_REWARD;
                respawn(s);
            } else {
                s.current_hp -= taken;
            }
        }

        reward
    }

    fn stand(&mut self, s: &mut CombatState) -> f64 {
        if s.in_combat {
            let mut reward = STAND_IN_COMBAT_REWARD;
            let taken = self.roll_npc_hit(s);
            if taken >= s.current_hp {
                reward += DEATH_REWARD;
                respawn(s);
                self.counters.failed_stands += 1;
            } else {
                s.current_hp -= taken;
            }
            return reward;
        }

        s.stands += 1;
        if s.is_injured() {
            s.current_hp += 1;
            self.counters.stand_out_of_combat_while_injured += 1;
            self.counters.hp_regenerated_from_stand += 1;
        } else {
            self.counters.stand_out_of_combat_at_full_hp += 1;
        }
        0.0
    }
}

impl Environment for CombatEnv {
    type State = CombatState;

    fn action_count(&self) -> usize {
        CombatAction::COUNT
    }

    fn reset(&mut self) -> CombatState {
        self.counters = StandCounters::default();
        self.config.initial_state.clone()
    }

    fn step(&mut self, state: &CombatState, action: usize) -> StepResult<CombatState> {
        let mut next = state.clone();
        let reward = match CombatAction::from_index(action) {
            Some(CombatAction::Attack) => self.attack(&mut next),
            Some(CombatAction::Stand) => self.stand(&mut next),
            None => {
                trace!(action, "ignoring unknown action");
                0.0
            }
        };
        let done = self.config.is_terminal(&next);
        StepResult::new(next, reward, done)
    }
}

/// Hit roll: lands with probability `atk / (atk + def + 1)`, then deals
/// `1 + U[0, max(1, str / 2))`.
fn roll_hit(rng: &mut TrainRng, attack: u32, defence: u32, strength: u32) -> u32 {
    let chance = f64::from(attack) / (f64::from(attack) + f64::from(defence) + 1.0);
    if rng.next_f64() < chance {
        let max_hit = (strength / 2).max(1);
        1 + rng.gen_range_usize(0..max_hit as usize) as u32
    } else {
        0
    }
}

/// Player death: back to full hp out of combat, npc healed.
fn respawn(s: &mut CombatState) {
    s.in_combat = false;
    s.current_hp = s.max_hp;
    s.deaths += 1;
    s.stands = 0;
    s.npc_current_hp = s.npc_max_hp;
}

/// Award `4 * hit` XP and apply every level-up it pays for.
pub(crate) fn gain_experience(s: &mut CombatState, hit: u32) {
    if hit == 0 {
        return;
    }
    s.xp_collected += 4 * hit;

    while s.xp_collected >= s.xp_to_next_level() {
        s.xp_collected -= s.xp_to_next_level();
        s.levels_increased += 1;
        match s.trained_skill() {
            Skill::Attack => s.attack += 1,
            Skill::Strength => s.strength += 1,
            Skill::Defence => s.defence += 1,
        }
    }
}
