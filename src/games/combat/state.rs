//! Combat state and configuration.

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};

/// Discrete actions available to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CombatAction {
    /// Do nothing. Regenerates one hp out of combat, takes a hit in combat.
    Stand,
    /// Trade one hit with the npc.
    Attack,
}

impl CombatAction {
    /// Number of actions.
    pub const COUNT: usize = 2;

    /// Network output index of this action.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            CombatAction::Stand => 0,
            CombatAction::Attack => 1,
        }
    }

    /// Action for a network output index.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(CombatAction::Stand),
            1 => Some(CombatAction::Attack),
            _ => None,
        }
    }
}

/// Skill trained by level-ups.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Skill {
    Attack,
    Strength,
    Defence,
}

/// Full simulation state: player, npc, and progression counters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatState {
    // Player
    pub max_hp: u32,
    pub current_hp: u32,
    pub strength: u32,
    pub attack: u32,
    pub defence: u32,

    // Npc
    pub npc_max_hp: u32,
    pub npc_current_hp: u32,
    pub npc_attack: u32,
    pub npc_defence: u32,
    pub npc_strength: u32,

    pub in_combat: bool,

    /// XP toward the next level.
    pub xp_collected: u32,
    pub levels_increased: u32,
    /// 0 stab, 1 slash, 2 defensive.
    pub fight_style: u32,

    pub kills: u32,
    pub deaths: u32,
    /// Consecutive out-of-combat stands since the last kill or death.
    pub stands: u32,
}

impl Default for CombatState {
    fn default() -> Self {
        Self {
            max_hp: 10,
            current_hp: 10,
            strength: 10,
            attack: 10,
            defence: 10,
            npc_max_hp: 30,
            npc_current_hp: 30,
            npc_attack: 5,
            npc_defence: 4,
            npc_strength: 5,
            in_combat: false,
            xp_collected: 0,
            levels_increased: 0,
            fight_style: 0,
            kills: 0,
            deaths: 0,
            stands: 0,
        }
    }
}

impl CombatState {
    /// Skill that receives level-ups under the current fight style.
    ///
    /// Unknown styles train attack.
    #[must_use]
    pub fn trained_skill(&self) -> Skill {
        match self.fight_style {
            1 => Skill::Strength,
            2 => Skill::Defence,
            _ => Skill::Attack,
        }
    }

    /// XP needed for the next level.
    #[must_use]
    pub fn xp_to_next_level(&self) -> u32 {
        50 * (self.levels_increased + 1)
    }

    /// True when the player is below max hp.
    #[must_use]
    pub fn is_injured(&self) -> bool {
        self.current_hp < self.max_hp
    }
}

/// Combat environment configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// State every episode starts from.
    pub initial_state: CombatState,

    /// Episode ends once this many kills are reached.
    pub kill_limit: u32,

    /// Episode ends once this many deaths are reached.
    pub death_limit: u32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            initial_state: CombatState::default(),
            kill_limit: 30,
            death_limit: 30,
        }
    }
}

impl CombatConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the starting state.
    #[must_use]
    pub fn with_initial_state(mut self, state: CombatState) -> Self {
        self.initial_state = state;
        self
    }

    /// Set both episode limits.
    #[must_use]
    pub fn with_limits(mut self, kills: u32, deaths: u32) -> Self {
        self.kill_limit = kills;
        self.death_limit = deaths;
        self
    }

    /// Whether a state ends the episode.
    #[must_use]
    pub fn is_terminal(&self, state: &CombatState) -> bool {
        state.kills >= self.kill_limit || state.deaths >= self.death_limit
    }

    pub fn validate(&self) -> Result<()> {
        let s = &self.initial_state;
        if s.max_hp == 0 || s.npc_max_hp == 0 {
            return Err(Error::invalid("player and npc max hp must be at least 1"));
        }
        if s.current_hp == 0 || s.current_hp > s.max_hp {
            return Err(Error::invalid(format!(
                "initial hp {} outside 1..={}",
                s.current_hp, s.max_hp
            )));
        }
        if s.npc_current_hp == 0 || s.npc_current_hp > s.npc_max_hp {
            return Err(Error::invalid(format!(
                "initial npc hp {} outside 1..={}",
                s.npc_current_hp, s.npc_max_hp
            )));
        }
        if self.kill_limit == 0 || self.death_limit == 0 {
            return Err(Error::invalid("kill and death limits must be at least 1"));
        }
        if self.is_terminal(s) {
            return Err(Error::invalid("initial state is already terminal"));
        }
        Ok(())
    }
}
