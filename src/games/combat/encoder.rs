//! Feature encoding for [`CombatState`].

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};
use crate::nn::{FeatureWriter, StateEncoder};

use super::state::CombatState;

/// Normalization ranges and soft-saturation pivots.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderBounds {
    /// Largest player max hp.
    pub hp_max_max: f64,
    /// Largest npc max hp.
    pub npc_hp_max_max: f64,
    /// Player skill level cap.
    pub level_max: f64,
    /// Npc stat cap.
    pub npc_stat_max: f64,
    pub xp_pivot: f64,
    pub levels_pivot: f64,
    pub fight_style_max: f64,
    pub kills_pivot: f64,
    pub deaths_pivot: f64,
    pub stands_max: f64,
}

impl Default for EncoderBounds {
    fn default() -> Self {
        Self {
            hp_max_max: 99.0,
            npc_hp_max_max: 999.0,
            level_max: 99.0,
            npc_stat_max: 999.0,
            xp_pivot: 10_000.0,
            levels_pivot: 10.0,
            fight_style_max: 2.0,
            kills_pivot: 30.0,
            deaths_pivot: 30.0,
            stands_max: 3.0,
        }
    }
}

impl EncoderBounds {
    pub fn validate(&self) -> Result<()> {
        let all = [
            self.hp_max_max,
            self.npc_hp_max_max,
            self.level_max,
            self.npc_stat_max,
            self.xp_pivot,
            self.levels_pivot,
            self.fight_style_max,
            self.kills_pivot,
            self.deaths_pivot,
            self.stands_max,
        ];
        if all.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return Err(Error::invalid("encoder bounds must be finite and positive"));
        }
        Ok(())
    }
}

/// Stateless 17-feature encoder.
///
/// Layout: player hp and levels, npc hp and stats, combat flag, progression
/// counters, fight style, kills, deaths, stands.
#[derive(Clone, Debug, Default)]
pub struct CombatEncoder {
    bounds: EncoderBounds,
}

impl CombatEncoder {
    /// Width of every encoding.
    pub const FEATURES: usize = 17;

    pub fn new(bounds: EncoderBounds) -> Self {
        Self { bounds }
    }

    pub fn bounds(&self) -> &EncoderBounds {
        &self.bounds
    }
}

impl StateEncoder for CombatEncoder {
    type State = CombatState;

    fn feature_count(&self) -> usize {
        Self::FEATURES
    }

    fn encode(&self, s: &CombatState) -> Result<Vec<f64>> {
        let b = &self.bounds;
        let v = |x: u32| f64::from(x);
        let mut w = FeatureWriter::new(Self::FEATURES);

        // Player
        w.min_max(v(s.max_hp), 1.0, b.hp_max_max)
            .min_max(v(s.current_hp), 0.0, v(s.max_hp.max(1)))
            .min_max(v(s.strength), 1.0, b.level_max)
            .min_max(v(s.attack), 1.0, b.level_max)
            .min_max(v(s.defence), 1.0, b.level_max);

        // Npc
        w.min_max(v(s.npc_max_hp), 1.0, b.npc_hp_max_max)
            .min_max(v(s.npc_current_hp), 0.0, v(s.npc_max_hp.max(1)))
            .min_max(v(s.npc_attack), 1.0, b.npc_stat_max)
            .min_max(v(s.npc_defence), 1.0, b.npc_stat_max)
            .min_max(v(s.npc_strength), 1.0, b.npc_stat_max);

        w.flag(s.in_combat)
            .soft(v(s.xp_collected), b.xp_pivot)
            .soft(v(s.levels_increased), b.levels_pivot)
            .min_max(v(s.fight_style), 0.0, b.fight_style_max)
            .soft(v(s.kills), b.kills_pivot)
            .soft(v(s.deaths), b.deaths_pivot)
            .min_max(v(s.stands), 0.0, b.stands_max);

        w.finish()
    }
}
