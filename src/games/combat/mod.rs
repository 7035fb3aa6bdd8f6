//! Turn-based melee combat against a respawning npc.
//!
//! Each step the player either attacks (trading hits with the npc) or stands
//! (taking a hit in combat, regenerating out of it). Kills pay +1, deaths
//! cost -1 and standing in combat costs 0.01. The episode ends at a kill or
//! death limit.
//!
//! ## Usage
//!
//! ```no_run
//! use tiny_ppo::games::combat::{CombatTrainer, TrainerConfig};
//!
//! let config = TrainerConfig::default().with_episodes(20_000);
//! let summary = CombatTrainer::new(config)?.run()?;
//! for report in &summary.reports {
//!     println!("{report}");
//! }
//! # Ok::<(), tiny_ppo::Error>(())
//! ```

mod encoder;
mod game;
mod state;
mod stats;
mod trainer;

pub use encoder::{CombatEncoder, EncoderBounds};
pub use game::{CombatEnv, StandCounters, DEATH_REWARD, KILL_REWARD, STAND_IN_COMBAT_REWARD};
pub use state::{CombatAction, CombatConfig, CombatState, Skill};
pub use stats::{EpisodeStats, StatsWindow, WindowReport};
pub use trainer::{CombatTrainer, TrainerConfig, TrainingSummary};
