use serde::{Deserialize, Serialize};

/// Data-driven tuning knobs for the Deception Duel.
///
/// The vote-intervention numbers exist for drama, not balance, so they
/// are config rather than rules: the chance a turn gets an intervention
/// vote and the minimum table size for one. Interventions additionally
/// never fire before the first turn has completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DuelConfig {
    /// Per-turn probability of a vote intervention.
    pub intervention_chance: f64,
    /// Minimum player count for interventions.
    pub intervention_min_players: usize,
}

impl Default for DuelConfig {
    fn default() -> Self {
        Self {
            intervention_chance: 0.3,
            intervention_min_players: 5,
        }
    }
}

impl DuelConfig {
    /// Load config from environment or TOML file, falling back to defaults.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("TURNCOAT_DUEL_CONFIG")
            && let Ok(contents) = std::fs::read_to_string(&path)
            && let Ok(config) = toml::from_str::<Self>(&contents)
        {
            return config;
        }
        if let Ok(contents) = std::fs::read_to_string("config/duel.toml")
            && let Ok(config) = toml::from_str::<Self>(&contents)
        {
            return config;
        }
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_all_knobs() {
        let c = DuelConfig::default();
        assert!((c.intervention_chance - 0.3).abs() < f64::EPSILON);
        assert_eq!(c.intervention_min_players, 5);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c: DuelConfig = toml::from_str("intervention_chance = 0.5").unwrap();
        assert!((c.intervention_chance - 0.5).abs() < f64::EPSILON);
        assert_eq!(c.intervention_min_players, 5);
    }
}
