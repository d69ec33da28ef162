//! src/reglages.rs
//!
//! Réglages en lecture seule (TOML).
//!
//! Ordre de recherche (natif seulement) :
//! 1. variable d’environnement `$GRAPHEUR_CONFIG`
//! 2. `./grapheur.toml`
//! 3. valeurs intégrées (tout est optionnel)
//!
//! En wasm : toujours les valeurs intégrées.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::warn;

use crate::app::etat::Theme;
use crate::noyau::Plage;

/// Variable d’environnement pointant vers le fichier de réglages.
pub const VAR_CONFIG: &str = "GRAPHEUR_CONFIG";

/// Fichier lu dans le répertoire courant à défaut de variable.
pub const FICHIER_CONFIG: &str = "grapheur.toml";

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Reglages {
    pub evaluation: ReglagesEvaluation,
    pub vue: ReglagesVue,
}

/// Anti-rebond de la saisie.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReglagesEvaluation {
    pub delai_rebond_ms: u64,
}

/// Fenêtre initiale du graphe 2D + thème de départ.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReglagesVue {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub theme: Theme,
}

impl Default for ReglagesEvaluation {
    fn default() -> Self {
        Self {
            delai_rebond_ms: 400,
        }
    }
}

impl Default for ReglagesVue {
    fn default() -> Self {
        Self {
            x_min: -15.0,
            x_max: 15.0,
            y_min: -10.0,
            y_max: 10.0,
            theme: Theme::Clair,
        }
    }
}

fn plage_valide(min: f64, max: f64) -> bool {
    min.is_finite() && max.is_finite() && min < max
}

impl Reglages {
    pub fn depuis_toml(contenu: &str) -> Result<Self> {
        let reglages: Reglages = toml::from_str(contenu).context("lecture TOML des réglages")?;
        Ok(reglages)
    }

    pub fn delai_rebond(&self) -> Duration {
        Duration::from_millis(self.evaluation.delai_rebond_ms)
    }

    /// Plage x initiale ; une plage invalide retombe sur la valeur intégrée.
    pub fn plage_x(&self) -> Plage {
        let v = &self.vue;
        if plage_valide(v.x_min, v.x_max) {
            Plage::new(v.x_min, v.x_max)
        } else {
            warn!(x_min = v.x_min, x_max = v.x_max, "plage x invalide, valeur par défaut");
            let d = ReglagesVue::default();
            Plage::new(d.x_min, d.x_max)
        }
    }

    pub fn plage_y(&self) -> Plage {
        let v = &self.vue;
        if plage_valide(v.y_min, v.y_max) {
            Plage::new(v.y_min, v.y_max)
        } else {
            warn!(y_min = v.y_min, y_max = v.y_max, "plage y invalide, valeur par défaut");
            let d = ReglagesVue::default();
            Plage::new(d.y_min, d.y_max)
        }
    }
}

/// Charge les réglages depuis le disque ; valeurs intégrées si aucun fichier.
#[cfg(not(target_arch = "wasm32"))]
pub fn charger_reglages() -> Result<Reglages> {
    use std::path::PathBuf;

    let chemin = std::env::var(VAR_CONFIG)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(FICHIER_CONFIG));

    if !chemin.exists() {
        return Ok(Reglages::default());
    }

    let contenu = std::fs::read_to_string(&chemin)
        .with_context(|| format!("lecture de {}", chemin.display()))?;
    Reglages::depuis_toml(&contenu).with_context(|| format!("analyse de {}", chemin.display()))
}

#[cfg(target_arch = "wasm32")]
pub fn charger_reglages() -> Result<Reglages> {
    Ok(Reglages::default())
}
