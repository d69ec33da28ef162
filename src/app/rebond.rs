//! src/app/rebond.rs
//!
//! Anti-rebond de la saisie : seule la dernière évaluation planifiée s’exécute.
//!
//! Le temps est fourni par l’appelant (secondes, `egui::InputState::time`) :
//! pas d’horloge système ici, même code en natif et en wasm.

use std::time::Duration;

#[derive(Clone, Debug, PartialEq)]
pub struct Rebond {
    delai: f64,
    echeance: Option<f64>,
}

impl Rebond {
    pub fn new(delai: Duration) -> Self {
        Self {
            delai: delai.as_secs_f64(),
            echeance: None,
        }
    }

    /// (Re)planifie : toute échéance précédente est abandonnée.
    pub fn planifier(&mut self, maintenant: f64) {
        self.echeance = Some(maintenant + self.delai);
    }

    pub fn annuler(&mut self) {
        self.echeance = None;
    }

    pub fn en_attente(&self) -> bool {
        self.echeance.is_some()
    }

    /// Vrai une seule fois, quand l’échéance est atteinte.
    pub fn echu(&mut self, maintenant: f64) -> bool {
        match self.echeance {
            Some(t) if maintenant >= t => {
                self.echeance = None;
                true
            }
            _ => false,
        }
    }

    /// Temps restant avant l’échéance (pour demander un rafraîchissement).
    pub fn restant(&self, maintenant: f64) -> Option<f64> {
        self.echeance.map(|t| (t - maintenant).max(0.0))
    }
}
