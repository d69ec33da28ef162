//! src/app/simple.rs
//!
//! Calculatrice simple (mode « Simple ») : une ligne d’expression, un historique.
//!
//! Règles de saisie :
//! - après un résultat, un chiffre repart de zéro, un opérateur prolonge le résultat
//! - un second '.' dans le même opérande est ignoré

use tracing::debug;

use crate::noyau::evaluer;
use crate::noyau::format::FORMAT_SIMPLE;

const OPERATEURS: [char; 5] = ['+', '-', '*', '/', '%'];

/// Texte affiché quand l’évaluation échoue.
pub const TEXTE_ERREUR: &str = "Erreur";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CalcSimple {
    /// Expression en cours (ce qui sera évalué).
    pub expression: String,
    /// Ce que montre l’écran (expression ou "Erreur").
    pub affichage: String,
    /// Ligne au-dessus de l’écran : "<expr> =".
    pub historique: String,
    calcule: bool,
}

fn est_operateur(c: char) -> bool {
    OPERATEURS.contains(&c)
}

impl CalcSimple {
    /// Dernier opérande (texte après le dernier opérateur).
    fn operande_courant(&self) -> &str {
        self.expression
            .rsplit(est_operateur)
            .next()
            .unwrap_or_default()
    }

    pub fn ajouter(&mut self, c: char) {
        if c == '.' && self.operande_courant().contains('.') {
            return;
        }

        if self.calcule {
            if !est_operateur(c) {
                self.expression.clear();
            }
            self.calcule = false;
        }

        self.expression.push(c);
        self.affichage = self.expression.clone();
    }

    pub fn effacer(&mut self) {
        self.expression.clear();
        self.affichage.clear();
        self.historique.clear();
        self.calcule = false;
    }

    pub fn retour_arriere(&mut self) {
        self.expression.pop();
        self.affichage = self.expression.clone();
        self.calcule = false;
    }

    pub fn calculer(&mut self) {
        if self.expression.trim().is_empty() {
            return;
        }

        match evaluer(&self.expression, &[]) {
            Ok(v) => {
                let texte = FORMAT_SIMPLE.formater(v);
                debug!(expression = %self.expression, resultat = %texte, "calcul simple");
                self.historique = format!("{} =", self.expression);
                self.affichage = texte.clone();
                self.expression = texte;
                self.calcule = true;
            }
            Err(e) => {
                debug!(expression = %self.expression, erreur = %e, "calcul simple en échec");
                self.affichage = TEXTE_ERREUR.to_string();
                self.expression.clear();
                self.calcule = false;
            }
        }
    }
}
