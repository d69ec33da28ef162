//! Noyau numérique du grapheur
//!
//! Organisation interne :
//! - jetons.rs          : tokenisation
//! - implicite.rs       : multiplication implicite (2x, (a)(b))
//! - rpn.rs             : shunting-yard -> programme postfixé
//! - fonctions.rs       : registre des fonctions + constantes
//! - eval.rs            : compilation + machine à pile
//! - format.rs          : affichage des nombres (chiffres significatifs, seuils d’exposant)
//! - echantillonnage.rs : grilles 2D/3D + racines
//! - classement.rs      : constante / courbe / surface

pub mod classement;
pub mod echantillonnage;
pub mod erreur;
pub mod eval;
pub mod fonctions;
pub mod format;
pub mod implicite;
pub mod jetons;
pub mod rpn;

#[cfg(test)]
mod tests_scientifiques;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique minimale
pub use classement::{classer, Classement, Resultat};
pub use echantillonnage::Plage;
pub use eval::evaluer;
