// src/noyau/erreur.rs

use thiserror::Error;

/// Erreurs du moteur numérique (lecture, compilation, évaluation).
///
/// Aucune ne remonte jusqu’à l’utilisateur sous forme de plantage :
/// le classement les dégrade en point manquant ou en résultat vide.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErreurEval {
    #[error("entrée vide")]
    Vide,

    #[error("caractère inattendu: '{0}'")]
    CaractereInattendu(char),

    #[error("nombre invalide: {0}")]
    NombreInvalide(String),

    #[error("parenthèses non équilibrées")]
    Parentheses,

    #[error("expression invalide")]
    ExpressionInvalide,

    #[error("fonction inconnue: {0}")]
    FonctionInconnue(String),

    #[error("{nom} attend {attendu} argument(s), reçu {recu}")]
    Arite {
        nom: &'static str,
        attendu: &'static str,
        recu: usize,
    },

    #[error("variable inconnue: {0}")]
    VariableInconnue(String),

    #[error("résultat non réel")]
    NonReel,
}

pub type ResultatEval<T> = Result<T, ErreurEval>;
