//! Noyau: évaluation numérique (pipeline réel)
//!
//! tokenize -> multiplication implicite -> RPN -> Programme (profondeur de pile vérifiée)
//!        -> evaluer(liaisons) sur machine à pile
//!
//! Un `Programme` se compile une fois puis s’évalue autant de fois que nécessaire
//! (401 points en 2D, 41×41 en 3D) sans re-lire le texte.

use tracing::trace;

use super::erreur::{ErreurEval, ResultatEval};
use super::fonctions::{constante, modulo, puissance};
use super::implicite::{inserer_multiplications, verifier_appels};
use super::jetons::{format_tokens, tokenize};
use super::rpn::{to_rpn, Instr, OpBin};

/// Valeurs liées aux noms (x, y, pi, ...). Les liaisons masquent les constantes prédéfinies.
pub type Liaisons<'a> = [(&'a str, f64)];

/// Expression compilée, prête à être évaluée.
#[derive(Clone, Debug, PartialEq)]
pub struct Programme {
    instrs: Vec<Instr>,
    profondeur: usize,
}

/// API publique : compile une expression texte.
pub fn compiler(expr_str: &str) -> ResultatEval<Programme> {
    let s = expr_str.trim();
    if s.is_empty() {
        return Err(ErreurEval::Vide);
    }

    // 1) Jetons (+ produits implicites)
    let jetons = tokenize(s)?;
    verifier_appels(&jetons)?;
    let jetons = inserer_multiplications(jetons);
    trace!(jetons = %format_tokens(&jetons), "jetons");

    // 2) RPN
    let instrs = to_rpn(&jetons)?;

    // 3) Validation : chaque instruction trouve ses opérandes, une seule valeur à la fin
    let profondeur = profondeur_pile(&instrs)?;

    Ok(Programme { instrs, profondeur })
}

/// API publique : compile puis évalue en une fois.
/// Un résultat NaN (hors domaine réel) est une erreur ; ±∞ est accepté.
pub fn evaluer(expr_str: &str, liaisons: &Liaisons) -> ResultatEval<f64> {
    let v = compiler(expr_str)?.evaluer(liaisons)?;
    if v.is_nan() {
        return Err(ErreurEval::NonReel);
    }
    Ok(v)
}

fn profondeur_pile(instrs: &[Instr]) -> ResultatEval<usize> {
    let mut prof: usize = 0;
    let mut max: usize = 0;

    for ins in instrs {
        let (consomme, produit) = match ins {
            Instr::Nombre(_) | Instr::Charger(_) => (0, 1),
            Instr::Neg => (1, 1),
            Instr::Binaire(_) => (2, 1),
            Instr::Appel(_, n) => (*n, 1),
        };
        prof = prof
            .checked_sub(consomme)
            .ok_or(ErreurEval::ExpressionInvalide)?
            + produit;
        max = max.max(prof);
    }

    if prof != 1 {
        return Err(ErreurEval::ExpressionInvalide);
    }
    Ok(max)
}

fn appliquer_bin(op: OpBin, a: f64, b: f64) -> f64 {
    match op {
        OpBin::Add => a + b,
        OpBin::Sub => a - b,
        OpBin::Mul => a * b,
        OpBin::Div => a / b,
        OpBin::Mod => modulo(a, b),
        OpBin::Pow => puissance(a, b),
    }
}

impl Programme {
    /// Évalue le programme. Retourne la valeur brute (peut être ±∞ ou NaN) ;
    /// seule une variable non liée est une erreur.
    pub fn evaluer(&self, liaisons: &Liaisons) -> ResultatEval<f64> {
        let mut pile: Vec<f64> = Vec::with_capacity(self.profondeur);

        for ins in &self.instrs {
            match ins {
                Instr::Nombre(v) => pile.push(*v),

                Instr::Charger(nom) => {
                    let v = liaisons
                        .iter()
                        .find(|(n, _)| *n == nom.as_str())
                        .map(|(_, v)| *v)
                        .or_else(|| constante(nom))
                        .ok_or_else(|| ErreurEval::VariableInconnue(nom.clone()))?;
                    pile.push(v);
                }

                Instr::Neg => {
                    let a = pile.pop().ok_or(ErreurEval::ExpressionInvalide)?;
                    pile.push(-a);
                }

                Instr::Binaire(op) => {
                    let b = pile.pop().ok_or(ErreurEval::ExpressionInvalide)?;
                    let a = pile.pop().ok_or(ErreurEval::ExpressionInvalide)?;
                    pile.push(appliquer_bin(*op, a, b));
                }

                Instr::Appel(f, n) => {
                    let debut = pile
                        .len()
                        .checked_sub(*n)
                        .ok_or(ErreurEval::ExpressionInvalide)?;
                    let v = f.appliquer(&pile[debut..]);
                    pile.truncate(debut);
                    pile.push(v);
                }
            }
        }

        pile.pop().ok_or(ErreurEval::ExpressionInvalide)
    }

    /// Noms chargés par le programme (variables ou constantes), sans doublon.
    pub fn noms(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for ins in &self.instrs {
            if let Instr::Charger(n) = ins {
                if !out.contains(&n.as_str()) {
                    out.push(n.as_str());
                }
            }
        }
        out
    }
}
