//! Échantillonnage numérique pour le tracé.
//!
//! - 2D : 401 abscisses régulières sur la plage visible, racines par changement de signe
//! - 3D : grille fixe 41×41 sur [-10, 10]², pas 0.5
//!
//! Contrat : aucune erreur ne remonte. Un point non évaluable (erreur, NaN, ±∞)
//! devient `None` et sera simplement sauté au rendu.

use std::f64::consts::{E, PI};

use super::eval::{Liaisons, Programme};
use super::format::arrondi;

/// Nombre d’échantillons d’une courbe (bornes incluses).
pub const NB_ECHANTILLONS_2D: usize = 401;

/// Demi-largeur de la grille 3D.
pub const BORNE_GRILLE_3D: f64 = 10.0;

/// Pas de la grille 3D.
pub const PAS_GRILLE_3D: f64 = 0.5;

/// Intervalle [min, max] d’un axe.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plage {
    pub min: f64,
    pub max: f64,
}

impl Plage {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn largeur(&self) -> f64 {
        self.max - self.min
    }

    /// Multiplie les deux bornes (zoom centré sur l’origine).
    pub fn mise_a_l_echelle(&self, facteur: f64) -> Self {
        Self::new(self.min * facteur, self.max * facteur)
    }
}

impl Default for Plage {
    /// Plage x par défaut avant tout zoom.
    fn default() -> Self {
        Self::new(-15.0, 15.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Courbe {
    pub xs: Vec<f64>,
    pub ys: Vec<Option<f64>>,
    /// Racines arrondies à 2 décimales, sans doublon, dans l’ordre de détection.
    pub racines: Vec<f64>,
    /// f(0), si défini.
    pub ordonnee_origine: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Surface {
    /// Valeurs communes aux axes x et y.
    pub axe: Vec<f64>,
    /// z[i][j] = f(x = axe[j], y = axe[i]).
    pub z: Vec<Vec<Option<f64>>>,
}

impl Surface {
    /// (min, max) des valeurs définies ; None si la surface est entièrement manquante.
    pub fn etendue_z(&self) -> Option<(f64, f64)> {
        self.z
            .iter()
            .flatten()
            .flatten()
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

fn valeur_finie(p: &Programme, liaisons: &Liaisons) -> Option<f64> {
    p.evaluer(liaisons).ok().filter(|v| v.is_finite())
}

/* ------------------------ 2D ------------------------ */

/// Abscisses régulières, bornes incluses.
/// x_i = min + largeur·i/n (calcul exact aux points “ronds”, ex: 0 pour [-15, 15]).
pub fn abscisses(plage: Plage) -> Vec<f64> {
    let n = (NB_ECHANTILLONS_2D - 1) as f64;
    (0..NB_ECHANTILLONS_2D)
        .map(|i| plage.min + plage.largeur() * (i as f64) / n)
        .collect()
}

/// Racine à x_i si le signe change strictement entre i-1 et i, ou si y_i vaut exactement 0.
pub fn detecter_racines(xs: &[f64], ys: &[Option<f64>]) -> Vec<f64> {
    let mut racines: Vec<f64> = Vec::new();

    for i in 1..xs.len().min(ys.len()) {
        let bascule = match (ys[i - 1], ys[i]) {
            (_, Some(c)) if c == 0.0 => true,
            (Some(p), Some(c)) => (c > 0.0 && p < 0.0) || (c < 0.0 && p > 0.0),
            _ => false,
        };
        if bascule {
            let r = arrondi(xs[i], 2);
            if !racines.contains(&r) {
                racines.push(r);
            }
        }
    }

    racines
}

/// Échantillonne y = f(x) sur la plage. `None` (compilation échouée) => série entièrement manquante.
pub fn echantillonner_courbe(programme: Option<&Programme>, plage: Plage) -> Courbe {
    let xs = abscisses(plage);

    let Some(p) = programme else {
        let ys = vec![None; xs.len()];
        return Courbe {
            xs,
            ys,
            racines: Vec::new(),
            ordonnee_origine: None,
        };
    };

    let ys: Vec<Option<f64>> = xs
        .iter()
        .map(|&x| valeur_finie(p, &[("x", x), ("e", E), ("pi", PI)]))
        .collect();

    let racines = detecter_racines(&xs, &ys);

    // f(0) : évaluation indépendante de la passe d’échantillonnage
    let ordonnee_origine = valeur_finie(p, &[("x", 0.0), ("e", E), ("pi", PI)]);

    Courbe {
        xs,
        ys,
        racines,
        ordonnee_origine,
    }
}

/* ------------------------ 3D ------------------------ */

/// -10, -9.5, ..., 10 (41 valeurs).
pub fn axe_grille() -> Vec<f64> {
    let n = (2.0 * BORNE_GRILLE_3D / PAS_GRILLE_3D).round() as usize;
    (0..=n)
        .map(|i| -BORNE_GRILLE_3D + PAS_GRILLE_3D * i as f64)
        .collect()
}

/// Échantillonne z = f(x, y) sur la grille fixe.
pub fn echantillonner_surface(programme: Option<&Programme>) -> Surface {
    let axe = axe_grille();

    let z = axe
        .iter()
        .map(|&y| {
            axe.iter()
                .map(|&x| programme.and_then(|p| valeur_finie(p, &[("x", x), ("y", y), ("pi", PI)])))
                .collect()
        })
        .collect();

    Surface { axe, z }
}
