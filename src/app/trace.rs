//! src/app/trace.rs
//!
//! Traces prêtes à dessiner, dérivées d’un `Resultat` du noyau.
//!
//! Une courbe est découpée en segments continus : un échantillon manquant
//! coupe le trait (pas de ligne tirée au travers d’une asymptote).

use crate::noyau::echantillonnage::Surface;
use crate::noyau::{Classement, Resultat};

#[derive(Clone, Debug, PartialEq)]
pub enum Trace {
    /// Constante : droite horizontale pointillée.
    Horizontale { nom: String, teinte: f32, y: f64 },
    /// Courbe 2D : segments de points [x, y] présents.
    Ligne {
        nom: String,
        teinte: f32,
        segments: Vec<Vec<[f64; 2]>>,
    },
    /// Surface 3D (grille du noyau telle quelle).
    Surface { nom: String, surface: Surface },
}

impl Trace {
    pub fn nom(&self) -> &str {
        match self {
            Trace::Horizontale { nom, .. } | Trace::Ligne { nom, .. } | Trace::Surface { nom, .. } => {
                nom
            }
        }
    }

    pub fn est_surface(&self) -> bool {
        matches!(self, Trace::Surface { .. })
    }
}

/// Coupe une série échantillonnée aux points manquants.
pub fn segments(xs: &[f64], ys: &[Option<f64>]) -> Vec<Vec<[f64; 2]>> {
    let mut out = Vec::new();
    let mut courant: Vec<[f64; 2]> = Vec::new();

    for (&x, y) in xs.iter().zip(ys) {
        match y {
            Some(y) => courant.push([x, *y]),
            None => {
                if !courant.is_empty() {
                    out.push(std::mem::take(&mut courant));
                }
            }
        }
    }
    if !courant.is_empty() {
        out.push(courant);
    }
    out
}

/// Une constante non finie (ex: 1/0) n’a pas de droite à tracer.
pub fn trace_depuis(resultat: &Resultat, teinte: f32) -> Option<Trace> {
    let nom = resultat.nom.clone();
    match &resultat.classement {
        Classement::Constante { valeur, .. } => valeur
            .is_finite()
            .then(|| Trace::Horizontale { nom, teinte, y: *valeur }),
        Classement::Courbe2D(c) => Some(Trace::Ligne {
            nom,
            teinte,
            segments: segments(&c.xs, &c.ys),
        }),
        Classement::Surface3D(s) => Some(Trace::Surface {
            nom,
            surface: s.clone(),
        }),
    }
}
