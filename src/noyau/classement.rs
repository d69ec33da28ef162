//! Classement d’une expression : constante, courbe y=f(x) ou surface z=f(x,y).
//!
//! Fonction pure du texte : aucun état conservé d’un appel à l’autre.
//!
//! Règles (sur le texte nettoyé : sans espaces, en minuscules) :
//! 1. vide => aucun résultat
//! 2. aucune lettre x/y/z et évaluable => Constante (5 chiffres significatifs)
//! 3. surface si commence par "z=" OU (contient x ET y ET ne commence pas par "y=")
//! 4. sinon courbe
//!
//! Le préfixe "y=" / "z=" est retiré avant l’évaluation du corps.

use tracing::debug;

use super::echantillonnage::{echantillonner_courbe, echantillonner_surface, Courbe, Plage, Surface};
use super::eval::{compiler, evaluer};
use super::format::{format_arrondi, FORMAT_CONSTANTE};

#[derive(Clone, Debug, PartialEq)]
pub enum Classement {
    Constante { valeur: f64, texte: String },
    Courbe2D(Courbe),
    Surface3D(Surface),
}

/// Classement + nom de série (légende).
#[derive(Clone, Debug, PartialEq)]
pub struct Resultat {
    pub nom: String,
    pub classement: Classement,
}

/// Indicateurs d’usage des variables, calculés sur le texte nettoyé.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Analyse {
    pub has_x: bool,
    pub has_y: bool,
    pub commence_y: bool,
    pub commence_z: bool,
}

impl Analyse {
    pub fn depuis(nettoye: &str) -> Self {
        Self {
            has_x: nettoye.contains('x'),
            has_y: nettoye.contains('y'),
            commence_y: nettoye.starts_with("y="),
            commence_z: nettoye.starts_with("z="),
        }
    }

    /// Règle littérale : "y=y+1" reste 2D, "x+y" sans préfixe est 3D.
    pub fn est_3d(&self) -> bool {
        self.commence_z || (self.has_x && self.has_y && !self.commence_y)
    }
}

/// Retire tous les blancs et passe en minuscules.
pub fn nettoyer(texte: &str) -> String {
    texte
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Retire un préfixe "y=" ou "z=" (espaces tolérés autour de '=').
pub fn retirer_prefixe(texte: &str) -> &str {
    let t = texte.trim_start();
    let mut chars = t.chars();
    if let Some('y' | 'z' | 'Y' | 'Z') = chars.next() {
        if let Some(reste) = chars.as_str().trim_start().strip_prefix('=') {
            return reste.trim_start();
        }
    }
    t
}

fn sans_variable(nettoye: &str) -> bool {
    !nettoye.contains(['x', 'y', 'z'])
}

/// Classe une expression et l’échantillonne. `plage_x` = plage x visible (2D seulement).
///
/// Ne lève jamais : les échecs deviennent des points manquants.
pub fn classer(texte: &str, plage_x: Plage) -> Option<Resultat> {
    let nettoye = nettoyer(texte);
    if nettoye.is_empty() {
        return None;
    }

    let brut = texte.trim();
    let minuscule = brut.to_lowercase();

    // Constante : aucune variable et évaluable tel quel
    if sans_variable(&nettoye) {
        match evaluer(&minuscule, &[]) {
            Ok(valeur) => {
                let texte = FORMAT_CONSTANTE.formater(valeur);
                debug!(expression = brut, %texte, "constante");
                return Some(Resultat {
                    nom: format!("y={texte}"),
                    classement: Classement::Constante { valeur, texte },
                });
            }
            Err(e) => {
                debug!(expression = brut, erreur = %e, "pas une constante, on continue");
            }
        }
    }

    let analyse = Analyse::depuis(&nettoye);
    let est_3d = analyse.est_3d();

    let nom = if brut.contains('=') {
        brut.to_string()
    } else if est_3d {
        format!("z={brut}")
    } else {
        format!("y={brut}")
    };

    let corps = retirer_prefixe(&minuscule);
    let programme = match compiler(corps) {
        Ok(p) => {
            debug!(expression = brut, noms = ?p.noms(), "corps compilé");
            Some(p)
        }
        Err(e) => {
            debug!(expression = brut, erreur = %e, "corps non compilable");
            None
        }
    };

    let classement = if est_3d {
        Classement::Surface3D(echantillonner_surface(programme.as_ref()))
    } else {
        Classement::Courbe2D(echantillonner_courbe(programme.as_ref(), plage_x))
    };

    debug!(expression = brut, surface = est_3d, "classement");
    Some(Resultat { nom, classement })
}

impl Resultat {
    /// Texte affiché sous le champ de saisie.
    pub fn resume(&self) -> String {
        match &self.classement {
            Classement::Constante { texte, .. } => format!("= {texte}"),
            Classement::Surface3D(_) => "Surface 3D".to_string(),
            Classement::Courbe2D(c) => {
                let mut info: Vec<String> = Vec::new();

                if !c.racines.is_empty() {
                    let mut s = c
                        .racines
                        .iter()
                        .take(3)
                        .map(|r| format_arrondi(*r))
                        .collect::<Vec<_>>()
                        .join(", ");
                    if c.racines.len() > 3 {
                        s.push_str("...");
                    }
                    info.push(format!("Racines : {s}"));
                }

                if let Some(y0) = c.ordonnee_origine {
                    info.push(format!("f(0)={}", format_arrondi(y0)));
                }

                info.join(" | ")
            }
        }
    }
}
