//! src/app/etat.rs
//!
//! État UI (sans vue) : propriétaire unique de tout l’état mutable.
//!
//! Rôle : liste d’expressions, traces calculées, fenêtre visible, thème, mode,
//! anti-rebond, calculatrice simple, rotation 3D. La vue (vue.rs) lit cet état
//! et appelle les opérations ci-dessous ; aucun widget ici.
//!
//! Contrats :
//! - Le temps (`maintenant`, en secondes) vient de l’appelant : actions déterministes.
//! - Une passe d’évaluation reconstruit toutes les traces (pas de cache entre passes).

use serde::Deserialize;
use tracing::debug;

use super::rebond::Rebond;
use super::simple::CalcSimple;
use super::trace::{trace_depuis, Trace};
use crate::noyau::{classer, Plage};
use crate::reglages::Reglages;

/// Zoom avant : les deux plages sont multipliées par ce facteur.
pub const FACTEUR_ZOOM_AVANT: f64 = 0.8;

/// Zoom arrière.
pub const FACTEUR_ZOOM_ARRIERE: f64 = 1.25;

/// Écart de bornes x en dessous duquel un déplacement de la vue est ignoré.
const TOLERANCE_FENETRE: f64 = 1e-9;

/// Largeurs de fenêtre admises (au-delà, le zoom est sans effet).
const LARGEUR_MIN: f64 = 1e-6;
const LARGEUR_MAX: f64 = 1e12;

/// Graphes prédéfinis (menu « Graphes magiques »).
pub const GRAPHES_MAGIQUES: [&str; 10] = [
    "z = sin(sqrt(x^2 + y^2))",
    "z = x^3 - 3*x*y^2",
    "z = sin(x)*cos(y)",
    "z = exp(-(x^2+y^2)/10)*5",
    "y = sin(x) + sin(1.1*x)",
    "y = exp(-0.1*x) * sin(2*x)",
    "y = tan(x)",
    "y = sin(x*x)",
    "y = sin(x) + sin(2*x)/2 + sin(3*x)/3",
    "y = sqrt(x)",
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Clair,
    Sombre,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Graphique,
    Simple,
}

/// Une ligne de la liste d’expressions.
#[derive(Clone, Debug, PartialEq)]
pub struct EntreeExpression {
    pub id: u64,
    pub texte: String,
    /// Teinte HSV dans [0, 1), fixée à la création.
    pub teinte: f32,
    /// Résumé sous le champ (racines, f(0), "= 4", "Surface 3D").
    pub resume: String,
}

/// Fenêtre visible du graphe 2D.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fenetre {
    pub x: Plage,
    pub y: Plage,
}

impl Fenetre {
    pub fn mise_a_l_echelle(&self, facteur: f64) -> Self {
        Self {
            x: self.x.mise_a_l_echelle(facteur),
            y: self.y.mise_a_l_echelle(facteur),
        }
    }

    /// Bornes finies et largeurs dans [LARGEUR_MIN, LARGEUR_MAX].
    pub fn utilisable(&self) -> bool {
        [self.x, self.y].iter().all(|p| {
            p.min.is_finite() && p.max.is_finite() && (LARGEUR_MIN..=LARGEUR_MAX).contains(&p.largeur())
        })
    }
}

#[derive(Clone, Debug)]
pub struct AppGraphe {
    // --- expressions ---
    pub expressions: Vec<EntreeExpression>,
    pub actif: Option<u64>,

    // --- sorties ---
    pub traces: Vec<Trace>,

    // --- vue ---
    pub theme: Theme,
    pub mode: Mode,
    pub fenetre: Fenetre,
    /// La vue doit imposer `fenetre` au graphe à la prochaine frame (zoom, reset).
    pub fenetre_imposee: bool,
    /// Rotation 3D [autour de y, autour de x] en radians.
    pub rotation: [f32; 2],
    pub fonctions_visibles: bool,

    // --- calculatrice simple ---
    pub simple: CalcSimple,

    // --- UX ---
    pub rebond: Rebond,
    /// Redonner le focus au champ actif (après un clic sur le pavé).
    pub focus_entree: bool,
    /// Dernier thème appliqué au contexte egui (None = jamais appliqué).
    pub theme_applique: Option<Theme>,

    fenetre_defaut: Fenetre,
    prochain_id: u64,
}

impl Default for AppGraphe {
    fn default() -> Self {
        Self::nouveau(&Reglages::default())
    }
}

/// Teintes réparties par l’angle d’or : deux expressions voisines restent distinctes.
fn teinte_pour(id: u64) -> f32 {
    const NOMBRE_OR_INV: f64 = 0.618_033_988_749_895;
    ((id as f64 * NOMBRE_OR_INV + 0.1) % 1.0) as f32
}

impl AppGraphe {
    pub fn nouveau(reglages: &Reglages) -> Self {
        let fenetre = Fenetre {
            x: reglages.plage_x(),
            y: reglages.plage_y(),
        };
        let mut app = Self {
            expressions: Vec::new(),
            actif: None,
            traces: Vec::new(),
            theme: reglages.vue.theme,
            mode: Mode::Graphique,
            fenetre,
            fenetre_imposee: true,
            rotation: [0.6, 0.5],
            fonctions_visibles: false,
            simple: CalcSimple::default(),
            rebond: Rebond::new(reglages.delai_rebond()),
            focus_entree: true,
            theme_applique: None,
            fenetre_defaut: fenetre,
            prochain_id: 0,
        };
        app.ajouter_expression("");
        app
    }

    /* ------------------------ Liste d’expressions ------------------------ */

    /// Ajoute une ligne et la rend active. Renvoie son identifiant.
    pub fn ajouter_expression(&mut self, texte: &str) -> u64 {
        let id = self.prochain_id;
        self.prochain_id += 1;

        self.expressions.push(EntreeExpression {
            id,
            texte: texte.to_string(),
            teinte: teinte_pour(id),
            resume: String::new(),
        });
        self.actif = Some(id);
        self.focus_entree = true;

        if !texte.trim().is_empty() {
            self.evaluer_tout();
        }
        id
    }

    pub fn retirer_expression(&mut self, id: u64) {
        self.expressions.retain(|e| e.id != id);
        if self.actif == Some(id) {
            self.actif = self.expressions.last().map(|e| e.id);
        }
        self.evaluer_tout();
    }

    /// Vide tout, remet la fenêtre par défaut, puis repart d’une ligne vide.
    pub fn tout_effacer(&mut self) {
        self.expressions.clear();
        self.traces.clear();
        self.rebond.annuler();
        self.actif = None;
        self.fenetre = self.fenetre_defaut;
        self.fenetre_imposee = true;
        self.ajouter_expression("");
    }

    /// Le texte d’une ligne a changé (saisie clavier) : évaluation différée.
    pub fn modifier_expression(&mut self, id: u64, maintenant: f64) {
        self.actif = Some(id);
        self.rebond.planifier(maintenant);
    }

    /// Entrée : évaluation immédiate, l’échéance en attente est abandonnée.
    pub fn valider(&mut self) {
        self.rebond.annuler();
        self.evaluer_tout();
    }

    fn entree_active_mut(&mut self) -> Option<&mut EntreeExpression> {
        let id = self.actif?;
        self.expressions.iter_mut().find(|e| e.id == id)
    }

    /// Pavé : insère `s` à la fin de la ligne active.
    pub fn taper(&mut self, s: &str, maintenant: f64) {
        if self.entree_active_mut().is_none() {
            self.ajouter_expression("");
        }
        if let Some(e) = self.entree_active_mut() {
            e.texte.push_str(s);
            self.rebond.planifier(maintenant);
        }
        self.focus_entree = true;
    }

    pub fn retour_arriere(&mut self, maintenant: f64) {
        if let Some(e) = self.entree_active_mut() {
            e.texte.pop();
            self.rebond.planifier(maintenant);
        }
        self.focus_entree = true;
    }

    /// Échap : vide seulement la ligne active.
    pub fn effacer_entree_active(&mut self, maintenant: f64) {
        if let Some(e) = self.entree_active_mut() {
            e.texte.clear();
            self.rebond.planifier(maintenant);
        }
        self.focus_entree = true;
    }

    /* ------------------------ Évaluation ------------------------ */

    /// Reclasse toutes les lignes et reconstruit les traces.
    pub fn evaluer_tout(&mut self) {
        let plage_x = self.fenetre.x;
        let mut traces = Vec::with_capacity(self.expressions.len());

        for e in &mut self.expressions {
            e.resume.clear();
            if let Some(r) = classer(&e.texte, plage_x) {
                e.resume = r.resume();
                traces.extend(trace_depuis(&r, e.teinte));
            }
        }

        debug!(
            expressions = self.expressions.len(),
            traces = traces.len(),
            x_min = plage_x.min,
            x_max = plage_x.max,
            "passe d’évaluation"
        );
        self.traces = traces;
    }

    /// À appeler à chaque frame. Renvoie le délai avant la prochaine échéance.
    pub fn tic(&mut self, maintenant: f64) -> Option<f64> {
        if self.rebond.echu(maintenant) {
            self.evaluer_tout();
        }
        self.rebond.restant(maintenant)
    }

    /// Vue 3D dès qu’une surface existe.
    pub fn est_3d(&self) -> bool {
        self.traces.iter().any(Trace::est_surface)
    }

    /* ------------------------ Fenêtre ------------------------ */

    fn appliquer_fenetre(&mut self, fenetre: Fenetre) {
        self.fenetre = fenetre;
        self.fenetre_imposee = true;
        self.evaluer_tout();
    }

    pub fn zoom_avant(&mut self) {
        self.zoomer(FACTEUR_ZOOM_AVANT);
    }

    pub fn zoom_arriere(&mut self) {
        self.zoomer(FACTEUR_ZOOM_ARRIERE);
    }

    fn zoomer(&mut self, facteur: f64) {
        let cible = self.fenetre.mise_a_l_echelle(facteur);
        if cible.utilisable() {
            self.appliquer_fenetre(cible);
        } else {
            debug!(?cible, "zoom ignoré: fenêtre hors limites");
        }
    }

    pub fn reinitialiser_zoom(&mut self) {
        self.appliquer_fenetre(self.fenetre_defaut);
    }

    /// Bornes relevées sur le graphe après une interaction (glisser, molette).
    /// Un changement de plage x replanifie l’échantillonnage.
    pub fn fenetre_observee(&mut self, observee: Fenetre, maintenant: f64) {
        if !observee.utilisable() {
            return;
        }
        let x_change = (observee.x.min - self.fenetre.x.min).abs() > TOLERANCE_FENETRE
            || (observee.x.max - self.fenetre.x.max).abs() > TOLERANCE_FENETRE;
        self.fenetre = observee;
        if x_change {
            self.rebond.planifier(maintenant);
        }
    }

    /* ------------------------ Thème / mode ------------------------ */

    pub fn basculer_theme(&mut self) {
        self.theme = match self.theme {
            Theme::Clair => Theme::Sombre,
            Theme::Sombre => Theme::Clair,
        };
    }

    pub fn changer_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            debug!(?mode, "changement de mode");
            self.mode = mode;
            self.focus_entree = true;
        }
    }

    /* ------------------------ Graphes magiques ------------------------ */

    /// Remplace tout par le graphe prédéfini `n` (0..10). Hors bornes : sans effet.
    pub fn graphe_magique(&mut self, n: usize) {
        let Some(equation) = GRAPHES_MAGIQUES.get(n) else {
            return;
        };
        self.tout_effacer();
        if let Some(e) = self.entree_active_mut() {
            e.texte = (*equation).to_string();
        }
        self.evaluer_tout();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn app() -> AppGraphe {
        AppGraphe::default()
    }

    #[test]
    fn demarrage() {
        let a = app();
        assert_eq!(a.expressions.len(), 1);
        assert_eq!(a.actif, Some(a.expressions[0].id));
        assert!(a.traces.is_empty());
        assert_eq!(a.fenetre.x, Plage::new(-15.0, 15.0));
        assert_eq!(a.fenetre.y, Plage::new(-10.0, 10.0));
        assert!(a.fenetre_imposee);
    }

    #[test]
    fn ajout_et_retrait() {
        let mut a = app();
        let id = a.ajouter_expression("y=x^2-4");
        assert_eq!(a.actif, Some(id));
        assert_eq!(a.traces.len(), 1);
        let resume = &a.expressions.last().unwrap().resume;
        assert!(resume.starts_with("Racines : "), "{resume}");

        a.retirer_expression(id);
        assert!(a.traces.is_empty());
        assert_eq!(a.actif, Some(a.expressions[0].id));
    }

    #[test]
    fn teintes_distinctes() {
        let mut a = app();
        a.ajouter_expression("x");
        a.ajouter_expression("2x");
        let t: Vec<f32> = a.expressions.iter().map(|e| e.teinte).collect();
        assert!(t.iter().all(|h| (0.0..1.0).contains(h)));
        assert!((t[0] - t[1]).abs() > 0.1);
        assert!((t[1] - t[2]).abs() > 0.1);
    }

    #[test]
    fn saisie_differee_puis_evaluee() {
        let mut a = app();
        let id = a.actif.unwrap();
        a.expressions[0].texte = "x^2".into();
        a.modifier_expression(id, 10.0);
        assert!(a.traces.is_empty());

        // frappes rapides : une seule passe, 400 ms après la dernière
        a.expressions[0].texte = "x^2+1".into();
        a.modifier_expression(id, 10.2);
        assert!(a.tic(10.5).is_some());
        assert!(a.traces.is_empty());
        assert_eq!(a.tic(10.7), None);
        assert_eq!(a.traces.len(), 1);
        assert_eq!(a.expressions[0].resume, "f(0)=1");
    }

    #[test]
    fn valider_immediat() {
        let mut a = app();
        let id = a.actif.unwrap();
        a.expressions[0].texte = "3+4".into();
        a.modifier_expression(id, 0.0);
        a.valider();
        assert_eq!(a.expressions[0].resume, "= 7");
        assert!(!a.rebond.en_attente());
    }

    #[test]
    fn pave_sur_ligne_active() {
        let mut a = app();
        a.taper("sin(", 0.0);
        a.taper("x", 0.1);
        a.taper(")", 0.2);
        assert_eq!(a.expressions[0].texte, "sin(x)");
        a.retour_arriere(0.3);
        assert_eq!(a.expressions[0].texte, "sin(x");
        assert!(a.rebond.en_attente());
        a.effacer_entree_active(0.4);
        assert!(a.expressions[0].texte.is_empty());
    }

    #[test]
    fn taper_sans_ligne_active_en_cree_une() {
        let mut a = app();
        let id = a.actif.unwrap();
        a.retirer_expression(id);
        assert!(a.expressions.is_empty());
        a.taper("7", 0.0);
        assert_eq!(a.expressions.len(), 1);
        assert_eq!(a.expressions[0].texte, "7");
    }

    #[test]
    fn zoom() {
        let mut a = app();
        a.fenetre_imposee = false;
        a.zoom_avant();
        assert!(a.fenetre_imposee);
        assert_abs_diff_eq!(a.fenetre.x.min, -12.0, epsilon = 1e-12);
        assert_abs_diff_eq!(a.fenetre.x.max, 12.0, epsilon = 1e-12);
        assert_abs_diff_eq!(a.fenetre.y.max, 8.0, epsilon = 1e-12);

        a.zoom_arriere();
        assert_abs_diff_eq!(a.fenetre.x.max, 15.0, epsilon = 1e-12);
        assert_abs_diff_eq!(a.fenetre.y.min, -10.0, epsilon = 1e-12);

        a.zoom_arriere();
        a.reinitialiser_zoom();
        assert_eq!(a.fenetre.x, Plage::new(-15.0, 15.0));
    }

    #[test]
    fn zoom_borne_dans_les_deux_sens() {
        let mut a = app();
        for _ in 0..500 {
            a.zoom_arriere();
        }
        assert!(a.fenetre.utilisable());
        assert!(a.fenetre.x.largeur() <= LARGEUR_MAX);
        assert!(a.fenetre.x.largeur() > LARGEUR_MAX / FACTEUR_ZOOM_ARRIERE);

        a.reinitialiser_zoom();
        for _ in 0..500 {
            a.zoom_avant();
        }
        assert!(a.fenetre.utilisable());
        // y (plus étroit) atteint la limite en premier
        assert!(a.fenetre.y.largeur() >= LARGEUR_MIN);
        assert!(a.fenetre.y.largeur() < LARGEUR_MIN / FACTEUR_ZOOM_AVANT);
    }

    #[test]
    fn fenetre_observee_non_finie_ignoree() {
        let mut a = app();
        let avant = a.fenetre;
        let mut f = a.fenetre;
        f.x = Plage::new(f64::NEG_INFINITY, 0.0);
        a.fenetre_observee(f, 1.0);
        assert_eq!(a.fenetre, avant);
        assert!(!a.rebond.en_attente());
    }

    #[test]
    fn zoom_reechantillonne() {
        let mut a = app();
        a.ajouter_expression("y=x");
        a.zoom_avant();
        match &a.traces[0] {
            Trace::Ligne { segments, .. } => {
                let premier = segments[0][0];
                assert_abs_diff_eq!(premier[0], -12.0, epsilon = 1e-12);
            }
            autre => panic!("attendu Ligne, reçu {autre:?}"),
        }
    }

    #[test]
    fn fenetre_observee_replanifie_si_x_change() {
        let mut a = app();
        let mut f = a.fenetre;
        f.y = Plage::new(-3.0, 3.0);
        a.fenetre_observee(f, 1.0);
        assert!(!a.rebond.en_attente());
        assert_eq!(a.fenetre.y, Plage::new(-3.0, 3.0));

        f.x = Plage::new(-5.0, 25.0);
        a.fenetre_observee(f, 2.0);
        assert!(a.rebond.en_attente());
        assert_eq!(a.fenetre.x, Plage::new(-5.0, 25.0));
    }

    #[test]
    fn theme_et_mode() {
        let mut a = app();
        a.basculer_theme();
        assert_eq!(a.theme, Theme::Sombre);
        a.basculer_theme();
        assert_eq!(a.theme, Theme::Clair);
        a.changer_mode(Mode::Simple);
        assert_eq!(a.mode, Mode::Simple);
    }

    #[test]
    fn tout_effacer_garde_une_ligne_vide() {
        let mut a = app();
        a.ajouter_expression("x");
        a.ajouter_expression("z=x*y");
        a.zoom_avant();
        a.tout_effacer();
        assert_eq!(a.expressions.len(), 1);
        assert!(a.expressions[0].texte.is_empty());
        assert!(a.traces.is_empty());
        assert_eq!(a.fenetre.x, Plage::new(-15.0, 15.0));
    }

    #[test]
    fn graphes_magiques() {
        let mut a = app();
        a.graphe_magique(0);
        assert_eq!(a.expressions.len(), 1);
        assert_eq!(a.expressions[0].texte, "z = sin(sqrt(x^2 + y^2))");
        assert!(a.est_3d());
        assert_eq!(a.expressions[0].resume, "Surface 3D");

        a.graphe_magique(9);
        assert!(!a.est_3d());
        assert_eq!(a.traces[0].nom(), "y = sqrt(x)");

        // hors bornes : rien ne change
        a.graphe_magique(10);
        assert_eq!(a.expressions[0].texte, "y = sqrt(x)");
    }

    #[test]
    fn tous_les_graphes_magiques_tracent() {
        for n in 0..GRAPHES_MAGIQUES.len() {
            let mut a = app();
            a.graphe_magique(n);
            assert_eq!(a.traces.len(), 1, "graphe {n}");
            assert_eq!(a.est_3d(), n < 4, "graphe {n}");
        }
    }

    #[test]
    fn reglages_appliques() {
        let r = Reglages::depuis_toml("[vue]\nx_min = -4.0\nx_max = 4.0\ntheme = \"sombre\"\n").unwrap();
        let mut a = AppGraphe::nouveau(&r);
        assert_eq!(a.theme, Theme::Sombre);
        a.zoom_avant();
        a.reinitialiser_zoom();
        assert_eq!(a.fenetre.x, Plage::new(-4.0, 4.0));
    }
}
