// src/app.rs
//
// Grapheur: module App (racine)
// ------------------------------
// Rôle:
// - Déclarer les sous-modules (état, vue, anti-rebond, traces, 3D, calculatrice simple)
// - Ré-exporter AppGraphe (pour main.rs: use crate::app::AppGraphe;)
// - Fournir l’impl eframe::App (compatible NATIF + WEB)
//
// Important:
// - Enter est géré dans vue.rs (au bon endroit: quand le champ a le focus).
// - Ici: raccourcis globaux, échéance de l’anti-rebond, thème.

pub mod etat;
pub mod rebond;
pub mod simple;
pub mod surface;
pub mod trace;
pub mod vue;

// Ré-export pratique : `use crate::app::AppGraphe;`
pub use etat::AppGraphe;

use std::time::Duration;

use eframe::egui;

use etat::Mode;

impl eframe::App for AppGraphe {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let maintenant = ctx.input(|i| i.time);

        // ESC = effacer seulement l’entrée courante (comme bouton "C").
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            match self.mode {
                Mode::Graphique => self.effacer_entree_active(maintenant),
                Mode::Simple => self.simple.effacer(),
            }
        }

        // Évaluation différée : on redemande une frame à l’échéance.
        if let Some(reste) = self.tic(maintenant) {
            ctx.request_repaint_after(Duration::from_secs_f64(reste));
        }

        self.appliquer_theme(ctx);
        self.ui(ctx);
    }
}
