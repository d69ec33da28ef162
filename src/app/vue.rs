// src/app/vue.rs
//
// Vue (UI egui): natif + web
// ---------------------------
// Objectifs :
// - Même AppGraphe (etat.rs) pour natif + wasm
// - Clavier : Enter évalue tout de suite, sinon anti-rebond (quand le champ est focus)
// - Tactile : pavé + panneau de fonctions, focus redonné après clic (focus_entree)
// - Graphe 2D via egui_plot, surfaces 3D via surface.rs
//
// Note :
// - PAS de Key::NumEnter (n’existe pas dans egui 0.33.x)

use eframe::egui;
use egui_plot::{Corner, HLine, Legend, Line, LineStyle, Plot, PlotBounds, PlotPoints};

use super::etat::{AppGraphe, Fenetre, Mode, Theme, GRAPHES_MAGIQUES};
use super::surface::dessiner_surfaces;
use super::trace::Trace;
use crate::noyau::Plage;

const TITRE: &str = "Grapheur";

/// Touches insérées telles quelles dans la ligne active.
const PAVE: [[&str; 5]; 4] = [
    ["7", "8", "9", "/", "("],
    ["4", "5", "6", "*", ")"],
    ["1", "2", "3", "-", "^"],
    ["0", ".", "x", "+", "y"],
];

/// Panneau de fonctions : (libellé, texte inséré).
const FONCTIONS: [(&str, &str); 12] = [
    ("sin", "sin("),
    ("cos", "cos("),
    ("tan", "tan("),
    ("asin", "asin("),
    ("acos", "acos("),
    ("atan", "atan("),
    ("sqrt", "sqrt("),
    ("exp", "exp("),
    ("ln", "ln("),
    ("log", "log10("),
    ("|x|", "abs("),
    ("π", "pi"),
];

/// Pavé de la calculatrice simple.
const PAVE_SIMPLE: [[char; 4]; 4] = [
    ['7', '8', '9', '/'],
    ['4', '5', '6', '*'],
    ['1', '2', '3', '-'],
    ['0', '.', '%', '+'],
];

/// Couleur d’une expression (teinte fixe, saturation/valeur communes).
pub fn couleur(teinte: f32) -> egui::Color32 {
    egui::Color32::from(egui::ecolor::Hsva::new(teinte, 0.82, 0.85, 1.0))
}

impl AppGraphe {
    /// Applique le thème au contexte s’il a changé depuis la dernière frame.
    pub fn appliquer_theme(&mut self, ctx: &egui::Context) {
        if self.theme_applique == Some(self.theme) {
            return;
        }
        ctx.set_visuals(match self.theme {
            Theme::Clair => egui::Visuals::light(),
            Theme::Sombre => egui::Visuals::dark(),
        });
        self.theme_applique = Some(self.theme);
    }

    /// UI principale : à appeler depuis eframe::App::update(...)
    pub fn ui(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("barre").show(ctx, |ui| {
            self.ui_barre(ui);
        });

        match self.mode {
            Mode::Graphique => {
                egui::SidePanel::left("expressions")
                    .resizable(true)
                    .default_width(320.0)
                    .show(ctx, |ui| {
                        egui::ScrollArea::vertical()
                            .auto_shrink([false, false])
                            .show(ui, |ui| {
                                self.ui_expressions(ui);
                                ui.add_space(8.0);
                                ui.separator();
                                self.ui_clavier(ui);
                            });
                    });

                egui::CentralPanel::default().show(ctx, |ui| {
                    if self.est_3d() {
                        self.ui_graphe_3d(ui);
                    } else {
                        self.ui_graphe_2d(ui);
                    }
                });
            }
            Mode::Simple => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    self.ui_simple(ui);
                });
            }
        }
    }

    /* ------------------------ Barre du haut ------------------------ */

    fn ui_barre(&mut self, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            ui.heading(TITRE);
            ui.separator();

            let mut mode = self.mode;
            ui.selectable_value(&mut mode, Mode::Graphique, "Graphique");
            ui.selectable_value(&mut mode, Mode::Simple, "Simple");
            self.changer_mode(mode);

            ui.separator();

            let icone = match self.theme {
                Theme::Clair => "🌙",
                Theme::Sombre => "☀",
            };
            if ui.button(icone).on_hover_text("Thème clair / sombre").clicked() {
                self.basculer_theme();
            }

            if self.mode != Mode::Graphique {
                return;
            }

            ui.separator();

            if ui.button("+").on_hover_text("Zoom avant").clicked() {
                self.zoom_avant();
            }
            if ui.button("-").on_hover_text("Zoom arrière").clicked() {
                self.zoom_arriere();
            }
            if ui.button("🔄").on_hover_text("Réinitialiser le zoom").clicked() {
                self.reinitialiser_zoom();
            }

            ui.separator();

            let mut choix = None;
            egui::ComboBox::from_id_salt("graphes_magiques")
                .selected_text("✨ Graphes magiques")
                .width(260.0)
                .show_ui(ui, |ui| {
                    for (n, equation) in GRAPHES_MAGIQUES.iter().enumerate() {
                        if ui.selectable_label(false, *equation).clicked() {
                            choix = Some(n);
                        }
                    }
                });
            if let Some(n) = choix {
                self.graphe_magique(n);
            }

            ui.separator();

            if ui.button("Tout effacer").clicked() {
                self.tout_effacer();
            }
        });
    }

    /* ------------------------ Liste d’expressions ------------------------ */

    fn ui_expressions(&mut self, ui: &mut egui::Ui) {
        let maintenant = ui.input(|i| i.time);
        let actif = self.actif;
        let focus = std::mem::take(&mut self.focus_entree);
        let mut actions = Vec::new();

        for e in &mut self.expressions {
            ui.horizontal(|ui| {
                let (pastille, _) = ui.allocate_exact_size(egui::vec2(6.0, 22.0), egui::Sense::hover());
                ui.painter().rect_filled(pastille, 2.0, couleur(e.teinte));

                let resp = ui.add(
                    egui::TextEdit::singleline(&mut e.texte)
                        .id_salt(("expression", e.id))
                        .hint_text("y = x^2, z = sin(x)*cos(y), 2+2")
                        .desired_width(ui.available_width() - 28.0)
                        .code_editor(),
                );

                if focus && actif == Some(e.id) {
                    resp.request_focus();
                }
                if resp.gained_focus() {
                    actions.push(Action::Activer(e.id));
                }
                if resp.changed() {
                    actions.push(Action::Modifier(e.id));
                }
                // Enter : le champ perd le focus au moment de la validation
                if resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    actions.push(Action::Valider);
                }

                if ui.small_button("❌").on_hover_text("Retirer").clicked() {
                    actions.push(Action::Retirer(e.id));
                }
            });

            if !e.resume.is_empty() {
                ui.label(egui::RichText::new(&e.resume).small().weak());
            }
        }

        for action in actions {
            match action {
                Action::Activer(id) => self.actif = Some(id),
                Action::Modifier(id) => self.modifier_expression(id, maintenant),
                Action::Valider => self.valider(),
                Action::Retirer(id) => self.retirer_expression(id),
            }
        }

        ui.add_space(4.0);
        ui.horizontal(|ui| {
            if ui.button("+ Ajouter une expression").clicked() {
                self.ajouter_expression("");
            }
            if self.rebond.en_attente() {
                ui.add(egui::Spinner::new().size(14.0));
            }
        });
    }

    /* ------------------------ Pavé + fonctions ------------------------ */

    fn ui_clavier(&mut self, ui: &mut egui::Ui) {
        let maintenant = ui.input(|i| i.time);

        egui::Grid::new("pave_grapheur")
            .num_columns(5)
            .spacing([6.0, 6.0])
            .show(ui, |ui| {
                for ligne in PAVE {
                    for touche in ligne {
                        if ui.add_sized([46.0, 28.0], egui::Button::new(touche)).clicked() {
                            self.taper(touche, maintenant);
                        }
                    }
                    ui.end_row();
                }

                if ui.add_sized([46.0, 28.0], egui::Button::new("=")).clicked() {
                    self.taper("=", maintenant);
                }
                if ui.add_sized([46.0, 28.0], egui::Button::new("z")).clicked() {
                    self.taper("z", maintenant);
                }
                if ui.add_sized([46.0, 28.0], egui::Button::new(",")).clicked() {
                    self.taper(",", maintenant);
                }
                if ui
                    .add_sized([46.0, 28.0], egui::Button::new("DEL"))
                    .on_hover_text("Efface le dernier caractère")
                    .clicked()
                {
                    self.retour_arriere(maintenant);
                }
                if ui.add_sized([46.0, 28.0], egui::Button::new("OK")).clicked() {
                    self.valider();
                    self.focus_entree = true;
                }
                ui.end_row();
            });

        ui.add_space(6.0);
        ui.toggle_value(&mut self.fonctions_visibles, "f(x) Fonctions");

        if self.fonctions_visibles {
            ui.horizontal_wrapped(|ui| {
                for (libelle, texte) in FONCTIONS {
                    if ui.add_sized([46.0, 28.0], egui::Button::new(libelle)).clicked() {
                        self.taper(texte, maintenant);
                    }
                }
            });
        }
    }

    /* ------------------------ Graphe 2D ------------------------ */

    fn ui_graphe_2d(&mut self, ui: &mut egui::Ui) {
        let maintenant = ui.input(|i| i.time);
        let imposee = std::mem::take(&mut self.fenetre_imposee);
        let fenetre = self.fenetre;
        let traces = &self.traces;

        let reponse = Plot::new("graphe_2d")
            .legend(Legend::default().position(Corner::LeftTop))
            .x_axis_label("x")
            .y_axis_label("y")
            .show(ui, |plot_ui| {
                if imposee {
                    plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                        [fenetre.x.min, fenetre.y.min],
                        [fenetre.x.max, fenetre.y.max],
                    ));
                }

                for t in traces {
                    match t {
                        Trace::Horizontale { nom, teinte, y } => {
                            plot_ui.hline(
                                HLine::new(nom.as_str(), *y)
                                    .color(couleur(*teinte))
                                    .width(2.0)
                                    .style(LineStyle::dashed_loose()),
                            );
                        }
                        Trace::Ligne {
                            nom,
                            teinte,
                            segments,
                        } => {
                            // même nom => une seule entrée de légende
                            for segment in segments {
                                plot_ui.line(
                                    Line::new(nom.as_str(), PlotPoints::from(segment.clone()))
                                        .color(couleur(*teinte))
                                        .width(2.5),
                                );
                            }
                        }
                        Trace::Surface { .. } => {}
                    }
                }

                plot_ui.plot_bounds()
            });

        if !imposee {
            let b = reponse.inner;
            self.fenetre_observee(
                Fenetre {
                    x: Plage::new(b.min()[0], b.max()[0]),
                    y: Plage::new(b.min()[1], b.max()[1]),
                },
                maintenant,
            );
        }
    }

    /* ------------------------ Graphe 3D ------------------------ */

    fn ui_graphe_3d(&mut self, ui: &mut egui::Ui) {
        let surfaces: Vec<_> = self
            .traces
            .iter()
            .filter_map(|t| match t {
                Trace::Surface { surface, .. } => Some((t.nom(), surface)),
                _ => None,
            })
            .collect();

        if self.traces.len() > surfaces.len() {
            ui.label(
                egui::RichText::new("Vue 3D : les courbes et constantes sont masquées.")
                    .small()
                    .weak(),
            );
        }

        dessiner_surfaces(ui, &surfaces, &mut self.rotation);
    }

    /* ------------------------ Calculatrice simple ------------------------ */

    fn ui_simple(&mut self, ui: &mut egui::Ui) {
        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);

        ui.vertical_centered(|ui| {
            ui.set_max_width(320.0);

            ui.label(egui::RichText::new(&self.simple.historique).weak());
            Self::champ_monospace(ui, "ecran_simple", &self.simple.affichage, 1);

            ui.add_space(8.0);

            egui::Grid::new("pave_simple")
                .num_columns(4)
                .spacing([6.0, 6.0])
                .show(ui, |ui| {
                    if ui.add_sized([64.0, 40.0], egui::Button::new("C")).clicked() {
                        self.simple.effacer();
                    }
                    if ui.add_sized([64.0, 40.0], egui::Button::new("DEL")).clicked() {
                        self.simple.retour_arriere();
                    }
                    if ui.add_sized([64.0, 40.0], egui::Button::new("(")).clicked() {
                        self.simple.ajouter('(');
                    }
                    if ui.add_sized([64.0, 40.0], egui::Button::new(")")).clicked() {
                        self.simple.ajouter(')');
                    }
                    ui.end_row();

                    for ligne in PAVE_SIMPLE {
                        for c in ligne {
                            if ui.add_sized([64.0, 40.0], egui::Button::new(c.to_string())).clicked() {
                                self.simple.ajouter(c);
                            }
                        }
                        ui.end_row();
                    }
                });

            ui.add_space(6.0);
            if ui.add_sized([280.0, 40.0], egui::Button::new("=")).clicked() {
                self.simple.calculer();
            }
        });

        // Clavier physique : Enter calcule, Backspace efface
        let (entree, effacer) = ui.input(|i| {
            (
                i.key_pressed(egui::Key::Enter),
                i.key_pressed(egui::Key::Backspace),
            )
        });
        if entree {
            self.simple.calculer();
        }
        if effacer {
            self.simple.retour_arriere();
        }
        let texte: Vec<char> = ui.input(|i| {
            i.events
                .iter()
                .filter_map(|ev| match ev {
                    egui::Event::Text(t) => Some(t.chars().collect::<Vec<_>>()),
                    _ => None,
                })
                .flatten()
                .collect()
        });
        for c in texte {
            if c.is_ascii_digit() || "+-*/%.()".contains(c) {
                self.simple.ajouter(c);
            }
        }
    }

    fn champ_monospace(ui: &mut egui::Ui, id: &str, contenu: &str, rows: usize) {
        // Affichage lecture seule, cadre + label monospace (pas de TextEdit).
        egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .show(ui, |ui| {
                ui.push_id(id, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.set_min_height(
                        rows as f32 * ui.text_style_height(&egui::TextStyle::Heading),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(egui::RichText::new(contenu).monospace().heading());
                    });
                });
            });
    }
}

#[derive(Clone, Copy, Debug)]
enum Action {
    Activer(u64),
    Modifier(u64),
    Valider,
    Retirer(u64),
}
