//! src/app/surface.rs
//!
//! Vue 3D des surfaces z = f(x, y) : projection 3D -> 2D au painter egui.
//!
//! - grille du noyau ramenée dans le cube [-1, 1]³ (z normalisé sur l’étendue commune)
//! - une facette par maille complète (4 coins définis), triées de l’arrière vers l’avant
//! - couleur viridis selon la hauteur, opacité 0.8
//! - glisser = rotation

use eframe::egui::{self, Color32, Pos2, Rect, Sense, Shape, Stroke};

use crate::noyau::echantillonnage::Surface;

/// Opacité des facettes.
pub const OPACITE: f32 = 0.8;

/// Demi-hauteur de la surface dans le cube de dessin.
const ECHELLE_Z: f32 = 0.7;

/// Radians par pixel glissé.
const SENSIBILITE_ROTATION: f32 = 0.008;

/// Palette viridis (5 repères, interpolation linéaire).
const VIRIDIS: [[u8; 3]; 5] = [
    [68, 1, 84],
    [59, 82, 139],
    [33, 145, 140],
    [94, 201, 98],
    [253, 231, 37],
];

/* ------------------------ Géométrie pure ------------------------ */

/// Rotation [autour de l’axe vertical, inclinaison] puis projection orthographique.
/// Renvoie le point écran et la profondeur (plus grand = plus proche).
pub fn projeter(p: [f32; 3], rot: [f32; 2], rect: Rect) -> (Pos2, f32) {
    let (sx, cx) = rot[1].sin_cos();
    let (sy, cy) = rot[0].sin_cos();
    let x = p[0] * cy + p[2] * sy;
    let y = p[0] * sx * sy + p[1] * cx - p[2] * sx * cy;
    let z = -p[0] * cx * sy + p[1] * sx + p[2] * cx * cy;
    let taille = rect.width().min(rect.height()) * 0.36;
    let c = rect.center();
    (egui::pos2(c.x + x * taille, c.y - y * taille), z)
}

/// t dans [0, 1] -> couleur viridis.
pub fn viridis(t: f32) -> Color32 {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let pos = t * (VIRIDIS.len() - 1) as f32;
    let i = (pos.floor() as usize).min(VIRIDIS.len() - 2);
    let f = pos - i as f32;
    let [a, b] = [VIRIDIS[i], VIRIDIS[i + 1]];
    let mix = |k: usize| (a[k] as f32 + (b[k] as f32 - a[k] as f32) * f).round() as u8;
    Color32::from_rgb(mix(0), mix(1), mix(2))
}

/// Ramène v dans [0, 1] sur l’étendue (lo, hi). Étendue plate : milieu.
pub fn normaliser(v: f64, (lo, hi): (f64, f64)) -> f32 {
    if hi > lo {
        ((v - lo) / (hi - lo)).clamp(0.0, 1.0) as f32
    } else {
        0.5
    }
}

/// Étendue z commune à plusieurs surfaces.
pub fn etendue_commune<'a>(surfaces: impl IntoIterator<Item = &'a Surface>) -> Option<(f64, f64)> {
    surfaces
        .into_iter()
        .filter_map(Surface::etendue_z)
        .reduce(|(a, b), (c, d)| (a.min(c), b.max(d)))
}

/// Maille de la grille dans le cube de dessin, avec sa hauteur normalisée moyenne.
#[derive(Clone, Debug, PartialEq)]
pub struct Facette {
    pub coins: [[f32; 3]; 4],
    pub t: f32,
}

pub fn facettes(surface: &Surface, etendue: (f64, f64)) -> Vec<Facette> {
    let n = surface.axe.len();
    if n < 2 {
        return Vec::new();
    }
    let borne = surface
        .axe
        .iter()
        .fold(0.0_f64, |m, v| m.max(v.abs()))
        .max(f64::EPSILON);

    let point = |i: usize, j: usize, t: f32| -> [f32; 3] {
        [
            (surface.axe[j] / borne) as f32,
            (t * 2.0 - 1.0) * ECHELLE_Z,
            -(surface.axe[i] / borne) as f32,
        ]
    };
    let hauteur = |i: usize, j: usize| -> Option<f32> {
        surface.z.get(i)?.get(j).copied().flatten().map(|z| normaliser(z, etendue))
    };

    let mut out = Vec::with_capacity((n - 1) * (n - 1));
    for i in 0..n - 1 {
        for j in 0..n - 1 {
            let (Some(a), Some(b), Some(c), Some(d)) = (
                hauteur(i, j),
                hauteur(i, j + 1),
                hauteur(i + 1, j + 1),
                hauteur(i + 1, j),
            ) else {
                continue;
            };
            out.push(Facette {
                coins: [point(i, j, a), point(i, j + 1, b), point(i + 1, j + 1, c), point(i + 1, j, d)],
                t: (a + b + c + d) / 4.0,
            });
        }
    }
    out
}

/* ------------------------ Dessin ------------------------ */

/// Occupe toute la place disponible ; met à jour `rotation` au glisser.
pub fn dessiner_surfaces(ui: &mut egui::Ui, surfaces: &[(&str, &Surface)], rotation: &mut [f32; 2]) {
    let (reponse, painter) = ui.allocate_painter(ui.available_size(), Sense::drag());
    let rect = reponse.rect;

    if reponse.dragged() {
        let delta = reponse.drag_delta();
        rotation[0] += delta.x * SENSIBILITE_ROTATION;
        rotation[1] += delta.y * SENSIBILITE_ROTATION;
    }
    let rot = *rotation;

    painter.rect_filled(rect, 0.0, ui.visuals().extreme_bg_color);

    let Some(etendue) = etendue_commune(surfaces.iter().map(|(_, s)| *s)) else {
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            "Aucun point défini",
            egui::FontId::proportional(16.0),
            ui.visuals().weak_text_color(),
        );
        return;
    };

    let mut polygones: Vec<(f32, Vec<Pos2>, Color32)> = Vec::new();
    for (_, s) in surfaces {
        for f in facettes(s, etendue) {
            let mut profondeur = 0.0;
            let pts: Vec<Pos2> = f
                .coins
                .iter()
                .map(|c| {
                    let (p, z) = projeter(*c, rot, rect);
                    profondeur += z;
                    p
                })
                .collect();
            polygones.push((profondeur / 4.0, pts, viridis(f.t).gamma_multiply(OPACITE)));
        }
    }

    // de l’arrière vers l’avant
    polygones.sort_by(|a, b| a.0.total_cmp(&b.0));

    let contour = Stroke::new(0.3, Color32::from_black_alpha(40));
    for (_, pts, couleur) in polygones {
        painter.add(Shape::convex_polygon(pts, couleur, contour));
    }

    dessiner_axes(&painter, rect, rot, ui.visuals().text_color());

    // légende
    let mut y = rect.top() + 8.0;
    for (nom, _) in surfaces {
        painter.text(
            egui::pos2(rect.left() + 8.0, y),
            egui::Align2::LEFT_TOP,
            *nom,
            egui::FontId::proportional(14.0),
            ui.visuals().text_color(),
        );
        y += 18.0;
    }

    reponse.on_hover_text("Glisser pour tourner");
}

fn dessiner_axes(painter: &egui::Painter, rect: Rect, rot: [f32; 2], couleur: Color32) {
    let axes: [([f32; 3], &str); 3] = [([1.15, 0.0, 0.0], "x"), ([0.0, 0.0, -1.15], "y"), ([0.0, 1.0, 0.0], "z")];
    let (origine, _) = projeter([0.0, 0.0, 0.0], rot, rect);
    for (bout, nom) in axes {
        let (p, _) = projeter(bout, rot, rect);
        painter.line_segment([origine, p], Stroke::new(1.0, couleur.gamma_multiply(0.6)));
        painter.text(p, egui::Align2::CENTER_CENTER, nom, egui::FontId::monospace(13.0), couleur);
    }
}
