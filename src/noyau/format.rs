// src/noyau/format.rs

/// Formatage numérique à précision configurable (chiffres significatifs)
/// avec seuils de notation scientifique.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FormatNombre {
    /// Chiffres significatifs (>= 1).
    pub precision: usize,
    /// Exposant décimal minimal affiché en notation fixe.
    pub exp_bas: i32,
    /// Exposant décimal à partir duquel on passe en notation scientifique.
    pub exp_haut: i32,
}

/// Résultat d’une expression constante : 5 chiffres, scientifique hors [1e-9, 1e9).
pub const FORMAT_CONSTANTE: FormatNombre = FormatNombre {
    precision: 5,
    exp_bas: -9,
    exp_haut: 9,
};

/// Calculatrice simple : 14 chiffres (masque le bruit binaire type 0.1+0.2).
pub const FORMAT_SIMPLE: FormatNombre = FormatNombre {
    precision: 14,
    exp_bas: -7,
    exp_haut: 21,
};

/* ------------------------ Helpers texte ------------------------ */

/// "1.2300" -> "1.23" ; "100.000" -> "100" ; "100" inchangé.
fn retirer_zeros(s: &str) -> &str {
    if !s.contains('.') {
        return s;
    }
    s.trim_end_matches('0').trim_end_matches('.')
}

impl FormatNombre {
    pub fn formater(&self, v: f64) -> String {
        if v.is_nan() {
            return "NaN".to_string();
        }
        if v.is_infinite() {
            return if v > 0.0 {
                "Infinity".to_string()
            } else {
                "-Infinity".to_string()
            };
        }
        if v == 0.0 {
            return "0".to_string();
        }

        let precision = self.precision.max(1);

        // Arrondi aux chiffres significatifs via la notation scientifique de Rust ("1.2346e9").
        let sci = format!("{:.*e}", precision - 1, v);
        let (mantisse, exp) = match sci.split_once('e') {
            Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
            None => (sci.as_str(), 0),
        };

        if exp < self.exp_bas || exp >= self.exp_haut {
            let signe = if exp < 0 { '-' } else { '+' };
            return format!("{}e{signe}{}", retirer_zeros(mantisse), exp.abs());
        }

        // Notation fixe à partir de la valeur déjà arrondie.
        let arrondie: f64 = sci.parse().unwrap_or(v);
        let decimales = (precision as i32 - 1 - exp).max(0) as usize;
        let fixe = format!("{:.*}", decimales, arrondie);
        retirer_zeros(&fixe).to_string()
    }
}

/// Arrondi à `n` décimales (−0 normalisé en 0).
pub fn arrondi(v: f64, n: i32) -> f64 {
    let f = 10f64.powi(n);
    let r = (v * f).round() / f;
    if r == 0.0 {
        0.0
    } else {
        r
    }
}

/// Affichage court d’une valeur arrondie à 2 décimales (racines, f(0)).
pub fn format_arrondi(v: f64) -> String {
    format!("{}", arrondi(v, 2))
}
