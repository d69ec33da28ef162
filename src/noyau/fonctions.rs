// src/noyau/fonctions.rs
//
// Registre des fonctions et constantes connues du moteur.
// Une fonction est résolue par son nom à la compilation (arité vérifiée une fois),
// puis appliquée sur la pile à chaque évaluation.

use std::f64::consts;

use super::erreur::{ErreurEval, ResultatEval};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fonction {
    Sin,
    Cos,
    Tan,
    Sec,
    Csc,
    Cot,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Asinh,
    Acosh,
    Atanh,
    Sqrt,
    Cbrt,
    Exp,
    /// log(x) = ln(x), log(x, b) = logarithme en base b
    Log,
    Ln,
    Log10,
    Log2,
    Abs,
    Floor,
    Ceil,
    Round,
    Sign,
    Pow,
    Atan2,
    NthRoot,
    Mod,
    Min,
    Max,
}

/// Nombre d’arguments accepté.
#[derive(Clone, Copy, Debug)]
enum Arite {
    Exacte(usize),
    Entre(usize, usize),
    AuMoins(usize),
}

impl Arite {
    fn accepte(self, n: usize) -> bool {
        match self {
            Arite::Exacte(k) => n == k,
            Arite::Entre(a, b) => (a..=b).contains(&n),
            Arite::AuMoins(k) => n >= k,
        }
    }

    fn texte(self) -> &'static str {
        match self {
            Arite::Exacte(1) => "1",
            Arite::Exacte(2) => "2",
            Arite::Entre(1, 2) => "1 ou 2",
            Arite::AuMoins(1) => "au moins 1",
            _ => "?",
        }
    }
}

impl Fonction {
    /// Résout un identifiant en fonction (None si ce n’est pas une fonction connue).
    pub fn depuis_nom(nom: &str) -> Option<Fonction> {
        use Fonction::*;
        let f = match nom {
            "sin" => Sin,
            "cos" => Cos,
            "tan" => Tan,
            "sec" => Sec,
            "csc" => Csc,
            "cot" => Cot,
            "asin" => Asin,
            "acos" => Acos,
            "atan" => Atan,
            "sinh" => Sinh,
            "cosh" => Cosh,
            "tanh" => Tanh,
            "asinh" => Asinh,
            "acosh" => Acosh,
            "atanh" => Atanh,
            "sqrt" => Sqrt,
            "cbrt" => Cbrt,
            "exp" => Exp,
            "log" => Log,
            "ln" => Ln,
            "log10" => Log10,
            "log2" => Log2,
            "abs" => Abs,
            "floor" => Floor,
            "ceil" => Ceil,
            "round" => Round,
            "sign" => Sign,
            "pow" => Pow,
            "atan2" => Atan2,
            "nthroot" => NthRoot,
            "mod" => Mod,
            "min" => Min,
            "max" => Max,
            _ => return None,
        };
        Some(f)
    }

    pub fn nom(self) -> &'static str {
        use Fonction::*;
        match self {
            Sin => "sin",
            Cos => "cos",
            Tan => "tan",
            Sec => "sec",
            Csc => "csc",
            Cot => "cot",
            Asin => "asin",
            Acos => "acos",
            Atan => "atan",
            Sinh => "sinh",
            Cosh => "cosh",
            Tanh => "tanh",
            Asinh => "asinh",
            Acosh => "acosh",
            Atanh => "atanh",
            Sqrt => "sqrt",
            Cbrt => "cbrt",
            Exp => "exp",
            Log => "log",
            Ln => "ln",
            Log10 => "log10",
            Log2 => "log2",
            Abs => "abs",
            Floor => "floor",
            Ceil => "ceil",
            Round => "round",
            Sign => "sign",
            Pow => "pow",
            Atan2 => "atan2",
            NthRoot => "nthroot",
            Mod => "mod",
            Min => "min",
            Max => "max",
        }
    }

    fn arite(self) -> Arite {
        use Fonction::*;
        match self {
            Log => Arite::Entre(1, 2),
            Pow | Atan2 | NthRoot | Mod => Arite::Exacte(2),
            Min | Max => Arite::AuMoins(1),
            _ => Arite::Exacte(1),
        }
    }

    /// Vérifie l’arité à la compilation.
    pub fn verifier_arite(self, n: usize) -> ResultatEval<()> {
        let a = self.arite();
        if a.accepte(n) {
            Ok(())
        } else {
            Err(ErreurEval::Arite {
                nom: self.nom(),
                attendu: a.texte(),
                recu: n,
            })
        }
    }

    /// Applique la fonction. `args` a déjà la bonne longueur (vérifiée à la compilation).
    /// Hors domaine => NaN (le point sera simplement manquant au tracé).
    pub fn appliquer(self, args: &[f64]) -> f64 {
        use Fonction::*;
        let a = args.first().copied().unwrap_or(f64::NAN);
        let b = args.get(1).copied().unwrap_or(f64::NAN);
        match self {
            Sin => a.sin(),
            Cos => a.cos(),
            Tan => a.tan(),
            Sec => 1.0 / a.cos(),
            Csc => 1.0 / a.sin(),
            Cot => 1.0 / a.tan(),
            Asin => a.asin(),
            Acos => a.acos(),
            Atan => a.atan(),
            Sinh => a.sinh(),
            Cosh => a.cosh(),
            Tanh => a.tanh(),
            Asinh => a.asinh(),
            Acosh => a.acosh(),
            Atanh => a.atanh(),
            Sqrt => a.sqrt(),
            Cbrt => a.cbrt(),
            Exp => a.exp(),
            Log if args.len() == 2 => a.ln() / b.ln(),
            Log | Ln => a.ln(),
            Log10 => a.log10(),
            Log2 => a.log2(),
            Abs => a.abs(),
            Floor => a.floor(),
            Ceil => a.ceil(),
            Round => a.round(),
            Sign => {
                if a.is_nan() || a == 0.0 {
                    a
                } else {
                    a.signum()
                }
            }
            Pow => puissance(a, b),
            Atan2 => a.atan2(b),
            NthRoot => racine_n(a, b),
            Mod => modulo(a, b),
            Min => args.iter().copied().fold(f64::INFINITY, f64::min),
            Max => args.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

/// Variables que le grapheur lie (x, y en 2D/3D ; z réservé au préfixe).
pub const VARIABLES: [&str; 3] = ["x", "y", "z"];

/// Nom utilisable comme facteur devant '(' : variable ou constante, jamais une fonction.
pub fn nom_liable(nom: &str) -> bool {
    VARIABLES.contains(&nom) || constante(nom).is_some()
}

/// Constantes prédéfinies (masquées par les liaisons de l’appelant).
pub fn constante(nom: &str) -> Option<f64> {
    match nom {
        "pi" => Some(consts::PI),
        "e" => Some(consts::E),
        "tau" => Some(consts::TAU),
        "phi" => Some(1.618_033_988_749_895),
        "infinity" => Some(f64::INFINITY),
        _ => None,
    }
}

/// a^b réel : base négative + exposant fractionnaire à dénominateur impair => racine réelle.
/// Ex: (-8)^(1/3) = -2 (sinon NaN, comme en réel strict).
pub fn puissance(a: f64, b: f64) -> f64 {
    let r = a.powf(b);
    if r.is_nan() && a < 0.0 && b.is_finite() && b != 0.0 {
        let inv = 1.0 / b;
        let n = inv.round();
        if (inv - n).abs() < 1e-9 && (n as i64) % 2 != 0 {
            return -(-a).powf(b);
        }
    }
    r
}

/// Racine n-ième réelle (n impair accepte une base négative).
fn racine_n(a: f64, n: f64) -> f64 {
    if n == 0.0 || n.is_nan() {
        return f64::NAN;
    }
    if a < 0.0 {
        if n.fract() == 0.0 && (n as i64) % 2 != 0 {
            return -(-a).powf(1.0 / n);
        }
        return f64::NAN;
    }
    a.powf(1.0 / n)
}

/// Modulo “plancher” : le résultat a le signe du diviseur (x mod 0 = x).
pub fn modulo(a: f64, b: f64) -> f64 {
    if b == 0.0 {
        return a;
    }
    a - b * (a / b).floor()
}
