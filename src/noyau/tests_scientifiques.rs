//! Tests scientifiques (campagne) : invariants numériques + robustesse + limites contrôlées.
//!
//! But : vérifier le moteur contre des identités connues, sans faire chauffer la machine.
//! - budget temps global
//! - tailles bornées (profondeur, longueur)
//!
//! Notes :
//! - Les comparaisons se font à epsilon près (f64), jamais à l’égalité stricte
//!   sauf quand la valeur est exactement représentable.
//! - Les racines sont détectées sur la grille de 401 points : on teste “proche de”, pas “égal à”.

use std::f64::consts::PI;
use std::time::{Duration, Instant};

use approx::assert_abs_diff_eq;

use super::classement::{classer, Classement};
use super::echantillonnage::{Courbe, Plage, Surface};
use super::eval::{compiler, evaluer};

fn eval_ok(expr: &str, x: f64) -> f64 {
    evaluer(expr, &[("x", x)]).unwrap_or_else(|e| panic!("expr={expr:?} x={x} err={e}"))
}

fn courbe(expr: &str) -> Courbe {
    match classer(expr, Plage::default()).map(|r| r.classement) {
        Some(Classement::Courbe2D(c)) => c,
        autre => panic!("expr={expr:?} : attendu Courbe2D, reçu {autre:?}"),
    }
}

fn surface(expr: &str) -> Surface {
    match classer(expr, Plage::default()).map(|r| r.classement) {
        Some(Classement::Surface3D(s)) => s,
        autre => panic!("expr={expr:?} : attendu Surface3D, reçu {autre:?}"),
    }
}

fn assert_racine_proche(c: &Courbe, attendue: f64) {
    assert!(
        c.racines.iter().any(|r| (r - attendue).abs() <= 0.1),
        "racine {attendue} absente de {:?}",
        c.racines
    );
}

/// Budget global anti-gel (scientifique + safe).
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Identités trigonométriques ------------------------ */

#[test]
fn sci_pythagore_trig_sur_la_grille() {
    let c = courbe("y = sin(x)^2 + cos(x)^2");
    for y in c.ys.iter().flatten() {
        assert_abs_diff_eq!(*y, 1.0, epsilon = 1e-12);
    }
    assert!(c.racines.is_empty());
}

#[test]
fn sci_symetries() {
    for &x in &[0.1, 0.7, 1.3, 2.9] {
        assert_abs_diff_eq!(eval_ok("sin(-x)", x), -eval_ok("sin(x)", x), epsilon = 1e-12);
        assert_abs_diff_eq!(eval_ok("cos(-x)", x), eval_ok("cos(x)", x), epsilon = 1e-12);
        assert_abs_diff_eq!(eval_ok("tan(x + pi)", x), eval_ok("tan(x)", x), epsilon = 1e-9);
    }
}

#[test]
fn sci_periodicite() {
    for &x in &[-3.0, -0.5, 0.25, 4.0] {
        assert_abs_diff_eq!(eval_ok("sin(x + 2pi)", x), eval_ok("sin(x)", x), epsilon = 1e-12);
    }
}

/* ------------------------ Exp / log ------------------------ */

#[test]
fn sci_exp_log_reciproques() {
    for &x in &[0.5, 1.0, 2.0, 10.0] {
        assert_abs_diff_eq!(eval_ok("exp(log(x))", x), x, epsilon = 1e-12);
        assert_abs_diff_eq!(eval_ok("log10(10^x)", x), x, epsilon = 1e-12);
    }
}

#[test]
fn sci_log_hors_domaine_manquant() {
    let c = courbe("y = log(x)");
    // x <= 0 : indéfini => manquant ; x > 0 : présent
    for (x, y) in c.xs.iter().zip(&c.ys) {
        assert_eq!(y.is_some(), *x > 0.0, "x={x}");
    }
    assert_racine_proche(&c, 1.0);
    assert_eq!(c.ordonnee_origine, None);
}

/* ------------------------ Racines connues ------------------------ */

#[test]
fn sci_racines_polynome_cubique() {
    // (x+3)(x-1)(x-5) : racines -3, 1, 5
    let c = courbe("y = (x+3)(x-1)(x-5)");
    assert_racine_proche(&c, -3.0);
    assert_racine_proche(&c, 1.0);
    assert_racine_proche(&c, 5.0);
    assert_eq!(c.racines.len(), 3);
    assert_abs_diff_eq!(c.ordonnee_origine.unwrap(), 15.0, epsilon = 1e-12);
}

#[test]
fn sci_racines_sinus() {
    // sin s’annule en kπ ; sur [-15, 15] : k = -4..4
    let c = courbe("y = sin(x)");
    assert_eq!(c.racines.len(), 9);
    for k in -4..=4 {
        assert_racine_proche(&c, k as f64 * PI);
    }
}

#[test]
fn sci_pas_de_racine_sans_changement_de_signe() {
    let c = courbe("y = x^2 + 1");
    assert!(c.racines.is_empty());
    // tangente en 0 sans traverser : x^2 touche 0 exactement en x=0 (échantillon exact)
    let c = courbe("y = x^2");
    assert_eq!(c.racines, vec![0.0]);
}

/* ------------------------ Surfaces ------------------------ */

#[test]
fn sci_surface_paraboloide() {
    let s = surface("z = x^2 + y^2");
    assert_eq!(s.z[20][20], Some(0.0));
    assert_eq!(s.etendue_z(), Some((0.0, 200.0)));
}

#[test]
fn sci_surface_selle_antisymetrique() {
    // x^3 - 3xy^2 : f(-x, -y) = -f(x, y)
    let s = surface("z = x^3 - 3*x*y^2");
    let n = s.axe.len();
    for i in 0..n {
        for j in 0..n {
            let a = s.z[i][j].unwrap();
            let b = s.z[n - 1 - i][n - 1 - j].unwrap();
            assert_abs_diff_eq!(a, -b, epsilon = 1e-9);
        }
    }
}

/* ------------------------ Stress contrôlé (sans brûler) ------------------------ */

#[test]
fn sci_stress_profondeur_parentheses() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    let mut expr = "x".to_string();
    for _ in 0..200 {
        expr = format!("({expr})");
        budget(t0, max);
    }
    assert_eq!(eval_ok(&expr, 3.0), 3.0);
}

#[test]
fn sci_stress_somme_longue() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    let expr = vec!["x"; 500].join(" + ");
    let p = compiler(&expr).unwrap();
    budget(t0, max);
    assert_eq!(p.evaluer(&[("x", 0.5)]), Ok(250.0));
}

#[test]
fn sci_stress_passes_completes() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    for expr in [
        "z = sin(sqrt(x^2 + y^2))",
        "z = exp(-(x^2+y^2)/10)*5",
        "y = sin(x) + sin(2*x)/2 + sin(3*x)/3",
    ] {
        assert!(classer(expr, Plage::default()).is_some());
        budget(t0, max);
    }
}
