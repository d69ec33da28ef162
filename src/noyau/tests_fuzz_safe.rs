//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler le classement sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - profondeur bornée
//! - budget temps global
//! - invariants clés : classer() ne panique jamais, est idempotent,
//!   et toute valeur échantillonnée présente est finie.

use std::time::{Duration, Instant};

use super::classement::{classer, Classement};
use super::echantillonnage::{Plage, NB_ECHANTILLONS_2D};
use super::eval::compiler;

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Invariants ------------------------ */

fn check_invariants(expr: &str) {
    let a = classer(expr, Plage::default());
    let b = classer(expr, Plage::default());
    assert_eq!(a, b, "non idempotent: expr={expr:?}");

    match a.map(|r| r.classement) {
        None => assert!(expr.trim().is_empty(), "None pour expr non vide: {expr:?}"),
        Some(Classement::Constante { texte, .. }) => {
            assert!(!texte.is_empty(), "constante sans texte: {expr:?}");
        }
        Some(Classement::Courbe2D(c)) => {
            assert_eq!(c.xs.len(), NB_ECHANTILLONS_2D);
            assert_eq!(c.ys.len(), NB_ECHANTILLONS_2D);
            assert!(c.ys.iter().flatten().all(|y| y.is_finite()), "expr={expr:?}");
            for (i, r) in c.racines.iter().enumerate() {
                assert!(!c.racines[..i].contains(r), "doublon de racine {r}: {expr:?}");
            }
        }
        Some(Classement::Surface3D(s)) => {
            assert_eq!(s.z.len(), 41);
            assert!(s.z.iter().flatten().flatten().all(|z| z.is_finite()), "expr={expr:?}");
        }
    }
}

/* ------------------------ Génération d’expressions (bornée) ------------------------ */

fn gen_nombre(rng: &mut Rng) -> String {
    // inclut 0 (utile pour tester divisions et racines)
    let a = rng.pick(8);
    if rng.coin() {
        format!("{a}")
    } else {
        format!("{a}.{}", rng.pick(10))
    }
}

fn gen_atom(rng: &mut Rng) -> String {
    match rng.pick(6) {
        0 | 1 => gen_nombre(rng),
        2 => "x".to_string(),
        3 => "y".to_string(),
        4 => "pi".to_string(),
        _ => "e".to_string(),
    }
}

fn gen_expr(rng: &mut Rng, depth: usize) -> String {
    if depth == 0 {
        return gen_atom(rng);
    }

    match rng.pick(10) {
        0 => gen_atom(rng),
        1 => format!("({}+{})", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        2 => format!("({}-{})", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        3 => format!("({}*{})", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        4 => format!("({}/{})", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        5 => format!("{}^{}", gen_atom(rng), rng.pick(4)),
        6 => format!("sin({})", gen_expr(rng, depth - 1)),
        7 => format!("sqrt({})", gen_expr(rng, depth - 1)),
        8 => format!("log({})", gen_expr(rng, depth - 1)),
        _ => format!("tan({})", gen_expr(rng, depth - 1)),
    }
}

fn gen_prefixe(rng: &mut Rng) -> &'static str {
    match rng.pick(4) {
        0 => "y=",
        1 => "z = ",
        _ => "",
    }
}

/// Bruit : caractères arbitraires (doit dégrader, jamais paniquer).
fn gen_bruit(rng: &mut Rng) -> String {
    const ALPHABET: &[char] = &[
        'x', 'y', 'z', '=', '(', ')', '+', '-', '*', '/', '^', '%', ',', '.', '1', '0', 'e', 's',
        'i', 'n', ' ', 'π', '√', '#', 'é',
    ];
    let n = rng.pick(12) as usize;
    (0..n)
        .map(|_| ALPHABET[rng.pick(ALPHABET.len() as u32) as usize])
        .collect()
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_expressions_generees() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    // Même seed => mêmes expressions => mêmes sorties (déterminisme)
    let mut rng = Rng::new(0xC0FFEE_u64);

    let mut courbes = 0usize;
    let mut surfaces = 0usize;

    for _ in 0..120 {
        budget(t0, max);

        let expr = format!("{}{}", gen_prefixe(&mut rng), gen_expr(&mut rng, 4));
        check_invariants(&expr);

        match classer(&expr, Plage::default()).map(|r| r.classement) {
            Some(Classement::Courbe2D(_)) => courbes += 1,
            Some(Classement::Surface3D(_)) => surfaces += 1,
            _ => {}
        }
    }

    // On veut voir un mix des deux, sinon le fuzz ne “balaye” rien.
    assert!(courbes > 5, "trop peu de courbes: {courbes}");
    assert!(surfaces > 5, "trop peu de surfaces: {surfaces}");
}

#[test]
fn fuzz_safe_bruit_arbitraire() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    let mut rng = Rng::new(0xBADC0DE_u64);

    for _ in 0..300 {
        budget(t0, max);
        let expr = gen_bruit(&mut rng);
        check_invariants(&expr);
        // la compilation seule ne panique pas non plus
        let _ = compiler(&expr);
    }
}

#[test]
fn fuzz_safe_plages_degenerees() {
    let mut rng = Rng::new(0x5EED_u64);

    for plage in [
        Plage::new(0.0, 0.0),
        Plage::new(5.0, -5.0),
        Plage::new(-1e300, 1e300),
        Plage::new(f64::NAN, 1.0),
    ] {
        let expr = gen_expr(&mut rng, 3);
        // ne panique pas, toujours 401 points
        if let Some(Classement::Courbe2D(c)) = classer(&format!("y={expr}"), plage).map(|r| r.classement) {
            assert_eq!(c.xs.len(), NB_ECHANTILLONS_2D);
        }
    }
}
