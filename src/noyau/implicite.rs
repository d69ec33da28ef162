// src/noyau/implicite.rs
//
// Multiplication implicite : insère `*` là où la notation l’omet.
//   2x      -> 2 * x
//   2(x+1)  -> 2 * (x+1)
//   (a)(b)  -> (a) * (b)
//   x(x+1)  -> x * (x+1)   (x n’est pas une fonction)
//   2 sin(x)-> 2 * sin(x)
//   2√9     -> 2 * √9
//
// Exception : fonction connue suivie de '(' = appel, pas un produit.
// Un nom inconnu suivi de '(' (ni fonction, ni variable, ni constante)
// est refusé avant l’insertion : "foo(2)" n’est pas "foo * 2".

use super::erreur::{ErreurEval, ResultatEval};
use super::fonctions::{nom_liable, Fonction};
use super::jetons::Tok;

fn est_fonction(t: &Tok) -> bool {
    matches!(t, Tok::Ident(nom) if Fonction::depuis_nom(nom).is_some())
}

fn doit_inserer(courant: &Tok, suivant: &Tok) -> bool {
    // un nom de fonction n’est jamais le facteur de gauche
    if est_fonction(courant) {
        return false;
    }

    match (courant, suivant) {
        (Tok::Num(_), Tok::Num(_)) => false,
        (Tok::Num(_) | Tok::Ident(_) | Tok::RPar, Tok::Ident(_) | Tok::LPar | Tok::Racine) => true,
        (Tok::Ident(_) | Tok::RPar, Tok::Num(_)) => true,
        _ => false,
    }
}

/// Refuse `nom(` quand `nom` n’est ni une fonction du registre ni un nom liable.
pub fn verifier_appels(tokens: &[Tok]) -> ResultatEval<()> {
    for paire in tokens.windows(2) {
        if let [Tok::Ident(nom), Tok::LPar] = paire {
            if Fonction::depuis_nom(nom).is_none() && !nom_liable(nom) {
                return Err(ErreurEval::FonctionInconnue(nom.clone()));
            }
        }
    }
    Ok(())
}

/// Retourne les jetons avec les `*` implicites insérés.
pub fn inserer_multiplications(tokens: Vec<Tok>) -> Vec<Tok> {
    let mut out = Vec::with_capacity(tokens.len() + tokens.len() / 2);
    let mut iter = tokens.into_iter().peekable();

    while let Some(t) = iter.next() {
        let inserer = iter.peek().is_some_and(|s| doit_inserer(&t, s));
        out.push(t);
        if inserer {
            out.push(Tok::Star);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noyau::jetons::{format_tokens, tokenize};

    fn avec_mult(s: &str) -> String {
        format_tokens(&inserer_multiplications(tokenize(s).unwrap()))
    }

    #[test]
    fn nombre_variable() {
        assert_eq!(avec_mult("2x"), "2 * x");
        assert_eq!(avec_mult("3pi"), "3 * pi");
    }

    #[test]
    fn parentheses() {
        assert_eq!(avec_mult("2(x+1)"), "2 * ( x + 1 )");
        assert_eq!(avec_mult("(x+1)(x-1)"), "( x + 1 ) * ( x - 1 )");
        assert_eq!(avec_mult("(x)2"), "( x ) * 2");
    }

    #[test]
    fn appel_de_fonction_preserve() {
        assert_eq!(avec_mult("sin(x)"), "sin ( x )");
        assert_eq!(avec_mult("2sin(x)"), "2 * sin ( x )");
        assert_eq!(avec_mult("x sin(x)"), "x * sin ( x )");
    }

    #[test]
    fn variable_suivie_de_parenthese() {
        assert_eq!(avec_mult("x(x+1)"), "x * ( x + 1 )");
    }

    #[test]
    fn racine_prefixe() {
        assert_eq!(avec_mult("2√9"), "2 * √ 9");
        assert_eq!(avec_mult("x√x"), "x * √ x");
        assert_eq!(avec_mult("√x"), "√ x");
    }

    #[test]
    fn nom_inconnu_devant_parenthese() {
        let t = tokenize("foo(2)").unwrap();
        assert_eq!(verifier_appels(&t), Err(ErreurEval::FonctionInconnue("foo".into())));
        // variables et constantes restent des facteurs
        for s in ["x(x+1)", "pi(2)", "e(x)", "sin(x)", "foo + (2)"] {
            assert_eq!(verifier_appels(&tokenize(s).unwrap()), Ok(()), "{s}");
        }
    }

    #[test]
    fn operateurs_inchanges() {
        assert_eq!(avec_mult("x^2-4"), "x ^ 2 - 4");
    }
}
