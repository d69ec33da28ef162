// src/noyau/rpn.rs
//
// Shunting-yard -> RPN (programme postfixé pour la machine à pile)
// Objectif:
// - Convertir une suite de Tok en instructions postfixées
// - Détecter tôt les formes invalides ("2+", "(3", "*4", "2 3")
//
// Règles:
// - Ident(name) suivi de '(' et name ∈ registre => appel de fonction (n arguments séparés par ',')
// - Ident(name) sinon => chargement (variable liée ou constante prédéfinie)
// - Moins unaire: opérateur préfixe Neg, plus fort que * / mais plus faible que ^
//     -x^2 = -(x^2)     2^-1 = 0.5
// - '+' unaire: ignoré
// - √ préfixe: même rang que Neg (√4+1 = 3, √x^2 = √(x^2))

use super::erreur::{ErreurEval, ResultatEval};
use super::fonctions::Fonction;
use super::jetons::Tok;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpBin {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

/// Instruction de la machine à pile.
#[derive(Clone, Debug, PartialEq)]
pub enum Instr {
    Nombre(f64),
    Charger(String),
    Neg,
    Binaire(OpBin),
    Appel(Fonction, usize),
}

/// Élément de la pile d’opérateurs.
#[derive(Clone, Copy, Debug)]
enum Op {
    Bin(OpBin),
    Neg,
    Racine,
    LPar,
    Fonction(Fonction),
}

fn precedence(op: Op) -> i32 {
    match op {
        Op::Bin(OpBin::Add | OpBin::Sub) => 1,
        Op::Bin(OpBin::Mul | OpBin::Div | OpBin::Mod) => 2,
        Op::Neg | Op::Racine => 3,
        Op::Bin(OpBin::Pow) => 4,
        Op::LPar | Op::Fonction(_) => 0,
    }
}

fn is_right_associative(op: OpBin) -> bool {
    matches!(op, OpBin::Pow)
}

fn vers_instr(op: Op) -> Option<Instr> {
    match op {
        Op::Bin(b) => Some(Instr::Binaire(b)),
        Op::Neg => Some(Instr::Neg),
        Op::Racine => Some(Instr::Appel(Fonction::Sqrt, 1)),
        Op::LPar | Op::Fonction(_) => None,
    }
}

/// Dépile les opérateurs qui doivent sortir avant `nouveau`.
fn depiler_pour(ops: &mut Vec<Op>, out: &mut Vec<Instr>, nouveau: OpBin) {
    let p_tok = precedence(Op::Bin(nouveau));
    while let Some(&top) = ops.last() {
        if matches!(top, Op::LPar | Op::Fonction(_)) {
            break;
        }
        let p_top = precedence(top);
        let doit_pop = if is_right_associative(nouveau) {
            p_top > p_tok
        } else {
            p_top >= p_tok
        };
        if !doit_pop {
            break;
        }
        ops.pop();
        if let Some(i) = vers_instr(top) {
            out.push(i);
        }
    }
}

/// Convertit une suite de jetons en programme postfixé.
///
/// Exemple:
///   tokens: [Ident("sin"), LPar, Ident("pi"), Slash, Num(2), RPar]
///   rpn:    [Charger("pi"), Nombre(2), Binaire(Div), Appel(Sin, 1)]
pub fn to_rpn(tokens: &[Tok]) -> ResultatEval<Vec<Instr>> {
    if tokens.is_empty() {
        return Err(ErreurEval::Vide);
    }

    let mut out: Vec<Instr> = Vec::with_capacity(tokens.len());
    let mut ops: Vec<Op> = Vec::new();
    // un compteur d’arguments par appel de fonction ouvert
    let mut args: Vec<usize> = Vec::new();

    // “valeur” = un atome ou une expression fermée.
    // Sert à détecter le moins unaire et les juxtapositions invalides.
    let mut prev_was_value = false;

    for (i, tok) in tokens.iter().enumerate() {
        let debut_valeur = matches!(tok, Tok::Num(_) | Tok::Ident(_) | Tok::LPar | Tok::Racine);
        if prev_was_value && debut_valeur {
            return Err(ErreurEval::ExpressionInvalide);
        }

        match tok {
            Tok::Num(v) => {
                out.push(Instr::Nombre(*v));
                prev_was_value = true;
            }

            Tok::Ident(name) => {
                let appel = matches!(tokens.get(i + 1), Some(Tok::LPar));
                match Fonction::depuis_nom(name) {
                    Some(f) if appel => {
                        // fonction : on la garde sur la pile (elle sortira après ses arguments)
                        ops.push(Op::Fonction(f));
                        prev_was_value = false;
                    }
                    Some(_) => return Err(ErreurEval::ExpressionInvalide),
                    None => {
                        out.push(Instr::Charger(name.clone()));
                        prev_was_value = true;
                    }
                }
            }

            Tok::Racine => {
                ops.push(Op::Racine);
                prev_was_value = false;
            }

            Tok::LPar => {
                if matches!(ops.last(), Some(Op::Fonction(_))) {
                    args.push(1);
                }
                ops.push(Op::LPar);
                prev_was_value = false;
            }

            Tok::Virgule => {
                if !prev_was_value {
                    return Err(ErreurEval::ExpressionInvalide);
                }
                // dépile jusqu’à '(' (sans la retirer)
                while let Some(&top) = ops.last() {
                    if matches!(top, Op::LPar) {
                        break;
                    }
                    ops.pop();
                    if let Some(ins) = vers_instr(top) {
                        out.push(ins);
                    }
                }
                // la '(' doit appartenir à un appel
                let n = ops.len();
                let dans_appel = n >= 2
                    && matches!(ops[n - 1], Op::LPar)
                    && matches!(ops[n - 2], Op::Fonction(_));
                if !dans_appel {
                    return Err(ErreurEval::ExpressionInvalide);
                }
                if let Some(c) = args.last_mut() {
                    *c += 1;
                }
                prev_was_value = false;
            }

            Tok::RPar => {
                let vide = matches!(i.checked_sub(1).map(|j| &tokens[j]), Some(Tok::LPar));
                if !prev_was_value && !vide {
                    return Err(ErreurEval::ExpressionInvalide);
                }

                // dépile jusqu’à '('
                let mut fermee = false;
                while let Some(top) = ops.pop() {
                    if matches!(top, Op::LPar) {
                        fermee = true;
                        break;
                    }
                    if let Some(ins) = vers_instr(top) {
                        out.push(ins);
                    }
                }
                if !fermee {
                    return Err(ErreurEval::Parentheses);
                }

                // si une fonction est au sommet, on la sort aussi
                if let Some(&Op::Fonction(f)) = ops.last() {
                    ops.pop();
                    let n = args.pop().unwrap_or(1);
                    let n = if vide { 0 } else { n };
                    f.verifier_arite(n)?;
                    out.push(Instr::Appel(f, n));
                } else if vide {
                    // "()" seul n’a pas de valeur
                    return Err(ErreurEval::ExpressionInvalide);
                }

                prev_was_value = true;
            }

            Tok::Plus | Tok::Minus if !prev_was_value => {
                // unaire : '+' ignoré, '-' devient Neg (préfixe : ne dépile rien)
                if matches!(tok, Tok::Minus) {
                    ops.push(Op::Neg);
                }
            }

            Tok::Plus | Tok::Minus | Tok::Star | Tok::Slash | Tok::Percent | Tok::Caret => {
                if !prev_was_value {
                    return Err(ErreurEval::ExpressionInvalide);
                }
                let op = match tok {
                    Tok::Plus => OpBin::Add,
                    Tok::Minus => OpBin::Sub,
                    Tok::Star => OpBin::Mul,
                    Tok::Slash => OpBin::Div,
                    Tok::Percent => OpBin::Mod,
                    _ => OpBin::Pow,
                };
                depiler_pour(&mut ops, &mut out, op);
                ops.push(Op::Bin(op));
                prev_was_value = false;
            }
        }
    }

    if !prev_was_value {
        return Err(ErreurEval::ExpressionInvalide);
    }

    // vide la pile ops
    while let Some(op) = ops.pop() {
        match vers_instr(op) {
            Some(ins) => out.push(ins),
            None => return Err(ErreurEval::Parentheses),
        }
    }

    Ok(out)
}
