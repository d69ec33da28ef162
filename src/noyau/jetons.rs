// src/noyau/jetons.rs

use super::erreur::{ErreurEval, ResultatEval};

#[derive(Clone, Debug, PartialEq)]
pub enum Tok {
    Num(f64),

    // Fonctions + variables + constantes (pi, e, ...)
    // NOTE: la compilation décidera si c’est une fonction, une constante ou une variable.
    Ident(String),

    Plus,
    Minus,
    Star,
    Slash,
    Percent, // modulo
    Caret,   // ^

    // √ préfixe : s’applique à l’atome qui suit (√4+1 = 3)
    Racine,

    LPar,
    RPar,
    Virgule,
}

/// Tokenize une chaîne en jetons.
/// Supporte:
/// - nombres décimaux (ex: 12, 1.5, .5, 2e3, 1.5e-4)
/// - opérateurs + - * / % ^
/// - parenthèses ( ) et virgule (fonctions à plusieurs arguments)
/// - π (équivaut à ident("pi"))
/// - √ préfixe (racine carrée de l’atome suivant : √2, √x, √(x+1))
/// - identifiants [a-zA-Z_][a-zA-Z0-9_]* (normalisés en minuscules)
pub fn tokenize(s: &str) -> ResultatEval<Vec<Tok>> {
    let mut out = Vec::new();
    let chars: Vec<char> = s.chars().collect();
    let mut i: usize = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let simple = match c {
            '(' => Some(Tok::LPar),
            ')' => Some(Tok::RPar),
            ',' => Some(Tok::Virgule),
            '+' => Some(Tok::Plus),
            '-' => Some(Tok::Minus),
            '*' => Some(Tok::Star),
            '/' => Some(Tok::Slash),
            '%' => Some(Tok::Percent),
            '^' => Some(Tok::Caret),
            'π' => Some(Tok::Ident("pi".to_string())),
            '√' => Some(Tok::Racine),
            _ => None,
        };
        if let Some(t) = simple {
            out.push(t);
            i += 1;
            continue;
        }

        // Identifiants ASCII : [a-zA-Z_][a-zA-Z0-9_]*
        if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            i += 1;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            out.push(Tok::Ident(word.to_lowercase()));
            continue;
        }

        // Nombre décimal (partie entière, fraction, exposant)
        if c.is_ascii_digit() || c == '.' {
            let start = i;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            if i < chars.len() && chars[i] == '.' {
                i += 1;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
            }

            // exposant seulement si suivi d’un chiffre : "2e3" = 2000, mais "2e" = 2·e
            if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                let mut j = i + 1;
                if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                    j += 1;
                }
                if j < chars.len() && chars[j].is_ascii_digit() {
                    i = j;
                    while i < chars.len() && chars[i].is_ascii_digit() {
                        i += 1;
                    }
                }
            }

            let txt: String = chars[start..i].iter().collect();
            if i < chars.len() && chars[i] == '.' {
                return Err(ErreurEval::NombreInvalide(format!("{txt}.")));
            }
            let v = txt
                .parse::<f64>()
                .map_err(|_| ErreurEval::NombreInvalide(txt.clone()))?;
            out.push(Tok::Num(v));
            continue;
        }

        return Err(ErreurEval::CaractereInattendu(c));
    }

    Ok(out)
}

/// Format utilitaire (journal) : liste de jetons en texte.
pub fn format_tokens(tokens: &[Tok]) -> String {
    let mut out = Vec::with_capacity(tokens.len());
    for t in tokens {
        let s = match t {
            Tok::Num(v) => format!("{v}"),
            Tok::Ident(name) => name.clone(),

            Tok::Plus => "+".to_string(),
            Tok::Minus => "-".to_string(),
            Tok::Star => "*".to_string(),
            Tok::Slash => "/".to_string(),
            Tok::Percent => "%".to_string(),
            Tok::Caret => "^".to_string(),
            Tok::Racine => "√".to_string(),

            Tok::LPar => "(".to_string(),
            Tok::RPar => ")".to_string(),
            Tok::Virgule => ",".to_string(),
        };
        out.push(s);
    }
    out.join(" ")
}
