//! # Tokenizador para Inglês
//!
//! Responsável por dividir o texto bruto em tokens individuais (palavras, números,
//! pontuações). Cada token preserva sua posição original no texto (offset em bytes)
//! para que as entidades possam ser recortadas exatamente do texto de entrada.
//!
//! ## Esquema de Tokenização
//!
//! A segmentação base segue as fronteiras de palavra do Unicode (UAX #29), via
//! `unicode-segmentation`. Sobre ela aplicamos dois ajustes:
//!
//! - Segmentos só de espaço em branco são descartados.
//! - Abreviações conhecidas ("Dr", "Ltd", "St") absorvem o ponto seguinte:
//!   `"Dr. Smith"` → `"Dr."`, `"Smith"`. Abreviações que também são palavras
//!   ("no", "dec") e iniciais ("J") dependem do que vem depois do ponto, para que
//!   o ponto final de frase continue sendo um token próprio.
//!
//! Números mantêm separadores internos (`"1,200"`, `"3.5"`), contrações ficam
//! inteiras (`"don't"`) e cada símbolo de pontuação vira um token próprio.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use textparse_core::tokenizer::tokenize;
//!
//! let tokens = tokenize("Dr. Patel sold the cafe for £1,200.");
//! let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
//! assert_eq!(texts, ["Dr.", "Patel", "sold", "the", "cafe", "for", "£", "1,200", "."]);
//! ```

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Um token extraído do texto original.
///
/// O `Token` é a unidade atômica de processamento do pipeline. Ele mantém a referência
/// exata de sua posição no texto original (`start` e `end`), o que permite recortar
/// as entidades sem alterar a formatação original.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Token {
    /// O texto do token (ex: "cafe", ",", "£").
    pub text: String,
    /// Índice de byte inicial no texto original (inclusive).
    pub start: usize,
    /// Índice de byte final no texto original (exclusivo).
    pub end: usize,
    /// Índice sequencial do token na lista (0, 1, 2...).
    pub index: usize,
}

impl Token {
    /// Forma minúscula do token, usada por padrões `LOWER` e gazetteers.
    pub fn lower(&self) -> String {
        self.text.to_lowercase()
    }

    /// Primeiro caractere é maiúsculo?
    pub fn is_capitalized(&self) -> bool {
        self.text.chars().next().is_some_and(char::is_uppercase)
    }
}

/// Abreviações que sempre carregam o ponto final consigo (comparadas em minúsculas)
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "rd", "ave", "ltd", "inc",
    "corp", "bros", "mt", "capt", "rev", "hon", "etc", "approx", "dept", "jan",
    "feb", "apr", "jun", "jul", "aug", "sep", "sept", "oct", "nov",
];

/// Abreviações que também são palavras comuns ("no", "dec"). Só absorvem o ponto
/// quando o texto segue em minúscula ou número: "No. 5", "Mar. 12", "est. 1998".
const AMBIGUOUS_ABBREVIATIONS: &[&str] =
    &["no", "est", "tel", "vs", "mar", "dec", "co", "col", "gen"];

enum DotRule {
    Always,
    BeforeLowerOrDigit,
    /// Iniciais: "J. K. Rowling"
    BeforeCapitalized,
    Never,
}

fn dot_rule(segment: &str) -> DotRule {
    let lower = segment.to_lowercase();
    if ABBREVIATIONS.contains(&lower.as_str()) {
        return DotRule::Always;
    }
    if AMBIGUOUS_ABBREVIATIONS.contains(&lower.as_str()) {
        return DotRule::BeforeLowerOrDigit;
    }
    let mut chars = segment.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_uppercase() && c != 'I' => DotRule::BeforeCapitalized,
        _ => DotRule::Never,
    }
}

/// O segmento `i` é seguido de um "." colado que deve ficar no mesmo token?
fn absorbs_dot(segments: &[(usize, &str)], i: usize) -> bool {
    let (start, segment) = segments[i];
    match segments.get(i + 1) {
        Some(&(dot_start, ".")) if dot_start == start + segment.len() => {}
        _ => return false,
    }
    let next = segments.get(i + 2).and_then(|(_, s)| s.chars().next());

    match dot_rule(segment) {
        DotRule::Always => true,
        DotRule::BeforeLowerOrDigit => {
            next.is_some_and(|c| c.is_lowercase() || c.is_ascii_digit())
        }
        DotRule::BeforeCapitalized => next.is_some_and(char::is_uppercase),
        DotRule::Never => false,
    }
}

/// Tokeniza um texto.
///
/// Retorna os tokens em ordem de posição, já re-indexados.
pub fn tokenize(text: &str) -> Vec<Token> {
    let segments: Vec<(usize, &str)> = text
        .split_word_bound_indices()
        .filter(|(_, s)| !s.chars().all(char::is_whitespace))
        .collect();

    let mut tokens: Vec<Token> = Vec::with_capacity(segments.len());
    let mut i = 0;
    while i < segments.len() {
        let (start, segment) = segments[i];
        let mut end = start + segment.len();
        if absorbs_dot(&segments, i) {
            end += 1;
            i += 1;
        }

        tokens.push(Token {
            text: text[start..end].to_string(),
            start,
            end,
            index: tokens.len(),
        });
        i += 1;
    }

    tokens
}
