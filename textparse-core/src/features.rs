//! # Engenharia de Features para NER
//!
//! Para cada token, extrai um vetor de features que o CRF utiliza para pontuar
//! as tags candidatas. As features capturam informações ortográficas, lexicais
//! e contextuais.
//!
//! ## Features Implementadas
//!
//! ### Token atual
//! - Forma da palavra (lowercase) e `bias`
//! - Capitalização: `is_capitalized`, `is_all_caps`, `is_mixed_case`
//! - Prefixos e sufixos de 2, 3 e 4 caracteres
//! - Numéricas: `is_digit`, `is_number` (com separadores `1,200`)
//! - Moeda: `is_currency_symbol`, `prev_is_currency`
//!
//! ### Contexto (janela de 2 tokens)
//! - Palavras anterior e posterior, bigrama de contexto, capitalização vizinha
//!
//! ### Gazetteer
//! - `in_person_gazetteer`, `in_org_gazetteer`, `in_gpe_gazetteer`, `in_loc_gazetteer`

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::tokenizer::Token;

const CURRENCY_SYMBOLS: &[&str] = &["£", "$", "€"];

/// Características ativas de um token.
///
/// Mapa esparso: cada token ativa um pequeno subconjunto de um espaço de features
/// potencialmente infinito (`word=cafe`, `suffix3=afe`...). A ordem fixa do
/// `BTreeMap` deixa a soma dos pesos idêntica entre execuções.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureVector {
    /// O mapa de features ativas. Ex: `{"is_capitalized": 1.0, "word=leeds": 1.0}`.
    pub features: BTreeMap<String, f64>,
    /// Índice do token original na sentença.
    pub token_index: usize,
}

impl FeatureVector {
    pub fn new(token_index: usize) -> Self {
        Self {
            features: BTreeMap::new(),
            token_index,
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: f64) {
        self.features.insert(key.into(), value);
    }

    pub fn has(&self, key: &str) -> bool {
        self.features.contains_key(key)
    }
}

/// Palavras conhecidas por categoria (lowercase, uma palavra por entrada)
#[derive(Debug, Clone, Default)]
pub struct Gazetteers {
    pub persons: HashSet<String>,
    pub organizations: HashSet<String>,
    pub gpes: HashSet<String>,
    pub locations: HashSet<String>,
}

fn is_number(word: &str) -> bool {
    word.chars().any(|c| c.is_ascii_digit())
        && word.chars().all(|c| c.is_ascii_digit() || c == ',' || c == '.')
}

/// Gera vetores de features para toda a sequência de tokens.
///
/// O índice `i` do retorno corresponde ao token `i` da entrada.
///
/// # Exemplo
/// Para "moved to Leeds", o vetor do índice 2 ("Leeds") conterá:
/// - `word=leeds`
/// - `is_capitalized`
/// - `prev_word=to`
/// - `in_gpe_gazetteer` (se estiver no gazetteer)
pub fn extract_features(tokens: &[Token], gazetteers: &Gazetteers) -> Vec<FeatureVector> {
    (0..tokens.len())
        .map(|i| extract_for_token(tokens, i, gazetteers))
        .collect()
}

/// Extrai features para um único token em seu contexto
pub fn extract_for_token(tokens: &[Token], i: usize, gazetteers: &Gazetteers) -> FeatureVector {
    let mut fv = FeatureVector::new(i);
    let token = &tokens[i];
    let word = &token.text;
    let lower = token.lower();

    fv.insert(format!("word={lower}"), 1.0);
    fv.insert("bias", 1.0);

    // Capitalização
    let all_upper = word.chars().all(|c| c.is_uppercase() || !c.is_alphabetic())
        && word.chars().any(char::is_alphabetic);
    if token.is_capitalized() {
        fv.insert("is_capitalized", 1.0);
    }
    if all_upper && word.chars().count() > 1 {
        fv.insert("is_all_caps", 1.0);
    }
    if word.chars().skip(1).any(char::is_uppercase) {
        fv.insert("is_mixed_case", 1.0);
    }

    // Prefixos e sufixos
    let chars: Vec<char> = lower.chars().collect();
    for n in 2..=4 {
        if chars.len() >= n {
            let prefix: String = chars[..n].iter().collect();
            let suffix: String = chars[chars.len() - n..].iter().collect();
            fv.insert(format!("prefix{n}={prefix}"), 1.0);
            fv.insert(format!("suffix{n}={suffix}"), 1.0);
        }
    }

    // Números, moeda e pontuação
    if word.chars().all(|c| c.is_ascii_digit()) {
        fv.insert("is_digit", 1.0);
    }
    if is_number(word) {
        fv.insert("is_number", 1.0);
    }
    if CURRENCY_SYMBOLS.contains(&word.as_str()) {
        fv.insert("is_currency_symbol", 1.0);
    } else if word.chars().count() == 1 && !word.chars().all(char::is_alphanumeric) {
        fv.insert("is_punctuation", 1.0);
    }
    if word.contains('-') {
        fv.insert("has_hyphen", 1.0);
    }

    if i == 0 {
        fv.insert("BOS", 1.0);
    }
    if i + 1 == tokens.len() {
        fv.insert("EOS", 1.0);
    }

    // Contexto
    if i > 0 {
        let prev = &tokens[i - 1];
        fv.insert(format!("prev_word={}", prev.lower()), 1.0);
        if prev.is_capitalized() {
            fv.insert("prev_is_capitalized", 1.0);
        }
        if CURRENCY_SYMBOLS.contains(&prev.text.as_str()) {
            fv.insert("prev_is_currency", 1.0);
        }
    }
    if i > 1 {
        fv.insert(format!("prev2_word={}", tokens[i - 2].lower()), 1.0);
    }
    if let Some(next) = tokens.get(i + 1) {
        fv.insert(format!("next_word={}", next.lower()), 1.0);
        if next.is_capitalized() {
            fv.insert("next_is_capitalized", 1.0);
        }
    }
    if i > 0 && i + 1 < tokens.len() {
        fv.insert(
            format!("bigram={}_{}", tokens[i - 1].lower(), tokens[i + 1].lower()),
            1.0,
        );
    }

    // Gazetteers: só nomes próprios ("Reading", não "reading")
    if !token.is_capitalized() {
        return fv;
    }
    if gazetteers.persons.contains(&lower) {
        fv.insert("in_person_gazetteer", 1.0);
    }
    if gazetteers.organizations.contains(&lower) {
        fv.insert("in_org_gazetteer", 1.0);
    }
    if gazetteers.gpes.contains(&lower) {
        fv.insert("in_gpe_gazetteer", 1.0);
    }
    if gazetteers.locations.contains(&lower) {
        fv.insert("in_loc_gazetteer", 1.0);
    }

    fv
}
