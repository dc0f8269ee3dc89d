//! # Entity Ruler: Regras Léxicas com Prioridade sobre o Modelo
//!
//! Compila um [`PatternSet`] e encontra todas as ocorrências no texto tokenizado.
//! No pipeline ele é inserido antes do estágio `ner`, então seus matches vencem
//! qualquer entidade estatística sobreposta (ver [`crate::matcher::resolve`]).

use regex::Regex;

use crate::error::{NlpError, Result};
use crate::matcher::{EntityMatch, EntityMatcher};
use crate::patterns::{PatternKind, PatternSet, TokenAttr};
use crate::tokenizer::{tokenize, Token};

enum CompiledAttr {
    Lower(String),
    Orth(String),
    Regex(Regex),
}

impl CompiledAttr {
    fn matches(&self, token: &Token) -> bool {
        match self {
            CompiledAttr::Lower(word) => token.lower() == *word,
            CompiledAttr::Orth(text) => token.text == *text,
            CompiledAttr::Regex(re) => re.is_match(&token.text),
        }
    }
}

struct CompiledPattern {
    label: String,
    source: String,
    attrs: Vec<CompiledAttr>,
}

/// Motor de regras léxicas
pub struct EntityRuler {
    name: String,
    patterns: Vec<CompiledPattern>,
}

impl EntityRuler {
    pub const DEFAULT_NAME: &'static str = "entity_ruler";

    /// Compila os padrões. Regex inválida → [`NlpError::InvalidRule`] com a posição
    /// (1-based) do padrão no conjunto. Padrões lidos de JSONL já chegam validados.
    pub fn new(patterns: &PatternSet) -> Result<Self> {
        let compiled = patterns
            .iter()
            .enumerate()
            .map(|(i, p)| -> Result<CompiledPattern> {
                let attrs: Vec<CompiledAttr> = match &p.pattern {
                    PatternKind::Phrase(phrase) => tokenize(phrase)
                        .into_iter()
                        .map(|t| CompiledAttr::Lower(t.lower()))
                        .collect(),
                    PatternKind::Tokens(attrs) => attrs
                        .iter()
                        .map(|attr| match attr {
                            TokenAttr::Lower(w) => Ok(CompiledAttr::Lower(w.to_lowercase())),
                            TokenAttr::Orth(t) => Ok(CompiledAttr::Orth(t.clone())),
                            TokenAttr::Regex(r) => {
                                Regex::new(r).map(CompiledAttr::Regex).map_err(|e| {
                                    NlpError::InvalidRule {
                                        position: i + 1,
                                        reason: e.to_string(),
                                    }
                                })
                            }
                        })
                        .collect::<Result<Vec<_>>>()?,
                };
                Ok(CompiledPattern {
                    label: p.label.clone(),
                    source: p.id.clone().unwrap_or_else(|| Self::DEFAULT_NAME.to_string()),
                    attrs,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: Self::DEFAULT_NAME.to_string(),
            patterns: compiled,
        })
    }

    /// Troca o nome do estágio (útil com mais de um ruler no pipeline)
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Melhor padrão começando no token `i`: o mais longo, e no empate o primeiro.
    fn best_at(&self, tokens: &[Token], i: usize) -> Option<&CompiledPattern> {
        let mut best: Option<&CompiledPattern> = None;
        for pattern in &self.patterns {
            let n = pattern.attrs.len();
            if n == 0 || i + n > tokens.len() {
                continue;
            }
            let hit = pattern
                .attrs
                .iter()
                .zip(&tokens[i..i + n])
                .all(|(attr, token)| attr.matches(token));
            if hit && best.map_or(true, |b| n > b.attrs.len()) {
                best = Some(pattern);
            }
        }
        best
    }
}

impl EntityMatcher for EntityRuler {
    fn name(&self) -> &str {
        &self.name
    }

    fn find(&self, _text: &str, tokens: &[Token]) -> Vec<EntityMatch> {
        (0..tokens.len())
            .filter_map(|i| {
                self.best_at(tokens, i).map(|p| EntityMatch {
                    start_token: i,
                    end_token: i + p.attrs.len(),
                    label: p.label.clone(),
                    source: p.source.clone(),
                    confidence: 1.0,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::{EntityPattern, BUSINESS_TYPE, LOCATION};

    fn labels(ruler: &EntityRuler, text: &str) -> Vec<(usize, usize, String)> {
        ruler
            .find(text, &tokenize(text))
            .into_iter()
            .map(|m| (m.start_token, m.end_token, m.label))
            .collect()
    }

    #[test]
    fn test_default_patterns_case_insensitive() {
        let ruler = EntityRuler::new(&PatternSet::default_patterns()).unwrap();
        let found = labels(&ruler, "CAFE and Restaurant downtown");
        assert_eq!(
            found,
            [
                (0, 1, BUSINESS_TYPE.to_string()),
                (2, 3, BUSINESS_TYPE.to_string()),
                (3, 4, LOCATION.to_string()),
            ]
        );
    }

    #[test]
    fn test_lower_pattern_is_exact_token() {
        let ruler = EntityRuler::new(&PatternSet::default_patterns()).unwrap();
        assert!(labels(&ruler, "cafes and restaurants").is_empty());
    }

    #[test]
    fn test_phrase_and_longest_match() {
        let mut set = PatternSet::new();
        set.push(EntityPattern::lower("city", "A"));
        set.push(EntityPattern {
            label: LOCATION.to_string(),
            pattern: PatternKind::Phrase("City Centre".to_string()),
            id: Some("centre".to_string()),
        });
        let ruler = EntityRuler::new(&set).unwrap();

        let found = ruler.find("", &tokenize("a city centre cafe"));
        assert_eq!(found.len(), 1);
        assert_eq!((found[0].start_token, found[0].end_token), (1, 3));
        assert_eq!(found[0].source, "centre");
    }

    #[test]
    fn test_orth_and_regex_attrs() {
        let mut set = PatternSet::new();
        set.push(EntityPattern {
            label: "POSTCODE".to_string(),
            pattern: PatternKind::Tokens(vec![
                TokenAttr::Regex("^[A-Z]{1,2}[0-9][A-Z0-9]?$".to_string()),
                TokenAttr::Regex("^[0-9][A-Z]{2}$".to_string()),
            ]),
            id: None,
        });
        set.push(EntityPattern {
            label: "BRAND".to_string(),
            pattern: PatternKind::Tokens(vec![TokenAttr::Orth("Greggs".to_string())]),
            id: None,
        });
        let ruler = EntityRuler::new(&set).unwrap();

        let found = labels(&ruler, "Greggs at LS1 4AP but not greggs");
        assert_eq!(
            found,
            [(0, 1, "BRAND".to_string()), (2, 4, "POSTCODE".to_string())]
        );
    }

    #[test]
    fn test_invalid_regex_is_rejected() {
        let mut set = PatternSet::default_patterns();
        set.push(EntityPattern {
            label: "BAD".to_string(),
            pattern: PatternKind::Tokens(vec![TokenAttr::Regex("(".to_string())]),
            id: None,
        });
        assert!(matches!(
            EntityRuler::new(&set),
            Err(NlpError::InvalidRule { position: 4, .. })
        ));
    }
}
