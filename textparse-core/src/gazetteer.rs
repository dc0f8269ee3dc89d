//! # Gazetteers e Padrões do Modelo Estatístico
//!
//! O CRF aprende padrões gerais, mas erra em nomes raros. O tagger de gazetteer
//! complementa o modelo com conhecimento explícito:
//!
//! 1. **Listas de nomes** (uma ou várias palavras) por categoria; vence o nome mais longo.
//! 2. **Títulos**: "Mr", "Dr." etc. seguido de palavra capitalizada → PERSON.
//! 3. **Sufixos societários**: "Acme Coffee Ltd" → ORG.
//!
//! Este tagger faz parte do modelo pré-treinado. As regras customizadas do
//! serviço (`BUSINESS_TYPE`, `LOCATION`) ficam no [`crate::rule_based::EntityRuler`].

use crate::tagger::{EntityCategory, Tag};
use crate::tokenizer::Token;

/// Uma marcação de gazetteer: qual tag o token recebeu e por qual regra
#[derive(Debug, Clone)]
pub struct GazetteerHit {
    pub tag: Tag,
    pub rule_name: String,
    pub confidence: f64,
}

struct Entry {
    words: Vec<String>,
    category: EntityCategory,
}

/// Tagger de listas conhecidas, títulos e sufixos
pub struct GazetteerTagger {
    entries: Vec<Entry>,
    person_titles: Vec<String>,
    org_suffixes: Vec<String>,
}

impl GazetteerTagger {
    pub fn new() -> Self {
        Self {
            entries: vec![],
            person_titles: [
                "mr", "mrs", "ms", "miss", "dr", "prof", "sir", "dame", "lord", "lady",
                "rev", "capt", "councillor", "chef", "owner",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            org_suffixes: [
                "ltd", "limited", "plc", "llp", "inc", "corp", "group", "holdings", "co",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }

    /// Registra um nome (possivelmente com várias palavras) numa categoria
    pub fn add(&mut self, name: &str, category: EntityCategory) {
        let words: Vec<String> = name.split_whitespace().map(str::to_lowercase).collect();
        if !words.is_empty() {
            self.entries.push(Entry { words, category });
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Aplica listas e padrões à sequência de tokens.
    ///
    /// Retorna um vetor alinhado aos tokens: `Some` onde o gazetteer decidiu a tag.
    pub fn apply(&self, tokens: &[Token]) -> Vec<Option<GazetteerHit>> {
        let mut result: Vec<Option<GazetteerHit>> = vec![None; tokens.len()];
        let lowers: Vec<String> = tokens.iter().map(normalized).collect();

        // 1. Listas: maior nome começando em i, sempre numa palavra capitalizada
        let mut i = 0;
        while i < tokens.len() {
            if !tokens[i].is_capitalized() {
                i += 1;
                continue;
            }
            let best = self
                .entries
                .iter()
                .filter(|e| {
                    i + e.words.len() <= tokens.len()
                        && e.words.iter().enumerate().all(|(j, w)| lowers[i + j] == *w)
                })
                .max_by_key(|e| e.words.len());

            let Some(entry) = best else {
                i += 1;
                continue;
            };

            // Nomes de pessoa adjacentes formam uma única entidade ("James Smith")
            let continues_person = entry.category == EntityCategory::Person
                && i > 0
                && result[i - 1]
                    .as_ref()
                    .is_some_and(|h| h.tag.category() == Some(EntityCategory::Person));

            for j in 0..entry.words.len() {
                let tag = if j == 0 && !continues_person {
                    Tag::Begin(entry.category)
                } else {
                    Tag::Inside(entry.category)
                };
                result[i + j] = Some(GazetteerHit {
                    tag,
                    rule_name: "gazetteer".to_string(),
                    confidence: 0.92,
                });
            }
            i += entry.words.len();
        }

        // 2. Título: "Dr. Patel" → Patel é PERSON
        for i in 0..tokens.len().saturating_sub(1) {
            if result[i + 1].is_some() || !self.person_titles.contains(&lowers[i]) {
                continue;
            }
            if tokens[i + 1].is_capitalized() {
                result[i + 1] = Some(GazetteerHit {
                    tag: Tag::Begin(EntityCategory::Person),
                    rule_name: "title_pattern".to_string(),
                    confidence: 0.80,
                });
            }
        }

        // 3. Sufixo societário: "Acme Coffee Ltd" → ORG
        for i in 1..tokens.len() {
            if !self.org_suffixes.contains(&lowers[i]) || result[i].is_some() {
                continue;
            }
            let mut first = i;
            while first > 0 && result[first - 1].is_none() && tokens[first - 1].is_capitalized() {
                first -= 1;
            }
            if first == i {
                continue;
            }
            for j in first..=i {
                let tag = if j == first {
                    Tag::Begin(EntityCategory::Org)
                } else {
                    Tag::Inside(EntityCategory::Org)
                };
                result[j] = Some(GazetteerHit {
                    tag,
                    rule_name: "org_suffix_pattern".to_string(),
                    confidence: 0.85,
                });
            }
        }

        result
    }
}

impl Default for GazetteerTagger {
    fn default() -> Self {
        Self::new()
    }
}

/// Forma de comparação: minúscula e sem o ponto de abreviação ("Ltd." → "ltd")
fn normalized(token: &Token) -> String {
    let lower = token.lower();
    match lower.strip_suffix('.') {
        Some(stripped) if !stripped.is_empty() => stripped.to_string(),
        _ => lower,
    }
}
