//! # Estágios de Reconhecimento e Resolução por Prioridade
//!
//! Todo estágio do pipeline (regras customizadas, modelo estatístico) implementa
//! [`EntityMatcher`] e devolve candidatos como intervalos de tokens. A decisão final
//! é de [`resolve`]: os estágios são consultados na ordem do pipeline e um candidato
//! só é aceito se nenhum dos seus tokens já foi reivindicado por um estágio anterior.
//!
//! Consequência: regras inseridas antes do `ner` vencem qualquer sobreposição, e o
//! modelo estatístico (último estágio) só preenche os spans que sobraram.

use crate::tagger::EntitySpan;
use crate::tokenizer::Token;

/// Um candidato a entidade produzido por um estágio
#[derive(Debug, Clone, PartialEq)]
pub struct EntityMatch {
    /// Primeiro token (inclusivo)
    pub start_token: usize,
    /// Fim do intervalo (exclusivo)
    pub end_token: usize,
    pub label: String,
    /// Regra ou modelo que gerou o candidato
    pub source: String,
    pub confidence: f64,
}

impl EntityMatch {
    pub fn len(&self) -> usize {
        self.end_token.saturating_sub(self.start_token)
    }

    pub fn is_empty(&self) -> bool {
        self.end_token <= self.start_token
    }
}

/// Um estágio de reconhecimento de entidades.
///
/// Estágios são montados uma vez na inicialização e compartilhados entre
/// requisições, por isso só recebem `&self`.
pub trait EntityMatcher: Send + Sync {
    /// Nome do estágio no pipeline (ex: "entity_ruler", "ner")
    fn name(&self) -> &str;

    /// Candidatos encontrados na sequência de tokens, em qualquer ordem
    fn find(&self, text: &str, tokens: &[Token]) -> Vec<EntityMatch>;
}

/// Aplica a prioridade entre estágios e monta as entidades finais.
///
/// `stage_matches` vem na ordem do pipeline. Dentro de um estágio, candidatos
/// são visitados por posição e, no mesmo início, do maior para o menor.
/// O resultado sai ordenado pela posição no texto.
pub fn resolve(text: &str, tokens: &[Token], stage_matches: Vec<Vec<EntityMatch>>) -> Vec<EntitySpan> {
    let mut claimed = vec![false; tokens.len()];
    let mut accepted: Vec<EntityMatch> = Vec::new();

    for mut matches in stage_matches {
        matches.sort_by(|a, b| {
            a.start_token
                .cmp(&b.start_token)
                .then_with(|| b.len().cmp(&a.len()))
        });

        for m in matches {
            if m.is_empty() || m.end_token > tokens.len() {
                continue;
            }
            if claimed[m.start_token..m.end_token].iter().any(|&c| c) {
                continue;
            }
            claimed[m.start_token..m.end_token].fill(true);
            accepted.push(m);
        }
    }

    accepted.sort_by_key(|m| m.start_token);
    accepted
        .into_iter()
        .map(|m| {
            let start = tokens[m.start_token].start;
            let end = tokens[m.end_token - 1].end;
            EntitySpan {
                text: text[start..end].to_string(),
                label: m.label,
                start_token: m.start_token,
                end_token: m.end_token - 1,
                start,
                end,
                confidence: m.confidence,
                source: m.source,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    fn m(start: usize, end: usize, label: &str) -> EntityMatch {
        EntityMatch {
            start_token: start,
            end_token: end,
            label: label.to_string(),
            source: "test".to_string(),
            confidence: 1.0,
        }
    }

    #[test]
    fn test_earlier_stage_wins_overlap() {
        let text = "cafe downtown";
        let tokens = tokenize(text);
        let rules = vec![m(0, 1, "BUSINESS_TYPE"), m(1, 2, "LOCATION")];
        let model = vec![m(0, 2, "ORG")];

        let spans = resolve(text, &tokens, vec![rules, model]);
        let pairs: Vec<(&str, &str)> = spans
            .iter()
            .map(|s| (s.text.as_str(), s.label.as_str()))
            .collect();
        assert_eq!(pairs, [("cafe", "BUSINESS_TYPE"), ("downtown", "LOCATION")]);
    }

    #[test]
    fn test_fallback_fills_unclaimed_tokens() {
        let text = "a cafe in Leeds";
        let tokens = tokenize(text);
        let spans = resolve(
            text,
            &tokens,
            vec![vec![m(1, 2, "BUSINESS_TYPE")], vec![m(3, 4, "GPE")]],
        );
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[1].text, "Leeds");
        assert_eq!(spans[1].end_token, 3);
    }

    #[test]
    fn test_longest_match_first_within_stage() {
        let text = "city centre cafe";
        let tokens = tokenize(text);
        let spans = resolve(
            text,
            &tokens,
            vec![vec![m(0, 1, "A"), m(0, 2, "LOCATION")]],
        );
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "city centre");
    }

    #[test]
    fn test_output_sorted_by_position() {
        let text = "Leeds cafe";
        let tokens = tokenize(text);
        let spans = resolve(
            text,
            &tokens,
            vec![vec![m(1, 2, "BUSINESS_TYPE")], vec![m(0, 1, "GPE")]],
        );
        assert_eq!(spans[0].label, "GPE");
        assert_eq!(spans[1].label, "BUSINESS_TYPE");
    }

    #[test]
    fn test_out_of_range_match_is_dropped() {
        let text = "cafe";
        let tokens = tokenize(text);
        assert!(resolve(text, &tokens, vec![vec![m(0, 3, "X"), m(1, 1, "Y")]]).is_empty());
    }
}
