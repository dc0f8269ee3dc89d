//! # Pipeline: Estágios Ordenados sobre o Tokenizador
//!
//! O pipeline coordena o tokenizador e uma lista **ordenada** de estágios de
//! reconhecimento. A ordem é a prioridade: estágios anteriores vencem sobreposições
//! (ver [`crate::matcher::resolve`]).
//!
//! ## Configuração do serviço
//!
//! ```text
//! tokenizer → entity_ruler (regras customizadas) → ner (modelo estatístico)
//! ```
//!
//! A configuração acontece uma vez na inicialização; depois disso o pipeline é
//! somente leitura e pode ser compartilhado entre threads via `Arc`.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use textparse_core::{NerPipeline, PipelineConfig};
//!
//! let pipeline = NerPipeline::configured(&PipelineConfig::default()).unwrap();
//! let doc = pipeline.analyze("cafe downtown");
//!
//! assert_eq!(doc.token_texts(), ["cafe", "downtown"]);
//! assert!(doc.entity_pairs().contains(&("cafe".to_string(), "BUSINESS_TYPE".to_string())));
//! ```

use std::path::PathBuf;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{NlpError, Result};
use crate::matcher::{resolve, EntityMatcher};
use crate::model::StatisticalModel;
use crate::patterns::PatternSet;
use crate::rule_based::EntityRuler;
use crate::tagger::EntitySpan;
use crate::tokenizer::{tokenize, Token};

/// Configuração de inicialização do pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Nome do modelo estatístico (embutido ou caminho de pesos JSON)
    pub model: String,
    /// Arquivo JSONL opcional com padrões extras para o entity ruler
    pub patterns_file: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            model: StatisticalModel::BUILTIN.to_string(),
            patterns_file: None,
        }
    }
}

/// Resultado da análise de um texto
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub tokens: Vec<Token>,
    /// Entidades ordenadas pela posição no texto
    pub entities: Vec<EntitySpan>,
}

impl Document {
    /// Texto literal de cada token, em ordem
    pub fn token_texts(&self) -> Vec<String> {
        self.tokens.iter().map(|t| t.text.clone()).collect()
    }

    /// Pares (texto do span, label), em ordem
    pub fn entity_pairs(&self) -> Vec<(String, String)> {
        self.entities
            .iter()
            .map(|e| (e.text.clone(), e.label.clone()))
            .collect()
    }
}

/// O pipeline NER.
pub struct NerPipeline {
    stages: Vec<Box<dyn EntityMatcher>>,
}

impl NerPipeline {
    /// Pipeline só com o modelo estatístico (estágio `ner`).
    pub fn load(model_name: &str) -> Result<Self> {
        let model = StatisticalModel::load(model_name)?;
        Ok(Self {
            stages: vec![Box::new(model)],
        })
    }

    /// Configuração completa do serviço: modelo + entity ruler antes do `ner`.
    ///
    /// Os padrões embutidos vêm primeiro; os do arquivo, se houver, depois.
    pub fn configured(config: &PipelineConfig) -> Result<Self> {
        let mut pipeline = Self::load(&config.model)?;

        let mut patterns = PatternSet::default_patterns();
        if let Some(path) = &config.patterns_file {
            let extra = PatternSet::load_jsonl(path)?;
            if extra.is_empty() {
                warn!(path = %path.display(), "arquivo de padrões sem nenhum padrão");
            } else {
                info!(path = %path.display(), patterns = extra.len(), "padrões extras carregados");
            }
            patterns.extend(extra);
        }

        let ruler = EntityRuler::new(&patterns)?;
        pipeline.insert_before(StatisticalModel::STAGE_NAME, Box::new(ruler))?;

        info!(stages = ?pipeline.stage_names(), "pipeline configurado");
        Ok(pipeline)
    }

    /// Insere um estágio imediatamente antes do estágio `before`.
    pub fn insert_before(&mut self, before: &str, stage: Box<dyn EntityMatcher>) -> Result<()> {
        let position = self
            .stages
            .iter()
            .position(|s| s.name() == before)
            .ok_or_else(|| NlpError::UnknownStage(before.to_string()))?;
        self.stages.insert(position, stage);
        Ok(())
    }

    /// Acrescenta um estágio no fim (menor prioridade)
    pub fn push(&mut self, stage: Box<dyn EntityMatcher>) {
        self.stages.push(stage);
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Analisa um texto: tokens + entidades.
    ///
    /// Função pura da entrada para um pipeline fixo; texto vazio gera documento vazio.
    pub fn analyze(&self, text: &str) -> Document {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return Document {
                tokens,
                entities: vec![],
            };
        }

        let stage_matches = self
            .stages
            .iter()
            .map(|stage| stage.find(text, &tokens))
            .collect();
        let entities = resolve(text, &tokens, stage_matches);

        debug!(
            tokens = tokens.len(),
            entities = entities.len(),
            "texto analisado"
        );
        Document { tokens, entities }
    }

    /// Analisa vários textos em paralelo, preservando a ordem de entrada.
    pub fn analyze_batch<S: AsRef<str> + Sync>(&self, texts: &[S]) -> Vec<Document> {
        texts.par_iter().map(|t| self.analyze(t.as_ref())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::EntityMatch;
    use crate::patterns::{EntityPattern, BUSINESS_TYPE, LOCATION};
    use std::io::Write;
    use std::sync::Arc;

    fn pipeline() -> NerPipeline {
        NerPipeline::configured(&PipelineConfig::default()).unwrap()
    }

    fn pair(text: &str, label: &str) -> (String, String) {
        (text.to_string(), label.to_string())
    }

    /// Estágio que marca todos os tokens como uma única entidade
    struct Greedy;

    impl EntityMatcher for Greedy {
        fn name(&self) -> &str {
            "greedy"
        }

        fn find(&self, _text: &str, tokens: &[Token]) -> Vec<EntityMatch> {
            vec![EntityMatch {
                start_token: 0,
                end_token: tokens.len(),
                label: "ORG".to_string(),
                source: "greedy".to_string(),
                confidence: 1.0,
            }]
        }
    }

    #[test]
    fn test_stage_order() {
        assert_eq!(pipeline().stage_names(), ["entity_ruler", "ner"]);
    }

    #[test]
    fn test_custom_rules_on_cafe_downtown() {
        let doc = pipeline().analyze("cafe downtown");
        assert_eq!(doc.token_texts(), ["cafe", "downtown"]);
        let pairs = doc.entity_pairs();
        assert!(pairs.contains(&pair("cafe", BUSINESS_TYPE)));
        assert!(pairs.contains(&pair("downtown", LOCATION)));
    }

    #[test]
    fn test_rule_wins_over_statistical_overlap() {
        let mut p = pipeline();
        // Um estágio estatístico que reivindica tudo, depois das regras
        p.push(Box::new(Greedy));
        let doc = p.analyze("Restaurant Downtown");
        assert_eq!(
            doc.entity_pairs(),
            [pair("Restaurant", BUSINESS_TYPE), pair("Downtown", LOCATION)]
        );
    }

    #[test]
    fn test_empty_text() {
        let doc = pipeline().analyze("");
        assert!(doc.tokens.is_empty());
        assert!(doc.entities.is_empty());
    }

    #[test]
    fn test_hello_world_tokens() {
        let doc = pipeline().analyze("hello world");
        assert_eq!(doc.token_texts(), ["hello", "world"]);
    }

    #[test]
    fn test_statistical_fallback_fills_gaps() {
        let doc = pipeline().analyze("A restaurant for sale in Leeds, asking £95,000.");
        let pairs = doc.entity_pairs();
        assert!(pairs.contains(&pair("restaurant", BUSINESS_TYPE)));
        assert!(pairs.contains(&pair("Leeds", "GPE")));
        assert!(pairs.contains(&pair("£95,000", "MONEY")));
        let starts: Vec<usize> = doc.entities.iter().map(|e| e.start).collect();
        let mut sorted = starts.clone();
        sorted.sort();
        assert_eq!(starts, sorted);
    }

    #[test]
    fn test_idempotent() {
        let p = pipeline();
        let text = "Dr. Patel runs a cafe downtown near the Thames in London.";
        let first = p.analyze(text);
        for _ in 0..5 {
            assert_eq!(p.analyze(text), first);
        }
    }

    #[test]
    fn test_insert_before_unknown_stage() {
        let mut p = NerPipeline::load(StatisticalModel::BUILTIN).unwrap();
        let ruler = EntityRuler::new(&PatternSet::default_patterns()).unwrap();
        assert!(matches!(
            p.insert_before("parser", Box::new(ruler)),
            Err(NlpError::UnknownStage(_))
        ));
    }

    #[test]
    fn test_patterns_file_extends_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let extra = EntityPattern::lower("pub", BUSINESS_TYPE);
        writeln!(file, "{}", serde_json::to_string(&extra).unwrap()).unwrap();

        let config = PipelineConfig {
            patterns_file: Some(file.path().to_path_buf()),
            ..PipelineConfig::default()
        };
        let p = NerPipeline::configured(&config).unwrap();
        let pairs = p.analyze("pub or cafe").entity_pairs();
        assert_eq!(pairs, [pair("pub", BUSINESS_TYPE), pair("cafe", BUSINESS_TYPE)]);
    }

    #[test]
    fn test_unknown_model_fails_configuration() {
        let config = PipelineConfig {
            model: "xx_missing_model".to_string(),
            patterns_file: None,
        };
        assert!(matches!(
            NerPipeline::configured(&config),
            Err(NlpError::ModelLoad { .. })
        ));
    }

    #[test]
    fn test_batch_matches_sequential() {
        let p = pipeline();
        let texts = ["cafe downtown", "", "hello world", "Tesco in Bristol"];
        let batch = p.analyze_batch(&texts);
        assert_eq!(batch.len(), texts.len());
        for (doc, text) in batch.iter().zip(texts) {
            assert_eq!(doc, &p.analyze(text));
        }
    }

    #[test]
    fn test_shared_across_threads() {
        let p = Arc::new(pipeline());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let p = Arc::clone(&p);
                std::thread::spawn(move || p.analyze("restaurant downtown").entity_pairs())
            })
            .collect();
        for h in handles {
            assert_eq!(
                h.join().unwrap(),
                [pair("restaurant", BUSINESS_TYPE), pair("downtown", LOCATION)]
            );
        }
    }
}
