//! # textparse-core: Tokens e Entidades Nomeadas para Textos em Inglês
//!
//! Este crate implementa o pipeline de análise usado pelo serviço `POST /parse`:
//! recebe texto livre e devolve a lista de tokens e as entidades reconhecidas.
//!
//! ## Arquitetura do Sistema
//!
//! O pipeline é uma sequência de estágios configurada uma vez na inicialização:
//!
//! 1.  **Tokenização** ([`tokenizer`]): fronteiras de palavra Unicode, preservando offsets.
//! 2.  **Entity Ruler** ([`rule_based`]): padrões léxicos exatos ([`patterns`]) com labels
//!     customizados (`BUSINESS_TYPE`, `LOCATION`). Tem prioridade sobre o modelo.
//! 3.  **Modelo Estatístico** ([`model`]): CRF ([`crf`], [`viterbi`]) sobre features
//!     ([`features`]) mais gazetteers ([`gazetteer`]), para PERSON, ORG, GPE, LOC e MONEY.
//! 4.  **Resolução** ([`matcher`]): estágios consultados em ordem; o primeiro a reivindicar
//!     um token fica com ele.
//! 5.  **Saída**: [`Document`] com tokens e [`EntitySpan`]s ordenados.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use textparse_core::{NerPipeline, PipelineConfig};
//!
//! // 1. Configura o pipeline (modelo + regras), uma vez por processo
//! let pipeline = NerPipeline::configured(&PipelineConfig::default()).unwrap();
//!
//! // 2. Analisa um texto
//! let doc = pipeline.analyze("Family restaurant downtown, near Leeds.");
//!
//! // 3. Exibe as entidades encontradas
//! for (text, label) in doc.entity_pairs() {
//!     println!("{text} -> {label}");
//! }
//! ```

pub mod crf;
pub mod error;
pub mod features;
pub mod gazetteer;
pub mod lexicon;
pub mod matcher;
pub mod model;
pub mod patterns;
pub mod pipeline;
pub mod rule_based;
pub mod tagger;
pub mod tokenizer;
pub mod viterbi;

pub use error::{NlpError, Result};
pub use matcher::{EntityMatch, EntityMatcher};
pub use model::StatisticalModel;
pub use patterns::{EntityPattern, PatternSet};
pub use pipeline::{Document, NerPipeline, PipelineConfig};
pub use rule_based::EntityRuler;
pub use tagger::{EntitySpan, Tag, TaggedToken};
pub use tokenizer::Token;
