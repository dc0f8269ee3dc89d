//! # Padrões Léxicos do Entity Ruler
//!
//! Um padrão associa uma sequência de tokens a um label customizado. O formato
//! JSON é o mesmo nos padrões embutidos e no arquivo de extensão (JSONL, um
//! padrão por linha):
//!
//! ```json
//! {"label": "BUSINESS_TYPE", "pattern": [{"LOWER": "cafe"}]}
//! {"label": "LOCATION", "pattern": "city centre", "id": "centre"}
//! ```
//!
//! - `LOWER`: forma minúscula exata do token
//! - `ORTH`: texto exato do token
//! - `REGEX`: expressão regular sobre o texto do token
//! - string: frase, tokenizada e comparada em minúsculas
//!
//! O conjunto é montado uma vez na inicialização e não é recarregado.

use std::io::BufRead;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{NlpError, Result};

/// Label dos tipos de negócio ("cafe", "restaurant")
pub const BUSINESS_TYPE: &str = "BUSINESS_TYPE";
/// Label de localização das regras customizadas ("downtown")
pub const LOCATION: &str = "LOCATION";

/// Predicado sobre um único token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TokenAttr {
    #[serde(rename = "LOWER")]
    Lower(String),
    #[serde(rename = "ORTH")]
    Orth(String),
    #[serde(rename = "REGEX")]
    Regex(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatternKind {
    Phrase(String),
    Tokens(Vec<TokenAttr>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityPattern {
    pub label: String,
    pub pattern: PatternKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl EntityPattern {
    /// Padrão de um token comparado pela forma minúscula
    pub fn lower(word: &str, label: &str) -> Self {
        Self {
            label: label.to_string(),
            pattern: PatternKind::Tokens(vec![TokenAttr::Lower(word.to_lowercase())]),
            id: None,
        }
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if self.label.trim().is_empty() {
            return Err("label vazio".to_string());
        }
        match &self.pattern {
            PatternKind::Phrase(p) if p.trim().is_empty() => Err("frase vazia".to_string()),
            PatternKind::Tokens(t) if t.is_empty() => Err("lista de tokens vazia".to_string()),
            PatternKind::Tokens(attrs) => {
                for attr in attrs {
                    if let TokenAttr::Regex(re) = attr {
                        regex::Regex::new(re).map_err(|e| e.to_string())?;
                    }
                }
                Ok(())
            }
            PatternKind::Phrase(_) => Ok(()),
        }
    }
}

/// Lista ordenada de padrões; a ordem desempata matches de mesmo tamanho
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatternSet {
    patterns: Vec<EntityPattern>,
}

impl PatternSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Os padrões embutidos do serviço
    pub fn default_patterns() -> Self {
        Self {
            patterns: vec![
                EntityPattern::lower("cafe", BUSINESS_TYPE),
                EntityPattern::lower("restaurant", BUSINESS_TYPE),
                EntityPattern::lower("downtown", LOCATION),
            ],
        }
    }

    /// Lê padrões em JSONL. Linhas em branco são ignoradas.
    pub fn from_jsonl(reader: impl BufRead) -> Result<Self> {
        let mut patterns = Vec::new();
        for (i, line) in reader.lines().enumerate() {
            let line_no = i + 1;
            let line = line.map_err(|e| NlpError::Pattern {
                line: line_no,
                reason: e.to_string(),
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let pattern: EntityPattern =
                serde_json::from_str(&line).map_err(|e| NlpError::Pattern {
                    line: line_no,
                    reason: e.to_string(),
                })?;
            pattern.validate().map_err(|reason| NlpError::Pattern {
                line: line_no,
                reason,
            })?;
            patterns.push(pattern);
        }
        Ok(Self { patterns })
    }

    pub fn load_jsonl(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| NlpError::io(path, e))?;
        Self::from_jsonl(std::io::BufReader::new(file))
    }

    pub fn push(&mut self, pattern: EntityPattern) {
        self.patterns.push(pattern);
    }

    pub fn extend(&mut self, other: PatternSet) {
        self.patterns.extend(other.patterns);
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityPattern> {
        self.patterns.iter()
    }
}
