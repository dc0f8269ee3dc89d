//! Erros de configuração do pipeline.
//!
//! Todos os erros acontecem na inicialização (carga de modelo, leitura de padrões,
//! montagem dos estágios). Depois de configurado, `analyze` não falha.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, NlpError>;

#[derive(Debug, thiserror::Error)]
pub enum NlpError {
    #[error("falha ao carregar o modelo '{name}': {reason}")]
    ModelLoad { name: String, reason: String },

    #[error("padrão inválido (linha {line}): {reason}")]
    Pattern { line: usize, reason: String },

    #[error("regra #{position} do entity ruler inválida: {reason}")]
    InvalidRule { position: usize, reason: String },

    #[error("estágio '{0}' não existe no pipeline")]
    UnknownStage(String),

    #[error("erro de E/S em {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON inválido: {0}")]
    Json(#[from] serde_json::Error),
}

impl NlpError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        NlpError::Io {
            path: path.into(),
            source,
        }
    }
}
