//! Configuração de linha de comando / ambiente do servidor

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use textparse_core::{PipelineConfig, StatisticalModel};

#[derive(Debug, Clone, Parser)]
#[command(name = "textparse-web", about = "Serviço de tokens e entidades (POST /parse)")]
pub struct ServerArgs {
    /// Endereço de escuta
    #[arg(long, env = "TEXTPARSE_BIND", default_value = "0.0.0.0:3000")]
    pub bind: SocketAddr,

    /// Modelo estatístico: nome embutido ou caminho de pesos JSON
    #[arg(long, env = "TEXTPARSE_MODEL", default_value = StatisticalModel::BUILTIN)]
    pub model: String,

    /// Arquivo JSONL com padrões extras para o entity ruler
    #[arg(long, env = "TEXTPARSE_PATTERNS")]
    pub patterns: Option<PathBuf>,

    /// Filtro de log quando RUST_LOG não está definido
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl ServerArgs {
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            model: self.model.clone(),
            patterns_file: self.patterns.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = ServerArgs::try_parse_from(["textparse-web"]).unwrap();
        assert_eq!(args.bind.port(), 3000);
        assert_eq!(args.pipeline_config(), PipelineConfig::default());
    }

    #[test]
    fn test_flags_override() {
        let args = ServerArgs::try_parse_from([
            "textparse-web",
            "--bind",
            "127.0.0.1:8080",
            "--model",
            "weights.json",
            "--patterns",
            "extra.jsonl",
        ])
        .unwrap();
        let config = args.pipeline_config();
        assert_eq!(args.bind.port(), 8080);
        assert_eq!(config.model, "weights.json");
        assert_eq!(config.patterns_file, Some(PathBuf::from("extra.jsonl")));
    }
}
