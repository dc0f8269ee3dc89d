//! # CRF: Conditional Random Field Linear-Chain
//!
//! O reconhecedor estatístico pontua sequências de tags com um CRF de cadeia
//! linear. O score de uma sequência é a soma dos scores de emissão (feature × tag)
//! e de transição (tag anterior → tag atual):
//!
//! ```text
//! score(y, x) = Σ_i [emission_score(y_i, x, i) + transition_score(y_{i-1}, y_i)]
//! ```
//!
//! Os pesos são fixos (pré-treinados) e podem ser serializados em JSON.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::features::FeatureVector;
use crate::tagger::Tag;

/// Modelo CRF com pesos definidos
///
/// - `emission_weights`: `"feature|TAG"` → peso
/// - `transition_weights`: matriz `[tag_prev][tag_next]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrfModel {
    pub emission_weights: HashMap<String, f64>,
    pub transition_weights: Vec<Vec<f64>>,
}

impl CrfModel {
    /// Cria um modelo CRF com pesos zerados
    pub fn new() -> Self {
        let n = Tag::COUNT;
        Self {
            emission_weights: HashMap::new(),
            transition_weights: vec![vec![0.0f64; n]; n],
        }
    }

    /// Score de emissão para uma tag num token: `Σ_k w_{k, tag} * f_k(x, i)`
    pub fn emission_score(&self, features: &FeatureVector, tag: &Tag) -> f64 {
        let tag_label = tag.label();
        features
            .features
            .iter()
            .map(|(feat_name, feat_val)| {
                let key = format!("{feat_name}|{tag_label}");
                feat_val * self.emission_weights.get(&key).unwrap_or(&0.0)
            })
            .sum()
    }

    pub fn transition_score(&self, prev: &Tag, next: &Tag) -> f64 {
        self.transition_weights[prev.index()][next.index()]
    }

    pub fn set_emission(&mut self, feature: &str, tag: &Tag, weight: f64) {
        let key = format!("{feature}|{}", tag.label());
        self.emission_weights.insert(key, weight);
    }

    pub fn set_transition(&mut self, from: &Tag, to: &Tag, weight: f64) {
        self.transition_weights[from.index()][to.index()] = weight;
    }

    /// Confere se a matriz de transição tem a dimensão do conjunto de tags.
    ///
    /// Pesos carregados de arquivo passam por aqui antes de serem usados.
    pub fn check_shape(&self) -> Result<(), String> {
        let n = Tag::COUNT;
        if self.transition_weights.len() != n
            || self.transition_weights.iter().any(|row| row.len() != n)
        {
            return Err(format!("matriz de transição deve ser {n}x{n}"));
        }
        Ok(())
    }
}

impl Default for CrfModel {
    fn default() -> Self {
        Self::new()
    }
}

/// Scores de emissão para todos os tokens e tags: `emission[i][t]`
pub fn compute_emission_scores(
    model: &CrfModel,
    feature_vectors: &[FeatureVector],
) -> Vec<Vec<f64>> {
    let tags = Tag::all();
    feature_vectors
        .iter()
        .map(|fv| tags.iter().map(|tag| model.emission_score(fv, tag)).collect())
        .collect()
}
