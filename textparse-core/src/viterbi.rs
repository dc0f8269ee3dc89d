//! # Algoritmo de Viterbi: Decodificação de Sequências CRF
//!
//! Programação dinâmica que encontra a sequência de tags de maior score em
//! `O(N × T²)` em vez de `O(T^N)`:
//!
//! ```text
//! Inicialização: viterbi[0][t] = emission(t, x_0)
//! Recursão:      viterbi[i][t] = max_{t'} [viterbi[i-1][t'] + transition(t', t)] + emission(t, x_i)
//! Backtracking:  reconstrói o caminho ótimo de trás pra frente
//! ```

use crate::crf::{compute_emission_scores, CrfModel};
use crate::features::FeatureVector;
use crate::tagger::Tag;

/// Resultado do Viterbi
#[derive(Debug, Clone)]
pub struct ViterbiResult {
    /// Sequência de tags mais provável (uma por token)
    pub best_sequence: Vec<Tag>,
    /// Score (não-normalizado) da melhor sequência
    pub best_score: f64,
    /// Score acumulado de cada tag em cada token, `lattice[i][t]`
    pub lattice: Vec<Vec<f64>>,
}

/// Executa o algoritmo de Viterbi sobre as features de uma sequência
pub fn viterbi_decode(model: &CrfModel, feature_vectors: &[FeatureVector]) -> ViterbiResult {
    if feature_vectors.is_empty() {
        return ViterbiResult {
            best_sequence: vec![],
            best_score: 0.0,
            lattice: vec![],
        };
    }

    let n_tokens = feature_vectors.len();
    let tags = Tag::all();
    let n_tags = tags.len();

    let emission = compute_emission_scores(model, feature_vectors);

    let mut lattice: Vec<Vec<f64>> = Vec::with_capacity(n_tokens);
    let mut backptr: Vec<Vec<usize>> = vec![vec![0usize; n_tags]; n_tokens];

    // Primeiro token: só emissão, mas I-X não pode abrir a frase
    let first: Vec<f64> = (0..n_tags)
        .map(|t| match tags[t] {
            Tag::Inside(_) => emission[0][t] - 10.0,
            _ => emission[0][t],
        })
        .collect();
    lattice.push(first);

    for i in 1..n_tokens {
        let prev = &lattice[i - 1];
        let mut current = vec![f64::NEG_INFINITY; n_tags];

        for t in 0..n_tags {
            let mut best_prev_score = f64::NEG_INFINITY;
            let mut best_prev_tag = 0;

            for prev_t in 0..n_tags {
                let mut score = prev[prev_t] + model.transition_score(&tags[prev_t], &tags[t]);
                if !Tag::is_valid_transition(&tags[prev_t], &tags[t]) {
                    score -= 10.0;
                }
                if score > best_prev_score {
                    best_prev_score = score;
                    best_prev_tag = prev_t;
                }
            }

            current[t] = best_prev_score + emission[i][t];
            backptr[i][t] = best_prev_tag;
        }

        lattice.push(current);
    }

    // Backtracking
    let (mut best_last, best_score) = best_in_slice(&lattice[n_tokens - 1]);
    let mut best_sequence: Vec<Tag> = vec![Tag::Outside; n_tokens];
    best_sequence[n_tokens - 1] = tags[best_last].clone();

    for i in (0..n_tokens - 1).rev() {
        best_last = backptr[i + 1][best_last];
        best_sequence[i] = tags[best_last].clone();
    }

    ViterbiResult {
        best_sequence,
        best_score,
        lattice,
    }
}

/// Retorna (índice, valor) do máximo; empates ficam com o menor índice
fn best_in_slice(scores: &[f64]) -> (usize, f64) {
    let mut best = (0, f64::NEG_INFINITY);
    for (i, &v) in scores.iter().enumerate() {
        if v > best.1 {
            best = (i, v);
        }
    }
    best
}

/// Converte scores em probabilidades softmax (para confiança)
pub fn scores_to_probs(scores: &[f64]) -> Vec<f64> {
    if scores.is_empty() {
        return vec![];
    }
    let max_score = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|&s| (s - max_score).exp()).collect();
    let sum: f64 = exps.iter().sum();
    if sum == 0.0 || !sum.is_finite() {
        return vec![1.0 / scores.len() as f64; scores.len()];
    }
    exps.iter().map(|e| e / sum).collect()
}
