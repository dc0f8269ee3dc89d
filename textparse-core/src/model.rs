//! # Modelo NER Pré-treinado
//!
//! O modelo estatístico encapsula:
//! - **Pesos CRF** para as categorias PERSON, ORG, GPE, LOC e MONEY
//! - **Gazetteers** compilados das listas em [`crate::lexicon`]
//! - **Tagger de gazetteer** (listas, títulos, sufixos societários)
//!
//! Modelos são carregados **por nome**. O nome embutido é `en_core_crf`, com pesos
//! heurísticos para inglês. Qualquer outro nome é tratado como caminho para um
//! arquivo JSON de pesos ([`CrfModel`]) que reaproveita as listas embutidas.
//!
//! ## Como os pesos foram derivados
//!
//! Os pesos de `en_core_crf` codificam à mão os padrões mais fortes de textos de
//! anúncios em inglês (capitalização, preposições de lugar, símbolo de moeda).
//! Em produção seriam estimados por máxima verossimilhança com L-BFGS.

use std::path::Path;

use tracing::info;

use crate::crf::CrfModel;
use crate::error::{NlpError, Result};
use crate::features::{extract_features, Gazetteers};
use crate::gazetteer::GazetteerTagger;
use crate::lexicon;
use crate::matcher::{EntityMatch, EntityMatcher};
use crate::tagger::{tokens_to_spans, EntityCategory, Tag, TaggedToken};
use crate::tokenizer::Token;
use crate::viterbi::{scores_to_probs, viterbi_decode};

/// O reconhecedor estatístico: CRF + gazetteers.
pub struct StatisticalModel {
    name: String,
    pub crf: CrfModel,
    pub tagger: GazetteerTagger,
    gazetteers: Gazetteers,
}

impl StatisticalModel {
    /// Nome do modelo embutido
    pub const BUILTIN: &'static str = "en_core_crf";
    /// Nome do estágio no pipeline
    pub const STAGE_NAME: &'static str = "ner";

    /// Carrega um modelo pelo nome (embutido ou caminho de arquivo de pesos).
    pub fn load(name: &str) -> Result<Self> {
        let crf = if name == Self::BUILTIN {
            build_crf_model()
        } else if Path::new(name).is_file() {
            load_crf_weights(name)?
        } else {
            return Err(NlpError::ModelLoad {
                name: name.to_string(),
                reason: format!(
                    "modelo desconhecido (embutido: '{}', ou caminho de arquivo JSON)",
                    Self::BUILTIN
                ),
            });
        };

        let (gazetteers, tagger) = build_gazetteers();
        info!(
            model = name,
            emission_weights = crf.emission_weights.len(),
            gazetteer_entries = tagger.len(),
            "modelo estatístico carregado"
        );

        Ok(Self {
            name: name.to_string(),
            crf,
            tagger,
            gazetteers,
        })
    }

    /// Nome com que o modelo foi carregado
    pub fn model_name(&self) -> &str {
        &self.name
    }

    /// Tags por token: o gazetteer decide onde tem conhecimento, o CRF no resto.
    pub fn tag(&self, tokens: &[Token]) -> Vec<TaggedToken> {
        if tokens.is_empty() {
            return vec![];
        }

        let feature_vectors = extract_features(tokens, &self.gazetteers);
        let viterbi = viterbi_decode(&self.crf, &feature_vectors);
        let hits = self.tagger.apply(tokens);

        tokens
            .iter()
            .enumerate()
            .map(|(i, token)| {
                if let Some(hit) = &hits[i] {
                    return TaggedToken {
                        token: token.clone(),
                        tag: hit.tag.clone(),
                        confidence: hit.confidence,
                        source: hit.rule_name.clone(),
                    };
                }
                let tag = viterbi.best_sequence[i].clone();
                let confidence = scores_to_probs(&viterbi.lattice[i])
                    .get(tag.index())
                    .copied()
                    .unwrap_or(0.5);
                TaggedToken {
                    token: token.clone(),
                    tag,
                    confidence,
                    source: "crf".to_string(),
                }
            })
            .collect()
    }
}

impl EntityMatcher for StatisticalModel {
    fn name(&self) -> &str {
        Self::STAGE_NAME
    }

    fn find(&self, text: &str, tokens: &[Token]) -> Vec<EntityMatch> {
        tokens_to_spans(&self.tag(tokens), text)
            .into_iter()
            .map(|span| EntityMatch {
                start_token: span.start_token,
                end_token: span.end_token + 1,
                label: span.label,
                source: span.source,
                confidence: span.confidence,
            })
            .collect()
    }
}

fn load_crf_weights(path: &str) -> Result<CrfModel> {
    let file = std::fs::File::open(path).map_err(|e| NlpError::io(path, e))?;
    let crf: CrfModel = serde_json::from_reader(std::io::BufReader::new(file)).map_err(|e| {
        NlpError::ModelLoad {
            name: path.to_string(),
            reason: e.to_string(),
        }
    })?;
    crf.check_shape().map_err(|reason| NlpError::ModelLoad {
        name: path.to_string(),
        reason,
    })?;
    Ok(crf)
}

/// Constrói o CRF com pesos heurísticos para inglês.
///
/// # Exemplos de Intuição
/// - Palavra nos **gazetteers** → forte sinal da categoria (+5.0).
/// - Palavra capitalizada fora do início da frase → provável entidade.
/// - Depois de "in", "near" ou "from", uma palavra capitalizada tende a ser GPE.
/// - `£` seguido de número → MONEY.
fn build_crf_model() -> CrfModel {
    let mut model = CrfModel::new();
    let b = Tag::Begin;
    let i = Tag::Inside;
    use EntityCategory::*;

    // =====================================================================
    // PESOS DE EMISSÃO (Feature -> Tag)
    // =====================================================================

    // Capitalização: indício de entidade, mais fraco no início da frase.
    model.set_emission("is_capitalized", &b(Person), 1.6);
    model.set_emission("is_capitalized", &b(Org), 1.8);
    model.set_emission("is_capitalized", &b(Gpe), 1.4);
    model.set_emission("is_capitalized", &i(Person), 1.8);
    model.set_emission("is_capitalized", &i(Org), 1.8);
    model.set_emission("is_capitalized", &i(Gpe), 1.6);
    model.set_emission("is_capitalized", &i(Loc), 1.6);
    model.set_emission("BOS", &Tag::Outside, 1.5);
    model.set_emission("prev_is_capitalized", &i(Person), 0.8);
    model.set_emission("prev_is_capitalized", &i(Org), 0.8);

    // Gazetteers: o sinal mais forte.
    model.set_emission("in_person_gazetteer", &b(Person), 5.0);
    model.set_emission("in_person_gazetteer", &i(Person), 4.5);
    model.set_emission("in_org_gazetteer", &b(Org), 5.0);
    model.set_emission("in_org_gazetteer", &i(Org), 4.5);
    model.set_emission("in_gpe_gazetteer", &b(Gpe), 5.0);
    model.set_emission("in_gpe_gazetteer", &i(Gpe), 4.5);
    model.set_emission("in_loc_gazetteer", &b(Loc), 5.0);
    model.set_emission("in_loc_gazetteer", &i(Loc), 4.5);

    // Siglas: "HSBC", "BBC"
    model.set_emission("is_all_caps", &b(Org), 1.5);

    // --- PERSON ---
    for title in ["mr", "mrs", "ms", "dr", "dr.", "mr.", "mrs.", "sir", "owner", "chef"] {
        model.set_emission(&format!("prev_word={title}"), &b(Person), 2.5);
    }
    for verb in ["said", "says", "told", "founded"] {
        model.set_emission(&format!("next_word={verb}"), &b(Person), 1.0);
    }

    // --- ORG ---
    for word in ["ltd", "ltd.", "plc", "limited", "group", "inc", "inc."] {
        model.set_emission(&format!("next_word={word}"), &b(Org), 2.5);
    }
    for word in ["at", "by", "with"] {
        model.set_emission(&format!("prev_word={word}"), &b(Org), 0.6);
    }
    model.set_emission("suffix4=bank", &b(Org), 2.0);
    model.set_emission("suffix3=ltd", &b(Org), 1.0);

    // --- GPE ---
    for prep in ["in", "near", "from", "across", "around", "outside"] {
        model.set_emission(&format!("prev_word={prep}"), &b(Gpe), 1.2);
    }
    model.set_emission("suffix4=shire", &b(Gpe), 2.0);
    model.set_emission("suffix3=ton", &b(Gpe), 0.6);
    model.set_emission("suffix3=ham", &b(Gpe), 0.6);
    model.set_emission("suffix4=ford", &b(Gpe), 0.6);
    model.set_emission("suffix4=pool", &b(Gpe), 0.6);

    // --- LOC ---
    for word in ["river", "lake", "mount", "the"] {
        model.set_emission(&format!("prev_word={word}"), &b(Loc), 0.5);
    }

    // --- MONEY ---
    model.set_emission("is_currency_symbol", &b(Money), 6.0);
    model.set_emission("prev_is_currency", &i(Money), 4.0);
    model.set_emission("is_number", &i(Money), 1.0);
    for scale in ["k", "m", "million", "thousand", "bn", "billion"] {
        model.set_emission(&format!("word={scale}"), &i(Money), 1.0);
    }

    // Palavra comum → Outside
    model.set_emission("bias", &Tag::Outside, 1.0);
    model.set_emission("is_punctuation", &Tag::Outside, 5.0);
    model.set_emission("is_number", &Tag::Outside, 1.5);

    // =====================================================================
    // PESOS DE TRANSIÇÃO
    // =====================================================================

    let tags = Tag::all();
    for prev in &tags {
        for next in &tags {
            if !Tag::is_valid_transition(prev, next) {
                model.set_transition(prev, next, -8.0);
            }
        }
    }

    for cat in EntityCategory::ALL {
        model.set_transition(&b(cat), &i(cat), 2.0);
        model.set_transition(&i(cat), &i(cat), 1.5);
        model.set_transition(&b(cat), &Tag::Outside, 1.0);
        model.set_transition(&i(cat), &Tag::Outside, 1.0);
        model.set_transition(&Tag::Outside, &b(cat), 0.5);
    }
    model.set_transition(&b(Money), &i(Money), 4.0);
    model.set_transition(&Tag::Outside, &Tag::Outside, 2.0);

    model
}

/// Monta os gazetteers de features e o tagger a partir das listas embutidas.
///
/// As features usam palavras isoladas; o tagger usa os nomes completos.
fn build_gazetteers() -> (Gazetteers, GazetteerTagger) {
    let mut gaz = Gazetteers::default();
    let mut tagger = GazetteerTagger::new();

    let lists: [(&[&str], EntityCategory); 4] = [
        (lexicon::PERSONS, EntityCategory::Person),
        (lexicon::ORGANIZATIONS, EntityCategory::Org),
        (lexicon::GPES, EntityCategory::Gpe),
        (lexicon::LOCATIONS, EntityCategory::Loc),
    ];

    for (names, category) in lists {
        let words = match category {
            EntityCategory::Person => &mut gaz.persons,
            EntityCategory::Org => &mut gaz.organizations,
            EntityCategory::Gpe => &mut gaz.gpes,
            EntityCategory::Loc | EntityCategory::Money => &mut gaz.locations,
        };
        for name in names {
            tagger.add(name, category);
            for word in name.split_whitespace() {
                if word.chars().count() > 3 {
                    words.insert(word.to_lowercase());
                }
            }
        }
    }

    (gaz, tagger)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    fn entities(model: &StatisticalModel, text: &str) -> Vec<(String, String)> {
        let mut found = model.find(text, &tokenize(text));
        found.sort_by_key(|m| m.start_token);
        let tokens = tokenize(text);
        found
            .into_iter()
            .map(|m| {
                let start = tokens[m.start_token].start;
                let end = tokens[m.end_token - 1].end;
                (text[start..end].to_string(), m.label)
            })
            .collect()
    }

    #[test]
    fn test_builtin_loads() {
        let model = StatisticalModel::load(StatisticalModel::BUILTIN).unwrap();
        assert_eq!(model.model_name(), "en_core_crf");
        assert!(!model.tagger.is_empty());
    }

    #[test]
    fn test_unknown_model_name() {
        assert!(matches!(
            StatisticalModel::load("xx_missing_model"),
            Err(NlpError::ModelLoad { .. })
        ));
    }

    #[test]
    fn test_gazetteer_gpe() {
        let model = StatisticalModel::load(StatisticalModel::BUILTIN).unwrap();
        let found = entities(&model, "A bakery for sale in Manchester.");
        assert!(found.contains(&("Manchester".to_string(), "GPE".to_string())));
    }

    #[test]
    fn test_multiword_org_from_gazetteer() {
        let model = StatisticalModel::load(StatisticalModel::BUILTIN).unwrap();
        let found = entities(&model, "Near the Bank of England");
        assert!(found.contains(&("Bank of England".to_string(), "ORG".to_string())));
    }

    #[test]
    fn test_money_from_currency_symbol() {
        let model = StatisticalModel::load(StatisticalModel::BUILTIN).unwrap();
        let found = entities(&model, "asking price is £250,000 today");
        assert!(found.contains(&("£250,000".to_string(), "MONEY".to_string())));
    }

    #[test]
    fn test_lowercase_text_has_no_entities() {
        let model = StatisticalModel::load(StatisticalModel::BUILTIN).unwrap();
        assert!(entities(&model, "hello world").is_empty());
    }

    #[test]
    fn test_common_nouns_matching_lexicon_are_not_entities() {
        let model = StatisticalModel::load(StatisticalModel::BUILTIN).unwrap();
        for text in [
            "i enjoy reading by the fire",
            "a hot bath and an apple pie",
            "brown bread and jack cheese",
        ] {
            assert!(entities(&model, text).is_empty(), "{text}");
        }
    }

    #[test]
    fn test_capitalized_lexicon_words_are_entities() {
        let model = StatisticalModel::load(StatisticalModel::BUILTIN).unwrap();
        let found = entities(&model, "Apple opened a store in Reading.");
        assert!(found.contains(&("Apple".to_string(), "ORG".to_string())));
        assert!(found.contains(&("Reading".to_string(), "GPE".to_string())));
    }

    #[test]
    fn test_tag_empty() {
        let model = StatisticalModel::load(StatisticalModel::BUILTIN).unwrap();
        assert!(model.tag(&[]).is_empty());
    }

    #[test]
    fn test_load_weights_from_file() {
        let crf = build_crf_model();
        let file = tempfile::NamedTempFile::new().unwrap();
        serde_json::to_writer(file.as_file(), &crf).unwrap();

        let path = file.path().to_str().unwrap();
        let model = StatisticalModel::load(path).unwrap();
        assert_eq!(model.crf.emission_weights, crf.emission_weights);
    }

    #[test]
    fn test_malformed_weights_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"{\"emission_weights\": 3}").unwrap();
        let path = file.path().to_str().unwrap();
        assert!(matches!(
            StatisticalModel::load(path),
            Err(NlpError::ModelLoad { .. })
        ));
    }
}
