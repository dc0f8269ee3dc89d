//! # Esquema de Tags BIO e Tipos de Entidade
//!
//! Define o esquema de anotação **BIO** (Beginning-Inside-Outside) utilizado
//! pelo reconhecedor estatístico para rotular tokens.
//!
//! ## Categorias de Entidades
//!
//! | Label  | Significado                    | Exemplos                       |
//! |--------|--------------------------------|--------------------------------|
//! | PERSON | Pessoa                         | Jane Smith, Dr. Patel          |
//! | ORG    | Organização                    | Tesco, Barclays, Acme Ltd      |
//! | GPE    | Entidade geopolítica           | London, Manchester, Scotland   |
//! | LOC    | Local não-político             | Thames, Lake District          |
//! | MONEY  | Valor monetário                | £250,000                       |
//! | O      | Fora de entidade               | (qualquer palavra não-entidade)|
//!
//! Labels customizados (ex: `BUSINESS_TYPE`) não passam por aqui: eles vêm do
//! [`crate::rule_based::EntityRuler`] e aparecem apenas em [`EntitySpan::label`].

use serde::{Deserialize, Serialize};

use crate::tokenizer::Token;

/// Categorias de entidade reconhecidas pelo modelo estatístico.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityCategory {
    /// **Pessoa**: nomes de pessoas. Ex: "Jane Smith".
    Person,
    /// **Organização**: empresas, bancos, órgãos públicos. Ex: "HSBC", "NHS".
    Org,
    /// **Geopolítica**: países, cidades, condados. Ex: "Bristol", "Wales".
    Gpe,
    /// **Localização**: rios, montanhas, regiões sem fronteira política. Ex: "Thames".
    Loc,
    /// **Dinheiro**: símbolo de moeda seguido do valor. Ex: "£1,200".
    Money,
}

impl EntityCategory {
    pub const ALL: [EntityCategory; 5] = [
        EntityCategory::Person,
        EntityCategory::Org,
        EntityCategory::Gpe,
        EntityCategory::Loc,
        EntityCategory::Money,
    ];

    /// Nome da categoria como string (label de saída)
    pub fn name(&self) -> &'static str {
        match self {
            EntityCategory::Person => "PERSON",
            EntityCategory::Org => "ORG",
            EntityCategory::Gpe => "GPE",
            EntityCategory::Loc => "LOC",
            EntityCategory::Money => "MONEY",
        }
    }

    /// Tenta parsear a partir de string (ex: "ORG" → Some(Org))
    pub fn from_name(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == s)
    }
}

/// Tag BIO aplicada a um token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tag {
    /// **Begin**: primeiro token de uma entidade. Ex: **Milton** (B-GPE) Keynes.
    Begin(EntityCategory),
    /// **Inside**: continuação de uma entidade. Ex: Milton **Keynes** (I-GPE).
    Inside(EntityCategory),
    /// **Outside**: o token não faz parte de nenhuma entidade.
    Outside,
}

impl Tag {
    /// Número total de tags possíveis (O + B/I por categoria)
    pub const COUNT: usize = 1 + 2 * EntityCategory::ALL.len();

    /// Representação textual da tag (ex: "B-PERSON", "I-ORG", "O")
    pub fn label(&self) -> String {
        match self {
            Tag::Begin(cat) => format!("B-{}", cat.name()),
            Tag::Inside(cat) => format!("I-{}", cat.name()),
            Tag::Outside => "O".to_string(),
        }
    }

    /// Índice numérico da tag para matrizes CRF/Viterbi.
    pub fn index(&self) -> usize {
        match self {
            Tag::Outside => 0,
            Tag::Begin(cat) => 1 + 2 * category_index(*cat),
            Tag::Inside(cat) => 2 + 2 * category_index(*cat),
        }
    }

    /// Todas as tags, ordenadas por [`Tag::index`]
    pub fn all() -> Vec<Tag> {
        let mut tags = Vec::with_capacity(Self::COUNT);
        tags.push(Tag::Outside);
        for cat in EntityCategory::ALL {
            tags.push(Tag::Begin(cat));
            tags.push(Tag::Inside(cat));
        }
        tags
    }

    /// Retorna a categoria desta tag (se for B- ou I-)
    pub fn category(&self) -> Option<EntityCategory> {
        match self {
            Tag::Begin(c) | Tag::Inside(c) => Some(*c),
            Tag::Outside => None,
        }
    }

    /// Verifica se a transição tag_prev → next é válida no esquema BIO
    ///
    /// - `I-X` só pode seguir `B-X` ou `I-X` (mesma categoria)
    /// - `B-X` e `O` podem seguir qualquer tag
    pub fn is_valid_transition(prev: &Tag, next: &Tag) -> bool {
        match next {
            Tag::Inside(cat) => match prev {
                Tag::Begin(prev_cat) | Tag::Inside(prev_cat) => prev_cat == cat,
                Tag::Outside => false,
            },
            _ => true,
        }
    }

    /// Parseia uma tag a partir de string (ex: "B-GPE" → Begin(Gpe))
    pub fn from_label(s: &str) -> Option<Self> {
        if s == "O" {
            return Some(Tag::Outside);
        }
        let (prefix, name) = s.split_once('-')?;
        let cat = EntityCategory::from_name(name)?;
        match prefix {
            "B" => Some(Tag::Begin(cat)),
            "I" => Some(Tag::Inside(cat)),
            _ => None,
        }
    }
}

fn category_index(cat: EntityCategory) -> usize {
    EntityCategory::ALL
        .iter()
        .position(|c| *c == cat)
        .unwrap_or_default()
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Um token com sua tag BIO e probabilidade de confiança
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaggedToken {
    pub token: Token,
    pub tag: Tag,
    /// Probabilidade/confiança desta atribuição (0.0 a 1.0)
    pub confidence: f64,
    /// Quem decidiu a tag: "crf" ou o nome da regra de gazetteer
    pub source: String,
}

/// Uma entidade identificada no texto (span de um ou mais tokens)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySpan {
    /// Texto da entidade, recortado do original (ex: "Milton Keynes")
    pub text: String,
    /// Label da entidade: estatístico ("GPE") ou customizado ("BUSINESS_TYPE")
    pub label: String,
    /// Índice do primeiro token
    pub start_token: usize,
    /// Índice do último token (inclusivo)
    pub end_token: usize,
    /// Posição de byte inicial no texto original
    pub start: usize,
    /// Posição de byte final no texto original
    pub end: usize,
    /// Confiança média dos tokens
    pub confidence: f64,
    /// Estágio/regra que produziu a entidade
    pub source: String,
}

/// Converte uma sequência de tokens classificados (BIO) em spans de entidades.
///
/// Máquina de estados do esquema BIO:
/// - Inicia uma nova entidade ao encontrar `B-X`.
/// - Continua enquanto encontrar `I-X` da **mesma** categoria.
/// - Finaliza ao encontrar `O`, `B-Y` ou `I-Y` de outra categoria.
///
/// Um `I-X` órfão (sem `B-X` antes) é ignorado.
///
/// # Exemplo
/// `[B-PERSON, I-PERSON, O, B-GPE]` -> `[EntitySpan(PERSON), EntitySpan(GPE)]`
pub fn tokens_to_spans(tagged: &[TaggedToken], original_text: &str) -> Vec<EntitySpan> {
    let mut spans = Vec::new();
    let mut i = 0;

    while i < tagged.len() {
        if let Tag::Begin(cat) = &tagged[i].tag {
            let cat = *cat;
            let start_token = tagged[i].token.index;
            let start_byte = tagged[i].token.start;
            let mut end_token = start_token;
            let mut end_byte = tagged[i].token.end;
            let mut conf_sum = tagged[i].confidence;
            let mut count = 1usize;

            let mut j = i + 1;
            while j < tagged.len() {
                match &tagged[j].tag {
                    Tag::Inside(next_cat) if *next_cat == cat => {
                        end_token = tagged[j].token.index;
                        end_byte = tagged[j].token.end;
                        conf_sum += tagged[j].confidence;
                        count += 1;
                        j += 1;
                    }
                    _ => break,
                }
            }

            spans.push(EntitySpan {
                text: original_text[start_byte..end_byte].to_string(),
                label: cat.name().to_string(),
                start_token,
                end_token,
                start: start_byte,
                end: end_byte,
                confidence: conf_sum / count as f64,
                source: tagged[i].source.clone(),
            });

            i = j;
        } else {
            i += 1;
        }
    }

    spans
}
