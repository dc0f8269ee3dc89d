//! # listing-gen: Anúncios Sintéticos de Negócios
//!
//! Gera registros `{industry, location, price, description}` por amostragem
//! uniforme de listas fixas e grava tudo em um único arquivo JSON.
//!
//! ```rust
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let listings = listing_gen::generate(3, &mut rng);
//! assert_eq!(listings.len(), 3);
//! assert!(listings[0].price.starts_with('£'));
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

pub const INDUSTRIES: &[&str] = &[
    "Retail",
    "Technology",
    "Food & Beverage",
    "Manufacturing",
    "Services",
    "Hospitality",
    "Construction",
    "Healthcare",
    "Real Estate",
    "Transport & Logistics",
];

pub const UK_CITIES: &[&str] = &[
    "London",
    "Manchester",
    "Birmingham",
    "Leeds",
    "Glasgow",
    "Liverpool",
    "Bristol",
    "Edinburgh",
    "Sheffield",
    "Cardiff",
    "Newcastle",
    "Nottingham",
];

/// Faixa de preço em libras inteiras (fim exclusivo)
pub const PRICE_MIN: u64 = 100_000;
pub const PRICE_MAX: u64 = 1_000_000;

const TEMPLATES: &[&str] = &[
    "Established {industry} business in {location}, offered at {price}.",
    "Profitable {industry} company based in {location} with a loyal customer base.",
    "Well-known {industry} operation in the heart of {location}, priced at {price}.",
    "Growing {industry} business for sale in {location}; owner retiring.",
    "Turnkey {industry} opportunity in {location} with experienced staff in place.",
];

#[derive(Debug, thiserror::Error)]
pub enum GenError {
    #[error("falha ao gravar {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("falha ao serializar anúncios: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub industry: String,
    pub location: String,
    /// Preço formatado, ex.: `£1,234,567`
    pub price: String,
    pub description: String,
}

/// `£` seguido dos dígitos agrupados de três em três com vírgulas.
pub fn format_price(pounds: u64) -> String {
    let digits = pounds.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    out.push('£');
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, options: &[&'a str]) -> &'a str {
    options[rng.gen_range(0..options.len())]
}

/// Um anúncio com todos os campos sorteados uniformemente
pub fn generate_one<R: Rng + ?Sized>(rng: &mut R) -> Listing {
    let industry = pick(rng, INDUSTRIES);
    let location = pick(rng, UK_CITIES);
    let price = format_price(rng.gen_range(PRICE_MIN..PRICE_MAX));
    let description = pick(rng, TEMPLATES)
        .replace("{industry}", &industry.to_lowercase())
        .replace("{location}", location)
        .replace("{price}", &price);

    Listing {
        industry: industry.to_string(),
        location: location.to_string(),
        price,
        description,
    }
}

pub fn generate<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<Listing> {
    (0..n).map(|_| generate_one(rng)).collect()
}

/// Grava os anúncios como um array JSON indentado, numa única escrita.
pub fn write_listings(path: impl AsRef<Path>, listings: &[Listing]) -> Result<(), GenError> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(listings)?;
    fs::write(path, json).map_err(|source| GenError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), count = listings.len(), "anúncios gravados");
    Ok(())
}
