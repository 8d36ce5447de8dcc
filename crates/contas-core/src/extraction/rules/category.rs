//! Bill category classification by keyword membership.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Bill category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BillType {
    Electricity,
    Water,
    Gas,
    Internet,
    Phone,
    #[default]
    Other,
}

impl BillType {
    /// Portuguese name used in bill titles.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Electricity => "Conta de Luz",
            Self::Water => "Conta de Água",
            Self::Gas => "Conta de Gás",
            Self::Internet => "Internet",
            Self::Phone => "Telefone",
            Self::Other => "Conta",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Electricity => "ELECTRICITY",
            Self::Water => "WATER",
            Self::Gas => "GAS",
            Self::Internet => "INTERNET",
            Self::Phone => "PHONE",
            Self::Other => "OTHER",
        }
    }
}

impl fmt::Display for BillType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const ELECTRICITY_KEYWORDS: &[&str] = &[
    "energia",
    "eletric",
    "kwh",
    "kw/h",
    "consumo de energia",
    "cpfl",
    "cemig",
    "light",
    "enel",
    "eletropaulo",
    "energisa",
    "elektro",
    "distribuidora de energia",
    "fornecimento de energia",
];

const WATER_KEYWORDS: &[&str] = &[
    "água",
    "agua",
    "saneamento",
    "abastecimento",
    "sabesp",
    "cedae",
    "sanepar",
    "copasa",
    "embasa",
    "caesb",
    "m³",
    "m3",
    "metro cúbico",
];

const GAS_KEYWORDS: &[&str] = &[
    "gás",
    "gas",
    "comgas",
    "companhia de gás",
    "gás natural",
    "gas natural",
];

const INTERNET_KEYWORDS: &[&str] = &[
    "internet",
    "banda larga",
    "fibra",
    "wi-fi",
    "wifi",
    "provedor",
    "mega",
    "mbps",
    "gb",
];

const PHONE_KEYWORDS: &[&str] = &[
    "telefon",
    "celular",
    "mobile",
    "tim",
    "vivo",
    "claro",
    "oi",
    "linha telefônica",
    "serviços de telefonia",
];

/// Keyword sets in test order. Electricity brands are checked first.
const CATEGORY_RULES: [(BillType, &[&str]); 5] = [
    (BillType::Electricity, ELECTRICITY_KEYWORDS),
    (BillType::Water, WATER_KEYWORDS),
    (BillType::Gas, GAS_KEYWORDS),
    (BillType::Internet, INTERNET_KEYWORDS),
    (BillType::Phone, PHONE_KEYWORDS),
];

/// Classify a bill from its full OCR text.
pub fn classify(text: &str) -> BillType {
    let lower = text.to_lowercase();

    CATEGORY_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(bill_type, _)| *bill_type)
        .unwrap_or_default()
}
