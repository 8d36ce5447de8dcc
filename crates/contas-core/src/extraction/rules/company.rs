//! Biller identification by keyword lookup.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Known biller companies.
///
/// Declaration order is the lookup order: the first biller with a matching
/// keyword wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Biller {
    Cpfl,
    Cemig,
    Light,
    Enel,
    Eletropaulo,
    Energisa,
    Elektro,
    Sabesp,
    Cedae,
    Sanepar,
    Copasa,
    Embasa,
    Caesb,
    Comgas,
}

impl Biller {
    /// All billers in lookup order.
    pub const ALL: [Biller; 14] = [
        Biller::Cpfl,
        Biller::Cemig,
        Biller::Light,
        Biller::Enel,
        Biller::Eletropaulo,
        Biller::Energisa,
        Biller::Elektro,
        Biller::Sabesp,
        Biller::Cedae,
        Biller::Sanepar,
        Biller::Copasa,
        Biller::Embasa,
        Biller::Caesb,
        Biller::Comgas,
    ];

    /// Normalized company tag.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Cpfl => "CPFL",
            Self::Cemig => "CEMIG",
            Self::Light => "LIGHT",
            Self::Enel => "ENEL",
            Self::Eletropaulo => "ELETROPAULO",
            Self::Energisa => "ENERGISA",
            Self::Elektro => "ELEKTRO",
            Self::Sabesp => "SABESP",
            Self::Cedae => "CEDAE",
            Self::Sanepar => "SANEPAR",
            Self::Copasa => "COPASA",
            Self::Embasa => "EMBASA",
            Self::Caesb => "CAESB",
            Self::Comgas => "COMGAS",
        }
    }

    /// Lower-case keywords that identify this biller.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Cpfl => &["cpfl", "c p f l", "cpfl energia", "cpfl paulista", "cpfl piratininga"],
            Self::Cemig => &["cemig", "c e m i g"],
            Self::Light => &["light", "light sesa"],
            Self::Enel => &["enel", "enel distribuição"],
            Self::Eletropaulo => &["eletropaulo", "aes eletropaulo"],
            Self::Energisa => &["energisa"],
            Self::Elektro => &["elektro", "elektro eletricidade"],
            Self::Sabesp => &["sabesp"],
            Self::Cedae => &["cedae"],
            Self::Sanepar => &["sanepar"],
            Self::Copasa => &["copasa"],
            Self::Embasa => &["embasa"],
            Self::Caesb => &["caesb"],
            Self::Comgas => &["comgas", "comgás", "companhia de gás"],
        }
    }
}

impl fmt::Display for Biller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Identify the biller from the full OCR text.
pub fn identify_company(text: &str) -> Option<Biller> {
    let lower = text.to_lowercase();

    Biller::ALL
        .into_iter()
        .find(|biller| biller.keywords().iter().any(|k| lower.contains(k)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identify_cpfl() {
        assert_eq!(
            identify_company("CPFL PAULISTA\nConsumo 230 kWh"),
            Some(Biller::Cpfl)
        );
    }

    #[test]
    fn test_identify_water_and_gas() {
        assert_eq!(identify_company("Sabesp - Cia de Saneamento"), Some(Biller::Sabesp));
        assert_eq!(identify_company("COMPANHIA DE GÁS DE SÃO PAULO"), Some(Biller::Comgas));
    }

    #[test]
    fn test_lookup_order_breaks_ties() {
        // Both keywords present: CPFL is declared first.
        assert_eq!(identify_company("SABESP / CPFL convenio"), Some(Biller::Cpfl));
    }

    #[test]
    fn test_unknown_company() {
        assert_eq!(identify_company("Condominio Edificio Central"), None);
    }

    #[test]
    fn test_tags() {
        assert_eq!(Biller::Eletropaulo.to_string(), "ELETROPAULO");
        assert_eq!(serde_json::to_string(&Biller::Comgas).unwrap(), "\"COMGAS\"");
    }
}
