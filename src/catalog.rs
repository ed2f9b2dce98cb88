//! The fixed allergen taxonomy and its per-language presentation data.
//!
//! The catalog is reference data: it seeds the database at startup and its
//! enumeration order defines the column order of the allergen matrix report.

/// Allergen code excluded by the gluten-free product filter.
pub const GLUTEN: &str = "gluten";

/// One entry of the allergen taxonomy.
pub struct AllergenSpec {
    pub code: &'static str,
    pub label_en: &'static str,
    pub label_nl: &'static str,
    /// Icon file name, relative to the configured assets directory.
    pub icon: &'static str,
}

/// NVWA allergen list (simplified). Order is significant.
pub const ALLERGEN_CATALOG: [AllergenSpec; 14] = [
    AllergenSpec {
        code: "gluten",
        label_en: "Cereals containing gluten",
        label_nl: "Glutenbevattende granen",
        icon: "gluten.png",
    },
    AllergenSpec {
        code: "crustaceans",
        label_en: "Crustaceans",
        label_nl: "Schaaldieren",
        icon: "crustaceans.png",
    },
    AllergenSpec {
        code: "eggs",
        label_en: "Eggs",
        label_nl: "Eieren",
        icon: "eggs.png",
    },
    AllergenSpec {
        code: "fish",
        label_en: "Fish",
        label_nl: "Vis",
        icon: "fish.png",
    },
    AllergenSpec {
        code: "peanuts",
        label_en: "Peanuts",
        label_nl: "Pinda's",
        icon: "peanuts.png",
    },
    AllergenSpec {
        code: "soy",
        label_en: "Soybeans",
        label_nl: "Sojabonen",
        icon: "soy.png",
    },
    AllergenSpec {
        code: "milk",
        label_en: "Milk",
        label_nl: "Melk",
        icon: "milk.png",
    },
    AllergenSpec {
        code: "nuts",
        label_en: "Nuts",
        label_nl: "Noten",
        icon: "nuts.png",
    },
    AllergenSpec {
        code: "celery",
        label_en: "Celery",
        label_nl: "Selderij",
        icon: "celery.png",
    },
    AllergenSpec {
        code: "mustard",
        label_en: "Mustard",
        label_nl: "Mosterd",
        icon: "mustard.png",
    },
    AllergenSpec {
        code: "sesame",
        label_en: "Sesame seeds",
        label_nl: "Sesamzaad",
        icon: "sesame.png",
    },
    AllergenSpec {
        code: "sulphites",
        label_en: "Sulphur dioxide and sulphites",
        label_nl: "Zwaveldioxide en sulfieten",
        icon: "sulphites.png",
    },
    AllergenSpec {
        code: "lupin",
        label_en: "Lupin",
        label_nl: "Lupine",
        icon: "lupin.png",
    },
    AllergenSpec {
        code: "molluscs",
        label_en: "Molluscs",
        label_nl: "Weekdieren",
        icon: "molluscs.png",
    },
];

/// Products seeded at startup, with their allergen codes.
pub const SEED_PRODUCTS: [(&str, &[&str]); 3] = [
    ("Frikandel", &["gluten", "soy", "mustard"]),
    ("Kroket", &["gluten", "milk"]),
    ("Bread", &["gluten"]),
];

/// The closed set of report languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    En,
    Nl,
}

impl Language {
    /// Parses a language tag. Anything outside the closed set is rejected;
    /// callers decide how to surface that (the renderer turns it into
    /// `ReportError::InvalidLanguage`).
    pub fn parse(tag: &str) -> Option<Language> {
        match tag {
            "en" => Some(Language::En),
            "nl" => Some(Language::Nl),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Nl => "nl",
        }
    }
}

/// Fixed per-language report strings. Total over `Language`, so there is no
/// fallible lookup once a language has been parsed.
pub struct ReportStrings {
    pub title: &'static str,
    pub page_word: &'static str,
}

pub fn report_strings(language: Language) -> ReportStrings {
    match language {
        Language::En => ReportStrings {
            title: "Allergen Matrix",
            page_word: "Page",
        },
        Language::Nl => ReportStrings {
            title: "Allergenenmatrix",
            page_word: "Pagina",
        },
    }
}

/// A catalog entry projected for one language: what the renderer needs to
/// draw a column header.
pub struct ResolvedColumn {
    pub code: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
}

/// Projects the catalog for the given language, preserving catalog order.
pub fn columns_for(language: Language) -> Vec<ResolvedColumn> {
    ALLERGEN_CATALOG
        .iter()
        .map(|entry| ResolvedColumn {
            code: entry.code,
            label: match language {
                Language::En => entry.label_en,
                Language::Nl => entry.label_nl,
            },
            icon: entry.icon,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_codes_are_unique() {
        let codes: HashSet<_> = ALLERGEN_CATALOG.iter().map(|a| a.code).collect();
        assert_eq!(codes.len(), ALLERGEN_CATALOG.len());
    }

    #[test]
    fn catalog_contains_gluten() {
        assert!(ALLERGEN_CATALOG.iter().any(|a| a.code == GLUTEN));
    }

    #[test]
    fn column_order_is_identical_across_languages() {
        let en: Vec<_> = columns_for(Language::En).iter().map(|c| c.code).collect();
        let nl: Vec<_> = columns_for(Language::Nl).iter().map(|c| c.code).collect();
        assert_eq!(en, nl);
        assert_eq!(en.len(), 14);
        assert_eq!(en[0], "gluten");
    }

    #[test]
    fn language_parse_rejects_unknown_tags() {
        assert_eq!(Language::parse("en"), Some(Language::En));
        assert_eq!(Language::parse("nl"), Some(Language::Nl));
        assert_eq!(Language::parse("de"), None);
        assert_eq!(Language::parse("EN"), None);
        assert_eq!(Language::parse(""), None);
    }

    #[test]
    fn seed_products_reference_cataloged_codes_only() {
        let codes: HashSet<_> = ALLERGEN_CATALOG.iter().map(|a| a.code).collect();
        for (_, product_codes) in SEED_PRODUCTS {
            for code in product_codes {
                assert!(codes.contains(code), "unknown allergen code {code}");
            }
        }
    }
}
