use serde::{Deserialize, Serialize};

use crate::errors::SessionError;

/// The fixed set of questions a user can ask about a product.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaqCategory {
    #[default]
    PolicyBenefits,
    QuoteRequirements,
    ClaimsProcess,
    AddOns,
}

impl FaqCategory {
    /// Display order for question menus.
    pub const ALL: [FaqCategory; 4] =
        [Self::PolicyBenefits, Self::QuoteRequirements, Self::ClaimsProcess, Self::AddOns];

    pub fn label(self) -> &'static str {
        match self {
            Self::PolicyBenefits => "Policy benefits",
            Self::QuoteRequirements => "What you need to get a quote",
            Self::ClaimsProcess => "How to make a claim",
            Self::AddOns => "What add-ons are available",
        }
    }

    /// Key under which the answer is stored in a product's `faqs` mapping.
    pub fn key(self) -> &'static str {
        match self {
            Self::PolicyBenefits => "policy_benefits",
            Self::QuoteRequirements => "quote_requirements",
            Self::ClaimsProcess => "claims_process",
            Self::AddOns => "add_ons",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.label() == label)
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.key() == key)
    }
}

impl std::fmt::Display for FaqCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for FaqCategory {
    type Err = SessionError;

    /// Accepts either a field key or a display label, ignoring case and
    /// surrounding whitespace.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| {
                category.key() == normalized || category.label().to_ascii_lowercase() == normalized
            })
            .ok_or_else(|| SessionError::UnknownCategory { input: value.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::FaqCategory;
    use crate::errors::SessionError;

    #[test]
    fn label_to_key_table_is_fixed() {
        let table: Vec<(&str, &str)> =
            FaqCategory::ALL.iter().map(|category| (category.label(), category.key())).collect();

        assert_eq!(
            table,
            vec![
                ("Policy benefits", "policy_benefits"),
                ("What you need to get a quote", "quote_requirements"),
                ("How to make a claim", "claims_process"),
                ("What add-ons are available", "add_ons"),
            ]
        );
    }

    #[test]
    fn parses_keys_and_labels() {
        assert_eq!("add_ons".parse::<FaqCategory>(), Ok(FaqCategory::AddOns));
        assert_eq!("How to make a claim".parse::<FaqCategory>(), Ok(FaqCategory::ClaimsProcess));
        assert_eq!(
            "  what you need to get a quote ".parse::<FaqCategory>(),
            Ok(FaqCategory::QuoteRequirements)
        );
    }

    #[test]
    fn rejects_unknown_category() {
        let error = "excess".parse::<FaqCategory>().expect_err("should reject");
        assert_eq!(error, SessionError::UnknownCategory { input: "excess".to_string() });
    }

    #[test]
    fn lookup_by_label_is_exact() {
        assert_eq!(FaqCategory::from_label("Policy benefits"), Some(FaqCategory::PolicyBenefits));
        assert_eq!(FaqCategory::from_label("policy benefits"), None);
        assert_eq!(FaqCategory::from_key("claims_process"), Some(FaqCategory::ClaimsProcess));
    }
}
