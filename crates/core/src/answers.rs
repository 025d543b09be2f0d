use serde::Serialize;

use crate::domain::faq::FaqCategory;
use crate::domain::product::{Product, ProductId};

pub const FALLBACK_ANSWER: &str = "Sorry, we don't have information for this yet.";

pub const DISCLAIMER: &str = "This information is a guide only and does not form part of your \
                              policy terms. Please refer to your policy documents for full details.";

/// An answer ready to display: category label as heading, the stored answer
/// (or the fallback text) as body, and the disclaimer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RenderedAnswer {
    pub product_id: ProductId,
    pub product_name: String,
    pub category: FaqCategory,
    pub heading: String,
    pub body: String,
    pub disclaimer: String,
    pub answered: bool,
}

pub fn resolve_answer(product: &Product, category: FaqCategory) -> RenderedAnswer {
    let stored = product.answer(category.key());

    RenderedAnswer {
        product_id: product.id.clone(),
        product_name: product.name.clone(),
        category,
        heading: category.label().to_string(),
        body: stored.unwrap_or(FALLBACK_ANSWER).to_string(),
        disclaimer: DISCLAIMER.to_string(),
        answered: stored.is_some(),
    }
}

impl RenderedAnswer {
    pub fn to_text(&self) -> String {
        format!("{}\n\n{}\n\n{}", self.heading, self.body, self.disclaimer)
    }
}
