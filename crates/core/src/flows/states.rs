use serde::{Deserialize, Serialize};

use crate::answers::RenderedAnswer;
use crate::domain::faq::FaqCategory;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    NoProductSelected,
    ProductSelected,
    AnswerShown,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    SelectProduct(String),
    ChooseCategory(FaqCategory),
    Confirm,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub from: SessionState,
    pub to: SessionState,
    pub event: SessionEvent,
    pub answer: Option<RenderedAnswer>,
}
