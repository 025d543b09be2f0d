use std::sync::Arc;

use crate::answers::{resolve_answer, RenderedAnswer};
use crate::catalog::Catalog;
use crate::domain::faq::FaqCategory;
use crate::domain::product::Product;
use crate::errors::SessionError;
use crate::flows::states::{SessionEvent, SessionState, Transition};

/// One user's pass through select product → select question → show answer.
///
/// The session holds an immutable catalog snapshot. Selecting a product always
/// lands in `ProductSelected`; choosing a category only updates the pending
/// choice; confirming resolves the answer and lands in `AnswerShown`. There is
/// no terminal state.
#[derive(Clone, Debug)]
pub struct Session {
    catalog: Arc<Catalog>,
    state: SessionState,
    selected: Option<usize>,
    category: FaqCategory,
    answer: Option<RenderedAnswer>,
}

impl Session {
    pub fn start(catalog: Arc<Catalog>) -> Result<Self, SessionError> {
        if catalog.is_empty() {
            return Err(SessionError::EmptyCatalog);
        }

        Ok(Self {
            catalog,
            state: SessionState::NoProductSelected,
            selected: None,
            category: FaqCategory::default(),
            answer: None,
        })
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn product_names(&self) -> Vec<&str> {
        self.catalog.names()
    }

    pub fn selected_product(&self) -> Option<&Product> {
        self.selected.and_then(|index| self.catalog.products().get(index))
    }

    pub fn pending_category(&self) -> FaqCategory {
        self.category
    }

    pub fn last_answer(&self) -> Option<&RenderedAnswer> {
        self.answer.as_ref()
    }

    pub fn apply(&mut self, event: SessionEvent) -> Result<Transition, SessionError> {
        let from = self.state;

        let answer = match &event {
            SessionEvent::SelectProduct(name) => {
                let index = self
                    .catalog
                    .products()
                    .iter()
                    .position(|product| &product.name == name)
                    .ok_or_else(|| SessionError::UnknownProduct { name: name.clone() })?;
                self.selected = Some(index);
                self.state = SessionState::ProductSelected;
                None
            }
            SessionEvent::ChooseCategory(category) => {
                if self.selected.is_none() {
                    return Err(SessionError::NoProductSelected);
                }
                self.category = *category;
                None
            }
            SessionEvent::Confirm => {
                let product = self.selected_product().ok_or(SessionError::NoProductSelected)?;
                let answer = resolve_answer(product, self.category);
                self.answer = Some(answer.clone());
                self.state = SessionState::AnswerShown;
                Some(answer)
            }
        };

        Ok(Transition { from, to: self.state, event, answer })
    }

    pub fn select_product(&mut self, name: &str) -> Result<Transition, SessionError> {
        self.apply(SessionEvent::SelectProduct(name.to_string()))
    }

    pub fn choose_category(&mut self, category: FaqCategory) -> Result<Transition, SessionError> {
        self.apply(SessionEvent::ChooseCategory(category))
    }

    pub fn confirm(&mut self) -> Result<RenderedAnswer, SessionError> {
        let transition = self.apply(SessionEvent::Confirm)?;
        transition.answer.ok_or(SessionError::NoProductSelected)
    }
}
