// src/state.rs
use std::cell::RefCell;
use std::rc::Rc;

/// Active and fallback locale for one UI session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct I18nState {
    current_locale: String,
    fallback_locale: String,
}

impl I18nState {
    pub fn new(current_locale: impl Into<String>, fallback_locale: impl Into<String>) -> Self {
        Self {
            current_locale: current_locale.into(),
            fallback_locale: fallback_locale.into(),
        }
    }

    pub fn current_locale(&self) -> &str {
        &self.current_locale
    }

    pub fn fallback_locale(&self) -> &str {
        &self.fallback_locale
    }

    pub(crate) fn set_current_locale(&mut self, code: impl Into<String>) {
        self.current_locale = code.into();
    }

    pub fn into_shared(self) -> SharedState {
        Rc::new(RefCell::new(self))
    }
}

pub type SharedState = Rc<RefCell<I18nState>>;
