//! Provider domain - the request/response capability of an AI back-end

mod provider;

pub use provider::{ProviderRequest, TranslationProvider};

#[cfg(test)]
pub use provider::mock::MockTranslationProvider;
