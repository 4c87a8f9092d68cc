//! Translation domain - requests, results and provider instructions

mod prompt;
mod request;
mod translator;

pub use prompt::{Interpretation, interpret, system_instruction};
pub use request::{
    ANONYMOUS_ACTOR, MEDICAL_LANGUAGE, SIMPLE_LANGUAGE, TranslationRequest, TranslationResult,
};
pub use translator::Translator;

#[cfg(test)]
pub use translator::mock::MockTranslator;
