//! Generator prompt input.

use std::fmt;

use crate::error::MarketError;

/// A non-blank description of the workflow to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationPrompt(String);

impl GenerationPrompt {
    /// Validates and wraps prompt text. Surrounding whitespace is kept as
    /// typed; only blank prompts are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::EmptyPrompt`] if the text is empty or
    /// whitespace only.
    pub fn new(text: impl Into<String>) -> Result<Self, MarketError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(MarketError::EmptyPrompt);
        }
        Ok(Self(text))
    }

    /// Returns the prompt text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GenerationPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_prompt_rejected() {
        assert!(matches!(GenerationPrompt::new("  \n"), Err(MarketError::EmptyPrompt)));
        assert!(GenerationPrompt::new("resize every image").is_ok());
    }
}
