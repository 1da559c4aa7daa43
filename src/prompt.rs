use crate::error::ImproveError;

/// Placeholder replaced by the user's input line.
pub const TEXT_PLACEHOLDER: &str = "{text}";

/// Instruction sent to every provider unless overridden by configuration.
pub const DEFAULT_PROMPT_TEMPLATE: &str = "Rewrite the following resume bullet point as a single line using the X-Y-Z formula: \"Accomplished [X] as measured by [Y], by doing [Z]\". \
If the original has no measurable result, add a realistic quantified metric. \
Reply with only the rewritten bullet on one line, with no label, no quotation marks and no explanation.\n\n\
Original: {text}";

/// Prompt template with a single `{text}` slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    /// Validates and wraps a custom template.
    ///
    /// # Errors
    ///
    /// Returns [`ImproveError::Config`] when the template has no `{text}` placeholder.
    pub fn new(template: impl Into<String>) -> Result<Self, ImproveError> {
        let template = template.into();
        if !template.contains(TEXT_PLACEHOLDER) {
            return Err(ImproveError::config(format!(
                "prompt template must contain the {TEXT_PLACEHOLDER} placeholder"
            )));
        }
        Ok(Self { template })
    }

    /// Interpolates `text` into every placeholder occurrence.
    ///
    /// # Examples
    ///
    /// ```
    /// use bullet_forge::PromptTemplate;
    ///
    /// let template = PromptTemplate::new("Improve: {text}").unwrap();
    /// assert_eq!(template.render("Led a team"), "Improve: Led a team");
    /// ```
    pub fn render(&self, text: &str) -> String {
        self.template.replace(TEXT_PLACEHOLDER, text)
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            template: DEFAULT_PROMPT_TEMPLATE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_template_mentions_formula_and_placeholder() {
        let template = PromptTemplate::default();
        assert!(template.as_str().contains("X-Y-Z"));
        assert!(template.as_str().contains(TEXT_PLACEHOLDER));
    }

    #[test]
    fn render_interpolates_text_once() {
        let prompt = PromptTemplate::default().render("Managed the release process");
        assert!(prompt.ends_with("Original: Managed the release process"));
        assert!(!prompt.contains(TEXT_PLACEHOLDER));
    }

    #[test]
    fn new_rejects_template_without_placeholder() {
        let err = PromptTemplate::new("Rewrite this").expect_err("should fail");
        assert!(matches!(err, ImproveError::Config { .. }));
    }
}
