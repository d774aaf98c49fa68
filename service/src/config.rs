//! Service configuration.

/// Settings of one modeled service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Principal recorded on drafts when a request carries none.
    pub default_principal: String,
    /// Upper bound for `$top`; also applied when no `$top` is given.
    pub max_page_size: Option<usize>,
    /// Only accept action names qualified with the service namespace (or
    /// its alias); otherwise any qualifier is ignored.
    pub strict_actions: bool,
    /// Copy contained children into drafts on `draftEdit`.
    pub copy_contained_on_edit: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_principal: "anonymous".to_string(),
            max_page_size: None,
            strict_actions: false,
            copy_contained_on_edit: true,
        }
    }
}

impl ServiceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_principal(mut self, principal: impl Into<String>) -> Self {
        self.default_principal = principal.into();
        self
    }

    pub fn with_max_page_size(mut self, max: usize) -> Self {
        self.max_page_size = Some(max);
        self
    }

    pub fn with_strict_actions(mut self, strict: bool) -> Self {
        self.strict_actions = strict;
        self
    }

    pub fn with_contained_copy(mut self, enabled: bool) -> Self {
        self.copy_contained_on_edit = enabled;
        self
    }
}
