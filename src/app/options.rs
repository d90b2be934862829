use std::time::Duration;

pub const DEFAULT_MODEL_GROUP_ROUTE: &str = "/model-groups";

#[derive(Debug, Clone)]
pub struct EditorOptions {
    /// Items carrying an `enable_toggle` are gated by it.
    pub override_mode: bool,
    pub locale: Option<String>,
    pub invalid_json_placeholder: String,
    pub secret_mask: char,
    pub model_group_route: String,
    pub tick_rate: Duration,
    pub confirm_exit: bool,
    pub show_help: bool,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            override_mode: false,
            locale: None,
            invalid_json_placeholder: "invalid JSON".to_string(),
            secret_mask: '•',
            model_group_route: DEFAULT_MODEL_GROUP_ROUTE.to_string(),
            tick_rate: Duration::from_millis(250),
            confirm_exit: true,
            show_help: true,
        }
    }
}

impl EditorOptions {
    pub fn with_override_mode(mut self, enabled: bool) -> Self {
        self.override_mode = enabled;
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn with_invalid_json_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.invalid_json_placeholder = placeholder.into();
        self
    }

    pub fn with_secret_mask(mut self, mask: char) -> Self {
        self.secret_mask = mask;
        self
    }

    pub fn with_model_group_route(mut self, route: impl Into<String>) -> Self {
        self.model_group_route = route.into();
        self
    }

    pub fn with_tick_rate(mut self, tick_rate: Duration) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    pub fn with_confirm_exit(mut self, confirm: bool) -> Self {
        self.confirm_exit = confirm;
        self
    }

    pub fn with_help(mut self, show: bool) -> Self {
        self.show_help = show;
        self
    }

    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }
}
