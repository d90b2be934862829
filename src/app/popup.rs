use crate::{
    form::{Binding, Choice, Row, Widget},
    presentation::PopupRender,
};

pub(crate) struct PopupState {
    binding: Binding,
    title: String,
    choices: Vec<Choice>,
    selected: usize,
    multi: bool,
}

impl PopupState {
    pub(crate) fn from_row(row: &Row) -> Option<Self> {
        let widget = row.widget.as_ref()?;
        let choices = widget.choices()?;
        let selected = choices
            .iter()
            .position(|choice| choice.active)
            .unwrap_or(0);
        let title = match widget {
            Widget::ModelGroupSelect {
                model_type: Some(model_type),
                ..
            } => format!("{} ({model_type})", row.label),
            _ => row.label.clone(),
        };
        Some(Self {
            binding: row.binding.clone(),
            title,
            choices,
            selected,
            multi: matches!(widget, Widget::PresetMultiSelect { .. }),
        })
    }

    /// Pick up the choices of the re-rendered row, keeping the cursor.
    pub(crate) fn refresh(&mut self, row: &Row) {
        if let Some(choices) = row.widget.as_ref().and_then(Widget::choices) {
            self.selected = self.selected.min(choices.len().saturating_sub(1));
            self.choices = choices;
        }
    }

    pub(crate) fn select_previous(&mut self) {
        if self.choices.is_empty() {
            return;
        }
        if self.selected == 0 {
            self.selected = self.choices.len().saturating_sub(1);
        } else {
            self.selected -= 1;
        }
    }

    pub(crate) fn select_next(&mut self) {
        if self.choices.is_empty() {
            return;
        }
        self.selected = (self.selected + 1) % self.choices.len();
    }

    pub(crate) fn current(&self) -> Option<&Choice> {
        self.choices.get(self.selected)
    }

    pub(crate) fn binding(&self) -> &Binding {
        &self.binding
    }

    /// Multi-selects stay open after each toggle.
    pub(crate) fn is_multi(&self) -> bool {
        self.multi
    }

    pub(crate) fn as_render(&self) -> PopupRender<'_> {
        PopupRender {
            title: &self.title,
            choices: &self.choices,
            selected: self.selected,
            multi: self.multi,
        }
    }
}
