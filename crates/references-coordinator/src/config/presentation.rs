use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct PresentationSettings {
    /// Grouping used until the user toggles the persisted preference.
    pub group_by_file_default: bool,
    /// Print a text summary to the side panel for Peek results.
    pub show_text_panel_for_peek: bool,
}

impl Default for PresentationSettings {
    fn default() -> Self {
        Self {
            group_by_file_default: false,
            show_text_panel_for_peek: true,
        }
    }
}

impl PresentationSettings {
    pub(crate) fn apply_patch(
        &mut self,
        patch: PresentationSettingsPatch,
    ) {
        if let Some(v) = patch.group_by_file_default {
            self.group_by_file_default = v;
        }
        if let Some(v) = patch.show_text_panel_for_peek {
            self.show_text_panel_for_peek = v;
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct PresentationSettingsPatch {
    pub(crate) group_by_file_default: Option<bool>,
    pub(crate) show_text_panel_for_peek: Option<bool>,
    #[serde(flatten)]
    pub(crate) _extra: HashMap<String, Value>,
}
