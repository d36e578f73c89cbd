use tracing::{debug, info};

use super::{ResultFlow, RouteContext, RouteOutcome, text::render_text_summary};
use crate::{
    host::{ListSurface, RefreshTrigger, TextPanel},
    model::{ReferencesCommandMode, ReferencesResult},
};

/// Shows Find and Peek results and decides between refreshing the hosting
/// view and answering the request directly.
pub struct ListFlow {
    list: Box<dyn ListSurface>,
    text_panel: Box<dyn TextPanel>,
    refresh: Box<dyn RefreshTrigger>,
    show_text_panel: bool,
}

impl ListFlow {
    pub fn new(
        list: Box<dyn ListSurface>,
        text_panel: Box<dyn TextPanel>,
        refresh: Box<dyn RefreshTrigger>,
    ) -> Self {
        Self {
            list,
            text_panel,
            refresh,
            show_text_panel: true,
        }
    }

    pub fn set_show_text_panel(
        &mut self,
        show: bool,
    ) {
        self.show_text_panel = show;
    }

    fn present(
        &mut self,
        result: &ReferencesResult,
        mode: ReferencesCommandMode,
        group_by_file: bool,
        canceled: bool,
    ) {
        self.list.set_results(result, group_by_file, canceled);
        match mode {
            ReferencesCommandMode::Peek => {
                if !self.show_text_panel {
                    return;
                }
                let summary = render_text_summary(result, canceled, group_by_file);
                if !summary.is_empty() {
                    self.text_panel.append(&summary);
                    self.text_panel.show();
                }
            },
            _ => self.list.show(),
        }
    }
}

impl ResultFlow for ListFlow {
    fn prepare(
        &mut self,
        mode: ReferencesCommandMode,
    ) {
        self.list.clear();
        if mode == ReferencesCommandMode::Peek && self.show_text_panel {
            self.text_panel.clear();
        }
    }

    fn update_partial(
        &mut self,
        result: &ReferencesResult,
        group_by_file: bool,
    ) {
        self.list.set_results(result, group_by_file, false);
    }

    fn route(
        &mut self,
        result: ReferencesResult,
        ctx: RouteContext<'_>,
    ) -> RouteOutcome {
        self.present(&result, ctx.mode, ctx.group_by_file, ctx.flags.canceled);
        *ctx.last_results = Some(result.clone());

        let view = ctx.view;
        let refresh = result.is_finished
            && view.request_has_occurred
            && !view.request_pending
            && !ctx.flags.canceled_while_previewing
            && !view.refresh_pending;
        if refresh {
            info!("refreshing references view with {} cached reference(s)", result.references.len());
            view.refresh_pending = true;
            self.refresh.refresh();
            return RouteOutcome::RefreshTriggered;
        }

        debug!(
            "delivering {} reference(s) directly (request_has_occurred={}, request_pending={}, \
             canceled_while_previewing={})",
            result.references.len(),
            view.request_has_occurred,
            view.request_pending,
            ctx.flags.canceled_while_previewing
        );
        RouteOutcome::Deliver {
            resolve: !ctx.flags.canceled_while_previewing,
            result: Some(result),
        }
    }

    fn set_group_by_file(
        &mut self,
        group_by_file: bool,
    ) {
        self.list.set_group_by_file(group_by_file);
    }
}
