//! Outbound collaborators.
//!
//! The coordinator never renders anything itself. Every visible effect goes
//! through one of these traits, implemented by the embedding host.

use crate::{model::ReferencesResult, preferences::PreferenceStore};

/// Delivers the final outcome of an operation: the result (if any) and
/// whether the caller should resolve the request with it.
///
/// Invoked at most once per operation.
pub type ResultCallback = Box<dyn FnOnce(Option<ReferencesResult>, bool) + Send>;

/// Host-side progress presentation (notification widget, status bar, ...).
pub trait ProgressHost: Send {
    fn begin(
        &mut self,
        title: &str,
    );

    /// `increment` is the overall completion in `0.0..=100.0`.
    fn report(
        &mut self,
        message: &str,
        increment: f64,
    );

    fn end(&mut self);

    /// Whether the user asked to cancel through the progress presentation.
    fn cancellation_requested(&self) -> bool;
}

/// List/tree view showing Find and Peek results.
pub trait ListSurface: Send {
    /// Replace the view model. `canceled` tells the view to hide entries
    /// that were never confirmed.
    fn set_results(
        &mut self,
        result: &ReferencesResult,
        group_by_file: bool,
        canceled: bool,
    );

    fn show(&mut self);

    fn clear(&mut self);

    fn set_group_by_file(
        &mut self,
        group_by_file: bool,
    );
}

/// Interactive surface where the user confirms a rename.
pub trait ConfirmationSurface: Send {
    fn show(
        &mut self,
        result: &ReferencesResult,
        group_by_file: bool,
    );

    fn hide(&mut self);

    fn set_group_by_file(
        &mut self,
        group_by_file: bool,
    );
}

/// Side text panel used by Peek to print a plain-text summary.
pub trait TextPanel: Send {
    fn append(
        &mut self,
        text: &str,
    );

    fn show(&mut self);

    /// Drop text printed by earlier operations.
    fn clear(&mut self);
}

/// Triggers the hosting view's own refresh action.
pub trait RefreshTrigger: Send {
    fn refresh(&mut self);
}

/// The search engine's inbound control channel.
pub trait SearchEngine: Send {
    fn request_cancel(&mut self);
}

/// Everything a coordinator talks to.
pub struct Hosts {
    pub progress: Box<dyn ProgressHost>,
    pub list: Box<dyn ListSurface>,
    pub confirmation: Box<dyn ConfirmationSurface>,
    pub text_panel: Box<dyn TextPanel>,
    pub refresh: Box<dyn RefreshTrigger>,
    pub engine: Box<dyn SearchEngine>,
    pub preferences: Box<dyn PreferenceStore>,
}
