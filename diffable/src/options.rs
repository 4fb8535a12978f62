use alloc::sync::Arc;

use crate::reconciler::Reconciler;
use crate::{ReconcileSummary, SectionModel};

/// A callback fired after the reconciler commits a new snapshot or is reset.
pub type OnChangeCallback<S> = Arc<dyn Fn(&Reconciler<S>, &ReconcileSummary) + Send + Sync>;

/// Configuration for [`crate::Reconciler`].
///
/// Cheap to clone: the callback lives in an `Arc`.
pub struct ReconcilerOptions<S: SectionModel> {
    /// Animation preference used by callers that don't pass one explicitly.
    ///
    /// A detached surface always snaps, whatever this says.
    pub animate_by_default: bool,

    /// Whether refreshes are planned while the surface is alive but detached.
    ///
    /// Defaults to `true`: detached surfaces can still hold rendered elements that become
    /// visible again later. This is looser than list views that only reconfigure cells while
    /// their view sits in a window; set it to `false` for that behavior, where detached
    /// surfaces get no refreshes at all.
    pub refresh_when_detached: bool,

    /// Optional callback fired after every commit and reset.
    pub on_change: Option<OnChangeCallback<S>>,
}

impl<S: SectionModel> Clone for ReconcilerOptions<S> {
    fn clone(&self) -> Self {
        Self {
            animate_by_default: self.animate_by_default,
            refresh_when_detached: self.refresh_when_detached,
            on_change: self.on_change.clone(),
        }
    }
}

impl<S: SectionModel> Default for ReconcilerOptions<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SectionModel> ReconcilerOptions<S> {
    pub fn new() -> Self {
        Self {
            animate_by_default: true,
            refresh_when_detached: true,
            on_change: None,
        }
    }

    pub fn with_animate_by_default(mut self, animate: bool) -> Self {
        self.animate_by_default = animate;
        self
    }

    pub fn with_refresh_when_detached(mut self, refresh: bool) -> Self {
        self.refresh_when_detached = refresh;
        self
    }

    pub fn with_on_change(
        mut self,
        on_change: Option<impl Fn(&Reconciler<S>, &ReconcileSummary) + Send + Sync + 'static>,
    ) -> Self {
        self.on_change = on_change.map(|f| Arc::new(f) as _);
        self
    }
}

impl<S: SectionModel> core::fmt::Debug for ReconcilerOptions<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ReconcilerOptions")
            .field("animate_by_default", &self.animate_by_default)
            .field("refresh_when_detached", &self.refresh_when_detached)
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}
