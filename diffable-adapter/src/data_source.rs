use alloc::sync::{Arc, Weak};

use diffable::{
    IndexPath, ItemKey, ReconcileSummary, Reconciler, ReconcilerOptions, Reconciliation,
    SectionKey, SectionModel, Snapshot, VisibleElements,
};

use crate::{Completion, Surface, SurfaceError, UpdateError};

/// Produces a fresh element for a position the surface is materializing.
///
/// Returning `None` means the surface has nothing to show there yet.
pub type CellProvider<V, I> =
    Arc<dyn Fn(&V, IndexPath, &I) -> Option<<V as VisibleElements>::Element> + Send + Sync>;

/// Paints `item` onto an element, either freshly provided or already rendered.
///
/// For in-place refreshes, the `IndexPath` is where the element is rendered right now (the
/// previous snapshot position), not where the item will end up.
pub type CellConfigurer<V, I> = Arc<
    dyn Fn(&V, IndexPath, &I, &<V as VisibleElements>::Element) -> Result<(), SurfaceError>
        + Send
        + Sync,
>;

/// Binds a [`Reconciler`] to a surface and drives updates end to end.
///
/// The surface is held weakly. Once it is dropped, updates keep advancing the data model but
/// no longer refresh, animate or apply anything; call [`DataSource::set_surface`] to bind a
/// new one.
///
/// Typical flow, once per data tick:
/// - `update(sections)` (or `apply` with an explicit animation flag)
/// - the surface later asks `cell_for(at)` for rows it materializes
pub struct DataSource<S, V>
where
    S: SectionModel,
    V: VisibleElements + ?Sized,
{
    surface: Weak<V>,
    reconciler: Reconciler<S>,
    cell_provider: CellProvider<V, S::Item>,
    cell_configurer: CellConfigurer<V, S::Item>,
}

impl<S, V> DataSource<S, V>
where
    S: SectionModel,
    V: Surface<SectionKey<S>, ItemKey<S>> + ?Sized,
{
    pub fn new(
        surface: &Arc<V>,
        cell_provider: impl Fn(&V, IndexPath, &S::Item) -> Option<V::Element> + Send + Sync + 'static,
        cell_configurer: impl Fn(&V, IndexPath, &S::Item, &V::Element) -> Result<(), SurfaceError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            surface: Arc::downgrade(surface),
            reconciler: Reconciler::new(ReconcilerOptions::default()),
            cell_provider: Arc::new(cell_provider),
            cell_configurer: Arc::new(cell_configurer),
        }
    }

    pub fn with_options(mut self, options: ReconcilerOptions<S>) -> Self {
        self.reconciler.set_options(options);
        self
    }

    pub fn reconciler(&self) -> &Reconciler<S> {
        &self.reconciler
    }

    pub fn set_options(&mut self, options: ReconcilerOptions<S>) {
        self.reconciler.set_options(options);
    }

    /// The bound surface, if it is still alive.
    pub fn surface(&self) -> Option<Arc<V>> {
        self.surface.upgrade()
    }

    /// Rebinds to `surface`. The next update reloads it from scratch.
    pub fn set_surface(&mut self, surface: &Arc<V>) {
        self.surface = Arc::downgrade(surface);
        self.reconciler.reset();
    }

    /// Forgets the applied snapshot so the next update is a reload.
    pub fn reset(&mut self) {
        self.reconciler.reset();
    }

    /// The last successfully applied snapshot.
    pub fn snapshot(&self) -> Option<&Snapshot<S>> {
        self.reconciler.previous()
    }

    /// Sections of the last successfully applied snapshot (empty before the first update).
    pub fn sections(&self) -> &[S] {
        self.snapshot().map(Snapshot::sections).unwrap_or_default()
    }

    pub fn item_at(&self, at: IndexPath) -> Option<&S::Item> {
        self.snapshot()?.item_at(at)
    }

    /// Updates to `sections`, animating per [`ReconcilerOptions::animate_by_default`].
    pub fn update(
        &mut self,
        sections: impl IntoIterator<Item = S>,
    ) -> Result<ReconcileSummary, UpdateError> {
        let animated = self.reconciler.options().animate_by_default;
        self.apply(sections, animated, None)
    }

    /// Builds a snapshot from `sections` and applies it.
    ///
    /// `animated` is a preference: detached or dropped surfaces always snap, and so does the
    /// first update.
    pub fn apply(
        &mut self,
        sections: impl IntoIterator<Item = S>,
        animated: bool,
        completion: Option<Completion>,
    ) -> Result<ReconcileSummary, UpdateError> {
        let snapshot = Snapshot::build(sections)?;
        self.apply_snapshot(snapshot, animated, completion)
    }

    /// Applies an already built snapshot.
    ///
    /// Refreshes are painted first, then the edit script goes to the surface, and only then is
    /// `snapshot` committed. Any failure leaves the previous snapshot in place, and elements
    /// already repainted for this call get their previous payload back.
    ///
    /// With the surface dropped, the snapshot is committed without applying anything and
    /// `completion` runs right away.
    pub fn apply_snapshot(
        &mut self,
        snapshot: Snapshot<S>,
        animated: bool,
        completion: Option<Completion>,
    ) -> Result<ReconcileSummary, UpdateError> {
        let surface = self.surface.upgrade();
        let prepared = self
            .reconciler
            .prepare(snapshot, animated, surface.as_deref())?;

        let mut completion = completion;
        if let Some(surface) = surface.as_deref() {
            let mut painted = 0usize;
            let mut outcome = Ok(());
            for (refresh, item) in prepared.refresh_items() {
                dtrace!(key = ?refresh.key, at = %refresh.at, "refresh");
                painted += 1;
                outcome = (self.cell_configurer)(surface, refresh.at, item, &refresh.element);
                if outcome.is_err() {
                    break;
                }
            }
            let outcome = outcome.and_then(|()| {
                surface.apply(prepared.script(), prepared.animated(), completion.take())
            });

            if let Err(err) = outcome {
                self.restore_painted(surface, &prepared, painted);
                return Err(err.into());
            }
        } else {
            ddebug!(
                edits = prepared.script().len(),
                "surface dropped, committing without apply"
            );
        }

        let result = self.reconciler.commit(prepared)?;
        if let Some(done) = completion {
            done();
        }
        Ok(result.summary())
    }

    /// Repaints the first `painted` refreshed elements of `prepared` with the payloads of the
    /// still committed snapshot.
    fn restore_painted(
        &self,
        surface: &V,
        prepared: &Reconciliation<S, V::Element>,
        painted: usize,
    ) {
        let Some(previous) = self.reconciler.previous() else {
            return;
        };
        for (refresh, _) in prepared.refresh_items().take(painted) {
            let Some(item) = previous.item_at(refresh.at) else {
                continue;
            };
            if (self.cell_configurer)(surface, refresh.at, item, &refresh.element).is_err() {
                dwarn!(key = ?refresh.key, at = %refresh.at, "failed to restore refreshed element");
            }
        }
    }

    /// Element factory path: provides and configures an element for `at` in the applied
    /// snapshot.
    ///
    /// Returns `Ok(None)` when the surface is gone, `at` is out of range, or the provider has
    /// nothing for it.
    pub fn cell_for(&self, at: IndexPath) -> Result<Option<V::Element>, SurfaceError> {
        let Some(surface) = self.surface.upgrade() else {
            return Ok(None);
        };
        self.cell_for_in(&surface, at)
    }

    /// Like [`DataSource::cell_for`], for callers already holding the surface.
    pub fn cell_for_in(&self, surface: &V, at: IndexPath) -> Result<Option<V::Element>, SurfaceError> {
        let Some(item) = self.item_at(at) else {
            dwarn!(%at, "cell_for: position outside the applied snapshot");
            return Ok(None);
        };
        let Some(element) = (self.cell_provider)(surface, at, item) else {
            return Ok(None);
        };
        (self.cell_configurer)(surface, at, item, &element)?;
        Ok(Some(element))
    }
}

impl<S, V> core::fmt::Debug for DataSource<S, V>
where
    S: SectionModel + core::fmt::Debug,
    V: VisibleElements + ?Sized,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DataSource")
            .field("surface_alive", &(self.surface.strong_count() > 0))
            .field("reconciler", &self.reconciler)
            .finish_non_exhaustive()
    }
}
