use alloc::vec::Vec;

use crate::diff;
use crate::refresh::plan_refreshes;
use crate::{
    DiffError, EditScript, ItemKey, ReconcileSummary, ReconcilerOptions, ReconcilerState,
    Refresh, SectionKey, SectionModel, Snapshot, VisibleElements,
};

/// Everything a surface needs to move from the previous snapshot to the next one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReconcileResult<SK, IK, E> {
    pub script: EditScript<SK, IK>,
    /// Run these before handing `script` to the surface.
    pub refreshes: Vec<Refresh<IK, E>>,
    pub animated: bool,
    /// Reconciler generation once this result is committed.
    pub generation: u64,
}

impl<SK, IK, E> ReconcileResult<SK, IK, E> {
    pub fn summary(&self) -> ReconcileSummary {
        ReconcileSummary {
            refreshed: self.refreshes.len(),
            animated: self.animated,
            generation: self.generation,
            ..self.script.summary()
        }
    }
}

pub type ReconcileResultFor<S, E> = ReconcileResult<SectionKey<S>, ItemKey<S>, E>;

/// A prepared, not yet committed reconciliation.
///
/// Holds the next snapshot so refresh targets can be resolved to their new payloads while
/// the reconciler still holds the previous one.
#[derive(Debug)]
pub struct Reconciliation<S: SectionModel, E> {
    next: Snapshot<S>,
    result: ReconcileResultFor<S, E>,
    base_generation: u64,
}

impl<S: SectionModel, E> Reconciliation<S, E> {
    pub fn next(&self) -> &Snapshot<S> {
        &self.next
    }

    pub fn result(&self) -> &ReconcileResultFor<S, E> {
        &self.result
    }

    pub fn script(&self) -> &EditScript<SectionKey<S>, ItemKey<S>> {
        &self.result.script
    }

    pub fn refreshes(&self) -> &[Refresh<ItemKey<S>, E>] {
        &self.result.refreshes
    }

    pub fn animated(&self) -> bool {
        self.result.animated
    }

    /// The new payload a refresh should paint.
    pub fn refreshed_item(&self, refresh: &Refresh<ItemKey<S>, E>) -> Option<&S::Item> {
        self.next.item_at(refresh.target)
    }

    /// Refreshes paired with the payloads they should paint, in previous-snapshot order.
    pub fn refresh_items(&self) -> impl Iterator<Item = (&Refresh<ItemKey<S>, E>, &S::Item)> {
        self.result
            .refreshes
            .iter()
            .filter_map(|r| Some((r, self.next.item_at(r.target)?)))
    }

    pub fn into_parts(self) -> (Snapshot<S>, ReconcileResultFor<S, E>) {
        (self.next, self.result)
    }
}

/// Keeps one previous snapshot and reconciles each new one against it.
///
/// The reconciler holds no UI objects. Surfaces are passed in per call through
/// [`VisibleElements`] and are only queried, never stored.
///
/// Calls must be serialized by the caller; mutating methods take `&mut self`.
#[derive(Clone, Debug)]
pub struct Reconciler<S: SectionModel> {
    options: ReconcilerOptions<S>,
    previous: Option<Snapshot<S>>,
    generation: u64,
}

impl<S: SectionModel> Default for Reconciler<S> {
    fn default() -> Self {
        Self::new(ReconcilerOptions::default())
    }
}

impl<S: SectionModel> Reconciler<S> {
    pub fn new(options: ReconcilerOptions<S>) -> Self {
        ddebug!(
            animate_by_default = options.animate_by_default,
            refresh_when_detached = options.refresh_when_detached,
            "Reconciler::new"
        );
        Self {
            options,
            previous: None,
            generation: 0,
        }
    }

    pub fn options(&self) -> &ReconcilerOptions<S> {
        &self.options
    }

    pub fn set_options(&mut self, options: ReconcilerOptions<S>) {
        self.options = options;
    }

    /// Clones the current options, applies `f`, then delegates to `set_options`.
    pub fn update_options(&mut self, f: impl FnOnce(&mut ReconcilerOptions<S>)) {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next);
    }

    pub fn state(&self) -> ReconcilerState {
        match self.previous {
            Some(_) => ReconcilerState::Populated,
            None => ReconcilerState::Empty,
        }
    }

    pub fn previous(&self) -> Option<&Snapshot<S>> {
        self.previous.as_ref()
    }

    /// Incremented on every commit and reset.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Drops the previous snapshot so the next reconcile is a reload.
    pub fn reset(&mut self) {
        self.previous = None;
        self.generation = self.generation.wrapping_add(1);
        ddebug!(generation = self.generation, "Reconciler::reset");
        self.notify(&ReconcileSummary {
            generation: self.generation,
            ..ReconcileSummary::default()
        });
    }

    /// Computes the transition to `next` without committing it.
    ///
    /// `surface` is `None` when there is no surface to query (never bound, or dropped); that
    /// counts as detached. `animate` is the caller's preference and is only honored for an
    /// attached surface with a previous snapshot.
    pub fn prepare<V>(
        &self,
        next: Snapshot<S>,
        animate: bool,
        surface: Option<&V>,
    ) -> Result<Reconciliation<S, V::Element>, DiffError>
    where
        V: VisibleElements + ?Sized,
    {
        let attached = surface.is_some_and(|s| s.is_attached());
        let generation = self.generation.wrapping_add(1);

        let Some(previous) = &self.previous else {
            let script = diff::reload(&next)?;
            ddebug!(
                sections = next.section_count(),
                items = next.total_items(),
                attached,
                "Reconciler::prepare reload"
            );
            return Ok(Reconciliation {
                next,
                result: ReconcileResult {
                    script,
                    refreshes: Vec::new(),
                    animated: false,
                    generation,
                },
                base_generation: self.generation,
            });
        };

        let script = diff::diff(previous, &next)?;
        let refreshes = match surface {
            Some(s) if attached || self.options.refresh_when_detached => {
                plan_refreshes(previous, &next, s)
            }
            _ => Vec::new(),
        };
        let animated = animate && attached;

        dtrace!(
            edits = script.len(),
            refreshes = refreshes.len(),
            attached,
            animated,
            "Reconciler::prepare"
        );
        Ok(Reconciliation {
            next,
            result: ReconcileResult {
                script,
                refreshes,
                animated,
                generation,
            },
            base_generation: self.generation,
        })
    }

    /// Adopts a prepared reconciliation's snapshot as the new previous state.
    ///
    /// Fails with [`DiffError::StaleReconciliation`] when another commit or reset happened
    /// after `reconciliation` was prepared; held state is left untouched in that case.
    pub fn commit<E>(
        &mut self,
        reconciliation: Reconciliation<S, E>,
    ) -> Result<ReconcileResultFor<S, E>, DiffError> {
        if reconciliation.base_generation != self.generation {
            dwarn!(
                prepared = reconciliation.base_generation,
                current = self.generation,
                "Reconciler::commit stale reconciliation"
            );
            return Err(DiffError::StaleReconciliation {
                prepared: reconciliation.base_generation,
                current: self.generation,
            });
        }

        let (next, result) = reconciliation.into_parts();
        self.previous = Some(next);
        self.generation = result.generation;

        let summary = result.summary();
        ddebug!(
            generation = summary.generation,
            edits = summary.structural_edits(),
            refreshed = summary.refreshed,
            animated = summary.animated,
            reload = summary.reload,
            "Reconciler::commit"
        );
        self.notify(&summary);
        Ok(result)
    }

    /// Prepares and commits in one step.
    ///
    /// Use [`Reconciler::prepare`] + [`Reconciler::commit`] when applying the result can fail
    /// and the previous snapshot must survive that failure.
    pub fn reconcile<V>(
        &mut self,
        next: Snapshot<S>,
        animate: bool,
        surface: Option<&V>,
    ) -> Result<ReconcileResultFor<S, V::Element>, DiffError>
    where
        V: VisibleElements + ?Sized,
    {
        let reconciliation = self.prepare(next, animate, surface)?;
        self.commit(reconciliation)
    }

    fn notify(&self, summary: &ReconcileSummary) {
        if let Some(cb) = &self.options.on_change {
            cb(self, summary);
        }
    }
}
