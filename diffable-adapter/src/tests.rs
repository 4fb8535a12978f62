use crate::*;

use alloc::boxed::Box;
use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};

use diffable::{EditScript, IndexPath, Keyed, ReconcilerOptions, SectionModel, VisibleElements};

#[derive(Clone, Debug, PartialEq)]
struct Quote {
    id: u32,
    cents: u32,
}

impl Keyed for Quote {
    type Key = u32;

    fn key(&self) -> u32 {
        self.id
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Group {
    id: &'static str,
    items: Vec<Quote>,
}

impl Keyed for Group {
    type Key = &'static str;

    fn key(&self) -> &'static str {
        self.id
    }
}

impl SectionModel for Group {
    type Item = Quote;

    fn items(&self) -> &[Quote] {
        &self.items
    }
}

fn q(id: u32, cents: u32) -> Quote {
    Quote { id, cents }
}

fn one_section(items: Vec<Quote>) -> Vec<Group> {
    vec![Group { id: "top", items }]
}

type Label = Rc<RefCell<String>>;

struct Applied {
    script: EditScript<&'static str, u32>,
    animated: bool,
    /// Label contents at the moment the script arrived.
    labels: Vec<String>,
}

/// A list surface that keeps materialized rows until the next script is applied.
struct FakeSurface {
    attached: Cell<bool>,
    rendered: RefCell<Vec<(IndexPath, Label)>>,
    applied: RefCell<Vec<Applied>>,
    reject_next: Cell<bool>,
}

impl FakeSurface {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            attached: Cell::new(true),
            rendered: RefCell::new(Vec::new()),
            applied: RefCell::new(Vec::new()),
            reject_next: Cell::new(false),
        })
    }

    fn applied_count(&self) -> usize {
        self.applied.borrow().len()
    }

    fn label_at(&self, at: IndexPath) -> Option<String> {
        self.element_at(at).map(|l| l.borrow().clone())
    }
}

impl VisibleElements for FakeSurface {
    type Element = Label;

    fn is_attached(&self) -> bool {
        self.attached.get()
    }

    fn element_at(&self, at: IndexPath) -> Option<Label> {
        self.rendered
            .borrow()
            .iter()
            .find(|(p, _)| *p == at)
            .map(|(_, l)| Rc::clone(l))
    }
}

impl Surface<&'static str, u32> for FakeSurface {
    fn apply(
        &self,
        script: &EditScript<&'static str, u32>,
        animated: bool,
        completion: Option<Completion>,
    ) -> Result<(), SurfaceError> {
        if self.reject_next.replace(false) {
            return Err(SurfaceError::rejected("surface busy"));
        }
        let labels = self
            .rendered
            .borrow()
            .iter()
            .map(|(_, l)| l.borrow().clone())
            .collect();
        self.applied.borrow_mut().push(Applied {
            script: script.clone(),
            animated,
            labels,
        });
        // Positions are stale after a script; rows are materialized again on demand.
        self.rendered.borrow_mut().clear();
        if let Some(done) = completion {
            done();
        }
        Ok(())
    }
}

struct Harness {
    surface: Arc<FakeSurface>,
    source: DataSource<Group, FakeSurface>,
    configured: Arc<AtomicUsize>,
    fail_refresh: Arc<AtomicBool>,
    /// Id of the one quote the configurer refuses to paint, 0 for none.
    fail_item: Arc<AtomicU32>,
}

impl Harness {
    fn new() -> Self {
        let surface = FakeSurface::new();
        let configured = Arc::new(AtomicUsize::new(0));
        let fail_refresh = Arc::new(AtomicBool::new(false));
        let fail_item = Arc::new(AtomicU32::new(0));
        let source = DataSource::new(
            &surface,
            |_: &FakeSurface, _: IndexPath, _: &Quote| Some(Rc::new(RefCell::new(String::new()))),
            {
                let configured = Arc::clone(&configured);
                let fail_refresh = Arc::clone(&fail_refresh);
                let fail_item = Arc::clone(&fail_item);
                move |_: &FakeSurface, at: IndexPath, item: &Quote, label: &Label| {
                    if fail_refresh.load(Ordering::Relaxed)
                        || fail_item.load(Ordering::Relaxed) == item.id
                    {
                        return Err(SurfaceError::refresh_failed(at, "label detached"));
                    }
                    configured.fetch_add(1, Ordering::Relaxed);
                    *label.borrow_mut() = format!("{}:{}", item.id, item.cents);
                    Ok(())
                }
            },
        );
        Self {
            surface,
            source,
            configured,
            fail_refresh,
            fail_item,
        }
    }

    /// Materializes `rows` through the data source, like a surface scrolling them in.
    fn render(&self, rows: &[IndexPath]) {
        for &at in rows {
            let label = self.source.cell_for(at).unwrap().unwrap();
            self.surface.rendered.borrow_mut().push((at, label));
        }
    }

    fn configured(&self) -> usize {
        self.configured.load(Ordering::Relaxed)
    }
}

#[test]
fn first_update_reloads_without_animation() {
    let mut h = Harness::new();
    let summary = h.source.update(one_section(vec![q(1, 10), q(2, 20)])).unwrap();

    assert!(summary.reload);
    assert!(!summary.animated);
    assert_eq!(summary.inserted_sections, 1);
    assert_eq!(summary.inserted_items, 2);

    let applied = h.surface.applied.borrow();
    assert_eq!(applied.len(), 1);
    assert!(applied[0].script.is_reload());
    assert!(!applied[0].animated);
}

#[test]
fn visible_change_is_painted_before_the_script_is_applied() {
    let mut h = Harness::new();
    h.source.update(one_section(vec![q(1, 10), q(2, 20)])).unwrap();
    h.render(&[IndexPath::new(0, 0), IndexPath::new(0, 1)]);
    assert_eq!(h.configured(), 2);
    assert_eq!(h.surface.label_at(IndexPath::new(0, 1)).as_deref(), Some("2:20"));

    let summary = h.source.update(one_section(vec![q(2, 25), q(1, 10)])).unwrap();
    assert_eq!(summary.refreshed, 1);
    assert_eq!(summary.moved_items, 2);
    assert!(summary.animated);
    assert_eq!(h.configured(), 3);

    let applied = h.surface.applied.borrow();
    assert_eq!(applied[1].labels, vec![String::from("1:10"), String::from("2:25")]);
    assert!(applied[1].animated);
}

#[test]
fn offscreen_change_is_left_to_the_element_factory() {
    let mut h = Harness::new();
    h.source.update(one_section(vec![q(1, 10), q(2, 20)])).unwrap();
    h.render(&[IndexPath::new(0, 0)]);

    let summary = h.source.update(one_section(vec![q(1, 10), q(2, 25)])).unwrap();
    assert_eq!(summary.refreshed, 0);
    assert_eq!(h.configured(), 1);

    h.render(&[IndexPath::new(0, 1)]);
    assert_eq!(h.surface.label_at(IndexPath::new(0, 1)).as_deref(), Some("2:25"));
}

#[test]
fn detached_surface_snaps_but_still_applies() {
    let mut h = Harness::new();
    h.source.update(one_section(vec![q(1, 10)])).unwrap();
    h.surface.attached.set(false);

    let summary = h
        .source
        .apply(one_section(vec![q(2, 20), q(1, 10)]), true, None)
        .unwrap();
    assert!(!summary.animated);
    assert_eq!(h.surface.applied_count(), 2);
    assert!(!h.surface.applied.borrow()[1].animated);
}

#[test]
fn detached_surface_can_skip_refreshes() {
    let mut h = Harness::new();
    h.source
        .set_options(ReconcilerOptions::new().with_refresh_when_detached(false));
    h.source.update(one_section(vec![q(1, 10)])).unwrap();
    h.render(&[IndexPath::new(0, 0)]);
    h.surface.attached.set(false);

    let summary = h.source.update(one_section(vec![q(1, 11)])).unwrap();
    assert_eq!(summary.refreshed, 0);
    assert_eq!(h.configured(), 1);
}

#[test]
fn rejected_script_keeps_the_previous_snapshot() {
    let mut h = Harness::new();
    h.source.update(one_section(vec![q(1, 10), q(2, 20)])).unwrap();
    let generation = h.source.reconciler().generation();

    h.surface.reject_next.set(true);
    let err = h
        .source
        .update(one_section(vec![q(2, 20), q(1, 10)]))
        .unwrap_err();
    assert!(err.is_surface_error());
    assert_eq!(err, UpdateError::Surface(SurfaceError::rejected("surface busy")));
    assert_eq!(h.source.reconciler().generation(), generation);
    assert_eq!(h.source.item_at(IndexPath::new(0, 0)), Some(&q(1, 10)));

    // Retrying diffs against the state the surface actually shows.
    let summary = h.source.update(one_section(vec![q(2, 20), q(1, 10)])).unwrap();
    assert_eq!(summary.moved_items, 2);
}

#[test]
fn rejected_script_restores_repainted_elements() {
    let mut h = Harness::new();
    h.source.update(one_section(vec![q(1, 10)])).unwrap();
    h.render(&[IndexPath::new(0, 0)]);

    h.surface.reject_next.set(true);
    let err = h.source.update(one_section(vec![q(1, 99)])).unwrap_err();
    assert!(err.is_surface_error());
    assert_eq!(h.source.item_at(IndexPath::new(0, 0)), Some(&q(1, 10)));
    assert_eq!(h.surface.label_at(IndexPath::new(0, 0)).as_deref(), Some("1:10"));

    // Going back to the committed data needs no refresh and shows the right value.
    let summary = h.source.update(one_section(vec![q(1, 10)])).unwrap();
    assert_eq!(summary.refreshed, 0);
    assert_eq!(h.surface.applied.borrow()[1].labels, vec![String::from("1:10")]);
}

#[test]
fn failing_refresh_restores_elements_painted_before_it() {
    let mut h = Harness::new();
    h.source.update(one_section(vec![q(1, 10), q(2, 20)])).unwrap();
    h.render(&[IndexPath::new(0, 0), IndexPath::new(0, 1)]);
    h.fail_item.store(2, Ordering::Relaxed);

    let err = h
        .source
        .update(one_section(vec![q(1, 11), q(2, 21)]))
        .unwrap_err();
    assert_eq!(
        err,
        UpdateError::Surface(SurfaceError::refresh_failed(
            IndexPath::new(0, 1),
            "label detached"
        ))
    );
    assert_eq!(h.surface.applied_count(), 1);
    assert_eq!(h.surface.label_at(IndexPath::new(0, 0)).as_deref(), Some("1:10"));
    assert_eq!(h.surface.label_at(IndexPath::new(0, 1)).as_deref(), Some("2:20"));
}

#[test]
fn failing_refresh_aborts_before_the_surface_sees_a_script() {
    let mut h = Harness::new();
    h.source.update(one_section(vec![q(1, 10)])).unwrap();
    h.render(&[IndexPath::new(0, 0)]);
    h.fail_refresh.store(true, Ordering::Relaxed);

    let err = h.source.update(one_section(vec![q(1, 11)])).unwrap_err();
    assert_eq!(
        err,
        UpdateError::Surface(SurfaceError::refresh_failed(
            IndexPath::new(0, 0),
            "label detached"
        ))
    );
    assert_eq!(h.surface.applied_count(), 1);
    assert_eq!(h.source.item_at(IndexPath::new(0, 0)), Some(&q(1, 10)));
}

#[test]
fn duplicate_identity_never_reaches_the_surface() {
    let mut h = Harness::new();
    h.source.update(one_section(vec![q(1, 10)])).unwrap();

    let err = h
        .source
        .update(one_section(vec![q(2, 20), q(2, 21)]))
        .unwrap_err();
    assert!(err.is_diff_error());
    match err {
        UpdateError::Diff(e) => assert!(e.is_duplicate_identity()),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(h.surface.applied_count(), 1);
    assert_eq!(h.source.sections(), one_section(vec![q(1, 10)]).as_slice());
}

#[test]
fn dropped_surface_advances_the_model_without_applying() {
    let mut h = Harness::new();
    h.source.update(one_section(vec![q(1, 10)])).unwrap();
    h.render(&[IndexPath::new(0, 0)]);

    let Harness {
        surface,
        mut source,
        configured,
        ..
    } = h;
    drop(surface);
    assert!(source.surface().is_none());

    let summary = source.update(one_section(vec![q(2, 20), q(1, 11)])).unwrap();
    assert!(!summary.animated);
    assert_eq!(summary.refreshed, 0);
    assert_eq!(configured.load(Ordering::Relaxed), 1);
    assert_eq!(source.item_at(IndexPath::new(0, 1)), Some(&q(1, 11)));
    assert_eq!(source.cell_for(IndexPath::new(0, 0)), Ok(None));

    let replacement = FakeSurface::new();
    source.set_surface(&replacement);
    let summary = source.update(one_section(vec![q(2, 20), q(1, 11)])).unwrap();
    assert!(summary.reload);
    assert_eq!(replacement.applied_count(), 1);
}

#[test]
fn completion_runs_once_the_surface_is_done() {
    let mut h = Harness::new();
    let done = Rc::new(Cell::new(false));
    let completion: Completion = Box::new({
        let done = Rc::clone(&done);
        move || done.set(true)
    });

    h.source
        .apply(one_section(vec![q(1, 10)]), true, Some(completion))
        .unwrap();
    assert!(done.get());
}

#[test]
fn completion_runs_when_the_surface_is_gone() {
    let Harness {
        surface,
        mut source,
        ..
    } = Harness::new();
    source.update(one_section(vec![q(1, 10)])).unwrap();
    drop(surface);

    let done = Rc::new(Cell::new(false));
    let completion: Completion = Box::new({
        let done = Rc::clone(&done);
        move || done.set(true)
    });
    let summary = source
        .apply(one_section(vec![q(2, 20)]), true, Some(completion))
        .unwrap();
    assert!(done.get());
    assert_eq!(summary.inserted_items, 1);
    assert_eq!(source.item_at(IndexPath::new(0, 0)), Some(&q(2, 20)));
}

#[test]
fn cell_for_outside_the_snapshot_is_none() {
    let mut h = Harness::new();
    assert_eq!(h.source.cell_for(IndexPath::new(0, 0)), Ok(None));

    h.source.update(one_section(vec![q(1, 10)])).unwrap();
    assert_eq!(h.source.cell_for(IndexPath::new(0, 1)), Ok(None));
    assert_eq!(h.source.cell_for(IndexPath::new(3, 0)), Ok(None));
    assert!(h.source.cell_for(IndexPath::new(0, 0)).unwrap().is_some());
}

#[test]
fn example_stock_ticker_smoke() {
    let mut h = Harness::new();
    let mut quotes = vec![q(1, 2125), q(2, 1942), q(3, 1688), q(4, 1655), q(5, 939)];
    h.source.update(one_section(quotes.clone())).unwrap();

    for tick in 0..5u32 {
        let visible: Vec<IndexPath> = (0..3).map(|i| IndexPath::new(0, i)).collect();
        h.render(&visible);

        for (i, quote) in quotes.iter_mut().enumerate() {
            let bump = (tick * 7 + i as u32 * 13) % 400;
            quote.cents += bump;
        }
        quotes.sort_by(|a, b| b.cents.cmp(&a.cents));

        let summary = h.source.update(one_section(quotes.clone())).unwrap();
        assert!(summary.refreshed <= 3);
        assert_eq!(summary.inserted_items + summary.removed_items, 0);
        assert_eq!(h.source.sections()[0].items, quotes);
    }
    assert_eq!(h.surface.applied_count(), 6);
}
