// Example: reorder keyed rows and refresh only what is on screen.
use diffable::{
    IndexPath, Keyed, Reconciler, ReconcilerOptions, SectionModel, Snapshot, VisibleElements,
};

#[derive(Clone, Debug, PartialEq)]
struct Row {
    id: u64,
    title: &'static str,
}

impl Keyed for Row {
    type Key = u64;

    fn key(&self) -> u64 {
        self.id
    }
}

#[derive(Clone, Debug)]
struct Inbox(Vec<Row>);

impl Keyed for Inbox {
    type Key = &'static str;

    fn key(&self) -> &'static str {
        "inbox"
    }
}

impl SectionModel for Inbox {
    type Item = Row;

    fn items(&self) -> &[Row] {
        &self.0
    }
}

/// Pretends the first two rows are rendered.
struct Viewport;

impl VisibleElements for Viewport {
    type Element = IndexPath;

    fn is_attached(&self) -> bool {
        true
    }

    fn element_at(&self, at: IndexPath) -> Option<IndexPath> {
        (at.section == 0 && at.item < 2).then_some(at)
    }
}

fn main() -> Result<(), diffable::DiffError> {
    let mut r = Reconciler::new(ReconcilerOptions::new());

    let before = Snapshot::build([Inbox(vec![
        Row { id: 1, title: "standup" },
        Row { id: 2, title: "invoice" },
        Row { id: 3, title: "release" },
    ])])?;
    let first = r.reconcile(before, true, Some(&Viewport))?;
    println!("first: reload={} edits={}", first.script.is_reload(), first.script.len());

    // Row 3 jumps to the top, row 1 is renamed while it is still on screen.
    let after = Snapshot::build([Inbox(vec![
        Row { id: 3, title: "release" },
        Row { id: 1, title: "standup (moved)" },
        Row { id: 2, title: "invoice" },
    ])])?;
    let prepared = r.prepare(after, true, Some(&Viewport))?;
    for (refresh, row) in prepared.refresh_items() {
        println!("repaint element at {} with {:?}", refresh.at, row.title);
    }
    let result = r.commit(prepared)?;
    for edit in &result.script {
        println!("{edit:?}");
    }
    println!("summary: {:?}", result.summary());
    Ok(())
}
