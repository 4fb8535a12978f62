// Example: section inserts, removals and an item crossing sections.
use diffable::{Edit, IndexPath, Keyed, Reconciler, SectionModel, Snapshot, VisibleElements};

#[derive(Clone, Debug, PartialEq)]
struct Task(u32);

impl Keyed for Task {
    type Key = u32;

    fn key(&self) -> u32 {
        self.0
    }
}

#[derive(Clone, Debug)]
struct Column {
    name: &'static str,
    tasks: Vec<Task>,
}

impl Keyed for Column {
    type Key = &'static str;

    fn key(&self) -> &'static str {
        self.name
    }
}

impl SectionModel for Column {
    type Item = Task;

    fn items(&self) -> &[Task] {
        &self.tasks
    }
}

fn column(name: &'static str, tasks: &[u32]) -> Column {
    Column {
        name,
        tasks: tasks.iter().copied().map(Task).collect(),
    }
}

/// A board that is not on screen yet: updates snap and nothing is rendered.
struct Offscreen;

impl VisibleElements for Offscreen {
    type Element = ();

    fn is_attached(&self) -> bool {
        false
    }

    fn element_at(&self, _: IndexPath) -> Option<()> {
        None
    }
}

fn main() -> Result<(), diffable::DiffError> {
    let mut board = Reconciler::default();
    board.reconcile(
        Snapshot::build([column("todo", &[1, 2, 3]), column("doing", &[4])])?,
        true,
        Some(&Offscreen),
    )?;

    let next = Snapshot::build([
        column("doing", &[4, 2]),
        column("done", &[1]),
        column("todo", &[3]),
    ])?;
    let result = board.reconcile(next, true, Some(&Offscreen))?;

    for edit in &result.script {
        match edit {
            Edit::InsertSection { key, index } => println!("+ column {key} at {index}"),
            Edit::RemoveSection { key, index } => println!("- column {key} at {index}"),
            Edit::MoveSection { key, from, to } => println!("~ column {key} {from} -> {to}"),
            Edit::InsertItem { key, at } => println!("+ task {key} at {at}"),
            Edit::RemoveItem { key, at } => println!("- task {key} at {at}"),
            Edit::MoveItem { key, from, to } => println!("~ task {key} {from} -> {to}"),
        }
    }
    println!("animated={} generation={}", result.animated, board.generation());
    Ok(())
}
