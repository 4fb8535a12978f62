use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use diffable::{EditScript, IndexPath, Keyed, SectionModel, VisibleElements};
use diffable_adapter::{Completion, DataSource, Surface, SurfaceError};

#[derive(Clone, Debug, PartialEq)]
struct Quote {
    symbol: &'static str,
    cents: u64,
}

impl Keyed for Quote {
    type Key = &'static str;

    fn key(&self) -> &'static str {
        self.symbol
    }
}

#[derive(Clone, Debug)]
struct Watchlist(Vec<Quote>);

impl Keyed for Watchlist {
    type Key = u8;

    fn key(&self) -> u8 {
        0
    }
}

impl SectionModel for Watchlist {
    type Item = Quote;

    fn items(&self) -> &[Quote] {
        &self.0
    }
}

type Line = Rc<RefCell<String>>;

/// A terminal list that keeps its first `height` rows materialized.
struct Terminal {
    height: usize,
    rows: RefCell<Vec<Line>>,
}

impl VisibleElements for Terminal {
    type Element = Line;

    fn is_attached(&self) -> bool {
        true
    }

    fn element_at(&self, at: IndexPath) -> Option<Line> {
        self.rows.borrow().get(at.item).cloned()
    }
}

impl Surface<u8, &'static str> for Terminal {
    fn apply(
        &self,
        script: &EditScript<u8, &'static str>,
        animated: bool,
        completion: Option<Completion>,
    ) -> Result<(), SurfaceError> {
        println!("-- {} edits (animated={animated})", script.len());
        for edit in script {
            println!("   {edit:?}");
        }
        // Rows are re-materialized below from the committed snapshot.
        self.rows.borrow_mut().clear();
        if let Some(done) = completion {
            done();
        }
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let terminal = Arc::new(Terminal {
        height: 3,
        rows: RefCell::new(Vec::new()),
    });
    let mut source: DataSource<Watchlist, Terminal> = DataSource::new(
        &terminal,
        |_: &Terminal, _: IndexPath, _: &Quote| Some(Rc::new(RefCell::new(String::new()))),
        |_: &Terminal, _: IndexPath, q: &Quote, line: &Line| {
            let (whole, frac) = (q.cents / 100, q.cents % 100);
            *line.borrow_mut() = format!("{:<5} {whole:>4}.{frac:02}", q.symbol);
            Ok(())
        },
    );

    let mut quotes = vec![
        Quote { symbol: "ACME", cents: 12_050 },
        Quote { symbol: "GLOBX", cents: 9_875 },
        Quote { symbol: "INITE", cents: 4_210 },
        Quote { symbol: "UMBR", cents: 1_999 },
    ];

    for tick in 0u64..4 {
        for (i, q) in quotes.iter_mut().enumerate() {
            q.cents += (tick * 311 + i as u64 * 977) % 2_000;
        }
        quotes.sort_by(|a, b| b.cents.cmp(&a.cents));

        let summary = source.update([Watchlist(quotes.clone())])?;
        println!(
            "tick {tick}: moved={} refreshed={}",
            summary.moved_items, summary.refreshed
        );

        for item in 0..terminal.height {
            if let Some(line) = source.cell_for(IndexPath::new(0, item))? {
                terminal.rows.borrow_mut().push(line);
            }
        }
        for line in terminal.rows.borrow().iter() {
            println!("   {}", line.borrow());
        }
    }
    Ok(())
}
