//! Tabulation of simulation results for console output.

use stanza::style::{HAlign, Header, MinWidth, Separator, Styles};
use stanza::table::{Col, Row, Table};

use crate::archive::OutcomeArchive;
use crate::outcome::OutcomeMatrix;

/// One row per shuffle count, with the number of trials and the total variation distance from a
/// uniformly shuffled deck.
pub fn tabulate_sweep(archive: &OutcomeArchive) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(10)).with(HAlign::Centred)),
            Col::new(Styles::default().with(MinWidth(10)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(16)).with(HAlign::Right)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec!["Shuffles".into(), "Trials".into(), "Total variation".into()],
        ));
    for (shuffles, outcome) in archive.iter() {
        table.push_row(Row::new(
            Styles::default(),
            vec![
                format!("{shuffles}").into(),
                format!("{}", outcome.trials()).into(),
                format!("{:.6}", outcome.total_variation()).into(),
            ],
        ));
    }
    table
}

/// The frequency with which each card (one per row) finished at each position (one per column).
pub fn tabulate_outcome(outcome: &OutcomeMatrix) -> Table {
    let size = outcome.deck_size();
    let frequencies = outcome.frequencies();
    let mut table = Table::default()
        .with_cols({
            let mut cols = vec![Col::new(
                Styles::default()
                    .with(Separator(true))
                    .with(MinWidth(5))
                    .with(HAlign::Centred),
            )];
            for _ in 0..size {
                cols.push(Col::new(
                    Styles::default().with(MinWidth(6)).with(HAlign::Right),
                ));
            }
            cols
        })
        .with_row({
            let mut header_cells = vec!["Card".into()];
            for position in 0..size {
                header_cells.push(format!("{position}").into());
            }
            Row::new(
                Styles::default().with(Header(true)).with(Separator(true)),
                header_cells,
            )
        });

    for card in 0..size {
        let mut row_cells = vec![format!("{card}").into()];
        for &frequency in frequencies.row_slice(card) {
            row_cells.push(format!("{frequency:.3}").into());
        }
        table.push_row(Row::new(Styles::default(), row_cells));
    }
    table
}

#[cfg(test)]
mod tests {
    use stanza::renderer::console::Console;
    use stanza::renderer::Renderer;

    use super::*;

    #[test]
    fn sweep_table() {
        let mut archive = OutcomeArchive::default();
        for shuffles in [3, 1] {
            let mut outcome = OutcomeMatrix::allocate(2);
            outcome.tally(&[1, 0]);
            archive.insert(shuffles, outcome);
        }
        let table = tabulate_sweep(&archive);
        assert_eq!(3, table.num_cols());
        assert_eq!(3, table.num_rows());
        let rendered = Console::default().render(&table).to_string();
        assert!(rendered.contains("Total variation"), "{rendered}");
        assert!(rendered.contains("0.500000"), "{rendered}");
    }

    #[test]
    fn outcome_table() {
        let mut outcome = OutcomeMatrix::allocate(3);
        outcome.tally(&[2, 0, 1]);
        outcome.tally(&[0, 1, 2]);
        let table = tabulate_outcome(&outcome);
        assert_eq!(4, table.num_cols());
        assert_eq!(4, table.num_rows());
        let rendered = Console::default().render(&table).to_string();
        assert!(rendered.contains("0.500"), "{rendered}");
    }
}
