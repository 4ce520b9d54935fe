use std::fmt::{self, Display, Formatter};

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use crate::grid::GridAxis;
use crate::photometry::PhotometryMatrix;

fn styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn header(titles: &[&str]) -> Vec<Cell> {
    titles
        .iter()
        .map(|t| Cell::new(t).set_alignment(CellAlignment::Center))
        .collect()
}

fn axis_row<T: Display>(axis: &GridAxis<T>) -> Vec<Cell> {
    let first = axis.knots().first().map(ToString::to_string).unwrap_or_default();
    let last = axis.knots().last().map(ToString::to_string).unwrap_or_default();
    vec![
        Cell::new(axis.name()).set_alignment(CellAlignment::Left),
        Cell::new(axis.len()).set_alignment(CellAlignment::Right),
        Cell::new(first).set_alignment(CellAlignment::Left),
        Cell::new(last).set_alignment(CellAlignment::Left),
    ]
}

impl PhotometryMatrix {
    /// Axis sizes and per-filter flux ranges as text tables.
    pub fn summary(&self) -> String {
        let mut title = styled_table();
        title.add_row(vec![
            Cell::new(format!("Model Photometry Matrix ({} models)", self.size()))
                .set_alignment(CellAlignment::Center),
        ]);

        let axes = self.axes();
        let mut grid = styled_table();
        grid.set_header(header(&["Axis", "Size", "First", "Last"]))
            .add_row(axis_row(axes.z()))
            .add_row(axis_row(axes.ebv()))
            .add_row(axis_row(axes.curves()))
            .add_row(axis_row(axes.seds()));

        let mut fluxes = styled_table();
        fluxes.set_header(header(&["Filter", "Min flux", "Max flux"]));
        for (i, name) in self.filter_names().iter().enumerate() {
            let (lo, hi) = self.flux_range(i).unwrap_or((f64::NAN, f64::NAN));
            fluxes.add_row(vec![
                Cell::new(name).set_alignment(CellAlignment::Left),
                Cell::new(format!("{lo:.4e}")).set_alignment(CellAlignment::Right),
                Cell::new(format!("{hi:.4e}")).set_alignment(CellAlignment::Right),
            ]);
        }

        format!("{title}\n{grid}\n{fluxes}")
    }
}

impl Display for PhotometryMatrix {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}
