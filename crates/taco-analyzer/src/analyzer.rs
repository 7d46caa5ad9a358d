use std::collections::BTreeMap;

use rustc_hash::FxHashSet;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use taco_common::Range;
use taco_graph::{CompressStats, TacoGraph};

use crate::config::AnalyzerConfig;
use crate::error::AnalyzerError;
use crate::sheet_data::{SheetData, WorkbookData};

/// The value cell with the most transitive dependents.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MostDependents {
    pub sheet: String,
    pub cell: Range,
    /// Dependent cells, not compressed ranges.
    pub num_dependents: u64,
}

/// One compressed dependency graph per sheet of a workbook, plus the raw
/// counts needed to judge how well it compressed.
#[derive(Debug, Clone)]
pub struct SheetAnalyzer {
    workbook: WorkbookData,
    config: AnalyzerConfig,
    /// Indexed by sheet id, parallel to `workbook.sheets()`.
    graphs: Vec<TacoGraph>,
    num_edges: u64,
    num_vertices: u64,
}

struct BuiltSheet {
    graph: TacoGraph,
    num_edges: u64,
    num_vertices: u64,
}

/// Replay a sheet's formulas into a fresh graph.
///
/// In in-row mode only formulas reading their own row are compressed; the
/// graph's compression flag is restored afterwards.
fn build_sheet(sheet: &SheetData, config: &AnalyzerConfig) -> BuiltSheet {
    #[cfg(feature = "tracing")]
    let _span = tracing::info_span!("build_sheet", sheet = sheet.name()).entered();

    let mut graph = TacoGraph::with_config(config.graph);
    if config.in_row_compression {
        graph.set_in_row_only(true);
    }
    let mut num_edges = 0u64;
    let mut vertices: FxHashSet<Range> = FxHashSet::default();
    for (dep, precs) in sheet.sorted_dep_pairs(config.order) {
        if config.in_row_compression {
            graph.set_compression(config.graph.compression && sheet.is_in_row_only(&dep));
        }
        for prec in precs {
            graph.add(*prec, dep);
            num_edges += 1;
        }
        vertices.insert(dep);
        vertices.extend(precs.iter().copied());
    }
    graph.set_compression(config.graph.compression);

    #[cfg(feature = "tracing")]
    tracing::debug!(
        raw_edges = num_edges,
        compressed_edges = graph.num_edges(),
        "sheet graph built"
    );
    BuiltSheet {
        graph,
        num_edges,
        num_vertices: vertices.len() as u64,
    }
}

/// Collapse cells into vertical runs: consecutive rows of one column become
/// one range. Output is ordered by column, then row.
fn column_runs(mut cells: Vec<Range>) -> Vec<Range> {
    cells.sort_by_key(|c| (c.start_col(), c.start_row()));
    let mut runs: Vec<Range> = Vec::new();
    for cell in cells {
        match runs.last_mut() {
            Some(run) if run.start_col() == cell.start_col() && run.end_row() + 1 == cell.start_row() => {
                *run = run.bounding_box(&cell);
            }
            _ => runs.push(cell),
        }
    }
    runs
}

impl SheetAnalyzer {
    pub fn new(workbook: WorkbookData, config: AnalyzerConfig) -> Self {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("analyze", file = workbook.file_name()).entered();

        let mut graphs = Vec::with_capacity(workbook.num_sheets());
        let (mut num_edges, mut num_vertices) = (0, 0);
        for sheet in workbook.sheets() {
            let built = build_sheet(sheet, &config);
            num_edges += built.num_edges;
            num_vertices += built.num_vertices;
            graphs.push(built.graph);
        }
        Self {
            workbook,
            config,
            graphs,
            num_edges,
            num_vertices,
        }
    }

    pub fn workbook(&self) -> &WorkbookData {
        &self.workbook
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn file_name(&self) -> &str {
        self.workbook.file_name()
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.workbook.sheets().map(SheetData::name)
    }

    fn sheet(&self, name: &str) -> Result<&SheetData, AnalyzerError> {
        self.workbook
            .sheet(name)
            .ok_or_else(|| AnalyzerError::UnknownSheet(name.to_string()))
    }

    pub fn graph(&self, sheet: &str) -> Result<&TacoGraph, AnalyzerError> {
        let id = self.sheet(sheet)?.id();
        Ok(&self.graphs[id as usize])
    }

    /// Transitive dependents of `query` on `sheet`.
    pub fn get_dependents(&self, sheet: &str, query: &Range) -> Result<Vec<Range>, AnalyzerError> {
        let id = self.sheet(sheet)?.id();
        if query.sheet() != id {
            return Err(AnalyzerError::UnsupportedInput(format!(
                "{query} does not belong to sheet `{sheet}`"
            )));
        }
        Ok(self.graphs[id as usize].get_dependents(query))
    }

    pub fn num_formulae(&self) -> usize {
        self.workbook.sheets().map(SheetData::num_formulae).sum()
    }

    /// Precedent references inserted, one per `(prec, dep)` pair.
    pub fn num_edges(&self) -> u64 {
        self.num_edges
    }

    /// Distinct ranges appearing in any raw `(prec, dep)` pair, per sheet.
    pub fn num_vertices(&self) -> u64 {
        self.num_vertices
    }

    pub fn num_comp_edges(&self) -> usize {
        self.graphs.iter().map(TacoGraph::num_edges).sum()
    }

    pub fn num_comp_vertices(&self) -> usize {
        self.graphs.iter().map(TacoGraph::num_vertices).sum()
    }

    /// Pattern histogram per sheet name.
    pub fn compress_info(&self) -> BTreeMap<String, String> {
        self.sheet_names()
            .zip(&self.graphs)
            .map(|(name, graph)| (name.to_string(), graph.compress_info()))
            .collect()
    }

    /// Pattern statistics summed over all sheets.
    pub fn compress_stats(&self) -> CompressStats {
        let mut total = CompressStats::default();
        for graph in &self.graphs {
            total.merge(&graph.compress_stats());
        }
        total
    }

    /// Number of formulas per reference count.
    pub fn ref_distribution(&self) -> BTreeMap<usize, usize> {
        let mut dist = BTreeMap::new();
        for sheet in self.workbook.sheets() {
            for cell in sheet.formula_cells() {
                let refs = sheet.num_refs(cell).unwrap_or_default();
                *dist.entry(refs).or_insert(0) += 1;
            }
        }
        dist
    }

    /// Among cells that hold values and are read by some formula, the one with
    /// the most dependent cells. Ties keep the first sheet, then the first
    /// cell in row-major order.
    pub fn ref_with_most_deps(&self) -> Option<MostDependents> {
        let mut best: Option<MostDependents> = None;
        for (sheet, graph) in self.workbook.sheets().zip(&self.graphs) {
            for cell in sheet.value_only_precedents() {
                let count = graph.count_dependent_cells(&cell);
                if count > best.as_ref().map_or(0, |b| b.num_dependents) {
                    best = Some(MostDependents {
                        sheet: sheet.name().to_string(),
                        cell,
                        num_dependents: count,
                    });
                }
            }
        }
        best
    }

    /// Formula cells grouped by formula text, per sheet.
    ///
    /// Each group is reported as vertical runs of cells. Formulas are compared
    /// verbatim, so fill-down groups only form when the text is relative
    /// (R1C1 style or otherwise normalised).
    pub fn formula_clusters(&self) -> BTreeMap<String, BTreeMap<String, Vec<Range>>> {
        self.workbook
            .sheets()
            .map(|sheet| {
                let mut groups: BTreeMap<String, Vec<Range>> = BTreeMap::new();
                for cell in sheet.formula_cells() {
                    if let Some(content) = sheet.content(cell).filter(|c| c.is_formula) {
                        groups.entry(content.formula.clone()).or_default().push(*cell);
                    }
                }
                let clusters = groups
                    .into_iter()
                    .map(|(formula, cells)| (formula, column_runs(cells)))
                    .collect();
                (sheet.name().to_string(), clusters)
            })
            .collect()
    }
}
