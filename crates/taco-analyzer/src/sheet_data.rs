//! In-memory description of a workbook's formulas.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use taco_common::address::{parse_cell, parse_range};
use taco_common::{Range, SheetId, SheetRegistry};

use crate::config::DepOrder;
use crate::error::AnalyzerError;

/// What a cell holds: a literal value or a formula.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellContent {
    pub value: String,
    /// Formula text; cells with the same text form one cluster.
    pub formula: String,
    pub is_formula: bool,
}

impl CellContent {
    pub fn value(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            formula: String::new(),
            is_formula: false,
        }
    }

    pub fn formula(formula: impl Into<String>) -> Self {
        Self {
            value: String::new(),
            formula: formula.into(),
            is_formula: true,
        }
    }
}

/// Formulas and values of one sheet.
#[derive(Debug, Clone)]
pub struct SheetData {
    id: SheetId,
    name: String,
    deps: FxHashMap<Range, Vec<Range>>,
    formula_num_refs: FxHashMap<Range, usize>,
    contents: FxHashMap<Range, CellContent>,
    max_row: u32,
    max_col: u32,
}

impl SheetData {
    pub fn new(id: SheetId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            deps: FxHashMap::default(),
            formula_num_refs: FxHashMap::default(),
            contents: FxHashMap::default(),
            max_row: 0,
            max_col: 0,
        }
    }

    pub fn id(&self) -> SheetId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Record the formula in `dep` reading `precs`, replacing whatever the
    /// cell held before. Precedents keep their order.
    pub fn add_formula(
        &mut self,
        dep: Range,
        precs: Vec<Range>,
        formula: impl Into<String>,
    ) -> Result<(), AnalyzerError> {
        self.check_cell(&dep)?;
        if let Some(prec) = precs.iter().find(|p| p.sheet() != self.id) {
            return Err(AnalyzerError::UnsupportedInput(format!(
                "{dep} on `{}` refers to {prec} on another sheet",
                self.name
            )));
        }

        self.formula_num_refs.insert(dep, precs.len());
        if precs.is_empty() {
            self.deps.remove(&dep);
        } else {
            self.deps.insert(dep, precs);
        }
        self.contents.insert(dep, CellContent::formula(formula));
        self.observe(&dep);
        Ok(())
    }

    /// [`Self::add_formula`] with A1 addresses, e.g. `("C2", &["B2", "A1:A9"])`.
    pub fn add_formula_a1(
        &mut self,
        dep: &str,
        precs: &[&str],
        formula: impl Into<String>,
    ) -> Result<(), AnalyzerError> {
        let dep = parse_cell(self.id, dep)?;
        let precs = precs
            .iter()
            .map(|p| parse_range(self.id, p))
            .collect::<Result<Vec<_>, _>>()?;
        self.add_formula(dep, precs, formula)
    }

    /// Store a literal value, dropping any formula the cell held.
    pub fn add_value(&mut self, cell: Range, value: impl Into<String>) -> Result<(), AnalyzerError> {
        self.check_cell(&cell)?;
        self.deps.remove(&cell);
        self.formula_num_refs.remove(&cell);
        self.contents.insert(cell, CellContent::value(value));
        self.observe(&cell);
        Ok(())
    }

    fn check_cell(&self, cell: &Range) -> Result<(), AnalyzerError> {
        if !cell.is_cell() || cell.sheet() != self.id {
            return Err(AnalyzerError::UnsupportedInput(format!(
                "{cell} is not a single cell of `{}`",
                self.name
            )));
        }
        Ok(())
    }

    fn observe(&mut self, cell: &Range) {
        self.max_row = self.max_row.max(cell.end_row());
        self.max_col = self.max_col.max(cell.end_col());
    }

    /// Formula cells with at least one precedent, with their precedents.
    pub fn sorted_dep_pairs(&self, order: DepOrder) -> Vec<(Range, &[Range])> {
        let mut pairs: Vec<(Range, &[Range])> = self
            .deps
            .iter()
            .map(|(dep, precs)| (*dep, precs.as_slice()))
            .collect();
        match order {
            DepOrder::ColumnWise => pairs.sort_by_key(|(dep, _)| (dep.start_col(), dep.start_row())),
            DepOrder::RowWise => pairs.sort_by_key(|(dep, _)| (dep.start_row(), dep.start_col())),
        }
        pairs
    }

    /// Every precedent of `dep` lies in `dep`'s own row.
    pub fn is_in_row_only(&self, dep: &Range) -> bool {
        let row = dep.start_row();
        self.deps
            .get(dep)
            .is_some_and(|precs| precs.iter().all(|p| p.start_row() == row && p.end_row() == row))
    }

    /// Distinct precedent cells that are not formula cells, in row-major order.
    pub fn value_only_precedents(&self) -> Vec<Range> {
        let mut cells = BTreeSet::new();
        for precs in self.deps.values() {
            for prec in precs {
                cells.extend(prec.cells().filter(|c| !self.formula_num_refs.contains_key(c)));
            }
        }
        cells.into_iter().collect()
    }

    pub fn precedents(&self, dep: &Range) -> Option<&[Range]> {
        self.deps.get(dep).map(Vec::as_slice)
    }

    /// Precedent references written in the formula at `dep`.
    pub fn num_refs(&self, dep: &Range) -> Option<usize> {
        self.formula_num_refs.get(dep).copied()
    }

    /// Every formula cell, including formulas without references.
    pub fn formula_cells(&self) -> impl Iterator<Item = &Range> + '_ {
        self.formula_num_refs.keys()
    }

    pub fn num_formulae(&self) -> usize {
        self.formula_num_refs.len()
    }

    pub fn content(&self, cell: &Range) -> Option<&CellContent> {
        self.contents.get(cell)
    }

    /// Zero-based index of the last row holding content.
    pub fn max_row(&self) -> u32 {
        self.max_row
    }

    pub fn max_col(&self) -> u32 {
        self.max_col
    }
}

/// All sheets of one workbook.
#[derive(Debug, Clone)]
pub struct WorkbookData {
    file_name: String,
    registry: SheetRegistry,
    sheets: Vec<SheetData>,
}

impl WorkbookData {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            registry: SheetRegistry::new(),
            sheets: Vec::new(),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn registry(&self) -> &SheetRegistry {
        &self.registry
    }

    /// The sheet called `name`, created empty on first use.
    pub fn sheet_mut(&mut self, name: &str) -> &mut SheetData {
        let id = self.registry.id_for(&self.file_name, name);
        let idx = id as usize;
        if idx == self.sheets.len() {
            self.sheets.push(SheetData::new(id, name));
        }
        &mut self.sheets[idx]
    }

    pub fn sheet(&self, name: &str) -> Option<&SheetData> {
        let id = self.registry.get_id(&self.file_name, name)?;
        self.sheets.get(id as usize)
    }

    /// Sheets in creation order.
    pub fn sheets(&self) -> impl Iterator<Item = &SheetData> + '_ {
        self.sheets.iter()
    }

    pub fn num_sheets(&self) -> usize {
        self.sheets.len()
    }
}
