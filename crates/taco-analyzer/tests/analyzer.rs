use std::collections::{BTreeMap, BTreeSet};

use taco_analyzer::{AnalyzerConfig, AnalyzerError, DepOrder, MostDependents, SheetAnalyzer, WorkbookData};
use taco_common::Range;
use taco_common::address::parse_range;
use taco_graph::TacoConfig;

fn cells(ranges: &[Range]) -> BTreeSet<String> {
    ranges
        .iter()
        .flat_map(|r| r.cells())
        .map(|c| c.to_string())
        .collect()
}

/// `A` holds values, `B_i = A_i * 2`, `C_i = SUM(A1:A_i)`.
fn fill_down_book(rows: u32) -> WorkbookData {
    let mut book = WorkbookData::new("fill_down.xlsx");
    let sheet = book.sheet_mut("Sheet1");
    for i in 1..=rows {
        sheet.add_value(parse_range(sheet.id(), &format!("A{i}")).unwrap(), i.to_string()).unwrap();
        sheet
            .add_formula_a1(&format!("B{i}"), &[format!("A{i}").as_str()], "=RC[-1]*2")
            .unwrap();
        sheet
            .add_formula_a1(&format!("C{i}"), &[format!("A1:A{i}").as_str()], "=SUM(R1C1:RC1)")
            .unwrap();
    }
    book
}

#[test]
fn fill_down_sheet_compresses_to_two_edges() {
    let analyzer = SheetAnalyzer::new(fill_down_book(100), AnalyzerConfig::default());
    assert_eq!(analyzer.file_name(), "fill_down.xlsx");
    assert_eq!(analyzer.num_formulae(), 200);
    assert_eq!(analyzer.num_edges(), 200);
    // A_i, B_i, C_i and A1:A_i for i >= 2
    assert_eq!(analyzer.num_vertices(), 399);
    assert_eq!(analyzer.num_comp_edges(), 2);
    assert_eq!(analyzer.num_comp_vertices(), 3);
    assert_eq!(
        analyzer.compress_info(),
        BTreeMap::from([("Sheet1".to_string(), "RR:1,RF:1".to_string())])
    );
    assert_eq!(analyzer.ref_distribution(), BTreeMap::from([(1, 200)]));

    let stats = analyzer.compress_stats();
    assert_eq!(stats.total_edges(), 2);
    assert_eq!(stats.total_implied_edges(), 100 + 5050);
}

#[test]
fn dependents_by_sheet_name() {
    let book = fill_down_book(100);
    let a50 = parse_range(book.sheet("Sheet1").unwrap().id(), "A50").unwrap();
    let analyzer = SheetAnalyzer::new(book, AnalyzerConfig::default());

    let found = analyzer.get_dependents("Sheet1", &a50).unwrap();
    assert_eq!(cells(&found).len(), 52);
    assert!(cells(&found).contains("B50"));
    assert!(cells(&found).contains("C100"));
    assert!(!cells(&found).contains("C49"));

    assert_eq!(
        analyzer.get_dependents("Missing", &a50),
        Err(AnalyzerError::UnknownSheet("Missing".to_string()))
    );
    let elsewhere = parse_range(7, "A50").unwrap();
    assert!(matches!(
        analyzer.get_dependents("Sheet1", &elsewhere),
        Err(AnalyzerError::UnsupportedInput(_))
    ));
}

#[test]
fn most_dependents_is_first_value_cell() {
    let analyzer = SheetAnalyzer::new(fill_down_book(100), AnalyzerConfig::default());
    let best = analyzer.ref_with_most_deps().unwrap();
    assert_eq!(
        best,
        MostDependents {
            sheet: "Sheet1".to_string(),
            cell: Range::cell(best.cell.sheet(), 0, 0),
            num_dependents: 101,
        }
    );
}

#[test]
fn most_dependents_absent_without_value_precedents() {
    let mut book = WorkbookData::new("chain.xlsx");
    let sheet = book.sheet_mut("Sheet1");
    sheet.add_formula_a1("A1", &[], "=1").unwrap();
    sheet.add_formula_a1("A2", &["A1"], "=R[-1]C+1").unwrap();
    let analyzer = SheetAnalyzer::new(book, AnalyzerConfig::default());
    assert_eq!(analyzer.ref_with_most_deps(), None);
    assert_eq!(analyzer.ref_distribution(), BTreeMap::from([(0, 1), (1, 1)]));
}

#[test]
fn in_row_compression_only_merges_row_local_formulas() {
    let mut book = WorkbookData::new("in_row.xlsx");
    let sheet = book.sheet_mut("Sheet1");
    for i in 1..=5 {
        sheet
            .add_formula_a1(
                &format!("D{i}"),
                &[format!("A{i}").as_str(), format!("B{i}").as_str()],
                "=RC1+RC2",
            )
            .unwrap();
        sheet
            .add_formula_a1(&format!("E{i}"), &[format!("A1:A{i}").as_str()], "=SUM(R1C1:RC1)")
            .unwrap();
    }

    let plain = SheetAnalyzer::new(book.clone(), AnalyzerConfig::default());
    assert_eq!(plain.compress_info()["Sheet1"], "RR:2,RF:1");

    let in_row = SheetAnalyzer::new(book, AnalyzerConfig::default().with_in_row_compression(true));
    assert_eq!(in_row.compress_info()["Sheet1"], "RR:2,NoType:5");
    assert_eq!(in_row.num_comp_edges(), 7);
    // compression flag is restored once the sheet is built
    assert!(in_row.graph("Sheet1").unwrap().config().compression);
    assert!(in_row.graph("Sheet1").unwrap().config().in_row_only);
}

#[test]
fn replay_order_does_not_change_answers() {
    let book = fill_down_book(20);
    let id = book.sheet("Sheet1").unwrap().id();
    let by_col = SheetAnalyzer::new(book.clone(), AnalyzerConfig::default());
    let by_row = SheetAnalyzer::new(book, AnalyzerConfig::default().with_order(DepOrder::RowWise));
    for cell in parse_range(id, "A1:C21").unwrap().cells() {
        assert_eq!(
            cells(&by_col.get_dependents("Sheet1", &cell).unwrap()),
            cells(&by_row.get_dependents("Sheet1", &cell).unwrap()),
            "dependents of {cell}"
        );
    }
}

#[test]
fn uncompressed_analysis_keeps_every_edge() {
    let config = AnalyzerConfig::default().with_graph(TacoConfig::uncompressed());
    let analyzer = SheetAnalyzer::new(fill_down_book(10), config);
    assert_eq!(analyzer.num_comp_edges() as u64, analyzer.num_edges());
    assert_eq!(analyzer.compress_info()["Sheet1"], "NoType:20");
}

#[test]
fn statistics_sum_over_sheets() {
    let mut book = WorkbookData::new("two_sheets.xlsx");
    for name in ["Inputs", "Totals"] {
        let sheet = book.sheet_mut(name);
        for i in 1..=4 {
            sheet
                .add_formula_a1(&format!("B{i}"), &[format!("A{i}").as_str()], "=RC[-1]")
                .unwrap();
        }
    }
    book.sheet_mut("Totals").add_formula_a1("C1", &["B1:B4"], "=SUM(R1C2:R4C2)").unwrap();

    let analyzer = SheetAnalyzer::new(book, AnalyzerConfig::default());
    assert_eq!(analyzer.sheet_names().collect::<Vec<_>>(), ["Inputs", "Totals"]);
    assert_eq!(analyzer.num_formulae(), 9);
    assert_eq!(analyzer.num_edges(), 9);
    assert_eq!(analyzer.num_comp_edges(), 3);
    assert_eq!(
        analyzer.compress_info(),
        BTreeMap::from([
            ("Inputs".to_string(), "RR:1".to_string()),
            ("Totals".to_string(), "RR:1,NoType:1".to_string()),
        ])
    );
    assert_eq!(analyzer.compress_stats().total_edges(), 3);
}

#[test]
fn formula_clusters_group_vertical_runs() {
    let mut book = WorkbookData::new("clusters.xlsx");
    let sheet = book.sheet_mut("Sheet1");
    for row in (1..=10).chain(12..=15) {
        sheet
            .add_formula_a1(&format!("B{row}"), &[format!("A{row}").as_str()], "=RC[-1]*2")
            .unwrap();
    }
    for row in 1..=3 {
        sheet
            .add_formula_a1(&format!("C{row}"), &[format!("B{row}").as_str()], "=RC[-1]*2")
            .unwrap();
    }
    sheet.add_formula_a1("D1", &["A1:A15"], "=SUM(R1C1:R15C1)").unwrap();
    let id = sheet.id();

    let analyzer = SheetAnalyzer::new(book, AnalyzerConfig::default());
    let clusters = analyzer.formula_clusters();
    let sheet_clusters = &clusters["Sheet1"];
    assert_eq!(sheet_clusters.len(), 2);
    let r = |text: &str| parse_range(id, text).unwrap();
    assert_eq!(sheet_clusters["=RC[-1]*2"], vec![r("B1:B10"), r("B12:B15"), r("C1:C3")]);
    assert_eq!(sheet_clusters["=SUM(R1C1:R15C1)"], vec![r("D1")]);
}
