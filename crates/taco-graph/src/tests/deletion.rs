use super::common::*;
use crate::config::TacoConfig;
use crate::graph::TacoGraph;
use crate::pattern::PatternType;

#[test]
fn test_clear_middle_of_thousand_rows() {
    let mut graph = sliding_column(1000);
    graph.clear_dependents(&r("C500"));
    assert_eq!(graph.num_edges(), 2);
    assert_eq!(
        edge_list(&graph),
        vec![
            ("B1:B499".to_string(), "C1:C499".to_string(), PatternType::RelativeRelative),
            ("B501:B1000".to_string(), "C501:C1000".to_string(), PatternType::RelativeRelative),
        ]
    );
    assert!(dependents(&graph, "B500").is_empty());
    assert_eq!(dependents(&graph, "B499"), set(&["C499"]));
    assert_eq!(dependents(&graph, "B501"), set(&["C501"]));
}

#[test]
fn test_clear_end_cells() {
    let mut graph = sliding_column(10);
    graph.clear_dependents(&r("C1"));
    graph.clear_dependents(&r("C10"));
    assert_eq!(
        edge_list(&graph),
        vec![("B2:B9".to_string(), "C2:C9".to_string(), PatternType::RelativeRelative)]
    );
}

#[test]
fn test_clear_single_cell_remainders_are_re_added() {
    let mut graph = sliding_column(3);
    graph.clear_dependents(&r("C2"));
    // the two leftover cells fold back together as a gap edge
    assert_eq!(
        edge_list(&graph),
        vec![("B1:B3".to_string(), "C1:C3".to_string(), PatternType::Gap(1))]
    );
    assert!(dependents(&graph, "B2").is_empty());
    assert_eq!(dependents(&graph, "B3"), set(&["C3"]));

    // the hole is off the gap grid, so refilling it stores a second edge
    graph.add(r("B2"), r("C2"));
    assert_eq!(graph.num_edges(), 2);
    assert_eq!(dependents(&graph, "B2"), set(&["C2"]));
}

#[test]
fn test_clear_uncovered_cell_is_noop() {
    let mut graph = sliding_column(10);
    let before = edge_list(&graph);
    graph.clear_dependents(&r("D5"));
    graph.clear_dependents(&r("B5"));
    assert_eq!(edge_list(&graph), before);
}

#[test]
fn test_clear_gap_edge_on_and_off_grid() {
    let mut graph = TacoGraph::new();
    add_all(&mut graph, &[("B1", "C1"), ("B3", "C3"), ("B5", "C5"), ("B7", "C7")]);
    assert_eq!(graph.num_edges(), 1);

    graph.clear_dependents(&r("C4"));
    assert_eq!(graph.num_edges(), 1);

    graph.clear_dependents(&r("C5"));
    assert_eq!(
        edge_list(&graph),
        vec![
            ("B1:B3".to_string(), "C1:C3".to_string(), PatternType::Gap(1)),
            ("B7".to_string(), "C7".to_string(), PatternType::NoType),
        ]
    );
    assert_eq!(dependents(&graph, "B3"), set(&["C3"]));
    assert!(dependents(&graph, "B5").is_empty());
}

#[test]
fn test_clear_running_total_keeps_pattern() {
    let mut graph = TacoGraph::new();
    for i in 1..=10 {
        graph.add(r(&format!("B1:B{i}")), r(&format!("C{i}")));
    }
    graph.clear_dependents(&r("C5"));
    assert_eq!(
        edge_list(&graph),
        vec![
            ("B1:B10".to_string(), "C6:C10".to_string(), PatternType::RelativeFixed),
            ("B1:B4".to_string(), "C1:C4".to_string(), PatternType::RelativeFixed),
        ]
    );
    assert_eq!(dependents(&graph, "B5"), set(&["C6", "C7", "C8", "C9", "C10"]));
}

#[test]
fn test_clear_block_dependent_of_bare_edge() {
    let mut graph = TacoGraph::new();
    graph.add(r("A1"), r("C1:D2"));
    graph.clear_dependents(&r("C1"));
    assert_eq!(dependents(&graph, "A1"), set(&["C2", "D1", "D2"]));
}

#[test]
fn test_add_then_clear_round_trip() {
    let mut graph = sliding_column(10);
    let before: Vec<_> = ["B1", "B5", "B10", "B11"].iter().map(|q| dependents(&graph, q)).collect();
    graph.add(r("B11"), r("C11"));
    assert_eq!(graph.num_edges(), 1);
    graph.clear_dependents(&r("C11"));
    let after: Vec<_> = ["B1", "B5", "B10", "B11"].iter().map(|q| dependents(&graph, q)).collect();
    assert_eq!(before, after);
}

#[test]
fn test_clear_in_uncompressed_graph() {
    let mut graph = TacoGraph::with_config(TacoConfig::uncompressed());
    add_all(&mut graph, &[("A1", "B1"), ("A2", "B1"), ("A1", "B2")]);
    graph.clear_dependents(&r("B1"));
    assert_eq!(graph.num_edges(), 1);
    assert_eq!(dependents(&graph, "A1"), set(&["B2"]));
}

#[test]
#[should_panic(expected = "single cell")]
fn test_clear_rejects_ranges() {
    let mut graph = sliding_column(3);
    graph.clear_dependents(&r("C1:C2"));
}
