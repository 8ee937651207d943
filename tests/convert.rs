use std::{
    cell::Cell,
    collections::HashMap,
    fs::{self, File},
    io::Write,
    path::Path,
    vec,
};

use adjbin::{
    decoder::{self, Record, Records},
    io::{EdgeFile, EdgeSource, EdgeText},
    Converter, Edge, Error, Result,
};

const TRIANGLE_PLUS_ONE: &str = "# scenario graph\n1 2\n2 3\n1 3\n1 4\n";

fn records(path: &Path) -> Vec<Record>
{
    Records::new(File::open(path).unwrap())
        .collect::<Result<_>>()
        .unwrap()
}

fn convert(text: &str, converter: Converter) -> (Vec<u8>, Vec<Record>)
{
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.bin");
    converter.run(&EdgeText::new(text), &output).unwrap();
    (fs::read(&output).unwrap(), records(&output))
}

fn record(node: u32, neighbors: &[u32]) -> Record
{
    Record {
        node,
        neighbors: neighbors.to_vec(),
    }
}

#[test]
fn test_original_ids()
{
    let (_, recs) = convert(TRIANGLE_PLUS_ONE, Converter::new().relabel(false));
    assert_eq!(
        recs,
        vec![
            record(4, &[1]),
            record(2, &[1, 3]),
            record(3, &[1, 2]),
            record(1, &[2, 3, 4]),
        ]
    );
}

#[test]
fn test_relabeled_ids()
{
    let (_, recs) = convert(TRIANGLE_PLUS_ONE, Converter::new().relabel(true));
    assert_eq!(
        recs,
        vec![
            record(4, &[4]),
            record(2, &[3, 4]),
            record(3, &[2, 4]),
            record(1, &[1, 2, 3]),
        ]
    );
}

#[test]
fn test_malformed_line_leaves_no_output()
{
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.bin");
    let result = Converter::new().run(&EdgeText::new("1 2\n3 x\n"), &output);
    match result {
        Err(Error::Parse { line, token }) => {
            assert_eq!(line, 2);
            assert_eq!(token, "x");
        }
        other => panic!("expected parse error, got {:?}", other),
    }
    assert!(!output.exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_node_zero_leaves_no_output()
{
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.bin");
    for converter in [Converter::new(), Converter::new().relabel(false)] {
        let result = converter.run(&EdgeText::new("0 5\n5 6\n"), &output);
        assert!(matches!(result, Err(Error::ReservedId { line: 1 })), "{:?}", result);
        assert!(!output.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}

#[test]
fn test_self_loop()
{
    let (_, recs) = convert("5 5\n5 6\n", Converter::new().relabel(false));
    assert_eq!(recs, vec![record(6, &[5]), record(5, &[5, 5, 6])]);
}

#[test]
fn test_duplicate_edges_are_kept()
{
    let (_, recs) = convert("1 2\n2 1\n1 2\n", Converter::new().relabel(false));
    assert_eq!(recs, vec![record(1, &[2, 2, 2]), record(2, &[1, 1, 1])]);
}

fn scrambled_graph() -> String
{
    // Deterministic pseudo-random multigraph over sparse ids.
    let mut text = String::from("# generated\n");
    let mut x: u64 = 0x2545F4914F6CDD1D;
    for _ in 0..3000 {
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        let u = (x % 997) as u32 * 3 + 1;
        let v = ((x >> 20) % 997) as u32 * 3 + 1;
        text.push_str(&format!("{}\t{}\n", u, v));
        if x % 11 == 0 {
            text.push_str("\n# noise\n7\n");
        }
    }
    text
}

fn parse_edges(text: &str) -> Vec<Edge>
{
    EdgeText::new(text)
        .edges()
        .unwrap()
        .collect::<Result<_>>()
        .unwrap()
}

#[test]
fn test_output_properties_without_relabeling()
{
    let text = scrambled_graph();
    let edges = parse_edges(&text);
    let (_, recs) = convert(&text, Converter::new().relabel(false));

    let total: usize = recs.iter().map(Record::degree).sum();
    assert_eq!(total, 2 * edges.len());
    assert!(recs.windows(2).all(|w| w[0].degree() <= w[1].degree()));
    assert!(recs.iter().all(|r| r.neighbors.windows(2).all(|w| w[0] <= w[1])));
    // Equal degrees keep ascending id order.
    assert!(recs
        .windows(2)
        .filter(|w| w[0].degree() == w[1].degree())
        .all(|w| w[0].node < w[1].node));

    let mut expected: HashMap<u32, Vec<u32>> = HashMap::new();
    for &Edge(u, v) in &edges {
        expected.entry(u).or_default().push(v);
        expected.entry(v).or_default().push(u);
    }
    assert_eq!(recs.len(), expected.len());
    for rec in &recs {
        let mut want = expected[&rec.node].clone();
        want.sort_unstable();
        assert_eq!(rec.neighbors, want, "node {}", rec.node);
    }
}

#[test]
fn test_relabeled_ids_are_dense_frequency_ranks()
{
    let text = scrambled_graph();
    let (_, plain) = convert(&text, Converter::new().relabel(false));
    let (_, relabeled) = convert(&text, Converter::new().relabel(true));

    // Same records in the same order; only neighbor values differ.
    assert_eq!(
        plain.iter().map(|r| r.node).collect::<Vec<_>>(),
        relabeled.iter().map(|r| r.node).collect::<Vec<_>>()
    );

    // Output order is (degree, id) ascending, which is exactly the rank order.
    let rank: HashMap<u32, u32> = plain
        .iter()
        .enumerate()
        .map(|(i, r)| (r.node, i as u32 + 1))
        .collect();

    for (p, r) in plain.iter().zip(&relabeled) {
        let mut want: Vec<u32> = p.neighbors.iter().map(|n| rank[n]).collect();
        want.sort_unstable();
        assert_eq!(r.neighbors, want);
    }

    let mut seen: Vec<u32> = relabeled.iter().flat_map(|r| r.neighbors.clone()).collect();
    seen.sort_unstable();
    seen.dedup();
    let dense: Vec<u32> = (1..=plain.len() as u32).collect();
    assert_eq!(seen, dense);
}

#[test]
fn test_repeated_runs_are_byte_identical()
{
    let text = scrambled_graph();
    let (first, _) = convert(&text, Converter::new());
    let (second, _) = convert(&text, Converter::new());
    let (single_thread, _) = convert(&text, Converter::new().num_threads(1));
    let (wide, _) = convert(&text, Converter::new().num_threads(8).progress(true).progress_interval(50));
    assert_eq!(first, second);
    assert_eq!(first, single_thread);
    assert_eq!(first, wide);
}

#[test]
fn test_file_input_round_trip()
{
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("edges.txt");
    let output = dir.path().join("edges.bin");
    File::create(&input)
        .unwrap()
        .write_all(TRIANGLE_PLUS_ONE.as_bytes())
        .unwrap();

    let summary = Converter::new()
        .relabel(false)
        .run(&EdgeFile::new(&input), &output)
        .unwrap();
    assert_eq!(summary.num_edges, 4);
    assert_eq!(summary.num_active, 4);

    let inspection = decoder::inspect(File::open(&output).unwrap()).unwrap();
    assert!(inspection.is_well_formed());
    assert_eq!(inspection.records, 4);
    assert_eq!(inspection.neighbors, 8);
    assert_eq!(inspection.max_degree, 3);
    assert_eq!(inspection.max_neighbor, 4);
}

#[test]
fn test_existing_output_survives_failed_run()
{
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.bin");
    fs::write(&output, b"previous").unwrap();
    assert!(Converter::new()
        .run(&EdgeText::new("1 2\n2 -3\n"), &output)
        .is_err());
    assert_eq!(fs::read(&output).unwrap(), b"previous");
}

/// Yields a different edge list on the second pass, as a file rewritten
/// between passes would.
struct Shifting
{
    passes: Cell<usize>,
}

impl EdgeSource for Shifting
{
    type Edges = vec::IntoIter<Result<Edge>>;

    fn edges(&self) -> Result<Self::Edges>
    {
        let pass = self.passes.get();
        self.passes.set(pass + 1);
        let edges = if pass == 0 {
            vec![Edge(1, 2), Edge(2, 3)]
        }
        else {
            vec![Edge(1, 2), Edge(1, 3)]
        };
        Ok(edges.into_iter().map(Ok).collect::<Vec<_>>().into_iter())
    }
}

#[test]
fn test_inconsistent_passes_are_fatal()
{
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.bin");
    let source = Shifting {
        passes: Cell::new(0),
    };
    let result = Converter::new().run(&source, &output);
    assert!(matches!(result, Err(Error::PassMismatch { .. })));
    assert_eq!(source.passes.get(), 2);
    assert!(!output.exists());
}

#[test]
fn test_empty_input_writes_empty_file()
{
    let (bytes, recs) = convert("# nothing here\n\n", Converter::new());
    assert!(bytes.is_empty());
    assert!(recs.is_empty());
}
