use std::fs;

use pretty_assertions::assert_eq;
use sheet::{parse, save, serialize, Row};

fn row(cells: &[(&str, &str)]) -> Row {
    cells
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_fixed_field_order() {
    let rows = vec![
        row(&[("price", "12000"), ("courseName", "Rust basics")]),
        row(&[("courseName", "Go, basics")]),
    ];
    let text = serialize(&["courseName", "price"], &rows).unwrap();
    assert_eq!(
        text,
        "courseName,price\nRust basics,12000\n\"Go, basics\",\n"
    );
}

#[test]
fn test_no_rows() {
    let text = serialize(&["a", "b"], &[]).unwrap();
    assert_eq!(text, "a,b\n");
}

#[test]
fn test_round_trip_keeps_values() {
    let text = "courseName,price,purposes\n\
                \"Web, full stack\",12000,career|hobby\n\
                Data science,,\n";
    let fields = ["courseName", "price", "purposes"];

    let rows = parse(text.as_bytes()).unwrap();
    let written = serialize(&fields, &rows).unwrap();
    let reparsed = parse(written.as_bytes()).unwrap();

    assert_eq!(reparsed, rows);
    assert_eq!(written, text);
}

#[test]
fn test_save_creates_directories() {
    let dir = std::env::temp_dir().join(format!("sheet-test-{}", std::process::id()));
    let path = dir.join("nested").join("out.csv");

    save("a,b\n1,2\n", &path).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "a,b\n1,2\n");

    fs::remove_dir_all(&dir).unwrap();
}
