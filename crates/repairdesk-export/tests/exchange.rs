//! Exported files read back through the importer.

use proptest::prelude::*;
use repairdesk_export::{
    import, serialize, Aggregation, Column, ExportColumn, ExportFormat, ImportFormat, Projection,
    Report,
};
use repairdesk_query::{Field, QueryState, SortKey, TableQuery, Value};

struct Client {
    name: String,
    phone: String,
    total_spent: f64,
}

fn client(name: &str, phone: &str, total_spent: f64) -> Client {
    Client {
        name: name.into(),
        phone: phone.into(),
        total_spent,
    }
}

fn export_columns() -> Vec<ExportColumn<Client>> {
    vec![
        ExportColumn::new(Field::new("name", |c: &Client| Value::text(&c.name)), "Name"),
        ExportColumn::new(Field::new("phone", |c: &Client| Value::text(&c.phone)), "Phone"),
        ExportColumn::new(
            Field::new("total_spent", |c: &Client| Value::from(c.total_spent)),
            "Total spent",
        ),
    ]
}

fn import_columns() -> Vec<Column> {
    export_columns().iter().map(ExportColumn::column).collect()
}

fn clients() -> Vec<Client> {
    vec![
        client("Ivanov Ivan", "+7 (900) 123-45-67", 45000.0),
        client("Petrova, Anna", "+7 (900) 234-56-78", 78000.5),
        client("Sidorov <Pyotr>", "", 12000.0),
    ]
}

#[test]
fn csv_and_xml_exports_import_back() {
    let records = clients();
    let projection = Projection::new(&records, &export_columns()).unwrap();

    for (export, import_as) in [
        (ExportFormat::Csv, ImportFormat::Csv),
        (ExportFormat::Xml, ImportFormat::Xml),
    ] {
        let text = serialize(export, &projection).unwrap();
        let rows = import::parse(import_as, &text, &import_columns()).unwrap();

        assert_eq!(rows.len(), 3, "{}", export);
        assert_eq!(rows[1]["name"], "Petrova, Anna");
        assert_eq!(rows[1]["total_spent"], "78000.5");
        assert_eq!(rows[2]["name"], "Sidorov <Pyotr>");
    }
}

#[test]
fn json_export_is_keyed_by_label_on_import() {
    let records = clients();
    let projection = Projection::new(&records, &export_columns()).unwrap();
    let text = serialize(ExportFormat::Json, &projection).unwrap();

    let rows = import::parse(ImportFormat::Json, &text, &import_columns()).unwrap();
    assert_eq!(rows[0]["Name"], "Ivanov Ivan");
    assert_eq!(rows[0]["Total spent"], "45000.0");
}

#[test]
fn export_of_a_filtered_sorted_selection() {
    let records = clients();
    let table = TableQuery::new()
        .search_in(Field::new("phone", |c: &Client| Value::text(&c.phone)))
        .sort_on(Field::new("total_spent", |c: &Client| Value::from(c.total_spent)));
    let state = QueryState::new()
        .with_search("+7")
        .with_sort(SortKey::desc("total_spent"));

    let selected = table.select(&records, &state);
    let projection = Projection::new(selected.iter().copied(), &export_columns()[..1]).unwrap();
    let csv = serialize(ExportFormat::Csv, &projection).unwrap();

    assert_eq!(csv, "Name\n\"Petrova, Anna\"\nIvanov Ivan\n");
}

#[test]
fn report_statistics_over_a_projection() {
    let records = clients();
    let projection = Projection::new(&records, &export_columns()).unwrap();
    let report = Report::new("Clients", projection)
        .aggregate("total_spent", Aggregation::Sum)
        .aggregate("total_spent", Aggregation::Avg)
        .aggregate("name", Aggregation::Count);

    let stats: Vec<String> = report.statistics().iter().map(|s| s.formatted()).collect();
    assert_eq!(stats, ["135000.50", "45000.17", "3.00"]);
}

proptest! {
    /// Any text survives a CSV export and import unchanged.
    #[test]
    fn csv_preserves_text(names in prop::collection::vec("[a-zA-Z0-9 ,;.'\"-]{0,12}", 1..10)) {
        let records: Vec<Client> = names.iter().map(|n| client(n, "", 0.0)).collect();
        let projection = Projection::new(&records, &export_columns()[..1]).unwrap();
        let text = serialize(ExportFormat::Csv, &projection).unwrap();
        let rows = import::parse(ImportFormat::Csv, &text, &import_columns()).unwrap();

        prop_assert_eq!(rows.len(), names.len());
        for (row, name) in rows.iter().zip(&names) {
            prop_assert_eq!(&row["name"], name.trim());
        }
    }
}
