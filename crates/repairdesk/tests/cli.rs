//! End-to-end runs of the command line against in-memory output.

use std::fs;

use clap::Parser;
use repairdesk::cli::{run, Cli};
use serde_json::Value;
use tempfile::TempDir;

fn repairdesk(args: &[&str]) -> anyhow::Result<String> {
    let cli = Cli::try_parse_from(std::iter::once("repairdesk").chain(args.iter().copied()))?;
    let mut out = Vec::new();
    run(cli, &mut out)?;
    Ok(String::from_utf8(out)?)
}

#[test]
fn list_searches_registry() {
    let out = repairdesk(&["list", "clients", "--search", "ov"]).unwrap();

    assert!(out.starts_with("Clients\nSearch: \"ov\"\n"));
    assert!(out.contains("Иванов Иван Иванович"));
    assert!(out.contains("Петрова Мария Сергеевна"));
    assert!(!out.contains("ТехКомпани"));
    assert!(out.contains("₽45 000"));
    assert!(out.ends_with("Page 1 / 1\n"));
}

#[test]
fn list_as_json_with_sort_and_paging() {
    let out = repairdesk(&[
        "list",
        "clients",
        "--sort",
        "totalSpent:desc",
        "--page-size",
        "2",
        "--format",
        "json",
    ])
    .unwrap();
    let page: Value = serde_json::from_str(&out).unwrap();

    assert_eq!(page["totalCount"], 3);
    assert_eq!(page["pageCount"], 2);
    assert_eq!(page["items"][0]["totalSpent"], 250000);
    assert_eq!(page["items"][1]["name"], "Иванов Иван Иванович");
}

#[test]
fn filter_on_a_column_without_a_selector() {
    let count = |filter: &str| -> Value {
        let out = repairdesk(&["list", "orders", "--filter", filter, "--format", "json"]).unwrap();
        serde_json::from_str::<Value>(&out).unwrap()["totalCount"].clone()
    };
    assert_eq!(count("technician=Кузнецов В.И."), 1);
    assert_eq!(count("technician=nobody"), 0);
    assert_eq!(count("issue=Разбит экран"), 1);
}

#[test]
fn search_field_outside_the_search_box() {
    let list = |args: &[&str]| -> Value {
        let mut full = vec!["list", "orders", "--format", "json"];
        full.extend_from_slice(args);
        serde_json::from_str(&repairdesk(&full).unwrap()).unwrap()
    };

    let page = list(&["--search", "смирнов", "--search-field", "technician"]);
    assert_eq!(page["totalCount"], 2);

    let page = list(&["--search", "nobody", "--search-field", "technician"]);
    assert_eq!(page["totalCount"], 0);

    let page = list(&["--search", "#1024", "--search-field", "technician"]);
    assert_eq!(page["totalCount"], 0);
}

#[test]
fn export_honours_undeclared_filters() {
    let out = repairdesk(&[
        "export",
        "orders",
        "--filter",
        "technician=Смирнов П.А.",
        "--sort",
        "issue",
        "--format",
        "json",
    ])
    .unwrap();
    let rows: Value = serde_json::from_str(&out).unwrap();
    let numbers: Vec<_> = rows
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["Number"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(numbers, ["#1024", "#1022"]);
}

#[test]
fn actions_follow_the_role() {
    let admin = repairdesk(&["list", "orders", "--role", "admin"]).unwrap();
    assert!(admin.contains("View, Edit, Delete"));

    let technician = repairdesk(&["--role", "technician", "list", "orders"]).unwrap();
    assert!(technician.contains("| View\n"));
    assert!(!technician.contains("Edit"));
}

#[test]
fn list_json_file_with_filter() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("inventory.json");
    fs::write(
        &path,
        r#"[
            {"name": "Screen", "stock": 4, "used": false},
            {"name": "Battery", "stock": 0, "used": true},
            {"name": "Keyboard", "stock": 12, "used": true}
        ]"#,
    )
    .unwrap();

    let out = repairdesk(&[
        "list",
        "--file",
        path.to_str().unwrap(),
        "--filter",
        "used=true",
        "--sort",
        "stock:desc",
    ])
    .unwrap();

    assert!(out.starts_with("inventory\n"));
    let keyboard = out.find("Keyboard").unwrap();
    let battery = out.find("Battery").unwrap();
    assert!(keyboard < battery);
    assert!(!out.contains("Screen"));
}

#[test]
fn export_selected_columns_to_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("clients.csv");

    let out = repairdesk(&[
        "export",
        "clients",
        "--columns",
        "name,totalSpent",
        "-o",
        path.to_str().unwrap(),
    ])
    .unwrap();

    assert!(out.starts_with("Wrote "));
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "Name,Spent\n\
         Иванов Иван Иванович,45000\n\
         Петрова Мария Сергеевна,12000\n\
         \"ООО \"\"ТехКомпани\"\"\",250000\n"
    );
}

#[test]
fn export_rejects_unknown_columns() {
    let err = repairdesk(&["export", "clients", "--columns", "name,color"]).unwrap_err();
    assert!(err.to_string().contains("unknown column: color"));
}

#[test]
fn export_ignores_paging() {
    let out = repairdesk(&["export", "orders", "--page-size", "1", "--format", "json"]).unwrap();
    let rows: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(rows.as_array().unwrap().len(), 3);
    assert_eq!(rows[0]["Number"], "#1024");
}

#[test]
fn report_uses_settings_and_statistics() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("settings.yaml");
    fs::write(&config, "company_name: Fix-It Ltd\n").unwrap();

    let out = repairdesk(&[
        "report",
        "orders",
        "--config",
        config.to_str().unwrap(),
        "--from",
        "2024-01-01",
        "--to",
        "2024-01-31",
        "--comments",
        "January",
    ])
    .unwrap();

    assert!(out.contains("<h1>Orders</h1>"));
    assert!(out.contains("2024-01-01 to 2024-01-31"));
    assert!(out.contains("<strong>Comments:</strong> January"));
    assert!(out.contains("Cost (sum)"));
    assert!(out.contains("26000.00"));
    assert!(out.contains("Report generated automatically &bull; Fix-It Ltd"));
}

#[test]
fn report_without_statistics() {
    let out = repairdesk(&["report", "staff", "--no-stats", "--agg", "salary:max"]).unwrap();
    assert!(!out.contains("Summary statistics"));
    assert!(out.contains("Смирнов Петр Александрович"));
}

#[test]
fn report_period_must_be_ordered() {
    let err = repairdesk(&[
        "report",
        "orders",
        "--from",
        "2024-02-01",
        "--to",
        "2024-01-01",
    ])
    .unwrap_err();
    assert!(err.to_string().contains("is after"));
}

#[test]
fn import_previews_and_counts() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("incoming.csv");
    fs::write(
        &path,
        "Name,Stock,Price,Warehouse\nBattery 45Wh,8,3900,north\nCooler,2,1200,south\n",
    )
    .unwrap();

    let out = repairdesk(&["import", "parts", path.to_str().unwrap()]).unwrap();

    assert!(out.starts_with("Preview (2 of 2 rows)\n"));
    assert!(out.contains("Battery 45Wh"));
    assert!(!out.contains("north"));
    assert!(out.ends_with("Imported 2 records into parts (5 total)\n"));
}

#[test]
fn import_needs_a_known_format() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("incoming.txt");
    fs::write(&path, "Name\nCooler\n").unwrap();

    let err = repairdesk(&["import", "parts", path.to_str().unwrap()]).unwrap_err();
    assert!(err.to_string().contains("pass --format"));

    let out = repairdesk(&["import", "parts", path.to_str().unwrap(), "--format", "csv"]).unwrap();
    assert!(out.contains("(4 total)"));
}

#[test]
fn new_registries_list_and_report() {
    let out = repairdesk(&["list", "warehouse", "--search", "b-0", "--format", "json"]).unwrap();
    let page: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(page["totalCount"], 2);
    assert_eq!(page["items"][1]["minQuantity"], 15);

    let out = repairdesk(&["list", "repairs", "--filter", "status=diagnostics"]).unwrap();
    assert!(out.starts_with("Repairs\nStatus: Diagnostics\n"));
    assert!(out.contains("HP Pavilion"));
    assert!(!out.contains("ThinkPad"));

    let out = repairdesk(&["report", "services"]).unwrap();
    assert!(out.contains("Price (avg)"));
    assert!(out.contains("2750.00"));
}

#[test]
fn add_fills_every_required_field() {
    let out = repairdesk(&[
        "add",
        "services",
        "--set",
        "name=Замена батареи",
        "--set",
        "category=repair",
        "--set",
        "price=2500",
        "--set",
        "duration=40",
        "--set",
        "description=Замена аккумулятора ноутбука",
        "--set",
        "isActive=true",
    ])
    .unwrap();
    assert!(out.starts_with("Services\n"));
    assert!(out.contains("Замена батареи"));
    assert!(out.contains("₽2 500"));
    assert!(out.ends_with("Added record 5 to services (5 total)\n"));

    let err = repairdesk(&["add", "services", "--set", "name=Замена батареи"]).unwrap_err();
    assert!(format!("{:#}", err).contains("missing field"));

    let err = repairdesk(&["add", "clients", "--set", "status=gold"]).unwrap_err();
    assert!(format!("{:#}", err).contains("invalid clients record"));
}

#[test]
fn edit_needs_the_edit_action() {
    let out = repairdesk(&["edit", "clients", "2", "--set", "status=vip", "--role", "manager"]).unwrap();
    let petrova = out.lines().find(|l| l.contains("Петрова")).unwrap();
    assert!(petrova.contains("VIP"));
    assert!(out.ends_with("Updated record 2 in clients\n"));

    let err = repairdesk(&["edit", "clients", "2", "--set", "status=vip", "--role", "technician"])
        .unwrap_err();
    assert_eq!(err.to_string(), "technician cannot edit clients records");

    let err = repairdesk(&["edit", "clients", "9", "--set", "status=vip"]).unwrap_err();
    assert_eq!(err.to_string(), "no record 9 in clients");
}

#[test]
fn delete_is_admin_only() {
    let err = repairdesk(&["delete", "parts", "3", "--role", "manager"]).unwrap_err();
    assert_eq!(err.to_string(), "manager cannot delete parts records");

    let out = repairdesk(&["delete", "parts", "3", "--role", "admin"]).unwrap();
    assert!(!out.contains("Клавиатура"));
    assert!(out.ends_with("Deleted record 3 from parts (2 total)\n"));

    let err = repairdesk(&["delete", "repairs", "1"]).unwrap_err();
    assert_eq!(err.to_string(), "admin cannot delete repairs records");
}

#[test]
fn source_is_required() {
    let err = repairdesk(&["list"]).unwrap_err();
    assert!(err.to_string().contains("name a registry"));
}
