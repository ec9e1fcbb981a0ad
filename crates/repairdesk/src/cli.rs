//! The `repairdesk` command line.
//!
//! ```text
//! repairdesk list clients --search ov --sort name:desc
//! repairdesk list --file inventory.json --filter used=true
//! repairdesk export orders --format xml --columns number,cost -o orders.xml
//! repairdesk report staff --from 2024-01-01 --to 2024-01-31 --agg salary:avg
//! repairdesk import parts incoming.csv
//! repairdesk add services --set name="Замена батареи" --set category=repair ...
//! repairdesk edit clients 2 --set status=vip
//! repairdesk delete parts 3 --role admin
//! ```

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use repairdesk_export::{
    import, serialize, Aggregation, Column, ExportColumn, ExportError, ExportFormat, ImportFormat,
    ImportedRow, Projection, Report, ReportFormat,
};
use repairdesk_query::{parse_filter, Collection, Record, SortKey};
use serde::Serialize;
use serde_json::{json, Map, Value as Json};
use tracing::info;

use crate::auth::{Role, Session};
use crate::dynamic::JsonRecord;
use crate::entities::{
    Client, Device, Entity, Order, Part, Repair, Service, StaffMember, WarehouseItem,
};
use crate::render;
use crate::settings::Settings;
use crate::table::DataTable;

/// Admin tables for a device repair shop.
#[derive(Debug, Parser)]
#[command(name = "repairdesk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log debug output to stderr
    #[arg(global = true, short, long)]
    pub verbose: bool,

    /// YAML settings file
    #[arg(global = true, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Act as this role: admin, manager or technician
    #[arg(global = true, long)]
    pub role: Option<Role>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show one page of a registry
    List {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        query: QueryArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = ListFormat::Text)]
        format: ListFormat,
    },

    /// Export every matching row
    Export {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        query: QueryArgs,

        /// csv, json, xml, excel or html
        #[arg(short, long, default_value = "csv")]
        format: ExportFormat,

        /// Column keys to export, in order. Defaults to the displayed columns
        #[arg(long, value_delimiter = ',', value_name = "KEYS")]
        columns: Vec<String>,

        /// Write to this file instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Build a report over the matching rows
    Report {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        query: QueryArgs,

        /// Report title. Defaults to the registry title
        #[arg(long)]
        title: Option<String>,

        /// First day of the reporting period (YYYY-MM-DD)
        #[arg(long, requires = "to")]
        from: Option<NaiveDate>,

        /// Last day of the reporting period (YYYY-MM-DD)
        #[arg(long, requires = "from")]
        to: Option<NaiveDate>,

        #[arg(long)]
        comments: Option<String>,

        /// Statistic as COLUMN:AGG, e.g. totalSpent:sum. Repeatable
        #[arg(long = "agg", value_name = "COLUMN:AGG", value_parser = parse_aggregate)]
        aggregates: Vec<(String, Aggregation)>,

        /// Leave the statistics block out
        #[arg(long)]
        no_stats: bool,

        /// html or csv
        #[arg(short, long, default_value = "html")]
        format: ReportFormat,

        /// Write to this file instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Preview a CSV, JSON or XML file and add it to a registry
    Import {
        #[arg(value_enum)]
        registry: Registry,

        path: PathBuf,

        /// Input format. Guessed from the file extension when omitted
        #[arg(short, long)]
        format: Option<ImportFormat>,
    },

    /// Add a record. Required fields must all be set
    Add {
        #[arg(value_enum)]
        registry: Registry,

        /// Field value as FIELD=VALUE. Repeatable
        #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_filter, required = true)]
        fields: Vec<(String, String)>,
    },

    /// Change fields of one record
    Edit {
        #[arg(value_enum)]
        registry: Registry,

        id: String,

        /// Field value as FIELD=VALUE. Repeatable
        #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_filter, required = true)]
        fields: Vec<(String, String)>,
    },

    /// Remove one record
    Delete {
        #[arg(value_enum)]
        registry: Registry,

        id: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Registry {
    Clients,
    Orders,
    Repairs,
    Devices,
    Parts,
    Services,
    Staff,
    Warehouse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    Text,
    Json,
}

/// Where the rows come from.
#[derive(Debug, Args)]
pub struct SourceArgs {
    /// Built-in registry
    #[arg(value_enum)]
    pub registry: Option<Registry>,

    /// JSON array of objects to list instead of a registry
    #[arg(long, value_name = "PATH", conflicts_with = "registry")]
    pub file: Option<PathBuf>,
}

enum Source {
    Registry(Registry),
    File(PathBuf),
}

impl SourceArgs {
    fn resolve(&self) -> Result<Source> {
        match (&self.file, self.registry) {
            (Some(path), _) => Ok(Source::File(path.clone())),
            (None, Some(registry)) => Ok(Source::Registry(registry)),
            (None, None) => {
                bail!("name a registry (clients, orders, repairs, devices, parts, services, staff, warehouse) or pass --file")
            }
        }
    }
}

/// Search, filter, sort and paging flags.
#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Case-insensitive search text
    #[arg(short, long)]
    pub search: Option<String>,

    /// Limit the search to this field. Repeatable
    #[arg(long = "search-field", value_name = "FIELD")]
    pub search_fields: Vec<String>,

    /// Exact filter as FIELD=VALUE. Repeatable
    #[arg(long = "filter", value_name = "FIELD=VALUE", value_parser = parse_filter)]
    pub filters: Vec<(String, String)>,

    /// Sort as FIELD or FIELD:asc|desc
    #[arg(long, value_name = "FIELD[:DIR]")]
    pub sort: Option<SortKey>,

    /// 1-based page number
    #[arg(short, long, default_value_t = 1)]
    pub page: usize,

    /// Rows per page. Defaults to the settings value
    #[arg(long)]
    pub page_size: Option<usize>,
}

impl QueryArgs {
    fn apply<T>(&self, table: &mut DataTable<T>, settings: &Settings) {
        if !self.search_fields.is_empty() {
            table.search_only(&self.search_fields);
        }

        let state = table.state_mut();
        state.page_size = self.page_size.unwrap_or(settings.default_page_size).max(1);
        if let Some(term) = &self.search {
            state.set_search(term.clone());
        }
        for (field, value) in &self.filters {
            state.set_filter(field.clone(), value.clone());
        }
        state.sort = self.sort.clone();
        state.set_page(self.page);
    }
}

fn parse_aggregate(s: &str) -> std::result::Result<(String, Aggregation), ExportError> {
    match s.rsplit_once(':') {
        Some((column, aggregation)) if !column.is_empty() => {
            Ok((column.to_string(), aggregation.parse()?))
        }
        _ => Err(ExportError::UnknownAggregation(s.to_string())),
    }
}

/// Settings and login shared by every command.
struct Env {
    settings: Settings,
    role: Role,
    session: Session,
}

/// Records and the table that lists them.
struct Listing<T> {
    name: String,
    title: String,
    records: Vec<T>,
    table: DataTable<T>,
    aggregations: Vec<(String, Aggregation)>,
}

impl<T: Entity> Listing<T> {
    fn of_entity() -> Self {
        Listing {
            name: T::REGISTRY.to_string(),
            title: T::TITLE.to_string(),
            records: T::seed(),
            table: T::table(),
            aggregations: T::aggregations()
                .into_iter()
                .map(|(key, agg)| (key.to_string(), agg))
                .collect(),
        }
    }
}

impl Listing<JsonRecord> {
    fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let records = JsonRecord::parse_array(&text)
            .with_context(|| format!("failed to load records from {}", path.display()))?;
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("records")
            .to_string();
        Ok(Listing {
            title: name.clone(),
            name,
            table: JsonRecord::table(&records),
            records,
            aggregations: Vec::new(),
        })
    }
}

/// Runs `$body` with `$entity` bound to the record type of a registry.
macro_rules! with_entity {
    ($registry:expr, $entity:ident => $body:expr) => {
        match $registry {
            Registry::Clients => {
                type $entity = Client;
                $body
            }
            Registry::Orders => {
                type $entity = Order;
                $body
            }
            Registry::Repairs => {
                type $entity = Repair;
                $body
            }
            Registry::Devices => {
                type $entity = Device;
                $body
            }
            Registry::Parts => {
                type $entity = Part;
                $body
            }
            Registry::Services => {
                type $entity = Service;
                $body
            }
            Registry::Staff => {
                type $entity = StaffMember;
                $body
            }
            Registry::Warehouse => {
                type $entity = WarehouseItem;
                $body
            }
        }
    };
}

macro_rules! with_listing {
    ($source:expr, |$listing:ident| $body:expr) => {
        match $source.resolve()? {
            Source::Registry(registry) => with_entity!(registry, E => {
                let $listing = Listing::<E>::of_entity();
                $body
            }),
            Source::File(path) => {
                let $listing = Listing::<JsonRecord>::from_file(&path)?;
                $body
            }
        }
    };
}

/// Runs a parsed command line, writing results to `out`.
pub fn run(cli: Cli, out: &mut dyn Write) -> Result<()> {
    let settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let role = cli.role.unwrap_or(settings.role);
    let env = Env {
        session: Session::as_role(role),
        role,
        settings,
    };

    match cli.command {
        Command::List {
            source,
            query,
            format,
        } => with_listing!(source, |listing| list(listing, &env, &query, format, out)),
        Command::Export {
            source,
            query,
            format,
            columns,
            output,
        } => with_listing!(source, |listing| {
            export(listing, &env, &query, format, &columns, output.as_deref(), out)
        }),
        Command::Report {
            source,
            query,
            title,
            from,
            to,
            comments,
            aggregates,
            no_stats,
            format,
            output,
        } => {
            let options = ReportOptions {
                title,
                period: match (from, to) {
                    (Some(from), Some(to)) if from > to => {
                        bail!("--from {} is after --to {}", from, to)
                    }
                    (Some(from), Some(to)) => Some((from, to)),
                    _ => None,
                },
                comments,
                aggregates,
                include_stats: !no_stats,
                format,
            };
            with_listing!(source, |listing| {
                report(listing, &env, &query, options, output.as_deref(), out)
            })
        }
        Command::Import {
            registry,
            path,
            format,
        } => with_entity!(registry, E => import_into::<E>(&path, format, out)),
        Command::Add { registry, fields } => {
            with_entity!(registry, E => apply_change::<E>(Change::Add(fields), &env, out))
        }
        Command::Edit {
            registry,
            id,
            fields,
        } => with_entity!(registry, E => apply_change::<E>(Change::Edit(id, fields), &env, out)),
        Command::Delete { registry, id } => {
            with_entity!(registry, E => apply_change::<E>(Change::Delete(id), &env, out))
        }
    }
}

fn list<T>(
    mut listing: Listing<T>,
    env: &Env,
    query: &QueryArgs,
    format: ListFormat,
    out: &mut dyn Write,
) -> Result<()>
where
    T: Record<Id = String> + Serialize,
{
    query.apply(&mut listing.table, &env.settings);
    let view = listing.table.view(&listing.records, &env.session);

    match format {
        ListFormat::Text => {
            out.write_all(render::render_view(&listing.title, &view).as_bytes())?;
        }
        ListFormat::Json => {
            let body = json!({
                "page": view.page.page,
                "pageCount": view.page.page_count,
                "totalCount": view.page.total_count,
                "items": view.page.items,
            });
            serde_json::to_writer_pretty(&mut *out, &body)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Picks export columns by key, in the order given. No keys means all.
fn pick_columns<T>(
    available: Vec<ExportColumn<T>>,
    keys: &[String],
) -> std::result::Result<Vec<ExportColumn<T>>, ExportError> {
    if keys.is_empty() {
        return Ok(available);
    }
    keys.iter()
        .map(|key| {
            available
                .iter()
                .find(|c| c.key() == key)
                .cloned()
                .ok_or_else(|| ExportError::UnknownColumn(key.clone()))
        })
        .collect()
}

fn export<T>(
    mut listing: Listing<T>,
    env: &Env,
    query: &QueryArgs,
    format: ExportFormat,
    keys: &[String],
    output: Option<&Path>,
    out: &mut dyn Write,
) -> Result<()>
where
    T: Record<Id = String>,
{
    query.apply(&mut listing.table, &env.settings);
    let selected = listing
        .table
        .query()
        .select(&listing.records, listing.table.state());
    let columns = pick_columns(listing.table.export_columns(), keys)?;
    let projection =
        Projection::new(selected.iter().copied(), &columns)?.with_title(listing.name.clone());
    let text = serialize(format, &projection)
        .with_context(|| format!("failed to export {} as {}", listing.name, format))?;

    info!(registry = %listing.name, %format, rows = projection.len(), "exported");
    emit(&text, output, out)
}

struct ReportOptions {
    title: Option<String>,
    period: Option<(NaiveDate, NaiveDate)>,
    comments: Option<String>,
    aggregates: Vec<(String, Aggregation)>,
    include_stats: bool,
    format: ReportFormat,
}

fn report<T>(
    mut listing: Listing<T>,
    env: &Env,
    query: &QueryArgs,
    options: ReportOptions,
    output: Option<&Path>,
    out: &mut dyn Write,
) -> Result<()>
where
    T: Record<Id = String>,
{
    query.apply(&mut listing.table, &env.settings);
    let selected = listing
        .table
        .query()
        .select(&listing.records, listing.table.state());
    let projection = Projection::new(selected.iter().copied(), &listing.table.export_columns())?
        .with_title(listing.name.clone());

    let mut report = Report::new(options.title.unwrap_or(listing.title), projection)
        .company(env.settings.company_name.clone())
        .include_stats(options.include_stats);
    if let Some((from, to)) = options.period {
        report = report.period(from, to);
    }
    if let Some(comments) = options.comments {
        report = report.comments(comments);
    }
    let aggregates = if options.aggregates.is_empty() {
        listing.aggregations
    } else {
        options.aggregates
    };
    for (key, aggregation) in aggregates {
        report = report.aggregate(key, aggregation);
    }

    let text = report
        .render(options.format)
        .with_context(|| format!("failed to render the {} report", listing.name))?;
    emit(&text, output, out)
}

fn import_into<T: Entity>(
    path: &Path,
    format: Option<ImportFormat>,
    out: &mut dyn Write,
) -> Result<()> {
    let format = match format {
        Some(format) => format,
        None => path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(ImportFormat::from_extension)
            .with_context(|| {
                format!("cannot tell the format of {}, pass --format", path.display())
            })?,
    };
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let columns: Vec<Column> = T::table()
        .export_columns()
        .iter()
        .map(ExportColumn::column)
        .collect();
    let rows = import::parse(format, &text, &columns)
        .with_context(|| format!("failed to import {}", path.display()))?;
    if rows.is_empty() {
        writeln!(out, "Nothing to import from {}", path.display())?;
        return Ok(());
    }

    let preview = import::preview(&rows);
    writeln!(out, "Preview ({} of {} rows)", preview.len(), rows.len())?;
    out.write_all(preview_grid(preview).as_bytes())?;

    let mut registry = Collection::from_records(seed_records::<T>()?)?;
    let start = registry.len();
    let added = registry.extend(
        rows.into_iter()
            .enumerate()
            .map(|(i, row)| JsonRecord::from_row((start + i + 1).to_string(), row)),
    )?;

    info!(registry = T::REGISTRY, %format, added, "imported");
    writeln!(
        out,
        "\nImported {} records into {} ({} total)",
        added,
        T::REGISTRY,
        registry.len()
    )?;
    Ok(())
}

/// Seed records of `T` as JSON records, so imported rows can join them.
fn seed_records<T: Entity>() -> Result<Vec<JsonRecord>> {
    T::seed()
        .iter()
        .map(|record| -> Result<JsonRecord> {
            match serde_json::to_value(record)? {
                Json::Object(fields) => Ok(JsonRecord::new(fields, record.id().clone())),
                other => bail!("{} record serialized as {}", T::REGISTRY, other),
            }
        })
        .collect()
}

enum Change {
    Add(Vec<(String, String)>),
    Edit(String, Vec<(String, String)>),
    Delete(String),
}

/// Applies one add, edit or delete to the registry and prints the result.
///
/// Edits and deletes need the table's Edit or Delete action for the
/// current role. New records must deserialize, so every required field has
/// to be set.
fn apply_change<T: Entity>(change: Change, env: &Env, out: &mut dyn Write) -> Result<()> {
    let mut table = T::table();
    let seed = T::seed();
    let kinds = field_kinds(&seed)?;
    let mut registry = Collection::from_records(seed)?;

    let summary = match change {
        Change::Add(fields) => {
            let id = next_id(&registry);
            let mut object = Map::new();
            object.insert("id".to_string(), Json::String(id.clone()));
            set_fields(&mut object, &kinds, fields)?;
            let record: T = serde_json::from_value(Json::Object(object))
                .with_context(|| format!("invalid {} record", T::REGISTRY))?;
            registry.insert(record)?;
            format!("Added record {} to {} ({} total)", id, T::REGISTRY, registry.len())
        }
        Change::Edit(id, fields) => {
            permit(&table, "Edit", env, T::REGISTRY)?;
            let current = registry
                .get(&id)
                .with_context(|| format!("no record {} in {}", id, T::REGISTRY))?;
            let mut object = match serde_json::to_value(current)? {
                Json::Object(object) => object,
                other => bail!("{} record serialized as {}", T::REGISTRY, other),
            };
            set_fields(&mut object, &kinds, fields)?;
            let record: T = serde_json::from_value(Json::Object(object))
                .with_context(|| format!("invalid {} record", T::REGISTRY))?;
            registry.replace_by_id(record)?;
            format!("Updated record {} in {}", id, T::REGISTRY)
        }
        Change::Delete(id) => {
            permit(&table, "Delete", env, T::REGISTRY)?;
            registry
                .remove_by_id(&id)
                .with_context(|| format!("no record {} in {}", id, T::REGISTRY))?;
            format!("Deleted record {} from {} ({} total)", id, T::REGISTRY, registry.len())
        }
    };

    info!(registry = T::REGISTRY, version = registry.version(), "registry changed");
    table.state_mut().page_size = env.settings.default_page_size;
    let view = table.view(registry.snapshot(), &env.session);
    out.write_all(render::render_view(T::TITLE, &view).as_bytes())?;
    writeln!(out, "\n{}", summary)?;
    Ok(())
}

fn permit<T>(table: &DataTable<T>, action: &str, env: &Env, registry: &str) -> Result<()> {
    if !table.allows(action, &env.session) {
        bail!(
            "{} cannot {} {} records",
            env.role,
            action.to_lowercase(),
            registry
        );
    }
    Ok(())
}

/// Lowest free numeric id above the record count.
fn next_id<T: Record<Id = String>>(registry: &Collection<T>) -> String {
    (registry.len() + 1..)
        .map(|n| n.to_string())
        .find(|id| registry.get(id).is_none())
        .unwrap_or_default()
}

/// JSON shape of each field, taken from serialized records. A field that
/// is null everywhere is treated as text.
fn field_kinds<T: Serialize>(records: &[T]) -> Result<Map<String, Json>> {
    let mut kinds = Map::new();
    for record in records {
        if let Json::Object(object) = serde_json::to_value(record)? {
            for (key, value) in object {
                let known = kinds.get(&key).is_some_and(|v| !v.is_null());
                if !known {
                    kinds.insert(key, value);
                }
            }
        }
    }
    Ok(kinds)
}

fn set_fields(
    object: &mut Map<String, Json>,
    kinds: &Map<String, Json>,
    fields: Vec<(String, String)>,
) -> Result<()> {
    for (key, text) in fields {
        if key == "id" {
            bail!("ids are assigned by the registry");
        }
        let value = match kinds.get(&key) {
            None => bail!("unknown field: {}", key),
            Some(Json::Number(_)) => parse_number(&key, &text)?,
            Some(Json::Bool(_)) => match text.parse::<bool>() {
                Ok(b) => Json::Bool(b),
                Err(_) => bail!("{} expects true or false, got {:?}", key, text),
            },
            Some(_) => Json::String(text),
        };
        object.insert(key, value);
    }
    Ok(())
}

fn parse_number(key: &str, text: &str) -> Result<Json> {
    let text = text.trim();
    if let Ok(n) = text.parse::<i64>() {
        return Ok(Json::from(n));
    }
    text.parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(Json::Number)
        .with_context(|| format!("{} expects a number, got {:?}", key, text))
}

fn preview_grid(rows: &[ImportedRow]) -> String {
    let mut headers: Vec<String> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            headers
                .iter()
                .map(|h| row.get(h).cloned().unwrap_or_default())
                .collect()
        })
        .collect();
    render::grid(&headers, &cells)
}

fn emit(text: &str, output: Option<&Path>, out: &mut dyn Write) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, text)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), bytes = text.len(), "wrote file");
            writeln!(out, "Wrote {}", path.display())?;
        }
        None => out.write_all(text.as_bytes())?,
    }
    Ok(())
}
