//! Serializers over a [`Projection`].
//!
//! One entry point, [`serialize`], dispatches on [`ExportFormat`]. Every
//! format reads the same projection, so column selection and value
//! evaluation happen once.

use minijinja::{context, Environment};
use quick_xml::events::{BytesDecl, BytesText, Event};
use quick_xml::Writer;
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::debug;

use crate::error::{ExportError, Result};
use crate::format::ExportFormat;
use crate::projection::{Cell, Projection};
use crate::templates;

/// Serializes `projection` into `format`.
pub fn serialize(format: ExportFormat, projection: &Projection) -> Result<String> {
    let output = match format {
        ExportFormat::Csv => to_csv(projection),
        ExportFormat::Json => to_json(projection),
        ExportFormat::Xml => to_xml(projection),
        ExportFormat::Spreadsheet => to_spreadsheet(projection),
        ExportFormat::Html => to_html(projection),
    }?;
    debug!(
        %format,
        rows = projection.len(),
        columns = projection.columns().len(),
        bytes = output.len(),
        "serialized export"
    );
    Ok(output)
}

/// CSV with a header row of labels. Quoting follows RFC 4180.
pub fn to_csv(projection: &Projection) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let headers: Vec<&str> = projection.columns().iter().map(|c| c.label.as_str()).collect();
    wtr.write_record(&headers)
        .map_err(|e| ExportError::Csv(e.to_string()))?;

    for row in projection.rows() {
        wtr.write_record(row.iter().map(|cell| cell.as_text().into_owned()))
            .map_err(|e| ExportError::Csv(e.to_string()))?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| ExportError::Csv(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::Csv(e.to_string()))
}

/// Pretty JSON array of objects keyed by column label.
pub fn to_json(projection: &Projection) -> Result<String> {
    let records: Vec<LabeledRecord<'_>> = projection
        .rows()
        .iter()
        .map(|cells| LabeledRecord {
            projection,
            cells,
        })
        .collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

/// `<data><record><key>value</key>...</record></data>`, element names
/// derived from column keys.
pub fn to_xml(projection: &Projection) -> Result<String> {
    let keys: Vec<String> = projection
        .columns()
        .iter()
        .map(|c| sanitize_xml_name(&c.key))
        .collect();
    let document = XmlDocument {
        record: projection
            .rows()
            .iter()
            .map(|cells| XmlRecord {
                keys: &keys,
                cells,
            })
            .collect(),
    };
    let body = quick_xml::se::to_string_with_root("data", &document)?;
    Ok(format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{}", body))
}

/// SpreadsheetML 2003 workbook with a single `Sheet1`. Finite numbers are
/// typed `Number`, everything else `String`.
pub fn to_spreadsheet(projection: &Projection) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 1);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", None, None)))?;
    writer
        .create_element("Workbook")
        .with_attribute(("xmlns", SPREADSHEET_NS))
        .with_attribute(("xmlns:ss", SPREADSHEET_NS))
        .write_inner_content(|w| {
            w.create_element("Worksheet")
                .with_attribute(("ss:Name", "Sheet1"))
                .write_inner_content(|w| {
                    w.create_element("Table")
                        .write_inner_content(|w| write_sheet_rows(w, projection))?;
                    Ok::<_, quick_xml::Error>(())
                })?;
            Ok::<_, quick_xml::Error>(())
        })?;
    Ok(String::from_utf8(writer.into_inner())?)
}

const SPREADSHEET_NS: &str = "urn:schemas-microsoft-com:office:spreadsheet";

fn write_sheet_rows(w: &mut Writer<Vec<u8>>, projection: &Projection) -> quick_xml::Result<()> {
    w.create_element("Row").write_inner_content(|w| {
        for column in projection.columns() {
            write_sheet_cell(w, "String", &column.label)?;
        }
        Ok::<_, quick_xml::Error>(())
    })?;
    for row in projection.rows() {
        w.create_element("Row").write_inner_content(|w| {
            for cell in row {
                let ty = if cell.is_finite_number() { "Number" } else { "String" };
                write_sheet_cell(w, ty, &cell.as_text())?;
            }
            Ok::<_, quick_xml::Error>(())
        })?;
    }
    Ok(())
}

fn write_sheet_cell(w: &mut Writer<Vec<u8>>, ty: &str, text: &str) -> quick_xml::Result<()> {
    w.create_element("Cell").write_inner_content(|w| {
        w.create_element("Data")
            .with_attribute(("ss:Type", ty))
            .write_text_content(BytesText::new(text))?;
        Ok::<_, quick_xml::Error>(())
    })?;
    Ok(())
}

/// Standalone printable HTML page with the projection's title and table.
pub fn to_html(projection: &Projection) -> Result<String> {
    let mut env = Environment::new();
    env.add_template(templates::EXPORT_NAME, templates::EXPORT)?;
    let template = env.get_template(templates::EXPORT_NAME)?;
    Ok(template.render(context! {
        title => projection.title(),
        headers => header_labels(projection),
        rows => text_rows(projection),
    })?)
}

pub(crate) fn header_labels(projection: &Projection) -> Vec<&str> {
    projection.columns().iter().map(|c| c.label.as_str()).collect()
}

pub(crate) fn text_rows(projection: &Projection) -> Vec<Vec<String>> {
    projection
        .rows()
        .iter()
        .map(|row| row.iter().map(|c| c.as_text().into_owned()).collect())
        .collect()
}

/// Makes a column key usable as an element name: every character outside
/// `[A-Za-z0-9]` becomes `_`, and a leading digit gets a `_` prefix.
pub fn sanitize_xml_name(key: &str) -> String {
    let mut name: String = key
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}

struct LabeledRecord<'a> {
    projection: &'a Projection,
    cells: &'a [Cell],
}

impl Serialize for LabeledRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let columns = self.projection.columns();
        let mut map = serializer.serialize_map(Some(columns.len()))?;
        for (column, cell) in columns.iter().zip(self.cells) {
            map.serialize_entry(&column.label, &cell.to_json())?;
        }
        map.end()
    }
}

#[derive(serde::Serialize)]
struct XmlDocument<'a> {
    record: Vec<XmlRecord<'a>>,
}

struct XmlRecord<'a> {
    keys: &'a [String],
    cells: &'a [Cell],
}

impl Serialize for XmlRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.keys.len()))?;
        for (key, cell) in self.keys.iter().zip(self.cells) {
            map.serialize_entry(key, cell.as_text().as_ref())?;
        }
        map.end()
    }
}
