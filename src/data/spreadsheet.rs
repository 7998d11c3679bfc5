//! Spreadsheet Engine
//! Reads the first worksheet with calamine and writes `.xlsx` workbooks
//! directly as ZIP/XML parts.

use crate::data::exporter::ExportError;
use crate::data::loader::LoadError;
use crate::data::table::{unique_names, Cell, Column, ColumnKind, Table};
use calamine::{open_workbook_auto, Data, DataType, Reader};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use zip::write::FileOptions;
use zip::ZipWriter;

/// Read the first sheet; the first row is the header.
pub fn read_first_sheet(path: &Path) -> Result<Table, LoadError> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| LoadError::SpreadsheetError(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoadError::SpreadsheetError("workbook has no sheets".to_string()))?
        .map_err(|e| LoadError::SpreadsheetError(e.to_string()))?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Err(LoadError::NoData);
    };
    let header: Vec<String> = header_row
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let name = cell.to_string();
            if name.trim().is_empty() {
                format!("column_{}", idx + 1)
            } else {
                name
            }
        })
        .collect();
    let header = unique_names(&header);

    let mut cells: Vec<Vec<Cell>> = vec![Vec::new(); header.len()];
    for row in rows {
        for (idx, column) in cells.iter_mut().enumerate() {
            column.push(row.get(idx).map(sheet_cell).unwrap_or(Cell::Missing));
        }
    }

    let columns = header
        .into_iter()
        .zip(cells)
        .map(|(name, cells)| {
            let column = Column::new(name, cells);
            if column.kind() == ColumnKind::Text {
                // Numbers stored as text still count as numbers.
                Column::infer_from_text(column.name().to_string(), column.into_cells())
            } else {
                column
            }
        })
        .collect();
    Ok(Table::new(columns)?)
}

fn sheet_cell(data: &Data) -> Cell {
    match data {
        Data::Int(v) => Cell::Number(*v as f64),
        Data::Float(v) if v.is_finite() => Cell::Number(*v),
        Data::Float(_) | Data::Empty | Data::Error(_) => Cell::Missing,
        Data::String(s) => Cell::from_raw(Some(s.as_str())),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(_) | Data::DateTimeIso(_) => {
            data.as_date().map(Cell::Date).unwrap_or(Cell::Missing)
        }
        #[allow(unreachable_patterns)]
        other => Cell::from_raw(Some(other.to_string().as_str())),
    }
}

/// Write a single-sheet workbook. Dates are stored as ISO text.
pub fn write_workbook(table: &Table, path: &Path) -> Result<(), ExportError> {
    let file = File::create(path)?;
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default();

    let parts: [(&str, String); 6] = [
        ("[Content_Types].xml", content_types_xml()),
        ("_rels/.rels", rels_xml()),
        ("xl/workbook.xml", workbook_xml()),
        ("xl/_rels/workbook.xml.rels", workbook_rels_xml()),
        ("xl/styles.xml", styles_xml()),
        ("xl/worksheets/sheet1.xml", sheet_xml(table)),
    ];
    for (name, body) in parts {
        zip.start_file(name, options).map_err(zip_error)?;
        zip.write_all(body.as_bytes())?;
    }

    zip.finish().map_err(zip_error)?;
    Ok(())
}

fn zip_error(e: zip::result::ZipError) -> ExportError {
    ExportError::SpreadsheetError(e.to_string())
}

/// Spreadsheet column letter for a zero-based index (0 → A, 26 → AA).
pub fn column_letter(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.iter().rev().map(|&b| b as char).collect()
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn inline_string(reference: &str, text: &str) -> String {
    format!(
        r#"<c r="{}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
        reference,
        escape_xml(text)
    )
}

fn sheet_xml(table: &Table) -> String {
    let mut rows = String::new();

    // Header row
    rows.push_str(r#"<row r="1">"#);
    for (idx, name) in table.column_names().iter().enumerate() {
        rows.push_str(&inline_string(&format!("{}1", column_letter(idx)), name));
    }
    rows.push_str("</row>");

    for row in 0..table.height() {
        let row_num = row + 2;
        rows.push_str(&format!(r#"<row r="{}">"#, row_num));
        for (idx, col) in table.columns().iter().enumerate() {
            let reference = format!("{}{}", column_letter(idx), row_num);
            match &col.cells()[row] {
                Cell::Missing => {}
                Cell::Number(v) => {
                    rows.push_str(&format!(r#"<c r="{}"><v>{}</v></c>"#, reference, v))
                }
                other => rows.push_str(&inline_string(&reference, &other.to_string())),
            }
        }
        rows.push_str("</row>");
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
        rows
    )
}

fn content_types_xml() -> String {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>
</Types>"#
        .to_string()
}

fn rels_xml() -> String {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#
        .to_string()
}

fn workbook_xml() -> String {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets><sheet name="Sheet1" sheetId="1" r:id="rId1"/></sheets>
</workbook>"#
        .to_string()
}

fn workbook_rels_xml() -> String {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#
        .to_string()
}

fn styles_xml() -> String {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts>
<fills count="1"><fill><patternFill patternType="none"/></fill></fills>
<borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders>
<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>
<cellXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/></cellXfs>
</styleSheet>"#
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::DataLoader;

    #[test]
    fn test_column_letters() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(27), "AB");
        assert_eq!(column_letter(701), "ZZ");
        assert_eq!(column_letter(702), "AAA");
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape_xml("a<b & 'c'"), "a&lt;b &amp; &apos;c&apos;");
    }

    #[test]
    fn test_workbook_roundtrip() {
        let table = DataLoader::load_csv_bytes(
            b"name,amount,when\nAnn & Co,12.5,2024-01-05\nBob,,2024-01-06\n",
        )
        .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cleaned.xlsx");
        write_workbook(&table, &path).unwrap();

        let reloaded = DataLoader::load_path(&path).unwrap();
        assert_eq!(reloaded.column_names(), vec!["name", "amount", "when"]);
        assert_eq!(reloaded.height(), 2);
        assert_eq!(reloaded.cell(0, "name"), Some(&Cell::Text("Ann & Co".into())));
        assert_eq!(reloaded.cell(0, "amount"), Some(&Cell::Number(12.5)));
        assert!(reloaded.cell(1, "amount").unwrap().is_missing());
    }
}
