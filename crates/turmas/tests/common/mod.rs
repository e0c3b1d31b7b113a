//! Synthetic enrollment reports shared by the integration tests.

#![allow(dead_code)]

use std::io::Write;

use lopdf::{Object, Stream, dictionary};

/// Left edges of the report columns: id, name, birth date, gender, age, phones.
pub const COLUMNS: [f64; 7] = [50.0, 110.0, 250.0, 320.0, 350.0, 400.0, 540.0];
pub const ROW_HEIGHT: f64 = 20.0;
pub const TABLE_TOP: f64 = 680.0;

pub type Row = [&'static str; 6];

pub const HEADER_ROW: Row = ["ID", "Nome", "Nascimento", "Sexo", "Idade", "Telefones"];

pub const STUDENTS: [Row; 6] = [
    ["1001", "ANA LIMA", "01/02/2010", "F", "14 anos", "(27) 99999-0001"],
    ["1002", "BRUNO SOUZA", "02/03/2010", "M", "14 anos", "(27) 3333-0002"],
    ["1003", "CAIO ROCHA", "03/04/2009", "M", "15 anos", ""],
    ["1004", "DANIELA COSTA", "04/05/2010", "F", "14 anos", "(27) 99999-0004"],
    ["1005", "ELISA PRADO", "05/06/2009", "F", "15 anos", "(27) 99999-0005"],
    ["1006", "FABIO NUNES", "06/07/2010", "M", "14 anos", "(27) 99999-0006"],
];

/// Escape text as a PDF literal string; Latin-1 characters become octal escapes.
pub fn pdf_literal(text: &str) -> String {
    let mut out = String::from("(");
    for ch in text.chars() {
        match ch {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            c if (c as u32) < 0x80 => out.push(c),
            c => out.push_str(&format!("\\{:03o}", (c as u32).min(0xFF))),
        }
    }
    out.push(')');
    out
}

/// Text drawn with its baseline at `(x, y)`.
pub fn text_at(x: f64, y: f64, text: &str) -> String {
    format!("BT /F1 10 Tf 1 0 0 1 {x} {y} Tm {} Tj ET\n", pdf_literal(text))
}

/// Report header followed by a class label line.
pub fn header(class: Option<&str>) -> String {
    let mut content = String::new();
    content.push_str(&text_at(50.0, 760.0, "SECRETARIA DE ESTADO DA EDUCACAO"));
    content.push_str(&text_at(50.0, 745.0, "SRE CARAPINA"));
    content.push_str(&text_at(50.0, 730.0, "EEEFM JOAO CRISOSTOMO BELESA"));
    if let Some(class) = class {
        content.push_str(&text_at(50.0, 700.0, &format!("Turma: {class}")));
    }
    content
}

fn cells(rows: &[Row], top: f64) -> String {
    let mut content = String::new();
    for (i, row) in rows.iter().enumerate() {
        let y = top - ROW_HEIGHT * i as f64 - 15.0;
        for (j, cell) in row.iter().enumerate() {
            if !cell.is_empty() {
                content.push_str(&text_at(COLUMNS[j] + 5.0, y, cell));
            }
        }
    }
    content
}

/// Rows drawn inside a ruled grid starting at `top`.
pub fn ruled_table(rows: &[Row], top: f64) -> String {
    let (left, right) = (COLUMNS[0], COLUMNS[COLUMNS.len() - 1]);
    let bottom = top - ROW_HEIGHT * rows.len() as f64;
    let mut content = String::from("1 w\n");
    for i in 0..=rows.len() {
        let y = top - ROW_HEIGHT * i as f64;
        content.push_str(&format!("{left} {y} m {right} {y} l S\n"));
    }
    for x in COLUMNS {
        content.push_str(&format!("{x} {top} m {x} {bottom} l S\n"));
    }
    content.push_str(&cells(rows, top));
    content
}

/// Rows aligned on the same columns, without any ruling.
pub fn aligned_text(rows: &[Row], top: f64) -> String {
    cells(rows, top)
}

/// Header row plus every student.
pub fn full_roster() -> Vec<Row> {
    std::iter::once(HEADER_ROW).chain(STUDENTS).collect()
}

/// Build a PDF with one content stream per page.
pub fn build_pdf(pages: &[String]) -> Vec<u8> {
    let mut doc = lopdf::Document::with_version("1.5");

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for content in pages {
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.as_bytes().to_vec()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ],
            "Contents" => Object::Reference(content_id),
            "Resources" => dictionary! {
                "Font" => dictionary! {
                    "F1" => Object::Reference(font_id),
                },
            },
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(count),
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// Write bytes to a named temp file with the given suffix.
pub fn temp_file(bytes: &[u8], suffix: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}
