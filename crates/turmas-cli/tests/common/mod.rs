//! Fixture reports and command helpers for the CLI tests.

#![allow(dead_code)]

use std::path::Path;

use assert_cmd::Command;
use lopdf::{Object, Stream, dictionary};

/// Run the binary inside `dir` so no stray `turmas.toml` is picked up.
pub fn cmd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("turmas").unwrap();
    cmd.current_dir(dir)
        .env_remove("PDF_FILE_PATH")
        .env_remove("RUST_LOG");
    cmd
}

fn literal(text: &str) -> String {
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

fn text_at(x: f64, y: f64, text: &str) -> String {
    format!("BT /F1 10 Tf 1 0 0 1 {x} {y} Tm {} Tj ET\n", literal(text))
}

const COLUMNS: [f64; 7] = [50.0, 110.0, 250.0, 320.0, 350.0, 400.0, 540.0];

const ROWS: [[&str; 6]; 7] = [
    ["ID", "Nome", "Nascimento", "Sexo", "Idade", "Telefones"],
    ["1001", "ANA LIMA", "01/02/2010", "F", "14 anos", "(27) 99999-0001"],
    ["1002", "BRUNO SOUZA", "02/03/2010", "M", "14 anos", "(27) 3333-0002"],
    ["1003", "CAIO ROCHA", "", "M", "15 anos", ""],
    ["1004", "DANIELA COSTA", "04/05/2010", "F", "14 anos", "(27) 99999-0004"],
    ["1005", "ANA LIMA", "05/06/2009", "F", "15 anos", "(27) 99999-0005"],
    ["1006", "FABIO NUNES", "06/07/2010", "M", "14 anos", "(27) 99999-0006"],
];

/// One ruled class table of six students under a report header.
///
/// `CAIO ROCHA` has no birth date and `ANA LIMA` appears twice.
pub fn report_pdf() -> Vec<u8> {
    let mut content = String::new();
    content.push_str(&text_at(50.0, 760.0, "SECRETARIA DE ESTADO DA EDUCACAO"));
    content.push_str(&text_at(50.0, 745.0, "EEEFM JOAO CRISOSTOMO BELESA"));
    content.push_str(&text_at(50.0, 700.0, "Turma: 2ºMA01-EM"));

    let top = 680.0;
    let bottom = top - 20.0 * ROWS.len() as f64;
    content.push_str("1 w\n");
    for i in 0..=ROWS.len() {
        let y = top - 20.0 * i as f64;
        content.push_str(&format!("50 {y} m 540 {y} l S\n"));
    }
    for x in COLUMNS {
        content.push_str(&format!("{x} {top} m {x} {bottom} l S\n"));
    }
    for (i, row) in ROWS.iter().enumerate() {
        let y = top - 20.0 * i as f64 - 15.0;
        for (j, cell) in row.iter().enumerate() {
            if !cell.is_empty() {
                content.push_str(&text_at(COLUMNS[j] + 5.0, y, cell));
            }
        }
    }
    single_page(&content)
}

/// A page of prose without any table.
pub fn prose_pdf() -> Vec<u8> {
    single_page(&text_at(72.0, 720.0, "Hello World"))
}

fn single_page(content: &str) -> Vec<u8> {
    let mut doc = lopdf::Document::with_version("1.5");

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.as_bytes().to_vec()));

    let media_box = vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Integer(612),
        Object::Integer(792),
    ];
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "MediaBox" => media_box,
        "Contents" => Object::Reference(content_id),
        "Resources" => dictionary! {
            "Font" => dictionary! {
                "F1" => Object::Reference(font_id),
            },
        },
    });
    let pages_id = doc.add_object(dictionary! {
        "Type" => "Pages",
        "Kids" => vec![Object::Reference(page_id)],
        "Count" => Object::Integer(1),
    });
    if let Ok(page_obj) = doc.get_object_mut(page_id) {
        if let Ok(dict) = page_obj.as_dict_mut() {
            dict.set("Parent", Object::Reference(pages_id));
        }
    }
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}
