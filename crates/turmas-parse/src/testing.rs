//! In-memory PDF fixtures for unit tests.

use lopdf::{Object, Stream, dictionary};

/// Escape text as a PDF literal string; Latin-1 characters become octal
/// escapes, which WinAnsi maps back to the same characters.
pub(crate) fn pdf_literal(text: &str) -> String {
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

/// Build a PDF with one content stream per page.
pub(crate) fn build_pdf(contents: &[String]) -> Vec<u8> {
    let mut doc = lopdf::Document::with_version("1.5");

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for content in contents {
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

/// Pages of plain text lines, 20pt apart from the top.
pub(crate) fn text_pdf(pages: &[&[&str]]) -> Vec<u8> {
    let contents: Vec<String> = pages
        .iter()
        .map(|lines| {
            let mut content = String::from("BT /F1 10 Tf 50 750 Td\n");
            for (i, line) in lines.iter().enumerate() {
                if i > 0 {
                    content.push_str("0 -20 Td\n");
                }
                content.push_str(&format!("{} Tj\n", pdf_literal(line)));
            }
            content.push_str("ET");
            content
        })
        .collect();
    build_pdf(&contents)
}

/// One page with a ruled grid, 150pt columns and 20pt rows from y=700.
pub(crate) fn grid_pdf(rows: &[Vec<&str>]) -> Vec<u8> {
    let ncols = rows.iter().map(Vec::len).max().unwrap_or(0);
    let (left, top, col_w, row_h) = (50.0, 700.0, 150.0, 20.0);
    let right = left + col_w * ncols as f64;
    let bottom = top - row_h * rows.len() as f64;

    let mut content = String::from("1 w\n");
    for i in 0..=rows.len() {
        let y = top - row_h * i as f64;
        content.push_str(&format!("{left} {y} m {right} {y} l S\n"));
    }
    for j in 0..=ncols {
        let x = left + col_w * j as f64;
        content.push_str(&format!("{x} {top} m {x} {bottom} l S\n"));
    }
    for (i, row) in rows.iter().enumerate() {
        for (j, cell) in row.iter().enumerate() {
            if cell.is_empty() {
                continue;
            }
            let x = left + col_w * j as f64 + 5.0;
            let y = top - row_h * i as f64 - 15.0;
            content.push_str(&format!("BT /F1 10 Tf {x} {y} Td {} Tj ET\n", pdf_literal(cell)));
        }
    }
    build_pdf(&[content])
}

#[test]
fn test_pdf_literal_escapes() {
    assert_eq!(pdf_literal("a(b)"), "(a\\(b\\))");
    assert_eq!(pdf_literal("1ºIV"), "(1\\272IV)");
}
