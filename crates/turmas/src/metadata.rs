//! Document metadata: school name, issue timestamp and source file name.

use std::path::Path;

use chrono::{DateTime, Datelike, TimeZone, Timelike, Weekday};

/// School name used when the header has none.
pub const UNIDENTIFIED_SCHOOL: &str = "Escola Não Identificada";

const HEADER_ANCHOR: &str = "SECRETARIA DE ESTADO DA EDUCACAO";
const SCHOOL_PREFIXES: [&str; 3] = ["EEEFM", "EEEM", "ESCOLA"];

/// Find the school name in the report header.
///
/// Looks at the four lines after the state education office line for one
/// that starts with a school prefix and is not an address (`RUA`) or a
/// regional office (`SRE`) line.
pub fn school_name_from_header(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    for (i, line) in lines.iter().enumerate() {
        if !line.contains(HEADER_ANCHOR) {
            continue;
        }
        for candidate in lines.iter().skip(i + 1).take(4) {
            let candidate = candidate.trim();
            if SCHOOL_PREFIXES.iter().any(|p| candidate.starts_with(p))
                && !candidate.contains("RUA")
                && !candidate.contains("SRE")
            {
                return candidate.replace('"', "").trim().to_string();
            }
        }
    }
    UNIDENTIFIED_SCHOOL.to_string()
}

fn weekday_pt(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Seg",
        Weekday::Tue => "Ter",
        Weekday::Wed => "Qua",
        Weekday::Thu => "Qui",
        Weekday::Fri => "Sex",
        Weekday::Sat => "Sáb",
        Weekday::Sun => "Dom",
    }
}

fn month_pt(month: u32) -> &'static str {
    const MONTHS: [&str; 12] = [
        "Janeiro", "Fevereiro", "Março", "Abril", "Maio", "Junho", "Julho", "Agosto", "Setembro",
        "Outubro", "Novembro", "Dezembro",
    ];
    MONTHS[(month as usize).saturating_sub(1) % 12]
}

/// Portuguese long timestamp: `Sex, 16 de Maio de 2025, 14:30`.
pub fn format_issued_at<Tz: TimeZone>(at: &DateTime<Tz>) -> String {
    format!(
        "{}, {:02} de {} de {}, {:02}:{:02}",
        weekday_pt(at.weekday()),
        at.day(),
        month_pt(at.month()),
        at.year(),
        at.hour(),
        at.minute()
    )
}

/// File name reported as the document's origin.
///
/// A CSV source is itself a dump of the PDF report, so its extension is
/// swapped back to `.PDF`.
pub fn source_file_name(path: &Path) -> String {
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    let reported = if is_csv {
        path.with_extension("PDF")
    } else {
        path.to_path_buf()
    };
    reported
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};

    use super::*;

    const HEADER: &str = "GOVERNO DO ESTADO DO ESPIRITO SANTO\n\
SECRETARIA DE ESTADO DA EDUCACAO\n\
SRE CARAPINA\n\
\"EEEFM JOAO CRISOSTOMO BELESA\"\n\
RUA DAS FLORES, 10\n";

    #[test]
    fn test_school_name_after_anchor() {
        assert_eq!(school_name_from_header(HEADER), "EEEFM JOAO CRISOSTOMO BELESA");
    }

    #[test]
    fn test_school_name_skips_address_lines() {
        let text = "SECRETARIA DE ESTADO DA EDUCACAO\nESCOLA RUA LARGA\nEEEM CENTRAL";
        assert_eq!(school_name_from_header(text), "EEEM CENTRAL");
    }

    #[test]
    fn test_school_name_only_within_four_lines() {
        let text = "SECRETARIA DE ESTADO DA EDUCACAO\na\nb\nc\nd\nEEEM LONGE";
        assert_eq!(school_name_from_header(text), UNIDENTIFIED_SCHOOL);
    }

    #[test]
    fn test_school_name_without_anchor() {
        assert_eq!(school_name_from_header("EEEFM SOLTA"), UNIDENTIFIED_SCHOOL);
    }

    #[test]
    fn test_issued_at_in_portuguese() {
        let at = NaiveDate::from_ymd_opt(2025, 5, 16)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap()
            .and_utc();
        assert_eq!(format_issued_at(&at), "Sex, 16 de Maio de 2025, 14:30");
    }

    #[test]
    fn test_issued_at_pads_day_and_time() {
        let at = Utc.with_ymd_and_hms(2024, 3, 3, 9, 5, 0).unwrap();
        assert_eq!(format_issued_at(&at), "Dom, 03 de Março de 2024, 09:05");
    }

    #[test]
    fn test_source_file_name_swaps_csv_extension() {
        assert_eq!(source_file_name(Path::new("/data/alunos.csv")), "alunos.PDF");
        assert_eq!(source_file_name(Path::new("/data/Alunos.pdf")), "Alunos.pdf");
    }
}
