use std::io::Write;

use turmas::emit;
use turmas::{PhoneFormat, RecordFilter, Settings};

use crate::cli::{Schema, SourceArgs};
use crate::shared::{fail, open_report, output_path, rendered, write};

pub fn run(
    args: &SourceArgs,
    schema: Schema,
    school: Option<&str>,
    print: bool,
    settings: &Settings,
) -> Result<(), i32> {
    let report = open_report(args, settings)?;

    let filter = match schema {
        Schema::Grouped => RecordFilter::Lenient,
        Schema::Nested => RecordFilter::Strict,
    };
    let roster = report.roster(filter, &PhoneFormat::Display);

    let settings = Settings {
        school_name: school.map(str::to_string).or_else(|| settings.school_name.clone()),
        ..settings.clone()
    };
    let metadata = report.metadata(&settings, &chrono::Local::now());

    let bytes = match schema {
        Schema::Grouped => rendered(emit::grouped_json(&metadata, &roster))?,
        Schema::Nested => rendered(emit::nested_json(&metadata, &roster))?,
    };

    let out = output_path(args, &report, "json", &settings)?;
    write(&out, &bytes)?;

    if print {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(&bytes).map_err(|e| fail(&e))?;
    }

    println!("Escola: {}", metadata.school_name);
    for (class, count) in roster.class_counts() {
        println!("  {class}: {count} alunos");
    }
    println!(
        "Total: {} alunos em {} turmas",
        roster.len(),
        roster.classes().len()
    );
    println!("Arquivo JSON gerado: {}", out.display());
    Ok(())
}
