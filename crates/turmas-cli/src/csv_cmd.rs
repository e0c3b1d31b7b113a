use turmas::Settings;
use turmas::emit;

use crate::cli::SourceArgs;
use crate::shared::{open_report, output_path, rendered, write};

pub fn run(args: &SourceArgs, settings: &Settings) -> Result<(), i32> {
    let report = open_report(args, settings)?;
    let rows = report.labeled_rows();
    let bytes = rendered(emit::raw_csv(&rows))?;

    let out = output_path(args, &report, "csv", settings)?;
    write(&out, &bytes)?;

    println!("Linhas exportadas: {}", rows.len());
    println!("Arquivo CSV gerado: {}", out.display());
    Ok(())
}
