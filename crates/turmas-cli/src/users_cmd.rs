use turmas::emit;
use turmas::{PhoneFormat, RecordFilter, Settings};

use crate::cli::SourceArgs;
use crate::shared::{open_report, output_path, rendered, write};

pub fn run(args: &SourceArgs, settings: &Settings) -> Result<(), i32> {
    let report = open_report(args, settings)?;
    let phones = PhoneFormat::Dial {
        country_code: settings.country_code.clone(),
    };
    let roster = report.roster(RecordFilter::Lenient, &phones);

    let accounts = emit::user_accounts(&roster, settings);
    let counts = roster.class_counts();
    let users = rendered(emit::users_json(&accounts))?;
    let stats = rendered(emit::stats_json(&counts))?;

    let out = output_path(args, &report, "json", settings)?;
    let stats_out = emit::stats_path(&out);
    write(&out, &users)?;
    write(&stats_out, &stats)?;

    println!("Contas geradas: {} em {} turmas", accounts.len(), counts.len());
    println!("Arquivo de usuários gerado: {}", out.display());
    println!("Estatísticas por turma: {}", stats_out.display());
    Ok(())
}
