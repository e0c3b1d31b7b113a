mod cli;
mod csv_cmd;
mod json_cmd;
mod settings;
mod shared;
mod users_cmd;

use clap::Parser;
use cli::Cli;

fn main() {
    let cli = Cli::parse();
    settings::init_tracing(cli.verbose);

    let result = settings::load(cli.config.as_deref()).and_then(|settings| match cli.command {
        cli::Commands::Json {
            ref source,
            schema,
            ref school,
            print,
        } => json_cmd::run(source, schema, school.as_deref(), print, &settings),
        cli::Commands::Users { ref source } => users_cmd::run(source, &settings),
        cli::Commands::Csv { ref source } => csv_cmd::run(source, &settings),
    });

    if let Err(code) = result {
        std::process::exit(code);
    }
}
