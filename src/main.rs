use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{publish, report};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "satops")]
#[command(version = VERSION)]
#[command(about = "Satellite content view publishing and host patch report automation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish content views and promote composite views
    Publish(publish::PublishArgs),
    /// Email the host patch status report
    Report(report::ReportArgs),
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    match cli.command {
        // --no-mail prints the raw table, not the JSON envelope.
        Commands::Report(args) if report::is_text(&args) => match report::run_text(args) {
            Ok((content, exit_code)) => {
                print!("{}", content);
                std::process::ExitCode::from(exit_code_to_u8(exit_code))
            }
            Err(err) => {
                let exit_code = output::exit_code_for_error(err.code);
                let _ = output::print_result::<serde_json::Value>(Err(err));
                std::process::ExitCode::from(exit_code_to_u8(exit_code))
            }
        },
        Commands::Publish(args) => finish(output::map_cmd_result_to_json(publish::run(args))),
        Commands::Report(args) => finish(output::map_cmd_result_to_json(report::run(args))),
    }
}

fn finish((result, exit_code): (satops::Result<serde_json::Value>, i32)) -> std::process::ExitCode {
    let _ = output::print_json_result(result);
    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
