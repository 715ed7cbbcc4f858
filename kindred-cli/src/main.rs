use clap::Parser;
use kindred_cli::cli::Cli;
use kindred_cli::error::exit_with_error;
use kindred_cli::pipeline;

fn init_tracing(cli: &Cli) {
    // CLI tracing policy:
    //   --quiet  → always "off"
    //   --verbose → "info" for kindred crates, honouring RUST_LOG if set
    //   default  → "off" (clean terminal)
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("off")
    } else if cli.verbose {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    } else {
        tracing_subscriber::EnvFilter::new("off")
    };

    let ansi = !(cli.no_color || std::env::var_os("NO_COLOR").is_some());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(ansi)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();

    if cli.no_color || std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }

    init_tracing(&cli);

    if let Err(e) = pipeline::run(&cli) {
        exit_with_error(e);
    }
}
