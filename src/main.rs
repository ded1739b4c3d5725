use monetary::{audit, config::Config};

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let report = match audit::run(&config) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Audit failed: {}", e);
            std::process::exit(1);
        }
    };

    print!("{}", report);

    if !report.rejected.is_empty() {
        std::process::exit(2);
    }
}
