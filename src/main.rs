use std::env;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let raw_args: Vec<String> = env::args().collect();
    match raw_args.get(1).map(|s| s.as_str()) {
        Some("serve") => {
            let port = raw_args
                .get(2)
                .and_then(|s| s.parse::<u16>().ok())
                .unwrap_or(8080);
            if let Err(e) = seasonal_budget::api::run_http_server(port).await {
                tracing::error!("server error: {e}");
                std::process::exit(1);
            }
        }
        Some("run") => {
            let args = std::iter::once(raw_args[0].clone()).chain(raw_args[2..].iter().cloned());
            match seasonal_budget::api::run_cli(args) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("{e}");
                    std::process::exit(2);
                }
            }
        }
        _ => {
            eprintln!("Usage: seasonal-budget serve [port] | seasonal-budget run [--help]");
            std::process::exit(1);
        }
    }
}
