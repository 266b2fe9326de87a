use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = bounce::cli::Cli::parse();
    if let Err(e) = bounce::cmd::dispatch(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
