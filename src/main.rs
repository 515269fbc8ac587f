use colored::Colorize;
use zscc_node_cleanup::{config, run, Credentials, RunConfig};

#[tokio::main]
async fn main() {
    // Do as little as possible in main.rs as it can't contain any tests
    if let Err(e) = log4rs::init_file("log4rs.yml", Default::default()) {
        eprintln!("Error initializing log4rs from log4rs.yml: {e}");
    }
    dotenv::dotenv().ok();
    log::info!("#Start main()");

    let code = match start().await {
        Ok(summary) => {
            println!("{} {summary}", "Done:".green());
            0
        }
        Err(e) => {
            log::error!("{e}");
            eprintln!("{} {e}", "ERROR".on_red());
            1
        }
    };
    // exit here, a timed out prompt can still hold a blocking stdin read
    std::process::exit(code);
}

async fn start() -> zscc_node_cleanup::Result<zscc_node_cleanup::processing::CleanupSummary> {
    config::load_access_file(None)?;
    let run_config = RunConfig::from_env()?;
    let credentials = Credentials::from_env()?;
    run(&run_config, &credentials).await
}
