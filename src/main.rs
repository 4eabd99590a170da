use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use clap::Parser;

use stakeholder_venn::config::{AppState, Config};
use stakeholder_venn::diagram::load_fonts;
use stakeholder_venn::logger;
use stakeholder_venn::server::{
    create_reusable_listener, start_server_loop, start_signal_handler, SignalHandler,
};

/// Stakeholder salience diagram service
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file, with or without the `.toml` extension
    #[arg(short, long, default_value = "config")]
    config: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let cfg = Config::load_from(&args.config)?;
    cfg.validate()?;

    logger::init(&cfg)?;

    // Worker count from config, CPU cores otherwise
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = create_reusable_listener(addr)?;

    let fonts = Arc::new(load_fonts(cfg.render.font_dirs.as_slice()));
    if fonts.is_empty() {
        logger::log_warning("No fonts found, diagram text will not be rendered");
    }
    logger::log_server_start(&addr, &cfg, fonts.len());

    let state = Arc::new(AppState::new(cfg, fonts));
    let active_connections = Arc::new(AtomicUsize::new(0));

    let signals = Arc::new(SignalHandler::new());
    start_signal_handler(Arc::clone(&signals));

    start_server_loop(
        listener,
        state,
        active_connections,
        Arc::clone(&signals.shutdown),
    )
    .await;

    Ok(())
}
