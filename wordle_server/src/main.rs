//! Wordle session server over plain TCP.
//!
//! The server authenticates players against an external account store,
//! then serves each connection from its own thread, relaying dictionary
//! lookups and history writes to the backing services.

use std::net::SocketAddr;

use anyhow::Error;
use ctrlc::set_handler;
use log::info;
use pico_args::Arguments;
use wordle::server::{self, ServerConfig};

const HELP: &str = "\
Run a wordle session server

USAGE:
  wordle_server [OPTIONS]

OPTIONS:
  --bind        IP:PORT    Server socket bind address  [default: env WORDLE_BIND or 127.0.0.1:12347]
  --accounts    IP:PORT    Account store address       [default: env ACCOUNTS_ADDR or 127.0.0.1:12345]
  --dictionary  IP:PORT    Dictionary service address  [default: env DICTIONARY_ADDR or 127.0.0.1:12122]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  WORDLE_BIND              Server bind address (e.g., 0.0.0.0:12347)
  ACCOUNTS_ADDR            Account store address
  DICTIONARY_ADDR          Dictionary service address
  RUST_LOG                 Log level filter (e.g., info, debug)
";

struct Args {
    bind: SocketAddr,
    accounts: SocketAddr,
    dictionary: SocketAddr,
}

fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        bind: pargs.value_from_str("--bind").unwrap_or_else(|_| {
            std::env::var("WORDLE_BIND")
                .unwrap_or_else(|_| "127.0.0.1:12347".to_string())
                .parse()
                .expect("Invalid WORDLE_BIND address")
        }),
        accounts: pargs.value_from_str("--accounts").unwrap_or_else(|_| {
            std::env::var("ACCOUNTS_ADDR")
                .unwrap_or_else(|_| "127.0.0.1:12345".to_string())
                .parse()
                .expect("Invalid ACCOUNTS_ADDR address")
        }),
        dictionary: pargs.value_from_str("--dictionary").unwrap_or_else(|_| {
            std::env::var("DICTIONARY_ADDR")
                .unwrap_or_else(|_| "127.0.0.1:12122".to_string())
                .parse()
                .expect("Invalid DICTIONARY_ADDR address")
        }),
    };

    // Catching signals for exit.
    set_handler(|| std::process::exit(0))?;

    env_logger::builder().format_target(false).init();
    info!("Starting wordle server at {}", args.bind);
    info!("Using account store at {}", args.accounts);
    info!("Using dictionary service at {}", args.dictionary);

    let config = ServerConfig::new(args.accounts, args.dictionary);
    server::run(args.bind, config)?;
    Ok(())
}
