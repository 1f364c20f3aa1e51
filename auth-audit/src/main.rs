//! Auth Audit - checks which users exist in a Supabase project's auth database.

use std::env;
use std::process;

use auth_audit::audit::{self, render_config_error, EXIT_CONFIG_ERROR};
use auth_audit::config::select_watch_list;
use auth_audit::{logging, Settings};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_version() {
    println!("auth-audit {}", VERSION);
}

fn print_usage() {
    println!("Usage: auth-audit [--version] [EMAIL ...]");
    println!();
    println!("Lists Supabase auth users and reports whether each EMAIL exists.");
    println!("Reads SUPABASE_URL (or NEXT_PUBLIC_SUPABASE_URL) and SUPABASE_SERVICE_ROLE_KEY.");
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Handle --version / -V / --help
    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|a| a == "--version" || a == "-V") {
        print_version();
        return Ok(());
    }
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            print!("{}", render_config_error(&e));
            process::exit(EXIT_CONFIG_ERROR);
        }
    };

    logging::init(&settings.log_level);

    let watch_emails = select_watch_list(args, &settings);

    println!("🔍 Checking Supabase auth users...");
    match audit::run_with_lookup(|name| env::var(name).ok(), &settings, &watch_emails).await {
        Ok(run) => print!("{}", run.render()),
        Err(e) => {
            tracing::debug!("{}", e);
            print!("{}", render_config_error(&e));
            process::exit(EXIT_CONFIG_ERROR);
        }
    }

    Ok(())
}
