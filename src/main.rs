use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use config::Config;
use gitignore::GitignoreSeeder;
use provision::Provisioner;

mod clone;
mod config;
mod error;
mod gitignore;
mod provision;
mod templates;
#[cfg(test)]
mod test_support;

/// Create a GitHub repository from a config file, clone it and add a .gitignore.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to config file
    #[arg(short, long, default_value = "github_config.yml")]
    config: PathBuf,

    /// Directory to clone repo into (default: same as repo name)
    #[arg(short, long)]
    directory: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let args = Args::parse();
    init_logging(args.verbose);

    let location = run(&args, std::env::var(config::TOKEN_ENV).ok())?;

    println!("\nRepository setup completed successfully!");
    println!("You can now work with your repo at: {}", location.display());

    Ok(())
}

/// Creates, clones and seeds the repository. Returns where it was cloned to.
///
/// Errors returned here end the run; a failed `.gitignore` step is only logged.
fn run(args: &Args, env_token: Option<String>) -> Result<PathBuf> {
    let config = Config::load(&args.config, env_token)?;
    if args.verbose {
        println!("Configuration loaded:");
        print!("{}", config);
    }

    let client = provision::http_client()?;
    let created = Provisioner::new(client.clone(), &config).create_repository(&config)?;

    let target = clone::target_directory(&created.clone_url, args.directory.as_deref())?;
    let repo = clone::clone_repository(&created.clone_url, &target, Some(config.token()))?;

    match &config.gitignore_type {
        Some(kind) => {
            let seeder = GitignoreSeeder::new(client, config.gitignore_url());
            match seeder.seed(&repo, kind, Some(config.token())) {
                Ok(source) => log::debug!("Seeded .gitignore from {:?} template", source),
                Err(e) => log::error!("{:#}", anyhow::Error::from(e)),
            }
        }
        None => log::debug!("No gitignore_type configured, skipping .gitignore"),
    }

    Ok(std::fs::canonicalize(&target).unwrap_or(target))
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        concat!("info,", env!("CARGO_CRATE_NAME"), "=debug")
    } else {
        "info"
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();
}
