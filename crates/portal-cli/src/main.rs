use anyhow::Context;
use clap::Parser;
use portal_link::{
    resolve_file, validate, Convergence, Lockfile, Manifest, LOCKFILE_NAME, MANIFEST_NAME,
};
use portal_mesh::{Announcement, MeshConfig, PeerNode};

#[derive(Parser)]
#[command(
    name = "workspace-portal",
    version,
    about = "Symlink this package's outputs into every sibling that depends on it"
)]
struct Cli {
    /// Output paths, relative to the package root, to link into dependents.
    link: Vec<String>,

    /// More log output (-v debug, -vv trace). Ignored when RUST_LOG is set.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| level.into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cwd = std::env::current_dir().context("reading current directory")?;

    let lockfile = Lockfile::load(&resolve_file(LOCKFILE_NAME, &cwd)?)?;
    let manifest = Manifest::load(&resolve_file(MANIFEST_NAME, &cwd)?)?;

    let local = Announcement::new(manifest.name(), manifest.root(), cli.link);
    validate(&local).context("invalid local announcement")?;

    let config = MeshConfig::new();
    tracing::info!(
        "{} at {:?} ({} entries in {:?}), mesh on {}",
        local.name,
        local.root,
        lockfile.entries().len(),
        lockfile.dir(),
        config.addr()
    );

    let node = PeerNode::new(config, local)?;
    tokio::select! {
        _ = node.run(Convergence::new(lockfile)) => {}
        result = tokio::signal::ctrl_c() => {
            result.context("waiting for Ctrl+C")?;
            tracing::info!("shutting down");
        }
    }
    Ok(())
}
