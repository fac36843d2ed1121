//! wg-keys CLI — `wgkey` command.
//!
//! Generates WireGuard private, public, and preshared keys, and reads or
//! writes wg-quick configuration files built from them.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use log::debug;

use wg_keys::conf::{parse, render, DEFAULT_LISTEN_PORT};
use wg_keys::{
    generate_key_pair, generate_mesh, generate_pre_key, InterfaceSection, KeyPairResponse,
    MeshOptions, PeerSection, WireGuardConfig,
};

// ── CLI structure ─────────────────────────────────────────────────────────────

/// wg-keys CLI — generate and inspect WireGuard keys.
#[derive(Parser, Debug)]
#[command(
    name = "wgkey",
    about = "WireGuard key tool",
    version,
    long_about = "wgkey — WireGuard key tool\n\nGenerate private, public, and preshared keys in WireGuard's base64\nencoding, and create or inspect wg-quick configuration files."
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print a new private key
    Genkey,

    /// Print the public key for a private key (argument or stdin)
    Pubkey {
        /// Base64 private key; read from stdin when omitted
        key: Option<String>,
    },

    /// Print a new preshared key
    Genpsk,

    /// Print a private/public key pair
    Pair {
        /// Derive from this private key instead of generating one
        #[arg(long)]
        private: Option<String>,

        /// Print the raw JSON response
        #[arg(long)]
        json: bool,
    },

    /// Work with wg-quick configuration files
    Conf {
        #[command(subcommand)]
        subcommand: ConfCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ConfCommands {
    /// Parse and validate a config file, then summarize it
    Show {
        /// Path to the wg-quick file
        file: PathBuf,
    },

    /// Print a new config with a freshly generated private key
    New {
        /// Interface address(es), e.g. 10.0.0.2/32
        #[arg(long)]
        address: String,

        /// UDP listen port
        #[arg(long)]
        listen_port: Option<u16>,

        /// DNS server(s)
        #[arg(long)]
        dns: Option<String>,

        /// Interface MTU
        #[arg(long)]
        mtu: Option<u32>,

        /// Public key of the single peer
        #[arg(long, requires = "allowed_ips")]
        peer_public: Option<String>,

        /// Allowed IPs for the peer
        #[arg(long, requires = "peer_public")]
        allowed_ips: Option<String>,

        /// Peer endpoint, host:port
        #[arg(long, requires = "peer_public")]
        endpoint: Option<String>,

        /// Persistent keepalive interval in seconds
        #[arg(long, requires = "peer_public")]
        keepalive: Option<u16>,

        /// Generate a preshared key for the peer
        #[arg(long, requires = "peer_public")]
        psk: bool,
    },

    /// Generate a set of configs that peer with each other
    Mesh {
        /// Number of configs to generate
        #[arg(long, default_value_t = 2)]
        quantity: usize,

        /// Address(es) of the first node; each later node is stepped by one
        #[arg(long, default_value = "10.0.0.1/24")]
        address: String,

        /// Endpoints by node, comma separated; leave an entry empty for a
        /// node that is not reachable
        #[arg(long, value_delimiter = ',', required = true)]
        endpoint: Vec<String>,

        /// Port for endpoints given without one
        #[arg(long, default_value_t = DEFAULT_LISTEN_PORT)]
        listen_port: u16,

        /// Routes sent through reachable nodes by the other nodes
        #[arg(long, default_value = "0.0.0.0/0, ::/0")]
        allowed_ips: String,

        /// DNS server(s) for every node
        #[arg(long)]
        dns: Option<String>,

        /// Interface MTU for every node
        #[arg(long)]
        mtu: Option<u32>,

        /// Keepalive toward reachable nodes, 0 to disable
        #[arg(long, default_value_t = 25)]
        keepalive: u16,

        /// Write wg0.conf, wg1.conf, ... here instead of printing
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

// ── Main entry point ──────────────────────────────────────────────────────────

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let verbose = cli.verbose;

    let result = match cli.command {
        Commands::Genkey => cmd_genkey(),
        Commands::Pubkey { key } => cmd_pubkey(key),
        Commands::Genpsk => cmd_genpsk(),
        Commands::Pair { private, json } => cmd_pair(private.as_deref(), json),
        Commands::Conf { subcommand } => match subcommand {
            ConfCommands::Show { file } => cmd_conf_show(&file, verbose),
            ConfCommands::New {
                address,
                listen_port,
                dns,
                mtu,
                peer_public,
                allowed_ips,
                endpoint,
                keepalive,
                psk,
            } => cmd_conf_new(
                address,
                listen_port,
                dns,
                mtu,
                peer_public.zip(allowed_ips),
                endpoint,
                keepalive,
                psk,
                verbose,
            ),
            ConfCommands::Mesh {
                quantity,
                address,
                endpoint,
                listen_port,
                allowed_ips,
                dns,
                mtu,
                keepalive,
                out_dir,
            } => {
                let mut options = MeshOptions::new(quantity, address)
                    .with_endpoints(endpoint)
                    .with_allowed_ips(allowed_ips);
                options.listen_port = listen_port;
                options.dns = dns;
                options.mtu = mtu;
                options.persistent_keepalive = Some(keepalive);
                cmd_conf_mesh(&options, out_dir.as_deref())
            }
        },
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

// ── Key commands ──────────────────────────────────────────────────────────────

fn cmd_genkey() -> Result<()> {
    let (private, _) = fresh_pair()?;
    println!("{private}");
    Ok(())
}

fn cmd_pubkey(key: Option<String>) -> Result<()> {
    let text = match key {
        Some(k) => k,
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("failed to read private key from stdin")?;
            input.trim().to_string()
        }
    };

    let (_, public) = generate_key_pair(Some(&text))?
        .into_result()
        .map_err(|e| anyhow!(e))?;
    println!("{public}");
    Ok(())
}

fn cmd_genpsk() -> Result<()> {
    println!("{}", generate_pre_key()?);
    Ok(())
}

fn cmd_pair(private: Option<&str>, json: bool) -> Result<()> {
    let response = generate_key_pair(private)?;

    if json {
        println!("{}", response.to_json()?);
        return match response.error() {
            Some(error) => Err(anyhow!("{error}")),
            None => Ok(()),
        };
    }

    match response {
        KeyPairResponse::Pair { private, public } => {
            println!("Private: {private}");
            println!("Public:  {public}");
            Ok(())
        }
        KeyPairResponse::Failure { error } => Err(anyhow!(error)),
    }
}

fn fresh_pair() -> Result<(String, String)> {
    generate_key_pair(None)?
        .into_result()
        .map_err(|e| anyhow!(e))
}

// ── Config commands ───────────────────────────────────────────────────────────

fn cmd_conf_show(file: &Path, verbose: bool) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let config = parse(&text).with_context(|| format!("failed to parse {}", file.display()))?;
    config
        .validate()
        .with_context(|| format!("{} is not a usable config", file.display()))?;

    let public = config.interface_public_key()?;
    println!("Interface");
    println!("  Public key: {public}");
    println!("  Address:    {}", config.interface.address);
    if let Some(port) = config.interface.listen_port {
        println!("  Port:       {port}");
    }

    for (i, peer) in config.peers.iter().enumerate() {
        println!("Peer {}", i + 1);
        println!("  Public key:  {}", peer.public_key);
        println!("  Allowed IPs: {}", peer.allowed_ips);
        if let Some(endpoint) = &peer.endpoint {
            println!("  Endpoint:    {endpoint}");
        }
        if verbose {
            println!(
                "  Preshared:   {}",
                if peer.preshared_key.is_some() { "yes" } else { "no" }
            );
            if let Some(k) = peer.persistent_keepalive {
                println!("  Keepalive:   {k}s");
            }
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_conf_new(
    address: String,
    listen_port: Option<u16>,
    dns: Option<String>,
    mtu: Option<u32>,
    peer: Option<(String, String)>,
    endpoint: Option<String>,
    keepalive: Option<u16>,
    psk: bool,
    verbose: bool,
) -> Result<()> {
    let (private, public) = fresh_pair()?;

    let mut interface = InterfaceSection::new(private, address);
    interface.listen_port = listen_port;
    interface.dns = dns;
    interface.mtu = mtu;
    let mut config = WireGuardConfig::new(interface);

    if let Some((peer_public, allowed_ips)) = peer {
        let mut section = PeerSection::new(peer_public, allowed_ips);
        section.endpoint = endpoint;
        section.persistent_keepalive = keepalive;
        if psk {
            section.preshared_key = Some(generate_pre_key()?);
        }
        config = config.with_peer(section);
    }

    config.validate().context("generated config is invalid")?;
    debug!("rendering config with {} peer(s)", config.peers.len());

    print!("{}", render(&config));
    if verbose {
        eprintln!("Public key: {public}");
    }
    Ok(())
}

fn cmd_conf_mesh(options: &MeshOptions, out_dir: Option<&Path>) -> Result<()> {
    let configs = generate_mesh(options).context("cannot generate configs")?;

    let Some(dir) = out_dir else {
        for (i, config) in configs.iter().enumerate() {
            if i > 0 {
                println!();
            }
            println!("# wg{i}");
            print!("{}", render(config));
        }
        return Ok(());
    };

    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;
    for (i, config) in configs.iter().enumerate() {
        let path = dir.join(format!("wg{i}.conf"));
        std::fs::write(&path, render(config))
            .with_context(|| format!("failed to write {}", path.display()))?;
        debug!("wrote {}", path.display());
        println!("{}", path.display());
    }
    Ok(())
}
