use std::{
    fs::File,
    io::{self, BufReader},
    path::PathBuf,
};

use clap::{Parser, Subcommand};
use saber_sound_core::{
    available_ports, AppConfig, ColorName, Dispatcher, DryRunPlayer, LineReader, LineSource,
    Player, RodioPlayer, SerialSource, Variant,
};
use tracing_subscriber::EnvFilter;

fn main() -> saber_sound_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command.unwrap_or_default() {
        Commands::Listen(args) => run_listen(args),
        Commands::Replay {
            input,
            variant,
            dry_run,
        } => run_replay(input, variant, dry_run),
        Commands::Ports => run_ports(),
        Commands::Classify { r, g, b } => {
            println!("{}", ColorName::classify(r, g, b).command_line());
            Ok(())
        }
    }
}

fn run_listen(args: ListenArgs) -> saber_sound_core::Result<()> {
    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(port) = args.port {
        config.serial.port = port;
    }
    if let Some(baud_rate) = args.baud {
        config.serial.baud_rate = baud_rate;
    }
    if let Some(variant) = args.variant {
        config.variant = variant;
    }

    tracing::info!(
        port = %config.serial.port,
        baud_rate = config.serial.baud_rate,
        variant = %config.variant,
        "starting serial bridge"
    );

    let mut source = SerialSource::open(&config.serial)?;
    let mut dispatcher = Dispatcher::new(config.variant, RodioPlayer::new());
    dispatcher.run(&mut source)
}

fn run_replay(
    input: Option<PathBuf>,
    variant: Variant,
    dry_run: bool,
) -> saber_sound_core::Result<()> {
    tracing::info!(?input, %variant, dry_run, "replaying recorded lines");

    let mut source: Box<dyn LineSource> = match input {
        Some(path) if path.to_str() != Some("-") => {
            Box::new(LineReader::new(BufReader::new(File::open(path)?)))
        }
        _ => Box::new(LineReader::new(io::stdin().lock())),
    };
    let player: Box<dyn Player> = if dry_run {
        Box::new(DryRunPlayer::new())
    } else {
        Box::new(RodioPlayer::new())
    };

    Dispatcher::new(variant, player).run(source.as_mut())
}

fn run_ports() -> saber_sound_core::Result<()> {
    let ports = available_ports()?;
    if ports.is_empty() {
        tracing::warn!("no serial ports found");
    }
    for port in ports {
        println!("{}", port.port_name);
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Plays lightsaber sounds for serial commands", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Listen on the serial port and play sounds (the default).
    Listen(ListenArgs),
    /// Dispatch lines from a file, or stdin, instead of the serial port.
    Replay {
        /// File with one command per line. Reads stdin when omitted or `-`.
        input: Option<PathBuf>,
        /// Bridge behaviour: `mapped` or `fallback`.
        #[arg(long, default_value_t = Variant::Mapped)]
        variant: Variant,
        /// Log what would be played without touching the audio device.
        #[arg(long)]
        dry_run: bool,
    },
    /// List serial ports visible to this machine.
    Ports,
    /// Print the command line the controller sends for an RGB colour.
    Classify { r: u8, g: u8, b: u8 },
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Listen(ListenArgs::default())
    }
}

#[derive(clap::Args, Debug, Default)]
struct ListenArgs {
    /// Serial device to open.
    #[arg(short, long)]
    port: Option<String>,
    /// Baud rate of the serial link.
    #[arg(short, long)]
    baud: Option<u32>,
    /// Bridge behaviour: `mapped` or `fallback`.
    #[arg(long)]
    variant: Option<Variant>,
    /// JSON configuration file. Flags override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,
}
