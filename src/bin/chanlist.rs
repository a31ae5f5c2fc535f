use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use chanlist::serializer::{ChannelSerializer, PluginRegistry, SerializerError, SerializerOptions};
use chanlist::TextEncoding;

#[derive(Parser, Debug)]
#[command(
    name = "chanlist",
    about = "Inspect and normalize TV channel-list files",
    version
)]
struct Cli {
    /// JSON options file (default_encoding, temp_root, compress_archives)
    #[arg(long, global = true, value_name = "JSON")]
    config: Option<PathBuf>,
    /// Override the default text encoding (label or code page)
    #[arg(long, global = true)]
    encoding: Option<TextEncoding>,
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Print the diagnostics report of a channel list
    Info(FileArgs),
    /// Print the editing capabilities of the detected format as JSON
    Features(FileArgs),
    /// List the files to back up together with a channel list
    Paths(FileArgs),
    /// Run the format's clean-up pass and save the result
    Cleanup(CleanupArgs),
}

#[derive(ClapArgs, Debug)]
struct FileArgs {
    /// Channel list file
    path: PathBuf,
}

#[derive(ClapArgs, Debug)]
struct CleanupArgs {
    /// Channel list file
    path: PathBuf,
    /// Write to this file instead of overwriting the input
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(exit_code(&e));
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn exit_code(err: &SerializerError) -> i32 {
    match err {
        SerializerError::Format { .. } | SerializerError::NoPluginFound(_) => 2,
        SerializerError::UnsupportedVersion(_) => 3,
        SerializerError::SaveAsNotSupported(_) => 4,
        _ => 5,
    }
}

fn run(cli: Cli) -> Result<(), SerializerError> {
    let mut options = match &cli.config {
        Some(path) => SerializerOptions::read_from_file(path)?,
        None => SerializerOptions::default(),
    };
    if let Some(encoding) = cli.encoding {
        options.default_encoding = encoding;
    }
    let registry = PluginRegistry::with_builtin_plugins();

    let path = match &cli.cmd {
        Cmd::Info(a) | Cmd::Features(a) | Cmd::Paths(a) => &a.path,
        Cmd::Cleanup(a) => &a.path,
    };
    let mut serializer = registry.open(path, &options)?;
    let result = execute(&cli.cmd, serializer.as_mut());
    serializer.dispose();
    result
}

fn execute(cmd: &Cmd, serializer: &mut dyn ChannelSerializer) -> Result<(), SerializerError> {
    match cmd {
        Cmd::Info(_) => {
            println!("Format: {}", serializer.format_description());
            print!("{}", serializer.file_information());
        }
        Cmd::Features(_) => {
            let json = serde_json::to_string_pretty(serializer.features())?;
            println!("{json}");
        }
        Cmd::Paths(_) => {
            for p in serializer.data_file_paths() {
                println!("{}", p.display());
            }
        }
        Cmd::Cleanup(a) => {
            if !serializer.features().can_clean_up_channel_data {
                println!("{} has no clean-up pass", serializer.format_description());
                return Ok(());
            }
            match serializer.clean_up_channel_data() {
                Some(log) => {
                    print!("{log}");
                    serializer.set_save_as_file_name(a.out.clone());
                    serializer.save()?;
                }
                None => println!("nothing to clean up"),
            }
        }
    }
    Ok(())
}
