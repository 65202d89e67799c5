mod outline;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tagscope",
    version,
    about = "Outline the symbols of a source file using tree-sitter tags queries"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Also log to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the symbols of a Java file, sorted by position
    Outline(outline::OutlineArgs),
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let _guard = tagscope_core::logging::init_logging("cli", cli.verbose);

    let rt = tokio::runtime::Runtime::new()?;

    match cli.command {
        Commands::Outline(args) => {
            let output = rt.block_on(outline::run(&args))?;
            println!("{}", output);
            Ok(())
        }
    }
}
