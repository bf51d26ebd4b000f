use clap::{Parser, Subcommand};
use document_portal::{
    config::DEFAULT_CONFIG_PATH,
    logging, ChatModel, DocumentAnalyzer, DocumentComparator, DocumentHandler,
    DocumentIngestion, EnvSettings, LocalFile, ModelLoader,
};

use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Raise log verbosity (-v debug, -vv trace)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Skip the confirmation prompt before calling the LLM
    #[clap(short, long)]
    yes: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract metadata and a summary from one PDF
    Analyze {
        pdf: PathBuf,

        /// Reuse an existing session directory
        #[clap(long)]
        session_id: Option<String>,
    },
    /// Page-wise comparison of two PDFs
    Compare {
        reference: PathBuf,
        actual: PathBuf,

        /// Print the comparison as JSON instead of a table
        #[clap(long)]
        json: bool,
    },
    /// Validate credentials and config, then show the model that would be used
    Check,
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} [{elapsed_precise}] {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

fn confirm(llm: &dyn ChatModel) -> io::Result<bool> {
    print!("Send document text to {}? (y/n): ", llm.model_name());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_lowercase() == "y")
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    logging::init(args.verbose);

    let env = EnvSettings::from_process();
    let loader = ModelLoader::from_path(&args.config, &env)?;

    match args.command {
        Command::Check => {
            let llm = loader.load_llm()?;
            let settings = llm.settings();
            println!("Using LLM model: {}", llm.model_name());
            println!("Temperature: {}", settings.temperature);
            println!("Max output tokens: {}", settings.max_output_tokens);
            match loader.load_embeddings() {
                Ok(embeddings) => println!("Embedding model: {}", embeddings.model()),
                Err(e) => warn!("Embedding model unavailable: {}", e),
            }
        }
        Command::Analyze { pdf, session_id } => {
            let handler = DocumentHandler::from_env(&env, session_id)?;
            let saved = handler.save(&LocalFile::new(&pdf))?;
            let text = handler.read(&saved)?;

            let llm = loader.load_llm()?;
            if !args.yes && !confirm(llm.as_ref())? {
                warn!("User aborted the operation");
                return Ok(());
            }

            let analyzer = DocumentAnalyzer::new(llm);
            let pb = spinner(&format!("Analyzing with {}", analyzer.model_name()));
            let result = analyzer.analyze(&text).await;
            pb.finish_and_clear();

            let metadata = result?;
            println!("{}", serde_json::to_string_pretty(&metadata)?);
            info!("Analysis complete for session {}", handler.session());
        }
        Command::Compare {
            reference,
            actual,
            json,
        } => {
            let ingestion = DocumentIngestion::from_env(&env)?;
            let (reference_path, actual_path) =
                ingestion.save_pair(&LocalFile::new(&reference), &LocalFile::new(&actual))?;
            let reference_text = ingestion.read(&reference_path)?;
            let actual_text = ingestion.read(&actual_path)?;

            let llm = loader.load_llm()?;
            if !args.yes && !confirm(llm.as_ref())? {
                warn!("User aborted the operation");
                return Ok(());
            }

            let comparator = DocumentComparator::new(llm);
            let pb = spinner(&format!("Comparing with {}", comparator.model_name()));
            let result = comparator.compare(&reference_text, &actual_text).await;
            pb.finish_and_clear();

            let table = result?;
            if json {
                println!("{}", serde_json::to_string_pretty(&table)?);
            } else {
                print!("{}", table);
            }
        }
    }

    Ok(())
}
