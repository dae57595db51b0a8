mod classify;
mod digest;
mod report;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use sitrep_core::ClassifierKind;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "sitrep")]
#[command(about = "Classify ranked posts and synthesize situation reports")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate a situation report from a digest
    Report {
        /// Digest markdown file
        #[arg(long)]
        digest: PathBuf,

        /// Classification strategy (overrides `SITREP_CLASSIFIER`)
        #[arg(long, value_enum)]
        classifier: Option<ClassifierArg>,

        /// Posts kept per category (overrides `OLLAMA_TOP_PER_CATEGORY`)
        #[arg(long)]
        top_per_category: Option<usize>,

        /// Max posts taken from the digest, 0 for all (overrides `SITREP_INTEL_LIMIT`)
        #[arg(long)]
        intel_limit: Option<usize>,

        /// Single generator call over the whole digest
        #[arg(long)]
        direct: bool,

        /// Write the report here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Classify the posts of a digest and print them as JSON
    Classify {
        /// Digest markdown file
        #[arg(long)]
        digest: PathBuf,

        /// Classification strategy (overrides `SITREP_CLASSIFIER`)
        #[arg(long, value_enum)]
        classifier: Option<ClassifierArg>,
    },
    /// Render a JSON array of posts into a digest
    Digest {
        /// JSON file holding an array of post records
        #[arg(long)]
        posts: PathBuf,

        /// Write the digest here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ClassifierArg {
    Generative,
    Embedding,
}

impl From<ClassifierArg> for ClassifierKind {
    fn from(arg: ClassifierArg) -> Self {
        match arg {
            ClassifierArg::Generative => ClassifierKind::Generative,
            ClassifierArg::Embedding => ClassifierKind::Embedding,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    dotenvy::dotenv().ok();
    let config = sitrep_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match command {
        Commands::Report {
            digest,
            classifier,
            top_per_category,
            intel_limit,
            direct,
            output,
        } => {
            let args = report::ReportArgs {
                classifier: classifier.map(Into::into),
                top_per_category,
                intel_limit,
                direct,
            };
            let text = report::run(&config, &digest, &args).await?;
            write_output(&text, output.as_deref())?;
        }
        Commands::Classify { digest, classifier } => {
            let json = classify::run(&config, &digest, classifier.map(Into::into)).await?;
            println!("{json}");
        }
        Commands::Digest { posts, output } => {
            let text = digest::run(&posts)?;
            write_output(&text, output.as_deref())?;
        }
    }

    Ok(())
}

fn read_file(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn write_output(text: &str, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, text)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "output written");
        }
        None => println!("{text}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests;
