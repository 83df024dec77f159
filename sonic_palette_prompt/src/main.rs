// SonicPalette CLI.
//
// Usage:
//   sonic-palette generate "<description>" [--tempo T] [--texture T] [--era E]
//     [--seed N] [--max-words N] [--config FILE] [--semantic] [--json]
//   sonic-palette list-emotions
//   sonic-palette list-styles
//   sonic-palette view <emotions|styles|references|emotion_to_styles>
//   sonic-palette datasets
//
// Every subcommand takes `--data-dir` (default `data`, or
// `$SONIC_PALETTE_DATA`). Datasets missing from it fall back to the built-in
// defaults. Logging goes to stderr, filtered by `RUST_LOG` (default `warn`).

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use sonic_palette_lexicon::{Dataset, DatasetOrigin, Lexicon, load_dir, loader::read_dataset};
use sonic_palette_prng::VibeRng;
use sonic_palette_prompt::{
    EraPref, PromptConfig, PromptEngine, PromptResult, SemanticAnalyzer, TempoPref, TexturePref,
    TokenCosine, UserIntent, VibeAnalyzer,
};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;
use tracing_subscriber::EnvFilter;

const WRAP_WIDTH: usize = 100;

/// Turn a vibe description into a music generation prompt
#[derive(Parser, Debug)]
#[command(name = "sonic-palette", version)]
struct Cli {
    /// Directory holding the lexicon JSON datasets
    #[arg(
        long,
        global = true,
        env = "SONIC_PALETTE_DATA",
        default_value = "data"
    )]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a prompt from a description
    Generate(GenerateArgs),
    /// List the known emotions
    ListEmotions,
    /// List the known styles
    ListStyles,
    /// Print one dataset as JSON
    View {
        /// emotions, styles, references or emotion_to_styles
        dataset: String,
    },
    /// Show where each dataset is loaded from
    Datasets,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Free-text description of the vibe
    description: String,

    /// auto, slow, medium or fast
    #[arg(long, default_value = "auto")]
    tempo: String,

    /// auto, electronic or acoustic
    #[arg(long, default_value = "auto")]
    texture: String,

    /// auto, retro or modern
    #[arg(long, default_value = "auto")]
    era: String,

    /// Seed for chord and reference sampling (default: clock)
    #[arg(long)]
    seed: Option<u64>,

    /// Word budget for the prompt
    #[arg(long)]
    max_words: Option<usize>,

    /// JSON file overriding pipeline settings
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Rank emotions and styles by text similarity as well as keywords
    #[arg(long)]
    semantic: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Generate(args) => generate(&cli.data_dir, args),
        Command::ListEmotions => {
            list_emotions(&Lexicon::load_dir(&cli.data_dir));
            Ok(())
        }
        Command::ListStyles => {
            list_styles(&Lexicon::load_dir(&cli.data_dir));
            Ok(())
        }
        Command::View { dataset } => view(&cli.data_dir, &dataset),
        Command::Datasets => {
            for (dataset, origin) in load_dir(&cli.data_dir).origins {
                println!(
                    "{:<24} {}",
                    dataset.file_name(),
                    dataset_source(&cli.data_dir, dataset, origin)
                );
            }
            Ok(())
        }
    }
}

fn generate(data_dir: &Path, args: GenerateArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => PromptConfig::load(path)?,
        None => PromptConfig::default(),
    };
    if let Some(max_words) = args.max_words {
        config.max_words = max_words;
    }

    let intent = UserIntent::new(args.description.as_str())
        .with_tempo(TempoPref::parse_lenient(&args.tempo))
        .with_texture(TexturePref::parse_lenient(&args.texture))
        .with_era(EraPref::parse_lenient(&args.era));

    let seed = args.seed.unwrap_or_else(clock_seed);
    info!(seed, "sampling seed");

    let loaded = load_dir(data_dir);
    for &(dataset, origin) in &loaded.origins {
        info!("{dataset}: {}", dataset_source(data_dir, dataset, origin));
    }
    let lexicon = loaded.lexicon;
    if args.semantic {
        let engine = PromptEngine::new(lexicon, config, SemanticAnalyzer::new(TokenCosine))?;
        run(&engine, &intent, seed, args.json)
    } else {
        let engine = PromptEngine::keyword(lexicon, config)?;
        run(&engine, &intent, seed, args.json)
    }
}

fn run<A: VibeAnalyzer>(
    engine: &PromptEngine<A>,
    intent: &UserIntent,
    seed: u64,
    json: bool,
) -> anyhow::Result<()> {
    info!(
        analyzer = engine.analyzer().name(),
        max_words = engine.config().max_words,
        "engine ready"
    );
    let mut rng = VibeRng::new(seed);
    let result = engine
        .generate(intent, &mut rng)
        .context("could not generate a prompt")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result, seed);
    }
    Ok(())
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

fn print_result(result: &PromptResult, seed: u64) {
    println!("--- RESULT ---");
    println!("Styles: {}", result.styles.join(", "));
    println!("Emotions: {}", result.emotions.join(", "));
    println!("BPM suggestion: {}", result.bpm_range);
    println!();
    println!("Prompt ({} words):", result.word_count());
    for line in wrap(&result.prompt, WRAP_WIDTH) {
        println!("{line}");
    }

    println!();
    println!("Chord progressions (Roman / C example):");
    for chord in &result.chords {
        println!("- {}  |  e.g., {}", chord.roman, chord.in_c);
    }

    println!();
    println!("Instrumentation suggestions:");
    for instrument in &result.instruments {
        println!("- {instrument}");
    }

    println!();
    println!("Reference tracks:");
    for track in &result.references {
        println!("- {}  ({})", track.title, track.note);
    }

    println!();
    println!("Seed: {seed} (rerun with --seed to reproduce)");
}

fn list_emotions(lexicon: &Lexicon) {
    for emotion in lexicon.emotions() {
        match &emotion.description {
            Some(desc) => println!("{:<12} {desc}", emotion.label),
            None => println!("{:<12} {}", emotion.label, emotion.keywords.join(", ")),
        }
    }
}

fn list_styles(lexicon: &Lexicon) {
    for style in lexicon.styles() {
        let desc = style.description.as_deref().unwrap_or("");
        println!(
            "{:<14} {:>8} BPM  {desc}",
            style.name,
            style.tempo.to_string()
        );
    }
}

fn view(data_dir: &Path, name: &str) -> anyhow::Result<()> {
    let Some(dataset) = Dataset::from_name(name) else {
        let names: Vec<String> = Dataset::ALL.iter().map(|d| d.to_string()).collect();
        bail!(
            "unknown dataset '{name}', expected one of: {}",
            names.join(", ")
        );
    };

    let json = match read_dataset(data_dir, dataset)? {
        Some(json) => json,
        None => {
            info!(
                "{dataset} not in {}, showing built-in default",
                data_dir.display()
            );
            dataset.embedded_json().to_string()
        }
    };
    let value: serde_json::Value =
        serde_json::from_str(&json).with_context(|| format!("{dataset} is not valid JSON"))?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn dataset_source(data_dir: &Path, dataset: Dataset, origin: DatasetOrigin) -> String {
    let path = data_dir.join(dataset.file_name());
    match origin {
        DatasetOrigin::File => path.display().to_string(),
        DatasetOrigin::Default => format!("built-in ({} not found)", path.display()),
        DatasetOrigin::Fallback => format!("built-in ({} could not be loaded)", path.display()),
    }
}

/// Greedy word wrap at `width` characters. Words longer than the width get
/// a line of their own.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if len > 0 && len + 1 + word_len > width {
            lines.push(std::mem::take(&mut line));
            len = 0;
        }
        if len > 0 {
            line.push(' ');
            len += 1;
        }
        line.push_str(word);
        len += word_len;
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
