//! Demo binary: aligns a WAV file against a lyrics file and prints the
//! timing response as JSON. Not an RPC surface.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use tracing_subscriber::EnvFilter;

use timing_application::{AnalyzeStructureRequest, TimeLyricsRequest};
use timing_configuration::load_config;
use timing_setup::Application;
use vocal_features::read_wav_mono;

struct Args {
    audio: PathBuf,
    lyrics: PathBuf,
    line_hints: Option<PathBuf>,
    word_hints: Option<PathBuf>,
    structure: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut positional = Vec::new();
    let mut line_hints = None;
    let mut word_hints = None;
    let mut structure = false;

    for arg in env::args().skip(1) {
        if let Some(value) = arg.strip_prefix("--lines=") {
            line_hints = Some(PathBuf::from(value));
        } else if let Some(value) = arg.strip_prefix("--words=") {
            word_hints = Some(PathBuf::from(value));
        } else if arg == "--structure" {
            structure = true;
        } else if arg.starts_with("--") {
            return Err(format!("unknown argument `{arg}`"));
        } else {
            positional.push(PathBuf::from(arg));
        }
    }

    if positional.len() != 2 {
        return Err("expected an audio file and a lyrics file".to_string());
    }
    let lyrics = positional.pop().ok_or("missing lyrics file")?;
    let audio = positional.pop().ok_or("missing audio file")?;
    Ok(Args {
        audio,
        lyrics,
        line_hints,
        word_hints,
        structure,
    })
}

fn read_optional(path: Option<&Path>) -> anyhow::Result<Option<String>> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading hints file `{}`", path.display()))?;
            Ok(Some(text))
        }
        None => Ok(None),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = parse_args().map_err(|message| {
        anyhow!(
            "{message}\nusage: timing-service <audio.wav> <lyrics.txt> \
             [--lines=hints.json] [--words=hints.json] [--structure]"
        )
    })?;

    let config = load_config()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone())),
        )
        .init();

    let (samples, sample_rate_hz) = read_wav_mono(&args.audio)
        .map_err(|err| anyhow!("reading `{}`: {err}", args.audio.display()))?;
    let transcript = std::fs::read_to_string(&args.lyrics)
        .with_context(|| format!("reading lyrics file `{}`", args.lyrics.display()))?;

    let app = Application::new(config)?;

    if args.structure {
        let structure = app
            .analyze_structure
            .analyze_structure(AnalyzeStructureRequest {
                samples: samples.clone(),
                sample_rate_hz: Some(sample_rate_hz),
                session_id: None,
            })
            .await?;
        println!("{}", serde_json::to_string_pretty(&structure)?);
    }

    let response = app
        .time_lyrics
        .time_lyrics(TimeLyricsRequest {
            samples,
            sample_rate_hz: Some(sample_rate_hz),
            transcript,
            line_hints: read_optional(args.line_hints.as_deref())?,
            word_hints: read_optional(args.word_hints.as_deref())?,
            session_id: None,
        })
        .await?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
