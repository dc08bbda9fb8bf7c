use crate::offline;
use crate::script::{Replayer, read_script};
use anyhow::{Context, Result, bail};
use clap::{Args, ValueEnum};
use pixelpath_dot::{Highlight, RenderOptions};
use pixelpath_studio::{Outcome, Snapshot, Studio, StudioConfig, Upload};
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub struct SessionArgs {
    /// Image to upload as the root commit
    #[arg(short, long)]
    pub image: PathBuf,

    /// JSON edit script to replay after the upload
    #[arg(short, long)]
    pub script: Option<PathBuf>,

    /// JSON studio configuration
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Json,
    Dot,
}

fn load_config(path: Option<&PathBuf>) -> Result<StudioConfig> {
    let Some(path) = path else {
        return Ok(StudioConfig::default());
    };
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    StudioConfig::from_json(&content).with_context(|| format!("Failed to parse {:?}", path))
}

/// Upload the image, replay the script, and return the final state.
pub async fn replay_session(args: &SessionArgs) -> Result<Snapshot> {
    let config = load_config(args.config.as_ref())?;
    let studio = Studio::new(offline::collaborators()).with_config(config);

    let bytes = std::fs::read(&args.image)
        .with_context(|| format!("Failed to read {:?}", args.image))?;
    let upload = Upload::new(bytes, offline::mime_type_for(&args.image));
    let root = match studio
        .upload_root(upload)
        .await
        .with_context(|| format!("Failed to load {:?}", args.image))?
    {
        Outcome::Created(id) => id,
        Outcome::Skipped(reason) => bail!("Upload skipped: {}", reason),
    };

    if let Some(path) = &args.script {
        let ops = read_script(path)?;
        info!(steps = ops.len(), "replaying script");
        Replayer::new(&studio, root).apply_all(&ops).await?;
    }

    Ok(studio.snapshot())
}

pub async fn run(
    args: SessionArgs,
    format: Format,
    options: &RenderOptions,
    pretty: bool,
) -> Result<()> {
    let snapshot = replay_session(&args).await?;

    match format {
        Format::Json => {
            let json = if pretty {
                snapshot.to_json_pretty()?
            } else {
                serde_json::to_string(&snapshot)?
            };
            println!("{}", json);
        }
        Format::Dot => {
            let highlight = Highlight {
                current: snapshot.current_id.as_ref().map(|id| id.as_str()),
                selected: snapshot.selection.ids(),
            };
            print!(
                "{}",
                pixelpath_dot::render(&snapshot.commits, &highlight, options)
            );
        }
    }
    Ok(())
}
