use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::info;

use scenetune::{
    compositor::filter_string,
    models::{BoundingBox, Detection},
    settings::{build_backend, debug_enabled},
    SettingsStore, TuningEngine,
};

const USAGE: &str = "usage: scenetune <image> [label] [out-dir]";

#[tokio::main]
async fn main() -> Result<()> {
    let level = if debug_enabled() {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let mut args = std::env::args().skip(1);
    let Some(image_path) = args.next() else {
        bail!(USAGE);
    };
    let label = args.next().filter(|l| !l.trim().is_empty());
    let out_dir = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("scenetune-out"));

    run(Path::new(&image_path), label, &out_dir).await
}

async fn run(image_path: &Path, label: Option<String>, out_dir: &Path) -> Result<()> {
    let data_dir = data_dir();
    let settings = SettingsStore::new(data_dir.join("settings.json"))?.get();
    let backend = build_backend(&settings, &data_dir)?;
    let engine = TuningEngine::load(settings, backend).await;

    let frame = image::open(image_path)
        .with_context(|| format!("failed to decode {}", image_path.display()))?
        .to_rgba8();
    let (width, height) = frame.dimensions();
    info!("loaded {} ({}x{})", image_path.display(), width, height);

    // with a label, treat the middle half of the frame as the tracked object
    let detection = label.map(|label| {
        let bbox = BoundingBox::new(
            f64::from(width) * 0.25,
            f64::from(height) * 0.25,
            f64::from(width) * 0.5,
            f64::from(height) * 0.5,
        );
        Detection::new(label, 1.0, bbox)
    });

    let controller = engine.open_session();
    let feed = controller.feed();
    feed.set_detection(detection.clone());
    feed.push_frame(frame.clone());

    let mut scratch = controller.snapshot().await;
    let evaluation = engine
        .evaluate(&frame, detection.as_ref(), &mut scratch)
        .await;
    if let Some(analysis) = &evaluation.analysis {
        println!("{}", serde_json::to_string_pretty(&analysis.settings)?);
    }
    println!("live: {}", filter_string(&evaluation.composed.params));

    let capture = controller.capture(false).await?;
    println!(
        "captured {} ({}): {}",
        capture.snapshot.id,
        capture.snapshot.origin.as_str(),
        capture.css
    );

    let set = controller.multi_capture().await?;
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;
    for variant in &set.variants {
        let path = out_dir.join(format!("{}.png", variant.id()));
        variant
            .rendered
            .save(&path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("{} -> {}", variant.id(), path.display());
    }
    for (kind, err) in &set.failed {
        println!("{} failed: {}", kind.id(), err);
    }

    engine.flush().await
}

fn data_dir() -> PathBuf {
    std::env::var_os("SCENETUNE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(".scenetune"))
}
